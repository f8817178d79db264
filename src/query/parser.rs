//! Parser for the structured query language.
//!
//! Supported syntax:
//! - Operators: `#name:value:key=value(children)`
//! - Bare terms: `white` is `#text:white()`
//! - Phrases: `"white house"` is `#od:1(#text:white() #text:house())`
//! - Fields: `a.b` is `#inside(#text:a() #field:b())`
//! - Field alternation: `a.b,c` is `#inside(#text:a() #extentor(#field:b() #field:c()))`
//! - Smoothing: `a.(b)` is `#smoothlm(#text:a() #inside(#text:a() #field:b()))`
//!
//! Several top-level expressions are combined with `#combine`.

use log::trace;
use serde_json::Value;

use crate::error::{Result, SkeinError};
use crate::query::node::{DEFAULT_PARAMETER, Node};

/// Parse query text into a node tree.
pub fn parse_query(text: &str) -> Result<Node> {
    let mut parser = QueryParser::new(text);
    let mut nodes = parser.parse_sequence()?;
    if let Some(c) = parser.peek() {
        return Err(parser.error(format!("unexpected '{c}'")));
    }
    let root = match nodes.len() {
        0 => return Err(SkeinError::parse("empty query")),
        1 => nodes.remove(0),
        _ => Node::new("combine").with_children(nodes),
    };
    trace!("parsed {text:?} into {root}");
    Ok(root)
}

/// Convert a parameter token into a typed value.
pub fn parse_value(token: &str) -> Value {
    if let Ok(integer) = token.parse::<i64>() {
        return Value::from(integer);
    }
    if let Ok(float) = token.parse::<f64>()
        && float.is_finite()
    {
        return Value::from(float);
    }
    match token {
        "true" => Value::Bool(true),
        "false" => Value::Bool(false),
        _ => Value::String(token.to_string()),
    }
}

fn is_term_char(c: char) -> bool {
    !c.is_whitespace() && !matches!(c, '(' | ')' | '#' | '.' | ',' | '"')
}

fn is_operator_char(c: char) -> bool {
    c.is_alphanumeric() || c == '_' || c == '-'
}

struct QueryParser<'a> {
    text: &'a str,
    position: usize,
}

impl<'a> QueryParser<'a> {
    fn new(text: &'a str) -> Self {
        QueryParser { text, position: 0 }
    }

    fn peek(&mut self) -> Option<char> {
        self.skip_whitespace();
        self.peek_raw()
    }

    fn peek_raw(&self) -> Option<char> {
        self.text[self.position..].chars().next()
    }

    fn bump(&mut self) -> Option<char> {
        let c = self.peek_raw()?;
        self.position += c.len_utf8();
        Some(c)
    }

    fn expect(&mut self, expected: char) -> Result<()> {
        match self.bump() {
            Some(c) if c == expected => Ok(()),
            Some(c) => Err(self.error(format!("expected '{expected}' but found '{c}'"))),
            None => Err(self.error(format!("expected '{expected}' but found end of query"))),
        }
    }

    fn skip_whitespace(&mut self) {
        while self.peek_raw().is_some_and(char::is_whitespace) {
            self.bump();
        }
    }

    fn take_while(&mut self, predicate: impl Fn(char) -> bool) -> &'a str {
        let start = self.position;
        while self.peek_raw().is_some_and(&predicate) {
            self.bump();
        }
        &self.text[start..self.position]
    }

    fn error(&self, message: String) -> SkeinError {
        SkeinError::parse(format!("{message} at offset {}", self.position))
    }

    fn offset(&self) -> u32 {
        self.position as u32
    }

    /// Expressions up to a closing parenthesis or the end of input.
    fn parse_sequence(&mut self) -> Result<Vec<Node>> {
        let mut nodes = Vec::new();
        while let Some(c) = self.peek() {
            if c == ')' {
                break;
            }
            nodes.push(self.parse_expression()?);
        }
        Ok(nodes)
    }

    fn parse_expression(&mut self) -> Result<Node> {
        match self.peek() {
            Some('#') => self.parse_operator(),
            Some('"') => self.parse_phrase(),
            Some(c) if is_term_char(c) => self.parse_term(),
            Some(c) => Err(self.error(format!("unexpected '{c}'"))),
            None => Err(self.error("unexpected end of query".to_string())),
        }
    }

    fn parse_operator(&mut self) -> Result<Node> {
        let position = self.offset();
        self.expect('#')?;
        let operator = self.take_while(is_operator_char);
        if operator.is_empty() {
            return Err(self.error("missing operator name".to_string()));
        }
        let mut node = Node::new(operator).with_position(position);

        while self.peek_raw() == Some(':') {
            self.bump();
            let token = self.take_while(|c| c != ':' && c != '(' && !c.is_whitespace());
            match token.split_once('=') {
                Some((key, value)) if !key.is_empty() => {
                    node = node.with_parameter(key, parse_value(value));
                }
                _ => node = node.with_parameter(DEFAULT_PARAMETER, parse_value(token)),
            }
        }

        self.expect('(')?;
        let children = self.parse_sequence()?;
        self.expect(')')?;
        Ok(node.with_children(children))
    }

    fn parse_phrase(&mut self) -> Result<Node> {
        let position = self.offset();
        self.expect('"')?;
        let mut terms = Vec::new();
        loop {
            self.skip_whitespace();
            match self.peek_raw() {
                Some('"') => {
                    self.bump();
                    break;
                }
                Some(c) if is_term_char(c) => {
                    let offset = self.offset();
                    let term = self.take_while(is_term_char);
                    terms.push(Node::text(term).with_position(offset));
                }
                Some(_) => {
                    self.bump();
                }
                None => return Err(self.error("unterminated phrase".to_string())),
            }
        }
        if terms.is_empty() {
            return Err(self.error("empty phrase".to_string()));
        }
        Ok(Node::new("od")
            .with_parameter(DEFAULT_PARAMETER, 1)
            .with_position(position)
            .with_children(terms))
    }

    fn parse_term(&mut self) -> Result<Node> {
        let position = self.offset();
        let term = self.take_while(is_term_char);
        let text = Node::text(term).with_position(position);
        if self.peek_raw() != Some('.') {
            return Ok(text);
        }
        self.bump();

        let mut counted = text.clone();
        if self.peek_raw() != Some('(') {
            let fields = self.parse_fields()?;
            counted = Node::new("inside")
                .with_position(position)
                .with_child(text.clone())
                .with_child(fields);
            if self.peek_raw() != Some('.') {
                return Ok(counted);
            }
            self.bump();
        }

        self.expect('(')?;
        let smoothing = self.parse_fields()?;
        self.expect(')')?;
        let background = Node::new("inside")
            .with_position(position)
            .with_child(text)
            .with_child(smoothing);
        Ok(Node::new("smoothlm")
            .with_position(position)
            .with_child(counted)
            .with_child(background))
    }

    /// `b` or `b,c,...`; alternatives become an `#extentor`.
    fn parse_fields(&mut self) -> Result<Node> {
        let position = self.offset();
        let mut fields = Vec::new();
        loop {
            let offset = self.offset();
            let name = self.take_while(is_term_char);
            if name.is_empty() {
                return Err(self.error("missing field name".to_string()));
            }
            fields.push(
                Node::new("field")
                    .with_parameter(DEFAULT_PARAMETER, name)
                    .with_position(offset),
            );
            if self.peek_raw() != Some(',') {
                break;
            }
            self.bump();
        }
        if fields.len() == 1 {
            Ok(fields.remove(0))
        } else {
            Ok(Node::new("extentor")
                .with_position(position)
                .with_children(fields))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parsed(text: &str) -> String {
        parse_query(text).unwrap().to_string()
    }

    #[test]
    fn test_operators_and_parameters() {
        assert_eq!(parsed("#od:3(a b)"), "#od:3(#text:a() #text:b())");
        assert_eq!(
            parsed("#combine:0=2:norm=false( #text:a()  #uw:8(b c) )"),
            "#combine:0=2:norm=false(#text:a() #uw:8(#text:b() #text:c()))"
        );

        let node = parse_query("#extents:part=postings:white()").unwrap();
        assert_eq!(node.operator(), "extents");
        assert_eq!(node.parameters().get_str("part"), Some("postings"));
        assert_eq!(node.default_parameter().as_deref(), Some("white"));
    }

    #[test]
    fn test_bare_terms_are_combined() {
        assert_eq!(parsed("white"), "#text:white()");
        assert_eq!(parsed("white house"), "#combine(#text:white() #text:house())");
        assert_eq!(parsed("\"white house\""), "#od:1(#text:white() #text:house())");
    }

    #[test]
    fn test_field_shorthands() {
        assert_eq!(parsed("a.b"), "#inside(#text:a() #field:b())");
        assert_eq!(
            parsed("a.b,c"),
            "#inside(#text:a() #extentor(#field:b() #field:c()))"
        );
        assert_eq!(
            parsed("a.(b)"),
            "#smoothlm(#text:a() #inside(#text:a() #field:b()))"
        );
        assert_eq!(
            parsed("a.b.(c)"),
            "#smoothlm(#inside(#text:a() #field:b()) #inside(#text:a() #field:c()))"
        );
    }

    #[test]
    fn test_positions() {
        let node = parse_query("#band(x  y)").unwrap();
        assert_eq!(node.position(), 0);
        assert_eq!(node.children()[0].position(), 6);
        assert_eq!(node.children()[1].position(), 9);
    }

    #[test]
    fn test_parse_errors() {
        for text in ["", "#od:1(a b", "a)", "#(a)", "#od", "\"a b", "a.,b"] {
            assert!(
                matches!(parse_query(text), Err(SkeinError::Parse(_))),
                "{text:?} should not parse"
            );
        }
    }

    #[test]
    fn test_parse_value() {
        assert_eq!(parse_value("3"), Value::from(3));
        assert_eq!(parse_value("0.5"), Value::from(0.5));
        assert_eq!(parse_value("false"), Value::Bool(false));
        assert_eq!(parse_value("house"), Value::from("house"));
    }
}
