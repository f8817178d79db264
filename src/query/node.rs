//! Query operator trees.

use std::fmt;

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::parameters::Parameters;

/// Operator of a term literal; its term is the `default` parameter.
pub const TEXT_OPERATOR: &str = "text";

/// Parameter key for the unnamed `#op:value()` parameter.
pub const DEFAULT_PARAMETER: &str = "default";

/// A node of a query tree: an operator applied to parameters and children.
///
/// Nodes are values. Rewrites build new nodes from old ones.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Node {
    operator: String,
    #[serde(default, skip_serializing_if = "Parameters::is_empty")]
    parameters: Parameters,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    children: Vec<Node>,
    #[serde(default)]
    position: u32,
}

impl Node {
    pub fn new(operator: impl Into<String>) -> Self {
        Node {
            operator: operator.into(),
            parameters: Parameters::new(),
            children: Vec::new(),
            position: 0,
        }
    }

    /// A term literal, `#text:term()`.
    pub fn text(term: impl Into<String>) -> Self {
        Node::new(TEXT_OPERATOR).with_parameter(DEFAULT_PARAMETER, term.into())
    }

    pub fn with_parameter(mut self, key: impl Into<String>, value: impl Into<Value>) -> Self {
        self.parameters.set(key, value);
        self
    }

    pub fn with_parameters(mut self, parameters: Parameters) -> Self {
        self.parameters = parameters;
        self
    }

    pub fn with_child(mut self, child: Node) -> Self {
        self.children.push(child);
        self
    }

    pub fn with_children(mut self, children: Vec<Node>) -> Self {
        self.children = children;
        self
    }

    pub fn with_operator(mut self, operator: impl Into<String>) -> Self {
        self.operator = operator.into();
        self
    }

    /// Offset of the node in the query text it was parsed from.
    pub fn with_position(mut self, position: u32) -> Self {
        self.position = position;
        self
    }

    pub fn operator(&self) -> &str {
        &self.operator
    }

    pub fn parameters(&self) -> &Parameters {
        &self.parameters
    }

    pub fn children(&self) -> &[Node] {
        &self.children
    }

    pub fn position(&self) -> u32 {
        self.position
    }

    pub fn is_text(&self) -> bool {
        self.operator == TEXT_OPERATOR
    }

    /// The `default` parameter rendered as a string.
    pub fn default_parameter(&self) -> Option<String> {
        match self.parameters.get(DEFAULT_PARAMETER)? {
            Value::String(value) => Some(value.clone()),
            Value::Null => None,
            other => Some(other.to_string()),
        }
    }

    /// Split into operator, parameters and children.
    pub fn into_parts(self) -> (String, Parameters, Vec<Node>) {
        (self.operator, self.parameters, self.children)
    }
}

/// Source positions are not part of a node's identity.
impl PartialEq for Node {
    fn eq(&self, other: &Self) -> bool {
        self.operator == other.operator
            && self.parameters == other.parameters
            && self.children == other.children
    }
}

fn write_value(f: &mut fmt::Formatter<'_>, value: &Value) -> fmt::Result {
    match value {
        Value::String(text) => f.write_str(text),
        other => write!(f, "{other}"),
    }
}

impl fmt::Display for Node {
    /// Query syntax: `#op:value:key=value(children)`.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.operator)?;
        if let Some(value) = self.parameters.get(DEFAULT_PARAMETER) {
            f.write_str(":")?;
            write_value(f, value)?;
        }
        for key in self.parameters.keys() {
            if key == DEFAULT_PARAMETER {
                continue;
            }
            write!(f, ":{key}=")?;
            if let Some(value) = self.parameters.get(key) {
                write_value(f, value)?;
            }
        }
        f.write_str("(")?;
        for (i, child) in self.children.iter().enumerate() {
            if i > 0 {
                f.write_str(" ")?;
            }
            write!(f, "{child}")?;
        }
        f.write_str(")")
    }
}
