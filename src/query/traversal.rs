//! Rewrite passes over query trees.
//!
//! A [`Traversal`] is applied depth-first: `before_node` sees a node on the
//! way down, `after_node` receives it again with its children already
//! rewritten and returns the replacement.

use lazy_static::lazy_static;
use log::{trace, warn};
use regex::Regex;

use crate::error::Result;
use crate::index::{EXTENTS_PART, POSTINGS_PART, STEMMED_POSTINGS_PART};
use crate::iterator::Capability;
use crate::parameters::Parameters;
use crate::query::node::{DEFAULT_PARAMETER, Node};
use crate::query::stemmer::{PorterStemmer, Stemmer};

lazy_static! {
    static ref NUMERIC_OPERATOR: Regex = Regex::new(r"^\d+$").unwrap();
    static ref WINDOW_OPERATOR: Regex = Regex::new(r"^(od|uw)(\d+)$").unwrap();
}

/// A depth-first tree rewrite.
pub trait Traversal {
    fn before_node(&mut self, _node: &Node) -> Result<()> {
        Ok(())
    }

    /// Replacement for `node`, whose children have already been rewritten.
    fn after_node(&mut self, node: Node) -> Result<Node>;
}

/// Apply `traversal` to `root`, returning the rewritten tree.
pub fn traverse<T: Traversal + ?Sized>(root: &Node, traversal: &mut T) -> Result<Node> {
    traversal.before_node(root)?;
    let children = root
        .children()
        .iter()
        .map(|child| traverse(child, traversal))
        .collect::<Result<Vec<_>>>()?;
    let rewritten = root.clone().with_children(children);
    traversal.after_node(rewritten)
}

/// Canonical window operators: `#3` and `#od3` become `#od:3`, `#uw5` becomes `#uw:5`.
#[derive(Debug, Default)]
pub struct CompatibilityTraversal;

impl Traversal for CompatibilityTraversal {
    fn after_node(&mut self, node: Node) -> Result<Node> {
        let operator = node.operator().to_string();
        if NUMERIC_OPERATOR.is_match(&operator) {
            trace!("#{operator} -> #od:{operator}");
            let width = operator.parse::<u64>().unwrap_or(1);
            return Ok(node
                .with_operator("od")
                .with_parameter(DEFAULT_PARAMETER, width));
        }
        if let Some(captures) = WINDOW_OPERATOR.captures(&operator) {
            let name = captures[1].to_string();
            let width = captures[2].parse::<u64>().unwrap_or(1);
            trace!("#{operator} -> #{name}:{width}");
            return Ok(node
                .with_operator(name)
                .with_parameter(DEFAULT_PARAMETER, width));
        }
        Ok(node)
    }
}

/// Points term and field nodes at concrete index parts.
///
/// Terms prefer the stemmed part (with the term stemmed), then plain
/// postings, then the extents part. Nodes that already name a part keep it.
#[derive(Debug)]
pub struct PartAssignmentTraversal {
    parts: Parameters,
    stemming: bool,
    stemmer: PorterStemmer,
}

impl PartAssignmentTraversal {
    /// `parts` maps part names to `{"positions": bool, ...}` descriptions.
    pub fn new(parts: Parameters, stemming: bool) -> Self {
        PartAssignmentTraversal {
            parts,
            stemming,
            stemmer: PorterStemmer::new(),
        }
    }

    fn has_positions(&self, part: &str) -> bool {
        self.parts
            .get_map(part)
            .and_then(|info| info.get_bool("positions"))
            .unwrap_or(false)
    }

    fn leaf(&self, node: Node, part: &str, term: String) -> Node {
        let operator = if self.has_positions(part) {
            "extents"
        } else {
            "counts"
        };
        trace!("#{}:{term} -> #{operator}:part={part}", node.operator());
        let position = node.position();
        let (_, parameters, children) = node.into_parts();
        Node::new(operator)
            .with_position(position)
            .with_parameters(parameters)
            .with_parameter("part", part)
            .with_parameter(DEFAULT_PARAMETER, term)
            .with_children(children)
    }

    fn assign_text(&self, node: Node) -> Node {
        let Some(term) = node.default_parameter() else {
            return node;
        };
        if let Some(part) = node.parameters().get_str("part").map(str::to_string) {
            return self.leaf(node, &part, term);
        }
        if self.stemming && self.parts.contains(STEMMED_POSTINGS_PART) {
            let stemmed = self.stemmer.stem(&term);
            return self.leaf(node, STEMMED_POSTINGS_PART, stemmed);
        }
        for part in [POSTINGS_PART, EXTENTS_PART] {
            if self.parts.contains(part) {
                return self.leaf(node, part, term.to_lowercase());
            }
        }
        warn!("no index part available for term '{term}'");
        node
    }

    fn assign_field(&self, node: Node) -> Node {
        let Some(field) = node.default_parameter() else {
            return node;
        };
        if self.parts.contains(EXTENTS_PART) {
            let position = node.position();
            let (_, parameters, children) = node.into_parts();
            return Node::new("extents")
                .with_position(position)
                .with_parameters(parameters)
                .with_parameter("part", EXTENTS_PART)
                .with_parameter(DEFAULT_PARAMETER, field)
                .with_children(children);
        }
        warn!("no extents part available for field '{field}'");
        node
    }
}

impl Traversal for PartAssignmentTraversal {
    fn after_node(&mut self, node: Node) -> Result<Node> {
        Ok(match node.operator() {
            "text" => self.assign_text(node),
            "field" => self.assign_field(node),
            _ => node,
        })
    }
}

/// Turns count-valued subtrees into scored ones for ranked retrieval.
///
/// Count and extent children of `#combine` are wrapped in `#feature` with
/// the default scoring function. [`ScoringCastTraversal::cast_root`] also
/// wraps a non-scoring root in `#combine`.
#[derive(Debug)]
pub struct ScoringCastTraversal<F> {
    scorer: String,
    capability: F,
}

impl<F> ScoringCastTraversal<F>
where
    F: Fn(&Node) -> Option<Capability>,
{
    /// `capability` reports what a node will build into, if known.
    pub fn new(scorer: impl Into<String>, capability: F) -> Self {
        ScoringCastTraversal {
            scorer: scorer.into(),
            capability,
        }
    }

    fn cast(&self, node: Node) -> Node {
        match (self.capability)(&node) {
            Some(Capability::Count | Capability::Extent) => Node::new("feature")
                .with_parameter(DEFAULT_PARAMETER, self.scorer.as_str())
                .with_position(node.position())
                .with_child(node),
            _ => node,
        }
    }

    /// Rewrite `root`, wrapping it in `#combine` unless it already scores.
    pub fn cast_root(&mut self, root: &Node) -> Result<Node> {
        let root = traverse(root, self)?;
        if (self.capability)(&root) == Some(Capability::Score) {
            return Ok(root);
        }
        let wrapped = Node::new("combine")
            .with_position(root.position())
            .with_child(root);
        self.after_node(wrapped)
    }
}

impl<F> Traversal for ScoringCastTraversal<F>
where
    F: Fn(&Node) -> Option<Capability>,
{
    fn after_node(&mut self, node: Node) -> Result<Node> {
        if node.operator() != "combine" {
            return Ok(node);
        }
        let position = node.position();
        let (operator, parameters, children) = node.into_parts();
        let children = children.into_iter().map(|child| self.cast(child)).collect();
        Ok(Node::new(operator)
            .with_parameters(parameters)
            .with_position(position)
            .with_children(children))
    }
}
