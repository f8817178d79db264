//! Operator registry.
//!
//! Every query operator maps to a [`NodeType`]: the capability of the
//! iterator it builds, the shape of input it accepts and the factory that
//! builds it. The table is built once and only read afterwards.

use ahash::AHashMap;
use lazy_static::lazy_static;
use log::warn;

use crate::error::{Result, SkeinError};
use crate::iterator::combination::ScoreCombinationIterator;
use crate::iterator::conjunction::ConjunctionIterator;
use crate::iterator::disjunction::DisjunctionIterator;
use crate::iterator::extent_disjunction::ExtentDisjunctionIterator;
use crate::iterator::inside::{ExtentInsideIterator, Inside};
use crate::iterator::null::NullExtentIterator;
use crate::iterator::scoring::ScoringFunctionIterator;
use crate::iterator::synonym::SynonymIterator;
use crate::iterator::term::{TermCountIterator, TermExtentIterator};
use crate::iterator::window::{
    OrderedWindow, OrderedWindowIterator, UnorderedWindow, UnorderedWindowIterator,
};
use crate::iterator::{
    Capability, CountIterator, ExtentIterator, QueryIterator, ScoreIterator, StructuredIterator,
};
use crate::query::node::{DEFAULT_PARAMETER, Node};
use crate::retrieval::builder::BuildContext;
use crate::scoring::create_scoring_function;

/// Builds an iterator for a validated node from its built children.
pub type Factory = fn(&BuildContext<'_>, &Node, Vec<QueryIterator>) -> Result<QueryIterator>;

/// The input a node type accepts.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Signature {
    /// Whether the node may carry parameters.
    pub parameters: bool,
    /// Fixed child slots, in order.
    pub slots: &'static [Capability],
    /// A trailing slot taking one or more children of the same capability.
    pub variadic: Option<Capability>,
}

impl Signature {
    /// Capability required of the child at `index`.
    pub fn slot(&self, index: usize) -> Option<Capability> {
        self.slots.get(index).copied().or(self.variadic)
    }

    fn accepts_child_count(&self, count: usize) -> bool {
        match self.variadic {
            Some(_) => count > self.slots.len(),
            None => count == self.slots.len(),
        }
    }
}

const LEAF: Signature = Signature {
    parameters: true,
    slots: &[],
    variadic: None,
};

const BOOLEAN: Signature = Signature {
    parameters: false,
    slots: &[],
    variadic: Some(Capability::Indicator),
};

const EXTENT_UNION: Signature = Signature {
    parameters: false,
    slots: &[],
    variadic: Some(Capability::Extent),
};

const WINDOW: Signature = Signature {
    parameters: true,
    slots: &[],
    variadic: Some(Capability::Extent),
};

const CONTAINMENT: Signature = Signature {
    parameters: false,
    slots: &[Capability::Extent, Capability::Extent],
    variadic: None,
};

const COMBINATION: Signature = Signature {
    parameters: true,
    slots: &[],
    variadic: Some(Capability::Score),
};

const SCORER: Signature = Signature {
    parameters: true,
    slots: &[Capability::Count],
    variadic: None,
};

const SMOOTHED_SCORER: Signature = Signature {
    parameters: true,
    slots: &[Capability::Count, Capability::Count],
    variadic: None,
};

/// Registry entry for one operator.
#[derive(Debug, Clone, Copy)]
pub struct NodeType {
    operator: &'static str,
    capability: Capability,
    signature: Signature,
    factory: Factory,
}

impl NodeType {
    const fn new(
        operator: &'static str,
        capability: Capability,
        signature: Signature,
        factory: Factory,
    ) -> Self {
        NodeType {
            operator,
            capability,
            signature,
            factory,
        }
    }

    pub fn operator(&self) -> &'static str {
        self.operator
    }

    /// Capability of the iterators this type builds.
    pub fn capability(&self) -> Capability {
        self.capability
    }

    pub fn signature(&self) -> &Signature {
        &self.signature
    }

    /// Check the node's parameters and child count against the signature.
    pub fn validate(&self, node: &Node) -> Result<()> {
        if !self.signature.parameters && !node.parameters().is_empty() {
            return Err(SkeinError::configuration(format!(
                "#{} takes no parameters, got {} at offset {}",
                self.operator,
                node.parameters(),
                node.position()
            )));
        }
        let count = node.children().len();
        if !self.signature.accepts_child_count(count) {
            let expected = match self.signature.variadic {
                Some(_) => format!("at least {}", self.signature.slots.len() + 1),
                None => self.signature.slots.len().to_string(),
            };
            return Err(SkeinError::configuration(format!(
                "#{} expects {expected} children, got {count} at offset {}",
                self.operator,
                node.position()
            )));
        }
        Ok(())
    }

    /// Validate `node` and its built children, then build the iterator.
    pub fn build(
        &self,
        context: &BuildContext<'_>,
        node: &Node,
        children: Vec<QueryIterator>,
    ) -> Result<QueryIterator> {
        self.validate(node)?;
        for (i, child) in children.iter().enumerate() {
            let required = self.signature.slot(i).unwrap_or(Capability::Indicator);
            if !child.capability().satisfies(required) {
                return Err(SkeinError::configuration(format!(
                    "child {i} of #{} must be a {required} iterator, got a {} iterator",
                    self.operator,
                    child.capability()
                )));
            }
        }
        let iterator = (self.factory)(context, node, children)?;
        debug_assert!(iterator.capability().satisfies(self.capability));
        Ok(iterator)
    }
}

lazy_static! {
    static ref REGISTRY: AHashMap<&'static str, NodeType> = {
        let types = [
            NodeType::new("extents", Capability::Extent, LEAF, build_extents),
            NodeType::new("counts", Capability::Count, LEAF, build_counts),
            NodeType::new("band", Capability::Indicator, BOOLEAN, build_band),
            NodeType::new("bor", Capability::Indicator, BOOLEAN, build_bor),
            NodeType::new("syn", Capability::Extent, EXTENT_UNION, build_synonym),
            NodeType::new("extentor", Capability::Extent, EXTENT_UNION, build_extentor),
            NodeType::new("od", Capability::Extent, WINDOW, build_ordered_window),
            NodeType::new("uw", Capability::Extent, WINDOW, build_unordered_window),
            NodeType::new("inside", Capability::Extent, CONTAINMENT, build_inside),
            NodeType::new("combine", Capability::Score, COMBINATION, build_combine),
            NodeType::new("feature", Capability::Score, SCORER, build_feature),
            NodeType::new("dirichlet", Capability::Score, SCORER, build_dirichlet),
            NodeType::new("bm25", Capability::Score, SCORER, build_bm25),
            NodeType::new("jm", Capability::Score, SCORER, build_jelinek_mercer),
            NodeType::new("linear", Capability::Score, SCORER, build_linear),
            NodeType::new("smoothlm", Capability::Score, SMOOTHED_SCORER, build_smoothlm),
        ];
        types.into_iter().map(|t| (t.operator, t)).collect()
    };
}

/// The node type registered for `operator`.
pub fn lookup(operator: &str) -> Result<&'static NodeType> {
    if let Some(node_type) = REGISTRY.get(operator) {
        return Ok(node_type);
    }
    match operator {
        "text" | "field" => Err(SkeinError::configuration(format!(
            "#{operator} has no index part assigned"
        ))),
        _ => Err(SkeinError::configuration(format!(
            "unknown operator #{operator}"
        ))),
    }
}

/// Capability a node will build into, if its operator is registered.
pub fn node_capability(node: &Node) -> Option<Capability> {
    REGISTRY.get(node.operator()).map(|t| t.capability)
}

/// Registered operator names, sorted.
pub fn operators() -> Vec<&'static str> {
    let mut names: Vec<&'static str> = REGISTRY.keys().copied().collect();
    names.sort_unstable();
    names
}

fn extents_of(children: Vec<QueryIterator>) -> Result<Vec<Box<dyn ExtentIterator>>> {
    children.into_iter().map(QueryIterator::into_extents).collect()
}

fn counts_of(children: Vec<QueryIterator>) -> Result<Vec<Box<dyn CountIterator>>> {
    children.into_iter().map(QueryIterator::into_counts).collect()
}

/// `(part, term)` of a leaf node.
fn leaf_source(node: &Node) -> Result<(String, String)> {
    let part = node.parameters().get_str("part").ok_or_else(|| {
        SkeinError::configuration(format!("#{} requires a part parameter", node.operator()))
    })?;
    let term = node.default_parameter().ok_or_else(|| {
        SkeinError::configuration(format!("#{} requires a term", node.operator()))
    })?;
    Ok((part.to_string(), term))
}

fn build_extents(
    context: &BuildContext<'_>,
    node: &Node,
    _children: Vec<QueryIterator>,
) -> Result<QueryIterator> {
    let (part, term) = leaf_source(node)?;
    let info = context
        .index()
        .part_info(&part)
        .ok_or_else(|| SkeinError::index(format!("no such index part: {part}")))?;
    if !info.has_positions {
        return Err(SkeinError::configuration(format!(
            "part {part} has no positions, use #counts for '{term}'"
        )));
    }
    Ok(match context.index().cursor(&part, &term)? {
        Some(cursor) => QueryIterator::Extents(Box::new(TermExtentIterator::new(term, cursor))),
        None => {
            warn!("term '{term}' not found in part {part}");
            QueryIterator::Extents(Box::new(NullExtentIterator::new()))
        }
    })
}

fn build_counts(
    context: &BuildContext<'_>,
    node: &Node,
    _children: Vec<QueryIterator>,
) -> Result<QueryIterator> {
    let (part, term) = leaf_source(node)?;
    Ok(match context.index().cursor(&part, &term)? {
        Some(cursor) => QueryIterator::Counts(Box::new(TermCountIterator::new(term, cursor))),
        None => {
            warn!("term '{term}' not found in part {part}");
            QueryIterator::Counts(Box::new(NullExtentIterator::new()))
        }
    })
}

fn build_band(
    _context: &BuildContext<'_>,
    _node: &Node,
    children: Vec<QueryIterator>,
) -> Result<QueryIterator> {
    let children: Vec<Box<dyn StructuredIterator>> =
        children.into_iter().map(QueryIterator::into_structured).collect();
    Ok(QueryIterator::Indicator(Box::new(ConjunctionIterator::new(
        children,
    )?)))
}

fn build_bor(
    _context: &BuildContext<'_>,
    _node: &Node,
    children: Vec<QueryIterator>,
) -> Result<QueryIterator> {
    let children: Vec<Box<dyn StructuredIterator>> =
        children.into_iter().map(QueryIterator::into_structured).collect();
    Ok(QueryIterator::Indicator(Box::new(DisjunctionIterator::new(
        children,
    )?)))
}

fn build_synonym(
    _context: &BuildContext<'_>,
    _node: &Node,
    children: Vec<QueryIterator>,
) -> Result<QueryIterator> {
    let iterator = SynonymIterator::new(extents_of(children)?)?;
    Ok(QueryIterator::Extents(Box::new(iterator)))
}

fn build_extentor(
    _context: &BuildContext<'_>,
    _node: &Node,
    children: Vec<QueryIterator>,
) -> Result<QueryIterator> {
    let iterator = ExtentDisjunctionIterator::new(extents_of(children)?)?;
    Ok(QueryIterator::Extents(Box::new(iterator)))
}

/// The window width parameter; must be positive.
fn window_width(node: &Node, default: u64) -> Result<u32> {
    let width = match node.parameters().get(DEFAULT_PARAMETER) {
        None => default,
        Some(_) => node.parameters().get_u64(DEFAULT_PARAMETER).ok_or_else(|| {
            SkeinError::configuration(format!(
                "#{} width must be a positive integer, got {}",
                node.operator(),
                node.parameters()
            ))
        })?,
    };
    if width == 0 {
        return Err(SkeinError::configuration(format!(
            "#{} width must be positive",
            node.operator()
        )));
    }
    Ok(u32::try_from(width).unwrap_or(u32::MAX))
}

fn build_ordered_window(
    _context: &BuildContext<'_>,
    node: &Node,
    children: Vec<QueryIterator>,
) -> Result<QueryIterator> {
    let width = window_width(node, 1)?;
    let iterator = OrderedWindowIterator::new(extents_of(children)?, OrderedWindow { width })?;
    Ok(QueryIterator::Extents(Box::new(iterator)))
}

fn build_unordered_window(
    _context: &BuildContext<'_>,
    node: &Node,
    children: Vec<QueryIterator>,
) -> Result<QueryIterator> {
    let width = window_width(node, 4 * children.len() as u64)?;
    let iterator = UnorderedWindowIterator::new(extents_of(children)?, UnorderedWindow { width })?;
    Ok(QueryIterator::Extents(Box::new(iterator)))
}

fn build_inside(
    _context: &BuildContext<'_>,
    _node: &Node,
    children: Vec<QueryIterator>,
) -> Result<QueryIterator> {
    let iterator = ExtentInsideIterator::new(extents_of(children)?, Inside)?;
    Ok(QueryIterator::Extents(Box::new(iterator)))
}

fn build_combine(
    _context: &BuildContext<'_>,
    node: &Node,
    children: Vec<QueryIterator>,
) -> Result<QueryIterator> {
    let parameters = node.parameters();
    let mut weights: Vec<f64> = (0..children.len())
        .map(|i| parameters.get_f64_or(&i.to_string(), 1.0))
        .collect();
    let total: f64 = weights.iter().sum();
    if parameters.get_bool_or("norm", true) && total != 0.0 {
        for weight in weights.iter_mut() {
            *weight /= total;
        }
    }
    let children: Vec<Box<dyn ScoreIterator>> = children
        .into_iter()
        .map(QueryIterator::into_scores)
        .collect::<Result<_>>()?;
    Ok(QueryIterator::Scores(Box::new(ScoreCombinationIterator::new(
        children, weights,
    )?)))
}

fn scored(
    context: &BuildContext<'_>,
    node: &Node,
    children: Vec<QueryIterator>,
    scorer: &str,
) -> Result<QueryIterator> {
    let mut children = counts_of(children)?;
    let mut counts = children.remove(0);
    let parameters = context.scorer_parameters(node);
    let function = match children.pop() {
        // A second child supplies the background statistics.
        Some(mut background) => {
            create_scoring_function(scorer, &parameters, Some(background.as_mut()))?
        }
        None => create_scoring_function(scorer, &parameters, Some(counts.as_mut()))?,
    };
    Ok(QueryIterator::Scores(Box::new(ScoringFunctionIterator::new(
        counts, function,
    ))))
}

fn build_feature(
    context: &BuildContext<'_>,
    node: &Node,
    children: Vec<QueryIterator>,
) -> Result<QueryIterator> {
    let scorer = node
        .default_parameter()
        .unwrap_or_else(|| context.default_scorer().to_string());
    scored(context, node, children, &scorer)
}

fn build_dirichlet(
    context: &BuildContext<'_>,
    node: &Node,
    children: Vec<QueryIterator>,
) -> Result<QueryIterator> {
    scored(context, node, children, "dirichlet")
}

fn build_bm25(
    context: &BuildContext<'_>,
    node: &Node,
    children: Vec<QueryIterator>,
) -> Result<QueryIterator> {
    scored(context, node, children, "bm25")
}

fn build_jelinek_mercer(
    context: &BuildContext<'_>,
    node: &Node,
    children: Vec<QueryIterator>,
) -> Result<QueryIterator> {
    scored(context, node, children, "jm")
}

fn build_linear(
    context: &BuildContext<'_>,
    node: &Node,
    children: Vec<QueryIterator>,
) -> Result<QueryIterator> {
    scored(context, node, children, "linear")
}

fn build_smoothlm(
    context: &BuildContext<'_>,
    node: &Node,
    children: Vec<QueryIterator>,
) -> Result<QueryIterator> {
    let scorer = node
        .default_parameter()
        .unwrap_or_else(|| "dirichlet".to_string());
    scored(context, node, children, &scorer)
}
