//! Query trees: parsing, rewriting and stemming.

pub mod node;
pub mod parser;
pub mod stemmer;
pub mod traversal;

pub use self::node::{DEFAULT_PARAMETER, Node, TEXT_OPERATOR};
pub use self::parser::parse_query;
pub use self::stemmer::{PorterStemmer, Stemmer};
pub use self::traversal::{
    CompatibilityTraversal, PartAssignmentTraversal, ScoringCastTraversal, Traversal, traverse,
};
pub use crate::retrieval::registry::{NodeType, Signature};
