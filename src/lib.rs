//! # Skein
//!
//! Structured query evaluation over inverted indexes.
//!
//! ## Features
//!
//! - A query language of nested operators: `#combine(#od:1(white house) cat)`
//! - Iterator graphs with indicator, count, extent and score capabilities
//! - Ordered and unordered windows, field containment and synonyms
//! - Dirichlet, Jelinek-Mercer and BM25 scoring
//! - Top-K and boolean retrieval, batched or on a tokio runtime

pub mod cli;
pub mod config;
pub mod error;
pub mod extent;
pub mod index;
pub mod iterator;
pub mod parameters;
pub mod query;
pub mod retrieval;
pub mod scoring;

pub mod prelude {
    pub use crate::config::RetrievalConfig;
    pub use crate::error::{Result, SkeinError};
    pub use crate::extent::{DocId, Extent, ExtentArray};
    pub use crate::index::StructuredIndex;
    pub use crate::index::memory::MemoryIndex;
    pub use crate::parameters::Parameters;
    pub use crate::query::node::Node;
    pub use crate::query::parser::parse_query;
    pub use crate::retrieval::{LocalRetrieval, QueryMode, ScoredDocument};
}

// Version information
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
