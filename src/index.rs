//! The index-part collaborator.
//!
//! Posting encoding and index construction live outside this crate. The
//! retrieval core only needs to open a cursor over one term of one named
//! part and read collection-level statistics. [`memory::MemoryIndex`] is an
//! in-memory implementation used by the CLI and the tests.

pub mod memory;

use std::fmt::Debug;

use serde::{Deserialize, Serialize};

use crate::error::Result;
use crate::extent::{DocId, ExtentArray};

/// Part holding per-term positional postings.
pub const POSTINGS_PART: &str = "postings";
/// Part holding postings of stemmed terms.
pub const STEMMED_POSTINGS_PART: &str = "stemmedPostings";
/// Part holding field extents, keyed by field name.
pub const EXTENTS_PART: &str = "extents";

/// Cursor over one term's postings.
///
/// A fresh cursor sits on its first posting. Once the postings run out
/// `document()` returns `None`.
pub trait PostingCursor: Send + Debug {
    /// The current document, or `None` when exhausted.
    fn document(&self) -> Option<DocId>;

    /// Occurrences in the current document.
    fn count(&self) -> u32;

    /// Occurrence spans in the current document.
    fn extents(&self) -> ExtentArray;

    /// Move to the next posting. Returns false once exhausted.
    fn next(&mut self) -> Result<bool>;

    /// Move to the first posting with document >= target.
    fn skip_to(&mut self, target: DocId) -> Result<bool>;

    /// Rewind to the first posting.
    fn reset(&mut self) -> Result<()>;

    /// Number of postings in the list.
    fn cost(&self) -> u64;
}

/// Description of one index part.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PartInfo {
    /// Part name, e.g. `postings`.
    pub name: String,
    /// Whether the part stores occurrence positions.
    pub has_positions: bool,
    /// Number of distinct terms.
    pub term_count: u64,
}

/// Read-only access to a set of named index parts.
///
/// Implementations must hand out independent cursors so that several
/// queries can read concurrently.
pub trait StructuredIndex: Send + Sync + Debug {
    /// Every part this index offers.
    fn parts(&self) -> Vec<PartInfo>;

    /// Open a cursor for `term` in `part`. `Ok(None)` when the term is absent;
    /// an error when the part does not exist.
    fn cursor(&self, part: &str, term: &str) -> Result<Option<Box<dyn PostingCursor>>>;

    /// Total number of term occurrences in the collection.
    fn collection_length(&self) -> u64;

    /// Number of documents in the collection.
    fn document_count(&self) -> u64;

    /// Length of one document in positions.
    fn document_length(&self, document: DocId) -> Result<u32>;

    /// Names of the available parts.
    fn part_names(&self) -> Vec<String> {
        self.parts().into_iter().map(|p| p.name).collect()
    }

    /// Whether a part with this name exists.
    fn has_part(&self, part: &str) -> bool {
        self.parts().iter().any(|p| p.name == part)
    }

    /// Description of one part.
    fn part_info(&self, part: &str) -> Option<PartInfo> {
        self.parts().into_iter().find(|p| p.name == part)
    }

    /// Number of documents containing `term` in `part`.
    fn document_frequency(&self, part: &str, term: &str) -> Result<u64> {
        Ok(self.cursor(part, term)?.map(|c| c.cost()).unwrap_or(0))
    }

    /// Total occurrences of `term` in `part`.
    fn collection_frequency(&self, part: &str, term: &str) -> Result<u64> {
        let Some(mut cursor) = self.cursor(part, term)? else {
            return Ok(0);
        };
        let mut total = 0u64;
        while cursor.document().is_some() {
            total += cursor.count() as u64;
            cursor.next()?;
        }
        Ok(total)
    }
}
