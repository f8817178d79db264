//! Structured iterators over posting streams.
//!
//! Every iterator walks documents in increasing order. Capabilities stack:
//! - [`StructuredIterator`]: document movement only (boolean presence)
//! - [`CountIterator`]: adds an occurrence count at the current document
//! - [`ExtentIterator`]: adds the occurrence spans at the current document
//! - [`ScoreIterator`]: produces a relevance score for a candidate document
//!
//! Iterators mutate cursor state as they move, so one graph must only be
//! driven from one call site at a time.

pub mod combination;
pub mod conjunction;
pub mod disjunction;
pub mod extent_disjunction;
pub mod inside;
pub mod movement;
pub mod null;
pub mod scoring;
pub mod synonym;
pub mod term;
pub mod window;

use std::fmt::{self, Debug};

use crate::error::{Result, SkeinError};
use crate::extent::{DocId, ExtentArray};

/// Movement over an ordered document stream.
pub trait StructuredIterator: Send + Debug {
    /// The current document, or `None` once exhausted.
    fn document(&self) -> Option<DocId>;

    /// Whether the iterator has no further documents.
    fn is_done(&self) -> bool {
        self.document().is_none()
    }

    /// Advance past the current document.
    fn next_document(&mut self) -> Result<()>;

    /// Advance to the first document >= `target`. Returns true iff the
    /// iterator now sits exactly on `target`.
    fn skip_to_document(&mut self, target: DocId) -> Result<bool> {
        movement::skip_to_document(self, target)
    }

    /// Rewind to the first document.
    fn reset(&mut self) -> Result<()>;

    /// Whether the iterator currently sits on `document`.
    fn has_match(&self, document: DocId) -> bool {
        self.document() == Some(document)
    }
}

/// An iterator that reports occurrence counts.
pub trait CountIterator: StructuredIterator {
    /// Occurrences at the current document; 0 when exhausted.
    fn count(&self) -> u32;
}

/// An iterator that reports occurrence spans.
pub trait ExtentIterator: CountIterator {
    /// Spans at the current document, ordered by begin position.
    fn extents(&self) -> &ExtentArray;
}

/// Per-candidate inputs for scoring.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ScoringContext {
    /// The candidate being scored.
    pub document: DocId,
    /// Its length in positions.
    pub length: u32,
}

/// An iterator that scores candidate documents.
pub trait ScoreIterator: StructuredIterator {
    /// Score `context.document`. Children not on that document contribute
    /// as if their count were zero.
    fn score(&self, context: &ScoringContext) -> f64;
}

impl<T: StructuredIterator + ?Sized> StructuredIterator for Box<T> {
    fn document(&self) -> Option<DocId> {
        (**self).document()
    }

    fn is_done(&self) -> bool {
        (**self).is_done()
    }

    fn next_document(&mut self) -> Result<()> {
        (**self).next_document()
    }

    fn skip_to_document(&mut self, target: DocId) -> Result<bool> {
        (**self).skip_to_document(target)
    }

    fn reset(&mut self) -> Result<()> {
        (**self).reset()
    }

    fn has_match(&self, document: DocId) -> bool {
        (**self).has_match(document)
    }
}

impl<T: CountIterator + ?Sized> CountIterator for Box<T> {
    fn count(&self) -> u32 {
        (**self).count()
    }
}

impl<T: ExtentIterator + ?Sized> ExtentIterator for Box<T> {
    fn extents(&self) -> &ExtentArray {
        (**self).extents()
    }
}

impl<T: ScoreIterator + ?Sized> ScoreIterator for Box<T> {
    fn score(&self, context: &ScoringContext) -> f64 {
        (**self).score(context)
    }
}

/// The capability an iterator offers, or a child slot requires.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Capability {
    /// Document presence only.
    Indicator,
    /// Occurrence counts.
    Count,
    /// Occurrence spans.
    Extent,
    /// Relevance scores.
    Score,
}

impl Capability {
    /// Whether an iterator with this capability can fill a slot requiring `required`.
    pub fn satisfies(self, required: Capability) -> bool {
        match required {
            Capability::Indicator => true,
            Capability::Count => matches!(self, Capability::Count | Capability::Extent),
            Capability::Extent => self == Capability::Extent,
            Capability::Score => self == Capability::Score,
        }
    }
}

impl fmt::Display for Capability {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Capability::Indicator => "indicator",
            Capability::Count => "count",
            Capability::Extent => "extent",
            Capability::Score => "score",
        };
        f.write_str(name)
    }
}

/// A built iterator tagged with its strongest capability.
#[derive(Debug)]
pub enum QueryIterator {
    Indicator(Box<dyn StructuredIterator>),
    Counts(Box<dyn CountIterator>),
    Extents(Box<dyn ExtentIterator>),
    Scores(Box<dyn ScoreIterator>),
}

impl QueryIterator {
    pub fn capability(&self) -> Capability {
        match self {
            QueryIterator::Indicator(_) => Capability::Indicator,
            QueryIterator::Counts(_) => Capability::Count,
            QueryIterator::Extents(_) => Capability::Extent,
            QueryIterator::Scores(_) => Capability::Score,
        }
    }

    /// View as a plain movement iterator.
    pub fn into_structured(self) -> Box<dyn StructuredIterator> {
        match self {
            QueryIterator::Indicator(it) => it,
            QueryIterator::Counts(it) => it,
            QueryIterator::Extents(it) => it,
            QueryIterator::Scores(it) => it,
        }
    }

    pub fn into_counts(self) -> Result<Box<dyn CountIterator>> {
        match self {
            QueryIterator::Counts(it) => Ok(it),
            QueryIterator::Extents(it) => Ok(it),
            other => Err(capability_mismatch(Capability::Count, other.capability())),
        }
    }

    pub fn into_extents(self) -> Result<Box<dyn ExtentIterator>> {
        match self {
            QueryIterator::Extents(it) => Ok(it),
            other => Err(capability_mismatch(Capability::Extent, other.capability())),
        }
    }

    pub fn into_scores(self) -> Result<Box<dyn ScoreIterator>> {
        match self {
            QueryIterator::Scores(it) => Ok(it),
            other => Err(capability_mismatch(Capability::Score, other.capability())),
        }
    }
}

fn capability_mismatch(required: Capability, found: Capability) -> SkeinError {
    SkeinError::configuration(format!(
        "expected a {required} iterator but found a {found} iterator"
    ))
}


#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_capability_satisfies() {
        assert!(Capability::Extent.satisfies(Capability::Count));
        assert!(Capability::Extent.satisfies(Capability::Indicator));
        assert!(Capability::Score.satisfies(Capability::Indicator));
        assert!(!Capability::Count.satisfies(Capability::Extent));
        assert!(!Capability::Score.satisfies(Capability::Count));
        assert!(!Capability::Indicator.satisfies(Capability::Count));
    }

    #[test]
    fn test_query_iterator_conversions() {
        let extents = QueryIterator::Extents(Box::new(null::NullExtentIterator::new()));
        assert_eq!(extents.capability(), Capability::Extent);
        assert!(extents.into_counts().unwrap().is_done());

        let counts = QueryIterator::Counts(Box::new(null::NullExtentIterator::new()));
        assert!(matches!(
            counts.into_extents(),
            Err(SkeinError::Configuration(_))
        ));
    }
}
