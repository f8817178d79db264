//! Position-list value types.
//!
//! An [`Extent`] is one occurrence span of a term or phrase inside a
//! document. An [`ExtentArray`] holds every extent an iterator currently
//! offers for a single document, ordered by begin position.

use std::cmp::Ordering;

use serde::{Deserialize, Serialize};

/// Document identifier.
pub type DocId = u64;

/// A single occurrence span `[begin, end)` of a term or phrase.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Extent {
    /// The document containing the span.
    pub document: DocId,
    /// First position covered.
    pub begin: u32,
    /// One past the last position covered.
    pub end: u32,
}

impl Extent {
    /// Create a new extent.
    pub fn new(document: DocId, begin: u32, end: u32) -> Self {
        Extent {
            document,
            begin,
            end,
        }
    }

    /// Create a single-position extent, as produced by a term occurrence.
    pub fn single(document: DocId, position: u32) -> Self {
        Extent::new(document, position, position + 1)
    }

    /// Width of the span in positions.
    pub fn width(&self) -> u32 {
        self.end.saturating_sub(self.begin)
    }

    /// Whether this extent lies completely within `outer`.
    pub fn contained_in(&self, outer: &Extent) -> bool {
        self.document == outer.document && outer.begin <= self.begin && self.end <= outer.end
    }
}

impl PartialOrd for Extent {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for Extent {
    fn cmp(&self, other: &Self) -> Ordering {
        self.document
            .cmp(&other.document)
            .then_with(|| self.begin.cmp(&other.begin))
            .then_with(|| self.end.cmp(&other.end))
    }
}

/// The ordered extents of one document.
///
/// An empty array is valid: an iterator may logically sit on a document
/// while offering no occurrences there (count 0).
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExtentArray {
    document: Option<DocId>,
    extents: Vec<Extent>,
}

impl ExtentArray {
    /// Create an empty array.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create an empty array bound to a document.
    pub fn for_document(document: DocId) -> Self {
        ExtentArray {
            document: Some(document),
            extents: Vec::new(),
        }
    }

    /// Build an array of single-position extents for `document`.
    pub fn from_positions(document: DocId, positions: &[u32]) -> Self {
        ExtentArray {
            document: Some(document),
            extents: positions
                .iter()
                .map(|&p| Extent::single(document, p))
                .collect(),
        }
    }

    /// The document these extents belong to, if bound.
    pub fn document(&self) -> Option<DocId> {
        self.document
    }

    /// Append an extent. Callers push in begin order.
    pub fn push(&mut self, extent: Extent) {
        debug_assert!(
            self.extents
                .last()
                .is_none_or(|last| last.begin <= extent.begin),
            "extents must be appended in begin order"
        );
        if self.document.is_none() {
            self.document = Some(extent.document);
        }
        self.extents.push(extent);
    }

    /// Append a span on the bound document.
    pub fn add(&mut self, begin: u32, end: u32) {
        let document = self.document.unwrap_or_default();
        self.push(Extent::new(document, begin, end));
    }

    /// Remove every extent and unbind the document.
    pub fn clear(&mut self) {
        self.document = None;
        self.extents.clear();
    }

    /// Number of extents.
    pub fn len(&self) -> usize {
        self.extents.len()
    }

    /// Whether there are no extents.
    pub fn is_empty(&self) -> bool {
        self.extents.is_empty()
    }

    /// Get the extent at `index`.
    pub fn get(&self, index: usize) -> Option<&Extent> {
        self.extents.get(index)
    }

    /// Begin position of the extent at `index`.
    pub fn begin(&self, index: usize) -> u32 {
        self.extents[index].begin
    }

    /// End position of the extent at `index`.
    pub fn end(&self, index: usize) -> u32 {
        self.extents[index].end
    }

    /// Borrow the extents as a slice.
    pub fn as_slice(&self) -> &[Extent] {
        &self.extents
    }

    /// Iterate over the extents.
    pub fn iter(&self) -> std::slice::Iter<'_, Extent> {
        self.extents.iter()
    }
}

impl<'a> IntoIterator for &'a ExtentArray {
    type Item = &'a Extent;
    type IntoIter = std::slice::Iter<'a, Extent>;

    fn into_iter(self) -> Self::IntoIter {
        self.extents.iter()
    }
}
