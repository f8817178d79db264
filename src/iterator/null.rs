//! Iterator for terms absent from an index part.

use crate::error::Result;
use crate::extent::{DocId, ExtentArray};
use crate::iterator::{CountIterator, ExtentIterator, StructuredIterator};

/// Matches nothing.
#[derive(Debug, Default)]
pub struct NullExtentIterator {
    extents: ExtentArray,
}

impl NullExtentIterator {
    pub fn new() -> Self {
        Self::default()
    }
}

impl StructuredIterator for NullExtentIterator {
    fn document(&self) -> Option<DocId> {
        None
    }

    fn next_document(&mut self) -> Result<()> {
        Ok(())
    }

    fn skip_to_document(&mut self, _target: DocId) -> Result<bool> {
        Ok(false)
    }

    fn reset(&mut self) -> Result<()> {
        Ok(())
    }
}

impl CountIterator for NullExtentIterator {
    fn count(&self) -> u32 {
        0
    }
}

impl ExtentIterator for NullExtentIterator {
    fn extents(&self) -> &ExtentArray {
        &self.extents
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_null_iterator() {
        let mut iterator = NullExtentIterator::new();

        assert!(iterator.is_done());
        assert_eq!(iterator.count(), 0);
        assert!(iterator.extents().is_empty());
        assert!(!iterator.skip_to_document(5).unwrap());
    }
}
