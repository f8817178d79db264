//! Synonym sets: term variants counted as one conceptual term.

use crate::error::Result;
use crate::extent::{DocId, ExtentArray};
use crate::iterator::extent_disjunction::ExtentDisjunctionIterator;
use crate::iterator::{CountIterator, ExtentIterator, StructuredIterator};

/// Treats every child occurrence as an occurrence of the same term.
#[derive(Debug)]
pub struct SynonymIterator {
    merged: ExtentDisjunctionIterator,
}

impl SynonymIterator {
    pub fn new(variants: Vec<Box<dyn ExtentIterator>>) -> Result<Self> {
        Ok(SynonymIterator {
            merged: ExtentDisjunctionIterator::new(variants)?,
        })
    }
}

impl StructuredIterator for SynonymIterator {
    fn document(&self) -> Option<DocId> {
        self.merged.document()
    }

    fn next_document(&mut self) -> Result<()> {
        self.merged.next_document()
    }

    fn skip_to_document(&mut self, target: DocId) -> Result<bool> {
        self.merged.skip_to_document(target)
    }

    fn reset(&mut self) -> Result<()> {
        self.merged.reset()
    }
}

impl CountIterator for SynonymIterator {
    fn count(&self) -> u32 {
        self.merged.count()
    }
}

impl ExtentIterator for SynonymIterator {
    fn extents(&self) -> &ExtentArray {
        self.merged.extents()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::extent::Extent;
    use crate::iterator::testing;

    #[test]
    fn test_synonym_merges_shared_document() {
        let mut iterator = SynonymIterator::new(vec![
            Box::new(testing::extents(vec![(2, vec![1]), (3, vec![1]), (5, vec![1])])),
            Box::new(testing::extents(vec![(3, vec![1]), (6, vec![1]), (7, vec![1])])),
        ])
        .unwrap();

        assert!(iterator.skip_to_document(3).unwrap());
        assert_eq!(iterator.count(), 2);
        assert_eq!(
            iterator.extents().as_slice(),
            &[Extent::new(3, 1, 2), Extent::new(3, 1, 2)]
        );

        let mut documents = vec![3];
        iterator.next_document().unwrap();
        while let Some(document) = iterator.document() {
            assert_eq!(iterator.count(), 1);
            documents.push(document);
            iterator.next_document().unwrap();
        }
        assert_eq!(documents, vec![3, 5, 6, 7]);
    }
}
