//! Extent-level OR: one merged span stream per document.

use std::cmp::Reverse;
use std::collections::BinaryHeap;

use crate::error::Result;
use crate::extent::{DocId, ExtentArray};
use crate::iterator::disjunction::DisjunctionIterator;
use crate::iterator::{CountIterator, ExtentIterator, StructuredIterator};

/// K-way merge of extent arrays by begin position.
///
/// Extents with equal begins keep the order of the arrays they came from.
pub fn merge_extent_arrays(document: DocId, arrays: &[&ExtentArray]) -> ExtentArray {
    // (begin, array, offset)
    let mut heap: BinaryHeap<Reverse<(u32, usize, usize)>> = arrays
        .iter()
        .enumerate()
        .filter(|(_, array)| !array.is_empty())
        .map(|(i, array)| Reverse((array.begin(0), i, 0)))
        .collect();

    let mut merged = ExtentArray::for_document(document);
    while let Some(Reverse((_, i, offset))) = heap.pop() {
        if let Some(extent) = arrays[i].get(offset) {
            merged.push(*extent);
        }
        let next = offset + 1;
        if next < arrays[i].len() {
            heap.push(Reverse((arrays[i].begin(next), i, next)));
        }
    }
    merged
}

/// Offers, at each document, the union of its children's extents.
///
/// Children not on the current document are left where they are and are
/// picked up again once the disjunction reaches their document.
#[derive(Debug)]
pub struct ExtentDisjunctionIterator {
    disjunction: DisjunctionIterator<Box<dyn ExtentIterator>>,
    extents: ExtentArray,
}

impl ExtentDisjunctionIterator {
    pub fn new(iterators: Vec<Box<dyn ExtentIterator>>) -> Result<Self> {
        let mut iterator = ExtentDisjunctionIterator {
            disjunction: DisjunctionIterator::new(iterators)?,
            extents: ExtentArray::new(),
        };
        iterator.load_extents();
        Ok(iterator)
    }

    fn load_extents(&mut self) {
        self.extents = match self.disjunction.document() {
            Some(document) => {
                let arrays: Vec<&ExtentArray> =
                    self.disjunction.matching().map(|it| it.extents()).collect();
                merge_extent_arrays(document, &arrays)
            }
            None => ExtentArray::new(),
        };
    }
}

impl StructuredIterator for ExtentDisjunctionIterator {
    fn document(&self) -> Option<DocId> {
        self.disjunction.document()
    }

    fn next_document(&mut self) -> Result<()> {
        self.disjunction.next_document()?;
        self.load_extents();
        Ok(())
    }

    fn skip_to_document(&mut self, target: DocId) -> Result<bool> {
        let found = self.disjunction.skip_to_document(target)?;
        self.load_extents();
        Ok(found)
    }

    fn reset(&mut self) -> Result<()> {
        self.disjunction.reset()?;
        self.load_extents();
        Ok(())
    }
}

impl CountIterator for ExtentDisjunctionIterator {
    fn count(&self) -> u32 {
        self.extents.len() as u32
    }
}

impl ExtentIterator for ExtentDisjunctionIterator {
    fn extents(&self) -> &ExtentArray {
        &self.extents
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::extent::Extent;
    use crate::iterator::testing;

    #[test]
    fn test_merge_orders_by_begin() {
        let a = ExtentArray::from_positions(4, &[1, 6, 9]);
        let b = ExtentArray::from_positions(4, &[2, 6]);
        let empty = ExtentArray::new();

        let merged = merge_extent_arrays(4, &[&a, &empty, &b]);
        let begins: Vec<u32> = merged.iter().map(|e| e.begin).collect();
        assert_eq!(begins, vec![1, 2, 6, 6, 9]);
        assert_eq!(merged.document(), Some(4));
    }

    #[test]
    fn test_extent_disjunction_walks_union() {
        let mut iterator = ExtentDisjunctionIterator::new(vec![
            Box::new(testing::extents(vec![(2, vec![1]), (3, vec![4, 9])])),
            Box::new(testing::extents(vec![(3, vec![2]), (6, vec![0])])),
        ])
        .unwrap();

        assert_eq!(iterator.document(), Some(2));
        assert_eq!(iterator.count(), 1);

        iterator.next_document().unwrap();
        assert_eq!(iterator.document(), Some(3));
        assert_eq!(
            iterator.extents().as_slice(),
            &[
                Extent::new(3, 2, 3),
                Extent::new(3, 4, 5),
                Extent::new(3, 9, 10)
            ]
        );

        assert!(iterator.skip_to_document(6).unwrap());
        assert_eq!(iterator.count(), 1);
        iterator.next_document().unwrap();
        assert!(iterator.is_done());
        assert_eq!(iterator.count(), 0);
    }
}
