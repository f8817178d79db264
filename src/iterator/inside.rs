//! Containment of one extent stream in another, e.g. a term inside a field.

use crate::extent::{DocId, ExtentArray};
use crate::iterator::conjunction::{ExtentConjunctionIterator, ExtentMatcher};

/// Keeps the extents of the first child that lie within an extent of the second.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Inside;

impl ExtentMatcher for Inside {
    fn match_extents(&self, document: DocId, arrays: &[&ExtentArray]) -> ExtentArray {
        let mut result = ExtentArray::for_document(document);
        let [inner, outer] = arrays else {
            return result;
        };

        for extent in inner.iter() {
            // Outer extents are ordered by begin, so stop at the first one past this extent.
            let contained = outer
                .iter()
                .take_while(|candidate| candidate.begin <= extent.begin)
                .any(|candidate| extent.contained_in(candidate));
            if contained {
                result.push(*extent);
            }
        }
        result
    }
}

/// `#inside(inner outer)`.
pub type ExtentInsideIterator = ExtentConjunctionIterator<Inside>;

#[cfg(test)]
mod tests {
    use super::*;
    use crate::extent::Extent;
    use crate::iterator::{CountIterator, StructuredIterator, testing};

    #[test]
    fn test_inside_keeps_contained_extents() {
        let inner = ExtentArray::from_positions(1, &[0, 3, 7, 12]);
        let mut outer = ExtentArray::for_document(1);
        outer.add(2, 5);
        outer.add(6, 9);

        let matches = Inside.match_extents(1, &[&inner, &outer]);
        assert_eq!(
            matches.as_slice(),
            &[Extent::new(1, 3, 4), Extent::new(1, 7, 8)]
        );
    }

    #[test]
    fn test_inside_requires_two_children() {
        let inner = ExtentArray::from_positions(1, &[0]);
        assert!(Inside.match_extents(1, &[&inner]).is_empty());
    }

    #[test]
    fn test_inside_iterator() {
        let iterator = ExtentInsideIterator::new(
            vec![
                Box::new(testing::extents(vec![(1, vec![9]), (2, vec![1, 2])])),
                Box::new(testing::extents(vec![(1, vec![0]), (2, vec![2])])),
            ],
            Inside,
        )
        .unwrap();

        assert_eq!(iterator.document(), Some(2));
        assert_eq!(iterator.count(), 1);
    }
}
