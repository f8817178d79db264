//! Ordered and unordered proximity windows.

use crate::extent::{DocId, ExtentArray};
use crate::iterator::conjunction::{ExtentConjunctionIterator, ExtentMatcher};

/// Children occur in order, each beginning fewer than `width` positions
/// after the previous one ends. A width of 1 is an exact phrase.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct OrderedWindow {
    pub width: u32,
}

impl ExtentMatcher for OrderedWindow {
    fn match_extents(&self, document: DocId, arrays: &[&ExtentArray]) -> ExtentArray {
        let mut result = ExtentArray::for_document(document);
        let Some(first) = arrays.first() else {
            return result;
        };
        let mut indexes = vec![0usize; arrays.len()];

        'outer: for start in 0..first.len() {
            indexes[0] = start;
            let mut matched = true;
            for i in 1..arrays.len() {
                let end = arrays[i - 1].end(indexes[i - 1]);
                // Lowest begin at or past the previous end; indexes only move forward.
                while indexes[i] < arrays[i].len() && arrays[i].begin(indexes[i]) < end {
                    indexes[i] += 1;
                }
                if indexes[i] == arrays[i].len() {
                    break 'outer;
                }
                // begin >= end here, so the gap cannot underflow.
                if arrays[i].begin(indexes[i]) - end >= self.width {
                    matched = false;
                    break;
                }
            }
            if matched {
                let last = arrays.len() - 1;
                result.add(first.begin(start), arrays[last].end(indexes[last]));
            }
        }
        result
    }
}

/// One extent of every child within a span of at most `width` positions.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct UnorderedWindow {
    pub width: u32,
}

impl ExtentMatcher for UnorderedWindow {
    fn match_extents(&self, document: DocId, arrays: &[&ExtentArray]) -> ExtentArray {
        let mut result = ExtentArray::for_document(document);
        if arrays.is_empty() || arrays.iter().any(|a| a.is_empty()) {
            return result;
        }
        let mut indexes = vec![0usize; arrays.len()];

        loop {
            let mut minimum_begin = u32::MAX;
            let mut minimum_child = 0;
            let mut maximum_end = 0;
            for (i, array) in arrays.iter().enumerate() {
                let begin = array.begin(indexes[i]);
                if begin < minimum_begin {
                    minimum_begin = begin;
                    minimum_child = i;
                }
                maximum_end = maximum_end.max(array.end(indexes[i]));
            }

            if maximum_end - minimum_begin <= self.width {
                result.add(minimum_begin, maximum_end);
            }

            indexes[minimum_child] += 1;
            if indexes[minimum_child] == arrays[minimum_child].len() {
                return result;
            }
        }
    }
}

/// `#od:N` over extent children.
pub type OrderedWindowIterator = ExtentConjunctionIterator<OrderedWindow>;

/// `#uw:N` over extent children.
pub type UnorderedWindowIterator = ExtentConjunctionIterator<UnorderedWindow>;
