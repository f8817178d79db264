//! Score iterator over a count child.

use crate::error::Result;
use crate::extent::DocId;
use crate::iterator::{CountIterator, ScoreIterator, ScoringContext, StructuredIterator};
use crate::scoring::ScoringFunction;

/// Applies a [`ScoringFunction`] to the counts of its child.
#[derive(Debug)]
pub struct ScoringFunctionIterator {
    iterator: Box<dyn CountIterator>,
    function: Box<dyn ScoringFunction>,
}

impl ScoringFunctionIterator {
    pub fn new(iterator: Box<dyn CountIterator>, function: Box<dyn ScoringFunction>) -> Self {
        ScoringFunctionIterator { iterator, function }
    }

    pub fn function(&self) -> &dyn ScoringFunction {
        self.function.as_ref()
    }

    /// Score an arbitrary count without consulting the child.
    pub fn score_count(&self, count: u32, length: u32) -> f64 {
        self.function.score_count(count, length)
    }
}

impl StructuredIterator for ScoringFunctionIterator {
    fn document(&self) -> Option<DocId> {
        self.iterator.document()
    }

    fn next_document(&mut self) -> Result<()> {
        self.iterator.next_document()
    }

    fn skip_to_document(&mut self, target: DocId) -> Result<bool> {
        self.iterator.skip_to_document(target)
    }

    fn reset(&mut self) -> Result<()> {
        self.iterator.reset()
    }

    fn has_match(&self, document: DocId) -> bool {
        self.iterator.has_match(document)
    }
}

impl ScoreIterator for ScoringFunctionIterator {
    fn score(&self, context: &ScoringContext) -> f64 {
        let count = if self.iterator.has_match(context.document) {
            self.iterator.count()
        } else {
            0
        };
        self.function.score_count(count, context.length)
    }
}
