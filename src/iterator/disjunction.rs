//! OR over child iterators.

use crate::error::{Result, SkeinError};
use crate::extent::DocId;
use crate::iterator::movement::find_minimum_document;
use crate::iterator::{CountIterator, StructuredIterator};

/// Visits every document any child contains.
///
/// Exhaustion of one child does not halt the others.
#[derive(Debug)]
pub struct DisjunctionIterator<I> {
    iterators: Vec<I>,
    document: Option<DocId>,
}

impl<I: StructuredIterator> DisjunctionIterator<I> {
    pub fn new(iterators: Vec<I>) -> Result<Self> {
        if iterators.is_empty() {
            return Err(SkeinError::configuration(
                "a disjunction requires at least one child",
            ));
        }
        let document = find_minimum_document(&iterators);
        Ok(DisjunctionIterator {
            iterators,
            document,
        })
    }

    pub fn iterators(&self) -> &[I] {
        &self.iterators
    }

    /// Children currently sitting on `document()`.
    pub fn matching(&self) -> impl Iterator<Item = &I> {
        let document = self.document;
        self.iterators
            .iter()
            .filter(move |it| document.is_some() && it.document() == document)
    }

    fn update(&mut self) {
        self.document = find_minimum_document(&self.iterators);
    }
}

impl<I: StructuredIterator> StructuredIterator for DisjunctionIterator<I> {
    fn document(&self) -> Option<DocId> {
        self.document
    }

    fn next_document(&mut self) -> Result<()> {
        let Some(current) = self.document else {
            return Ok(());
        };
        for iterator in self.iterators.iter_mut() {
            if iterator.document() == Some(current) {
                iterator.next_document()?;
            }
        }
        self.update();
        Ok(())
    }

    fn skip_to_document(&mut self, target: DocId) -> Result<bool> {
        match self.document {
            None => return Ok(false),
            Some(document) if document >= target => return Ok(document == target),
            Some(_) => {}
        }
        for iterator in self.iterators.iter_mut() {
            if iterator.document().is_some_and(|d| d < target) {
                iterator.skip_to_document(target)?;
            }
        }
        self.update();
        Ok(self.document == Some(target))
    }

    fn reset(&mut self) -> Result<()> {
        for iterator in self.iterators.iter_mut() {
            iterator.reset()?;
        }
        self.update();
        Ok(())
    }
}

impl<I: CountIterator> CountIterator for DisjunctionIterator<I> {
    /// Sum of the counts of children on the current document.
    fn count(&self) -> u32 {
        self.matching().map(|it| it.count()).sum()
    }
}
