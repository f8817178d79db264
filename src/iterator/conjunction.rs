//! AND over child iterators.

use std::fmt::Debug;

use log::trace;

use crate::error::{Result, SkeinError};
use crate::extent::{DocId, ExtentArray};
use crate::iterator::movement::move_all_to_same_document;
use crate::iterator::{CountIterator, ExtentIterator, StructuredIterator};

/// Visits the documents every child contains.
#[derive(Debug)]
pub struct ConjunctionIterator<I> {
    iterators: Vec<I>,
    document: Option<DocId>,
}

impl<I: StructuredIterator> ConjunctionIterator<I> {
    /// Create a conjunction and synchronize it onto the first common document.
    pub fn new(mut iterators: Vec<I>) -> Result<Self> {
        if iterators.is_empty() {
            return Err(SkeinError::configuration(
                "a conjunction requires at least one child",
            ));
        }
        let document = move_all_to_same_document(&mut iterators)?;
        Ok(ConjunctionIterator {
            iterators,
            document,
        })
    }

    /// The children, all sitting on `document()` unless exhausted.
    pub fn iterators(&self) -> &[I] {
        &self.iterators
    }

    fn synchronize(&mut self) -> Result<()> {
        self.document = move_all_to_same_document(&mut self.iterators)?;
        trace!("conjunction synchronized on {:?}", self.document);
        Ok(())
    }
}

impl<I: StructuredIterator> StructuredIterator for ConjunctionIterator<I> {
    fn document(&self) -> Option<DocId> {
        self.document
    }

    fn next_document(&mut self) -> Result<()> {
        if self.document.is_none() {
            return Ok(());
        }
        self.iterators[0].next_document()?;
        self.synchronize()
    }

    fn skip_to_document(&mut self, target: DocId) -> Result<bool> {
        match self.document {
            None => return Ok(false),
            Some(document) if document >= target => return Ok(document == target),
            Some(_) => {}
        }
        for iterator in self.iterators.iter_mut() {
            iterator.skip_to_document(target)?;
        }
        self.synchronize()?;
        Ok(self.document == Some(target))
    }

    fn reset(&mut self) -> Result<()> {
        for iterator in self.iterators.iter_mut() {
            iterator.reset()?;
        }
        self.synchronize()
    }
}

/// Positional relation evaluated over the aligned children of an
/// [`ExtentConjunctionIterator`].
pub trait ExtentMatcher: Send + Debug {
    /// Extents produced at `document` from the children's arrays, in child order.
    fn match_extents(&self, document: DocId, arrays: &[&ExtentArray]) -> ExtentArray;
}

/// A conjunction over extent children that only stops on documents where
/// its matcher produces at least one extent.
#[derive(Debug)]
pub struct ExtentConjunctionIterator<M> {
    conjunction: ConjunctionIterator<Box<dyn ExtentIterator>>,
    matcher: M,
    extents: ExtentArray,
}

impl<M: ExtentMatcher> ExtentConjunctionIterator<M> {
    pub fn new(iterators: Vec<Box<dyn ExtentIterator>>, matcher: M) -> Result<Self> {
        let mut iterator = ExtentConjunctionIterator {
            conjunction: ConjunctionIterator::new(iterators)?,
            matcher,
            extents: ExtentArray::new(),
        };
        iterator.find_match()?;
        Ok(iterator)
    }

    fn find_match(&mut self) -> Result<()> {
        while let Some(document) = self.conjunction.document() {
            let arrays: Vec<&ExtentArray> = self
                .conjunction
                .iterators()
                .iter()
                .map(|it| it.extents())
                .collect();
            self.extents = self.matcher.match_extents(document, &arrays);
            if !self.extents.is_empty() {
                return Ok(());
            }
            self.conjunction.next_document()?;
        }
        self.extents.clear();
        Ok(())
    }
}

impl<M: ExtentMatcher> StructuredIterator for ExtentConjunctionIterator<M> {
    fn document(&self) -> Option<DocId> {
        self.conjunction.document()
    }

    fn next_document(&mut self) -> Result<()> {
        if self.conjunction.is_done() {
            return Ok(());
        }
        self.conjunction.next_document()?;
        self.find_match()
    }

    fn skip_to_document(&mut self, target: DocId) -> Result<bool> {
        match self.conjunction.document() {
            None => return Ok(false),
            Some(document) if document >= target => return Ok(document == target),
            Some(_) => {}
        }
        self.conjunction.skip_to_document(target)?;
        self.find_match()?;
        Ok(self.document() == Some(target))
    }

    fn reset(&mut self) -> Result<()> {
        self.conjunction.reset()?;
        self.find_match()
    }
}

impl<M: ExtentMatcher> CountIterator for ExtentConjunctionIterator<M> {
    fn count(&self) -> u32 {
        self.extents.len() as u32
    }
}

impl<M: ExtentMatcher> ExtentIterator for ExtentConjunctionIterator<M> {
    fn extents(&self) -> &ExtentArray {
        &self.extents
    }
}
