//! Leaf iterators backed by index cursors.

use crate::error::Result;
use crate::extent::{DocId, ExtentArray};
use crate::index::PostingCursor;
use crate::iterator::{CountIterator, ExtentIterator, StructuredIterator};

/// Positional postings of one term.
#[derive(Debug)]
pub struct TermExtentIterator {
    term: String,
    cursor: Box<dyn PostingCursor>,
    extents: ExtentArray,
}

impl TermExtentIterator {
    pub fn new(term: impl Into<String>, cursor: Box<dyn PostingCursor>) -> Self {
        let extents = cursor.extents();
        TermExtentIterator {
            term: term.into(),
            cursor,
            extents,
        }
    }

    pub fn term(&self) -> &str {
        &self.term
    }

    fn load_extents(&mut self) {
        self.extents = self.cursor.extents();
    }
}

impl StructuredIterator for TermExtentIterator {
    fn document(&self) -> Option<DocId> {
        self.cursor.document()
    }

    fn next_document(&mut self) -> Result<()> {
        self.cursor.next()?;
        self.load_extents();
        Ok(())
    }

    fn skip_to_document(&mut self, target: DocId) -> Result<bool> {
        match self.cursor.document() {
            Some(document) if document >= target => Ok(document == target),
            Some(_) => {
                self.cursor.skip_to(target)?;
                self.load_extents();
                Ok(self.cursor.document() == Some(target))
            }
            None => Ok(false),
        }
    }

    fn reset(&mut self) -> Result<()> {
        self.cursor.reset()?;
        self.load_extents();
        Ok(())
    }
}

impl CountIterator for TermExtentIterator {
    fn count(&self) -> u32 {
        self.extents.len() as u32
    }
}

impl ExtentIterator for TermExtentIterator {
    fn extents(&self) -> &ExtentArray {
        &self.extents
    }
}

/// Count-only postings of one term.
#[derive(Debug)]
pub struct TermCountIterator {
    term: String,
    cursor: Box<dyn PostingCursor>,
}

impl TermCountIterator {
    pub fn new(term: impl Into<String>, cursor: Box<dyn PostingCursor>) -> Self {
        TermCountIterator {
            term: term.into(),
            cursor,
        }
    }

    pub fn term(&self) -> &str {
        &self.term
    }
}

impl StructuredIterator for TermCountIterator {
    fn document(&self) -> Option<DocId> {
        self.cursor.document()
    }

    fn next_document(&mut self) -> Result<()> {
        self.cursor.next()?;
        Ok(())
    }

    fn skip_to_document(&mut self, target: DocId) -> Result<bool> {
        match self.cursor.document() {
            Some(document) if document >= target => Ok(document == target),
            Some(_) => {
                self.cursor.skip_to(target)?;
                Ok(self.cursor.document() == Some(target))
            }
            None => Ok(false),
        }
    }

    fn reset(&mut self) -> Result<()> {
        self.cursor.reset()
    }
}

impl CountIterator for TermCountIterator {
    fn count(&self) -> u32 {
        if self.cursor.document().is_some() {
            self.cursor.count()
        } else {
            0
        }
    }
}
