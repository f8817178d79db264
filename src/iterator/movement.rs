//! Multi-iterator synchronization.
//!
//! "No candidate" is represented as `None`: once any participant of a
//! conjunctive group is exhausted no further common document can exist.
//! Every algorithm here only ever skips an iterator *up to* a target, never
//! past it, so one synchronization scans each posting at most once.

use crate::error::Result;
use crate::extent::DocId;
use crate::iterator::StructuredIterator;

/// The largest current document, or `None` if any iterator is exhausted.
pub fn find_maximum_document<T: StructuredIterator>(iterators: &[T]) -> Option<DocId> {
    let mut maximum: Option<DocId> = None;
    for iterator in iterators {
        let document = iterator.document()?;
        maximum = Some(maximum.map_or(document, |m| m.max(document)));
    }
    maximum
}

/// The smallest current document among non-exhausted iterators.
pub fn find_minimum_document<T: StructuredIterator>(iterators: &[T]) -> Option<DocId> {
    iterators.iter().filter_map(|it| it.document()).min()
}

/// Whether every iterator sits on the same document. Callers check
/// exhaustion separately.
pub fn all_same_document<T: StructuredIterator>(iterators: &[T]) -> bool {
    let mut documents = iterators.iter().map(|it| it.document());
    match documents.next() {
        Some(first) => documents.all(|d| d == first),
        None => true,
    }
}

/// Step `iterator` forward with `next_document` until it reaches `target`
/// or runs out. Returns true iff it sits exactly on `target`.
pub fn skip_to_document<T: StructuredIterator + ?Sized>(
    iterator: &mut T,
    target: DocId,
) -> Result<bool> {
    while let Some(document) = iterator.document() {
        if document >= target {
            return Ok(document == target);
        }
        iterator.next_document()?;
    }
    Ok(false)
}

/// Leapfrog every iterator onto a common document.
///
/// Returns that document, or `None` when some iterator is exhausted before
/// agreement is reached.
pub fn move_all_to_same_document<T: StructuredIterator>(
    iterators: &mut [T],
) -> Result<Option<DocId>> {
    loop {
        let Some(target) = find_maximum_document(iterators) else {
            return Ok(None);
        };
        if all_same_document(iterators) {
            return Ok(Some(target));
        }
        for iterator in iterators.iter_mut() {
            iterator.skip_to_document(target)?;
        }
    }
}
