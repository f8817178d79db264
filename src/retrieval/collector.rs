//! Result collection.

use std::cmp::{Ordering, Reverse};
use std::collections::BinaryHeap;
use std::fmt::Debug;

use serde::{Deserialize, Serialize};

use crate::extent::DocId;

/// A document and its score.
///
/// Ordered by score, then by document id, so that of two equally scored
/// documents the larger id ranks higher.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct ScoredDocument {
    pub document: DocId,
    pub score: f64,
}

impl ScoredDocument {
    pub fn new(document: DocId, score: f64) -> Self {
        ScoredDocument { document, score }
    }
}

impl PartialEq for ScoredDocument {
    fn eq(&self, other: &Self) -> bool {
        self.cmp(other) == Ordering::Equal
    }
}

impl Eq for ScoredDocument {}

impl PartialOrd for ScoredDocument {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for ScoredDocument {
    fn cmp(&self, other: &Self) -> Ordering {
        self.score
            .total_cmp(&other.score)
            .then_with(|| self.document.cmp(&other.document))
    }
}

/// Receives documents in visiting order.
pub trait Collector: Send + Debug {
    /// Offer a document.
    fn collect(&mut self, document: ScoredDocument);

    /// Whether further documents could still change the results.
    fn needs_more(&self) -> bool;

    /// Number of documents offered so far.
    fn total_hits(&self) -> u64;

    /// Documents dropped after having been kept.
    fn evictions(&self) -> u64 {
        0
    }

    /// The collected documents.
    fn results(&self) -> Vec<ScoredDocument>;
}

/// Keeps the best `max_docs` documents.
#[derive(Debug)]
pub struct TopDocsCollector {
    max_docs: usize,
    /// Min-heap of the kept documents.
    heap: BinaryHeap<Reverse<ScoredDocument>>,
    total_hits: u64,
    evictions: u64,
}

impl TopDocsCollector {
    pub fn new(max_docs: usize) -> Self {
        TopDocsCollector {
            max_docs,
            heap: BinaryHeap::with_capacity(max_docs.min(4096)),
            total_hits: 0,
            evictions: 0,
        }
    }

    pub fn max_docs(&self) -> usize {
        self.max_docs
    }

    /// The lowest kept document once the collector is full.
    pub fn threshold(&self) -> Option<&ScoredDocument> {
        if self.heap.len() < self.max_docs {
            None
        } else {
            self.heap.peek().map(|Reverse(document)| document)
        }
    }
}

impl Collector for TopDocsCollector {
    fn collect(&mut self, document: ScoredDocument) {
        self.total_hits += 1;
        if self.max_docs == 0 {
            return;
        }
        if self.heap.len() < self.max_docs {
            self.heap.push(Reverse(document));
            return;
        }
        if let Some(Reverse(worst)) = self.heap.peek()
            && document > *worst
        {
            self.heap.pop();
            self.heap.push(Reverse(document));
            self.evictions += 1;
        }
    }

    fn needs_more(&self) -> bool {
        true
    }

    fn total_hits(&self) -> u64 {
        self.total_hits
    }

    fn evictions(&self) -> u64 {
        self.evictions
    }

    /// Best first.
    fn results(&self) -> Vec<ScoredDocument> {
        let mut results: Vec<ScoredDocument> = self.heap.iter().map(|Reverse(d)| *d).collect();
        results.sort_by(|a, b| b.cmp(a));
        results
    }
}

/// Keeps every document in visiting order, optionally only the first `limit`.
#[derive(Debug, Default)]
pub struct BooleanCollector {
    limit: Option<usize>,
    documents: Vec<ScoredDocument>,
    total_hits: u64,
}

impl BooleanCollector {
    pub fn new(limit: Option<usize>) -> Self {
        BooleanCollector {
            limit,
            documents: Vec::new(),
            total_hits: 0,
        }
    }
}

impl Collector for BooleanCollector {
    fn collect(&mut self, document: ScoredDocument) {
        self.total_hits += 1;
        if self.needs_more() {
            self.documents.push(document);
        }
    }

    fn needs_more(&self) -> bool {
        self.limit.is_none_or(|limit| self.documents.len() < limit)
    }

    fn total_hits(&self) -> u64 {
        self.total_hits
    }

    fn results(&self) -> Vec<ScoredDocument> {
        self.documents.clone()
    }
}
