//! Drives a built iterator graph to a result set.

use std::time::Instant;

use log::debug;

use crate::error::Result;
use crate::index::StructuredIndex;
use crate::iterator::{ScoreIterator, ScoringContext, StructuredIterator};
use crate::retrieval::collector::{BooleanCollector, Collector, ScoredDocument, TopDocsCollector};
use crate::retrieval::statistics::QueryStatistics;

/// Documents and statistics of one execution.
pub type Execution = (Vec<ScoredDocument>, QueryStatistics);

/// Score every candidate of `root` and keep the best `requested`.
pub fn run_ranked<I: ScoreIterator + ?Sized>(
    root: &mut I,
    index: &dyn StructuredIndex,
    requested: usize,
) -> Result<Execution> {
    let start = Instant::now();
    let mut collector = TopDocsCollector::new(requested);
    let mut candidates = 0u64;

    while let Some(document) = root.document() {
        candidates += 1;
        let context = ScoringContext {
            document,
            length: index.document_length(document)?,
        };
        collector.collect(ScoredDocument::new(document, root.score(&context)));
        root.next_document()?;
    }

    let results = collector.results();
    let statistics = QueryStatistics {
        candidates,
        returned: results.len() as u64,
        evictions: collector.evictions(),
        elapsed_micros: start.elapsed().as_micros() as u64,
    };
    debug!(
        "ranked query scored {candidates} candidates, kept {}",
        results.len()
    );
    Ok((results, statistics))
}

/// Every document `root` visits, in order, each scored 1.0. With a `limit`
/// only the first `limit` documents are taken.
pub fn run_boolean<I: StructuredIterator + ?Sized>(
    root: &mut I,
    limit: Option<usize>,
) -> Result<Execution> {
    let start = Instant::now();
    let mut collector = BooleanCollector::new(limit);

    while let Some(document) = root.document() {
        if !collector.needs_more() {
            break;
        }
        collector.collect(ScoredDocument::new(document, 1.0));
        root.next_document()?;
    }

    let results = collector.results();
    let statistics = QueryStatistics {
        candidates: collector.total_hits(),
        returned: results.len() as u64,
        evictions: 0,
        elapsed_micros: start.elapsed().as_micros() as u64,
    };
    debug!("boolean query matched {} documents", results.len());
    Ok((results, statistics))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::index::memory::MemoryIndex;
    use crate::iterator::combination::ScoreCombinationIterator;
    use crate::iterator::disjunction::DisjunctionIterator;
    use crate::iterator::scoring::ScoringFunctionIterator;
    use crate::iterator::testing;
    use crate::scoring::LinearScorer;

    fn documents(results: &[ScoredDocument]) -> Vec<u64> {
        results.iter().map(|d| d.document).collect()
    }

    #[test]
    fn test_boolean_visits_union() {
        let mut root = DisjunctionIterator::new(vec![
            testing::counts(&[(2, 1), (3, 1), (5, 1)]),
            testing::counts(&[(3, 1), (6, 1), (7, 1)]),
        ])
        .unwrap();
        let (results, statistics) = run_boolean(&mut root, None).unwrap();
        assert_eq!(documents(&results), vec![2, 3, 5, 6, 7]);
        assert!(results.iter().all(|d| d.score == 1.0));
        assert_eq!(statistics.returned, 5);

        root.reset().unwrap();
        let (results, _) = run_boolean(&mut root, Some(2)).unwrap();
        assert_eq!(documents(&results), vec![2, 3]);
    }

    #[test]
    fn test_ranked_keeps_top_k() {
        let index = MemoryIndex::builder()
            .document_length(1, 10)
            .document_length(2, 10)
            .document_length(3, 10)
            .build();
        let scorer = |postings: &[(u64, u32)]| -> Box<dyn ScoreIterator> {
            Box::new(ScoringFunctionIterator::new(
                Box::new(testing::counts(postings)),
                Box::new(LinearScorer::new(0.0, 0.0)),
            ))
        };
        let mut root = ScoreCombinationIterator::new(
            vec![scorer(&[(1, 1), (2, 5)]), scorer(&[(2, 1), (3, 4)])],
            vec![1.0, 1.0],
        )
        .unwrap();

        let (results, statistics) = run_ranked(&mut root, &index, 2).unwrap();
        assert_eq!(documents(&results), vec![2, 3]);
        assert!((results[0].score - 0.6).abs() < 1e-12);
        assert_eq!(statistics.candidates, 3);
        assert_eq!(statistics.evictions, 1);
    }
}
