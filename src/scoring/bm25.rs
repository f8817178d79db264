//! Okapi BM25.

use log::debug;

use crate::error::{Result, SkeinError};
use crate::iterator::CountIterator;
use crate::parameters::Parameters;
use crate::scoring::{ScoringFunction, count_documents};

/// Average document length assumed when the collection gives no better estimate.
pub const DEFAULT_AVERAGE_LENGTH: f64 = 50.0;

/// BM25 scorer with a precomputed inverse document frequency.
#[derive(Debug, Clone, PartialEq)]
pub struct BM25Scorer {
    b: f64,
    k: f64,
    average_length: f64,
    idf: f64,
}

impl BM25Scorer {
    /// Create a scorer from explicit statistics.
    pub fn new(b: f64, k: f64, average_length: f64, document_count: f64, df: f64) -> Self {
        BM25Scorer {
            b,
            k,
            average_length,
            idf: ((document_count - df + 0.5) / (df + 0.5)).ln(),
        }
    }

    /// Create a scorer from `b`, `k`, `documentCount` and optionally `df`,
    /// `avgDocLength` and `collectionLength`.
    ///
    /// Without a `df` parameter the document frequency is counted from
    /// `iterator`, which is then reset.
    pub fn from_parameters(
        parameters: &Parameters,
        iterator: Option<&mut dyn CountIterator>,
    ) -> Result<Self> {
        let b = parameters.get_f64_or("b", 0.75);
        let k = parameters.get_f64_or("k", 1.2);
        let document_count = parameters.require_f64("documentCount")?;

        let average_length = match parameters.get_f64("avgDocLength") {
            Some(average) => average,
            None => match parameters.get_f64("collectionLength") {
                Some(length) if document_count > 0.0 => length / document_count,
                _ => DEFAULT_AVERAGE_LENGTH,
            },
        };

        let df = match (parameters.get_f64("df"), iterator) {
            (Some(df), _) => df,
            (None, Some(iterator)) => count_documents(iterator)? as f64,
            (None, None) => {
                return Err(SkeinError::statistics_unavailable(
                    "bm25 needs a df parameter or a count iterator",
                ));
            }
        };

        let scorer = BM25Scorer::new(b, k, average_length, document_count, df);
        debug!(
            "bm25 b={b} k={k} avgDocLength={average_length} df={df} idf={}",
            scorer.idf
        );
        Ok(scorer)
    }

    pub fn idf(&self) -> f64 {
        self.idf
    }

    pub fn average_length(&self) -> f64 {
        self.average_length
    }
}

impl ScoringFunction for BM25Scorer {
    fn score_count(&self, count: u32, length: u32) -> f64 {
        let count = count as f64;
        let normalization = 1.0 - self.b + self.b * (length as f64 / self.average_length);
        self.idf * (count * (self.k + 1.0)) / (count + self.k * normalization)
    }

    fn name(&self) -> &'static str {
        "bm25"
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::iterator::testing;

    fn parameters() -> Parameters {
        Parameters::new()
            .with("collectionLength", 5000)
            .with("documentCount", 100)
    }

    #[test]
    fn test_bm25_reference_values() {
        let mut empty = testing::counts(&[]);
        let scorer = BM25Scorer::from_parameters(&parameters(), Some(&mut empty)).unwrap();

        assert_eq!(scorer.average_length(), 50.0);
        assert!((scorer.idf() - 5.30330).abs() < 1e-4);
        assert!((scorer.score_count(5, 100) - 8.21639).abs() < 1e-4);
        assert_eq!(scorer.score_count(0, 100), 0.0);
    }

    #[test]
    fn test_bm25_counts_documents_from_iterator() {
        let mut iterator = testing::counts(&[(1, 1), (2, 4), (5, 1)]);
        let scorer = BM25Scorer::from_parameters(&parameters(), Some(&mut iterator)).unwrap();
        let explicit = BM25Scorer::from_parameters(&parameters().with("df", 3), None).unwrap();

        assert_eq!(scorer, explicit);
        assert!(!crate::iterator::StructuredIterator::is_done(&iterator));
    }

    #[test]
    fn test_bm25_missing_statistics() {
        let result = BM25Scorer::from_parameters(&parameters(), None);
        assert!(matches!(result, Err(SkeinError::StatisticsUnavailable(_))));

        let result = BM25Scorer::from_parameters(&Parameters::new().with("df", 1), None);
        assert!(matches!(result, Err(SkeinError::Configuration(_))));
    }

    #[test]
    fn test_bm25_default_average_length() {
        let parameters = Parameters::new().with("documentCount", 10).with("df", 2);
        let scorer = BM25Scorer::from_parameters(&parameters, None).unwrap();
        assert_eq!(scorer.average_length(), DEFAULT_AVERAGE_LENGTH);
    }
}
