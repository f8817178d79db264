//! Scoring functions for ranked retrieval.
//!
//! A scoring function turns the occurrence count of a term (or any count
//! node) in a document of a given length into a relevance score. Functions
//! are built from a [`Parameters`] bag, optionally scanning a count iterator
//! once to derive the collection statistics they need.

pub mod bm25;
pub mod dirichlet;
pub mod jelinek_mercer;
pub mod linear;

use std::fmt::Debug;

use log::debug;

use crate::error::{Result, SkeinError};
use crate::iterator::CountIterator;
use crate::parameters::Parameters;

pub use bm25::BM25Scorer;
pub use dirichlet::DirichletScorer;
pub use jelinek_mercer::JelinekMercerScorer;
pub use linear::LinearScorer;

/// Names accepted by [`create_scoring_function`].
pub const SCORER_NAMES: &[&str] = &["dirichlet", "bm25", "jm", "linear"];

/// A pure count/length scoring strategy.
pub trait ScoringFunction: Send + Sync + Debug {
    /// Score a document where the scored node occurs `count` times and
    /// which is `length` positions long.
    fn score_count(&self, count: u32, length: u32) -> f64;

    /// Get the name of this scoring function.
    fn name(&self) -> &'static str;
}

/// Create a scoring function by name.
///
/// `iterator`, when given, is scanned for statistics missing from
/// `parameters` and reset afterwards.
pub fn create_scoring_function(
    name: &str,
    parameters: &Parameters,
    iterator: Option<&mut dyn CountIterator>,
) -> Result<Box<dyn ScoringFunction>> {
    let function: Box<dyn ScoringFunction> = match name {
        "dirichlet" => Box::new(DirichletScorer::from_parameters(parameters, iterator)?),
        "bm25" => Box::new(BM25Scorer::from_parameters(parameters, iterator)?),
        "jm" => Box::new(JelinekMercerScorer::from_parameters(parameters, iterator)?),
        "linear" => Box::new(LinearScorer::from_parameters(parameters, iterator)?),
        other => {
            return Err(SkeinError::configuration(format!(
                "unknown scoring function '{other}', expected one of {SCORER_NAMES:?}"
            )));
        }
    };
    debug!("created {} scoring function", function.name());
    Ok(function)
}

/// Number of documents the iterator visits. The iterator is exhausted and then reset.
pub fn count_documents<I: CountIterator + ?Sized>(iterator: &mut I) -> Result<u64> {
    let mut documents = 0;
    while !iterator.is_done() {
        documents += 1;
        iterator.next_document()?;
    }
    iterator.reset()?;
    Ok(documents)
}

/// Sum of counts over every document the iterator visits. The iterator is
/// exhausted and then reset.
pub fn sum_counts<I: CountIterator + ?Sized>(iterator: &mut I) -> Result<u64> {
    let mut total = 0;
    while !iterator.is_done() {
        total += iterator.count() as u64;
        iterator.next_document()?;
    }
    iterator.reset()?;
    Ok(total)
}

/// Background probability of the scored node in the collection.
///
/// Uses `collectionProbability` when supplied, otherwise scans `iterator`
/// and divides its total count by `collectionLength`. A total of zero is
/// floored at 0.5 so the background never vanishes.
pub fn background_probability(
    parameters: &Parameters,
    iterator: Option<&mut dyn CountIterator>,
) -> Result<f64> {
    if let Some(probability) = parameters.get_f64("collectionProbability") {
        return Ok(probability);
    }
    let Some(iterator) = iterator else {
        return Err(SkeinError::statistics_unavailable(
            "background probability needs collectionProbability or a count iterator",
        ));
    };
    let collection_length = parameters.get_f64("collectionLength").ok_or_else(|| {
        SkeinError::configuration("collectionLength is required to derive a background probability")
    })?;
    if collection_length <= 0.0 {
        return Err(SkeinError::statistics_unavailable(
            "collectionLength must be positive",
        ));
    }

    let total = sum_counts(iterator)?;
    let count = if total == 0 { 0.5 } else { total as f64 };
    let background = count / collection_length;
    debug!("background probability {background} from total count {total}");
    Ok(background)
}

/// `count / length`, or 0 for an empty document.
pub(crate) fn term_frequency(count: u32, length: u32) -> f64 {
    if length == 0 {
        0.0
    } else {
        count as f64 / length as f64
    }
}
