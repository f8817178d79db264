//! Weighted sum of score children, `#combine`.

use crate::error::{Result, SkeinError};
use crate::extent::DocId;
use crate::iterator::disjunction::DisjunctionIterator;
use crate::iterator::{ScoreIterator, ScoringContext, StructuredIterator};

/// Visits every document any child visits and sums the weighted child scores.
#[derive(Debug)]
pub struct ScoreCombinationIterator {
    disjunction: DisjunctionIterator<Box<dyn ScoreIterator>>,
    weights: Vec<f64>,
}

impl ScoreCombinationIterator {
    pub fn new(iterators: Vec<Box<dyn ScoreIterator>>, weights: Vec<f64>) -> Result<Self> {
        if iterators.len() != weights.len() {
            return Err(SkeinError::configuration(format!(
                "{} weights given for {} children",
                weights.len(),
                iterators.len()
            )));
        }
        Ok(ScoreCombinationIterator {
            disjunction: DisjunctionIterator::new(iterators)?,
            weights,
        })
    }

    /// Equal weights summing to one.
    pub fn uniform(iterators: Vec<Box<dyn ScoreIterator>>) -> Result<Self> {
        let weight = 1.0 / iterators.len().max(1) as f64;
        let weights = vec![weight; iterators.len()];
        ScoreCombinationIterator::new(iterators, weights)
    }

    pub fn weights(&self) -> &[f64] {
        &self.weights
    }
}

impl StructuredIterator for ScoreCombinationIterator {
    fn document(&self) -> Option<DocId> {
        self.disjunction.document()
    }

    fn next_document(&mut self) -> Result<()> {
        self.disjunction.next_document()
    }

    fn skip_to_document(&mut self, target: DocId) -> Result<bool> {
        self.disjunction.skip_to_document(target)
    }

    fn reset(&mut self) -> Result<()> {
        self.disjunction.reset()
    }
}

impl ScoreIterator for ScoreCombinationIterator {
    fn score(&self, context: &ScoringContext) -> f64 {
        self.disjunction
            .iterators()
            .iter()
            .zip(&self.weights)
            .map(|(iterator, weight)| weight * iterator.score(context))
            .sum()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::iterator::scoring::ScoringFunctionIterator;
    use crate::iterator::testing;
    use crate::scoring::LinearScorer;

    fn scorer(postings: &[(DocId, u32)]) -> Box<dyn ScoreIterator> {
        Box::new(ScoringFunctionIterator::new(
            Box::new(testing::counts(postings)),
            Box::new(LinearScorer::new(0.0, 0.0)),
        ))
    }

    #[test]
    fn test_combination_sums_weighted_scores() {
        let mut iterator = ScoreCombinationIterator::new(
            vec![scorer(&[(1, 5), (3, 2)]), scorer(&[(3, 4)])],
            vec![1.0, 0.5],
        )
        .unwrap();

        let context = |document| ScoringContext {
            document,
            length: 10,
        };
        assert_eq!(iterator.document(), Some(1));
        assert!((iterator.score(&context(1)) - 0.5).abs() < 1e-12);

        iterator.next_document().unwrap();
        assert_eq!(iterator.document(), Some(3));
        assert!((iterator.score(&context(3)) - 0.4).abs() < 1e-12);

        iterator.next_document().unwrap();
        assert!(iterator.is_done());
    }

    #[test]
    fn test_weight_count_must_match() {
        let result = ScoreCombinationIterator::new(vec![scorer(&[(1, 1)])], vec![]);
        assert!(matches!(result, Err(SkeinError::Configuration(_))));

        let uniform = ScoreCombinationIterator::uniform(vec![scorer(&[(1, 1)]), scorer(&[])]);
        assert_eq!(uniform.unwrap().weights(), &[0.5, 0.5]);
    }
}
