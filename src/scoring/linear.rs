//! Linear interpolation between document and collection probabilities.

use crate::error::Result;
use crate::iterator::CountIterator;
use crate::parameters::Parameters;
use crate::scoring::{ScoringFunction, background_probability, term_frequency};

/// `(1 - lambda) * count / length + lambda * background`.
///
/// Produces a probability rather than a log score, for blending.
#[derive(Debug, Clone, PartialEq)]
pub struct LinearScorer {
    lambda: f64,
    background: f64,
}

impl LinearScorer {
    pub fn new(lambda: f64, background: f64) -> Self {
        LinearScorer { lambda, background }
    }

    pub fn from_parameters(
        parameters: &Parameters,
        iterator: Option<&mut dyn CountIterator>,
    ) -> Result<Self> {
        let lambda = parameters.get_f64_or("lambda", 0.5);
        let background = background_probability(parameters, iterator)?;
        Ok(LinearScorer::new(lambda, background))
    }

    pub fn lambda(&self) -> f64 {
        self.lambda
    }

    pub fn background(&self) -> f64 {
        self.background
    }
}

impl ScoringFunction for LinearScorer {
    fn score_count(&self, count: u32, length: u32) -> f64 {
        (1.0 - self.lambda) * term_frequency(count, length) + self.lambda * self.background
    }

    fn name(&self) -> &'static str {
        "linear"
    }
}
