//! Dirichlet-smoothed query likelihood.

use log::debug;

use crate::error::Result;
use crate::iterator::CountIterator;
use crate::parameters::Parameters;
use crate::scoring::{ScoringFunction, background_probability};

#[derive(Debug, Clone, PartialEq)]
pub struct DirichletScorer {
    mu: f64,
    background: f64,
}

impl DirichletScorer {
    pub fn new(mu: f64, background: f64) -> Self {
        DirichletScorer { mu, background }
    }

    /// Create a scorer from `mu` (default 1500) and a background probability,
    /// see [`background_probability`].
    pub fn from_parameters(
        parameters: &Parameters,
        iterator: Option<&mut dyn CountIterator>,
    ) -> Result<Self> {
        let mu = parameters.get_f64_or("mu", 1500.0);
        let background = background_probability(parameters, iterator)?;
        debug!("dirichlet mu={mu} background={background}");
        Ok(DirichletScorer::new(mu, background))
    }

    pub fn mu(&self) -> f64 {
        self.mu
    }

    pub fn background(&self) -> f64 {
        self.background
    }
}

impl ScoringFunction for DirichletScorer {
    fn score_count(&self, count: u32, length: u32) -> f64 {
        let numerator = count as f64 + self.mu * self.background;
        let denominator = length as f64 + self.mu;
        (numerator / denominator).ln()
    }

    fn name(&self) -> &'static str {
        "dirichlet"
    }
}
