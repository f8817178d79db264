//! Jelinek-Mercer smoothed query likelihood.

use log::debug;

use crate::error::Result;
use crate::iterator::CountIterator;
use crate::parameters::Parameters;
use crate::scoring::linear::LinearScorer;
use crate::scoring::{ScoringFunction, background_probability};

/// Log of the linear interpolation computed by [`LinearScorer`].
#[derive(Debug, Clone, PartialEq)]
pub struct JelinekMercerScorer {
    linear: LinearScorer,
}

impl JelinekMercerScorer {
    pub fn new(lambda: f64, background: f64) -> Self {
        JelinekMercerScorer {
            linear: LinearScorer::new(lambda, background),
        }
    }

    /// Create a scorer from `lambda` (default 0.5) and a background probability.
    pub fn from_parameters(
        parameters: &Parameters,
        iterator: Option<&mut dyn CountIterator>,
    ) -> Result<Self> {
        let lambda = parameters.get_f64_or("lambda", 0.5);
        let background = background_probability(parameters, iterator)?;
        debug!("jm lambda={lambda} background={background}");
        Ok(JelinekMercerScorer::new(lambda, background))
    }

    pub fn lambda(&self) -> f64 {
        self.linear.lambda()
    }

    pub fn background(&self) -> f64 {
        self.linear.background()
    }
}

impl ScoringFunction for JelinekMercerScorer {
    fn score_count(&self, count: u32, length: u32) -> f64 {
        self.linear.score_count(count, length).ln()
    }

    fn name(&self) -> &'static str {
        "jm"
    }
}
