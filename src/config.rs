//! Retrieval configuration.

use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::Result;
use crate::parameters::Parameters;

/// Process-wide retrieval defaults. Per-query [`Parameters`] override them.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RetrievalConfig {
    /// Size of the ranked result set (K for top-K).
    pub requested_documents: usize,

    /// Scorer wrapped around bare terms in ranked queries.
    pub default_scorer: String,

    /// Dirichlet smoothing mass.
    pub mu: f64,

    /// Jelinek-Mercer / linear interpolation weight.
    pub lambda: f64,

    /// BM25 length normalization.
    pub b: f64,

    /// BM25 term frequency saturation.
    pub k: f64,

    /// Allow term nodes to be rewritten onto a stemmed part.
    pub stemming: bool,
}

impl Default for RetrievalConfig {
    fn default() -> Self {
        RetrievalConfig {
            requested_documents: 1000,
            default_scorer: "dirichlet".to_string(),
            mu: 1500.0,
            lambda: 0.5,
            b: 0.75,
            k: 1.2,
            stemming: true,
        }
    }
}

impl RetrievalConfig {
    /// Load a configuration from a JSON file. Missing fields take defaults.
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let text = fs::read_to_string(path)?;
        Ok(serde_json::from_str(&text)?)
    }

    /// Expose the configuration as query parameters.
    pub fn to_parameters(&self) -> Parameters {
        Parameters::new()
            .with("requestedDocuments", self.requested_documents as u64)
            .with("scorer", self.default_scorer.as_str())
            .with("mu", self.mu)
            .with("lambda", self.lambda)
            .with("b", self.b)
            .with("k", self.k)
            .with("stemming", self.stemming)
    }
}

#[cfg(test)]
mod tests {
    use std::io::Write;

    use super::*;

    #[test]
    fn test_defaults() {
        let config = RetrievalConfig::default();
        assert_eq!(config.requested_documents, 1000);
        assert_eq!(config.default_scorer, "dirichlet");

        let p = config.to_parameters();
        assert_eq!(p.get_f64("mu"), Some(1500.0));
        assert_eq!(p.get_str("scorer"), Some("dirichlet"));
    }

    #[test]
    fn test_from_file_fills_missing_fields() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(file, r#"{{"mu": 2500.0, "requested_documents": 20}}"#).unwrap();

        let config = RetrievalConfig::from_file(file.path()).unwrap();
        assert_eq!(config.mu, 2500.0);
        assert_eq!(config.requested_documents, 20);
        assert_eq!(config.lambda, 0.5);
    }
}
