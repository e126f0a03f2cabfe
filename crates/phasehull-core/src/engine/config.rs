use crate::core::EPSILON;
use crate::core::hull::quickhull::DEFAULT_SAMPLE_THRESHOLD;
use thiserror::Error;

#[derive(Debug, Error, PartialEq, Eq, Clone)]
pub enum ConfigError {
    #[error("Missing required parameter: {0}")]
    MissingParameter(&'static str),
    #[error("Invalid value for parameter '{name}': {reason}")]
    InvalidParameter { name: &'static str, reason: String },
}

#[derive(Debug, Clone, PartialEq)]
pub struct AnalysisConfig {
    /// Largest energy above hull (energy units per atom) still reported as stable.
    pub stability_tolerance: f64,
    /// Point count above which the initial Quickhull simplex is seeded from a sample.
    pub simplex_sample_threshold: usize,
}

impl Default for AnalysisConfig {
    fn default() -> Self {
        Self {
            stability_tolerance: EPSILON,
            simplex_sample_threshold: DEFAULT_SAMPLE_THRESHOLD,
        }
    }
}

#[derive(Default)]
pub struct AnalysisConfigBuilder {
    stability_tolerance: Option<f64>,
    simplex_sample_threshold: Option<usize>,
}

impl AnalysisConfigBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn stability_tolerance(mut self, tolerance: f64) -> Self {
        self.stability_tolerance = Some(tolerance);
        self
    }
    pub fn simplex_sample_threshold(mut self, threshold: usize) -> Self {
        self.simplex_sample_threshold = Some(threshold);
        self
    }

    pub fn build(self) -> Result<AnalysisConfig, ConfigError> {
        let stability_tolerance = self
            .stability_tolerance
            .ok_or(ConfigError::MissingParameter("stability_tolerance"))?;
        if !stability_tolerance.is_finite() || stability_tolerance < 0.0 {
            return Err(ConfigError::InvalidParameter {
                name: "stability_tolerance",
                reason: format!("must be a finite, non-negative number (got {stability_tolerance})"),
            });
        }
        let simplex_sample_threshold = self
            .simplex_sample_threshold
            .ok_or(ConfigError::MissingParameter("simplex_sample_threshold"))?;
        if simplex_sample_threshold < 2 {
            return Err(ConfigError::InvalidParameter {
                name: "simplex_sample_threshold",
                reason: format!("must be at least 2 (got {simplex_sample_threshold})"),
            });
        }
        Ok(AnalysisConfig {
            stability_tolerance,
            simplex_sample_threshold,
        })
    }
}
