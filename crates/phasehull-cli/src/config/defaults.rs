use phasehull::engine::config::AnalysisConfig;

pub struct DefaultsConfig {
    pub stability_tolerance: f64,
    pub simplex_sample_threshold: usize,
    pub precision: usize,
}

impl Default for DefaultsConfig {
    fn default() -> Self {
        let core = AnalysisConfig::default();
        Self {
            stability_tolerance: core.stability_tolerance,
            simplex_sample_threshold: core.simplex_sample_threshold,
            precision: 4,
        }
    }
}
