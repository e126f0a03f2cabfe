use phasehull::engine::config::AnalysisConfig;
use std::path::PathBuf;

#[derive(Debug, Clone)]
pub struct AppConfig {
    pub input_path: PathBuf,
    pub references_path: Option<PathBuf>,
    pub output_path: Option<PathBuf>,
    pub stable_only: bool,
    pub precision: usize,
    pub core_config: AnalysisConfig,
}
