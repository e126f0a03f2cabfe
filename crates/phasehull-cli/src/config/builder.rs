use super::defaults::DefaultsConfig;
use super::file::FileConfig;
use super::models::AppConfig;
use crate::cli::AnalyzeArgs;
use crate::error::{CliError, Result};
use phasehull::engine::config::AnalysisConfigBuilder;
use std::str::FromStr;

pub fn build_config(args: &AnalyzeArgs) -> Result<AppConfig> {
    let defaults = DefaultsConfig::default();

    let file_config = if let Some(config_path) = &args.config {
        FileConfig::from_file(config_path)?
    } else {
        FileConfig::default()
    };

    let mut file_config = apply_set_values(file_config, &args.set_values)?;

    let analysis_file = file_config.analysis.take().unwrap_or_default();
    let stability_tolerance = args
        .tolerance
        .or(analysis_file.stability_tolerance)
        .unwrap_or(defaults.stability_tolerance);
    let simplex_sample_threshold = analysis_file
        .simplex_sample_threshold
        .unwrap_or(defaults.simplex_sample_threshold);

    let output_file = file_config.output.take().unwrap_or_default();
    let precision = output_file.precision.unwrap_or(defaults.precision);
    let stable_only = args.stable_only || output_file.stable_only.unwrap_or(false);

    let core_config = AnalysisConfigBuilder::new()
        .stability_tolerance(stability_tolerance)
        .simplex_sample_threshold(simplex_sample_threshold)
        .build()
        .map_err(|e| CliError::Config(e.to_string()))?;

    Ok(AppConfig {
        input_path: args.input.clone(),
        references_path: args.references.clone(),
        output_path: args.output.clone(),
        stable_only,
        precision,
        core_config,
    })
}

fn parse_value<T: FromStr>(key: &str, value: &str, kind: &str) -> Result<T> {
    value
        .parse()
        .map_err(|_| CliError::Config(format!("Invalid {} value for {}: {}", kind, key, value)))
}

fn apply_set_values(mut config: FileConfig, set_values: &[String]) -> Result<FileConfig> {
    for kv_pair in set_values {
        let Some((key, value_str)) = kv_pair.split_once('=') else {
            return Err(CliError::Config(format!(
                "Invalid --set format: '{}'. Expected KEY=VALUE.",
                kv_pair
            )));
        };
        let key = key.trim();
        let value_str = value_str.trim();

        match key {
            "analysis.stability-tolerance" => {
                config
                    .analysis
                    .get_or_insert_with(Default::default)
                    .stability_tolerance = Some(parse_value(key, value_str, "float")?);
            }
            "analysis.simplex-sample-threshold" => {
                config
                    .analysis
                    .get_or_insert_with(Default::default)
                    .simplex_sample_threshold = Some(parse_value(key, value_str, "integer")?);
            }
            "output.precision" => {
                config.output.get_or_insert_with(Default::default).precision =
                    Some(parse_value(key, value_str, "integer")?);
            }
            "output.stable-only" => {
                config.output.get_or_insert_with(Default::default).stable_only =
                    Some(parse_value(key, value_str, "boolean")?);
            }
            _ => {
                return Err(CliError::Config(format!(
                    "Unsupported configuration key for --set: '{}'",
                    key
                )));
            }
        }
    }
    Ok(config)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use std::path::PathBuf;
    use tempfile::tempdir;

    fn base_analyze_args() -> AnalyzeArgs {
        AnalyzeArgs {
            input: PathBuf::from("entries.toml"),
            references: None,
            config: None,
            output: None,
            tolerance: None,
            stable_only: false,
            set_values: vec![],
        }
    }

    #[test]
    fn defaults_apply_without_file_or_flags() {
        let app = build_config(&base_analyze_args()).expect("build ok");
        assert_eq!(app.core_config.stability_tolerance, 1e-9);
        assert_eq!(app.core_config.simplex_sample_threshold, 100);
        assert_eq!(app.precision, 4);
        assert!(!app.stable_only);
        assert_eq!(app.input_path, PathBuf::from("entries.toml"));
    }

    #[test]
    fn file_values_override_defaults() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("config.toml");
        fs::write(
            &path,
            "[analysis]\nstability-tolerance = 0.02\n\n[output]\nprecision = 3\nstable-only = true\n",
        )
        .unwrap();

        let mut args = base_analyze_args();
        args.config = Some(path);
        let app = build_config(&args).expect("build ok");
        assert_eq!(app.core_config.stability_tolerance, 0.02);
        assert_eq!(app.precision, 3);
        assert!(app.stable_only);
    }

    #[test]
    fn cli_flag_beats_set_value_which_beats_file() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("config.toml");
        fs::write(&path, "[analysis]\nstability-tolerance = 0.02\n").unwrap();

        let mut args = base_analyze_args();
        args.config = Some(path);
        args.set_values = vec!["analysis.stability-tolerance=0.03".to_string()];
        let app = build_config(&args).expect("build ok");
        assert_eq!(app.core_config.stability_tolerance, 0.03);

        args.tolerance = Some(0.04);
        let app = build_config(&args).expect("build ok");
        assert_eq!(app.core_config.stability_tolerance, 0.04);
    }

    #[test]
    fn set_values_cover_every_supported_key() {
        let mut args = base_analyze_args();
        args.set_values = vec![
            "analysis.simplex-sample-threshold=20".to_string(),
            "output.precision = 7".to_string(),
            "output.stable-only=true".to_string(),
        ];
        let app = build_config(&args).expect("build ok");
        assert_eq!(app.core_config.simplex_sample_threshold, 20);
        assert_eq!(app.precision, 7);
        assert!(app.stable_only);
    }

    #[test]
    fn malformed_set_values_are_config_errors() {
        for bad in ["output.precision", "output.precision=high", "analysis.unknown=1"] {
            let mut args = base_analyze_args();
            args.set_values = vec![bad.to_string()];
            assert!(matches!(build_config(&args), Err(CliError::Config(_))), "{bad}");
        }
    }

    #[test]
    fn negative_tolerance_is_rejected_by_core_builder() {
        let mut args = base_analyze_args();
        args.tolerance = Some(-1.0);
        assert!(matches!(build_config(&args), Err(CliError::Config(_))));
    }
}
