use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;

const HELP_TEMPLATE: &str = "\
{before-help}{name} {version}
{author-with-newline}{about-with-newline}
{usage-heading} {usage}

{all-args}{after-help}
";

#[derive(Parser, Debug)]
#[command(
    author = "The phasehull developers",
    version,
    about = "phasehull - phase stability analysis of chemical compositions against the lower convex hull of formation energies.",
    help_template = HELP_TEMPLATE,
)]
#[command(propagate_version = true)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Increase verbosity level (-v for INFO, -vv for DEBUG, -vvv for TRACE)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Suppress all log output except for errors
    #[arg(short, long, global = true, conflicts_with = "verbose")]
    pub quiet: bool,

    /// Write logs to a specified file in addition to the console output
    #[arg(long, global = true, value_name = "PATH")]
    pub log_file: Option<PathBuf>,

    /// Set the number of threads for parallel computation.
    /// Defaults to the number of available logical cores.
    #[arg(short = 'j', long, global = true, value_name = "NUM")]
    pub threads: Option<usize>,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Compute the energy above hull of every entry and report which ones are stable.
    Analyze(AnalyzeArgs),
    /// Print the hull formation energy at a single composition.
    Query(QueryArgs),
}

/// Arguments for the `analyze` subcommand.
#[derive(Args, Debug)]
pub struct AnalyzeArgs {
    /// Path to the TOML entry set to analyze.
    #[arg(short, long, required = true, value_name = "PATH")]
    pub input: PathBuf,

    /// Path to a separate TOML entry set used to build the hull.
    /// Defaults to the analyzed entries themselves.
    #[arg(short, long, value_name = "PATH")]
    pub references: Option<PathBuf>,

    /// Path to an optional configuration file in TOML format.
    #[arg(short, long, value_name = "PATH")]
    pub config: Option<PathBuf>,

    /// Write the report as CSV to this path.
    #[arg(short, long, value_name = "PATH")]
    pub output: Option<PathBuf>,

    /// Override the stability tolerance (energy per atom) from the config file.
    #[arg(short, long, value_name = "FLOAT")]
    pub tolerance: Option<f64>,

    /// Only report entries lying on the hull.
    #[arg(long)]
    pub stable_only: bool,

    /// Set a specific configuration value, overriding the config file.
    /// Can be used multiple times. Example: -S output.precision=6
    #[arg(short = 'S', long = "set", value_name = "KEY=VALUE", num_args(0..))]
    pub set_values: Vec<String>,
}

/// Arguments for the `query` subcommand.
#[derive(Args, Debug)]
pub struct QueryArgs {
    /// Path to the TOML entry set used to build the hull.
    #[arg(short, long, required = true, value_name = "PATH")]
    pub input: PathBuf,

    /// Comma-separated element amounts, e.g. 'Al=1,Ni=3'.
    #[arg(short, long, required = true, value_name = "LIST")]
    pub composition: String,

    /// Number of decimal places in the printed energy.
    #[arg(short, long, value_name = "INT")]
    pub precision: Option<usize>,
}
