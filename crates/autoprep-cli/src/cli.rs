//! CLI argument definitions.

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand, ValueEnum};
use clap_verbosity_flag::{Verbosity, WarnLevel};
use colorchoice_clap::Color;

use autoprep_model::PrepOptions;
use autoprep_model::options::{
    DEFAULT_ID_UNIQUE_RATIO, DEFAULT_IQR_MULTIPLIER, DEFAULT_NUMERIC_RATIO, DEFAULT_SEED,
    DEFAULT_SPLIT_RATIO,
};

#[derive(Parser)]
#[command(
    name = "autoprep",
    version,
    about = "Leakage-safe preprocessing for tabular datasets",
    long_about = "Turn a raw CSV file into model-ready train/test CSV files.\n\n\
                  Cleans, imputes, caps outliers, one-hot encodes and standardizes,\n\
                  fitting every statistic on the training fold only."
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,

    /// Adjust log verbosity (-v for debug, -vv for trace, -q for errors only).
    #[command(flatten)]
    pub verbosity: Verbosity<WarnLevel>,

    /// Control ANSI color output (auto, always, never).
    #[command(flatten)]
    pub color: Color,

    /// Explicit log level (overrides -v/-q flags).
    #[arg(long = "log-level", value_enum, global = true)]
    pub log_level: Option<LogLevelArg>,

    /// Log output format (pretty for human, json for machine parsing).
    #[arg(
        long = "log-format",
        value_enum,
        default_value = "pretty",
        global = true
    )]
    pub log_format: LogFormatArg,

    /// Write logs to a file instead of stderr.
    #[arg(long = "log-file", value_name = "PATH", global = true)]
    pub log_file: Option<PathBuf>,
}

#[derive(Subcommand)]
pub enum Command {
    /// Preprocess a CSV file and write the train/test artifacts.
    Run(RunArgs),

    /// Print column profiles and the target decision without processing.
    Profile(ProfileArgs),
}

#[derive(Parser)]
pub struct RunArgs {
    /// Path to the raw CSV file.
    #[arg(value_name = "CSV")]
    pub input: PathBuf,

    /// Target column (original or normalized name). Omit for unsupervised output.
    #[arg(long = "target", short = 't', value_name = "COLUMN")]
    pub target: Option<String>,

    /// Output directory for the CSV artifacts (default: <CSV dir>/output).
    #[arg(long = "output-dir", value_name = "DIR")]
    pub output_dir: Option<PathBuf>,

    /// Process and report without writing any files.
    #[arg(long = "dry-run")]
    pub dry_run: bool,

    /// Print the diagnostics as JSON instead of the summary tables.
    #[arg(long = "json")]
    pub json: bool,

    #[command(flatten)]
    pub prep: PrepArgs,
}

#[derive(Parser)]
pub struct ProfileArgs {
    /// Path to the raw CSV file.
    #[arg(value_name = "CSV")]
    pub input: PathBuf,

    /// Target column to validate.
    #[arg(long = "target", short = 't', value_name = "COLUMN")]
    pub target: Option<String>,

    /// Print the profiles as JSON.
    #[arg(long = "json")]
    pub json: bool,

    #[command(flatten)]
    pub prep: PrepArgs,
}

/// Engine options shared by every subcommand.
#[derive(Args, Clone)]
pub struct PrepArgs {
    /// Keep exact duplicate rows.
    #[arg(long = "no-dedupe")]
    pub no_dedupe: bool,

    /// Count outliers but leave values unclamped.
    #[arg(long = "no-cap-outliers")]
    pub no_cap_outliers: bool,

    /// Share of labelled rows used for training, in (0, 1).
    #[arg(long = "split-ratio", value_name = "RATIO", default_value_t = DEFAULT_SPLIT_RATIO)]
    pub split_ratio: f64,

    /// Seed for the train/test assignment.
    #[arg(long = "seed", default_value_t = DEFAULT_SEED)]
    pub seed: u64,

    /// Split classification targets without stratifying by class.
    #[arg(long = "no-stratify")]
    pub no_stratify: bool,

    /// IQR multiplier for outlier bounds.
    #[arg(long = "iqr-multiplier", value_name = "K", default_value_t = DEFAULT_IQR_MULTIPLIER)]
    pub iqr_multiplier: f64,

    /// Unique-value ratio above which a column counts as near-unique.
    #[arg(long = "id-threshold", value_name = "RATIO", default_value_t = DEFAULT_ID_UNIQUE_RATIO)]
    pub id_threshold: f64,

    /// Share of values that must parse as numbers for a numeric column.
    #[arg(
        long = "numeric-threshold",
        value_name = "RATIO",
        default_value_t = DEFAULT_NUMERIC_RATIO
    )]
    pub numeric_threshold: f64,

    /// Keep ID-like columns as features.
    #[arg(long = "keep-id-columns")]
    pub keep_id_columns: bool,
}

impl PrepArgs {
    pub fn to_options(&self) -> PrepOptions {
        PrepOptions::new()
            .with_remove_duplicates(!self.no_dedupe)
            .with_cap_outliers(!self.no_cap_outliers)
            .with_split_ratio(self.split_ratio)
            .with_seed(self.seed)
            .with_stratify(!self.no_stratify)
            .with_iqr_multiplier(self.iqr_multiplier)
            .with_id_unique_ratio(self.id_threshold)
            .with_numeric_ratio(self.numeric_threshold)
            .with_drop_id_like_features(!self.keep_id_columns)
    }
}

/// CLI log level choices.
#[derive(Clone, Copy, ValueEnum)]
pub enum LogLevelArg {
    Error,
    Warn,
    Info,
    Debug,
    Trace,
}

/// CLI log format choices.
#[derive(Clone, Copy, ValueEnum)]
pub enum LogFormatArg {
    Pretty,
    Compact,
    Json,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn flags_map_onto_options() {
        let cli = Cli::parse_from([
            "autoprep",
            "run",
            "data.csv",
            "--target",
            "Price",
            "--no-dedupe",
            "--split-ratio",
            "0.7",
            "--seed",
            "7",
            "--keep-id-columns",
        ]);
        let Command::Run(args) = cli.command else {
            panic!("expected run");
        };
        assert_eq!(args.target.as_deref(), Some("Price"));
        let options = args.prep.to_options();
        assert!(!options.remove_duplicates);
        assert!(options.cap_outliers);
        assert_eq!(options.split_ratio, 0.7);
        assert_eq!(options.seed, 7);
        assert!(!options.drop_id_like_features);
    }

    #[test]
    fn defaults_match_engine_defaults() {
        let cli = Cli::parse_from(["autoprep", "profile", "data.csv"]);
        let Command::Profile(args) = cli.command else {
            panic!("expected profile");
        };
        assert_eq!(args.prep.to_options(), PrepOptions::default());
    }
}
