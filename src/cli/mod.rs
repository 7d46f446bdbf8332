//! Command-line parsing for the lapse-rate fitter.
//!
//! The goal of this module is to keep **argument parsing** separate from the
//! fitting code. Arguments are resolved into domain config structs in `app`.

use std::path::PathBuf;

use clap::{Parser, Subcommand};

/// Top-level CLI.
#[derive(Debug, Parser)]
#[command(name = "lapse", version, about = "Fit a linear lapse rate to altitude/temperature data")]
pub struct Cli {
    /// Enable debug logging.
    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Command,
}

/// CLI subcommands.
#[derive(Debug, Subcommand)]
pub enum Command {
    /// Fit `T = -r * h + T0` to a CSV with `Altitude (km)` and `Temperature (C)` columns.
    Fit(FitArgs),
    /// Write a synthetic altitude/temperature CSV.
    Sample(SampleArgs),
}

/// Options for fitting.
#[derive(Debug, Parser, Clone)]
pub struct FitArgs {
    /// Input CSV file.
    #[arg(value_name = "CSV")]
    pub csv: PathBuf,

    /// Disable the terminal plot.
    #[arg(long)]
    pub no_plot: bool,

    /// Plot width (columns).
    #[arg(long, default_value_t = 72)]
    pub width: usize,

    /// Plot height (rows).
    #[arg(long, default_value_t = 20)]
    pub height: usize,

    /// Print per-point fitted values and residuals after the summary.
    #[arg(long)]
    pub residuals: bool,

    /// Also write the chart to an SVG file.
    #[arg(long, value_name = "SVG")]
    pub svg: Option<PathBuf>,

    /// Print only the `{r, r_error, T0, T0_error}` summary as JSON.
    #[arg(long)]
    pub json: bool,

    /// Export the summary to a JSON file.
    #[arg(long = "export-summary", value_name = "JSON")]
    pub export_summary: Option<PathBuf>,

    /// Export per-point fitted values and residuals to CSV.
    #[arg(long = "export-fitted", value_name = "CSV")]
    pub export_fitted: Option<PathBuf>,

    /// Residual evaluation budget for the solver.
    #[arg(long, default_value_t = 600)]
    pub max_evals: usize,
}

/// Options for synthetic data generation.
#[derive(Debug, Parser, Clone)]
pub struct SampleArgs {
    /// Output CSV file.
    #[arg(value_name = "OUT")]
    pub out: PathBuf,

    /// Number of rows.
    #[arg(short = 'n', long, default_value_t = 50)]
    pub count: usize,

    /// Lowest altitude (km).
    #[arg(long, default_value_t = 0.0)]
    pub alt_min: f64,

    /// Highest altitude (km).
    #[arg(long, default_value_t = 11.0)]
    pub alt_max: f64,

    /// True lapse rate (K/km).
    #[arg(long, default_value_t = 6.5)]
    pub rate: f64,

    /// True temperature at zero altitude (K).
    #[arg(long, default_value_t = 288.15)]
    pub t0: f64,

    /// Standard deviation of temperature noise (K).
    #[arg(long, default_value_t = 0.5)]
    pub noise: f64,

    /// Fraction of rows with a blank temperature.
    #[arg(long, default_value_t = 0.0)]
    pub missing: f64,

    /// Random seed.
    #[arg(long, default_value_t = 42)]
    pub seed: u64,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_fit_with_defaults() {
        let cli = Cli::parse_from(["lapse", "fit", "data.csv"]);
        let Command::Fit(args) = cli.command else {
            panic!("expected fit");
        };
        assert_eq!(args.csv, PathBuf::from("data.csv"));
        assert!(!args.no_plot);
        assert!(!args.json);
        assert!(!args.residuals);
        assert_eq!(args.max_evals, 600);
        assert!(!cli.verbose);
    }

    #[test]
    fn parses_sample_options() {
        let cli = Cli::parse_from(["lapse", "-v", "sample", "out.csv", "-n", "10", "--noise", "0.1", "--missing", "0.2"]);
        let Command::Sample(args) = cli.command else {
            panic!("expected sample");
        };
        assert!(cli.verbose);
        assert_eq!(args.count, 10);
        assert_eq!(args.noise, 0.1);
        assert_eq!(args.missing, 0.2);
        assert_eq!(args.seed, 42);
    }
}
