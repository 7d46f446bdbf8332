//! Top-level application orchestration.
//!
//! `src/main.rs` is intentionally tiny; this module is the "real main" that:
//! - parses CLI arguments and sets up logging
//! - runs the load/clean/fit pipeline
//! - prints reports/plots
//! - writes optional exports
//! - generates synthetic datasets

use clap::Parser;
use tracing::info;

use crate::cli::{Cli, Command, FitArgs, SampleArgs};
use crate::data::{SynthConfig, generate_profile, write_dataset_csv};
use crate::domain::{FitConfig, SolverOptions};
use crate::error::AppError;

pub mod pipeline;

/// Entry point for the `lapse` binary.
pub fn run() -> Result<(), AppError> {
    dotenvy::dotenv().ok();
    let cli = Cli::parse();
    crate::logging::init_cli_logger(cli.verbose);

    match cli.command {
        Command::Fit(args) => handle_fit(&fit_config_from_args(&args)),
        Command::Sample(args) => handle_sample(&synth_config_from_args(&args), &args),
    }
}

fn handle_fit(config: &FitConfig) -> Result<(), AppError> {
    let run = pipeline::run_fit(config)?;
    println!("{}", render_report(config, &run)?);

    // Optional exports.
    if let Some(path) = &config.svg_path {
        crate::plot::write_svg_plot(path, &run.cleaned, &run.fit)?;
        info!(path = %path.display(), "wrote SVG chart");
    }
    if let Some(path) = &config.export_summary {
        crate::io::write_summary_json(path, &run.fit.summary())?;
        info!(path = %path.display(), "wrote summary JSON");
    }
    if let Some(path) = &config.export_fitted {
        let residuals = crate::report::compute_residuals(&run.cleaned, &run.fit)?;
        crate::io::write_fitted_csv(path, &residuals)?;
        info!(path = %path.display(), rows = residuals.len(), "wrote fitted CSV");
    }

    Ok(())
}

/// Everything `lapse fit` prints to stdout.
fn render_report(config: &FitConfig, run: &pipeline::RunOutput) -> Result<String, AppError> {
    if config.json {
        return serde_json::to_string_pretty(&run.fit.summary())
            .map_err(|e| AppError::Output(format!("Failed to encode summary JSON: {e}")));
    }

    let mut out = crate::report::format_run_summary(run.dataset.len(), &run.cleaned, &run.fit);
    if config.residuals {
        let rows = crate::report::compute_residuals(&run.cleaned, &run.fit)?;
        out.push('\n');
        out.push_str(&crate::report::format_residual_table(&rows));
    }
    if config.plot {
        out.push('\n');
        out.push_str(&crate::plot::render_ascii_plot(
            &run.cleaned,
            &run.fit,
            config.plot_width,
            config.plot_height,
        ));
    }
    Ok(out)
}

fn handle_sample(config: &SynthConfig, args: &SampleArgs) -> Result<(), AppError> {
    let dataset = generate_profile(config)?;
    write_dataset_csv(&args.out, &dataset)?;
    info!(
        path = %args.out.display(),
        rows = dataset.len(),
        mean_k = crate::data::synth::mean_temperature_k(&dataset),
        "wrote synthetic profile"
    );
    Ok(())
}

pub fn fit_config_from_args(args: &FitArgs) -> FitConfig {
    FitConfig {
        csv_path: args.csv.clone(),
        solver: SolverOptions {
            max_evals: args.max_evals,
            ..SolverOptions::default()
        },
        plot: !args.no_plot,
        plot_width: args.width,
        plot_height: args.height,
        residuals: args.residuals,
        svg_path: args.svg.clone(),
        json: args.json,
        export_summary: args.export_summary.clone(),
        export_fitted: args.export_fitted.clone(),
    }
}

pub fn synth_config_from_args(args: &SampleArgs) -> SynthConfig {
    SynthConfig {
        n: args.count,
        altitude_min: args.alt_min,
        altitude_max: args.alt_max,
        lapse_rate: args.rate,
        t0_k: args.t0,
        noise_k: args.noise,
        missing_fraction: args.missing,
        seed: args.seed,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fit_and_export_round_trip_through_files() {
        let dir = tempfile::tempdir().unwrap();
        let csv = dir.path().join("profile.csv");
        let sample = SampleArgs::parse_from(["sample", csv.to_str().unwrap(), "--missing", "0.1"]);
        handle_sample(&synth_config_from_args(&sample), &sample).unwrap();

        let summary_path = dir.path().join("summary.json");
        let fitted_path = dir.path().join("fitted.csv");
        let svg_path = dir.path().join("fit.svg");
        let args = FitArgs::parse_from([
            "fit",
            csv.to_str().unwrap(),
            "--no-plot",
            "--json",
            "--svg",
            svg_path.to_str().unwrap(),
            "--export-summary",
            summary_path.to_str().unwrap(),
            "--export-fitted",
            fitted_path.to_str().unwrap(),
        ]);
        let config = fit_config_from_args(&args);
        assert!(!config.plot);
        handle_fit(&config).unwrap();

        let summary: crate::domain::FitSummary =
            serde_json::from_str(&std::fs::read_to_string(&summary_path).unwrap()).unwrap();
        assert!((summary.r - 6.5).abs() < 0.15, "{summary:?}");
        assert!(svg_path.exists());
        let fitted = std::fs::read_to_string(&fitted_path).unwrap();
        assert!(fitted.lines().count() > 2);
    }

    fn fit_profile(extra: &[&str]) -> (FitConfig, pipeline::RunOutput) {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        std::io::Write::write_all(
            &mut file,
            b"Altitude (km),Temperature (C)\n0,15\n1,8.4\n2,2.1\n,7\n3,-4.5\n",
        )
        .unwrap();
        let mut argv = vec!["fit", file.path().to_str().unwrap(), "--no-plot"];
        argv.extend_from_slice(extra);
        let config = fit_config_from_args(&FitArgs::parse_from(argv));
        let run = pipeline::run_fit(&config).unwrap();
        (config, run)
    }

    #[test]
    fn residual_table_is_printed_on_request() {
        let (config, run) = fit_profile(&["--residuals"]);
        assert!(config.residuals);
        let report = render_report(&config, &run).unwrap();
        assert!(report.contains("Rows: read=5 | dropped=1 | used=4"), "{report}");
        assert!(report.contains("observed_K"), "{report}");
        let table_rows = report
            .lines()
            .skip_while(|l| !l.contains("observed_K"))
            .skip(2)
            .filter(|l| !l.trim().is_empty())
            .count();
        assert_eq!(table_rows, 4, "{report}");

        let (config, run) = fit_profile(&[]);
        assert!(!render_report(&config, &run).unwrap().contains("observed_K"));
    }

    #[test]
    fn json_report_is_only_the_summary() {
        let (config, run) = fit_profile(&["--json", "--residuals"]);
        let report = render_report(&config, &run).unwrap();
        let summary: crate::domain::FitSummary = serde_json::from_str(&report).unwrap();
        assert_eq!(summary, run.fit.summary());
    }
}
