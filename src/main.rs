//! RDF position error CLI
//!
//! Evaluate a single two-sensor scenario or run a parametric study, print
//! the results and optionally export them as CSV or JSON.

use std::num::NonZeroUsize;
use std::path::{Path, PathBuf};

use clap::{Parser, Subcommand};
use rdf_position_error::api::{
    ApiResult, JsonFormatter, OutputFormat, ReportFormatter, TabularExporter, TextFormatter,
    Workbook,
};
use rdf_position_error::processing::ParametricStudy;
use rdf_position_error::utils::{AnalysisConfig, ConfigurationManager};
use rdf_position_error::validation::{ScenarioInput, ScenarioValidator};
use rdf_position_error::{BearingErrorBudget, Point2D, Scenario};
use tracing::{debug, warn};
use tracing_subscriber::{EnvFilter, FmtSubscriber};

/// Rows printed by the text study table
const STUDY_PREVIEW_ROWS: usize = 10;

/// Two-sensor bearing-only position error model
#[derive(Parser, Debug)]
#[command(name = "rdf-error")]
#[command(about = "Estimate position error for a two-sensor RDF fix", long_about = None)]
struct Args {
    /// JSON configuration file with defaults and thresholds
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    /// Verbose output
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Evaluate one scenario
    Evaluate(EvaluateArgs),
    /// Sweep bearing error and target range over a symmetric layout
    Study(StudyArgs),
}

#[derive(clap::Args, Debug)]
struct EvaluateArgs {
    /// Sensor 1 X coordinate
    #[arg(long, allow_negative_numbers = true)]
    s1_x: Option<f64>,

    /// Sensor 1 Y coordinate
    #[arg(long, allow_negative_numbers = true)]
    s1_y: Option<f64>,

    /// Sensor 2 X coordinate
    #[arg(long, allow_negative_numbers = true)]
    s2_x: Option<f64>,

    /// Sensor 2 Y coordinate
    #[arg(long, allow_negative_numbers = true)]
    s2_y: Option<f64>,

    /// Target X coordinate
    #[arg(long, allow_negative_numbers = true)]
    target_x: Option<f64>,

    /// Target Y coordinate
    #[arg(long, allow_negative_numbers = true)]
    target_y: Option<f64>,

    /// 1-sigma bearing error in degrees
    #[arg(short, long)]
    bearing_error: Option<f64>,

    /// Coordinates are in kilometers and checked against the configured input limits
    #[arg(long)]
    km: bool,

    /// One-line summary instead of the full table
    #[arg(long)]
    compact: bool,

    /// JSON output
    #[arg(long)]
    json: bool,

    /// Export configuration and results (.csv or .json)
    #[arg(long)]
    export: Option<PathBuf>,
}

#[derive(clap::Args, Debug)]
struct StudyArgs {
    /// Distance between sensors in meters
    #[arg(long)]
    baseline: Option<f64>,

    /// Comma-separated bearing errors in degrees
    #[arg(long, value_delimiter = ',')]
    bearing_errors: Option<Vec<f64>>,

    /// Comma-separated target ranges in meters
    #[arg(long, value_delimiter = ',')]
    ranges: Option<Vec<f64>>,

    /// Worker threads
    #[arg(short, long)]
    workers: Option<NonZeroUsize>,

    /// JSON output
    #[arg(long)]
    json: bool,

    /// Export the study table (.csv or .json)
    #[arg(long)]
    export: Option<PathBuf>,
}

fn main() {
    let args = Args::parse();

    // Initialize logging; RUST_LOG takes precedence over --verbose
    let default_level = if args.verbose { "debug" } else { "info" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));
    let subscriber = FmtSubscriber::builder()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .finish();
    if let Err(e) = tracing::subscriber::set_global_default(subscriber) {
        eprintln!("Error: failed to set tracing subscriber: {}", e);
        std::process::exit(1);
    }

    let config = match load_config(args.config.as_deref()) {
        Ok(config) => config,
        Err(e) => {
            eprintln!("Error: {}", e);
            std::process::exit(1);
        }
    };

    let result = match &args.command {
        Command::Evaluate(evaluate) => run_evaluate(&config, evaluate),
        Command::Study(study) => run_study(&config, study),
    };

    if let Err(e) = result {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}

fn load_config(path: Option<&Path>) -> ApiResult<AnalysisConfig> {
    let Some(path) = path else {
        return Ok(AnalysisConfig::default());
    };

    let manager = ConfigurationManager::from_file(path)?;
    Ok(manager.config().clone())
}

fn build_scenario(config: &AnalysisConfig, args: &EvaluateArgs) -> ApiResult<Scenario> {
    let base = config.scenario;
    let bearing_error_deg = args.bearing_error.unwrap_or(base.bearing_error.degrees());

    if args.km {
        let km = |value: f64| value / 1000.0;
        let input = ScenarioInput {
            sensor1_km: (args.s1_x.unwrap_or(km(base.sensor1.x)), args.s1_y.unwrap_or(km(base.sensor1.y))),
            sensor2_km: (args.s2_x.unwrap_or(km(base.sensor2.x)), args.s2_y.unwrap_or(km(base.sensor2.y))),
            target_km: (args.target_x.unwrap_or(km(base.target.x)), args.target_y.unwrap_or(km(base.target.y))),
            bearing_error_deg,
        };
        return Ok(input.to_scenario(&config.limits)?);
    }

    let scenario = Scenario::new(
        Point2D::new(args.s1_x.unwrap_or(base.sensor1.x), args.s1_y.unwrap_or(base.sensor1.y)),
        Point2D::new(args.s2_x.unwrap_or(base.sensor2.x), args.s2_y.unwrap_or(base.sensor2.y)),
        Point2D::new(args.target_x.unwrap_or(base.target.x), args.target_y.unwrap_or(base.target.y)),
        BearingErrorBudget::from_degrees(bearing_error_deg),
    );
    ScenarioValidator::validate(&scenario)?;
    Ok(scenario)
}

fn run_evaluate(config: &AnalysisConfig, args: &EvaluateArgs) -> ApiResult<()> {
    let scenario = build_scenario(config, args)?;
    let report = scenario.evaluate();
    debug!(
        branch = ?report.branch,
        intersection_angle_deg = report.intersection_angle_deg,
        gdop = report.gdop,
        max_position_error = report.max_position_error,
        "scenario evaluated"
    );
    if report.is_degenerate() {
        warn!("degenerate geometry, position error uses the fallback bound");
    }

    let formatted = ReportFormatter::with_thresholds(config.advisories).format(&scenario, &report);
    if args.json || config.output.format == OutputFormat::Json {
        let formatter = JsonFormatter {
            pretty: config.output.pretty_json,
        };
        println!("{}", formatter.format_json(&formatted)?);
    } else if args.compact {
        println!("{}", TextFormatter::compact().format_text(&formatted));
    } else {
        print!("{}", TextFormatter::new().format_text(&formatted));
    }

    if let Some(path) = &args.export {
        let workbook = Workbook::from_evaluations(&[(scenario, report)]);
        exporter_for(config, path)?.write(&workbook, path)?;
    }
    Ok(())
}

fn run_study(config: &AnalysisConfig, args: &StudyArgs) -> ApiResult<()> {
    let defaults = &config.study;
    let study = ParametricStudy::new(
        args.baseline.unwrap_or(defaults.baseline_m),
        args.bearing_errors.clone().unwrap_or_else(|| defaults.bearing_errors_deg.clone()),
        args.ranges.clone().unwrap_or_else(|| defaults.ranges_m.clone()),
    );
    ScenarioValidator::validate_sweep(study.baseline_m, &study.bearing_errors_deg, &study.ranges_m)?;

    let workers = args
        .workers
        .or_else(|| NonZeroUsize::new(config.output.study_workers))
        .unwrap_or(NonZeroUsize::MIN);
    let rows = study.run_parallel(workers);
    let workbook = Workbook::from_study(&rows);

    if args.json || config.output.format == OutputFormat::Json {
        println!("{}", TabularExporter::render_json(&workbook)?);
    } else {
        print!("{}", TextFormatter::new().format_study(&rows, Some(STUDY_PREVIEW_ROWS)));
    }

    if let Some(path) = &args.export {
        exporter_for(config, path)?.write(&workbook, path)?;
    }
    Ok(())
}

/// Format from the file extension, or the configured default when there is none
fn exporter_for(config: &AnalysisConfig, path: &Path) -> ApiResult<TabularExporter> {
    if path.extension().is_none() {
        return Ok(TabularExporter::new(config.output.export_format));
    }
    TabularExporter::for_path(path)
}
