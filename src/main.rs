use std::io;
use std::path::PathBuf;

use anyhow::{anyhow, Context, Result};
use clap::{ArgAction, Args, Parser, Subcommand, ValueEnum, ValueHint};
use grade_adjusted_pace::batch_processor::{print_batch_summary, process_folder};
use grade_adjusted_pace::gpx_loader::load_track;
use grade_adjusted_pace::race_distance_filter::parse_race_distance;
use grade_adjusted_pace::report::{print_summary, save_segments_csv, SpeedUnit};
use grade_adjusted_pace::{compute_with, AnalysisConfig, DistanceModel, LoadOptions};
use tracing::info;
use tracing_subscriber::EnvFilter;

#[derive(Parser, Debug)]
#[command(author, version, about = "Normalized graded speed for running GPX tracks", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Command,

    /// Verbose diagnostics on stderr
    #[arg(short, long, global = true, action = ArgAction::SetTrue)]
    verbose: bool,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Analyze a single GPX recording
    Analyze(AnalyzeArgs),
    /// Analyze every GPX file under a folder
    Batch(BatchArgs),
}

#[derive(Args, Debug)]
struct CommonArgs {
    /// Track index inside the GPX file
    #[arg(long, default_value_t = 0)]
    track: usize,

    /// Segment index inside the selected track
    #[arg(long, default_value_t = 0)]
    segment: usize,

    /// Drop waypoints missing elevation or time instead of failing
    #[arg(long, action = ArgAction::SetTrue)]
    skip_incomplete: bool,

    /// Horizontal distance model
    #[arg(long, value_enum, default_value_t = DistanceOpt::Geodesic)]
    distance: DistanceOpt,

    /// Cut the track at a race distance (5k, 10k, half, marathon, 3.2km, 800m)
    #[arg(long)]
    race_distance: Option<String>,

    /// Run the per-segment transform on a single thread
    #[arg(long, action = ArgAction::SetTrue)]
    sequential: bool,
}

#[derive(Args, Debug)]
struct AnalyzeArgs {
    /// GPX file to analyze
    #[arg(value_hint = ValueHint::FilePath)]
    input: PathBuf,

    /// Write the per-segment table to this CSV
    #[arg(short, long, value_hint = ValueHint::FilePath)]
    output: Option<PathBuf>,

    /// Unit for reported speeds
    #[arg(long, value_enum, default_value_t = UnitOpt::Mps)]
    unit: UnitOpt,

    #[command(flatten)]
    common: CommonArgs,
}

#[derive(Args, Debug)]
struct BatchArgs {
    /// Folder searched recursively for .gpx files
    #[arg(value_hint = ValueHint::DirPath)]
    input: PathBuf,

    /// Folder for per-file segment tables and the summary CSV
    #[arg(short, long, value_hint = ValueHint::DirPath)]
    output: Option<PathBuf>,

    #[command(flatten)]
    common: CommonArgs,
}

#[derive(Copy, Clone, Debug, ValueEnum)]
enum DistanceOpt {
    Geodesic,
    Haversine,
}

impl From<DistanceOpt> for DistanceModel {
    fn from(value: DistanceOpt) -> Self {
        match value {
            DistanceOpt::Geodesic => DistanceModel::Geodesic,
            DistanceOpt::Haversine => DistanceModel::Haversine,
        }
    }
}

#[derive(Copy, Clone, Debug, ValueEnum)]
enum UnitOpt {
    Mps,
    Kmh,
    Mph,
    Pace,
}

impl From<UnitOpt> for SpeedUnit {
    fn from(value: UnitOpt) -> Self {
        match value {
            UnitOpt::Mps => SpeedUnit::MetersPerSecond,
            UnitOpt::Kmh => SpeedUnit::KilometersPerHour,
            UnitOpt::Mph => SpeedUnit::MilesPerHour,
            UnitOpt::Pace => SpeedUnit::PacePerKm,
        }
    }
}

impl CommonArgs {
    fn load_options(&self) -> LoadOptions {
        LoadOptions {
            track_index: self.track,
            segment_index: self.segment,
            skip_incomplete: self.skip_incomplete,
        }
    }

    fn analysis_config(&self) -> Result<AnalysisConfig> {
        let race_distance_m = self
            .race_distance
            .as_deref()
            .map(parse_race_distance)
            .transpose()?;
        Ok(AnalysisConfig {
            distance_model: self.distance.into(),
            parallel: !self.sequential,
            race_distance_m,
        })
    }
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    let default_level = if cli.verbose { "debug" } else { "info" };
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .try_init();

    match cli.command {
        Command::Analyze(args) => handle_analyze(args),
        Command::Batch(args) => handle_batch(args),
    }
}

fn handle_analyze(args: AnalyzeArgs) -> Result<()> {
    let config = args.common.analysis_config()?;
    let points = load_track(&args.input, &args.common.load_options())
        .with_context(|| format!("failed to load {}", args.input.display()))?;
    let analysis = compute_with(&points, &config)
        .with_context(|| format!("failed to analyze {}", args.input.display()))?;

    let name = args
        .input
        .file_name()
        .map(|n| n.to_string_lossy().to_string())
        .unwrap_or_else(|| args.input.display().to_string());
    print_summary(&name, &analysis.summary, args.unit.into());

    if let Some(output) = args.output.as_deref() {
        save_segments_csv(&analysis.segments, output)
            .with_context(|| format!("failed to write {}", output.display()))?;
        info!(file = %output.display(), rows = analysis.segments.len(), "wrote segment table");
        println!("📁 Segment table saved to: {}", output.display());
    }

    Ok(())
}

fn handle_batch(args: BatchArgs) -> Result<()> {
    if !args.input.is_dir() {
        return Err(anyhow!("{} is not a directory", args.input.display()));
    }
    let config = args.common.analysis_config()?;
    let results = process_folder(
        &args.input,
        args.output.as_deref(),
        &args.common.load_options(),
        &config,
    )
    .with_context(|| format!("failed to process {}", args.input.display()))?;

    print_batch_summary(&results);
    if let Some(output) = args.output.as_deref() {
        println!("📁 Results saved to: {}", output.display());
    }
    Ok(())
}
