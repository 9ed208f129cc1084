//! Folder mode: every GPX file under a directory is analyzed on its own and
//! the summaries are written to one CSV. Files never influence each other.

use std::fs::{self, File};
use std::io::BufReader;
use std::path::{Path, PathBuf};

use csv::Writer;
use gpx::read;
use rayon::prelude::*;
use serde::Serialize;
use tracing::{info, warn};
use walkdir::WalkDir;

use crate::config::AnalysisConfig;
use crate::error::{NgsError, Result};
use crate::gpx_loader::{extract_points, track_name, LoadOptions};
use crate::models::SummaryResult;
use crate::report::save_segments_csv;

pub const SUMMARY_FILENAME: &str = "ngs_summary.csv";

#[derive(Debug, Serialize)]
pub struct BatchResult {
    filename: String,
    track_name: String,
    points: usize,
    distance_km: f64,
    actual_duration_s: f64,
    overall_avg_speed_mps: f64,
    ngs_avg_speed_mps: f64,
    normalized_duration_s: f64,
    time_difference_s: f64,
    processing_status: String,
}

impl BatchResult {
    fn success(filename: String, track_name: String, points: usize, summary: &SummaryResult) -> Self {
        BatchResult {
            filename,
            track_name,
            points,
            distance_km: summary.total_distance_m / 1000.0,
            actual_duration_s: summary.actual_duration_s,
            overall_avg_speed_mps: summary.overall_avg_speed_mps,
            ngs_avg_speed_mps: summary.ngs_avg_speed_mps,
            normalized_duration_s: summary.normalized_duration_s,
            time_difference_s: summary.time_difference_s(),
            processing_status: "OK".to_string(),
        }
    }

    fn failure(filename: String, error: &NgsError) -> Self {
        BatchResult {
            filename,
            track_name: String::new(),
            points: 0,
            distance_km: 0.0,
            actual_duration_s: 0.0,
            overall_avg_speed_mps: 0.0,
            ngs_avg_speed_mps: 0.0,
            normalized_duration_s: 0.0,
            time_difference_s: 0.0,
            processing_status: format!("ERROR: {}", error),
        }
    }

    pub fn is_ok(&self) -> bool {
        self.processing_status == "OK"
    }
}

pub fn find_gpx_files(input_folder: &Path) -> Result<Vec<PathBuf>> {
    let mut gpx_files = Vec::new();
    for entry in WalkDir::new(input_folder) {
        let entry = entry.map_err(|e| NgsError::Io(e.into()))?;
        if entry.file_type().is_file() {
            if let Some(extension) = entry.path().extension() {
                if extension.to_str().unwrap_or("").eq_ignore_ascii_case("gpx") {
                    gpx_files.push(entry.path().to_path_buf());
                }
            }
        }
    }
    gpx_files.sort();
    Ok(gpx_files)
}

/// Analyzes every GPX file under `input_folder`. When `output_folder` is
/// given, each file's segment table and the batch summary are written there.
pub fn process_folder(
    input_folder: &Path,
    output_folder: Option<&Path>,
    load_options: &LoadOptions,
    config: &AnalysisConfig,
) -> Result<Vec<BatchResult>> {
    let gpx_files = find_gpx_files(input_folder)?;
    info!(files = gpx_files.len(), cores = num_cpus::get(), "processing GPX folder");

    if let Some(out) = output_folder {
        fs::create_dir_all(out)?;
    }

    let results: Vec<BatchResult> = gpx_files
        .par_iter()
        .map(|path| {
            let filename = display_name(path);
            match process_single_file(path, output_folder, load_options, config) {
                Ok(result) => result,
                Err(e) => {
                    warn!(file = %filename, error = %e, "analysis failed");
                    BatchResult::failure(filename, &e)
                }
            }
        })
        .collect();

    if let Some(out) = output_folder {
        save_batch_csv(&results, &out.join(SUMMARY_FILENAME))?;
    }

    Ok(results)
}

fn process_single_file(
    path: &Path,
    output_folder: Option<&Path>,
    load_options: &LoadOptions,
    config: &AnalysisConfig,
) -> Result<BatchResult> {
    let file = File::open(path)?;
    let gpx = read(BufReader::new(file)).map_err(|e| NgsError::Gpx(e.to_string()))?;

    let filename = display_name(path);
    let name = track_name(&gpx, load_options).unwrap_or_else(|| filename.clone());
    let points = extract_points(&gpx, load_options)?;
    let analysis = crate::compute_with(&points, config)?;

    if let Some(out) = output_folder {
        let stem = path.file_stem().map(|s| s.to_string_lossy().to_string()).unwrap_or_else(|| filename.clone());
        save_segments_csv(&analysis.segments, &out.join(format!("{}_segments.csv", stem)))?;
    }

    Ok(BatchResult::success(filename, name, points.len(), &analysis.summary))
}

fn display_name(path: &Path) -> String {
    path.file_name()
        .map(|n| n.to_string_lossy().to_string())
        .unwrap_or_else(|| "unknown".to_string())
}

pub fn save_batch_csv(results: &[BatchResult], output_path: &Path) -> Result<()> {
    let mut wtr = Writer::from_path(output_path)?;
    for result in results {
        wtr.serialize(result)?;
    }
    wtr.flush()?;
    Ok(())
}

pub fn print_batch_summary(results: &[BatchResult]) {
    let processed = results.iter().filter(|r| r.is_ok()).count();
    println!("\n📊 BATCH SUMMARY");
    println!("================");
    println!("✅ Processed {} out of {} GPX files", processed, results.len());

    for r in results {
        if r.is_ok() {
            println!(
                "  {} ({}): {:.2} km, NGS {:.3} m/s, flat-course difference {:+.0}s",
                r.filename, r.track_name, r.distance_km, r.ngs_avg_speed_mps, r.time_difference_s
            );
        } else {
            println!("  ❌ {}: {}", r.filename, r.processing_status);
        }
    }
}
