//! Presentation: segment table export and the console summary.
//!
//! Everything computed stays in SI units; conversion happens only here.

use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;

use csv::Writer;

use crate::error::Result;
use crate::models::{SegmentRecord, SummaryResult};
use crate::ngs_transformer::gradient_factor;

const MPS_TO_KMH: f64 = 3.6;
const MPS_TO_MPH: f64 = 2.236_936_292_054_402;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SpeedUnit {
    #[default]
    MetersPerSecond,
    KilometersPerHour,
    MilesPerHour,
    /// Minutes per kilometer
    PacePerKm,
}

impl SpeedUnit {
    pub fn label(&self) -> &'static str {
        match self {
            SpeedUnit::MetersPerSecond => "m/s",
            SpeedUnit::KilometersPerHour => "km/h",
            SpeedUnit::MilesPerHour => "mph",
            SpeedUnit::PacePerKm => "min/km",
        }
    }

    pub fn format(&self, speed_mps: f64) -> String {
        match self {
            SpeedUnit::MetersPerSecond => format!("{:.3} {}", speed_mps, self.label()),
            SpeedUnit::KilometersPerHour => format!("{:.2} {}", speed_mps * MPS_TO_KMH, self.label()),
            SpeedUnit::MilesPerHour => format!("{:.2} {}", speed_mps * MPS_TO_MPH, self.label()),
            SpeedUnit::PacePerKm => {
                if speed_mps <= 0.0 {
                    return format!("--:-- {}", self.label());
                }
                let secs_per_km = (1000.0 / speed_mps).round() as i64;
                format!("{}:{:02} {}", secs_per_km / 60, secs_per_km % 60, self.label())
            }
        }
    }
}

/// `h:mm:ss`, or `m:ss` under an hour. Negative durations get a leading `-`.
pub fn format_duration(seconds: f64) -> String {
    let sign = if seconds < 0.0 { "-" } else { "" };
    let total = seconds.abs().round() as i64;
    let (h, m, s) = (total / 3600, (total % 3600) / 60, total % 60);
    if h > 0 {
        format!("{}{}:{:02}:{:02}", sign, h, m, s)
    } else {
        format!("{}{}:{:02}", sign, m, s)
    }
}

pub fn write_segments_csv<W: Write>(records: &[SegmentRecord], writer: W) -> Result<()> {
    let mut wtr = Writer::from_writer(writer);
    for record in records {
        wtr.serialize(record)?;
    }
    wtr.flush()?;
    Ok(())
}

pub fn save_segments_csv(records: &[SegmentRecord], output_path: &Path) -> Result<()> {
    let file = File::create(output_path)?;
    write_segments_csv(records, BufWriter::new(file))
}

pub fn print_summary(name: &str, summary: &SummaryResult, unit: SpeedUnit) {
    println!("\n🏃 NORMALIZED GRADED SPEED: {}", name);
    println!("================================");
    println!("Distance:            {:.2} km", summary.total_distance_m / 1000.0);
    println!("Actual time:         {}", format_duration(summary.actual_duration_s));
    println!("Average speed:       {}", unit.format(summary.overall_avg_speed_mps));
    println!("NGS average speed:   {}", unit.format(summary.ngs_avg_speed_mps));
    println!("Flat-course time:    {}", format_duration(summary.normalized_duration_s));

    println!("{}", describe_time_difference(summary));
}

/// The NGS flat-ground factor is P(0) = 0.98462, so an entirely flat run
/// already reads about 1.6% slower on the flat course than it actually was.
pub fn describe_time_difference(summary: &SummaryResult) -> String {
    let diff = summary.time_difference_s();
    let flat_factor = gradient_factor(0.0);
    let baseline_pct = (1.0 / flat_factor - 1.0) * 100.0;
    let direction = if diff < 0.0 {
        format!("⛰️  Flat-course time is {} faster than actual", format_duration(-diff))
    } else if diff > 0.0 {
        format!("⬇️  Flat-course time is {} slower than actual", format_duration(diff))
    } else {
        "Flat-course time equals actual".to_string()
    };
    format!(
        "{} (flat-ground factor {}: an all-flat run reads {:.1}% slower)",
        direction, flat_factor, baseline_pct
    )
}
