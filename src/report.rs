use std::io;

use console::Term;
use tracing::debug;

use crate::stats::{
    average_speed, mean_and_stddev, segment_speeds, segment_summary, total_elevation_change,
    SegmentSummary, Summary, DEFAULT_MIN_SEGMENT_SPEED,
};
use crate::tcx::Samples;
use crate::units::{ElevationUnit, SpeedUnit};

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Metric {
    HeartRate,
    Cadence,
    Power,
    /// Endpoint average speed, with the spread of the kept segment speeds.
    Speed,
    /// Statistics of the speed recorded by the device, printed under the `Speed` label.
    SensorSpeed,
    Segments,
    Elevation,
}

impl Metric {
    pub const DEFAULT: [Metric; 6] = [
        Metric::HeartRate,
        Metric::Cadence,
        Metric::Power,
        Metric::Speed,
        Metric::Segments,
        Metric::Elevation,
    ];
}

#[derive(Clone, Debug, PartialEq)]
pub struct Config {
    pub speed_unit: SpeedUnit,
    pub elevation_unit: ElevationUnit,
    pub min_segment_speed: f64,
    pub metrics: Vec<Metric>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            speed_unit: SpeedUnit::Mph,
            elevation_unit: ElevationUnit::Feet,
            min_segment_speed: DEFAULT_MIN_SEGMENT_SPEED,
            metrics: Metric::DEFAULT.to_vec(),
        }
    }
}

#[derive(Clone, Debug, PartialEq)]
pub enum Entry {
    Field {
        label: &'static str,
        unit: &'static str,
        summary: Summary,
    },
    Speed {
        average: Option<f64>,
        segments: Summary,
    },
    Segments(Option<SegmentSummary>),
    Elevation(f64),
}

#[derive(Clone, Debug, PartialEq)]
pub struct Report {
    speed_unit: SpeedUnit,
    elevation_unit: ElevationUnit,
    min_segment_speed: f64,
    entries: Vec<Entry>,
}

impl Report {
    pub fn build(samples: &Samples, config: &Config) -> Self {
        let unit = config.speed_unit;
        let (times, distances) = samples.timeline_columns();
        let segments = segment_speeds(&times, &distances, config.min_segment_speed, unit);
        debug!(
            timeline = times.len(),
            kept_segments = segments.len(),
            "computed segment speeds"
        );

        let entries = config
            .metrics
            .iter()
            .map(|metric| match metric {
                Metric::HeartRate => Entry::Field {
                    label: "Heart Rate",
                    unit: "bpm",
                    summary: mean_and_stddev(&samples.heart_rates),
                },
                Metric::Cadence => Entry::Field {
                    label: "Cadence",
                    unit: "rpm",
                    summary: mean_and_stddev(&samples.cadences),
                },
                Metric::Power => Entry::Field {
                    label: "Power",
                    unit: "watts",
                    summary: mean_and_stddev(&samples.powers),
                },
                Metric::SensorSpeed => {
                    let speeds: Vec<f64> = samples
                        .speeds
                        .iter()
                        .map(|mps| unit.convert(*mps))
                        .collect();
                    Entry::Field {
                        label: "Speed",
                        unit: unit.label(),
                        summary: mean_and_stddev(&speeds),
                    }
                }
                Metric::Speed => Entry::Speed {
                    average: average_speed(&times, &distances, unit),
                    segments: mean_and_stddev(&segments),
                },
                Metric::Segments => Entry::Segments(segment_summary(&segments)),
                Metric::Elevation => Entry::Elevation(total_elevation_change(
                    &samples.altitudes,
                    config.elevation_unit,
                )),
            })
            .collect();

        Self {
            speed_unit: unit,
            elevation_unit: config.elevation_unit,
            min_segment_speed: config.min_segment_speed,
            entries,
        }
    }

    pub fn entries(&self) -> &[Entry] {
        &self.entries
    }

    /// The report as console lines. Blank separator lines are empty strings.
    pub fn lines(&self) -> Vec<String> {
        let u = self.speed_unit;
        let mut lines = Vec::new();

        for entry in &self.entries {
            match entry {
                Entry::Field {
                    label,
                    unit,
                    summary,
                } => lines.push(field_line(label, unit, summary)),
                Entry::Speed {
                    average: Some(average),
                    segments,
                } if !segments.is_empty() => lines.push(format!(
                    "Speed: Avg = {:.2} {u}, StdDev = {:.2} {u} (n={})",
                    average, segments.stddev, segments.count
                )),
                Entry::Speed { .. } => lines.push("Speed: No data".to_string()),
                Entry::Segments(Some(s)) => {
                    lines.push(String::new());
                    lines.push(format!(
                        "Segment Speed Stats: Avg = {:.2} {u}, StdDev = {:.2} {u}, Min = {:.2} {u}, Max = {:.2} {u}",
                        s.mean, s.stddev, s.min, s.max
                    ));
                }
                Entry::Segments(None) => lines.push(format!(
                    "No segment speeds >= {} {u} could be calculated.",
                    self.min_segment_speed
                )),
                Entry::Elevation(change) => {
                    lines.push(String::new());
                    lines.push(format!(
                        "Total Elevation Change: {:.2} {}",
                        change, self.elevation_unit
                    ));
                }
            }
        }

        lines
    }

    pub fn print(&self) -> io::Result<()> {
        let term = Term::stdout();
        for line in self.lines() {
            term.write_line(&line)?;
        }
        Ok(())
    }
}

fn field_line(label: &str, unit: &str, summary: &Summary) -> String {
    if summary.is_empty() {
        return format!("{}: No data", label);
    }
    format!(
        "{}: Avg = {:.2} {unit}, StdDev = {:.2} {unit} (n={})",
        label, summary.mean, summary.stddev, summary.count
    )
}
