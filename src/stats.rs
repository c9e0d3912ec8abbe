//! Descriptive statistics and derived speed/elevation metrics.
//!
//! Every function here is a pure transformation over already extracted sample
//! sequences. Absence of data is a value (`count == 0`, `None` or `0.0`), never an
//! error.

use chrono::{DateTime, Utc};

use crate::units::{ElevationUnit, SpeedUnit};

/// Segment speeds below this value (in the output unit) are ignored by default.
pub const DEFAULT_MIN_SEGMENT_SPEED: f64 = 5.0;

/// Population mean and standard deviation of a sample sequence.
///
/// `count == 0` means the sequence was empty; `mean` and `stddev` are then `0.0`
/// and must not be shown as real values.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Summary {
    pub mean: f64,
    pub stddev: f64,
    pub count: usize,
}

impl Summary {
    pub const EMPTY: Summary = Summary {
        mean: 0.0,
        stddev: 0.0,
        count: 0,
    };

    pub fn is_empty(&self) -> bool {
        self.count == 0
    }
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct SegmentSummary {
    pub mean: f64,
    pub stddev: f64,
    pub min: f64,
    pub max: f64,
    pub count: usize,
}

pub fn mean_and_stddev(values: &[f64]) -> Summary {
    if values.is_empty() {
        return Summary::EMPTY;
    }

    let n = values.len() as f64;
    let mean = values.iter().sum::<f64>() / n;
    let variance = values.iter().map(|v| (v - mean) * (v - mean)).sum::<f64>() / n;

    Summary {
        mean,
        stddev: variance.sqrt(),
        count: values.len(),
    }
}

fn seconds_between(from: &DateTime<Utc>, to: &DateTime<Utc>) -> f64 {
    let elapsed = *to - *from;
    match elapsed.num_microseconds() {
        Some(micros) => micros as f64 / 1_000_000.0,
        None => elapsed.num_milliseconds() as f64 / 1000.0,
    }
}

/// Average speed from the first and last entries of each sequence.
///
/// Returns `None` with fewer than two samples in either sequence, or when the
/// elapsed time or the covered distance is not positive.
pub fn average_speed(times: &[DateTime<Utc>], distances: &[f64], unit: SpeedUnit) -> Option<f64> {
    if times.len() < 2 || distances.len() < 2 {
        return None;
    }

    let total_seconds = seconds_between(times.first()?, times.last()?);
    let total_meters = distances.last()? - distances.first()?;

    if total_seconds <= 0.0 || total_meters <= 0.0 {
        return None;
    }

    Some(unit.convert(total_meters / total_seconds))
}

/// Speed of every consecutive pair of samples, in `unit`, keeping only segments at
/// or above `min_speed`.
///
/// Samples are paired by index. Segments with a non-positive duration or a
/// negative distance are dropped.
pub fn segment_speeds(
    times: &[DateTime<Utc>],
    distances: &[f64],
    min_speed: f64,
    unit: SpeedUnit,
) -> Vec<f64> {
    let points: Vec<_> = times.iter().zip(distances.iter()).collect();

    points
        .windows(2)
        .filter_map(|pair| {
            let (t0, d0) = pair[0];
            let (t1, d1) = pair[1];
            let seconds = seconds_between(t0, t1);
            let meters = d1 - d0;

            if seconds > 0.0 && meters >= 0.0 {
                Some(unit.convert(meters / seconds))
            } else {
                None
            }
        })
        .filter(|speed| *speed >= min_speed)
        .collect()
}

pub fn segment_summary(speeds: &[f64]) -> Option<SegmentSummary> {
    let Summary {
        mean,
        stddev,
        count,
    } = mean_and_stddev(speeds);
    if count == 0 {
        return None;
    }

    let min = speeds.iter().copied().fold(f64::INFINITY, f64::min);
    let max = speeds.iter().copied().fold(f64::NEG_INFINITY, f64::max);

    Some(SegmentSummary {
        mean,
        stddev,
        min,
        max,
        count,
    })
}

/// Sum of the absolute altitude changes between consecutive samples.
pub fn total_elevation_change(altitudes: &[f64], unit: ElevationUnit) -> f64 {
    if altitudes.len() < 2 {
        return 0.0;
    }

    let meters: f64 = altitudes.windows(2).map(|w| (w[1] - w[0]).abs()).sum();
    unit.convert(meters)
}
