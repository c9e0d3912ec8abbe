use std::io::{self, BufRead};
use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::{Parser, ValueEnum, ValueHint};
use console::Term;
use tcxstat::{analyze, Config, ElevationUnit, Metric, SpeedUnit};
use tracing::debug;
use tracing_subscriber::EnvFilter;

/// Heart rate, cadence, power and speed statistics for .TCX activity files
#[derive(Parser, Debug)]
#[clap(author, version, about, long_about = None)]
struct Args {
    /// TCX file to use (asked for on stdin when omitted)
    #[clap(value_hint = ValueHint::FilePath)]
    input: Option<PathBuf>,

    /// Unit for average and segment speeds
    #[clap(long, value_enum, default_value = "mph")]
    speed_unit: SpeedOpt,

    /// Unit for the total elevation change
    #[clap(long, value_enum, default_value = "feet")]
    elevation_unit: ElevationOpt,

    /// Ignore segments slower than this, in the speed unit
    #[clap(long, default_value_t = tcxstat::stats::DEFAULT_MIN_SEGMENT_SPEED)]
    min_segment_speed: f64,

    /// Metrics to print, in order
    #[clap(
        long,
        value_enum,
        value_delimiter = ',',
        default_values = &["heart-rate", "cadence", "power", "speed", "segments", "elevation"]
    )]
    metrics: Vec<MetricOpt>,

    /// Log debug details to stderr
    #[clap(short, long)]
    verbose: bool,
}

#[derive(Copy, Clone, Debug, ValueEnum)]
enum SpeedOpt {
    Mph,
    Kmh,
}

impl From<SpeedOpt> for SpeedUnit {
    fn from(value: SpeedOpt) -> Self {
        match value {
            SpeedOpt::Mph => SpeedUnit::Mph,
            SpeedOpt::Kmh => SpeedUnit::Kmh,
        }
    }
}

#[derive(Copy, Clone, Debug, ValueEnum)]
enum ElevationOpt {
    Feet,
    Meters,
}

impl From<ElevationOpt> for ElevationUnit {
    fn from(value: ElevationOpt) -> Self {
        match value {
            ElevationOpt::Feet => ElevationUnit::Feet,
            ElevationOpt::Meters => ElevationUnit::Meters,
        }
    }
}

#[derive(Copy, Clone, Debug, ValueEnum)]
enum MetricOpt {
    HeartRate,
    Cadence,
    Power,
    Speed,
    SensorSpeed,
    Segments,
    Elevation,
}

impl From<MetricOpt> for Metric {
    fn from(value: MetricOpt) -> Self {
        match value {
            MetricOpt::HeartRate => Metric::HeartRate,
            MetricOpt::Cadence => Metric::Cadence,
            MetricOpt::Power => Metric::Power,
            MetricOpt::Speed => Metric::Speed,
            MetricOpt::SensorSpeed => Metric::SensorSpeed,
            MetricOpt::Segments => Metric::Segments,
            MetricOpt::Elevation => Metric::Elevation,
        }
    }
}

fn main() -> Result<()> {
    let args = Args::parse();
    let default_level = if args.verbose { "debug" } else { "warn" };
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .try_init();

    let config = Config {
        speed_unit: args.speed_unit.into(),
        elevation_unit: args.elevation_unit.into(),
        min_segment_speed: args.min_segment_speed,
        metrics: args.metrics.iter().map(|m| Metric::from(*m)).collect(),
    };
    debug!(?config, "configuration");

    let term = Term::stdout();
    let path = match args.input {
        Some(path) => path,
        None => {
            term.write_line("Enter path to TCX file:")?;
            read_path(io::stdin().lock()).context("failed to read the file path from stdin")?
        }
    };

    if !path.is_file() {
        term.write_line("File not found.")?;
        return Ok(());
    }

    match analyze(&path, &config) {
        Ok(report) => report.print().context("failed to write the report")?,
        Err(err) => {
            debug!(path = %path.display(), error = ?err, "analysis failed");
            term.write_line(&format!("Error: {}", err))?;
        }
    }

    Ok(())
}

fn read_path<R: BufRead>(mut input: R) -> io::Result<PathBuf> {
    let mut line = String::new();
    input.read_line(&mut line)?;
    Ok(PathBuf::from(line.trim()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn path_is_trimmed() {
        let path = read_path("  ride.tcx \r\n".as_bytes()).unwrap();
        assert_eq!(path, PathBuf::from("ride.tcx"));
    }

    #[test]
    fn default_arguments_match_default_config() {
        let args = Args::parse_from(["tcxstat"]);
        assert!(args.input.is_none());
        assert_eq!(SpeedUnit::from(args.speed_unit), Config::default().speed_unit);
        assert_eq!(
            ElevationUnit::from(args.elevation_unit),
            Config::default().elevation_unit
        );
        assert_eq!(args.min_segment_speed, Config::default().min_segment_speed);
        let metrics: Vec<Metric> = args.metrics.into_iter().map(Metric::from).collect();
        assert_eq!(metrics, Config::default().metrics);
    }

    #[test]
    fn metrics_are_comma_separated() {
        let args = Args::parse_from([
            "tcxstat",
            "ride.tcx",
            "--speed-unit",
            "kmh",
            "--metrics",
            "heart-rate,sensor-speed",
        ]);
        assert_eq!(args.input, Some(PathBuf::from("ride.tcx")));
        assert_eq!(SpeedUnit::from(args.speed_unit), SpeedUnit::Kmh);
        let metrics: Vec<Metric> = args.metrics.into_iter().map(Metric::from).collect();
        assert_eq!(metrics, vec![Metric::HeartRate, Metric::SensorSpeed]);
    }
}
