//! Descriptive statistics for Training Center XML (.TCX) activity files.
//!
//! [`Samples`] pulls the per-field sequences out of a document, the [`stats`]
//! functions turn them into averages, spreads and derived speed/elevation metrics,
//! and [`Report`] puts the enabled metrics together for the console.

use thiserror::Error;

pub mod report;
pub mod stats;
pub mod tcx;
pub mod units;

pub use report::{Config, Entry, Metric, Report};
pub use tcx::{Document, Samples, Trackpoint};
pub use units::{ElevationUnit, SpeedUnit};

#[derive(Error, Debug)]
pub enum TcxError {
    #[error("failed to read TCX file: {0}")]
    Io(#[from] std::io::Error),
    #[error("failed to parse TCX document: {0}")]
    Xml(#[from] xml::reader::Error),
}

/// Load a TCX file and compute its report in one go.
pub fn analyze<P: AsRef<std::path::Path>>(path: P, config: &Config) -> Result<Report, TcxError> {
    let samples = Samples::open(path)?;
    Ok(Report::build(&samples, config))
}
