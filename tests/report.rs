use std::fs;
use std::path::PathBuf;

use tempfile::TempDir;
use tcxstat::{analyze, Config, Metric, Report, Samples, SpeedUnit, TcxError};

const RIDE: &str = r#"<?xml version="1.0" encoding="UTF-8"?>
<TrainingCenterDatabase xmlns="http://www.garmin.com/xmlschemas/TrainingCenterDatabase/v2"
    xmlns:ns3="http://www.garmin.com/xmlschemas/ActivityExtension/v2">
  <Activities>
    <Activity Sport="Biking">
      <Id>2025-08-05T10:00:00Z</Id>
      <Lap StartTime="2025-08-05T10:00:00Z">
        <Track>
          <Trackpoint>
            <Time>2025-08-05T10:00:00Z</Time>
            <AltitudeMeters>100</AltitudeMeters>
            <DistanceMeters>0</DistanceMeters>
            <HeartRateBpm><Value>60</Value></HeartRateBpm>
            <Cadence>80</Cadence>
            <Extensions><ns3:TPX><ns3:Speed>4.0</ns3:Speed><ns3:Watts>150</ns3:Watts></ns3:TPX></Extensions>
          </Trackpoint>
          <Trackpoint>
            <Time>2025-08-05T10:00:10Z</Time>
            <AltitudeMeters>105</AltitudeMeters>
            <DistanceMeters>40</DistanceMeters>
            <HeartRateBpm><Value>70</Value></HeartRateBpm>
            <Extensions><ns3:TPX><ns3:Speed>4.0</ns3:Speed><ns3:Watts>170</ns3:Watts></ns3:TPX></Extensions>
          </Trackpoint>
          <Trackpoint>
            <Time>2025-08-05T10:00:20Z</Time>
            <AltitudeMeters>95</AltitudeMeters>
            <DistanceMeters>80</DistanceMeters>
            <HeartRateBpm><Value>80</Value></HeartRateBpm>
            <Cadence>90</Cadence>
            <Extensions><ns3:TPX><ns3:Speed>4.0</ns3:Speed><ns3:Watts>190</ns3:Watts></ns3:TPX></Extensions>
          </Trackpoint>
        </Track>
      </Lap>
    </Activity>
  </Activities>
</TrainingCenterDatabase>"#;

/// Writes `contents` into a fresh temporary directory, removed when the `TempDir` drops.
fn temp_file(name: &str, contents: &str) -> (TempDir, PathBuf) {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join(name);
    fs::write(&path, contents).unwrap();
    (dir, path)
}

#[test]
fn full_report_from_file() {
    let (_dir, path) = temp_file("ride.tcx", RIDE);
    let report = analyze(&path, &Config::default()).unwrap();

    assert_eq!(
        report.lines(),
        vec![
            "Heart Rate: Avg = 70.00 bpm, StdDev = 8.16 bpm (n=3)",
            "Cadence: Avg = 85.00 rpm, StdDev = 5.00 rpm (n=2)",
            "Power: Avg = 170.00 watts, StdDev = 16.33 watts (n=3)",
            "Speed: Avg = 8.95 mph, StdDev = 0.00 mph (n=2)",
            "",
            "Segment Speed Stats: Avg = 8.95 mph, StdDev = 0.00 mph, Min = 8.95 mph, Max = 8.95 mph",
            "",
            "Total Elevation Change: 49.21 feet",
        ]
    );
}

#[test]
fn sensor_speed_in_kmh() {
    let samples: Samples = RIDE.parse().unwrap();
    let config = Config {
        speed_unit: SpeedUnit::Kmh,
        metrics: vec![Metric::HeartRate, Metric::Cadence, Metric::Power, Metric::SensorSpeed],
        ..Config::default()
    };

    let lines = Report::build(&samples, &config).lines();
    assert_eq!(lines.len(), 4);
    assert_eq!(
        lines[3],
        "Speed: Avg = 14.40 km/h, StdDev = 0.00 km/h (n=3)"
    );
}

#[test]
fn malformed_file_is_an_error() {
    let (_dir, path) = temp_file("broken.tcx", "<TrainingCenterDatabase><Activities>");
    let err = analyze(&path, &Config::default()).unwrap_err();
    assert!(matches!(err, TcxError::Xml(_)));
    assert!(err.to_string().starts_with("failed to parse TCX document"));
}

#[test]
fn missing_file_is_an_io_error() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("does-not-exist.tcx");
    assert!(matches!(
        analyze(&path, &Config::default()),
        Err(TcxError::Io(_))
    ));
}
