use std::fmt;

const MPS_TO_MPH: f64 = 2.2369362920544;
const MPS_TO_KMH: f64 = 3.6;
const METERS_TO_FEET: f64 = 3.28084;

/// Unit used for every speed the report shows.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Default)]
pub enum SpeedUnit {
    #[default]
    Mph,
    Kmh,
}

impl SpeedUnit {
    pub fn convert(self, mps: f64) -> f64 {
        match self {
            SpeedUnit::Mph => mps * MPS_TO_MPH,
            SpeedUnit::Kmh => mps * MPS_TO_KMH,
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            SpeedUnit::Mph => "mph",
            SpeedUnit::Kmh => "km/h",
        }
    }
}

impl fmt::Display for SpeedUnit {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Default)]
pub enum ElevationUnit {
    #[default]
    Feet,
    Meters,
}

impl ElevationUnit {
    pub fn convert(self, meters: f64) -> f64 {
        match self {
            ElevationUnit::Feet => meters * METERS_TO_FEET,
            ElevationUnit::Meters => meters,
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            ElevationUnit::Feet => "feet",
            ElevationUnit::Meters => "meters",
        }
    }
}

impl fmt::Display for ElevationUnit {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}
