//! Trackpoint extraction from Training Center XML documents.

use std::fs::File;
use std::io::{BufReader, Read};
use std::path::Path;
use std::str::FromStr;

use chrono::{DateTime, NaiveDateTime, TimeZone, Utc};
use tracing::debug;
use xml::name::OwnedName;
use xml::reader::{EventReader, XmlEvent};

use crate::TcxError;

pub const TCX_NS: &str = "http://www.garmin.com/xmlschemas/TrainingCenterDatabase/v2";
pub const ACTIVITY_EXT_NS: &str = "http://www.garmin.com/xmlschemas/ActivityExtension/v2";

/// An owned XML element with its namespace resolved.
///
/// Only what the extractor needs is kept: the name, the element's own text and its
/// child elements. Attributes, comments and processing instructions are dropped.
#[derive(Clone, Debug)]
pub struct Element {
    name: OwnedName,
    text: String,
    children: Vec<Element>,
}

impl Element {
    fn new(name: OwnedName) -> Self {
        Self {
            name,
            text: String::new(),
            children: Vec::new(),
        }
    }

    pub fn is(&self, namespace: &str, local_name: &str) -> bool {
        self.name.local_name == local_name && self.name.namespace.as_deref() == Some(namespace)
    }

    pub fn text(&self) -> &str {
        &self.text
    }

    /// First direct child with the given qualified name.
    pub fn child(&self, namespace: &str, local_name: &str) -> Option<&Element> {
        self.children.iter().find(|c| c.is(namespace, local_name))
    }

    /// This element and all of its descendants with the given qualified name, in
    /// document order.
    pub fn descendants<'a>(&'a self, namespace: &str, local_name: &str) -> Vec<&'a Element> {
        let mut found = Vec::new();
        self.collect(namespace, local_name, &mut found);
        found
    }

    fn collect<'a>(&'a self, namespace: &str, local_name: &str, found: &mut Vec<&'a Element>) {
        if self.is(namespace, local_name) {
            found.push(self);
        }
        for child in &self.children {
            child.collect(namespace, local_name, found);
        }
    }
}

#[derive(Clone, Debug)]
pub struct Document {
    root: Option<Element>,
}

impl Document {
    pub fn parse<R: Read>(reader: R) -> Result<Self, TcxError> {
        let mut stack: Vec<Element> = Vec::new();
        let mut root = None;

        for event in EventReader::new(reader) {
            match event? {
                XmlEvent::StartElement { name, .. } => stack.push(Element::new(name)),
                XmlEvent::EndElement { .. } => {
                    if let Some(element) = stack.pop() {
                        match stack.last_mut() {
                            Some(parent) => parent.children.push(element),
                            None => root = Some(element),
                        }
                    }
                }
                XmlEvent::Characters(text) | XmlEvent::CData(text) => {
                    if let Some(element) = stack.last_mut() {
                        element.text.push_str(&text);
                    }
                }
                _ => {}
            }
        }

        Ok(Self { root })
    }

    pub fn trackpoints(&self) -> Vec<&Element> {
        self.root
            .as_ref()
            .map(|root| root.descendants(TCX_NS, "Trackpoint"))
            .unwrap_or_default()
    }
}

impl FromStr for Document {
    type Err = TcxError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s.as_bytes())
    }
}

/// One sample of an activity. Every field is independently optional.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Trackpoint {
    pub heart_rate: Option<f64>,
    pub cadence: Option<f64>,
    pub power: Option<f64>,
    /// Instantaneous speed in m/s, as recorded by the device.
    pub speed: Option<f64>,
    pub time: Option<DateTime<Utc>>,
    /// Cumulative distance in meters.
    pub distance: Option<f64>,
    /// Altitude in meters.
    pub altitude: Option<f64>,
}

impl Trackpoint {
    pub fn from_element(tp: &Element) -> Self {
        let number = |el: Option<&Element>| el.and_then(|el| parse_number(el.text()));

        let tpx = tp
            .child(TCX_NS, "Extensions")
            .and_then(|ext| ext.child(ACTIVITY_EXT_NS, "TPX"));

        Self {
            heart_rate: number(
                tp.child(TCX_NS, "HeartRateBpm")
                    .and_then(|hr| hr.child(TCX_NS, "Value")),
            ),
            cadence: number(tp.child(TCX_NS, "Cadence")),
            power: number(tpx.and_then(|tpx| tpx.child(ACTIVITY_EXT_NS, "Watts"))),
            speed: number(tpx.and_then(|tpx| tpx.child(ACTIVITY_EXT_NS, "Speed"))),
            time: tp
                .child(TCX_NS, "Time")
                .and_then(|el| parse_time(el.text())),
            distance: number(tp.child(TCX_NS, "DistanceMeters")),
            altitude: number(tp.child(TCX_NS, "AltitudeMeters")),
        }
    }
}

/// The per-field sample sequences of a whole document, in document order.
///
/// Each sequence only holds the trackpoints carrying that field, so lengths may
/// differ. `timeline` pairs time and distance of the trackpoints that have both.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Samples {
    pub heart_rates: Vec<f64>,
    pub cadences: Vec<f64>,
    pub powers: Vec<f64>,
    pub speeds: Vec<f64>,
    pub times: Vec<DateTime<Utc>>,
    pub distances: Vec<f64>,
    pub altitudes: Vec<f64>,
    pub timeline: Vec<(DateTime<Utc>, f64)>,
}

impl Samples {
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self, TcxError> {
        let file = File::open(path)?;
        Self::from_reader(BufReader::new(file))
    }

    pub fn from_reader<R: Read>(reader: R) -> Result<Self, TcxError> {
        let document = Document::parse(reader)?;
        Ok(Self::extract(&document))
    }

    pub fn extract(document: &Document) -> Self {
        let trackpoints = document.trackpoints();
        let mut samples = Samples::default();

        for tp in &trackpoints {
            samples.push(Trackpoint::from_element(tp));
        }

        debug!(
            trackpoints = trackpoints.len(),
            heart_rates = samples.heart_rates.len(),
            cadences = samples.cadences.len(),
            powers = samples.powers.len(),
            speeds = samples.speeds.len(),
            times = samples.times.len(),
            distances = samples.distances.len(),
            altitudes = samples.altitudes.len(),
            "extracted samples"
        );

        samples
    }

    pub fn push(&mut self, tp: Trackpoint) {
        self.heart_rates.extend(tp.heart_rate);
        self.cadences.extend(tp.cadence);
        self.powers.extend(tp.power);
        self.speeds.extend(tp.speed);
        self.times.extend(tp.time);
        self.distances.extend(tp.distance);
        self.altitudes.extend(tp.altitude);

        if let (Some(time), Some(distance)) = (tp.time, tp.distance) {
            self.timeline.push((time, distance));
        }
    }

    /// The timeline split into index-aligned time and distance sequences.
    pub fn timeline_columns(&self) -> (Vec<DateTime<Utc>>, Vec<f64>) {
        self.timeline.iter().copied().unzip()
    }
}

impl FromStr for Samples {
    type Err = TcxError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::from_reader(s.as_bytes())
    }
}

fn parse_number(text: &str) -> Option<f64> {
    text.trim().parse::<f64>().ok().filter(|v| v.is_finite())
}

/// RFC 3339 timestamps are converted to UTC; timestamps without an offset are
/// taken as UTC.
fn parse_time(text: &str) -> Option<DateTime<Utc>> {
    let text = text.trim();
    if let Ok(datetime) = DateTime::parse_from_rfc3339(text) {
        return Some(datetime.with_timezone(&Utc));
    }

    NaiveDateTime::parse_from_str(text, "%Y-%m-%dT%H:%M:%S%.f")
        .ok()
        .map(|naive| Utc.from_utc_datetime(&naive))
}
