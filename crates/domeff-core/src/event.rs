//! Event records and sensor geometry from the external detector-file reader.
//!
//! The proprietary frame reader is out of scope; its output is modeled as
//! newline-delimited JSON event records plus a JSON geometry file mapping
//! sensors to positions and orientations.

use std::collections::HashMap;
use std::fmt;
use std::fs::File;
use std::io::{BufRead, BufReader, Lines};
use std::path::{Path, PathBuf};

use glam::DVec3;
use log::warn;
use serde::{Deserialize, Serialize};

use crate::error::{DomeffError, Result};
use crate::geometry::Cylinder;

/// Sensor key: string number and position on the string.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct SensorId {
    pub string: u32,
    pub om: u32,
}

impl fmt::Display for SensorId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}-{}", self.string, self.om)
    }
}

/// Single charge pulse recorded at a sensor.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Pulse {
    /// Hit time, ns.
    pub time: f64,
    /// Charge in photoelectrons.
    pub charge: f64,
}

/// Reconstructed track candidate from the event record.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct TrackCandidate {
    pub start: DVec3,
    pub end: DVec3,
    /// Time at the start position, ns.
    #[serde(default)]
    pub time: f64,
    pub particle_type: i32,
}

/// Decay/daughter product of the primary particle.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Daughter {
    pub position: DVec3,
    pub energy: f64,
    pub particle_type: i32,
}

/// Pulse series of one sensor.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SensorPulses {
    pub sensor: SensorId,
    pub pulses: Vec<Pulse>,
}

/// One simulated event. Fields the record lacks default to empty; the
/// extraction gates discard such events naturally.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EventRecord {
    pub candidates: Vec<TrackCandidate>,
    pub daughters: Vec<Daughter>,
    pub pulses: Vec<SensorPulses>,
}

impl EventRecord {
    /// Pulse series keyed by sensor for per-sensor lookup.
    pub fn pulse_map(&self) -> HashMap<SensorId, &[Pulse]> {
        self.pulses
            .iter()
            .map(|sp| (sp.sensor, sp.pulses.as_slice()))
            .collect()
    }
}

/// Position and optical-axis orientation of one sensor.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SensorGeometry {
    pub sensor: SensorId,
    pub position: DVec3,
    /// Unit vector along the sensor's optical axis.
    pub orientation: DVec3,
}

#[derive(Debug, Deserialize)]
struct GeometryFile {
    sensors: Vec<SensorGeometry>,
}

/// Sensor geometry plus the bounding cylinder derived from it.
#[derive(Debug, Clone)]
pub struct DetectorGeometry {
    pub sensors: Vec<SensorGeometry>,
    pub cylinder: Cylinder,
}

impl DetectorGeometry {
    /// Build from a sensor list; None when the list is empty.
    pub fn from_sensors(sensors: Vec<SensorGeometry>) -> Option<Self> {
        let cylinder = Cylinder::bounding(sensors.iter().map(|s| s.position))?;
        Some(Self { sensors, cylinder })
    }

    /// Load the geometry JSON file. Failure here is fatal for the whole run:
    /// without sensor positions no event can be processed.
    pub fn load(path: &Path) -> Result<Self> {
        let file = File::open(path)?;
        let parsed: GeometryFile = serde_json::from_reader(BufReader::new(file))?;
        Self::from_sensors(parsed.sensors)
            .ok_or_else(|| DomeffError::GeometryMissing(path.to_path_buf()))
    }
}

/// Reads newline-delimited JSON event records from a file or from every
/// regular file in a directory. Malformed lines are skipped with a warning;
/// only file-level I/O failures surface as errors.
pub struct JsonlEventReader {
    files: std::vec::IntoIter<PathBuf>,
    lines: Option<Lines<BufReader<File>>>,
    current: PathBuf,
    line_no: usize,
}

impl JsonlEventReader {
    /// Open a single event file, or a directory whose files are read in
    /// sorted name order so repeated runs see the same sequence.
    pub fn open(path: &Path) -> Result<Self> {
        let mut files = Vec::new();
        if path.is_dir() {
            for entry in std::fs::read_dir(path)? {
                let entry = entry?;
                if entry.file_type()?.is_file() {
                    files.push(entry.path());
                }
            }
            files.sort();
        } else {
            files.push(path.to_path_buf());
        }
        Ok(Self {
            files: files.into_iter(),
            lines: None,
            current: PathBuf::new(),
            line_no: 0,
        })
    }
}

impl Iterator for JsonlEventReader {
    type Item = Result<EventRecord>;

    fn next(&mut self) -> Option<Self::Item> {
        loop {
            let Some(lines) = self.lines.as_mut() else {
                let path = self.files.next()?;
                match File::open(&path) {
                    Ok(f) => {
                        self.lines = Some(BufReader::new(f).lines());
                        self.current = path;
                        self.line_no = 0;
                    }
                    Err(e) => return Some(Err(e.into())),
                }
                continue;
            };
            match lines.next() {
                None => self.lines = None,
                Some(Err(e)) => return Some(Err(e.into())),
                Some(Ok(line)) => {
                    self.line_no += 1;
                    if line.trim().is_empty() {
                        continue;
                    }
                    match serde_json::from_str(&line) {
                        Ok(event) => return Some(Ok(event)),
                        Err(e) => warn!(
                            "{}:{}: skipping malformed event: {e}",
                            self.current.display(),
                            self.line_no
                        ),
                    }
                }
            }
        }
    }
}
