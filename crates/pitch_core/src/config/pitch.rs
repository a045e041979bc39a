//! Pitch definition source.
//!
//! ```text
//! // comment
//! # Four-seam
//! Speed=150, Axis=(0,0,1), RPM=2300
//! # Slider (random velo)
//! Speed=RAND[130:136], Axis=(0.3,1,RAND[-0.2:0.2]), RPM=2500, Elevation=1.0
//! ```
//!
//! `#` labels the next data line only. A data line needs `Speed`, `Axis`
//! and `RPM`; `Release`/`ReleaseHeight`, `Elevation` and `Azimuth` are
//! optional. Any malformed value drops the whole line together with its
//! label.

use std::fs;
use std::path::Path;

use rand::Rng;
use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};

use crate::error::{ConfigError, LineError, ResolveError};
use crate::physics::constants::config::{KMH_PER_MPS, MAX_PITCHES};
use crate::physics::DVec3;
use crate::simulator::SimParams;

use super::value::FieldValue;

const COMMENT_MARKER: char = '/';
const LABEL_MARKER: char = '#';
const UTF8_BOM: char = '\u{feff}';

// =============================================================================
// Entry types
// =============================================================================

/// Spin axis with independently fixed or random components.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct AxisValue {
    pub x: FieldValue,
    pub y: FieldValue,
    pub z: FieldValue,
}

impl AxisValue {
    pub fn fixed(x: f64, y: f64, z: f64) -> Self {
        Self {
            x: FieldValue::Fixed(x),
            y: FieldValue::Fixed(y),
            z: FieldValue::Fixed(z),
        }
    }

    pub fn is_random(&self) -> bool {
        self.x.is_random() || self.y.is_random() || self.z.is_random()
    }
}

/// One configured pitch.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PitchEntry {
    pub label: Option<String>,
    pub speed_kmh: FieldValue,
    pub axis: AxisValue,
    pub rpm: FieldValue,
    pub release_cm: Option<FieldValue>,
    pub elevation_deg: Option<FieldValue>,
    pub azimuth_deg: Option<FieldValue>,
}

impl PitchEntry {
    pub fn new(speed_kmh: f64, axis: DVec3, rpm: f64) -> Self {
        Self {
            label: None,
            speed_kmh: FieldValue::Fixed(speed_kmh),
            axis: AxisValue::fixed(axis.x, axis.y, axis.z),
            rpm: FieldValue::Fixed(rpm),
            release_cm: None,
            elevation_deg: None,
            azimuth_deg: None,
        }
    }

    pub fn with_label(mut self, label: impl Into<String>) -> Self {
        self.label = Some(label.into());
        self
    }

    /// Any field is drawn from a range
    pub fn is_random(&self) -> bool {
        self.speed_kmh.is_random()
            || self.axis.is_random()
            || self.rpm.is_random()
            || [self.release_cm, self.elevation_deg, self.azimuth_deg]
                .iter()
                .flatten()
                .any(FieldValue::is_random)
    }

    /// Label for display, falling back to `Pitch N` (1-based).
    pub fn display_label(&self, index: usize) -> String {
        match &self.label {
            Some(l) => l.clone(),
            None => format!("Pitch {}", index + 1),
        }
    }

    /// Sample every random field exactly once.
    pub fn resolve<R: Rng>(&self, rng: &mut R) -> Result<ResolvedPitch, ResolveError> {
        let resolve_opt = |v: &Option<FieldValue>,
                           name: &'static str,
                           rng: &mut R|
         -> Result<Option<f64>, ResolveError> {
            v.as_ref().map(|f| f.resolve(name, rng)).transpose()
        };

        let speed_kmh = self.speed_kmh.resolve("Speed", rng)?;
        let axis = DVec3::new(
            self.axis.x.resolve("Axis.x", rng)?,
            self.axis.y.resolve("Axis.y", rng)?,
            self.axis.z.resolve("Axis.z", rng)?,
        );
        let rpm = self.rpm.resolve("RPM", rng)?;

        Ok(ResolvedPitch {
            speed_kmh,
            axis,
            rpm,
            release_cm: resolve_opt(&self.release_cm, "Release", rng)?,
            elevation_deg: resolve_opt(&self.elevation_deg, "Elevation", rng)?,
            azimuth_deg: resolve_opt(&self.azimuth_deg, "Azimuth", rng)?,
        })
    }
}

/// Concrete values for one build of a pitch.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ResolvedPitch {
    pub speed_kmh: f64,
    pub axis: DVec3,
    pub rpm: f64,
    pub release_cm: Option<f64>,
    pub elevation_deg: Option<f64>,
    pub azimuth_deg: Option<f64>,
}

impl ResolvedPitch {
    /// Overlay onto a copy of the baseline.
    pub fn apply_to(&self, base: &SimParams) -> SimParams {
        let mut p = base.clone();
        p.initial_speed_mps = self.speed_kmh / KMH_PER_MPS;
        p.spin_axis = self.axis;
        p.spin_rpm = self.rpm;

        if let Some(v) = self.release_cm {
            p.release_height_cm = v;
        }
        if let Some(v) = self.elevation_deg {
            p.elevation_deg = v;
        }
        if let Some(v) = self.azimuth_deg {
            p.azimuth_deg = v;
        }
        p
    }
}

// =============================================================================
// Parsing
// =============================================================================

/// Line counts from one parse.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ParseStats {
    pub lines: u32,
    pub comments: u32,
    pub labels: u32,
    pub accepted: u32,
    pub discarded: u32,
    pub truncated: bool,
}

/// Parse pitch source text, keeping at most `max_entries`.
pub fn parse_pitch_source(source: &str, max_entries: usize) -> (Vec<PitchEntry>, ParseStats) {
    let mut entries = Vec::new();
    let mut stats = ParseStats::default();
    let mut pending_label: Option<String> = None;

    if max_entries == 0 {
        return (entries, stats);
    }

    for (idx, raw) in source.lines().enumerate() {
        stats.lines += 1;
        let raw = if idx == 0 {
            raw.strip_prefix(UTF8_BOM).unwrap_or(raw)
        } else {
            raw
        };

        let line = raw.trim();
        if line.is_empty() {
            continue;
        }
        if line.starts_with(COMMENT_MARKER) {
            stats.comments += 1;
            continue;
        }
        if let Some(label) = line.strip_prefix(LABEL_MARKER) {
            stats.labels += 1;
            let label = label.trim();
            pending_label = (!label.is_empty()).then(|| label.to_string());
            continue;
        }

        // label is single-use whether or not the line parses
        let label = pending_label.take();
        match parse_data_line(line) {
            Ok(mut entry) => {
                entry.label = label;
                entries.push(entry);
                stats.accepted += 1;
                if entries.len() >= max_entries {
                    stats.truncated = true;
                    break;
                }
            }
            Err(e) => {
                stats.discarded += 1;
                warn!(line = idx + 1, error = %e, "pitch line discarded");
            }
        }
    }

    (entries, stats)
}

/// Parse one `Key=Value, ...` line into an unlabeled entry.
pub fn parse_data_line(line: &str) -> Result<PitchEntry, LineError> {
    let mut speed = None;
    let mut axis = None;
    let mut rpm = None;
    let mut release = None;
    let mut elevation = None;
    let mut azimuth = None;

    for token in split_top_level(line) {
        let Some((key, value)) = token.split_once('=') else {
            continue;
        };
        let key = key.trim();

        if key.eq_ignore_ascii_case("Speed") {
            speed = Some(FieldValue::parse(key, value)?);
        } else if key.eq_ignore_ascii_case("Axis") {
            axis = Some(parse_axis(value)?);
        } else if key.eq_ignore_ascii_case("RPM") {
            rpm = Some(FieldValue::parse(key, value)?);
        } else if key.eq_ignore_ascii_case("Release") || key.eq_ignore_ascii_case("ReleaseHeight")
        {
            release = Some(FieldValue::parse(key, value)?);
        } else if key.eq_ignore_ascii_case("Elevation") {
            elevation = Some(FieldValue::parse(key, value)?);
        } else if key.eq_ignore_ascii_case("Azimuth") {
            azimuth = Some(FieldValue::parse(key, value)?);
        }
    }

    Ok(PitchEntry {
        label: None,
        speed_kmh: speed.ok_or(LineError::MissingField("Speed"))?,
        axis: axis.ok_or(LineError::MissingField("Axis"))?,
        rpm: rpm.ok_or(LineError::MissingField("RPM"))?,
        release_cm: release,
        elevation_deg: elevation,
        azimuth_deg: azimuth,
    })
}

/// `(x, y, z)`, each component a literal or a range.
fn parse_axis(value: &str) -> Result<AxisValue, LineError> {
    let malformed = || LineError::MalformedAxis(value.trim().to_string());

    let inner = value
        .trim()
        .strip_prefix('(')
        .and_then(|s| s.strip_suffix(')'))
        .ok_or_else(malformed)?;

    let parts: Vec<&str> = inner.split(',').collect();
    let [x, y, z] = parts.as_slice() else {
        return Err(malformed());
    };

    Ok(AxisValue {
        x: FieldValue::parse("Axis.x", x)?,
        y: FieldValue::parse("Axis.y", y)?,
        z: FieldValue::parse("Axis.z", z)?,
    })
}

/// Split on commas that are not inside parentheses; empty tokens dropped.
pub(crate) fn split_top_level(line: &str) -> Vec<&str> {
    let mut out = Vec::new();
    let mut depth = 0usize;
    let mut start = 0usize;

    for (i, ch) in line.char_indices() {
        match ch {
            '(' => depth += 1,
            ')' => depth = depth.saturating_sub(1),
            ',' if depth == 0 => {
                push_trimmed(&mut out, &line[start..i]);
                start = i + 1;
            }
            _ => {}
        }
    }
    push_trimmed(&mut out, &line[start..]);
    out
}

fn push_trimmed<'a>(out: &mut Vec<&'a str>, token: &'a str) {
    let t = token.trim();
    if !t.is_empty() {
        out.push(t);
    }
}

// =============================================================================
// Loading
// =============================================================================

/// Load a pitch file. Missing file or zero valid entries are fatal.
pub fn load_pitch_file(path: &Path, max_entries: usize) -> Result<Vec<PitchEntry>, ConfigError> {
    let text = fs::read_to_string(path).map_err(|e| {
        if e.kind() == std::io::ErrorKind::NotFound {
            ConfigError::NotFound {
                path: path.to_path_buf(),
            }
        } else {
            ConfigError::Io(e)
        }
    })?;

    let (entries, stats) = parse_pitch_source(&text, max_entries);
    debug!(?stats, path = %path.display(), "pitch source parsed");

    if entries.is_empty() {
        return Err(ConfigError::NoEntries {
            path: path.to_path_buf(),
        });
    }

    info!(
        count = entries.len(),
        random = entries.iter().filter(|e| e.is_random()).count(),
        discarded = stats.discarded,
        "pitches loaded"
    );
    Ok(entries)
}

/// [`load_pitch_file`] with the default cap.
pub fn load_default_pitch_file(path: &Path) -> Result<Vec<PitchEntry>, ConfigError> {
    load_pitch_file(path, MAX_PITCHES)
}

// =============================================================================
// Tests
// =============================================================================
