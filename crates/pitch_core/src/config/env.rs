//! Environment overrides (`envconfig.txt`).
//!
//! ```text
//! ; sea level, humid evening
//! AIR_TEMP=22
//! REL_HUMID=80
//! USE_HEIGHT_PRESSURE=off
//! PITCH_SPEED_SCALE=0.25
//! ```
//!
//! Every field is optional and only overrides the baseline once, at start-up.
//! Parsing is all-or-nothing: one bad value for a known key rejects the file.

use std::collections::BTreeMap;
use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};

use crate::error::{ConfigError, Result};
use crate::physics::constants::{field, playback};
use crate::simulator::SimParams;

use super::value::parse_number;

const COMMENT_MARKERS: [char; 3] = ['/', '#', ';'];

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct EnvironmentSettings {
    pub pressure_hpa: Option<f64>,
    pub use_height_pressure: Option<bool>,
    pub height_m: Option<f64>,
    pub pitch_speed_scale: Option<f64>,
    pub air_temp_c: Option<f64>,
    pub step_s: Option<f64>,
    pub rel_humidity_pct: Option<f64>,
    pub radius_mm: Option<f64>,
    pub mass_kg: Option<f64>,
    pub strike_zone_height_m: Option<f64>,
    pub strike_zone_size_m: Option<f64>,
    pub msaa_samples: Option<u32>,
    pub vsync: Option<bool>,
    /// Unrecognized keys, kept verbatim
    pub extra: BTreeMap<String, String>,
}

/// Render-side settings passed through to the host.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SceneHints {
    pub strike_zone_height_m: f64,
    pub strike_zone_size_m: f64,
    pub msaa_samples: u32,
    pub vsync: bool,
}

impl Default for SceneHints {
    fn default() -> Self {
        Self {
            strike_zone_height_m: field::STRIKE_ZONE_HEIGHT_M,
            strike_zone_size_m: field::STRIKE_ZONE_SIZE_M,
            msaa_samples: 4,
            vsync: true,
        }
    }
}

impl EnvironmentSettings {
    /// Overlay the physical overrides onto `params`.
    pub fn apply_to_params(&self, params: &mut SimParams) {
        let mut applied = 0u32;
        let mut set = |slot: &mut f64, v: Option<f64>| {
            if let Some(v) = v {
                *slot = v;
                applied += 1;
            }
        };

        set(&mut params.pressure_hpa, self.pressure_hpa);
        set(&mut params.altitude_m, self.height_m);
        set(&mut params.air_temp_c, self.air_temp_c);
        set(&mut params.step_s, self.step_s);
        set(&mut params.rel_humidity_pct, self.rel_humidity_pct);
        set(&mut params.radius_mm, self.radius_mm);
        set(&mut params.mass_kg, self.mass_kg);

        if let Some(flag) = self.use_height_pressure {
            params.use_altitude_pressure = flag;
            applied += 1;
        }

        info!(applied, "environment overrides applied");
    }

    /// Playback speed multiplier (sim seconds per wall second).
    pub fn time_scale(&self) -> f64 {
        self.pitch_speed_scale
            .unwrap_or(playback::DEFAULT_TIME_SCALE)
    }

    pub fn scene_hints(&self) -> SceneHints {
        let d = SceneHints::default();
        SceneHints {
            strike_zone_height_m: self.strike_zone_height_m.unwrap_or(d.strike_zone_height_m),
            strike_zone_size_m: self.strike_zone_size_m.unwrap_or(d.strike_zone_size_m),
            msaa_samples: self.msaa_samples.unwrap_or(d.msaa_samples),
            vsync: self.vsync.unwrap_or(d.vsync),
        }
    }
}

/// Parse environment source text.
pub fn parse_env_source(source: &str) -> Result<EnvironmentSettings> {
    let mut env = EnvironmentSettings::default();

    for (idx, raw) in source.lines().enumerate() {
        let line_no = idx + 1;
        let raw = if idx == 0 {
            raw.strip_prefix('\u{feff}').unwrap_or(raw)
        } else {
            raw
        };
        let line = raw.trim();
        if line.is_empty() || line.starts_with(COMMENT_MARKERS) {
            continue;
        }

        let Some((key, value)) = line.split_once('=') else {
            warn!(line = line_no, "environment line without '=' ignored");
            continue;
        };
        let key = key.trim().to_ascii_uppercase();
        let value = value.trim();

        let invalid = || ConfigError::InvalidEnvValue {
            key: key.clone(),
            value: value.to_string(),
            line: line_no,
        };
        let number = || parse_number(value).ok_or_else(invalid);
        let flag = || parse_bool(value).ok_or_else(invalid);

        match key.as_str() {
            "PRESSURE" => env.pressure_hpa = Some(number()?),
            "USE_HEIGHT_PRESSURE" => env.use_height_pressure = Some(flag()?),
            "HEIGHT" => env.height_m = Some(number()?),
            "PITCH_SPEED_SCALE" => env.pitch_speed_scale = Some(number()?),
            "AIR_TEMP" => env.air_temp_c = Some(number()?),
            "DT" => {
                let dt = number()?;
                if dt <= 0.0 {
                    return Err(invalid());
                }
                env.step_s = Some(dt);
            }
            "REL_HUMID" => env.rel_humidity_pct = Some(number()?),
            "RADIUS" => env.radius_mm = Some(number()?),
            "MASS" => env.mass_kg = Some(number()?),
            "STRIKE_ZONE_HEIGHT" => env.strike_zone_height_m = Some(number()?),
            "STRIKE_ZONE_SIZE" => env.strike_zone_size_m = Some(number()?),
            "MSAA" => env.msaa_samples = Some(value.parse::<u32>().map_err(|_| invalid())?),
            "VSYNC" => env.vsync = Some(flag()?),
            _ => {
                debug!(key = %key, "unknown environment key kept");
                env.extra.insert(key.clone(), value.to_string());
            }
        }
    }

    Ok(env)
}

/// Load the environment file; `Ok(None)` when it does not exist.
pub fn load_env_file(path: &Path) -> Result<Option<EnvironmentSettings>> {
    let text = match fs::read_to_string(path) {
        Ok(t) => t,
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
            debug!(path = %path.display(), "no environment file");
            return Ok(None);
        }
        Err(e) => return Err(e.into()),
    };
    parse_env_source(&text).map(Some)
}

fn parse_bool(value: &str) -> Option<bool> {
    match value.to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Some(true),
        "0" | "false" | "no" | "off" => Some(false),
        _ => None,
    }
}
