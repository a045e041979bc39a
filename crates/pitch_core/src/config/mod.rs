//! # Configuration Model
//!
//! - `pitch`: pitch definition lines (`pitches.txt`) into [`PitchEntry`] records
//! - `env`: `KEY=VALUE` environment overrides (`envconfig.txt`)
//! - `value`: fixed-or-`RAND[min:max]` field values

pub mod env;
pub mod pitch;
pub mod value;

pub use env::{load_env_file, parse_env_source, EnvironmentSettings, SceneHints};
pub use pitch::{
    load_default_pitch_file, load_pitch_file, parse_data_line, parse_pitch_source, AxisValue,
    ParseStats, PitchEntry, ResolvedPitch,
};
pub use value::FieldValue;

/// Default pitch definition file name.
pub const PITCH_FILE_NAME: &str = "pitches.txt";
/// Default environment file name.
pub const ENV_FILE_NAME: &str = "envconfig.txt";
