//! # pitch_core - Baseball Pitch Trajectory Engine
//!
//! Integrates thrown-ball trajectories under gravity, drag and Magnus lift
//! for a small set of configured pitches, and drives their animated reveal.
//!
//! ## Features
//! - Fixed-step RK4 integration, deterministic for fixed parameters
//! - Text pitch configuration with `RAND[min:max]` randomized fields
//! - Seeded, parallel pitch-set builds (same seed = same set)
//! - Playback state machine and a serializable per-frame render snapshot
//!
//! ```no_run
//! use pitch_core::{PitchSession, RenderFrame, SessionOptions};
//! use std::path::Path;
//!
//! let mut session = PitchSession::load(
//!     Path::new("pitches.txt"),
//!     Some(Path::new("envconfig.txt")),
//!     SessionOptions::default(),
//! )?;
//! session.tick(1.0 / 60.0);
//! let frame = RenderFrame::capture(&session);
//! # Ok::<(), pitch_core::SessionError>(())
//! ```

pub mod builder;
pub mod config;
pub mod error;
pub mod physics;
pub mod playback;
pub mod session;
pub mod simulator;
pub mod view;

pub use builder::{BuiltPitch, PitchSet, PitchSetBuilder, PitchSummary, PlateMarker, Trajectory};
pub use config::{
    load_env_file, load_pitch_file, parse_env_source, parse_pitch_source, EnvironmentSettings,
    FieldValue, PitchEntry, ResolvedPitch, SceneHints,
};
pub use error::{ConfigError, LineError, ResolveError, Result, SessionError};
pub use physics::constants::config::MAX_PITCHES;
pub use physics::{DVec3, Point3};
pub use playback::{Playback, PlaybackConfig, PlaybackState};
pub use session::{PitchSession, SessionOptions};
pub use simulator::{simulate, SimParams, Simulator, StopReason};
pub use view::{PitchView, RenderFrame};

/// Crate version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
