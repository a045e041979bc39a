//! # Pitch Session
//!
//! Owns the built pitch set and its playback state, kept in lockstep:
//! slot `i` of the playback always describes trajectory `i` of the set.
//! Every mutation replaces both sides together.
//!
//! Display controls:
//! - `restart` / `restart_active`: replay, re-drawing any random fields
//! - `toggle_filter(i)`: show only the selected pitches
//! - `clear_filter` / `hide_all`: show everything / nothing
//! - `toggle_labels`: annotation text on finished pitches

use std::path::Path;

use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};

use crate::builder::{BuiltPitch, PitchSet, PitchSetBuilder};
use crate::config::{
    load_env_file, load_pitch_file, EnvironmentSettings, PitchEntry, SceneHints,
};
use crate::error::{ConfigError, SessionError};
use crate::physics::constants::{config as limits, integration};
use crate::playback::{Playback, PlaybackConfig};
use crate::simulator::{SimParams, Simulator};

/// Start-up knobs not carried by the config files.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SessionOptions {
    pub max_pitches: usize,
    /// Fixed master seed; drawn from the thread RNG when absent
    pub seed: Option<u64>,
    pub max_steps: usize,
}

impl Default for SessionOptions {
    fn default() -> Self {
        Self {
            max_pitches: limits::MAX_PITCHES,
            seed: None,
            max_steps: integration::MAX_STEPS,
        }
    }
}

#[derive(Debug, Clone)]
pub struct PitchSession {
    entries: Vec<PitchEntry>,
    builder: PitchSetBuilder,
    set: PitchSet,
    playback: Playback,
    /// `None` shows every pitch; `Some` shows only the listed slots
    filter: Option<Vec<usize>>,
    show_labels: bool,
    scene: SceneHints,
}

impl PitchSession {
    /// Load both config files and build the initial set.
    ///
    /// A missing or rejected environment file falls back to defaults; pitch
    /// file errors are fatal.
    pub fn load(
        pitch_path: &Path,
        env_path: Option<&Path>,
        options: SessionOptions,
    ) -> Result<Self, SessionError> {
        let env = match env_path.map(load_env_file) {
            Some(Ok(env)) => env,
            Some(Err(e @ ConfigError::InvalidEnvValue { .. })) => {
                warn!(error = %e, "environment file rejected, using defaults");
                None
            }
            Some(Err(e)) => return Err(e.into()),
            None => None,
        };
        let entries = load_pitch_file(pitch_path, options.max_pitches)?;
        Ok(Self::from_entries(entries, env.as_ref(), options))
    }

    /// Build a session from already-parsed entries.
    pub fn from_entries(
        entries: Vec<PitchEntry>,
        env: Option<&EnvironmentSettings>,
        options: SessionOptions,
    ) -> Self {
        let mut base = SimParams::default();
        let mut playback_config = PlaybackConfig::default();
        let mut scene = SceneHints::default();

        if let Some(env) = env {
            env.apply_to_params(&mut base);
            playback_config.time_scale = env.time_scale();
            scene = env.scene_hints();
        }

        let builder = match options.seed {
            Some(seed) => PitchSetBuilder::with_seed(base, seed),
            None => PitchSetBuilder::new(base),
        }
        .with_simulator(Simulator::with_max_steps(options.max_steps));

        Self::with_builder(entries, builder, playback_config, scene)
    }

    pub fn with_builder(
        entries: Vec<PitchEntry>,
        mut builder: PitchSetBuilder,
        playback_config: PlaybackConfig,
        scene: SceneHints,
    ) -> Self {
        let set = builder.build(&entries);
        let playback = Playback::new(&set.lengths(), builder.base().step_s, playback_config);
        info!(pitches = set.len(), seed = builder.seed(), "session ready");

        let session = Self {
            entries,
            builder,
            set,
            playback,
            filter: None,
            show_labels: true,
            scene,
        };
        session.check_lockstep();
        session
    }

    // -------------------------------------------------------------------------
    // Accessors
    // -------------------------------------------------------------------------

    pub fn len(&self) -> usize {
        self.set.len()
    }

    pub fn is_empty(&self) -> bool {
        self.set.is_empty()
    }

    pub fn entries(&self) -> &[PitchEntry] {
        &self.entries
    }

    pub fn pitch_set(&self) -> &PitchSet {
        &self.set
    }

    pub fn pitch(&self, index: usize) -> Option<&BuiltPitch> {
        self.set.get(index)
    }

    pub fn playback(&self) -> &Playback {
        &self.playback
    }

    pub fn base_params(&self) -> &SimParams {
        self.builder.base()
    }

    pub fn scene(&self) -> &SceneHints {
        &self.scene
    }

    pub fn show_labels(&self) -> bool {
        self.show_labels
    }

    pub fn filter(&self) -> Option<&[usize]> {
        self.filter.as_deref()
    }

    pub fn is_shown(&self, index: usize) -> bool {
        index < self.set.len()
            && self
                .filter
                .as_ref()
                .map_or(true, |selected| selected.contains(&index))
    }

    /// Slots currently displayed, in ascending order.
    pub fn shown_indices(&self) -> Vec<usize> {
        (0..self.set.len()).filter(|&i| self.is_shown(i)).collect()
    }

    /// Pitch set and playback describe the same trajectories.
    pub fn is_consistent(&self) -> bool {
        self.set.len() == self.playback.len()
            && self
                .set
                .iter()
                .zip(self.playback.states())
                .all(|(p, s)| p.trajectory.len() == s.len && s.visible <= s.len)
    }

    // -------------------------------------------------------------------------
    // Playback control
    // -------------------------------------------------------------------------

    pub fn tick(&mut self, dt_wall: f64) {
        self.playback.tick(dt_wall);
    }

    /// Replay pitch `index`, re-drawing it first if any field is random.
    pub fn restart(&mut self, index: usize) -> Result<(), SessionError> {
        self.check_index(index)?;
        self.restart_indices(&[index])
    }

    /// Replay every shown pitch.
    pub fn restart_active(&mut self) -> Result<(), SessionError> {
        let shown = self.shown_indices();
        self.restart_indices(&shown)
    }

    /// Replay every pitch regardless of the filter.
    pub fn restart_all(&mut self) -> Result<(), SessionError> {
        let all: Vec<usize> = (0..self.set.len()).collect();
        self.restart_indices(&all)
    }

    /// Rebuild the whole set from the loaded entries.
    pub fn rebuild_all(&mut self) {
        let set = self.builder.build(&self.entries);
        let playback = Playback::new(
            &set.lengths(),
            self.builder.base().step_s,
            *self.playback.config(),
        );
        self.set = set;
        self.playback = playback;

        let len = self.set.len();
        if let Some(selected) = &mut self.filter {
            selected.retain(|&i| i < len);
        }
        self.check_lockstep();
    }

    fn restart_indices(&mut self, indices: &[usize]) -> Result<(), SessionError> {
        let random: Vec<(usize, usize, PitchEntry)> = indices
            .iter()
            .filter_map(|&i| self.set.get(i).map(|p| (i, p)))
            .filter(|(_, p)| p.entry.is_random())
            .map(|(i, p)| (i, p.source_index, p.entry.clone()))
            .collect();

        if !random.is_empty() {
            let jobs: Vec<(usize, &PitchEntry)> =
                random.iter().map(|(_, src, e)| (*src, e)).collect();
            let rebuilt = self
                .builder
                .build_indexed(&jobs)
                .into_iter()
                .collect::<Result<Vec<_>, _>>()?;

            // all-or-nothing: slots change only once every rebuild succeeded
            for ((slot, _, _), built) in random.iter().zip(rebuilt) {
                let (len, step) = (built.trajectory.len(), built.trajectory.step_s);
                self.set.replace(*slot, built);
                self.playback.reset_slot(*slot, len, step);
            }
            debug!(rebuilt = random.len(), "random pitches re-drawn");
        }

        for &i in indices {
            self.playback.restart(i);
        }
        self.check_lockstep();
        Ok(())
    }

    // -------------------------------------------------------------------------
    // Display filter
    // -------------------------------------------------------------------------

    /// Add or remove `index` from the shown selection, then replay the selection.
    pub fn toggle_filter(&mut self, index: usize) -> Result<(), SessionError> {
        self.check_index(index)?;
        let selected = self.filter.get_or_insert_with(Vec::new);

        if let Some(pos) = selected.iter().position(|&i| i == index) {
            selected.remove(pos);
        } else {
            selected.push(index);
        }

        let selected = selected.clone();
        debug!(?selected, "filter toggled");
        self.restart_indices(&selected)
    }

    /// Show every pitch and replay all.
    pub fn clear_filter(&mut self) -> Result<(), SessionError> {
        self.filter = None;
        self.restart_all()
    }

    /// Show nothing; playback still restarts for when the filter is lifted.
    pub fn hide_all(&mut self) -> Result<(), SessionError> {
        self.filter = Some(Vec::new());
        self.restart_all()
    }

    pub fn toggle_labels(&mut self) -> bool {
        self.show_labels = !self.show_labels;
        self.show_labels
    }

    // -------------------------------------------------------------------------

    fn check_index(&self, index: usize) -> Result<(), SessionError> {
        if index < self.set.len() {
            Ok(())
        } else {
            Err(SessionError::IndexOutOfRange {
                index,
                len: self.set.len(),
            })
        }
    }

    fn check_lockstep(&self) {
        debug_assert!(self.is_consistent(), "pitch set and playback out of step");
        if !self.is_consistent() {
            warn!(
                pitches = self.set.len(),
                playback = self.playback.len(),
                "pitch set and playback out of step"
            );
        }
    }
}
