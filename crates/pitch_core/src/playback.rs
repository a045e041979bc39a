//! # Playback State Machine
//!
//! Reveals each trajectory progressively, driven by wall-clock ticks.
//!
//! ```text
//!            restart(i)                 visible == len
//!   Idle ───────────────> Animating ──────────────────> Idle
//!                           │  tick: elapsed += dt·scale
//!                           │        visible = clamp(⌊elapsed/step⌋+1, 2, len)
//!                           └─────┘
//! ```
//!
//! Visible counts only grow between a restart and the next restart.

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::physics::constants::playback as consts;

/// Per-pitch reveal progress.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PlaybackState {
    /// Simulated seconds since the last restart
    pub elapsed_s: f64,
    pub visible: usize,
    pub len: usize,
    pub step_s: f64,
}

impl PlaybackState {
    /// Fresh state after a build: first point shown.
    pub fn new(len: usize, step_s: f64) -> Self {
        Self {
            elapsed_s: 0.0,
            visible: len.min(1),
            len,
            step_s,
        }
    }

    pub fn is_idle(&self) -> bool {
        self.visible >= self.len
    }

    pub fn is_animating(&self) -> bool {
        !self.is_idle()
    }

    /// `(len - 1) * step`, 0 below two points
    pub fn duration_s(&self) -> f64 {
        if self.len < 2 {
            0.0
        } else {
            (self.len - 1) as f64 * self.step_s
        }
    }

    /// Fraction of points revealed, 1.0 for empty paths.
    pub fn progress(&self) -> f64 {
        if self.len == 0 {
            1.0
        } else {
            self.visible as f64 / self.len as f64
        }
    }

    pub fn restart(&mut self) {
        self.elapsed_s = 0.0;
        self.visible = self.len.min(consts::MIN_ANIMATING_POINTS);
    }

    /// Advance by `dt_sim` simulated seconds.
    fn advance(&mut self, dt_sim: f64) {
        if self.len <= 1 {
            self.visible = self.len;
            return;
        }
        if self.visible >= self.len {
            return;
        }

        self.elapsed_s += dt_sim;
        let stepped = if self.step_s > 0.0 {
            // saturating cast; huge ratios clamp to len below
            (self.elapsed_s / self.step_s).floor() as usize
        } else {
            self.len
        };
        let count = stepped.saturating_add(1);
        self.visible = count.clamp(consts::MIN_ANIMATING_POINTS, self.len);
    }
}

/// Playback tuning.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PlaybackConfig {
    /// Simulated seconds per wall-clock second
    pub time_scale: f64,
}

impl Default for PlaybackConfig {
    fn default() -> Self {
        Self {
            time_scale: consts::DEFAULT_TIME_SCALE,
        }
    }
}

/// Reveal state for every pitch in a set, plus the global animate flag.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Playback {
    states: Vec<PlaybackState>,
    animating: bool,
    config: PlaybackConfig,
}

impl Playback {
    /// Initial state for trajectories of the given lengths.
    pub fn new(lengths: &[usize], step_s: f64, config: PlaybackConfig) -> Self {
        Self {
            states: lengths
                .iter()
                .map(|&n| PlaybackState::new(n, step_s))
                .collect(),
            animating: true,
            config,
        }
    }

    pub fn len(&self) -> usize {
        self.states.len()
    }

    pub fn is_empty(&self) -> bool {
        self.states.is_empty()
    }

    pub fn states(&self) -> &[PlaybackState] {
        &self.states
    }

    pub fn get(&self, index: usize) -> Option<&PlaybackState> {
        self.states.get(index)
    }

    pub fn visible(&self, index: usize) -> usize {
        self.states.get(index).map_or(0, |s| s.visible)
    }

    pub fn is_animating(&self) -> bool {
        self.animating
    }

    pub fn config(&self) -> &PlaybackConfig {
        &self.config
    }

    pub fn time_scale(&self) -> f64 {
        self.config.time_scale
    }

    /// Restart one pitch; out-of-range indices are ignored.
    pub fn restart(&mut self, index: usize) -> bool {
        let Some(state) = self.states.get_mut(index) else {
            return false;
        };
        state.restart();
        self.animating = true;
        true
    }

    pub fn restart_all(&mut self) {
        for s in &mut self.states {
            s.restart();
        }
        self.animating = true;
    }

    /// Replace slot `index` for a rebuilt trajectory, then restart it.
    pub fn reset_slot(&mut self, index: usize, len: usize, step_s: f64) -> bool {
        let Some(state) = self.states.get_mut(index) else {
            return false;
        };
        *state = PlaybackState::new(len, step_s);
        state.restart();
        self.animating = true;
        true
    }

    /// Advance every animating pitch by `dt_wall` seconds of real time.
    ///
    /// Negative or non-finite `dt_wall` counts as zero.
    pub fn tick(&mut self, dt_wall: f64) {
        if !self.animating {
            return;
        }

        let dt_wall = if dt_wall.is_finite() && dt_wall > 0.0 {
            dt_wall
        } else {
            0.0
        };
        let dt_sim = dt_wall * self.config.time_scale;

        let mut all_idle = true;
        for s in &mut self.states {
            s.advance(dt_sim);
            if s.is_animating() {
                all_idle = false;
            }
        }

        if all_idle {
            self.animating = false;
            debug!(pitches = self.states.len(), "playback idle");
        }
    }
}
