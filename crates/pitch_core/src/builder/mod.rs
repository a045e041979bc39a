//! # Pitch Set Builder
//!
//! Turns configured [`PitchEntry`] records into trajectories:
//!
//! ```text
//! entry --resolve(rng)--> ResolvedPitch --apply_to(base)--> SimParams
//!       --simulate--> points --artifacts--> BuiltPitch
//! ```
//!
//! Entries are built in parallel with rayon. Each entry gets its own
//! `ChaCha8Rng` seeded from a sub-seed drawn sequentially from the builder's
//! master generator, so a given master seed always yields the same set
//! regardless of thread scheduling.

pub mod artifacts;

pub use artifacts::{cumulative_arc_length, plate_crossing, PlateMarker, Trajectory};

use std::time::Instant;

use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;
use rayon::prelude::*;
use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};

use crate::config::{PitchEntry, ResolvedPitch};
use crate::error::ResolveError;
use crate::physics::Point3;
use crate::simulator::{SimParams, Simulator};

/// One entry resolved and integrated.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BuiltPitch {
    /// Position of `entry` in the loaded list
    pub source_index: usize,
    pub entry: PitchEntry,
    pub resolved: ResolvedPitch,
    pub trajectory: Trajectory,
}

impl BuiltPitch {
    pub fn label(&self) -> String {
        self.entry.display_label(self.source_index)
    }

    pub fn summary(&self, index: usize) -> PitchSummary {
        PitchSummary {
            index,
            label: self.label(),
            speed_kmh: self.resolved.speed_kmh,
            rpm: self.resolved.rpm,
            points: self.trajectory.len(),
            duration_s: self.trajectory.duration_s(),
            plate_crossing: self.trajectory.plate_crossing,
        }
    }
}

/// Output of a full build, indexed by display position.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PitchSet {
    pub pitches: Vec<BuiltPitch>,
    /// Master seed the set was built from
    pub seed: u64,
}

impl PitchSet {
    pub fn len(&self) -> usize {
        self.pitches.len()
    }

    pub fn is_empty(&self) -> bool {
        self.pitches.is_empty()
    }

    pub fn get(&self, index: usize) -> Option<&BuiltPitch> {
        self.pitches.get(index)
    }

    pub fn iter(&self) -> std::slice::Iter<'_, BuiltPitch> {
        self.pitches.iter()
    }

    pub fn lengths(&self) -> Vec<usize> {
        self.pitches.iter().map(|p| p.trajectory.len()).collect()
    }

    pub fn summaries(&self) -> Vec<PitchSummary> {
        self.pitches
            .iter()
            .enumerate()
            .map(|(i, p)| p.summary(i))
            .collect()
    }

    /// Swap one slot; the old pitch is returned.
    pub(crate) fn replace(&mut self, index: usize, pitch: BuiltPitch) -> Option<BuiltPitch> {
        self.pitches
            .get_mut(index)
            .map(|slot| std::mem::replace(slot, pitch))
    }
}

/// Display data for one built pitch.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PitchSummary {
    pub index: usize,
    pub label: String,
    pub speed_kmh: f64,
    pub rpm: f64,
    pub points: usize,
    pub duration_s: f64,
    pub plate_crossing: Option<Point3>,
}

impl PitchSummary {
    /// `"1: Fastball 150 km/h 2300 RPM"`
    pub fn annotation(&self) -> String {
        format!(
            "{}: {} {:.0} km/h {:.0} RPM",
            self.index + 1,
            self.label,
            self.speed_kmh,
            self.rpm
        )
    }
}

/// Owns the baseline parameters, the integrator and the random source.
#[derive(Debug, Clone)]
pub struct PitchSetBuilder {
    base: SimParams,
    simulator: Simulator,
    rng: ChaCha8Rng,
    seed: u64,
}

impl PitchSetBuilder {
    /// Seeded from the thread RNG.
    pub fn new(base: SimParams) -> Self {
        Self::with_seed(base, rand::thread_rng().gen())
    }

    pub fn with_seed(base: SimParams, seed: u64) -> Self {
        Self {
            base,
            simulator: Simulator::default(),
            rng: ChaCha8Rng::seed_from_u64(seed),
            seed,
        }
    }

    pub fn with_simulator(mut self, simulator: Simulator) -> Self {
        self.simulator = simulator;
        self
    }

    pub fn base(&self) -> &SimParams {
        &self.base
    }

    pub fn seed(&self) -> u64 {
        self.seed
    }

    /// Build every entry. Entries that fail to resolve are skipped.
    pub fn build(&mut self, entries: &[PitchEntry]) -> PitchSet {
        let start = Instant::now();
        let indexed: Vec<(usize, &PitchEntry)> = entries.iter().enumerate().collect();
        let results = self.build_indexed(&indexed);

        let pitches: Vec<BuiltPitch> = results
            .into_iter()
            .zip(entries.iter().enumerate())
            .filter_map(|(result, (i, entry))| match result {
                Ok(p) => Some(p),
                Err(e) => {
                    warn!(index = i, label = ?entry.label, error = %e, "pitch skipped");
                    None
                }
            })
            .collect();

        info!(
            built = pitches.len(),
            requested = entries.len(),
            elapsed_ms = start.elapsed().as_millis() as u64,
            "pitch set built"
        );

        PitchSet {
            pitches,
            seed: self.seed,
        }
    }

    /// Resolve and integrate a single entry with a fresh sub-seed.
    ///
    /// `source_index` is the entry's position in the loaded list.
    pub fn rebuild(
        &mut self,
        source_index: usize,
        entry: &PitchEntry,
    ) -> Result<BuiltPitch, ResolveError> {
        let sub_seed = self.rng.gen();
        let built = build_one(&self.base, &self.simulator, source_index, entry, sub_seed);
        if let Ok(p) = &built {
            debug!(
                index = source_index,
                speed_kmh = p.resolved.speed_kmh,
                rpm = p.resolved.rpm,
                points = p.trajectory.len(),
                "pitch rebuilt"
            );
        }
        built
    }

    /// Rebuild several entries in parallel, results in input order.
    pub fn build_indexed(
        &mut self,
        entries: &[(usize, &PitchEntry)],
    ) -> Vec<Result<BuiltPitch, ResolveError>> {
        // drawn before the parallel phase so results do not depend on scheduling
        let sub_seeds: Vec<u64> = entries.iter().map(|_| self.rng.gen()).collect();

        let base = &self.base;
        let simulator = &self.simulator;

        entries
            .par_iter()
            .zip(sub_seeds.par_iter())
            .map(|(&(i, entry), &seed)| build_one(base, simulator, i, entry, seed))
            .collect()
    }
}

fn build_one(
    base: &SimParams,
    simulator: &Simulator,
    source_index: usize,
    entry: &PitchEntry,
    seed: u64,
) -> Result<BuiltPitch, ResolveError> {
    let mut rng = ChaCha8Rng::seed_from_u64(seed);
    let resolved = entry.resolve(&mut rng)?;
    let params = resolved.apply_to(base);
    let (points, reason) = simulator.simulate_with_reason(&params);

    Ok(BuiltPitch {
        source_index,
        entry: entry.clone(),
        resolved,
        trajectory: Trajectory::from_points(points, &params, reason),
    })
}

// =============================================================================
// Tests
// =============================================================================
