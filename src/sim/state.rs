//! Board state and configuration reconciliation
//!
//! Everything a renderer needs lives here and is exposed read-only; mutation
//! goes through [`super::tick`] and [`PlinkoState::apply_settings`].

use glam::Vec2;
use rand::SeedableRng;
use rand_pcg::Pcg32;
use serde::{Deserialize, Serialize};

use super::ball::{Ball, BallPhase};
use super::binomial::normalized_distribution;
use super::histogram::{Histogram, SampleStatistics, TheoreticalStatistics};
use super::lattice::PegLattice;
use super::scheduler::LaunchScheduler;
use super::tick::{TickInput, tick};
use super::trajectory::Trajectory;
use crate::error::ConfigError;
use crate::settings::Settings;

/// Outcome of applying new settings
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Reconciliation {
    /// Nothing changed
    Unchanged,
    /// Settings changed without invalidating the collected distribution
    Adjusted,
    /// Balls cleared, histogram and launch counters reset
    Reset,
}

/// Renderer view of a ball
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct BallView {
    pub id: u32,
    pub pos: Vec2,
    pub phase: BallPhase,
    pub bin_index: usize,
}

/// Everything external readers poll between ticks
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Snapshot {
    pub time: f64,
    pub row_count: u32,
    pub probability: f64,
    pub balls: Vec<BallView>,
    pub bins: Vec<u32>,
    /// Bin values in the configured histogram mode
    pub bin_values: Vec<f64>,
    /// Theoretical distribution scaled so its peak is 1
    pub theoretical_curve: Vec<f64>,
    pub sample: SampleStatistics,
    pub theoretical: TheoreticalStatistics,
    pub launched_count: u32,
    pub is_capped: bool,
    pub is_playing: bool,
}

/// Complete board state (deterministic per seed)
#[derive(Debug, Clone)]
pub struct PlinkoState {
    /// Run seed for reproducibility
    pub seed: u64,
    pub(crate) rng: Pcg32,
    pub(crate) settings: Settings,
    /// Settings restored by `reset_all`
    pub(crate) initial_settings: Settings,
    pub(crate) lattice: PegLattice,
    /// Active balls in launch order
    pub(crate) balls: Vec<Ball>,
    pub(crate) histogram: Histogram,
    pub(crate) scheduler: LaunchScheduler,
    pub(crate) playing: bool,
    /// Simulated seconds
    pub(crate) time: f64,
    next_id: u32,
}

impl PlinkoState {
    /// Create a board with the given seed and settings
    pub fn new(seed: u64, settings: Settings) -> Result<Self, ConfigError> {
        settings.validate()?;
        log::info!(
            "Board created: seed {}, {} rows, p = {}, {:?}",
            seed,
            settings.row_count,
            settings.probability,
            settings.launch_mode
        );
        Ok(Self {
            seed,
            rng: Pcg32::seed_from_u64(seed),
            lattice: PegLattice::new(settings.row_count),
            histogram: Histogram::new(settings.row_count),
            scheduler: LaunchScheduler::new(),
            balls: Vec::new(),
            playing: false,
            time: 0.0,
            initial_settings: settings.clone(),
            settings,
            next_id: 1,
        })
    }

    /// Allocate a new entity ID
    pub fn next_entity_id(&mut self) -> u32 {
        let id = self.next_id;
        self.next_id += 1;
        id
    }

    pub fn settings(&self) -> &Settings {
        &self.settings
    }

    pub fn balls(&self) -> &[Ball] {
        &self.balls
    }

    pub fn histogram(&self) -> &Histogram {
        &self.histogram
    }

    pub fn lattice(&self) -> &PegLattice {
        &self.lattice
    }

    pub fn scheduler(&self) -> &LaunchScheduler {
        &self.scheduler
    }

    pub fn is_playing(&self) -> bool {
        self.playing
    }

    pub fn is_capped(&self) -> bool {
        self.scheduler.is_capped()
    }

    pub fn launched_count(&self) -> u32 {
        self.scheduler.launched_count()
    }

    pub fn time(&self) -> f64 {
        self.time
    }

    /// Whether the histogram already holds this ball.
    ///
    /// Continuous modes count a ball when it leaves the pegs, discrete modes
    /// when it lands.
    fn is_counted(&self, ball: &Ball) -> bool {
        if self.settings.launch_mode.is_continuous() {
            ball.phase >= BallPhase::ExitedPegs
        } else {
            ball.phase == BallPhase::Landed
        }
    }

    /// Balls in or bound for a bin
    pub fn occupancy(&self, bin_index: usize) -> u32 {
        let in_flight = self
            .balls
            .iter()
            .filter(|ball| ball.bin_index == bin_index && !self.is_counted(ball))
            .count() as u32;
        self.histogram.count(bin_index) + in_flight
    }

    pub fn max_occupancy(&self) -> u32 {
        (0..self.histogram.bins().len())
            .map(|bin| self.occupancy(bin))
            .max()
            .unwrap_or(0)
    }

    /// Whether the per-bin cap blocks further launches
    pub fn is_bin_capped(&self) -> bool {
        self.settings
            .caps
            .per_bin
            .is_some_and(|cap| self.max_occupancy() >= cap)
    }

    /// Drop one ball into the board using the probability in effect right now
    pub fn launch_ball(&mut self) -> u32 {
        let trajectory = Trajectory::generate(
            self.settings.row_count,
            self.settings.probability,
            &mut self.rng,
        );
        let occupancy = self.occupancy(trajectory.bin_index);
        let trajectory = trajectory.stacked_on(occupancy);

        let id = self.next_entity_id();
        log::debug!("Ball {} launched toward bin {}", id, trajectory.bin_index);
        self.balls.push(Ball::new(id, trajectory));
        self.scheduler.record_launch();
        id
    }

    /// Play-button press
    pub fn trigger(&mut self) {
        self.playing = true;
        if !self.settings.launch_mode.is_continuous() {
            let queued = self
                .scheduler
                .trigger(self.settings.launch_mode, &self.settings.caps);
            log::debug!("Queued {} launches", queued);
        }
        self.refresh_cap();
    }

    /// Stop launching. Balls already in flight keep moving.
    pub fn pause(&mut self) {
        self.playing = false;
    }

    pub(crate) fn refresh_cap(&mut self) {
        let occupancy = self.max_occupancy();
        self.scheduler.refresh_cap(&self.settings.caps, occupancy);
    }

    /// Apply new settings, clearing history when the distribution changes
    pub fn apply_settings(&mut self, settings: Settings) -> Result<Reconciliation, ConfigError> {
        if let Err(err) = settings.validate() {
            log::warn!("Rejected settings: {}", err);
            return Err(err);
        }
        if settings == self.settings {
            return Ok(Reconciliation::Unchanged);
        }

        let reset = self.settings.requires_reset(&settings);
        self.settings = settings;
        if reset {
            self.lattice.set_row_count(self.settings.row_count);
            self.histogram.reset_for(self.settings.row_count);
            self.balls.clear();
            self.scheduler.reset();
            log::info!(
                "Board reset: {} rows, p = {}, {:?}",
                self.settings.row_count,
                self.settings.probability,
                self.settings.launch_mode
            );
            Ok(Reconciliation::Reset)
        } else {
            self.refresh_cap();
            Ok(Reconciliation::Adjusted)
        }
    }

    /// Clear balls, histogram and launch counters, keeping the settings
    pub fn reset_histogram(&mut self) {
        self.balls.clear();
        self.histogram.reset();
        self.scheduler.reset();
        log::info!("Histogram reset");
    }

    /// Back to the initial settings with an empty board
    pub fn reset_all(&mut self) {
        self.settings = self.initial_settings.clone();
        self.lattice.set_row_count(self.settings.row_count);
        self.histogram.reset_for(self.settings.row_count);
        self.balls.clear();
        self.scheduler.reset();
        self.playing = false;
        log::info!("Board reset to initial settings");
    }

    /// Advance by one frame without input
    pub fn advance(&mut self, dt: f64) {
        tick(self, &TickInput::default(), dt);
    }

    pub fn sample_statistics(&self) -> SampleStatistics {
        self.histogram.sample_statistics()
    }

    pub fn theoretical_statistics(&self) -> TheoreticalStatistics {
        TheoreticalStatistics::new(
            self.settings.row_count,
            self.settings.probability,
            self.histogram.landed_count(),
        )
    }

    pub fn theoretical_curve(&self) -> Vec<f64> {
        normalized_distribution(self.settings.row_count, self.settings.probability)
    }

    pub fn snapshot(&self) -> Snapshot {
        Snapshot {
            time: self.time,
            row_count: self.settings.row_count,
            probability: self.settings.probability,
            balls: self
                .balls
                .iter()
                .map(|ball| BallView {
                    id: ball.id,
                    pos: ball.pos,
                    phase: ball.phase,
                    bin_index: ball.bin_index,
                })
                .collect(),
            bins: self.histogram.counts(),
            bin_values: self.histogram.values(self.settings.histogram_mode),
            theoretical_curve: self.theoretical_curve(),
            sample: self.sample_statistics(),
            theoretical: self.theoretical_statistics(),
            launched_count: self.launched_count(),
            is_capped: self.is_capped(),
            is_playing: self.playing,
        }
    }
}
