//! Ball entity and lifecycle
//!
//! `Falling -> ExitedPegs -> Landed`, strictly in that order. Each transition
//! is reported exactly once through the [`StepEvents`] returned by the call
//! that caused it.

use glam::Vec2;
use serde::{Deserialize, Serialize};

use super::trajectory::Trajectory;

/// Lifecycle phase
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
pub enum BallPhase {
    /// Bouncing down through the pegs
    Falling,
    /// Below the pegs, dropping into its bin
    ExitedPegs,
    /// Resting in the bin (terminal)
    Landed,
}

/// Transitions raised by a single step
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct StepEvents {
    pub exited: bool,
    pub landed: bool,
}

impl StepEvents {
    pub fn any(&self) -> bool {
        self.exited || self.landed
    }
}

/// A ball entity
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Ball {
    pub id: u32,
    pub trajectory: Trajectory,
    /// Ball-clock time since release
    pub elapsed: f64,
    pub phase: BallPhase,
    pub pos: Vec2,
    /// Copied from the trajectory
    pub bin_index: usize,
}

impl Ball {
    pub fn new(id: u32, trajectory: Trajectory) -> Self {
        Self {
            id,
            pos: trajectory.position_at(0.0),
            bin_index: trajectory.bin_index,
            trajectory,
            elapsed: 0.0,
            phase: BallPhase::Falling,
        }
    }

    /// Advance the ball clock by `dt`. No clamping happens here.
    ///
    /// A landed ball ignores further steps.
    pub fn step(&mut self, dt: f64) -> StepEvents {
        if self.phase == BallPhase::Landed {
            return StepEvents::default();
        }
        self.elapsed += dt;
        self.pos = self.trajectory.position_at(self.elapsed);
        self.update_phase()
    }

    /// Skip the remaining animation and settle in the bin
    pub fn land_now(&mut self) -> StepEvents {
        if self.phase == BallPhase::Landed {
            return StepEvents::default();
        }
        self.elapsed = self.elapsed.max(self.trajectory.total_duration());
        self.pos = self.trajectory.landing;
        self.update_phase()
    }

    fn update_phase(&mut self) -> StepEvents {
        let mut events = StepEvents::default();
        if self.phase == BallPhase::Falling && self.elapsed >= self.trajectory.peg_duration() {
            self.phase = BallPhase::ExitedPegs;
            events.exited = true;
        }
        if self.phase == BallPhase::ExitedPegs && self.elapsed >= self.trajectory.total_duration()
        {
            self.phase = BallPhase::Landed;
            self.pos = self.trajectory.landing;
            events.landed = true;
        }
        events
    }

    pub fn is_landed(&self) -> bool {
        self.phase == BallPhase::Landed
    }
}
