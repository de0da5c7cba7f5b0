//! Ball trajectories through the peg lattice
//!
//! A trajectory is fixed when the ball is created: one left/right decision
//! per row, the bin those decisions lead to, and the contact points the ball
//! is eased through. Changing the probability later never touches it.

use glam::Vec2;
use rand::Rng;
use serde::{Deserialize, Serialize};

use super::lattice::{
    ball_radius, bin_center_x, bin_floor_y, exit_y, peg_position, peg_radius, peg_spacing,
    row_height, stack_capacity,
};

/// Ball-clock time to travel between two consecutive contact points
pub const HOP_DURATION: f64 = 1.0;
/// Height of the bounce off a peg, in peg spacings
pub const HOP_LIFT: f32 = 0.25;

/// One ball's complete path
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Trajectory {
    pub row_count: u32,
    /// `true` = deflected right, one per row
    pub decisions: Vec<bool>,
    /// Number of right deflections
    pub bin_index: usize,
    /// Hopper outlet, one peg contact per row, then the exit point below the lattice
    pub points: Vec<Vec2>,
    /// Resting position in the bin
    pub landing: Vec2,
}

impl Trajectory {
    /// Draw a fresh path: right iff a uniform draw falls below `probability`
    pub fn generate<R: Rng + ?Sized>(row_count: u32, probability: f64, rng: &mut R) -> Self {
        let decisions = (0..row_count)
            .map(|_| rng.random::<f64>() < probability)
            .collect();
        Self::from_decisions(row_count, decisions)
    }

    /// Build the path for a known decision sequence, landing in an empty bin
    pub fn from_decisions(row_count: u32, decisions: Vec<bool>) -> Self {
        debug_assert_eq!(decisions.len(), row_count as usize);

        let contact_lift = Vec2::new(0.0, peg_radius(row_count) + ball_radius(row_count));
        let mut points = Vec::with_capacity(row_count as usize + 2);
        points.push(Vec2::ZERO);

        // The peg hit in row r is the one at column = rights taken so far
        let mut col = 0;
        for (row, &right) in decisions.iter().enumerate() {
            points.push(peg_position(row as u32, col, row_count) + contact_lift);
            if right {
                col += 1;
            }
        }

        let bin_index = col as usize;
        let x = bin_center_x(bin_index, row_count);
        points.push(Vec2::new(x, exit_y(row_count)));

        let mut trajectory = Self {
            row_count,
            decisions,
            bin_index,
            points,
            landing: Vec2::ZERO,
        };
        trajectory.land_on_stack(0);
        trajectory
    }

    /// Land on top of `occupancy` balls already in the bin.
    ///
    /// The visible stack stops growing once the bin is full; statistics are
    /// unaffected.
    pub fn stacked_on(mut self, occupancy: u32) -> Self {
        self.land_on_stack(occupancy);
        self
    }

    fn land_on_stack(&mut self, occupancy: u32) {
        let r = ball_radius(self.row_count);
        let level = occupancy.min(stack_capacity(self.row_count));
        self.landing = Vec2::new(
            bin_center_x(self.bin_index, self.row_count),
            bin_floor_y(self.row_count) + r + 2.0 * r * level as f32,
        );
    }

    /// Time spent among the pegs (hopper to exit point)
    pub fn peg_duration(&self) -> f64 {
        (self.points.len() - 1) as f64 * HOP_DURATION
    }

    /// Time to drop from the exit point onto the stack
    pub fn fall_duration(&self) -> f64 {
        let drop = (self.exit_point().y - self.landing.y).max(0.0) as f64;
        // Accelerates the same way a hop does (one row height per hop, eased quadratically)
        (drop / row_height(self.row_count) as f64).sqrt() * HOP_DURATION
    }

    pub fn total_duration(&self) -> f64 {
        self.peg_duration() + self.fall_duration()
    }

    pub fn exit_point(&self) -> Vec2 {
        self.points[self.points.len() - 1]
    }

    /// Interpolated position `t` ball-clock units after release
    pub fn position_at(&self, t: f64) -> Vec2 {
        if t <= 0.0 {
            return self.points[0];
        }

        let peg_duration = self.peg_duration();
        if t < peg_duration {
            let hop = (t / HOP_DURATION) as usize;
            let u = ((t - hop as f64 * HOP_DURATION) / HOP_DURATION) as f32;
            let a = self.points[hop];
            let b = self.points[hop + 1];
            // Bounce off the peg, except on the drop out of the hopper
            let lift = if hop == 0 {
                0.0
            } else {
                HOP_LIFT * peg_spacing(self.row_count) * 4.0 * u * (1.0 - u)
            };
            return Vec2::new(a.x + (b.x - a.x) * u, a.y + (b.y - a.y) * u * u + lift);
        }

        let fall = self.fall_duration();
        if fall <= 0.0 || t >= peg_duration + fall {
            return self.landing;
        }
        let u = ((t - peg_duration) / fall) as f32;
        let a = self.exit_point();
        Vec2::new(a.x, a.y + (self.landing.y - a.y) * u * u)
    }
}
