//! Deterministic simulation module
//!
//! All board logic lives here. This module must be pure and deterministic:
//! - Time only advances through the `dt` passed to [`tick`]
//! - Seeded RNG only, drawn in launch order
//! - Balls are processed in launch order
//! - No rendering or platform dependencies

pub mod ball;
pub mod binomial;
pub mod histogram;
pub mod lattice;
pub mod scheduler;
pub mod state;
pub mod tick;
pub mod trajectory;

pub use ball::{Ball, BallPhase, StepEvents};
pub use binomial::{
    binomial_coefficient, binomial_distribution, binomial_probability, normalized_distribution,
};
pub use histogram::{Bin, Histogram, SampleStatistics, Statistic, TheoreticalStatistics};
pub use lattice::{Peg, PegLattice};
pub use scheduler::LaunchScheduler;
pub use state::{BallView, PlinkoState, Reconciliation, Snapshot};
pub use tick::{TickInput, tick};
pub use trajectory::Trajectory;
