//! Plinko Probability - a Galton board simulation engine
//!
//! Core modules:
//! - `sim`: Deterministic simulation (peg lattice, trajectories, balls, histogram, launching)
//! - `settings`: Board configuration and presets
//! - `error`: Configuration errors
//!
//! Rendering and UI live outside this crate. They read [`sim::Snapshot`]s and
//! write [`Settings`] through [`sim::PlinkoState::apply_settings`].

pub mod error;
pub mod settings;
pub mod sim;

pub use error::ConfigError;
pub use settings::{DisplayMode, HistogramMode, LaunchCaps, LaunchMode, Settings};

/// Simulation configuration constants
pub mod consts {
    /// Nominal frame time (60 Hz) used by the headless driver
    pub const FRAME_DT: f64 = 1.0 / 60.0;

    /// Allowed row counts (inclusive)
    pub const MIN_ROWS: u32 = 5;
    pub const MAX_ROWS: u32 = 26;
    pub const DEFAULT_ROWS: u32 = 12;
    pub const DEFAULT_PROBABILITY: f64 = 0.5;

    /// Total balls the intro board accepts per run (also bounds "all remaining")
    pub const INTRO_TOTAL_LAUNCH_CAP: u32 = 100;
    /// Lab board per-bin cap
    pub const LAB_BIN_CAP: u32 = 9999;
    /// Lab per-bin cap when the lowered maximum test option is on
    pub const LAB_LOWERED_BIN_CAP: u32 = 25;

    /// Balls per batch launch
    pub const BATCH_SIZE: u32 = 10;
    /// Seconds between staggered batch launches
    pub const BATCH_SEPARATION: f64 = 0.1;

    /// Continuous launch intervals (seconds) per display mode
    pub const BALL_MODE_INTERVAL: f64 = 0.100;
    pub const PATH_MODE_INTERVAL: f64 = 0.050;
    pub const NONE_MODE_INTERVAL: f64 = 0.015;

    /// Ball clock speed-up in discrete launch modes
    pub const DISCRETE_BALL_SPEEDUP: f64 = 5.0;
    /// Ball clock speed-up in continuous ball mode
    pub const CONTINUOUS_BALL_SPEEDUP: f64 = 10.0;
    /// Largest ball-clock step in continuous ball mode (keeps balls from jumping)
    pub const CONTINUOUS_MAX_BALL_DT: f64 = 0.090;
}

/// Theoretical mean of Binomial(n, p)
#[inline]
pub fn theoretical_mean(row_count: u32, probability: f64) -> f64 {
    row_count as f64 * probability
}

/// Theoretical standard deviation of Binomial(n, p)
#[inline]
pub fn theoretical_std_dev(row_count: u32, probability: f64) -> f64 {
    (row_count as f64 * probability * (1.0 - probability)).sqrt()
}
