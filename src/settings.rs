//! Board settings and presets
//!
//! Written by UI collaborators, consumed by the simulation through
//! [`crate::sim::PlinkoState::apply_settings`].

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::consts::*;
use crate::error::ConfigError;

/// What the lab board shows while balls are flowing
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum DisplayMode {
    /// Animated balls
    #[default]
    Ball,
    /// Only the most recent path
    Path,
    /// Histogram only
    #[serde(rename = "none")]
    Hidden,
}

impl DisplayMode {
    pub fn as_str(&self) -> &'static str {
        match self {
            DisplayMode::Ball => "ball",
            DisplayMode::Path => "path",
            DisplayMode::Hidden => "none",
        }
    }

    pub fn from_str(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "ball" | "balls" => Some(DisplayMode::Ball),
            "path" | "paths" => Some(DisplayMode::Path),
            "none" | "hidden" => Some(DisplayMode::Hidden),
            _ => None,
        }
    }

    /// Seconds between continuous launches
    pub fn launch_interval(&self) -> f64 {
        match self {
            DisplayMode::Ball => BALL_MODE_INTERVAL,
            DisplayMode::Path => PATH_MODE_INTERVAL,
            DisplayMode::Hidden => NONE_MODE_INTERVAL,
        }
    }
}

/// Launch policy
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum LaunchMode {
    /// One ball per trigger
    #[default]
    Single,
    /// Up to `n` balls per trigger, staggered
    Batch(u32),
    /// Every ball left under the total cap, staggered
    AllRemaining,
    /// A steady stream while playing
    Continuous(DisplayMode),
}

impl LaunchMode {
    pub fn is_continuous(&self) -> bool {
        matches!(self, LaunchMode::Continuous(_))
    }

    /// Display sub-mode (discrete modes always animate balls)
    pub fn display(&self) -> DisplayMode {
        match self {
            LaunchMode::Continuous(display) => *display,
            LaunchMode::Single | LaunchMode::Batch(_) | LaunchMode::AllRemaining => {
                DisplayMode::Ball
            }
        }
    }

    /// Ball-clock step for a frame of `dt` seconds.
    ///
    /// `None` means balls skip the animation and land in the same tick.
    pub fn ball_time_step(&self, dt: f64) -> Option<f64> {
        match self {
            LaunchMode::Single | LaunchMode::Batch(_) | LaunchMode::AllRemaining => {
                Some(DISCRETE_BALL_SPEEDUP * dt)
            }
            LaunchMode::Continuous(DisplayMode::Ball) => {
                Some((CONTINUOUS_BALL_SPEEDUP * dt).min(CONTINUOUS_MAX_BALL_DT))
            }
            LaunchMode::Continuous(DisplayMode::Path | DisplayMode::Hidden) => None,
        }
    }
}

/// How histogram bins are reported
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum HistogramMode {
    #[default]
    Count,
    Fraction,
}

impl HistogramMode {
    pub fn as_str(&self) -> &'static str {
        match self {
            HistogramMode::Count => "count",
            HistogramMode::Fraction => "fraction",
        }
    }

    pub fn from_str(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "count" => Some(HistogramMode::Count),
            "fraction" => Some(HistogramMode::Fraction),
            _ => None,
        }
    }
}

/// Launch caps. Reaching either one raises the capped flag.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
pub struct LaunchCaps {
    /// Maximum balls launched per run
    pub total: Option<u32>,
    /// Maximum balls in any single bin
    pub per_bin: Option<u32>,
}

/// Board settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Settings {
    /// Number of peg rows
    pub row_count: u32,
    /// Probability of deflecting right at each peg
    pub probability: f64,
    pub launch_mode: LaunchMode,
    #[serde(default)]
    pub histogram_mode: HistogramMode,
    pub caps: LaunchCaps,
}

impl Default for Settings {
    fn default() -> Self {
        Self::intro()
    }
}

impl Settings {
    /// Intro board: discrete launches, 100 balls per run
    pub fn intro() -> Self {
        Self {
            row_count: DEFAULT_ROWS,
            probability: DEFAULT_PROBABILITY,
            launch_mode: LaunchMode::Single,
            histogram_mode: HistogramMode::Count,
            caps: LaunchCaps {
                total: Some(INTRO_TOTAL_LAUNCH_CAP),
                per_bin: None,
            },
        }
    }

    /// Lab board: continuous stream, capped per bin
    pub fn lab() -> Self {
        Self {
            row_count: DEFAULT_ROWS,
            probability: DEFAULT_PROBABILITY,
            launch_mode: LaunchMode::Continuous(DisplayMode::Ball),
            histogram_mode: HistogramMode::Count,
            caps: LaunchCaps {
                total: None,
                per_bin: Some(LAB_BIN_CAP),
            },
        }
    }

    /// Lab board with the lowered per-bin maximum (for testing the cap)
    pub fn lab_lowered_maximum() -> Self {
        let mut settings = Self::lab();
        settings.caps.per_bin = Some(LAB_LOWERED_BIN_CAP);
        settings
    }

    /// Reject anything the simulation cannot honor
    pub fn validate(&self) -> Result<(), ConfigError> {
        if !(MIN_ROWS..=MAX_ROWS).contains(&self.row_count) {
            return Err(ConfigError::RowCountOutOfRange {
                value: self.row_count,
                min: MIN_ROWS,
                max: MAX_ROWS,
            });
        }
        // NaN fails the range check too
        if !(0.0..=1.0).contains(&self.probability) {
            return Err(ConfigError::ProbabilityOutOfRange {
                value: self.probability,
            });
        }
        if self.launch_mode == LaunchMode::Batch(0) {
            return Err(ConfigError::EmptyBatch);
        }
        if self.caps.total == Some(0) {
            return Err(ConfigError::ZeroCap { cap: "total" });
        }
        if self.caps.per_bin == Some(0) {
            return Err(ConfigError::ZeroCap { cap: "per_bin" });
        }
        Ok(())
    }

    /// Whether switching from `self` to `other` invalidates the collected distribution
    pub fn requires_reset(&self, other: &Settings) -> bool {
        self.row_count != other.row_count
            || self.probability != other.probability
            || self.launch_mode.display() != other.launch_mode.display()
            || self.launch_mode.is_continuous() != other.launch_mode.is_continuous()
    }

    /// Parse and validate settings from JSON
    pub fn from_json(json: &str) -> Result<Self, ConfigError> {
        let settings: Settings = serde_json::from_str(json)?;
        settings.validate()?;
        Ok(settings)
    }

    pub fn to_json(&self) -> Result<String, ConfigError> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// Load settings from a JSON file
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let json = std::fs::read_to_string(path.as_ref())?;
        let settings = Self::from_json(&json)?;
        log::info!("Loaded settings from {}", path.as_ref().display());
        Ok(settings)
    }
}
