//! Launch scheduling
//!
//! Decides how many balls enter the board each tick. All timing is driven by
//! the `dt` handed to [`LaunchScheduler::due_launches`]; there are no timers.

use serde::{Deserialize, Serialize};

use crate::consts::{BATCH_SEPARATION, INTRO_TOTAL_LAUNCH_CAP};
use crate::settings::{LaunchCaps, LaunchMode};

/// Launch counters and pending staggered launches for the current run
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct LaunchScheduler {
    /// Balls launched since the last reset
    launched_count: u32,
    is_capped: bool,
    /// Seconds since the last continuous launch
    time_since_last_launch: f64,
    /// Staggered launches still waiting
    queued: u32,
    /// Seconds until the next queued launch
    time_until_next: f64,
}

impl LaunchScheduler {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn launched_count(&self) -> u32 {
        self.launched_count
    }

    pub fn queued(&self) -> u32 {
        self.queued
    }

    pub fn is_capped(&self) -> bool {
        self.is_capped
    }

    /// Balls still allowed under the total cap, counting queued ones
    fn remaining(&self, total_cap: Option<u32>) -> u32 {
        total_cap
            .map(|cap| cap.saturating_sub(self.launched_count + self.queued))
            .unwrap_or(u32::MAX)
    }

    /// Play-button press in a discrete mode. Returns how many launches were queued.
    ///
    /// The first queued ball goes out on the next `due_launches` call, the rest
    /// follow every [`BATCH_SEPARATION`] seconds.
    pub fn trigger(&mut self, mode: LaunchMode, caps: &LaunchCaps) -> u32 {
        let requested = match mode {
            LaunchMode::Single => 1,
            LaunchMode::Batch(n) => n,
            LaunchMode::AllRemaining => {
                self.remaining(Some(caps.total.unwrap_or(INTRO_TOTAL_LAUNCH_CAP)))
            }
            LaunchMode::Continuous(_) => 0,
        };
        let count = requested.min(self.remaining(caps.total));
        if count > 0 && self.queued == 0 {
            self.time_until_next = 0.0;
        }
        self.queued += count;
        count
    }

    /// Number of balls to launch during a tick of `dt` seconds
    pub fn due_launches(
        &mut self,
        mode: LaunchMode,
        caps: &LaunchCaps,
        playing: bool,
        bin_capped: bool,
        dt: f64,
    ) -> u32 {
        match mode {
            LaunchMode::Continuous(display) => {
                self.time_since_last_launch += dt;
                let ready = self.time_since_last_launch > display.launch_interval();
                if playing && ready && !bin_capped && self.remaining(caps.total) > 0 {
                    self.time_since_last_launch = 0.0;
                    1
                } else {
                    0
                }
            }
            LaunchMode::Single | LaunchMode::Batch(_) | LaunchMode::AllRemaining => {
                if !playing || self.queued == 0 {
                    return 0;
                }
                let mut due = 0;
                while self.queued > 0 && self.time_until_next <= 0.0 {
                    self.queued -= 1;
                    self.time_until_next += BATCH_SEPARATION;
                    due += 1;
                }
                self.time_until_next -= dt;
                due
            }
        }
    }

    /// Count a ball that actually entered the board
    pub fn record_launch(&mut self) {
        self.launched_count += 1;
    }

    /// Drop queued launches that no longer fit under the total cap
    fn clamp_queue(&mut self, total_cap: Option<u32>) {
        if let Some(cap) = total_cap {
            let allowed = cap.saturating_sub(self.launched_count);
            if self.queued > allowed {
                log::debug!("Dropping {} queued launches over the cap", self.queued - allowed);
                self.queued = allowed;
            }
        }
    }

    /// Recompute the capped flag. Returns true when the cap was just reached.
    ///
    /// Also trims pending launches when the total cap was lowered.
    pub fn refresh_cap(&mut self, caps: &LaunchCaps, max_bin_occupancy: u32) -> bool {
        self.clamp_queue(caps.total);
        let total_reached = self.remaining(caps.total) == 0;
        let bin_reached = caps.per_bin.is_some_and(|cap| max_bin_occupancy >= cap);
        let was_capped = self.is_capped;
        self.is_capped = total_reached || bin_reached;
        if self.is_capped && !was_capped {
            log::info!(
                "Launch cap reached ({} launched, {} queued, fullest bin {})",
                self.launched_count,
                self.queued,
                max_bin_occupancy
            );
        }
        self.is_capped && !was_capped
    }

    /// Forget the run: counters, pending launches and the capped flag
    pub fn reset(&mut self) {
        *self = Self::default();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::settings::DisplayMode;

    const INTRO_CAPS: LaunchCaps = LaunchCaps {
        total: Some(100),
        per_bin: None,
    };

    /// Drain a scheduler like the tick loop does
    fn run(
        scheduler: &mut LaunchScheduler,
        mode: LaunchMode,
        caps: &LaunchCaps,
        dt: f64,
        ticks: usize,
    ) -> Vec<u32> {
        (0..ticks)
            .map(|_| {
                let due = scheduler.due_launches(mode, caps, true, false, dt);
                for _ in 0..due {
                    scheduler.record_launch();
                }
                due
            })
            .collect()
    }

    #[test]
    fn test_single_launches_immediately() {
        let mut scheduler = LaunchScheduler::new();
        assert_eq!(scheduler.trigger(LaunchMode::Single, &INTRO_CAPS), 1);
        assert_eq!(
            run(&mut scheduler, LaunchMode::Single, &INTRO_CAPS, 0.05, 3),
            vec![1, 0, 0]
        );
        assert_eq!(scheduler.launched_count(), 1);
    }

    #[test]
    fn test_batch_is_staggered() {
        let mut scheduler = LaunchScheduler::new();
        let mode = LaunchMode::Batch(3);
        assert_eq!(scheduler.trigger(mode, &INTRO_CAPS), 3);
        // 0.05 s ticks: launches at t = 0, 0.1, 0.2
        assert_eq!(
            run(&mut scheduler, mode, &INTRO_CAPS, 0.05, 6),
            vec![1, 0, 1, 0, 1, 0]
        );
        assert_eq!(scheduler.launched_count(), 3);
        assert_eq!(scheduler.queued(), 0);
    }

    #[test]
    fn test_long_tick_releases_several() {
        let mut scheduler = LaunchScheduler::new();
        let mode = LaunchMode::Batch(10);
        scheduler.trigger(mode, &INTRO_CAPS);
        // Second tick covers t = 0.1 and t = 0.2
        assert_eq!(run(&mut scheduler, mode, &INTRO_CAPS, 0.25, 2), vec![1, 2]);
    }

    #[test]
    fn test_batch_respects_total_cap() {
        let caps = LaunchCaps {
            total: Some(5),
            per_bin: None,
        };
        let mut scheduler = LaunchScheduler::new();
        let mode = LaunchMode::Batch(10);
        assert_eq!(scheduler.trigger(mode, &caps), 5);
        assert!(scheduler.refresh_cap(&caps, 0));
        assert!(scheduler.is_capped());
        let launched: u32 = run(&mut scheduler, mode, &caps, 0.1, 20).iter().sum();
        assert_eq!(launched, 5);
        assert_eq!(scheduler.trigger(mode, &caps), 0);
    }

    #[test]
    fn test_all_remaining_counts_what_is_left() {
        let mut scheduler = LaunchScheduler::new();
        scheduler.trigger(LaunchMode::Batch(10), &INTRO_CAPS);
        run(&mut scheduler, LaunchMode::Batch(10), &INTRO_CAPS, 1.0, 10);
        assert_eq!(scheduler.launched_count(), 10);
        assert_eq!(scheduler.trigger(LaunchMode::AllRemaining, &INTRO_CAPS), 90);
    }

    #[test]
    fn test_paused_holds_queue() {
        let mut scheduler = LaunchScheduler::new();
        let mode = LaunchMode::Batch(2);
        scheduler.trigger(mode, &INTRO_CAPS);
        assert_eq!(scheduler.due_launches(mode, &INTRO_CAPS, false, false, 1.0), 0);
        assert_eq!(scheduler.queued(), 2);
    }

    #[test]
    fn test_continuous_interval_per_display() {
        let caps = LaunchCaps {
            total: None,
            per_bin: Some(9999),
        };
        // 1/64 s ticks keep the accumulated time exact
        let dt = 1.0 / 64.0;
        for (display, expected) in [
            (DisplayMode::Ball, 14),
            (DisplayMode::Path, 25),
            (DisplayMode::Hidden, 100),
        ] {
            let mode = LaunchMode::Continuous(display);
            let mut scheduler = LaunchScheduler::new();
            let launched: u32 = run(&mut scheduler, mode, &caps, dt, 100).iter().sum();
            assert_eq!(launched, expected, "{:?}", display);
        }
    }

    #[test]
    fn test_continuous_stops_when_bin_capped() {
        let caps = LaunchCaps {
            total: None,
            per_bin: Some(3),
        };
        let mode = LaunchMode::Continuous(DisplayMode::Hidden);
        let mut scheduler = LaunchScheduler::new();
        assert_eq!(scheduler.due_launches(mode, &caps, true, true, 1.0), 0);
        assert!(scheduler.refresh_cap(&caps, 3));
        assert!(!scheduler.refresh_cap(&caps, 3));
    }

    #[test]
    fn test_lowered_cap_trims_queue() {
        let mut scheduler = LaunchScheduler::new();
        let mode = LaunchMode::Batch(10);
        scheduler.trigger(mode, &INTRO_CAPS);
        run(&mut scheduler, mode, &INTRO_CAPS, 0.1, 3);
        assert_eq!(scheduler.launched_count(), 3);

        let lowered = LaunchCaps {
            total: Some(5),
            per_bin: None,
        };
        assert!(scheduler.refresh_cap(&lowered, 0));
        assert_eq!(scheduler.queued(), 2);
        let launched: u32 = run(&mut scheduler, mode, &lowered, 0.1, 20).iter().sum();
        assert_eq!(launched, 2);
        assert_eq!(scheduler.launched_count(), 5);

        // Below what was already launched: nothing more goes out
        let mut scheduler = LaunchScheduler::new();
        scheduler.trigger(mode, &INTRO_CAPS);
        run(&mut scheduler, mode, &INTRO_CAPS, 0.1, 4);
        let tiny = LaunchCaps {
            total: Some(2),
            per_bin: None,
        };
        scheduler.refresh_cap(&tiny, 0);
        assert_eq!(scheduler.queued(), 0);
        assert_eq!(run(&mut scheduler, mode, &tiny, 0.1, 20).iter().sum::<u32>(), 0);
        assert_eq!(scheduler.launched_count(), 4);
    }

    #[test]
    fn test_reset() {
        let mut scheduler = LaunchScheduler::new();
        scheduler.trigger(LaunchMode::Batch(4), &INTRO_CAPS);
        run(&mut scheduler, LaunchMode::Batch(4), &INTRO_CAPS, 0.1, 2);
        scheduler.reset();
        assert_eq!(scheduler.launched_count(), 0);
        assert_eq!(scheduler.queued(), 0);
        assert!(!scheduler.is_capped());
    }
}
