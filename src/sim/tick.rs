//! Per-frame simulation tick
//!
//! One call per animation frame: launch whatever is due, move every ball,
//! feed transitions to the histogram and retire finished balls.

use super::state::PlinkoState;

/// One-shot inputs for a single tick
#[derive(Debug, Clone, Default)]
pub struct TickInput {
    /// Play button (launches in discrete modes, starts the stream in continuous mode)
    pub play: bool,
    /// Stop launching
    pub pause: bool,
}

/// Advance the board by `dt` seconds
pub fn tick(state: &mut PlinkoState, input: &TickInput, dt: f64) {
    if input.pause {
        state.pause();
    }
    if input.play {
        state.trigger();
    }

    state.time += dt;
    let mode = state.settings.launch_mode;
    let caps = state.settings.caps;

    // Launch whatever is due
    let bin_capped = state.is_bin_capped();
    let due = state
        .scheduler
        .due_launches(mode, &caps, state.playing, bin_capped, dt);
    for _ in 0..due {
        // The per-bin cap can fill up partway through a burst
        if state.is_bin_capped() {
            break;
        }
        state.launch_ball();
    }

    // Move balls and count transitions
    let ball_dt = mode.ball_time_step(dt);
    let count_on_exit = mode.is_continuous();
    let mut landed_ids = Vec::new();

    for i in 0..state.balls.len() {
        let ball = &mut state.balls[i];
        let events = match ball_dt {
            Some(ball_dt) => ball.step(ball_dt),
            None => ball.land_now(),
        };
        if !events.any() {
            continue;
        }

        let (id, bin) = (ball.id, ball.bin_index);
        let counts_now = if count_on_exit {
            events.exited
        } else {
            events.landed
        };
        if counts_now {
            match state.histogram.add_ball(bin) {
                Ok(count) => log::debug!("Ball {} counted in bin {} ({} total)", id, bin, count),
                Err(err) => log::warn!("Ball {} not counted: {}", id, err),
            }
        }
        if events.landed {
            landed_ids.push(id);
        }
    }

    // Retire landed balls
    if !landed_ids.is_empty() {
        if mode.is_continuous() {
            // Trail: only the most recent landing stays on the board
            if let Some(&latest) = landed_ids.last() {
                state.balls.retain(|b| !b.is_landed() || b.id == latest);
            }
        } else {
            state.balls.retain(|b| !b.is_landed());
        }
    }

    state.refresh_cap();
}
