//! Plinko Probability headless driver
//!
//! Runs a board at a fixed frame rate with play held down and prints the
//! final snapshot as JSON.
//!
//! Usage: `plinko-probability [seed] [intro|lab|lab-lowered|<settings.json>] [seconds]`

use plinko_probability::consts::FRAME_DT;
use plinko_probability::sim::{PlinkoState, TickInput, tick};
use plinko_probability::{ConfigError, Settings};

const DEFAULT_SEED: u64 = 42;
const DEFAULT_SECONDS: f64 = 30.0;

struct Args {
    seed: u64,
    settings: Settings,
    seconds: f64,
}

fn parse_args() -> Result<Args, String> {
    let mut args = std::env::args().skip(1);

    let seed = match args.next() {
        Some(s) => s.parse().map_err(|_| format!("invalid seed: {}", s))?,
        None => DEFAULT_SEED,
    };
    let settings = match args.next().as_deref() {
        None | Some("intro") => Settings::intro(),
        Some("lab") => Settings::lab(),
        Some("lab-lowered") => Settings::lab_lowered_maximum(),
        Some(path) => Settings::load(path).map_err(|e: ConfigError| e.to_string())?,
    };
    let seconds = match args.next() {
        Some(s) => s
            .parse::<f64>()
            .ok()
            .filter(|v| v.is_finite() && *v >= 0.0)
            .ok_or_else(|| format!("invalid duration: {}", s))?,
        None => DEFAULT_SECONDS,
    };

    Ok(Args {
        seed,
        settings,
        seconds,
    })
}

fn run(args: Args) -> Result<String, String> {
    let mut state = PlinkoState::new(args.seed, args.settings).map_err(|e| e.to_string())?;
    let frames = (args.seconds / FRAME_DT).round() as u64;
    log::info!("Running {} frames", frames);

    // Discrete modes need a press per launch group; continuous ones just keep playing
    let continuous = state.settings().launch_mode.is_continuous();
    let play = TickInput {
        play: true,
        pause: false,
    };
    let idle = TickInput::default();
    for frame in 0..frames {
        let input = if frame == 0 || (!continuous && state.scheduler().queued() == 0) {
            &play
        } else {
            &idle
        };
        tick(&mut state, input, FRAME_DT);
    }

    let stats = state.sample_statistics();
    log::info!(
        "{} launched, {} counted, sample mean {:.3}, theoretical mean {:.3}",
        state.launched_count(),
        stats.landed,
        stats.mean,
        state.theoretical_statistics().mean
    );

    serde_json::to_string_pretty(&state.snapshot()).map_err(|e| e.to_string())
}

#[cfg(not(target_arch = "wasm32"))]
fn main() {
    env_logger::init();
    log::info!("Plinko Probability (headless) starting...");

    let result = parse_args().and_then(run);
    match result {
        Ok(json) => println!("{}", json),
        Err(err) => {
            log::error!("{}", err);
            std::process::exit(1);
        }
    }
}

#[cfg(target_arch = "wasm32")]
fn main() {
    // Embedders drive `PlinkoState` directly on the web
}
