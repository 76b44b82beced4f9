//! Brickfall headless driver
//!
//! Runs an autopilot session at a simulated 60 fps until game over, level
//! complete or the frame limit, then prints a JSON summary.
//!
//! Usage: `brickfall [tuning.json] [seed]`. Set `RUST_LOG=debug` to see
//! individual contacts.

use std::error::Error;
use std::process::ExitCode;

use brickfall::Tuning;
use brickfall::sim::{FrameClock, GameEvent, GameState, RulePhase, TickInput};

/// Simulated display refresh
const FRAME_DT: f32 = 1.0 / 60.0;
/// Five minutes of play
const MAX_FRAMES: u32 = 60 * 60 * 5;
const DEFAULT_SEED: u64 = 0x5EED;

fn main() -> ExitCode {
    #[cfg(not(target_arch = "wasm32"))]
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    match run() {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            log::error!("{e}");
            ExitCode::FAILURE
        }
    }
}

fn run() -> Result<(), Box<dyn Error>> {
    let mut args = std::env::args().skip(1);
    let tuning = match args.next() {
        Some(path) => {
            log::info!("Loading tuning from {path}");
            Tuning::from_json(&std::fs::read_to_string(&path)?)?
        }
        None => Tuning::default(),
    };
    let seed = match args.next() {
        Some(s) => s.parse()?,
        None => DEFAULT_SEED,
    };

    let mut state = GameState::new(tuning, seed)?;
    let mut clock = FrameClock::new();
    let input = TickInput {
        idle_mode: true,
        ..Default::default()
    };

    for frame in 0..MAX_FRAMES {
        clock.advance(&mut state, &input, FRAME_DT);
        for event in state.take_events() {
            log_event(frame, &event);
        }
        if matches!(state.phase(), RulePhase::GameOver | RulePhase::LevelComplete) {
            break;
        }
    }

    println!("{}", serde_json::to_string_pretty(&state.summary())?);
    Ok(())
}

fn log_event(frame: u32, event: &GameEvent) {
    match event {
        GameEvent::Collision(collision) => log::debug!("[{frame}] {collision:?}"),
        _ => log::info!("[{frame}] {event:?}"),
    }
}
