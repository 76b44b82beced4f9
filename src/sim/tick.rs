//! Fixed timestep simulation tick
//!
//! Core game loop that advances a session deterministically. Each tick runs
//! in a fixed order:
//! 1. paddle input
//! 2. ball integration
//! 3. overlap tests: walls, then paddle, then bricks
//! 4. rule notifications (synchronous)
//! 5. tick boundary: queued commands are applied
//!
//! Commands that change collision geometry (paddle shrink) or teleport the
//! ball (serve) only ever run in step 5, after every overlap query of the
//! tick has finished.

use super::events::{CollisionEvent, GameEvent, WallSide};
use super::rules::RulePhase;
use super::state::GameState;
use crate::consts::{MAX_SUBSTEPS, SIM_DT};

/// Input commands for a single tick (deterministic)
#[derive(Debug, Clone, Default)]
pub struct TickInput {
    /// Desired paddle center x (from mouse/touch/keys)
    pub target_x: Option<f32>,
    /// Serve the first ball
    pub launch: bool,
    /// Start a new session
    pub restart: bool,
    /// Idle/demo mode - autopilot plays the game
    pub idle_mode: bool,
}

/// Advance the game state by one fixed timestep
pub fn tick(state: &mut GameState, input: &TickInput, dt: f32) {
    if input.restart {
        state.restart();
        return;
    }

    let input = autopilot(state, input);

    if state.phase() == RulePhase::Idle && input.launch && state.rules.start() {
        state.resolver.reset_for_serve(true);
        state.emit(GameEvent::BallServed);
    }

    state.time_ticks += 1;

    // Paddle
    match input.target_x {
        Some(target) => state.paddle.move_toward(target, dt),
        None => state.paddle.velocity_x = 0.0,
    }

    if !state.rules.is_playing() {
        return;
    }

    // Ball
    state.resolver.advance(dt);

    // Walls
    if let Some(event) = state.resolver.resolve_wall_contact() {
        state.emit(GameEvent::Collision(event));
        if event == CollisionEvent::Wall(WallSide::Ceiling) {
            state.rules.on_ceiling_hit();
        }
    }

    // Paddle
    if let Some(event) = state.resolver.resolve_paddle_contact(&state.paddle) {
        state.emit(GameEvent::Collision(event));
    }

    // Bricks
    if let Some(event) = state.resolver.resolve_brick_contacts(state.grid.live_bricks()) {
        state.emit(GameEvent::Collision(event));
        if let CollisionEvent::Brick { id, .. } = event {
            if let Some((color, remaining)) = state.grid.destroy(id) {
                state.rules.on_brick_destroyed(id, color);
                if remaining == 0 {
                    state.rules.on_all_bricks_destroyed();
                }
            }
        }
    }

    // Floor
    if state.resolver.is_out_of_bounds() {
        state.rules.on_ball_out_of_bounds();
    }

    state.apply_commands();
}

/// Fill in inputs for idle/demo mode
fn autopilot(state: &GameState, input: &TickInput) -> TickInput {
    let mut input = input.clone();
    if !input.idle_mode {
        return input;
    }

    if state.phase() == RulePhase::Idle {
        input.launch = true;
    }

    // Track the ball with an oscillating offset to avoid perfect loops
    let time_factor = state.time_ticks as f32 * 0.01;
    let offset = (time_factor.sin() * 0.3 + (time_factor * 0.7).sin() * 0.15)
        * state.paddle.size.x
        * 0.5;
    let ball = state.resolver.ball();
    input.target_x = Some(ball.position.x + offset);
    input
}

/// Converts variable frame times into fixed simulation steps
#[derive(Debug, Clone, Default)]
pub struct FrameClock {
    accumulator: f32,
}

impl FrameClock {
    pub fn new() -> Self {
        Self::default()
    }

    /// Run as many fixed ticks as `frame_dt` allows, capped at
    /// [`MAX_SUBSTEPS`]. Returns the number of ticks run.
    pub fn advance(&mut self, state: &mut GameState, input: &TickInput, frame_dt: f32) -> u32 {
        self.accumulator += frame_dt.clamp(0.0, 0.1);

        let mut input = input.clone();
        let mut substeps = 0;
        while self.accumulator >= SIM_DT && substeps < MAX_SUBSTEPS {
            tick(state, &input, SIM_DT);
            self.accumulator -= SIM_DT;
            substeps += 1;

            // Clear one-shot inputs after processing
            input.launch = false;
            input.restart = false;
        }

        // Drop backlog the substep cap could not absorb
        if substeps == MAX_SUBSTEPS {
            self.accumulator = self.accumulator.min(SIM_DT);
        }
        substeps
    }
}
