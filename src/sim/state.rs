//! Game state and core simulation types
//!
//! [`GameState`] bundles one session: the collision resolver (ball), the
//! paddle, the brick grid and the rule coordinator, plus the command queue
//! drained at each tick boundary and the outbound event log.

use glam::Vec2;
use serde::{Deserialize, Serialize};

use super::bricks::BrickGrid;
use super::collision::CollisionResolver;
use super::events::{GameEvent, RuleCommand};
use super::geometry::{Rect, validate_size};
use super::rules::{GameRuleCoordinator, RulePhase};
use crate::error::{ConfigError, GeometryError};
use crate::tuning::Tuning;

/// The player's paddle
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Paddle {
    /// Top-left corner
    pub position: Vec2,
    pub size: Vec2,
    /// Horizontal velocity over the last move (for momentum transfer)
    pub velocity_x: f32,
    pub speed_multiplier: f32,
    /// Max speed at multiplier 1.0 (pixels/s)
    pub base_speed: f32,
    /// Cleared on game over
    pub input_enabled: bool,
    viewport_width: f32,
    initial_size: Vec2,
}

impl Paddle {
    /// Centered horizontally at the configured height
    pub fn new(tuning: &Tuning) -> Result<Self, GeometryError> {
        let size = Vec2::new(tuning.paddle_width, tuning.paddle_height);
        validate_size("paddle", size)?;
        if !(tuning.paddle_speed > 0.0 && tuning.paddle_speed.is_finite()) {
            return Err(GeometryError::InvalidSpeed {
                entity: "paddle",
                speed: tuning.paddle_speed,
            });
        }

        let mut paddle = Self {
            position: Vec2::new(0.0, tuning.paddle_y),
            size,
            velocity_x: 0.0,
            speed_multiplier: 1.0,
            base_speed: tuning.paddle_speed,
            input_enabled: true,
            viewport_width: tuning.viewport_width,
            initial_size: size,
        };
        paddle.set_center_x(tuning.viewport_width / 2.0);
        Ok(paddle)
    }

    /// Collision rectangle
    pub fn rect(&self) -> Rect {
        Rect {
            center: self.center(),
            half_size: self.size / 2.0,
        }
    }

    pub fn center(&self) -> Vec2 {
        self.position + self.size / 2.0
    }

    /// Effective max speed
    pub fn speed(&self) -> f32 {
        self.base_speed * self.speed_multiplier
    }

    /// Move the paddle center toward `target_x`, limited by max speed
    pub fn move_toward(&mut self, target_x: f32, dt: f32) {
        if !self.input_enabled || dt <= 0.0 {
            self.velocity_x = 0.0;
            return;
        }
        let current = self.center().x;
        let max_delta = self.speed() * dt;
        let delta = (target_x - current).clamp(-max_delta, max_delta);

        self.set_center_x(current + delta);
        // Report the motion that actually happened, walls included
        self.velocity_x = (self.center().x - current) / dt;
    }

    /// Resize around the current center, then re-clamp to the arena
    pub fn set_size(&mut self, new_size: Vec2) {
        if validate_size("paddle", new_size).is_err() {
            log::warn!("Ignoring invalid paddle size {new_size:?}");
            return;
        }
        let center = self.center();
        self.size = new_size;
        self.position.y = center.y - new_size.y / 2.0;
        self.set_center_x(center.x);
    }

    pub fn set_speed_multiplier(&mut self, multiplier: f32) {
        if multiplier > 0.0 && multiplier.is_finite() {
            self.speed_multiplier = multiplier;
        } else {
            log::warn!("Ignoring invalid paddle speed multiplier {multiplier}");
        }
    }

    /// Back to the session-start size, speed and position, input enabled
    pub fn restore(&mut self) {
        let y = self.center().y;
        self.size = self.initial_size;
        self.position.y = y - self.size.y / 2.0;
        self.speed_multiplier = 1.0;
        self.velocity_x = 0.0;
        self.input_enabled = true;
        self.set_center_x(self.viewport_width / 2.0);
    }

    fn set_center_x(&mut self, center_x: f32) {
        let max_x = (self.viewport_width - self.size.x).max(0.0);
        self.position.x = (center_x - self.size.x / 2.0).clamp(0.0, max_x);
    }
}

/// Snapshot of a session for logging and the headless driver
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SessionSummary {
    pub seed: u64,
    pub ticks: u64,
    pub phase: RulePhase,
    pub score: u64,
    pub lives: u32,
    pub hit_count: u32,
    pub speed_multiplier: f32,
    pub paddle_width: f32,
    pub bricks_left: usize,
    pub destroyed: Vec<u32>,
}

/// Complete session state (deterministic for a given seed and input stream)
#[derive(Debug, Clone)]
pub struct GameState {
    /// Run seed for reproducibility
    pub seed: u64,
    pub tuning: Tuning,
    /// Simulation tick counter
    pub time_ticks: u64,
    pub resolver: CollisionResolver,
    pub paddle: Paddle,
    pub grid: BrickGrid,
    pub rules: GameRuleCoordinator,
    /// Commands waiting for the tick boundary
    pending: Vec<RuleCommand>,
    events: Vec<GameEvent>,
}

impl GameState {
    /// Create a new session in the Idle phase. The tuning is validated
    /// first, so hand-built values get the same checks as JSON ones.
    pub fn new(tuning: Tuning, seed: u64) -> Result<Self, ConfigError> {
        tuning.validate()?;
        let resolver = CollisionResolver::new(&tuning, seed)?;
        let paddle = Paddle::new(&tuning)?;
        let grid = BrickGrid::instantiate(&tuning.grid_layout())?;
        let rules = GameRuleCoordinator::new(&tuning);

        Ok(Self {
            seed,
            tuning,
            time_ticks: 0,
            resolver,
            paddle,
            grid,
            rules,
            pending: Vec::new(),
            events: Vec::new(),
        })
    }

    pub fn phase(&self) -> RulePhase {
        self.rules.phase()
    }

    /// Queue an outbound event
    pub fn emit(&mut self, event: GameEvent) {
        self.events.push(event);
    }

    /// Drain outbound events in emission order
    pub fn take_events(&mut self) -> Vec<GameEvent> {
        std::mem::take(&mut self.events)
    }

    /// Commands still waiting for the tick boundary
    pub fn pending_commands(&self) -> &[RuleCommand] {
        &self.pending
    }

    /// Collect rule output. Commands wait in the queue until
    /// [`GameState::apply_commands`].
    pub fn collect_rule_output(&mut self) {
        let events = self.rules.take_events();
        self.events.extend(events);
        let commands = self.rules.take_commands();
        self.pending.extend(commands);
    }

    /// Tick boundary: apply every queued command in order
    pub fn apply_commands(&mut self) {
        self.collect_rule_output();
        for command in std::mem::take(&mut self.pending) {
            self.apply_command(command);
        }
    }

    fn apply_command(&mut self, command: RuleCommand) {
        match command {
            RuleCommand::SpeedIncrease(factor) => {
                self.resolver.apply_speed_multiplier(factor);
                let paddle_multiplier = self.paddle.speed_multiplier * factor;
                self.paddle.set_speed_multiplier(paddle_multiplier);
                self.emit(GameEvent::SpeedIncreased {
                    multiplier: self.resolver.speed_multiplier(),
                });
            }
            RuleCommand::PaddleShrink(factor) => {
                let size = Vec2::new(self.paddle.size.x * factor, self.paddle.size.y);
                self.paddle.set_size(size);
                log::info!("Paddle width now {:.1}", self.paddle.size.x);
                self.emit(GameEvent::PaddleShrinkApplied {
                    width: self.paddle.size.x,
                });
            }
            RuleCommand::BallReset {
                preserve_multiplier,
            } => {
                self.resolver.reset_for_serve(preserve_multiplier);
                self.emit(GameEvent::BallServed);
            }
            RuleCommand::DisablePaddleInput => {
                self.paddle.input_enabled = false;
                self.paddle.velocity_x = 0.0;
            }
        }
    }

    /// Full restart: rules, bricks, paddle and ball multiplier
    pub fn restart(&mut self) {
        self.pending.clear();
        self.rules.reset();
        self.grid.reset();
        self.paddle.restore();
        self.apply_commands();
    }

    pub fn summary(&self) -> SessionSummary {
        let rules = self.rules.state();
        SessionSummary {
            seed: self.seed,
            ticks: self.time_ticks,
            phase: self.phase(),
            score: rules.score,
            lives: rules.lives,
            hit_count: rules.hit_count,
            speed_multiplier: self.resolver.speed_multiplier(),
            paddle_width: self.paddle.size.x,
            bricks_left: self.grid.live_count(),
            destroyed: self.grid.destroyed_ids().to_vec(),
        }
    }
}
