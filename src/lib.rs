//! Brickfall - a deterministic brick-breaker simulation core
//!
//! Core modules:
//! - `sim`: Deterministic simulation (collision response, brick grid, game rules)
//! - `tuning`: Data-driven game balance
//! - `error`: Geometry and configuration errors
//!
//! Rendering, input polling, audio and HUD are external collaborators. They
//! drive the simulation through [`sim::TickInput`] and observe it through the
//! [`sim::GameEvent`] stream drained from [`sim::GameState::take_events`].

pub mod error;
pub mod sim;
pub mod tuning;

pub use error::{ConfigError, GeometryError};
pub use tuning::Tuning;

/// Game configuration constants
pub mod consts {
    /// Fixed simulation timestep (120 Hz for smooth physics)
    pub const SIM_DT: f32 = 1.0 / 120.0;
    /// Maximum substeps per frame to prevent spiral of death
    pub const MAX_SUBSTEPS: u32 = 8;

    /// Arena dimensions (y grows downward, the ceiling is y = 0)
    pub const VIEWPORT_WIDTH: f32 = 800.0;
    pub const VIEWPORT_HEIGHT: f32 = 600.0;

    /// Ball defaults
    pub const BALL_RADIUS: f32 = 8.0;
    pub const BALL_BASE_SPEED: f32 = 300.0;
    /// Serve cone, measured from the +x axis toward +y (downward)
    pub const SERVE_ANGLE_MIN_DEG: f32 = 60.0;
    pub const SERVE_ANGLE_MAX_DEG: f32 = 120.0;

    /// Paddle defaults
    pub const PADDLE_WIDTH: f32 = 100.0;
    pub const PADDLE_HEIGHT: f32 = 16.0;
    pub const PADDLE_Y: f32 = 560.0;
    /// Max paddle speed (pixels/s)
    pub const PADDLE_SPEED: f32 = 500.0;
    /// Fraction of ball speed that can be steered sideways by an edge hit
    pub const PADDLE_STEER_FACTOR: f32 = 0.6;
    /// How much paddle motion nudges the steer offset
    pub const PADDLE_MOMENTUM_TRANSFER: f32 = 0.25;
    /// Speed boost when ball hits paddle (multiplicative)
    pub const BOUNCE_BOOST: f32 = 1.1;

    /// Brick grid defaults
    pub const BRICK_ROWS: u32 = 8;
    pub const BRICK_COLUMNS: u32 = 14;
    pub const BRICK_ROWS_PER_COLOR: u32 = 2;
    pub const BRICK_WIDTH: f32 = 52.0;
    pub const BRICK_HEIGHT: f32 = 18.0;
    pub const BRICK_GAP: f32 = 4.0;
    pub const BRICK_TOP_OFFSET: f32 = 60.0;
    /// Largest grid a session accepts (rows * columns)
    pub const MAX_BRICKS: u32 = 4096;

    /// Rules
    pub const INITIAL_LIVES: u32 = 3;
    pub const HIT_MILESTONE_FIRST: u32 = 4;
    pub const HIT_MILESTONE_SECOND: u32 = 12;
    pub const SPEED_INCREASE_FACTOR: f32 = 1.15;
    pub const PADDLE_SHRINK_FACTOR: f32 = 0.6;
}
