//! Data-driven game balance
//!
//! Every constant in [`crate::consts`] has a field here so a session can be
//! re-balanced from JSON without recompiling. Missing fields fall back to the
//! compiled defaults.

use glam::Vec2;
use serde::{Deserialize, Serialize};

use crate::consts::*;
use crate::error::ConfigError;
use crate::sim::bricks::GridLayout;

/// Tunable simulation parameters
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Tuning {
    // === Arena ===
    pub viewport_width: f32,
    pub viewport_height: f32,

    // === Ball ===
    pub ball_radius: f32,
    /// Speed of a freshly served ball with multiplier 1.0 (pixels/s)
    pub ball_base_speed: f32,
    pub serve_angle_min_deg: f32,
    pub serve_angle_max_deg: f32,

    // === Paddle ===
    pub paddle_width: f32,
    pub paddle_height: f32,
    /// Top edge of the paddle
    pub paddle_y: f32,
    pub paddle_speed: f32,
    pub paddle_steer_factor: f32,
    pub paddle_momentum_transfer: f32,
    pub bounce_boost: f32,

    // === Bricks ===
    pub brick_rows: u32,
    pub brick_columns: u32,
    pub brick_rows_per_color: u32,
    pub brick_width: f32,
    pub brick_height: f32,
    pub brick_gap: f32,
    pub brick_top_offset: f32,

    // === Rules ===
    pub initial_lives: u32,
    pub first_hit_milestone: u32,
    pub second_hit_milestone: u32,
    pub speed_increase_factor: f32,
    pub paddle_shrink_factor: f32,
}

impl Default for Tuning {
    fn default() -> Self {
        Self {
            viewport_width: VIEWPORT_WIDTH,
            viewport_height: VIEWPORT_HEIGHT,

            ball_radius: BALL_RADIUS,
            ball_base_speed: BALL_BASE_SPEED,
            serve_angle_min_deg: SERVE_ANGLE_MIN_DEG,
            serve_angle_max_deg: SERVE_ANGLE_MAX_DEG,

            paddle_width: PADDLE_WIDTH,
            paddle_height: PADDLE_HEIGHT,
            paddle_y: PADDLE_Y,
            paddle_speed: PADDLE_SPEED,
            paddle_steer_factor: PADDLE_STEER_FACTOR,
            paddle_momentum_transfer: PADDLE_MOMENTUM_TRANSFER,
            bounce_boost: BOUNCE_BOOST,

            brick_rows: BRICK_ROWS,
            brick_columns: BRICK_COLUMNS,
            brick_rows_per_color: BRICK_ROWS_PER_COLOR,
            brick_width: BRICK_WIDTH,
            brick_height: BRICK_HEIGHT,
            brick_gap: BRICK_GAP,
            brick_top_offset: BRICK_TOP_OFFSET,

            initial_lives: INITIAL_LIVES,
            first_hit_milestone: HIT_MILESTONE_FIRST,
            second_hit_milestone: HIT_MILESTONE_SECOND,
            speed_increase_factor: SPEED_INCREASE_FACTOR,
            paddle_shrink_factor: PADDLE_SHRINK_FACTOR,
        }
    }
}

impl Tuning {
    /// Parse and validate tuning from JSON
    pub fn from_json(json: &str) -> Result<Self, ConfigError> {
        let tuning: Tuning = serde_json::from_str(json)?;
        tuning.validate()?;
        log::info!("Loaded tuning from JSON");
        Ok(tuning)
    }

    /// Serialize to pretty JSON
    pub fn to_json(&self) -> Result<String, ConfigError> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// Reject values the simulation cannot run with
    pub fn validate(&self) -> Result<(), ConfigError> {
        positive("viewport_width", self.viewport_width)?;
        positive("viewport_height", self.viewport_height)?;
        positive("ball_radius", self.ball_radius)?;
        positive("ball_base_speed", self.ball_base_speed)?;
        positive("paddle_speed", self.paddle_speed)?;
        at_least_one("bounce_boost", self.bounce_boost)?;
        at_least_one("speed_increase_factor", self.speed_increase_factor)?;

        if !(self.paddle_shrink_factor > 0.0 && self.paddle_shrink_factor <= 1.0) {
            return Err(out_of_range(
                "paddle_shrink_factor",
                format!("expected (0, 1], got {}", self.paddle_shrink_factor),
            ));
        }
        if !(self.paddle_steer_factor >= 0.0 && self.paddle_steer_factor.is_finite()) {
            return Err(out_of_range(
                "paddle_steer_factor",
                format!("expected >= 0, got {}", self.paddle_steer_factor),
            ));
        }
        if !(self.serve_angle_min_deg < self.serve_angle_max_deg
            && self.serve_angle_min_deg > 0.0
            && self.serve_angle_max_deg < 180.0)
        {
            return Err(out_of_range(
                "serve_angle_min_deg",
                format!(
                    "serve cone must lie strictly inside (0, 180), got {}..{}",
                    self.serve_angle_min_deg, self.serve_angle_max_deg
                ),
            ));
        }
        if self.first_hit_milestone == 0 || self.first_hit_milestone >= self.second_hit_milestone {
            return Err(out_of_range(
                "first_hit_milestone",
                format!(
                    "milestones must satisfy 0 < first < second, got {} and {}",
                    self.first_hit_milestone, self.second_hit_milestone
                ),
            ));
        }
        match self.brick_rows.checked_mul(self.brick_columns) {
            Some(count) if (1..=MAX_BRICKS).contains(&count) => {}
            _ => {
                return Err(out_of_range(
                    "brick_rows",
                    format!(
                        "grid must hold 1..={MAX_BRICKS} bricks, got {} x {}",
                        self.brick_rows, self.brick_columns
                    ),
                ));
            }
        }
        if self.initial_lives == 0 {
            return Err(out_of_range("initial_lives", "must be at least 1".to_string()));
        }
        if self.paddle_width > self.viewport_width {
            return Err(out_of_range(
                "paddle_width",
                format!("paddle is wider than the viewport ({})", self.viewport_width),
            ));
        }

        Ok(())
    }

    /// Brick grid layout centered horizontally in the viewport
    pub fn grid_layout(&self) -> GridLayout {
        let cols = self.brick_columns as f32;
        let grid_width = cols * self.brick_width + (cols - 1.0).max(0.0) * self.brick_gap;
        let left = ((self.viewport_width - grid_width) / 2.0).max(0.0);

        GridLayout {
            rows: self.brick_rows,
            columns: self.brick_columns,
            rows_per_color: self.brick_rows_per_color,
            brick_size: Vec2::new(self.brick_width, self.brick_height),
            gap: self.brick_gap,
            origin: Vec2::new(left, self.brick_top_offset),
            mask: None,
        }
    }

    /// Ball position at serve time (arena center)
    pub fn serve_position(&self) -> Vec2 {
        Vec2::new(self.viewport_width / 2.0, self.viewport_height / 2.0)
    }
}

fn positive(name: &'static str, value: f32) -> Result<(), ConfigError> {
    if value > 0.0 && value.is_finite() {
        Ok(())
    } else {
        Err(out_of_range(name, format!("expected > 0, got {value}")))
    }
}

fn at_least_one(name: &'static str, value: f32) -> Result<(), ConfigError> {
    if value >= 1.0 && value.is_finite() {
        Ok(())
    } else {
        Err(out_of_range(name, format!("expected >= 1.0, got {value}")))
    }
}

fn out_of_range(name: &'static str, reason: String) -> ConfigError {
    ConfigError::OutOfRange { name, reason }
}
