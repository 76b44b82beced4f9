//! Deterministic simulation module
//!
//! All gameplay logic lives here. This module must be pure and deterministic:
//! - Fixed timestep only
//! - Seeded RNG only
//! - Stable iteration order (by brick ID)
//! - No rendering or platform dependencies

pub mod bricks;
pub mod collision;
pub mod events;
pub mod geometry;
pub mod rules;
pub mod state;
pub mod tick;

pub use bricks::{Brick, BrickGrid, GridLayout, color_for_row};
pub use collision::{BallState, ColliderId, CollisionResolver, paddle_bounce_velocity};
pub use events::{BrickColor, ChangeCause, CollisionEvent, GameEvent, RuleCommand, WallSide};
pub use geometry::{Circle, Edge, Penetration, Rect, circle_rect_overlap};
pub use rules::{GameRuleCoordinator, GameRuleState, MilestoneFlags, RulePhase};
pub use state::{GameState, Paddle, SessionSummary};
pub use tick::{FrameClock, TickInput, tick};
