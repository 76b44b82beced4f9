//! Typed events and commands passed between simulation components
//!
//! Flow per tick: the collision resolver produces [`CollisionEvent`]s, the
//! rule coordinator turns them into [`RuleCommand`]s (applied at the tick
//! boundary) and outbound [`GameEvent`]s (for rendering, HUD and audio).

use serde::{Deserialize, Serialize};

use super::geometry::Edge;
use super::rules::RulePhase;

/// Brick colors, top row first
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum BrickColor {
    Red,
    Orange,
    Green,
    Yellow,
}

impl BrickColor {
    /// Top-to-bottom palette
    pub const PALETTE: [BrickColor; 4] = [
        BrickColor::Red,
        BrickColor::Orange,
        BrickColor::Green,
        BrickColor::Yellow,
    ];

    /// Points awarded for destroying a brick of this color
    pub fn points(self) -> u64 {
        match self {
            BrickColor::Yellow => 1,
            BrickColor::Green => 3,
            BrickColor::Orange => 5,
            BrickColor::Red => 7,
        }
    }
}

/// Arena wall that reflects the ball. The floor is not a wall: crossing it
/// loses a life.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum WallSide {
    Left,
    Right,
    Ceiling,
}

/// One resolved contact
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum CollisionEvent {
    Wall(WallSide),
    /// Contact offset from paddle center, normalized to [-1, 1]
    Paddle { offset: f32 },
    Brick { id: u32, color: BrickColor, edge: Edge },
}

/// Commands emitted by the rule coordinator, applied between ticks
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum RuleCommand {
    /// Multiply ball (and paddle) speed
    SpeedIncrease(f32),
    /// Multiply paddle width
    PaddleShrink(f32),
    /// Re-serve the ball after a lost life
    BallReset { preserve_multiplier: bool },
    /// Stop accepting paddle input
    DisablePaddleInput,
}

/// Why a displayed value changed
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ChangeCause {
    Gameplay,
    /// Restart; side-effectors should skip sounds and flashes
    Reset,
}

/// Outbound notifications for rendering, HUD and audio
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum GameEvent {
    ScoreChanged { score: u64, cause: ChangeCause },
    LivesChanged { lives: u32, cause: ChangeCause },
    BrickDestroyed { id: u32, color: BrickColor },
    Collision(CollisionEvent),
    SpeedIncreased { multiplier: f32 },
    PaddleShrinkApplied { width: f32 },
    BallServed,
    /// Rule phase transition. A restart reads `Resetting`, the
    /// [`ChangeCause::Reset`] value changes, then `Playing`.
    PhaseChanged(RulePhase),
    GameOver,
    LevelComplete,
}
