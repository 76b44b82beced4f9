//! Game rules: score, lives, hit count and one-shot milestones
//!
//! [`GameRuleCoordinator`] is the single writer of rule state and the only
//! component allowed to flip milestone flags. It consumes gameplay
//! notifications and queues [`RuleCommand`]s for the tick loop to apply at the
//! tick boundary, plus [`GameEvent`]s for outside observers.
//!
//! Phases: `Idle -> Playing -> (GameOver | LevelComplete)`, and back to
//! `Playing` through `Resetting` on restart. Every transition is published as
//! [`GameEvent::PhaseChanged`], so observers see `Resetting` bracket the
//! restored values even though the coordinator passes through it within one
//! call.

use serde::{Deserialize, Serialize};

use super::events::{BrickColor, ChangeCause, GameEvent, RuleCommand};
use crate::tuning::Tuning;

/// Rule state machine phase
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum RulePhase {
    /// Waiting for the first serve
    Idle,
    Playing,
    /// Transient: values are being restored by a restart. Only visible
    /// through the event stream.
    Resetting,
    GameOver,
    LevelComplete,
}

/// One-shot flags. Each goes false -> true at most once per session.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct MilestoneFlags {
    pub first_hit_milestone: bool,
    pub second_hit_milestone: bool,
    pub orange_row: bool,
    pub red_row: bool,
    /// Set when the red row first breaks; shrink waits for a ceiling hit
    pub paddle_shrink_armed: bool,
    pub paddle_shrunk: bool,
}

/// Score, lives and milestone progress
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GameRuleState {
    pub score: u64,
    pub lives: u32,
    /// Bricks destroyed this session
    pub hit_count: u32,
    pub flags: MilestoneFlags,
}

impl GameRuleState {
    fn new(lives: u32) -> Self {
        Self {
            score: 0,
            lives,
            hit_count: 0,
            flags: MilestoneFlags::default(),
        }
    }
}

/// Rule parameters, taken from [`Tuning`]
#[derive(Debug, Clone, PartialEq)]
pub struct RuleConfig {
    pub initial_lives: u32,
    pub first_hit_milestone: u32,
    pub second_hit_milestone: u32,
    pub speed_increase_factor: f32,
    pub paddle_shrink_factor: f32,
}

impl From<&Tuning> for RuleConfig {
    fn from(t: &Tuning) -> Self {
        Self {
            initial_lives: t.initial_lives,
            first_hit_milestone: t.first_hit_milestone,
            second_hit_milestone: t.second_hit_milestone,
            speed_increase_factor: t.speed_increase_factor,
            paddle_shrink_factor: t.paddle_shrink_factor,
        }
    }
}

/// Flip a one-shot flag; true only on the false -> true transition
#[inline]
fn fire_once(flag: &mut bool) -> bool {
    !std::mem::replace(flag, true)
}

#[derive(Debug, Clone)]
pub struct GameRuleCoordinator {
    state: GameRuleState,
    phase: RulePhase,
    config: RuleConfig,
    commands: Vec<RuleCommand>,
    events: Vec<GameEvent>,
}

impl GameRuleCoordinator {
    pub fn new(tuning: &Tuning) -> Self {
        let config = RuleConfig::from(tuning);
        Self {
            state: GameRuleState::new(config.initial_lives),
            phase: RulePhase::Idle,
            config,
            commands: Vec::new(),
            events: Vec::new(),
        }
    }

    pub fn state(&self) -> &GameRuleState {
        &self.state
    }

    pub fn phase(&self) -> RulePhase {
        self.phase
    }

    pub fn is_playing(&self) -> bool {
        self.phase == RulePhase::Playing
    }

    /// Idle -> Playing. No-op in any other phase.
    pub fn start(&mut self) -> bool {
        if self.phase != RulePhase::Idle {
            return false;
        }
        self.set_phase(RulePhase::Playing);
        log::info!("Session started with {} lives", self.state.lives);
        true
    }

    /// Score a destroyed brick and fire any milestones it completes.
    ///
    /// Checks run in fixed order: first hit milestone, second hit milestone,
    /// first orange brick, first red brick.
    pub fn on_brick_destroyed(&mut self, id: u32, color: BrickColor) {
        if !self.is_playing() {
            log::debug!("Ignoring brick {id} destroyed during {:?}", self.phase);
            return;
        }

        self.state.hit_count += 1;
        self.state.score += color.points();
        self.events.push(GameEvent::BrickDestroyed { id, color });
        self.events.push(GameEvent::ScoreChanged {
            score: self.state.score,
            cause: ChangeCause::Gameplay,
        });

        let factor = self.config.speed_increase_factor;
        let hits = self.state.hit_count;
        let flags = &mut self.state.flags;

        if hits == self.config.first_hit_milestone && fire_once(&mut flags.first_hit_milestone) {
            log::info!("Milestone: {hits} hits");
            self.commands.push(RuleCommand::SpeedIncrease(factor));
        }
        if hits == self.config.second_hit_milestone && fire_once(&mut flags.second_hit_milestone) {
            log::info!("Milestone: {hits} hits");
            self.commands.push(RuleCommand::SpeedIncrease(factor));
        }
        if color == BrickColor::Orange && fire_once(&mut flags.orange_row) {
            log::info!("Milestone: orange row reached");
            self.commands.push(RuleCommand::SpeedIncrease(factor));
        }
        if color == BrickColor::Red && fire_once(&mut flags.red_row) {
            log::info!("Milestone: red row reached, paddle shrink armed");
            flags.paddle_shrink_armed = true;
            self.commands.push(RuleCommand::SpeedIncrease(factor));
        }
    }

    /// Apply the armed paddle shrink, once
    pub fn on_ceiling_hit(&mut self) {
        if !self.is_playing() {
            return;
        }
        let flags = &mut self.state.flags;
        if flags.paddle_shrink_armed && fire_once(&mut flags.paddle_shrunk) {
            log::info!("Ceiling hit after red row: shrinking paddle");
            self.commands
                .push(RuleCommand::PaddleShrink(self.config.paddle_shrink_factor));
        }
    }

    /// Lose a life; game over at zero, otherwise re-serve keeping the speed
    pub fn on_ball_out_of_bounds(&mut self) {
        if !self.is_playing() {
            return;
        }
        self.state.lives = self.state.lives.saturating_sub(1);
        self.events.push(GameEvent::LivesChanged {
            lives: self.state.lives,
            cause: ChangeCause::Gameplay,
        });

        if self.state.lives == 0 {
            log::info!("Game over with score {}", self.state.score);
            self.set_phase(RulePhase::GameOver);
            self.events.push(GameEvent::GameOver);
            self.commands.push(RuleCommand::DisablePaddleInput);
        } else {
            log::info!("Ball lost, {} lives left", self.state.lives);
            self.commands.push(RuleCommand::BallReset {
                preserve_multiplier: true,
            });
        }
    }

    pub fn on_all_bricks_destroyed(&mut self) {
        if !self.is_playing() {
            return;
        }
        log::info!("Level complete with score {}", self.state.score);
        self.set_phase(RulePhase::LevelComplete);
        self.events.push(GameEvent::LevelComplete);
    }

    /// Restore session-start values and return to Playing.
    ///
    /// The restored values are emitted between `PhaseChanged(Resetting)` and
    /// `PhaseChanged(Playing)`, tagged [`ChangeCause::Reset`] so side-effectors
    /// can skip sounds and flashes. Queued commands from the old session are
    /// dropped and replaced by a full ball reset.
    pub fn reset(&mut self) {
        self.set_phase(RulePhase::Resetting);
        self.commands.clear();
        self.state = GameRuleState::new(self.config.initial_lives);

        self.events.push(GameEvent::ScoreChanged {
            score: self.state.score,
            cause: ChangeCause::Reset,
        });
        self.events.push(GameEvent::LivesChanged {
            lives: self.state.lives,
            cause: ChangeCause::Reset,
        });
        self.commands.push(RuleCommand::BallReset {
            preserve_multiplier: false,
        });

        self.set_phase(RulePhase::Playing);
        log::info!("Session reset");
    }

    fn set_phase(&mut self, phase: RulePhase) {
        if self.phase != phase {
            log::debug!("Phase {:?} -> {:?}", self.phase, phase);
            self.phase = phase;
            self.events.push(GameEvent::PhaseChanged(phase));
        }
    }

    /// Drain queued commands in emission order
    pub fn take_commands(&mut self) -> Vec<RuleCommand> {
        std::mem::take(&mut self.commands)
    }

    /// Drain queued events in emission order
    pub fn take_events(&mut self) -> Vec<GameEvent> {
        std::mem::take(&mut self.events)
    }
}
