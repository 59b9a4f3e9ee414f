//! # Team tactics
//!
//! 팀 단위 상태와 전술 판단:
//! - [`Team`]: roster, team FSM, support spots and the tactical pointers
//!   (controlling / supporting / receiving / closest)
//! - `team`: roster bookkeeping on the world (closest player, home regions)
//! - `passing`: pass safety, shot search, pass search and pass requests
//! - `team_states`: Defending / Attacking / PrepareForKickOff

mod passing;
mod team;
mod team_states;

pub use team_states::TeamState;

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::engine::fsm::StateMachine;
use crate::engine::support_spot::{SupportSpot, SupportSpotCalculator};
use crate::player::PlayerId;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum TeamColor {
    /// Defends the left goal.
    Red,
    /// Defends the right goal.
    Blue,
}

impl TeamColor {
    /// Update order within a tick.
    pub const BOTH: [TeamColor; 2] = [TeamColor::Red, TeamColor::Blue];

    pub fn opponent(self) -> TeamColor {
        match self {
            TeamColor::Red => TeamColor::Blue,
            TeamColor::Blue => TeamColor::Red,
        }
    }

    pub fn index(self) -> usize {
        match self {
            TeamColor::Red => 0,
            TeamColor::Blue => 1,
        }
    }
}

impl fmt::Display for TeamColor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TeamColor::Red => write!(f, "Red"),
            TeamColor::Blue => write!(f, "Blue"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Team {
    pub(crate) color: TeamColor,
    /// Keeper first, then field players in lineup order.
    pub(crate) players: Vec<PlayerId>,
    pub(crate) fsm: StateMachine<TeamState>,
    pub(crate) support: SupportSpotCalculator,
    pub(crate) controlling: Option<PlayerId>,
    pub(crate) supporting: Option<PlayerId>,
    pub(crate) receiving: Option<PlayerId>,
    pub(crate) closest_to_ball: Option<PlayerId>,
    pub(crate) closest_dist_sq: f64,
}

impl Team {
    pub(crate) fn new(
        color: TeamColor,
        players: Vec<PlayerId>,
        support: SupportSpotCalculator,
    ) -> Self {
        Self {
            color,
            players,
            fsm: StateMachine::new(TeamState::Defending),
            support,
            controlling: None,
            supporting: None,
            receiving: None,
            closest_to_ball: None,
            closest_dist_sq: f64::MAX,
        }
    }

    pub fn color(&self) -> TeamColor {
        self.color
    }

    pub fn players(&self) -> &[PlayerId] {
        &self.players
    }

    pub fn keeper(&self) -> Option<PlayerId> {
        self.players.first().copied()
    }

    pub fn field_players(&self) -> &[PlayerId] {
        self.players.get(1..).unwrap_or(&[])
    }

    pub fn controlling_player(&self) -> Option<PlayerId> {
        self.controlling
    }

    pub fn supporting_player(&self) -> Option<PlayerId> {
        self.supporting
    }

    pub fn receiver(&self) -> Option<PlayerId> {
        self.receiving
    }

    pub fn closest_to_ball(&self) -> Option<PlayerId> {
        self.closest_to_ball
    }

    pub fn closest_dist_sq(&self) -> f64 {
        self.closest_dist_sq
    }

    pub fn in_control(&self) -> bool {
        self.controlling.is_some()
    }

    pub fn state(&self) -> TeamState {
        self.fsm.current()
    }

    pub fn support_spots(&self) -> &[SupportSpot] {
        self.support.spots()
    }

    pub fn best_support_spot(&self) -> Option<crate::geometry::Vector2D> {
        self.support.best_spot()
    }
}
