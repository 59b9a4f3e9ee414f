//! # Players
//!
//! 선수 데이터와 행동:
//! - [`Player`]: kinematic body, steering, home region and the brain
//!   (a field player or keeper state machine)
//! - `awareness`: questions a player asks about the match (threats, ranges,
//!   hot region, home region) and small actions (tracking, finding support)
//! - `motion`: per-tick update, steering and integration
//! - `field_states` / `keeper_states`: the two state graphs

mod awareness;
mod field_states;
mod keeper_states;
mod motion;

pub use field_states::FieldPlayerState;
pub use keeper_states::KeeperState;

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::engine::entity::MovingEntity;
use crate::engine::fsm::StateMachine;
use crate::engine::messaging::EntityId;
use crate::engine::regulator::Regulator;
use crate::engine::steering::Steering;
use crate::geometry::Vector2D;
use crate::tactics::TeamColor;

/// Index into the world's player arena.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct PlayerId(pub usize);

impl fmt::Display for PlayerId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "P{}", self.0)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum PlayerRole {
    GoalKeeper,
    Attacker,
    Defender,
}

/// Which state graph drives the player, plus the data only that kind needs.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum Brain {
    Field {
        fsm: StateMachine<FieldPlayerState>,
        /// Caps how often the player may kick.
        kick_limiter: Regulator,
    },
    Keeper {
        fsm: StateMachine<KeeperState>,
        /// Always points at the ball unless a keeper holds it.
        look_at: Vector2D,
    },
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Player {
    pub(crate) id: PlayerId,
    pub(crate) body: MovingEntity,
    pub(crate) steering: Steering,
    pub(crate) team: TeamColor,
    pub(crate) role: PlayerRole,
    pub(crate) home_region: usize,
    pub(crate) default_region: usize,
    /// Refreshed by the team at the start of its update.
    pub(crate) dist_sq_to_ball: f64,
    pub(crate) brain: Brain,
}

impl Player {
    pub(crate) fn new(
        id: PlayerId,
        team: TeamColor,
        role: PlayerRole,
        region: usize,
        body: MovingEntity,
        steering: Steering,
        brain: Brain,
    ) -> Self {
        Self {
            id,
            body,
            steering,
            team,
            role,
            home_region: region,
            default_region: region,
            dist_sq_to_ball: f64::MAX,
            brain,
        }
    }

    pub fn id(&self) -> PlayerId {
        self.id
    }

    pub fn entity_id(&self) -> EntityId {
        self.body.id
    }

    pub fn team(&self) -> TeamColor {
        self.team
    }

    pub fn role(&self) -> PlayerRole {
        self.role
    }

    pub fn is_goalkeeper(&self) -> bool {
        matches!(self.brain, Brain::Keeper { .. })
    }

    pub fn body(&self) -> &MovingEntity {
        &self.body
    }

    pub fn position(&self) -> Vector2D {
        self.body.position
    }

    pub fn velocity(&self) -> Vector2D {
        self.body.velocity
    }

    pub fn heading(&self) -> Vector2D {
        self.body.heading()
    }

    pub fn steering(&self) -> &Steering {
        &self.steering
    }

    pub fn home_region(&self) -> usize {
        self.home_region
    }

    pub fn default_region(&self) -> usize {
        self.default_region
    }

    pub fn dist_sq_to_ball(&self) -> f64 {
        self.dist_sq_to_ball
    }

    pub fn brain(&self) -> &Brain {
        &self.brain
    }

    pub fn field_state(&self) -> Option<FieldPlayerState> {
        match &self.brain {
            Brain::Field { fsm, .. } => Some(fsm.current()),
            Brain::Keeper { .. } => None,
        }
    }

    pub fn keeper_state(&self) -> Option<KeeperState> {
        match &self.brain {
            Brain::Keeper { fsm, .. } => Some(fsm.current()),
            Brain::Field { .. } => None,
        }
    }

    pub fn state_name(&self) -> &'static str {
        use crate::engine::fsm::State;
        use crate::engine::world::World;

        match &self.brain {
            Brain::Field { fsm, .. } => <FieldPlayerState as State<World>>::name(fsm.current()),
            Brain::Keeper { fsm, .. } => <KeeperState as State<World>>::name(fsm.current()),
        }
    }

    pub fn look_at(&self) -> Option<Vector2D> {
        match self.brain {
            Brain::Keeper { look_at, .. } => Some(look_at),
            Brain::Field { .. } => None,
        }
    }
}
