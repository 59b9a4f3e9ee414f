//! Read-only match snapshot
//!
//! A plain serializable copy of what a renderer or a debugger wants to see
//! after a tick: ball, both teams, every player's state and steering, and the
//! support spots. Taking a snapshot never mutates the world.
//!
//! # Example
//! ```ignore
//! let mut world = World::new(SimConfig::classic(), Box::new(SimRng::seeded(7)))?;
//! world.update();
//! let json = world.snapshot().to_json()?;
//! ```

use serde::{Deserialize, Serialize};

use super::fsm::State;
use super::messaging::EntityId;
use super::support_spot::SupportSpot;
use super::world::World;
use crate::error::Result;
use crate::geometry::Vector2D;
use crate::player::{PlayerId, PlayerRole};
use crate::tactics::{TeamColor, TeamState};

/// Goals for each side.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Score {
    pub red: u32,
    pub blue: u32,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MatchSnapshot {
    pub tick: u64,
    pub score: Score,
    pub game_active: bool,
    pub goal_keeper_has_ball: bool,
    pub ball: BallSnapshot,
    /// Red first.
    pub teams: Vec<TeamSnapshot>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BallSnapshot {
    pub position: Vector2D,
    pub velocity: Vector2D,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TeamSnapshot {
    pub color: TeamColor,
    pub state: String,
    pub in_control: bool,
    pub controlling: Option<EntityId>,
    pub supporting: Option<EntityId>,
    pub receiving: Option<EntityId>,
    pub support_spots: Vec<SupportSpot>,
    /// Keeper first.
    pub players: Vec<PlayerSnapshot>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PlayerSnapshot {
    pub id: EntityId,
    pub role: PlayerRole,
    pub position: Vector2D,
    pub heading: Vector2D,
    pub target: Vector2D,
    pub force: Vector2D,
    pub state: String,
    /// Only ever set on the controlling player.
    pub threatened: bool,
    pub in_hot_region: bool,
}

impl MatchSnapshot {
    pub fn team(&self, color: TeamColor) -> Option<&TeamSnapshot> {
        self.teams.iter().find(|t| t.color == color)
    }

    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }
}

impl World {
    pub fn snapshot(&self) -> MatchSnapshot {
        let teams = TeamColor::BOTH
            .iter()
            .map(|&color| self.team_snapshot(color))
            .collect();

        MatchSnapshot {
            tick: self.tick(),
            score: self.score(),
            game_active: self.game_active(),
            goal_keeper_has_ball: self.goal_keeper_has_ball(),
            ball: BallSnapshot {
                position: self.ball().position(),
                velocity: self.ball().velocity(),
            },
            teams,
        }
    }

    fn team_snapshot(&self, color: TeamColor) -> TeamSnapshot {
        let team = self.team(color);
        let entity = |pid: PlayerId| self.member(pid).entity_id();

        let players = team
            .players()
            .iter()
            .map(|&pid| {
                let p = self.member(pid);
                PlayerSnapshot {
                    id: p.entity_id(),
                    role: p.role(),
                    position: p.position(),
                    heading: p.heading(),
                    target: p.steering().target(),
                    force: p.steering().force(),
                    state: p.state_name().to_string(),
                    threatened: self.is_controlling_player(pid) && self.is_threatened(pid),
                    in_hot_region: self.is_in_hot_region(pid),
                }
            })
            .collect();

        TeamSnapshot {
            color,
            state: <TeamState as State<World>>::name(team.state()).to_string(),
            in_control: team.in_control(),
            controlling: team.controlling_player().map(entity),
            supporting: team.supporting_player().map(entity),
            receiving: team.receiver().map(entity),
            support_spots: team.support_spots().to_vec(),
            players,
        }
    }
}

#[cfg(test)]
mod tests {
    use insta::assert_json_snapshot;

    use super::*;
    use crate::config::SimConfig;
    use crate::engine::random::testing::FixedRandom;

    fn world() -> World {
        World::new(SimConfig::deterministic(), Box::new(FixedRandom::new(0.5))).unwrap()
    }

    #[test]
    fn test_kick_off_summary() {
        let snap = world().snapshot();
        let summary: Vec<_> = snap
            .teams
            .iter()
            .map(|t| (t.color, t.state.as_str(), t.in_control, t.players.len()))
            .collect();

        assert_json_snapshot!(summary, @r###"
        [
          [
            "Red",
            "Defending",
            false,
            11
          ],
          [
            "Blue",
            "Defending",
            false,
            11
          ]
        ]
        "###);
        assert_json_snapshot!(snap.score, @r###"
        {
          "red": 0,
          "blue": 0
        }
        "###);
    }

    #[test]
    fn test_player_rows() {
        let snap = world().snapshot();
        let red = snap.team(TeamColor::Red).unwrap();

        assert_eq!(red.players[0].role, PlayerRole::GoalKeeper);
        assert_eq!(red.players[0].state, "TendGoal");
        assert!(red.players[1..].iter().all(|p| p.state == "Wait"));
        assert!(red.players.iter().all(|p| !p.threatened));
        assert_eq!(red.support_spots.len(), 36);
        assert_eq!(snap.ball.velocity, Vector2D::zeros());
    }

    #[test]
    fn test_threat_flag_only_on_controller() {
        let mut w = world();
        let pid = w.team(TeamColor::Red).field_players()[9];
        w.set_controlling_player(TeamColor::Red, pid);
        // an opponent right in front
        let pos = w.member(pid).position();
        let heading = w.member(pid).heading();
        let blue = w.team(TeamColor::Blue).field_players()[0];
        w.member_mut(blue).body.position = pos + heading * 20.0;

        let snap = w.snapshot();
        let red = snap.team(TeamColor::Red).unwrap();
        let entity = w.member(pid).entity_id();
        assert_eq!(red.controlling, Some(entity));
        for p in &red.players {
            assert_eq!(p.threatened, p.id == entity);
        }
    }

    #[test]
    fn test_json_export() {
        let json = world().snapshot().to_json().unwrap();
        let value: serde_json::Value = serde_json::from_str(&json).unwrap();
        assert_eq!(value["tick"], 0);
        assert_eq!(value["teams"][1]["color"], "Blue");
        assert_eq!(value["teams"][0]["players"][0]["role"], "GoalKeeper");
    }
}
