//! Team state graph: Defending ⇄ Attacking, and PrepareForKickOff after a
//! goal.

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::engine::events::{EventOwner, MatchEvent};
use crate::engine::fsm::{self, State, StateMachine};
use crate::engine::world::World;
use crate::tactics::TeamColor;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum TeamState {
    Defending,
    Attacking,
    PrepareForKickOff,
}

impl State<World> for TeamState {
    type Owner = TeamColor;

    fn machine(world: &mut World, owner: TeamColor) -> Option<&mut StateMachine<Self>> {
        Some(&mut world.team_mut(owner).fsm)
    }

    fn machine_ref(world: &World, owner: TeamColor) -> Option<&StateMachine<Self>> {
        Some(&world.team(owner).fsm)
    }

    fn name(self) -> &'static str {
        match self {
            TeamState::Defending => "Defending",
            TeamState::Attacking => "Attacking",
            TeamState::PrepareForKickOff => "PrepareForKickOff",
        }
    }

    fn enter(self, world: &mut World, team: TeamColor) {
        match self {
            TeamState::Defending => {
                let regions = world.config.team(team).defending_regions.clone();
                world.change_player_home_regions(team, &regions);
                world.update_targets_of_waiting_players(team);
            }
            TeamState::Attacking => {
                let regions = world.config.team(team).attacking_regions.clone();
                world.change_player_home_regions(team, &regions);
                world.update_targets_of_waiting_players(team);
            }
            TeamState::PrepareForKickOff => {
                // 포인터 전부 초기화 (상대 팀 controller 포함)
                world.reset_controlling_player(team);
                let t = world.team_mut(team);
                t.supporting = None;
                t.receiving = None;
                t.closest_to_ball = None;

                world.return_all_field_players_to_home(team);
            }
        }
    }

    fn execute(self, world: &mut World, team: TeamColor) {
        match self {
            TeamState::Defending => {
                if world.team(team).in_control() {
                    fsm::change_state(world, team, TeamState::Attacking);
                }
            }
            TeamState::Attacking => {
                if !world.team(team).in_control() {
                    fsm::change_state(world, team, TeamState::Defending);
                    return;
                }
                world.determine_best_supporting_position(team);
            }
            TeamState::PrepareForKickOff => {
                if world.all_players_at_home(team) && world.all_players_at_home(team.opponent()) {
                    fsm::change_state(world, team, TeamState::Defending);
                }
            }
        }
    }

    fn exit(self, world: &mut World, team: TeamColor) {
        match self {
            TeamState::Attacking => world.team_mut(team).supporting = None,
            TeamState::PrepareForKickOff => world.set_game_active(true),
            TeamState::Defending => {}
        }
    }

    fn record_transition(world: &mut World, team: TeamColor, from: Self, to: Self) {
        debug!(%team, from = from.name(), to = to.name(), "team state change");
        world.raise(MatchEvent::EnterState {
            owner: EventOwner::Team(team),
            state: to.name().to_string(),
        });
    }
}
