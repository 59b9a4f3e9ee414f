//! Goalkeeper state graph.
//!
//! TendGoal ⇄ InterceptBall, both falling into PutBallBackInPlay once the ball
//! is in the keeper's hands. ReturnHome brings a keeper that strayed back to
//! its region.

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::engine::events::{EventOwner, MatchEvent};
use crate::engine::fsm::{self, State, StateMachine};
use crate::engine::messaging::{Message, Telegram};
use crate::engine::steering::Behavior;
use crate::engine::world::World;
use crate::geometry::{Vector2D, Vector2DExt};
use crate::player::{Brain, PlayerId};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum KeeperState {
    Global,
    TendGoal,
    InterceptBall,
    PutBallBackInPlay,
    ReturnHome,
}

type K = KeeperState;

impl State<World> for KeeperState {
    type Owner = PlayerId;

    fn machine(world: &mut World, owner: PlayerId) -> Option<&mut StateMachine<Self>> {
        match &mut world.players.get_mut(owner.0)?.brain {
            Brain::Keeper { fsm, .. } => Some(fsm),
            Brain::Field { .. } => None,
        }
    }

    fn machine_ref(world: &World, owner: PlayerId) -> Option<&StateMachine<Self>> {
        match &world.players.get(owner.0)?.brain {
            Brain::Keeper { fsm, .. } => Some(fsm),
            Brain::Field { .. } => None,
        }
    }

    fn name(self) -> &'static str {
        match self {
            K::Global => "GlobalKeeperState",
            K::TendGoal => "TendGoal",
            K::InterceptBall => "InterceptBall",
            K::PutBallBackInPlay => "PutBallBackInPlay",
            K::ReturnHome => "ReturnHome",
        }
    }

    fn enter(self, world: &mut World, pid: PlayerId) {
        match self {
            K::Global => {}
            K::TendGoal => {
                let distance = world.config().keeper.tending_distance;
                let target = world.rear_interpose_target(pid);
                let steering = &mut world.member_mut(pid).steering;
                steering.activate_interpose(distance);
                steering.set_target(target);
            }
            K::InterceptBall => world.member_mut(pid).steering.activate(Behavior::Pursuit),
            K::PutBallBackInPlay => {
                let color = world.member(pid).team();
                world.set_controlling_player(color, pid);

                // 양 팀 모두 자기 진영으로
                world.return_all_field_players_to_home(color.opponent());
                world.return_all_field_players_to_home(color);
            }
            K::ReturnHome => world.member_mut(pid).steering.activate(Behavior::Arrive),
        }
    }

    fn execute(self, world: &mut World, pid: PlayerId) {
        match self {
            K::Global => {}
            K::TendGoal => {
                let target = world.rear_interpose_target(pid);
                world.member_mut(pid).steering.set_target(target);

                if world.is_ball_within_keeper_range(pid) {
                    take_possession(world, pid);
                    return;
                }

                let in_control = world.team(world.member(pid).team()).in_control();
                if world.ball_within_range_for_intercept(pid) && !in_control {
                    fsm::change_state(world, pid, K::InterceptBall);
                    return;
                }
                if world.too_far_from_goal_mouth(pid) && in_control {
                    fsm::change_state(world, pid, K::ReturnHome);
                }
            }
            K::InterceptBall => {
                if world.too_far_from_goal_mouth(pid) && !world.is_closest_player_on_pitch_to_ball(pid) {
                    fsm::change_state(world, pid, K::ReturnHome);
                    return;
                }
                if world.is_ball_within_keeper_range(pid) {
                    take_possession(world, pid);
                }
            }
            K::PutBallBackInPlay => put_ball_back_in_play(world, pid),
            K::ReturnHome => {
                let centre = world.home_region_centre(pid);
                world.member_mut(pid).steering.set_target(centre);

                let in_control = world.team(world.member(pid).team()).in_control();
                if world.is_in_home_region(pid) || !in_control {
                    fsm::change_state(world, pid, K::TendGoal);
                }
            }
        }
    }

    fn exit(self, world: &mut World, pid: PlayerId) {
        let behavior = match self {
            K::TendGoal => Behavior::Interpose,
            K::InterceptBall => Behavior::Pursuit,
            K::ReturnHome => Behavior::Arrive,
            K::Global | K::PutBallBackInPlay => return,
        };
        world.member_mut(pid).steering.deactivate(behavior);
    }

    fn on_message(self, world: &mut World, pid: PlayerId, telegram: &Telegram) -> bool {
        if self != K::Global {
            return false;
        }

        match telegram.message {
            Message::GoHome => {
                world.set_default_home_region(pid);
                fsm::change_state(world, pid, K::ReturnHome);
                true
            }
            Message::ReceiveBall { .. } => {
                fsm::change_state(world, pid, K::InterceptBall);
                true
            }
            _ => false,
        }
    }

    fn record_transition(world: &mut World, pid: PlayerId, from: Self, to: Self) {
        let entity = world.member(pid).entity_id();
        debug!(keeper = %pid, %entity, from = from.name(), to = to.name(), "keeper state change");
        world.raise(MatchEvent::EnterState {
            owner: EventOwner::Player(entity),
            state: to.name().to_string(),
        });
    }
}

fn take_possession(world: &mut World, pid: PlayerId) {
    world.ball.trap();
    world.set_goal_keeper_has_ball(true);
    fsm::change_state(world, pid, K::PutBallBackInPlay);
}

fn put_ball_back_in_play(world: &mut World, pid: PlayerId) {
    let force = world.config().tactics.max_passing_force;
    let min_distance = world.config().keeper.min_pass_distance;

    let Some((receiver, target)) = world.find_pass(pid, force, min_distance) else {
        world.member_mut(pid).body.velocity = Vector2D::zeros();
        return;
    };

    let ball_pos = world.ball().position();
    world.ball.kick((target - ball_pos).normalized_or_zero(), force);
    world.set_goal_keeper_has_ball(false);

    let (from, to) = (world.member(pid).entity_id(), world.member(receiver).entity_id());
    world.raise(MatchEvent::Pass { from, to, target });
    world.send(pid, receiver, Message::ReceiveBall { target });

    fsm::change_state(world, pid, K::TendGoal);
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::SimConfig;
    use crate::engine::messaging::Delivery;
    use crate::engine::random::testing::FixedRandom;
    use crate::geometry::vec2;
    use crate::player::FieldPlayerState;
    use crate::tactics::TeamColor;

    fn world() -> World {
        World::new(SimConfig::deterministic(), Box::new(FixedRandom::new(0.5))).unwrap()
    }

    fn keeper(w: &World, color: TeamColor) -> PlayerId {
        w.team(color).keeper().unwrap()
    }

    #[test]
    fn test_keeper_starts_tending_with_interpose() {
        let w = world();
        let k = keeper(&w, TeamColor::Red);
        assert_eq!(w.member(k).keeper_state(), Some(K::TendGoal));
        assert!(w.member(k).steering().is_active(Behavior::Interpose));
    }

    #[test]
    fn test_trap_then_distribute() {
        let mut w = world();
        let k = keeper(&w, TeamColor::Red);
        let pos = w.member(k).position();
        w.ball.place_at_position(pos + vec2(3.0, 0.0));

        fsm::update::<World, K>(&mut w, k);
        assert_eq!(w.member(k).keeper_state(), Some(K::PutBallBackInPlay));
        assert!(w.goal_keeper_has_ball());
        assert_eq!(w.ball().velocity(), Vector2D::zeros());
        assert_eq!(w.team(TeamColor::Red).controlling_player(), Some(k));
        assert!(!w.member(k).steering().is_active(Behavior::Interpose));

        // everyone was sent home
        for color in TeamColor::BOTH {
            for &pid in w.team(color).field_players() {
                assert_eq!(
                    w.member(pid).field_state(),
                    Some(FieldPlayerState::ReturnToHomeRegion)
                );
            }
        }

        // the defenders are unmarked, so the keeper finds a pass
        fsm::update::<World, K>(&mut w, k);
        assert_eq!(w.member(k).keeper_state(), Some(K::TendGoal));
        assert!(!w.goal_keeper_has_ball());
        assert_eq!(w.events().count("pass"), 1);
        assert!((w.ball().velocity().norm() - 3.0).abs() < 1e-9);
        assert!(w.team(TeamColor::Red).receiver().is_some());
    }

    #[test]
    fn test_receive_ball_means_intercept() {
        let mut w = world();
        let k = keeper(&w, TeamColor::Blue);
        let entity = w.member(k).entity_id();

        let delivery = w.dispatch(entity, entity, Message::ReceiveBall { target: vec2(0.0, 0.0) });
        assert_eq!(delivery, Delivery::Handled);
        assert_eq!(w.member(k).keeper_state(), Some(K::InterceptBall));
        assert!(w.member(k).steering().is_active(Behavior::Pursuit));
    }

    #[test]
    fn test_stray_keeper_goes_home() {
        let mut w = world();
        let k = keeper(&w, TeamColor::Red);
        fsm::change_state(&mut w, k, K::InterceptBall);
        w.member_mut(k).body.position = vec2(200.0, 200.0);

        fsm::update::<World, K>(&mut w, k);
        assert_eq!(w.member(k).keeper_state(), Some(K::ReturnHome));
        assert!(!w.member(k).steering().is_active(Behavior::Pursuit));
        assert!(w.member(k).steering().is_active(Behavior::Arrive));

        // back in the box: tend again
        let home = w.home_region_centre(k);
        w.member_mut(k).body.position = home;
        fsm::update::<World, K>(&mut w, k);
        assert_eq!(w.member(k).keeper_state(), Some(K::TendGoal));
        assert!(!w.member(k).steering().is_active(Behavior::Arrive));
    }

    #[test]
    fn test_go_home_message() {
        let mut w = world();
        let k = keeper(&w, TeamColor::Blue);
        let entity = w.member(k).entity_id();
        w.dispatch(entity, entity, Message::GoHome);
        assert_eq!(w.member(k).keeper_state(), Some(K::ReturnHome));
    }
}
