//! Per-tick player update: think, steer, move.

use tracing::trace;

use crate::engine::fsm;
use crate::engine::steering::AgentKinematics;
use crate::engine::world::World;
use crate::geometry::{vec_rotate_around_origin, Vector2D, Vector2DExt};
use crate::player::{Brain, FieldPlayerState, KeeperState, PlayerId};

impl World {
    /// FSM update, steering, then kinematic integration.
    pub fn player_update(&mut self, pid: PlayerId) {
        if self.member(pid).is_goalkeeper() {
            fsm::update::<World, KeeperState>(self, pid);
            self.calculate_steering(pid);
            self.integrate_keeper(pid);
        } else {
            fsm::update::<World, FieldPlayerState>(self, pid);
            self.calculate_steering(pid);
            self.integrate_field_player(pid);
        }
    }

    fn kinematics(&self, pid: PlayerId) -> AgentKinematics {
        let body = &self.member(pid).body;
        AgentKinematics {
            position: body.position,
            velocity: body.velocity,
            heading: body.heading(),
            side: body.side(),
            max_speed: self.player_max_speed(pid),
            max_force: body.max_force,
            max_turn_rate: body.max_turn_rate,
        }
    }

    /// Tags every other player inside the view distance and returns their
    /// positions.
    pub(crate) fn tag_neighbours(&mut self, pid: PlayerId) -> Vec<Vector2D> {
        let me = self.member(pid);
        let (pos, view) = (me.position(), me.steering.view_distance);
        let view_sq = view * view;

        let mut neighbours = Vec::new();
        for other in self.players.iter_mut() {
            other.steering.untag();
            if other.id == pid {
                continue;
            }
            if pos.distance_sq(&other.body.position) < view_sq {
                other.steering.tag();
                neighbours.push(other.body.position);
            }
        }
        neighbours
    }

    pub(crate) fn calculate_steering(&mut self, pid: PlayerId) -> Vector2D {
        let neighbours = self.tag_neighbours(pid);
        let agent = self.kinematics(pid);
        let force = self.players[pid.0]
            .steering
            .calculate(&agent, &self.ball, &neighbours);
        trace!(player = %pid, ?force, neighbours = neighbours.len(), "steering");
        force
    }

    /// Field players turn by the side component and accelerate along the
    /// heading by the forward component.
    fn integrate_field_player(&mut self, pid: PlayerId) {
        let max_speed = self.player_max_speed(pid);
        let braking = self.config.player.braking_rate;
        let max_turn = self.config.player.max_turn_rate;

        let me = self.member_mut(pid);
        let max_turn_rate = me.body.max_turn_rate;
        if me.steering.force().is_zero_length() {
            me.body.velocity *= braking;
        }

        let turning = me
            .steering
            .side_component(&me.body.side(), max_turn_rate)
            .clamp(-max_turn, max_turn);
        let heading = vec_rotate_around_origin(&me.body.heading(), turning);
        me.body.set_heading(heading);

        me.body.velocity = me.body.heading() * me.body.velocity.norm();

        let forward = me.steering.forward_component(&me.body.heading());
        let accel = me.body.heading() * (forward / me.body.mass);
        me.body.velocity = (me.body.velocity + accel).truncated(max_speed);
        me.body.max_speed = max_speed;
        me.body.position += me.body.velocity;
    }

    /// Keepers move straight along the force and face where they go.
    fn integrate_keeper(&mut self, pid: PlayerId) {
        let max_speed = self.player_max_speed(pid);
        let ball = self.ball.position();
        let keeper_has_ball = self.goal_keeper_has_ball;

        let me = self.member_mut(pid);
        let accel = me.steering.force() / me.body.mass;
        me.body.velocity = (me.body.velocity + accel).truncated(max_speed);
        me.body.max_speed = max_speed;
        me.body.position += me.body.velocity;

        if !me.body.velocity.is_zero_length() {
            let heading = me.body.velocity;
            me.body.set_heading(heading);
        }

        let to_ball = (ball - me.body.position).normalized_or_zero();
        if let Brain::Keeper { look_at, .. } = &mut me.brain {
            if !keeper_has_ball {
                *look_at = to_ball;
            }
        }
    }
}
