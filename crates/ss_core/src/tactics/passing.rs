//! Pass safety, shot search and pass search.
//!
//! 모든 판단은 공의 마찰 모델(`time_to_cover_distance`)을 기준으로 한다:
//! a pass is unsafe when an opponent can reach the ball's line before the
//! ball has gone by.

use tracing::trace;

use crate::engine::messaging::Message;
use crate::engine::region::RegionModifier;
use crate::engine::world::World;
use crate::geometry::{point_to_local_space, tangent_points, vec2, Vector2D, Vector2DExt};
use crate::player::PlayerId;
use crate::tactics::TeamColor;

/// Share of a receiver's top speed used to widen the pass target circle.
const RECEIVER_RANGE_SCALE: f64 = 0.3;

impl World {
    /// Is the pass `from -> to` safe from one opponent?
    pub fn is_pass_safe_from_opponent(
        &self,
        from: Vector2D,
        to: Vector2D,
        receiver: Option<PlayerId>,
        opponent: PlayerId,
        passing_force: f64,
    ) -> bool {
        let opp_pos = self.member(opponent).position();
        let to_target = (to - from).normalized_or_zero();
        let local = point_to_local_space(&opp_pos, &to_target, &to_target.perpendicular(), &from);

        // behind the kicker
        if local.x < 0.0 {
            return true;
        }

        // opponent further away than the target
        if from.distance(&to) < from.distance(&opp_pos) {
            return match receiver {
                Some(r) => to.distance(&opp_pos) > to.distance(&self.member(r).position()),
                None => true,
            };
        }

        let time = self
            .ball
            .time_to_cover_distance(&Vector2D::zeros(), &vec2(local.x, 0.0), passing_force);
        let reach = self.player_max_speed(opponent) * time
            + self.ball.radius()
            + self.member(opponent).body.bounding_radius;

        local.y.abs() >= reach
    }

    pub fn is_pass_safe_from_all_opponents(
        &self,
        color: TeamColor,
        from: Vector2D,
        to: Vector2D,
        receiver: Option<PlayerId>,
        passing_force: f64,
    ) -> bool {
        self.team(color.opponent())
            .players()
            .iter()
            .all(|&opp| self.is_pass_safe_from_opponent(from, to, receiver, opp, passing_force))
    }

    pub fn is_opponent_within_radius(&self, color: TeamColor, pos: Vector2D, radius: f64) -> bool {
        let r_sq = radius * radius;
        self.team(color.opponent())
            .players()
            .iter()
            .any(|&opp| pos.distance_sq(&self.member(opp).position()) < r_sq)
    }

    /// Samples points along the opponents' goal mouth and returns the first
    /// one a ball kicked from `from` with `power` can reach unintercepted.
    pub fn can_shoot(&mut self, color: TeamColor, from: Vector2D, power: f64) -> Option<Vector2D> {
        let goal = *self.pitch.opponents_goal(color);
        let r = self.ball.radius();
        let min_y = (goal.left_post.y + r) as i32;
        let max_y = (goal.right_post.y - r) as i32;

        for _ in 0..self.config.tactics.num_attempts_to_find_valid_strike {
            let y = self.rng().next_int(min_y, max_y);
            let target = vec2(goal.center.x, f64::from(y));

            let time = self.ball.time_to_cover_distance(&from, &target, power);
            if time >= 0.0 && self.is_pass_safe_from_all_opponents(color, from, target, None, power) {
                return Some(target);
            }
        }
        None
    }

    /// Best pass to one teammate: the receiver's position or a tangent point
    /// of the circle it can reach while the ball travels, whichever is safe
    /// and furthest up the pitch.
    pub fn best_pass_to_receiver(&self, receiver: PlayerId, power: f64) -> Option<Vector2D> {
        let color = self.member(receiver).team();
        let ball_pos = self.ball.position();
        let receiver_pos = self.member(receiver).position();

        let time = self.ball.time_to_cover_distance(&ball_pos, &receiver_pos, power);
        if time < 0.0 {
            return None;
        }

        let intercept_range = time * self.player_max_speed(receiver) * RECEIVER_RANGE_SCALE;
        let candidates = match tangent_points(&receiver_pos, intercept_range, &ball_pos) {
            Some((ip1, ip2)) => vec![ip1, receiver_pos, ip2],
            None => vec![receiver_pos],
        };

        let goal_x = self.pitch.opponents_goal(color).center.x;
        let area = self.pitch.playing_area();

        let mut best: Option<(Vector2D, f64)> = None;
        for target in candidates {
            let dist = (target.x - goal_x).abs();
            let closer = best.map_or(true, |(_, d)| dist < d);
            if closer
                && area.is_inside(&target, RegionModifier::Normal)
                && self.is_pass_safe_from_all_opponents(color, ball_pos, target, Some(receiver), power)
            {
                best = Some((target, dist));
            }
        }
        best.map(|(target, _)| target)
    }

    /// Scans every teammate further than `min_dist` from the passer and
    /// returns the pass ending closest to the opponents' goal line.
    pub fn find_pass(&self, passer: PlayerId, power: f64, min_dist: f64) -> Option<(PlayerId, Vector2D)> {
        let color = self.member(passer).team();
        let passer_pos = self.member(passer).position();
        let goal_x = self.pitch.opponents_goal(color).center.x;
        let min_sq = min_dist * min_dist;

        let mut best: Option<(PlayerId, Vector2D, f64)> = None;
        for &mate in self.team(color).players() {
            if mate == passer || passer_pos.distance_sq(&self.member(mate).position()) <= min_sq {
                continue;
            }
            let Some(target) = self.best_pass_to_receiver(mate, power) else {
                continue;
            };
            let dist = (target.x - goal_x).abs();
            if best.map_or(true, |(_, _, d)| dist < d) {
                best = Some((mate, target, dist));
            }
        }

        trace!(%passer, ?best, "find pass");
        best.map(|(mate, target, _)| (mate, target))
    }

    /// Asks the controlling player for the ball. Only two draws in eleven
    /// get through.
    pub(crate) fn request_pass(&mut self, requester: PlayerId) {
        if self.rng().next_int(0, 10) > 1 {
            return;
        }

        let color = self.member(requester).team();
        let Some(controller) = self.team(color).controlling_player() else {
            return;
        };

        let from = self.member(controller).position();
        let to = self.member(requester).position();
        let force = self.config.tactics.max_passing_force;
        if self.is_pass_safe_from_all_opponents(color, from, to, Some(requester), force) {
            let requester_entity = self.member(requester).entity_id();
            self.send(
                requester,
                controller,
                Message::PassToMe {
                    requester: requester_entity,
                },
            );
        }
    }
}

#[cfg(test)]
mod tests {
    use crate::config::SimConfig;
    use crate::engine::random::testing::{FixedRandom, ScriptedRandom};
    use crate::engine::random::RandomSource;
    use crate::engine::world::World;
    use crate::geometry::vec2;
    use crate::player::PlayerId;
    use crate::tactics::TeamColor;

    /// Construction draws regulator jitter, so the scripted source is
    /// swapped in afterwards.
    fn world_with(rng: impl RandomSource + 'static) -> World {
        let mut w = World::new(SimConfig::deterministic(), Box::new(FixedRandom::new(0.5))).unwrap();
        w.rng = Box::new(rng);
        w
    }

    fn put(w: &mut World, pid: PlayerId, x: f64, y: f64) {
        w.member_mut(pid).body.position = vec2(x, y);
    }

    /// Moves every player of `color` into a corner, out of the way.
    fn clear_team(w: &mut World, color: TeamColor) {
        let roster = w.team(color).players().to_vec();
        for (i, pid) in roster.into_iter().enumerate() {
            put(w, pid, 30.0 + i as f64, 30.0);
        }
    }

    #[test]
    fn test_opponent_behind_kicker_is_safe() {
        let mut w = world_with(FixedRandom::new(0.5));
        let opp = w.team(TeamColor::Blue).field_players()[0];
        put(&mut w, opp, 190.0, 200.0);
        assert!(w.is_pass_safe_from_opponent(vec2(200.0, 200.0), vec2(300.0, 200.0), None, opp, 3.0));
    }

    #[test]
    fn test_opponent_on_the_line_blocks() {
        let mut w = world_with(FixedRandom::new(0.5));
        let opp = w.team(TeamColor::Blue).field_players()[0];
        put(&mut w, opp, 250.0, 201.0);
        assert!(!w.is_pass_safe_from_opponent(vec2(200.0, 200.0), vec2(300.0, 200.0), None, opp, 3.0));
    }

    #[test]
    fn test_opponent_beyond_target_checks_receiver() {
        let mut w = world_with(FixedRandom::new(0.5));
        let opp = w.team(TeamColor::Blue).field_players()[0];
        let mate = w.team(TeamColor::Red).field_players()[0];
        put(&mut w, opp, 320.0, 200.0);

        put(&mut w, mate, 300.0, 205.0);
        assert!(w.is_pass_safe_from_opponent(vec2(200.0, 200.0), vec2(300.0, 200.0), Some(mate), opp, 3.0));

        put(&mut w, mate, 270.0, 200.0);
        assert!(!w.is_pass_safe_from_opponent(vec2(200.0, 200.0), vec2(300.0, 200.0), Some(mate), opp, 3.0));
    }

    #[test]
    fn test_can_shoot_blocked_by_opponent() {
        // every draw lands on the goal centre line
        let mut w = world_with(ScriptedRandom::new([], [200; 5]));
        clear_team(&mut w, TeamColor::Blue);
        let keeper = w.team(TeamColor::Blue).keeper().unwrap();
        put(&mut w, keeper, 660.0, 200.0);

        assert_eq!(w.can_shoot(TeamColor::Red, vec2(600.0, 200.0), 6.0), None);
    }

    #[test]
    fn test_can_shoot_open_goal() {
        let mut w = world_with(ScriptedRandom::new([], [200; 5]));
        clear_team(&mut w, TeamColor::Blue);
        let target = w.can_shoot(TeamColor::Red, vec2(600.0, 200.0), 6.0);
        assert_eq!(target, Some(vec2(680.0, 200.0)));
    }

    #[test]
    fn test_can_shoot_out_of_range() {
        let mut w = world_with(FixedRandom::new(0.5));
        clear_team(&mut w, TeamColor::Blue);
        // a gentle kick from our own box dies long before the goal
        assert_eq!(w.can_shoot(TeamColor::Red, vec2(40.0, 200.0), 1.0), None);
    }

    #[test]
    fn test_find_pass_prefers_furthest_upfield() {
        let mut w = world_with(FixedRandom::new(0.5));
        clear_team(&mut w, TeamColor::Blue);
        clear_team(&mut w, TeamColor::Red);

        let passer = w.team(TeamColor::Red).field_players()[0];
        let near = w.team(TeamColor::Red).field_players()[1];
        let far = w.team(TeamColor::Red).field_players()[2];
        put(&mut w, passer, 300.0, 200.0);
        w.ball.place_at_position(vec2(305.0, 200.0));
        put(&mut w, near, 380.0, 220.0);
        put(&mut w, far, 450.0, 180.0);

        let (to, target) = w.find_pass(passer, 3.0, 50.0).unwrap();
        assert_eq!(to, far);
        assert!(target.x >= 450.0);
    }

    #[test]
    fn test_find_pass_respects_min_distance() {
        let mut w = world_with(FixedRandom::new(0.5));
        clear_team(&mut w, TeamColor::Blue);
        clear_team(&mut w, TeamColor::Red);
        let passer = w.team(TeamColor::Red).field_players()[0];
        let mate = w.team(TeamColor::Red).field_players()[1];
        put(&mut w, passer, 300.0, 200.0);
        w.ball.place_at_position(vec2(305.0, 200.0));
        put(&mut w, mate, 340.0, 200.0);

        // everyone else sits in the corner, closer than 400 only to the mate
        assert!(w
            .find_pass(passer, 3.0, 400.0)
            .map_or(true, |(to, _)| to != mate));
    }

    #[test]
    fn test_opponent_within_radius() {
        let mut w = world_with(FixedRandom::new(0.5));
        clear_team(&mut w, TeamColor::Blue);
        let opp = w.team(TeamColor::Blue).field_players()[3];
        put(&mut w, opp, 400.0, 300.0);
        assert!(w.is_opponent_within_radius(TeamColor::Red, vec2(420.0, 300.0), 70.0));
        assert!(!w.is_opponent_within_radius(TeamColor::Red, vec2(500.0, 300.0), 70.0));
    }

    #[test]
    fn test_request_pass_throttled() {
        // a draw of 5 is above the threshold: nothing is sent
        let mut w = world_with(ScriptedRandom::new([], [5]));
        let controller = w.team(TeamColor::Red).field_players()[0];
        let requester = w.team(TeamColor::Red).field_players()[6];
        w.set_controlling_player(TeamColor::Red, controller);
        w.drain_events();
        w.request_pass(requester);
        assert_eq!(w.dispatcher().delivered(), 0);
    }
}
