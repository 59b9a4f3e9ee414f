//! What a player knows about the match around it.
//!
//! Range checks use plain distances, scans over the roster use squared ones.

use crate::engine::messaging::Message;
use crate::engine::region::{Region, RegionModifier};
use crate::engine::world::World;
use crate::geometry::{vec2, Vector2D, Vector2DExt};
use crate::player::{Brain, PlayerId};

impl World {
    // ========== Possession ==========

    pub fn is_controlling_player(&self, pid: PlayerId) -> bool {
        let color = self.member(pid).team();
        self.team(color).controlling_player() == Some(pid)
    }

    /// Controlling player with the ball at its feet.
    pub fn has_ball(&self, pid: PlayerId) -> bool {
        self.is_controlling_player(pid) && self.is_ball_within_receiving_range(pid)
    }

    pub fn player_max_speed(&self, pid: PlayerId) -> f64 {
        if self.has_ball(pid) {
            self.config.player.max_speed_with_ball
        } else {
            self.config.player.max_speed_without_ball
        }
    }

    /// An opponent ahead of the player inside the comfort zone.
    ///
    /// The zone is compared against the squared comfort distance, so in
    /// practice any opponent in front within 3600 units counts.
    pub fn is_threatened(&self, pid: PlayerId) -> bool {
        let me = self.member(pid);
        let comfort_sq = self.config.player.comfort_zone * self.config.player.comfort_zone;

        self.team(me.team().opponent()).players().iter().any(|&opp| {
            let opp_pos = self.member(opp).position();
            self.is_position_in_front_of_player(pid, &opp_pos)
                && me.position().distance(&opp_pos) < comfort_sq
        })
    }

    pub fn is_position_in_front_of_player(&self, pid: PlayerId, pos: &Vector2D) -> bool {
        let me = self.member(pid);
        (pos - me.position()).dot(&me.heading()) > 0.0
    }

    // ========== Ranges ==========

    pub fn is_ball_within_keeper_range(&self, pid: PlayerId) -> bool {
        self.ball_distance(pid) < self.config.keeper.in_ball_range
    }

    pub fn is_ball_within_kicking_range(&self, pid: PlayerId) -> bool {
        self.ball_distance(pid) < self.config.kicking_distance()
    }

    pub fn is_ball_within_receiving_range(&self, pid: PlayerId) -> bool {
        self.ball_distance(pid) < self.config.player.ball_within_receiving_range
    }

    fn ball_distance(&self, pid: PlayerId) -> f64 {
        self.member(pid).position().distance(&self.ball.position())
    }

    pub fn is_at_target(&self, pid: PlayerId) -> bool {
        let me = self.member(pid);
        me.position().distance(&me.steering.target()) < self.config.player.in_target_range
    }

    // ========== Regions ==========

    pub(crate) fn home_region_of(&self, pid: PlayerId) -> Region {
        // indices are validated when the world is built
        self.pitch.regions()[self.member(pid).home_region]
    }

    pub(crate) fn home_region_centre(&self, pid: PlayerId) -> Vector2D {
        self.home_region_of(pid).center()
    }

    /// Keepers only count the middle half of their region.
    pub fn is_in_home_region(&self, pid: PlayerId) -> bool {
        let modifier = if self.member(pid).is_goalkeeper() {
            RegionModifier::HalfSize
        } else {
            RegionModifier::Normal
        };
        self.home_region_of(pid)
            .is_inside(&self.member(pid).position(), modifier)
    }

    /// Within a third of the pitch length of the opponents' goal.
    pub fn is_in_hot_region(&self, pid: PlayerId) -> bool {
        let me = self.member(pid);
        let goal_x = self.pitch.opponents_goal(me.team()).center.x;
        (me.position().x - goal_x).abs() < self.pitch.playing_area().length() / 3.0
    }

    /// Closer to the opponents' goal line than the controlling player.
    pub fn is_ahead_of_attacker(&self, pid: PlayerId) -> bool {
        let color = self.member(pid).team();
        let Some(controller) = self.team(color).controlling_player() else {
            return false;
        };
        let goal_x = self.pitch.opponents_goal(color).center.x;
        let dist = |p: PlayerId| (self.member(p).position().x - goal_x).abs();
        dist(pid) < dist(controller)
    }

    pub fn is_closest_team_member_to_ball(&self, pid: PlayerId) -> bool {
        let color = self.member(pid).team();
        self.team(color).closest_to_ball() == Some(pid)
    }

    pub fn is_closest_player_on_pitch_to_ball(&self, pid: PlayerId) -> bool {
        let color = self.member(pid).team();
        self.is_closest_team_member_to_ball(pid)
            && self.member(pid).dist_sq_to_ball() < self.team(color.opponent()).closest_dist_sq()
    }

    pub(crate) fn set_default_home_region(&mut self, pid: PlayerId) {
        let me = self.member_mut(pid);
        me.home_region = me.default_region;
    }

    // ========== Kicking ==========

    /// Cosine between the heading and the direction to the ball.
    fn dot_to_ball(&self, pid: PlayerId) -> f64 {
        let me = self.member(pid);
        let to_ball = (self.ball.position() - me.position()).normalized_or_zero();
        me.heading().dot(&to_ball)
    }

    pub fn shooting_force(&self, pid: PlayerId) -> f64 {
        self.config.tactics.max_shooting_force * self.dot_to_ball(pid)
    }

    pub fn passing_force(&self, pid: PlayerId) -> f64 {
        self.config.tactics.max_passing_force * self.dot_to_ball(pid)
    }

    /// Consumes a kick-limiter opening. Keepers are never limited.
    pub(crate) fn is_ready_for_next_kick(&mut self, pid: PlayerId) -> bool {
        let tick = self.tick;
        match &mut self.member_mut(pid).brain {
            Brain::Field { kick_limiter, .. } => kick_limiter.is_ready(tick),
            Brain::Keeper { .. } => true,
        }
    }

    // ========== Heading ==========

    pub(crate) fn track_ball(&mut self, pid: PlayerId) {
        let ball = self.ball.position();
        self.member_mut(pid).body.rotate_heading_to_face_position(&ball);
    }

    pub(crate) fn track_target(&mut self, pid: PlayerId) {
        let me = self.member_mut(pid);
        let to_target = me.steering.target() - me.position();
        me.body.set_heading(to_target);
    }

    // ========== Support ==========

    /// Makes sure the best-placed attacker is the one supporting `pid`.
    pub(crate) fn find_support(&mut self, pid: PlayerId) {
        let color = self.member(pid).team();

        if self.team(color).supporting_player().is_none() {
            if let Some(best) = self.determine_best_supporting_attacker(color) {
                self.set_supporting_player(color, best);
                self.send(pid, best, Message::SupportAttacker);
            }
        }

        let Some(best) = self.determine_best_supporting_attacker(color) else {
            return;
        };
        let current = self.team(color).supporting_player();
        if current != Some(best) {
            if let Some(old) = current {
                self.send(pid, old, Message::GoHome);
            }
            self.set_supporting_player(color, best);
            self.send(pid, best, Message::SupportAttacker);
        }
    }

    // ========== Keeper geometry ==========

    /// Point on the goal line the keeper slides along, tracking the ball's
    /// height on the pitch.
    pub fn rear_interpose_target(&self, pid: PlayerId) -> Vector2D {
        let color = self.member(pid).team();
        let area = self.pitch.playing_area();
        let goal_width = self.config.pitch.goal_width;
        let x = self.pitch.home_goal(color).center.x;
        let y = area.center().y - goal_width * 0.5
            + (self.ball.position().y * goal_width) / area.height();
        vec2(x, y)
    }

    pub fn ball_within_range_for_intercept(&self, pid: PlayerId) -> bool {
        let color = self.member(pid).team();
        let range = self.config.keeper.intercept_range;
        self.pitch
            .home_goal(color)
            .center
            .distance_sq(&self.ball.position())
            <= range * range
    }

    pub fn too_far_from_goal_mouth(&self, pid: PlayerId) -> bool {
        let range = self.config.keeper.intercept_range;
        self.member(pid)
            .position()
            .distance_sq(&self.rear_interpose_target(pid))
            > range * range
    }
}

#[cfg(test)]
mod tests {
    use crate::config::SimConfig;
    use crate::engine::random::testing::FixedRandom;
    use crate::engine::world::World;
    use crate::geometry::vec2;
    use crate::player::PlayerId;
    use crate::tactics::TeamColor;

    fn world() -> World {
        World::new(SimConfig::deterministic(), Box::new(FixedRandom::new(0.5))).unwrap()
    }

    fn put(w: &mut World, pid: PlayerId, x: f64, y: f64) {
        w.member_mut(pid).body.position = vec2(x, y);
    }

    #[test]
    fn test_hot_region_for_blue() {
        let mut w = world();
        let pid = w.team(TeamColor::Blue).field_players()[0];
        put(&mut w, pid, 10.0, 400.0);
        assert!(w.is_in_hot_region(pid));

        // a third of 660 is 220
        put(&mut w, pid, 239.0, 200.0);
        assert!(w.is_in_hot_region(pid));
        put(&mut w, pid, 241.0, 200.0);
        assert!(!w.is_in_hot_region(pid));
    }

    #[test]
    fn test_max_speed_switches_with_control() {
        let mut w = world();
        let pid = w.team(TeamColor::Red).field_players()[3];
        let pos = w.member(pid).position();
        w.ball.place_at_position(pos + vec2(3.0, 0.0));

        assert_eq!(w.player_max_speed(pid), 1.6);
        w.set_controlling_player(TeamColor::Red, pid);
        assert_eq!(w.player_max_speed(pid), 1.2);

        // control without the ball at its feet is not possession
        w.ball.place_at_position(pos + vec2(30.0, 0.0));
        assert_eq!(w.player_max_speed(pid), 1.6);
    }

    #[test]
    fn test_ranges() {
        let mut w = world();
        let pid = w.team(TeamColor::Red).field_players()[0];
        let pos = w.member(pid).position();

        w.ball.place_at_position(pos + vec2(10.5, 0.0));
        assert!(w.is_ball_within_kicking_range(pid));
        assert!(!w.is_ball_within_receiving_range(pid));

        w.ball.place_at_position(pos + vec2(9.0, 0.0));
        assert!(w.is_ball_within_receiving_range(pid));
        assert!(w.is_ball_within_keeper_range(pid));
    }

    #[test]
    fn test_threatened_only_from_the_front() {
        let mut w = world();
        let pid = w.team(TeamColor::Red).field_players()[0];
        put(&mut w, pid, 300.0, 200.0);
        w.member_mut(pid).body.set_heading(vec2(1.0, 0.0));

        // park every opponent behind the player
        let opponents = w.team(TeamColor::Blue).players().to_vec();
        for (i, opp) in opponents.iter().enumerate() {
            put(&mut w, *opp, 100.0, 30.0 + 10.0 * i as f64);
        }
        assert!(!w.is_threatened(pid));

        put(&mut w, opponents[4], 340.0, 200.0);
        assert!(w.is_threatened(pid));
    }

    #[test]
    fn test_home_region_and_half_size_keeper() {
        let mut w = world();
        let keeper = w.team(TeamColor::Red).keeper().unwrap();
        assert!(w.is_in_home_region(keeper));

        // inside region 80 but outside its middle half
        let region = *w.pitch().region(80).unwrap();
        let edge = vec2(region.left + 2.0, region.center().y);
        put(&mut w, keeper, edge.x, edge.y);
        assert!(!w.is_in_home_region(keeper));

        let field = w.team(TeamColor::Red).field_players()[0];
        let r = *w.pitch().region(w.member(field).home_region()).unwrap();
        put(&mut w, field, r.left + 2.0, r.center().y);
        assert!(w.is_in_home_region(field));
    }

    #[test]
    fn test_ahead_of_attacker() {
        let mut w = world();
        let controller = w.team(TeamColor::Red).field_players()[0];
        let mate = w.team(TeamColor::Red).field_players()[1];
        assert!(!w.is_ahead_of_attacker(mate));

        w.set_controlling_player(TeamColor::Red, controller);
        put(&mut w, controller, 300.0, 200.0);
        put(&mut w, mate, 400.0, 200.0);
        assert!(w.is_ahead_of_attacker(mate));
        put(&mut w, mate, 200.0, 200.0);
        assert!(!w.is_ahead_of_attacker(mate));
    }

    #[test]
    fn test_rear_interpose_target_tracks_ball_height() {
        let mut w = world();
        let keeper = w.team(TeamColor::Blue).keeper().unwrap();

        w.ball.place_at_position(vec2(350.0, 20.0));
        let high = w.rear_interpose_target(keeper);
        w.ball.place_at_position(vec2(350.0, 380.0));
        let low = w.rear_interpose_target(keeper);

        assert_eq!(high.x, 680.0);
        assert!(high.y < low.y);
        // 200 - 36.6 + 20 * 73.2 / 360
        assert!((high.y - (200.0 - 36.6 + 20.0 * 73.2 / 360.0)).abs() < 1e-9);
    }

    #[test]
    fn test_closest_on_pitch_needs_to_beat_opponents() {
        let mut w = world();
        let red = w.team(TeamColor::Red).field_players()[9];
        let blue = w.team(TeamColor::Blue).field_players()[9];
        let red_pos = w.member(red).position();
        put(&mut w, blue, red_pos.x + 20.0, red_pos.y);
        w.ball.place_at_position(red_pos + vec2(2.0, 0.0));

        w.calculate_closest_player_to_ball(TeamColor::Red);
        w.calculate_closest_player_to_ball(TeamColor::Blue);
        assert!(w.is_closest_player_on_pitch_to_ball(red));
        assert!(w.is_closest_team_member_to_ball(blue));
        assert!(!w.is_closest_player_on_pitch_to_ball(blue));
    }
}
