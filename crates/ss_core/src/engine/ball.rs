//! Ball physics
//!
//! The ball is a point mass with constant rolling friction. Collisions only
//! reflect velocity off the pitch walls; there is no spin or height.

use serde::{Deserialize, Serialize};

use super::entity::MovingEntity;
use super::messaging::EntityId;
use super::random::RandomSource;
use crate::geometry::{
    distance_to_ray_plane_intersection, line_intersection_2d, vec_rotate_around_origin,
    where_is_point, SpanType, Vector2D, Vector2DExt, Wall2D,
};

/// Half-length of the probe segment used to decide whether a collision point
/// lies alongside a wall segment.
const WALL_PROBE: f64 = 20.0;

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SoccerBall {
    pub body: MovingEntity,
    old_position: Vector2D,
    /// Per-tick speed change. Negative.
    friction: f64,
}

impl SoccerBall {
    pub fn new(id: EntityId, position: Vector2D, radius: f64, mass: f64, friction: f64) -> Self {
        let body = MovingEntity::new(
            id,
            position,
            Vector2D::new(0.0, 1.0),
            mass,
            // the ball is never steered, only kicked
            f64::MAX,
            0.0,
            0.0,
            radius,
        );
        Self {
            body,
            old_position: position,
            friction,
        }
    }

    pub fn id(&self) -> EntityId {
        self.body.id
    }

    pub fn position(&self) -> Vector2D {
        self.body.position
    }

    pub fn velocity(&self) -> Vector2D {
        self.body.velocity
    }

    pub fn old_position(&self) -> Vector2D {
        self.old_position
    }

    pub fn radius(&self) -> f64 {
        self.body.bounding_radius
    }

    pub fn friction(&self) -> f64 {
        self.friction
    }

    /// Sets velocity to `normalize(direction) * force / mass`.
    pub fn kick(&mut self, direction: Vector2D, force: f64) {
        let dir = direction.normalized_or_zero();
        self.body.velocity = dir * force / self.body.mass;
    }

    pub fn update(&mut self, walls: &[Wall2D]) {
        self.old_position = self.body.position;

        self.test_collision_with_walls(walls);

        let v = self.body.velocity;
        if v.norm_squared() > self.friction * self.friction {
            let dir = v.normalized_or_zero();
            self.body.velocity += dir * self.friction;
            self.body.position += self.body.velocity;
            self.body.set_heading(self.body.velocity);
        }
    }

    /// Ticks needed to roll from `a` to `b` after a kick of `force`, or
    /// `-1.0` when friction stops the ball first.
    pub fn time_to_cover_distance(&self, a: &Vector2D, b: &Vector2D, force: f64) -> f64 {
        let speed = force / self.body.mass;
        let distance = a.distance(b);
        let term = speed * speed + 2.0 * distance * self.friction;

        if term <= 0.0 {
            return -1.0;
        }

        (term.sqrt() - speed) / self.friction
    }

    /// Where the ball will be after `time` ticks under friction alone.
    pub fn future_position(&self, time: f64) -> Vector2D {
        let v = self.body.velocity;
        let ut = v * time;
        let half_at_sq = 0.5 * self.friction * time * time;
        let scalar_to_vector = v.normalized_or_zero() * half_at_sq;
        self.body.position + ut + scalar_to_vector
    }

    pub fn trap(&mut self) {
        self.body.velocity = Vector2D::zeros();
    }

    pub fn place_at_position(&mut self, position: Vector2D) {
        self.body.position = position;
        self.old_position = position;
        self.body.velocity = Vector2D::zeros();
    }

    /// Reflects off the nearest wall the ball would hit this tick.
    fn test_collision_with_walls(&mut self, walls: &[Wall2D]) {
        let velocity = self.body.velocity;
        let vel_normal = velocity.normalized_or_zero();
        let position = self.body.position;
        let radius = self.body.bounding_radius;

        let mut closest: Option<usize> = None;
        let mut dist_to_closest = f64::MAX;

        for (idx, wall) in walls.iter().enumerate() {
            // 벽 쪽으로 가장 먼저 닿는 공의 가장자리
            let collision_point = position - wall.normal * radius;

            let intersection =
                if where_is_point(&collision_point, &wall.from, &wall.normal) == SpanType::Back {
                    let dist = distance_to_ray_plane_intersection(
                        &collision_point,
                        &wall.normal,
                        &wall.from,
                        &wall.normal,
                    );
                    collision_point + wall.normal * dist
                } else {
                    let dist = distance_to_ray_plane_intersection(
                        &collision_point,
                        &vel_normal,
                        &wall.from,
                        &wall.normal,
                    );
                    collision_point + vel_normal * dist
                };

            let on_segment = line_intersection_2d(
                &wall.from,
                &wall.to,
                &(collision_point - wall.normal * WALL_PROBE),
                &(collision_point + wall.normal * WALL_PROBE),
            );

            let dist_sq = collision_point.distance_sq(&intersection);
            if on_segment && dist_sq <= velocity.norm_squared() && dist_sq < dist_to_closest {
                dist_to_closest = dist_sq;
                closest = Some(idx);
            }
        }

        if let Some(idx) = closest {
            let normal = walls[idx].normal;
            if vel_normal.dot(&normal) < 0.0 {
                self.body.velocity = velocity.reflected(&normal);
            }
        }
    }
}

/// Perturbs a kick target by up to `pi * (1 - accuracy)` radians either way.
pub fn add_noise_to_kick(
    position: &Vector2D,
    target: &Vector2D,
    accuracy: f64,
    rng: &mut dyn RandomSource,
) -> Vector2D {
    let displacement = (std::f64::consts::PI - std::f64::consts::PI * accuracy) * rng.next_clamped();
    let to_target = target - position;
    vec_rotate_around_origin(&to_target, displacement) + position
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine::random::testing::{FixedRandom, ScriptedRandom};
    use crate::geometry::vec2;

    const FRICTION: f64 = -0.015;

    fn ball_at(x: f64, y: f64) -> SoccerBall {
        SoccerBall::new(EntityId(0), vec2(x, y), 5.0, 1.0, FRICTION)
    }

    fn close(a: f64, b: f64) -> bool {
        (a - b).abs() < 1e-9
    }

    #[test]
    fn test_kick_sets_velocity() {
        let mut ball = ball_at(10.0, 5.0);
        ball.kick(vec2(5.0, 0.0), 0.8);
        assert!(close(ball.velocity().x, 0.8));
        assert!(close(ball.velocity().y, 0.0));
        assert_eq!(ball.position(), vec2(10.0, 5.0));

        ball.update(&[]);
        assert!(close(ball.velocity().x, 0.785));
        assert!(close(ball.position().x, 10.785));
        assert!(close(ball.position().y, 5.0));
    }

    #[test]
    fn test_update_applies_friction() {
        let mut ball = ball_at(10.0, 5.0);
        ball.body.velocity = vec2(5.0, 0.0);
        ball.update(&[]);
        assert!(close(ball.velocity().x, 4.985));
        assert!(close(ball.position().x, 14.985));
        assert!(close(ball.position().y, 5.0));
        assert_eq!(ball.old_position(), vec2(10.0, 5.0));
        assert_eq!(ball.body.heading(), vec2(1.0, 0.0));
    }

    #[test]
    fn test_slow_ball_stops_moving() {
        let mut ball = ball_at(10.0, 5.0);
        ball.body.velocity = vec2(0.01, 0.0);
        ball.update(&[]);
        assert_eq!(ball.position(), vec2(10.0, 5.0));
    }

    #[test]
    fn test_time_to_cover_distance() {
        let ball = ball_at(0.0, 0.0);
        // u = 3, term = 9 + 2 * 100 * -0.015 = 6
        let t = ball.time_to_cover_distance(&vec2(0.0, 0.0), &vec2(100.0, 0.0), 3.0);
        assert!(close(t, (6.0f64.sqrt() - 3.0) / FRICTION));
        assert!(t > 0.0);

        let never = ball.time_to_cover_distance(&vec2(0.0, 0.0), &vec2(1000.0, 0.0), 1.0);
        assert_eq!(never, -1.0);
    }

    #[test]
    fn test_future_position() {
        let mut ball = ball_at(0.0, 0.0);
        ball.body.velocity = vec2(2.0, 0.0);
        let p = ball.future_position(10.0);
        assert!(close(p.x, 20.0 + 0.5 * FRICTION * 100.0));
        assert_eq!(ball_at(3.0, 4.0).future_position(50.0), vec2(3.0, 4.0));
    }

    #[test]
    fn test_trap_and_place() {
        let mut ball = ball_at(0.0, 0.0);
        ball.kick(vec2(1.0, 1.0), 3.0);
        ball.trap();
        assert_eq!(ball.velocity(), Vector2D::zeros());

        ball.kick(vec2(1.0, 0.0), 3.0);
        ball.place_at_position(vec2(350.0, 200.0));
        assert_eq!(ball.position(), vec2(350.0, 200.0));
        assert_eq!(ball.old_position(), vec2(350.0, 200.0));
        assert_eq!(ball.velocity(), Vector2D::zeros());
    }

    #[test]
    fn test_bounces_off_top_wall() {
        let top = Wall2D::new(vec2(20.0, 20.0), vec2(680.0, 20.0));
        let mut ball = ball_at(300.0, 27.0);
        ball.body.velocity = vec2(1.0, -3.0);
        ball.update(&[top]);
        assert!(ball.velocity().y > 0.0);
        assert!(ball.velocity().x > 0.0);
    }

    #[test]
    fn test_moving_away_from_wall_is_not_reflected() {
        let top = Wall2D::new(vec2(20.0, 20.0), vec2(680.0, 20.0));
        let mut ball = ball_at(300.0, 27.0);
        ball.body.velocity = vec2(0.0, 3.0);
        ball.update(&[top]);
        assert!(ball.velocity().y > 0.0);
    }

    #[test]
    fn test_far_wall_ignored() {
        let top = Wall2D::new(vec2(20.0, 20.0), vec2(680.0, 20.0));
        let mut ball = ball_at(300.0, 200.0);
        ball.body.velocity = vec2(0.0, -3.0);
        ball.update(&[top]);
        assert!(ball.velocity().y < 0.0);
    }

    #[test]
    fn test_noise_free_with_perfect_accuracy() {
        let mut rng = ScriptedRandom::new([0.9, 0.1], []);
        let t = add_noise_to_kick(&vec2(0.0, 0.0), &vec2(10.0, 0.0), 1.0, &mut rng);
        assert!((t - vec2(10.0, 0.0)).norm() < 1e-9);

        // equal draws cancel out
        let t = add_noise_to_kick(&vec2(0.0, 0.0), &vec2(10.0, 0.0), 0.5, &mut FixedRandom::new(0.3));
        assert!((t - vec2(10.0, 0.0)).norm() < 1e-9);
    }

    #[test]
    fn test_noise_preserves_kick_length() {
        let mut rng = ScriptedRandom::new([0.9, 0.1], []);
        let t = add_noise_to_kick(&vec2(5.0, 5.0), &vec2(15.0, 5.0), 0.99, &mut rng);
        assert!((t.distance(&vec2(5.0, 5.0)) - 10.0).abs() < 1e-9);
        assert!(t.y > 5.0);
    }
}
