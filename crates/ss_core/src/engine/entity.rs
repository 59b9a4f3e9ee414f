//! Shared kinematic body for players and the ball.

use serde::{Deserialize, Serialize};

use super::messaging::EntityId;
use crate::geometry::{vec_rotate_around_origin, Vector2D, Vector2DExt};

/// Angles smaller than this count as already facing the target.
pub const FACING_EPSILON: f64 = 1e-5;

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct MovingEntity {
    pub id: EntityId,
    pub position: Vector2D,
    pub velocity: Vector2D,
    heading: Vector2D,
    side: Vector2D,
    pub mass: f64,
    pub max_speed: f64,
    pub max_force: f64,
    pub max_turn_rate: f64,
    pub bounding_radius: f64,
}

impl MovingEntity {
    #[allow(clippy::too_many_arguments)]
    pub fn new(
        id: EntityId,
        position: Vector2D,
        heading: Vector2D,
        mass: f64,
        max_speed: f64,
        max_force: f64,
        max_turn_rate: f64,
        bounding_radius: f64,
    ) -> Self {
        let heading = heading.normalized_or_zero();
        Self {
            id,
            position,
            velocity: Vector2D::zeros(),
            heading,
            side: heading.perpendicular(),
            mass,
            max_speed,
            max_force,
            max_turn_rate,
            bounding_radius,
        }
    }

    pub fn heading(&self) -> Vector2D {
        self.heading
    }

    pub fn side(&self) -> Vector2D {
        self.side
    }

    /// Sets the heading and recomputes the side vector. A zero vector is
    /// ignored so the heading stays a unit vector.
    pub fn set_heading(&mut self, heading: Vector2D) {
        let h = heading.normalized_or_zero();
        if h.is_zero_length() {
            return;
        }
        self.heading = h;
        self.side = h.perpendicular();
    }

    pub fn speed(&self) -> f64 {
        self.velocity.norm()
    }

    /// Turns toward `target` by at most `max_turn_rate`. Returns `true` once
    /// the heading is already within [`FACING_EPSILON`] of the target.
    pub fn rotate_heading_to_face_position(&mut self, target: &Vector2D) -> bool {
        let to_target = (target - self.position).normalized_or_zero();
        let dot = self.heading.dot(&to_target).clamp(-1.0, 1.0);
        let mut angle = dot.acos();

        if angle < FACING_EPSILON {
            return true;
        }

        if angle > self.max_turn_rate {
            angle = self.max_turn_rate;
        }

        let turn = angle * self.heading.sign(&to_target);
        self.heading = vec_rotate_around_origin(&self.heading, turn);
        self.velocity = vec_rotate_around_origin(&self.velocity, turn);
        self.side = self.heading.perpendicular();

        false
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::geometry::vec2;

    fn body(turn_rate: f64) -> MovingEntity {
        MovingEntity::new(
            EntityId(1),
            vec2(0.0, 0.0),
            vec2(1.0, 0.0),
            3.0,
            1.6,
            1.0,
            turn_rate,
            5.0,
        )
    }

    #[test]
    fn test_set_heading_updates_side() {
        let mut e = body(0.4);
        e.set_heading(vec2(0.0, 2.0));
        assert_eq!(e.heading(), vec2(0.0, 1.0));
        assert_eq!(e.side(), vec2(-1.0, 0.0));

        e.set_heading(Vector2D::zeros());
        assert_eq!(e.heading(), vec2(0.0, 1.0));
    }

    #[test]
    fn test_already_facing() {
        let mut e = body(0.4);
        assert!(e.rotate_heading_to_face_position(&vec2(100.0, 0.0)));
        assert_eq!(e.heading(), vec2(1.0, 0.0));
    }

    #[test]
    fn test_turn_rate_is_clamped() {
        let mut e = body(0.4);
        // target straight "below" on screen is 90 degrees away
        assert!(!e.rotate_heading_to_face_position(&vec2(0.0, 100.0)));
        let turned = e.heading().dot(&vec2(1.0, 0.0)).clamp(-1.0, 1.0).acos();
        assert!((turned - 0.4).abs() < 1e-9);
        assert!((e.heading().norm() - 1.0).abs() < 1e-9);
        // and it turned toward the target, not away
        assert!(e.heading().y > 0.0);
        assert!((e.side() - e.heading().perpendicular()).norm() < 1e-12);
    }

    #[test]
    fn test_small_turn_lands_on_target() {
        let mut e = body(0.4);
        let target = vec2(100.0, 10.0);
        assert!(!e.rotate_heading_to_face_position(&target));
        let expected = target.normalize();
        assert!((e.heading() - expected).norm() < 1e-9);
        assert!(e.rotate_heading_to_face_position(&target));
    }

    #[test]
    fn test_velocity_rotates_with_heading() {
        let mut e = body(0.4);
        e.velocity = vec2(1.0, 0.0);
        e.rotate_heading_to_face_position(&vec2(0.0, 100.0));
        assert!((e.velocity - e.heading()).norm() < 1e-9);
    }
}

#[cfg(test)]
mod proptests {
    use super::*;
    use proptest::prelude::*;
    use std::f64::consts::{PI, TAU};

    proptest! {
        /// Property: one call never turns by more than the turn rate, and it
        /// reports facing only when the start angle was already tiny
        #[test]
        fn prop_rotation_is_bounded(
            theta in 0.0f64..TAU,
            target_angle in 0.0f64..TAU,
            distance in 1.0f64..500.0,
            turn_rate in 0.01f64..PI,
        ) {
            let heading = Vector2D::new(theta.cos(), theta.sin());
            let mut e = MovingEntity::new(
                EntityId(1),
                Vector2D::new(50.0, 50.0),
                heading,
                3.0,
                1.6,
                1.0,
                turn_rate,
                5.0,
            );
            let target = e.position
                + Vector2D::new(target_angle.cos(), target_angle.sin()) * distance;

            let h0 = e.heading();
            let to_target = (target - e.position).normalized_or_zero();
            let angle0 = h0.dot(&to_target).clamp(-1.0, 1.0).acos();

            let facing = e.rotate_heading_to_face_position(&target);
            let h1 = e.heading();
            let step = h0.dot(&h1).clamp(-1.0, 1.0).acos();

            prop_assert_eq!(facing, angle0 < FACING_EPSILON);
            prop_assert!(step <= turn_rate + 1e-6);
            prop_assert!((h1.norm() - 1.0).abs() < 1e-9);
        }
    }
}
