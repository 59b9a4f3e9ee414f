//! Goal mouths
//!
//! 각 골대는 "실점 횟수"를 센다. A team's score is the count stored in the
//! goal it attacks.

use serde::{Deserialize, Serialize};

use crate::geometry::{line_intersection_2d, Vector2D};

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Goal {
    pub left_post: Vector2D,
    pub right_post: Vector2D,
    /// Unit vector pointing out of the goal onto the pitch.
    pub facing: Vector2D,
    pub center: Vector2D,
    goals_scored: u32,
}

impl Goal {
    pub fn new(left_post: Vector2D, right_post: Vector2D, facing: Vector2D) -> Self {
        Self {
            left_post,
            right_post,
            facing,
            center: (left_post + right_post) / 2.0,
            goals_scored: 0,
        }
    }

    /// True when the ball crossed the goal line between its previous and
    /// current position. Increments the count on a hit.
    pub fn scored(&mut self, ball_position: &Vector2D, ball_old_position: &Vector2D) -> bool {
        if line_intersection_2d(
            ball_position,
            ball_old_position,
            &self.left_post,
            &self.right_post,
        ) {
            self.goals_scored += 1;
            return true;
        }
        false
    }

    pub fn goals_scored(&self) -> u32 {
        self.goals_scored
    }
}
