//! Steering behaviours
//!
//! Each player owns one [`Steering`] record: a set of active behaviours, a
//! target and the force produced this tick. [`Steering::calculate`] runs the
//! active behaviours in a fixed priority order and stops adding forces once
//! the agent's force budget is spent, so high-priority behaviours
//! (separation) are never starved by low-priority ones.
//!
//! The behaviour functions are free functions over an [`AgentKinematics`]
//! snapshot so that the world can compute steering without borrowing the
//! player mutably.

use serde::{Deserialize, Serialize};
use tracing::trace;

use super::ball::SoccerBall;
use crate::geometry::{Vector2D, Vector2DExt};

/// Tunes how hard `arrive` brakes near the target.
const DECELERATION_TWEAKER: f64 = 0.3;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Deceleration {
    Fast = 1,
    Normal = 2,
    Slow = 3,
}

impl Deceleration {
    fn factor(self) -> f64 {
        self as u8 as f64
    }
}

/// Behaviours in priority order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Behavior {
    Separation,
    Seek,
    Arrive,
    Pursuit,
    Interpose,
}

impl Behavior {
    pub const ALL: [Behavior; 5] = [
        Behavior::Separation,
        Behavior::Seek,
        Behavior::Arrive,
        Behavior::Pursuit,
        Behavior::Interpose,
    ];

    const fn bit(self) -> u8 {
        1 << self as u8
    }
}

/// What the steering code needs to know about its agent.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct AgentKinematics {
    pub position: Vector2D,
    pub velocity: Vector2D,
    pub heading: Vector2D,
    pub side: Vector2D,
    pub max_speed: f64,
    pub max_force: f64,
    pub max_turn_rate: f64,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Steering {
    flags: u8,
    target: Vector2D,
    force: Vector2D,
    tagged: bool,
    pub separation_coefficient: f64,
    pub view_distance: f64,
    pub interpose_distance: f64,
}

impl Steering {
    pub fn new(separation_coefficient: f64, view_distance: f64) -> Self {
        Self {
            flags: 0,
            target: Vector2D::zeros(),
            force: Vector2D::zeros(),
            tagged: false,
            separation_coefficient,
            view_distance,
            interpose_distance: 0.0,
        }
    }

    // ========== Behaviour flags ==========

    pub fn activate(&mut self, behavior: Behavior) {
        self.flags |= behavior.bit();
    }

    pub fn deactivate(&mut self, behavior: Behavior) {
        self.flags &= !behavior.bit();
    }

    pub fn is_active(&self, behavior: Behavior) -> bool {
        self.flags & behavior.bit() != 0
    }

    pub fn active(&self) -> Vec<Behavior> {
        Behavior::ALL
            .into_iter()
            .filter(|b| self.is_active(*b))
            .collect()
    }

    /// Turns interpose on and sets the distance kept from the target.
    pub fn activate_interpose(&mut self, distance: f64) {
        self.activate(Behavior::Interpose);
        self.interpose_distance = distance;
    }

    // ========== Target / force ==========

    pub fn target(&self) -> Vector2D {
        self.target
    }

    pub fn set_target(&mut self, target: Vector2D) {
        self.target = target;
    }

    pub fn force(&self) -> Vector2D {
        self.force
    }

    pub fn tag(&mut self) {
        self.tagged = true;
    }

    pub fn untag(&mut self) {
        self.tagged = false;
    }

    pub fn is_tagged(&self) -> bool {
        self.tagged
    }

    /// Sums the active behaviours into the force budget and returns the
    /// result. `neighbours` are the positions of tagged players other than
    /// this one.
    pub fn calculate(
        &mut self,
        agent: &AgentKinematics,
        ball: &SoccerBall,
        neighbours: &[Vector2D],
    ) -> Vector2D {
        self.force = Vector2D::zeros();
        self.sum_forces(agent, ball, neighbours);
        self.force = self.force.truncated(agent.max_force);
        trace!(force = ?self.force, flags = self.flags, "steering");
        self.force
    }

    fn sum_forces(&mut self, agent: &AgentKinematics, ball: &SoccerBall, neighbours: &[Vector2D]) {
        for behavior in Behavior::ALL {
            if !self.is_active(behavior) {
                continue;
            }
            let f = match behavior {
                Behavior::Separation => {
                    separation(&agent.position, neighbours) * self.separation_coefficient
                }
                Behavior::Seek => seek(agent, &self.target),
                Behavior::Arrive => arrive(agent, &self.target, Deceleration::Fast),
                Behavior::Pursuit => pursuit(agent, ball),
                Behavior::Interpose => interpose(agent, ball, &self.target, self.interpose_distance),
            };
            if !accumulate_force(&mut self.force, &f, agent.max_force) {
                return;
            }
        }
    }

    /// Projection of the force onto the heading.
    pub fn forward_component(&self, heading: &Vector2D) -> f64 {
        heading.dot(&self.force)
    }

    /// Projection onto the side vector, scaled into a turn amount.
    pub fn side_component(&self, side: &Vector2D, max_turn_rate: f64) -> f64 {
        side.dot(&self.force) * max_turn_rate
    }
}

/// Adds as much of `force` to `running` as the budget allows. Returns `false`
/// when the budget was already spent.
pub fn accumulate_force(running: &mut Vector2D, force: &Vector2D, max_force: f64) -> bool {
    let remaining = max_force - running.norm();
    if remaining <= 0.0 {
        return false;
    }

    let magnitude = force.norm().min(remaining);
    *running += force.normalized_or_zero() * magnitude;
    true
}

pub fn seek(agent: &AgentKinematics, target: &Vector2D) -> Vector2D {
    let desired = (target - agent.position).normalized_or_zero() * agent.max_speed;
    desired - agent.velocity
}

pub fn arrive(agent: &AgentKinematics, target: &Vector2D, deceleration: Deceleration) -> Vector2D {
    let to_target = target - agent.position;
    let dist = to_target.norm();
    if dist <= 0.0 {
        return Vector2D::zeros();
    }

    let speed = (dist / (deceleration.factor() * DECELERATION_TWEAKER)).min(agent.max_speed);
    let desired = to_target * (speed / dist);
    desired - agent.velocity
}

/// Arrives at where the ball will be by the time the agent could reach it.
pub fn pursuit(agent: &AgentKinematics, ball: &SoccerBall) -> Vector2D {
    let to_ball = ball.position() - agent.position;
    let ball_speed = ball.body.speed();

    let look_ahead = if ball_speed != 0.0 {
        to_ball.norm() / ball_speed
    } else {
        0.0
    };

    let future = ball.future_position(look_ahead);
    arrive(agent, &future, Deceleration::Fast)
}

/// Inverse-distance push away from every neighbour.
pub fn separation(position: &Vector2D, neighbours: &[Vector2D]) -> Vector2D {
    let mut force = Vector2D::zeros();
    for other in neighbours {
        let to_agent = position - other;
        let dist = to_agent.norm();
        // coincident players push in no particular direction
        if dist <= 0.0 {
            continue;
        }
        force += to_agent.normalized_or_zero() / dist;
    }
    force
}

/// Positions the agent between `target` and the ball, `distance` from the
/// target.
pub fn interpose(
    agent: &AgentKinematics,
    ball: &SoccerBall,
    target: &Vector2D,
    distance: f64,
) -> Vector2D {
    let toward_ball = (ball.position() - target).normalized_or_zero();
    arrive(agent, &(target + toward_ball * distance), Deceleration::Normal)
}
