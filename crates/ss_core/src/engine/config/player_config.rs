//! Player and goalkeeper tuning

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PlayerConfig {
    // === Body ===
    pub mass: f64,
    pub max_force: f64,
    pub max_speed_with_ball: f64,
    pub max_speed_without_ball: f64,
    /// Radians per tick (기본: 0.4)
    pub max_turn_rate: f64,
    pub scale: f64,
    pub bounding_radius: f64,
    /// Velocity multiplier applied when no steering force is produced
    pub braking_rate: f64,

    // === Ball handling ===
    /// An opponent closer than this makes the ball carrier look for a pass
    pub comfort_zone: f64,
    /// 0..1, lower means noisier kicks (기본: 0.99)
    pub kicking_accuracy: f64,
    /// Kicks per second. 0 = unlimited, negative = never
    pub kick_frequency: f64,
    pub in_target_range: f64,
    pub ball_within_receiving_range: f64,

    // === Steering ===
    pub view_distance: f64,
    pub separation_coefficient: f64,
}

impl Default for PlayerConfig {
    fn default() -> Self {
        Self {
            mass: 3.0,
            max_force: 1.0,
            max_speed_with_ball: 1.2,
            max_speed_without_ball: 1.6,
            max_turn_rate: 0.4,
            scale: 1.0,
            bounding_radius: 5.0,
            braking_rate: 0.8,

            comfort_zone: 60.0,
            kicking_accuracy: 0.99,
            kick_frequency: 0.0,
            in_target_range: 10.0,
            ball_within_receiving_range: 10.0,

            view_distance: 30.0,
            separation_coefficient: 10.0,
        }
    }
}

/// 골키퍼 파라미터
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct KeeperConfig {
    /// Gap kept between the goal line and the ball when tending (기본: 20)
    pub tending_distance: f64,
    /// Ball closer than this to the goal centre triggers an interception
    pub intercept_range: f64,
    /// Keeper can pick the ball up within this range
    pub in_ball_range: f64,
    /// Minimum distance to a teammate before the keeper passes to it
    pub min_pass_distance: f64,
}

impl Default for KeeperConfig {
    fn default() -> Self {
        Self {
            tending_distance: 20.0,
            intercept_range: 100.0,
            in_ball_range: 10.0,
            min_pass_distance: 50.0,
        }
    }
}
