//! Team tactics: support spots, shooting and passing

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TacticsConfig {
    // === Support spots ===
    pub support_spots_x: usize,
    pub support_spots_y: usize,
    pub spot_can_pass_score: f64,
    pub spot_can_score_from_position_score: f64,
    pub spot_dist_from_controlling_player_score: f64,
    /// Distance from the controller that scores best (기본: 400)
    pub optimal_support_distance: f64,
    /// Recalculations per second
    pub support_spot_update_freq: f64,

    // === Decision chances ===
    pub pot_shot_chance: f64,
    /// Chance of receiving a pass with arrive instead of pursuit
    pub arrive_receive_chance: f64,
    pub num_attempts_to_find_valid_strike: u32,

    // === Kick forces ===
    pub max_dribble_force: f64,
    pub max_shooting_force: f64,
    pub max_passing_force: f64,
    pub min_pass_distance: f64,
}

impl Default for TacticsConfig {
    fn default() -> Self {
        Self {
            support_spots_x: 13,
            support_spots_y: 6,
            spot_can_pass_score: 2.0,
            spot_can_score_from_position_score: 1.0,
            spot_dist_from_controlling_player_score: 2.0,
            optimal_support_distance: 400.0,
            support_spot_update_freq: 1.0,

            pot_shot_chance: 0.005,
            arrive_receive_chance: 0.5,
            num_attempts_to_find_valid_strike: 5,

            max_dribble_force: 1.5,
            max_shooting_force: 6.0,
            max_passing_force: 3.0,
            min_pass_distance: 120.0,
        }
    }
}
