//! Pitch and ball dimensions

use serde::{Deserialize, Serialize};

/// 경기장 크기 (pixels)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PitchConfig {
    /// Client window width (기본: 700)
    pub client_width: f64,
    /// Client window height (기본: 400)
    pub client_height: f64,
    /// Inset of the playing area from the client edge (기본: 20)
    pub margin: f64,
    pub regions_horizontal: usize,
    pub regions_vertical: usize,
    /// Distance between the posts (기본: 73.2)
    pub goal_width: f64,
}

impl Default for PitchConfig {
    fn default() -> Self {
        Self {
            client_width: 700.0,
            client_height: 400.0,
            margin: 20.0,
            regions_horizontal: 12,
            regions_vertical: 7,
            goal_width: 73.2,
        }
    }
}

impl PitchConfig {
    pub fn num_regions(&self) -> usize {
        self.regions_horizontal * self.regions_vertical
    }

    pub fn playing_height(&self) -> f64 {
        self.client_height - 2.0 * self.margin
    }

    pub fn playing_width(&self) -> f64 {
        self.client_width - 2.0 * self.margin
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct BallConfig {
    /// Bounding radius (기본: 5.0)
    pub size: f64,
    pub mass: f64,
    /// Speed change per tick, must be negative (기본: -0.015)
    pub friction: f64,
}

impl Default for BallConfig {
    fn default() -> Self {
        Self {
            size: 5.0,
            mass: 1.0,
            friction: -0.015,
        }
    }
}
