//! # Simulation Configuration
//!
//! 모든 튜닝 상수를 한 곳에서 관리한다.
//!
//! ## Presets
//! - `classic()`: the reference tuning (also `Default`)
//! - `deterministic()`: no pot shots, receivers always use arrive
//! - `throttled_kicks()`: players may kick at most 8 times per second
//!
//! ## Usage
//! ```rust
//! use ss_core::config::SimConfig;
//!
//! let config = SimConfig::default();
//! let test = SimConfig::deterministic();
//! assert!(test.validate().is_ok());
//! ```
//!
//! ## Environment Variables
//!
//! - `SS_CONFIG_PRESET`: preset picked by [`SimConfig::from_env_or_default`]

mod lineup_config;
mod pitch_config;
mod player_config;
mod tactics_config;

pub use lineup_config::{FieldSlot, TeamSetup};
pub use pitch_config::{BallConfig, PitchConfig};
pub use player_config::{KeeperConfig, PlayerConfig};
pub use tactics_config::TacticsConfig;

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::{Result, SimError};
use crate::player::PlayerRole;
use crate::tactics::TeamColor;

/// Field players per team.
pub const FIELD_PLAYERS_PER_TEAM: usize = 10;

/// Kicking range before the ball radius is added.
const BASE_KICKING_DISTANCE: f64 = 6.0;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SimConfig {
    pub pitch: PitchConfig,
    pub ball: BallConfig,
    pub player: PlayerConfig,
    pub keeper: KeeperConfig,
    pub tactics: TacticsConfig,
    /// Ticks per simulated second (기본: 30)
    pub frame_rate: f64,
    pub seed: u64,
    pub red: TeamSetup,
    pub blue: TeamSetup,
}

impl Default for SimConfig {
    fn default() -> Self {
        Self {
            pitch: PitchConfig::default(),
            ball: BallConfig::default(),
            player: PlayerConfig::default(),
            keeper: KeeperConfig::default(),
            tactics: TacticsConfig::default(),
            frame_rate: 30.0,
            seed: 0,
            red: TeamSetup::classic_red(),
            blue: TeamSetup::classic_blue(),
        }
    }
}

impl SimConfig {
    pub fn classic() -> Self {
        Self::default()
    }

    /// 테스트용: no pot shots and arrive-style receiving.
    pub fn deterministic() -> Self {
        let mut cfg = Self::default();
        cfg.tactics.pot_shot_chance = 0.0;
        cfg.tactics.arrive_receive_chance = 1.0;
        cfg
    }

    pub fn throttled_kicks() -> Self {
        let mut cfg = Self::default();
        cfg.player.kick_frequency = 8.0;
        cfg
    }

    pub fn preset(name: &str) -> Option<Self> {
        match name.to_lowercase().replace('_', "-").as_str() {
            "classic" | "default" => Some(Self::classic()),
            "deterministic" => Some(Self::deterministic()),
            "throttled-kicks" => Some(Self::throttled_kicks()),
            _ => None,
        }
    }

    /// Preset named by `SS_CONFIG_PRESET`, or classic when unset.
    pub fn from_env_or_default() -> Self {
        let name = std::env::var("SS_CONFIG_PRESET").unwrap_or_default();
        Self::preset_or_default(&name)
    }

    /// Blank or unknown names fall back to classic.
    pub fn preset_or_default(name: &str) -> Self {
        if name.trim().is_empty() {
            return Self::default();
        }
        Self::preset(name).unwrap_or_else(|| {
            log::warn!("Unknown config preset '{}', using classic", name);
            Self::default()
        })
    }

    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = seed;
        self
    }

    /// Distance at which a player can kick the ball.
    pub fn kicking_distance(&self) -> f64 {
        BASE_KICKING_DISTANCE + self.ball.size
    }

    pub fn team(&self, color: TeamColor) -> &TeamSetup {
        match color {
            TeamColor::Red => &self.red,
            TeamColor::Blue => &self.blue,
        }
    }

    // ========== Loading ==========

    pub fn from_yaml_str(s: &str) -> Result<Self> {
        let cfg: Self = serde_yaml::from_str(s)?;
        cfg.validate()?;
        Ok(cfg)
    }

    pub fn from_json_str(s: &str) -> Result<Self> {
        let cfg: Self = serde_json::from_str(s)?;
        cfg.validate()?;
        Ok(cfg)
    }

    /// Loads a `.yaml`/`.yml` or `.json` file.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let text = std::fs::read_to_string(path)?;
        let ext = path
            .extension()
            .and_then(|e| e.to_str())
            .map(str::to_lowercase)
            .unwrap_or_default();

        let cfg = match ext.as_str() {
            "yaml" | "yml" => Self::from_yaml_str(&text)?,
            "json" => Self::from_json_str(&text)?,
            other => {
                return Err(SimError::Config(format!(
                    "unsupported config extension '{}' for {}",
                    other,
                    path.display()
                )))
            }
        };
        log::info!("Loaded simulation config from {}", path.display());
        Ok(cfg)
    }

    pub fn to_yaml_string(&self) -> Result<String> {
        Ok(serde_yaml::to_string(self)?)
    }

    pub fn to_json_string(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    // ========== Validation ==========

    pub fn validate(&self) -> Result<()> {
        let positive = [
            ("ball.mass", self.ball.mass),
            ("ball.size", self.ball.size),
            ("player.mass", self.player.mass),
            ("player.max_force", self.player.max_force),
            ("player.max_speed_with_ball", self.player.max_speed_with_ball),
            ("player.max_speed_without_ball", self.player.max_speed_without_ball),
            ("player.max_turn_rate", self.player.max_turn_rate),
            ("tactics.max_passing_force", self.tactics.max_passing_force),
            ("tactics.max_shooting_force", self.tactics.max_shooting_force),
            ("frame_rate", self.frame_rate),
        ];
        for (name, value) in positive {
            if value.is_nan() || value <= 0.0 {
                return Err(SimError::Config(format!("{} must be positive, got {}", name, value)));
            }
        }

        if self.ball.friction.is_nan() || self.ball.friction >= 0.0 {
            return Err(SimError::Config(format!(
                "ball.friction must be negative, got {}",
                self.ball.friction
            )));
        }

        if self.pitch.regions_horizontal == 0 || self.pitch.regions_vertical == 0 {
            return Err(SimError::Config("region grid must be at least 1x1".into()));
        }
        if self.tactics.support_spots_x < 4 || self.tactics.support_spots_y == 0 {
            return Err(SimError::Config("support spot grid is too small".into()));
        }
        if self.pitch.playing_width() <= 0.0 || self.pitch.playing_height() <= 0.0 {
            return Err(SimError::Config("playing area is empty".into()));
        }
        if self.pitch.goal_width <= 0.0 || self.pitch.goal_width >= self.pitch.playing_height() {
            return Err(SimError::Config(format!(
                "goal width {} does not fit the playing area height {}",
                self.pitch.goal_width,
                self.pitch.playing_height()
            )));
        }

        self.validate_team(TeamColor::Red)?;
        self.validate_team(TeamColor::Blue)?;

        if self.player.kick_frequency < 0.0 {
            log::warn!("player.kick_frequency is negative: field players will never kick");
        }
        if !(0.0..=1.0).contains(&self.player.kicking_accuracy) {
            log::warn!(
                "player.kicking_accuracy {} is outside 0..1, kick noise will be exaggerated",
                self.player.kicking_accuracy
            );
        }
        Ok(())
    }

    fn validate_team(&self, color: TeamColor) -> Result<()> {
        let setup = self.team(color);
        let num_regions = self.pitch.num_regions();
        let invalid = |reason: String| SimError::InvalidLineup { color, reason };

        if setup.field_players.len() != FIELD_PLAYERS_PER_TEAM {
            return Err(invalid(format!(
                "expected {} field players, found {}",
                FIELD_PLAYERS_PER_TEAM,
                setup.field_players.len()
            )));
        }
        if setup
            .field_players
            .iter()
            .any(|slot| slot.role == PlayerRole::GoalKeeper)
        {
            return Err(invalid("only the keeper slot may hold a goalkeeper".into()));
        }
        for (name, table) in [
            ("defending", &setup.defending_regions),
            ("attacking", &setup.attacking_regions),
        ] {
            if table.len() != setup.squad_size() {
                return Err(invalid(format!(
                    "{} region table has {} entries, expected {}",
                    name,
                    table.len(),
                    setup.squad_size()
                )));
            }
        }

        let all_regions = std::iter::once(setup.keeper_region)
            .chain(setup.field_players.iter().map(|s| s.region))
            .chain(setup.defending_regions.iter().copied())
            .chain(setup.attacking_regions.iter().copied());
        for region in all_regions {
            if region >= num_regions {
                return Err(SimError::RegionOutOfRange(region));
            }
        }
        Ok(())
    }
}

// ========== Tests ==========
