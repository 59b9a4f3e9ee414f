//! # ss_core - Deterministic Simple Soccer Simulation
//!
//! Two teams of eleven agents (a keeper and ten field players) play on a 2D
//! pitch. Every agent is a finite state machine; agents talk to each other
//! with telegrams and move with steering behaviours. A seeded random source
//! makes every match reproducible.
//!
//! ## Features
//! - 100% deterministic simulation (same seed = same match)
//! - Generic FSM with global states and message fallback
//! - Synchronous telegram dispatch with a nesting guard
//! - Steering accumulator (seek, arrive, pursuit, interpose, separation)
//! - Support spot scoring, pass safety and shot search
//! - Serializable per-tick snapshots and a match event log
//!
//! ## Example
//! ```ignore
//! use ss_core::{SimConfig, SimRng, World};
//!
//! let config = SimConfig::classic().with_seed(7);
//! let mut world = World::new(config, Box::new(SimRng::seeded(7)))?;
//! for _ in 0..3000 {
//!     world.update();
//! }
//! println!("{:?}", world.score());
//! ```

// Game engine APIs often require many parameters for physics, state, etc.
#![allow(clippy::too_many_arguments)]
// Struct initialization pattern used intentionally
#![allow(clippy::field_reassign_with_default)]

pub mod engine;
pub mod error;
pub mod geometry;
pub mod player;
pub mod tactics;

pub use engine::config;

pub use engine::config::SimConfig;
pub use engine::events::{EventOwner, KickFailure, MatchEvent, TimedEvent};
pub use engine::messaging::{Delivery, EntityId, Message};
pub use engine::random::{RandomSource, SimRng};
pub use engine::snapshot::{MatchSnapshot, PlayerSnapshot, Score, TeamSnapshot};
pub use engine::world::World;
pub use error::{Result, SimError};
pub use geometry::{vec2, Vector2D};
pub use player::{FieldPlayerState, KeeperState, PlayerId, PlayerRole};
pub use tactics::{TeamColor, TeamState};
