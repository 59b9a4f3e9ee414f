//! # Simulation engine
//!
//! 경기 엔진 구성 요소:
//! - kinematics: [`entity`], [`ball`], [`steering`]
//! - pitch furniture: [`pitch`], [`region`], [`goal`]
//! - agent plumbing: [`fsm`], [`messaging`], [`regulator`], [`random`]
//! - team support: [`support_spot`]
//! - the match itself: [`world`], [`events`], [`snapshot`]

pub mod ball;
pub mod config;
pub mod entity;
pub mod events;
pub mod fsm;
pub mod goal;
pub mod messaging;
pub mod pitch;
pub mod random;
pub mod region;
pub mod regulator;
pub mod snapshot;
pub mod steering;
pub mod support_spot;
pub mod world;

pub use ball::SoccerBall;
pub use config::SimConfig;
pub use entity::MovingEntity;
pub use events::{EventLog, EventOwner, KickFailure, MatchEvent, TimedEvent};
pub use fsm::{State, StateMachine};
pub use goal::Goal;
pub use messaging::{Delivery, Dispatcher, EntityId, Message, Telegram};
pub use pitch::Pitch;
pub use random::{RandomSource, SimRng};
pub use region::{Region, RegionModifier};
pub use regulator::Regulator;
pub use snapshot::{BallSnapshot, MatchSnapshot, PlayerSnapshot, Score, TeamSnapshot};
pub use steering::{Behavior, Deceleration, Steering};
pub use support_spot::{SupportSpot, SupportSpotCalculator};
pub use world::World;
