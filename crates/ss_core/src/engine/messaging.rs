//! Telegrams and the synchronous dispatcher bookkeeping.
//!
//! Delivery itself happens in `World::dispatch`, which owns every receiver.
//! This module only holds the envelope types, the id allocator and the
//! recursion guard.

use serde::{Deserialize, Serialize};

use crate::geometry::Vector2D;

/// Nested dispatches beyond this depth are dropped.
pub const MAX_DISPATCH_DEPTH: u32 = 16;

/// Identity of anything that can receive a telegram.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct EntityId(pub u32);

impl std::fmt::Display for EntityId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// Monotonic id source. Ids are never reused.
#[derive(Debug, Default, Clone)]
pub struct EntityIdAllocator {
    next: u32,
}

impl EntityIdAllocator {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn allocate(&mut self) -> EntityId {
        let id = EntityId(self.next);
        self.next += 1;
        id
    }

    /// Number of ids handed out so far.
    pub fn issued(&self) -> u32 {
        self.next
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind")]
pub enum Message {
    ReceiveBall { target: Vector2D },
    PassToMe { requester: EntityId },
    SupportAttacker,
    GoHome,
    Wait,
}

impl Message {
    pub fn name(&self) -> &'static str {
        match self {
            Message::ReceiveBall { .. } => "ReceiveBall",
            Message::PassToMe { .. } => "PassToMe",
            Message::SupportAttacker => "SupportAttacker",
            Message::GoHome => "GoHome",
            Message::Wait => "Wait",
        }
    }
}

/// Immutable message envelope. `tick` is informational only.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Telegram {
    pub sender: EntityId,
    pub receiver: EntityId,
    pub message: Message,
    pub tick: u64,
}

/// What happened to a dispatched telegram.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Delivery {
    Handled,
    Unhandled,
    UnknownReceiver,
    DepthExceeded,
}

/// Recursion guard and counters for synchronous delivery.
#[derive(Debug, Default, Clone)]
pub struct Dispatcher {
    depth: u32,
    delivered: u64,
    dropped: u64,
}

impl Dispatcher {
    pub fn new() -> Self {
        Self::default()
    }

    /// Enters one dispatch level. Returns `false` once the depth guard trips,
    /// in which case `leave` must not be called.
    pub fn try_enter(&mut self) -> bool {
        if self.depth >= MAX_DISPATCH_DEPTH {
            return false;
        }
        self.depth += 1;
        true
    }

    pub fn leave(&mut self) {
        self.depth = self.depth.saturating_sub(1);
    }

    pub fn depth(&self) -> u32 {
        self.depth
    }

    pub fn record(&mut self, delivery: Delivery) {
        match delivery {
            Delivery::Handled => self.delivered += 1,
            Delivery::Unhandled | Delivery::UnknownReceiver | Delivery::DepthExceeded => {
                self.dropped += 1
            }
        }
    }

    pub fn delivered(&self) -> u64 {
        self.delivered
    }

    pub fn dropped(&self) -> u64 {
        self.dropped
    }
}
