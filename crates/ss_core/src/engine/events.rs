//! Match event log.
//!
//! Events are raised during a tick and released in bulk by the driver via
//! `World::drain_events`. Per-kind totals survive draining so a headless run
//! can still report them at the end.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use tracing::debug;

use super::messaging::EntityId;
use crate::geometry::Vector2D;
use crate::tactics::TeamColor;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", content = "id")]
pub enum EventOwner {
    Player(EntityId),
    Team(TeamColor),
}

/// Why a player standing at the ball did not kick it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum KickFailure {
    KeeperHasBall,
    ReceiverAssigned,
    BallBehindPlayer,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum MatchEvent {
    EnterState {
        owner: EventOwner,
        state: String,
    },
    Shot {
        player: EntityId,
        target: Vector2D,
    },
    Pass {
        from: EntityId,
        to: EntityId,
        target: Vector2D,
    },
    PassRequest {
        passer: EntityId,
        requester: EntityId,
        executed: bool,
    },
    CannotKickBall {
        player: EntityId,
        reason: KickFailure,
    },
    GoalScored {
        scoring: TeamColor,
    },
    KickOff,
}

impl MatchEvent {
    pub fn kind(&self) -> &'static str {
        match self {
            MatchEvent::EnterState { .. } => "enter_state",
            MatchEvent::Shot { .. } => "shot",
            MatchEvent::Pass { .. } => "pass",
            MatchEvent::PassRequest { .. } => "pass_request",
            MatchEvent::CannotKickBall { .. } => "cannot_kick_ball",
            MatchEvent::GoalScored { .. } => "goal_scored",
            MatchEvent::KickOff => "kick_off",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TimedEvent {
    pub tick: u64,
    #[serde(flatten)]
    pub event: MatchEvent,
}

#[derive(Debug, Default, Clone)]
pub struct EventLog {
    pending: Vec<TimedEvent>,
    counts: BTreeMap<&'static str, u64>,
}

impl EventLog {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn raise(&mut self, tick: u64, event: MatchEvent) {
        debug!(tick, kind = event.kind(), ?event, "match event");
        *self.counts.entry(event.kind()).or_insert(0) += 1;
        self.pending.push(TimedEvent { tick, event });
    }

    pub fn pending(&self) -> &[TimedEvent] {
        &self.pending
    }

    /// Hands over everything raised since the last drain.
    pub fn drain(&mut self) -> Vec<TimedEvent> {
        std::mem::take(&mut self.pending)
    }

    pub fn count(&self, kind: &str) -> u64 {
        self.counts.get(kind).copied().unwrap_or(0)
    }

    pub fn counts(&self) -> &BTreeMap<&'static str, u64> {
        &self.counts
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_drain_keeps_counts() {
        let mut log = EventLog::new();
        log.raise(1, MatchEvent::KickOff);
        log.raise(2, MatchEvent::GoalScored { scoring: TeamColor::Red });
        log.raise(3, MatchEvent::GoalScored { scoring: TeamColor::Blue });

        let drained = log.drain();
        assert_eq!(drained.len(), 3);
        assert_eq!(drained[1].tick, 2);
        assert!(log.pending().is_empty());
        assert_eq!(log.count("goal_scored"), 2);
        assert_eq!(log.count("shot"), 0);
    }

    #[test]
    fn test_event_json_shape() {
        let ev = TimedEvent {
            tick: 9,
            event: MatchEvent::CannotKickBall {
                player: EntityId(4),
                reason: KickFailure::BallBehindPlayer,
            },
        };
        let v = serde_json::to_value(&ev).unwrap();
        assert_eq!(v["tick"], 9);
        assert_eq!(v["type"], "CannotKickBall");
        assert_eq!(v["reason"], "BallBehindPlayer");
    }
}
