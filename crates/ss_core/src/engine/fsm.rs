//! Generic finite state machine
//!
//! States are small `Copy` enums. Their behaviour is a table of functions on
//! the [`State`] trait that receive the world and the owner handle, so a state
//! value never holds per-owner data and the machine itself stays a plain
//! `{ current, previous, global }` record stored inside the world.
//!
//! The free functions below look the machine up through [`State::machine`]
//! on every step. That lets a state's `enter` trigger another transition on
//! the same owner (for example a kick that is not ready falling back to a
//! chase) without holding a borrow across the call.

use std::fmt::Debug;

use serde::{Deserialize, Serialize};
use tracing::error;

use super::messaging::Telegram;

pub trait State<W: ?Sized>: Copy + Eq + Debug + 'static {
    /// Handle identifying whose machine this is.
    type Owner: Copy + Debug;

    fn machine(world: &mut W, owner: Self::Owner) -> Option<&mut StateMachine<Self>>;

    fn machine_ref(world: &W, owner: Self::Owner) -> Option<&StateMachine<Self>>;

    fn name(self) -> &'static str;

    fn enter(self, _world: &mut W, _owner: Self::Owner) {}

    fn execute(self, _world: &mut W, _owner: Self::Owner) {}

    fn exit(self, _world: &mut W, _owner: Self::Owner) {}

    /// Returns `true` when the telegram was consumed.
    fn on_message(self, _world: &mut W, _owner: Self::Owner, _telegram: &Telegram) -> bool {
        false
    }

    /// Called between `exit(from)` and `enter(to)`.
    fn record_transition(_world: &mut W, _owner: Self::Owner, _from: Self, _to: Self) {}
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct StateMachine<S> {
    current: S,
    previous: S,
    global: Option<S>,
}

impl<S: Copy + Eq> StateMachine<S> {
    pub fn new(initial: S) -> Self {
        Self {
            current: initial,
            previous: initial,
            global: None,
        }
    }

    pub fn with_global(mut self, global: S) -> Self {
        self.global = Some(global);
        self
    }

    pub fn current(&self) -> S {
        self.current
    }

    pub fn previous(&self) -> S {
        self.previous
    }

    pub fn global(&self) -> Option<S> {
        self.global
    }

    pub fn is_in_state(&self, state: S) -> bool {
        self.current == state
    }
}

fn missing<S: Debug, O: Debug>(owner: O, op: &str) {
    error!(?owner, state_kind = std::any::type_name::<S>(), "{op}: owner has no such machine");
}

/// Runs `enter` on the initial state.
pub fn start<W: ?Sized, S: State<W>>(world: &mut W, owner: S::Owner) -> bool {
    let Some(current) = S::machine_ref(world, owner).map(|m| m.current) else {
        missing::<S, _>(owner, "start");
        return false;
    };
    current.enter(world, owner);
    true
}

/// Global state first, then the current one.
pub fn update<W: ?Sized, S: State<W>>(world: &mut W, owner: S::Owner) -> bool {
    let Some(global) = S::machine_ref(world, owner).map(|m| m.global) else {
        missing::<S, _>(owner, "update");
        return false;
    };
    if let Some(g) = global {
        g.execute(world, owner);
    }
    // the global state may have switched the current one
    if let Some(current) = S::machine_ref(world, owner).map(|m| m.current) {
        current.execute(world, owner);
    }
    true
}

pub fn change_state<W: ?Sized, S: State<W>>(world: &mut W, owner: S::Owner, new_state: S) -> bool {
    let Some(old) = S::machine_ref(world, owner).map(|m| m.current) else {
        missing::<S, _>(owner, "change_state");
        return false;
    };

    old.exit(world, owner);

    if let Some(machine) = S::machine(world, owner) {
        machine.previous = old;
        machine.current = new_state;
    }
    S::record_transition(world, owner, old, new_state);

    new_state.enter(world, owner);
    true
}

pub fn revert_to_previous_state<W: ?Sized, S: State<W>>(world: &mut W, owner: S::Owner) -> bool {
    match S::machine_ref(world, owner).map(|m| m.previous) {
        Some(previous) => change_state(world, owner, previous),
        None => {
            missing::<S, _>(owner, "revert_to_previous_state");
            false
        }
    }
}

/// Offers the telegram to the current state, then to the global state.
pub fn handle_message<W: ?Sized, S: State<W>>(
    world: &mut W,
    owner: S::Owner,
    telegram: &Telegram,
) -> bool {
    let Some((current, global)) = S::machine_ref(world, owner).map(|m| (m.current, m.global))
    else {
        missing::<S, _>(owner, "handle_message");
        return false;
    };

    if current.on_message(world, owner, telegram) {
        return true;
    }
    match global {
        Some(g) => g.on_message(world, owner, telegram),
        None => false,
    }
}

pub fn is_in_state<W: ?Sized, S: State<W>>(world: &W, owner: S::Owner, state: S) -> bool {
    S::machine_ref(world, owner).is_some_and(|m| m.is_in_state(state))
}

pub fn current_state<W: ?Sized, S: State<W>>(world: &W, owner: S::Owner) -> Option<S> {
    S::machine_ref(world, owner).map(|m| m.current)
}
