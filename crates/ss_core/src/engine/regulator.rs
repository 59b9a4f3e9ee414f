//! Tick-counted update throttle.

use serde::{Deserialize, Serialize};
use tracing::trace;

use super::random::RandomSource;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Cadence {
    /// Frequency 0: every call opens.
    Always,
    /// Negative frequency: never opens.
    Never,
    /// Opens once every `n` ticks.
    Every(u64),
}

/// Opens at most `freq` times per simulated second. The first opening is
/// offset by a random jitter in `[0, period)` so that many regulators created
/// on the same tick do not all fire together.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Regulator {
    cadence: Cadence,
    next_tick: u64,
}

impl Default for Regulator {
    fn default() -> Self {
        Self::always()
    }
}

impl Regulator {
    pub fn new(updates_per_second: f64, frame_rate: f64, rng: &mut dyn RandomSource) -> Self {
        let cadence = if updates_per_second > 0.0 {
            let period = (frame_rate / updates_per_second).round().max(1.0) as u64;
            Cadence::Every(period)
        } else if updates_per_second == 0.0 {
            Cadence::Always
        } else {
            Cadence::Never
        };

        let next_tick = match cadence {
            Cadence::Every(period) if period > 1 => rng.next_int(0, period as i32 - 1) as u64,
            _ => 0,
        };

        Self { cadence, next_tick }
    }

    pub fn always() -> Self {
        Self {
            cadence: Cadence::Always,
            next_tick: 0,
        }
    }

    pub fn cadence(&self) -> Cadence {
        self.cadence
    }

    pub fn is_ready(&mut self, tick: u64) -> bool {
        match self.cadence {
            Cadence::Always => true,
            Cadence::Never => false,
            Cadence::Every(period) => {
                if tick >= self.next_tick {
                    self.next_tick = tick + period;
                    trace!(tick, next = self.next_tick, "regulator open");
                    true
                } else {
                    false
                }
            }
        }
    }
}
