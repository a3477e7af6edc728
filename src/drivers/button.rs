//! Timestamp-driven button debouncer.
//!
//! ## Hardware
//!
//! Active-low momentary switches with pull-ups.  The main loop samples
//! each level once per tick and feeds it to [`Debouncer::update`] along
//! with the tick timestamp; no busy-waiting happens here.
//!
//! ## State machine
//!
//! | State       | Leaves when                           | To          |
//! |-------------|---------------------------------------|-------------|
//! | `Idle`      | high→low edge seen                    | `Candidate` |
//! | `Candidate` | settle elapsed, still low (fires)     | `Confirmed` |
//! | `Candidate` | settle elapsed, released              | `Idle`      |
//! | `Confirmed` | cooldown elapsed, edge in that sample | `Candidate` |
//! | `Confirmed` | cooldown elapsed                      | `Idle`      |
//!
//! Edges during the cooldown are dropped.  A held button produces a
//! single press because `Idle` only reacts to a fresh high→low edge.

use crate::config::{BUTTON_COOLDOWN_MS, BUTTON_SETTLE_MS};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum DebounceState {
    Idle,
    Candidate { since_ms: u32 },
    Confirmed { at_ms: u32 },
}

#[derive(Debug, Clone)]
pub struct Debouncer {
    state: DebounceState,
    /// Level seen on the previous update (pull-up idles high).
    last_high: bool,
    settle_ms: u32,
    cooldown_ms: u32,
}

impl Debouncer {
    pub fn new(settle_ms: u32, cooldown_ms: u32) -> Self {
        Self {
            state: DebounceState::Idle,
            last_high: true,
            settle_ms,
            cooldown_ms,
        }
    }

    /// Feed one sample.  Returns `true` exactly once per confirmed press.
    pub fn update(&mut self, now_ms: u32, pressed_low: bool) -> bool {
        let falling_edge = self.last_high && pressed_low;
        self.last_high = !pressed_low;

        match self.state {
            DebounceState::Idle => {
                if falling_edge {
                    self.state = DebounceState::Candidate { since_ms: now_ms };
                }
                false
            }

            DebounceState::Candidate { since_ms } => {
                if now_ms.wrapping_sub(since_ms) < self.settle_ms {
                    return false;
                }
                if pressed_low {
                    self.state = DebounceState::Confirmed { at_ms: now_ms };
                    true
                } else {
                    self.state = DebounceState::Idle;
                    false
                }
            }

            DebounceState::Confirmed { at_ms } => {
                if now_ms.wrapping_sub(at_ms) >= self.cooldown_ms {
                    // Cooldown over: this sample counts as an Idle one.
                    self.state = if falling_edge {
                        DebounceState::Candidate { since_ms: now_ms }
                    } else {
                        DebounceState::Idle
                    };
                }
                false
            }
        }
    }
}

impl Default for Debouncer {
    fn default() -> Self {
        Self::new(BUTTON_SETTLE_MS, BUTTON_COOLDOWN_MS)
    }
}
