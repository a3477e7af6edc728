//! Non-blocking pulse sequencer for the buzzer and vibration motor.
//!
//! Plays the bounded [`PulsePattern`] of the live directive against
//! wall-clock time.  The scheduler calls [`PulseTrain::output`] between
//! sensor reads and during the tick yield, so cadence keeps running while
//! the loop is blocked on ranging.
//!
//! ```text
//!   load(d, t0)          output(t)
//!   ──────────▶ [ on │ off │ on │ off ] ──▶ quiet until the next load
//!               t0                    t0 + pattern_ms
//! ```
//!
//! A directive whose pattern matches the one already loaded does not
//! restart it mid-flight; once finished it restarts on the next load, so
//! a persistent hazard repeats its cadence every tick.

use crate::alert::directive::{ActuatorDirective, PulsePattern};

/// What the buzzer and vibration motor should be doing right now.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PulseOutput {
    pub tone_hz: Option<u16>,
    pub vibrate: bool,
}

impl PulseOutput {
    pub const QUIET: Self = Self {
        tone_hz: None,
        vibrate: false,
    };
}

#[derive(Debug, Clone)]
pub struct PulseTrain {
    pattern: PulsePattern,
    started_ms: u32,
    /// Output for directives without a pattern.
    steady: PulseOutput,
}

impl PulseTrain {
    pub fn new() -> Self {
        Self {
            pattern: PulsePattern::new(),
            started_ms: 0,
            steady: PulseOutput::QUIET,
        }
    }

    pub fn load(&mut self, directive: &ActuatorDirective, now_ms: u32) {
        if directive.pattern.is_empty() {
            self.pattern.clear();
            self.steady = PulseOutput {
                tone_hz: directive.tone.frequency(),
                vibrate: directive.vibration,
            };
            return;
        }

        self.steady = PulseOutput::QUIET;
        if directive.pattern != self.pattern || self.is_finished(now_ms) {
            self.pattern.clone_from(&directive.pattern);
            self.started_ms = now_ms;
        }
    }

    pub fn output(&self, now_ms: u32) -> PulseOutput {
        if self.pattern.is_empty() {
            return self.steady;
        }

        let mut elapsed = now_ms.wrapping_sub(self.started_ms);
        for pulse in &self.pattern {
            let on = u32::from(pulse.on_ms);
            if elapsed < on {
                return PulseOutput {
                    tone_hz: pulse.tone_hz,
                    vibrate: pulse.vibrate,
                };
            }
            elapsed -= on;
            let off = u32::from(pulse.off_ms);
            if elapsed < off {
                return PulseOutput::QUIET;
            }
            elapsed -= off;
        }
        PulseOutput::QUIET
    }

    pub fn is_finished(&self, now_ms: u32) -> bool {
        let total: u32 = self.pattern.iter().map(|p| p.period_ms()).sum();
        !self.pattern.is_empty() && now_ms.wrapping_sub(self.started_ms) >= total
    }

    /// Drop any pattern and go quiet.
    pub fn clear(&mut self) {
        self.pattern.clear();
        self.steady = PulseOutput::QUIET;
        self.started_ms = 0;
    }
}

impl Default for PulseTrain {
    fn default() -> Self {
        Self::new()
    }
}
