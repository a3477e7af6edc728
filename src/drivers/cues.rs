//! Fixed actuator cue sequences for power and mode changes.
//!
//! Cues are short, fully bounded and blocking: each step sets the outputs
//! and then holds for `hold_ms` on the supplied delay.  They only run
//! on state transitions, never inside the alert loop.

use embedded_hal::delay::DelayNs;

use crate::alert::directive::{COLOUR_BLUE, COLOUR_GREEN, COLOUR_OFF, COLOUR_RED, Rgb};
use crate::app::ports::ActuatorPort;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CueStep {
    /// New indicator colour, or keep the current one.
    pub colour: Option<Rgb>,
    /// Tone for the duration of this step; `None` is silence.
    pub tone_hz: Option<u16>,
    pub hold_ms: u16,
}

const fn light(colour: Rgb, hold_ms: u16) -> CueStep {
    CueStep {
        colour: Some(colour),
        tone_hz: None,
        hold_ms,
    }
}

const fn beep(hz: u16, hold_ms: u16) -> CueStep {
    CueStep {
        colour: None,
        tone_hz: Some(hz),
        hold_ms,
    }
}

const fn rest(hold_ms: u16) -> CueStep {
    CueStep {
        colour: None,
        tone_hz: None,
        hold_ms,
    }
}

/// Three green blinks, then a rising 1500 → 2000 Hz chirp.
pub const POWER_ON: &[CueStep] = &[
    light(COLOUR_GREEN, 200),
    light(COLOUR_OFF, 200),
    light(COLOUR_GREEN, 200),
    light(COLOUR_OFF, 200),
    light(COLOUR_GREEN, 200),
    light(COLOUR_OFF, 200),
    beep(1500, 200),
    rest(100),
    beep(2000, 200),
    rest(300),
];

/// Red, blue, dark, then a low 1000 Hz tone.
pub const POWER_OFF: &[CueStep] = &[
    light(COLOUR_RED, 200),
    light(COLOUR_BLUE, 200),
    CueStep {
        colour: Some(COLOUR_OFF),
        tone_hz: Some(1000),
        hold_ms: 300,
    },
    rest(200),
];

/// Dual-tone acknowledgement: 1000 Hz, then 1500 Hz 150 ms after it started.
pub const MODE_CHANGE: &[CueStep] = &[beep(1000, 100), rest(50), beep(1500, 100)];

/// Play `steps` to completion.  The motor stays off throughout and the
/// buzzer is silent afterwards; the indicator keeps the last colour set.
pub fn play(steps: &[CueStep], out: &mut impl ActuatorPort, delay: &mut impl DelayNs) {
    out.set_vibration(false);
    for step in steps {
        if let Some(colour) = step.colour {
            out.set_colour(colour);
        }
        out.set_tone(step.tone_hz);
        delay.delay_ms(u32::from(step.hold_ms));
    }
    out.set_tone(None);
}

/// Wall-clock length of a cue.
pub fn duration_ms(steps: &[CueStep]) -> u32 {
    steps.iter().map(|s| u32::from(s.hold_ms)).sum()
}
