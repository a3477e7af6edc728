//! The actuator directive: one complete description of what the indicator,
//! buzzer and vibration motor should be doing.
//!
//! A directive carries both the steady-state fields (colour, tone,
//! vibration) and the bounded [`PulsePattern`] that expresses cadence.  An
//! empty pattern means "hold the steady fields"; a non-empty one is played
//! by the [`PulseTrain`](crate::drivers::pulse_train::PulseTrain).

use heapless::Vec;

use crate::config::CRITICAL_TONE_HZ;

/// Colour as (R, G, B), each 0–255.
pub type Rgb = (u8, u8, u8);

pub const COLOUR_OFF: Rgb = (0, 0, 0);
pub const COLOUR_RED: Rgb = (255, 0, 0);
pub const COLOUR_AMBER: Rgb = (255, 150, 0);
pub const COLOUR_CYAN: Rgb = (0, 255, 255);
pub const COLOUR_PINK: Rgb = (255, 100, 200);
pub const COLOUR_GRAY: Rgb = (100, 100, 100);
pub const COLOUR_GREEN: Rgb = (0, 255, 0);
pub const COLOUR_BLUE: Rgb = (0, 0, 255);

/// Longest pattern the arbiter builds: left (1) + right (2) pulses.
pub const MAX_PULSES: usize = 4;

pub type PulsePattern = Vec<Pulse, MAX_PULSES>;

/// One on/off step of a cadence.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Pulse {
    pub on_ms: u16,
    pub off_ms: u16,
    /// Tone during the on phase, if any.
    pub tone_hz: Option<u16>,
    /// Vibration during the on phase.
    pub vibrate: bool,
}

impl Pulse {
    pub const fn tone(hz: u16, on_ms: u16, off_ms: u16, vibrate: bool) -> Self {
        Self {
            on_ms,
            off_ms,
            tone_hz: Some(hz),
            vibrate,
        }
    }

    pub const fn buzz(on_ms: u16, off_ms: u16) -> Self {
        Self {
            on_ms,
            off_ms,
            tone_hz: None,
            vibrate: true,
        }
    }

    pub fn period_ms(&self) -> u32 {
        u32::from(self.on_ms) + u32::from(self.off_ms)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ToneSpec {
    Silent,
    /// Held until the directive changes.
    Continuous { hz: u16 },
    /// A bounded pulse (the first one, when the pattern repeats it).
    Timed { hz: u16, duration_ms: u16 },
}

impl ToneSpec {
    pub fn frequency(self) -> Option<u16> {
        match self {
            Self::Silent => None,
            Self::Continuous { hz } | Self::Timed { hz, .. } => Some(hz),
        }
    }
}

/// Severity ordering of what is being signalled.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum AlertLevel {
    /// Powered off, everything dark.
    Off,
    Clear,
    Ground,
    Side,
    Warning,
    Critical,
}

/// Short label of the active colour, shown on the display.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ColourLabel {
    Off,
    Green,
    Gray,
    Cyan,
    Pink,
    Orange,
    Red,
}

impl ColourLabel {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Off => "OFF",
            Self::Green => "GRN",
            Self::Gray => "GRY",
            Self::Cyan => "CYN",
            Self::Pink => "PNK",
            Self::Orange => "ORN",
            Self::Red => "RED",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ActuatorDirective {
    pub colour: Rgb,
    pub tone: ToneSpec,
    pub vibration: bool,
    pub pattern: PulsePattern,
    pub level: AlertLevel,
    pub label: ColourLabel,
}

impl ActuatorDirective {
    /// Everything dark and still.
    pub fn quiescent() -> Self {
        Self::steady(COLOUR_OFF, AlertLevel::Off, ColourLabel::Off)
    }

    /// Solid green, silent.
    pub fn all_clear() -> Self {
        Self::steady(COLOUR_GREEN, AlertLevel::Clear, ColourLabel::Green)
    }

    /// Solid gray, silent: drop-off ahead.
    pub fn ground_hazard() -> Self {
        Self::steady(COLOUR_GRAY, AlertLevel::Ground, ColourLabel::Gray)
    }

    /// Solid red, continuous tone, continuous vibration.
    pub fn critical() -> Self {
        Self {
            colour: COLOUR_RED,
            tone: ToneSpec::Continuous {
                hz: CRITICAL_TONE_HZ,
            },
            vibration: true,
            pattern: PulsePattern::new(),
            level: AlertLevel::Critical,
            label: ColourLabel::Red,
        }
    }

    fn steady(colour: Rgb, level: AlertLevel, label: ColourLabel) -> Self {
        Self {
            colour,
            tone: ToneSpec::Silent,
            vibration: false,
            pattern: PulsePattern::new(),
            level,
            label,
        }
    }

    /// Whether cadence comes from the pattern rather than the steady fields.
    pub fn is_patterned(&self) -> bool {
        !self.pattern.is_empty()
    }

    /// Total duration of one pass through the pattern.
    pub fn pattern_ms(&self) -> u32 {
        self.pattern.iter().map(Pulse::period_ms).sum()
    }
}

impl Default for ActuatorDirective {
    fn default() -> Self {
        Self::quiescent()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn critical_is_steady() {
        let d = ActuatorDirective::critical();
        assert!(!d.is_patterned());
        assert_eq!(d.tone.frequency(), Some(2000));
        assert!(d.vibration);
    }

    #[test]
    fn quiescent_is_dark() {
        let d = ActuatorDirective::default();
        assert_eq!(d.colour, COLOUR_OFF);
        assert_eq!(d.tone, ToneSpec::Silent);
        assert!(!d.vibration);
        assert_eq!(d.level, AlertLevel::Off);
    }

    #[test]
    fn levels_are_ordered() {
        assert!(AlertLevel::Critical > AlertLevel::Warning);
        assert!(AlertLevel::Warning > AlertLevel::Side);
        assert!(AlertLevel::Side > AlertLevel::Ground);
        assert!(AlertLevel::Ground > AlertLevel::Clear);
    }

    #[test]
    fn pattern_duration_sums_periods() {
        let mut d = ActuatorDirective::all_clear();
        d.pattern.push(Pulse::buzz(100, 50)).unwrap();
        d.pattern.push(Pulse::tone(1300, 60, 40, false)).unwrap();
        assert_eq!(d.pattern_ms(), 250);
    }
}
