//! Alert arbitration: four readings plus the operating mode in, exactly one
//! [`ActuatorDirective`] out.
//!
//! Arbitration is a pure function re-evaluated from scratch every tick.
//! It runs in two stages so each can be tested on its own:
//!
//! ```text
//!  SensorReadings ──assess──▶ Hazards ──resolve(mode)──▶ ActuatorDirective
//! ```
//!
//! Priority (mode-invariant):
//!
//! | # | Condition              | Colour      | Output                         |
//! |---|------------------------|-------------|--------------------------------|
//! | 1 | front ≤ danger         | red         | continuous tone + vibration    |
//! | 2 | front ≤ warn           | amber       | 1500 Hz pulse(s) + vibration   |
//! | 3 | left / right ≤ warn    | cyan / pink | side pulses (mode dependent)   |
//! | 4 | ground drop-off        | gray        | silent, still                  |
//! | 5 | otherwise              | green       | silent, still                  |
//!
//! Mode only changes the cadence of rows 2 and 3.  `NoEcho` is never a
//! hazard, so a dead ranger resolves toward less alerting.

pub mod directive;

use crate::config::{
    LEFT_BUZZ_OFF_MS, LEFT_BUZZ_ON_MS, LEFT_PULSE_MS, LEFT_TONE_HZ, RIGHT_BUZZ_OFF_MS,
    RIGHT_BUZZ_ON_MS, RIGHT_PULSE_OFF_MS, RIGHT_PULSE_ON_MS, RIGHT_TONE_HZ, SystemConfig,
    WARN_BURST_OFF_MS, WARN_BURST_ON_MS, WARN_PULSE_MS, WARN_TONE_HZ,
};
use crate::fsm::OperatingMode;
use crate::sensors::{GroundZone, SensorReadings};

use directive::{
    ActuatorDirective, AlertLevel, COLOUR_AMBER, COLOUR_CYAN, COLOUR_PINK, ColourLabel, Pulse,
    PulsePattern, ToneSpec,
};

// ---------------------------------------------------------------------------
// Stage 1: hazard assessment
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FrontHazard {
    None,
    Warning,
    Critical,
}

/// Every hazard present in one tick's readings, before prioritisation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Hazards {
    pub front: FrontHazard,
    pub left: bool,
    pub right: bool,
    pub ground: GroundZone,
}

// ---------------------------------------------------------------------------
// Arbiter
// ---------------------------------------------------------------------------

/// Threshold set used for assessment.  Holds no per-tick state.
#[derive(Debug, Clone, Copy)]
pub struct Arbiter {
    danger_cm: u16,
    warn_cm: u16,
    ground_cm: u16,
    hole_cm: u16,
}

impl Arbiter {
    pub fn new(config: &SystemConfig) -> Self {
        Self {
            danger_cm: config.danger_dist_cm,
            warn_cm: config.warn_dist_cm,
            ground_cm: config.ground_threshold_cm,
            hole_cm: config.hole_threshold_cm,
        }
    }

    pub fn assess(&self, readings: &SensorReadings) -> Hazards {
        let front = if readings.front.within(self.danger_cm) {
            FrontHazard::Critical
        } else if readings.front.within(self.warn_cm) {
            FrontHazard::Warning
        } else {
            FrontHazard::None
        };
        Hazards {
            front,
            left: readings.left.within(self.warn_cm),
            right: readings.right.within(self.warn_cm),
            ground: readings.ground.zone(self.ground_cm, self.hole_cm),
        }
    }

    /// Full arbitration: assess then resolve.
    pub fn arbitrate(&self, readings: &SensorReadings, mode: OperatingMode) -> ActuatorDirective {
        resolve(&self.assess(readings), mode)
    }
}

impl Default for Arbiter {
    fn default() -> Self {
        Self::new(&SystemConfig::default())
    }
}

// ---------------------------------------------------------------------------
// Stage 2: resolution
// ---------------------------------------------------------------------------

/// Apply the priority order to a set of hazards.
pub fn resolve(hazards: &Hazards, mode: OperatingMode) -> ActuatorDirective {
    match hazards.front {
        FrontHazard::Critical => return ActuatorDirective::critical(),
        FrontHazard::Warning => return front_warning(mode),
        FrontHazard::None => {}
    }

    if hazards.left || hazards.right {
        return side_alert(hazards.left, hazards.right, mode);
    }

    if hazards.ground == GroundZone::DropOff {
        return ActuatorDirective::ground_hazard();
    }

    ActuatorDirective::all_clear()
}

fn front_warning(mode: OperatingMode) -> ActuatorDirective {
    let mut pattern = PulsePattern::new();
    let tone = match mode {
        OperatingMode::Sensing => {
            push(&mut pattern, Pulse::tone(WARN_TONE_HZ, WARN_PULSE_MS, 0, true));
            ToneSpec::Timed {
                hz: WARN_TONE_HZ,
                duration_ms: WARN_PULSE_MS,
            }
        }
        OperatingMode::Alerting => {
            for _ in 0..2 {
                push(
                    &mut pattern,
                    Pulse::tone(WARN_TONE_HZ, WARN_BURST_ON_MS, WARN_BURST_OFF_MS, true),
                );
            }
            ToneSpec::Timed {
                hz: WARN_TONE_HZ,
                duration_ms: WARN_BURST_ON_MS,
            }
        }
    };
    ActuatorDirective {
        colour: COLOUR_AMBER,
        tone,
        vibration: true,
        pattern,
        level: AlertLevel::Warning,
        label: ColourLabel::Orange,
    }
}

/// Left plays before right; when both fire, right wins the shared colour
/// and tone fields.
fn side_alert(left: bool, right: bool, mode: OperatingMode) -> ActuatorDirective {
    let mut d = ActuatorDirective {
        level: AlertLevel::Side,
        ..ActuatorDirective::all_clear()
    };

    if left {
        d.colour = COLOUR_CYAN;
        d.label = ColourLabel::Cyan;
        match mode {
            OperatingMode::Sensing => {
                push(&mut d.pattern, Pulse::tone(LEFT_TONE_HZ, LEFT_PULSE_MS, 0, false));
                d.tone = ToneSpec::Timed {
                    hz: LEFT_TONE_HZ,
                    duration_ms: LEFT_PULSE_MS,
                };
            }
            OperatingMode::Alerting => {
                push(&mut d.pattern, Pulse::buzz(LEFT_BUZZ_ON_MS, LEFT_BUZZ_OFF_MS));
                d.vibration = true;
            }
        }
    }

    if right {
        d.colour = COLOUR_PINK;
        d.label = ColourLabel::Pink;
        for _ in 0..2 {
            match mode {
                OperatingMode::Sensing => push(
                    &mut d.pattern,
                    Pulse::tone(RIGHT_TONE_HZ, RIGHT_PULSE_ON_MS, RIGHT_PULSE_OFF_MS, false),
                ),
                OperatingMode::Alerting => {
                    push(&mut d.pattern, Pulse::buzz(RIGHT_BUZZ_ON_MS, RIGHT_BUZZ_OFF_MS));
                }
            }
        }
        match mode {
            OperatingMode::Sensing => {
                d.tone = ToneSpec::Timed {
                    hz: RIGHT_TONE_HZ,
                    duration_ms: RIGHT_PULSE_ON_MS,
                };
            }
            OperatingMode::Alerting => d.vibration = true,
        }
    }

    d
}

/// Patterns are built well under capacity; an overflow would only drop the
/// trailing pulse.
fn push(pattern: &mut PulsePattern, pulse: Pulse) {
    let _ = pattern.push(pulse);
}
