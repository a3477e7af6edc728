//! Sensor subsystem: the three ultrasonic rangers and the IR ground sensor.
//!
//! Readings are produced fresh every tick and never persisted.  Both
//! drivers recover their own failures, so the control loop only ever sees
//! a [`DistanceReading`] (possibly `NoEcho`) and a clamped
//! [`GroundClearance`].

pub mod ground;
pub mod ranger;

use serde::{Serialize, Serializer};

use crate::config::{GROUND_MAX_CM, GROUND_MIN_CM};

/// Wire encoding of [`DistanceReading::NoEcho`].
pub const NO_ECHO_WIRE: u16 = 999;

// ---------------------------------------------------------------------------
// Ranging
// ---------------------------------------------------------------------------

/// Which of the three rangers a reading came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Direction {
    Front,
    Left,
    Right,
}

impl Direction {
    pub const ALL: [Direction; 3] = [Direction::Front, Direction::Left, Direction::Right];

    pub fn name(self) -> &'static str {
        match self {
            Self::Front => "front",
            Self::Left => "left",
            Self::Right => "right",
        }
    }
}

/// Distance to the nearest object in one direction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum DistanceReading {
    /// Centimetres, strictly inside the valid ranging band.
    Cm(u16),
    /// No object within range (timeout or out-of-band echo).
    #[default]
    NoEcho,
}

impl DistanceReading {
    pub fn cm(self) -> Option<u16> {
        match self {
            Self::Cm(d) => Some(d),
            Self::NoEcho => None,
        }
    }

    /// `true` when an object was seen at or inside `limit_cm`.
    /// `NoEcho` never counts as a hazard.
    pub fn within(self, limit_cm: u16) -> bool {
        matches!(self, Self::Cm(d) if d <= limit_cm)
    }

    /// Integer encoding used by the display and telemetry sinks.
    pub fn as_wire(self) -> u16 {
        self.cm().unwrap_or(NO_ECHO_WIRE)
    }
}

impl Serialize for DistanceReading {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_u16(self.as_wire())
    }
}

// ---------------------------------------------------------------------------
// Ground clearance
// ---------------------------------------------------------------------------

/// Estimated clearance under the cane tip, clamped to the sensor band.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub struct GroundClearance(u16);

impl GroundClearance {
    /// "Far / no ground feature".
    pub const FAR: Self = Self(GROUND_MAX_CM);

    pub fn new(cm: u16) -> Self {
        Self(cm.clamp(GROUND_MIN_CM, GROUND_MAX_CM))
    }

    pub fn cm(self) -> u16 {
        self.0
    }

    /// Partition into drop-off / normal / hole using the given thresholds.
    pub fn zone(self, drop_below_cm: u16, hole_above_cm: u16) -> GroundZone {
        if self.0 < drop_below_cm {
            GroundZone::DropOff
        } else if self.0 > hole_above_cm {
            GroundZone::Hole
        } else {
            GroundZone::Normal
        }
    }
}

impl Default for GroundClearance {
    fn default() -> Self {
        Self::FAR
    }
}

impl Serialize for GroundClearance {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_u16(self.0)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GroundZone {
    DropOff,
    Normal,
    Hole,
}

// ---------------------------------------------------------------------------
// Per-tick bundle
// ---------------------------------------------------------------------------

/// The four readings sampled in one tick.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct SensorReadings {
    pub front: DistanceReading,
    pub left: DistanceReading,
    pub right: DistanceReading,
    pub ground: GroundClearance,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn no_echo_is_never_within() {
        assert!(!DistanceReading::NoEcho.within(u16::MAX));
        assert!(DistanceReading::Cm(25).within(25));
        assert!(!DistanceReading::Cm(26).within(25));
    }

    #[test]
    fn wire_encoding() {
        assert_eq!(DistanceReading::NoEcho.as_wire(), 999);
        assert_eq!(DistanceReading::Cm(42).as_wire(), 42);
    }

    #[test]
    fn clearance_is_clamped() {
        assert_eq!(GroundClearance::new(3).cm(), 10);
        assert_eq!(GroundClearance::new(200).cm(), 80);
        assert_eq!(GroundClearance::new(33).cm(), 33);
    }

    #[test]
    fn zones_partition_the_band() {
        assert_eq!(GroundClearance::new(19).zone(20, 40), GroundZone::DropOff);
        assert_eq!(GroundClearance::new(20).zone(20, 40), GroundZone::Normal);
        assert_eq!(GroundClearance::new(40).zone(20, 40), GroundZone::Normal);
        assert_eq!(GroundClearance::new(41).zone(20, 40), GroundZone::Hole);
    }

    #[test]
    fn readings_serialise_as_integers() {
        let r = SensorReadings {
            front: DistanceReading::Cm(30),
            ..SensorReadings::default()
        };
        let json = serde_json::to_string(&(r.front, r.left, r.ground)).unwrap();
        assert_eq!(json, "[30,999,80]");
    }
}
