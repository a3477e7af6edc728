//! The fused per-tick state and the typed telemetry records derived from it.
//!
//! [`SystemSnapshot`] is built by value once per tick and lent to the
//! display and uplinks; nothing holds on to it between ticks.

use serde::Serialize;

use crate::alert::directive::{AlertLevel, ColourLabel};
use crate::fsm::{OperatingMode, PowerState};
use crate::sensors::{DistanceReading, GroundClearance, SensorReadings};

use super::ports::LinkStatus;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SystemSnapshot {
    pub power: PowerState,
    /// Last mode; retained while off so wake-up rendering is stable.
    pub mode: OperatingMode,
    pub readings: SensorReadings,
    pub level: AlertLevel,
    pub label: ColourLabel,
}

impl SystemSnapshot {
    pub fn is_powered(&self) -> bool {
        self.power == PowerState::On
    }
}

impl Default for SystemSnapshot {
    fn default() -> Self {
        Self {
            power: PowerState::Off,
            mode: OperatingMode::Sensing,
            readings: SensorReadings::default(),
            level: AlertLevel::Off,
            label: ColourLabel::Off,
        }
    }
}

// ---------------------------------------------------------------------------
// Local dashboard record
// ---------------------------------------------------------------------------

/// JSON body POSTed to the local server.  Field names match the server's
/// receive endpoint.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct LocalTelemetryRecord {
    pub front_distance: DistanceReading,
    pub left_distance: DistanceReading,
    pub right_distance: DistanceReading,
    pub ir_distance: GroundClearance,
    pub mode: OperatingMode,
    pub power_status: bool,
    pub wifi_connected: bool,
    /// dBm; 0 when not associated.
    pub wifi_strength: i8,
}

impl LocalTelemetryRecord {
    pub fn new(snapshot: &SystemSnapshot, link: LinkStatus) -> Self {
        let r = &snapshot.readings;
        Self {
            front_distance: r.front,
            left_distance: r.left,
            right_distance: r.right,
            ir_distance: r.ground,
            mode: snapshot.mode,
            power_status: snapshot.is_powered(),
            wifi_connected: link.connected,
            wifi_strength: link.rssi.unwrap_or(0),
        }
    }
}

// ---------------------------------------------------------------------------
// Cloud channel fields
// ---------------------------------------------------------------------------

/// `field1..field5` of the cloud channel, already wire-encoded.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CloudFields {
    pub front: u16,
    pub left: u16,
    pub right: u16,
    pub ground: u16,
    pub mode: u8,
}

impl CloudFields {
    pub fn new(snapshot: &SystemSnapshot) -> Self {
        let r = &snapshot.readings;
        Self {
            front: r.front.as_wire(),
            left: r.left.as_wire(),
            right: r.right.as_wire(),
            ground: r.ground.cm(),
            mode: snapshot.mode.code(),
        }
    }

    pub fn as_array(&self) -> [u16; 5] {
        [self.front, self.left, self.right, self.ground, u16::from(self.mode)]
    }
}
