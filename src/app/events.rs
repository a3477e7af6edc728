//! Outbound application events.
//!
//! The [`AppService`](super::service::AppService) and the
//! [`Scheduler`](crate::scheduler::Scheduler) emit these through the
//! [`EventSink`](super::ports::EventSink) port.  Adapters on the other
//! side decide what to do with them (serial log today).

use crate::alert::directive::{AlertLevel, ColourLabel};
use crate::error::CommsError;
use crate::fsm::{OperatingMode, PowerState, StateId};
use crate::sensors::SensorReadings;

use super::ports::{LinkStatus, UplinkTarget};

/// Structured events emitted by the application core.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AppEvent {
    /// The application service has started (carries initial state).
    Started(StateId),

    /// The FSM transitioned between states.
    StateChanged { from: StateId, to: StateId },

    /// The arbitrated alert level or colour changed.
    Alert {
        level: AlertLevel,
        label: ColourLabel,
        readings: SensorReadings,
    },

    /// A periodic upload ran.
    Upload {
        target: UplinkTarget,
        outcome: Result<(), CommsError>,
    },

    /// Periodic health dump.
    Diagnostics(DiagnosticsReport),
}

/// Point-in-time health summary.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DiagnosticsReport {
    pub uptime_s: u32,
    pub ticks: u32,
    pub power: PowerState,
    pub mode: OperatingMode,
    pub readings: SensorReadings,
    pub link: LinkStatus,
    pub next_local_push_s: u32,
    pub power_cycles: u32,
}
