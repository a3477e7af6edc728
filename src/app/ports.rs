//! Port traits — the hexagonal boundary between domain logic and the outside world.
//!
//! ```text
//!   Adapter ──▶ Port trait ──▶ AppService / Scheduler (domain)
//! ```
//!
//! Driven adapters (buttons, rangers, actuators, display, network) implement
//! these traits.  The [`AppService`](super::service::AppService) and the
//! [`Scheduler`](crate::scheduler::Scheduler) consume them via generics, so
//! the domain core never touches hardware directly.
//!
//! Every port is a thin I/O wrapper: no decision logic lives behind it.

use core::fmt;

use crate::alert::directive::Rgb;
use crate::error::CommsError;
use crate::fsm::OperatingMode;
use crate::sensors::{Direction, DistanceReading, GroundClearance};

use super::snapshot::{CloudFields, LocalTelemetryRecord, SystemSnapshot};

// ───────────────────────────────────────────────────────────────
// Input port (driven adapter: buttons → domain)
// ───────────────────────────────────────────────────────────────

/// Raw button levels.  Both buttons are active-low; debouncing happens in
/// the domain.
pub trait InputPort {
    /// `true` while the power button pulls its line low.
    fn power_level_low(&mut self) -> bool;

    /// `true` while the mode button pulls its line low.
    fn mode_level_low(&mut self) -> bool;
}

// ───────────────────────────────────────────────────────────────
// Sensor port (driven adapter: hardware → domain)
// ───────────────────────────────────────────────────────────────

/// Read-side port: one blocking, bounded measurement per call.
pub trait SensorPort {
    /// Trigger one ranger and wait (bounded) for its echo.
    fn measure_range(&mut self, direction: Direction) -> DistanceReading;

    /// Sample the IR ground sensor.
    fn measure_ground(&mut self) -> GroundClearance;
}

// ───────────────────────────────────────────────────────────────
// Actuator port (driven adapter: domain → hardware)
// ───────────────────────────────────────────────────────────────

/// Write-side port: the domain calls this to command actuators.
pub trait ActuatorPort {
    /// Set the RGB indicator colour.
    fn set_colour(&mut self, colour: Rgb);

    /// Start a tone at `hz`, or silence the buzzer with `None`.
    fn set_tone(&mut self, hz: Option<u16>);

    /// Run or stop the vibration motor.
    fn set_vibration(&mut self, on: bool);

    /// Indicator dark, buzzer silent, motor stopped.
    fn all_off(&mut self);
}

// ───────────────────────────────────────────────────────────────
// Display port
// ───────────────────────────────────────────────────────────────

/// Status display.  Screens are drawn immediately; hold times are the
/// caller's business.
pub trait DisplayPort {
    fn show_welcome(&mut self);
    fn show_sleep(&mut self);
    fn show_boot(&mut self);
    fn show_mode(&mut self, mode: OperatingMode);

    /// Draw the live status screen from this tick's snapshot.
    fn render(&mut self, snapshot: &SystemSnapshot);
}

// ───────────────────────────────────────────────────────────────
// Telemetry ports (fire-and-forget)
// ───────────────────────────────────────────────────────────────

/// Push to the local dashboard server.
pub trait LocalTelemetryPort {
    fn push(&mut self, record: &LocalTelemetryRecord) -> Result<(), CommsError>;
}

/// Upload to the cloud channel.
pub trait CloudTelemetryPort {
    fn upload_fields(&mut self, fields: &CloudFields) -> Result<(), CommsError>;
}

// ───────────────────────────────────────────────────────────────
// Connectivity port
// ───────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConnectivityError {
    NoCredentials,
    InvalidSsid,
    InvalidPassword,
    ConnectionFailed,
    AlreadyConnected,
}

impl fmt::Display for ConnectivityError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::NoCredentials => write!(f, "no WiFi credentials configured"),
            Self::InvalidSsid => write!(f, "SSID invalid (must be 1-32 printable ASCII bytes)"),
            Self::InvalidPassword => {
                write!(f, "password invalid (must be 8-64 bytes for WPA2, or empty for open)")
            }
            Self::ConnectionFailed => write!(f, "WiFi connection failed"),
            Self::AlreadyConnected => write!(f, "already connected to AP"),
        }
    }
}

impl std::error::Error for ConnectivityError {}

pub trait ConnectivityPort {
    fn connect(&mut self) -> Result<(), ConnectivityError>;
    fn disconnect(&mut self);
    fn is_connected(&self) -> bool;
    /// Non-blocking housekeeping: loss detection and backoff reconnects.
    fn poll(&mut self, now_ms: u32);
    fn set_credentials(&mut self, ssid: &str, password: &str) -> Result<(), ConnectivityError>;
    fn rssi(&self) -> Option<i8>;
}

/// Connectivity as seen by one tick.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct LinkStatus {
    pub connected: bool,
    pub rssi: Option<i8>,
}

impl LinkStatus {
    pub fn of(port: &impl ConnectivityPort) -> Self {
        let connected = port.is_connected();
        Self {
            connected,
            rssi: if connected { port.rssi() } else { None },
        }
    }
}

// ───────────────────────────────────────────────────────────────
// Time port
// ───────────────────────────────────────────────────────────────

/// Monotonic millisecond clock.  Wraps after ~49 days; consumers use
/// wrapping arithmetic.
pub trait TimePort {
    fn now_ms(&self) -> u32;
}

// ───────────────────────────────────────────────────────────────
// Event sink port (driven adapter: domain → logging)
// ───────────────────────────────────────────────────────────────

/// The domain emits structured [`AppEvent`](super::events::AppEvent)s
/// through this port.  Adapters decide where they go.
pub trait EventSink {
    fn emit(&mut self, event: &super::events::AppEvent);
}

// ───────────────────────────────────────────────────────────────
// Scheduler delegate (decouples scheduler from the uplinks)
// ───────────────────────────────────────────────────────────────

/// Which remote sink a periodic upload targets.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UplinkTarget {
    Local,
    Cloud,
}

impl UplinkTarget {
    pub fn name(self) -> &'static str {
        match self {
            Self::Local => "local",
            Self::Cloud => "cloud",
        }
    }
}

/// Callback the scheduler invokes when an upload timer fires.
///
/// The scheduler knows nothing about record formats or transports; the
/// delegate builds the payload from the snapshot and reports the outcome.
pub trait SchedulerDelegate {
    fn on_upload_due(
        &mut self,
        target: UplinkTarget,
        snapshot: &SystemSnapshot,
        link: LinkStatus,
    ) -> Result<(), CommsError>;
}

// ───────────────────────────────────────────────────────────────
// Error types
// ───────────────────────────────────────────────────────────────

/// Errors from configuration validation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConfigError {
    /// A config field failed range validation.
    /// The `&'static str` describes which field and why.
    ValidationFailed(&'static str),
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::ValidationFailed(msg) => write!(f, "validation failed: {}", msg),
        }
    }
}

impl std::error::Error for ConfigError {}
