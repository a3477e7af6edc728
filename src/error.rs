//! Unified error types for the smart-cane firmware.
//!
//! A single `Error` enum that every subsystem converts into.  Sub-enums are
//! `Copy` so they can ride inside [`AppEvent`](crate::app::events::AppEvent)s
//! and telemetry outcomes without allocation.
//!
//! None of these are fatal to the control loop: sensor errors collapse to
//! `NoEcho` at the driver boundary and comms errors are logged and dropped.

use core::fmt;

use crate::app::ports::ConfigError;

// ---------------------------------------------------------------------------
// Top-level firmware error
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Error {
    /// A ranging or ground read produced no usable value.
    Sensor(SensorError),
    /// A network exchange failed.
    Comms(CommsError),
    /// Peripheral initialisation failed.
    Init(&'static str),
    /// Configuration is invalid.
    Config(&'static str),
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Sensor(e) => write!(f, "sensor: {e}"),
            Self::Comms(e) => write!(f, "comms: {e}"),
            Self::Init(msg) => write!(f, "init: {msg}"),
            Self::Config(msg) => write!(f, "config: {msg}"),
        }
    }
}

impl std::error::Error for Error {}

impl From<ConfigError> for Error {
    fn from(e: ConfigError) -> Self {
        match e {
            ConfigError::ValidationFailed(msg) => Self::Config(msg),
        }
    }
}

// ---------------------------------------------------------------------------
// Sensor errors
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SensorError {
    /// No echo pulse arrived inside the ranging timeout.
    EchoTimeout,
    /// The converted distance fell outside the valid band.
    OutOfRange,
}

impl fmt::Display for SensorError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::EchoTimeout => write!(f, "echo timeout"),
            Self::OutOfRange => write!(f, "reading out of range"),
        }
    }
}

impl From<SensorError> for Error {
    fn from(e: SensorError) -> Self {
        Self::Sensor(e)
    }
}

// ---------------------------------------------------------------------------
// Communications errors
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CommsError {
    /// Station is not associated; the upload was skipped.
    NetworkUnavailable,
    /// The server answered with a non-success status code.
    UploadRejected(u16),
    /// The exchange exceeded its timeout.
    Timeout,
    /// Connection or socket-level failure.
    Transport,
    /// The payload could not be encoded.
    Encode,
}

impl fmt::Display for CommsError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::NetworkUnavailable => write!(f, "network unavailable"),
            Self::UploadRejected(code) => write!(f, "upload rejected (HTTP {code})"),
            Self::Timeout => write!(f, "request timed out"),
            Self::Transport => write!(f, "transport failure"),
            Self::Encode => write!(f, "payload encoding failed"),
        }
    }
}

impl From<CommsError> for Error {
    fn from(e: CommsError) -> Self {
        Self::Comms(e)
    }
}

// ---------------------------------------------------------------------------
// Convenience Result alias
// ---------------------------------------------------------------------------

/// Firmware-wide `Result` alias.
pub type Result<T> = core::result::Result<T, Error>;
