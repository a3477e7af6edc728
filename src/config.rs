//! System configuration parameters
//!
//! Every tunable of the smart cane is a named build-time constant.  The
//! [`SystemConfig`] struct groups them for the services that need them and
//! enforces the ordering invariants between related values.
//!
//! Network endpoints and credentials are taken from build-time environment
//! variables (`SMARTCANE_*`) so secrets never live in the source tree.

use serde::{Deserialize, Serialize};

use crate::app::ports::ConfigError;

// ---------------------------------------------------------------------------
// Obstacle thresholds (centimetres)
// ---------------------------------------------------------------------------

/// Front obstacle at or inside this distance is critical.
pub const DANGER_DIST_CM: u16 = 25;
/// Obstacle at or inside this distance raises a warning (front) or a
/// side-hazard pulse (left/right).
pub const WARN_DIST_CM: u16 = 50;
/// Outer edge of the near band; the warn distance must stay below it.
pub const SAFE_DIST_CM: u16 = 80;

// ---------------------------------------------------------------------------
// Ground sensor
// ---------------------------------------------------------------------------

/// Clearance below this is a drop-off.
pub const GROUND_THRESHOLD_CM: u16 = 20;
/// Clearance above this is an obstruction / hole.
pub const HOLE_THRESHOLD_CM: u16 = 40;
/// Clamp band for the power-law estimate.
pub const GROUND_MIN_CM: u16 = 10;
pub const GROUND_MAX_CM: u16 = 80;
/// Raw 12-bit samples at or below this carry no usable reflection.
pub const GROUND_MIN_SIGNAL: u16 = 100;

// ---------------------------------------------------------------------------
// Ranging
// ---------------------------------------------------------------------------

/// Echo wait bound per channel.
pub const RANGING_TIMEOUT_US: u32 = 30_000;
/// Exclusive upper bound of a valid distance.
pub const RANGING_MAX_CM: u16 = 300;

// ---------------------------------------------------------------------------
// Scheduling (milliseconds)
// ---------------------------------------------------------------------------

/// Yield at the end of every powered tick.
pub const TICK_YIELD_MS: u32 = 50;
/// Yield while powered off (sleep screen refresh rate).
pub const SLEEP_POLL_MS: u32 = 100;
/// Local-network telemetry push interval.
pub const LOCAL_PUSH_INTERVAL_MS: u32 = 5_000;
/// Cloud telemetry upload interval.
pub const CLOUD_UPLOAD_INTERVAL_MS: u32 = 15_000;
/// Diagnostics dump interval.
pub const DIAGNOSTICS_INTERVAL_MS: u32 = 30_000;
/// Bound on a single HTTP exchange.
pub const HTTP_TIMEOUT_MS: u32 = 5_000;

// ---------------------------------------------------------------------------
// Buttons
// ---------------------------------------------------------------------------

/// Settle delay between the falling edge and the confirming re-read.
pub const BUTTON_SETTLE_MS: u32 = 30;
/// Window after a confirmed press during which new edges are ignored.
pub const BUTTON_COOLDOWN_MS: u32 = 300;

// ---------------------------------------------------------------------------
// Screen holds (blocking, bounded)
// ---------------------------------------------------------------------------

pub const WELCOME_SCREEN_MS: u32 = 2_000;
pub const BOOT_SCREEN_MS: u32 = 1_000;
pub const MODE_SCREEN_MS: u32 = 800;

// ---------------------------------------------------------------------------
// Actuator pulse widths
// ---------------------------------------------------------------------------

pub const CRITICAL_TONE_HZ: u16 = 2_000;
pub const WARN_TONE_HZ: u16 = 1_500;
pub const WARN_PULSE_MS: u16 = 200;
pub const WARN_BURST_ON_MS: u16 = 100;
pub const WARN_BURST_OFF_MS: u16 = 50;
pub const LEFT_TONE_HZ: u16 = 1_100;
pub const LEFT_PULSE_MS: u16 = 150;
pub const RIGHT_TONE_HZ: u16 = 1_300;
pub const RIGHT_PULSE_ON_MS: u16 = 60;
pub const RIGHT_PULSE_OFF_MS: u16 = 40;
pub const LEFT_BUZZ_ON_MS: u16 = 100;
pub const LEFT_BUZZ_OFF_MS: u16 = 50;
pub const RIGHT_BUZZ_ON_MS: u16 = 50;
pub const RIGHT_BUZZ_OFF_MS: u16 = 30;

// ---------------------------------------------------------------------------
// Network endpoints (build-time environment)
// ---------------------------------------------------------------------------

pub const WIFI_SSID: &str = match option_env!("SMARTCANE_WIFI_SSID") {
    Some(v) => v,
    None => "smartcane",
};
pub const WIFI_PASSWORD: &str = match option_env!("SMARTCANE_WIFI_PASSWORD") {
    Some(v) => v,
    None => "",
};
/// Number of association polls during boot, 500 ms apart.
pub const WIFI_CONNECT_ATTEMPTS: u32 = 30;
pub const SERVER_URL: &str = match option_env!("SMARTCANE_SERVER_URL") {
    Some(v) => v,
    None => "http://192.168.4.2:5000/api/data/receive",
};
pub const CLOUD_BASE_URL: &str = "http://api.thingspeak.com";
pub const CLOUD_API_KEY: &str = match option_env!("SMARTCANE_CLOUD_API_KEY") {
    Some(v) => v,
    None => "",
};
pub const CLOUD_CHANNEL_ID: u32 = match option_env!("SMARTCANE_CLOUD_CHANNEL") {
    Some(v) => parse_u32(v),
    None => 0,
};

/// Const-context decimal parser for channel ids; stops at the first
/// non-digit.
const fn parse_u32(s: &str) -> u32 {
    let bytes = s.as_bytes();
    let mut acc: u32 = 0;
    let mut i = 0;
    while i < bytes.len() {
        let b = bytes[i];
        if !b.is_ascii_digit() {
            break;
        }
        acc = acc.saturating_mul(10).saturating_add((b - b'0') as u32);
        i += 1;
    }
    acc
}

// ---------------------------------------------------------------------------
// Grouped configuration
// ---------------------------------------------------------------------------

/// Core system configuration, defaulted from the constants above.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SystemConfig {
    // --- Obstacles ---
    pub danger_dist_cm: u16,
    pub warn_dist_cm: u16,
    pub safe_dist_cm: u16,

    // --- Ground ---
    pub ground_threshold_cm: u16,
    pub hole_threshold_cm: u16,

    // --- Timing ---
    pub tick_yield_ms: u32,
    pub sleep_poll_ms: u32,
    pub local_push_interval_ms: u32,
    pub cloud_upload_interval_ms: u32,
    pub diagnostics_interval_ms: u32,
    pub ranging_timeout_us: u32,

    // --- Buttons ---
    pub button_settle_ms: u32,
    pub button_cooldown_ms: u32,

    // --- Screens ---
    pub boot_screen_ms: u32,
    pub mode_screen_ms: u32,

    // --- Cloud channel ---
    pub cloud_channel_id: u32,
}

impl Default for SystemConfig {
    fn default() -> Self {
        Self {
            danger_dist_cm: DANGER_DIST_CM,
            warn_dist_cm: WARN_DIST_CM,
            safe_dist_cm: SAFE_DIST_CM,

            ground_threshold_cm: GROUND_THRESHOLD_CM,
            hole_threshold_cm: HOLE_THRESHOLD_CM,

            tick_yield_ms: TICK_YIELD_MS,
            sleep_poll_ms: SLEEP_POLL_MS,
            local_push_interval_ms: LOCAL_PUSH_INTERVAL_MS,
            cloud_upload_interval_ms: CLOUD_UPLOAD_INTERVAL_MS,
            diagnostics_interval_ms: DIAGNOSTICS_INTERVAL_MS,
            ranging_timeout_us: RANGING_TIMEOUT_US,

            button_settle_ms: BUTTON_SETTLE_MS,
            button_cooldown_ms: BUTTON_COOLDOWN_MS,

            boot_screen_ms: BOOT_SCREEN_MS,
            mode_screen_ms: MODE_SCREEN_MS,

            cloud_channel_id: CLOUD_CHANNEL_ID,
        }
    }
}

impl SystemConfig {
    /// Check the ordering invariants between related values.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.danger_dist_cm == 0 {
            return Err(ConfigError::ValidationFailed("danger distance must be non-zero"));
        }
        if self.danger_dist_cm >= self.warn_dist_cm {
            return Err(ConfigError::ValidationFailed("danger distance must be below warn distance"));
        }
        if self.warn_dist_cm >= self.safe_dist_cm {
            return Err(ConfigError::ValidationFailed("warn distance must be below safe distance"));
        }
        if self.safe_dist_cm >= RANGING_MAX_CM {
            return Err(ConfigError::ValidationFailed("safe distance must be inside the ranging band"));
        }
        if self.ground_threshold_cm >= self.hole_threshold_cm {
            return Err(ConfigError::ValidationFailed("ground threshold must be below hole threshold"));
        }
        if self.ground_threshold_cm <= GROUND_MIN_CM || self.hole_threshold_cm >= GROUND_MAX_CM {
            return Err(ConfigError::ValidationFailed("ground thresholds must lie inside the clamp band"));
        }
        if self.local_push_interval_ms == 0 || self.cloud_upload_interval_ms == 0 {
            return Err(ConfigError::ValidationFailed("upload intervals must be non-zero"));
        }
        if self.local_push_interval_ms >= self.cloud_upload_interval_ms {
            return Err(ConfigError::ValidationFailed("local push must be faster than cloud upload"));
        }
        if self.ranging_timeout_us == 0 {
            return Err(ConfigError::ValidationFailed("ranging timeout must be non-zero"));
        }
        Ok(())
    }
}
