//! Log-based event sink adapter.
//!
//! Implements [`EventSink`] by writing structured application events to
//! the ESP-IDF logger (which goes to UART in production).

use log::{info, warn};

use crate::app::events::AppEvent;
use crate::app::ports::EventSink;

/// Adapter that logs every [`AppEvent`] to the serial console.
pub struct LogEventSink;

impl LogEventSink {
    pub fn new() -> Self {
        Self
    }
}

impl Default for LogEventSink {
    fn default() -> Self {
        Self::new()
    }
}

impl EventSink for LogEventSink {
    fn emit(&mut self, event: &AppEvent) {
        match event {
            AppEvent::Started(state) => {
                info!("START | initial_state={:?}", state);
            }
            AppEvent::StateChanged { from, to } => {
                info!("STATE | {:?} -> {:?}", from, to);
            }
            AppEvent::Alert {
                level,
                label,
                readings,
            } => {
                info!(
                    "ALERT | {:?} {} | F={} L={} R={} G={}",
                    level,
                    label.as_str(),
                    readings.front.as_wire(),
                    readings.left.as_wire(),
                    readings.right.as_wire(),
                    readings.ground.cm(),
                );
            }
            AppEvent::Upload { target, outcome } => match outcome {
                Ok(()) => info!("UPLOAD | {} ok", target.name()),
                Err(e) => warn!("UPLOAD | {} failed: {}", target.name(), e),
            },
            AppEvent::Diagnostics(d) => {
                info!(
                    "DIAG | up={}s ticks={} | power={:?} mode={} | \
                     wifi={} rssi={:?} | F={} L={} R={} G={} | next_push={}s | cycles={}",
                    d.uptime_s,
                    d.ticks,
                    d.power,
                    d.mode.short_name(),
                    if d.link.connected { "up" } else { "down" },
                    d.link.rssi,
                    d.readings.front.as_wire(),
                    d.readings.left.as_wire(),
                    d.readings.right.as_wire(),
                    d.readings.ground.cm(),
                    d.next_local_push_s,
                    d.power_cycles,
                );
            }
        }
    }
}
