//! HC-SR04 ultrasonic ranger driver.
//!
//! Emits a 10 µs trigger pulse (after a 2 µs low settle), measures the echo
//! pulse width bounded by the ranging timeout and converts the round trip
//! to centimetres.  No retries: a missing or implausible echo becomes
//! [`DistanceReading::NoEcho`].
//!
//! ## Dual-target design
//!
//! On ESP-IDF: drives the trigger pin and times the echo via hw_init.
//! On host/test: echo widths are injected per direction with
//! [`sim_set_echo_us`].

#[cfg(not(target_os = "espidf"))]
use core::sync::atomic::{AtomicU32, Ordering};

use log::debug;

use super::{Direction, DistanceReading};
use crate::config::RANGING_MAX_CM;
use crate::drivers::hw_init;
use crate::error::SensorError;

/// Sentinel stored in the simulation slots for "no echo".
#[cfg(not(target_os = "espidf"))]
const SIM_NO_ECHO: u32 = u32::MAX;

#[cfg(not(target_os = "espidf"))]
static SIM_ECHO_US: [AtomicU32; 3] = [
    AtomicU32::new(SIM_NO_ECHO),
    AtomicU32::new(SIM_NO_ECHO),
    AtomicU32::new(SIM_NO_ECHO),
];

#[cfg(not(target_os = "espidf"))]
pub fn sim_set_echo_us(dir: Direction, echo_us: Option<u32>) {
    SIM_ECHO_US[dir as usize].store(echo_us.unwrap_or(SIM_NO_ECHO), Ordering::Relaxed);
}

/// Convert an echo round-trip time to a distance.
///
/// `cm = trunc(us × 0.034 / 2)`, computed in integers as `us × 17 / 1000`.
/// Valid only strictly inside `(0, RANGING_MAX_CM)`.
pub fn echo_to_cm(echo_us: Option<u32>) -> Result<u16, SensorError> {
    let us = echo_us.ok_or(SensorError::EchoTimeout)?;
    let cm = u64::from(us) * 17 / 1000;
    if cm == 0 || cm >= u64::from(RANGING_MAX_CM) {
        return Err(SensorError::OutOfRange);
    }
    Ok(cm as u16)
}

pub struct Ranger {
    dir: Direction,
    trig_gpio: i32,
    echo_gpio: i32,
    timeout_us: u32,
}

impl Ranger {
    pub fn new(dir: Direction, trig_gpio: i32, echo_gpio: i32, timeout_us: u32) -> Self {
        Self {
            dir,
            trig_gpio,
            echo_gpio,
            timeout_us,
        }
    }

    /// Trigger, wait for the echo and classify.  Blocks for at most the
    /// ranging timeout.
    pub fn measure(&mut self) -> DistanceReading {
        self.trigger();
        match echo_to_cm(self.read_echo_us()) {
            Ok(cm) => DistanceReading::Cm(cm),
            Err(e) => {
                debug!("ranger[{}]: {} -> NoEcho", self.dir.name(), e);
                DistanceReading::NoEcho
            }
        }
    }

    fn trigger(&mut self) {
        hw_init::gpio_write(self.trig_gpio, false);
        hw_init::delay_us(2);
        hw_init::gpio_write(self.trig_gpio, true);
        hw_init::delay_us(10);
        hw_init::gpio_write(self.trig_gpio, false);
    }

    #[cfg(target_os = "espidf")]
    fn read_echo_us(&self) -> Option<u32> {
        hw_init::pulse_in_high(self.echo_gpio, self.timeout_us)
    }

    #[cfg(not(target_os = "espidf"))]
    fn read_echo_us(&self) -> Option<u32> {
        let _ = self.echo_gpio;
        match SIM_ECHO_US[self.dir as usize].load(Ordering::Relaxed) {
            SIM_NO_ECHO => None,
            us if us > self.timeout_us => None,
            us => Some(us),
        }
    }
}
