//! Sharp GP2Y0A21-style IR ground-clearance sensor.
//!
//! Reads the 12-bit analog magnitude through ADC1 and applies the sensor's
//! power-law response curve:
//!
//! ```text
//! clearance = trunc(10650.08 × raw^-0.935 − 10), clamped to [10, 80]
//! ```
//!
//! Samples at or below the minimum signal level carry no usable
//! reflection and read as "far".

use super::GroundClearance;
use crate::config::GROUND_MIN_SIGNAL;
use crate::drivers::hw_init;

const CURVE_GAIN: f64 = 10_650.08;
const CURVE_EXPONENT: f64 = -0.935;
const CURVE_OFFSET: f64 = 10.0;

/// Convert a raw ADC sample to a clamped clearance.
pub fn raw_to_clearance(raw: u16) -> GroundClearance {
    if raw <= GROUND_MIN_SIGNAL {
        return GroundClearance::FAR;
    }
    let estimate = CURVE_GAIN * f64::from(raw).powf(CURVE_EXPONENT) - CURVE_OFFSET;
    // Truncate toward zero, then clamp into the sensor band.
    let cm = estimate.clamp(0.0, f64::from(u16::MAX)) as u16;
    GroundClearance::new(cm)
}

pub struct GroundSensor {
    adc_channel: u32,
}

impl GroundSensor {
    pub fn new(adc_channel: u32) -> Self {
        Self { adc_channel }
    }

    pub fn measure(&mut self) -> GroundClearance {
        raw_to_clearance(hw_init::adc1_read(self.adc_channel))
    }
}
