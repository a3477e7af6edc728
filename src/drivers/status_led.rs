//! RGB indicator driver.
//!
//! Three LEDC PWM channels drive a common-anode RGB LED, so every channel
//! is written inverted (`255 - value`).
//!
//! ## Dual-target design
//!
//! On ESP-IDF: drives the LEDC channels via hw_init.
//! On host/test: tracks state in-memory only.

use crate::alert::directive::{COLOUR_OFF, Rgb};
use crate::drivers::hw_init;

pub struct StatusLed {
    current: Rgb,
}

impl StatusLed {
    pub fn new() -> Self {
        Self {
            current: COLOUR_OFF,
        }
    }

    pub fn set_colour(&mut self, colour: Rgb) {
        let (r, g, b) = colour;
        hw_init::ledc_set(hw_init::LEDC_CH_LED_R, anode_duty(r));
        hw_init::ledc_set(hw_init::LEDC_CH_LED_G, anode_duty(g));
        hw_init::ledc_set(hw_init::LEDC_CH_LED_B, anode_duty(b));
        self.current = colour;
    }

    pub fn off(&mut self) {
        self.set_colour(COLOUR_OFF);
    }

    pub fn current_colour(&self) -> Rgb {
        self.current
    }
}

impl Default for StatusLed {
    fn default() -> Self {
        Self::new()
    }
}

fn anode_duty(value: u8) -> u8 {
    255 - value
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn duty_is_inverted() {
        assert_eq!(anode_duty(0), 255);
        assert_eq!(anode_duty(255), 0);
        assert_eq!(anode_duty(100), 155);
    }

    #[test]
    fn tracks_colour() {
        let mut led = StatusLed::new();
        led.set_colour((0, 255, 255));
        assert_eq!(led.current_colour(), (0, 255, 255));
        led.off();
        assert_eq!(led.current_colour(), COLOUR_OFF);
    }
}
