//! Vibration motor on a plain GPIO (high = running).

use crate::drivers::hw_init;
use crate::pins;

pub struct VibrationMotor {
    running: bool,
}

impl VibrationMotor {
    pub fn new() -> Self {
        Self { running: false }
    }

    pub fn set(&mut self, on: bool) {
        hw_init::gpio_write(pins::VIBRATION_GPIO, on);
        self.running = on;
    }

    pub fn is_running(&self) -> bool {
        self.running
    }
}

impl Default for VibrationMotor {
    fn default() -> Self {
        Self::new()
    }
}
