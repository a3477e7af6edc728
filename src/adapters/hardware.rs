//! Hardware adapter — bridges real peripherals to domain port traits.
//!
//! Owns the three rangers, the ground sensor and all actuator drivers,
//! exposing them through [`InputPort`], [`SensorPort`] and
//! [`ActuatorPort`].  This is the only module in the system that touches
//! actual hardware.  On non-espidf targets, the underlying drivers use
//! cfg-gated simulation stubs.

use crate::alert::directive::Rgb;
use crate::app::ports::{ActuatorPort, InputPort, SensorPort};
use crate::config::SystemConfig;
use crate::drivers::buzzer::Buzzer;
use crate::drivers::hw_init;
use crate::drivers::status_led::StatusLed;
use crate::drivers::vibration::VibrationMotor;
use crate::pins;
use crate::sensors::ground::GroundSensor;
use crate::sensors::ranger::Ranger;
use crate::sensors::{Direction, DistanceReading, GroundClearance};

/// Concrete adapter that combines all hardware behind port traits.
pub struct HardwareAdapter {
    front: Ranger,
    left: Ranger,
    right: Ranger,
    ground: GroundSensor,
    led: StatusLed,
    buzzer: Buzzer,
    motor: VibrationMotor,
}

impl HardwareAdapter {
    pub fn new(config: &SystemConfig) -> Self {
        let timeout = config.ranging_timeout_us;
        Self {
            front: Ranger::new(Direction::Front, pins::TRIG_FRONT_GPIO, pins::ECHO_FRONT_GPIO, timeout),
            left: Ranger::new(Direction::Left, pins::TRIG_LEFT_GPIO, pins::ECHO_LEFT_GPIO, timeout),
            right: Ranger::new(Direction::Right, pins::TRIG_RIGHT_GPIO, pins::ECHO_RIGHT_GPIO, timeout),
            ground: GroundSensor::new(pins::ADC1_CH_IR),
            led: StatusLed::new(),
            buzzer: Buzzer::new(),
            motor: VibrationMotor::new(),
        }
    }

    pub fn colour(&self) -> Rgb {
        self.led.current_colour()
    }

    pub fn tone(&self) -> Option<u16> {
        self.buzzer.tone()
    }

    pub fn is_vibrating(&self) -> bool {
        self.motor.is_running()
    }
}

// ── InputPort implementation ──────────────────────────────────

impl InputPort for HardwareAdapter {
    fn power_level_low(&mut self) -> bool {
        !hw_init::gpio_read(pins::POWER_BUTTON_GPIO)
    }

    fn mode_level_low(&mut self) -> bool {
        !hw_init::gpio_read(pins::MODE_BUTTON_GPIO)
    }
}

// ── SensorPort implementation ─────────────────────────────────

impl SensorPort for HardwareAdapter {
    fn measure_range(&mut self, direction: Direction) -> DistanceReading {
        match direction {
            Direction::Front => self.front.measure(),
            Direction::Left => self.left.measure(),
            Direction::Right => self.right.measure(),
        }
    }

    fn measure_ground(&mut self) -> GroundClearance {
        self.ground.measure()
    }
}

// ── ActuatorPort implementation ───────────────────────────────

impl ActuatorPort for HardwareAdapter {
    fn set_colour(&mut self, colour: Rgb) {
        self.led.set_colour(colour);
    }

    fn set_tone(&mut self, hz: Option<u16>) {
        self.buzzer.set_tone(hz);
    }

    fn set_vibration(&mut self, on: bool) {
        self.motor.set(on);
    }

    fn all_off(&mut self) {
        self.buzzer.silence();
        self.motor.set(false);
        self.led.off();
    }
}
