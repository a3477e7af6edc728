//! Actuator drivers, input debouncing, hardware initialisation and the
//! timing helpers that sit directly on top of them.

pub mod button;
pub mod buzzer;
pub mod cues;
pub mod hw_init;
pub mod pulse_train;
pub mod status_led;
pub mod vibration;
