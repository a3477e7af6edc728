//! GPIO / peripheral pin assignments for the smart-cane board (ESP32 DevKit).
//!
//! Single source of truth: every driver references this module rather than
//! hard-coding pin numbers.

// ---------------------------------------------------------------------------
// Ultrasonic rangers (HC-SR04, one trigger + one echo each)
// ---------------------------------------------------------------------------

pub const TRIG_FRONT_GPIO: i32 = 13;
pub const ECHO_FRONT_GPIO: i32 = 12;
pub const TRIG_LEFT_GPIO: i32 = 14;
pub const ECHO_LEFT_GPIO: i32 = 27;
pub const TRIG_RIGHT_GPIO: i32 = 26;
pub const ECHO_RIGHT_GPIO: i32 = 25;

// ---------------------------------------------------------------------------
// Ground sensor (Sharp IR, analog)
// ---------------------------------------------------------------------------

/// GPIO 34 is ADC1 channel 6 on the classic ESP32.
pub const IR_ADC_GPIO: i32 = 34;
pub const ADC1_CH_IR: u32 = 6;

// ---------------------------------------------------------------------------
// Actuators
// ---------------------------------------------------------------------------

/// Piezo buzzer, driven by an LEDC tone channel.
pub const BUZZER_GPIO: i32 = 33;
/// Vibration motor driver transistor (active HIGH).
pub const VIBRATION_GPIO: i32 = 4;

/// Common-anode RGB indicator: a channel is lit when its pin is LOW.
pub const LED_R_GPIO: i32 = 16;
pub const LED_G_GPIO: i32 = 17;
pub const LED_B_GPIO: i32 = 5;

// ---------------------------------------------------------------------------
// Buttons (active-low, internal pull-ups)
// ---------------------------------------------------------------------------

pub const POWER_BUTTON_GPIO: i32 = 15;
pub const MODE_BUTTON_GPIO: i32 = 32;

// ---------------------------------------------------------------------------
// PWM configuration
// ---------------------------------------------------------------------------

/// LEDC timer resolution (bits).  8-bit gives 0 – 255 duty levels.
pub const PWM_RESOLUTION_BITS: u32 = 8;
/// LEDC frequency for the RGB indicator.
pub const LED_PWM_FREQ_HZ: u32 = 5_000;
/// Initial frequency of the buzzer timer; retuned per tone.
pub const BUZZER_BASE_FREQ_HZ: u32 = 2_000;
