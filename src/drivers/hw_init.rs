//! One-shot hardware peripheral initialization and register helpers.
//!
//! Configures the ranger trigger/echo pins, button inputs, the vibration
//! output, ADC1 for the ground sensor and the LEDC timers that drive the
//! RGB indicator and the buzzer, using raw ESP-IDF sys calls.  Called once
//! from `main()` before the control loop starts.
//!
//! On host builds every helper is a simulation stub; GPIO levels and the
//! ADC sample can be injected through the `sim_*` setters.

#[cfg(target_os = "espidf")]
use esp_idf_svc::sys::*;

#[cfg(target_os = "espidf")]
use log::info;

#[cfg(not(target_os = "espidf"))]
use core::sync::atomic::{AtomicU16, AtomicU64, Ordering};

#[cfg(target_os = "espidf")]
use crate::pins;

// ── Error type ────────────────────────────────────────────────

/// Errors during one-shot peripheral initialization.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HwInitError {
    AdcInitFailed(i32),
    GpioConfigFailed(i32),
    LedcInitFailed(i32),
}

impl core::fmt::Display for HwInitError {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self {
            Self::AdcInitFailed(rc) => write!(f, "ADC1 init failed (rc={})", rc),
            Self::GpioConfigFailed(rc) => write!(f, "GPIO config failed (rc={})", rc),
            Self::LedcInitFailed(rc) => write!(f, "LEDC timer/channel config failed (rc={})", rc),
        }
    }
}

impl std::error::Error for HwInitError {}

#[cfg(target_os = "espidf")]
pub fn init_peripherals() -> Result<(), HwInitError> {
    // SAFETY: Called once from main() before the control loop; single-threaded.
    unsafe {
        init_adc()?;
        init_gpio_inputs()?;
        init_gpio_outputs()?;
        init_ledc()?;
    }
    info!("hw_init: all peripherals configured");
    Ok(())
}

#[cfg(not(target_os = "espidf"))]
pub fn init_peripherals() -> Result<(), HwInitError> {
    log::info!("hw_init(sim): peripheral init skipped");
    Ok(())
}

// ── ADC (oneshot) ─────────────────────────────────────────────

#[cfg(target_os = "espidf")]
static mut ADC1_HANDLE: adc_oneshot_unit_handle_t = core::ptr::null_mut();

#[cfg(target_os = "espidf")]
unsafe fn init_adc() -> Result<(), HwInitError> {
    let init_cfg = adc_oneshot_unit_init_cfg_t {
        unit_id: adc_unit_t_ADC_UNIT_1,
        ulp_mode: adc_ulp_mode_t_ADC_ULP_MODE_DISABLE,
        ..Default::default()
    };
    // SAFETY: ADC1_HANDLE is only written here, once at boot.
    let ret = unsafe { adc_oneshot_new_unit(&init_cfg, &raw mut ADC1_HANDLE) };
    if ret != ESP_OK as i32 {
        return Err(HwInitError::AdcInitFailed(ret));
    }

    let chan_cfg = adc_oneshot_chan_cfg_t {
        atten: adc_atten_t_ADC_ATTEN_DB_12,
        bitwidth: adc_bitwidth_t_ADC_BITWIDTH_12,
    };
    // SAFETY: handle initialised above.
    let ret = unsafe { adc_oneshot_config_channel(ADC1_HANDLE, pins::ADC1_CH_IR, &chan_cfg) };
    if ret != ESP_OK as i32 {
        return Err(HwInitError::AdcInitFailed(ret));
    }

    info!("hw_init: ADC1 CH{} configured (IR ground, GPIO{})", pins::ADC1_CH_IR, pins::IR_ADC_GPIO);
    Ok(())
}

/// 12-bit oneshot read.  A failed conversion reads as 0, which the ground
/// model treats as "no reflection".
#[cfg(target_os = "espidf")]
pub fn adc1_read(channel: u32) -> u16 {
    let mut raw: i32 = 0;
    // SAFETY: ADC1_HANDLE is written once during init_adc() before the
    // control loop starts; main-loop access only.
    let ret = unsafe { adc_oneshot_read(ADC1_HANDLE, channel, &mut raw) };
    if ret != ESP_OK as i32 {
        return 0;
    }
    raw.max(0) as u16
}

#[cfg(not(target_os = "espidf"))]
static SIM_ADC: AtomicU16 = AtomicU16::new(0);

#[cfg(not(target_os = "espidf"))]
pub fn sim_set_adc(raw: u16) {
    SIM_ADC.store(raw, Ordering::Relaxed);
}

#[cfg(not(target_os = "espidf"))]
pub fn adc1_read(_channel: u32) -> u16 {
    SIM_ADC.load(Ordering::Relaxed)
}

// ── GPIO Inputs ───────────────────────────────────────────────

#[cfg(target_os = "espidf")]
unsafe fn init_gpio_inputs() -> Result<(), HwInitError> {
    let echo_pins = [pins::ECHO_FRONT_GPIO, pins::ECHO_LEFT_GPIO, pins::ECHO_RIGHT_GPIO];
    for &pin in &echo_pins {
        configure_input(pin, false)?;
    }
    // Buttons idle HIGH through the internal pull-ups.
    for &pin in &[pins::POWER_BUTTON_GPIO, pins::MODE_BUTTON_GPIO] {
        configure_input(pin, true)?;
    }
    info!("hw_init: GPIO inputs configured (echo×3, buttons×2)");
    Ok(())
}

#[cfg(target_os = "espidf")]
fn configure_input(pin: i32, pull_up: bool) -> Result<(), HwInitError> {
    let cfg = gpio_config_t {
        pin_bit_mask: 1u64 << pin,
        mode: gpio_mode_t_GPIO_MODE_INPUT,
        pull_up_en: if pull_up {
            gpio_pullup_t_GPIO_PULLUP_ENABLE
        } else {
            gpio_pullup_t_GPIO_PULLUP_DISABLE
        },
        pull_down_en: gpio_pulldown_t_GPIO_PULLDOWN_DISABLE,
        intr_type: gpio_int_type_t_GPIO_INTR_DISABLE,
    };
    // SAFETY: plain register configuration of a board-owned pin.
    let ret = unsafe { gpio_config(&cfg) };
    if ret != ESP_OK as i32 {
        return Err(HwInitError::GpioConfigFailed(ret));
    }
    Ok(())
}

#[cfg(target_os = "espidf")]
pub fn gpio_read(pin: i32) -> bool {
    // SAFETY: gpio_get_level is a read-only register access on an
    // already-configured input pin.
    (unsafe { gpio_get_level(pin) }) != 0
}

/// Simulated pin levels, one bit per GPIO.  All HIGH at reset (pull-ups).
#[cfg(not(target_os = "espidf"))]
static SIM_GPIO_LEVELS: AtomicU64 = AtomicU64::new(u64::MAX);

#[cfg(not(target_os = "espidf"))]
pub fn sim_set_gpio_level(pin: i32, high: bool) {
    let mask = 1u64 << pin;
    if high {
        SIM_GPIO_LEVELS.fetch_or(mask, Ordering::Relaxed);
    } else {
        SIM_GPIO_LEVELS.fetch_and(!mask, Ordering::Relaxed);
    }
}

#[cfg(not(target_os = "espidf"))]
pub fn gpio_read(pin: i32) -> bool {
    SIM_GPIO_LEVELS.load(Ordering::Relaxed) & (1u64 << pin) != 0
}

// ── GPIO Outputs ──────────────────────────────────────────────

#[cfg(target_os = "espidf")]
unsafe fn init_gpio_outputs() -> Result<(), HwInitError> {
    let output_pins = [
        pins::TRIG_FRONT_GPIO,
        pins::TRIG_LEFT_GPIO,
        pins::TRIG_RIGHT_GPIO,
        pins::VIBRATION_GPIO,
    ];

    for &pin in &output_pins {
        let cfg = gpio_config_t {
            pin_bit_mask: 1u64 << pin,
            mode: gpio_mode_t_GPIO_MODE_OUTPUT,
            pull_up_en: gpio_pullup_t_GPIO_PULLUP_DISABLE,
            pull_down_en: gpio_pulldown_t_GPIO_PULLDOWN_DISABLE,
            intr_type: gpio_int_type_t_GPIO_INTR_DISABLE,
        };
        let ret = unsafe { gpio_config(&cfg) };
        if ret != ESP_OK as i32 {
            return Err(HwInitError::GpioConfigFailed(ret));
        }
        unsafe { gpio_set_level(pin, 0) };
    }

    info!("hw_init: GPIO outputs configured (trig×3, vibration)");
    Ok(())
}

#[cfg(target_os = "espidf")]
pub fn gpio_write(pin: i32, high: bool) {
    // SAFETY: gpio_set_level writes to an already-configured output pin;
    // main-loop only.
    unsafe {
        gpio_set_level(pin, u32::from(high));
    }
}

#[cfg(not(target_os = "espidf"))]
pub fn gpio_write(pin: i32, high: bool) {
    sim_set_gpio_level(pin, high);
}

// ── Timing helpers ────────────────────────────────────────────

/// Busy-wait for `us` microseconds (trigger pulse shaping only).
#[cfg(target_os = "espidf")]
pub fn delay_us(us: u32) {
    esp_idf_hal::delay::Ets::delay_us(us);
}

#[cfg(not(target_os = "espidf"))]
pub fn delay_us(_us: u32) {}

#[cfg(target_os = "espidf")]
fn now_us() -> i64 {
    // SAFETY: esp_timer_get_time reads the monotonic RTC counter.
    unsafe { esp_timer_get_time() }
}

/// Measure the width of the next HIGH pulse on `pin`, like Arduino's
/// `pulseIn`.  The timeout bounds the whole wait, not just the pulse.
#[cfg(target_os = "espidf")]
pub fn pulse_in_high(pin: i32, timeout_us: u32) -> Option<u32> {
    let start = now_us();
    let expired = |t: i64| t - start > i64::from(timeout_us);

    // Let any pulse already in progress finish.
    while gpio_read(pin) {
        if expired(now_us()) {
            return None;
        }
    }
    while !gpio_read(pin) {
        if expired(now_us()) {
            return None;
        }
    }
    let rise = now_us();
    while gpio_read(pin) {
        if expired(now_us()) {
            return None;
        }
    }
    Some((now_us() - rise) as u32)
}

// ── LEDC PWM ─────────────────────────────────────────────────

pub const LEDC_CH_LED_R: u32 = 0;
pub const LEDC_CH_LED_G: u32 = 1;
pub const LEDC_CH_LED_B: u32 = 2;
pub const LEDC_CH_BUZZER: u32 = 3;

/// Buzzer duty when sounding: 50 % of the 8-bit range.
pub const BUZZER_DUTY: u8 = 128;

#[cfg(target_os = "espidf")]
const LEDC_TIMER_LED: ledc_timer_t = ledc_timer_t_LEDC_TIMER_0;
#[cfg(target_os = "espidf")]
const LEDC_TIMER_BUZZER: ledc_timer_t = ledc_timer_t_LEDC_TIMER_1;

#[cfg(target_os = "espidf")]
unsafe fn init_ledc() -> Result<(), HwInitError> {
    let resolution = if pins::PWM_RESOLUTION_BITS == 8 {
        ledc_timer_bit_t_LEDC_TIMER_8_BIT
    } else {
        ledc_timer_bit_t_LEDC_TIMER_10_BIT
    };

    for (timer, freq) in [
        (LEDC_TIMER_LED, pins::LED_PWM_FREQ_HZ),
        (LEDC_TIMER_BUZZER, pins::BUZZER_BASE_FREQ_HZ),
    ] {
        let cfg = ledc_timer_config_t {
            speed_mode: ledc_mode_t_LEDC_LOW_SPEED_MODE,
            timer_num: timer,
            duty_resolution: resolution,
            freq_hz: freq,
            clk_cfg: soc_periph_ledc_clk_src_legacy_t_LEDC_AUTO_CLK,
            ..Default::default()
        };
        // SAFETY: single main-task context via init_peripherals().
        let ret = unsafe { ledc_timer_config(&cfg) };
        if ret != ESP_OK as i32 {
            return Err(HwInitError::LedcInitFailed(ret));
        }
    }

    // Common-anode LED: duty 255 keeps each channel dark at boot.
    let channels = [
        (LEDC_CH_LED_R, pins::LED_R_GPIO, LEDC_TIMER_LED, 255),
        (LEDC_CH_LED_G, pins::LED_G_GPIO, LEDC_TIMER_LED, 255),
        (LEDC_CH_LED_B, pins::LED_B_GPIO, LEDC_TIMER_LED, 255),
        (LEDC_CH_BUZZER, pins::BUZZER_GPIO, LEDC_TIMER_BUZZER, 0),
    ];
    for (channel, gpio, timer, duty) in channels {
        let cfg = ledc_channel_config_t {
            speed_mode: ledc_mode_t_LEDC_LOW_SPEED_MODE,
            channel,
            timer_sel: timer,
            gpio_num: gpio,
            duty,
            hpoint: 0,
            ..Default::default()
        };
        let ret = unsafe { ledc_channel_config(&cfg) };
        if ret != ESP_OK as i32 {
            return Err(HwInitError::LedcInitFailed(ret));
        }
    }

    info!("hw_init: LEDC configured (led=CH0-2, buzzer=CH3)");
    Ok(())
}

#[cfg(target_os = "espidf")]
pub fn ledc_set(channel: u32, duty: u8) {
    // SAFETY: LEDC channels were configured in init_ledc(); duty register
    // writes are race-free since only the main loop calls this function.
    unsafe {
        ledc_set_duty(ledc_mode_t_LEDC_LOW_SPEED_MODE, channel, u32::from(duty));
        ledc_update_duty(ledc_mode_t_LEDC_LOW_SPEED_MODE, channel);
    }
}

#[cfg(not(target_os = "espidf"))]
pub fn ledc_set(_channel: u32, _duty: u8) {}

/// Retune the buzzer timer and start it, or silence it with `None`.
#[cfg(target_os = "espidf")]
pub fn ledc_tone(freq_hz: Option<u16>) {
    match freq_hz {
        Some(hz) if hz > 0 => {
            // SAFETY: buzzer timer configured in init_ledc(); main loop only.
            unsafe {
                ledc_set_freq(ledc_mode_t_LEDC_LOW_SPEED_MODE, LEDC_TIMER_BUZZER, u32::from(hz));
            }
            ledc_set(LEDC_CH_BUZZER, BUZZER_DUTY);
        }
        _ => ledc_set(LEDC_CH_BUZZER, 0),
    }
}

#[cfg(not(target_os = "espidf"))]
pub fn ledc_tone(_freq_hz: Option<u16>) {}
