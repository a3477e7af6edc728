//! Piezo buzzer on an LEDC channel.
//!
//! Tone generation retunes the LEDC timer frequency and drives the channel
//! at 50 % duty; silence is zero duty.

use log::trace;

use crate::drivers::hw_init;

pub struct Buzzer {
    tone_hz: Option<u16>,
}

impl Buzzer {
    pub fn new() -> Self {
        Self { tone_hz: None }
    }

    /// Start (or retune) a tone, or silence with `None`.
    pub fn set_tone(&mut self, hz: Option<u16>) {
        let hz = hz.filter(|&f| f > 0);
        hw_init::ledc_tone(hz);
        if self.tone_hz != hz {
            trace!("buzzer: {:?} Hz", hz);
        }
        self.tone_hz = hz;
    }

    pub fn silence(&mut self) {
        self.set_tone(None);
    }

    pub fn tone(&self) -> Option<u16> {
        self.tone_hz
    }
}

impl Default for Buzzer {
    fn default() -> Self {
        Self::new()
    }
}
