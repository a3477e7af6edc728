//! Application service — the hexagonal core.
//!
//! [`AppService`] owns the power/mode FSM, the button debouncers, the
//! alert arbiter and the live actuator directive.  It exposes a clean,
//! hardware-agnostic API.  All I/O flows through port traits injected at
//! call sites, making the entire service testable with mock adapters.
//!
//! ```text
//!    InputPort ──▶ ┌─────────────────────────────┐ ──▶ EventSink
//!                  │         AppService          │
//! ActuatorPort ◀── │ Debounce · FSM · Arbiter ·  │ ──▶ DisplayPort
//!                  │ PulseTrain                  │
//!                  └─────────────────────────────┘
//! ```
//!
//! The service never samples sensors itself: the scheduler hands it a
//! fresh [`SensorReadings`] each tick.

use embedded_hal::delay::DelayNs;
use heapless::Vec;
use log::{debug, info};

use crate::alert::Arbiter;
use crate::alert::directive::{ActuatorDirective, COLOUR_OFF, Rgb};
use crate::config::SystemConfig;
use crate::drivers::button::Debouncer;
use crate::drivers::cues;
use crate::drivers::pulse_train::PulseTrain;
use crate::fsm::context::FsmContext;
use crate::fsm::states::build_state_table;
use crate::fsm::{Fsm, InputEvent, OperatingMode, PowerState, StateId};
use crate::sensors::SensorReadings;

use super::commands::AppCommand;
use super::events::AppEvent;
use super::ports::{ActuatorPort, DisplayPort, EventSink, InputPort};
use super::snapshot::SystemSnapshot;

/// At most one event per button per poll.
pub type InputEvents = Vec<InputEvent, 2>;

/// What the actuators were last told.  Lets the service write only on
/// change, which keeps the LEDC and GPIO traffic down while the pulse
/// train is serviced many times per tick.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct Outputs {
    colour: Rgb,
    tone_hz: Option<u16>,
    vibrate: bool,
}

impl Outputs {
    const OFF: Self = Self {
        colour: COLOUR_OFF,
        tone_hz: None,
        vibrate: false,
    };
}

// ───────────────────────────────────────────────────────────────
// AppService
// ───────────────────────────────────────────────────────────────

pub struct AppService {
    config: SystemConfig,
    fsm: Fsm,
    ctx: FsmContext,
    arbiter: Arbiter,
    power_button: Debouncer,
    mode_button: Debouncer,
    pulses: PulseTrain,
    directive: ActuatorDirective,
    /// `None` after anything wrote to the actuators behind our back (cues).
    applied: Option<Outputs>,
    /// Last operating mode; kept while off for display and telemetry.
    mode: OperatingMode,
    readings: SensorReadings,
}

impl AppService {
    /// Construct the service from configuration.
    ///
    /// Does **not** start the FSM — call [`start`](Self::start) next.
    pub fn new(config: SystemConfig) -> Self {
        let arbiter = Arbiter::new(&config);
        let power_button = Debouncer::new(config.button_settle_ms, config.button_cooldown_ms);
        let mode_button = Debouncer::new(config.button_settle_ms, config.button_cooldown_ms);

        Self {
            config,
            fsm: Fsm::new(build_state_table(), StateId::Off),
            ctx: FsmContext::new(),
            arbiter,
            power_button,
            mode_button,
            pulses: PulseTrain::new(),
            directive: ActuatorDirective::quiescent(),
            applied: None,
            mode: OperatingMode::Sensing,
            readings: SensorReadings::default(),
        }
    }

    // ── Lifecycle ─────────────────────────────────────────────

    /// Start the FSM powered off with every actuator quiescent.
    pub fn start(
        &mut self,
        out: &mut impl ActuatorPort,
        display: &mut impl DisplayPort,
        delay: &mut impl DelayNs,
        sink: &mut impl EventSink,
    ) {
        self.fsm.start(&mut self.ctx);
        self.run_commands(out, display, delay);
        sink.emit(&AppEvent::Started(self.fsm.current_state()));
        info!("AppService started in {:?}", self.fsm.current_state());
    }

    // ── Inputs ────────────────────────────────────────────────

    /// Sample both buttons once and return the confirmed presses.
    pub fn poll_inputs(&mut self, now_ms: u32, input: &mut impl InputPort) -> InputEvents {
        let mut events = InputEvents::new();
        if self.power_button.update(now_ms, input.power_level_low()) {
            let _ = events.push(InputEvent::PowerPressed);
        }
        if self.mode_button.update(now_ms, input.mode_level_low()) {
            let _ = events.push(InputEvent::ModePressed);
        }
        events
    }

    /// Feed one confirmed press to the FSM and run the side effects it
    /// queued.  Returns the new state on a transition.
    pub fn handle_input(
        &mut self,
        event: InputEvent,
        out: &mut impl ActuatorPort,
        display: &mut impl DisplayPort,
        delay: &mut impl DelayNs,
        sink: &mut impl EventSink,
    ) -> Option<StateId> {
        let prev = self.fsm.current_state();
        let next = self.fsm.dispatch(event, &mut self.ctx);

        if let Some(mode) = self.fsm.current_state().mode() {
            self.mode = mode;
        }
        self.run_commands(out, display, delay);

        if let Some(to) = next {
            sink.emit(&AppEvent::StateChanged { from: prev, to });
        }
        next
    }

    // ── Alerting ──────────────────────────────────────────────

    /// Arbitrate this tick's readings and make the result live.
    ///
    /// Ignored while powered off: the quiescent directive stands.
    pub fn arbitrate(
        &mut self,
        readings: SensorReadings,
        now_ms: u32,
        out: &mut impl ActuatorPort,
        sink: &mut impl EventSink,
    ) {
        if !self.is_powered() {
            return;
        }
        self.readings = readings;

        let directive = self.arbiter.arbitrate(&readings, self.mode);
        if directive.level != self.directive.level || directive.label != self.directive.label {
            sink.emit(&AppEvent::Alert {
                level: directive.level,
                label: directive.label,
                readings,
            });
        }

        self.pulses.load(&directive, now_ms);
        self.directive = directive;
        self.service_outputs(now_ms, out);
    }

    /// Advance the pulse train and push any changed output.  Called
    /// between blocking sensor reads and during the tick yield.
    pub fn service_outputs(&mut self, now_ms: u32, out: &mut impl ActuatorPort) {
        if !self.is_powered() {
            return;
        }
        let pulse = self.pulses.output(now_ms);
        self.write_outputs(
            Outputs {
                colour: self.directive.colour,
                tone_hz: pulse.tone_hz,
                vibrate: pulse.vibrate,
            },
            out,
        );
    }

    // ── Queries ───────────────────────────────────────────────

    /// The fused state for display and telemetry.
    pub fn snapshot(&self) -> SystemSnapshot {
        SystemSnapshot {
            power: self.power(),
            mode: self.mode,
            readings: self.readings,
            level: self.directive.level,
            label: self.directive.label,
        }
    }

    pub fn state(&self) -> StateId {
        self.fsm.current_state()
    }

    pub fn power(&self) -> PowerState {
        self.fsm.current_state().power()
    }

    pub fn is_powered(&self) -> bool {
        self.power() == PowerState::On
    }

    pub fn mode(&self) -> OperatingMode {
        self.mode
    }

    /// The directive currently live on the actuators.
    pub fn directive(&self) -> &ActuatorDirective {
        &self.directive
    }

    pub fn power_cycles(&self) -> u32 {
        self.ctx.power_cycles
    }

    pub fn config(&self) -> &SystemConfig {
        &self.config
    }

    // ── Internal ──────────────────────────────────────────────

    fn run_commands(
        &mut self,
        out: &mut impl ActuatorPort,
        display: &mut impl DisplayPort,
        delay: &mut impl DelayNs,
    ) {
        for cmd in self.ctx.take_commands() {
            debug!("exec {:?}", cmd);
            match cmd {
                AppCommand::Quiesce => self.quiesce(out),
                AppCommand::PowerOnCue => {
                    cues::play(cues::POWER_ON, out, delay);
                    self.applied = None;
                }
                AppCommand::PowerOffCue => {
                    cues::play(cues::POWER_OFF, out, delay);
                    self.applied = None;
                }
                AppCommand::ModeCue => {
                    cues::play(cues::MODE_CHANGE, out, delay);
                    self.applied = None;
                }
                AppCommand::BootScreen => {
                    display.show_boot();
                    delay.delay_ms(self.config.boot_screen_ms);
                }
                AppCommand::ModeScreen(mode) => {
                    display.show_mode(mode);
                    delay.delay_ms(self.config.mode_screen_ms);
                }
            }
        }
    }

    fn quiesce(&mut self, out: &mut impl ActuatorPort) {
        self.pulses.clear();
        self.directive = ActuatorDirective::quiescent();
        out.all_off();
        self.applied = Some(Outputs::OFF);
    }

    fn write_outputs(&mut self, next: Outputs, out: &mut impl ActuatorPort) {
        let prev = self.applied;
        if prev.map(|p| p.colour) != Some(next.colour) {
            out.set_colour(next.colour);
        }
        if prev.map(|p| p.tone_hz) != Some(next.tone_hz) {
            out.set_tone(next.tone_hz);
        }
        if prev.map(|p| p.vibrate) != Some(next.vibrate) {
            out.set_vibration(next.vibrate);
        }
        self.applied = Some(next);
    }
}

// ───────────────────────────────────────────────────────────────
// Tests
// ───────────────────────────────────────────────────────────────
