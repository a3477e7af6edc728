//! Mock adapters for integration tests.
//!
//! Every port the scheduler consumes has a recording stand-in here, so
//! tests can script sensor readings and button levels and then assert on
//! the full actuator, screen, upload and event history.  The clock only
//! moves when something delays on it.

use embedded_hal::delay::DelayNs;

use smartcane::alert::directive::{COLOUR_OFF, Rgb};
use smartcane::app::events::AppEvent;
use smartcane::app::ports::{
    ActuatorPort, CloudTelemetryPort, ConnectivityError, ConnectivityPort, DisplayPort, EventSink,
    InputPort, LocalTelemetryPort, SensorPort, TimePort,
};
use smartcane::app::snapshot::{CloudFields, LocalTelemetryRecord, SystemSnapshot};
use smartcane::app::uplink::UplinkDispatch;
use smartcane::config::SystemConfig;
use smartcane::error::CommsError;
use smartcane::fsm::OperatingMode;
use smartcane::scheduler::Scheduler;
use smartcane::sensors::{Direction, DistanceReading, GroundClearance, SensorReadings};

// ── Actuator call record ──────────────────────────────────────

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ActuatorCall {
    Colour(Rgb),
    Tone(Option<u16>),
    Vibration(bool),
    AllOff,
}

// ── MockHw ────────────────────────────────────────────────────

/// Buttons, sensors and actuators in one, like the real hardware adapter.
#[derive(Default)]
pub struct MockHw {
    pub readings: SensorReadings,
    pub power_low: bool,
    pub mode_low: bool,
    /// History since the last [`clear_calls`](Self::clear_calls).
    pub calls: Vec<ActuatorCall>,
    pub range_reads: u32,
    pub ground_reads: u32,
    live_colour: Rgb,
    live_tone: Option<u16>,
    live_vibration: bool,
}

#[allow(dead_code)]
impl MockHw {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn script(&mut self, front: Option<u16>, left: Option<u16>, right: Option<u16>, ground_cm: u16) {
        let cm = |v: Option<u16>| v.map_or(DistanceReading::NoEcho, DistanceReading::Cm);
        self.readings = SensorReadings {
            front: cm(front),
            left: cm(left),
            right: cm(right),
            ground: GroundClearance::new(ground_cm),
        };
    }

    /// Colour currently showing.
    pub fn colour(&self) -> Rgb {
        self.live_colour
    }

    pub fn tone(&self) -> Option<u16> {
        self.live_tone
    }

    pub fn vibrating(&self) -> bool {
        self.live_vibration
    }

    /// Every tone that was started, in order.
    pub fn tones_started(&self) -> Vec<u16> {
        self.calls
            .iter()
            .filter_map(|c| match c {
                ActuatorCall::Tone(Some(hz)) => Some(*hz),
                _ => None,
            })
            .collect()
    }

    pub fn clear_calls(&mut self) {
        self.calls.clear();
    }
}

impl InputPort for MockHw {
    fn power_level_low(&mut self) -> bool {
        self.power_low
    }

    fn mode_level_low(&mut self) -> bool {
        self.mode_low
    }
}

impl SensorPort for MockHw {
    fn measure_range(&mut self, direction: Direction) -> DistanceReading {
        self.range_reads += 1;
        match direction {
            Direction::Front => self.readings.front,
            Direction::Left => self.readings.left,
            Direction::Right => self.readings.right,
        }
    }

    fn measure_ground(&mut self) -> GroundClearance {
        self.ground_reads += 1;
        self.readings.ground
    }
}

impl ActuatorPort for MockHw {
    fn set_colour(&mut self, colour: Rgb) {
        self.live_colour = colour;
        self.calls.push(ActuatorCall::Colour(colour));
    }

    fn set_tone(&mut self, hz: Option<u16>) {
        self.live_tone = hz;
        self.calls.push(ActuatorCall::Tone(hz));
    }

    fn set_vibration(&mut self, on: bool) {
        self.live_vibration = on;
        self.calls.push(ActuatorCall::Vibration(on));
    }

    fn all_off(&mut self) {
        self.live_colour = COLOUR_OFF;
        self.live_tone = None;
        self.live_vibration = false;
        self.calls.push(ActuatorCall::AllOff);
    }
}

// ── MockClock ─────────────────────────────────────────────────

/// Simulated millisecond clock advanced only by delays.
#[derive(Default)]
pub struct MockClock {
    now_ms: u32,
    sub_ms_ns: u32,
}

#[allow(dead_code)]
impl MockClock {
    pub fn starting_at(now_ms: u32) -> Self {
        Self { now_ms, sub_ms_ns: 0 }
    }

    pub fn advance(&mut self, ms: u32) {
        self.now_ms = self.now_ms.wrapping_add(ms);
    }
}

impl TimePort for MockClock {
    fn now_ms(&self) -> u32 {
        self.now_ms
    }
}

impl DelayNs for MockClock {
    fn delay_ns(&mut self, ns: u32) {
        let total = self.sub_ms_ns + ns;
        self.now_ms = self.now_ms.wrapping_add(total / 1_000_000);
        self.sub_ms_ns = total % 1_000_000;
    }

    fn delay_ms(&mut self, ms: u32) {
        self.now_ms = self.now_ms.wrapping_add(ms);
    }
}

// ── MockDisplay ───────────────────────────────────────────────

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Screen {
    Welcome,
    Sleep,
    Boot,
    Mode(OperatingMode),
    Status(SystemSnapshot),
}

#[derive(Default)]
pub struct MockDisplay {
    pub screens: Vec<Screen>,
}

#[allow(dead_code)]
impl MockDisplay {
    pub fn last(&self) -> Option<Screen> {
        self.screens.last().copied()
    }

    pub fn count(&self, screen: Screen) -> usize {
        self.screens.iter().filter(|s| **s == screen).count()
    }
}

impl DisplayPort for MockDisplay {
    fn show_welcome(&mut self) {
        self.screens.push(Screen::Welcome);
    }

    fn show_sleep(&mut self) {
        self.screens.push(Screen::Sleep);
    }

    fn show_boot(&mut self) {
        self.screens.push(Screen::Boot);
    }

    fn show_mode(&mut self, mode: OperatingMode) {
        self.screens.push(Screen::Mode(mode));
    }

    fn render(&mut self, snapshot: &SystemSnapshot) {
        self.screens.push(Screen::Status(*snapshot));
    }
}

// ── MockNet ───────────────────────────────────────────────────

pub struct MockNet {
    /// Whether `connect` succeeds.
    pub reachable: bool,
    pub connected: bool,
    pub connect_calls: u32,
    pub polls: u32,
}

impl MockNet {
    pub fn online() -> Self {
        Self {
            reachable: true,
            connected: false,
            connect_calls: 0,
            polls: 0,
        }
    }

    pub fn offline() -> Self {
        Self {
            reachable: false,
            ..Self::online()
        }
    }
}

impl ConnectivityPort for MockNet {
    fn connect(&mut self) -> Result<(), ConnectivityError> {
        self.connect_calls += 1;
        if self.reachable {
            self.connected = true;
            Ok(())
        } else {
            Err(ConnectivityError::ConnectionFailed)
        }
    }

    fn disconnect(&mut self) {
        self.connected = false;
    }

    fn is_connected(&self) -> bool {
        self.connected
    }

    fn poll(&mut self, _now_ms: u32) {
        self.polls += 1;
    }

    fn set_credentials(&mut self, _ssid: &str, _password: &str) -> Result<(), ConnectivityError> {
        Ok(())
    }

    fn rssi(&self) -> Option<i8> {
        self.connected.then_some(-55)
    }
}

// ── Telemetry recorders ───────────────────────────────────────

#[derive(Default)]
pub struct RecordingLocal {
    pub records: Vec<LocalTelemetryRecord>,
}

impl LocalTelemetryPort for RecordingLocal {
    fn push(&mut self, record: &LocalTelemetryRecord) -> Result<(), CommsError> {
        self.records.push(*record);
        Ok(())
    }
}

#[derive(Default)]
pub struct RecordingCloud {
    pub uploads: Vec<CloudFields>,
}

impl CloudTelemetryPort for RecordingCloud {
    fn upload_fields(&mut self, fields: &CloudFields) -> Result<(), CommsError> {
        self.uploads.push(*fields);
        Ok(())
    }
}

// ── VecSink ───────────────────────────────────────────────────

#[derive(Default)]
pub struct VecSink {
    pub events: Vec<AppEvent>,
}

impl EventSink for VecSink {
    fn emit(&mut self, event: &AppEvent) {
        self.events.push(event.clone());
    }
}

// ── Rig ───────────────────────────────────────────────────────

pub type TestScheduler =
    Scheduler<MockHw, MockDisplay, MockNet, UplinkDispatch<RecordingLocal, RecordingCloud>, MockClock, VecSink>;

pub fn rig_with(net: MockNet) -> TestScheduler {
    Scheduler::new(
        SystemConfig::default(),
        MockHw::new(),
        MockDisplay::default(),
        net,
        UplinkDispatch::new(RecordingLocal::default(), RecordingCloud::default()),
        MockClock::default(),
        VecSink::default(),
    )
}

/// Booted scheduler with the network reachable, sitting powered off.
#[allow(dead_code)]
pub fn booted() -> TestScheduler {
    let mut s = rig_with(MockNet::online());
    s.boot();
    s
}

/// Hold the power button across two ticks (edge, then settle) and release.
#[allow(dead_code)]
pub fn press_power(s: &mut TestScheduler) {
    s.hardware_mut().power_low = true;
    s.tick();
    s.tick();
    s.hardware_mut().power_low = false;
    s.tick();
}

#[allow(dead_code)]
pub fn press_mode(s: &mut TestScheduler) {
    s.hardware_mut().mode_low = true;
    s.tick();
    s.tick();
    s.hardware_mut().mode_low = false;
    s.tick();
}
