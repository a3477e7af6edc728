//! Cooperative tick loop.
//!
//! One [`Scheduler::tick`] runs the whole control cycle to completion;
//! ticks never overlap and nothing preempts them.  Every blocking step is
//! bounded (ranging timeout, fixed screen and cue holds, HTTP timeout).
//!
//! ```text
//! ┌──────────────────────────── tick ────────────────────────────┐
//! │ 1 poll buttons ──▶ FSM (cues / screens)                      │
//! │ 2 off? ──▶ sleep screen, short yield, done                   │
//! │ 3 range front · left · right · ground   (pulses serviced     │
//! │                                           between reads)     │
//! │ 4 arbitrate ──▶ directive live on actuators                  │
//! │ 5 render display                                             │
//! │ 6 poll connectivity                                          │
//! │ 7 timers: local push · cloud upload · diagnostics            │
//! │ 8 yield in slices, servicing pulses                          │
//! └──────────────────────────────────────────────────────────────┘
//! ```
//!
//! The scheduler owns every adapter and lends them to the
//! [`AppService`] by reference for the duration of a call.

pub mod timers;

use embedded_hal::delay::DelayNs;
use log::{debug, info, warn};

use crate::app::events::{AppEvent, DiagnosticsReport};
use crate::app::ports::{
    ActuatorPort, ConnectivityPort, DisplayPort, EventSink, InputPort, LinkStatus,
    SchedulerDelegate, SensorPort, TimePort, UplinkTarget,
};
use crate::app::service::AppService;
use crate::config::{SystemConfig, WELCOME_SCREEN_MS, WIFI_CONNECT_ATTEMPTS};
use crate::fsm::StateId;
use crate::sensors::{Direction, SensorReadings};

use timers::{DueTasks, ScheduledTask, TimerBank};

/// Granularity of the end-of-tick yield.
const YIELD_SLICE_MS: u32 = 10;
/// Spacing of association polls during boot.
const WIFI_POLL_MS: u32 = 500;

/// What one tick did, for the caller and for tests.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TickReport {
    pub state: StateId,
    /// `None` when the tick ran powered off.
    pub readings: Option<SensorReadings>,
    pub due: DueTasks,
}

pub struct Scheduler<H, D, N, U, T, S> {
    service: AppService,
    hw: H,
    display: D,
    net: N,
    uplink: U,
    clock: T,
    sink: S,
    timers: TimerBank,
    tick_yield_ms: u32,
    sleep_poll_ms: u32,
    boot_ms: u32,
    ticks: u32,
}

impl<H, D, N, U, T, S> Scheduler<H, D, N, U, T, S>
where
    H: InputPort + SensorPort + ActuatorPort,
    D: DisplayPort,
    N: ConnectivityPort,
    U: SchedulerDelegate,
    T: TimePort + DelayNs,
    S: EventSink,
{
    pub fn new(config: SystemConfig, hw: H, display: D, net: N, uplink: U, clock: T, sink: S) -> Self {
        let mut timers = TimerBank::new();
        let _ = timers.add(ScheduledTask::LocalPush, "local push", config.local_push_interval_ms);
        let _ = timers.add(ScheduledTask::CloudUpload, "cloud upload", config.cloud_upload_interval_ms);
        let _ = timers.add(ScheduledTask::Diagnostics, "diagnostics", config.diagnostics_interval_ms);

        Self {
            tick_yield_ms: config.tick_yield_ms,
            sleep_poll_ms: config.sleep_poll_ms,
            service: AppService::new(config),
            hw,
            display,
            net,
            uplink,
            clock,
            sink,
            timers,
            boot_ms: 0,
            ticks: 0,
        }
    }

    /// Boot sequence: welcome screen, bounded association attempt, then the
    /// service starts powered off.
    pub fn boot(&mut self) {
        self.boot_ms = self.clock.now_ms();
        self.display.show_welcome();
        self.clock.delay_ms(WELCOME_SCREEN_MS);

        if let Err(e) = self.net.connect() {
            warn!("Boot: WiFi connect failed: {}", e);
        }
        for _ in 0..WIFI_CONNECT_ATTEMPTS {
            if self.net.is_connected() {
                break;
            }
            let now = self.clock.now_ms();
            self.net.poll(now);
            self.clock.delay_ms(WIFI_POLL_MS);
        }
        if self.net.is_connected() {
            info!("Boot: WiFi up, RSSI {:?} dBm", self.net.rssi());
        } else {
            warn!("Boot: continuing offline");
        }

        self.service
            .start(&mut self.hw, &mut self.display, &mut self.clock, &mut self.sink);
    }

    /// Run one full control cycle.
    pub fn tick(&mut self) -> TickReport {
        self.ticks = self.ticks.wrapping_add(1);

        // 1. Buttons
        let now = self.clock.now_ms();
        for event in self.service.poll_inputs(now, &mut self.hw) {
            self.service.handle_input(
                event,
                &mut self.hw,
                &mut self.display,
                &mut self.clock,
                &mut self.sink,
            );
        }

        // 2. Powered off: sleep screen only
        if !self.service.is_powered() {
            self.display.show_sleep();
            self.clock.delay_ms(self.sleep_poll_ms);
            return TickReport {
                state: self.service.state(),
                readings: None,
                due: DueTasks::new(),
            };
        }

        // 3. Sensors, keeping pulse cadence alive between blocking reads
        let readings = self.sample();
        debug!(
            "F:{} L:{} R:{} G:{}",
            readings.front.as_wire(),
            readings.left.as_wire(),
            readings.right.as_wire(),
            readings.ground.cm()
        );

        // 4. Arbitrate and apply
        let now = self.clock.now_ms();
        self.service.arbitrate(readings, now, &mut self.hw, &mut self.sink);

        // 5. Display
        let snapshot = self.service.snapshot();
        self.display.render(&snapshot);

        // 6. Connectivity housekeeping
        self.net.poll(now);

        // 7. Periodic tasks
        let due = self.timers.poll(now);
        for &task in &due {
            self.run_task(task, now);
        }

        // 8. Yield
        self.yield_for(self.tick_yield_ms);

        TickReport {
            state: self.service.state(),
            readings: Some(readings),
            due,
        }
    }

    pub fn service(&self) -> &AppService {
        &self.service
    }

    pub fn hardware(&self) -> &H {
        &self.hw
    }

    pub fn hardware_mut(&mut self) -> &mut H {
        &mut self.hw
    }

    pub fn display(&self) -> &D {
        &self.display
    }

    pub fn network_mut(&mut self) -> &mut N {
        &mut self.net
    }

    pub fn uplink(&self) -> &U {
        &self.uplink
    }

    pub fn clock(&self) -> &T {
        &self.clock
    }

    pub fn clock_mut(&mut self) -> &mut T {
        &mut self.clock
    }

    pub fn sink(&self) -> &S {
        &self.sink
    }

    pub fn ticks(&self) -> u32 {
        self.ticks
    }

    // ── Internal ──────────────────────────────────────────────

    fn sample(&mut self) -> SensorReadings {
        let mut readings = SensorReadings::default();
        for dir in Direction::ALL {
            let reading = self.hw.measure_range(dir);
            match dir {
                Direction::Front => readings.front = reading,
                Direction::Left => readings.left = reading,
                Direction::Right => readings.right = reading,
            }
            let now = self.clock.now_ms();
            self.service.service_outputs(now, &mut self.hw);
        }
        readings.ground = self.hw.measure_ground();
        readings
    }

    fn run_task(&mut self, task: ScheduledTask, now: u32) {
        let link = LinkStatus::of(&self.net);
        match task {
            ScheduledTask::LocalPush | ScheduledTask::CloudUpload => {
                let target = if task == ScheduledTask::LocalPush {
                    UplinkTarget::Local
                } else {
                    UplinkTarget::Cloud
                };
                let snapshot = self.service.snapshot();
                let outcome = self.uplink.on_upload_due(target, &snapshot, link);
                self.sink.emit(&AppEvent::Upload { target, outcome });
            }
            ScheduledTask::Diagnostics => {
                let report = DiagnosticsReport {
                    uptime_s: now.wrapping_sub(self.boot_ms) / 1000,
                    ticks: self.ticks,
                    power: self.service.power(),
                    mode: self.service.mode(),
                    readings: self.service.snapshot().readings,
                    link,
                    next_local_push_s: self
                        .timers
                        .remaining_ms(ScheduledTask::LocalPush, now)
                        .unwrap_or(0)
                        / 1000,
                    power_cycles: self.service.power_cycles(),
                };
                self.sink.emit(&AppEvent::Diagnostics(report));
            }
        }
    }

    fn yield_for(&mut self, total_ms: u32) {
        let mut waited = 0;
        while waited < total_ms {
            let slice = YIELD_SLICE_MS.min(total_ms - waited);
            let now = self.clock.now_ms();
            self.service.service_outputs(now, &mut self.hw);
            self.clock.delay_ms(slice);
            waited += slice;
        }
    }
}
