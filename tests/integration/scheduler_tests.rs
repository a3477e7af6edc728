//! Tick-loop behaviour: boot, power and mode buttons, sleep while off,
//! periodic uploads and diagnostics.

use smartcane::app::events::AppEvent;
use smartcane::app::ports::{TimePort, UplinkTarget};
use smartcane::error::CommsError;
use smartcane::fsm::{OperatingMode, PowerState, StateId};
use smartcane::sensors::DistanceReading;

use crate::mock_hw::{MockNet, Screen, TestScheduler, booted, press_mode, press_power, rig_with};

fn powered_on() -> TestScheduler {
    let mut s = booted();
    press_power(&mut s);
    assert_eq!(s.service().state(), StateId::Sensing);
    s
}

fn run_until(s: &mut TestScheduler, until_ms: u32) {
    while s.clock().now_ms() < until_ms {
        s.tick();
    }
}

fn upload_events(s: &TestScheduler, target: UplinkTarget) -> Vec<Result<(), CommsError>> {
    s.sink()
        .events
        .iter()
        .filter_map(|e| match e {
            AppEvent::Upload { target: t, outcome } if *t == target => Some(*outcome),
            _ => None,
        })
        .collect()
}

// ── Boot ──────────────────────────────────────────────────────

#[test]
fn boot_shows_welcome_and_starts_off() {
    let s = booted();
    assert_eq!(s.display().screens.first(), Some(&Screen::Welcome));
    assert_eq!(s.service().state(), StateId::Off);
    assert_eq!(s.sink().events.first(), Some(&AppEvent::Started(StateId::Off)));
    // Welcome hold only; association succeeded on the first check.
    assert_eq!(s.clock().now_ms(), 2_000);
}

#[test]
fn boot_gives_up_on_wifi_after_bounded_attempts() {
    let mut s = rig_with(MockNet::offline());
    s.boot();
    assert_eq!(s.service().state(), StateId::Off);
    // 2 s welcome plus 30 polls 500 ms apart.
    assert_eq!(s.clock().now_ms(), 2_000 + 30 * 500);
}

// ── Powered off ───────────────────────────────────────────────

#[test]
fn off_ticks_show_sleep_and_never_range() {
    let mut s = booted();
    for _ in 0..5 {
        let report = s.tick();
        assert_eq!(report.state, StateId::Off);
        assert!(report.readings.is_none());
    }
    assert_eq!(s.display().count(Screen::Sleep), 5);
    assert_eq!(s.hardware().range_reads, 0);
    assert_eq!(s.hardware().ground_reads, 0);
}

#[test]
fn no_uploads_while_off() {
    let mut s = booted();
    s.clock_mut().advance(60_000);
    s.tick();
    s.tick();
    assert!(upload_events(&s, UplinkTarget::Local).is_empty());
    assert!(s.uplink().local().records.is_empty());
    assert!(s.uplink().cloud().uploads.is_empty());
}

#[test]
fn mode_press_while_off_is_ignored() {
    let mut s = booted();
    press_mode(&mut s);
    assert_eq!(s.service().state(), StateId::Off);
    assert_eq!(s.display().count(Screen::Mode(OperatingMode::Alerting)), 0);
}

// ── Power button ──────────────────────────────────────────────

#[test]
fn power_press_wakes_into_sensing() {
    let s = powered_on();
    assert!(s.service().is_powered());
    assert_eq!(s.service().power_cycles(), 1);
    assert!(s.display().screens.contains(&Screen::Boot));
    assert!(s.sink().events.contains(&AppEvent::StateChanged {
        from: StateId::Off,
        to: StateId::Sensing,
    }));
    // Power-on chirp.
    let tones = s.hardware().tones_started();
    assert!(tones.starts_with(&[1500, 2000]));
}

#[test]
fn held_power_button_toggles_once() {
    let mut s = booted();
    s.hardware_mut().power_low = true;
    for _ in 0..20 {
        s.tick();
    }
    assert_eq!(s.service().state(), StateId::Sensing);
    assert_eq!(s.service().power_cycles(), 1);
}

#[test]
fn power_press_while_on_goes_dark() {
    let mut s = powered_on();
    s.hardware_mut().script(Some(15), None, None, 30);
    s.tick();
    assert!(s.hardware().vibrating());

    press_power(&mut s);
    assert_eq!(s.service().state(), StateId::Off);
    assert_eq!(s.service().power(), PowerState::Off);
    let hw = s.hardware();
    assert_eq!(hw.colour(), (0, 0, 0));
    assert_eq!(hw.tone(), None);
    assert!(!hw.vibrating());
    assert_eq!(s.display().last(), Some(Screen::Sleep));
}

#[test]
fn wake_always_returns_to_sensing() {
    let mut s = powered_on();
    press_mode(&mut s);
    assert_eq!(s.service().state(), StateId::Alerting);

    press_power(&mut s);
    press_power(&mut s);
    assert_eq!(s.service().state(), StateId::Sensing);
    assert_eq!(s.service().power_cycles(), 2);
}

// ── Mode button ───────────────────────────────────────────────

#[test]
fn mode_press_toggles_and_announces() {
    let mut s = powered_on();
    s.hardware_mut().clear_calls();

    press_mode(&mut s);
    assert_eq!(s.service().state(), StateId::Alerting);
    assert_eq!(s.service().mode(), OperatingMode::Alerting);
    assert!(s.display().screens.contains(&Screen::Mode(OperatingMode::Alerting)));
    assert!(s.hardware().tones_started().starts_with(&[1000, 1500]));

    press_mode(&mut s);
    assert_eq!(s.service().state(), StateId::Sensing);
}

// ── Periodic uploads ──────────────────────────────────────────

#[test]
fn uploads_follow_their_intervals() {
    let mut s = powered_on();
    run_until(&mut s, 15_500);

    let local = &s.uplink().local().records;
    let cloud = &s.uplink().cloud().uploads;
    assert_eq!(local.len(), 3);
    assert_eq!(cloud.len(), 1);
    assert_eq!(upload_events(&s, UplinkTarget::Local), vec![Ok(()); 3]);
    assert_eq!(upload_events(&s, UplinkTarget::Cloud), vec![Ok(())]);
}

#[test]
fn local_pushes_are_at_least_an_interval_apart() {
    let mut s = powered_on();
    let mut pushed_at = Vec::new();
    while s.clock().now_ms() < 30_000 {
        let before = s.uplink().local().records.len();
        s.tick();
        if s.uplink().local().records.len() > before {
            pushed_at.push(s.clock().now_ms());
        }
    }

    assert!(pushed_at.len() >= 5, "only {} pushes", pushed_at.len());
    for pair in pushed_at.windows(2) {
        let gap = pair[1] - pair[0];
        assert!((5_000..5_500).contains(&gap), "push gap {gap} ms");
    }
}

#[test]
fn upload_payloads_reflect_the_tick() {
    let mut s = powered_on();
    s.hardware_mut().script(Some(120), None, Some(45), 33);
    run_until(&mut s, 15_500);

    let rec = s.uplink().local().records.last().copied().unwrap();
    assert_eq!(rec.front_distance, DistanceReading::Cm(120));
    assert_eq!(rec.left_distance, DistanceReading::NoEcho);
    assert!(rec.power_status);
    assert!(rec.wifi_connected);
    assert_eq!(rec.wifi_strength, -55);

    let fields = s.uplink().cloud().uploads[0];
    assert_eq!(fields.as_array(), [120, 999, 45, 33, 1]);
}

#[test]
fn uploads_skipped_while_disconnected() {
    let mut s = rig_with(MockNet::offline());
    s.boot();
    press_power(&mut s);
    s.tick();

    assert!(s.uplink().local().records.is_empty());
    assert!(s.uplink().cloud().uploads.is_empty());
    assert_eq!(
        upload_events(&s, UplinkTarget::Local).first(),
        Some(&Err(CommsError::NetworkUnavailable))
    );
    assert_eq!(
        upload_events(&s, UplinkTarget::Cloud).first(),
        Some(&Err(CommsError::NetworkUnavailable))
    );
}

#[test]
fn connectivity_polled_every_powered_tick() {
    let mut s = powered_on();
    let before = s.network_mut().polls;
    for _ in 0..4 {
        s.tick();
    }
    assert_eq!(s.network_mut().polls, before + 4);
}

// ── Diagnostics ───────────────────────────────────────────────

#[test]
fn diagnostics_report_every_thirty_seconds() {
    let mut s = powered_on();
    run_until(&mut s, 30_500);

    let reports: Vec<_> = s
        .sink()
        .events
        .iter()
        .filter_map(|e| match e {
            AppEvent::Diagnostics(r) => Some(*r),
            _ => None,
        })
        .collect();
    assert_eq!(reports.len(), 1);
    let r = reports[0];
    assert_eq!(r.uptime_s, 30);
    assert_eq!(r.power, PowerState::On);
    assert_eq!(r.power_cycles, 1);
    assert!(r.link.connected);
    assert!(r.next_local_push_s <= 5);
}
