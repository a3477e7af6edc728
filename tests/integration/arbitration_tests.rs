//! End-to-end alerting: scripted readings through a full tick down to the
//! actuator calls, the display snapshot and the alert events.

use smartcane::alert::directive::{
    AlertLevel, COLOUR_AMBER, COLOUR_CYAN, COLOUR_GRAY, COLOUR_GREEN, COLOUR_PINK, COLOUR_RED,
    ColourLabel,
};
use smartcane::app::events::AppEvent;
use smartcane::fsm::StateId;

use crate::mock_hw::{ActuatorCall, Screen, TestScheduler, booted, press_mode, press_power};

fn sensing() -> TestScheduler {
    let mut s = booted();
    press_power(&mut s);
    s.hardware_mut().clear_calls();
    s
}

fn alerting() -> TestScheduler {
    let mut s = sensing();
    press_mode(&mut s);
    assert_eq!(s.service().state(), StateId::Alerting);
    s.hardware_mut().clear_calls();
    s
}

fn ticks(s: &mut TestScheduler, n: usize) {
    for _ in 0..n {
        s.tick();
    }
}

fn alerts(s: &TestScheduler) -> Vec<(AlertLevel, ColourLabel)> {
    s.sink()
        .events
        .iter()
        .filter_map(|e| match e {
            AppEvent::Alert { level, label, .. } => Some((*level, *label)),
            _ => None,
        })
        .collect()
}

#[test]
fn clear_path_is_green_and_silent() {
    let mut s = sensing();
    s.hardware_mut().script(None, None, None, 30);
    ticks(&mut s, 3);
    let hw = s.hardware();
    assert_eq!(hw.colour(), COLOUR_GREEN);
    assert_eq!(hw.tone(), None);
    assert!(!hw.vibrating());
}

#[test]
fn critical_front_is_red_with_tone_and_vibration() {
    let mut s = sensing();
    s.hardware_mut().script(Some(20), None, None, 30);
    ticks(&mut s, 2);
    let hw = s.hardware();
    assert_eq!(hw.colour(), COLOUR_RED);
    assert_eq!(hw.tone(), Some(2000));
    assert!(hw.vibrating());
    assert_eq!(s.service().directive().level, AlertLevel::Critical);
}

#[test]
fn critical_overrides_side_and_ground_hazards() {
    let mut s = sensing();
    s.hardware_mut().script(Some(10), Some(20), Some(20), 12);
    s.tick();
    assert_eq!(s.hardware().colour(), COLOUR_RED);
    assert_eq!(s.service().directive().label, ColourLabel::Red);
}

#[test]
fn warning_front_is_amber_with_pulsed_tone() {
    let mut s = sensing();
    s.hardware_mut().script(Some(40), None, None, 30);
    s.tick();
    let hw = s.hardware();
    assert_eq!(hw.colour(), COLOUR_AMBER);
    assert!(hw.tones_started().contains(&1500));
    assert!(hw.calls.contains(&ActuatorCall::Vibration(true)));
}

#[test]
fn alerting_mode_warning_bursts_twice() {
    let mut s = alerting();
    s.hardware_mut().script(Some(40), None, None, 30);
    // One tick holds for 50 ms; two 100/50 bursts need 300 ms.
    ticks(&mut s, 1);
    s.hardware_mut().clear_calls();
    ticks(&mut s, 5);
    let bursts = s
        .hardware()
        .calls
        .iter()
        .filter(|c| **c == ActuatorCall::Tone(Some(1500)))
        .count();
    assert!(bursts >= 1);
    assert_eq!(s.hardware().colour(), COLOUR_AMBER);
}

#[test]
fn left_hazard_in_sensing_is_cyan_low_tone_without_vibration() {
    let mut s = sensing();
    s.hardware_mut().script(None, Some(30), None, 30);
    s.tick();
    let hw = s.hardware();
    assert_eq!(hw.colour(), COLOUR_CYAN);
    assert_eq!(hw.tones_started(), vec![1100]);
    assert!(!hw.calls.contains(&ActuatorCall::Vibration(true)));
}

#[test]
fn both_sides_play_left_then_right_and_show_pink() {
    let mut s = sensing();
    s.hardware_mut().script(None, Some(30), Some(30), 30);
    // Left 150 ms, then two 60/40 right pulses: 350 ms total.
    ticks(&mut s, 8);
    let hw = s.hardware();
    assert_eq!(hw.colour(), COLOUR_PINK);
    let tones = hw.tones_started();
    let first_right = tones.iter().position(|hz| *hz == 1300);
    let first_left = tones.iter().position(|hz| *hz == 1100);
    assert!(first_left.is_some());
    assert!(first_right.is_some());
    assert!(first_left < first_right);
}

#[test]
fn side_hazard_in_alerting_buzzes_silently() {
    let mut s = alerting();
    s.hardware_mut().script(None, None, Some(30), 30);
    ticks(&mut s, 3);
    let hw = s.hardware();
    assert_eq!(hw.colour(), COLOUR_PINK);
    assert!(hw.tones_started().is_empty());
    assert!(hw.calls.contains(&ActuatorCall::Vibration(true)));
}

#[test]
fn side_hazards_wait_for_a_clear_front() {
    let mut s = sensing();
    s.hardware_mut().script(Some(45), Some(30), Some(30), 30);
    s.tick();
    assert_eq!(s.hardware().colour(), COLOUR_AMBER);
    assert!(!s.hardware().tones_started().contains(&1100));
}

#[test]
fn drop_off_is_gray_and_silent() {
    let mut s = sensing();
    s.hardware_mut().script(None, None, None, 15);
    s.tick();
    let hw = s.hardware();
    assert_eq!(hw.colour(), COLOUR_GRAY);
    assert_eq!(hw.tone(), None);
    assert!(!hw.vibrating());
}

#[test]
fn hole_reading_stays_green() {
    let mut s = sensing();
    s.hardware_mut().script(None, None, None, 60);
    s.tick();
    assert_eq!(s.hardware().colour(), COLOUR_GREEN);
}

#[test]
fn alert_events_only_on_change() {
    let mut s = sensing();
    s.hardware_mut().script(Some(20), None, None, 30);
    ticks(&mut s, 4);
    s.hardware_mut().script(None, None, None, 30);
    ticks(&mut s, 4);

    let seen = alerts(&s);
    assert_eq!(
        &seen[seen.len() - 2..],
        &[
            (AlertLevel::Critical, ColourLabel::Red),
            (AlertLevel::Clear, ColourLabel::Green),
        ]
    );
}

#[test]
fn display_receives_the_arbitrated_snapshot() {
    let mut s = sensing();
    s.hardware_mut().script(Some(42), None, None, 30);
    s.tick();
    match s.display().last() {
        Some(Screen::Status(snap)) => {
            assert_eq!(snap.label, ColourLabel::Orange);
            assert_eq!(snap.readings.front.cm(), Some(42));
            assert!(snap.is_powered());
        }
        other => panic!("expected status screen, got {other:?}"),
    }
}

#[test]
fn steady_outputs_are_not_rewritten() {
    let mut s = sensing();
    s.hardware_mut().script(Some(20), None, None, 30);
    s.tick();
    s.hardware_mut().clear_calls();
    ticks(&mut s, 5);
    assert!(s.hardware().calls.is_empty());
}
