//! Text status display adapter.
//!
//! Implements [`DisplayPort`] as a four-line text layout pushed to the
//! serial log.  The layout itself is a pure function of the snapshot so
//! a glyph-rendering panel driver can reuse it line for line.
//!
//! ```text
//!  ┌────────────────────┐
//!  │ ON  M1:SEN         │  power, mode
//!  │ F:42cm WARN        │  front distance + STOP / WARN
//!  │ L:30 R:--- GRND    │  sides + GRND / HOLE!
//!  │ IR:33cm GRN        │  ground clearance + active colour
//!  └────────────────────┘
//! ```
//!
//! Static screens are logged once on entry; the status screen is logged
//! only when its text changes.

use core::fmt::Write;

use heapless::String;
use log::{debug, info};

use crate::app::ports::DisplayPort;
use crate::app::snapshot::SystemSnapshot;
use crate::config::SystemConfig;
use crate::fsm::OperatingMode;
use crate::sensors::{DistanceReading, GroundZone};

pub const LINE_WIDTH: usize = 24;
pub type Line = String<LINE_WIDTH>;
pub type Layout = [Line; 4];

#[derive(Debug, Clone, PartialEq, Eq)]
enum Screen {
    Welcome,
    Sleep,
    Boot,
    Mode(OperatingMode),
    Status(Layout),
}

/// Thresholds the layout annotates against.
#[derive(Debug, Clone, Copy)]
pub struct LayoutThresholds {
    pub danger_cm: u16,
    pub warn_cm: u16,
    pub ground_cm: u16,
    pub hole_cm: u16,
}

impl From<&SystemConfig> for LayoutThresholds {
    fn from(c: &SystemConfig) -> Self {
        Self {
            danger_cm: c.danger_dist_cm,
            warn_cm: c.warn_dist_cm,
            ground_cm: c.ground_threshold_cm,
            hole_cm: c.hole_threshold_cm,
        }
    }
}

/// Build the four status lines.  Text that would overflow a line is cut.
pub fn layout(snapshot: &SystemSnapshot, t: LayoutThresholds) -> Layout {
    let r = &snapshot.readings;
    let mut lines: Layout = Default::default();

    let power = if snapshot.is_powered() { "ON " } else { "OFF" };
    let _ = write!(
        lines[0],
        "{} M{}:{}",
        power,
        snapshot.mode.code(),
        snapshot.mode.short_name()
    );

    let _ = write!(lines[1], "F:");
    push_distance(&mut lines[1], r.front, true);
    if r.front.within(t.danger_cm) {
        let _ = write!(lines[1], " STOP");
    } else if r.front.within(t.warn_cm) {
        let _ = write!(lines[1], " WARN");
    }

    let _ = write!(lines[2], "L:");
    push_distance(&mut lines[2], r.left, false);
    let _ = write!(lines[2], " R:");
    push_distance(&mut lines[2], r.right, false);
    match r.ground.zone(t.ground_cm, t.hole_cm) {
        GroundZone::DropOff => {
            let _ = write!(lines[2], " GRND");
        }
        GroundZone::Hole => {
            let _ = write!(lines[2], " HOLE!");
        }
        GroundZone::Normal => {}
    }

    let _ = write!(lines[3], "IR:");
    if r.ground.cm() >= crate::config::GROUND_MAX_CM {
        let _ = write!(lines[3], "---");
    } else {
        let _ = write!(lines[3], "{}cm", r.ground.cm());
    }
    let _ = write!(lines[3], " {}", snapshot.label.as_str());

    lines
}

fn push_distance(line: &mut Line, d: DistanceReading, unit: bool) {
    let _ = match d.cm() {
        Some(cm) if unit => write!(line, "{}cm", cm),
        Some(cm) => write!(line, "{}", cm),
        None => write!(line, "---"),
    };
}

// ───────────────────────────────────────────────────────────────
// Log-backed display
// ───────────────────────────────────────────────────────────────

pub struct LogDisplay {
    thresholds: LayoutThresholds,
    current: Option<Screen>,
    /// Status frames actually emitted.
    frames: u32,
}

impl LogDisplay {
    pub fn new(config: &SystemConfig) -> Self {
        Self {
            thresholds: LayoutThresholds::from(config),
            current: None,
            frames: 0,
        }
    }

    /// Text of the status screen currently shown, if any.
    pub fn status_lines(&self) -> Option<&Layout> {
        match &self.current {
            Some(Screen::Status(lines)) => Some(lines),
            _ => None,
        }
    }

    pub fn frames(&self) -> u32 {
        self.frames
    }

    fn enter(&mut self, screen: Screen, text: &str) {
        if self.current.as_ref() != Some(&screen) {
            info!("OLED | {}", text);
            self.current = Some(screen);
        }
    }
}

impl DisplayPort for LogDisplay {
    fn show_welcome(&mut self) {
        self.enter(Screen::Welcome, "SMART CANE | press POWER");
    }

    fn show_sleep(&mut self) {
        self.enter(Screen::Sleep, "POWER OFF | press to start");
    }

    fn show_boot(&mut self) {
        self.enter(Screen::Boot, "POWER ON | system ready");
    }

    fn show_mode(&mut self, mode: OperatingMode) {
        self.enter(Screen::Mode(mode), if mode == OperatingMode::Sensing { "MODE 1" } else { "MODE 2" });
    }

    fn render(&mut self, snapshot: &SystemSnapshot) {
        let lines = layout(snapshot, self.thresholds);
        if self.status_lines() == Some(&lines) {
            return;
        }
        debug!("OLED | {} | {} | {} | {}", lines[0], lines[1], lines[2], lines[3]);
        self.frames += 1;
        self.current = Some(Screen::Status(lines));
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::alert::directive::{AlertLevel, ColourLabel};
    use crate::fsm::PowerState;
    use crate::sensors::{GroundClearance, SensorReadings};

    fn snap(front: DistanceReading, ground: u16, label: ColourLabel) -> SystemSnapshot {
        SystemSnapshot {
            power: PowerState::On,
            mode: OperatingMode::Sensing,
            readings: SensorReadings {
                front,
                left: DistanceReading::Cm(30),
                right: DistanceReading::NoEcho,
                ground: GroundClearance::new(ground),
            },
            level: AlertLevel::Clear,
            label,
        }
    }

    fn thresholds() -> LayoutThresholds {
        LayoutThresholds::from(&SystemConfig::default())
    }

    #[test]
    fn warning_layout() {
        let l = layout(&snap(DistanceReading::Cm(42), 33, ColourLabel::Orange), thresholds());
        assert_eq!(l[0].as_str(), "ON  M1:SEN");
        assert_eq!(l[1].as_str(), "F:42cm WARN");
        assert_eq!(l[2].as_str(), "L:30 R:---");
        assert_eq!(l[3].as_str(), "IR:33cm ORN");
    }

    #[test]
    fn stop_and_drop_off() {
        let l = layout(&snap(DistanceReading::Cm(20), 12, ColourLabel::Red), thresholds());
        assert_eq!(l[1].as_str(), "F:20cm STOP");
        assert_eq!(l[2].as_str(), "L:30 R:--- GRND");
    }

    #[test]
    fn far_ground_and_no_echo() {
        let l = layout(&snap(DistanceReading::NoEcho, 80, ColourLabel::Green), thresholds());
        assert_eq!(l[1].as_str(), "F:---");
        assert_eq!(l[2].as_str(), "L:30 R:--- HOLE!");
        assert_eq!(l[3].as_str(), "IR:--- GRN");
    }

    #[test]
    fn identical_frames_are_not_reemitted() {
        let mut d = LogDisplay::new(&SystemConfig::default());
        let s = snap(DistanceReading::Cm(100), 50, ColourLabel::Green);
        d.render(&s);
        d.render(&s);
        assert_eq!(d.frames(), 1);
        d.show_sleep();
        assert!(d.status_lines().is_none());
        d.render(&s);
        assert_eq!(d.frames(), 2);
    }
}
