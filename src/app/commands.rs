//! Side-effect commands queued by the FSM.
//!
//! State handlers stay free of I/O; they describe what must happen on a
//! transition and the [`AppService`](super::service::AppService) executes
//! these against the actuator and display ports, in order.

use crate::fsm::OperatingMode;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AppCommand {
    /// Power-on cue: three green blinks, then a rising two-tone chirp.
    PowerOnCue,
    /// Power-off cue: red, blue, then a low tone with a vibration tick.
    PowerOffCue,
    /// Dual-tone mode acknowledgement.
    ModeCue,
    /// Hold the boot screen.
    BootScreen,
    /// Hold the transient screen announcing the new mode.
    ModeScreen(OperatingMode),
    /// Force every actuator off and drop any in-flight pulse pattern.
    Quiesce,
}
