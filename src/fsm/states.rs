//! Concrete state handler functions and table builder.
//!
//! ```text
//!          ┌────────────[power]────────────┐
//!          ▼                               │
//!        OFF ──[power]──▶ SENSING ◀──[mode]──▶ ALERTING
//!          ▲                                     │
//!          └───────────────[power]───────────────┘
//!
//!  [mode] while OFF is ignored.
//! ```

use super::context::FsmContext;
use super::{InputEvent, OperatingMode, StateDescriptor, StateId};
use crate::app::commands::AppCommand;
use log::{debug, info};

/// Build the static state table.  Called once at startup.
pub fn build_state_table() -> [StateDescriptor; StateId::COUNT] {
    [
        StateDescriptor {
            id: StateId::Off,
            name: "Off",
            on_enter: Some(off_enter),
            on_exit: Some(off_exit),
            on_event: off_event,
        },
        StateDescriptor {
            id: StateId::Sensing,
            name: "Sensing",
            on_enter: Some(sensing_enter),
            on_exit: None,
            on_event: sensing_event,
        },
        StateDescriptor {
            id: StateId::Alerting,
            name: "Alerting",
            on_enter: Some(alerting_enter),
            on_exit: None,
            on_event: alerting_event,
        },
    ]
}

// ═══════════════════════════════════════════════════════════════════════════
//  OFF
// ═══════════════════════════════════════════════════════════════════════════

fn off_enter(ctx: &mut FsmContext) {
    ctx.request(AppCommand::Quiesce);
    info!("OFF: actuators quiescent, sleep screen");
}

fn off_exit(ctx: &mut FsmContext) {
    ctx.power_cycles = ctx.power_cycles.wrapping_add(1);
}

fn off_event(ctx: &mut FsmContext, event: InputEvent) -> Option<StateId> {
    match event {
        InputEvent::PowerPressed => {
            ctx.request(AppCommand::PowerOnCue);
            ctx.request(AppCommand::BootScreen);
            Some(StateId::Sensing)
        }
        InputEvent::ModePressed => {
            debug!("OFF: mode press ignored");
            None
        }
    }
}

// ═══════════════════════════════════════════════════════════════════════════
//  SENSING / ALERTING
// ═══════════════════════════════════════════════════════════════════════════

fn sensing_enter(_ctx: &mut FsmContext) {
    info!("SENSING: ambient tone alerts");
}

fn alerting_enter(_ctx: &mut FsmContext) {
    info!("ALERTING: haptic pattern alerts");
}

fn sensing_event(ctx: &mut FsmContext, event: InputEvent) -> Option<StateId> {
    powered_event(ctx, event, OperatingMode::Sensing)
}

fn alerting_event(ctx: &mut FsmContext, event: InputEvent) -> Option<StateId> {
    powered_event(ctx, event, OperatingMode::Alerting)
}

/// Shared handler for both powered states.
fn powered_event(ctx: &mut FsmContext, event: InputEvent, mode: OperatingMode) -> Option<StateId> {
    match event {
        InputEvent::PowerPressed => {
            ctx.request(AppCommand::Quiesce);
            ctx.request(AppCommand::PowerOffCue);
            Some(StateId::Off)
        }
        InputEvent::ModePressed => {
            let next = mode.toggled();
            ctx.request(AppCommand::ModeCue);
            ctx.request(AppCommand::ModeScreen(next));
            Some(match next {
                OperatingMode::Sensing => StateId::Sensing,
                OperatingMode::Alerting => StateId::Alerting,
            })
        }
    }
}
