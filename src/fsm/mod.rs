//! Function-pointer finite state machine for power and operating mode.
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────┐
//! │  StateTable                                             │
//! │  ┌──────────┬───────────┬──────────┬─────────────────┐  │
//! │  │ StateId  │ on_enter  │ on_exit  │ on_event        │  │
//! │  ├──────────┼───────────┼──────────┼─────────────────┤  │
//! │  │ Off      │ fn(ctx)   │ fn(ctx)  │ fn(ctx,ev)->Opt │  │
//! │  │ Sensing  │ fn(ctx)   │ fn(ctx)  │ fn(ctx,ev)->Opt │  │
//! │  │ Alerting │ fn(ctx)   │ fn(ctx)  │ fn(ctx,ev)->Opt │  │
//! │  └──────────┴───────────┴──────────┴─────────────────┘  │
//! └─────────────────────────────────────────────────────────┘
//! ```
//!
//! The machine only moves on confirmed button presses.  Each dispatch calls
//! `on_event` for the **current** state; a `Some(next)` result runs
//! `on_exit(current)` then `on_enter(next)`.  Handlers never touch
//! hardware: they queue [`AppCommand`](crate::app::commands::AppCommand)s
//! in the [`FsmContext`] which the application service executes afterwards.

pub mod context;
pub mod states;

use context::FsmContext;
use log::info;
use serde::{Serialize, Serializer};

// ---------------------------------------------------------------------------
// Domain enums
// ---------------------------------------------------------------------------

/// How hazards are signalled while the cane is on.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OperatingMode {
    /// Ambient tones and colours.
    Sensing,
    /// Pattern-based haptic bursts.
    Alerting,
}

impl OperatingMode {
    /// Integer code used on the wire and on the display (`M1` / `M2`).
    pub fn code(self) -> u8 {
        match self {
            Self::Sensing => 1,
            Self::Alerting => 2,
        }
    }

    pub fn short_name(self) -> &'static str {
        match self {
            Self::Sensing => "SEN",
            Self::Alerting => "ALT",
        }
    }

    pub fn toggled(self) -> Self {
        match self {
            Self::Sensing => Self::Alerting,
            Self::Alerting => Self::Sensing,
        }
    }
}

impl Serialize for OperatingMode {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_u8(self.code())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PowerState {
    Off,
    On,
}

/// Debounced user input.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InputEvent {
    PowerPressed,
    ModePressed,
}

// ---------------------------------------------------------------------------
// State identity
// ---------------------------------------------------------------------------

/// Must stay in sync with the table built in [`states::build_state_table`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[repr(u8)]
pub enum StateId {
    Off = 0,
    Sensing = 1,
    Alerting = 2,
}

impl StateId {
    pub const COUNT: usize = 3;

    /// Out-of-range indices fall back to `Off` (actuators quiescent).
    pub fn from_index(idx: usize) -> Self {
        match idx {
            0 => Self::Off,
            1 => Self::Sensing,
            2 => Self::Alerting,
            _ => {
                debug_assert!(false, "invalid state index: {idx}");
                Self::Off
            }
        }
    }

    pub fn power(self) -> PowerState {
        match self {
            Self::Off => PowerState::Off,
            Self::Sensing | Self::Alerting => PowerState::On,
        }
    }

    /// Operating mode while powered; `None` when off.
    pub fn mode(self) -> Option<OperatingMode> {
        match self {
            Self::Off => None,
            Self::Sensing => Some(OperatingMode::Sensing),
            Self::Alerting => Some(OperatingMode::Alerting),
        }
    }
}

// ---------------------------------------------------------------------------
// Function-pointer type aliases
// ---------------------------------------------------------------------------

/// Signature for `on_enter` and `on_exit` actions.
pub type StateActionFn = fn(&mut FsmContext);

/// Signature for the input handler.
/// Returns `Some(next)` to trigger a transition, or `None` to stay.
pub type StateEventFn = fn(&mut FsmContext, InputEvent) -> Option<StateId>;

// ---------------------------------------------------------------------------
// State descriptor (one row in the table)
// ---------------------------------------------------------------------------

pub struct StateDescriptor {
    pub id: StateId,
    pub name: &'static str,
    pub on_enter: Option<StateActionFn>,
    pub on_exit: Option<StateActionFn>,
    pub on_event: StateEventFn,
}

// ---------------------------------------------------------------------------
// FSM engine
// ---------------------------------------------------------------------------

pub struct Fsm {
    /// Fixed-size table indexed by `StateId as usize`.
    table: [StateDescriptor; StateId::COUNT],
    current: usize,
    /// Completed transitions since start.
    transitions: u32,
}

impl Fsm {
    pub fn new(table: [StateDescriptor; StateId::COUNT], initial: StateId) -> Self {
        Self {
            table,
            current: initial as usize,
            transitions: 0,
        }
    }

    /// Run the initial `on_enter` for the starting state.
    /// Call once after construction, before the first dispatch.
    pub fn start(&mut self, ctx: &mut FsmContext) {
        info!("FSM starting in state: {}", self.table[self.current].name);
        if let Some(enter) = self.table[self.current].on_enter {
            enter(ctx);
        }
    }

    /// Feed one input to the current state.  Returns the new state if the
    /// input caused a transition.
    pub fn dispatch(&mut self, event: InputEvent, ctx: &mut FsmContext) -> Option<StateId> {
        let next = (self.table[self.current].on_event)(ctx, event)?;
        self.transition(next, ctx);
        Some(next)
    }

    pub fn current_state(&self) -> StateId {
        StateId::from_index(self.current)
    }

    pub fn transitions(&self) -> u32 {
        self.transitions
    }

    fn transition(&mut self, next_id: StateId, ctx: &mut FsmContext) {
        let next_idx = next_id as usize;

        info!(
            "FSM transition: {} -> {}",
            self.table[self.current].name, self.table[next_idx].name
        );

        if let Some(exit) = self.table[self.current].on_exit {
            exit(ctx);
        }

        self.current = next_idx;
        self.transitions = self.transitions.wrapping_add(1);

        if let Some(enter) = self.table[self.current].on_enter {
            enter(ctx);
        }
    }
}


#[cfg(test)]
mod proptests {
    use super::context::FsmContext;
    use super::*;
    use proptest::prelude::*;

    fn arb_event() -> impl Strategy<Value = InputEvent> {
        prop_oneof![Just(InputEvent::PowerPressed), Just(InputEvent::ModePressed)]
    }

    proptest! {
        #[test]
        fn mode_presses_never_change_power(events in proptest::collection::vec(arb_event(), 1..64)) {
            let mut fsm = Fsm::new(states::build_state_table(), StateId::Off);
            let mut ctx = FsmContext::new();
            fsm.start(&mut ctx);

            for ev in events {
                let before = fsm.current_state();
                fsm.dispatch(ev, &mut ctx);
                ctx.take_commands();
                let after = fsm.current_state();
                if ev == InputEvent::ModePressed {
                    prop_assert_eq!(before.power(), after.power());
                    if before == StateId::Off {
                        prop_assert_eq!(after, StateId::Off);
                    }
                } else {
                    prop_assert_ne!(before.power(), after.power());
                }
            }
        }
    }
}
