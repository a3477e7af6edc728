//! Context threaded through every FSM handler.
//!
//! Handlers are pure: rather than driving actuators they append
//! [`AppCommand`]s here, and the application service drains and executes
//! them after the dispatch returns.

use heapless::Vec;
use log::warn;

use crate::app::commands::AppCommand;

/// Upper bound on commands a single dispatch can queue
/// (power-off queues three).
pub const MAX_PENDING_COMMANDS: usize = 4;

#[derive(Debug, Default)]
pub struct FsmContext {
    pending: Vec<AppCommand, MAX_PENDING_COMMANDS>,
    /// Times the cane has been switched on since boot.
    pub power_cycles: u32,
}

impl FsmContext {
    pub fn new() -> Self {
        Self::default()
    }

    /// Queue a side effect for the service to run after this dispatch.
    pub fn request(&mut self, cmd: AppCommand) {
        if self.pending.push(cmd).is_err() {
            warn!("FSM: command queue full, dropping {:?}", cmd);
        }
    }

    /// Drain everything queued so far, in request order.
    pub fn take_commands(&mut self) -> Vec<AppCommand, MAX_PENDING_COMMANDS> {
        core::mem::take(&mut self.pending)
    }
}
