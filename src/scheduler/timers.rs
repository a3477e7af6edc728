//! Interval timers for the periodic background tasks.
//!
//! A fixed bank of slots, each firing when `now - last >= interval`.  The
//! last-fired stamp starts at zero, so the first fire happens one interval
//! after boot, and it is reset on every fire regardless of what the task
//! then does.  All arithmetic wraps with the millisecond clock.

use heapless::Vec;
use log::info;

/// Maximum number of concurrent timers (stack-allocated).
pub const MAX_TIMERS: usize = 4;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ScheduledTask {
    LocalPush,
    CloudUpload,
    Diagnostics,
}

#[derive(Debug, Clone)]
struct IntervalTimer {
    task: ScheduledTask,
    interval_ms: u32,
    last_ms: u32,
}

/// Tasks that came due on one check.
pub type DueTasks = Vec<ScheduledTask, MAX_TIMERS>;

pub struct TimerBank {
    slots: [Option<IntervalTimer>; MAX_TIMERS],
}

impl TimerBank {
    pub fn new() -> Self {
        Self {
            slots: [None, None, None, None],
        }
    }

    /// Add a timer.  Returns the slot index, or `None` if full.
    pub fn add(&mut self, task: ScheduledTask, label: &'static str, interval_ms: u32) -> Option<usize> {
        for (i, slot) in self.slots.iter_mut().enumerate() {
            if slot.is_none() {
                info!("Timers: added '{}' every {} ms at slot {}", label, interval_ms, i);
                *slot = Some(IntervalTimer {
                    task,
                    interval_ms,
                    last_ms: 0,
                });
                return Some(i);
            }
        }
        None // All slots full.
    }

    /// Collect every timer that is due at `now_ms` and restart it.
    pub fn poll(&mut self, now_ms: u32) -> DueTasks {
        let mut due = DueTasks::new();
        for t in self.slots.iter_mut().flatten() {
            if now_ms.wrapping_sub(t.last_ms) >= t.interval_ms {
                t.last_ms = now_ms;
                let _ = due.push(t.task);
            }
        }
        due
    }

    /// Time left until `task` next fires.
    pub fn remaining_ms(&self, task: ScheduledTask, now_ms: u32) -> Option<u32> {
        self.slots
            .iter()
            .flatten()
            .find(|t| t.task == task)
            .map(|t| t.interval_ms.saturating_sub(now_ms.wrapping_sub(t.last_ms)))
    }
}

impl Default for TimerBank {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn bank() -> TimerBank {
        let mut b = TimerBank::new();
        b.add(ScheduledTask::LocalPush, "local", 5_000).unwrap();
        b.add(ScheduledTask::CloudUpload, "cloud", 15_000).unwrap();
        b
    }

    #[test]
    fn nothing_due_before_first_interval() {
        let mut b = bank();
        assert!(b.poll(4_999).is_empty());
    }

    #[test]
    fn fires_at_interval_and_resets() {
        let mut b = bank();
        assert_eq!(b.poll(5_000).as_slice(), &[ScheduledTask::LocalPush]);
        assert!(b.poll(9_999).is_empty());
        assert_eq!(b.poll(10_000).as_slice(), &[ScheduledTask::LocalPush]);
    }

    #[test]
    fn both_due_together() {
        let mut b = bank();
        let due = b.poll(15_000);
        assert_eq!(due.as_slice(), &[ScheduledTask::LocalPush, ScheduledTask::CloudUpload]);
    }

    #[test]
    fn late_check_fires_once() {
        let mut b = bank();
        assert_eq!(b.poll(17_300).len(), 2);
        assert!(b.poll(17_400).is_empty());
        assert_eq!(b.remaining_ms(ScheduledTask::LocalPush, 20_300), Some(2_000));
    }

    #[test]
    fn unknown_task_has_no_remaining_time() {
        let b = bank();
        assert_eq!(b.remaining_ms(ScheduledTask::Diagnostics, 1_000), None);
    }

    #[test]
    fn bank_capacity() {
        let mut b = TimerBank::new();
        for _ in 0..MAX_TIMERS {
            assert!(b.add(ScheduledTask::Diagnostics, "diag", 1).is_some());
        }
        assert!(b.add(ScheduledTask::Diagnostics, "diag", 1).is_none());
    }
}
