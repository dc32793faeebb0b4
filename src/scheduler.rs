//! Cooperative task cadence table.
//!
//! Every periodic job in the control loop is a [`Task`] with its own
//! interval and last-fire timestamp.  Nothing here sleeps: the dispatcher
//! asks "is this due?" against a wrapping millisecond clock and runs the
//! task to completion when it is.
//!
//! ```text
//!   poll(now)
//!     │
//!     ▼
//!   MainDispatch due? ──no──▶ return
//!     │ yes
//!     ├──▶ ButtonScan due?     → scan + debounce
//!     ├──▶ (state evaluation, every dispatch)
//!     ├──▶ LevelUpdate due?    → smooth + map + LEDs
//!     ├──▶ DisplayRender due?  → render
//!     └──▶ Diagnostics due?    → report
//! ```
//!
//! In error mode `ErrorBlink` and `ErrorAnnounce` replace the normal
//! sub-tasks.

use crate::config::SystemConfig;

// ═══════════════════════════════════════════════════════════════
//  Task identity
// ═══════════════════════════════════════════════════════════════

/// A periodic job owned by the dispatcher.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(u8)]
pub enum Task {
    MainDispatch = 0,
    ButtonScan = 1,
    LevelUpdate = 2,
    DisplayRender = 3,
    Diagnostics = 4,
    ErrorBlink = 5,
    ErrorAnnounce = 6,
}

impl Task {
    pub const COUNT: usize = 7;
    pub const ALL: [Task; Task::COUNT] = [
        Task::MainDispatch,
        Task::ButtonScan,
        Task::LevelUpdate,
        Task::DisplayRender,
        Task::Diagnostics,
        Task::ErrorBlink,
        Task::ErrorAnnounce,
    ];
}

// ═══════════════════════════════════════════════════════════════
//  Schedule
// ═══════════════════════════════════════════════════════════════

#[derive(Debug, Clone, Copy)]
struct TaskSlot {
    interval_ms: u32,
    last_fired_ms: u32,
    runs: u32,
}

/// Interval and last-fire bookkeeping for every [`Task`].
#[derive(Debug, Clone)]
pub struct TaskSchedule {
    slots: [TaskSlot; Task::COUNT],
}

impl TaskSchedule {
    /// Build the table from configuration.  All tasks start with
    /// `last_fired = 0`; call [`reset`](Self::reset) to anchor them to
    /// the real start time.
    pub fn new(config: &SystemConfig) -> Self {
        let interval = |task: Task| match task {
            Task::MainDispatch => config.main_tick_ms,
            Task::ButtonScan => config.button_scan_ms,
            // The error pattern steps on the LED cadence.
            Task::LevelUpdate | Task::ErrorBlink => config.led_update_ms,
            Task::DisplayRender => config.display_update_ms,
            Task::Diagnostics => config.diagnostics_interval_ms,
            Task::ErrorAnnounce => config.error_announce_ms,
        };
        Self {
            slots: Task::ALL.map(|task| TaskSlot {
                interval_ms: interval(task).max(1),
                last_fired_ms: 0,
                runs: 0,
            }),
        }
    }

    /// Mark every task as having just fired at `now_ms`.
    pub fn reset(&mut self, now_ms: u32) {
        for slot in &mut self.slots {
            slot.last_fired_ms = now_ms;
        }
    }

    /// Whether at least one interval has elapsed since `task` last fired.
    /// Wrapping-safe across the `u32` rollover.
    pub fn is_due(&self, task: Task, now_ms: u32) -> bool {
        let slot = &self.slots[task as usize];
        now_ms.wrapping_sub(slot.last_fired_ms) >= slot.interval_ms
    }

    /// If `task` is due, record it as fired at `now_ms` and return `true`.
    ///
    /// Missed periods are not replayed: after a stall the task fires once
    /// and its phase restarts from `now_ms`.
    pub fn fire_if_due(&mut self, task: Task, now_ms: u32) -> bool {
        if !self.is_due(task, now_ms) {
            return false;
        }
        let slot = &mut self.slots[task as usize];
        slot.last_fired_ms = now_ms;
        slot.runs = slot.runs.wrapping_add(1);
        true
    }

    pub fn interval_ms(&self, task: Task) -> u32 {
        self.slots[task as usize].interval_ms
    }

    pub fn last_fired_ms(&self, task: Task) -> u32 {
        self.slots[task as usize].last_fired_ms
    }

    /// How many times `task` has fired.
    pub fn runs(&self, task: Task) -> u32 {
        self.slots[task as usize].runs
    }
}
