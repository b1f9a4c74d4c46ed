//! Timer engine.
//!
//! Drives the two time-based activities of the monitor: the self-rearming
//! sound poll and the one-second countdown tick.  The scheduler knows
//! nothing about either; when a timer fires it notifies a
//! [`TimerDelegate`], and the [`MonitorService`] decides what the firing
//! means.
//!
//! ```text
//!  ┌───────────────┐      ┌───────────────┐
//!  │  Sound poll   │      │ Countdown tick│
//!  │  (one-shot,   │      │  (periodic)   │
//!  │   re-armed)   │      │               │
//!  └───────┬───────┘      └───────┬───────┘
//!          ▼                      ▼
//!  ┌──────────────────────────────────────┐
//!  │            TimerDelegate             │
//!  └──────────────────┬───────────────────┘
//!                     ▼
//!           MonitorService.advance()
//! ```
//!
//! [`MonitorService`]: crate::app::service::MonitorService

use std::cell::Cell;
use std::rc::Rc;

use log::debug;

// ═══════════════════════════════════════════════════════════════
//  Timer types
// ═══════════════════════════════════════════════════════════════

/// Identity of a timer.  At most one timer per id is armed at a time.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TimerId {
    /// Next sound-level evaluation.
    SoundPoll,
    /// One countdown second elapsed.
    CountdownTick,
}

/// How a timer fires.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TimerKind {
    /// Fire every `interval_ms` until cancelled.
    Periodic { interval_ms: u32 },
    /// Fire once after `delay_ms`, then disarm.
    OneShot { delay_ms: u32 },
}

/// A timer to arm.
#[derive(Debug, Clone, Copy)]
pub struct Timer {
    pub id: TimerId,
    pub kind: TimerKind,
}

/// Callback the scheduler invokes for every firing.
pub trait TimerDelegate {
    fn on_timer_fired(&mut self, id: TimerId);
}

// ═══════════════════════════════════════════════════════════════
//  Scheduler engine
// ═══════════════════════════════════════════════════════════════

/// Maximum number of concurrently armed timers (stack-allocated).
const MAX_TIMERS: usize = 4;

#[derive(Debug, Clone)]
struct TimerEntry {
    timer: Timer,
    /// Milliseconds since arming or since the last periodic fire.
    elapsed_ms: u64,
}

/// Fixed-capacity timer table advanced by elapsed wall time.
pub struct Scheduler {
    timers: [Option<TimerEntry>; MAX_TIMERS],
}

impl Default for Scheduler {
    fn default() -> Self {
        Self::new()
    }
}

impl Scheduler {
    pub fn new() -> Self {
        Self {
            timers: [None, None, None, None],
        }
    }

    /// Arm a timer.  An already-armed timer with the same id is replaced
    /// and starts counting from zero.  Returns `false` if the table is full.
    pub fn arm(&mut self, timer: Timer) -> bool {
        let entry = TimerEntry {
            timer,
            elapsed_ms: 0,
        };
        if let Some(slot) = self
            .timers
            .iter_mut()
            .find(|s| s.as_ref().is_some_and(|e| e.timer.id == timer.id))
        {
            *slot = Some(entry);
            return true;
        }
        for slot in &mut self.timers {
            if slot.is_none() {
                debug!("Scheduler: armed {:?} ({:?})", timer.id, timer.kind);
                *slot = Some(entry);
                return true;
            }
        }
        false
    }

    /// Disarm a timer.  Returns `true` if it was armed.
    pub fn cancel(&mut self, id: TimerId) -> bool {
        for slot in &mut self.timers {
            if slot.as_ref().is_some_and(|e| e.timer.id == id) {
                debug!("Scheduler: cancelled {:?}", id);
                *slot = None;
                return true;
            }
        }
        false
    }

    pub fn is_armed(&self, id: TimerId) -> bool {
        self.timers
            .iter()
            .any(|s| s.as_ref().is_some_and(|e| e.timer.id == id))
    }

    /// Number of armed timers.
    pub fn armed_count(&self) -> usize {
        self.timers.iter().filter(|s| s.is_some()).count()
    }

    /// Advance every armed timer by `elapsed_ms`.
    ///
    /// A periodic timer fires once per whole interval covered, so a single
    /// large step does not swallow ticks.  One-shot timers disarm after
    /// firing.
    pub fn tick(&mut self, elapsed_ms: u64, delegate: &mut dyn TimerDelegate) {
        for slot in &mut self.timers {
            let Some(entry) = slot.as_mut() else {
                continue;
            };
            entry.elapsed_ms += elapsed_ms;
            let kind = entry.timer.kind;

            match kind {
                TimerKind::Periodic { interval_ms } => {
                    let interval = u64::from(interval_ms.max(1));
                    while entry.elapsed_ms >= interval {
                        entry.elapsed_ms -= interval;
                        delegate.on_timer_fired(entry.timer.id);
                    }
                }
                TimerKind::OneShot { delay_ms } => {
                    if entry.elapsed_ms >= u64::from(delay_ms) {
                        let id = entry.timer.id;
                        *slot = None;
                        delegate.on_timer_fired(id);
                    }
                }
            }
        }
    }
}

// ═══════════════════════════════════════════════════════════════
//  Cooperative cancellation
// ═══════════════════════════════════════════════════════════════

/// Shared cancellation flag for a self-rearming task.
///
/// The owner keeps one clone and cancels it; the task checks its clone at
/// the top of every cycle.  Cancellation is never undone; a restarted task
/// gets a fresh token.
#[derive(Debug, Clone, Default)]
pub struct CancelToken {
    cancelled: Rc<Cell<bool>>,
}

impl CancelToken {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn cancel(&self) {
        self.cancelled.set(true);
    }

    pub fn is_cancelled(&self) -> bool {
        self.cancelled.get()
    }
}

// ═══════════════════════════════════════════════════════════════
//  Tests
// ═══════════════════════════════════════════════════════════════
