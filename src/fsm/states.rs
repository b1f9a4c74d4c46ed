//! Concrete state handler functions and table builder.
//!
//! Each state is defined by three plain `fn` pointers, no closures, no
//! dynamic dispatch.
//!
//! ```text
//!  IDLE ──[trigger]──▶ COUNTING_DOWN ──[remaining = 0]──▶ LOCATING
//!   ▲  ▲                     │                               │
//!   │  └──────[cancel]───────┘                          [fix known]
//!   │                                                         ▼
//!   └──────────────────────[dismiss]─────────────────────── SENT
//! ```

use super::context::AlertContext;
use super::{StateDescriptor, StateId};
use log::{info, warn};

// ═══════════════════════════════════════════════════════════════════════════
//  Table builder
// ═══════════════════════════════════════════════════════════════════════════

/// Build the static state table.  Called once at startup.
pub fn build_state_table() -> [StateDescriptor; StateId::COUNT] {
    [
        // Index 0: Idle
        StateDescriptor {
            id: StateId::Idle,
            name: "Idle",
            on_enter: Some(idle_enter),
            on_exit: None,
            on_update: idle_update,
        },
        // Index 1: CountingDown
        StateDescriptor {
            id: StateId::CountingDown,
            name: "CountingDown",
            on_enter: Some(counting_down_enter),
            on_exit: Some(counting_down_exit),
            on_update: counting_down_update,
        },
        // Index 2: Locating
        StateDescriptor {
            id: StateId::Locating,
            name: "Locating",
            on_enter: Some(locating_enter),
            on_exit: Some(locating_exit),
            on_update: locating_update,
        },
        // Index 3: Sent
        StateDescriptor {
            id: StateId::Sent,
            name: "Sent",
            on_enter: Some(sent_enter),
            on_exit: Some(sent_exit),
            on_update: sent_update,
        },
    ]
}

// ═══════════════════════════════════════════════════════════════════════════
//  IDLE state
// ═══════════════════════════════════════════════════════════════════════════

fn idle_enter(ctx: &mut AlertContext) {
    ctx.outputs.countdown_armed = false;
    ctx.outputs.request_location = false;
    ctx.remaining_secs = 0;
    ctx.fix = None;
}

fn idle_update(ctx: &mut AlertContext) -> Option<StateId> {
    if ctx.inputs.trigger {
        return Some(StateId::CountingDown);
    }
    None
}

// ═══════════════════════════════════════════════════════════════════════════
//  COUNTING_DOWN state: panel visible, one tick per second
// ═══════════════════════════════════════════════════════════════════════════

fn counting_down_enter(ctx: &mut AlertContext) {
    ctx.remaining_secs = ctx.countdown_secs;
    ctx.outputs.countdown_armed = true;
    warn!("COUNTDOWN: alert in {}s unless cancelled", ctx.remaining_secs);
}

fn counting_down_exit(ctx: &mut AlertContext) {
    ctx.outputs.countdown_armed = false;
}

fn counting_down_update(ctx: &mut AlertContext) -> Option<StateId> {
    // Cancel wins over a tick latched in the same step.
    if ctx.inputs.cancel {
        info!("COUNTDOWN: cancelled with {}s left", ctx.remaining_secs);
        return Some(StateId::Idle);
    }

    if ctx.inputs.second_elapsed {
        ctx.remaining_secs = ctx.remaining_secs.saturating_sub(1);
        if ctx.remaining_secs == 0 {
            return Some(StateId::Locating);
        }
    }

    None
}

// ═══════════════════════════════════════════════════════════════════════════
//  LOCATING state: waiting on geolocation
// ═══════════════════════════════════════════════════════════════════════════

fn locating_enter(ctx: &mut AlertContext) {
    ctx.outputs.request_location = true;
    info!("LOCATING: requesting current position");
}

fn locating_exit(ctx: &mut AlertContext) {
    ctx.outputs.request_location = false;
}

fn locating_update(ctx: &mut AlertContext) -> Option<StateId> {
    ctx.fix.map(|_| StateId::Sent)
}

// ═══════════════════════════════════════════════════════════════════════════
//  SENT state: alert panel visible until dismissed
// ═══════════════════════════════════════════════════════════════════════════

fn sent_enter(ctx: &mut AlertContext) {
    warn!("SENT: emergency alert dispatched ({:?})", ctx.fix);
}

fn sent_exit(ctx: &mut AlertContext) {
    ctx.fix = None;
}

fn sent_update(ctx: &mut AlertContext) -> Option<StateId> {
    if ctx.inputs.dismiss {
        return Some(StateId::Idle);
    }
    None
}
