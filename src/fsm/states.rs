//! Concrete state handler functions and table builder.
//!
//! Each state is defined by plain `fn` pointers: no closures, no dynamic
//! dispatch, no heap.
//!
//! ```text
//!  STANDBY ──[UP]──▶ ACTIVE ──[DOWN]──▶ MUTED
//!  STANDBY ◀──[UP]── ACTIVE ◀──[DOWN]── MUTED
//!  STANDBY ◀────────────[UP]─────────── MUTED
//!
//!  LEFT / RIGHT: ignored in every state
//! ```

use super::context::FsmContext;
use super::{StateDescriptor, StateId};
use crate::drivers::button::Button;
use log::{debug, info};

// ═══════════════════════════════════════════════════════════════════════════
//  Table builder
// ═══════════════════════════════════════════════════════════════════════════

/// Build the static state table.  Called once at startup.
pub fn build_state_table() -> [StateDescriptor; StateId::COUNT] {
    [
        // Index 0: Standby
        StateDescriptor {
            id: StateId::Standby,
            on_enter: Some(standby_enter),
            on_exit: None,
            on_edge: standby_edge,
        },
        // Index 1: Active
        StateDescriptor {
            id: StateId::Active,
            on_enter: Some(active_enter),
            on_exit: Some(active_exit),
            on_edge: active_edge,
        },
        // Index 2: Muted
        StateDescriptor {
            id: StateId::Muted,
            on_enter: Some(muted_enter),
            on_exit: None,
            on_edge: muted_edge,
        },
    ]
}

fn request_mute(ctx: &mut FsmContext, muted: bool) {
    ctx.commands.output_muted = Some(muted);
    ctx.entries = ctx.entries.wrapping_add(1);
}

// ═══════════════════════════════════════════════════════════════════════════
//  STANDBY: output muted, waiting for the user
// ═══════════════════════════════════════════════════════════════════════════

fn standby_enter(ctx: &mut FsmContext) {
    request_mute(ctx, true);
    info!("STANDBY: output muted");
}

fn standby_edge(_ctx: &mut FsmContext, button: Button) -> Option<StateId> {
    match button {
        Button::Up => Some(StateId::Active),
        Button::Down | Button::Left | Button::Right => None,
    }
}

// ═══════════════════════════════════════════════════════════════════════════
//  ACTIVE: loopback live
// ═══════════════════════════════════════════════════════════════════════════

fn active_enter(ctx: &mut FsmContext) {
    request_mute(ctx, false);
    info!("ACTIVE: loopback enabled");
}

fn active_exit(_ctx: &mut FsmContext) {
    debug!("ACTIVE: leaving loopback");
}

fn active_edge(_ctx: &mut FsmContext, button: Button) -> Option<StateId> {
    match button {
        Button::Up => Some(StateId::Standby),
        Button::Down => Some(StateId::Muted),
        Button::Left | Button::Right => None,
    }
}

// ═══════════════════════════════════════════════════════════════════════════
//  MUTED: output silenced, input still metered
// ═══════════════════════════════════════════════════════════════════════════

fn muted_enter(ctx: &mut FsmContext) {
    request_mute(ctx, true);
    info!("MUTED: output silenced, input metering continues");
}

fn muted_edge(_ctx: &mut FsmContext, button: Button) -> Option<StateId> {
    match button {
        Button::Up => Some(StateId::Standby),
        Button::Down => Some(StateId::Active),
        Button::Left | Button::Right => None,
    }
}
