//! Function-pointer finite state machine engine.
//!
//! Classic embedded FSM pattern ported to Rust:
//!
//! ```text
//! ┌──────────────────────────────────────────────────────────────┐
//! │  StateTable                                                  │
//! │  ┌─────────┬───────────┬──────────┬────────────────────────┐ │
//! │  │ StateId │ on_enter  │ on_exit  │ on_edge                │ │
//! │  ├─────────┼───────────┼──────────┼────────────────────────┤ │
//! │  │ Standby │ fn(ctx)   │ fn(ctx)  │ fn(ctx, btn)->Option<> │ │
//! │  │ Active  │ fn(ctx)   │ fn(ctx)  │ fn(ctx, btn)->Option<> │ │
//! │  │ Muted   │ fn(ctx)   │ fn(ctx)  │ fn(ctx, btn)->Option<> │ │
//! │  └─────────┴───────────┴──────────┴────────────────────────┘ │
//! └──────────────────────────────────────────────────────────────┘
//! ```
//!
//! The machine is driven only by debounced button presses.  For each
//! edge the engine calls `on_edge` for the **current** state.  If it
//! returns `Some(next)` with `next` different from the current state,
//! the engine runs `on_exit` for the current state, then `on_enter` for
//! the next, and updates the current pointer.  Re-observing the current
//! state runs nothing.

pub mod context;
pub mod states;

use context::FsmContext;
use log::info;

use crate::drivers::button::Button;

// ---------------------------------------------------------------------------
// State identity
// ---------------------------------------------------------------------------

/// Operating modes.
/// Must stay in sync with the state table built in [`states::build_state_table`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
#[repr(u8)]
pub enum StateId {
    /// Output muted, LEDs dark.  Initial state.
    #[default]
    Standby = 0,
    /// USB loopback live, both meters lit.
    Active = 1,
    /// Output muted, input meter still lit.
    Muted = 2,
}

impl StateId {
    /// Total number of states, used to size the table array.
    pub const COUNT: usize = 3;

    pub const ALL: [StateId; StateId::COUNT] = [StateId::Standby, StateId::Active, StateId::Muted];

    pub const fn name(self) -> &'static str {
        match self {
            Self::Standby => "Standby",
            Self::Active => "Active",
            Self::Muted => "Muted",
        }
    }

    /// Fixed status line shown on the display for this mode.
    pub const fn status_message(self) -> &'static str {
        match self {
            Self::Standby => "Press UP to start",
            Self::Active => "USB Loopback Active",
            Self::Muted => "Output Muted",
        }
    }
}

/// Shown instead of the mode message while no audio host is attached.
pub const DISCONNECTED_MESSAGE: &str = "Connect USB Audio";

// ---------------------------------------------------------------------------
// Function-pointer type aliases
// ---------------------------------------------------------------------------

/// Signature for `on_enter` and `on_exit` actions.
/// These run exactly once on each state transition.
pub type StateActionFn = fn(&mut FsmContext);

/// Signature for the per-edge handler.
/// Returns `Some(next)` to trigger a transition, or `None` to stay.
pub type StateEdgeFn = fn(&mut FsmContext, Button) -> Option<StateId>;

// ---------------------------------------------------------------------------
// State descriptor (one row in the table)
// ---------------------------------------------------------------------------

/// Static descriptor for a single FSM state.
/// Stored in a fixed-size array, no heap, no `dyn`.
pub struct StateDescriptor {
    pub id: StateId,
    pub on_enter: Option<StateActionFn>,
    pub on_exit: Option<StateActionFn>,
    pub on_edge: StateEdgeFn,
}

// ---------------------------------------------------------------------------
// FSM engine
// ---------------------------------------------------------------------------

/// The finite state machine engine.
///
/// Owns the state table (array of [`StateDescriptor`]).  A mutable
/// [`FsmContext`] is threaded through every handler call.
pub struct Fsm {
    /// Fixed-size table indexed by `StateId as usize`.
    table: [StateDescriptor; StateId::COUNT],
    /// Index of the currently active state.
    current: usize,
    /// Index of the state before the last transition.
    previous: usize,
    /// Completed transitions since construction.
    transition_count: u32,
}

impl Fsm {
    /// Construct a new FSM with the given state table, starting in `initial`.
    pub fn new(table: [StateDescriptor; StateId::COUNT], initial: StateId) -> Self {
        Self {
            table,
            current: initial as usize,
            previous: initial as usize,
            transition_count: 0,
        }
    }

    /// Run the initial `on_enter` for the starting state.
    /// Call once after construction, before the first edge.
    pub fn start(&mut self, ctx: &mut FsmContext) {
        info!("FSM starting in state: {}", self.current_state().name());
        if let Some(enter) = self.table[self.current].on_enter {
            enter(ctx);
        }
    }

    /// Feed one debounced press into the machine.
    ///
    /// Returns the new state when a transition happened.
    pub fn handle_edge(&mut self, button: Button, ctx: &mut FsmContext) -> Option<StateId> {
        ctx.edges_handled = ctx.edges_handled.wrapping_add(1);

        let next = (self.table[self.current].on_edge)(ctx, button)?;
        if next as usize == self.current {
            return None;
        }
        self.transition(next, ctx);
        Some(next)
    }

    /// The current state's identity.
    pub fn current_state(&self) -> StateId {
        self.table[self.current].id
    }

    /// The state before the most recent transition.  Equals the current
    /// state until the first transition.
    pub fn previous_state(&self) -> StateId {
        self.table[self.previous].id
    }

    pub fn transition_count(&self) -> u32 {
        self.transition_count
    }

    // -----------------------------------------------------------------------
    // Internal
    // -----------------------------------------------------------------------

    fn transition(&mut self, next_id: StateId, ctx: &mut FsmContext) {
        let next_idx = next_id as usize;

        info!(
            "FSM transition: {} -> {}",
            self.table[self.current].id.name(),
            next_id.name()
        );

        // Exit current state
        if let Some(exit) = self.table[self.current].on_exit {
            exit(ctx);
        }

        self.previous = self.current;
        self.current = next_idx;
        self.transition_count = self.transition_count.wrapping_add(1);

        // Enter new state
        if let Some(enter) = self.table[self.current].on_enter {
            enter(ctx);
        }
    }
}
