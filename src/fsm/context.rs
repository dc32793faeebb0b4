//! Shared mutable context threaded through every FSM handler.
//!
//! `FsmContext` is the blackboard state handlers write to.  Entry actions
//! leave commands here; the dispatcher drains them and applies them to the
//! audio engine straight after each edge, before the next edge is handled.

// ---------------------------------------------------------------------------
// Output commands (written by state handlers; consumed by the dispatcher)
// ---------------------------------------------------------------------------

/// Commands that state handlers write to request audio-path actions.
#[derive(Debug, Clone, Copy, Default)]
pub struct OutputCommands {
    /// Pending mute command: `Some(true)` mute, `Some(false)` unmute.
    pub output_muted: Option<bool>,
}

impl OutputCommands {
    /// Remove and return the pending mute command, if any.
    pub fn take_mute(&mut self) -> Option<bool> {
        self.output_muted.take()
    }
}

// ---------------------------------------------------------------------------
// FsmContext
// ---------------------------------------------------------------------------

/// The shared context passed to every state handler function.
#[derive(Debug, Default)]
pub struct FsmContext {
    /// Commands to be applied after the current edge.
    pub commands: OutputCommands,
    /// Entry actions run so far, including the initial one.
    pub entries: u32,
    /// Button edges fed to the machine so far.
    pub edges_handled: u32,
}

impl FsmContext {
    pub fn new() -> Self {
        Self::default()
    }
}
