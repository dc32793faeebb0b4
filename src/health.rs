//! Subsystem health supervisor.
//!
//! Runs alongside the dispatcher and keeps two kinds of failure apart:
//!
//! - **Not ready** (per cycle, recoverable).  Each collaborator's
//!   readiness is sampled right before its update.  A not-ready
//!   collaborator's update is skipped for that cycle; the bit clears again
//!   the next time it reports ready.  A sticky mask remembers every
//!   subsystem that has ever dropped out, for diagnostics.
//! - **Init failure** (latched).  The first `init()` error is stored and
//!   never cleared; the dispatcher stays in error mode until restart.
//!
//! Log lines are emitted on edges only, never once per cycle.

use crate::error::{InitError, Subsystem};
use log::{error, info, warn};

/// Readiness and init-failure bookkeeping.
#[derive(Debug, Default)]
pub struct HealthMonitor {
    /// Subsystems not ready as of their latest check.
    not_ready: u8,
    /// Subsystems that have been not ready at least once.
    ever_not_ready: u8,
    /// Updates skipped because a subsystem was not ready.
    skipped_updates: u32,
    init_failure: Option<InitError>,
}

impl HealthMonitor {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record `subsystem`'s readiness for this cycle and return it.
    pub fn observe(&mut self, subsystem: Subsystem, ready: bool) -> bool {
        let mask = subsystem.mask();
        if ready {
            if self.not_ready & mask != 0 {
                info!("HEALTH: {subsystem} ready again");
            }
            self.not_ready &= !mask;
        } else {
            if self.not_ready & mask == 0 {
                warn!("HEALTH: {subsystem} not ready, skipping its updates");
            }
            self.not_ready |= mask;
            self.ever_not_ready |= mask;
            self.skipped_updates = self.skipped_updates.wrapping_add(1);
        }
        ready
    }

    /// Latch an initialisation failure.  Only the first one is kept.
    pub fn latch_init_failure(&mut self, err: InitError) {
        if self.init_failure.is_none() {
            error!("HEALTH: init failure latched: {err}");
            self.init_failure = Some(err);
        }
    }

    pub fn init_failure(&self) -> Option<InitError> {
        self.init_failure
    }

    pub fn is_latched(&self) -> bool {
        self.init_failure.is_some()
    }

    /// Current not-ready bitmask (see [`Subsystem::mask`]).
    pub fn not_ready_mask(&self) -> u8 {
        self.not_ready
    }

    /// Every subsystem that has ever reported not ready.
    pub fn sticky_mask(&self) -> u8 {
        self.ever_not_ready
    }

    pub fn is_ready(&self, subsystem: Subsystem) -> bool {
        self.not_ready & subsystem.mask() == 0
    }

    pub fn skipped_updates(&self) -> u32 {
        self.skipped_updates
    }
}
