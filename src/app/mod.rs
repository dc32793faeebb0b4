//! Application core: pure control logic, zero I/O.
//!
//! This module holds the orchestration rules for the Songbird control
//! core: task cadences, input → state → output ordering and error mode.
//! All interaction with hardware happens through **port traits** defined
//! in [`ports`], keeping this layer fully testable without real peripherals.

pub mod dispatcher;
pub mod ports;
