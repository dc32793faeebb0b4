//! Songbird control core library.
//!
//! Exposes the pure-logic modules plus the host-simulation adapters for
//! integration testing and the `songbird` binary.  Hardware access goes
//! through the traits in [`app::ports`] and the `embedded-hal` drivers in
//! [`drivers`].

#![deny(unused_must_use)]

pub mod adapters;
pub mod app;
pub mod config;
pub mod control;
pub mod diagnostics;
pub mod drivers;
pub mod error;
pub mod fsm;
pub mod health;
pub mod pins;
pub mod scheduler;
