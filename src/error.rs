//! Unified error types for the Songbird control core.
//!
//! A single `Error` enum that every subsystem converts into, so the control
//! loop handles failures uniformly.  All variants are `Copy` so they can be
//! latched inside the dispatcher without allocation.

use core::fmt;

// ---------------------------------------------------------------------------
// Top-level error
// ---------------------------------------------------------------------------

/// Every fallible operation in the core funnels into this type.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Error {
    /// A collaborator failed to come up.  Latches the dispatcher into
    /// error mode until restart.
    Init(InitError),
    /// Configuration is invalid or could not be loaded.
    Config(ConfigError),
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Init(e) => write!(f, "init: {e}"),
            Self::Config(e) => write!(f, "config: {e}"),
        }
    }
}

impl core::error::Error for Error {}

// ---------------------------------------------------------------------------
// Subsystems
// ---------------------------------------------------------------------------

/// The collaborators the dispatcher depends on.  Used to tag init failures
/// and per-cycle readiness flags.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(u8)]
pub enum Subsystem {
    Audio = 0b0000_0001,
    Display = 0b0000_0010,
    Indicators = 0b0000_0100,
    Buttons = 0b0000_1000,
}

impl Subsystem {
    pub const ALL: [Subsystem; 4] = [
        Subsystem::Audio,
        Subsystem::Display,
        Subsystem::Indicators,
        Subsystem::Buttons,
    ];

    /// Bitmask for this subsystem.
    pub const fn mask(self) -> u8 {
        self as u8
    }

    pub const fn name(self) -> &'static str {
        match self {
            Self::Audio => "audio",
            Self::Display => "display",
            Self::Indicators => "indicators",
            Self::Buttons => "buttons",
        }
    }
}

impl fmt::Display for Subsystem {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

// ---------------------------------------------------------------------------
// Initialisation errors
// ---------------------------------------------------------------------------

/// A collaborator's `init()` failed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct InitError {
    pub subsystem: Subsystem,
    pub reason: &'static str,
}

impl InitError {
    pub const fn new(subsystem: Subsystem, reason: &'static str) -> Self {
        Self { subsystem, reason }
    }
}

impl fmt::Display for InitError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} failed: {}", self.subsystem, self.reason)
    }
}

impl From<InitError> for Error {
    fn from(e: InitError) -> Self {
        Self::Init(e)
    }
}

// ---------------------------------------------------------------------------
// Output write errors
// ---------------------------------------------------------------------------

/// A single write to an output device failed.  Never latched: the
/// dispatcher flags the subsystem not ready and tries again next update.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct WriteError {
    pub subsystem: Subsystem,
    pub reason: &'static str,
}

impl WriteError {
    pub const fn new(subsystem: Subsystem, reason: &'static str) -> Self {
        Self { subsystem, reason }
    }
}

impl fmt::Display for WriteError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} write failed: {}", self.subsystem, self.reason)
    }
}

// ---------------------------------------------------------------------------
// Configuration errors
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConfigError {
    /// A field failed range validation.  The string names the field and rule.
    ValidationFailed(&'static str),
    /// The stored / supplied document could not be parsed.
    Malformed,
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::ValidationFailed(msg) => write!(f, "validation failed: {msg}"),
            Self::Malformed => write!(f, "malformed configuration"),
        }
    }
}

impl From<ConfigError> for Error {
    fn from(e: ConfigError) -> Self {
        Self::Config(e)
    }
}

// ---------------------------------------------------------------------------
// Convenience Result alias
// ---------------------------------------------------------------------------

/// Crate-wide `Result` alias.
pub type Result<T> = core::result::Result<T, Error>;
