//! Unified error types for the knobview firmware.
//!
//! Follows embedded best practice: a single `Error` enum that every subsystem
//! can convert into, keeping the top-level task loops' error handling uniform.
//! All variants are `Copy` so they can be cheaply passed between tasks without
//! allocation.

use core::fmt;

// ---------------------------------------------------------------------------
// Top-level firmware error
// ---------------------------------------------------------------------------

/// Every fallible operation in the firmware funnels into this type.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Error {
    /// An I²C bus transaction failed.
    Bus(BusError),
    /// Peripheral initialisation failed.
    Init(&'static str),
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Bus(e) => write!(f, "bus: {e}"),
            Self::Init(msg) => write!(f, "init: {msg}"),
        }
    }
}

impl std::error::Error for Error {}

// ---------------------------------------------------------------------------
// Bus errors
// ---------------------------------------------------------------------------

/// Failure modes of a single I²C transaction.
///
/// The transport layer never retries — it reports, and the caller decides
/// whether to log, retry, or suppress further writes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BusError {
    /// The bounded wait for bus acknowledgement expired.
    Timeout,
    /// The addressed peripheral did not acknowledge.
    Nack,
    /// The bus driver could not be installed or configured.
    InstallFailed(i32),
    /// Any other controller-reported error code.
    Other(i32),
}

impl fmt::Display for BusError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Timeout => write!(f, "transaction timeout"),
            Self::Nack => write!(f, "no acknowledgement from peripheral"),
            Self::InstallFailed(rc) => write!(f, "driver install failed (rc={rc})"),
            Self::Other(rc) => write!(f, "transaction failed (rc={rc})"),
        }
    }
}

impl From<BusError> for Error {
    fn from(e: BusError) -> Self {
        Self::Bus(e)
    }
}

// ---------------------------------------------------------------------------
// Convenience Result alias
// ---------------------------------------------------------------------------

/// Firmware-wide `Result` alias.
pub type Result<T> = core::result::Result<T, Error>;
