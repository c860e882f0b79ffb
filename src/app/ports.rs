//! Port traits — the hexagonal boundary between domain logic and the outside world.
//!
//! ```text
//!   Adapter ──▶ Port trait ──▶ driver / task loop
//! ```
//!
//! Driven adapters (the I²C controller, the log sink) implement these traits.
//! The display driver and task loops consume them via generics, so nothing
//! above this line touches hardware directly.

use crate::error::BusError;

// ───────────────────────────────────────────────────────────────
// Bus port (driven adapter: driver → two-wire serial bus)
// ───────────────────────────────────────────────────────────────

/// One complete write transaction on the shared two-wire bus: start,
/// 7-bit address + write bit, payload bytes, stop, with a bounded wait
/// for acknowledgement.
///
/// Implementations never retry.  Timeout and NACK surface as [`BusError`];
/// the caller decides whether to log, retry, or suppress further writes.
pub trait BusPort {
    fn send(&mut self, addr: u8, bytes: &[u8]) -> Result<(), BusError>;
}

// ───────────────────────────────────────────────────────────────
// Event sink port (driven adapter: tasks → logging / telemetry)
// ───────────────────────────────────────────────────────────────

/// The task loops emit structured [`AppEvent`](super::events::AppEvent)s
/// through this port.  Adapters decide where they go.
pub trait EventSink {
    fn emit(&mut self, event: &super::events::AppEvent);
}
