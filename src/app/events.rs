//! Outbound application events.
//!
//! The task loops emit these through the [`EventSink`](super::ports::EventSink)
//! port.  Adapters on the other side decide what to do with them — today that
//! is the serial log; a future telemetry channel would implement the same
//! trait.

use crate::encoder::Direction;

/// Structured events emitted by the decoder and display tasks.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AppEvent {
    /// The encoder position or direction changed.
    PositionChanged { position: i32, direction: Direction },

    /// The encoder push button was pressed (falling edge; no release event).
    ButtonPressed,

    /// The display task gave up writing after consecutive bus failures.
    DisplaySuppressed { consecutive_failures: u32 },

    /// A bus transaction succeeded again after a suppression period.
    DisplayRestored,

    /// The relay dropped events on overflow (`total` is since boot).
    EventsDropped { total: u32 },
}
