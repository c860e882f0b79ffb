//! Log-based event sink adapter.
//!
//! Implements [`EventSink`] by writing structured application events to
//! the ESP-IDF logger (which goes to UART / USB-CDC in production).
//! A future telemetry adapter would implement the same trait.

use log::{info, warn};

use crate::app::events::AppEvent;
use crate::app::ports::EventSink;

/// Adapter that logs every [`AppEvent`] to the serial console.
pub struct LogEventSink;

impl LogEventSink {
    pub fn new() -> Self {
        Self
    }
}

impl Default for LogEventSink {
    fn default() -> Self {
        Self::new()
    }
}

impl EventSink for LogEventSink {
    fn emit(&mut self, event: &AppEvent) {
        match event {
            AppEvent::PositionChanged {
                position,
                direction,
            } => {
                info!("Direction: {}, Position {}", direction, position);
            }
            AppEvent::ButtonPressed => {
                info!("Button press!");
            }
            AppEvent::DisplaySuppressed {
                consecutive_failures,
            } => {
                warn!(
                    "display: {} consecutive bus failures — suppressing writes",
                    consecutive_failures
                );
            }
            AppEvent::DisplayRestored => {
                info!("display: bus recovered, writes resumed");
            }
            AppEvent::EventsDropped { total } => {
                warn!("relay: {} pin events dropped since boot", total);
            }
        }
    }
}
