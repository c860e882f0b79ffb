//! System configuration parameters
//!
//! All tunable parameters for the knobview firmware.  There is no persistent
//! storage on this board — the defaults are the shipped configuration, and
//! the struct exists so the values travel together, show up in one boot-time
//! log line, and stay testable.

use serde::{Deserialize, Serialize};

/// Core system configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PanelConfig {
    // --- Display geometry ---
    /// Character columns of the attached LCD.
    pub lcd_cols: u8,
    /// Character rows of the attached LCD.
    pub lcd_rows: u8,

    // --- Timing ---
    /// Display task polling interval (milliseconds).  Bounds the latency
    /// between a decoded edge and the LCD update.
    pub display_poll_interval_ms: u32,
    /// Bounded wait for one I²C transaction (milliseconds).
    pub bus_timeout_ms: u32,

    // --- Bus failure policy ---
    /// Consecutive bus failures before the display task stops writing.
    pub bus_fail_suppress_after: u8,
    /// Polling intervals to wait before probing a suppressed bus again.
    pub bus_retry_backoff_polls: u32,

    // --- Task tuning ---
    /// FreeRTOS priority of the decoder task.
    pub decoder_task_priority: u8,
    /// FreeRTOS priority of the display task.
    pub display_task_priority: u8,
    /// Stack size for both tasks (KiB).
    pub task_stack_kb: usize,
}

impl Default for PanelConfig {
    fn default() -> Self {
        Self {
            // Display
            lcd_cols: 16,
            lcd_rows: 2,

            // Timing
            display_poll_interval_ms: 10,
            bus_timeout_ms: 1000,

            // Bus failure policy
            bus_fail_suppress_after: 5,
            bus_retry_backoff_polls: 100, // one second at the 10ms poll rate

            // Tasks
            decoder_task_priority: 5,
            display_task_priority: 10,
            task_stack_kb: 4,
        }
    }
}
