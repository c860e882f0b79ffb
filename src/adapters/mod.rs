//! Adapters — concrete implementations of the hexagonal port traits.
//!
//! | Adapter    | Implements | Connects to                |
//! |------------|------------|----------------------------|
//! | `i2c_bus`  | BusPort    | ESP32 I²C master (port 0)  |
//! | `log_sink` | EventSink  | Serial log output          |

pub mod i2c_bus;
pub mod log_sink;
