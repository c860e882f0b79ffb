//! knobview Firmware — Main Entry Point
//!
//! Interrupt-driven rotary encoder mirrored onto an I²C RGB-backlit LCD.
//!
//! ```text
//! ┌──────────────────────────────────────────────────────────┐
//! │ GPIO ISR (S1, button)                                    │
//! │   └─ post_from_isr ─▶ Pin Relay (lock-free, bounded)     │
//! │                          │ blocking recv                 │
//! │ Decoder task ◀───────────┘                               │
//! │   reads pin levels · quadrature decode · EncoderState    │
//! │                          │ atomic snapshot               │
//! │ Display task ◀───────────┘  (10 ms poll)                 │
//! │   change detection · RgbLcd ─▶ BusPort ─▶ I²C master     │
//! └──────────────────────────────────────────────────────────┘
//! ```
#![deny(unused_must_use)]

// ── Module declarations ───────────────────────────────────────
mod config;
mod display;
mod encoder;
mod error;
mod events;
mod pins;

mod adapters;
pub mod app;
mod drivers;

// ── Imports ───────────────────────────────────────────────────
use std::sync::Arc;

use anyhow::Result;
use log::{error, info, warn};

use adapters::i2c_bus::EspI2cBus;
use adapters::log_sink::LogEventSink;
use app::events::AppEvent;
use app::ports::{BusPort, EventSink};
use config::PanelConfig;
use display::{PanelView, WriteGate};
use drivers::delay::delay_ms;
use drivers::hw_init;
use drivers::lcd::RgbLcd;
use drivers::task::spawn_task;
use encoder::{EncoderState, QuadratureDecoder};

// ── Main ──────────────────────────────────────────────────────

fn main() -> Result<()> {
    // ── 1. ESP-IDF bootstrap ──────────────────────────────────
    esp_idf_svc::sys::link_patches();
    esp_idf_logger::init()?;

    info!("knobview v{}", env!("CARGO_PKG_VERSION"));

    let config = PanelConfig::default();
    match serde_json::to_string(&config) {
        Ok(json) => info!("config: {json}"),
        Err(e) => warn!("config: not serializable ({e})"),
    }

    // ── 2. Peripherals ────────────────────────────────────────
    if let Err(e) = hw_init::init_peripherals() {
        // Peripheral init failure is critical — log and halt.
        error!("HAL init failed: {} — halting", e);
        #[allow(clippy::empty_loop)]
        loop {}
    }

    // ── 3. Relay wake primitive — must exist before any ISR ───
    events::init();

    // ── 4. Shared encoder state ───────────────────────────────
    // Channel A's idle level is sampled before interrupts are enabled so
    // the decoder's edge detection starts from the true pin state.
    let state = Arc::new(EncoderState::new());
    let initial_a_level = hw_init::gpio_read(pins::ENCODER_S1_GPIO);

    // ── 5. I²C master ─────────────────────────────────────────
    let bus = match EspI2cBus::new(config.bus_timeout_ms) {
        Ok(bus) => bus,
        Err(e) => {
            error!("I2C master install failed: {} — halting", e);
            #[allow(clippy::empty_loop)]
            loop {}
        }
    };

    // ── 6. Tasks ──────────────────────────────────────────────
    let decoder_state = Arc::clone(&state);
    let _decoder = spawn_task(
        config.decoder_task_priority,
        config.task_stack_kb,
        "decoder\0",
        move || decoder_task(&decoder_state, initial_a_level, LogEventSink::new()),
    );

    let display_state = Arc::clone(&state);
    let display_config = config.clone();
    let display = spawn_task(
        config.display_task_priority,
        config.task_stack_kb,
        "display\0",
        move || display_task(&display_state, &display_config, bus, LogEventSink::new()),
    );

    // ── 7. Interrupts last — nothing fires into a half-built system ──
    if let Err(e) = hw_init::init_isr_service() {
        error!("ISR service init failed: {} — encoder inputs are dead", e);
    }

    info!("System ready.");

    // Both tasks run for the process lifetime; park main on one of them.
    let _ = display.join();
    Ok(())
}

// ── Decoder task ──────────────────────────────────────────────
//
// Sole consumer of the pin relay and sole writer of `EncoderState`.
// Level reads happen here, never in the ISR.

fn decoder_task(state: &EncoderState, initial_a_level: bool, mut sink: impl EventSink) {
    let mut decoder = QuadratureDecoder::new(initial_a_level);
    let mut dropped_seen = 0u32;

    loop {
        let gpio = events::recv();
        match gpio {
            pins::ENCODER_S1_GPIO => {
                let a_level = hw_init::gpio_read(pins::ENCODER_S1_GPIO);
                let b_level = hw_init::gpio_read(pins::ENCODER_S2_GPIO);
                if let Some(dir) = decoder.on_channel_a(a_level, b_level) {
                    state.record(dir);
                }
            }
            pins::BUTTON_GPIO => {
                if !hw_init::gpio_read(pins::BUTTON_GPIO) {
                    sink.emit(&AppEvent::ButtonPressed);
                }
            }
            other => warn!("decoder: unknown GPIO {} dequeued", other),
        }

        let dropped = events::dropped_count();
        if dropped != dropped_seen {
            dropped_seen = dropped;
            sink.emit(&AppEvent::EventsDropped { total: dropped });
        }
    }
}

// ── Display task ──────────────────────────────────────────────
//
// Polls the shared state at a fixed cadence and mirrors changes onto the
// LCD.  Bus failures are logged and, past the configured threshold,
// suppress writes until a probe transaction succeeds.

fn display_task(
    state: &EncoderState,
    config: &PanelConfig,
    bus: impl BusPort,
    mut sink: impl EventSink,
) {
    let mut lcd = RgbLcd::new(bus, pins::LCD_ADDR, pins::RGB_ADDR);

    // A dead module at boot should not kill the task — keep probing.
    while let Err(e) = lcd.init(config.lcd_cols, config.lcd_rows) {
        warn!("display: init failed ({}), retrying in 1s", e);
        delay_ms(1000);
    }
    info!(
        "display: {}x{} initialized at 0x{:02x}/0x{:02x}",
        config.lcd_cols,
        config.lcd_rows,
        pins::LCD_ADDR,
        pins::RGB_ADDR
    );

    // Two change detectors: `logged` tracks what reached the log (exactly
    // once per state change), `screen` tracks what reached the LCD (retried
    // while writes fail or are suppressed).
    let mut logged = PanelView::new();
    let mut screen = PanelView::new();
    let mut gate = WriteGate::new(
        config.bus_fail_suppress_after,
        config.bus_retry_backoff_polls,
    );

    loop {
        delay_ms(config.display_poll_interval_ms);

        let (position, direction) = state.snapshot();
        if logged.observe(position, direction).is_some() {
            sink.emit(&AppEvent::PositionChanged {
                position,
                direction,
            });
        }

        let Some(line) = screen.observe(position, direction) else {
            continue;
        };

        if !gate.permits() {
            screen.invalidate();
            continue;
        }

        match display::render_line(&mut lcd, &line) {
            Ok(()) => {
                if gate.record_success() {
                    sink.emit(&AppEvent::DisplayRestored);
                }
            }
            Err(e) => {
                warn!("display: bus write failed ({})", e);
                screen.invalidate();
                if gate.record_failure() {
                    sink.emit(&AppEvent::DisplaySuppressed {
                        consecutive_failures: gate.consecutive_failures(),
                    });
                }
            }
        }
    }
}
