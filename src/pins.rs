//! GPIO / peripheral pin assignments for the knobview demo board.
//!
//! Single source of truth — every driver references this module rather than
//! hard-coding pin numbers.  Change a pin here and it propagates everywhere.

// ---------------------------------------------------------------------------
// Rotary encoder (EC11-style, active-low with external pull-ups)
// ---------------------------------------------------------------------------

/// Quadrature channel A (S1).  Falling-edge interrupt source.
pub const ENCODER_S1_GPIO: i32 = 5;
/// Quadrature channel B (S2).  Level-sampled inside the decoder task,
/// no interrupt of its own.
pub const ENCODER_S2_GPIO: i32 = 6;
/// Push button on the encoder shaft.  Falling-edge interrupt source.
pub const BUTTON_GPIO: i32 = 7;

// ---------------------------------------------------------------------------
// I²C bus (LCD controller + RGB backlight controller)
// ---------------------------------------------------------------------------

pub const I2C_SDA_GPIO: i32 = 8;
pub const I2C_SCL_GPIO: i32 = 9;
/// Master clock frequency.  The AIP31068L tops out at standard mode.
pub const I2C_FREQ_HZ: u32 = 100_000;
/// I²C controller instance (port 0).
pub const I2C_PORT: i32 = 0;

// ---------------------------------------------------------------------------
// Bus addresses (7-bit)
// ---------------------------------------------------------------------------

/// AIP31068L character-LCD controller.
pub const LCD_ADDR: u8 = 0x3e;
/// PCA9633-class RGB backlight controller on the same module.
pub const RGB_ADDR: u8 = 0x60;
