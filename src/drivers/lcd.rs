//! AIP31068L character-LCD + PCA9633-class RGB backlight driver.
//!
//! The module is one physical unit but two bus peripherals: the LCD
//! controller answers on one address, the backlight controller on another.
//! Frames to the LCD carry a control byte first — `0x80` marks the payload
//! as a command, `0x40` as character data.  The backlight controller speaks
//! plain `[register, value]` pairs.
//!
//! The driver is generic over [`BusPort`] so the entire protocol, including
//! the power-up sequence, is exercised by host tests against a recording
//! bus.  Every operation surfaces bus failures as `Result` — nothing is
//! swallowed here; the display task owns the failure policy.
//!
//! Precondition: [`RgbLcd::init`] must complete once before any other
//! operation.  There is no internal guard; commanding an uninitialized
//! controller produces garbage on the wire but is harmless.

use crate::app::ports::BusPort;
use crate::drivers::delay::delay_ms;
use crate::error::BusError;

// ── LCD frame control bytes ───────────────────────────────────

/// First frame byte: payload is a command.
const CONTROL_COMMAND: u8 = 0x80;
/// First frame byte: payload is character data.
const CONTROL_DATA: u8 = 0x40;

// ── LCD controller commands ───────────────────────────────────

const CMD_CLEAR_DISPLAY: u8 = 0x01;
const CMD_ENTRY_MODE_SET: u8 = 0x04;
const CMD_DISPLAY_CONTROL: u8 = 0x08;
const CMD_FUNCTION_SET: u8 = 0x20;

/// DDRAM address command, line 1 origin.
const DDRAM_LINE1: u8 = 0x80;
/// DDRAM address command, line 2 origin.
const DDRAM_LINE2: u8 = 0xc0;

// Function-set flags (4-bit interface / one line / 5×8 font are all-zero).
const FUNC_TWO_LINE: u8 = 0x08;
const FUNC_5X10_DOTS: u8 = 0x04;

// Display-control flags.  ORed cumulatively — `display()` never clears
// cursor/blink bits that were set before it.
const CTRL_DISPLAY_ON: u8 = 0x04;
const CTRL_CURSOR_ON: u8 = 0x02;
const CTRL_BLINK_ON: u8 = 0x01;

// Entry-mode flags (shift-decrement is the all-zero default).
const MODE_ENTRY_LEFT: u8 = 0x02;

// ── Backlight controller registers ────────────────────────────

const REG_MODE1: u8 = 0x00;
const REG_MODE2: u8 = 0x01;
const REG_BLUE: u8 = 0x02;
const REG_GREEN: u8 = 0x03;
const REG_RED: u8 = 0x04;
/// Per-channel output enable mask.
const REG_LED_OUTPUT: u8 = 0x08;

/// MODE2 value: group blink (DMBLNK) enabled.
const MODE2_GROUP_BLINK: u8 = 0x20;

// ── Timing ────────────────────────────────────────────────────

/// Datasheet requires ≥40 ms after power rises above 2.7 V.
const POWER_ON_SETTLE_MS: u32 = 50;
/// Gap between the redundant function-set issues (datasheet: >4.1 ms).
const FUNCTION_SET_GAP_MS: u32 = 5;
/// The clear command needs this long before the controller accepts more.
const CLEAR_SETTLE_MS: u32 = 10;

// ── Driver ────────────────────────────────────────────────────

/// Stateful session with the LCD controller and its backlight co-processor.
///
/// Owned exclusively by the display task; lives for the process lifetime.
pub struct RgbLcd<B: BusPort> {
    bus: B,
    lcd_addr: u8,
    rgb_addr: u8,
    cols: u8,
    rows: u8,
    current_row: u8,
    function: u8,
    control: u8,
    mode: u8,
    initialized: bool,
}

impl<B: BusPort> RgbLcd<B> {
    pub fn new(bus: B, lcd_addr: u8, rgb_addr: u8) -> Self {
        Self {
            bus,
            lcd_addr,
            rgb_addr,
            cols: 0,
            rows: 0,
            current_row: 0,
            function: 0,
            control: 0,
            mode: 0,
            initialized: false,
        }
    }

    /// Establish the default configuration (4-bit interface, one line,
    /// 5×8 font) and run the power-up sequence.  Call exactly once.
    pub fn init(&mut self, cols: u8, rows: u8) -> Result<(), BusError> {
        self.function = 0;
        self.begin(cols, rows, 0)
    }

    /// The controller's documented power-up sequence.
    ///
    /// Function-set is issued three times — the reset procedure tolerates
    /// repeats and the redundancy covers part variants that miss the first
    /// issue while still settling.
    pub fn begin(&mut self, cols: u8, rows: u8, dotsize: u8) -> Result<(), BusError> {
        if rows > 1 {
            self.function |= FUNC_TWO_LINE;
        }
        self.cols = cols;
        self.rows = rows;
        self.current_row = 0;

        // Some one-line displays offer a 10-pixel-high font.
        if dotsize != 0 && rows == 1 {
            self.function |= FUNC_5X10_DOTS;
        }

        delay_ms(POWER_ON_SETTLE_MS);

        self.command(CMD_FUNCTION_SET | self.function)?;
        delay_ms(FUNCTION_SET_GAP_MS);
        self.command(CMD_FUNCTION_SET | self.function)?;
        delay_ms(FUNCTION_SET_GAP_MS);
        self.command(CMD_FUNCTION_SET | self.function)?;

        // Display on, cursor and blink off.
        self.control = CTRL_DISPLAY_ON;
        self.display()?;

        self.clear()?;

        // Left-to-right entry, no display shift.
        self.mode = MODE_ENTRY_LEFT;
        self.command(CMD_ENTRY_MODE_SET | self.mode)?;

        // Backlight bring-up: leave sleep mode, put every LED channel under
        // combined PWM + group control, enable group-blink mode, go white.
        self.set_backlight_reg(REG_MODE1, 0x00)?;
        self.set_backlight_reg(REG_LED_OUTPUT, 0xff)?;
        self.set_backlight_reg(REG_MODE2, MODE2_GROUP_BLINK)?;
        self.set_color_white()?;

        self.initialized = true;
        Ok(())
    }

    /// Send one command byte as a `[0x80, cmd]` frame.
    pub fn command(&mut self, value: u8) -> Result<(), BusError> {
        self.bus.send(self.lcd_addr, &[CONTROL_COMMAND, value])
    }

    /// Send one character as a `[0x40, data]` frame.
    pub fn write_char(&mut self, value: u8) -> Result<(), BusError> {
        self.bus.send(self.lcd_addr, &[CONTROL_DATA, value])
    }

    /// Write a string one data frame per character — no batching, matching
    /// the controller's one-byte-at-a-time data path.
    pub fn print(&mut self, text: &str) -> Result<(), BusError> {
        for &byte in text.as_bytes() {
            self.write_char(byte)?;
        }
        Ok(())
    }

    /// Clear the display and home the cursor.  Blocks the caller for the
    /// controller's mandatory settle time before returning.
    pub fn clear(&mut self) -> Result<(), BusError> {
        self.command(CMD_CLEAR_DISPLAY)?;
        delay_ms(CLEAR_SETTLE_MS);
        Ok(())
    }

    /// Position the write cursor.  Row 0 maps into line-1 DDRAM, every
    /// other row into line-2 DDRAM — the controller only has two lines.
    pub fn set_cursor(&mut self, col: u8, row: u8) -> Result<(), BusError> {
        let addr = if row == 0 {
            col | DDRAM_LINE1
        } else {
            col | DDRAM_LINE2
        };
        self.current_row = row.min(1);
        self.command(addr)
    }

    /// Turn the display output on.  Cumulative with any cursor/blink bits
    /// already set — re-issues the display-control command.
    pub fn display(&mut self) -> Result<(), BusError> {
        self.control |= CTRL_DISPLAY_ON;
        self.command(CMD_DISPLAY_CONTROL | self.control)
    }

    pub fn cursor_on(&mut self) -> Result<(), BusError> {
        self.control |= CTRL_CURSOR_ON;
        self.command(CMD_DISPLAY_CONTROL | self.control)
    }

    pub fn cursor_off(&mut self) -> Result<(), BusError> {
        self.control &= !CTRL_CURSOR_ON;
        self.command(CMD_DISPLAY_CONTROL | self.control)
    }

    pub fn blink_on(&mut self) -> Result<(), BusError> {
        self.control |= CTRL_BLINK_ON;
        self.command(CMD_DISPLAY_CONTROL | self.control)
    }

    pub fn blink_off(&mut self) -> Result<(), BusError> {
        self.control &= !CTRL_BLINK_ON;
        self.command(CMD_DISPLAY_CONTROL | self.control)
    }

    /// Set the backlight colour via the three channel registers.
    pub fn set_rgb(&mut self, r: u8, g: u8, b: u8) -> Result<(), BusError> {
        self.set_backlight_reg(REG_RED, r)?;
        self.set_backlight_reg(REG_GREEN, g)?;
        self.set_backlight_reg(REG_BLUE, b)
    }

    pub fn set_color_white(&mut self) -> Result<(), BusError> {
        self.set_rgb(255, 255, 255)
    }

    pub fn is_initialized(&self) -> bool {
        self.initialized
    }

    pub fn current_row(&self) -> u8 {
        self.current_row
    }

    /// Columns and rows as configured by `begin`.
    pub fn geometry(&self) -> (u8, u8) {
        (self.cols, self.rows)
    }

    /// Borrow the underlying bus (tests inspect recorded frames here).
    pub fn bus(&self) -> &B {
        &self.bus
    }

    pub fn bus_mut(&mut self) -> &mut B {
        &mut self.bus
    }

    fn set_backlight_reg(&mut self, register: u8, value: u8) -> Result<(), BusError> {
        self.bus.send(self.rgb_addr, &[register, value])
    }
}
