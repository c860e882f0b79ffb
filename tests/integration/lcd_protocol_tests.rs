//! Byte-level protocol tests for the LCD + backlight driver.
//!
//! These run on the host against a recording bus and pin down the exact
//! frames the controller pair sees — the wire format is the contract.

use std::time::Instant;

use knobview::adapters::i2c_bus::EhalI2cBus;
use knobview::drivers::lcd::RgbLcd;
use knobview::error::BusError;
use knobview::pins::{LCD_ADDR, RGB_ADDR};

use crate::mock_bus::{Frame, MockI2c, RecordingBus};

fn fresh_lcd() -> RgbLcd<RecordingBus> {
    RgbLcd::new(RecordingBus::new(), LCD_ADDR, RGB_ADDR)
}

fn initialized_lcd() -> RgbLcd<RecordingBus> {
    let mut lcd = fresh_lcd();
    lcd.init(16, 2).unwrap();
    lcd.bus_mut().frames.clear();
    lcd
}

// ── Power-up sequence ─────────────────────────────────────────

#[test]
fn init_issues_documented_powerup_sequence() {
    let mut lcd = fresh_lcd();
    lcd.init(16, 2).unwrap();
    assert!(lcd.is_initialized());
    assert_eq!(lcd.geometry(), (16, 2));

    // LCD controller: function-set ×3 (4-bit, two-line, 5×8 → 0x28),
    // display on (0x0c), clear (0x01), entry mode left-to-right (0x06).
    let lcd_frames = lcd.bus().frames_to(LCD_ADDR);
    let expected: Vec<Vec<u8>> = [0x28, 0x28, 0x28, 0x0c, 0x01, 0x06]
        .iter()
        .map(|&cmd| vec![0x80, cmd])
        .collect();
    let seen: Vec<Vec<u8>> = lcd_frames.iter().map(|f| f.bytes.clone()).collect();
    assert_eq!(seen, expected);

    // Backlight controller: sleep off, all outputs enabled, group blink,
    // then white via the three channel registers.
    let rgb_frames = lcd.bus().frames_to(RGB_ADDR);
    let expected_rgb = [
        vec![0x00, 0x00],
        vec![0x08, 0xff],
        vec![0x01, 0x20],
        vec![0x04, 0xff],
        vec![0x03, 0xff],
        vec![0x02, 0xff],
    ];
    let seen_rgb: Vec<Vec<u8>> = rgb_frames.iter().map(|f| f.bytes.clone()).collect();
    assert_eq!(seen_rgb, expected_rgb);
}

#[test]
fn one_line_geometry_skips_two_line_flag() {
    let mut lcd = fresh_lcd();
    lcd.init(16, 1).unwrap();
    // Function-set with all-zero flags.
    assert_eq!(lcd.bus().frames[0], Frame::new(LCD_ADDR, &[0x80, 0x20]));
}

#[test]
fn ten_pixel_font_available_on_one_line_displays() {
    let mut lcd = fresh_lcd();
    lcd.begin(16, 1, 1).unwrap();
    assert_eq!(lcd.bus().frames[0], Frame::new(LCD_ADDR, &[0x80, 0x24]));
}

// ── Cursor addressing ─────────────────────────────────────────

#[test]
fn cursor_row_zero_maps_into_line1_ddram() {
    let mut lcd = initialized_lcd();
    for col in 0..16u8 {
        lcd.set_cursor(col, 0).unwrap();
        assert_eq!(
            lcd.bus().frames.last().unwrap().bytes,
            vec![0x80, 0x80 | col]
        );
    }
}

#[test]
fn cursor_any_other_row_maps_into_line2_ddram() {
    let mut lcd = initialized_lcd();
    for row in [1u8, 2, 3, 7] {
        lcd.set_cursor(5, row).unwrap();
        assert_eq!(lcd.bus().frames.last().unwrap().bytes, vec![0x80, 0xc0 | 5]);
        assert_eq!(lcd.current_row(), 1, "only two rows are addressable");
    }
}

// ── Character data ────────────────────────────────────────────

#[test]
fn print_emits_one_data_frame_per_character_in_order() {
    let mut lcd = initialized_lcd();
    lcd.print("AB").unwrap();
    assert_eq!(
        lcd.bus().frames,
        vec![
            Frame::new(LCD_ADDR, &[0x40, b'A']),
            Frame::new(LCD_ADDR, &[0x40, b'B']),
        ]
    );
}

#[test]
fn print_aborts_on_first_failed_frame() {
    let mut lcd = initialized_lcd();
    lcd.bus_mut().fail_next(1);
    assert_eq!(lcd.print("AB"), Err(BusError::Nack));
    // The failed 'A' frame was never recorded and 'B' was never attempted.
    assert!(lcd.bus().frames.is_empty());
}

// ── Control-flag accumulation ─────────────────────────────────

#[test]
fn display_control_flags_accumulate() {
    let mut lcd = initialized_lcd();

    lcd.cursor_on().unwrap();
    assert_eq!(lcd.bus().frames.last().unwrap().bytes, vec![0x80, 0x0e]);

    lcd.blink_on().unwrap();
    assert_eq!(lcd.bus().frames.last().unwrap().bytes, vec![0x80, 0x0f]);

    // Re-issuing display() must not clear cursor/blink.
    lcd.display().unwrap();
    assert_eq!(lcd.bus().frames.last().unwrap().bytes, vec![0x80, 0x0f]);

    lcd.cursor_off().unwrap();
    assert_eq!(lcd.bus().frames.last().unwrap().bytes, vec![0x80, 0x0d]);

    lcd.blink_off().unwrap();
    assert_eq!(lcd.bus().frames.last().unwrap().bytes, vec![0x80, 0x0c]);
}

// ── Clear timing ──────────────────────────────────────────────

#[test]
fn clear_blocks_for_controller_settle_time() {
    let mut lcd = initialized_lcd();
    let start = Instant::now();
    lcd.clear().unwrap();
    assert!(
        start.elapsed().as_millis() >= 10,
        "clear() must not return before the controller can accept commands"
    );
}

// ── Backlight colour ──────────────────────────────────────────

#[test]
fn set_rgb_writes_three_channel_registers() {
    let mut lcd = initialized_lcd();
    lcd.set_rgb(1, 2, 3).unwrap();
    assert_eq!(
        lcd.bus().frames,
        vec![
            Frame::new(RGB_ADDR, &[0x04, 1]),
            Frame::new(RGB_ADDR, &[0x03, 2]),
            Frame::new(RGB_ADDR, &[0x02, 3]),
        ]
    );
}

// ── Error propagation ─────────────────────────────────────────

#[test]
fn init_surfaces_bus_failure() {
    let mut lcd = fresh_lcd();
    lcd.bus_mut().set_fail_always(true);
    assert_eq!(lcd.init(16, 2), Err(BusError::Timeout));
    assert!(!lcd.is_initialized());
}

// ── embedded-hal adapter path ─────────────────────────────────

#[test]
fn ehal_adapter_carries_frames_and_maps_nack() {
    let mut lcd = RgbLcd::new(EhalI2cBus::new(MockI2c::new()), LCD_ADDR, RGB_ADDR);
    lcd.command(0x01).unwrap();
    assert_eq!(
        lcd.bus().inner().writes,
        vec![(LCD_ADDR, vec![0x80, 0x01])]
    );

    lcd.bus_mut().inner_mut().nack = true;
    assert_eq!(lcd.write_char(b'A'), Err(BusError::Nack));
}
