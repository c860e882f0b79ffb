//! Display-task logic: change detection, line rendering, and the
//! bus-failure write gate.
//!
//! The task loop in `main.rs` owns the timing; everything here is state
//! plus bus-generic rendering, so this module tests without hardware.

use core::fmt::Write as _;

use crate::app::ports::BusPort;
use crate::drivers::lcd::RgbLcd;
use crate::encoder::Direction;
use crate::error::BusError;

/// One rendered display line.  Sized for the worst case
/// (`Pos: -2147483648 Dir: CCW`), not for the 16 visible columns —
/// the controller clips overlong lines itself.
pub type Line = heapless::String<32>;

// ── Change-detecting view ─────────────────────────────────────

/// Tracks the last rendered snapshot and produces a new line only when the
/// observed state differs — the poll loop calls this every tick.
pub struct PanelView {
    prev: Option<(i32, Direction)>,
}

impl PanelView {
    pub fn new() -> Self {
        Self { prev: None }
    }

    /// Returns the line to render if `position`/`direction` differ from the
    /// previously rendered pair (or nothing was rendered yet).
    pub fn observe(&mut self, position: i32, direction: Direction) -> Option<Line> {
        if self.prev == Some((position, direction)) {
            return None;
        }
        self.prev = Some((position, direction));
        let mut line = Line::new();
        // Capacity is checked by the `line_fits_worst_case` test.
        let _ = write!(line, "Pos: {} Dir: {}", position, direction.abbrev());
        Some(line)
    }

    /// Forget the last rendered snapshot so the next poll renders again —
    /// called after a failed or suppressed write, otherwise that frame
    /// would be lost until the state changes again.
    pub fn invalidate(&mut self) {
        self.prev = None;
    }
}

impl Default for PanelView {
    fn default() -> Self {
        Self::new()
    }
}

/// Push one rendered line to the LCD: clear, home the cursor, print.
/// Any failed transaction aborts the rest of the frame.
pub fn render_line<B: BusPort>(lcd: &mut RgbLcd<B>, line: &str) -> Result<(), BusError> {
    lcd.clear()?;
    lcd.set_cursor(0, 0)?;
    lcd.print(line)
}

// ── Bus-failure write gate ────────────────────────────────────

/// Suppresses LCD writes after repeated bus failures so a dead or unplugged
/// module doesn't drown the log, probing again after a backoff period.
pub struct WriteGate {
    threshold: u32,
    backoff_polls: u32,
    consecutive_failures: u32,
    cooldown: u32,
    suppressed: bool,
}

impl WriteGate {
    pub fn new(threshold: u8, backoff_polls: u32) -> Self {
        Self {
            threshold: u32::from(threshold.max(1)),
            backoff_polls,
            consecutive_failures: 0,
            cooldown: 0,
            suppressed: false,
        }
    }

    /// Call once per poll tick before attempting a write.  While suppressed
    /// this returns `false` until the backoff expires, then `true` exactly
    /// once to let a probe transaction through.
    pub fn permits(&mut self) -> bool {
        if !self.suppressed {
            return true;
        }
        if self.cooldown > 0 {
            self.cooldown -= 1;
            return false;
        }
        true
    }

    /// Record a successful write.  Returns `true` if this ended a
    /// suppression period.
    pub fn record_success(&mut self) -> bool {
        self.consecutive_failures = 0;
        if self.suppressed {
            self.suppressed = false;
            true
        } else {
            false
        }
    }

    /// Record a failed write.  Returns `true` if this write crossed the
    /// threshold and writes are now suppressed.
    pub fn record_failure(&mut self) -> bool {
        self.consecutive_failures += 1;
        if self.suppressed {
            // Failed probe: back off again.
            self.cooldown = self.backoff_polls;
            return false;
        }
        if self.consecutive_failures >= self.threshold {
            self.suppressed = true;
            self.cooldown = self.backoff_polls;
            return true;
        }
        false
    }

    pub fn consecutive_failures(&self) -> u32 {
        self.consecutive_failures
    }

    pub fn is_suppressed(&self) -> bool {
        self.suppressed
    }
}
