//! Quadrature decoding and cross-task encoder state.
//!
//! The decoder is a single-edge (1×) state machine: it counts only falling
//! edges of channel A and disambiguates direction from channel B's level at
//! that instant.  Cheaper and less precise than full 4× decoding — it assumes
//! interrupt latency is short enough that B has not changed between the edge
//! and the level read, which stops holding at high rotation speeds.
//!
//! [`EncoderState`] is the shared half: written only by the decoder task,
//! read by the display task.  Both fields are atomics so a reader can never
//! observe a torn value; eventual consistency between the two loads is
//! acceptable for a status display.

use core::sync::atomic::{AtomicI32, AtomicU8, Ordering};

/// Rotation direction of the most recent registered edge — not an average.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(u8)]
pub enum Direction {
    CounterClockwise = 0,
    Clockwise = 1,
}

impl Direction {
    /// Two/three-letter form used on the 16-column display.
    pub fn abbrev(self) -> &'static str {
        match self {
            Self::Clockwise => "CW",
            Self::CounterClockwise => "CCW",
        }
    }

    fn from_u8(raw: u8) -> Self {
        if raw == Direction::Clockwise as u8 {
            Self::Clockwise
        } else {
            Self::CounterClockwise
        }
    }
}

impl core::fmt::Display for Direction {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self {
            Self::Clockwise => write!(f, "Clockwise"),
            Self::CounterClockwise => write!(f, "Counter-Clockwise"),
        }
    }
}

// ── Decoder state machine ─────────────────────────────────────

/// Task-private edge decoder for quadrature channel A.
///
/// Feed it both pin levels on every channel-A event; it reports a direction
/// when (and only when) a qualifying falling edge is seen.
pub struct QuadratureDecoder {
    prev_a_level: bool,
}

impl QuadratureDecoder {
    /// `initial_a_level` is the level of channel A sampled at boot, before
    /// interrupts are enabled — otherwise the first real edge can be missed
    /// or double-counted depending on the idle level.
    pub fn new(initial_a_level: bool) -> Self {
        Self {
            prev_a_level: initial_a_level,
        }
    }

    /// Process one channel-A pin event.
    ///
    /// A falling edge (level changed and is now low) registers one detent:
    /// B high → clockwise, B low → counter-clockwise.  Rising edges and
    /// level-unchanged glitches are ignored.  The stored previous level is
    /// updated regardless of whether the edge counted.
    pub fn on_channel_a(&mut self, a_level: bool, b_level: bool) -> Option<Direction> {
        let fired = if a_level != self.prev_a_level && !a_level {
            if b_level {
                Some(Direction::Clockwise)
            } else {
                Some(Direction::CounterClockwise)
            }
        } else {
            None
        };
        self.prev_a_level = a_level;
        fired
    }
}

// ── Shared encoder state ──────────────────────────────────────

/// Cross-task encoder state, shared as an `Arc` between the decoder task
/// (sole writer) and the display task (reader).
///
/// Position wraps at the i32 boundaries; unbounded in principle.
pub struct EncoderState {
    position: AtomicI32,
    direction: AtomicU8,
}

impl EncoderState {
    pub const fn new() -> Self {
        Self {
            position: AtomicI32::new(0),
            direction: AtomicU8::new(Direction::Clockwise as u8),
        }
    }

    /// Apply one registered detent and return the new position.
    /// Only the decoder task calls this.
    pub fn record(&self, dir: Direction) -> i32 {
        let delta = match dir {
            Direction::Clockwise => 1,
            Direction::CounterClockwise => -1,
        };
        self.direction.store(dir as u8, Ordering::Release);
        self.position.fetch_add(delta, Ordering::Release).wrapping_add(delta)
    }

    /// Point-in-time view for the display task.  The two loads are not a
    /// single atomic unit; a frame rendered between them is one detent stale
    /// at worst and corrected on the next poll.
    pub fn snapshot(&self) -> (i32, Direction) {
        let pos = self.position.load(Ordering::Acquire);
        let dir = Direction::from_u8(self.direction.load(Ordering::Acquire));
        (pos, dir)
    }
}

impl Default for EncoderState {
    fn default() -> Self {
        Self::new()
    }
}
