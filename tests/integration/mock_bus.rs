//! Mock bus adapters for integration tests.
//!
//! Records every frame so tests can assert on the exact byte traffic
//! without touching a real I²C controller, and injects failures to
//! exercise the error paths.

use knobview::app::ports::BusPort;
use knobview::error::BusError;

// ── Frame record ──────────────────────────────────────────────

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Frame {
    pub addr: u8,
    pub bytes: Vec<u8>,
}

impl Frame {
    pub fn new(addr: u8, bytes: &[u8]) -> Self {
        Self {
            addr,
            bytes: bytes.to_vec(),
        }
    }
}

// ── RecordingBus ──────────────────────────────────────────────

/// [`BusPort`] double that records frames and optionally fails sends.
pub struct RecordingBus {
    pub frames: Vec<Frame>,
    fail_next: u32,
    fail_always: bool,
}

#[allow(dead_code)]
impl RecordingBus {
    pub fn new() -> Self {
        Self {
            frames: Vec::new(),
            fail_next: 0,
            fail_always: false,
        }
    }

    /// Fail the next `n` sends with a NACK.
    pub fn fail_next(&mut self, n: u32) {
        self.fail_next = n;
    }

    pub fn set_fail_always(&mut self, on: bool) {
        self.fail_always = on;
    }

    /// Frames addressed to one peripheral, in send order.
    pub fn frames_to(&self, addr: u8) -> Vec<&Frame> {
        self.frames.iter().filter(|f| f.addr == addr).collect()
    }
}

impl Default for RecordingBus {
    fn default() -> Self {
        Self::new()
    }
}

impl BusPort for RecordingBus {
    fn send(&mut self, addr: u8, bytes: &[u8]) -> Result<(), BusError> {
        if self.fail_always {
            return Err(BusError::Timeout);
        }
        if self.fail_next > 0 {
            self.fail_next -= 1;
            return Err(BusError::Nack);
        }
        self.frames.push(Frame::new(addr, bytes));
        Ok(())
    }
}

// ── MockI2c (embedded-hal double) ─────────────────────────────

/// Error type whose kind maps to an address NACK.
#[derive(Debug)]
pub struct MockI2cError;

impl embedded_hal::i2c::Error for MockI2cError {
    fn kind(&self) -> embedded_hal::i2c::ErrorKind {
        embedded_hal::i2c::ErrorKind::NoAcknowledge(
            embedded_hal::i2c::NoAcknowledgeSource::Address,
        )
    }
}

/// Minimal `embedded_hal::i2c::I2c` implementation recording write
/// transactions — drives the [`EhalI2cBus`](knobview::adapters::i2c_bus::EhalI2cBus)
/// adapter in tests.
pub struct MockI2c {
    pub writes: Vec<(u8, Vec<u8>)>,
    pub nack: bool,
}

#[allow(dead_code)]
impl MockI2c {
    pub fn new() -> Self {
        Self {
            writes: Vec::new(),
            nack: false,
        }
    }
}

impl Default for MockI2c {
    fn default() -> Self {
        Self::new()
    }
}

impl embedded_hal::i2c::ErrorType for MockI2c {
    type Error = MockI2cError;
}

impl embedded_hal::i2c::I2c for MockI2c {
    fn transaction(
        &mut self,
        address: u8,
        operations: &mut [embedded_hal::i2c::Operation<'_>],
    ) -> Result<(), Self::Error> {
        if self.nack {
            return Err(MockI2cError);
        }
        for op in operations.iter() {
            if let embedded_hal::i2c::Operation::Write(bytes) = op {
                self.writes.push((address, bytes.to_vec()));
            }
        }
        Ok(())
    }
}
