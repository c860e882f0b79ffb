//! I²C bus adapters implementing [`BusPort`].
//!
//! [`EspI2cBus`] drives the ESP-IDF I²C master (legacy driver, port 0) with
//! a bounded per-transaction wait.  On non-espidf targets it degrades to a
//! frame logger so the full firmware still runs in simulation.
//!
//! [`EhalI2cBus`] adapts any `embedded_hal::i2c::I2c` implementation to the
//! same port — host tests drive the display stack through it.

use crate::app::ports::BusPort;
use crate::error::BusError;
use crate::pins;

// ───────────────────────────────────────────────────────────────
// ESP-IDF master adapter
// ───────────────────────────────────────────────────────────────

/// The firmware's bus: I²C master on port 0, pins and clock from `pins.rs`.
///
/// Construction installs the driver once; transactions never retry and
/// surface timeout/NACK to the caller.
pub struct EspI2cBus {
    timeout_ms: u32,
}

impl EspI2cBus {
    pub fn new(timeout_ms: u32) -> Result<Self, BusError> {
        install_driver()?;
        Ok(Self { timeout_ms })
    }
}

impl BusPort for EspI2cBus {
    fn send(&mut self, addr: u8, bytes: &[u8]) -> Result<(), BusError> {
        master_write(addr, bytes, self.timeout_ms)
    }
}

#[cfg(target_os = "espidf")]
fn install_driver() -> Result<(), BusError> {
    use esp_idf_svc::sys::*;

    // SAFETY: Called once from main() before the tasks start; single-threaded.
    unsafe {
        let mut cfg = i2c_config_t {
            mode: i2c_mode_t_I2C_MODE_MASTER,
            sda_io_num: pins::I2C_SDA_GPIO,
            scl_io_num: pins::I2C_SCL_GPIO,
            sda_pullup_en: true,
            scl_pullup_en: true,
            ..Default::default()
        };
        cfg.__bindgen_anon_1.master.clk_speed = pins::I2C_FREQ_HZ;

        let ret = i2c_param_config(pins::I2C_PORT, &cfg);
        if ret != ESP_OK as i32 {
            return Err(BusError::InstallFailed(ret));
        }
        let ret = i2c_driver_install(pins::I2C_PORT, i2c_mode_t_I2C_MODE_MASTER, 0, 0, 0);
        if ret != ESP_OK as i32 {
            return Err(BusError::InstallFailed(ret));
        }
    }

    log::info!(
        "i2c_bus: master installed (port {}, {} Hz, SDA={}, SCL={})",
        pins::I2C_PORT,
        pins::I2C_FREQ_HZ,
        pins::I2C_SDA_GPIO,
        pins::I2C_SCL_GPIO
    );
    Ok(())
}

#[cfg(not(target_os = "espidf"))]
fn install_driver() -> Result<(), BusError> {
    log::info!("i2c_bus(sim): driver install skipped");
    Ok(())
}

/// One complete write transaction: start, 7-bit address + write bit,
/// payload, stop, bounded wait for acknowledgement.
#[cfg(target_os = "espidf")]
fn master_write(addr: u8, bytes: &[u8], timeout_ms: u32) -> Result<(), BusError> {
    use esp_idf_svc::sys::*;

    let ticks = esp_idf_hal::delay::TickType::new_millis(u64::from(timeout_ms)).ticks();
    // SAFETY: The driver was installed in `install_driver()`; the byte
    // buffer outlives the call.
    let ret = unsafe {
        i2c_master_write_to_device(pins::I2C_PORT, addr, bytes.as_ptr(), bytes.len(), ticks)
    };
    match ret {
        x if x == ESP_OK as i32 => Ok(()),
        x if x == ESP_ERR_TIMEOUT => Err(BusError::Timeout),
        x if x == ESP_FAIL => Err(BusError::Nack),
        other => Err(BusError::Other(other)),
    }
}

#[cfg(not(target_os = "espidf"))]
fn master_write(addr: u8, bytes: &[u8], _timeout_ms: u32) -> Result<(), BusError> {
    log::trace!("i2c_bus(sim): write addr=0x{addr:02x} bytes={bytes:02x?}");
    Ok(())
}

// ───────────────────────────────────────────────────────────────
// embedded-hal adapter
// ───────────────────────────────────────────────────────────────

/// Adapts any blocking `embedded_hal` I²C implementation to [`BusPort`].
pub struct EhalI2cBus<T>(T);

impl<T: embedded_hal::i2c::I2c> EhalI2cBus<T> {
    pub fn new(device: T) -> Self {
        Self(device)
    }

    pub fn inner(&self) -> &T {
        &self.0
    }

    pub fn inner_mut(&mut self) -> &mut T {
        &mut self.0
    }

    pub fn into_inner(self) -> T {
        self.0
    }
}

impl<T: embedded_hal::i2c::I2c> BusPort for EhalI2cBus<T> {
    fn send(&mut self, addr: u8, bytes: &[u8]) -> Result<(), BusError> {
        use embedded_hal::i2c::{Error as _, ErrorKind};

        self.0.write(addr, bytes).map_err(|e| match e.kind() {
            ErrorKind::NoAcknowledge(_) => BusError::Nack,
            _ => BusError::Other(-1),
        })
    }
}
