//! One-shot hardware peripheral initialization.
//!
//! Configures GPIO directions and the per-pin interrupt service using raw
//! ESP-IDF sys calls.  Called once from `main()` before the tasks start.

#[cfg(target_os = "espidf")]
use esp_idf_svc::sys::*;

// ── Error type ────────────────────────────────────────────────

/// Errors during one-shot peripheral initialization.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HwInitError {
    GpioConfigFailed(i32),
    IsrInstallFailed(i32),
}

impl core::fmt::Display for HwInitError {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self {
            Self::GpioConfigFailed(rc) => write!(f, "GPIO config failed (rc={})", rc),
            Self::IsrInstallFailed(rc) => write!(f, "GPIO ISR service install failed (rc={})", rc),
        }
    }
}

#[cfg(target_os = "espidf")]
use log::info;

use crate::pins;

// ── GPIO inputs ───────────────────────────────────────────────

/// Configure the encoder pair and the button as pulled-up inputs.
/// Interrupt types are assigned later in [`init_isr_service`].
#[cfg(target_os = "espidf")]
pub fn init_peripherals() -> Result<(), HwInitError> {
    let input_pins = [
        pins::ENCODER_S1_GPIO,
        pins::ENCODER_S2_GPIO,
        pins::BUTTON_GPIO,
    ];

    for &pin in &input_pins {
        let cfg = gpio_config_t {
            pin_bit_mask: 1u64 << pin,
            mode: gpio_mode_t_GPIO_MODE_INPUT,
            pull_up_en: gpio_pullup_t_GPIO_PULLUP_ENABLE,
            pull_down_en: gpio_pulldown_t_GPIO_PULLDOWN_DISABLE,
            intr_type: gpio_int_type_t_GPIO_INTR_DISABLE,
        };
        // SAFETY: Called once from main() before the tasks start; single-threaded.
        let ret = unsafe { gpio_config(&cfg) };
        if ret != ESP_OK as i32 {
            return Err(HwInitError::GpioConfigFailed(ret));
        }
    }

    info!("hw_init: GPIO inputs configured (S1, S2, button)");
    Ok(())
}

#[cfg(not(target_os = "espidf"))]
pub fn init_peripherals() -> Result<(), HwInitError> {
    log::info!("hw_init(sim): peripheral init skipped");
    Ok(())
}

/// Read the current level of an already-configured input pin.
#[cfg(target_os = "espidf")]
pub fn gpio_read(pin: i32) -> bool {
    // SAFETY: gpio_get_level is a read-only register access on an
    // already-configured input pin; safe from any context.
    (unsafe { gpio_get_level(pin) }) != 0
}

#[cfg(not(target_os = "espidf"))]
pub fn gpio_read(_pin: i32) -> bool {
    // Pull-ups idle high.
    true
}

// ── GPIO ISR service ──────────────────────────────────────────

/// Shared edge handler for every watched pin.  The registration argument
/// carries the GPIO number, and the only action taken in interrupt context
/// is the non-blocking relay post.
#[cfg(target_os = "espidf")]
unsafe extern "C" fn pin_isr(arg: *mut core::ffi::c_void) {
    crate::events::post_from_isr(arg as usize as i32);
}

/// Install the per-pin GPIO ISR service and register falling-edge handlers
/// for encoder channel A and the button.  Call after [`init_peripherals`]
/// and after the relay wake primitive exists.
#[cfg(target_os = "espidf")]
pub fn init_isr_service() -> Result<(), HwInitError> {
    // SAFETY: gpio_install_isr_service is idempotent; ESP_ERR_INVALID_STATE
    // means it was already installed (acceptable).  The handler registered
    // below only posts to the lock-free relay.
    unsafe {
        let ret = gpio_install_isr_service(0);
        if ret != ESP_OK && ret != ESP_ERR_INVALID_STATE {
            return Err(HwInitError::IsrInstallFailed(ret));
        }

        for &pin in &[pins::ENCODER_S1_GPIO, pins::BUTTON_GPIO] {
            gpio_set_intr_type(pin, gpio_int_type_t_GPIO_INTR_NEGEDGE);
            gpio_isr_handler_add(pin, Some(pin_isr), pin as usize as *mut core::ffi::c_void);
            gpio_intr_enable(pin);
        }

        info!("hw_init: ISR service installed (encoder S1, button)");
    }
    Ok(())
}

#[cfg(not(target_os = "espidf"))]
pub fn init_isr_service() -> Result<(), HwInitError> {
    log::info!("hw_init(sim): ISR service skipped");
    Ok(())
}
