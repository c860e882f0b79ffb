//! Blocking millisecond delay.
//!
//! On ESP-IDF this yields to the FreeRTOS scheduler (`vTaskDelay` under the
//! hood) so other tasks keep running through the LCD settle times.  On host
//! targets it is a plain thread sleep.

#[cfg(target_os = "espidf")]
pub fn delay_ms(ms: u32) {
    esp_idf_hal::delay::FreeRtos::delay_ms(ms);
}

#[cfg(not(target_os = "espidf"))]
pub fn delay_ms(ms: u32) {
    std::thread::sleep(std::time::Duration::from_millis(u64::from(ms)));
}
