//! FreeRTOS-backed task spawning with explicit priority and stack size.
//!
//! ESP-IDF implements `std::thread` on top of pthreads, and those are thin
//! wrappers around FreeRTOS tasks.  `esp_pthread_set_cfg()` stores
//! thread-local settings that apply to the *next* `pthread_create()` from
//! the calling thread, so each config→spawn pair below must stay adjacent —
//! never interleave it with other thread creation on the same thread.
//!
//! On non-ESP targets this degrades to a plain `std::thread` spawn.

/// Spawn a FreeRTOS task.  `name` must carry a trailing NUL (e.g.
/// `"decoder\0"`) because it is handed to the C API verbatim.
#[cfg(target_os = "espidf")]
pub fn spawn_task(
    priority: u8,
    stack_kb: usize,
    name: &'static str,
    f: impl FnOnce() + Send + 'static,
) -> std::thread::JoinHandle<()> {
    unsafe {
        let mut cfg = esp_idf_svc::sys::esp_create_default_pthread_config();
        cfg.prio = priority as i32;
        cfg.stack_size = (stack_kb * 1024) as i32;
        cfg.thread_name = name.as_ptr() as *const _;
        let ret = esp_idf_svc::sys::esp_pthread_set_cfg(&cfg);
        assert!(
            ret == esp_idf_svc::sys::ESP_OK as i32,
            "esp_pthread_set_cfg failed: {ret}"
        );
    }

    let label = name.trim_end_matches('\0');
    log::info!("task: '{}' starting (pri={}, stack={}KB)", label, priority, stack_kb);

    std::thread::Builder::new()
        .name(label.into())
        .spawn(f)
        .expect("spawn_task: thread creation failed")
}

/// Host fallback — priority has no meaning here.
#[cfg(not(target_os = "espidf"))]
pub fn spawn_task(
    _priority: u8,
    stack_kb: usize,
    name: &'static str,
    f: impl FnOnce() + Send + 'static,
) -> std::thread::JoinHandle<()> {
    let label = name.trim_end_matches('\0');
    log::info!("task: '{}' starting (sim, stack={}KB)", label, stack_kb);

    std::thread::Builder::new()
        .name(label.into())
        .stack_size(stack_kb * 1024)
        .spawn(f)
        .expect("spawn_task(sim): thread creation failed")
}
