//! Interrupt-to-task pin-event relay.
//!
//! Events are produced by GPIO ISRs (one per watched pin) and consumed by
//! the decoder task.  The payload is deliberately minimal — just the GPIO
//! number that fired; the consumer re-reads current pin levels itself.
//!
//! ```text
//! ┌─────────────┐     ┌──────────────┐     ┌──────────────┐
//! │ S1 GPIO ISR │────▶│  Pin Relay   │────▶│ Decoder Task │
//! │ KEY GPIO ISR│────▶│ (lock-free)  │     │  (consumer)  │
//! └─────────────┘     └──────────────┘     └──────────────┘
//! ```
//!
//! The producer side is the only thing interrupt context is allowed to call:
//! a non-blocking lock-free enqueue plus an ISR-safe semaphore give.  On
//! overflow the event is dropped and counted — the ISR never blocks, never
//! allocates, never takes a lock.  The consumer blocks cooperatively while
//! the relay is empty.

use core::sync::atomic::{AtomicI32, AtomicU32, AtomicUsize, Ordering};

/// Ring buffer slots.  Power of 2 for efficient modulo; one slot is
/// sacrificed to distinguish full from empty, so 15 events can be pending.
const RELAY_CAP: usize = 16;

// ── Lock-free SPSC ring ───────────────────────────────────────
//
// ISRs write (produce), the decoder task reads (consume).  Atomic head/tail
// indices enforce the SPSC discipline; the payload slots are atomics too so
// no unsafe cell access is needed.

/// Fixed-capacity single-producer/single-consumer pin-event queue.
///
/// The firmware uses one static instance ([`post_from_isr`] / [`recv`]);
/// the struct is separate so tests can drive private instances without
/// cross-talk.
pub struct PinRelay {
    buf: [AtomicI32; RELAY_CAP],
    head: AtomicUsize,
    tail: AtomicUsize,
    dropped: AtomicU32,
}

impl PinRelay {
    pub const fn new() -> Self {
        Self {
            buf: [const { AtomicI32::new(0) }; RELAY_CAP],
            head: AtomicUsize::new(0),
            tail: AtomicUsize::new(0),
            dropped: AtomicU32::new(0),
        }
    }

    /// Enqueue a pin event.  Lock-free, non-blocking — safe from ISR context.
    /// Returns `false` if the relay is full (event dropped and counted).
    pub fn push(&self, gpio: i32) -> bool {
        let head = self.head.load(Ordering::Relaxed);
        let tail = self.tail.load(Ordering::Acquire);
        let next = (head + 1) % RELAY_CAP;

        if next == tail {
            self.dropped.fetch_add(1, Ordering::Relaxed);
            return false;
        }

        self.buf[head].store(gpio, Ordering::Relaxed);
        // Publish the slot write together with the new head.
        self.head.store(next, Ordering::Release);
        true
    }

    /// Dequeue the oldest pending pin event, if any.  Single consumer.
    pub fn pop(&self) -> Option<i32> {
        let tail = self.tail.load(Ordering::Relaxed);
        let head = self.head.load(Ordering::Acquire);

        if tail == head {
            return None;
        }

        let gpio = self.buf[tail].load(Ordering::Relaxed);
        self.tail.store((tail + 1) % RELAY_CAP, Ordering::Release);
        Some(gpio)
    }

    /// Number of pending events.
    pub fn len(&self) -> usize {
        let head = self.head.load(Ordering::Relaxed);
        let tail = self.tail.load(Ordering::Relaxed);
        (head + RELAY_CAP - tail) % RELAY_CAP
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Events dropped on overflow since creation.
    pub fn dropped(&self) -> u32 {
        self.dropped.load(Ordering::Relaxed)
    }
}

impl Default for PinRelay {
    fn default() -> Self {
        Self::new()
    }
}

// ── The firmware's relay instance ─────────────────────────────
//
// Static because ISR callbacks cannot capture state.  Everything else in
// the system reaches it through the narrow API below.

static RELAY: PinRelay = PinRelay::new();

/// Post a pin event from interrupt context.
///
/// This is the *only* call an ISR may make into the rest of the system.
/// Returns `false` if the relay was full and the event was dropped.
pub fn post_from_isr(gpio: i32) -> bool {
    let queued = RELAY.push(gpio);
    wake::give_from_isr();
    queued
}

/// Block until a pin event is available and return it.
/// Called only from the decoder task.
pub fn recv() -> i32 {
    loop {
        if let Some(gpio) = RELAY.pop() {
            return gpio;
        }
        wake::wait();
    }
}

/// Non-blocking variant of [`recv`].
pub fn try_recv() -> Option<i32> {
    RELAY.pop()
}

/// Events dropped on relay overflow since boot.
pub fn dropped_count() -> u32 {
    RELAY.dropped()
}

/// One-time wake-primitive setup.  Must run before the ISR service is
/// installed.  No-op on non-espidf targets.
pub fn init() {
    wake::init();
}

// ── Consumer wake primitive ───────────────────────────────────
//
// On target: a FreeRTOS counting semaphore — the give is ISR-safe, the
// take parks the decoder task without polling.
// On host: a condvar with a timed wait (the timeout self-heals the missed
// wakeup race, which is acceptable in simulation/tests).

#[cfg(target_os = "espidf")]
mod wake {
    use esp_idf_svc::sys::{
        xQueueGenericCreate, xQueueGiveFromISR, xQueueSemaphoreTake, QueueHandle_t,
    };

    // FreeRTOS macro values not exported by the bindings.
    const QUEUE_TYPE_COUNTING_SEMAPHORE: u8 = 2;
    const PORT_MAX_DELAY: u32 = u32::MAX;

    static mut WAKE_SEM: QueueHandle_t = core::ptr::null_mut();

    /// SAFETY: WAKE_SEM is written once in `init()` from the main task
    /// before any ISR is registered; read-only afterwards.
    unsafe fn wake_sem() -> QueueHandle_t {
        unsafe { WAKE_SEM }
    }

    pub fn init() {
        // SAFETY: Single-threaded boot path, runs before ISR registration.
        unsafe {
            WAKE_SEM = xQueueGenericCreate(
                super::RELAY_CAP as u32,
                0,
                QUEUE_TYPE_COUNTING_SEMAPHORE,
            );
        }
        if unsafe { wake_sem() }.is_null() {
            log::error!("relay: wake semaphore allocation failed — consumer will spin");
        }
    }

    pub fn give_from_isr() {
        // SAFETY: xQueueGiveFromISR is the ISR-safe give; a null handle is
        // tolerated (degrades to the consumer's retry loop).
        unsafe {
            let sem = wake_sem();
            if !sem.is_null() {
                xQueueGiveFromISR(sem, core::ptr::null_mut());
            }
        }
    }

    pub fn wait() {
        // SAFETY: Semaphore take from task context with an indefinite wait.
        unsafe {
            let sem = wake_sem();
            if sem.is_null() {
                esp_idf_svc::sys::vTaskDelay(1);
                return;
            }
            xQueueSemaphoreTake(sem, PORT_MAX_DELAY);
        }
    }
}

#[cfg(not(target_os = "espidf"))]
mod wake {
    use std::sync::{Condvar, Mutex};
    use std::time::Duration;

    static GATE: Mutex<()> = Mutex::new(());
    static WAKE: Condvar = Condvar::new();

    pub fn init() {}

    pub fn give_from_isr() {
        WAKE.notify_one();
    }

    pub fn wait() {
        let guard = GATE.lock().unwrap_or_else(|e| e.into_inner());
        // Timed wait: a notify that raced ahead of this wait is recovered
        // on the next timeout tick.
        let _unused = WAKE.wait_timeout(guard, Duration::from_millis(10));
    }
}
