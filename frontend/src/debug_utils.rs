// Throttled console logging for high-frequency repaint triggers.
//
// Scroll and resize listeners fire continuously while the user moves the
// page; logging every repaint would drown the console.

#![allow(dead_code)]

use std::sync::atomic::{AtomicUsize, Ordering};

static LOG_COUNT: AtomicUsize = AtomicUsize::new(0);
const MAX_LOGS_PER_WINDOW: usize = 5;

/// Throttled logging - only the first 5 out of every 100 calls get through.
/// Use this instead of `debug_log` in high-frequency handlers.
pub fn debug_throttled(message: &str) {
    // Simple counter-based throttling (no time dependency)
    let current_count = LOG_COUNT.load(Ordering::Relaxed);

    // Reset every 100 calls to approximate throttling
    if current_count >= 100 {
        LOG_COUNT.store(0, Ordering::Relaxed);
    }

    let count = LOG_COUNT.fetch_add(1, Ordering::Relaxed);

    if count < MAX_LOGS_PER_WINDOW {
        log(message);
    } else if count == MAX_LOGS_PER_WINDOW {
        log("log rate limit reached, suppressing further messages...");
    }
}

/// Unthrottled logging for wiring milestones and failures only.
pub fn debug_log(message: &str) {
    log(message);
}

#[cfg(target_arch = "wasm32")]
fn log(message: &str) {
    web_sys::console::log_1(&message.into());
}

#[cfg(not(target_arch = "wasm32"))]
fn log(message: &str) {
    println!("{message}");
}
