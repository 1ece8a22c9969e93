//! Platform abstraction layer
//!
//! Handles browser/native differences for:
//! - Seeding (wall clock time)
//! - The browser-facing game handle

#[cfg(target_arch = "wasm32")]
pub mod web;

/// Fresh seed for a new session
#[cfg(not(target_arch = "wasm32"))]
pub fn time_seed() -> u64 {
    use std::time::{SystemTime, UNIX_EPOCH};
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_nanos() as u64)
        .unwrap_or(0)
}

/// Fresh seed for a new session
#[cfg(target_arch = "wasm32")]
pub fn time_seed() -> u64 {
    js_sys::Date::now() as u64
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_time_seed_varies() {
        let a = time_seed();
        std::thread::sleep(std::time::Duration::from_millis(2));
        assert_ne!(a, time_seed());
    }
}
