//! Utility functions for hand-raise-rs.

use std::collections::HashSet;
use std::sync::Mutex;
use std::sync::OnceLock;

use crate::{Error, Result};

/// Check that an input value is finite.
///
/// # Arguments
/// * `name` - What the value is, used in the error message
/// * `value` - The value to check
pub fn validate_finite(name: &str, value: f64) -> Result<f64> {
    if value.is_finite() {
        Ok(value)
    } else {
        Err(Error::InvalidSample(format!("{} must be finite, got {}", name, value)))
    }
}

/// Global set of warned messages (for warn_once).
static WARNED_MESSAGES: OnceLock<Mutex<HashSet<String>>> = OnceLock::new();

/// Log a warning message only once per process.
///
/// Subsequent calls with the same message are ignored.
pub fn warn_once(message: &str) {
    let warned = WARNED_MESSAGES.get_or_init(|| Mutex::new(HashSet::new()));
    let Ok(mut guard) = warned.lock() else {
        return;
    };
    if guard.insert(message.to_string()) {
        log::warn!("{}", message);
    }
}
