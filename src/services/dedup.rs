//! Cooldown cache suppressing repeated violation emission.

use std::collections::HashMap;

/// Seconds during which an (email, address) pair stays suppressed after an
/// emission. Independent of the evaluator's active window; the two happen
/// to share a value.
pub const COOLDOWN_SECONDS: i64 = 60;

/// Tracks the last emission time per (email, address) pair
///
/// A pair that was announced recently stays suppressed until the cooldown
/// expires, so a still-connected excess address produces one record rather
/// than one per poll cycle. The cache lives for the process lifetime and
/// is cleared whenever the source log is truncated.
#[derive(Debug, Default)]
pub struct ViolationCache {
    last_emitted: HashMap<String, HashMap<String, i64>>,
}

impl ViolationCache {
    pub fn new() -> Self {
        Self::default()
    }

    /// Gate one candidate violation
    ///
    /// Returns `true` when the pair is eligible for emission, recording
    /// `now` as its emission time; returns `false` while suppressed.
    pub fn check_and_update(&mut self, email: &str, address: &str, now: i64) -> bool {
        let per_address = self.last_emitted.entry(email.to_string()).or_default();
        match per_address.get(address) {
            Some(last) if now - last <= COOLDOWN_SECONDS => false,
            _ => {
                per_address.insert(address.to_string(), now);
                true
            }
        }
    }

    /// Drop all suppression state
    pub fn clear(&mut self) {
        self.last_emitted.clear();
    }

    pub fn is_empty(&self) -> bool {
        self.last_emitted.is_empty()
    }
}
