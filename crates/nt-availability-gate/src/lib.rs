#![deny(clippy::pedantic, unsafe_code)]
#![allow(clippy::module_name_repetitions)]

//! Upstream Availability Gate (component J).
//!
//! A process-wide circuit breaker shared by the download worker (G) and
//! consulted by the downloads publisher (F). State lives behind a single
//! mutex; every transition is a handful of comparisons so contention is
//! never a concern.

use chrono::{DateTime, Utc};
use std::sync::Mutex;
use std::time::Duration;

#[derive(Debug, Clone, Copy)]
struct GateState {
    is_available: bool,
    unavailable_since: Option<DateTime<Utc>>,
}

impl Default for GateState {
    fn default() -> Self {
        Self {
            is_available: true,
            unavailable_since: None,
        }
    }
}

/// Shared, thread-safe availability gate.
pub struct AvailabilityGate {
    state: Mutex<GateState>,
    cooldown: Duration,
}

impl AvailabilityGate {
    #[must_use]
    pub fn new(cooldown: Duration) -> Self {
        Self {
            state: Mutex::new(GateState::default()),
            cooldown,
        }
    }

    /// Mark upstream unavailable, recording the time, but only if it was
    /// previously available (repeated failures don't reset the clock).
    ///
    /// Returns `true` if this call performed the transition.
    pub fn mark_unavailable(&self) -> bool {
        let mut state = self.state.lock().unwrap_or_else(std::sync::PoisonError::into_inner);
        if state.is_available {
            state.is_available = false;
            state.unavailable_since = Some(Utc::now());
            true
        } else {
            false
        }
    }

    /// Reset to available, clearing the outage timestamp.
    pub fn mark_available(&self) {
        let mut state = self.state.lock().unwrap_or_else(std::sync::PoisonError::into_inner);
        state.is_available = true;
        state.unavailable_since = None;
    }

    /// Read current availability. Auto-resets (without clearing
    /// `unavailable_since`'s history) once the cooldown has elapsed since
    /// the last transition to unavailable, letting the caller attempt a
    /// probe request.
    #[must_use]
    pub fn is_available(&self) -> bool {
        let state = self.state.lock().unwrap_or_else(std::sync::PoisonError::into_inner);
        if state.is_available {
            return true;
        }
        match state.unavailable_since {
            Some(since) => {
                let elapsed = Utc::now().signed_duration_since(since);
                elapsed.to_std().map(|d| d >= self.cooldown).unwrap_or(false)
            }
            None => true,
        }
    }

    #[must_use]
    pub fn unavailable_since(&self) -> Option<DateTime<Utc>> {
        self.state
            .lock()
            .unwrap_or_else(std::sync::PoisonError::into_inner)
            .unavailable_since
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn starts_available() {
        let gate = AvailabilityGate::new(Duration::from_secs(300));
        assert!(gate.is_available());
        assert!(gate.unavailable_since().is_none());
    }

    #[test]
    fn mark_unavailable_is_idempotent_on_the_clock() {
        let gate = AvailabilityGate::new(Duration::from_secs(300));
        assert!(gate.mark_unavailable());
        let first = gate.unavailable_since();
        assert!(!gate.mark_unavailable());
        assert_eq!(gate.unavailable_since(), first);
    }

    #[test]
    fn mark_available_clears_state() {
        let gate = AvailabilityGate::new(Duration::from_secs(300));
        gate.mark_unavailable();
        gate.mark_available();
        assert!(gate.is_available());
        assert!(gate.unavailable_since().is_none());
    }

    #[test]
    fn auto_resets_after_cooldown_elapses() {
        let gate = AvailabilityGate::new(Duration::from_millis(0));
        gate.mark_unavailable();
        assert!(gate.is_available());
    }

    #[test]
    fn stays_unavailable_within_cooldown() {
        let gate = AvailabilityGate::new(Duration::from_secs(300));
        gate.mark_unavailable();
        assert!(!gate.is_available());
    }
}
