//! Optimistic boolean toggle used by dashboard clients.
//!
//! A client flips a flag (e.g. an order's "sent" checkbox) before the server
//! confirms it. The toggle moves `Idle → Pending → {Committed | RolledBack}`
//! and the outcome is decided only by the endpoint's result.

use serde::{Deserialize, Serialize};

/// Phase of an optimistic toggle.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum TogglePhase {
    /// No change in flight.
    #[default]
    Idle,
    /// Displayed value flipped, waiting for the server.
    Pending,
    /// Server accepted the new value.
    Committed,
    /// Server rejected the change; displayed value restored.
    RolledBack,
}

/// Errors from driving the toggle out of order.
#[derive(thiserror::Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum ToggleError {
    /// `begin` was called while a change was still pending.
    #[error("a change is already pending")]
    AlreadyPending,
    /// `resolve` was called without a pending change.
    #[error("no change is pending")]
    NotPending,
}

/// Client-side state for an optimistically toggled flag.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct OptimisticToggle {
    displayed: bool,
    previous: Option<bool>,
    phase: TogglePhase,
}

impl OptimisticToggle {
    /// Start from the value last confirmed by the server.
    #[must_use]
    pub const fn new(confirmed: bool) -> Self {
        Self {
            displayed: confirmed,
            previous: None,
            phase: TogglePhase::Idle,
        }
    }

    /// Value the UI should render.
    #[must_use]
    pub const fn displayed(&self) -> bool {
        self.displayed
    }

    /// Current phase.
    #[must_use]
    pub const fn phase(&self) -> TogglePhase {
        self.phase
    }

    /// Flip the displayed value and return the value to send to the server.
    ///
    /// # Errors
    ///
    /// Returns `ToggleError::AlreadyPending` if a previous change has not
    /// been resolved yet.
    pub fn begin(&mut self) -> Result<bool, ToggleError> {
        if matches!(self.phase, TogglePhase::Pending) {
            return Err(ToggleError::AlreadyPending);
        }
        self.previous = Some(self.displayed);
        self.displayed = !self.displayed;
        self.phase = TogglePhase::Pending;
        Ok(self.displayed)
    }

    /// Settle a pending change with the server's outcome.
    ///
    /// On success the flipped value stays; on failure the previous value is
    /// restored.
    ///
    /// # Errors
    ///
    /// Returns `ToggleError::NotPending` if no change is in flight.
    pub fn resolve<T, E>(&mut self, outcome: &Result<T, E>) -> Result<TogglePhase, ToggleError> {
        let previous = match (self.phase, self.previous) {
            (TogglePhase::Pending, Some(previous)) => previous,
            _ => return Err(ToggleError::NotPending),
        };

        self.previous = None;
        self.phase = if outcome.is_ok() {
            TogglePhase::Committed
        } else {
            self.displayed = previous;
            TogglePhase::RolledBack
        };
        Ok(self.phase)
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_starts_idle() {
        let toggle = OptimisticToggle::new(false);
        assert_eq!(toggle.phase(), TogglePhase::Idle);
        assert!(!toggle.displayed());
    }

    #[test]
    fn test_begin_flips_displayed_value() {
        let mut toggle = OptimisticToggle::new(false);
        assert!(toggle.begin().unwrap());
        assert!(toggle.displayed());
        assert_eq!(toggle.phase(), TogglePhase::Pending);
    }

    #[test]
    fn test_commit_keeps_new_value() {
        let mut toggle = OptimisticToggle::new(false);
        toggle.begin().unwrap();
        let outcome: Result<(), &str> = Ok(());
        assert_eq!(toggle.resolve(&outcome).unwrap(), TogglePhase::Committed);
        assert!(toggle.displayed());
    }

    #[test]
    fn test_failure_rolls_back() {
        let mut toggle = OptimisticToggle::new(true);
        toggle.begin().unwrap();
        assert!(!toggle.displayed());
        let outcome: Result<(), &str> = Err("500");
        assert_eq!(toggle.resolve(&outcome).unwrap(), TogglePhase::RolledBack);
        assert!(toggle.displayed());
    }

    #[test]
    fn test_double_begin_rejected() {
        let mut toggle = OptimisticToggle::new(false);
        toggle.begin().unwrap();
        assert_eq!(toggle.begin(), Err(ToggleError::AlreadyPending));
    }

    #[test]
    fn test_resolve_without_begin_rejected() {
        let mut toggle = OptimisticToggle::new(false);
        let outcome: Result<(), &str> = Ok(());
        assert_eq!(toggle.resolve(&outcome), Err(ToggleError::NotPending));
    }

    #[test]
    fn test_can_toggle_again_after_settling() {
        let mut toggle = OptimisticToggle::new(false);
        toggle.begin().unwrap();
        toggle.resolve(&Ok::<(), ()>(())).unwrap();
        assert!(!toggle.begin().unwrap());
        assert_eq!(toggle.phase(), TogglePhase::Pending);
    }
}
