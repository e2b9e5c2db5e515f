use std::sync::atomic::{AtomicBool, Ordering};

use crate::error::RemoteError;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GuardState {
    /// A command may be issued
    Idle,
    /// A command is in flight; further issuance is rejected
    Pending,
}

/// Result of asking for an actuator command.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CommandOutcome {
    /// The write reached the store
    Issued,
    /// Rejected: an earlier request has not resolved yet
    AlreadyPending,
    /// Rejected: the actuator is already running
    AlreadyActive,
    /// The write failed and the optimistic state was rolled back
    Failed(RemoteError),
}

impl CommandOutcome {
    pub fn is_issued(&self) -> bool {
        matches!(self, CommandOutcome::Issued)
    }
}

/// Serializes one actuator command: `Idle -> Pending -> Idle`.
///
/// The transition into `Pending` happens synchronously in [`try_begin`], before
/// the caller reaches its first await point, so two taps in the same scheduling
/// slice cannot both issue a write.
///
/// [`try_begin`]: CommandGuard::try_begin
#[derive(Debug)]
pub struct CommandGuard {
    name: &'static str,
    pending: AtomicBool,
}

impl CommandGuard {
    pub fn new(name: &'static str) -> Self {
        Self {
            name,
            pending: AtomicBool::new(false),
        }
    }

    pub fn name(&self) -> &'static str {
        self.name
    }

    pub fn state(&self) -> GuardState {
        if self.pending.load(Ordering::Acquire) {
            GuardState::Pending
        } else {
            GuardState::Idle
        }
    }

    /// Enters `Pending`, or returns `None` when a command is already in flight.
    /// The guard returns to `Idle` when the permit is dropped.
    pub fn try_begin(&self) -> Option<PendingCommand<'_>> {
        self.pending
            .compare_exchange(false, true, Ordering::AcqRel, Ordering::Acquire)
            .ok()
            .map(|_| PendingCommand { guard: self })
    }
}

#[must_use = "dropping the permit immediately returns the guard to Idle"]
#[derive(Debug)]
pub struct PendingCommand<'a> {
    guard: &'a CommandGuard,
}

impl Drop for PendingCommand<'_> {
    fn drop(&mut self) {
        self.guard.pending.store(false, Ordering::Release);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_second_begin_is_rejected_while_pending() {
        let guard = CommandGuard::new("pump");
        assert_eq!(guard.state(), GuardState::Idle);

        let permit = guard.try_begin();
        assert!(permit.is_some());
        assert_eq!(guard.state(), GuardState::Pending);
        assert!(guard.try_begin().is_none());

        drop(permit);
        assert_eq!(guard.state(), GuardState::Idle);
        assert!(guard.try_begin().is_some());
    }

    #[test]
    fn test_outcome_helpers() {
        assert!(CommandOutcome::Issued.is_issued());
        assert!(!CommandOutcome::AlreadyPending.is_issued());
        assert!(!CommandOutcome::Failed(RemoteError::Conflict).is_issued());
    }
}
