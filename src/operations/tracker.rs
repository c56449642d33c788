//! Phase tracking for a single operation invocation.
//!
//! ```text
//! Started -> (Resolving)? -> Mutating -> (AwaitingJob)? -> Completed | Failed
//! ```
//!
//! Read-only lookups end at `Resolving -> Completed`. Any non-terminal phase
//! may move to `Failed`.

use std::fmt;

use crate::error::{CfError, ErrorKind, Result};

/// Where an operation currently is.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
    Started,
    Resolving,
    Mutating,
    AwaitingJob,
    Completed,
    Failed(ErrorKind),
}

impl Phase {
    fn as_str(self) -> &'static str {
        match self {
            Self::Started => "started",
            Self::Resolving => "resolving",
            Self::Mutating => "mutating",
            Self::AwaitingJob => "awaiting_job",
            Self::Completed => "completed",
            Self::Failed(_) => "failed",
        }
    }

    /// Whether the operation has ended.
    pub fn is_terminal(self) -> bool {
        matches!(self, Self::Completed | Self::Failed(_))
    }

    fn can_advance_to(self, to: Phase) -> bool {
        use Phase::*;
        match (self, to) {
            (from, Failed(_)) => !from.is_terminal(),
            (Started, Resolving | Mutating) => true,
            (Resolving, Mutating | Completed) => true,
            (Mutating, AwaitingJob | Completed) => true,
            (AwaitingJob, Completed) => true,
            _ => false,
        }
    }
}

impl fmt::Display for Phase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Records the phases of one operation and rejects illegal transitions.
#[derive(Debug)]
pub struct OperationTracker {
    operation: &'static str,
    phase: Phase,
}

impl OperationTracker {
    pub fn new(operation: &'static str) -> Self {
        tracing::debug!(operation, "operation started");
        Self {
            operation,
            phase: Phase::Started,
        }
    }

    pub fn phase(&self) -> Phase {
        self.phase
    }

    /// Move to `to`.
    ///
    /// # Errors
    ///
    /// Returns [`CfError::InvalidState`] if the transition is not allowed.
    pub fn advance(&mut self, to: Phase) -> Result<()> {
        if !self.phase.can_advance_to(to) {
            return Err(CfError::InvalidState {
                from: self.phase.as_str(),
                to: to.as_str(),
            });
        }
        tracing::debug!(
            operation = self.operation,
            from = %self.phase,
            to = %to,
            "operation phase changed"
        );
        self.phase = to;
        Ok(())
    }

    /// Mark the operation failed with `error` and hand the error back.
    ///
    /// An operation that already ended keeps its phase.
    pub fn fail(&mut self, error: CfError) -> CfError {
        let kind = error.kind();
        if self.phase.is_terminal() {
            return error;
        }
        tracing::debug!(
            operation = self.operation,
            from = %self.phase,
            kind = ?kind,
            error = %error,
            "operation failed"
        );
        self.phase = Phase::Failed(kind);
        error
    }

    /// Pass `result` through, failing the operation on `Err`.
    pub fn track<T>(&mut self, result: Result<T>) -> Result<T> {
        result.map_err(|error| self.fail(error))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_mutation_with_job() {
        let mut tracker = OperationTracker::new("delete-space");
        tracker.advance(Phase::Resolving).unwrap();
        tracker.advance(Phase::Mutating).unwrap();
        tracker.advance(Phase::AwaitingJob).unwrap();
        tracker.advance(Phase::Completed).unwrap();
        assert!(tracker.phase().is_terminal());
    }

    #[test]
    fn test_lookup_completes_after_resolving() {
        let mut tracker = OperationTracker::new("get-space");
        tracker.advance(Phase::Resolving).unwrap();
        tracker.advance(Phase::Completed).unwrap();
        assert_eq!(tracker.phase(), Phase::Completed);
    }

    #[test]
    fn test_completed_cannot_mutate_again() {
        let mut tracker = OperationTracker::new("delete-space");
        tracker.advance(Phase::Mutating).unwrap();
        tracker.advance(Phase::Completed).unwrap();

        let err = tracker.advance(Phase::Mutating).unwrap_err();
        assert!(matches!(
            err,
            CfError::InvalidState {
                from: "completed",
                to: "mutating"
            }
        ));
        assert_eq!(tracker.phase(), Phase::Completed);
    }

    #[test]
    fn test_cannot_await_job_without_mutation() {
        let mut tracker = OperationTracker::new("delete-space");
        assert!(tracker.advance(Phase::AwaitingJob).is_err());
        tracker.advance(Phase::Resolving).unwrap();
        assert!(tracker.advance(Phase::AwaitingJob).is_err());
    }

    #[test]
    fn test_failure_records_kind_and_is_terminal() {
        let mut tracker = OperationTracker::new("delete-service-instance");
        tracker.advance(Phase::Resolving).unwrap();

        let result: Result<()> = Err(CfError::not_found("Service instance", "db"));
        let err = tracker.track(result).unwrap_err();

        assert_eq!(err.kind(), ErrorKind::NotFound);
        assert_eq!(tracker.phase(), Phase::Failed(ErrorKind::NotFound));
        assert!(tracker.advance(Phase::Mutating).is_err());

        // A second failure does not overwrite the first.
        tracker.fail(CfError::ConfigMissing("x".to_string()));
        assert_eq!(tracker.phase(), Phase::Failed(ErrorKind::NotFound));
    }
}
