//! Step accounting for the fixpoint loop.
//!
//! Termination of `propagate_and_resolve` follows from monotonicity, so the tracker is only a
//! backstop: a bug that breaks monotonicity surfaces as
//! [`InferenceError::StepLimitExceeded`] instead of a hang.

use crate::knowledge::{InferenceError, InferenceLimits};

#[derive(Debug, Clone)]
/// Tracks passes of a single fixpoint run against [`InferenceLimits`].
pub struct StepTracker {
    limits: InferenceLimits,
    passes: u64,
}

impl StepTracker {
    #[inline]
    pub fn new(limits: InferenceLimits) -> Self {
        Self { limits, passes: 0 }
    }

    #[inline]
    pub fn passes(&self) -> u64 {
        self.passes
    }

    #[inline]
    pub fn bump_passes(&mut self, stage: &'static str) -> Result<(), InferenceError> {
        self.passes = self.passes.saturating_add(1);
        check(stage, "passes", self.limits.max_passes, self.passes)
    }

    /// Checks the current number of live statements.
    #[inline]
    pub fn check_statements(&self, stage: &'static str, live: usize) -> Result<(), InferenceError> {
        check(
            stage,
            "statements",
            self.limits.max_statements as u64,
            live as u64,
        )
    }
}

fn check(
    stage: &'static str,
    metric: &'static str,
    limit: u64,
    observed: u64,
) -> Result<(), InferenceError> {
    if observed > limit {
        return Err(InferenceError::StepLimitExceeded {
            stage,
            metric,
            limit,
            observed,
        });
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn pass_limit_is_inclusive() {
        let mut tracker = StepTracker::new(InferenceLimits {
            max_passes: 2,
            max_statements: 10,
        });
        assert!(tracker.bump_passes("t").is_ok());
        assert!(tracker.bump_passes("t").is_ok());
        let err = tracker.bump_passes("t").unwrap_err();
        assert_eq!(
            err,
            InferenceError::StepLimitExceeded {
                stage: "t",
                metric: "passes",
                limit: 2,
                observed: 3,
            }
        );
    }

    #[test]
    fn statement_limit() {
        let tracker = StepTracker::new(InferenceLimits {
            max_passes: 1,
            max_statements: 3,
        });
        assert!(tracker.check_statements("t", 3).is_ok());
        assert!(tracker.check_statements("t", 4).is_err());
    }
}
