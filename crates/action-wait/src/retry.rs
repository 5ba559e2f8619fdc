//! Retry discipline for mutating actions.

use std::future::Future;

use wait_core::{PollResult, ProbeOutcome, WaitError};

use crate::policy::WaitPolicy;
use crate::poller::ConditionPoller;

/// Wraps a mutating action in the polling discipline: try once,
/// classify the failure, optionally recover, try again.
pub struct RetryableAction {
    poller: ConditionPoller,
}

impl RetryableAction {
    pub fn new(poller: ConditionPoller) -> Self {
        Self { poller }
    }

    /// Attempts `action` until it lands or the budget runs out.
    pub async fn attempt<F, Fut>(&self, action: F, policy: &WaitPolicy) -> Result<(), WaitError>
    where
        F: FnMut() -> Fut,
        Fut: Future<Output = ProbeOutcome<()>>,
    {
        let mut noop = || {};
        finish(self.poller.run_inner(action, policy, None, &mut noop).await?)
    }

    /// Attempts `action`, running `before_retry` after every failed try.
    /// The hook never runs ahead of the first attempt; on a run of N
    /// attempts it has executed N - 1 times when the action finally
    /// lands, or N times when the budget runs out.
    pub async fn attempt_with_recovery<F, Fut, R>(
        &self,
        action: F,
        mut before_retry: R,
        policy: &WaitPolicy,
    ) -> Result<(), WaitError>
    where
        F: FnMut() -> Fut,
        Fut: Future<Output = ProbeOutcome<()>>,
        R: FnMut(),
    {
        finish(
            self.poller
                .run_inner(action, policy, None, &mut before_retry)
                .await?,
        )
    }

    /// Soft variant: a timeout reports `Ok(false)` instead of failing,
    /// for interactions that are allowed to find nothing.
    pub async fn attempt_if_present<F, Fut>(
        &self,
        action: F,
        policy: &WaitPolicy,
    ) -> Result<bool, WaitError>
    where
        F: FnMut() -> Fut,
        Fut: Future<Output = ProbeOutcome<()>>,
    {
        match self.poller.run(action, policy).await? {
            PollResult::Completed { .. } => Ok(true),
            PollResult::TimedOut {
                last_error,
                attempts,
            } => {
                let detail = last_error
                    .map(|err| err.to_string())
                    .unwrap_or_else(|| "condition never held".to_string());
                self.poller
                    .sink()
                    .warn(&format!("proceeding after {} attempt(s): {}", attempts, detail));
                Ok(false)
            }
        }
    }
}

impl Default for RetryableAction {
    fn default() -> Self {
        Self::new(ConditionPoller::new())
    }
}

fn finish(result: PollResult<()>) -> Result<(), WaitError> {
    match result {
        PollResult::Completed { .. } => Ok(()),
        PollResult::TimedOut {
            last_error,
            attempts,
        } => Err(WaitError::Timeout {
            last_error,
            attempts,
        }),
    }
}
