//! The bounded-retry loop at the heart of the crate.

use std::future::Future;
use std::sync::Arc;
use std::time::Duration;

use tokio::time::{sleep, Instant};
use tokio_util::sync::CancellationToken;

use wait_core::{ErrorKind, PollResult, ProbeOutcome, RemoteError, WaitError};

use crate::classify::should_log_transition;
use crate::policy::WaitPolicy;
use crate::ports::{LogSink, NullTimeoutScope, ScopedTimeout, TimeoutScope, TracingSink};

pub const DEFAULT_PROBE_BUDGET_MS: u64 = 500;

/// Consecutive absence readings required before a negative wait is
/// declared satisfied. Guards against one flaky reading flipping the
/// result.
const ABSENCE_CONFIRMATIONS: u32 = 2;

/// Drives a probe against the remote surface until it succeeds, fails
/// fatally, or the policy's budget runs out.
///
/// The poller holds no per-session state; every `run` is independent.
pub struct ConditionPoller {
    log: Arc<dyn LogSink>,
    remote_timeouts: Arc<dyn TimeoutScope>,
    probe_budget: Duration,
}

impl ConditionPoller {
    pub fn new() -> Self {
        Self {
            log: Arc::new(TracingSink),
            remote_timeouts: Arc::new(NullTimeoutScope),
            probe_budget: Duration::from_millis(DEFAULT_PROBE_BUDGET_MS),
        }
    }

    pub fn with_log_sink(mut self, sink: Arc<dyn LogSink>) -> Self {
        self.log = sink;
        self
    }

    pub fn with_timeout_scope(mut self, scope: Arc<dyn TimeoutScope>) -> Self {
        self.remote_timeouts = scope;
        self
    }

    /// Budget each single probe is allowed on the remote side. The
    /// remote implicit wait is shrunk to this value for the duration of
    /// every attempt so one slow probe cannot eat the whole timeout.
    pub fn with_probe_budget(mut self, budget: Duration) -> Self {
        self.probe_budget = budget;
        self
    }

    pub(crate) fn sink(&self) -> &dyn LogSink {
        self.log.as_ref()
    }

    /// Polls `probe` until it reports success or the budget runs out.
    ///
    /// Completion and timeout are ordinary results carrying attempt
    /// context; fatal failures and cancellation surface as `Err`.
    pub async fn run<T, F, Fut>(
        &self,
        probe: F,
        policy: &WaitPolicy,
    ) -> Result<PollResult<T>, WaitError>
    where
        T: Default,
        F: FnMut() -> Fut,
        Fut: Future<Output = ProbeOutcome<T>>,
    {
        let mut noop = || {};
        self.run_inner(probe, policy, None, &mut noop).await
    }

    /// Like [`ConditionPoller::run`], checking `cancel` at the top of
    /// every iteration.
    pub async fn run_with_cancel<T, F, Fut>(
        &self,
        probe: F,
        policy: &WaitPolicy,
        cancel: &CancellationToken,
    ) -> Result<PollResult<T>, WaitError>
    where
        T: Default,
        F: FnMut() -> Fut,
        Fut: Future<Output = ProbeOutcome<T>>,
    {
        let mut noop = || {};
        self.run_inner(probe, policy, Some(cancel), &mut noop).await
    }

    /// Convenience for callers that treat a timeout as a hard error.
    pub async fn run_to_value<T, F, Fut>(&self, probe: F, policy: &WaitPolicy) -> Result<T, WaitError>
    where
        T: Default,
        F: FnMut() -> Fut,
        Fut: Future<Output = ProbeOutcome<T>>,
    {
        match self.run(probe, policy).await? {
            PollResult::Completed { value, .. } => Ok(value),
            PollResult::TimedOut {
                last_error,
                attempts,
            } => Err(WaitError::Timeout {
                last_error,
                attempts,
            }),
        }
    }

    pub(crate) async fn run_inner<T, F, Fut>(
        &self,
        mut probe: F,
        policy: &WaitPolicy,
        cancel: Option<&CancellationToken>,
        on_transient: &mut impl FnMut(),
    ) -> Result<PollResult<T>, WaitError>
    where
        T: Default,
        F: FnMut() -> Fut,
        Fut: Future<Output = ProbeOutcome<T>>,
    {
        let started = Instant::now();
        let mut attempts: u32 = 0;
        let mut last_kind: Option<ErrorKind> = None;
        let mut last_error: Option<RemoteError> = None;
        let mut absence_streak: u32 = 0;

        loop {
            if let Some(token) = cancel {
                if token.is_cancelled() {
                    return Err(WaitError::Cancelled { attempts });
                }
            }

            attempts += 1;
            let outcome = {
                let _scoped =
                    ScopedTimeout::shrink(self.remote_timeouts.as_ref(), self.probe_budget);
                probe().await
            };

            match outcome {
                ProbeOutcome::Success(value) => {
                    if !policy.negative_check() {
                        self.report_success(attempts);
                        return Ok(PollResult::Completed {
                            value,
                            attempts,
                            elapsed: started.elapsed(),
                        });
                    }
                    // The target is still present; an absence wait keeps going.
                    absence_streak = 0;
                }
                ProbeOutcome::Transient(err) => {
                    if should_log_transition(last_kind, err.kind) {
                        self.log.warn(&format!("still waiting: {}", err));
                    }
                    last_kind = Some(err.kind);
                    if policy.negative_check() {
                        if err.kind.implies_absence() {
                            self.report_success(attempts);
                            return Ok(PollResult::Completed {
                                value: T::default(),
                                attempts,
                                elapsed: started.elapsed(),
                            });
                        }
                        absence_streak += 1;
                        if absence_streak >= ABSENCE_CONFIRMATIONS {
                            self.report_success(attempts);
                            return Ok(PollResult::Completed {
                                value: T::default(),
                                attempts,
                                elapsed: started.elapsed(),
                            });
                        }
                    }
                    last_error = Some(err);
                    on_transient();
                }
                ProbeOutcome::Fatal(error) => {
                    return Err(WaitError::Fatal { error, attempts });
                }
            }

            // Stop before a sleep that would carry us past the budget.
            if started.elapsed() + policy.poll_interval() >= policy.timeout() {
                return Ok(PollResult::TimedOut {
                    last_error,
                    attempts,
                });
            }
            sleep(policy.poll_interval()).await;
        }
    }

    fn report_success(&self, attempts: u32) {
        if attempts > 1 {
            self.log
                .success(&format!("condition satisfied after {} attempt(s)", attempts));
        }
    }
}

impl Default for ConditionPoller {
    fn default() -> Self {
        Self::new()
    }
}
