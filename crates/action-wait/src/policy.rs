use serde::{Deserialize, Serialize};
use std::time::Duration;

use thiserror::Error;
use wait_core::WaitError;

pub const DEFAULT_TIMEOUT_MS: u64 = 15_000;
pub const DEFAULT_POLL_INTERVAL_MS: u64 = 500;

/// Policy shapes rejected at construction time.
#[derive(Clone, Copy, Debug, Eq, PartialEq, Error)]
pub enum PolicyError {
    #[error("timeout must be greater than zero")]
    ZeroTimeout,
    #[error("poll interval must be greater than zero")]
    ZeroInterval,
    #[error("poll interval {interval_ms}ms exceeds timeout {timeout_ms}ms")]
    IntervalExceedsTimeout { interval_ms: u64, timeout_ms: u64 },
}

impl From<PolicyError> for WaitError {
    fn from(err: PolicyError) -> Self {
        WaitError::InvalidPolicy(err.to_string())
    }
}

/// How long to keep polling, how often to probe, and whether the wait
/// is satisfied by presence or by proven absence.
#[derive(Clone, Copy, Debug, Eq, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "RawWaitPolicy", into = "RawWaitPolicy")]
pub struct WaitPolicy {
    timeout: Duration,
    poll_interval: Duration,
    negative_check: bool,
}

impl WaitPolicy {
    pub fn new(timeout: Duration, poll_interval: Duration) -> Result<Self, PolicyError> {
        if timeout.is_zero() {
            return Err(PolicyError::ZeroTimeout);
        }
        if poll_interval.is_zero() {
            return Err(PolicyError::ZeroInterval);
        }
        if poll_interval > timeout {
            return Err(PolicyError::IntervalExceedsTimeout {
                interval_ms: poll_interval.as_millis() as u64,
                timeout_ms: timeout.as_millis() as u64,
            });
        }
        Ok(Self {
            timeout,
            poll_interval,
            negative_check: false,
        })
    }

    /// Stock budget for element interactions.
    pub fn interaction() -> Self {
        Self {
            timeout: Duration::from_millis(DEFAULT_TIMEOUT_MS),
            poll_interval: Duration::from_millis(DEFAULT_POLL_INTERVAL_MS),
            negative_check: false,
        }
    }

    /// Short budget for conditions expected to settle quickly.
    pub fn quick() -> Self {
        Self {
            timeout: Duration::from_millis(2_500),
            poll_interval: Duration::from_millis(250),
            negative_check: false,
        }
    }

    pub fn with_negative_check(mut self, negative_check: bool) -> Self {
        self.negative_check = negative_check;
        self
    }

    pub fn timeout(&self) -> Duration {
        self.timeout
    }

    pub fn poll_interval(&self) -> Duration {
        self.poll_interval
    }

    pub fn negative_check(&self) -> bool {
        self.negative_check
    }
}

impl Default for WaitPolicy {
    fn default() -> Self {
        Self::interaction()
    }
}

#[derive(Clone, Debug, Serialize, Deserialize)]
struct RawWaitPolicy {
    timeout_ms: u64,
    poll_interval_ms: u64,
    #[serde(default)]
    negative_check: bool,
}

impl TryFrom<RawWaitPolicy> for WaitPolicy {
    type Error = PolicyError;

    fn try_from(raw: RawWaitPolicy) -> Result<Self, Self::Error> {
        let policy = WaitPolicy::new(
            Duration::from_millis(raw.timeout_ms),
            Duration::from_millis(raw.poll_interval_ms),
        )?;
        Ok(policy.with_negative_check(raw.negative_check))
    }
}

impl From<WaitPolicy> for RawWaitPolicy {
    fn from(policy: WaitPolicy) -> Self {
        Self {
            timeout_ms: policy.timeout.as_millis() as u64,
            poll_interval_ms: policy.poll_interval.as_millis() as u64,
            negative_check: policy.negative_check,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_policy_validation() {
        assert_eq!(
            WaitPolicy::new(Duration::ZERO, Duration::from_millis(500)).unwrap_err(),
            PolicyError::ZeroTimeout
        );
        assert_eq!(
            WaitPolicy::new(Duration::from_millis(1000), Duration::ZERO).unwrap_err(),
            PolicyError::ZeroInterval
        );
        assert_eq!(
            WaitPolicy::new(Duration::from_millis(500), Duration::from_millis(1000)).unwrap_err(),
            PolicyError::IntervalExceedsTimeout {
                interval_ms: 1000,
                timeout_ms: 500
            }
        );
    }

    #[test]
    fn test_policy_error_maps_to_wait_error() {
        let err: WaitError = PolicyError::ZeroTimeout.into();
        assert_eq!(
            err.to_string(),
            "invalid wait policy: timeout must be greater than zero"
        );
    }

    #[test]
    fn test_default_policy_budget() {
        let policy = WaitPolicy::default();
        assert_eq!(policy.timeout(), Duration::from_millis(15_000));
        assert_eq!(policy.poll_interval(), Duration::from_millis(500));
        assert!(!policy.negative_check());
    }

    #[test]
    fn test_negative_check_toggle() {
        let policy = WaitPolicy::quick().with_negative_check(true);
        assert!(policy.negative_check());
        assert!(!policy.with_negative_check(false).negative_check());
    }

    #[test]
    fn test_policy_serializes_as_millis() {
        let policy = WaitPolicy::new(Duration::from_millis(2000), Duration::from_millis(500))
            .unwrap()
            .with_negative_check(true);
        let json = serde_json::to_string(&policy).unwrap();
        assert!(json.contains("\"timeout_ms\":2000"));
        assert!(json.contains("\"poll_interval_ms\":500"));

        let back: WaitPolicy = serde_json::from_str(&json).unwrap();
        assert_eq!(back, policy);
    }

    #[test]
    fn test_deserialize_runs_validation() {
        let err = serde_json::from_str::<WaitPolicy>(r#"{"timeout_ms":0,"poll_interval_ms":500}"#)
            .unwrap_err();
        assert!(err.to_string().contains("timeout must be greater than zero"));
    }
}
