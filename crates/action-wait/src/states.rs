//! Element-state and attribute waits layered over the poller.

use std::fmt;

use serde::{Deserialize, Serialize};

use wait_core::{PollResult, ProbeOutcome, RemoteError, WaitError};

use crate::policy::WaitPolicy;
use crate::poller::ConditionPoller;
use crate::ports::ElementPort;

/// Observable element states a wait can target.
#[derive(Clone, Copy, Debug, Eq, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ElementState {
    Enabled,
    Displayed,
    Selected,
    Disabled,
    Unselected,
    Absent,
}

impl ElementState {
    /// States proven by the target's absence or reversal.
    pub fn is_negative(&self) -> bool {
        matches!(
            self,
            ElementState::Disabled | ElementState::Unselected | ElementState::Absent
        )
    }

    /// The positive reading each state is judged against.
    fn aspect(&self) -> &'static str {
        match self {
            ElementState::Enabled | ElementState::Disabled => "enabled",
            ElementState::Displayed | ElementState::Absent => "displayed",
            ElementState::Selected | ElementState::Unselected => "selected",
        }
    }
}

impl fmt::Display for ElementState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            ElementState::Enabled => "enabled",
            ElementState::Displayed => "displayed",
            ElementState::Selected => "selected",
            ElementState::Disabled => "disabled",
            ElementState::Unselected => "unselected",
            ElementState::Absent => "absent",
        };
        f.write_str(label)
    }
}

/// Waits for element states and attribute values with the shared
/// polling discipline.
pub struct StateWaiter {
    poller: ConditionPoller,
}

impl StateWaiter {
    pub fn new(poller: ConditionPoller) -> Self {
        Self { poller }
    }

    /// Polls until the element reaches `state` or the budget runs out.
    /// Negative states (disabled, unselected, absent) automatically use
    /// absence semantics, including the double confirmation rule.
    pub async fn wait_for_state<P>(
        &self,
        port: &P,
        state: ElementState,
        policy: &WaitPolicy,
    ) -> Result<PollResult<bool>, WaitError>
    where
        P: ElementPort + ?Sized,
    {
        let policy = policy.with_negative_check(state.is_negative());
        let probe = move || observe(port, state);
        self.poller.run(probe, &policy).await
    }

    /// Hard form of [`StateWaiter::wait_for_state`]: a timeout is an
    /// error.
    pub async fn expect_state<P>(
        &self,
        port: &P,
        state: ElementState,
        policy: &WaitPolicy,
    ) -> Result<(), WaitError>
    where
        P: ElementPort + ?Sized,
    {
        match self.wait_for_state(port, state, policy).await? {
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

    /// Polls until attribute `name` holds a value containing `fragment`.
    pub async fn wait_for_attribute_value<P>(
        &self,
        port: &P,
        name: &str,
        fragment: &str,
        policy: &WaitPolicy,
    ) -> Result<PollResult<String>, WaitError>
    where
        P: ElementPort + ?Sized,
    {
        let probe = move || async move {
            match port.attribute(name).await {
                Ok(Some(value)) if value.contains(fragment) => ProbeOutcome::Success(value),
                Ok(Some(value)) => ProbeOutcome::Transient(RemoteError::other(format!(
                    "attribute {} is {:?}",
                    name, value
                ))),
                Ok(None) => ProbeOutcome::Transient(RemoteError::not_found(format!(
                    "attribute {} is missing",
                    name
                ))),
                Err(err) => ProbeOutcome::Transient(err),
            }
        };
        self.poller.run(probe, policy).await
    }
}

impl Default for StateWaiter {
    fn default() -> Self {
        Self::new(ConditionPoller::new())
    }
}

async fn observe<P>(port: &P, state: ElementState) -> ProbeOutcome<bool>
where
    P: ElementPort + ?Sized,
{
    let read = match state {
        ElementState::Enabled | ElementState::Disabled => port.is_enabled().await,
        ElementState::Displayed | ElementState::Absent => port.is_displayed().await,
        ElementState::Selected | ElementState::Unselected => port.is_selected().await,
    };
    match read {
        Ok(true) => ProbeOutcome::Success(true),
        Ok(false) => ProbeOutcome::Transient(RemoteError::not_found(format!(
            "element is not {}",
            state.aspect()
        ))),
        Err(err) => ProbeOutcome::Transient(err),
    }
}
