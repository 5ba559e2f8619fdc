//! Bounded-retry condition polling for flaky remote UI surfaces.
//!
//! A caller supplies a probe, one async attempt against the remote
//! surface, and a [`WaitPolicy`]. [`ConditionPoller`] drives the retry
//! loop, deduplicates failure logging, and reports either the probe's
//! value or a timeout carrying full attempt context. [`RetryableAction`]
//! applies the same discipline to mutating actions and [`StateWaiter`]
//! covers the common element-state and attribute waits.

pub mod classify;
pub mod policy;
pub mod poller;
pub mod ports;
pub mod retry;
pub mod states;

pub use classify::{classify, should_log_transition};
pub use policy::{PolicyError, WaitPolicy};
pub use poller::ConditionPoller;
pub use ports::{
    ElementPort, LogSink, NullSink, NullTimeoutScope, ScopedTimeout, TimeoutScope, TracingSink,
};
pub use retry::RetryableAction;
pub use states::{ElementState, StateWaiter};

pub use wait_core::{ErrorKind, PollResult, ProbeOutcome, RemoteError, WaitError};
