//! Shared vocabulary for the wait engine: failure classification,
//! per-attempt probe outcomes, and terminal poll results.

use std::fmt;
use std::time::Duration;

use thiserror::Error;

/// Classification of a failure raised while talking to the remote surface.
#[cfg_attr(feature = "serde-full", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde-full", serde(rename_all = "snake_case"))]
#[derive(Clone, Copy, Debug, Eq, PartialEq, Hash)]
pub enum ErrorKind {
    StaleReference,
    NotInteractable,
    NotFound,
    Other,
}

impl ErrorKind {
    /// A stale handle means the element left the DOM; for a wait on
    /// disappearance that is already the answer.
    pub fn implies_absence(&self) -> bool {
        matches!(self, ErrorKind::StaleReference)
    }
}

impl fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            ErrorKind::StaleReference => "stale reference",
            ErrorKind::NotInteractable => "not interactable",
            ErrorKind::NotFound => "not found",
            ErrorKind::Other => "remote error",
        };
        f.write_str(label)
    }
}

/// A classified failure from one probe of the remote surface.
#[cfg_attr(feature = "serde-full", derive(serde::Serialize, serde::Deserialize))]
#[derive(Clone, Debug, Eq, PartialEq, Error)]
#[error("{kind}: {message}")]
pub struct RemoteError {
    pub kind: ErrorKind,
    pub message: String,
}

impl RemoteError {
    pub fn new(kind: ErrorKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            message: message.into(),
        }
    }

    pub fn stale(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::StaleReference, message)
    }

    pub fn not_interactable(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::NotInteractable, message)
    }

    pub fn not_found(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::NotFound, message)
    }

    pub fn other(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::Other, message)
    }
}

/// What a single probe attempt reported.
#[derive(Clone, Debug, Eq, PartialEq)]
pub enum ProbeOutcome<T> {
    /// The condition held, or the action landed.
    Success(T),
    /// A retryable failure; the poller keeps going.
    Transient(RemoteError),
    /// A failure no amount of retrying will fix.
    Fatal(RemoteError),
}

impl<T> ProbeOutcome<T> {
    pub fn is_success(&self) -> bool {
        matches!(self, ProbeOutcome::Success(_))
    }

    pub fn kind(&self) -> Option<ErrorKind> {
        match self {
            ProbeOutcome::Success(_) => None,
            ProbeOutcome::Transient(err) | ProbeOutcome::Fatal(err) => Some(err.kind),
        }
    }
}

/// Terminal outcome of one polling session.
#[derive(Clone, Debug, Eq, PartialEq)]
pub enum PollResult<T> {
    /// The condition was met within budget.
    Completed {
        value: T,
        attempts: u32,
        elapsed: Duration,
    },
    /// The budget ran out; the last classified failure is kept for the
    /// caller to inspect or report.
    TimedOut {
        last_error: Option<RemoteError>,
        attempts: u32,
    },
}

impl<T> PollResult<T> {
    pub fn attempts(&self) -> u32 {
        match self {
            PollResult::Completed { attempts, .. } | PollResult::TimedOut { attempts, .. } => {
                *attempts
            }
        }
    }

    pub fn is_completed(&self) -> bool {
        matches!(self, PollResult::Completed { .. })
    }

    pub fn last_kind(&self) -> Option<ErrorKind> {
        match self {
            PollResult::Completed { .. } => None,
            PollResult::TimedOut { last_error, .. } => last_error.as_ref().map(|err| err.kind),
        }
    }

    pub fn into_value(self) -> Option<T> {
        match self {
            PollResult::Completed { value, .. } => Some(value),
            PollResult::TimedOut { .. } => None,
        }
    }
}

/// Failure surface the engine hands back to callers.
#[derive(Clone, Debug, Eq, PartialEq, Error)]
pub enum WaitError {
    #[error("invalid wait policy: {0}")]
    InvalidPolicy(String),

    #[error("condition not met after {attempts} attempt(s)")]
    Timeout {
        last_error: Option<RemoteError>,
        attempts: u32,
    },

    #[error("{error}")]
    Fatal { error: RemoteError, attempts: u32 },

    #[error("wait cancelled after {attempts} attempt(s)")]
    Cancelled { attempts: u32 },
}

impl WaitError {
    pub fn last_kind(&self) -> Option<ErrorKind> {
        match self {
            WaitError::Timeout { last_error, .. } => last_error.as_ref().map(|err| err.kind),
            WaitError::Fatal { error, .. } => Some(error.kind),
            WaitError::InvalidPolicy(_) | WaitError::Cancelled { .. } => None,
        }
    }

    pub fn attempts(&self) -> Option<u32> {
        match self {
            WaitError::Timeout { attempts, .. }
            | WaitError::Fatal { attempts, .. }
            | WaitError::Cancelled { attempts } => Some(*attempts),
            WaitError::InvalidPolicy(_) => None,
        }
    }
}
