//! Failure classification and the log deduplication rule.

use wait_core::{ErrorKind, RemoteError};

/// Buckets a raw driver failure, identified by its wire-protocol error
/// string, into a classified [`RemoteError`]. Unrecognized failures stay
/// retryable as [`ErrorKind::Other`]; an adapter that can prove a
/// failure is unrecoverable should report it as fatal itself.
pub fn classify(raw: &str, message: impl Into<String>) -> RemoteError {
    let kind = match raw {
        "stale element reference" => ErrorKind::StaleReference,
        "element not interactable" | "element click intercepted" => ErrorKind::NotInteractable,
        "no such element" | "no such frame" | "no such window" => ErrorKind::NotFound,
        _ => ErrorKind::Other,
    };
    RemoteError::new(kind, message)
}

/// True when a failure's classification differs from the one logged
/// immediately before it in the same polling session.
pub fn should_log_transition(previous: Option<ErrorKind>, current: ErrorKind) -> bool {
    previous != Some(current)
}
