use std::time::Duration;

use async_trait::async_trait;
use tracing::{info, warn};

use wait_core::RemoteError;

/// Scoped control of the remote surface's own implicit wait setting.
pub trait TimeoutScope: Send + Sync {
    fn current(&self) -> Duration;
    fn apply(&self, timeout: Duration);
}

/// Shrinks the remote timeout on construction and restores the previous
/// value on drop, success and failure alike.
pub struct ScopedTimeout<'a> {
    scope: &'a dyn TimeoutScope,
    previous: Duration,
}

impl<'a> ScopedTimeout<'a> {
    pub fn shrink(scope: &'a dyn TimeoutScope, budget: Duration) -> Self {
        let previous = scope.current();
        scope.apply(budget);
        Self { scope, previous }
    }
}

impl Drop for ScopedTimeout<'_> {
    fn drop(&mut self) {
        self.scope.apply(self.previous);
    }
}

pub struct NullTimeoutScope;

impl TimeoutScope for NullTimeoutScope {
    fn current(&self) -> Duration {
        Duration::ZERO
    }

    fn apply(&self, _timeout: Duration) {}
}

pub trait LogSink: Send + Sync {
    fn info(&self, message: &str);
    fn warn(&self, message: &str);
    fn success(&self, message: &str);
}

/// Routes sink output to the ambient `tracing` subscriber.
pub struct TracingSink;

impl LogSink for TracingSink {
    fn info(&self, message: &str) {
        info!("{}", message);
    }

    fn warn(&self, message: &str) {
        warn!("{}", message);
    }

    fn success(&self, message: &str) {
        info!(status = "ok", "{}", message);
    }
}

pub struct NullSink;

impl LogSink for NullSink {
    fn info(&self, _message: &str) {}
    fn warn(&self, _message: &str) {}
    fn success(&self, _message: &str) {}
}

/// Driver-side element observations the state waiter polls.
#[async_trait]
pub trait ElementPort: Send + Sync {
    async fn is_displayed(&self) -> Result<bool, RemoteError>;
    async fn is_enabled(&self) -> Result<bool, RemoteError>;
    async fn is_selected(&self) -> Result<bool, RemoteError>;
    async fn attribute(&self, name: &str) -> Result<Option<String>, RemoteError>;
}
