#![allow(dead_code)]

//! Shared doubles for the integration suites.

use std::sync::Mutex;
use std::time::Duration;

use action_wait::{LogSink, TimeoutScope, WaitPolicy};

pub fn policy_ms(timeout: u64, interval: u64) -> WaitPolicy {
    WaitPolicy::new(
        Duration::from_millis(timeout),
        Duration::from_millis(interval),
    )
    .unwrap()
}

/// Sink that records every line per channel.
#[derive(Default)]
pub struct RecordingSink {
    pub info_lines: Mutex<Vec<String>>,
    pub warn_lines: Mutex<Vec<String>>,
    pub success_lines: Mutex<Vec<String>>,
}

impl RecordingSink {
    pub fn warn_count(&self) -> usize {
        self.warn_lines.lock().unwrap().len()
    }

    pub fn success_count(&self) -> usize {
        self.success_lines.lock().unwrap().len()
    }

    pub fn last_warn(&self) -> Option<String> {
        self.warn_lines.lock().unwrap().last().cloned()
    }
}

impl LogSink for RecordingSink {
    fn info(&self, message: &str) {
        self.info_lines.lock().unwrap().push(message.to_string());
    }

    fn warn(&self, message: &str) {
        self.warn_lines.lock().unwrap().push(message.to_string());
    }

    fn success(&self, message: &str) {
        self.success_lines.lock().unwrap().push(message.to_string());
    }
}

/// Timeout scope that records every value applied to it.
pub struct RecordingScope {
    pub initial: Duration,
    pub applied: Mutex<Vec<Duration>>,
    value: Mutex<Duration>,
}

impl RecordingScope {
    pub fn new(initial: Duration) -> Self {
        Self {
            initial,
            applied: Mutex::new(Vec::new()),
            value: Mutex::new(initial),
        }
    }

    pub fn current_value(&self) -> Duration {
        *self.value.lock().unwrap()
    }

    pub fn applied_values(&self) -> Vec<Duration> {
        self.applied.lock().unwrap().clone()
    }
}

impl TimeoutScope for RecordingScope {
    fn current(&self) -> Duration {
        *self.value.lock().unwrap()
    }

    fn apply(&self, timeout: Duration) {
        *self.value.lock().unwrap() = timeout;
        self.applied.lock().unwrap().push(timeout);
    }
}
