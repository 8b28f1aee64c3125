//! Scripted command executor.

use std::collections::HashMap;
use std::sync::{Arc, Mutex, PoisonError};
use std::time::Duration;

use crate::source::execution::{ExecutionError, Executor};

#[derive(Debug, Clone)]
enum Response {
    Output(String),
    Timeout,
}

/// Executor that answers exact command lines from a script.
///
/// Commands without a scripted response behave like a missing binary and
/// return empty output. Clones share the call counters.
#[derive(Debug, Clone, Default)]
pub struct MockExecutor {
    responses: HashMap<String, Response>,
    calls: Arc<Mutex<HashMap<String, usize>>>,
}

impl MockExecutor {
    pub fn new() -> Self {
        Self::default()
    }

    /// Scripts `command` to print `output`.
    pub fn on(mut self, command: impl Into<String>, output: impl Into<String>) -> Self {
        self.responses
            .insert(command.into(), Response::Output(output.into()));
        self
    }

    /// Scripts `command` to exceed its timeout.
    pub fn timing_out(mut self, command: impl Into<String>) -> Self {
        self.responses.insert(command.into(), Response::Timeout);
        self
    }

    /// Returns how many times `command` has been executed.
    pub fn call_count(&self, command: &str) -> usize {
        let calls = self.calls.lock().unwrap_or_else(PoisonError::into_inner);
        calls.get(command).copied().unwrap_or(0)
    }
}

impl Executor for MockExecutor {
    fn execute(&self, command: &str, timeout: Option<Duration>) -> Result<String, ExecutionError> {
        *self
            .calls
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .entry(command.to_string())
            .or_insert(0) += 1;

        match self.responses.get(command) {
            Some(Response::Output(out)) => Ok(out.trim_end().to_string()),
            Some(Response::Timeout) => Err(ExecutionError::Timeout {
                command: command.to_string(),
                timeout: timeout.unwrap_or(Duration::from_secs(30)),
            }),
            None => Ok(String::new()),
        }
    }
}
