use std::sync::{Arc, Mutex};

use pkgtrust::prelude::*;

/// Mock ProgressReporter that records every message for assertions
///
/// The recorded log is shared behind an `Arc` so tests can keep a handle
/// after moving the reporter into a use case.
pub struct MockProgressReporter {
    messages: Arc<Mutex<Vec<String>>>,
}

impl MockProgressReporter {
    pub fn new() -> Self {
        Self {
            messages: Arc::new(Mutex::new(Vec::new())),
        }
    }

    /// A handle onto the shared message log.
    pub fn handle(&self) -> Arc<Mutex<Vec<String>>> {
        self.messages.clone()
    }

    fn record(&self, message: String) {
        self.messages.lock().unwrap().push(message);
    }
}

impl Default for MockProgressReporter {
    fn default() -> Self {
        Self::new()
    }
}

impl ProgressReporter for MockProgressReporter {
    fn report(&self, message: &str) {
        self.record(message.to_string());
    }

    fn report_progress(&self, current: usize, total: usize, message: Option<&str>) {
        self.record(format!(
            "[{}/{}] {}",
            current,
            total,
            message.unwrap_or("")
        ));
    }

    fn report_error(&self, message: &str) {
        self.record(format!("error: {}", message));
    }

    fn report_completion(&self, message: &str) {
        self.record(format!("done: {}", message));
    }
}
