use crate::ports::outbound::ProgressReporter;
use indicatif::{ProgressBar, ProgressStyle};
use std::cell::RefCell;

/// StderrProgressReporter adapter for reporting scan progress to stderr
///
/// This adapter implements the ProgressReporter port, writing progress
/// information to stderr so it doesn't interfere with the report on stdout.
/// Uses indicatif for the per-package progress bar.
pub struct StderrProgressReporter {
    progress_bar: RefCell<Option<ProgressBar>>,
}

impl StderrProgressReporter {
    pub fn new() -> Self {
        Self {
            progress_bar: RefCell::new(None),
        }
    }

    fn get_or_create_progress_bar(&self, total: usize) -> ProgressBar {
        let mut pb_option = self.progress_bar.borrow_mut();
        if let Some(pb) = pb_option.as_ref() {
            pb.clone()
        } else {
            let pb = ProgressBar::new(total as u64);
            pb.set_style(
                ProgressStyle::default_bar()
                    .template("   {spinner:.green} [{bar:40.cyan/blue}] {pos}/{len} - {msg}")
                    .expect("Failed to set progress bar template")
                    .progress_chars("=>-"),
            );
            *pb_option = Some(pb.clone());
            pb
        }
    }
}

impl Default for StderrProgressReporter {
    fn default() -> Self {
        Self::new()
    }
}

impl ProgressReporter for StderrProgressReporter {
    fn report(&self, message: &str) {
        eprintln!("{}", message);
    }

    fn report_progress(&self, current: usize, total: usize, message: Option<&str>) {
        let pb = self.get_or_create_progress_bar(total);
        pb.set_position(current as u64);
        if let Some(msg) = message {
            pb.set_message(msg.to_string());
        }
    }

    fn report_error(&self, message: &str) {
        if let Some(pb) = self.progress_bar.borrow().as_ref() {
            pb.finish_and_clear();
        }
        eprintln!("{}", message);
    }

    fn report_completion(&self, message: &str) {
        if let Some(pb) = self.progress_bar.borrow().as_ref() {
            pb.finish_and_clear();
        }
        eprintln!();
        eprintln!("{}", message);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_progress_reporter_does_not_panic() {
        let reporter = StderrProgressReporter::new();
        reporter.report("Scanning");
        reporter.report_progress(1, 3, Some("express@4.18.2 (npm)"));
        reporter.report_error("one package failed");
        reporter.report_completion("done");
    }

    #[test]
    fn test_progress_reporter_default() {
        let reporter = StderrProgressReporter::default();
        reporter.report("message");
    }
}
