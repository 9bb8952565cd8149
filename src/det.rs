//! Development Error Tracer (DET) collaborator.
//!
//! The BSW modules report every development error here exactly once, then carry
//! on. Reporting is fire-and-forget: nothing a reporter does feeds back into the
//! module that called it.

use log::warn;
use std::sync::Mutex;

/// One development error, as passed to `Det_ReportError`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct DetReport {
    pub module_id: u16,
    pub instance_id: u8,
    pub api_id: u8,
    pub error_id: u8,
}

impl DetReport {
    pub const fn new(module_id: u16, instance_id: u8, api_id: u8, error_id: u8) -> Self {
        DetReport {
            module_id,
            instance_id,
            api_id,
            error_id,
        }
    }
}

/// Receiver of development error reports.
pub trait ErrorReporter: Sync {
    fn report_error(&self, report: DetReport);
}

/// Forwards reports to the `log` facade at warn level.
#[derive(Debug, Default, Clone, Copy)]
pub struct LogReporter;

impl ErrorReporter for LogReporter {
    fn report_error(&self, report: DetReport) {
        warn!(
            "DET: module={} instance={} api=0x{:02X} error=0x{:02X}",
            report.module_id, report.instance_id, report.api_id, report.error_id
        );
    }
}

/// Keeps every report for later inspection, and logs it like [`LogReporter`].
#[derive(Debug, Default)]
pub struct DetRecorder {
    reports: Mutex<Vec<DetReport>>,
}

impl DetRecorder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns a copy of all reports received so far, oldest first.
    pub fn reports(&self) -> Vec<DetReport> {
        self.lock().clone()
    }

    /// Removes and returns all reports received so far.
    pub fn take(&self) -> Vec<DetReport> {
        std::mem::take(&mut *self.lock())
    }

    /// Number of reports received so far.
    pub fn count(&self) -> usize {
        self.lock().len()
    }

    /// The most recent report, if any.
    pub fn last(&self) -> Option<DetReport> {
        self.lock().last().copied()
    }

    // A poisoned list is still a valid list of reports.
    fn lock(&self) -> std::sync::MutexGuard<'_, Vec<DetReport>> {
        self.reports.lock().unwrap_or_else(|e| e.into_inner())
    }
}

impl ErrorReporter for DetRecorder {
    fn report_error(&self, report: DetReport) {
        LogReporter.report_error(report);
        self.lock().push(report);
    }
}
