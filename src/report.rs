/*!
 * Check Result Aggregation
 *
 * Collects status fragments and the worst severity seen while the check
 * runs, and renders them in the monitoring-plugin convention:
 * `<SEVERITY> - <fragment>. <fragment>` with an exit code per severity.
 */

use std::fmt;

/// Verdict scale, ordered from best to worst
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
pub enum Severity {
    #[default]
    Ok,
    Warning,
    Critical,
    Unknown,
}

impl Severity {
    /// Process exit code for this verdict
    pub fn exit_code(self) -> i32 {
        match self {
            Severity::Ok => 0,
            Severity::Warning => 1,
            Severity::Critical => 2,
            Severity::Unknown => 3,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Severity::Ok => "OK",
            Severity::Warning => "WARNING",
            Severity::Critical => "CRITICAL",
            Severity::Unknown => "UNKNOWN",
        }
    }
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Terminal verdict that stops the check where it is raised
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Halt {
    pub severity: Severity,
    pub message: String,
}

impl Halt {
    pub fn critical(message: impl Into<String>) -> Self {
        Self {
            severity: Severity::Critical,
            message: message.into(),
        }
    }
}

/// Accumulated outcome of one check run
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CheckResult {
    severity: Severity,
    messages: Vec<String>,
}

impl CheckResult {
    pub fn new() -> Self {
        Self::default()
    }

    /// Raise the verdict to `severity` if it is worse; never lowers it
    pub fn upgrade(&mut self, severity: Severity) {
        self.severity = self.severity.max(severity);
    }

    /// Append a fragment without touching the verdict
    pub fn add_message(&mut self, message: impl Into<String>) {
        self.messages.push(message.into());
    }

    /// Upgrade and record why
    pub fn report(&mut self, severity: Severity, message: impl Into<String>) {
        self.upgrade(severity);
        self.add_message(message);
    }

    /// Fold in a terminal verdict
    pub fn halt(&mut self, halt: Halt) {
        self.report(halt.severity, halt.message);
    }

    pub fn severity(&self) -> Severity {
        self.severity
    }

    pub fn messages(&self) -> &[String] {
        &self.messages
    }

    pub fn exit_code(&self) -> i32 {
        self.severity.exit_code()
    }
}

impl fmt::Display for CheckResult {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.messages.is_empty() {
            return write!(f, "{}", self.severity);
        }
        write!(f, "{} - {}", self.severity, self.messages.join(". "))
    }
}
