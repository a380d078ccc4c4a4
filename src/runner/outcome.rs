use serde::Serialize;
use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Status {
    Pass,
    Failure,
    Error,
}

impl Status {
    pub fn as_str(&self) -> &'static str {
        match self {
            Status::Pass => "pass",
            Status::Failure => "failure",
            Status::Error => "error",
        }
    }
}

impl fmt::Display for Status {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// The result of running one test body.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TestCase {
    pub description: String,
    pub status: Status,
    pub message: String,
    pub duration_ns: u64,
}

impl TestCase {
    pub fn new(
        description: impl Into<String>,
        status: Status,
        message: impl Into<String>,
        duration_ns: u64,
    ) -> Self {
        Self {
            description: description.into(),
            status,
            message: message.into(),
            duration_ns,
        }
    }

    /// Whole milliseconds, truncated.
    pub fn duration_ms(&self) -> u64 {
        self.duration_ns / 1_000_000
    }
}

/// Aggregate counts for one suite.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct Suite {
    pub description: String,
    pub source: String,
    pub success: usize,
    pub failure: usize,
    pub error: usize,
}

impl Suite {
    pub fn new(description: impl Into<String>, source: impl Into<String>) -> Self {
        Self {
            description: description.into(),
            source: source.into(),
            ..Default::default()
        }
    }

    pub fn record(&mut self, status: Status) {
        match status {
            Status::Pass => self.success += 1,
            Status::Failure => self.failure += 1,
            Status::Error => self.error += 1,
        }
    }

    pub fn total(&self) -> usize {
        self.success + self.failure + self.error
    }

    pub fn has_failures(&self) -> bool {
        self.failure > 0 || self.error > 0
    }

    /// Process exit status: zero only when every test passed.
    pub fn exit_code(&self) -> i32 {
        i32::try_from(self.failure + self.error).unwrap_or(i32::MAX)
    }
}
