use std::collections::VecDeque;
use std::fmt;

use chrono::{DateTime, Utc};
use serde::Serialize;

use crate::Result;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum TraceLevel {
    Debug,
    Info,
    Warn,
    Error,
}

impl fmt::Display for TraceLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            TraceLevel::Debug => "DEBUG",
            TraceLevel::Info => "INFO",
            TraceLevel::Warn => "WARN",
            TraceLevel::Error => "ERROR",
        };
        f.pad(label)
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct TraceEntry {
    pub at: DateTime<Utc>,
    pub level: TraceLevel,
    pub message: String,
}

/// Ordered log of one pipeline run. Every entry is also forwarded to `tracing`.
#[derive(Debug, Clone, Default, Serialize)]
pub struct ExecutionTrace {
    entries: Vec<TraceEntry>,
    #[serde(skip)]
    prefixes: VecDeque<String>,
}

impl ExecutionTrace {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push_prefix(&mut self, prefix: impl Into<String>) {
        self.prefixes.push_back(prefix.into());
    }

    pub fn pop_prefix(&mut self) {
        self.prefixes.pop_back();
    }

    pub fn debug(&mut self, message: impl AsRef<str>) {
        self.record(TraceLevel::Debug, message.as_ref());
    }

    pub fn info(&mut self, message: impl AsRef<str>) {
        self.record(TraceLevel::Info, message.as_ref());
    }

    pub fn warn(&mut self, message: impl AsRef<str>) {
        self.record(TraceLevel::Warn, message.as_ref());
    }

    pub fn error(&mut self, message: impl AsRef<str>) {
        self.record(TraceLevel::Error, message.as_ref());
    }

    fn record(&mut self, level: TraceLevel, message: &str) {
        let prefix = self.prefixes.iter().map(|p| format!("{} ", p)).collect::<String>();
        let message = format!("{}{}", prefix, message);
        match level {
            TraceLevel::Debug => tracing::debug!("{}", message),
            TraceLevel::Info => tracing::info!("{}", message),
            TraceLevel::Warn => tracing::warn!("{}", message),
            TraceLevel::Error => tracing::error!("{}", message),
        }
        self.entries.push(TraceEntry {
            at: Utc::now(),
            level,
            message,
        });
    }

    pub fn entries(&self) -> &[TraceEntry] {
        &self.entries
    }

    pub fn contains(&self, needle: &str) -> bool {
        self.entries.iter().any(|e| e.message.contains(needle))
    }

    pub fn count(&self, level: TraceLevel) -> usize {
        self.entries.iter().filter(|e| e.level == level).count()
    }

    /// One line per entry, e.g. `INFO  Found 5 articles`.
    pub fn render(&self) -> String {
        self.entries
            .iter()
            .map(|e| format!("{:<5} {}", e.level, e.message))
            .collect::<Vec<_>>()
            .join("\n")
    }
}

/// Result of a pipeline run together with the trace it produced, whether or not it failed.
#[derive(Debug)]
pub struct RunReport<S> {
    pub trace: ExecutionTrace,
    pub outcome: Result<S>,
}

impl<S> RunReport<S> {
    pub fn is_success(&self) -> bool {
        self.outcome.is_ok()
    }
}
