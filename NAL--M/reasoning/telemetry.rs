use std::{fmt, path::PathBuf, sync::Arc};

use anyhow::Result;
use serde_json::Value;
use shared_logging::{JsonLogger, LogLevel, LogRecord, LogSink, MemorySink};
use uuid::Uuid;

/// Builder for reasoner telemetry.
pub struct ReasonerTelemetryBuilder {
    module: String,
    log_path: Option<PathBuf>,
    trace_capacity: usize,
}

impl ReasonerTelemetryBuilder {
    /// Creates the builder.
    #[must_use]
    pub fn new(module: impl Into<String>) -> Self {
        Self {
            module: module.into(),
            log_path: None,
            trace_capacity: 512,
        }
    }

    /// Also appends every record to a JSON-lines file.
    #[must_use]
    pub fn log_path(mut self, path: impl Into<PathBuf>) -> Self {
        self.log_path = Some(path.into());
        self
    }

    /// Number of records kept in memory.
    #[must_use]
    pub const fn trace_capacity(mut self, capacity: usize) -> Self {
        self.trace_capacity = capacity;
        self
    }

    /// Builds the telemetry handle.
    pub fn build(self) -> Result<ReasonerTelemetry> {
        ReasonerTelemetry::new(self.module, self.log_path, self.trace_capacity)
    }
}

/// Derivation trace shared by the reasoner and whoever inspects it.
#[derive(Clone)]
pub struct ReasonerTelemetry {
    inner: Arc<TelemetryInner>,
}

impl fmt::Debug for ReasonerTelemetry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ReasonerTelemetry")
            .field("module", &self.inner.module)
            .field("file", &self.inner.logger.as_ref().map(JsonLogger::path))
            .finish()
    }
}

struct TelemetryInner {
    module: String,
    logger: Option<JsonLogger>,
    backlog: MemorySink,
}

impl ReasonerTelemetry {
    fn new(module: impl Into<String>, log_path: Option<PathBuf>, trace_capacity: usize) -> Result<Self> {
        let logger = if let Some(path) = log_path {
            Some(JsonLogger::new(path)?)
        } else {
            None
        };
        Ok(Self {
            inner: Arc::new(TelemetryInner {
                module: module.into(),
                logger,
                backlog: MemorySink::new(trace_capacity),
            }),
        })
    }

    /// Returns a builder.
    #[must_use]
    pub fn builder(module: impl Into<String>) -> ReasonerTelemetryBuilder {
        ReasonerTelemetryBuilder::new(module)
    }

    /// Records an event of `cycle`; returns the id stored under `event_id`.
    pub fn log(&self, level: LogLevel, cycle: i64, message: &str, metadata: Value) -> Result<Uuid> {
        let id = Uuid::new_v4();
        let mut record = LogRecord::new(&self.inner.module, level, message)
            .at_cycle(cycle)
            .with_metadata(metadata);
        record
            .metadata
            .insert("event_id".into(), Value::String(id.to_string()));
        self.inner.backlog.write(&record)?;
        if let Some(logger) = &self.inner.logger {
            logger.log(&record)?;
        }
        Ok(id)
    }

    /// Retained records, oldest first.
    #[must_use]
    pub fn backlog(&self) -> Vec<LogRecord> {
        self.inner.backlog.snapshot()
    }

    /// Retained records named `message`.
    #[must_use]
    pub fn events(&self, message: &str) -> Vec<LogRecord> {
        self.inner.backlog.matching(message)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use tempfile::tempdir;

    #[test]
    fn telemetry_writes_file_and_backlog() {
        let tmp = tempdir().unwrap();
        let path = tmp.path().join("reasoner.log");
        let telemetry = ReasonerTelemetry::builder("reasoning")
            .log_path(&path)
            .build()
            .unwrap();
        let id = telemetry
            .log(LogLevel::Info, 3, "nal.derived", json!({ "content": "<a --> b>" }))
            .unwrap();
        let content = std::fs::read_to_string(&path).unwrap();
        assert!(content.contains("nal.derived"));
        assert!(content.contains(&id.to_string()));
        let events = telemetry.events("nal.derived");
        assert_eq!(events.len(), 1);
        assert_eq!(events[0].cycle, Some(3));
        assert_eq!(events[0].metadata["content"], "<a --> b>");
    }

    #[test]
    fn backlog_is_bounded() {
        let telemetry = ReasonerTelemetry::builder("reasoning")
            .trace_capacity(2)
            .build()
            .unwrap();
        for cycle in 0..5 {
            telemetry
                .log(LogLevel::Debug, cycle, "nal.step", json!({}))
                .unwrap();
        }
        let kept: Vec<Option<i64>> = telemetry.backlog().iter().map(|r| r.cycle).collect();
        assert_eq!(kept, vec![Some(3), Some(4)]);
    }
}
