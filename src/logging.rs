use std::fmt;
use std::io::Write;
use std::path::Path;
use std::sync::Arc;

use chrono::Utc;
use tracing_appender::non_blocking::{NonBlocking, WorkerGuard};
use tracing_appender::rolling::{RollingFileAppender, Rotation};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use crate::error::{Result, SyncError};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogLevel {
    Debug,
    Info,
    Warn,
    Error,
}

impl fmt::Display for LogLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let level = match self {
            LogLevel::Debug => "debug",
            LogLevel::Info => "info",
            LogLevel::Warn => "warn",
            LogLevel::Error => "error",
        };
        f.write_str(level)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LogOptions {
    pub level: LogLevel,
    pub file_name: String,
}

impl LogOptions {
    pub fn warn(file_name: impl Into<String>) -> Self {
        Self {
            level: LogLevel::Warn,
            file_name: file_name.into(),
        }
    }
}

/// Destination for data-quality events raised during a sync run.
pub trait LogSink: Send + Sync {
    fn log(&self, source: &str, message: &str, options: &LogOptions);
}

/// Forwards sink events to `tracing`.
pub struct TracingLogSink;

impl LogSink for TracingLogSink {
    fn log(&self, source: &str, message: &str, options: &LogOptions) {
        let file_name = options.file_name.as_str();
        match options.level {
            LogLevel::Debug => tracing::debug!(source, file_name, "{}", message),
            LogLevel::Info => tracing::info!(source, file_name, "{}", message),
            LogLevel::Warn => tracing::warn!(source, file_name, "{}", message),
            LogLevel::Error => tracing::error!(source, file_name, "{}", message),
        }
    }
}

/// Appends events as CSV rows to one file through a background writer.
///
/// The returned `WorkerGuard` flushes pending rows when dropped, so the caller
/// must hold it for as long as the sink is in use.
pub struct CsvLogSink {
    writer: NonBlocking,
}

impl CsvLogSink {
    pub fn new(path: impl AsRef<Path>) -> Result<(Self, WorkerGuard)> {
        let path = path.as_ref();
        let file_name = path
            .file_name()
            .and_then(|name| name.to_str())
            .ok_or_else(|| {
                SyncError::Config(format!("log file has no file name: {}", path.display()))
            })?;
        let dir = match path.parent() {
            Some(parent) if !parent.as_os_str().is_empty() => parent,
            _ => Path::new("."),
        };

        // Never-rotating appender; the file keeps its configured name.
        let appender = RollingFileAppender::builder()
            .rotation(Rotation::NEVER)
            .filename_prefix(file_name)
            .build(dir)
            .map_err(|e| {
                SyncError::Config(format!("cannot open log file {}: {}", path.display(), e))
            })?;
        let (writer, guard) = tracing_appender::non_blocking(appender);

        Ok((Self { writer }, guard))
    }

    fn row(source: &str, message: &str, options: &LogOptions) -> String {
        format!(
            "{},{},{},\"{}\"\n",
            Utc::now().to_rfc3339(),
            options.level,
            source,
            message.replace('"', "\"\"")
        )
    }
}

impl LogSink for CsvLogSink {
    fn log(&self, source: &str, message: &str, options: &LogOptions) {
        let row = Self::row(source, message, options);

        // One write per row keeps rows whole on the worker's queue.
        let mut writer = self.writer.clone();
        if let Err(e) = writer.write_all(row.as_bytes()) {
            tracing::error!("failed to queue log row for {}: {}", options.file_name, e);
        }
    }
}

/// Sends every event to each inner sink.
pub struct TeeLogSink {
    sinks: Vec<Arc<dyn LogSink>>,
}

impl TeeLogSink {
    pub fn new(sinks: Vec<Arc<dyn LogSink>>) -> Self {
        Self { sinks }
    }
}

impl LogSink for TeeLogSink {
    fn log(&self, source: &str, message: &str, options: &LogOptions) {
        for sink in &self.sinks {
            sink.log(source, message, options);
        }
    }
}

pub fn init_tracing() {
    tracing_subscriber::registry()
        .with(tracing_subscriber::EnvFilter::new(
            std::env::var("RUST_LOG").unwrap_or_else(|_| "classroom_sync=info".to_string()),
        ))
        .with(tracing_subscriber::fmt::layer())
        .init();
}
