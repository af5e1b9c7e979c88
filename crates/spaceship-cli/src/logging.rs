//! Logging setup for the Spaceship CLI
//!
//! This module provides:
//! - Request ID generation for each invocation
//! - Console output on stderr (compact, full or JSON)
//! - An append-only JSON lines log file
//! - Timing of the executed operation

use crate::config::LoggingSettings;
use crate::error::{Error, Result};
use is_terminal::IsTerminal;
use std::path::{Path, PathBuf};
use tracing_appender::non_blocking::WorkerGuard;
use tracing_appender::rolling::{RollingFileAppender, Rotation};
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing::Subscriber;
use tracing_subscriber::{fmt, EnvFilter, Layer, Registry};
use uuid::Uuid;

type BoxedLayer = Box<dyn Layer<Registry> + Send + Sync>;

/// Directive that exposes request and response payload logs
const PAYLOAD_DIRECTIVE: &str = "spaceship_core=debug";

/// Logging configuration
#[derive(Debug, Clone, PartialEq)]
pub struct LoggingConfig {
    /// Log level filter
    pub level: String,
    /// Console output format
    pub format: LogFormat,
    /// Enable console output
    pub console: bool,
    /// JSON lines log file
    pub file: Option<PathBuf>,
    /// Include file and line numbers
    pub source_location: bool,
}

/// Log output format
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogFormat {
    /// Compact format for production
    Compact,
    /// Full format with all details
    Full,
    /// JSON structured format
    Json,
}

impl LogFormat {
    fn parse(value: &str) -> Option<Self> {
        match value.to_lowercase().as_str() {
            "compact" => Some(LogFormat::Compact),
            "full" => Some(LogFormat::Full),
            "json" => Some(LogFormat::Json),
            _ => None,
        }
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "warn".to_string(),
            format: LogFormat::Compact,
            console: true,
            file: None,
            source_location: false,
        }
    }
}

impl LoggingConfig {
    /// Create logging config from verbosity level
    pub fn from_verbosity(verbosity: u8) -> Self {
        let mut config = Self::default();

        match verbosity {
            0 => {}
            1 => config.level = "info".to_string(),
            2 => {
                config.level = "debug".to_string();
                config.source_location = true;
            }
            _ => {
                config.level = "trace".to_string();
                config.format = LogFormat::Full;
                config.source_location = true;
            }
        }

        config
    }

    /// Apply settings from the configuration file
    pub fn merge_with_settings(&mut self, settings: &LoggingSettings) {
        if let Some(level) = &settings.level {
            self.level = level.clone();
        }
        if let Some(format) = settings.format.as_deref().and_then(LogFormat::parse) {
            self.format = format;
        }
        if settings.file.is_some() {
            self.file = settings.file.clone();
        }
    }

    /// Apply environment overrides
    pub fn merge_with_env(&mut self) {
        self.apply_env(
            std::env::var("RUST_LOG").ok(),
            std::env::var("SPACESHIP_LOG_FORMAT").ok(),
            std::env::var("SPACESHIP_LOG_FILE").ok(),
        );
    }

    fn apply_env(&mut self, level: Option<String>, format: Option<String>, file: Option<String>) {
        if let Some(level) = level {
            self.level = level;
        }
        if let Some(format) = format {
            match LogFormat::parse(&format) {
                Some(format) => self.format = format,
                None => eprintln!("Warning: Invalid log format: {}, using default", format),
            }
        }
        if let Some(file) = file.filter(|f| !f.trim().is_empty()) {
            self.file = Some(PathBuf::from(file));
        }
    }

    /// Debug mode lets the client's payload logs through without raising
    /// the level of other crates
    pub fn enable_debug(&mut self) {
        let global_verbose = self
            .level
            .split(',')
            .any(|directive| matches!(directive.trim(), "debug" | "trace"));
        if !global_verbose {
            self.level = format!("{},{}", self.level, PAYLOAD_DIRECTIVE);
        }
    }
}

/// Keeps the background log writer alive; dropping it flushes the file
pub struct LoggingGuard {
    _file_guard: Option<WorkerGuard>,
}

/// Initialize the global logging system.
///
/// A log file that cannot be opened is reported on stderr and skipped.
pub fn init_logging(config: &LoggingConfig) -> Result<LoggingGuard> {
    let filter = level_filter(config)?;

    let mut layers: Vec<BoxedLayer> = Vec::new();

    if config.console {
        layers.push(console_layer(config));
    }

    let mut file_guard = None;
    if let Some(path) = &config.file {
        match file_writer(path) {
            Ok(appender) => {
                let (writer, guard) = tracing_appender::non_blocking(appender);
                layers.push(
                    fmt::layer()
                        .json()
                        .flatten_event(true)
                        .with_current_span(false)
                        .with_span_list(false)
                        .with_ansi(false)
                        .with_writer(writer)
                        .boxed(),
                );
                file_guard = Some(guard);
            }
            Err(e) => {
                eprintln!(
                    "Warning: Cannot open log file {}: {}; logging to stderr",
                    path.display(),
                    e
                );
                if !config.console {
                    layers.push(fmt::layer().with_writer(std::io::stderr).boxed());
                }
            }
        }
    }

    compose(filter, layers)
        .try_init()
        .map_err(|e| Error::other(format!("Failed to initialize logging: {}", e)))?;

    Ok(LoggingGuard {
        _file_guard: file_guard,
    })
}

fn level_filter(config: &LoggingConfig) -> Result<EnvFilter> {
    EnvFilter::try_new(&config.level)
        .map_err(|e| Error::config(format!("Invalid log level '{}': {}", config.level, e)))
}

/// The filter wraps every output layer so console and file see the same events
fn compose(
    filter: EnvFilter,
    layers: Vec<BoxedLayer>,
) -> impl Subscriber + Send + Sync + 'static {
    tracing_subscriber::registry().with(layers).with(filter)
}

fn console_layer(config: &LoggingConfig) -> BoxedLayer {
    let ansi = std::io::stderr().is_terminal();
    let layer = fmt::layer()
        .with_writer(std::io::stderr)
        .with_target(true)
        .with_file(config.source_location)
        .with_line_number(config.source_location);

    match config.format {
        LogFormat::Compact => layer.with_ansi(ansi).compact().boxed(),
        LogFormat::Full => layer.with_ansi(ansi).boxed(),
        LogFormat::Json => layer.with_ansi(false).json().boxed(),
    }
}

fn file_writer(path: &Path) -> std::result::Result<RollingFileAppender, String> {
    let file_name = path
        .file_name()
        .and_then(|name| name.to_str())
        .ok_or_else(|| "not a file path".to_string())?;
    let directory = match path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent.to_path_buf(),
        _ => PathBuf::from("."),
    };

    RollingFileAppender::builder()
        .rotation(Rotation::NEVER)
        .filename_prefix(file_name)
        .build(directory)
        .map_err(|e| e.to_string())
}

/// Generate a unique request ID for this invocation
pub fn generate_request_id() -> String {
    format!("req_{}", Uuid::new_v4().simple())
}

/// Performance timing utilities
pub mod timing {
    use std::time::Instant;

    /// Logs the duration of an operation when finished
    pub struct Timer {
        start: Instant,
        operation: String,
    }

    impl Timer {
        pub fn new(operation: &str) -> Self {
            Self {
                start: Instant::now(),
                operation: operation.to_string(),
            }
        }

        pub fn finish(self) {
            tracing::info!(
                operation = %self.operation,
                duration_ms = self.start.elapsed().as_millis() as u64,
                "Operation completed"
            );
        }
    }
}
