//! Logging and tracing configuration
//!
//! This module provides centralized logging configuration for the simulator.
//! Console output goes to stderr; file output, when enabled, is JSON written to
//! daily rolling files.

use std::io;
use tracing::{debug, Level};
use tracing_appender::non_blocking::WorkerGuard;
use tracing_appender::{non_blocking, rolling};
use tracing_subscriber::{
    fmt::{self, format::FmtSpan},
    layer::SubscriberExt,
    util::SubscriberInitExt,
    EnvFilter, Registry,
};

/// Logging configuration
#[derive(Debug, Clone)]
pub struct LoggingConfig {
    /// Log level for the application
    pub level: Level,
    /// Whether console output is JSON
    pub json_format: bool,
    /// Directory for rolling log files; `None` disables file logging
    pub log_directory: Option<String>,
    /// Log file prefix
    pub log_file_prefix: String,
    /// Whether to enable span events
    pub enable_span_events: bool,
    /// Whether to enable ansi colors in console output
    pub enable_ansi: bool,
    /// Custom environment filter
    pub env_filter: Option<String>,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: Level::WARN,
            json_format: false,
            log_directory: None,
            log_file_prefix: "indoor-asset-simulator".to_string(),
            enable_span_events: false,
            enable_ansi: true,
            env_filter: None,
        }
    }
}

/// Keeps background log writers alive; drop it only at shutdown
#[must_use = "dropping the guard stops file logging"]
#[derive(Debug)]
pub struct LoggingGuard {
    _guards: Vec<WorkerGuard>,
}

impl LoggingConfig {
    /// Create a new logging configuration
    pub fn new() -> Self {
        Self::default()
    }

    /// Configuration selected by the command line flags
    ///
    /// `--debug` wins over `--verbose`; without either only warnings are shown.
    pub fn from_flags(verbose: bool, debug: bool, json: bool, log_dir: Option<&str>) -> Self {
        let level = if debug {
            Level::DEBUG
        } else if verbose {
            Level::INFO
        } else {
            Level::WARN
        };

        let mut config = Self::new().with_level(level);
        if debug {
            config = config.with_span_events();
        }
        if json {
            config = config.with_json_format().without_ansi();
        }
        if let Some(dir) = log_dir {
            config = config.with_file_logging(dir);
        }
        config
    }

    /// Set the log level
    pub fn with_level(mut self, level: Level) -> Self {
        self.level = level;
        self
    }

    /// Enable JSON formatting
    pub fn with_json_format(mut self) -> Self {
        self.json_format = true;
        self
    }

    /// Enable file logging
    pub fn with_file_logging(mut self, directory: impl Into<String>) -> Self {
        self.log_directory = Some(directory.into());
        self
    }

    /// Set log file prefix
    pub fn with_file_prefix(mut self, prefix: impl Into<String>) -> Self {
        self.log_file_prefix = prefix.into();
        self
    }

    /// Enable span events
    pub fn with_span_events(mut self) -> Self {
        self.enable_span_events = true;
        self
    }

    /// Disable ANSI colors
    pub fn without_ansi(mut self) -> Self {
        self.enable_ansi = false;
        self
    }

    /// Set custom environment filter
    pub fn with_env_filter(mut self, filter: impl Into<String>) -> Self {
        self.env_filter = Some(filter.into());
        self
    }

    /// Filter directive used when neither a custom filter nor `RUST_LOG` is set
    pub fn default_directive(&self) -> String {
        format!("{}={}", env!("CARGO_PKG_NAME").replace('-', "_"), self.level)
    }

    fn span_events(&self) -> FmtSpan {
        if self.enable_span_events {
            FmtSpan::NEW | FmtSpan::CLOSE
        } else {
            FmtSpan::NONE
        }
    }

    /// Initialize the global tracing subscriber
    pub fn init(self) -> Result<LoggingGuard, Box<dyn std::error::Error + Send + Sync>> {
        let env_filter = match &self.env_filter {
            Some(filter) => EnvFilter::try_new(filter)?,
            None => EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new(self.default_directive())),
        };

        let mut guards = Vec::new();
        let file_layer = self.log_directory.as_deref().map(|dir| {
            let (file_writer, guard) = non_blocking(rolling::daily(dir, &self.log_file_prefix));
            guards.push(guard);
            fmt::layer()
                .json()
                .with_writer(file_writer)
                .with_span_events(self.span_events())
        });

        let registry = Registry::default().with(env_filter).with(file_layer);
        if self.json_format {
            registry
                .with(
                    fmt::layer()
                        .json()
                        .with_writer(io::stderr)
                        .with_span_events(self.span_events()),
                )
                .try_init()?;
        } else {
            registry
                .with(
                    fmt::layer()
                        .with_writer(io::stderr)
                        .with_ansi(self.enable_ansi)
                        .with_target(false)
                        .with_span_events(self.span_events()),
                )
                .try_init()?;
        }

        debug!(config = ?self, "Logging initialized");
        Ok(LoggingGuard { _guards: guards })
    }
}
