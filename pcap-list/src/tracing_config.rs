//! Tracing configuration for pcap-list
//!
//! Logs go to the systemd journal when the process runs as a systemd service
//! whose output is connected to the journal, and to stderr otherwise. Standard
//! output is reserved for the file list itself.

use tracing_subscriber::{EnvFilter, prelude::*};

/// Configuration for tracing initialization
#[derive(Debug, Clone)]
pub struct TracingConfig {
    /// Default log level filter (e.g., "info,pcap_files=debug")
    pub default_log_level: String,

    /// Whether to force stderr output (overrides journal detection)
    pub force_stderr: bool,
}

impl Default for TracingConfig {
    fn default() -> Self {
        Self {
            default_log_level: "warn".to_string(),
            force_stderr: false,
        }
    }
}

impl TracingConfig {
    /// Set the default log level
    pub fn with_log_level(mut self, level: impl Into<String>) -> Self {
        self.default_log_level = level.into();
        self
    }

    /// Force stderr output instead of journal detection
    pub fn with_force_stderr(mut self, force: bool) -> Self {
        self.force_stderr = force;
        self
    }
}

/// Output destination for logs
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogOutput {
    /// Write to systemd journal with structured logging
    Journal,
    /// Write to stderr with formatted text
    Stderr,
}

impl LogOutput {
    /// Detect the appropriate output based on environment
    pub fn detect() -> Self {
        if std::env::var_os("JOURNAL_STREAM").is_some() {
            LogOutput::Journal
        } else {
            LogOutput::Stderr
        }
    }

    pub fn description(&self) -> &'static str {
        match self {
            LogOutput::Journal => "systemd journal",
            LogOutput::Stderr => "stderr",
        }
    }
}

/// Initialize tracing with the given configuration.
///
/// `RUST_LOG` takes precedence over the configured level. If the journal
/// cannot be reached, logging falls back to stderr.
pub fn initialize_tracing(config: &TracingConfig) {
    let mut output = if config.force_stderr {
        LogOutput::Stderr
    } else {
        LogOutput::detect()
    };

    let env_filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(&config.default_log_level));

    let registry = tracing_subscriber::registry().with(env_filter);

    let journald_layer = match output {
        LogOutput::Journal => match tracing_journald::layer() {
            Ok(layer) => Some(layer),
            Err(err) => {
                eprintln!("Failed to connect to journald, logging to stderr: {err}");
                output = LogOutput::Stderr;
                None
            }
        },
        LogOutput::Stderr => None,
    };

    match journald_layer {
        Some(layer) => registry.with(layer).init(),
        None => {
            let fmt_layer = tracing_subscriber::fmt::layer()
                .with_writer(std::io::stderr)
                .with_target(true)
                .with_ansi(false);
            registry.with(fmt_layer).init();
        }
    }

    tracing::debug!(output = ?output, "Tracing initialized - logs to {}", output.description());
}
