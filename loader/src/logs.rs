//! Progress logging.
//!
//! Log lines go to stderr through `tracing`; stdout is reserved for the
//! records and responses themselves.

use tracing::{info, warn};
use tracing_subscriber::{fmt, EnvFilter};

/// Log level for progress messages
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogLevel {
    Info,
    Success,
    Warning,
}

/// A single progress message
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LogEntry {
    pub level: LogLevel,
    pub message: String,
    /// Nesting depth, three spaces per level
    pub indent: u8,
}

impl LogEntry {
    pub fn info(message: impl Into<String>) -> Self {
        Self { level: LogLevel::Info, message: message.into(), indent: 0 }
    }

    pub fn success(message: impl Into<String>) -> Self {
        Self { level: LogLevel::Success, message: message.into(), indent: 0 }
    }

    pub fn warning(message: impl Into<String>) -> Self {
        Self { level: LogLevel::Warning, message: message.into(), indent: 0 }
    }

    pub fn with_indent(mut self, indent: u8) -> Self {
        self.indent = indent;
        self
    }

    /// Text of the entry with indentation and level marker.
    pub fn render(&self) -> String {
        let marker = match self.level {
            LogLevel::Info => "",
            LogLevel::Success => "✓ ",
            LogLevel::Warning => "⚠️ ",
        };
        format!("{}{}{}", "   ".repeat(self.indent as usize), marker, self.message)
    }

    /// Emit the entry as a `tracing` event.
    pub fn emit(&self) {
        let line = self.render();
        match self.level {
            LogLevel::Info | LogLevel::Success => info!("{}", line),
            LogLevel::Warning => warn!("{}", line),
        }
    }
}

/// Install the stderr subscriber. `RUST_LOG` takes precedence over `verbose`.
pub fn init(verbose: bool) {
    let fallback = if verbose { "info,product_loader=debug" } else { "info" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(fallback));

    fmt::Subscriber::builder()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}

/// Convenient logging functions
pub fn log_info(msg: impl Into<String>) {
    LogEntry::info(msg).emit();
}

pub fn log_success(msg: impl Into<String>) {
    LogEntry::success(msg).emit();
}

pub fn log_warning(msg: impl Into<String>) {
    LogEntry::warning(msg).emit();
}

pub fn log_info_indent(msg: impl Into<String>, indent: u8) {
    LogEntry::info(msg).with_indent(indent).emit();
}
