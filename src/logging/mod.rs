//! Leveled application logging.
//!
//! Messages carry an `[ENVIRONMENT]` prefix and are dropped unless their
//! severity rank is within the configured level. Surviving lines are handed to
//! the matching `tracing` macro, so the subscriber installed by
//! [`crate::config::init_tracing`] decides where they end up (stderr by default).

use serde::{Deserialize, Serialize};
use std::fmt;
use strum::{AsRefStr, Display, EnumString};

use crate::config::RuntimeEnvironment;

/// Severity levels, most severe first.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    PartialOrd,
    Ord,
    Hash,
    Default,
    Serialize,
    Deserialize,
    Display,
    EnumString,
    AsRefStr,
)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase", ascii_case_insensitive)]
pub enum LogLevel {
    Error,
    Warn,
    #[default]
    Info,
    Debug,
}

impl LogLevel {
    /// Lower rank means higher severity.
    pub fn rank(self) -> u8 {
        match self {
            LogLevel::Error => 0,
            LogLevel::Warn => 1,
            LogLevel::Info => 2,
            LogLevel::Debug => 3,
        }
    }
}

/// Gatekeeper for application log lines.
#[derive(Debug, Clone)]
pub struct AppLogger {
    prefix: String,
    level: LogLevel,
}

impl AppLogger {
    pub fn new(environment: RuntimeEnvironment, level: LogLevel) -> Self {
        Self {
            prefix: format!("[{}]", environment.as_ref().to_uppercase()),
            level,
        }
    }

    pub fn level(&self) -> LogLevel {
        self.level
    }

    pub fn enabled(&self, level: LogLevel) -> bool {
        level.rank() <= self.level.rank()
    }

    /// Formats a line for `level`, or `None` when the level is filtered out.
    pub fn render(&self, level: LogLevel, message: fmt::Arguments<'_>) -> Option<String> {
        self.enabled(level)
            .then(|| format!("{} {}", self.prefix, message))
    }

    pub fn log(&self, level: LogLevel, message: fmt::Arguments<'_>) {
        let Some(line) = self.render(level, message) else {
            return;
        };
        match level {
            LogLevel::Error => tracing::error!("{}", line),
            LogLevel::Warn => tracing::warn!("{}", line),
            LogLevel::Info => tracing::info!("{}", line),
            LogLevel::Debug => tracing::debug!("{}", line),
        }
    }
}

/// `app_log!(logger, LogLevel::Warn, "unknown kind {}", kind)`
#[macro_export]
macro_rules! app_log {
    ($logger:expr, $level:expr, $($arg:tt)+) => {
        $logger.log($level, format_args!($($arg)+))
    };
}
