// Copyright 2025 eraflo
//
// Licensed under the Apache License, Version 2.0 (the "License");
// you may not use this file except in compliance with the License.
// You may obtain a copy of the License at
//
//     http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing, software
// distributed under the License is distributed on an "AS IS" BASIS,
// WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
// See the License for the specific language governing permissions and
// limitations under the License.

//! Leveled diagnostics for the host.
//!
//! This module owns the dual-sink logger, the bridge that routes the `log`
//! facade into it, and the fatal-assertion machinery. Host crates log through
//! the ordinary facade macros (`log::info!` and friends); the two levels the
//! facade cannot express, `Fatal` and `Raw`, are reached through
//! [`fatal!`](crate::fatal!) and [`host_assert!`](crate::host_assert!).

pub mod logger;
pub mod spinlock;

pub use logger::{logger, HostLogger};

use crate::config::LogConfig;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::Path;

/// Severity levels understood by the host logger, ordered lowest to highest.
///
/// `Raw` sits above `Fatal`: it is the raw append mode used for
/// source-context dumps and always reaches the sinks regardless of the
/// threshold.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LogLevel {
    /// Fine-grained tracing of control flow.
    Trace,
    /// Diagnostic information for development.
    Debug,
    /// Routine operational messages.
    Info,
    /// Something unexpected that the host can tolerate.
    Warn,
    /// A failure the current operation could not recover from.
    Error,
    /// A failure the process cannot continue past.
    Fatal,
    /// Raw append mode: no prefix, no implicit newline, never filtered.
    Raw,
}

impl LogLevel {
    /// The upper-case name used in the record prefix.
    pub const fn as_str(&self) -> &'static str {
        match self {
            LogLevel::Trace => "TRACE",
            LogLevel::Debug => "DEBUG",
            LogLevel::Info => "INFO",
            LogLevel::Warn => "WARN",
            LogLevel::Error => "ERROR",
            LogLevel::Fatal => "FATAL",
            LogLevel::Raw => "RAW",
        }
    }

    /// The `log` facade filter equivalent to this threshold.
    pub fn to_level_filter(self) -> log::LevelFilter {
        match self {
            LogLevel::Trace => log::LevelFilter::Trace,
            LogLevel::Debug => log::LevelFilter::Debug,
            LogLevel::Info => log::LevelFilter::Info,
            LogLevel::Warn => log::LevelFilter::Warn,
            LogLevel::Error => log::LevelFilter::Error,
            // The facade has nothing above `error`; with these thresholds it
            // goes quiet and only the host macros still get through.
            LogLevel::Fatal | LogLevel::Raw => log::LevelFilter::Off,
        }
    }

    pub(crate) const fn as_u8(self) -> u8 {
        self as u8
    }

    pub(crate) const fn from_u8(value: u8) -> LogLevel {
        match value {
            0 => LogLevel::Trace,
            1 => LogLevel::Debug,
            2 => LogLevel::Info,
            3 => LogLevel::Warn,
            4 => LogLevel::Error,
            5 => LogLevel::Fatal,
            _ => LogLevel::Raw,
        }
    }
}

impl fmt::Display for LogLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl From<log::Level> for LogLevel {
    fn from(level: log::Level) -> Self {
        match level {
            log::Level::Error => LogLevel::Error,
            log::Level::Warn => LogLevel::Warn,
            log::Level::Info => LogLevel::Info,
            log::Level::Debug => LogLevel::Debug,
            log::Level::Trace => LogLevel::Trace,
        }
    }
}

/// The source location a record originated from.
#[derive(Debug, Clone, Copy)]
pub struct Origin<'a> {
    /// Source file path, as produced by `file!` or the `log` facade.
    pub file: &'a str,
    /// 1-based line number of the call site.
    pub line: u32,
}

/// Per-record formatting switches.
///
/// The standard prefix (timestamp, level, origin) and the trailing newline
/// can each be suppressed per call. The source-context dump suppresses both.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LineStyle {
    /// Emit the timestamp/level/origin prefix.
    pub prefix: bool,
    /// Terminate the record with a newline.
    pub newline: bool,
}

impl Default for LineStyle {
    fn default() -> Self {
        Self {
            prefix: true,
            newline: true,
        }
    }
}

impl LineStyle {
    /// The raw append style: no prefix, no trailing newline.
    pub const RAW: LineStyle = LineStyle {
        prefix: false,
        newline: false,
    };
}

/// Lines of context dumped on each side of a failed assertion.
const SOURCE_CONTEXT_LINES: u32 = 5;

/// Installs the host logger: applies `config`, attaches the file sink, and
/// routes the `log` facade into the same sinks.
///
/// Call once, before anything that logs. A file sink that cannot be opened
/// downgrades to a console warning; a facade that already has a backend is
/// an error.
pub fn init(config: &LogConfig) -> anyhow::Result<()> {
    let logger = logger();
    logger.set_threshold(config.level);
    logger.set_pause_on_fatal(config.pause_on_fatal);

    if let Some(path) = &config.file {
        if let Err(e) = logger.attach_file(path) {
            logger.write(
                LogLevel::Warn,
                Origin {
                    file: file!(),
                    line: line!(),
                },
                format_args!("Could not open log file '{}': {e}", path.display()),
                LineStyle::default(),
            );
        }
    }

    log::set_logger(&FACADE)
        .map_err(|e| anyhow::anyhow!("log facade already has a backend: {e}"))?;
    log::set_max_level(config.level.to_level_filter());
    Ok(())
}

/// Adjusts the minimum level at runtime.
///
/// Also moves the `log` facade's max level: facade macros pre-filter against
/// it before the logger sees the record.
pub fn set_threshold(level: LogLevel) {
    logger().set_threshold(level);
    log::set_max_level(level.to_level_filter());
}

/// Logs a fully-formed record. Backing function for the crate's log macros.
#[doc(hidden)]
pub fn log_at(level: LogLevel, file: &str, line: u32, args: fmt::Arguments<'_>) {
    logger().write(level, Origin { file, line }, args, LineStyle::default());
}

/// Appends raw text to both sinks, bypassing prefix, newline, and threshold.
pub fn append_raw(args: fmt::Arguments<'_>) {
    logger().write(LogLevel::Raw, Origin { file: "", line: 0 }, args, LineStyle::RAW);
}

/// Reports a failed invariant and terminates the process.
///
/// Logs the caller's message at FATAL, dumps the source lines around the
/// failure site in raw mode, logs a FATAL summary naming the condition, then
/// exits with a non-zero code. Never returns and never unwinds.
#[doc(hidden)]
pub fn assert_failed(condition: &str, file: &str, line: u32, args: fmt::Arguments<'_>) -> ! {
    log_at(LogLevel::Fatal, file, line, args);
    dump_source_context(file, line);
    log_at(
        LogLevel::Fatal,
        file,
        line,
        format_args!("Assertion `{condition}` failed at {file}:{line}"),
    );
    logger().pause_if_configured();
    std::process::exit(1);
}

/// Writes the source lines surrounding `line` of `file` in raw mode, five
/// lines of context on each side, each prefixed with its line number.
///
/// Best-effort: an unreadable or non-UTF-8 file skips the dump.
fn dump_source_context(file: &str, line: u32) {
    let Ok(block) = crate::fs::read_file(Path::new(file)) else {
        return;
    };
    let Ok(text) = std::str::from_utf8(block.as_slice()) else {
        return;
    };

    let first = line.saturating_sub(SOURCE_CONTEXT_LINES);
    let last = line.saturating_add(SOURCE_CONTEXT_LINES);

    append_raw(format_args!("\n"));
    for (index, source_line) in text.lines().enumerate() {
        let number = index as u32 + 1;
        if number < first || number > last {
            continue;
        }
        append_raw(format_args!("{number:>5} {source_line}\n"));
    }
}

/// Routes `log` facade records into the host logger.
struct FacadeBridge;

static FACADE: FacadeBridge = FacadeBridge;

impl log::Log for FacadeBridge {
    fn enabled(&self, metadata: &log::Metadata) -> bool {
        LogLevel::from(metadata.level()) >= logger().threshold()
    }

    fn log(&self, record: &log::Record) {
        if !self.enabled(record.metadata()) {
            return;
        }
        logger().write(
            LogLevel::from(record.level()),
            Origin {
                file: record.file().unwrap_or("<unknown>"),
                line: record.line().unwrap_or(0),
            },
            *record.args(),
            LineStyle::default(),
        );
    }

    fn flush(&self) {
        logger().flush();
    }
}

/// Logs a message at [`LogLevel::Fatal`](crate::diag::LogLevel::Fatal).
///
/// The `log` facade stops at `error`, so fatal records go through the host
/// logger directly. This does not terminate the process by itself; pair it
/// with the failure path that does.
#[macro_export]
macro_rules! fatal {
    ($($arg:tt)*) => {
        $crate::diag::log_at(
            $crate::diag::LogLevel::Fatal,
            ::core::file!(),
            ::core::line!(),
            ::core::format_args!($($arg)*),
        )
    };
}

/// Verifies an invariant; on failure, logs at FATAL, dumps the surrounding
/// source lines, and terminates the process with a non-zero code.
///
/// Unlike `assert!`, this runs in every build profile and never unwinds.
#[macro_export]
macro_rules! host_assert {
    ($cond:expr $(,)?) => {
        $crate::host_assert!($cond, "invariant violated");
    };
    ($cond:expr, $($arg:tt)*) => {
        if !$cond {
            $crate::diag::assert_failed(
                ::core::stringify!($cond),
                ::core::file!(),
                ::core::line!(),
                ::core::format_args!($($arg)*),
            );
        }
    };
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn levels_order_by_severity() {
        assert!(LogLevel::Trace < LogLevel::Debug);
        assert!(LogLevel::Debug < LogLevel::Info);
        assert!(LogLevel::Info < LogLevel::Warn);
        assert!(LogLevel::Warn < LogLevel::Error);
        assert!(LogLevel::Error < LogLevel::Fatal);
        assert!(LogLevel::Fatal < LogLevel::Raw);
    }

    #[test]
    fn level_round_trips_through_u8() {
        for level in [
            LogLevel::Trace,
            LogLevel::Debug,
            LogLevel::Info,
            LogLevel::Warn,
            LogLevel::Error,
            LogLevel::Fatal,
            LogLevel::Raw,
        ] {
            assert_eq!(LogLevel::from_u8(level.as_u8()), level);
        }
    }

    #[test]
    fn facade_levels_map_one_to_one() {
        assert_eq!(LogLevel::from(log::Level::Trace), LogLevel::Trace);
        assert_eq!(LogLevel::from(log::Level::Debug), LogLevel::Debug);
        assert_eq!(LogLevel::from(log::Level::Info), LogLevel::Info);
        assert_eq!(LogLevel::from(log::Level::Warn), LogLevel::Warn);
        assert_eq!(LogLevel::from(log::Level::Error), LogLevel::Error);
    }

    #[test]
    fn thresholds_above_error_silence_the_facade() {
        assert_eq!(LogLevel::Error.to_level_filter(), log::LevelFilter::Error);
        assert_eq!(LogLevel::Fatal.to_level_filter(), log::LevelFilter::Off);
        assert_eq!(LogLevel::Raw.to_level_filter(), log::LevelFilter::Off);
    }

    #[test]
    fn line_style_defaults_to_full_records() {
        let style = LineStyle::default();
        assert!(style.prefix);
        assert!(style.newline);
        assert_eq!(
            LineStyle::RAW,
            LineStyle {
                prefix: false,
                newline: false
            }
        );
    }

    #[test]
    fn level_names_are_upper_case() {
        assert_eq!(LogLevel::Info.as_str(), "INFO");
        assert_eq!(LogLevel::Fatal.to_string(), "FATAL");
    }
}
