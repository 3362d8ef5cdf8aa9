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

//! The dual-sink logger backend: console plus optional log file.

use super::spinlock::SpinLock;
use super::{LineStyle, LogLevel, Origin};
use std::fmt;
use std::fs::File;
use std::io::Write;
use std::path::Path;
use std::sync::atomic::{AtomicBool, AtomicU8, Ordering};

/// Timestamp layout for the console sink, time of day only.
const CONSOLE_STAMP: &str = "%H:%M:%S";

/// Timestamp layout for the file sink. The file outlives the session on
/// disk, so it carries the full date.
const FILE_STAMP: &str = "%Y-%m-%d %H:%M:%S";

/// The host's dual-sink logger.
///
/// Records below the threshold are dropped before any formatting happens.
/// Everything else is formatted and written to the console (stderr) and,
/// when attached, to the log file, under one spinlock so records from
/// concurrent threads never interleave. The file sink is best-effort: it is
/// flushed after every record, and write failures are swallowed the same way
/// `eprintln!` swallows console failures.
pub struct HostLogger {
    threshold: AtomicU8,
    pause_on_fatal: AtomicBool,
    sinks: SpinLock<SinkState>,
}

/// Mutable sink state guarded by the logger's spinlock.
struct SinkState {
    file: Option<File>,
}

static LOGGER: HostLogger = HostLogger::new();

/// Returns the process-wide logger instance.
pub fn logger() -> &'static HostLogger {
    &LOGGER
}

impl HostLogger {
    /// Creates a detached logger: console sink only, `Info` threshold.
    pub const fn new() -> Self {
        Self {
            threshold: AtomicU8::new(LogLevel::Info.as_u8()),
            pause_on_fatal: AtomicBool::new(false),
            sinks: SpinLock::new(SinkState { file: None }),
        }
    }

    /// The current minimum level.
    pub fn threshold(&self) -> LogLevel {
        LogLevel::from_u8(self.threshold.load(Ordering::Relaxed))
    }

    /// Sets the minimum level a record needs to reach the sinks.
    pub fn set_threshold(&self, level: LogLevel) {
        self.threshold.store(level.as_u8(), Ordering::Relaxed);
    }

    /// Enables or disables the interactive pause after a fatal assertion.
    pub fn set_pause_on_fatal(&self, pause: bool) {
        self.pause_on_fatal.store(pause, Ordering::Relaxed);
    }

    /// Opens `path` as the file sink, truncating previous content so every
    /// run starts a fresh log. Replaces any previously attached file.
    pub fn attach_file(&self, path: &Path) -> std::io::Result<()> {
        let file = File::create(path)?;
        self.sinks.lock().file = Some(file);
        Ok(())
    }

    /// Detaches the file sink, leaving the console sink in place.
    pub fn detach_file(&self) {
        self.sinks.lock().file = None;
    }

    /// Writes one record to every sink.
    ///
    /// Filtering happens here, before formatting. `Raw` orders above every
    /// threshold, so raw appends always pass.
    pub fn write(
        &self,
        level: LogLevel,
        origin: Origin<'_>,
        args: fmt::Arguments<'_>,
        style: LineStyle,
    ) {
        if level < self.threshold() {
            return;
        }

        let now = chrono::Local::now();
        let mut sinks = self.sinks.lock();

        let stderr = std::io::stderr();
        let mut console = stderr.lock();
        if style.prefix {
            let _ = write!(
                console,
                "{} {:<5} {}:{}: ",
                now.format(CONSOLE_STAMP),
                level.as_str(),
                origin.file,
                origin.line
            );
        }
        let _ = console.write_fmt(args);
        if style.newline {
            let _ = console.write_all(b"\n");
        }

        if let Some(file) = sinks.file.as_mut() {
            if style.prefix {
                let _ = write!(
                    file,
                    "{} {:<5} {}:{}: ",
                    now.format(FILE_STAMP),
                    level.as_str(),
                    origin.file,
                    origin.line
                );
            }
            let _ = file.write_fmt(args);
            if style.newline {
                let _ = file.write_all(b"\n");
            }
            let _ = file.flush();
        }
    }

    /// Flushes the file sink. The console sink is unbuffered already.
    pub fn flush(&self) {
        if let Some(file) = self.sinks.lock().file.as_mut() {
            let _ = file.flush();
        }
    }

    /// Blocks for Enter on stdin when pause-on-fatal is configured.
    ///
    /// Runs outside the sink lock; only the fatal-assert path calls this.
    pub(crate) fn pause_if_configured(&self) {
        if !self.pause_on_fatal.load(Ordering::Relaxed) {
            return;
        }
        let _ = write!(std::io::stderr(), "Press Enter to exit... ");
        let mut line = String::new();
        let _ = std::io::stdin().read_line(&mut line);
    }
}

impl Default for HostLogger {
    fn default() -> Self {
        Self::new()
    }
}
