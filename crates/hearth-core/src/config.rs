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

//! Host configuration, loaded from JSON.
//!
//! Every section and every field has a default, and deserialization fills
//! anything a config file leaves out, so a partial file is always valid.

use crate::diag::LogLevel;
use anyhow::Context;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Top-level host configuration.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct HostConfig {
    /// Native window settings.
    pub window: WindowConfig,
    /// Frame pacing settings.
    pub clock: ClockConfig,
    /// Logging settings.
    pub log: LogConfig,
    /// Filesystem watching settings.
    pub watch: WatchConfig,
    /// Recompile-and-relaunch settings.
    pub reload: ReloadConfig,
}

/// Native window settings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct WindowConfig {
    /// Window title.
    pub title: String,
    /// Initial inner width in physical pixels.
    pub width: u32,
    /// Initial inner height in physical pixels.
    pub height: u32,
}

impl Default for WindowConfig {
    fn default() -> Self {
        Self {
            title: "Hearth".to_string(),
            width: 1024,
            height: 768,
        }
    }
}

/// Frame pacing settings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ClockConfig {
    /// Frame-rate cap handed to the clock. Clamped at runtime, so any
    /// value is accepted here.
    pub max_fps: u32,
}

impl Default for ClockConfig {
    fn default() -> Self {
        Self { max_fps: 60 }
    }
}

/// Logging settings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LogConfig {
    /// Threshold below which records are dropped.
    pub level: LogLevel,
    /// Optional file sink. The file is truncated when the logger attaches.
    pub file: Option<PathBuf>,
    /// Wait for a keypress after a fatal assertion before exiting, so the
    /// console output survives long enough to be read.
    pub pause_on_fatal: bool,
}

impl Default for LogConfig {
    fn default() -> Self {
        Self {
            level: LogLevel::Info,
            file: None,
            pause_on_fatal: false,
        }
    }
}

/// Filesystem watching settings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct WatchConfig {
    /// Whether the watch supervisor runs at all.
    pub enabled: bool,
    /// Directories to watch, relative to the working directory.
    pub paths: Vec<PathBuf>,
    /// File-name suffixes that qualify a change as a relaunch trigger.
    pub suffixes: Vec<String>,
}

impl Default for WatchConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            paths: vec![PathBuf::from("src")],
            suffixes: vec![".rs".to_string()],
        }
    }
}

/// Recompile-and-relaunch settings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ReloadConfig {
    /// Compile command and arguments, run from the working directory.
    pub compile: Vec<String>,
    /// Binary to relaunch after a successful compile. Defaults to the
    /// running executable, which the compile command rewrites in place.
    pub artifact: Option<PathBuf>,
    /// How control is handed to the new process image.
    pub mode: RelaunchMode,
}

impl Default for ReloadConfig {
    fn default() -> Self {
        Self {
            compile: vec!["cargo".to_string(), "build".to_string()],
            artifact: None,
            mode: RelaunchMode::default(),
        }
    }
}

/// How a relaunch replaces the running process.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RelaunchMode {
    /// Replace the process image in place. Unix only; other platforms fall
    /// back to [`RelaunchMode::Spawn`].
    #[default]
    Exec,
    /// Spawn the new binary as a child, then exit this process.
    Spawn,
}

/// Loads a config file, failing on a missing, unreadable, or invalid file.
pub fn load(path: &Path) -> anyhow::Result<HostConfig> {
    let text = std::fs::read_to_string(path)
        .with_context(|| format!("reading config file '{}'", path.display()))?;
    let config = serde_json::from_str(&text)
        .with_context(|| format!("parsing config file '{}'", path.display()))?;
    Ok(config)
}

/// Loads a config file if it exists, otherwise returns the defaults.
///
/// A file that exists but does not parse is still an error; only absence
/// falls back to defaults.
pub fn load_or_default(path: &Path) -> anyhow::Result<HostConfig> {
    if path.exists() {
        load(path)
    } else {
        Ok(HostConfig::default())
    }
}
