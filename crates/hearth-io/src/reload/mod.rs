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

//! The recompile-and-relaunch pipeline.
//!
//! A relaunch never re-enters any entry point of the running program. The
//! running image compiles the new binary, then hands the tail of its life
//! over to a fresh process image; see [`RelaunchPlan::transfer`].

mod command;
mod supervisor;

pub use command::CommandCompiler;
pub use supervisor::{ReloadSupervisor, RelaunchPlan, GENERATION_ENV};

use std::io;
use std::path::PathBuf;
use std::time::Duration;
use thiserror::Error;

/// A compile order: the command to run and where to run it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CompileRequest {
    /// Program followed by its arguments.
    pub command: Vec<String>,
    /// Working directory for the command.
    pub workdir: PathBuf,
}

/// What a successful compile reported back.
#[derive(Debug, Clone)]
pub struct CompileReport {
    /// Wall-clock time the command took.
    pub elapsed: Duration,
    /// Captured compiler output (stderr).
    pub log: String,
}

/// Runs compile commands. The production implementation shells out; tests
/// substitute their own.
pub trait Compiler: Send {
    /// Runs the compile order to completion, blocking the caller.
    fn compile(&self, request: &CompileRequest) -> Result<CompileReport, ReloadError>;
}

/// Errors surfaced by the reload pipeline.
#[derive(Debug, Error)]
pub enum ReloadError {
    /// The configured compile command has no program to run.
    #[error("the compile command is empty")]
    EmptyCommand,

    /// The compile command could not be started at all.
    #[error("failed to invoke '{program}': {source}")]
    Invoke {
        /// The program that could not be started.
        program: String,
        /// The OS error.
        source: io::Error,
    },

    /// The compile command ran and reported failure. The captured compiler
    /// output is in `log`.
    #[error("compile command failed ({})", status_text(.status))]
    CompileFailed {
        /// Exit code, or `None` when the command was killed by a signal.
        status: Option<i32>,
        /// Captured compiler output (stderr).
        log: String,
    },

    /// Control could not be handed to the new binary.
    #[error("failed to hand control to '{artifact}': {source}")]
    Transfer {
        /// The binary that should have taken over.
        artifact: PathBuf,
        /// The OS error.
        source: io::Error,
    },
}

fn status_text(status: &Option<i32>) -> String {
    match status {
        Some(code) => format!("exit code {code}"),
        None => "terminated by signal".to_string(),
    }
}
