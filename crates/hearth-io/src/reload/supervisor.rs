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

//! The reload supervisor: compiles on demand and plans the handover.

use super::{CommandCompiler, CompileRequest, Compiler, ReloadError};
use hearth_core::config::{ReloadConfig, RelaunchMode};
use std::ffi::OsString;
use std::path::PathBuf;
use std::process::Command;

/// Environment variable carrying the relaunch generation across process
/// images. Absent in the first image, incremented on every handover.
pub const GENERATION_ENV: &str = "HEARTH_GENERATION";

/// Owns the compile step of the reload pipeline.
///
/// [`recompile`](ReloadSupervisor::recompile) blocks the host loop while the
/// compile command runs; a failed compile is an ordinary error the loop logs
/// and survives, never a reason to stop.
pub struct ReloadSupervisor {
    compiler: Box<dyn Compiler>,
    config: ReloadConfig,
    workdir: PathBuf,
    generation: u32,
}

impl ReloadSupervisor {
    /// Creates a supervisor that shells out through [`CommandCompiler`].
    pub fn new(config: ReloadConfig, workdir: PathBuf) -> Self {
        Self::with_compiler(Box::new(CommandCompiler), config, workdir)
    }

    /// Creates a supervisor with a caller-supplied compiler.
    pub fn with_compiler(
        compiler: Box<dyn Compiler>,
        config: ReloadConfig,
        workdir: PathBuf,
    ) -> Self {
        let generation = std::env::var(GENERATION_ENV)
            .ok()
            .and_then(|value| value.parse().ok())
            .unwrap_or(0);
        Self {
            compiler,
            config,
            workdir,
            generation,
        }
    }

    /// Which process image this is: 0 for the first launch, incremented by
    /// every successful handover since.
    pub fn generation(&self) -> u32 {
        self.generation
    }

    /// Runs the compile command to completion and, on success, returns the
    /// plan for handing control to the new binary.
    pub fn recompile(&self) -> Result<RelaunchPlan, ReloadError> {
        log::info!(
            "Recompiling (generation {} -> {})",
            self.generation,
            self.generation + 1
        );

        let request = CompileRequest {
            command: self.config.compile.clone(),
            workdir: self.workdir.clone(),
        };
        let report = self.compiler.compile(&request)?;
        log::info!("Compile finished in {:.2} s", report.elapsed.as_secs_f64());

        let artifact = match &self.config.artifact {
            Some(path) => path.clone(),
            None => std::env::current_exe().map_err(|e| ReloadError::Transfer {
                artifact: PathBuf::from("<current executable>"),
                source: e,
            })?,
        };

        Ok(RelaunchPlan {
            artifact,
            args: std::env::args_os().skip(1).collect(),
            generation: self.generation + 1,
            mode: self.config.mode,
        })
    }
}

/// Everything needed to hand the process over to a freshly built binary.
#[derive(Debug)]
pub struct RelaunchPlan {
    /// The binary that takes over.
    pub artifact: PathBuf,
    /// Arguments forwarded from this image, without the program name.
    pub args: Vec<OsString>,
    /// Generation number the new image will report.
    pub generation: u32,
    /// How the handover happens.
    pub mode: RelaunchMode,
}

impl RelaunchPlan {
    /// Hands the rest of this process's life to the new binary.
    ///
    /// On success this never returns: in [`RelaunchMode::Exec`] the process
    /// image is replaced in place, keeping the same pid; in
    /// [`RelaunchMode::Spawn`] the new binary starts as a child and this
    /// process exits cleanly. Only a failed handover returns, as the error.
    pub fn transfer(self) -> ReloadError {
        log::info!(
            "Handing control to '{}' (generation {})",
            self.artifact.display(),
            self.generation
        );
        hearth_core::diag::logger().flush();

        #[cfg(unix)]
        if self.mode == RelaunchMode::Exec {
            use std::os::unix::process::CommandExt;

            let e = Command::new(&self.artifact)
                .args(&self.args)
                .env(GENERATION_ENV, self.generation.to_string())
                .exec();
            return ReloadError::Transfer {
                artifact: self.artifact,
                source: e,
            };
        }

        match Command::new(&self.artifact)
            .args(&self.args)
            .env(GENERATION_ENV, self.generation.to_string())
            .spawn()
        {
            Ok(_) => std::process::exit(0),
            Err(e) => ReloadError::Transfer {
                artifact: self.artifact,
                source: e,
            },
        }
    }
}
