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

//! The production compiler: shells out and waits.

use super::{CompileReport, CompileRequest, Compiler, ReloadError};
use hearth_core::Stopwatch;
use std::process::Command;

/// Runs the configured compile command as a child process and blocks until
/// it finishes, capturing its stderr as the compile log.
#[derive(Debug, Default, Clone, Copy)]
pub struct CommandCompiler;

impl Compiler for CommandCompiler {
    fn compile(&self, request: &CompileRequest) -> Result<CompileReport, ReloadError> {
        let Some((program, args)) = request.command.split_first() else {
            return Err(ReloadError::EmptyCommand);
        };

        let watch = Stopwatch::new();
        let output = Command::new(program)
            .args(args)
            .current_dir(&request.workdir)
            .output()
            .map_err(|e| ReloadError::Invoke {
                program: program.clone(),
                source: e,
            })?;
        let elapsed = watch.elapsed();

        let log = String::from_utf8_lossy(&output.stderr).into_owned();
        if !output.status.success() {
            return Err(ReloadError::CompileFailed {
                status: output.status.code(),
                log,
            });
        }
        Ok(CompileReport { elapsed, log })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;

    fn request(command: &[&str]) -> CompileRequest {
        CompileRequest {
            command: command.iter().map(|s| s.to_string()).collect(),
            workdir: std::env::temp_dir(),
        }
    }

    #[test]
    fn empty_command_is_rejected() {
        let result = CommandCompiler.compile(&request(&[]));
        assert!(matches!(result, Err(ReloadError::EmptyCommand)));
    }

    #[test]
    fn missing_program_reports_the_invoke_failure() {
        let result = CommandCompiler.compile(&request(&["hearth-no-such-binary"]));
        match result {
            Err(ReloadError::Invoke { program, .. }) => {
                assert_eq!(program, "hearth-no-such-binary");
            }
            other => panic!("expected an invoke error, got {other:?}"),
        }
    }

    #[cfg(unix)]
    #[test]
    fn successful_command_reports_elapsed_time() {
        let report = CommandCompiler
            .compile(&request(&["/bin/sh", "-c", "exit 0"]))
            .unwrap();
        assert!(report.elapsed.as_secs() < 60);
    }

    #[cfg(unix)]
    #[test]
    fn failing_command_captures_status_and_stderr() {
        let result = CommandCompiler.compile(&request(&[
            "/bin/sh",
            "-c",
            "echo build broke 1>&2; exit 3",
        ]));
        match result {
            Err(ReloadError::CompileFailed { status, log }) => {
                assert_eq!(status, Some(3));
                assert!(log.contains("build broke"));
            }
            other => panic!("expected a compile failure, got {other:?}"),
        }
    }

    #[test]
    fn workdir_is_carried_in_the_request() {
        let request = CompileRequest {
            command: vec!["cargo".to_string(), "build".to_string()],
            workdir: PathBuf::from("/tmp"),
        };
        assert_eq!(request.workdir, PathBuf::from("/tmp"));
    }
}
