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

//! # Hearth IO
//!
//! Filesystem watching and the recompile-and-relaunch pipeline. The watch
//! supervisor turns native filesystem notifications into relaunch triggers;
//! the reload supervisor runs the compile command and hands the process over
//! to the freshly built binary.

pub mod reload;
pub mod watch;

pub use reload::{CommandCompiler, Compiler, ReloadError, ReloadSupervisor, RelaunchPlan};
pub use watch::{RelaunchRequest, WatchError, WatchSupervisor};
