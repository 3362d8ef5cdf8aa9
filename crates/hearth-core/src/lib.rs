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

//! # Hearth Core
//!
//! Foundational crate containing the core types, contracts, and primitives
//! that define the host's architecture: the tagged allocator, the leveled
//! dual-sink logger, the frame clock, the cross-thread signals, and the
//! platform and renderer contracts the other crates implement.

#![warn(missing_docs)]

pub mod clock;
pub mod config;
pub mod diag;
pub mod event;
pub mod fs;
pub mod memory;
pub mod platform;
pub mod renderer;
pub mod signal;
pub mod utils;

pub use clock::{FrameClock, FrameTiming};
pub use config::HostConfig;
pub use signal::{HostSignals, RunState};
pub use utils::timer::Stopwatch;
