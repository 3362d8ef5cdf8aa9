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

//! # Hearth Infra
//!
//! Concrete implementations behind the core contracts: the dedicated event
//! thread with its `winit` pump, the native window wrapper, and the built-in
//! render host.

pub mod error;
pub mod platform;
pub mod render;

pub use error::PlatformError;
pub use platform::pump::EventSource;
pub use platform::window::WinitWindow;
pub use render::headless::HeadlessRenderHost;
