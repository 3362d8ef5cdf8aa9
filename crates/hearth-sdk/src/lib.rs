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

//! The public-facing Software Development Kit (SDK) for the Hearth host.
//! This crate provides a simple and stable API for application developers:
//! implement [`Application`], hand it to [`Host::run`], and the host owns
//! the rest, including recompiling and relaunching itself when the sources
//! change.

mod host;

pub use host::Host;

use hearth_core::config::HostConfig;
use hearth_core::platform::{HostWindow, KeySym};
use hearth_core::renderer::{RenderError, RenderHost};

/// Everything an application commonly needs, in one import.
pub mod prelude {
    pub use crate::{Application, FrameContext, Host, InitContext};
    pub use hearth_core::config::{self, HostConfig};
    pub use hearth_core::diag::LogLevel;
    pub use hearth_core::memory::tracking::TrackingAllocator;
    pub use hearth_core::platform::KeySym;
    pub use hearth_core::renderer::{EntityTag, FrameStats, RenderError, RenderHost, Vertex};
}

/// What the host hands the application at creation time.
pub struct InitContext<'a> {
    /// The native window the host created.
    pub window: &'a dyn HostWindow,
    /// The full configuration the host was started with.
    pub config: &'a HostConfig,
}

/// Per-frame data handed to [`Application::update`] and
/// [`Application::render`].
#[derive(Debug, Clone, Copy)]
pub struct FrameContext {
    /// Duration of the previous frame in seconds, clamped by the clock.
    pub frame_time: f64,
    /// Accumulated clamped frame time since the host started.
    pub elapsed: f64,
    /// Number of completed frames.
    pub frame_index: u64,
    /// Rate estimate derived from the previous frame.
    pub fps: f64,
    /// The most recent key press, [`KeySym::None`] before the first one.
    pub last_key: KeySym,
}

/// The application the host runs.
pub trait Application: Sized + 'static {
    /// Called once at the beginning of the application to create the initial state.
    fn new(context: InitContext) -> Self;

    /// Called every frame for application logic updates.
    fn update(&mut self, frame: &FrameContext);

    /// Called every frame, inside an open frame bracket, to submit geometry
    /// through the render host.
    fn render(&mut self, frame: &FrameContext, host: &mut dyn RenderHost)
        -> Result<(), RenderError>;
}
