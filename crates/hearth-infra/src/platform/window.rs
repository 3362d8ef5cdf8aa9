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

//! The native window, wrapped behind the host's platform contract.

use std::sync::Arc;

use hearth_core::config::WindowConfig;
use hearth_core::platform::{HostWindow, SharedWindowHandle};
use raw_window_handle::{
    DisplayHandle, HandleError, HasDisplayHandle, HasWindowHandle, WindowHandle,
};
use winit::dpi::LogicalSize;
use winit::error::OsError;
use winit::event_loop::ActiveEventLoop;
use winit::window::Window;

/// The `winit` window behind the [`HostWindow`] contract.
///
/// Internally an `Arc`: the event thread holds one clone for the pump while
/// the host loop holds another for the render side.
#[derive(Debug, Clone)]
pub struct WinitWindow {
    inner: Arc<Window>,
}

impl WinitWindow {
    /// Creates the native window on the event loop from the host's window
    /// settings.
    pub fn create(event_loop: &ActiveEventLoop, config: &WindowConfig) -> Result<Self, OsError> {
        let attributes = Window::default_attributes()
            .with_title(config.title.clone())
            .with_inner_size(LogicalSize::new(config.width, config.height))
            .with_visible(true);
        let window = event_loop.create_window(attributes)?;

        log::info!(
            "Native window '{}' up at {}x{} (id {:?})",
            config.title,
            config.width,
            config.height,
            window.id()
        );
        Ok(Self {
            inner: Arc::new(window),
        })
    }
}

// The raw handle pair a GPU backend would bind its surface to.

impl HasWindowHandle for WinitWindow {
    fn window_handle(&self) -> Result<WindowHandle<'_>, HandleError> {
        self.inner.window_handle()
    }
}

impl HasDisplayHandle for WinitWindow {
    fn display_handle(&self) -> Result<DisplayHandle<'_>, HandleError> {
        self.inner.display_handle()
    }
}

impl HostWindow for WinitWindow {
    fn inner_size(&self) -> (u32, u32) {
        let size = self.inner.inner_size();
        (size.width, size.height)
    }

    fn scale_factor(&self) -> f64 {
        self.inner.scale_factor()
    }

    fn request_redraw(&self) {
        self.inner.request_redraw();
    }

    fn clone_handle_arc(&self) -> SharedWindowHandle {
        self.inner.clone()
    }

    fn id(&self) -> u64 {
        use std::collections::hash_map::DefaultHasher;
        use std::hash::{Hash, Hasher};

        // winit's WindowId is opaque; hash it down to the stable u64 the
        // contract asks for.
        let mut hasher = DefaultHasher::new();
        self.inner.id().hash(&mut hasher);
        hasher.finish()
    }
}
