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

//! Window abstraction decoupling the host from any concrete backend.

use raw_window_handle::{HasDisplayHandle, HasWindowHandle};
use std::sync::Arc;

/// Anything that can hand out raw window and display handles.
///
/// Blanket-implemented; render backends take this instead of a concrete
/// window type.
pub trait WindowHandleSource: HasWindowHandle + HasDisplayHandle {}

impl<T: HasWindowHandle + HasDisplayHandle> WindowHandleSource for T {}

/// A shareable, thread-safe handle source for render backends that need to
/// hold the window beyond the call that hands it over.
pub type SharedWindowHandle = Arc<dyn WindowHandleSource + Send + Sync>;

/// The host's view of a native window.
///
/// Implemented over the platform backend in the infrastructure crate; core
/// and SDK code only ever see this trait.
pub trait HostWindow: HasWindowHandle + HasDisplayHandle + Send + Sync {
    /// Current inner size in physical pixels, `(width, height)`.
    fn inner_size(&self) -> (u32, u32);

    /// The window's scale factor (DPI ratio).
    fn scale_factor(&self) -> f64;

    /// Asks the backend to schedule a redraw.
    fn request_redraw(&self);

    /// Clones an owned, shareable handle source backed by this window.
    fn clone_handle_arc(&self) -> SharedWindowHandle;

    /// A stable identifier for this window, unique within the process.
    fn id(&self) -> u64;
}
