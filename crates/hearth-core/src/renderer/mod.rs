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

//! The render host seam.
//!
//! The host loop drives rendering through [`RenderHost`] without knowing
//! what sits behind it. Each loop iteration opens exactly one frame bracket
//! with [`begin_frame`](RenderHost::begin_frame), issues any number of
//! [`draw`](RenderHost::draw) calls inside it (zero is a valid frame), and
//! closes it with [`end_frame`](RenderHost::end_frame).

use crate::platform::HostWindow;
use bytemuck::{Pod, Zeroable};
use std::fmt;

/// One vertex as submitted to [`RenderHost::draw`].
///
/// `Pod` so a backend can hand the slice straight to the GPU.
#[repr(C)]
#[derive(Debug, Clone, Copy, PartialEq, Pod, Zeroable)]
pub struct Vertex {
    /// Position in the application's coordinate space.
    pub position: [f32; 3],
    /// Linear RGB color.
    pub color: [f32; 3],
    /// Texture coordinates.
    pub uv: [f32; 2],
}

/// Application-owned tag data riding along with a draw call.
///
/// The host passes the slice through untouched; only application code
/// assigns meaning to `tag` and mutates it between frames.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct EntityTag {
    /// Application-chosen entity identifier.
    pub id: u32,
    /// Application-chosen tag value.
    pub tag: u32,
}

/// Counters for one completed frame, returned by
/// [`end_frame`](RenderHost::end_frame).
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct FrameStats {
    /// Index of the frame that just closed.
    pub frame_number: u64,
    /// Draw calls issued inside the bracket.
    pub draw_calls: u32,
    /// Vertices submitted across all draw calls.
    pub vertices: u64,
}

/// Errors surfaced by a render host.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RenderError {
    /// An operation ran before [`RenderHost::init`] succeeded.
    NotInitialized,
    /// The backend could not be brought up.
    InitializationFailed(String),
    /// A frame-bracket rule was broken, such as a draw outside
    /// `begin_frame`/`end_frame` or a nested `begin_frame`.
    BracketMismatch {
        /// The operation that violated the bracket.
        operation: &'static str,
    },
    /// The presentation surface was lost and could not be restored.
    SurfaceLost(String),
    /// Any other backend failure.
    Internal(String),
}

impl fmt::Display for RenderError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RenderError::NotInitialized => {
                write!(f, "Render host used before initialization")
            }
            RenderError::InitializationFailed(msg) => {
                write!(f, "Render host initialization failed: {msg}")
            }
            RenderError::BracketMismatch { operation } => {
                write!(f, "Frame bracket violation during '{operation}'")
            }
            RenderError::SurfaceLost(msg) => {
                write!(f, "Render surface lost: {msg}")
            }
            RenderError::Internal(msg) => {
                write!(f, "Render host internal error: {msg}")
            }
        }
    }
}

impl std::error::Error for RenderError {}

/// A rendering backend as seen by the host loop.
pub trait RenderHost: fmt::Debug {
    /// Binds the backend to `window`. Must succeed before any frame work.
    fn init(&mut self, window: &dyn HostWindow) -> Result<(), RenderError>;

    /// Opens the frame bracket for this loop iteration.
    fn begin_frame(&mut self) -> Result<(), RenderError>;

    /// Submits geometry inside the open bracket.
    ///
    /// `entities` is application tag data travelling with the draw; the
    /// host never reads or writes it.
    fn draw(
        &mut self,
        vertices: &[Vertex],
        indices: &[u32],
        entities: &mut [EntityTag],
    ) -> Result<(), RenderError>;

    /// Closes the frame bracket and reports what the frame submitted.
    fn end_frame(&mut self) -> Result<FrameStats, RenderError>;

    /// Notifies the backend that the window's inner size changed.
    fn resize(&mut self, width: u32, height: u32);

    /// Releases backend resources. Safe to call more than once.
    fn shutdown(&mut self);
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn vertex_is_tightly_packed() {
        assert_eq!(std::mem::size_of::<Vertex>(), 32);

        let vertices = [
            Vertex {
                position: [0.0, 1.0, 2.0],
                color: [0.1, 0.2, 0.3],
                uv: [0.5, 0.5],
            },
            Vertex {
                position: [3.0, 4.0, 5.0],
                color: [0.4, 0.5, 0.6],
                uv: [1.0, 0.0],
            },
        ];
        let bytes: &[u8] = bytemuck::cast_slice(&vertices);
        assert_eq!(bytes.len(), 64);
    }

    #[test]
    fn render_error_display_is_descriptive() {
        assert_eq!(
            RenderError::NotInitialized.to_string(),
            "Render host used before initialization"
        );
        assert_eq!(
            RenderError::BracketMismatch { operation: "draw" }.to_string(),
            "Frame bracket violation during 'draw'"
        );
        assert_eq!(
            RenderError::SurfaceLost("device removed".to_string()).to_string(),
            "Render surface lost: device removed"
        );
    }
}
