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

//! A render host that counts instead of drawing.
//!
//! Enforces the full frame-bracket contract and accounts every submission,
//! producing real `FrameStats` without touching a GPU. This is the built-in
//! backend the host runs with until a hardware one takes its place.

use hearth_core::platform::HostWindow;
use hearth_core::renderer::{EntityTag, FrameStats, RenderError, RenderHost, Vertex};

/// The built-in counting render host.
#[derive(Debug, Default)]
pub struct HeadlessRenderHost {
    initialized: bool,
    frame_open: bool,
    frame_number: u64,
    draw_calls: u32,
    vertices: u64,
    size: (u32, u32),
}

impl HeadlessRenderHost {
    /// Creates an uninitialized host; [`init`](RenderHost::init) must run
    /// before any frame work.
    pub fn new() -> Self {
        Self::default()
    }
}

impl RenderHost for HeadlessRenderHost {
    fn init(&mut self, window: &dyn HostWindow) -> Result<(), RenderError> {
        let (width, height) = window.inner_size();
        log::info!(
            "Headless render host bound to window {} ({width}x{height}, scale {:.2})",
            window.id(),
            window.scale_factor()
        );
        self.size = (width, height);
        self.initialized = true;
        Ok(())
    }

    fn begin_frame(&mut self) -> Result<(), RenderError> {
        if !self.initialized {
            return Err(RenderError::NotInitialized);
        }
        if self.frame_open {
            return Err(RenderError::BracketMismatch {
                operation: "begin_frame",
            });
        }
        self.frame_open = true;
        self.draw_calls = 0;
        self.vertices = 0;
        Ok(())
    }

    fn draw(
        &mut self,
        vertices: &[Vertex],
        indices: &[u32],
        entities: &mut [EntityTag],
    ) -> Result<(), RenderError> {
        if !self.initialized {
            return Err(RenderError::NotInitialized);
        }
        if !self.frame_open {
            return Err(RenderError::BracketMismatch { operation: "draw" });
        }
        self.draw_calls += 1;
        self.vertices += vertices.len() as u64;
        log::trace!(
            "draw: {} vertices, {} indices, {} entity tags",
            vertices.len(),
            indices.len(),
            entities.len()
        );
        Ok(())
    }

    fn end_frame(&mut self) -> Result<FrameStats, RenderError> {
        if !self.initialized {
            return Err(RenderError::NotInitialized);
        }
        if !self.frame_open {
            return Err(RenderError::BracketMismatch {
                operation: "end_frame",
            });
        }
        self.frame_open = false;
        let stats = FrameStats {
            frame_number: self.frame_number,
            draw_calls: self.draw_calls,
            vertices: self.vertices,
        };
        self.frame_number += 1;
        Ok(stats)
    }

    fn resize(&mut self, width: u32, height: u32) {
        log::debug!("Render host resized to {width}x{height}");
        self.size = (width, height);
    }

    fn shutdown(&mut self) {
        if self.initialized {
            log::info!("Headless render host shut down after {} frames", self.frame_number);
        }
        self.initialized = false;
        self.frame_open = false;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use hearth_core::platform::SharedWindowHandle;
    use raw_window_handle::{
        DisplayHandle, HandleError, HasDisplayHandle, HasWindowHandle, WindowHandle,
    };
    use std::sync::Arc;

    #[derive(Debug)]
    struct FakeWindow;

    impl HasWindowHandle for FakeWindow {
        fn window_handle(&self) -> Result<WindowHandle<'_>, HandleError> {
            Err(HandleError::Unavailable)
        }
    }

    impl HasDisplayHandle for FakeWindow {
        fn display_handle(&self) -> Result<DisplayHandle<'_>, HandleError> {
            Err(HandleError::Unavailable)
        }
    }

    impl HostWindow for FakeWindow {
        fn inner_size(&self) -> (u32, u32) {
            (640, 360)
        }

        fn scale_factor(&self) -> f64 {
            1.0
        }

        fn request_redraw(&self) {}

        fn clone_handle_arc(&self) -> SharedWindowHandle {
            Arc::new(FakeWindow)
        }

        fn id(&self) -> u64 {
            7
        }
    }

    fn initialized_host() -> HeadlessRenderHost {
        let mut host = HeadlessRenderHost::new();
        host.init(&FakeWindow).unwrap();
        host
    }

    fn triangle() -> Vec<Vertex> {
        vec![
            Vertex {
                position: [0.0, 0.5, 0.0],
                color: [1.0, 0.0, 0.0],
                uv: [0.5, 1.0],
            },
            Vertex {
                position: [-0.5, -0.5, 0.0],
                color: [0.0, 1.0, 0.0],
                uv: [0.0, 0.0],
            },
            Vertex {
                position: [0.5, -0.5, 0.0],
                color: [0.0, 0.0, 1.0],
                uv: [1.0, 0.0],
            },
        ]
    }

    #[test]
    fn frame_work_requires_initialization() {
        let mut host = HeadlessRenderHost::new();
        assert_eq!(host.begin_frame(), Err(RenderError::NotInitialized));
        assert_eq!(host.end_frame(), Err(RenderError::NotInitialized));
    }

    #[test]
    fn brackets_must_not_nest() {
        let mut host = initialized_host();
        host.begin_frame().unwrap();
        assert_eq!(
            host.begin_frame(),
            Err(RenderError::BracketMismatch {
                operation: "begin_frame"
            })
        );
    }

    #[test]
    fn draws_outside_a_bracket_are_rejected() {
        let mut host = initialized_host();
        let mut entities = [EntityTag::default()];
        let result = host.draw(&triangle(), &[0, 1, 2], &mut entities);
        assert_eq!(result, Err(RenderError::BracketMismatch { operation: "draw" }));

        host.begin_frame().unwrap();
        host.end_frame().unwrap();
        assert_eq!(
            host.end_frame(),
            Err(RenderError::BracketMismatch {
                operation: "end_frame"
            })
        );
    }

    #[test]
    fn a_frame_with_zero_draws_is_valid() {
        let mut host = initialized_host();
        host.begin_frame().unwrap();
        let stats = host.end_frame().unwrap();
        assert_eq!(stats.frame_number, 0);
        assert_eq!(stats.draw_calls, 0);
        assert_eq!(stats.vertices, 0);
    }

    #[test]
    fn stats_count_the_submissions_of_one_frame() {
        let mut host = initialized_host();
        let mut entities = [EntityTag { id: 1, tag: 0 }];

        host.begin_frame().unwrap();
        host.draw(&triangle(), &[0, 1, 2], &mut entities).unwrap();
        host.draw(&triangle(), &[0, 1, 2], &mut entities).unwrap();
        let first = host.end_frame().unwrap();
        assert_eq!(first.frame_number, 0);
        assert_eq!(first.draw_calls, 2);
        assert_eq!(first.vertices, 6);

        host.begin_frame().unwrap();
        host.draw(&triangle(), &[0, 1, 2], &mut entities).unwrap();
        let second = host.end_frame().unwrap();
        assert_eq!(second.frame_number, 1);
        assert_eq!(second.draw_calls, 1);
        assert_eq!(second.vertices, 3);
    }

    #[test]
    fn entity_tags_pass_through_untouched() {
        let mut host = initialized_host();
        let mut entities = [EntityTag { id: 3, tag: 9 }, EntityTag { id: 4, tag: 2 }];

        host.begin_frame().unwrap();
        host.draw(&triangle(), &[0, 1, 2], &mut entities).unwrap();
        host.end_frame().unwrap();

        assert_eq!(entities[0], EntityTag { id: 3, tag: 9 });
        assert_eq!(entities[1], EntityTag { id: 4, tag: 2 });
    }

    #[test]
    fn shutdown_is_idempotent() {
        let mut host = initialized_host();
        host.shutdown();
        host.shutdown();
        assert_eq!(host.begin_frame(), Err(RenderError::NotInitialized));
    }
}
