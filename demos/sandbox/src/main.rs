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

// Hearth Sandbox
// Main binary for exercising the host: windowing, input, pacing and hot-reload.

use std::path::{Path, PathBuf};

use anyhow::Result;
use hearth_sdk::prelude::*;

#[global_allocator]
static GLOBAL: TrackingAllocator = TrackingAllocator::new(std::alloc::System);

/// A unit quad in the XY plane, one corner per primary color.
const QUAD: [Vertex; 4] = [
    Vertex {
        position: [-0.5, -0.5, 0.0],
        color: [1.0, 0.0, 0.0],
        uv: [0.0, 1.0],
    },
    Vertex {
        position: [0.5, -0.5, 0.0],
        color: [0.0, 1.0, 0.0],
        uv: [1.0, 1.0],
    },
    Vertex {
        position: [0.5, 0.5, 0.0],
        color: [0.0, 0.0, 1.0],
        uv: [1.0, 0.0],
    },
    Vertex {
        position: [-0.5, 0.5, 0.0],
        color: [1.0, 1.0, 1.0],
        uv: [0.0, 0.0],
    },
];

const QUAD_INDICES: [u32; 6] = [0, 1, 2, 2, 3, 0];

/// A half-size panel inset over the quad's center.
const INSET: [Vertex; 4] = [
    Vertex {
        position: [-0.25, -0.25, 0.1],
        color: [0.2, 0.2, 0.2],
        uv: [0.0, 1.0],
    },
    Vertex {
        position: [0.25, -0.25, 0.1],
        color: [0.2, 0.2, 0.2],
        uv: [1.0, 1.0],
    },
    Vertex {
        position: [0.25, 0.25, 0.1],
        color: [0.2, 0.2, 0.2],
        uv: [1.0, 0.0],
    },
    Vertex {
        position: [-0.25, 0.25, 0.1],
        color: [0.2, 0.2, 0.2],
        uv: [0.0, 0.0],
    },
];

/// A diagonal marker line drawn over the quad.
const LINE: [Vertex; 2] = [
    Vertex {
        position: [-0.6, -0.6, 0.0],
        color: [1.0, 1.0, 0.0],
        uv: [0.0, 0.0],
    },
    Vertex {
        position: [0.6, 0.6, 0.0],
        color: [1.0, 1.0, 0.0],
        uv: [1.0, 1.0],
    },
];

const LINE_INDICES: [u32; 2] = [0, 1];

/// Demo application: a pulsing quad with an inset panel and a marker line.
///
/// `Tab` marks the line entity (tag 2) so the tag write-back path of the
/// render host is visible in the logs.
struct DemoApp {
    quad: [Vertex; 4],
    quad_tags: [EntityTag; 1],
    inset_tags: [EntityTag; 1],
    line_tags: [EntityTag; 1],
    prev_key: KeySym,
}

impl Application for DemoApp {
    fn new(ctx: InitContext<'_>) -> Self {
        let (width, height) = ctx.window.inner_size();
        log::info!(
            "DemoApp: starting inside '{}' ({width}x{height})",
            ctx.config.window.title
        );

        Self {
            quad: QUAD,
            quad_tags: [EntityTag { id: 1, tag: 0 }],
            inset_tags: [EntityTag { id: 2, tag: 0 }],
            line_tags: [EntityTag { id: 3, tag: 0 }],
            prev_key: KeySym::None,
        }
    }

    fn update(&mut self, frame: &FrameContext) {
        // Pulse the quad between its base colors and white.
        let pulse = (frame.elapsed.sin() * 0.5 + 0.5) as f32;
        for (vertex, base) in self.quad.iter_mut().zip(QUAD.iter()) {
            for (channel, base_channel) in vertex.color.iter_mut().zip(base.color) {
                *channel = base_channel * (1.0 - pulse) + pulse;
            }
        }

        // The key slot is a status, not a stream, so only edges are acted on.
        if frame.last_key != self.prev_key {
            self.prev_key = frame.last_key;
            if frame.last_key == KeySym::Tab {
                self.line_tags[0].tag = 2;
                log::info!("DemoApp: marker line tagged (tag 2)");
            }
        }
    }

    fn render(
        &mut self,
        _frame: &FrameContext,
        host: &mut dyn RenderHost,
    ) -> Result<(), RenderError> {
        host.draw(&self.quad, &QUAD_INDICES, &mut self.quad_tags)?;
        host.draw(&INSET, &QUAD_INDICES, &mut self.inset_tags)?;
        host.draw(&LINE, &LINE_INDICES, &mut self.line_tags)?;
        Ok(())
    }
}

fn main() -> Result<()> {
    let config_path = Path::new("hearth.json");
    let config = if config_path.exists() {
        config::load(config_path)?
    } else {
        // No file on disk: run with defaults tuned for the demo.
        let mut config = HostConfig::default();
        config.window.title = "Hearth Sandbox".to_string();
        config.log.level = LogLevel::Debug;
        config.log.file = Some(PathBuf::from("hearth.log"));
        config.watch.paths = vec![PathBuf::from("crates"), PathBuf::from("demos")];
        config
    };

    Host::run::<DemoApp>(config)
}
