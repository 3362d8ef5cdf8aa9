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

//! The host loop.
//!
//! One iteration per frame: pace the clock, poll the watch supervisor (and
//! possibly break out to relaunch), poll the exit signal, drain the event
//! bus, run the application, render one bracketed frame. The loop only ends
//! two ways: the user quit, or a newer binary takes over the process.

use crate::{Application, FrameContext, InitContext};
use anyhow::Result;
use hearth_core::clock::FrameClock;
use hearth_core::config::HostConfig;
use hearth_core::event::{EventBus, HostEvent};
use hearth_core::renderer::RenderHost;
use hearth_core::{diag, memory, HostSignals, Stopwatch};
use hearth_infra::{EventSource, HeadlessRenderHost};
use hearth_io::reload::{ReloadError, ReloadSupervisor, RelaunchPlan};
use hearth_io::watch::{RelaunchRequest, WatchSupervisor};
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

/// Cadence of the frame summary log line.
const SUMMARY_PERIOD: Duration = Duration::from_secs(1);

/// Why the host loop stopped iterating.
enum LoopExit {
    /// The user asked to quit.
    Quit,
    /// A fresh binary is ready to take over.
    Relaunch(RelaunchPlan),
}

/// The public entry point for the Hearth host.
pub struct Host;

impl Host {
    /// Brings the host up, runs the application until the user quits, and
    /// tears everything down again.
    ///
    /// Blocks the calling thread for the application's whole life. When a
    /// watched source file changes and the recompile succeeds, this
    /// function does not return at all: the process image is handed to the
    /// new binary.
    pub fn run<A: Application>(config: HostConfig) -> Result<()> {
        // 1. Diagnostics first, so everything after can log.
        diag::init(&config.log)?;

        // 2. The reload pipeline; its generation number tags this image.
        let workdir = std::env::current_dir().unwrap_or_else(|_| PathBuf::from("."));
        let reload = ReloadSupervisor::new(config.reload.clone(), workdir);
        log::info!(
            "Hearth host starting (generation {}, pid {})",
            reload.generation(),
            std::process::id()
        );

        // 3. Cross-thread signals and the event bus.
        let signals = Arc::new(HostSignals::new());
        let bus = EventBus::new();

        // 4. The event thread brings up the native window.
        let (source, window) =
            match EventSource::spawn(config.window.clone(), Arc::clone(&signals), bus.sender()) {
                Ok(pair) => pair,
                Err(e) => {
                    hearth_core::fatal!("Could not start the event thread: {e}");
                    return Err(e.into());
                }
            };

        // 5. The render host binds to the window.
        let mut render = HeadlessRenderHost::new();
        render.init(window.as_ref())?;

        // 6. The application.
        let mut app = A::new(InitContext {
            window: window.as_ref(),
            config: &config,
        });

        // 7. Source watching, if configured.
        let mut watch = spawn_watches(&config);

        // 8. The clock paces everything from here on.
        let mut clock = FrameClock::new(config.clock.max_fps);
        let mut ticker = SummaryTicker::new(SUMMARY_PERIOD);

        let exit = loop {
            let timing = clock.advance_frame();

            if let Some(watcher) = watch.as_mut() {
                if watcher.poll() == RelaunchRequest::Trigger {
                    match reload.recompile() {
                        Ok(plan) => break LoopExit::Relaunch(plan),
                        Err(e) => {
                            if let ReloadError::CompileFailed { log: output, .. } = &e {
                                log::error!("{e}; keeping the old binary\n{output}");
                            } else {
                                log::error!("Recompile failed: {e}; keeping the old binary");
                            }
                        }
                    }
                }
            }

            if signals.exit_requested() {
                break LoopExit::Quit;
            }

            for event in bus.receiver().try_iter() {
                match event {
                    HostEvent::Resized { width, height } => render.resize(width, height),
                    other => log::trace!("Host event: {other:?}"),
                }
            }

            let frame = FrameContext {
                frame_time: timing.frame_time,
                elapsed: timing.elapsed,
                frame_index: timing.frame_index,
                fps: timing.fps,
                last_key: signals.last_key(),
            };

            app.update(&frame);

            if let Err(e) = render.begin_frame() {
                log::error!("Could not open the frame: {e}");
                continue;
            }
            if let Err(e) = app.render(&frame, &mut render) {
                log::error!("Application render failed: {e}");
            }
            match render.end_frame() {
                Ok(stats) => {
                    if ticker.tick() {
                        log::debug!(
                            "{:.0} fps ({:.2} ms), {} draws, {} vertices, heap {:.2} MB",
                            frame.fps,
                            frame.frame_time * 1000.0,
                            stats.draw_calls,
                            stats.vertices,
                            mib(memory::current_allocated_bytes() as u64)
                        );
                    }
                }
                Err(e) => log::error!("Could not close the frame: {e}"),
            }
        };

        match exit {
            LoopExit::Quit => {
                log::info!("Shutting down after {} frames", clock.frame_index());
                render.shutdown();
                drop(window);
                source.join();
                log_memory_summary();
                Ok(())
            }
            LoopExit::Relaunch(plan) => {
                render.shutdown();
                log::info!("Relaunching into generation {}", plan.generation);
                let e = plan.transfer();
                hearth_core::fatal!("Relaunch failed: {e}");
                Err(e.into())
            }
        }
    }
}

/// Brings the watch supervisor up. Every failure here is soft: the host
/// runs without hot reload rather than not at all.
fn spawn_watches(config: &HostConfig) -> Option<WatchSupervisor> {
    if !config.watch.enabled {
        log::info!("File watching disabled by configuration");
        return None;
    }
    match WatchSupervisor::new(config.watch.suffixes.clone()) {
        Ok(mut watcher) => {
            for path in &config.watch.paths {
                // Registration failures are logged by the supervisor.
                let _ = watcher.add_watch(path);
            }
            log::info!("Watching {} path(s) for changes", watcher.watches().len());
            Some(watcher)
        }
        Err(e) => {
            log::error!("File watching unavailable: {e}");
            None
        }
    }
}

fn log_memory_summary() {
    let stats = memory::memory_stats();
    log::info!("--- Memory Summary ---");
    log::info!("  Peak heap: {:.2} MB", mib(stats.peak_allocated_bytes));
    log::info!(
        "  Allocations: {} ({} outstanding)",
        stats.total_allocations,
        stats.net_allocations
    );
    log::info!("----------------------");
}

fn mib(bytes: u64) -> f64 {
    bytes as f64 / (1024.0 * 1024.0)
}

/// Fires once per period, measured against wall time.
struct SummaryTicker {
    period: Duration,
    watch: Stopwatch,
}

impl SummaryTicker {
    fn new(period: Duration) -> Self {
        Self {
            period,
            watch: Stopwatch::new(),
        }
    }

    fn tick(&mut self) -> bool {
        if self.watch.elapsed() >= self.period {
            self.watch.restart();
            return true;
        }
        false
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::thread;

    #[test]
    fn summary_ticker_fires_once_per_period() {
        let mut ticker = SummaryTicker::new(Duration::from_millis(50));
        assert!(!ticker.tick());

        thread::sleep(Duration::from_millis(80));
        assert!(ticker.tick());
        assert!(!ticker.tick());
    }

    #[test]
    fn mib_converts_bytes() {
        assert_eq!(mib(0), 0.0);
        assert_eq!(mib(1024 * 1024), 1.0);
        assert_eq!(mib(3 * 1024 * 1024 / 2), 1.5);
    }
}
