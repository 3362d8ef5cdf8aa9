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

//! The dedicated event thread.
//!
//! The native event loop blocks in its own thread so the host loop never
//! stalls on the window system. Descriptive events flow out through the
//! [`EventBus`](hearth_core::event::EventBus) sender; the load-bearing exit
//! and last-key signals are published straight into
//! [`HostSignals`](hearth_core::HostSignals) from here.
//!
//! Running the loop off the main thread is supported on X11, Wayland, and
//! Windows. macOS requires the native loop on the main thread and is not
//! covered by this pump.

use crate::error::PlatformError;
use crate::platform::keys;
use crate::platform::window::WinitWindow;
use hearth_core::config::WindowConfig;
use hearth_core::event::HostEvent;
use hearth_core::platform::KeySym;
use hearth_core::HostSignals;
use std::sync::Arc;
use std::thread::{self, JoinHandle};
use std::time::Duration;
use winit::application::ApplicationHandler;
use winit::event::{ElementState, WindowEvent};
use winit::event_loop::{ActiveEventLoop, ControlFlow, EventLoop};
use winit::window::WindowId;

/// How long [`EventSource::spawn`] waits for the event thread to hand the
/// window back before declaring the bring-up failed.
const WINDOW_HANDBACK_TIMEOUT: Duration = Duration::from_secs(10);

/// Owns the dedicated event thread.
///
/// Created by [`spawn`](EventSource::spawn), which blocks until the thread
/// has either produced the native window or failed to bring the platform
/// up. Dropping the source without [`join`](EventSource::join) leaves the
/// thread running, which is exactly what a process-image handover needs.
pub struct EventSource {
    thread: Option<JoinHandle<()>>,
}

impl EventSource {
    /// Spawns the event thread, waits for the window, and returns both.
    ///
    /// The thread keeps pumping until the user asks to quit: a close request
    /// or the Escape key makes it flip the exit signal and wind the native
    /// loop down.
    pub fn spawn(
        config: WindowConfig,
        signals: Arc<HostSignals>,
        events: flume::Sender<HostEvent>,
    ) -> Result<(EventSource, Arc<WinitWindow>), PlatformError> {
        let (window_tx, window_rx) = flume::bounded(1);

        let thread = thread::Builder::new()
            .name("hearth-events".to_string())
            .spawn(move || run_event_loop(config, signals, events, window_tx))
            .map_err(PlatformError::Thread)?;

        match window_rx.recv_timeout(WINDOW_HANDBACK_TIMEOUT) {
            Ok(Ok(window)) => Ok((
                EventSource {
                    thread: Some(thread),
                },
                window,
            )),
            Ok(Err(e)) => {
                let _ = thread.join();
                Err(e)
            }
            Err(_) => Err(PlatformError::Disconnected),
        }
    }

    /// Waits for the event thread to finish. Call after the exit signal has
    /// been observed; the thread only terminates once the native loop has
    /// wound down.
    pub fn join(mut self) {
        if let Some(handle) = self.thread.take() {
            if handle.join().is_err() {
                log::error!("The event thread panicked during shutdown");
            }
        }
    }
}

fn run_event_loop(
    config: WindowConfig,
    signals: Arc<HostSignals>,
    events: flume::Sender<HostEvent>,
    window_tx: flume::Sender<Result<Arc<WinitWindow>, PlatformError>>,
) {
    let mut builder = EventLoop::builder();

    #[cfg(target_os = "linux")]
    {
        use winit::platform::wayland::EventLoopBuilderExtWayland;
        use winit::platform::x11::EventLoopBuilderExtX11;

        // Both backend traits expose `with_any_thread`; disambiguate.
        EventLoopBuilderExtX11::with_any_thread(&mut builder, true);
        EventLoopBuilderExtWayland::with_any_thread(&mut builder, true);
    }
    #[cfg(target_os = "windows")]
    {
        use winit::platform::windows::EventLoopBuilderExtWindows;

        EventLoopBuilderExtWindows::with_any_thread(&mut builder, true);
    }

    let event_loop = match builder.build() {
        Ok(event_loop) => event_loop,
        Err(e) => {
            log::error!("Could not build the native event loop: {e}");
            let _ = window_tx.send(Err(PlatformError::EventLoop(e.to_string())));
            return;
        }
    };

    let mut pump = PumpState {
        config,
        signals,
        events,
        window_tx: Some(window_tx),
        window: None,
    };
    if let Err(e) = event_loop.run_app(&mut pump) {
        log::error!("Event loop terminated abnormally: {e}");
    }
    log::debug!("Event thread finished");
}

/// The `winit` application driven by the event thread.
struct PumpState {
    config: WindowConfig,
    signals: Arc<HostSignals>,
    events: flume::Sender<HostEvent>,
    window_tx: Option<flume::Sender<Result<Arc<WinitWindow>, PlatformError>>>,
    window: Option<Arc<WinitWindow>>,
}

impl PumpState {
    fn send(&self, event: HostEvent) {
        // The host loop drops its receiver while shutting down; stale sends
        // are expected then.
        if self.events.send(event).is_err() {
            log::trace!("Host event dropped: the receiving side is gone");
        }
    }
}

impl ApplicationHandler for PumpState {
    fn resumed(&mut self, event_loop: &ActiveEventLoop) {
        if self.window.is_some() {
            return;
        }
        event_loop.set_control_flow(ControlFlow::Wait);

        match WinitWindow::create(event_loop, &self.config) {
            Ok(window) => {
                let window = Arc::new(window);
                self.window = Some(window.clone());
                if let Some(tx) = self.window_tx.take() {
                    let _ = tx.send(Ok(window));
                }
            }
            Err(e) => {
                log::error!("Could not create the native window: {e}");
                if let Some(tx) = self.window_tx.take() {
                    let _ = tx.send(Err(PlatformError::WindowCreation(e.to_string())));
                }
                event_loop.exit();
            }
        }
    }

    fn window_event(
        &mut self,
        event_loop: &ActiveEventLoop,
        _window_id: WindowId,
        event: WindowEvent,
    ) {
        log::trace!("Window event: {event:?}");

        match event {
            WindowEvent::CloseRequested => {
                log::info!("Window close requested; shutting the host down");
                self.send(HostEvent::CloseRequested);
                self.signals.request_exit();
                event_loop.exit();
            }
            WindowEvent::KeyboardInput {
                event: key_event, ..
            } => {
                let key = keys::translate_key_event(&key_event);
                match key_event.state {
                    ElementState::Pressed if !key_event.repeat => {
                        self.signals.publish_key(key);
                        self.send(HostEvent::KeyPressed { key });
                        if key == KeySym::Escape {
                            log::info!("Escape pressed; shutting the host down");
                            self.signals.request_exit();
                            event_loop.exit();
                        }
                    }
                    ElementState::Released => {
                        self.send(HostEvent::KeyReleased { key });
                    }
                    _ => {}
                }
            }
            WindowEvent::Resized(size) => {
                self.send(HostEvent::Resized {
                    width: size.width,
                    height: size.height,
                });
            }
            WindowEvent::Focused(focused) => {
                self.send(HostEvent::FocusChanged { focused });
            }
            WindowEvent::CursorMoved { position, .. } => {
                self.send(HostEvent::CursorMoved {
                    x: position.x as f32,
                    y: position.y as f32,
                });
            }
            WindowEvent::RedrawRequested => {
                self.send(HostEvent::RedrawRequested);
            }
            _ => {}
        }
    }
}
