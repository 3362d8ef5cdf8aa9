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

//! Host events and the channel that carries them off the event thread.
//!
//! [`HostEvent`] is the descriptive stream: what happened, for application
//! code that wants to react to it. The load-bearing signals (exit requested,
//! last key) travel separately through
//! [`HostSignals`](crate::signal::HostSignals) so the host loop never has to
//! drain a channel to learn it should stop.

use crate::platform::KeySym;

/// An event observed by the platform event thread.
#[derive(Debug, Clone, PartialEq)]
pub enum HostEvent {
    /// A key went down. Repeats from held keys are filtered out.
    KeyPressed {
        /// The key that was pressed.
        key: KeySym,
    },
    /// A key was released.
    KeyReleased {
        /// The key that was released.
        key: KeySym,
    },
    /// The window's inner size changed.
    Resized {
        /// New width in physical pixels.
        width: u32,
        /// New height in physical pixels.
        height: u32,
    },
    /// The window gained or lost input focus.
    FocusChanged {
        /// `true` when focus was gained.
        focused: bool,
    },
    /// The cursor moved inside the window.
    CursorMoved {
        /// X position in physical pixels.
        x: f32,
        /// Y position in physical pixels.
        y: f32,
    },
    /// The backend asked for the window to be redrawn.
    RedrawRequested,
    /// The user asked to close the window.
    CloseRequested,
}

/// Multi-producer, multi-consumer channel carrying [`HostEvent`]s from the
/// event thread into the host loop.
#[derive(Debug)]
pub struct EventBus {
    sender: flume::Sender<HostEvent>,
    receiver: flume::Receiver<HostEvent>,
}

impl EventBus {
    /// Creates an unbounded bus.
    pub fn new() -> Self {
        let (sender, receiver) = flume::unbounded();
        log::debug!("EventBus created");
        Self { sender, receiver }
    }

    /// Publishes an event. A send can only fail once every receiver is gone,
    /// which the host treats as a wiring error and logs.
    pub fn publish(&self, event: HostEvent) {
        if let Err(e) = self.sender.send(event) {
            log::error!("Failed to publish host event: {e}");
        }
    }

    /// A clonable sender for the event thread.
    pub fn sender(&self) -> flume::Sender<HostEvent> {
        self.sender.clone()
    }

    /// The receiving end, drained by the host loop.
    pub fn receiver(&self) -> &flume::Receiver<HostEvent> {
        &self.receiver
    }
}

impl Default for EventBus {
    fn default() -> Self {
        Self::new()
    }
}
