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

//! Lock-free signals shared between the event thread and the host loop.
//!
//! The event thread publishes, the host loop polls. Everything here is a
//! plain atomic; no channel and no lock sits between a key press and the
//! loop observing it.

use crate::platform::KeySym;
use std::sync::atomic::{AtomicBool, AtomicU32, Ordering};

/// Lifecycle state of the host loop as seen through [`HostSignals`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RunState {
    /// The loop keeps iterating.
    Running,
    /// Shutdown has been requested; the loop exits at its next check.
    ExitRequested,
}

/// Cross-thread flags written by the event thread and read by the host loop.
///
/// Shared as an `Arc<HostSignals>`. The exit flag moves in one direction
/// only: once a shutdown has been requested there is no way back to
/// [`RunState::Running`].
pub struct HostSignals {
    exit: AtomicBool,
    last_key: AtomicU32,
}

impl HostSignals {
    /// Creates the signal block in the [`RunState::Running`] state with no
    /// key recorded.
    pub const fn new() -> Self {
        Self {
            exit: AtomicBool::new(false),
            last_key: AtomicU32::new(KeySym::None.to_raw()),
        }
    }

    /// Requests shutdown. Idempotent; later calls change nothing.
    pub fn request_exit(&self) {
        self.exit.store(true, Ordering::Release);
    }

    /// Whether shutdown has been requested.
    pub fn exit_requested(&self) -> bool {
        self.exit.load(Ordering::Acquire)
    }

    /// The current lifecycle state.
    pub fn run_state(&self) -> RunState {
        if self.exit_requested() {
            RunState::ExitRequested
        } else {
            RunState::Running
        }
    }

    /// Records the most recent key press. Each press overwrites the last.
    pub fn publish_key(&self, key: KeySym) {
        self.last_key.store(key.to_raw(), Ordering::Release);
    }

    /// The most recently published key press, or [`KeySym::None`] if no key
    /// has been pressed yet.
    pub fn last_key(&self) -> KeySym {
        KeySym::from_raw(self.last_key.load(Ordering::Acquire))
    }
}

impl Default for HostSignals {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;

    #[test]
    fn starts_running_with_no_key() {
        let signals = HostSignals::new();
        assert_eq!(signals.run_state(), RunState::Running);
        assert!(!signals.exit_requested());
        assert_eq!(signals.last_key(), KeySym::None);
    }

    #[test]
    fn exit_is_one_directional_and_idempotent() {
        let signals = HostSignals::new();
        signals.request_exit();
        assert_eq!(signals.run_state(), RunState::ExitRequested);
        signals.request_exit();
        assert_eq!(signals.run_state(), RunState::ExitRequested);
        assert!(signals.exit_requested());
    }

    #[test]
    fn each_key_press_overwrites_the_last() {
        let signals = HostSignals::new();
        signals.publish_key(KeySym::Character('a'));
        assert_eq!(signals.last_key(), KeySym::Character('a'));
        signals.publish_key(KeySym::Escape);
        assert_eq!(signals.last_key(), KeySym::Escape);
    }

    #[test]
    fn signals_cross_threads() {
        let signals = Arc::new(HostSignals::new());
        let publisher = Arc::clone(&signals);

        let handle = std::thread::spawn(move || {
            publisher.publish_key(KeySym::Tab);
            publisher.request_exit();
        });
        handle.join().unwrap();

        assert!(signals.exit_requested());
        assert_eq!(signals.last_key(), KeySym::Tab);
    }
}
