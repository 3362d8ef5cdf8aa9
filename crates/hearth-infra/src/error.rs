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

//! Errors raised while bringing up the platform layer.

use std::fmt;
use std::io;

/// Failures from the event thread and the native windowing backend.
#[derive(Debug)]
pub enum PlatformError {
    /// The dedicated event thread could not be spawned.
    Thread(io::Error),
    /// The native event loop could not be built or run.
    EventLoop(String),
    /// The native window could not be created.
    WindowCreation(String),
    /// The event thread went away before handing the window back.
    Disconnected,
}

impl fmt::Display for PlatformError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PlatformError::Thread(e) => {
                write!(f, "Failed to spawn the event thread: {e}")
            }
            PlatformError::EventLoop(msg) => {
                write!(f, "Native event loop failure: {msg}")
            }
            PlatformError::WindowCreation(msg) => {
                write!(f, "Failed to create the native window: {msg}")
            }
            PlatformError::Disconnected => {
                write!(f, "The event thread terminated before the window was ready")
            }
        }
    }
}

impl std::error::Error for PlatformError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            PlatformError::Thread(e) => Some(e),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn display_is_descriptive() {
        assert_eq!(
            PlatformError::WindowCreation("no display".to_string()).to_string(),
            "Failed to create the native window: no display"
        );
        assert_eq!(
            PlatformError::Disconnected.to_string(),
            "The event thread terminated before the window was ready"
        );
    }

    #[test]
    fn thread_failures_keep_their_source() {
        use std::error::Error;

        let error = PlatformError::Thread(io::Error::new(io::ErrorKind::Other, "oom"));
        assert!(error.source().is_some());
        assert!(PlatformError::Disconnected.source().is_none());
    }
}
