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

//! The watch supervisor: a fixed-capacity table of recursive watches
//! drained by non-blocking polls from the host loop.

use super::{RelaunchRequest, WatchError, WatchEvent};
use crossbeam_channel::Receiver;
use notify::{RecommendedWatcher, RecursiveMode, Watcher};
use std::path::{Path, PathBuf};

/// Capacity of the watch table.
pub const MAX_WATCHES: usize = 16;

/// Identifier of one registered watch.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct WatchId(u32);

/// One registered watch.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WatchEntry {
    /// The watched directory root.
    pub path: PathBuf,
    /// The identifier handed back by [`WatchSupervisor::add_watch`].
    pub id: WatchId,
}

/// Owns the native watcher and the table of registered watches.
///
/// The native backend delivers notifications on its own thread into a
/// channel; [`poll`](WatchSupervisor::poll) drains whatever has accumulated
/// without ever blocking the host loop.
pub struct WatchSupervisor {
    watcher: RecommendedWatcher,
    events: Receiver<notify::Result<notify::Event>>,
    entries: Vec<WatchEntry>,
    suffixes: Vec<String>,
    next_id: u32,
}

impl WatchSupervisor {
    /// Creates the supervisor with no watches registered. `suffixes` is the
    /// set of file-name endings that qualify a change as a trigger.
    pub fn new(suffixes: Vec<String>) -> Result<Self, WatchError> {
        let (tx, events) = crossbeam_channel::unbounded();
        let watcher = notify::recommended_watcher(tx)?;
        Ok(Self {
            watcher,
            events,
            entries: Vec::new(),
            suffixes,
            next_id: 0,
        })
    }

    /// Registers a recursive watch on `path`.
    ///
    /// A path that cannot be watched is logged and NOT added; the
    /// supervisor keeps running with the watches it already has. A full
    /// table is likewise an error, not a panic.
    pub fn add_watch(&mut self, path: &Path) -> Result<WatchId, WatchError> {
        if self.entries.len() >= MAX_WATCHES {
            log::error!(
                "Cannot watch '{}': the watch table is full ({MAX_WATCHES} watches)",
                path.display()
            );
            return Err(WatchError::CapacityExhausted { limit: MAX_WATCHES });
        }

        if let Err(e) = self.watcher.watch(path, RecursiveMode::Recursive) {
            log::error!("Could not watch '{}': {e}", path.display());
            return Err(WatchError::Register {
                path: path.to_path_buf(),
                source: e,
            });
        }

        let id = WatchId(self.next_id);
        self.next_id += 1;
        self.entries.push(WatchEntry {
            path: path.to_path_buf(),
            id,
        });
        log::debug!("Watching '{}' recursively", path.display());
        Ok(id)
    }

    /// Drains every notification that has accumulated since the last poll
    /// and applies the trigger rule to the batch. Never blocks.
    pub fn poll(&mut self) -> RelaunchRequest {
        let mut batch = Vec::new();
        while let Ok(result) = self.events.try_recv() {
            match result {
                Ok(event) => {
                    for classified in WatchEvent::from_notify(&event) {
                        log::trace!(
                            "Watch event {:?} on '{}'",
                            classified.mask,
                            classified.path.display()
                        );
                        batch.push(classified);
                    }
                }
                Err(e) => log::warn!("Filesystem watcher reported an error: {e}"),
            }
        }
        RelaunchRequest::evaluate(&batch, &self.suffixes)
    }

    /// The currently registered watches.
    pub fn watches(&self) -> &[WatchEntry] {
        &self.entries
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn starts_with_an_empty_table() {
        let supervisor = WatchSupervisor::new(vec![".rs".to_string()]).unwrap();
        assert!(supervisor.watches().is_empty());
    }

    #[test]
    fn empty_poll_requests_nothing() {
        let mut supervisor = WatchSupervisor::new(vec![".rs".to_string()]).unwrap();
        assert_eq!(supervisor.poll(), RelaunchRequest::None);
    }
}
