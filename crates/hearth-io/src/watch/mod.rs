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

//! Filesystem change classification.
//!
//! Native backends report changes in wildly different vocabularies; this
//! module maps them onto a small mask so the trigger rule can stay the same
//! on every platform. The rule itself lives in [`RelaunchRequest::evaluate`].

mod supervisor;

pub use supervisor::{WatchEntry, WatchId, WatchSupervisor, MAX_WATCHES};

use notify::event::{AccessKind, AccessMode, EventKind, ModifyKind, RenameMode};
use std::path::{Path, PathBuf};
use thiserror::Error;

/// Flags classifying what happened to a watched path.
///
/// Multiple kinds can be combined using bitwise operations.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct WatchMask {
    bits: u32,
}

impl WatchMask {
    /// Nothing of interest.
    pub const NONE: Self = Self { bits: 0 };
    /// A file opened for writing was closed, or its data changed on a
    /// backend that cannot report the close itself.
    pub const WRITE_CLOSE: Self = Self { bits: 1 << 0 };
    /// A file or directory was created.
    pub const CREATE: Self = Self { bits: 1 << 1 };
    /// A file was renamed into a watched directory.
    pub const MOVED_TO: Self = Self { bits: 1 << 2 };
    /// A file was renamed out of a watched directory.
    pub const MOVED_FROM: Self = Self { bits: 1 << 3 };
    /// A file or directory was removed.
    pub const REMOVE: Self = Self { bits: 1 << 4 };

    /// Creates a mask from raw bits.
    pub const fn from_bits(bits: u32) -> Self {
        Self { bits }
    }

    /// Returns the raw bits.
    pub const fn bits(&self) -> u32 {
        self.bits
    }

    /// Combines two masks.
    pub const fn union(self, other: Self) -> Self {
        Self {
            bits: self.bits | other.bits,
        }
    }

    /// Checks if this mask contains every bit of `other`.
    pub const fn contains(&self, other: Self) -> bool {
        (self.bits & other.bits) == other.bits
    }

    /// Checks if the mask is empty.
    pub const fn is_empty(&self) -> bool {
        self.bits == 0
    }
}

impl std::ops::BitOr for WatchMask {
    type Output = Self;

    fn bitor(self, rhs: Self) -> Self::Output {
        self.union(rhs)
    }
}

impl std::ops::BitOrAssign for WatchMask {
    fn bitor_assign(&mut self, rhs: Self) {
        *self = self.union(rhs);
    }
}

/// One classified filesystem change.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WatchEvent {
    /// The path the change was reported against.
    pub path: PathBuf,
    /// What happened to it.
    pub mask: WatchMask,
}

impl WatchEvent {
    /// Expands a native notification into one classified event per path.
    pub fn from_notify(event: &notify::Event) -> Vec<WatchEvent> {
        let mask = map_kind(&event.kind);
        event
            .paths
            .iter()
            .map(|path| WatchEvent {
                path: path.clone(),
                mask,
            })
            .collect()
    }
}

/// Maps a native event kind onto the mask.
///
/// `WRITE_CLOSE` deliberately covers plain data modifications as well:
/// inotify reports close-after-write, but FSEvents and the Windows watcher
/// only report that the contents changed.
fn map_kind(kind: &EventKind) -> WatchMask {
    match kind {
        EventKind::Access(AccessKind::Close(AccessMode::Write)) => WatchMask::WRITE_CLOSE,
        EventKind::Modify(ModifyKind::Data(_)) | EventKind::Modify(ModifyKind::Any) => {
            WatchMask::WRITE_CLOSE
        }
        EventKind::Modify(ModifyKind::Name(RenameMode::To)) => WatchMask::MOVED_TO,
        EventKind::Modify(ModifyKind::Name(RenameMode::From)) => WatchMask::MOVED_FROM,
        EventKind::Modify(ModifyKind::Name(_)) => WatchMask::MOVED_TO | WatchMask::MOVED_FROM,
        EventKind::Create(_) => WatchMask::CREATE,
        EventKind::Remove(_) => WatchMask::REMOVE,
        _ => WatchMask::NONE,
    }
}

/// Outcome of one watch poll.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RelaunchRequest {
    /// Nothing qualifying changed.
    None,
    /// At least one qualifying change landed; recompile and relaunch.
    /// Any number of changes in one poll collapse into a single trigger.
    Trigger,
}

impl RelaunchRequest {
    /// Applies the trigger rule to a batch of classified events.
    ///
    /// A change qualifies when a written file's name carries one of the
    /// configured suffixes. Paths with a `target` component are ignored so
    /// the compile step's own output can never re-trigger a relaunch.
    pub fn evaluate(events: &[WatchEvent], suffixes: &[String]) -> Self {
        for event in events {
            if !event.mask.contains(WatchMask::WRITE_CLOSE) {
                continue;
            }
            if is_under_target(&event.path) {
                continue;
            }
            let Some(name) = event.path.file_name().and_then(|n| n.to_str()) else {
                continue;
            };
            if suffixes.iter().any(|suffix| name.ends_with(suffix.as_str())) {
                return RelaunchRequest::Trigger;
            }
        }
        RelaunchRequest::None
    }
}

fn is_under_target(path: &Path) -> bool {
    path.components().any(|c| c.as_os_str() == "target")
}

/// Errors surfaced by the watch supervisor.
#[derive(Debug, Error)]
pub enum WatchError {
    /// The native watcher itself could not be created.
    #[error("failed to initialize the filesystem watcher: {0}")]
    Init(#[from] notify::Error),

    /// A single path could not be registered. The supervisor keeps running
    /// with the watches it already has.
    #[error("failed to register watch on '{path}': {source}")]
    Register {
        /// The path that could not be watched.
        path: PathBuf,
        /// The native error.
        source: notify::Error,
    },

    /// The fixed watch table is full.
    #[error("watch capacity exhausted ({limit} watches)")]
    CapacityExhausted {
        /// The table's capacity.
        limit: usize,
    },
}

#[cfg(test)]
mod tests {
    use super::*;

    fn event(path: &str, mask: WatchMask) -> WatchEvent {
        WatchEvent {
            path: PathBuf::from(path),
            mask,
        }
    }

    fn rs_suffix() -> Vec<String> {
        vec![".rs".to_string()]
    }

    #[test]
    fn mask_bit_operations() {
        let mask = WatchMask::WRITE_CLOSE | WatchMask::CREATE;
        assert!(mask.contains(WatchMask::WRITE_CLOSE));
        assert!(mask.contains(WatchMask::CREATE));
        assert!(!mask.contains(WatchMask::REMOVE));
        assert!(!mask.is_empty());
        assert!(WatchMask::NONE.is_empty());
        assert_eq!(WatchMask::from_bits(mask.bits()), mask);

        let mut accumulated = WatchMask::NONE;
        accumulated |= WatchMask::MOVED_TO;
        accumulated |= WatchMask::MOVED_FROM;
        assert!(accumulated.contains(WatchMask::MOVED_TO | WatchMask::MOVED_FROM));
    }

    #[test]
    fn write_close_kinds_map_to_the_same_bit() {
        use notify::event::{DataChange, MetadataKind};

        assert_eq!(
            map_kind(&EventKind::Access(AccessKind::Close(AccessMode::Write))),
            WatchMask::WRITE_CLOSE
        );
        assert_eq!(
            map_kind(&EventKind::Modify(ModifyKind::Data(DataChange::Content))),
            WatchMask::WRITE_CLOSE
        );
        assert_eq!(
            map_kind(&EventKind::Modify(ModifyKind::Any)),
            WatchMask::WRITE_CLOSE
        );
        assert_eq!(
            map_kind(&EventKind::Modify(ModifyKind::Metadata(MetadataKind::Any))),
            WatchMask::NONE
        );
    }

    #[test]
    fn qualifying_write_triggers() {
        let events = [event("src/main.rs", WatchMask::WRITE_CLOSE)];
        assert_eq!(
            RelaunchRequest::evaluate(&events, &rs_suffix()),
            RelaunchRequest::Trigger
        );
    }

    #[test]
    fn non_matching_suffix_never_triggers() {
        let events = [
            event("src/notes.txt", WatchMask::WRITE_CLOSE),
            event("assets/shader.wgsl", WatchMask::WRITE_CLOSE),
        ];
        assert_eq!(
            RelaunchRequest::evaluate(&events, &rs_suffix()),
            RelaunchRequest::None
        );
    }

    #[test]
    fn non_write_changes_never_trigger() {
        let events = [
            event("src/new_module.rs", WatchMask::CREATE),
            event("src/old_module.rs", WatchMask::REMOVE),
            event("src/renamed.rs", WatchMask::MOVED_TO),
        ];
        assert_eq!(
            RelaunchRequest::evaluate(&events, &rs_suffix()),
            RelaunchRequest::None
        );
    }

    #[test]
    fn many_qualifying_writes_collapse_into_one_trigger() {
        let events = [
            event("src/main.rs", WatchMask::WRITE_CLOSE),
            event("src/lib.rs", WatchMask::WRITE_CLOSE),
            event("src/clock.rs", WatchMask::WRITE_CLOSE),
        ];
        assert_eq!(
            RelaunchRequest::evaluate(&events, &rs_suffix()),
            RelaunchRequest::Trigger
        );
    }

    #[test]
    fn compile_output_under_target_is_ignored() {
        let events = [event(
            "target/debug/build/generated.rs",
            WatchMask::WRITE_CLOSE,
        )];
        assert_eq!(
            RelaunchRequest::evaluate(&events, &rs_suffix()),
            RelaunchRequest::None
        );
    }

    #[test]
    fn empty_batch_requests_nothing() {
        assert_eq!(
            RelaunchRequest::evaluate(&[], &rs_suffix()),
            RelaunchRequest::None
        );
    }
}
