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

//! Watch supervisor tests against the real filesystem backend.

use hearth_io::watch::MAX_WATCHES;
use hearth_io::{RelaunchRequest, WatchError, WatchSupervisor};
use std::thread;
use std::time::{Duration, Instant};

fn rs_suffix() -> Vec<String> {
    vec![".rs".to_string()]
}

/// Polls until a trigger lands or the deadline passes.
fn poll_until_trigger(supervisor: &mut WatchSupervisor, deadline: Duration) -> RelaunchRequest {
    let started = Instant::now();
    while started.elapsed() < deadline {
        if supervisor.poll() == RelaunchRequest::Trigger {
            return RelaunchRequest::Trigger;
        }
        thread::sleep(Duration::from_millis(50));
    }
    RelaunchRequest::None
}

#[test]
fn missing_path_is_rejected_and_not_registered() {
    let mut supervisor = WatchSupervisor::new(rs_suffix()).unwrap();
    let missing = std::env::temp_dir().join(format!("hearth-watch-missing-{}", std::process::id()));

    let result = supervisor.add_watch(&missing);
    assert!(matches!(result, Err(WatchError::Register { .. })));
    assert!(supervisor.watches().is_empty());
}

#[test]
fn writing_a_source_file_triggers_a_relaunch_request() {
    let dir = tempfile::tempdir().unwrap();
    let mut supervisor = WatchSupervisor::new(rs_suffix()).unwrap();
    supervisor.add_watch(dir.path()).unwrap();
    assert_eq!(supervisor.watches().len(), 1);

    std::fs::write(dir.path().join("main.rs"), "fn main() {}\n").unwrap();

    assert_eq!(
        poll_until_trigger(&mut supervisor, Duration::from_secs(5)),
        RelaunchRequest::Trigger
    );
}

#[test]
fn writing_a_non_source_file_does_not_trigger() {
    let dir = tempfile::tempdir().unwrap();
    let mut supervisor = WatchSupervisor::new(rs_suffix()).unwrap();
    supervisor.add_watch(dir.path()).unwrap();

    std::fs::write(dir.path().join("notes.txt"), "nothing to rebuild\n").unwrap();

    assert_eq!(
        poll_until_trigger(&mut supervisor, Duration::from_millis(500)),
        RelaunchRequest::None
    );
}

#[test]
fn nested_writes_are_seen_through_a_recursive_watch() {
    let dir = tempfile::tempdir().unwrap();
    let nested = dir.path().join("src").join("deep");
    std::fs::create_dir_all(&nested).unwrap();

    let mut supervisor = WatchSupervisor::new(rs_suffix()).unwrap();
    supervisor.add_watch(dir.path()).unwrap();

    std::fs::write(nested.join("module.rs"), "pub fn answer() -> u32 { 42 }\n").unwrap();

    assert_eq!(
        poll_until_trigger(&mut supervisor, Duration::from_secs(5)),
        RelaunchRequest::Trigger
    );
}

#[test]
fn the_watch_table_has_a_hard_capacity() {
    let dir = tempfile::tempdir().unwrap();
    let mut supervisor = WatchSupervisor::new(rs_suffix()).unwrap();

    for i in 0..MAX_WATCHES {
        let sub = dir.path().join(format!("watch-{i}"));
        std::fs::create_dir(&sub).unwrap();
        supervisor.add_watch(&sub).unwrap();
    }
    assert_eq!(supervisor.watches().len(), MAX_WATCHES);

    let overflow = dir.path().join("one-too-many");
    std::fs::create_dir(&overflow).unwrap();
    assert!(matches!(
        supervisor.add_watch(&overflow),
        Err(WatchError::CapacityExhausted { limit }) if limit == MAX_WATCHES
    ));
    assert_eq!(supervisor.watches().len(), MAX_WATCHES);
}
