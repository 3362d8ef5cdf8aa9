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

//! A monotonic stopwatch for elapsed-time measurement.

use std::time::{Duration, Instant};

/// Measures elapsed time from creation or the last restart.
///
/// Backed by [`Instant`], so it never goes backwards and is unaffected by
/// wall-clock adjustments.
#[derive(Debug, Clone)]
pub struct Stopwatch {
    start_time: Instant,
}

impl Stopwatch {
    /// Creates a new stopwatch and starts it immediately.
    #[inline]
    pub fn new() -> Self {
        Self {
            start_time: Instant::now(),
        }
    }

    /// Moves the start point to now.
    #[inline]
    pub fn restart(&mut self) {
        self.start_time = Instant::now();
    }

    /// Returns the elapsed time since the stopwatch was started.
    #[inline]
    pub fn elapsed(&self) -> Duration {
        self.start_time.elapsed()
    }

    /// Returns the elapsed time in whole milliseconds.
    #[inline]
    pub fn elapsed_ms(&self) -> u64 {
        self.elapsed().as_millis() as u64
    }

    /// Returns the elapsed time in seconds as an `f64`.
    #[inline]
    pub fn elapsed_secs_f64(&self) -> f64 {
        self.elapsed().as_secs_f64()
    }
}

impl Default for Stopwatch {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::thread;

    const SMALL_DURATION_MS: u64 = 15;
    const SLEEP_DURATION_MS: u64 = 100;
    const SLEEP_MARGIN_MS: u64 = 200;

    /// A fresh stopwatch should report a near-zero elapsed time.
    #[test]
    fn stopwatch_elapsed_time_near_zero_initially() {
        let watch = Stopwatch::new();
        assert!(
            watch.elapsed() < Duration::from_millis(SMALL_DURATION_MS),
            "Initial elapsed duration ({:?}) should be very small",
            watch.elapsed()
        );
        assert!(
            watch.elapsed_secs_f64() < SMALL_DURATION_MS as f64 / 1000.0,
            "Initial elapsed seconds should be very small"
        );
    }

    /// After sleeping, the elapsed time should land between the sleep
    /// duration and the sleep duration plus a generous scheduler margin.
    #[test]
    fn stopwatch_elapsed_time_after_delay() {
        let watch = Stopwatch::new();
        let sleep_duration = Duration::from_millis(SLEEP_DURATION_MS);
        thread::sleep(sleep_duration);

        let elapsed_ms = watch.elapsed_ms();
        assert!(
            elapsed_ms >= SLEEP_DURATION_MS,
            "Elapsed ms ({elapsed_ms}) should be >= sleep duration ms ({SLEEP_DURATION_MS})"
        );
        assert!(
            elapsed_ms < SLEEP_DURATION_MS + SLEEP_MARGIN_MS,
            "Elapsed ms ({elapsed_ms}) should be < sleep duration ms + margin"
        );
    }

    /// Restarting must reset the elapsed time back to near zero.
    #[test]
    fn stopwatch_restart_resets_elapsed() {
        let mut watch = Stopwatch::new();
        thread::sleep(Duration::from_millis(SLEEP_DURATION_MS));
        watch.restart();
        assert!(
            watch.elapsed() < Duration::from_millis(SMALL_DURATION_MS),
            "Elapsed after restart ({:?}) should be very small",
            watch.elapsed()
        );
    }

    /// A clone shares the original start point.
    #[test]
    fn stopwatch_clone_keeps_start_point() {
        let watch1 = Stopwatch::new();
        thread::sleep(Duration::from_millis(10));
        let watch2 = watch1.clone();

        let difference = watch1.elapsed_ms().abs_diff(watch2.elapsed_ms());
        assert!(
            difference < 50,
            "Elapsed time of clones should be very close (diff: {difference} ms)"
        );
    }
}
