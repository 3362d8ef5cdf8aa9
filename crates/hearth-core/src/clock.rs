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

//! Frame pacing and per-frame timing.
//!
//! [`FrameClock`] paces the host loop to a frame-rate cap and hands back a
//! [`FrameTiming`] snapshot for each frame. Pacing spins in short sleeps
//! rather than one long sleep, which keeps the wake-up error well under a
//! millisecond on the platforms the host targets.

use crate::utils::timer::Stopwatch;
use std::thread;
use std::time::Duration;

/// Lowest accepted frame-rate cap.
pub const MIN_MAX_FPS: u32 = 10;
/// Highest accepted frame-rate cap.
pub const MAX_MAX_FPS: u32 = 1000;
/// Shortest frame time a snapshot will report, in seconds.
pub const MIN_FRAME_TIME: f64 = 0.0001;
/// Longest frame time a snapshot will report, in seconds. A stall longer
/// than this shows up as a 100 ms frame so simulation steps stay bounded.
pub const MAX_FRAME_TIME: f64 = 0.1;

/// Sleep quantum used while waiting out the remainder of a frame budget.
const PACE_QUANTUM: Duration = Duration::from_micros(100);

/// Timing snapshot for one frame.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FrameTiming {
    /// Duration of the finished frame in seconds, clamped to
    /// [`MIN_FRAME_TIME`]..=[`MAX_FRAME_TIME`].
    pub frame_time: f64,
    /// Sum of all clamped frame times since the clock was created.
    pub elapsed: f64,
    /// Number of completed frames.
    pub frame_index: u64,
    /// Smoothed-over-nothing rate estimate, `1.0 / frame_time`.
    pub fps: f64,
}

/// Paces the host loop and accounts frame time.
///
/// One [`advance_frame`](FrameClock::advance_frame) call per loop iteration:
/// it blocks until the current frame's budget has elapsed, then closes the
/// frame and returns its timing.
#[derive(Debug)]
pub struct FrameClock {
    epoch: Stopwatch,
    real_time: f64,
    frame_start: f64,
    elapsed: f64,
    frame_time: f64,
    frame_index: u64,
    max_fps: u32,
}

impl FrameClock {
    /// Creates a clock capped at `max_fps`. Out-of-range caps are accepted
    /// here and clamped on the next [`advance_frame`](FrameClock::advance_frame).
    pub fn new(max_fps: u32) -> Self {
        Self {
            epoch: Stopwatch::new(),
            real_time: 0.0,
            frame_start: 0.0,
            elapsed: 0.0,
            frame_time: MIN_FRAME_TIME,
            frame_index: 0,
            max_fps,
        }
    }

    /// Waits out the rest of the current frame's budget, then closes the
    /// frame and returns its timing.
    ///
    /// The cap is re-clamped to [`MIN_MAX_FPS`]..=[`MAX_MAX_FPS`] on every
    /// call, so a cap changed at runtime can never divide by zero or pace
    /// the loop into the ground.
    pub fn advance_frame(&mut self) -> FrameTiming {
        self.max_fps = self.max_fps.clamp(MIN_MAX_FPS, MAX_MAX_FPS);
        let budget = 1.0 / f64::from(self.max_fps);

        self.real_time = self.epoch.elapsed_secs_f64();
        while self.real_time - self.frame_start < budget {
            thread::sleep(PACE_QUANTUM);
            self.real_time = self.epoch.elapsed_secs_f64();
        }

        let span = self.real_time - self.frame_start;
        self.frame_time = span.clamp(MIN_FRAME_TIME, MAX_FRAME_TIME);
        self.elapsed += self.frame_time;
        self.frame_start = self.real_time;
        self.frame_index += 1;

        FrameTiming {
            frame_time: self.frame_time,
            elapsed: self.elapsed,
            frame_index: self.frame_index,
            fps: 1.0 / self.frame_time,
        }
    }

    /// Replaces the frame-rate cap. Takes effect on the next
    /// [`advance_frame`](FrameClock::advance_frame), which clamps it.
    pub fn set_max_fps(&mut self, max_fps: u32) {
        self.max_fps = max_fps;
    }

    /// The frame-rate cap as of the last clamp.
    pub fn max_fps(&self) -> u32 {
        self.max_fps
    }

    /// Clamped duration of the last finished frame, in seconds.
    pub fn frame_time(&self) -> f64 {
        self.frame_time
    }

    /// Number of completed frames.
    pub fn frame_index(&self) -> u64 {
        self.frame_index
    }

    /// Rate estimate derived from the last frame time.
    pub fn fps(&self) -> f64 {
        1.0 / self.frame_time
    }
}
