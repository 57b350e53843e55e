//! Frame timing

use std::collections::VecDeque;
use std::time::{Duration, Instant};

/// Result of a [`Measure`] run
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MeasureReport {
    pub elapsed: Duration,
    pub frames: u64,
    pub fps: f64,
}

/// Counts frames between a start and an end point
pub struct Measure {
    start: Instant,
    frames: u64,
}

impl Measure {
    pub fn start() -> Self {
        Self {
            start: Instant::now(),
            frames: 0,
        }
    }

    #[inline]
    pub fn frame(&mut self) {
        self.frames += 1;
    }

    pub fn frames(&self) -> u64 {
        self.frames
    }

    /// Stop measuring and log elapsed time, frame count and FPS
    pub fn finish(self) -> MeasureReport {
        let elapsed = self.start.elapsed();
        let secs = elapsed.as_secs_f64();
        let fps = if secs > 0.0 {
            self.frames as f64 / secs
        } else {
            0.0
        };
        tracing::info!(
            elapsed_ms = elapsed.as_millis() as u64,
            frames = self.frames,
            fps = fps.round(),
            "measure finished"
        );
        MeasureReport {
            elapsed,
            frames: self.frames,
            fps,
        }
    }
}

/// FPS counter with rolling average
pub struct FpsCounter {
    frame_times: VecDeque<f32>,
    last_frame: Instant,
    sample_count: usize,
}

impl FpsCounter {
    /// Create a new FPS counter with specified sample window
    pub fn new(sample_count: usize) -> Self {
        let sample_count = sample_count.max(1);
        Self {
            frame_times: VecDeque::with_capacity(sample_count),
            last_frame: Instant::now(),
            sample_count,
        }
    }

    /// Call once per frame. Returns (delta_time, average_fps)
    pub fn tick(&mut self) -> (f32, f32) {
        let now = Instant::now();
        let dt = (now - self.last_frame).as_secs_f32();
        self.last_frame = now;
        self.record(dt);
        (dt, self.avg_fps())
    }

    fn record(&mut self, dt: f32) {
        self.frame_times.push_back(dt);
        if self.frame_times.len() > self.sample_count {
            self.frame_times.pop_front();
        }
    }

    fn avg_dt(&self) -> f32 {
        self.frame_times.iter().sum::<f32>() / self.frame_times.len().max(1) as f32
    }

    pub fn avg_fps(&self) -> f32 {
        let avg_dt = self.avg_dt();
        if avg_dt > 0.0 {
            1.0 / avg_dt
        } else {
            0.0
        }
    }

    /// Get the average frame time in milliseconds
    pub fn avg_frame_time_ms(&self) -> f32 {
        self.avg_dt() * 1000.0
    }

    /// Number of samples currently in the window
    pub fn sample_len(&self) -> usize {
        self.frame_times.len()
    }
}
