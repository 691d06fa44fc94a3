//! Time management utilities

use std::time::Instant;

/// High-precision timer for tick timing
///
/// Call [`Timer::update`] once per simulation tick; the timer tracks the
/// elapsed time of the last tick and aggregate throughput.
pub struct Timer {
    last_tick: Instant,
    delta_time: f32,
    total_time: f32,
    tick_count: u64,
}

impl Default for Timer {
    fn default() -> Self {
        Self::new()
    }
}

impl Timer {
    /// Create a new timer
    pub fn new() -> Self {
        Self {
            last_tick: Instant::now(),
            delta_time: 0.0,
            total_time: 0.0,
            tick_count: 0,
        }
    }

    /// Update the timer (should be called once per tick)
    pub fn update(&mut self) {
        let now = Instant::now();
        let elapsed = now.duration_since(self.last_tick);
        self.delta_time = elapsed.as_secs_f32();
        self.total_time += self.delta_time;
        self.last_tick = now;
        self.tick_count += 1;
    }

    /// Get the wall-clock time spent in the last tick, in seconds
    pub fn delta_time(&self) -> f32 {
        self.delta_time
    }

    /// Get the total elapsed time since timer creation
    pub fn total_time(&self) -> f32 {
        self.total_time
    }

    /// Get the number of ticks recorded so far
    pub fn tick_count(&self) -> u64 {
        self.tick_count
    }

    /// Get the average tick rate since timer creation
    pub fn average_tick_rate(&self) -> f32 {
        if self.total_time > 0.0 {
            self.tick_count as f32 / self.total_time
        } else {
            0.0
        }
    }
}
