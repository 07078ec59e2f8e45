//! Wall-clock sources for the frame loop.

use std::time::Instant;

/// Supplies the timestamp (seconds) handed to each frame.
pub trait Clock {
    fn now(&mut self) -> f64;
}

/// Real time since the clock was created.
#[derive(Debug, Clone)]
pub struct SystemClock {
    origin: Instant,
}

impl SystemClock {
    pub fn new() -> Self {
        Self {
            origin: Instant::now(),
        }
    }
}

impl Default for SystemClock {
    fn default() -> Self {
        Self::new()
    }
}

impl Clock for SystemClock {
    fn now(&mut self) -> f64 {
        self.origin.elapsed().as_secs_f64()
    }
}

/// Deterministic clock: each reading is `interval` later than the last.
///
/// The first reading returns `start`.
#[derive(Debug, Clone)]
pub struct SteppedClock {
    next: f64,
    interval: f64,
}

impl SteppedClock {
    pub fn new(start: f64, interval: f64) -> Self {
        Self {
            next: start,
            interval,
        }
    }

    /// A clock ticking at `fps` frames per second from zero.
    pub fn at_fps(fps: f64) -> Self {
        Self::new(0.0, if fps > 0.0 { 1.0 / fps } else { 0.0 })
    }

    /// Skip ahead without producing a reading, e.g. to simulate a stall.
    pub fn skip(&mut self, seconds: f64) {
        self.next += seconds;
    }
}

impl Clock for SteppedClock {
    fn now(&mut self) -> f64 {
        let now = self.next;
        self.next += self.interval;
        now
    }
}
