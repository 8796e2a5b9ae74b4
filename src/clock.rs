use std::time::Instant;

/// Reports the time elapsed between loop iterations.
pub trait Clock {
    /// Seconds since the previous call (or since creation, on the first call).
    fn delta_secs(&mut self) -> f64;
}

/// Monotonic wall-clock source.
#[derive(Debug)]
pub struct SystemClock {
    last: Instant,
}

impl SystemClock {
    pub fn new() -> Self {
        Self { last: Instant::now() }
    }
}

impl Default for SystemClock {
    fn default() -> Self {
        Self::new()
    }
}

impl Clock for SystemClock {
    fn delta_secs(&mut self) -> f64 {
        let now = Instant::now();
        let delta = now.duration_since(self.last);
        self.last = now;
        delta.as_secs_f64()
    }
}
