//! Wall-clock interval measurement.
use std::time::{Duration, Instant};

use log::trace;

/// Measures the wall-clock time between a start and a stop mark.
///
/// Reading the elapsed time before both marks are set yields a zero duration, as does a
/// stop mark taken before the start mark.
#[derive(Debug, Clone, Copy, Default)]
pub struct StopWatch {
    start_time: Option<Instant>,
    end_time: Option<Instant>,
}

impl StopWatch {
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a stopwatch whose start mark is set to now.
    pub fn started() -> Self {
        let mut sw = Self::new();
        sw.start();
        sw
    }

    pub fn start(&mut self) {
        self.start_time = Some(Instant::now());
    }

    pub fn stop(&mut self) {
        self.end_time = Some(Instant::now());
        trace!("Stopwatch stopped after {} us", self.elapsed_us());
    }

    pub fn elapsed(&self) -> Duration {
        match (self.start_time, self.end_time) {
            (Some(start), Some(end)) => end.saturating_duration_since(start),
            _ => Duration::ZERO,
        }
    }

    /// Elapsed time truncated to whole microseconds.
    pub fn elapsed_us(&self) -> u128 {
        self.elapsed().as_micros()
    }

    /// Elapsed time truncated to whole milliseconds.
    pub fn elapsed_ms(&self) -> u128 {
        self.elapsed().as_millis()
    }

    /// Elapsed time truncated to whole seconds.
    pub fn elapsed_s(&self) -> u64 {
        self.elapsed().as_secs()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn unset_marks_read_as_zero() {
        let mut sw = StopWatch::new();
        assert_eq!(sw.elapsed(), Duration::ZERO);
        sw.start();
        assert_eq!(sw.elapsed_us(), 0);
    }

    #[test]
    fn measures_an_interval() {
        let mut sw = StopWatch::started();
        std::thread::sleep(Duration::from_millis(5));
        sw.stop();
        assert!(sw.elapsed_ms() >= 5);
        assert!(sw.elapsed_us() >= 5_000);
        assert_eq!(sw.elapsed_s(), sw.elapsed().as_secs());
    }

    #[test]
    fn stop_before_start_saturates() {
        let mut sw = StopWatch::new();
        sw.stop();
        std::thread::sleep(Duration::from_millis(1));
        sw.start();
        assert_eq!(sw.elapsed(), Duration::ZERO);
    }

    #[test]
    fn restart_overwrites_the_start_mark() {
        let mut sw = StopWatch::started();
        std::thread::sleep(Duration::from_millis(20));
        sw.start();
        sw.stop();
        assert!(sw.elapsed_ms() < 20);
    }
}
