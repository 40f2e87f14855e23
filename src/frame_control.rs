use crate::input::InputSnapshot;
use log::{debug, trace};
use std::time::{Duration, Instant};

/// Monotonic time source
pub trait Clock {
    /// Time since some fixed point in the past
    fn now(&self) -> Duration;
}

/// `Clock` backed by `std::time::Instant`
pub struct SystemClock {
    start: Instant,
}

impl Default for SystemClock {
    fn default() -> Self {
        Self::new()
    }
}

impl SystemClock {
    #[must_use]
    pub fn new() -> Self {
        Self {
            start: Instant::now(),
        }
    }
}

impl Clock for SystemClock {
    fn now(&self) -> Duration {
        self.start.elapsed()
    }
}

/// Turns clock readings into per-frame deltas. Long gaps, such as the window
/// being dragged, are clamped to `max_dt` so the character doesn't jump.
pub struct FrameTimer {
    previous: Option<Duration>,
    max_dt: f32,
    frame_count: u64,
}

impl FrameTimer {
    #[must_use]
    pub fn new(max_dt: f32) -> Self {
        debug!("FrameTimer max_dt={}", max_dt);
        Self {
            previous: None,
            max_dt: max_dt.max(0.0),
            frame_count: 0,
        }
    }

    /// Seconds since the previous call. The first call returns 0.
    pub fn next_dt(&mut self, clock: &impl Clock) -> f32 {
        let now = clock.now();
        let dt = self
            .previous
            .map_or(0.0, |p| now.saturating_sub(p).as_secs_f32());
        self.previous = Some(now);
        self.frame_count += 1;
        let dt = dt.min(self.max_dt);
        trace!("next_dt frame={} dt={}", self.frame_count, dt);
        dt
    }

    /// Builds the context for the next frame
    pub fn next_frame(
        &mut self,
        clock: &impl Clock,
        input: InputSnapshot,
    ) -> FrameContext {
        let dt = self.next_dt(clock);
        FrameContext {
            dt,
            input,
            frame: self.frame_count,
        }
    }

    #[must_use]
    pub const fn frame_count(&self) -> u64 {
        self.frame_count
    }
}

/// Everything a component may read while updating one frame
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct FrameContext {
    /// Seconds
    pub dt: f32,
    pub input: InputSnapshot,
    pub frame: u64,
}

impl FrameContext {
    /// Context with a fixed time step, mainly for tests and replays
    #[must_use]
    pub const fn new(dt: f32, input: InputSnapshot) -> Self {
        Self {
            dt,
            input,
            frame: 0,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::{Clock, FrameTimer};
    use std::{cell::Cell, time::Duration};

    struct FakeClock(Cell<Duration>);

    impl Clock for FakeClock {
        fn now(&self) -> Duration {
            self.0.get()
        }
    }

    #[test]
    fn deltas_follow_clock() {
        let clock = FakeClock(Cell::new(Duration::from_millis(500)));
        let mut timer = FrameTimer::new(0.25);
        assert!(timer.next_dt(&clock).abs() < f32::EPSILON);
        clock.0.set(Duration::from_millis(600));
        assert!((timer.next_dt(&clock) - 0.1).abs() < 0.0001);
        assert_eq!(timer.frame_count(), 2);
    }

    #[test]
    fn long_gaps_are_clamped() {
        let clock = FakeClock(Cell::new(Duration::ZERO));
        let mut timer = FrameTimer::new(0.25);
        let _ = timer.next_dt(&clock);
        clock.0.set(Duration::from_secs(3));
        assert!((timer.next_dt(&clock) - 0.25).abs() < f32::EPSILON);
    }
}
