use std::time::Instant;

/// Measures the time between consecutive frames.
#[derive(Debug, Default)]
pub struct FrameClock {
    last_tick: Option<Instant>,
    frame_count: u64,
}

impl FrameClock {
    pub fn new() -> Self {
        FrameClock::default()
    }

    /// Advances the clock and returns the seconds elapsed since the previous tick.
    pub fn tick(&mut self) -> f64 {
        self.tick_at(Instant::now())
    }

    /// The first tick always reports zero.
    pub fn tick_at(&mut self, now: Instant) -> f64 {
        let delta = self
            .last_tick
            .map(|last| now.saturating_duration_since(last).as_secs_f64())
            .unwrap_or(0.0);
        self.last_tick = Some(now);
        self.frame_count += 1;
        delta
    }

    /// Forgets the previous tick, so the next tick reports zero again.
    pub fn pause(&mut self) {
        self.last_tick = None;
    }

    pub fn frame_count(&self) -> u64 {
        self.frame_count
    }
}

#[cfg(test)]
mod tests {
    use std::time::Duration;

    use super::*;

    #[test]
    fn first_tick_is_zero() {
        let mut clock = FrameClock::new();
        assert_eq!(clock.tick_at(Instant::now()), 0.0);
        assert_eq!(clock.frame_count(), 1);
    }

    #[test]
    fn reports_elapsed_seconds_between_ticks() {
        let mut clock = FrameClock::new();
        let start = Instant::now();
        clock.tick_at(start);
        let dt = clock.tick_at(start + Duration::from_millis(16));
        assert!((dt - 0.016).abs() < 1e-9);
        assert_eq!(clock.frame_count(), 2);
    }

    #[test]
    fn pause_discards_elapsed_time() {
        let mut clock = FrameClock::new();
        let start = Instant::now();
        clock.tick_at(start);
        clock.pause();
        assert_eq!(clock.tick_at(start + Duration::from_secs(30)), 0.0);
        assert_eq!(clock.frame_count(), 2);
    }

    #[test]
    fn going_backwards_clamps_to_zero() {
        let mut clock = FrameClock::new();
        let start = Instant::now() + Duration::from_secs(1);
        clock.tick_at(start);
        assert_eq!(clock.tick_at(start - Duration::from_millis(5)), 0.0);
    }
}
