/// Stripe animator: steps the tile phase left on a fixed cadence and wraps at half a tile.

use std::time::Duration;

use crate::style::ValidatedStyle;

#[derive(Clone, Debug)]
pub struct StripeAnimator {
    phase: f32,
    step: f32,
    tick_interval: Duration,
    pending: Duration,
    running: bool,
}

impl StripeAnimator {
    pub fn new(tick_interval: Duration, step: f32) -> Self {
        Self {
            phase: 0.0,
            step,
            tick_interval: tick_interval.max(Duration::from_nanos(1)),
            pending: Duration::ZERO,
            running: false,
        }
    }

    pub fn from_style(style: &ValidatedStyle) -> Self {
        Self::new(style.tick_interval(), ValidatedStyle::TICK_STEP_PX)
    }

    pub fn start(&mut self) {
        self.running = true;
        self.pending = Duration::ZERO;
    }

    pub fn stop(&mut self) {
        self.running = false;
        self.pending = Duration::ZERO;
    }

    pub fn is_running(&self) -> bool {
        self.running
    }

    /// Current tile offset, in [-(tile_length / 2), 0].
    pub fn phase(&self) -> f32 {
        self.phase
    }

    pub fn tick_interval(&self) -> Duration {
        self.tick_interval
    }

    /// One step. Returns whether the phase moved (and a redraw is due).
    pub fn tick(&mut self, tile_length: f32) -> bool {
        if !self.running || tile_length <= 0.0 {
            return false;
        }
        if self.phase <= -(tile_length / 2.0) {
            self.phase = 0.0;
        } else {
            self.phase -= self.step;
        }
        true
    }

    /// Run every tick that fits in `elapsed` plus leftover time from earlier calls.
    pub fn advance(&mut self, elapsed: Duration, tile_length: f32) -> bool {
        if !self.running || tile_length <= 0.0 {
            return false;
        }
        self.pending += elapsed;
        let interval = self.tick_interval.as_nanos();
        let due = self.pending.as_nanos() / interval;
        if due == 0 {
            return false;
        }
        self.pending = Duration::from_nanos((self.pending.as_nanos() % interval) as u64);

        // a whole loop is a no-op, so a long stall only runs the remainder
        let ticks = due % self.ticks_per_loop(tile_length);
        for _ in 0..ticks {
            self.tick(tile_length);
        }
        true
    }

    /// Ticks from phase 0 back to phase 0.
    fn ticks_per_loop(&self, tile_length: f32) -> u128 {
        ((tile_length / 2.0) / self.step).ceil() as u128 + 1
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    const INTERVAL: Duration = Duration::from_millis(25);

    fn running() -> StripeAnimator {
        let mut a = StripeAnimator::new(INTERVAL, 1.0);
        a.start();
        a
    }

    #[test]
    fn steps_left_then_wraps_at_half_tile() {
        let mut a = running();
        for expected in 1..=10 {
            assert!(a.tick(20.0));
            assert_relative_eq!(a.phase(), -(expected as f32));
        }
        assert!(a.tick(20.0));
        assert_relative_eq!(a.phase(), 0.0);
    }

    #[test]
    fn stays_within_bounds() {
        let mut a = running();
        for _ in 0..1000 {
            a.tick(37.0);
            assert!(a.phase() <= 0.0 && a.phase() >= -18.5 - 1.0);
        }
    }

    #[test]
    fn stopped_or_unlaid_out_does_nothing() {
        let mut a = StripeAnimator::new(INTERVAL, 1.0);
        assert!(!a.tick(20.0));
        assert!(!a.advance(INTERVAL * 4, 20.0));
        a.start();
        assert!(!a.tick(0.0));
        a.stop();
        assert!(!a.advance(INTERVAL * 4, 20.0));
        assert_relative_eq!(a.phase(), 0.0);
    }

    #[test]
    fn advance_runs_whole_ticks_and_keeps_remainder() {
        let mut a = running();
        assert!(!a.advance(Duration::from_millis(10), 100.0));
        assert!(a.advance(Duration::from_millis(70), 100.0));
        assert_relative_eq!(a.phase(), -3.0);
        assert!(a.advance(Duration::from_millis(20), 100.0));
        assert_relative_eq!(a.phase(), -4.0);
    }

    #[test]
    fn long_stall_lands_on_the_same_phase() {
        let mut stalled = running();
        let mut stepped = running();
        let ticks = 10_000u32;
        stalled.advance(INTERVAL * ticks, 40.0);
        for _ in 0..ticks {
            stepped.tick(40.0);
        }
        assert_relative_eq!(stalled.phase(), stepped.phase());
    }

    #[test]
    fn restart_keeps_phase() {
        let mut a = running();
        a.tick(50.0);
        a.stop();
        assert!(!a.is_running());
        a.start();
        assert!(a.is_running());
        assert_relative_eq!(a.phase(), -1.0);
    }
}
