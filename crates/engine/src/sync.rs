use std::time::Instant;

use tracing::debug;

/// Cooperative per-frame loop state.
///
/// The loop itself is driven externally: the UI calls the engine's `tick`
/// from its frame callback while `is_running`. This object owns the
/// scheduling flag, the start-over latch armed when playback hits the trim
/// end, and the wall-clock delta for sources without a native clock.
/// Cancellation is a property of this object, not of UI lifetime: a stopped
/// loop never re-arms itself.
#[derive(Debug, Default)]
pub struct SyncLoop {
    running: bool,
    reset_pending: bool,
    last_tick: Option<Instant>,
}

impl SyncLoop {
    /// Arms the loop. The first delta after a start is zero.
    pub fn start(&mut self) {
        self.running = true;
        self.last_tick = None;
    }

    /// Cancels the loop.
    pub fn stop(&mut self) {
        if self.running {
            debug!("sync loop stopped");
        }
        self.running = false;
        self.last_tick = None;
    }

    pub fn is_running(&self) -> bool {
        self.running
    }

    /// Latches the start-over request consumed by the next play or tick.
    pub fn arm_reset(&mut self) {
        self.reset_pending = true;
    }

    pub fn clear_reset(&mut self) {
        self.reset_pending = false;
    }

    pub fn reset_pending(&self) -> bool {
        self.reset_pending
    }

    /// Takes the reset latch. Also forgets the previous tick instant so the
    /// tick that applied the reset never reads a stale delta back.
    pub fn take_reset(&mut self) -> bool {
        let pending = self.reset_pending;
        self.reset_pending = false;
        if pending {
            self.last_tick = None;
        }
        pending
    }

    /// Wall-clock seconds since the previous tick; zero on the first tick
    /// after a (re)start.
    pub fn delta(&mut self, now: Instant) -> f64 {
        let dt = self
            .last_tick
            .map(|last| now.saturating_duration_since(last).as_secs_f64())
            .unwrap_or(0.0);
        self.last_tick = Some(now);
        dt
    }
}

#[cfg(test)]
mod tests {
    use std::time::{Duration, Instant};

    use super::SyncLoop;

    #[test]
    fn first_delta_after_start_is_zero() {
        let mut sync = SyncLoop::default();
        sync.start();
        let t0 = Instant::now();
        assert_eq!(sync.delta(t0), 0.0);
        let dt = sync.delta(t0 + Duration::from_millis(250));
        assert!((dt - 0.25).abs() < 1e-9);
    }

    #[test]
    fn stop_cancels_and_forgets_the_last_tick() {
        let mut sync = SyncLoop::default();
        sync.start();
        let t0 = Instant::now();
        let _ = sync.delta(t0);
        sync.stop();
        assert!(!sync.is_running());

        sync.start();
        assert_eq!(sync.delta(t0 + Duration::from_secs(5)), 0.0);
    }

    #[test]
    fn take_reset_clears_the_latch_and_defers_the_delta() {
        let mut sync = SyncLoop::default();
        sync.start();
        let t0 = Instant::now();
        let _ = sync.delta(t0);

        sync.arm_reset();
        assert!(sync.take_reset());
        assert!(!sync.take_reset());
        assert_eq!(sync.delta(t0 + Duration::from_secs(1)), 0.0);
    }
}
