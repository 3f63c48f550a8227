use tracing::debug;

use crate::error::Result;

/// Maximum tolerated drift in seconds between the authoritative clock and
/// the audio element before it is reseeked. Frequent micro-seeks stutter.
pub const AUDIO_DRIFT_THRESHOLD: f64 = 0.1;

/// Separately-sourced audio element kept in sync with the playback clock.
///
/// The engine never owns audio decoding; it only issues transport commands
/// through this seam and resynchronizes on drift.
pub trait AudioTrack {
    fn play(&mut self) -> Result<()>;
    fn pause(&mut self);
    fn seek(&mut self, time: f64);
    fn current_time(&self) -> f64;
}

/// Reseeks the track only when its drift from `target` exceeds the
/// threshold.
pub fn resync(track: &mut dyn AudioTrack, target: f64) {
    let drift = (track.current_time() - target).abs();
    if drift > AUDIO_DRIFT_THRESHOLD {
        debug!(drift, target, "audio drift over threshold, reseeking");
        track.seek(target);
    }
}

#[cfg(test)]
mod tests {
    use super::{AudioTrack, resync};
    use crate::error::Result;

    struct FakeTrack {
        time: f64,
        seeks: Vec<f64>,
    }

    impl AudioTrack for FakeTrack {
        fn play(&mut self) -> Result<()> {
            Ok(())
        }

        fn pause(&mut self) {}

        fn seek(&mut self, time: f64) {
            self.time = time;
            self.seeks.push(time);
        }

        fn current_time(&self) -> f64 {
            self.time
        }
    }

    #[test]
    fn small_drift_is_left_alone() {
        let mut track = FakeTrack {
            time: 5.05,
            seeks: Vec::new(),
        };
        resync(&mut track, 5.0);
        assert!(track.seeks.is_empty());
    }

    #[test]
    fn large_drift_triggers_a_single_seek() {
        let mut track = FakeTrack {
            time: 5.4,
            seeks: Vec::new(),
        };
        resync(&mut track, 5.0);
        assert_eq!(track.seeks, vec![5.0]);
    }
}
