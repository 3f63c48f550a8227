/// Authoritative playback clock read by every other component.
///
/// `current_time` is the committed position; `visual_time` is what the UI
/// displays. They are equal except while a drag session drives the visual
/// clock from the pointer, and they reconverge the instant that drag ends.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct PlaybackClock {
    pub is_playing: bool,
    pub current_time: f64,
    pub visual_time: f64,
}

impl PlaybackClock {
    /// Writes both clocks at once.
    pub fn set_both(&mut self, time: f64) {
        self.current_time = time;
        self.visual_time = time;
    }

    /// Writes the authoritative time, mirroring into the visual clock unless
    /// a drag session currently owns it.
    pub fn advance_to(&mut self, time: f64, drag_owns_visual: bool) {
        self.current_time = time;
        if !drag_owns_visual {
            self.visual_time = time;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::PlaybackClock;

    #[test]
    fn advance_mirrors_visual_when_no_drag_owns_it() {
        let mut clock = PlaybackClock::default();
        clock.advance_to(3.5, false);
        assert_eq!(clock.current_time, 3.5);
        assert_eq!(clock.visual_time, 3.5);
    }

    #[test]
    fn advance_leaves_visual_alone_during_drag() {
        let mut clock = PlaybackClock {
            is_playing: true,
            current_time: 1.0,
            visual_time: 4.0,
        };
        clock.advance_to(1.5, true);
        assert_eq!(clock.current_time, 1.5);
        assert_eq!(clock.visual_time, 4.0);
    }
}
