use tracing::debug;

/// Minimum trim window length in seconds.
pub const MIN_TRIM_GAP: f64 = 0.5;

/// Effective trim end used before any end value or media duration is known.
pub const TRIM_END_FALLBACK: f64 = 10.0;

/// Trim handle being dragged.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TrimHandle {
    Start,
    End,
}

/// Trim window state and the active-handle edit machine.
///
/// The raw `end` may be stale or zero before media metadata arrives;
/// `effective_end` resolves the value playback actually honors.
#[derive(Debug, Clone, PartialEq)]
pub struct TrimBounds {
    start: f64,
    end: f64,
    user_set_end: Option<f64>,
    active_handle: Option<TrimHandle>,
    pre_edit: Option<(f64, f64, Option<f64>)>,
}

impl TrimBounds {
    /// Creates a trim window from persisted values. A zero or negative end is
    /// kept as-is and resolved later against media duration.
    pub fn new(start: f64, end: f64) -> Self {
        Self {
            start: start.max(0.0),
            end,
            user_set_end: None,
            active_handle: None,
            pre_edit: None,
        }
    }

    pub fn start(&self) -> f64 {
        self.start
    }

    pub fn raw_end(&self) -> f64 {
        self.end
    }

    pub fn user_set_end(&self) -> Option<f64> {
        self.user_set_end
    }

    pub fn active_handle(&self) -> Option<TrimHandle> {
        self.active_handle
    }

    /// Resolves the trim end playback honors: explicit user override, else
    /// the last-known raw end, else media duration, else a fixed fallback.
    ///
    /// # Example
    /// ```
    /// use engine::trim::{TRIM_END_FALLBACK, TrimBounds};
    ///
    /// let trim = TrimBounds::new(0.0, 0.0);
    /// assert_eq!(trim.effective_end(None), TRIM_END_FALLBACK);
    /// assert_eq!(trim.effective_end(Some(7.0)), 7.0);
    /// ```
    pub fn effective_end(&self, duration: Option<f64>) -> f64 {
        if let Some(end) = self.user_set_end {
            if end > 0.0 {
                return end;
            }
        }
        if self.end > 0.0 {
            return self.end;
        }
        if let Some(duration) = duration {
            if duration > 0.0 {
                return duration;
            }
        }
        TRIM_END_FALLBACK
    }

    /// Adopts the loaded media duration as the end override when neither a
    /// user override nor a stored end exists yet.
    pub fn adopt_duration(&mut self, duration: f64) {
        if self.user_set_end.is_none() && self.end <= 0.0 && duration > 0.0 {
            debug!(duration, "adopting media duration as trim end");
            self.user_set_end = Some(duration);
        }
    }

    /// Pulls the start back inside the resolved window after metadata
    /// arrives, so `start < effective_end` holds from the first frame on.
    pub(crate) fn sanitize(&mut self, duration: Option<f64>) {
        let max_start = (self.effective_end(duration) - MIN_TRIM_GAP).max(0.0);
        if self.start > max_start {
            debug!(start = self.start, max_start, "clamping stale trim start");
            self.start = max_start;
        }
    }

    /// Enters the edit state for one handle. Refused while another edit is
    /// active. The pre-edit window is kept for cancellation.
    pub fn begin_edit(&mut self, handle: TrimHandle) -> bool {
        if self.active_handle.is_some() {
            debug!(?handle, "trim edit refused: handle already active");
            return false;
        }
        self.pre_edit = Some((self.start, self.end, self.user_set_end));
        self.active_handle = Some(handle);
        true
    }

    /// Applies a proposed handle position, clamped per the edit policy:
    /// start stays in `[0, effective_end - MIN_TRIM_GAP]`, end stays in
    /// `[start + MIN_TRIM_GAP, duration]`.
    pub fn apply_edit(&mut self, proposed: f64, duration: Option<f64>) {
        match self.active_handle {
            Some(TrimHandle::Start) => {
                let max_start = (self.effective_end(duration) - MIN_TRIM_GAP).max(0.0);
                let clamped = proposed.clamp(0.0, max_start);
                if clamped != self.start {
                    debug!(proposed, clamped, "trim start edit");
                    self.start = clamped;
                }
            }
            Some(TrimHandle::End) => {
                let floor = self.start + MIN_TRIM_GAP;
                let mut clamped = proposed.max(floor);
                if let Some(duration) = duration {
                    clamped = clamped.min(duration.max(floor));
                }
                if self.user_set_end != Some(clamped) {
                    debug!(proposed, clamped, "trim end edit");
                    self.user_set_end = Some(clamped);
                }
            }
            None => {}
        }
    }

    /// Leaves the edit state and returns the committed window, exactly once
    /// per completed edit. A dragged end handle becomes the raw end too.
    pub fn commit(&mut self, duration: Option<f64>) -> Option<(f64, f64)> {
        let handle = self.active_handle.take()?;
        self.pre_edit = None;
        if handle == TrimHandle::End {
            if let Some(end) = self.user_set_end {
                self.end = end;
            }
        }
        Some((self.start, self.effective_end(duration)))
    }

    /// Abandons the edit state and restores the pre-edit window.
    pub fn cancel(&mut self) -> Option<TrimHandle> {
        let handle = self.active_handle.take()?;
        if let Some((start, end, user_set_end)) = self.pre_edit.take() {
            self.start = start;
            self.end = end;
            self.user_set_end = user_set_end;
        }
        debug!(?handle, "trim edit cancelled");
        Some(handle)
    }
}

#[cfg(test)]
mod tests {
    use super::{MIN_TRIM_GAP, TRIM_END_FALLBACK, TrimBounds, TrimHandle};

    #[test]
    fn effective_end_prefers_user_override_over_raw_end_and_duration() {
        let mut trim = TrimBounds::new(0.0, 8.0);
        assert_eq!(trim.effective_end(Some(20.0)), 8.0);

        assert!(trim.begin_edit(TrimHandle::End));
        trim.apply_edit(6.0, Some(20.0));
        assert_eq!(trim.effective_end(Some(20.0)), 6.0);
    }

    #[test]
    fn effective_end_falls_back_through_duration_to_constant() {
        let trim = TrimBounds::new(0.0, 0.0);
        assert_eq!(trim.effective_end(Some(12.0)), 12.0);
        assert_eq!(trim.effective_end(None), TRIM_END_FALLBACK);
    }

    #[test]
    fn adopt_duration_only_fills_a_missing_end() {
        let mut trim = TrimBounds::new(0.0, 0.0);
        trim.adopt_duration(9.0);
        assert_eq!(trim.effective_end(None), 9.0);

        let mut stored = TrimBounds::new(0.0, 4.0);
        stored.adopt_duration(9.0);
        assert_eq!(stored.effective_end(None), 4.0);
    }

    #[test]
    fn start_edit_is_clamped_below_effective_end_minus_gap() {
        let mut trim = TrimBounds::new(0.0, 8.0);
        assert!(trim.begin_edit(TrimHandle::Start));
        trim.apply_edit(9.5, Some(10.0));
        assert_eq!(trim.start(), 8.0 - MIN_TRIM_GAP);
        trim.apply_edit(-3.0, Some(10.0));
        assert_eq!(trim.start(), 0.0);
    }

    #[test]
    fn end_edit_is_clamped_between_gap_and_duration() {
        let mut trim = TrimBounds::new(2.0, 8.0);
        assert!(trim.begin_edit(TrimHandle::End));
        trim.apply_edit(0.1, Some(10.0));
        assert_eq!(trim.user_set_end(), Some(2.0 + MIN_TRIM_GAP));
        trim.apply_edit(99.0, Some(10.0));
        assert_eq!(trim.user_set_end(), Some(10.0));
    }

    #[test]
    fn commit_returns_the_window_exactly_once() {
        let mut trim = TrimBounds::new(0.0, 8.0);
        assert!(trim.begin_edit(TrimHandle::Start));
        trim.apply_edit(9.5, Some(10.0));

        assert_eq!(trim.commit(Some(10.0)), Some((7.5, 8.0)));
        assert_eq!(trim.commit(Some(10.0)), None);
        assert_eq!(trim.active_handle(), None);
    }

    #[test]
    fn second_begin_edit_is_refused_while_one_is_active() {
        let mut trim = TrimBounds::new(0.0, 8.0);
        assert!(trim.begin_edit(TrimHandle::Start));
        assert!(!trim.begin_edit(TrimHandle::End));
        assert_eq!(trim.active_handle(), Some(TrimHandle::Start));
    }

    #[test]
    fn cancel_restores_the_pre_edit_window() {
        let mut trim = TrimBounds::new(1.0, 8.0);
        assert!(trim.begin_edit(TrimHandle::Start));
        trim.apply_edit(5.0, Some(10.0));
        assert_eq!(trim.start(), 5.0);

        assert_eq!(trim.cancel(), Some(TrimHandle::Start));
        assert_eq!(trim.start(), 1.0);
        assert_eq!(trim.commit(Some(10.0)), None);
    }

    #[test]
    fn sanitize_pulls_a_stale_start_inside_the_window() {
        let mut trim = TrimBounds::new(12.0, 0.0);
        trim.sanitize(Some(6.0));
        assert_eq!(trim.start(), 6.0 - MIN_TRIM_GAP);
        assert!(trim.start() < trim.effective_end(Some(6.0)));
    }
}
