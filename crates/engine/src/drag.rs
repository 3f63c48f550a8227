use tracing::debug;

/// Interactive drag kinds competing for pointer movement.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DragKind {
    Scrubber,
    TrimStart,
    TrimEnd,
}

impl DragKind {
    pub fn is_trim(self) -> bool {
        matches!(self, Self::TrimStart | Self::TrimEnd)
    }
}

/// One live pointer interaction. `anchor_time` is the playback position at
/// drag start, used to restore it when the drag is cancelled.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DragSession {
    pub kind: DragKind,
    pub anchor_time: f64,
}

/// Serializes scrubber and trim-handle drags.
///
/// At most one session is live; a second `try_begin` of any kind is refused
/// rather than erroring. While a session is live the sync loop must not
/// overwrite the visual clock.
#[derive(Debug, Default)]
pub struct DragArbiter {
    session: Option<DragSession>,
}

impl DragArbiter {
    /// Starts a session unless another one is already live.
    pub fn try_begin(&mut self, kind: DragKind, anchor_time: f64) -> bool {
        if let Some(active) = self.session {
            debug!(refused = ?kind, active = ?active.kind, "drag refused: session already live");
            return false;
        }
        self.session = Some(DragSession { kind, anchor_time });
        true
    }

    /// Kind of the live session, if any.
    pub fn active(&self) -> Option<DragKind> {
        self.session.map(|session| session.kind)
    }

    /// True while any session drives the visual clock.
    pub fn owns_visual_time(&self) -> bool {
        self.session.is_some()
    }

    /// Ends the live session, whatever its kind.
    pub fn end(&mut self) -> Option<DragSession> {
        self.session.take()
    }

    /// Ends the live session only when it matches `kind`.
    pub fn end_if(&mut self, kind: DragKind) -> Option<DragSession> {
        if self.active() == Some(kind) {
            self.session.take()
        } else {
            None
        }
    }
}

#[cfg(test)]
mod tests {
    use super::{DragArbiter, DragKind};

    #[test]
    fn second_session_of_any_kind_is_refused() {
        let mut arbiter = DragArbiter::default();
        assert!(arbiter.try_begin(DragKind::Scrubber, 1.0));
        assert!(!arbiter.try_begin(DragKind::TrimStart, 1.0));
        assert!(!arbiter.try_begin(DragKind::Scrubber, 2.0));
        assert_eq!(arbiter.active(), Some(DragKind::Scrubber));
    }

    #[test]
    fn end_if_only_takes_the_matching_kind() {
        let mut arbiter = DragArbiter::default();
        assert!(arbiter.try_begin(DragKind::TrimEnd, 4.0));
        assert!(arbiter.end_if(DragKind::Scrubber).is_none());
        let session = arbiter.end_if(DragKind::TrimEnd).expect("session ends");
        assert_eq!(session.anchor_time, 4.0);
        assert!(!arbiter.owns_visual_time());
    }

    #[test]
    fn session_can_restart_after_ending() {
        let mut arbiter = DragArbiter::default();
        assert!(arbiter.try_begin(DragKind::Scrubber, 0.0));
        assert!(arbiter.end().is_some());
        assert!(arbiter.try_begin(DragKind::TrimStart, 2.0));
    }
}
