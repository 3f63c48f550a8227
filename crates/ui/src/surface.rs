use std::sync::{Arc, Mutex};

use engine::{RenderSurface, SurfaceFrame};

/// Frame sink shared between the render bridge and the iced view.
///
/// The bridge presents into it whenever a frame is decoded; the view reads
/// the latest frame each redraw. Clones share the same slot.
#[derive(Debug, Clone, Default)]
pub struct SharedSurface {
    latest: Arc<Mutex<Option<SurfaceFrame>>>,
}

impl SharedSurface {
    pub fn latest(&self) -> Option<SurfaceFrame> {
        self.latest.lock().ok()?.clone()
    }

    pub fn clear(&self) {
        if let Ok(mut slot) = self.latest.lock() {
            *slot = None;
        }
    }
}

impl RenderSurface for SharedSurface {
    fn present(&mut self, frame: SurfaceFrame) {
        if let Ok(mut slot) = self.latest.lock() {
            *slot = Some(frame);
        }
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use engine::{RenderSurface, SurfaceFrame};

    use super::SharedSurface;

    #[test]
    fn clones_share_the_same_frame_slot() {
        let surface = SharedSurface::default();
        let mut writer = surface.clone();

        assert!(surface.latest().is_none());
        writer.present(SurfaceFrame {
            width: 1,
            height: 1,
            bytes: Arc::from(vec![0_u8; 4]),
        });

        let frame = surface.latest().expect("frame is visible to all clones");
        assert_eq!(frame.width, 1);

        surface.clear();
        assert!(surface.latest().is_none());
    }
}
