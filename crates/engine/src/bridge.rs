use std::sync::Arc;
use std::time::Instant;

use tracing::{debug, info};

use crate::error::{PreviewError, Result};
use crate::source::{MediaKind, MediaSource};

/// RGBA frame presented to the display surface.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SurfaceFrame {
    pub width: u32,
    pub height: u32,
    pub bytes: Arc<[u8]>,
}

/// Display target exclusively owned by the current render bridge. No other
/// component draws to it.
pub trait RenderSurface {
    fn present(&mut self, frame: SurfaceFrame);
}

/// Capability interface over the opaque decode/render primitive.
///
/// The engine never touches the primitive's native API; everything it needs
/// is expressed here. A bridge must be disposed before a new one is created
/// for the same surface.
pub trait RenderBridge {
    /// Binds the primitive to `source.playback_url()`, draws (or prepares)
    /// the first frame, and reports the duration when the primitive knows
    /// one. Fails with [`PreviewError::MediaLoad`] on decode errors.
    fn initialize(&mut self, source: &MediaSource) -> Result<Option<f64>>;

    /// Starts primitive playback. Rejects with [`PreviewError::NotReady`]
    /// before initialization.
    fn play(&mut self) -> Result<()>;

    /// Idempotent; always succeeds once initialized.
    fn pause(&mut self);

    /// Sets the primitive's time. While paused this also redraws the frame
    /// at that time so scrubbing shows the correct image.
    fn seek(&mut self, time: f64);

    /// Pure read; 0.0 when uninitialized.
    fn current_time(&self) -> f64;

    /// Pure read; 0.0 when uninitialized or unknown.
    fn duration(&self) -> f64;

    /// Stops playback and releases the primitive's resource handle.
    fn dispose(&mut self);
}

/// FFmpeg-CLI-backed bridge used by production wiring.
///
/// Probes the source for metadata, decodes single RGBA frames for the first
/// draw and paused-seek redraws, and derives its native clock from a
/// monotonic anchor while a video source plays. Still images report no
/// native clock; the sync loop advances them synthetically.
pub struct FfmpegRenderBridge<S> {
    surface: S,
    url: Option<String>,
    kind: MediaKind,
    duration: Option<f64>,
    base_time: f64,
    playing_since: Option<Instant>,
}

impl<S: RenderSurface> FfmpegRenderBridge<S> {
    pub fn new(surface: S) -> Self {
        Self {
            surface,
            url: None,
            kind: MediaKind::Video,
            duration: None,
            base_time: 0.0,
            playing_since: None,
        }
    }

    fn redraw_at(&mut self, time: f64) -> Result<()> {
        let Some(url) = self.url.clone() else {
            return Ok(());
        };
        let frame = media_ffmpeg::decode_frame_at(&url, time.max(0.0))?;
        self.surface.present(SurfaceFrame {
            width: frame.width,
            height: frame.height,
            bytes: frame.rgba.into(),
        });
        Ok(())
    }
}

impl<S: RenderSurface> RenderBridge for FfmpegRenderBridge<S> {
    fn initialize(&mut self, source: &MediaSource) -> Result<Option<f64>> {
        let url = source.playback_url().to_owned();
        let probe = media_ffmpeg::probe_source(&url).map_err(|err| PreviewError::MediaLoad {
            url: url.clone(),
            reason: err.to_string(),
        })?;

        self.kind = source.kind;
        self.duration = if source.kind.has_native_clock() {
            probe.duration_seconds
        } else {
            None
        };
        self.url = Some(url.clone());
        self.base_time = 0.0;
        self.playing_since = None;

        self.redraw_at(0.0).map_err(|err| PreviewError::MediaLoad {
            url: url.clone(),
            reason: err.to_string(),
        })?;

        info!(url = %url, kind = ?source.kind, duration = ?self.duration, "render bridge initialized");
        Ok(self.duration)
    }

    fn play(&mut self) -> Result<()> {
        if self.url.is_none() {
            return Err(PreviewError::NotReady { command: "play" });
        }
        if self.playing_since.is_none() && self.kind.has_native_clock() {
            self.playing_since = Some(Instant::now());
        }
        Ok(())
    }

    fn pause(&mut self) {
        if let Some(since) = self.playing_since.take() {
            self.base_time += since.elapsed().as_secs_f64();
        }
    }

    fn seek(&mut self, time: f64) {
        let was_playing = self.playing_since.is_some();
        self.base_time = time.max(0.0);
        if was_playing {
            self.playing_since = Some(Instant::now());
        } else if let Err(error) = self.redraw_at(self.base_time) {
            // A failed redraw leaves the previous frame on the surface.
            debug!(%error, time, "paused seek redraw failed");
        }
    }

    fn current_time(&self) -> f64 {
        match self.playing_since {
            Some(since) => self.base_time + since.elapsed().as_secs_f64(),
            None => self.base_time,
        }
    }

    fn duration(&self) -> f64 {
        self.duration.unwrap_or(0.0)
    }

    fn dispose(&mut self) {
        self.pause();
        self.url = None;
        self.duration = None;
        self.base_time = 0.0;
        debug!("render bridge disposed");
    }
}

#[cfg(test)]
mod tests {
    use super::{FfmpegRenderBridge, RenderBridge, RenderSurface, SurfaceFrame};

    struct NullSurface;

    impl RenderSurface for NullSurface {
        fn present(&mut self, _frame: SurfaceFrame) {}
    }

    #[test]
    fn play_is_rejected_before_initialization() {
        let mut bridge = FfmpegRenderBridge::new(NullSurface);
        assert!(bridge.play().is_err());
    }

    #[test]
    fn reads_are_zero_before_initialization() {
        let bridge = FfmpegRenderBridge::new(NullSurface);
        assert_eq!(bridge.current_time(), 0.0);
        assert_eq!(bridge.duration(), 0.0);
    }

    #[test]
    fn seek_before_initialization_moves_the_clock_without_drawing() {
        let mut bridge = FfmpegRenderBridge::new(NullSurface);
        bridge.seek(2.5);
        assert_eq!(bridge.current_time(), 2.5);
        bridge.seek(-1.0);
        assert_eq!(bridge.current_time(), 0.0);
    }
}
