use std::time::Instant;

use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};

use crate::audio::{self, AudioTrack};
use crate::bridge::RenderBridge;
use crate::clock::PlaybackClock;
use crate::drag::{DragArbiter, DragKind};
use crate::error::{PreviewError, Result};
use crate::source::{AcquireRequest, MediaKind, MediaSource, MediaStore, ProjectId, SceneId};
use crate::sync::SyncLoop;
use crate::trim::{TrimBounds, TrimHandle};

/// Persisted trim window, as stored with the scene.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct TrimSnapshot {
    pub start: f64,
    pub end: f64,
}

/// Everything needed to mount one scene preview.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PreviewConfig {
    pub media_url: String,
    pub audio_url: Option<String>,
    pub kind: MediaKind,
    pub trim: TrimSnapshot,
    pub scene_id: SceneId,
    pub project_id: ProjectId,
}

/// Invoked with `(start, effective_end)` once per committed trim drag.
pub type TrimListener = Box<dyn FnMut(f64, f64)>;

/// One scene's playback state machine.
///
/// Owns the authoritative clock, the trim window, the drag arbiter, and the
/// sync loop, and drives the render bridge and optional audio track from
/// them. Single-threaded by construction: the UI calls commands and `tick`
/// from its own frame callback, so no component ever observes a half-applied
/// update.
///
/// Update ordering inside every mutation is clock first, then bridge, then
/// audio. Teardown runs the other way around the resource chain: sync loop,
/// then bridge, then the media store reference.
pub struct ScenePreview<R: RenderBridge> {
    bridge: R,
    source: MediaSource,
    clock: PlaybackClock,
    trim: TrimBounds,
    drag: DragArbiter,
    sync: SyncLoop,
    audio: Option<Box<dyn AudioTrack>>,
    audio_url: Option<String>,
    store: Option<Box<dyn MediaStore>>,
    on_trim_change: Option<TrimListener>,
    trim_edit_enabled: bool,
    scene_id: SceneId,
    project_id: ProjectId,
    released: bool,
}

impl<R: RenderBridge> ScenePreview<R> {
    pub fn new(config: PreviewConfig, bridge: R) -> Self {
        let mut preview = Self {
            bridge,
            source: MediaSource::new(config.kind, config.media_url),
            clock: PlaybackClock::default(),
            trim: TrimBounds::new(config.trim.start, config.trim.end),
            drag: DragArbiter::default(),
            sync: SyncLoop::default(),
            audio: None,
            audio_url: config.audio_url,
            store: None,
            on_trim_change: None,
            trim_edit_enabled: false,
            scene_id: config.scene_id,
            project_id: config.project_id,
            released: true,
        };
        preview.clock.set_both(preview.trim.start());
        preview
    }

    pub fn with_audio(mut self, audio: Box<dyn AudioTrack>) -> Self {
        self.audio = Some(audio);
        self
    }

    pub fn with_media_store(mut self, store: Box<dyn MediaStore>) -> Self {
        self.store = Some(store);
        self
    }

    pub fn with_trim_listener(mut self, listener: TrimListener) -> Self {
        self.on_trim_change = Some(listener);
        self
    }

    /// Resolves a local copy through the media store, then initializes the
    /// render bridge. A store failure falls back to the remote URL; only a
    /// bridge failure leaves the scene not ready.
    pub fn load(&mut self) -> Result<()> {
        if let Some(store) = self.store.as_mut() {
            let request = AcquireRequest {
                remote_url: self.source.remote_url.clone(),
                scene_id: self.scene_id,
                project_id: self.project_id,
                kind: self.source.kind,
            };
            let mut on_progress = |fraction: f32| {
                debug!(fraction, "media download progress");
            };
            match store.acquire(&request, &mut on_progress) {
                Ok(local_url) => {
                    self.released = false;
                    self.source.local_url = local_url;
                }
                Err(error) => {
                    warn!(%error, url = %self.source.remote_url, "media store failed, falling back to remote url");
                }
            }
        }
        self.initialize_bridge()
    }

    fn initialize_bridge(&mut self) -> Result<()> {
        let duration = self.bridge.initialize(&self.source)?;
        self.source.duration = duration;
        self.source.is_ready = true;

        if let Some(duration) = duration {
            self.trim.adopt_duration(duration);
        }
        self.trim.sanitize(duration);

        let clamped = self.clamp_to_window(self.clock.current_time);
        self.clock.set_both(clamped);
        self.bridge.seek(clamped);

        info!(
            url = %self.source.playback_url(),
            duration = ?duration,
            trim_start = self.trim.start(),
            trim_end = self.effective_trim_end(),
            "scene preview loaded"
        );
        Ok(())
    }

    /// Starts playback from the current position, or from the trim start
    /// when the previous run hit the trim end.
    pub fn play(&mut self) -> Result<()> {
        if !self.source.is_ready {
            return Err(PreviewError::NotReady { command: "play" });
        }
        if self.sync.take_reset() {
            let start = self.trim.start();
            self.clock.set_both(start);
            self.bridge.seek(start);
            if let Some(audio) = self.audio.as_mut() {
                audio.seek(start);
            }
            debug!(start, "playback restarting from trim start");
        }

        self.bridge.play()?;
        if let Some(audio) = self.audio.as_mut() {
            if let Err(error) = audio.play() {
                warn!(%error, "audio track failed to start, continuing without it");
            } else {
                audio::resync(audio.as_mut(), self.clock.current_time);
            }
        }
        self.clock.is_playing = true;
        self.sync.start();
        Ok(())
    }

    /// Idempotent pause; the clocks keep their position.
    pub fn pause(&mut self) {
        self.bridge.pause();
        if let Some(audio) = self.audio.as_mut() {
            audio.pause();
        }
        self.clock.is_playing = false;
        self.sync.stop();
    }

    /// Commits a position inside the trim window. An explicit seek always
    /// disarms a pending start-over.
    pub fn seek(&mut self, time: f64) -> Result<()> {
        if !self.source.is_ready {
            return Err(PreviewError::NotReady { command: "seek" });
        }
        let clamped = self.clamp_to_window(time);
        self.sync.clear_reset();
        self.clock.set_both(clamped);
        self.bridge.seek(clamped);
        if let Some(audio) = self.audio.as_mut() {
            audio::resync(audio.as_mut(), clamped);
        }
        Ok(())
    }

    /// True while the UI should keep delivering frame callbacks.
    pub fn needs_tick(&self) -> bool {
        self.sync.is_running()
    }

    /// One frame of the sync loop. Reads the source's position (native clock
    /// for video, synthetic wall-clock advance otherwise), mirrors it into
    /// the playback clock, and enforces the trim window.
    pub fn tick(&mut self, now: Instant) {
        if !self.sync.is_running() || !self.clock.is_playing {
            return;
        }

        if self.sync.take_reset() {
            let start = self.trim.start();
            self.clock.set_both(start);
            self.bridge.seek(start);
            if let Some(audio) = self.audio.as_mut() {
                audio.seek(start);
            }
            return;
        }

        let dt = self.sync.delta(now);
        let time = if self.source.kind.has_native_clock() {
            self.bridge.current_time()
        } else {
            self.clock.current_time + dt
        };

        let start = self.trim.start();
        let end = self.effective_trim_end();

        if time >= end {
            self.bridge.pause();
            if let Some(audio) = self.audio.as_mut() {
                audio.pause();
            }
            self.clock.is_playing = false;
            self.clock.set_both(end);
            self.sync.arm_reset();
            self.sync.stop();
            debug!(end, "playback reached trim end");
            return;
        }

        if time < start {
            self.clock.advance_to(start, self.drag.owns_visual_time());
            self.bridge.seek(start);
            if let Some(audio) = self.audio.as_mut() {
                audio.seek(start);
            }
            return;
        }

        self.clock.advance_to(time, self.drag.owns_visual_time());
        if let Some(audio) = self.audio.as_mut() {
            audio::resync(audio.as_mut(), time);
        }
    }

    /// Starts a scrubber drag. Playback pauses for its duration; releasing
    /// the scrubber never resumes it.
    pub fn begin_scrubber_drag(&mut self) -> bool {
        if self.drag.owns_visual_time() {
            return false;
        }
        self.pause();
        self.drag.try_begin(DragKind::Scrubber, self.clock.current_time)
    }

    /// Moves only the visual clock; the committed position is untouched
    /// until release.
    pub fn update_scrubber_drag(&mut self, time: f64) {
        if self.drag.active() != Some(DragKind::Scrubber) {
            return;
        }
        self.clock.visual_time = self.clamp_to_window(time);
    }

    /// Commits the scrubbed position with exactly one bridge seek.
    pub fn end_scrubber_drag(&mut self) {
        if self.drag.end_if(DragKind::Scrubber).is_none() {
            return;
        }
        let committed = self.clamp_to_window(self.clock.visual_time);
        self.sync.clear_reset();
        self.clock.set_both(committed);
        self.bridge.seek(committed);
        if let Some(audio) = self.audio.as_mut() {
            audio::resync(audio.as_mut(), committed);
        }
        debug!(committed, "scrub committed");
    }

    /// Starts a trim-handle drag. Requires trim editing to be enabled and no
    /// other drag to be live. Playback is forced paused.
    pub fn begin_trim_drag(&mut self, handle: TrimHandle) -> bool {
        if !self.trim_edit_enabled {
            warn!(?handle, "trim drag refused: edit mode disabled");
            return false;
        }
        if self.drag.owns_visual_time() {
            return false;
        }
        self.pause();
        if !self.trim.begin_edit(handle) {
            return false;
        }
        let kind = match handle {
            TrimHandle::Start => DragKind::TrimStart,
            TrimHandle::End => DragKind::TrimEnd,
        };
        self.drag.try_begin(kind, self.clock.current_time)
    }

    /// Applies a proposed handle position and keeps both clocks inside the
    /// shrinking window.
    pub fn update_trim_drag(&mut self, proposed: f64) {
        if self.drag.active().map(DragKind::is_trim) != Some(true) {
            return;
        }
        self.trim.apply_edit(proposed, self.source.duration);
        let clamped = self.clamp_to_window(self.clock.current_time);
        self.clock.set_both(clamped);
    }

    /// Commits the trim window, reseeks if the position moved, and fires the
    /// change listener once.
    pub fn end_trim_drag(&mut self) {
        if self.drag.active().map(DragKind::is_trim) != Some(true) {
            return;
        }
        self.drag.end();
        let Some((start, end)) = self.trim.commit(self.source.duration) else {
            return;
        };
        let clamped = self.clamp_to_window(self.clock.current_time);
        if clamped != self.clock.current_time {
            self.clock.set_both(clamped);
            self.bridge.seek(clamped);
        } else {
            self.clock.set_both(clamped);
        }
        if let Some(listener) = self.on_trim_change.as_mut() {
            listener(start, end);
        }
        info!(start, end, "trim window committed");
    }

    /// Abandons the live drag, restoring the pre-drag position (and, for a
    /// trim drag, the pre-drag window).
    pub fn cancel_drag(&mut self) {
        let Some(session) = self.drag.end() else {
            return;
        };
        if session.kind.is_trim() {
            self.trim.cancel();
        }
        let anchor = self.clamp_to_window(session.anchor_time);
        self.clock.set_both(anchor);
        self.bridge.seek(anchor);
        debug!(kind = ?session.kind, anchor, "drag cancelled");
    }

    /// Enables or disables trim-handle dragging. Disabling never interrupts
    /// a drag already live.
    pub fn set_trim_edit(&mut self, enabled: bool) {
        self.trim_edit_enabled = enabled;
    }

    /// Adopts a local copy that arrived after mount and rebinds the render
    /// bridge to it. A no-op when the URL is unchanged.
    pub fn set_local_url(&mut self, local_url: impl Into<String>) -> Result<()> {
        let local_url = local_url.into();
        if self.source.local_url.as_deref() == Some(local_url.as_str()) {
            return Ok(());
        }
        self.sync.stop();
        self.clock.is_playing = false;
        self.bridge.dispose();
        self.source.local_url = Some(local_url);
        self.source.is_ready = false;
        self.initialize_bridge()
    }

    /// Tears down the current media and mounts a new one. The clock and sync
    /// loop start fresh; the trim window is taken from the new config.
    pub fn replace_media(&mut self, config: PreviewConfig) -> Result<()> {
        self.teardown();
        self.source = MediaSource::new(config.kind, config.media_url);
        self.audio_url = config.audio_url;
        self.trim = TrimBounds::new(config.trim.start, config.trim.end);
        self.clock = PlaybackClock::default();
        self.clock.set_both(self.trim.start());
        self.sync = SyncLoop::default();
        self.scene_id = config.scene_id;
        self.project_id = config.project_id;
        self.load()
    }

    /// Releases everything this preview holds: sync loop first, then the
    /// render bridge, then the media store reference. Safe to call twice.
    pub fn unload(&mut self) {
        self.teardown();
    }

    fn teardown(&mut self) {
        self.sync.stop();
        self.clock.is_playing = false;
        self.bridge.dispose();
        if !self.released {
            if let Some(store) = self.store.as_mut() {
                store.release(&self.source.remote_url, self.scene_id);
            }
            self.released = true;
        }
        self.source.local_url = None;
        self.source.is_ready = false;
    }

    pub fn is_playing(&self) -> bool {
        self.clock.is_playing
    }

    pub fn is_ready(&self) -> bool {
        self.source.is_ready
    }

    pub fn current_time(&self) -> f64 {
        self.clock.current_time
    }

    pub fn visual_time(&self) -> f64 {
        self.clock.visual_time
    }

    pub fn duration(&self) -> Option<f64> {
        self.source.duration
    }

    pub fn trim_start(&self) -> f64 {
        self.trim.start()
    }

    pub fn effective_trim_end(&self) -> f64 {
        self.trim.effective_end(self.source.duration)
    }

    pub fn active_handle(&self) -> Option<TrimHandle> {
        self.trim.active_handle()
    }

    pub fn active_drag(&self) -> Option<DragKind> {
        self.drag.active()
    }

    pub fn audio_url(&self) -> Option<&str> {
        self.audio_url.as_deref()
    }

    pub fn trim_edit_enabled(&self) -> bool {
        self.trim_edit_enabled
    }

    fn clamp_to_window(&self, time: f64) -> f64 {
        time.clamp(self.trim.start(), self.effective_trim_end())
    }
}

impl<R: RenderBridge> Drop for ScenePreview<R> {
    fn drop(&mut self) {
        self.teardown();
    }
}
