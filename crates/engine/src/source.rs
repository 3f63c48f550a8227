use serde::{Deserialize, Serialize};

use crate::error::Result;

/// Scene identifier used by the media acquisition service.
pub type SceneId = u64;
/// Project identifier used by the media acquisition service.
pub type ProjectId = u64;

/// Kind of media bound to a scene.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum MediaKind {
    Image,
    Video,
    Gallery,
}

impl MediaKind {
    /// Video sources carry their own clock; images and galleries are
    /// advanced by the sync loop's synthetic clock.
    pub fn has_native_clock(self) -> bool {
        matches!(self, Self::Video)
    }
}

/// Media bound to the current scene preview.
///
/// Created when a scene mounts, reset whenever the remote URL changes.
/// `local_url` arrives asynchronously from the acquisition service;
/// `is_ready` flips true only after the render bridge confirms the source
/// loaded.
#[derive(Debug, Clone, PartialEq)]
pub struct MediaSource {
    pub kind: MediaKind,
    pub remote_url: String,
    pub local_url: Option<String>,
    pub duration: Option<f64>,
    pub is_ready: bool,
}

impl MediaSource {
    pub fn new(kind: MediaKind, remote_url: impl Into<String>) -> Self {
        Self {
            kind,
            remote_url: remote_url.into(),
            local_url: None,
            duration: None,
            is_ready: false,
        }
    }

    /// URL the render primitive binds to: the local copy when present, the
    /// remote URL otherwise.
    pub fn playback_url(&self) -> &str {
        self.local_url.as_deref().unwrap_or(&self.remote_url)
    }
}

/// Download request passed to the media acquisition service.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AcquireRequest {
    pub remote_url: String,
    pub scene_id: SceneId,
    pub project_id: ProjectId,
    pub kind: MediaKind,
}

/// Reference-counted media acquisition service, injected per preview
/// instance rather than reached through a module-level singleton.
pub trait MediaStore {
    /// Resolves a local copy of the request's remote URL, reporting download
    /// progress in `[0, 1]`. `Ok(None)` means no local copy exists and the
    /// engine should bind the remote URL directly.
    fn acquire(
        &mut self,
        request: &AcquireRequest,
        on_progress: &mut dyn FnMut(f32),
    ) -> Result<Option<String>>;

    /// Drops one reference to the downloaded media.
    fn release(&mut self, remote_url: &str, scene_id: SceneId);
}

#[cfg(test)]
mod tests {
    use super::{MediaKind, MediaSource};

    #[test]
    fn playback_url_prefers_the_local_copy() {
        let mut source = MediaSource::new(MediaKind::Video, "https://cdn/scene.mp4");
        assert_eq!(source.playback_url(), "https://cdn/scene.mp4");

        source.local_url = Some(String::from("/tmp/scene.mp4"));
        assert_eq!(source.playback_url(), "/tmp/scene.mp4");
    }

    #[test]
    fn only_video_has_a_native_clock() {
        assert!(MediaKind::Video.has_native_clock());
        assert!(!MediaKind::Image.has_native_clock());
        assert!(!MediaKind::Gallery.has_native_clock());
    }
}
