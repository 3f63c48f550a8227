//! UI-agnostic playback and trim engine for scene previews.

pub mod api;
pub mod audio;
pub mod bridge;
pub mod clock;
pub mod drag;
pub mod error;
pub mod source;
pub mod sync;
pub mod trim;

pub use api::{PreviewConfig, ScenePreview, TrimListener, TrimSnapshot};
pub use audio::{AUDIO_DRIFT_THRESHOLD, AudioTrack};
pub use bridge::{FfmpegRenderBridge, RenderBridge, RenderSurface, SurfaceFrame};
pub use clock::PlaybackClock;
pub use drag::{DragArbiter, DragKind, DragSession};
pub use error::{PreviewError, Result};
pub use source::{AcquireRequest, MediaKind, MediaSource, MediaStore, ProjectId, SceneId};
pub use sync::SyncLoop;
pub use trim::{MIN_TRIM_GAP, TRIM_END_FALLBACK, TrimBounds, TrimHandle};
