use std::fmt::{Display, Formatter};

/// Result type used by the engine crate.
pub type Result<T> = std::result::Result<T, PreviewError>;

/// Errors produced by preview commands and media initialization.
///
/// Boundary violations and drag conflicts are not represented here: the sync
/// loop corrects the former silently and the arbiter refuses the latter
/// structurally.
#[derive(Debug)]
pub enum PreviewError {
    /// The render primitive failed to decode or load the bound source. Fatal
    /// to the scene until a new source is supplied.
    MediaLoad { url: String, reason: String },
    /// A playback command arrived before the source finished initializing.
    NotReady { command: &'static str },
    Media(media_ffmpeg::MediaFfmpegError),
}

impl Display for PreviewError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::MediaLoad { url, reason } => {
                write!(f, "media failed to load: {url} ({reason})")
            }
            Self::NotReady { command } => {
                write!(f, "{command} rejected: media is not ready")
            }
            Self::Media(err) => write!(f, "media backend error: {err}"),
        }
    }
}

impl std::error::Error for PreviewError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Media(err) => Some(err),
            _ => None,
        }
    }
}

impl From<media_ffmpeg::MediaFfmpegError> for PreviewError {
    fn from(value: media_ffmpeg::MediaFfmpegError) -> Self {
        Self::Media(value)
    }
}
