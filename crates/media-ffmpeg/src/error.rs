use std::fmt::{Display, Formatter};

/// Result type used by this crate.
pub type Result<T> = std::result::Result<T, MediaFfmpegError>;

/// Error type for media probing/decoding operations backed by FFmpeg CLI tools.
#[derive(Debug)]
pub enum MediaFfmpegError {
    InvalidTimestampSeconds(f64),
    MissingVideoStream(String),
    MissingVideoDimensions(String),
    Io {
        context: &'static str,
        source: std::io::Error,
    },
    CommandFailed {
        command: String,
        status: std::process::ExitStatus,
        stderr: String,
    },
    Utf8(std::string::FromUtf8Error),
    Parse {
        context: &'static str,
        value: String,
    },
}

impl Display for MediaFfmpegError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::InvalidTimestampSeconds(value) => {
                write!(f, "invalid timestamp seconds: {value}")
            }
            Self::MissingVideoStream(url) => {
                write!(f, "video stream not found: {url}")
            }
            Self::MissingVideoDimensions(url) => {
                write!(f, "video dimensions missing: {url}")
            }
            Self::Io { context, source } => {
                write!(f, "{context}: {source}")
            }
            Self::CommandFailed {
                command,
                status,
                stderr,
            } => {
                write!(
                    f,
                    "command failed ({status}): {command}; stderr: {}",
                    stderr.trim()
                )
            }
            Self::Utf8(err) => write!(f, "utf8 decode error: {err}"),
            Self::Parse { context, value } => {
                write!(f, "parse error ({context}): {value}")
            }
        }
    }
}

impl std::error::Error for MediaFfmpegError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Io { source, .. } => Some(source),
            Self::Utf8(err) => Some(err),
            _ => None,
        }
    }
}

impl From<std::string::FromUtf8Error> for MediaFfmpegError {
    fn from(value: std::string::FromUtf8Error) -> Self {
        Self::Utf8(value)
    }
}
