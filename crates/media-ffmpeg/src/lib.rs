//! Media probing and single-frame decoding backed by the FFmpeg CLI tools.

mod decode;
mod error;
mod probe;

pub use decode::{FrameRgba, decode_frame_at};
pub use error::{MediaFfmpegError, Result};
pub use probe::{SourceProbe, probe_source};
