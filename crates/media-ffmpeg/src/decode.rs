use std::process::Command;

use crate::error::{MediaFfmpegError, Result};
use crate::probe::probe_source;

/// A decoded frame in RGBA format.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FrameRgba {
    pub width: u32,
    pub height: u32,
    pub rgba: Vec<u8>,
}

/// Decodes a single RGBA frame at the requested time.
///
/// Uses `ffmpeg` input seeking, so decode cost is bounded by the distance to
/// the previous keyframe rather than the offset into the source. Still
/// images decode their only frame regardless of `at_seconds`.
///
/// # Example
/// ```no_run
/// use media_ffmpeg::decode_frame_at;
///
/// let frame = decode_frame_at("sample.mp4", 0.5).expect("decode should succeed");
/// assert!(!frame.rgba.is_empty());
/// ```
pub fn decode_frame_at(url: impl AsRef<str>, at_seconds: f64) -> Result<FrameRgba> {
    if !at_seconds.is_finite() || at_seconds < 0.0 {
        return Err(MediaFfmpegError::InvalidTimestampSeconds(at_seconds));
    }

    let url = url.as_ref();
    let probe = probe_source(url)?;
    let width = probe
        .width
        .ok_or_else(|| MediaFfmpegError::MissingVideoStream(url.to_string()))?;
    let height = probe
        .height
        .ok_or_else(|| MediaFfmpegError::MissingVideoDimensions(url.to_string()))?;

    let output = Command::new("ffmpeg")
        .arg("-hide_banner")
        .arg("-v")
        .arg("error")
        .arg("-ss")
        .arg(format!("{at_seconds}"))
        .arg("-i")
        .arg(url)
        .arg("-frames:v")
        .arg("1")
        .arg("-f")
        .arg("rawvideo")
        .arg("-pix_fmt")
        .arg("rgba")
        .arg("-")
        .output()
        .map_err(|source| MediaFfmpegError::Io {
            context: "run ffmpeg decode frame",
            source,
        })?;

    if !output.status.success() {
        return Err(MediaFfmpegError::CommandFailed {
            command: format!("ffmpeg decode frame {url}"),
            status: output.status,
            stderr: String::from_utf8_lossy(&output.stderr).into_owned(),
        });
    }

    let rgba = output.stdout;
    if rgba.is_empty() {
        return Err(MediaFfmpegError::Parse {
            context: "decoded rgba frame",
            value: "no frame produced".to_string(),
        });
    }
    let expected_size = width as usize * height as usize * 4;
    if rgba.len() != expected_size {
        return Err(MediaFfmpegError::Parse {
            context: "decoded rgba size",
            value: format!("expected {expected_size} bytes, got {}", rgba.len()),
        });
    }

    Ok(FrameRgba {
        width,
        height,
        rgba,
    })
}
