use std::collections::HashMap;
use std::process::Command;

use crate::error::{MediaFfmpegError, Result};

/// Source metadata read from `ffprobe`.
///
/// The source may be a local file or a URL; `ffprobe` handles both. Still
/// images probe with no duration.
#[derive(Debug, Clone, PartialEq)]
pub struct SourceProbe {
    pub duration_seconds: Option<f64>,
    pub width: Option<u32>,
    pub height: Option<u32>,
    pub has_audio: bool,
}

/// Probes a media source via `ffprobe`: one invocation covering the stream
/// layout and the container duration.
///
/// # Example
/// ```no_run
/// use media_ffmpeg::probe_source;
///
/// let probe = probe_source("sample.mp4").expect("probe should succeed");
/// assert!(probe.duration_seconds.is_some());
/// ```
pub fn probe_source(url: impl AsRef<str>) -> Result<SourceProbe> {
    let url = url.as_ref();

    let output = Command::new("ffprobe")
        .args([
            "-v",
            "error",
            "-show_entries",
            "stream=codec_type,width,height:format=duration",
            "-of",
            "compact=nk=0",
        ])
        .arg(url)
        .output()
        .map_err(|source| MediaFfmpegError::Io {
            context: "run ffprobe source probe",
            source,
        })?;

    if !output.status.success() {
        return Err(MediaFfmpegError::CommandFailed {
            command: format!("ffprobe source probe {url}"),
            status: output.status,
            stderr: String::from_utf8_lossy(&output.stderr).into_owned(),
        });
    }

    let stdout = String::from_utf8(output.stdout)?;
    let mut probe = SourceProbe {
        duration_seconds: None,
        width: None,
        height: None,
        has_audio: false,
    };
    let mut saw_stream = false;

    for line in stdout.lines().filter(|line| !line.trim().is_empty()) {
        let Some((prefix, rest)) = line.split_once('|') else {
            continue;
        };
        let fields = parse_fields(rest);
        match prefix {
            "stream" => {
                saw_stream = true;
                match fields.get("codec_type").copied() {
                    Some("video") if probe.width.is_none() => {
                        probe.width = parse_optional_u32(fields.get("width").copied(), "width")?;
                        probe.height = parse_optional_u32(fields.get("height").copied(), "height")?;
                    }
                    Some("audio") => probe.has_audio = true,
                    _ => {}
                }
            }
            "format" => {
                probe.duration_seconds =
                    parse_optional_seconds(fields.get("duration").copied(), "format duration")?;
            }
            _ => {}
        }
    }

    if !saw_stream {
        return Err(MediaFfmpegError::Parse {
            context: "streams",
            value: "no streams found".to_string(),
        });
    }

    Ok(probe)
}

fn parse_fields(rest: &str) -> HashMap<&str, &str> {
    let mut map = HashMap::new();
    for field in rest.split('|') {
        if let Some((key, value)) = field.split_once('=') {
            map.insert(key.trim(), value.trim().trim_matches('"'));
        }
    }
    map
}

fn parse_optional_u32(value: Option<&str>, context: &'static str) -> Result<Option<u32>> {
    let Some(raw) = value else {
        return Ok(None);
    };
    if raw.is_empty() || raw == "N/A" {
        return Ok(None);
    }
    raw.parse::<u32>()
        .map(Some)
        .map_err(|_| MediaFfmpegError::Parse {
            context,
            value: raw.to_string(),
        })
}

fn parse_optional_seconds(value: Option<&str>, context: &'static str) -> Result<Option<f64>> {
    let Some(raw) = value else {
        return Ok(None);
    };
    if raw.is_empty() || raw == "N/A" {
        return Ok(None);
    }
    let seconds = raw.parse::<f64>().map_err(|_| MediaFfmpegError::Parse {
        context,
        value: raw.to_string(),
    })?;
    if !seconds.is_finite() || seconds < 0.0 {
        return Ok(None);
    }
    Ok(Some(seconds))
}
