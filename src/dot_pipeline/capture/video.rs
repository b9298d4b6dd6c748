//! Video files decoded through the `ffprobe` / `ffmpeg` command line tools.
//!
//! Each seek decodes a single RGBA frame at the requested time, so a
//! [`VideoSource`] can drive range exports like any other [`TimedSource`].

use std::path::{Path, PathBuf};
use std::process::Command;

use serde::Deserialize;
use tracing::{debug, info, instrument};

use crate::dot_pipeline::capture::source::PixelSource;
use crate::dot_pipeline::capture::timeline::TimedSource;
use crate::dot_pipeline::common::error::{PipelineError, Result};
use crate::dot_pipeline::common::raster::BLACK;
use crate::dot_pipeline::common::Raster;

/// Stream properties reported by `ffprobe`.
#[derive(Debug, Clone, PartialEq)]
pub struct VideoInfo {
    pub width: usize,
    pub height: usize,
    /// Frames per second, 0 when unknown.
    pub fps: f64,
    /// Seconds, 0 when unknown.
    pub duration: f64,
}

#[derive(Deserialize)]
struct ProbeStream {
    codec_type: Option<String>,
    width: Option<usize>,
    height: Option<usize>,
    r_frame_rate: Option<String>,
    avg_frame_rate: Option<String>,
    duration: Option<String>,
}

#[derive(Deserialize)]
struct ProbeFormat {
    duration: Option<String>,
}

#[derive(Deserialize)]
struct ProbeOut {
    #[serde(default)]
    streams: Vec<ProbeStream>,
    format: Option<ProbeFormat>,
}

impl VideoInfo {
    /// Parses `ffprobe -print_format json -show_streams -show_format` output.
    pub fn from_probe_json(bytes: &[u8]) -> Result<Self> {
        let parsed: ProbeOut = serde_json::from_slice(bytes)
            .map_err(|e| PipelineError::DecodeError(format!("ffprobe json parse failed: {e}")))?;
        let stream = parsed
            .streams
            .iter()
            .find(|s| s.codec_type.as_deref() == Some("video"))
            .ok_or_else(|| PipelineError::DecodeError("no video stream found".to_string()))?;

        let (width, height) = match (stream.width, stream.height) {
            (Some(w), Some(h)) if w > 0 && h > 0 => (w, h),
            (w, h) => {
                return Err(PipelineError::InvalidDimensions(w.unwrap_or(0), h.unwrap_or(0)));
            }
        };

        let fps = [&stream.r_frame_rate, &stream.avg_frame_rate]
            .into_iter()
            .filter_map(|rate| rate.as_deref().and_then(parse_frame_rate))
            .next()
            .unwrap_or(0.0);

        let seconds = |value: &Option<String>| {
            value
                .as_deref()
                .and_then(|s| s.parse::<f64>().ok())
                .filter(|d| d.is_finite() && *d > 0.0)
        };
        let duration = parsed
            .format
            .as_ref()
            .and_then(|f| seconds(&f.duration))
            .or_else(|| seconds(&stream.duration))
            .unwrap_or(0.0);

        Ok(Self { width, height, fps, duration })
    }

    fn frame_bytes(&self) -> usize {
        self.width * self.height * 4
    }

    /// Latest time a frame can still be decoded at.
    fn last_frame_time(&self) -> f64 {
        if self.fps > 0.0 {
            (self.duration - 1.0 / self.fps).max(0.0)
        } else {
            self.duration
        }
    }
}

/// Parses an ffmpeg rational such as `30000/1001`, or a plain number.
pub fn parse_frame_rate(value: &str) -> Option<f64> {
    let rate = match value.split_once('/') {
        Some((num, den)) => {
            let num = num.trim().parse::<f64>().ok()?;
            let den = den.trim().parse::<f64>().ok()?;
            if den == 0.0 {
                return None;
            }
            num / den
        }
        None => value.trim().parse::<f64>().ok()?,
    };
    (rate.is_finite() && rate > 0.0).then_some(rate)
}

fn missing_tool(tool: &str, e: std::io::Error) -> PipelineError {
    PipelineError::SourceUnavailable(format!("failed to run {tool}: {e}"))
}

/// Reads stream properties of the video at `path`.
#[instrument(skip(path), fields(path = %path.display()))]
pub fn probe_video(path: &Path) -> Result<VideoInfo> {
    if !path.is_file() {
        return Err(PipelineError::InputReadError(format!(
            "{}: video not found",
            path.display()
        )));
    }

    let out = Command::new("ffprobe")
        .args(["-v", "error", "-print_format", "json", "-show_streams", "-show_format"])
        .arg(path)
        .output()
        .map_err(|e| missing_tool("ffprobe", e))?;
    if !out.status.success() {
        return Err(PipelineError::DecodeError(format!(
            "ffprobe failed for '{}': {}",
            path.display(),
            String::from_utf8_lossy(&out.stderr).trim()
        )));
    }
    VideoInfo::from_probe_json(&out.stdout)
}

/// A video file with a playhead. Not ready until the first seek decodes a frame.
#[derive(Debug, Clone)]
pub struct VideoSource {
    path: PathBuf,
    info: VideoInfo,
    position: f64,
    frame: Option<Raster>,
}

impl VideoSource {
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let info = probe_video(path)?;
        info!(
            video = %path.display(),
            width = info.width,
            height = info.height,
            fps = info.fps,
            duration = info.duration,
            "Opened video"
        );
        Ok(Self {
            path: path.to_path_buf(),
            info,
            position: 0.0,
            frame: None,
        })
    }

    pub fn info(&self) -> &VideoInfo {
        &self.info
    }

    /// Decodes the frame shown at `time`. `None` when ffmpeg returns no
    /// frame there, such as just past the last one.
    fn decode_frame_at(&self, time: f64) -> Result<Option<Raster>> {
        let time = time.clamp(0.0, self.info.last_frame_time());
        let out = Command::new("ffmpeg")
            .args(["-v", "error", "-ss", &format!("{time:.6}")])
            .arg("-i")
            .arg(&self.path)
            .args(["-frames:v", "1", "-f", "rawvideo", "-pix_fmt", "rgba", "pipe:1"])
            .output()
            .map_err(|e| missing_tool("ffmpeg", e))?;
        if !out.status.success() {
            return Err(PipelineError::DecodeError(format!(
                "ffmpeg decode failed for '{}' at {time:.3}s: {}",
                self.path.display(),
                String::from_utf8_lossy(&out.stderr).trim()
            )));
        }

        let expected = self.info.frame_bytes();
        if out.stdout.is_empty() {
            debug!(time, "No video frame at this time");
            return Ok(None);
        }
        if out.stdout.len() < expected {
            return Err(PipelineError::DecodeError(format!(
                "decoded video frame has {} bytes, expected {expected}",
                out.stdout.len()
            )));
        }

        let mut data = out.stdout;
        data.truncate(expected);
        Raster::from_rgba(self.info.width, self.info.height, data).map(Some)
    }
}

impl PixelSource for VideoSource {
    fn dimensions(&self) -> Option<(usize, usize)> {
        self.frame.as_ref().and_then(|frame| frame.dimensions())
    }

    fn read_pixel(&self, x: usize, y: usize) -> [u8; 4] {
        self.frame.as_ref().map_or(BLACK, |frame| frame.pixel(x, y))
    }
}

impl TimedSource for VideoSource {
    fn duration(&self) -> Option<f64> {
        (self.info.duration > 0.0).then_some(self.info.duration)
    }

    fn position(&self) -> f64 {
        self.position
    }

    fn seek(&mut self, time: f64) -> Result<()> {
        let time = if time.is_finite() { time.clamp(0.0, self.info.duration) } else { 0.0 };
        self.frame = self.decode_frame_at(time)?;
        self.position = time;
        debug!(position = time, "Seeked video");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const PROBE: &str = r#"{
        "streams": [
            {"codec_type": "audio", "r_frame_rate": "0/0"},
            {"codec_type": "video", "width": 640, "height": 360,
             "r_frame_rate": "30000/1001", "avg_frame_rate": "30000/1001", "duration": "9.5"}
        ],
        "format": {"duration": "10.010000"}
    }"#;

    fn ffmpeg_available() -> bool {
        ["ffmpeg", "ffprobe"].iter().all(|tool| {
            Command::new(tool)
                .arg("-version")
                .output()
                .is_ok_and(|out| out.status.success())
        })
    }

    #[test]
    fn test_ffprobe_json_reads_video_stream() {
        let info = VideoInfo::from_probe_json(PROBE.as_bytes()).unwrap();
        assert_eq!((info.width, info.height), (640, 360));
        assert!((info.fps - 29.97).abs() < 0.01);
        assert_eq!(info.duration, 10.01);
    }

    #[test]
    fn test_ffprobe_json_falls_back_to_stream_values() {
        let json = r#"{"streams": [{"codec_type": "video", "width": 8, "height": 8,
            "r_frame_rate": "0/0", "avg_frame_rate": "12", "duration": "2.5"}]}"#;
        let info = VideoInfo::from_probe_json(json.as_bytes()).unwrap();
        assert_eq!(info.fps, 12.0);
        assert_eq!(info.duration, 2.5);
    }

    #[test]
    fn test_ffprobe_json_rejects_missing_video() {
        let audio_only = r#"{"streams": [{"codec_type": "audio"}]}"#;
        assert!(matches!(
            VideoInfo::from_probe_json(audio_only.as_bytes()),
            Err(PipelineError::DecodeError(_))
        ));
        let no_size = r#"{"streams": [{"codec_type": "video", "width": 0}]}"#;
        assert!(matches!(
            VideoInfo::from_probe_json(no_size.as_bytes()),
            Err(PipelineError::InvalidDimensions(0, 0))
        ));
        assert!(VideoInfo::from_probe_json(b"not json").is_err());
    }

    #[test]
    fn test_frame_rate_parsing() {
        assert_eq!(parse_frame_rate("25/1"), Some(25.0));
        assert_eq!(parse_frame_rate("24"), Some(24.0));
        assert_eq!(parse_frame_rate("0/0"), None);
        assert_eq!(parse_frame_rate("0/1"), None);
        assert_eq!(parse_frame_rate("abc"), None);
    }

    #[test]
    fn test_missing_video_file() {
        let dir = tempfile::tempdir().unwrap();
        let result = VideoSource::open(dir.path().join("missing.mp4"));
        assert!(matches!(result.unwrap_err(), PipelineError::InputReadError(_)));
    }

    #[test]
    fn test_decodes_frames_when_ffmpeg_is_installed() {
        if !ffmpeg_available() {
            eprintln!("ffmpeg not installed, skipping");
            return;
        }
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("white.avi");
        let status = Command::new("ffmpeg")
            .args(["-v", "error", "-f", "lavfi", "-i", "color=c=white:s=32x24:d=1:r=10"])
            .arg(&path)
            .status()
            .unwrap();
        assert!(status.success());

        let mut video = VideoSource::open(&path).unwrap();
        assert_eq!((video.info().width, video.info().height), (32, 24));
        assert!(video.dimensions().is_none());

        video.seek(0.5).unwrap();
        assert_eq!(video.dimensions(), Some((32, 24)));
        assert_eq!(video.position(), 0.5);
        let [r, g, b, a] = video.read_pixel(16, 12);
        assert!(r > 230 && g > 230 && b > 230, "{r} {g} {b}");
        assert_eq!(a, 255);
    }
}
