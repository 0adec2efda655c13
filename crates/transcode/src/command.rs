//! Typed ffmpeg invocations.
//!
//! Both argument layouts are part of the tool's output contract; keep the
//! order of `build_args` stable.

use std::ffi::OsString;
use std::path::{Path, PathBuf};

use splitcat_manifest::SegmentDescriptor;

/// Final output, relative to the process working directory.
pub const CONCAT_OUTPUT: &str = "output.mkv";

/// Codec name that copies the compressed stream as is.
pub const STREAM_COPY: &str = "copy";

/// Re-encode settings for the concatenated output.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EncodeProfile {
    pub threads: u32,
    pub preset: &'static str,
    pub crf: u8,
    pub video_codec: &'static str,
    pub audio_codec: &'static str,
    pub audio_bitrate: &'static str,
    pub frame_rate: u32,
    pub width: u32,
    pub height: u32,
    pub vsync: u8,
    pub deinterlace: bool,
    pub pixel_format: &'static str,
    pub buffer_size: &'static str,
    pub max_rate: &'static str,
}

/// The one profile every run encodes to: 720p30 H.264 + AAC.
pub const TARGET_PROFILE: EncodeProfile = EncodeProfile {
    threads: 12,
    preset: "veryfast",
    crf: 22,
    video_codec: "libx264",
    audio_codec: "aac",
    audio_bitrate: "128k",
    frame_rate: 30,
    width: 1280,
    height: 720,
    vsync: 1,
    deinterlace: true,
    pixel_format: "yuv420p",
    buffer_size: "20000k",
    max_rate: "2000k",
};

impl EncodeProfile {
    fn push_args(&self, args: &mut Vec<OsString>) {
        push(args, ["-threads", self.threads.to_string().as_str()]);
        push(args, ["-preset", self.preset]);
        push(args, ["-crf", self.crf.to_string().as_str()]);
        push(args, ["-c:v", self.video_codec]);
        push(args, ["-c:a", self.audio_codec]);
        push(args, ["-b:a", self.audio_bitrate]);
        push(args, ["-r", self.frame_rate.to_string().as_str()]);
        push(args, ["-s", format!("{}x{}", self.width, self.height).as_str()]);
        push(args, ["-vsync", self.vsync.to_string().as_str()]);
        if self.deinterlace {
            args.push("-deinterlace".into());
        }
        push(args, ["-pix_fmt", self.pixel_format]);
        push(args, ["-bufsize", self.buffer_size]);
        push(args, ["-maxrate", self.max_rate]);
    }
}

/// Cut one segment out of a source file without re-encoding.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExtractCommand {
    pub source: PathBuf,
    pub output: PathBuf,
    /// Seek offset in whole seconds.
    pub start_secs: i64,
    /// Clip length in whole seconds. Passed through even when not positive.
    pub duration_secs: i64,
    pub video_codec: &'static str,
    pub audio_codec: &'static str,
}

impl ExtractCommand {
    /// Stream-copy extraction of `segment` from `source` into `output`.
    pub fn for_segment(segment: &SegmentDescriptor, source: &Path, output: &Path) -> Self {
        Self {
            source: source.to_path_buf(),
            output: output.to_path_buf(),
            start_secs: segment.start_secs(),
            duration_secs: segment.duration_secs(),
            video_codec: STREAM_COPY,
            audio_codec: STREAM_COPY,
        }
    }

    pub fn build_args(&self) -> Vec<OsString> {
        let mut args: Vec<OsString> = Vec::with_capacity(12);
        args.push("-y".into());
        push(&mut args, ["-ss", self.start_secs.to_string().as_str()]);
        args.push("-i".into());
        args.push(self.source.clone().into_os_string());
        push(&mut args, ["-t", self.duration_secs.to_string().as_str()]);
        push(&mut args, ["-c:v", self.video_codec]);
        push(&mut args, ["-c:a", self.audio_codec]);
        args.push(self.output.clone().into_os_string());
        args
    }
}

/// Join the clips named in a concat list file and re-encode them.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConcatCommand {
    pub list_file: PathBuf,
    pub output: PathBuf,
    pub profile: EncodeProfile,
}

impl ConcatCommand {
    /// Concatenate `list_file` into [`CONCAT_OUTPUT`] with [`TARGET_PROFILE`].
    pub fn new(list_file: &Path) -> Self {
        Self {
            list_file: list_file.to_path_buf(),
            output: PathBuf::from(CONCAT_OUTPUT),
            profile: TARGET_PROFILE,
        }
    }

    pub fn build_args(&self) -> Vec<OsString> {
        let mut args: Vec<OsString> = Vec::with_capacity(32);
        args.push("-y".into());
        push(&mut args, ["-f", "concat"]);
        // Clip paths are absolute, which the demuxer refuses in safe mode.
        push(&mut args, ["-safe", "0"]);
        args.push("-i".into());
        args.push(self.list_file.clone().into_os_string());
        self.profile.push_args(&mut args);
        args.push(self.output.clone().into_os_string());
        args
    }
}

fn push<const N: usize>(args: &mut Vec<OsString>, items: [&str; N]) {
    args.extend(items.into_iter().map(OsString::from));
}
