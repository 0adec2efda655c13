//! movie-splitcat Transcode Pipeline
//!
//! Drives the external transcoder for the three stages of a run:
//! 1. cut one stream-copied clip per manifest segment
//! 2. write the concat demuxer's list file
//! 3. re-encode the listed clips into the final output
//!
//! Commands are typed builders; execution goes through [`runner::ProcessRunner`]
//! so the stages can run against a fake in tests.

pub mod command;
pub mod concat;
pub mod extract;
pub mod pipeline;
pub mod runner;

pub use command::{ConcatCommand, EncodeProfile, ExtractCommand, CONCAT_OUTPUT, TARGET_PROFILE};
pub use concat::{concat_clips, write_concat_list, ConcatList};
pub use extract::{clip_path, extract_segments};
pub use pipeline::{run_pipeline, PipelinePaths, Stage};
pub use runner::{FfmpegRunner, ProcessRunner, COMMAND_TIMEOUT};
