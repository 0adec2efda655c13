//! movie-splitcat Manifest Model
//!
//! Defines the data read from a split manifest:
//! - **Durations:** compound `number+unit` offsets such as `1h2m3.5s`
//! - **Segments:** one time range inside a source video, keyed by id
//! - **Manifest:** the id-to-segment mapping read from the tab-separated file
//!
//! Offsets are signed nanosecond durations; the transcoder only ever sees
//! them truncated to whole seconds.

pub mod duration;
pub mod manifest;

pub use duration::*;
pub use manifest::*;
