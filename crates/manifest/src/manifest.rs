//! Split manifest: which time range to cut out of which source video.
//!
//! The manifest is tab-separated text with five columns per line:
//!
//! ```text
//! id    start    end    label_start    label_end
//! ```
//!
//! The first line with fewer than five fields ends the manifest section;
//! anything after it (notes, a second table) is ignored. A later line with
//! an id already seen replaces the earlier entry.

use std::collections::HashMap;
use std::fs::File;
use std::io::BufReader;
use std::path::Path;

use chrono::Duration;
use splitcat_common::error::{SplitcatError, SplitcatResult};

use crate::duration::{format_duration, parse_duration};

/// Number of tab-separated fields a manifest line must carry.
pub const MANIFEST_COLUMNS: usize = 5;

/// One segment to extract from the source video whose name starts with `id_`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SegmentDescriptor {
    /// Video identifier, matched against the source filename prefix.
    pub id: String,

    /// Offset into the source where the segment begins.
    pub start: Duration,

    /// Offset into the source where the segment ends. Never zero.
    pub end: Duration,

    /// Opaque label recorded for the start of the segment.
    pub label_start: String,

    /// Opaque label recorded for the end of the segment.
    pub label_end: String,
}

impl SegmentDescriptor {
    /// Build a descriptor from the first five fields of one manifest line.
    pub fn from_fields(fields: &[&str; MANIFEST_COLUMNS]) -> SplitcatResult<Self> {
        let [id, start, end, label_start, label_end] = *fields;
        let id = id.to_string();

        let start = parse_duration(start).map_err(|e| {
            SplitcatError::parse(format!("invalid start offset for id {id}: {e}"))
        })?;
        let end = parse_duration(end)
            .map_err(|e| SplitcatError::parse(format!("invalid end offset for id {id}: {e}")))?;

        if end == Duration::zero() {
            return Err(SplitcatError::validation(format!(
                "end offset is zero for id {id}"
            )));
        }

        Ok(Self {
            id,
            start,
            end,
            label_start: label_start.to_string(),
            label_end: label_end.to_string(),
        })
    }

    /// Build a descriptor from raw line fields.
    ///
    /// Id and offsets must be UTF-8. Labels are opaque and decoded lossily,
    /// so a label in a legacy encoding never fails the line.
    fn from_raw_fields(fields: &[&[u8]], line_no: usize) -> SplitcatResult<Self> {
        let id = std::str::from_utf8(fields[0]).map_err(|_| {
            SplitcatError::parse(format!("id on line {line_no} is not valid UTF-8"))
        })?;
        let start = std::str::from_utf8(fields[1]).map_err(|_| {
            SplitcatError::parse(format!("invalid start offset for id {id}: not valid UTF-8"))
        })?;
        let end = std::str::from_utf8(fields[2]).map_err(|_| {
            SplitcatError::parse(format!("invalid end offset for id {id}: not valid UTF-8"))
        })?;
        let label_start = String::from_utf8_lossy(fields[3]);
        let label_end = String::from_utf8_lossy(fields[4]);

        Self::from_fields(&[id, start, end, &*label_start, &*label_end])
    }

    /// Seek position handed to the transcoder, truncated to whole seconds.
    pub fn start_secs(&self) -> i64 {
        self.start.num_seconds()
    }

    /// Segment length handed to the transcoder, truncated to whole seconds.
    ///
    /// Zero or negative when `end <= start`; nothing upstream rejects that.
    pub fn duration_secs(&self) -> i64 {
        (self.end - self.start).num_seconds()
    }

    /// Render the descriptor back into a manifest line (no trailing newline).
    pub fn to_line(&self) -> String {
        let start = format_duration(self.start);
        let end = format_duration(self.end);
        [
            self.id.as_str(),
            start.as_str(),
            end.as_str(),
            self.label_start.as_str(),
            self.label_end.as_str(),
        ]
        .join("\t")
    }
}

/// Segments keyed by video id.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Manifest {
    segments: HashMap<String, SegmentDescriptor>,
}

impl Manifest {
    /// Create an empty manifest.
    pub fn new() -> Self {
        Self::default()
    }

    /// Read and parse a manifest file.
    pub fn read(path: &Path) -> SplitcatResult<Self> {
        let file = File::open(path).map_err(|e| SplitcatError::io_at("open manifest", path, e))?;
        let manifest = Self::parse(BufReader::new(file))
            .map_err(|e| e.context(format!("manifest {}", path.display())))?;
        tracing::debug!(
            path = %path.display(),
            segments = manifest.len(),
            "Manifest parsed"
        );
        Ok(manifest)
    }

    /// Parse manifest lines from any buffered reader.
    pub fn parse<R: std::io::BufRead>(reader: R) -> SplitcatResult<Self> {
        let mut manifest = Self::new();

        for (index, line) in reader.split(b'\n').enumerate() {
            let line_no = index + 1;
            let line =
                line.map_err(|e| SplitcatError::io(format!("read line {line_no}"), e))?;
            let line = line.strip_suffix(b"\r").unwrap_or(&line);

            let fields: Vec<&[u8]> = line.split(|&b| b == b'\t').collect();
            if fields.len() < MANIFEST_COLUMNS {
                tracing::debug!(
                    line = line_no,
                    fields = fields.len(),
                    "Short manifest line, ignoring the rest of the file"
                );
                break;
            }

            let segment = SegmentDescriptor::from_raw_fields(&fields, line_no)?;
            if let Some(previous) = manifest.insert(segment) {
                tracing::debug!(id = %previous.id, line = line_no, "Duplicate id replaces earlier entry");
            }
        }

        Ok(manifest)
    }

    /// Insert a segment, returning the one it replaced.
    pub fn insert(&mut self, segment: SegmentDescriptor) -> Option<SegmentDescriptor> {
        self.segments.insert(segment.id.clone(), segment)
    }

    /// Look up the segment for a video id.
    pub fn get(&self, id: &str) -> Option<&SegmentDescriptor> {
        self.segments.get(id)
    }

    /// Number of segments.
    pub fn len(&self) -> usize {
        self.segments.len()
    }

    /// Whether the manifest holds no segments.
    pub fn is_empty(&self) -> bool {
        self.segments.is_empty()
    }

    /// Iterate segments in arbitrary order.
    pub fn iter(&self) -> impl Iterator<Item = &SegmentDescriptor> {
        self.segments.values()
    }
}

impl FromIterator<SegmentDescriptor> for Manifest {
    fn from_iter<I: IntoIterator<Item = SegmentDescriptor>>(iter: I) -> Self {
        let mut manifest = Self::new();
        for segment in iter {
            manifest.insert(segment);
        }
        manifest
    }
}
