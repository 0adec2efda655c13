//! Segment extraction: one stream-copied clip per matched source file.

use std::path::{Path, PathBuf};

use splitcat_common::error::{SplitcatError, SplitcatResult};
use splitcat_manifest::Manifest;

use crate::command::ExtractCommand;
use crate::runner::ProcessRunner;

/// Extension a source file must carry to be considered.
pub const SOURCE_EXTENSION: &str = ".mp4";

/// Suffix appended to the id to name an extracted clip.
pub const CLIP_SUFFIX: &str = "_movie-splitcat.mp4";

/// Where the clip for `id` lives inside `temp_dir`.
pub fn clip_path(temp_dir: &Path, id: &str) -> PathBuf {
    temp_dir.join(format!("{id}{CLIP_SUFFIX}"))
}

/// The id encoded in a source file name: everything before the first `_`.
pub fn source_id(file_name: &str) -> Option<&str> {
    file_name.split_once('_').map(|(id, _)| id)
}

/// `*.mp4` entries directly inside `source_dir`, sorted by path.
pub fn list_sources(source_dir: &Path) -> SplitcatResult<Vec<PathBuf>> {
    let entries = std::fs::read_dir(source_dir)
        .map_err(|e| SplitcatError::io_at("read source directory", source_dir, e))?;

    let mut sources = Vec::new();
    for entry in entries {
        let entry =
            entry.map_err(|e| SplitcatError::io_at("read source directory", source_dir, e))?;
        let name = entry.file_name();
        match name.to_str() {
            Some(name) if name.ends_with(SOURCE_EXTENSION) => sources.push(entry.path()),
            Some(_) => {}
            None => tracing::debug!(
                name = %name.to_string_lossy(),
                "Skipping source with a non UTF-8 name"
            ),
        }
    }
    sources.sort();
    Ok(sources)
}

/// Cut every source that has a manifest entry into `temp_dir`.
///
/// Returns clip paths in source order. Clips already present are reused
/// without invoking the transcoder. The first failed invocation aborts the
/// stage; clips written before it stay on disk for the next run.
pub async fn extract_segments<R: ProcessRunner>(
    source_dir: &Path,
    temp_dir: &Path,
    manifest: &Manifest,
    runner: &R,
) -> SplitcatResult<Vec<PathBuf>> {
    std::fs::create_dir_all(temp_dir)
        .map_err(|e| SplitcatError::io_at("create temp directory", temp_dir, e))?;

    let sources = list_sources(source_dir)?;
    tracing::debug!(
        dir = %source_dir.display(),
        sources = sources.len(),
        "Source files found"
    );

    let mut clips = Vec::new();
    for source in &sources {
        let Some(id) = source
            .file_name()
            .and_then(|name| name.to_str())
            .and_then(source_id)
        else {
            tracing::debug!(src = %source.display(), "No id prefix in source name, skipping");
            continue;
        };
        let Some(segment) = manifest.get(id) else {
            tracing::debug!(id, src = %source.display(), "No manifest entry for source, skipping");
            continue;
        };

        let clip = clip_path(temp_dir, &segment.id);
        if clip.exists() {
            tracing::info!(
                id,
                src = %source.display(),
                dst = %clip.display(),
                "Segment already extracted"
            );
        } else {
            let command = ExtractCommand::for_segment(segment, source, &clip);
            if command.duration_secs <= 0 {
                tracing::warn!(
                    id,
                    start_secs = command.start_secs,
                    duration_secs = command.duration_secs,
                    "Segment does not end after it starts; passing the duration through unchanged"
                );
            }
            runner
                .run(&command.build_args())
                .await
                .map_err(|e| e.context(format!("extract id {id} from {}", source.display())))?;
            tracing::info!(
                id,
                src = %source.display(),
                dst = %clip.display(),
                "Segment extracted"
            );
        }
        clips.push(clip);
    }

    Ok(clips)
}
