//! The whole run: manifest → clips → concat list → output.

use std::path::PathBuf;

use splitcat_common::error::SplitcatResult;
use splitcat_manifest::Manifest;

use crate::concat::{concat_clips, write_concat_list};
use crate::extract::extract_segments;
use crate::runner::ProcessRunner;

/// Inputs of a run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PipelinePaths {
    /// Tab-separated split manifest.
    pub manifest: PathBuf,

    /// Directory scanned for `<id>_*.mp4` sources.
    pub source_dir: PathBuf,

    /// Directory for extracted clips and the concat list.
    pub temp_dir: PathBuf,
}

impl Default for PipelinePaths {
    fn default() -> Self {
        Self {
            manifest: PathBuf::from("./split.txt"),
            source_dir: PathBuf::from("."),
            temp_dir: PathBuf::from("."),
        }
    }
}

/// Pipeline stages, in execution order.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Stage {
    ReadManifest,
    ExtractSegments,
    WriteConcatList,
    Concatenate,
}

impl Stage {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::ReadManifest => "read manifest",
            Self::ExtractSegments => "extract segments",
            Self::WriteConcatList => "write concat list",
            Self::Concatenate => "concatenate",
        }
    }
}

/// Run all stages and return the path of the rendered output.
///
/// The concat list is removed when this returns, whatever the outcome.
pub async fn run_pipeline<R: ProcessRunner>(
    paths: &PipelinePaths,
    runner: &R,
) -> SplitcatResult<PathBuf> {
    let manifest = stage(Stage::ReadManifest, Manifest::read(&paths.manifest))?;
    tracing::info!(
        path = %paths.manifest.display(),
        segments = manifest.len(),
        "Manifest read"
    );

    // Checked after the manifest so a bad manifest is reported first.
    stage(Stage::ExtractSegments, runner.ensure_available())?;

    let clips = stage(
        Stage::ExtractSegments,
        extract_segments(&paths.source_dir, &paths.temp_dir, &manifest, runner).await,
    )?;
    tracing::info!(clips = clips.len(), "Segments extracted");

    let list = stage(
        Stage::WriteConcatList,
        write_concat_list(&paths.temp_dir, &clips),
    )?;
    tracing::info!(path = %list.path().display(), "Concat list written");

    let output = stage(Stage::Concatenate, concat_clips(&list, runner).await)?;
    tracing::info!(output = %output.display(), "Output rendered");

    Ok(output)
}

fn stage<T>(stage: Stage, result: SplitcatResult<T>) -> SplitcatResult<T> {
    result.map_err(|e| {
        tracing::warn!(stage = stage.as_str(), error = %e, "Stage failed");
        e.context(stage.as_str())
    })
}
