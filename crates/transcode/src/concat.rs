//! Concat list generation and the final merge.

use std::io::{BufWriter, Write};
use std::path::{Component, Path, PathBuf};

use splitcat_common::error::{SplitcatError, SplitcatResult};
use tempfile::NamedTempFile;

use crate::command::ConcatCommand;
use crate::runner::ProcessRunner;

/// Name prefix of the generated list file.
pub const CONCAT_LIST_PREFIX: &str = "_concat_";

/// A concat demuxer list on disk. The file is deleted when this is dropped.
#[derive(Debug)]
pub struct ConcatList {
    file: NamedTempFile,
    entries: usize,
}

impl ConcatList {
    /// Path of the list file.
    pub fn path(&self) -> &Path {
        self.file.path()
    }

    /// Number of clips listed.
    pub fn len(&self) -> usize {
        self.entries
    }

    pub fn is_empty(&self) -> bool {
        self.entries == 0
    }
}

/// Write a list file naming `clips` in order, as absolute paths.
///
/// The file gets a unique name inside `temp_dir`. If any write fails the
/// partial file is removed before the error is returned.
pub fn write_concat_list(temp_dir: &Path, clips: &[PathBuf]) -> SplitcatResult<ConcatList> {
    if clips.is_empty() {
        return Err(SplitcatError::validation(
            "no source file matched a manifest entry, nothing to concatenate",
        ));
    }

    let cwd = std::env::current_dir()
        .map_err(|e| SplitcatError::io("resolve working directory", e))?;

    let file = tempfile::Builder::new()
        .prefix(CONCAT_LIST_PREFIX)
        .tempfile_in(temp_dir)
        .map_err(|e| SplitcatError::io_at("create concat list in", temp_dir, e))?;

    {
        let mut writer = BufWriter::new(file.as_file());
        for clip in clips {
            let entry = concat_entry(&absolute_path(&cwd, clip));
            writeln!(writer, "{entry}")
                .map_err(|e| SplitcatError::io_at("write concat list", file.path(), e))?;
        }
        writer
            .flush()
            .map_err(|e| SplitcatError::io_at("write concat list", file.path(), e))?;
    }

    Ok(ConcatList {
        file,
        entries: clips.len(),
    })
}

/// Re-encode the clips in `list` into the final output and return its path.
pub async fn concat_clips<R: ProcessRunner>(
    list: &ConcatList,
    runner: &R,
) -> SplitcatResult<PathBuf> {
    let command = ConcatCommand::new(list.path());
    tracing::debug!(
        list = %list.path().display(),
        clips = list.len(),
        output = %command.output.display(),
        "Concatenating clips"
    );
    runner.run(&command.build_args()).await?;
    Ok(command.output)
}

/// One list line. Single quotes are closed, escaped and reopened.
fn concat_entry(path: &Path) -> String {
    format!("file '{}'", path.to_string_lossy().replace('\'', r"'\''"))
}

/// `path` made absolute against `cwd` and cleaned lexically. Symlinks are
/// left alone.
fn absolute_path(cwd: &Path, path: &Path) -> PathBuf {
    let joined = if path.is_absolute() {
        path.to_path_buf()
    } else {
        cwd.join(path)
    };

    let mut cleaned = PathBuf::new();
    for component in joined.components() {
        match component {
            Component::CurDir => {}
            Component::ParentDir => {
                cleaned.pop();
            }
            other => cleaned.push(other.as_os_str()),
        }
    }
    cleaned
}
