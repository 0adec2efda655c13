#![allow(dead_code)]

use std::ffi::OsString;
use std::path::{Path, PathBuf};
use std::sync::Mutex;

use splitcat_common::error::{SplitcatError, SplitcatResult};
use splitcat_transcode::ProcessRunner;

/// Records every invocation instead of spawning a process.
#[derive(Default)]
pub struct RecordingRunner {
    calls: Mutex<Vec<Vec<String>>>,
    concat_lists: Mutex<Vec<String>>,
    fail_when_arg_contains: Option<String>,
    missing_tool: bool,
}

impl RecordingRunner {
    pub fn new() -> Self {
        Self::default()
    }

    /// Fail any invocation with an argument containing `needle`.
    pub fn failing_on(needle: &str) -> Self {
        Self {
            fail_when_arg_contains: Some(needle.to_string()),
            ..Self::default()
        }
    }

    /// Behave as if the transcoder binary is not installed.
    pub fn missing_tool() -> Self {
        Self {
            missing_tool: true,
            ..Self::default()
        }
    }

    pub fn calls(&self) -> Vec<Vec<String>> {
        self.calls.lock().unwrap().clone()
    }

    /// Contents of each concat list file, read while the invocation ran.
    pub fn concat_lists(&self) -> Vec<String> {
        self.concat_lists.lock().unwrap().clone()
    }
}

impl ProcessRunner for RecordingRunner {
    fn ensure_available(&self) -> SplitcatResult<()> {
        if self.missing_tool {
            return Err(SplitcatError::ToolNotFound {
                program: "ffmpeg".to_string(),
            });
        }
        Ok(())
    }

    async fn run(&self, args: &[OsString]) -> SplitcatResult<()> {
        let args: Vec<String> = args
            .iter()
            .map(|a| a.to_string_lossy().into_owned())
            .collect();

        if args.iter().any(|a| a == "concat") {
            let input = args
                .iter()
                .position(|a| a == "-i")
                .and_then(|i| args.get(i + 1))
                .expect("concat invocation names its list file");
            let content = std::fs::read_to_string(input).expect("list file readable");
            self.concat_lists.lock().unwrap().push(content);
        }

        self.calls.lock().unwrap().push(args.clone());

        if let Some(needle) = &self.fail_when_arg_contains {
            if args.iter().any(|a| a.contains(needle.as_str())) {
                return Err(SplitcatError::process(format!(
                    "ffmpeg failed (exit status: 1): {needle}: Invalid data found"
                )));
            }
        }
        Ok(())
    }
}

pub fn touch(dir: &Path, name: &str) -> PathBuf {
    let path = dir.join(name);
    std::fs::write(&path, b"").unwrap();
    path
}

/// Files in `dir` whose name starts with `prefix`.
pub fn files_with_prefix(dir: &Path, prefix: &str) -> Vec<PathBuf> {
    std::fs::read_dir(dir)
        .unwrap()
        .map(|entry| entry.unwrap().path())
        .filter(|path| {
            path.file_name()
                .and_then(|n| n.to_str())
                .is_some_and(|n| n.starts_with(prefix))
        })
        .collect()
}
