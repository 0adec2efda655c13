//! Running the transcoder as a child process.

use std::ffi::OsString;
use std::future::Future;
use std::path::PathBuf;
use std::process::Stdio;
use std::time::{Duration, Instant};

use splitcat_common::error::{SplitcatError, SplitcatResult};
use tokio::process::Command;

/// Deadline for a single transcoder invocation.
pub const COMMAND_TIMEOUT: Duration = Duration::from_secs(30 * 60);

/// Lines of transcoder stderr kept in a failure message.
const STDERR_TAIL_LINES: usize = 20;

/// Executes one transcoder invocation to completion.
pub trait ProcessRunner {
    /// Run with `args`, succeeding only if the process exits cleanly.
    fn run(&self, args: &[OsString]) -> impl Future<Output = SplitcatResult<()>>;

    /// Fail early if the transcoder cannot be started at all.
    fn ensure_available(&self) -> SplitcatResult<()> {
        Ok(())
    }
}

/// Runs the real `ffmpeg` binary.
#[derive(Debug, Clone)]
pub struct FfmpegRunner {
    program: PathBuf,
    timeout: Duration,
}

impl Default for FfmpegRunner {
    fn default() -> Self {
        Self::new("ffmpeg")
    }
}

impl FfmpegRunner {
    pub fn new(program: impl Into<PathBuf>) -> Self {
        Self {
            program: program.into(),
            timeout: COMMAND_TIMEOUT,
        }
    }

    /// Override the per-invocation deadline.
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Resolve the program on `PATH` (or check it directly if it has a
    /// directory component).
    pub fn check_available(&self) -> SplitcatResult<PathBuf> {
        which::which(&self.program).map_err(|_| SplitcatError::ToolNotFound {
            program: self.program_name(),
        })
    }

    fn program_name(&self) -> String {
        self.program.display().to_string()
    }
}

impl ProcessRunner for FfmpegRunner {
    fn ensure_available(&self) -> SplitcatResult<()> {
        let resolved = self.check_available()?;
        tracing::debug!(ffmpeg = %resolved.display(), "Using transcoder");
        Ok(())
    }

    async fn run(&self, args: &[OsString]) -> SplitcatResult<()> {
        let program = self.program_name();
        tracing::debug!(program = %program, ?args, "Running transcoder");

        let child = Command::new(&self.program)
            .args(args)
            .stdin(Stdio::null())
            .stdout(Stdio::null())
            .stderr(Stdio::piped())
            .kill_on_drop(true)
            .spawn()
            .map_err(|e| match e.kind() {
                std::io::ErrorKind::NotFound => SplitcatError::ToolNotFound {
                    program: program.clone(),
                },
                _ => SplitcatError::io(format!("start {program}"), e),
            })?;

        let started = Instant::now();
        // Dropping the wait future on timeout drops the child, which kills it.
        let output = match tokio::time::timeout(self.timeout, child.wait_with_output()).await {
            Ok(result) => result.map_err(|e| SplitcatError::io(format!("wait on {program}"), e))?,
            Err(_) => {
                tracing::warn!(
                    program = %program,
                    timeout_secs = self.timeout.as_secs(),
                    "Transcoder timed out, killing process"
                );
                return Err(SplitcatError::Timeout {
                    program,
                    secs: self.timeout.as_secs(),
                });
            }
        };

        tracing::debug!(
            program = %program,
            status = %output.status,
            elapsed_ms = started.elapsed().as_millis(),
            "Transcoder exited"
        );

        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            return Err(SplitcatError::process(format!(
                "{program} failed ({}): {}",
                output.status,
                stderr_tail(&stderr, STDERR_TAIL_LINES)
            )));
        }
        Ok(())
    }
}

/// Last `lines` non-empty lines of `stderr`, newline-joined.
fn stderr_tail(stderr: &str, lines: usize) -> String {
    let kept: Vec<&str> = stderr
        .lines()
        .map(str::trim_end)
        .filter(|line| !line.is_empty())
        .collect();
    kept[kept.len().saturating_sub(lines)..].join("\n")
}
