//! Error types shared across movie-splitcat crates.

use std::path::Path;

/// Top-level error type for movie-splitcat operations.
#[derive(Debug, thiserror::Error)]
pub enum SplitcatError {
    #[error("I/O error ({context}): {source}")]
    Io {
        context: String,
        #[source]
        source: std::io::Error,
    },

    #[error("Parse error: {message}")]
    Parse { message: String },

    #[error("Validation error: {message}")]
    Validation { message: String },

    #[error("Process error: {message}")]
    Process { message: String },

    #[error("{program} timed out after {secs}s")]
    Timeout { program: String, secs: u64 },

    #[error("{program} not found (is it installed and on PATH?)")]
    ToolNotFound { program: String },

    #[error("Configuration error: {message}")]
    Config { message: String },

    #[error(transparent)]
    Json(#[from] serde_json::Error),
}

/// Result type alias using SplitcatError.
pub type SplitcatResult<T> = Result<T, SplitcatError>;

impl SplitcatError {
    pub fn io(context: impl Into<String>, source: std::io::Error) -> Self {
        Self::Io {
            context: context.into(),
            source,
        }
    }

    /// I/O failure on a specific path, e.g. `"open manifest"` + `split.txt`.
    pub fn io_at(action: &str, path: &Path, source: std::io::Error) -> Self {
        Self::io(format!("{action} {}", path.display()), source)
    }

    pub fn parse(msg: impl Into<String>) -> Self {
        Self::Parse {
            message: msg.into(),
        }
    }

    pub fn validation(msg: impl Into<String>) -> Self {
        Self::Validation {
            message: msg.into(),
        }
    }

    pub fn process(msg: impl Into<String>) -> Self {
        Self::Process {
            message: msg.into(),
        }
    }

    pub fn config(msg: impl Into<String>) -> Self {
        Self::Config {
            message: msg.into(),
        }
    }

    /// Wrap an error with a prefix while keeping its category.
    ///
    /// Used when a stage needs to say which id or file it was working on.
    pub fn context(self, prefix: impl std::fmt::Display) -> Self {
        match self {
            Self::Io { context, source } => Self::Io {
                context: format!("{prefix}: {context}"),
                source,
            },
            Self::Parse { message } => Self::parse(format!("{prefix}: {message}")),
            Self::Validation { message } => Self::validation(format!("{prefix}: {message}")),
            Self::Process { message } => Self::process(format!("{prefix}: {message}")),
            Self::Config { message } => Self::config(format!("{prefix}: {message}")),
            Self::Timeout { program, secs } => {
                Self::process(format!("{prefix}: {program} timed out after {secs}s"))
            }
            Self::ToolNotFound { program } => Self::ToolNotFound { program },
            Self::Json(err) => Self::config(format!("{prefix}: {err}")),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_io_at_names_path() {
        let err = SplitcatError::io_at(
            "open manifest",
            Path::new("split.txt"),
            std::io::Error::new(std::io::ErrorKind::NotFound, "no such file"),
        );
        assert_eq!(
            err.to_string(),
            "I/O error (open manifest split.txt): no such file"
        );
    }

    #[test]
    fn test_context_keeps_category() {
        let err = SplitcatError::process("ffmpeg exited with status 1").context("id A");
        assert!(matches!(err, SplitcatError::Process { .. }));
        assert_eq!(
            err.to_string(),
            "Process error: id A: ffmpeg exited with status 1"
        );
    }

    #[test]
    fn test_timeout_with_context_becomes_process_error() {
        let err = SplitcatError::Timeout {
            program: "ffmpeg".into(),
            secs: 1800,
        }
        .context("extract id B");
        assert!(matches!(err, SplitcatError::Process { .. }));
        assert!(err.to_string().contains("timed out after 1800s"));
    }
}
