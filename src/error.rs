// src/error.rs
use std::path::{Path, PathBuf};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ForgeError {
    #[error("{context}: {source} (path: {path})")]
    Filesystem {
        context: String,
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("{tool} not available: {reason}")]
    ToolUnavailable { tool: &'static str, reason: String },

    #[error("{tool} failed: {detail}")]
    ToolExecution { tool: &'static str, detail: String },

    #[error("{metric} {actual} < {threshold}")]
    ThresholdViolation {
        metric: &'static str,
        actual: u32,
        threshold: u32,
    },
}

pub type ForgeResult<T> = std::result::Result<T, ForgeError>;

impl ForgeError {
    pub fn filesystem(context: impl Into<String>, path: &Path, source: std::io::Error) -> Self {
        Self::Filesystem {
            context: context.into(),
            path: path.to_path_buf(),
            source,
        }
    }

    pub fn unavailable(tool: &'static str, reason: impl Into<String>) -> Self {
        Self::ToolUnavailable {
            tool,
            reason: reason.into(),
        }
    }

    pub fn execution(tool: &'static str, detail: impl Into<String>) -> Self {
        Self::ToolExecution {
            tool,
            detail: detail.into(),
        }
    }

    /// True when the failure means the collaborator is absent rather than broken.
    #[must_use]
    pub fn is_unavailable(&self) -> bool {
        matches!(self, Self::ToolUnavailable { .. })
    }
}

// Allow `?` on std::io::Error by converting to ForgeError::Filesystem with unknown path.
impl From<std::io::Error> for ForgeError {
    fn from(source: std::io::Error) -> Self {
        ForgeError::Filesystem {
            context: "I/O error".to_string(),
            path: PathBuf::from("<unknown>"),
            source,
        }
    }
}

// Keep the path walkdir was visiting when it failed.
impl From<walkdir::Error> for ForgeError {
    fn from(e: walkdir::Error) -> Self {
        let path = e
            .path()
            .map_or_else(|| PathBuf::from("<unknown>"), Path::to_path_buf);
        let message = e.to_string();
        let source = e
            .into_io_error()
            .unwrap_or_else(|| std::io::Error::new(std::io::ErrorKind::Other, message));
        ForgeError::Filesystem {
            context: "failed to read directory".to_string(),
            path,
            source,
        }
    }
}
