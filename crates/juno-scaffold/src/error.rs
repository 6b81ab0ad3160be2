//! Failure reasons for a scaffolding run

use crate::fetch::ArchiveKind;
use std::path::PathBuf;
use thiserror::Error;

/// Every way a create or update run can stop short of success.
///
/// The top-level dispatcher turns any of these into exit code 1 after
/// removing the temporary archives.
#[derive(Debug, Error)]
pub enum ScaffoldError {
    /// The user declined to update an existing project directory
    #[error("directory already exists and update was declined: {}", .0.display())]
    Declined(PathBuf),

    /// The server answered with a non-success status
    #[error("failed to fetch {kind} from {url}: HTTP {status}")]
    HttpStatus {
        kind: ArchiveKind,
        status: reqwest::StatusCode,
        url: String,
    },

    /// The request never produced a response (DNS, TLS, connection reset, ...)
    #[error("request to {url} failed")]
    Request {
        url: String,
        #[source]
        source: reqwest::Error,
    },

    /// The archive could not be unpacked
    #[error("failed to extract {}: {reason}", archive.display())]
    Extraction { archive: PathBuf, reason: String },

    /// The template archive did not contain its expected root folder
    #[error("extracted directory not found: {}", expected.display())]
    MissingTemplateRoot {
        expected: PathBuf,
        contents: Vec<String>,
    },

    /// An external command could not be started or exited unsuccessfully
    #[error("command `{command}` failed: {reason}")]
    Command { command: String, reason: String },

    #[error("{context}")]
    Io {
        context: String,
        #[source]
        source: std::io::Error,
    },

    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

impl ScaffoldError {
    /// Short tag for diagnostics, printed next to the message
    pub fn kind(&self) -> &'static str {
        match self {
            ScaffoldError::Declined(_) => "Declined",
            ScaffoldError::HttpStatus { .. } => "HttpStatus",
            ScaffoldError::Request { .. } => "Request",
            ScaffoldError::Extraction { .. } => "Extraction",
            ScaffoldError::MissingTemplateRoot { .. } => "MissingTemplateRoot",
            ScaffoldError::Command { .. } => "Command",
            ScaffoldError::Io { .. } => "Io",
            ScaffoldError::Other(_) => "Other",
        }
    }

    pub(crate) fn io(context: impl Into<String>, source: std::io::Error) -> Self {
        ScaffoldError::Io {
            context: context.into(),
            source,
        }
    }
}

/// Attach a message to an `io::Error`, in the spirit of `anyhow::Context`
pub(crate) trait IoContext<T> {
    fn io_context<F, S>(self, f: F) -> Result<T, ScaffoldError>
    where
        F: FnOnce() -> S,
        S: Into<String>;
}

impl<T> IoContext<T> for std::io::Result<T> {
    fn io_context<F, S>(self, f: F) -> Result<T, ScaffoldError>
    where
        F: FnOnce() -> S,
        S: Into<String>,
    {
        self.map_err(|e| ScaffoldError::io(f(), e))
    }
}

pub type Result<T, E = ScaffoldError> = std::result::Result<T, E>;
