use std::path::PathBuf;

use thiserror::Error;

pub type Result<T, E = Error> = std::result::Result<T, E>;

/// A malformed block in a MAINTAINERS file. `line` is the 1-based line number
/// on which the offending block starts.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{message} (block starting at line {line})")]
pub struct FormatError {
    pub message: String,
    pub line: usize,
}

impl FormatError {
    pub(crate) fn new(message: impl Into<String>, line: usize) -> FormatError {
        FormatError {
            message: message.into(),
            line,
        }
    }
}

/// A component title was queried that the index never produced.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("unknown component title: {0:?}")]
pub struct UnknownTitleError(pub String);

#[derive(Debug, Error)]
pub enum Error {
    #[error(transparent)]
    Format(#[from] FormatError),

    #[error(transparent)]
    UnknownTitle(#[from] UnknownTitleError),

    #[error("root of history reached at {revision} without finding {path}")]
    RootOfHistory { path: String, revision: String },

    #[error("unable to read {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("invalid change line {line:?}: {reason}")]
    InvalidChangeLine { line: String, reason: &'static str },

    #[error(transparent)]
    Source(Box<dyn std::error::Error + Send + Sync>),
}
