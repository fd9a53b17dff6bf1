//! Collaborators that supply the engine's inputs: MAINTAINERS text, the
//! changed paths of a revision and the identities that approved it.

use std::{
    fmt::Display,
    fs,
    path::{Path, PathBuf},
};

use crate::{
    change::ChangedPathEntry,
    error::{Error, Result},
    review::Identity,
};

pub trait OwnershipSource {
    /// Raw contents of the most recent MAINTAINERS file.
    fn fetch_latest(&self) -> Result<String>;
}

/// Changed paths for a revision, with rename detection already done.
pub trait ChangeSource<R: ?Sized> {
    fn list_changed_entries(&self, revision: &R) -> Result<Vec<ChangedPathEntry>>;
}

pub trait ApproverSource<R: ?Sized> {
    fn list_approvers(&self, revision: &R) -> Result<Vec<Identity>>;
}

/// Reads the MAINTAINERS file straight from disk.
#[derive(Debug, Clone)]
pub struct FileOwnershipSource {
    path: PathBuf,
}

impl FileOwnershipSource {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl OwnershipSource for FileOwnershipSource {
    fn fetch_latest(&self) -> Result<String> {
        fs::read_to_string(&self.path).map_err(|source| Error::Io {
            path: self.path.clone(),
            source,
        })
    }
}

impl OwnershipSource for str {
    fn fetch_latest(&self) -> Result<String> {
        Ok(self.to_owned())
    }
}

/// Read access to a version-control history, just enough to locate a file.
pub trait History {
    type Revision: Clone + Display;

    /// First parent of `revision`, or `None` at the root of history.
    fn parent(&self, revision: &Self::Revision) -> Result<Option<Self::Revision>>;

    /// Contents of `path` at `revision`, or `None` if it doesn't exist there.
    fn read_file(&self, revision: &Self::Revision, path: &str) -> Result<Option<String>>;
}

/// Finds the most recent version of the MAINTAINERS file, starting at `head`
/// and following first parents until the file is found.
pub struct HistoryOwnershipSource<H: History> {
    history: H,
    head: H::Revision,
    path: String,
}

impl<H: History> HistoryOwnershipSource<H> {
    pub fn new(history: H, head: H::Revision, path: impl Into<String>) -> Self {
        Self {
            history,
            head,
            path: path.into(),
        }
    }
}

impl<H: History> OwnershipSource for HistoryOwnershipSource<H> {
    fn fetch_latest(&self) -> Result<String> {
        let mut revision = self.head.clone();
        tracing::info!(revision = %revision, path = %self.path, "starting search");
        loop {
            if let Some(content) = self.history.read_file(&revision, &self.path)? {
                tracing::info!(revision = %revision, "maintainers file found");
                return Ok(content);
            }

            match self.history.parent(&revision)? {
                Some(parent) => {
                    tracing::info!(revision = %revision, "maintainers file not found, going deeper");
                    revision = parent;
                }
                None => {
                    return Err(Error::RootOfHistory {
                        path: self.path.clone(),
                        revision: revision.to_string(),
                    })
                }
            }
        }
    }
}
