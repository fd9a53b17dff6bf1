use std::collections::BTreeSet;

use crate::{
    component::PathPattern,
    error::{Error, Result},
    index::OwnershipIndex,
};

/// Pseudo-path under which review tools list the commit message. It is not a
/// file and never needs a component review.
pub const COMMIT_MSG_PATH: &str = "/COMMIT_MSG";

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum ChangeKind {
    Added,
    Deleted,
    Modified,
    Renamed,
    Copied,
}

/// A changed path in a revision. Only renames and copies have an old name.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct ChangedPathEntry {
    pub old_name: Option<String>,
    pub new_name: String,
    pub kind: ChangeKind,
}

impl ChangedPathEntry {
    pub fn new(old_name: Option<String>, new_name: impl Into<String>, kind: ChangeKind) -> Self {
        ChangedPathEntry {
            old_name,
            new_name: new_name.into(),
            kind,
        }
    }

    pub fn added(path: impl Into<String>) -> Self {
        Self::new(None, path, ChangeKind::Added)
    }

    pub fn modified(path: impl Into<String>) -> Self {
        Self::new(None, path, ChangeKind::Modified)
    }

    pub fn deleted(path: impl Into<String>) -> Self {
        Self::new(None, path, ChangeKind::Deleted)
    }

    pub fn renamed(old_name: impl Into<String>, new_name: impl Into<String>) -> Self {
        Self::new(Some(old_name.into()), new_name, ChangeKind::Renamed)
    }

    pub fn copied(old_name: impl Into<String>, new_name: impl Into<String>) -> Self {
        Self::new(Some(old_name.into()), new_name, ChangeKind::Copied)
    }

    /// Parse one line of `git diff --name-status` output, e.g. `M\tsrc/a.c` or
    /// `R087\told.c\tnew.c`.
    pub fn from_name_status(line: &str) -> Result<Self> {
        let invalid = |reason| Error::InvalidChangeLine {
            line: line.to_owned(),
            reason,
        };

        let mut fields = line.trim_end_matches(['\r', '\n']).split('\t');
        let status = fields.next().unwrap_or_default();
        let paths = fields.collect::<Vec<_>>();
        let Some(code) = status.chars().next() else {
            return Err(invalid("missing status"));
        };
        if !status[code.len_utf8()..].chars().all(|c| c.is_ascii_digit()) {
            return Err(invalid("unexpected characters after status"));
        }

        match (code, paths.as_slice()) {
            ('A', [path]) => Ok(Self::added(*path)),
            ('D', [path]) => Ok(Self::deleted(*path)),
            ('M' | 'T', [path]) => Ok(Self::modified(*path)),
            ('R', [old, new]) => Ok(Self::renamed(*old, *new)),
            ('C', [old, new]) => Ok(Self::copied(*old, *new)),
            ('A' | 'D' | 'M' | 'T' | 'R' | 'C', _) => Err(invalid("wrong number of paths")),
            _ => Err(invalid("unknown status")),
        }
    }

    /// The path ownership is resolved against. Matching is keyed off the old
    /// name so a rename can't silently drop coverage; new files only have a
    /// new name.
    pub fn governing_path(&self) -> &str {
        self.old_name.as_deref().unwrap_or(&self.new_name)
    }

    pub fn is_commit_metadata(&self) -> bool {
        self.new_name == COMMIT_MSG_PATH
    }
}

/// Parse `git diff --name-status` output, skipping blank lines.
pub fn parse_name_status(output: &str) -> Result<Vec<ChangedPathEntry>> {
    output
        .lines()
        .filter(|line| !line.trim().is_empty())
        .map(ChangedPathEntry::from_name_status)
        .collect()
}

/// Entries that are actual files, i.e. everything but the commit message.
pub fn relevant_entries(entries: &[ChangedPathEntry]) -> impl Iterator<Item = &ChangedPathEntry> {
    entries.iter().filter(|entry| !entry.is_commit_metadata())
}

/// A component a renamed file belonged to under its old name, along with the
/// pattern it matched.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct InvalidMembership {
    pub component_title: String,
    pub pattern: PathPattern,
}

/// A renamed file that no longer matches some of the patterns that owned it
/// before the rename.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct RenameDriftWarning {
    pub old_name: String,
    pub new_name: String,
    pub invalid_components: BTreeSet<InvalidMembership>,
}

/// Find renames that drop component membership: a pattern that best matched
/// the old name no longer best matches the new one. Only memberships being
/// lost are reported; a file gaining a new component goes unnoticed.
pub fn detect_rename_drift(
    index: &OwnershipIndex,
    entries: &[ChangedPathEntry],
) -> Vec<RenameDriftWarning> {
    entries
        .iter()
        .filter(|entry| entry.kind == ChangeKind::Renamed)
        .filter_map(|entry| {
            let old_name = entry.old_name.as_ref()?;
            let (old_patterns, new_patterns) = index.components_for_changed_entry(entry);
            let invalid_components = old_patterns
                .difference(&new_patterns)
                .filter_map(|pattern| {
                    Some(InvalidMembership {
                        component_title: index.component_for_path(pattern)?.to_owned(),
                        pattern: pattern.clone(),
                    })
                })
                .collect::<BTreeSet<_>>();

            if invalid_components.is_empty() {
                return None;
            }
            tracing::debug!(
                old_name = %old_name,
                new_name = %entry.new_name,
                count = invalid_components.len(),
                "rename leaves components"
            );
            Some(RenameDriftWarning {
                old_name: old_name.clone(),
                new_name: entry.new_name.clone(),
                invalid_components,
            })
        })
        .collect()
}
