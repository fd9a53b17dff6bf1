use std::collections::BTreeSet;

use crate::{
    change::{detect_rename_drift, relevant_entries, ChangedPathEntry, RenameDriftWarning},
    component::{Component, Maintainer},
    error::{FormatError, Result},
    index::{ComponentReviewInfo, OwnershipIndex},
    parser,
    review::{evaluate_with, ByDisplayName, Identity, IdentityJoin, PatchsetReviewInfo},
    source::{ApproverSource, ChangeSource, OwnershipSource},
};

/// Answers ownership and review questions for one snapshot of a MAINTAINERS
/// file. Build a new one whenever the file may have changed.
#[derive(Debug, Clone)]
pub struct Engine<J = ByDisplayName> {
    index: OwnershipIndex,
    join: J,
}

impl Engine {
    pub fn new(components: Vec<Component>) -> Engine {
        Engine {
            index: OwnershipIndex::new(components),
            join: ByDisplayName,
        }
    }

    pub fn parse(source: &str) -> Result<Engine, FormatError> {
        Ok(Engine::new(parser::parse(source)?))
    }

    pub fn from_source(source: &(impl OwnershipSource + ?Sized)) -> Result<Engine> {
        Ok(Engine::parse(&source.fetch_latest()?)?)
    }
}

impl<J: IdentityJoin> Engine<J> {
    /// Replace the way approvers are joined to maintainers.
    pub fn with_join<K: IdentityJoin>(self, join: K) -> Engine<K> {
        Engine {
            index: self.index,
            join,
        }
    }

    pub fn index(&self) -> &OwnershipIndex {
        &self.index
    }

    pub fn resolve_ownership(&self, path: &str) -> ComponentReviewInfo {
        self.index.best_match_for_path(path)
    }

    pub fn detect_rename_drift(&self, entries: &[ChangedPathEntry]) -> Vec<RenameDriftWarning> {
        detect_rename_drift(&self.index, entries)
    }

    pub fn evaluate_review(
        &self,
        entries: &[ChangedPathEntry],
        approvers: &[Identity],
    ) -> PatchsetReviewInfo {
        evaluate_with(&self.index, entries, approvers, &self.join)
    }

    /// Ownership of the governing path of every changed file.
    pub fn review_infos(&self, entries: &[ChangedPathEntry]) -> Vec<ComponentReviewInfo> {
        relevant_entries(entries)
            .map(|entry| self.resolve_ownership(entry.governing_path()))
            .collect()
    }

    /// Maintainers of every component touched by the change.
    pub fn suggested_reviewers(&self, entries: &[ChangedPathEntry]) -> BTreeSet<Maintainer> {
        self.review_infos(entries)
            .into_iter()
            .flat_map(|info| info.maintainers)
            .collect()
    }

    /// Fetch a revision's changes and approvals and evaluate them.
    pub fn evaluate_revision<R: ?Sized>(
        &self,
        changes: &impl ChangeSource<R>,
        approvers: &impl ApproverSource<R>,
        revision: &R,
    ) -> Result<PatchsetReviewInfo> {
        let entries = changes.list_changed_entries(revision)?;
        let approvers = approvers.list_approvers(revision)?;
        Ok(self.evaluate_review(&entries, &approvers))
    }
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;

    use super::*;
    use crate::{
        error::Error,
        review::{ByEmail, ReviewState},
    };

    const MAINTAINERS: &str = "\
-----
VLIB Library
M: Damjan Marion <damarion@cisco.com>
M: Dave Barach <dave@barachs.net>
F: src/vlib/

Build System
M: Damjan Marion <damarion@cisco.com>
F: Makefile
F: src/*.mk
";

    struct Revisions {
        changes: HashMap<u32, Vec<ChangedPathEntry>>,
        approvals: HashMap<u32, Vec<Identity>>,
    }

    fn unknown_revision(revision: u32) -> Error {
        Error::Source(format!("no such revision: {revision}").into())
    }

    impl ChangeSource<u32> for Revisions {
        fn list_changed_entries(&self, revision: &u32) -> Result<Vec<ChangedPathEntry>> {
            self.changes
                .get(revision)
                .cloned()
                .ok_or_else(|| unknown_revision(*revision))
        }
    }

    impl ApproverSource<u32> for Revisions {
        fn list_approvers(&self, revision: &u32) -> Result<Vec<Identity>> {
            Ok(self.approvals.get(revision).cloned().unwrap_or_default())
        }
    }

    #[test]
    fn test_evaluate_revision() {
        let engine = Engine::from_source(MAINTAINERS).unwrap();
        let revisions = Revisions {
            changes: HashMap::from([(
                7,
                vec![
                    ChangedPathEntry::modified("src/vlib/main.c"),
                    ChangedPathEntry::modified("Makefile"),
                ],
            )]),
            approvals: HashMap::from([(
                7,
                vec![Identity::new("Damjan Marion", "damarion@cisco.com")],
            )]),
        };

        let info = engine.evaluate_revision(&revisions, &revisions, &7u32).unwrap();
        assert_eq!(info.state, ReviewState::AllComponentsReviewed);

        match engine.evaluate_revision(&revisions, &revisions, &8u32) {
            Err(Error::Source(err)) => assert_eq!(err.to_string(), "no such revision: 8"),
            other => panic!("expected source error, got {:?}", other),
        }
    }

    #[test]
    fn test_suggested_reviewers() {
        let engine = Engine::parse(MAINTAINERS).unwrap();
        let entries = vec![ChangedPathEntry::modified("src/vpp.mk")];
        assert_eq!(
            engine.suggested_reviewers(&entries),
            BTreeSet::from([Maintainer::new("Damjan Marion", "damarion@cisco.com")])
        );
        assert_eq!(engine.review_infos(&entries).len(), 1);
    }

    #[test]
    fn test_with_join() {
        let engine = Engine::parse(MAINTAINERS).unwrap().with_join(ByEmail);
        let entries = vec![ChangedPathEntry::modified("src/vlib/main.c")];
        let info = engine.evaluate_review(&entries, &[Identity::new("dbarach", "dave@barachs.net")]);
        assert!(info.is_complete());
    }

    #[test]
    fn test_malformed_file() {
        let result = Engine::from_source("-----\nTitle\nOther title\nF: a/\n");
        assert!(matches!(result, Err(Error::Format(_))));
    }
}
