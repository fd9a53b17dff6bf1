use std::collections::BTreeSet;

use crate::{
    change::{relevant_entries, ChangedPathEntry},
    index::OwnershipIndex,
};

/// An account that approved a revision.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Identity {
    pub display_name: String,
    pub email: String,
}

impl Identity {
    pub fn new(display_name: impl Into<String>, email: impl Into<String>) -> Identity {
        Identity {
            display_name: display_name.into(),
            email: email.into(),
        }
    }
}

/// Joins an approving identity to the components it maintains.
pub trait IdentityJoin {
    fn components_for(&self, index: &OwnershipIndex, approver: &Identity) -> BTreeSet<String>;
}

/// Joins on the maintainer's display name, which is how MAINTAINERS files are
/// matched to accounts by default. Name collisions and renamed accounts break
/// this join; see [`ByEmail`].
#[derive(Debug, Clone, Copy, Default)]
pub struct ByDisplayName;

impl IdentityJoin for ByDisplayName {
    fn components_for(&self, index: &OwnershipIndex, approver: &Identity) -> BTreeSet<String> {
        if approver.display_name.is_empty() {
            return BTreeSet::new();
        }
        index.components_for_maintainer(&approver.display_name)
    }
}

#[derive(Debug, Clone, Copy, Default)]
pub struct ByEmail;

// An identity without an email joins nothing, even against `<>` maintainer
// lines.
impl IdentityJoin for ByEmail {
    fn components_for(&self, index: &OwnershipIndex, approver: &Identity) -> BTreeSet<String> {
        if approver.email.is_empty() {
            return BTreeSet::new();
        }
        index.components_for_email(&approver.email)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ReviewState {
    AllComponentsReviewed,
    MissingComponentReview,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PatchsetReviewInfo {
    pub state: ReviewState,
    pub missing_components: BTreeSet<String>,
}

impl PatchsetReviewInfo {
    pub fn is_complete(&self) -> bool {
        self.state == ReviewState::AllComponentsReviewed
    }
}

/// Every component with maintainers that owns a governing path of the
/// revision.
pub fn required_components(index: &OwnershipIndex, entries: &[ChangedPathEntry]) -> BTreeSet<String> {
    relevant_entries(entries)
        .flat_map(|entry| {
            let (old, new) = index.components_for_changed_entry(entry);
            if entry.old_name.is_some() {
                old
            } else {
                new
            }
        })
        .filter_map(|pattern| index.component_for_path(&pattern).map(str::to_owned))
        .filter(|title| index.is_review_component(title))
        .collect()
}

/// Check whether the approvers cover every required component. One approving
/// maintainer per component is enough.
pub fn evaluate(
    index: &OwnershipIndex,
    entries: &[ChangedPathEntry],
    approvers: &[Identity],
) -> PatchsetReviewInfo {
    evaluate_with(index, entries, approvers, &ByDisplayName)
}

pub fn evaluate_with(
    index: &OwnershipIndex,
    entries: &[ChangedPathEntry],
    approvers: &[Identity],
    join: &impl IdentityJoin,
) -> PatchsetReviewInfo {
    let required = required_components(index, entries);
    let covered = approvers
        .iter()
        .flat_map(|approver| join.components_for(index, approver))
        .collect::<BTreeSet<_>>();

    let missing_components = required.difference(&covered).cloned().collect::<BTreeSet<_>>();
    tracing::debug!(
        required = required.len(),
        covered = covered.len(),
        missing = missing_components.len(),
        "evaluated review coverage"
    );

    let state = if missing_components.is_empty() {
        ReviewState::AllComponentsReviewed
    } else {
        ReviewState::MissingComponentReview
    };
    PatchsetReviewInfo {
        state,
        missing_components,
    }
}
