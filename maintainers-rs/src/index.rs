use std::collections::{BTreeMap, BTreeSet, HashMap};

use crate::{
    change::ChangedPathEntry,
    component::{Component, Maintainer, PathPattern},
    error::UnknownTitleError,
    matcher::MatchLevel,
};

/// Whether a queried path resolved to a component.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ComponentState {
    Found,
    NotFound,
}

/// Ownership of a single path: the component it resolved to, if any, and that
/// component's maintainers.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ComponentReviewInfo {
    pub affected_file: String,
    pub component: Option<String>,
    pub maintainers: BTreeSet<Maintainer>,
}

impl ComponentReviewInfo {
    fn not_found(affected_file: &str) -> Self {
        ComponentReviewInfo {
            affected_file: affected_file.to_owned(),
            component: None,
            maintainers: BTreeSet::new(),
        }
    }

    pub fn state(&self) -> ComponentState {
        match self.component {
            Some(_) => ComponentState::Found,
            None => ComponentState::NotFound,
        }
    }
}

/// Lookup structures over the patterns and maintainers of a parsed
/// MAINTAINERS file. Immutable once built, so it can be shared freely across
/// threads.
#[derive(Debug, Clone)]
pub struct OwnershipIndex {
    components: Vec<Component>,
    // Pattern to index of the declaring component. Ordered, so ties between
    // equally specific patterns go to the lexicographically smallest one.
    pattern_owners: BTreeMap<PathPattern, usize>,
    name_components: HashMap<String, BTreeSet<String>>,
    email_components: HashMap<String, BTreeSet<String>>,
    review_components: HashMap<String, bool>,
}

impl OwnershipIndex {
    pub fn new(components: Vec<Component>) -> OwnershipIndex {
        let mut builder = OwnershipIndexBuilder::new();
        for component in components {
            builder.add(component);
        }
        builder.build()
    }

    /// Components in the order they were declared.
    pub fn components(&self) -> &[Component] {
        &self.components
    }

    /// Tells whether the component has maintainers configured.
    ///
    /// # Panics
    ///
    /// Panics if `title` was not produced by this index. Use
    /// [`OwnershipIndex::review_status`] for titles from elsewhere.
    pub fn is_review_component(&self, title: &str) -> bool {
        match self.review_status(title) {
            Ok(is_review) => is_review,
            Err(err) => panic!("{err}"),
        }
    }

    pub fn review_status(&self, title: &str) -> Result<bool, UnknownTitleError> {
        self.review_components
            .get(title)
            .copied()
            .ok_or_else(|| UnknownTitleError(title.to_owned()))
    }

    /// Titles of every component listing a maintainer with this display name.
    pub fn components_for_maintainer(&self, name: &str) -> BTreeSet<String> {
        self.name_components.get(name).cloned().unwrap_or_default()
    }

    /// Titles of every component listing a maintainer with this email.
    pub fn components_for_email(&self, email: &str) -> BTreeSet<String> {
        self.email_components.get(email).cloned().unwrap_or_default()
    }

    /// Title of the component declaring `pattern`. This is an exact lookup, not
    /// a match.
    pub fn component_for_path(&self, pattern: &PathPattern) -> Option<&str> {
        self.owner_of(pattern).map(|component| component.title.as_str())
    }

    pub fn maintainers_for_pattern(&self, pattern: &PathPattern) -> Option<&BTreeSet<Maintainer>> {
        self.owner_of(pattern).map(|component| &component.maintainers)
    }

    /// Resolve the single component owning `path`: the best match level wins,
    /// then the deepest pattern, then the lexicographically smallest pattern.
    pub fn best_match_for_path(&self, path: &str) -> ComponentReviewInfo {
        let (level, best) = self.best_patterns(Some(path));
        tracing::debug!(path, ?level, "maximum match level");

        let Some(pattern) = best.first() else {
            return ComponentReviewInfo::not_found(path);
        };
        let Some(component) = self.owner_of(pattern) else {
            return ComponentReviewInfo::not_found(path);
        };
        tracing::debug!(path, %pattern, component = %component.title, "component found");

        ComponentReviewInfo {
            affected_file: path.to_owned(),
            component: Some(component.title.clone()),
            maintainers: component.maintainers.clone(),
        }
    }

    /// All patterns tied for the best match against the entry's old and new
    /// names respectively. Either side is empty when its name is absent or
    /// matches nothing.
    pub fn components_for_changed_entry(
        &self,
        entry: &ChangedPathEntry,
    ) -> (BTreeSet<PathPattern>, BTreeSet<PathPattern>) {
        let collect = |name: Option<&str>| {
            self.best_patterns(name)
                .1
                .into_iter()
                .cloned()
                .collect::<BTreeSet<_>>()
        };
        (
            collect(entry.old_name.as_deref()),
            collect(Some(entry.new_name.as_str())),
        )
    }

    // Reduce all patterns to those with the maximum match level, then to those
    // of maximum depth. Returned in pattern order.
    fn best_patterns(&self, path: Option<&str>) -> (MatchLevel, Vec<&PathPattern>) {
        let mut level = MatchLevel::None;
        let mut best: Vec<&PathPattern> = Vec::new();
        for pattern in self.pattern_owners.keys() {
            let pattern_level = pattern.match_level(path);
            if pattern_level > level {
                level = pattern_level;
                best.clear();
            }
            if pattern_level == level && level != MatchLevel::None {
                best.push(pattern);
            }
        }

        let depth = best.iter().map(|p| p.depth()).max().unwrap_or(0);
        best.retain(|p| p.depth() == depth);
        (level, best)
    }

    fn owner_of(&self, pattern: &PathPattern) -> Option<&Component> {
        self.pattern_owners
            .get(pattern)
            .map(|&idx| &self.components[idx])
    }
}

impl FromIterator<Component> for OwnershipIndex {
    fn from_iter<I: IntoIterator<Item = Component>>(iter: I) -> Self {
        OwnershipIndex::new(iter.into_iter().collect())
    }
}

/// Builder for an [`OwnershipIndex`]. Calling [`OwnershipIndexBuilder::build`]
/// will consume the builder.
pub struct OwnershipIndexBuilder {
    index: OwnershipIndex,
}

impl OwnershipIndexBuilder {
    pub fn new() -> Self {
        Self {
            index: OwnershipIndex {
                components: Vec::new(),
                pattern_owners: BTreeMap::new(),
                name_components: HashMap::new(),
                email_components: HashMap::new(),
                review_components: HashMap::new(),
            },
        }
    }

    /// Add a component. A pattern declared by more than one component belongs
    /// to the last one added. A title seen more than once is a review
    /// component if any of its blocks has maintainers.
    pub fn add(&mut self, component: Component) {
        let index = &mut self.index;
        let idx = index.components.len();

        for pattern in &component.patterns {
            index.pattern_owners.insert(pattern.clone(), idx);
        }
        for maintainer in &component.maintainers {
            index
                .name_components
                .entry(maintainer.name.clone())
                .or_default()
                .insert(component.title.clone());
            index
                .email_components
                .entry(maintainer.email.clone())
                .or_default()
                .insert(component.title.clone());
        }
        *index
            .review_components
            .entry(component.title.clone())
            .or_insert(false) |= component.is_review_component();

        index.components.push(component);
    }

    pub fn build(self) -> OwnershipIndex {
        self.index
    }
}

impl Default for OwnershipIndexBuilder {
    fn default() -> Self {
        Self::new()
    }
}
