use std::{collections::BTreeSet, fmt};

use memchr::memchr_iter;

/// A person responsible for a component. Maintainers are joined to reviewer
/// identities by `name` unless another [`crate::review::IdentityJoin`] is used.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Maintainer {
    pub name: String,
    pub email: String,
}

impl Maintainer {
    pub fn new(name: impl Into<String>, email: impl Into<String>) -> Maintainer {
        Maintainer {
            name: name.into(),
            email: email.into(),
        }
    }
}

impl fmt::Display for Maintainer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}<{}>", self.name, self.email)
    }
}

/// A literal or wildcarded path pattern from an `F:` line, e.g. `src/vlib/`,
/// `dpdk/*` or `src/*.mk`.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct PathPattern(String);

impl PathPattern {
    pub fn new(pattern: impl Into<String>) -> PathPattern {
        PathPattern(pattern.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Number of `/` separators in the pattern. Deeper patterns are more
    /// specific.
    pub fn depth(&self) -> usize {
        memchr_iter(b'/', self.0.as_bytes()).count()
    }
}

impl fmt::Display for PathPattern {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for PathPattern {
    fn from(pattern: &str) -> Self {
        PathPattern::new(pattern)
    }
}

/// One block of a MAINTAINERS file.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Component {
    pub title: String,
    pub maintainers: BTreeSet<Maintainer>,
    pub patterns: BTreeSet<PathPattern>,
    pub comments: BTreeSet<String>,
}

impl Component {
    pub fn new(title: impl Into<String>) -> Component {
        Component {
            title: title.into(),
            ..Default::default()
        }
    }

    pub fn with_maintainer(mut self, maintainer: Maintainer) -> Component {
        self.maintainers.insert(maintainer);
        self
    }

    pub fn with_pattern(mut self, pattern: impl Into<PathPattern>) -> Component {
        self.patterns.insert(pattern.into());
        self
    }

    pub fn with_comment(mut self, comment: impl Into<String>) -> Component {
        self.comments.insert(comment.into());
        self
    }

    /// Components without maintainers own paths but impose no review
    /// obligation.
    pub fn is_review_component(&self) -> bool {
        !self.maintainers.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_pattern_depth() {
        let examples = [
            ("Makefile", 0),
            ("src/*.mk", 1),
            ("src/vlib/", 2),
            ("src/vnet/bfd/*", 3),
        ];
        for (pattern, depth) in examples {
            assert_eq!(PathPattern::new(pattern).depth(), depth, "depth of {pattern}");
        }
    }

    #[test]
    fn test_maintainer_display() {
        let maintainer = Maintainer::new("Dave Barach", "dave@barachs.net");
        assert_eq!(maintainer.to_string(), "Dave Barach<dave@barachs.net>");
    }
}
