use memchr::{memchr, memrchr};

use crate::component::PathPattern;

/// How well a pattern matches a path, ordered from no match to an exact one.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum MatchLevel {
    None = 0,
    /// `foo/bar/*` style pattern whose prefix occurs in the path.
    WildcardOnly = 1,
    /// Literal directory pattern matching the path or one of its direct
    /// children.
    Partial = 2,
    /// `foo/bar/*.mk` style pattern whose prefix and extension both match.
    WildcardWithExtension = 3,
    /// Pattern and path are identical.
    Full = 4,
}

impl PathPattern {
    /// Rank how well this pattern matches `candidate`. An absent candidate never
    /// matches.
    pub fn match_level(&self, candidate: Option<&str>) -> MatchLevel {
        match candidate {
            Some(candidate) => match_level(self.as_str(), candidate),
            None => MatchLevel::None,
        }
    }
}

pub fn match_level(pattern: &str, candidate: &str) -> MatchLevel {
    if pattern == candidate {
        return MatchLevel::Full;
    }

    match memchr(b'*', pattern.as_bytes()) {
        Some(star) => match_wildcard(pattern, &pattern[..star], candidate),
        None => match_direct_child(pattern, candidate),
    }
}

// The prefix before the first `*` only has to occur somewhere in the candidate.
// An extension on the pattern is then mandatory for the candidate too.
fn match_wildcard(pattern: &str, prefix: &str, candidate: &str) -> MatchLevel {
    if !candidate.contains(prefix) {
        return MatchLevel::None;
    }

    let pattern_extension = extension(pattern);
    if !pattern_extension.is_empty() {
        return if extension(candidate) == pattern_extension {
            MatchLevel::WildcardWithExtension
        } else {
            MatchLevel::None
        };
    }

    if prefix == pattern {
        MatchLevel::Partial
    } else {
        MatchLevel::WildcardOnly
    }
}

// Without a wildcard, a pattern matches the path it names and that path's
// direct children, segment by segment.
fn match_direct_child(pattern: &str, candidate: &str) -> MatchLevel {
    let pattern_segments = segments(pattern);
    let candidate_segments = segments(candidate);

    if candidate_segments.len() > pattern_segments.len() + 1 {
        return MatchLevel::None;
    }

    let all_equal = pattern_segments
        .iter()
        .enumerate()
        .all(|(i, segment)| candidate_segments.get(i) == Some(segment));
    if all_equal {
        MatchLevel::Partial
    } else {
        MatchLevel::None
    }
}

// Split on `/`, dropping trailing empty segments so `src/vlib/` and `src/vlib`
// have the same segments. An empty path keeps its single empty segment and so
// matches no other path.
fn segments(path: &str) -> Vec<&str> {
    if path.is_empty() {
        return vec![path];
    }
    let mut segments = path.split('/').collect::<Vec<_>>();
    while segments.last() == Some(&"") {
        segments.pop();
    }
    segments
}

// Text after the last `.`, or an empty string if there is none.
fn extension(path: &str) -> &str {
    match memrchr(b'.', path.as_bytes()) {
        Some(dot) => &path[dot + 1..],
        None => "",
    }
}
