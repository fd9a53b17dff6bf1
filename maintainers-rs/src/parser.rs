use std::{fs, path::Path};

use once_cell::sync::Lazy;
use regex::Regex;

use crate::{
    component::{Component, Maintainer, PathPattern},
    error::{Error, FormatError, Result},
};

const HEADER_SEPARATOR: &str = "-----";
const MAINTAINER_TOKEN: &str = "M:";
const PATH_TOKEN: &str = "F:";
const COMMENT_TOKEN: &str = "C:";

// Name is everything before the first `<`, email is everything up to the
// following `>`.
static MAINTAINER_LINE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^M:(?P<name>[^<]*)<(?P<email>[^>]*)>").expect("valid regex"));

/// Parse a MAINTAINERS file from a string. Everything up to and including the
/// first line containing `-----` is treated as a header and ignored. The rest
/// is split into blank-line separated blocks, each of which becomes a
/// [`Component`].
///
/// Parsing is all-or-nothing: the first malformed block fails the whole parse,
/// since a partial file would silently under-assign reviewers.
pub fn parse(source: &str) -> Result<Vec<Component>, FormatError> {
    Parser::new(source).parse()
}

/// Parse a MAINTAINERS file from a file path.
pub fn parse_file(path: &Path) -> Result<Vec<Component>> {
    let source = fs::read_to_string(path).map_err(|source| Error::Io {
        path: path.to_path_buf(),
        source,
    })?;
    Ok(parse(&source)?)
}

struct Block<'a> {
    start_line: usize,
    lines: Vec<&'a str>,
}

impl<'a> Block<'a> {
    fn new(start_line: usize) -> Self {
        Self {
            start_line,
            lines: Vec::new(),
        }
    }

    // Lines within a block form a set; repeated lines collapse.
    fn push(&mut self, line: &'a str) {
        if !self.lines.contains(&line) {
            self.lines.push(line);
        }
    }
}

struct Parser<'a> {
    source: &'a str,
}

impl<'a> Parser<'a> {
    fn new(source: &'a str) -> Self {
        Self { source }
    }

    fn parse(self) -> Result<Vec<Component>, FormatError> {
        self.blocks()
            .into_iter()
            .filter(|block| !block.lines.is_empty())
            .map(|block| self.parse_block(&block))
            .collect()
    }

    fn blocks(&self) -> Vec<Block<'a>> {
        let mut lines = self.source.lines().enumerate();
        if !lines.any(|(_, line)| line.contains(HEADER_SEPARATOR)) {
            tracing::warn!("no `{}` header separator found, file has no components", HEADER_SEPARATOR);
            return Vec::new();
        }

        let mut blocks = Vec::new();
        let mut current: Option<Block<'a>> = None;
        for (idx, line) in lines {
            let line = line.trim();
            if line.is_empty() {
                blocks.extend(current.take());
                continue;
            }
            current.get_or_insert_with(|| Block::new(idx + 1)).push(line);
        }
        blocks.extend(current);
        blocks
    }

    fn parse_block(&self, block: &Block<'a>) -> Result<Component, FormatError> {
        let line = block.start_line;
        if block.lines.len() < 3 {
            return Err(FormatError::new(
                format!("expected at least 3 lines, found {}", block.lines.len()),
                line,
            ));
        }

        let mut title: Option<&str> = None;
        let mut component = Component::default();
        for &text in &block.lines {
            if text.starts_with(MAINTAINER_TOKEN) {
                component.maintainers.insert(parse_maintainer(text, line)?);
            } else if let Some(pattern) = text.strip_prefix(PATH_TOKEN) {
                let pattern = pattern.trim();
                if pattern.is_empty() {
                    return Err(FormatError::new("expected path pattern", line));
                }
                component.patterns.insert(PathPattern::new(pattern));
            } else if text.starts_with(COMMENT_TOKEN) {
                component.comments.insert(text.to_owned());
            } else if let Some(existing) = title {
                return Err(FormatError::new(
                    format!("multiple titles: {existing:?} and {text:?}"),
                    line,
                ));
            } else {
                title = Some(text);
            }
        }

        match title {
            Some(title) => {
                component.title = title.to_owned();
                Ok(component)
            }
            None => Err(FormatError::new("expected title", line)),
        }
    }
}

fn parse_maintainer(text: &str, line: usize) -> Result<Maintainer, FormatError> {
    let captures = MAINTAINER_LINE.captures(text).ok_or_else(|| {
        FormatError::new(format!("expected `Name <email>` maintainer: {text:?}"), line)
    })?;
    Ok(Maintainer::new(
        captures["name"].trim(),
        captures["email"].trim(),
    ))
}
