//! Compiled glob-style path patterns.

use once_cell::sync::Lazy;
use regex::Regex;
use std::fmt;
use thiserror::Error;

/// Wildcard tokens, longest first so `[*]` and `**` win over a bare `*`.
static WILDCARD: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\[\*\]|\*\*|\*").expect("wildcard token regex is valid"));

/// An array position: a concrete index, or the `[*]` placeholder that column
/// paths of array-of-records sheets are checked with.
const ANY_INDEX: &str = r"\[(?:\d+|\*)\]";
const ANY_SEGMENTS: &str = ".*";
const WITHIN_SEGMENT: &str = r"[^.\[\]]*";

/// PatternError is returned when a pattern cannot be compiled.
#[derive(Debug, Error)]
pub enum PatternError {
    #[error("invalid path pattern {pattern:?}: {source}")]
    Invalid {
        pattern: String,
        #[source]
        source: regex::Error,
    },
}

/// PathPattern is a compiled path template.
///
/// - `[*]` matches exactly one array index segment.
/// - `**` matches any sequence of characters, including separators.
/// - a bare `*` matches any run of characters inside one segment.
///
/// Everything else matches literally.
#[derive(Clone)]
pub struct PathPattern {
    source: String,
    exact: Regex,
    ancestor: Regex,
    suffix: Regex,
}

impl PathPattern {
    /// Compiles a pattern once; the predicates below reuse the result.
    pub fn compile(source: &str) -> Result<Self, PatternError> {
        let body = translate(source);
        let build = |anchored: String| {
            Regex::new(&anchored).map_err(|e| PatternError::Invalid {
                pattern: source.to_string(),
                source: e,
            })
        };

        Ok(PathPattern {
            source: source.to_string(),
            exact: build(format!("^(?:{})$", body))?,
            ancestor: build(format!(r"^(?:{})[.\[]", body))?,
            suffix: build(format!(r"(?:^|\.)(?:{})$", body))?,
        })
    }

    /// Returns the pattern text this was compiled from.
    pub fn as_str(&self) -> &str {
        &self.source
    }

    /// The whole path equals the pattern.
    pub fn matches_exact(&self, path: &str) -> bool {
        self.exact.is_match(path)
    }

    /// The pattern names a strict ancestor of the path.
    pub fn matches_ancestor(&self, path: &str) -> bool {
        self.ancestor.is_match(path)
    }

    /// Blacklist semantics: the path is the pattern or lies beneath it.
    pub fn matches_subtree(&self, path: &str) -> bool {
        self.matches_exact(path) || self.matches_ancestor(path)
    }

    /// Rule semantics: the path ends with the pattern, starting at a segment
    /// boundary.
    pub fn matches_suffix(&self, path: &str) -> bool {
        self.suffix.is_match(path)
    }
}

impl fmt::Debug for PathPattern {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("PathPattern").field(&self.source).finish()
    }
}

impl PartialEq for PathPattern {
    fn eq(&self, other: &Self) -> bool {
        self.source == other.source
    }
}

impl fmt::Display for PathPattern {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.source)
    }
}

fn translate(source: &str) -> String {
    let mut body = String::with_capacity(source.len() * 2);
    let mut last = 0;
    for token in WILDCARD.find_iter(source) {
        body.push_str(&regex::escape(&source[last..token.start()]));
        body.push_str(match token.as_str() {
            "[*]" => ANY_INDEX,
            "**" => ANY_SEGMENTS,
            _ => WITHIN_SEGMENT,
        });
        last = token.end();
    }
    body.push_str(&regex::escape(&source[last..]));
    body
}
