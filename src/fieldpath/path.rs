//! Path element and path types.

use std::fmt::{self, Write};
use std::str::FromStr;
use thiserror::Error;

/// PathError is returned when a textual path cannot be parsed.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum PathError {
    #[error("malformed path {path:?}: {reason}")]
    Malformed { path: String, reason: String },
}

impl PathError {
    /// Creates a malformed path error.
    pub fn malformed(path: impl Into<String>, reason: impl Into<String>) -> Self {
        PathError::Malformed {
            path: path.into(),
            reason: reason.into(),
        }
    }
}

/// PathElement represents one level of path navigation.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum PathElement {
    /// Field name for object members.
    Key(String),
    /// Position in an array.
    Index(usize),
}

impl PathElement {
    /// Creates a new key path element.
    pub fn key(name: impl Into<String>) -> Self {
        PathElement::Key(name.into())
    }

    /// Creates a new index path element.
    pub fn index(i: usize) -> Self {
        PathElement::Index(i)
    }

    pub fn is_index(&self) -> bool {
        matches!(self, PathElement::Index(_))
    }
}

/// Path represents a complete path to a nested field.
///
/// The textual form is `a.b[0].c`: keys are joined with dots and indices are
/// bracketed. A path may start with an index (`[0].name`).
#[derive(Debug, Clone, Default, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Path {
    elements: Vec<PathElement>,
}

impl Path {
    /// Creates a new empty path.
    pub fn new() -> Self {
        Path {
            elements: Vec::new(),
        }
    }

    /// Creates a path from a vector of elements.
    pub fn from_elements(elements: Vec<PathElement>) -> Self {
        Path { elements }
    }

    pub fn len(&self) -> usize {
        self.elements.len()
    }

    pub fn is_empty(&self) -> bool {
        self.elements.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &PathElement> {
        self.elements.iter()
    }

    /// Appends a path element.
    pub fn push(&mut self, element: PathElement) {
        self.elements.push(element);
    }

    /// Removes and returns the last path element.
    pub fn pop(&mut self) -> Option<PathElement> {
        self.elements.pop()
    }

    pub fn last(&self) -> Option<&PathElement> {
        self.elements.last()
    }

    /// Creates a new path with the given element appended.
    pub fn with(&self, element: PathElement) -> Self {
        let mut new_path = self.clone();
        new_path.push(element);
        new_path
    }

    /// Returns true if `prefix` is this path or one of its ancestors.
    pub fn starts_with(&self, prefix: &Path) -> bool {
        self.elements.starts_with(&prefix.elements)
    }
}

impl FromIterator<PathElement> for Path {
    fn from_iter<T: IntoIterator<Item = PathElement>>(iter: T) -> Self {
        Path {
            elements: iter.into_iter().collect(),
        }
    }
}

impl IntoIterator for Path {
    type Item = PathElement;
    type IntoIter = std::vec::IntoIter<PathElement>;

    fn into_iter(self) -> Self::IntoIter {
        self.elements.into_iter()
    }
}

impl<'a> IntoIterator for &'a Path {
    type Item = &'a PathElement;
    type IntoIter = std::slice::Iter<'a, PathElement>;

    fn into_iter(self) -> Self::IntoIter {
        self.elements.iter()
    }
}

impl fmt::Display for Path {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, element) in self.elements.iter().enumerate() {
            match element {
                PathElement::Key(name) => {
                    if i > 0 {
                        f.write_char('.')?;
                    }
                    f.write_str(name)?;
                }
                PathElement::Index(idx) => write!(f, "[{}]", idx)?,
            }
        }
        Ok(())
    }
}

impl FromStr for Path {
    type Err = PathError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        parse_path(s)
    }
}

/// Parses a textual path such as `content.items[2].title`.
///
/// Each dot-separated segment is an identifier followed by zero or more
/// `[digits]` groups. Only the first segment may omit the identifier
/// (`[0].title`). Empty segments, non-digit bracket contents and unbalanced
/// brackets are rejected.
pub fn parse_path(text: &str) -> Result<Path, PathError> {
    if text.is_empty() {
        return Err(PathError::malformed(text, "empty path"));
    }

    let mut elements = Vec::new();
    for (n, segment) in text.split('.').enumerate() {
        if segment.is_empty() {
            return Err(PathError::malformed(text, "empty segment"));
        }

        let (name, mut rest) = match segment.find('[') {
            Some(pos) => segment.split_at(pos),
            None => (segment, ""),
        };
        if name.contains(']') {
            return Err(PathError::malformed(text, "unexpected ']'"));
        }
        if name.is_empty() && n > 0 {
            return Err(PathError::malformed(text, "empty segment before '['"));
        }
        if !name.is_empty() {
            elements.push(PathElement::Key(name.to_string()));
        }

        while !rest.is_empty() {
            let close = match (rest.strip_prefix('['), rest.find(']')) {
                (Some(_), Some(close)) => close,
                _ => return Err(PathError::malformed(text, "unterminated or stray bracket")),
            };
            let digits = &rest[1..close];
            if digits.is_empty() || !digits.bytes().all(|b| b.is_ascii_digit()) {
                return Err(PathError::malformed(
                    text,
                    format!("index [{}] is not a non-negative integer", digits),
                ));
            }
            let idx = digits
                .parse::<usize>()
                .map_err(|e| PathError::malformed(text, format!("index [{}]: {}", digits, e)))?;
            elements.push(PathElement::Index(idx));
            rest = &rest[close + 1..];
        }
    }

    Ok(Path { elements })
}
