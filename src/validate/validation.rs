//! Validation errors.

use std::fmt;
use thiserror::Error;

/// ValidationError is one string leaf that failed a rule.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{path}: {reason} (got {value:?})")]
pub struct ValidationError {
    /// Path of the offending leaf, e.g. `page.links[0].href`.
    pub path: String,
    /// The leaf value as found in the document.
    pub value: String,
    /// The failing rule's message.
    pub reason: String,
}

impl ValidationError {
    /// Creates a validation error.
    pub fn new(path: impl Into<String>, value: impl Into<String>, reason: impl Into<String>) -> Self {
        ValidationError {
            path: path.into(),
            value: value.into(),
            reason: reason.into(),
        }
    }
}

/// ValidationErrors is a collection of validation errors, in walk order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ValidationErrors {
    errors: Vec<ValidationError>,
}

impl ValidationErrors {
    /// Creates a new empty ValidationErrors.
    pub fn new() -> Self {
        ValidationErrors { errors: Vec::new() }
    }

    /// Creates ValidationErrors from a single error.
    pub fn from_error(error: ValidationError) -> Self {
        ValidationErrors {
            errors: vec![error],
        }
    }

    /// Adds an error.
    pub fn add(&mut self, error: ValidationError) {
        self.errors.push(error);
    }

    /// Extends with another ValidationErrors.
    pub fn extend(&mut self, other: ValidationErrors) {
        self.errors.extend(other.errors);
    }

    /// Returns true if there are no errors.
    pub fn is_empty(&self) -> bool {
        self.errors.is_empty()
    }

    /// Returns the number of errors.
    pub fn len(&self) -> usize {
        self.errors.len()
    }

    /// Returns an iterator over the errors.
    pub fn iter(&self) -> impl Iterator<Item = &ValidationError> {
        self.errors.iter()
    }
}

impl IntoIterator for ValidationErrors {
    type Item = ValidationError;
    type IntoIter = std::vec::IntoIter<ValidationError>;

    fn into_iter(self) -> Self::IntoIter {
        self.errors.into_iter()
    }
}

impl<'a> IntoIterator for &'a ValidationErrors {
    type Item = &'a ValidationError;
    type IntoIter = std::slice::Iter<'a, ValidationError>;

    fn into_iter(self) -> Self::IntoIter {
        self.errors.iter()
    }
}

impl fmt::Display for ValidationErrors {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, err) in self.errors.iter().enumerate() {
            if i > 0 {
                writeln!(f)?;
            }
            write!(f, "{}", err)?;
        }
        Ok(())
    }
}

impl std::error::Error for ValidationErrors {}
