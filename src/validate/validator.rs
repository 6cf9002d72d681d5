//! Rule-driven validation of document string leaves.

use super::rule::ValidationRule;
use super::validation::{ValidationError, ValidationErrors};
use crate::fieldpath::{Path, PathElement};
use crate::value::Value;
use tracing::debug;

/// Validates every non-empty string leaf of `tree` against `rules`.
///
/// Each leaf is checked by every rule whose pattern matches the end of its
/// path, in rule order, so one leaf can produce several errors. Null,
/// numbers, booleans and empty strings are never checked.
pub fn validate(tree: &Value, rules: &[ValidationRule]) -> ValidationErrors {
    let mut errors = ValidationErrors::new();
    if rules.is_empty() {
        return errors;
    }

    walk(tree, &mut Path::new(), rules, &mut errors);
    debug!(rules = rules.len(), errors = errors.len(), "validated document");
    errors
}

fn walk(value: &Value, path: &mut Path, rules: &[ValidationRule], errors: &mut ValidationErrors) {
    match value {
        Value::List(items) => {
            for (i, item) in items.iter().enumerate() {
                path.push(PathElement::Index(i));
                walk(item, path, rules, errors);
                path.pop();
            }
        }
        Value::Map(fields) => {
            for (key, child) in fields.iter() {
                path.push(PathElement::Key(key.clone()));
                walk(child, path, rules, errors);
                path.pop();
            }
        }
        Value::String(s) if !s.is_empty() => check_leaf(s, path, rules, errors),
        _ => {}
    }
}

fn check_leaf(value: &str, path: &Path, rules: &[ValidationRule], errors: &mut ValidationErrors) {
    let path_text = path.to_string();
    for rule in rules {
        if rule.applies_to(&path_text) && !rule.check.check(value) {
            errors.add(ValidationError::new(path_text.clone(), value, rule.message.clone()));
        }
    }
}
