//! Blacklist-aware deep merge.
//!
//! The walk is driven by `updates`:
//!
//! 1. A blacklisted path keeps the original subtree, whatever the update says.
//! 2. Arrays merge by position. Elements past the end of `updates` are kept
//!    from the original, so a shorter update never truncates. Elements past
//!    the end of the original are recorded as additions.
//! 3. Objects merge per key of `updates`. Keys only in the original are kept
//!    and not visited.
//! 4. Leaves are replaced when they differ by value.
//!
//! When the original node has a different kind from the update (an object
//! where the update has an array, say) the whole node is replaced and
//! recorded as a single change. When the original node is absent, the
//! update's container is walked against an empty one, so additions are
//! reported at their leaves.

use super::change::{FieldChange, MergeResult};
use crate::fieldpath::{Path, PathElement};
use crate::pattern::Blacklist;
use crate::value::{Map, Value};
use tracing::debug;

/// Merges `updates` into `original` for `target`.
///
/// `original` is not modified; the merged tree is a new value.
pub fn merge(original: &Value, updates: &Value, target: &str, blacklist: &Blacklist) -> MergeResult {
    let mut walker = Walker::new(target, blacklist, true);
    let merged = walker
        .walk(Some(original), updates, &mut Path::new())
        .unwrap_or_else(|| original.clone());

    debug!(
        target_name = target,
        changes = walker.changes.len(),
        "merged document"
    );
    MergeResult {
        merged,
        changes: walker.changes,
    }
}

/// Reports what [`merge`] would change without building the merged tree.
///
/// Changes whose own path is blacklisted are dropped from the result. The
/// walk never descends into a blacklisted node, but an element appended to
/// an array is recorded whole without consulting the blacklist.
pub fn diff(original: &Value, updates: &Value, target: &str, blacklist: &Blacklist) -> Vec<FieldChange> {
    let mut walker = Walker::new(target, blacklist, false);
    walker.walk(Some(original), updates, &mut Path::new());

    let recorded = walker.changes.len();
    let changes: Vec<FieldChange> = walker
        .changes
        .into_iter()
        .filter(|change| !blacklist.is_blacklisted(&change.path.to_string(), target))
        .collect();

    debug!(
        target_name = target,
        changes = changes.len(),
        suppressed = recorded - changes.len(),
        "diffed document"
    );
    changes
}

struct Walker<'a> {
    target: &'a str,
    blacklist: &'a Blacklist,
    /// When false only changes are collected and every walk returns `None`.
    materialize: bool,
    changes: Vec<FieldChange>,
}

impl<'a> Walker<'a> {
    fn new(target: &'a str, blacklist: &'a Blacklist, materialize: bool) -> Self {
        Walker {
            target,
            blacklist,
            materialize,
            changes: Vec::new(),
        }
    }

    /// Returns the merged node, or `None` when it should stay absent.
    fn walk(&mut self, original: Option<&Value>, updates: &Value, path: &mut Path) -> Option<Value> {
        if !path.is_empty() && self.blacklist.is_blacklisted(&path.to_string(), self.target) {
            return original.and_then(|kept| self.keep(kept));
        }

        match updates {
            Value::List(items) => self.walk_list(original, updates, items, path),
            Value::Map(fields) => self.walk_map(original, updates, fields, path),
            _ => self.walk_leaf(original, updates, path),
        }
    }

    fn walk_list(
        &mut self,
        original: Option<&Value>,
        updates: &Value,
        items: &[Value],
        path: &mut Path,
    ) -> Option<Value> {
        let existing: &[Value] = match original {
            Some(Value::List(existing)) => existing,
            None if !items.is_empty() => &[],
            _ => return self.replace(original, updates, path),
        };

        let len = existing.len().max(items.len());
        let mut merged = Vec::new();
        for i in 0..len {
            path.push(PathElement::Index(i));
            let item = match (existing.get(i), items.get(i)) {
                (Some(old), Some(new)) => self.walk(Some(old), new, path),
                (Some(old), None) => self.keep(old),
                (None, Some(new)) => self.replace(None, new, path),
                (None, None) => None,
            };
            path.pop();
            merged.extend(item);
        }
        self.materialize.then(|| Value::List(merged))
    }

    fn walk_map(
        &mut self,
        original: Option<&Value>,
        updates: &Value,
        fields: &Map,
        path: &mut Path,
    ) -> Option<Value> {
        let existing = match original {
            Some(Value::Map(existing)) => Some(existing),
            None if !fields.is_empty() => None,
            _ => return self.replace(original, updates, path),
        };

        let mut merged = match existing {
            Some(existing) if self.materialize => existing.clone(),
            _ => Map::new(),
        };
        for (key, update) in fields.iter() {
            path.push(PathElement::Key(key.clone()));
            let child = existing.and_then(|m| m.get(key));
            if let Some(value) = self.walk(child, update, path) {
                merged.set(key.clone(), value);
            }
            path.pop();
        }
        self.materialize.then(|| Value::Map(merged))
    }

    fn walk_leaf(&mut self, original: Option<&Value>, updates: &Value, path: &Path) -> Option<Value> {
        match original {
            Some(old) if old == updates => self.keep(old),
            _ => self.replace(original, updates, path),
        }
    }

    /// Records `updates` replacing `original` at `path` and adopts it.
    fn replace(&mut self, original: Option<&Value>, updates: &Value, path: &Path) -> Option<Value> {
        self.changes.push(FieldChange::new(
            path.clone(),
            original.cloned(),
            updates.clone(),
        ));
        self.keep(updates)
    }

    fn keep(&self, value: &Value) -> Option<Value> {
        self.materialize.then(|| value.clone())
    }
}
