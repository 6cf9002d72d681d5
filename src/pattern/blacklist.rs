//! Blacklists: per-target path patterns that are never overwritten or exported.

use super::pattern::{PathPattern, PatternError};
use std::collections::{BTreeMap, HashMap};

/// Key of the blacklist entry that applies to every target.
pub const ALL_TARGETS: &str = "*";

/// BlacklistConfig is the raw configuration form: target name (or `*`) to
/// pattern texts.
pub type BlacklistConfig = BTreeMap<String, Vec<String>>;

/// Blacklist holds the compiled patterns of a [`BlacklistConfig`].
#[derive(Debug, Clone, Default)]
pub struct Blacklist {
    entries: HashMap<String, Vec<PathPattern>>,
}

impl Blacklist {
    /// Creates an empty blacklist that matches nothing.
    pub fn new() -> Self {
        Blacklist::default()
    }

    /// Compiles every pattern in `config`.
    pub fn compile(config: &BlacklistConfig) -> Result<Self, PatternError> {
        let mut blacklist = Blacklist::new();
        for (target, patterns) in config {
            for pattern in patterns {
                blacklist.add(target.clone(), pattern)?;
            }
        }
        Ok(blacklist)
    }

    /// Adds one pattern for `target` (use [`ALL_TARGETS`] for every target).
    pub fn add(&mut self, target: impl Into<String>, pattern: &str) -> Result<(), PatternError> {
        let compiled = PathPattern::compile(pattern)?;
        self.entries.entry(target.into()).or_default().push(compiled);
        Ok(())
    }

    /// Builder form of [`Blacklist::add`].
    pub fn with(mut self, target: impl Into<String>, pattern: &str) -> Result<Self, PatternError> {
        self.add(target, pattern)?;
        Ok(self)
    }

    pub fn is_empty(&self) -> bool {
        self.entries.values().all(Vec::is_empty)
    }

    /// Patterns that apply to `target`: the wildcard entry first, then the
    /// target's own.
    pub fn patterns_for<'a>(&'a self, target: &str) -> impl Iterator<Item = &'a PathPattern> {
        let shared = self.entries.get(ALL_TARGETS).into_iter().flatten();
        let own = if target == ALL_TARGETS {
            None
        } else {
            self.entries.get(target)
        };
        shared.chain(own.into_iter().flatten())
    }

    /// Returns true if `path` is, or lies beneath, a blacklisted pattern for
    /// `target`.
    pub fn is_blacklisted(&self, path: &str, target: &str) -> bool {
        self.patterns_for(target).any(|p| p.matches_subtree(path))
    }
}
