//! Pattern module - Glob-style path patterns.
//!
//! One compiled [`PathPattern`] serves two matching modes. Blacklists match a
//! path when the pattern names it or one of its ancestors, so a blacklisted
//! node hides its whole subtree. Validation rules match a path by how it
//! ends, so `**.href` applies to every `href` leaf at any depth.

mod blacklist;
mod pattern;

pub use blacklist::*;
pub use pattern::*;

/// Returns true if a validation rule pattern applies to `path`.
pub fn matches_rule(path: &str, rule_pattern: &PathPattern) -> bool {
    rule_pattern.matches_suffix(path)
}
