//! Merge module - Blacklist-aware deep merge and diff of document trees.
//!
//! Merging an incoming tree into an original one yields the merged tree and
//! an ordered list of [`FieldChange`]s. Diffing runs the same walk for the
//! change list alone.

mod change;
mod merger;

#[cfg(test)]
mod merge_test;


pub use change::*;
pub use merger::*;
