//! Field path module - Parses textual paths and addresses nodes in a tree.

mod access;
mod path;

pub use access::*;
pub use path::*;
