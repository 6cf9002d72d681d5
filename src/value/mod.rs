//! Value module - In-memory representation of JSON/YAML documents.
//!
//! This module provides the document tree shared by every other module.

mod value;

pub use value::*;
