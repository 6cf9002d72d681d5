//! Validate module - Path-scoped rules over document string leaves.
//!
//! Validation never fails; violations are returned as [`ValidationErrors`]
//! for the caller to act on, typically by refusing to push.

mod rule;
mod validation;
mod validator;

pub use rule::*;
pub use validation::*;
pub use validator::*;
