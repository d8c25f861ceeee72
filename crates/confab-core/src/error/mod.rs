//! Error types for confab
//!
//! One error enum covers every crate in the workspace. Variants carry
//! structured context (provider, path, line number) so diagnostics stay
//! useful after crossing a stage boundary, and `is_recoverable()` tells a
//! stream stage whether an error is scoped to one record (skip and
//! continue) or poisons the whole invocation (abort).

mod constructors;
mod conversions;
mod types;

pub use types::{ConfabError, ConfabResult};
