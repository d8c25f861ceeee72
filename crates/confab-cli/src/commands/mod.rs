//! Stage implementations
//!
//! Each command follows the same split: `run` binds the stage to the
//! process's stdin/stdout and logs the summary; a private `execute`
//! works over generic reader/writer pairs so tests can drive it with
//! in-memory buffers.

pub mod get;
pub mod invalidate;
pub mod list;
pub mod normalize;
pub mod render;
pub mod store;
