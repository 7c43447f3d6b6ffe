//! Validation-scoped execution.
//!
//! Every unit of GPU work runs between a pushed and a popped validation error
//! scope. Whatever the validation layer reports in between becomes a failure
//! of that unit; nothing leaks into the next one.

mod error;
mod outcome;
mod runner;

pub use error::{ensure_eq, AssertionFailure, ValidationFailure};
pub use outcome::ScopeOutcome;
pub use runner::{run_scoped, ValidationScopes};
