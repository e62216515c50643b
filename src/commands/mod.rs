//! Command implementations
//!
//! - `plumbing`: building blocks shared by several commands (writing a commit)
//! - `porcelain`: user-facing operations (init, add, commit, checkout, merge, ...)
//!
//! Every command is an `impl Repository` block over an opened session.

pub mod plumbing;
pub mod porcelain;
