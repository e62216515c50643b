//! gitlite: a local, single-user version-control engine
//!
//! The crate is split the same way the on-disk repository is:
//!
//! - `areas`: the stateful pieces of a repository (object database, refs, staging index,
//!   working tree) and the `Repository` session handle that ties them together
//! - `artifacts`: data types and algorithms (objects, encoding, checkout migration,
//!   merge base search, three-way merge, status)
//! - `commands`: the user-facing operations, implemented on `Repository`
//! - `errors`: the user-facing error taxonomy

pub mod areas;
pub mod artifacts;
pub mod commands;
pub mod errors;
