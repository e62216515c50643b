//! Merge algorithms
//!
//! - `merge_base`: two-frontier BFS for a common ancestor
//! - `three_way`: per-path decision table against the merge base
//! - `conflict`: textual conflict blocks written for unresolvable paths

pub mod conflict;
pub mod merge_base;
pub mod three_way;
