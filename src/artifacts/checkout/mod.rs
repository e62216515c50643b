//! Working-tree synchronization
//!
//! Moving the working tree from one snapshot to another is planned as a `Migration` and
//! applied by the workspace. Before anything is written, `conflict` checks that no untracked
//! file would be silently overwritten; checkout, reset and merge all share that check.

pub mod conflict;
pub mod migration;
