//! On-disk repository state
//!
//! - `database`: content-addressed object store and the commit registry
//! - `index`: staging pair (additions and removals)
//! - `refs`: HEAD, branch refs and the branch registry
//! - `repository`: session handle tying the areas together
//! - `workspace`: working-tree file operations

pub(crate) mod database;
pub(crate) mod index;
pub(crate) mod refs;
pub mod repository;
pub(crate) mod workspace;
