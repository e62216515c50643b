//! Version-control data types and algorithms
//!
//! - `branch`: branch name validation
//! - `checkout`: working-tree migrations and the untracked-file check
//! - `core`: shared utilities (pager wrapper, locked side files)
//! - `encoding`: length-prefixed binary codec
//! - `merge`: merge base search, three-way decisions and conflict blocks
//! - `objects`: object ids, blobs and commits
//! - `status`: working tree status report

pub mod branch;
pub mod checkout;
pub mod core;
pub mod encoding;
pub mod merge;
pub mod objects;
pub mod status;
