//! Porcelain commands (user-facing operations)
//!
//! ## Commands
//!
//! - `init`: create a repository with its root commit
//! - `add` / `rm`: stage files for addition or removal
//! - `commit`: record the staging area as a new commit
//! - `log`: first-parent history, every commit, search by message
//! - `status`: branches, staging area and working tree changes
//! - `checkout`: switch branches or restore files
//! - `branch`: create or remove branches
//! - `reset`: move the current branch to any commit
//! - `merge`: merge another branch into the current one

pub mod add;
pub mod branch;
pub mod checkout;
pub mod commit;
pub mod init;
pub mod log;
pub mod merge;
pub mod reset;
pub mod rm;
pub mod status;
