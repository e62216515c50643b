//! Plumbing shared by porcelain commands
//!
//! - `write_commit`: turn the staging area into a commit on the current branch

mod write_commit;
