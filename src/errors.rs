//! User-facing error taxonomy
//!
//! Every precondition failure of a porcelain command is one of these variants. They travel
//! through `anyhow::Error`, so callers recover the kind with `downcast_ref::<RepoError>()`.
//! The `Display` text is the one-line message shown to the user.

use thiserror::Error;

/// Which command reported a missing branch; the user message differs between them.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BranchLookup {
    Checkout,
    Removal,
    Merge,
}

impl BranchLookup {
    fn message(&self) -> &'static str {
        match self {
            BranchLookup::Checkout => "No such branch exists.",
            BranchLookup::Removal | BranchLookup::Merge => {
                "A branch with that name does not exist."
            }
        }
    }
}

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum RepoError {
    #[error("Not in an initialized Gitlite directory.")]
    NotInitialized,

    #[error("A Gitlite version-control system already exists in the current directory.")]
    RepositoryAlreadyExists,

    #[error("File does not exist.")]
    FileNotFound,

    #[error("File does not exist in that commit.")]
    PathNotInCommit,

    #[error("No commit with that id exists.")]
    NoSuchCommit,

    #[error("{}", .0.message())]
    NoSuchBranch(BranchLookup),

    #[error("No need to checkout the current branch.")]
    AlreadyOnBranch,

    #[error("A branch with that name already exists.")]
    BranchAlreadyExists,

    #[error("Cannot remove the current branch.")]
    CannotRemoveCurrentBranch,

    #[error("Invalid branch name: {0}.")]
    InvalidBranchName(String),

    #[error("Please enter a commit message.")]
    EmptyCommitMessage,

    #[error("No changes added to the commit.")]
    NothingStaged,

    #[error("No reason to remove the file.")]
    NothingToRemove,

    #[error("There is an untracked file in the way; delete it, or add and commit it first.")]
    UntrackedFileInWay,

    #[error("Cannot merge a branch with itself.")]
    SelfMerge,

    #[error("You have uncommitted changes.")]
    DirtyMerge,

    #[error("Found no commit with that message.")]
    MessageNotFound,
}

impl RepoError {
    /// Returns the `RepoError` carried by an `anyhow::Error`, if any.
    pub fn kind_of(error: &anyhow::Error) -> Option<&RepoError> {
        error.downcast_ref::<RepoError>()
    }

    /// Report a path no snapshot can hold as `kind`, keeping the reason in the log
    pub fn rejected_path(reason: &anyhow::Error, kind: RepoError) -> RepoError {
        tracing::debug!(reason = %reason, "path rejected");
        kind
    }
}
