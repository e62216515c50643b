use crate::areas::repository::Repository;
use crate::artifacts::branch::branch_name::BranchName;
use crate::errors::{BranchLookup, RepoError};

impl Repository {
    /// Create `branch_name` pointing at the head commit, without switching to it
    pub fn branch(&mut self, branch_name: &str) -> anyhow::Result<()> {
        let branch = BranchName::try_parse(branch_name)?;

        if self.branches().contains(&branch) || self.refs().branch_exists(&branch) {
            return Err(RepoError::BranchAlreadyExists.into());
        }

        self.refs().update_ref(&branch, self.head_commit_id())?;
        self.register_branch(branch);

        self.save()
    }

    /// Delete the ref of `branch_name`; the commits it pointed to stay in the store
    pub fn rm_branch(&mut self, branch_name: &str) -> anyhow::Result<()> {
        let branch = BranchName::try_parse(branch_name)
            .map_err(|_| RepoError::NoSuchBranch(BranchLookup::Removal))?;

        if &branch == self.head_branch() {
            return Err(RepoError::CannotRemoveCurrentBranch.into());
        }
        if !self.branches().contains(&branch) {
            return Err(RepoError::NoSuchBranch(BranchLookup::Removal).into());
        }

        if self.refs().branch_exists(&branch) {
            self.refs().delete_ref(&branch)?;
        }
        self.unregister_branch(&branch);

        self.save()
    }
}
