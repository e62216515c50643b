use crate::areas::repository::Repository;
use crate::artifacts::branch::branch_name::BranchName;
use crate::artifacts::checkout::conflict::ensure_no_untracked_in_the_way;
use crate::artifacts::checkout::migration::Migration;
use crate::artifacts::objects::commit::{Commit, Mapping};
use crate::artifacts::objects::object_id::ObjectId;
use crate::errors::{BranchLookup, RepoError};
use std::ops::Bound;

impl Repository {
    /// Restore `path` from the head commit
    pub fn checkout_file(&self, path: &str) -> anyhow::Result<()> {
        let head_commit = self.head_commit()?;

        self.restore_file(&head_commit, path)
    }

    /// Restore `path` from the commit whose id starts with `commit_prefix`
    pub fn checkout_file_in_commit(&self, commit_prefix: &str, path: &str) -> anyhow::Result<()> {
        let commit_id = self.resolve_commit_prefix(commit_prefix)?;
        let commit = self.database().load_commit(&commit_id)?;

        self.restore_file(&commit, path)
    }

    /// Switch to `branch_name`, replacing the working tree with its tip snapshot
    pub fn checkout_branch(&mut self, branch_name: &str) -> anyhow::Result<()> {
        let branch = BranchName::try_parse(branch_name)
            .map_err(|_| RepoError::NoSuchBranch(BranchLookup::Checkout))?;

        if &branch == self.head_branch() {
            return Err(RepoError::AlreadyOnBranch.into());
        }
        if !self.branches().contains(&branch) {
            return Err(RepoError::NoSuchBranch(BranchLookup::Checkout).into());
        }
        let target_id = self
            .refs()
            .read_ref(&branch)?
            .ok_or(RepoError::NoSuchBranch(BranchLookup::Checkout))?;

        let target = self.database().load_commit(&target_id)?;
        self.sync_working_tree(target.mapping())?;

        tracing::debug!(from = %self.head_branch(), to = %branch, "switching branch");
        self.switch_branch(branch, target_id);

        self.save()
    }

    /// Make the working tree reflect `target` and empty the staging area
    ///
    /// Fails before touching any file when an untracked file sits on a path `target` would
    /// write, inside a directory `target` replaces with a file, or where `target` needs a
    /// directory.
    pub(crate) fn sync_working_tree(&mut self, target: &Mapping) -> anyhow::Result<()> {
        let current = self.head_commit()?;

        {
            let migration = Migration::between(self.database(), current.mapping(), target);
            ensure_no_untracked_in_the_way(self.workspace(), current.mapping(), &migration)?;

            self.workspace().apply_migration(&migration)?;
        }

        self.index_mut().clear();

        Ok(())
    }

    /// Smallest stored commit id starting with `commit_prefix`
    pub(crate) fn resolve_commit_prefix(&self, commit_prefix: &str) -> anyhow::Result<ObjectId> {
        let prefix = commit_prefix.to_lowercase();
        if prefix.is_empty() {
            return Err(RepoError::NoSuchCommit.into());
        }

        self.commits()
            .range::<str, _>((Bound::Included(prefix.as_str()), Bound::Unbounded))
            .next()
            .filter(|commit_id| commit_id.starts_with(&prefix))
            .cloned()
            .ok_or_else(|| RepoError::NoSuchCommit.into())
    }

    fn restore_file(&self, commit: &Commit, path: &str) -> anyhow::Result<()> {
        let path = self
            .workspace()
            .normalize(path)
            .map_err(|error| RepoError::rejected_path(&error, RepoError::PathNotInCommit))?;
        let blob_id = commit.blob_at(&path).ok_or(RepoError::PathNotInCommit)?;
        let blob = self.database().load_blob(blob_id)?;

        tracing::debug!(path = %path, commit = %commit.id(), "restoring file");
        self.workspace().write_file(&path, blob.content())
    }
}
