use crate::areas::repository::Repository;
use crate::artifacts::branch::branch_name::BranchName;
use crate::artifacts::checkout::conflict::ensure_no_untracked_in_the_way;
use crate::artifacts::checkout::migration::Migration;
use crate::artifacts::merge::conflict::conflict_block;
use crate::artifacts::merge::merge_base::MergeBaseFinder;
use crate::artifacts::merge::three_way::{MergeAction, MergePlan};
use crate::artifacts::objects::blob::Blob;
use crate::artifacts::objects::object_id::ObjectId;
use crate::errors::{BranchLookup, RepoError};
use anyhow::Context;
use bytes::Bytes;
use std::collections::{BTreeMap, BTreeSet};

/// Non-error result of a merge
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MergeOutcome {
    /// The current branch was an ancestor of the merged one and now points at its tip
    FastForwarded,
    /// The merged branch is already part of the current history
    AlreadyUpToDate,
    /// A two-parent merge commit was created
    Merged {
        commit_id: ObjectId,
        conflicted: bool,
    },
}

impl Repository {
    pub fn merge(&mut self, branch_name: &str) -> anyhow::Result<MergeOutcome> {
        let branch = BranchName::try_parse(branch_name)
            .map_err(|_| RepoError::NoSuchBranch(BranchLookup::Merge))?;
        let their_id = self
            .refs()
            .read_ref(&branch)?
            .ok_or(RepoError::NoSuchBranch(BranchLookup::Merge))?;

        if &branch == self.head_branch() {
            return Err(RepoError::SelfMerge.into());
        }
        if !self.index().is_empty() {
            return Err(RepoError::DirtyMerge.into());
        }

        let our_id = self.head_commit_id().clone();
        let base_id = MergeBaseFinder::new(|oid: &ObjectId| self.database().slim_commit(oid))
            .find_merge_base(&our_id, &their_id)?
            .with_context(|| format!("{} and {} share no history", our_id, their_id))?;
        tracing::debug!(ours = %our_id, theirs = %their_id, base = %base_id, "merge base found");

        if base_id == our_id {
            self.reset_to(their_id)?;
            return Ok(MergeOutcome::FastForwarded);
        }
        if base_id == their_id {
            return Ok(MergeOutcome::AlreadyUpToDate);
        }

        let conflicted = self.apply_three_way(&base_id, &our_id, &their_id)?;

        let message = format!("Merged {} into {}.", branch, self.head_branch());
        let commit = self.write_commit(message, vec![our_id, their_id])?;
        self.save()?;

        Ok(MergeOutcome::Merged {
            commit_id: commit.id().clone(),
            conflicted,
        })
    }

    /// Write the merge result into the working tree and stage it
    ///
    /// Returns whether any path ended in conflict.
    fn apply_three_way(
        &mut self,
        base_id: &ObjectId,
        our_id: &ObjectId,
        their_id: &ObjectId,
    ) -> anyhow::Result<bool> {
        let base = self.database().load_commit(base_id)?;
        let ours = self.database().load_commit(our_id)?;
        let theirs = self.database().load_commit(their_id)?;

        let plan = MergePlan::build(base.mapping(), ours.mapping(), theirs.mapping());

        let mut deletions = BTreeSet::new();
        let mut writes = BTreeMap::new();

        for (path, action) in plan.actions() {
            match action {
                MergeAction::KeepOurs => {}
                MergeAction::TakeTheirs(blob_id) => {
                    writes.insert(path.clone(), blob_id.clone());
                }
                MergeAction::Delete => {
                    deletions.insert(path.clone());
                }
                MergeAction::Conflict { ours, theirs } => {
                    let block = conflict_block(
                        self.load_side(ours.as_ref())?.as_deref(),
                        self.load_side(theirs.as_ref())?.as_deref(),
                    );
                    let blob_id = self.database().store(&Blob::new(block))?;
                    tracing::debug!(path = %path, "merge conflict");

                    writes.insert(path.clone(), blob_id);
                }
            }
        }

        {
            let migration = Migration::new(self.database(), deletions.clone(), writes.clone());
            ensure_no_untracked_in_the_way(self.workspace(), ours.mapping(), &migration)?;
            self.workspace().apply_migration(&migration)?;
        }

        let index = self.index_mut();
        for (path, blob_id) in writes {
            index.stage_addition(&path, blob_id);
        }
        for path in deletions {
            index.stage_removal(&path);
        }

        Ok(plan.has_conflicts())
    }

    fn load_side(&self, blob_id: Option<&ObjectId>) -> anyhow::Result<Option<Bytes>> {
        match blob_id {
            Some(blob_id) => Ok(Some(self.database().load_blob(blob_id)?.into_content())),
            None => Ok(None),
        }
    }
}
