use crate::areas::repository::Repository;
use crate::artifacts::objects::commit::{Commit, CommitDraft, load_commit_timestamp};
use crate::artifacts::objects::object_id::ObjectId;

impl Repository {
    /// Record the staging area on top of the head snapshot and advance the current branch
    ///
    /// Staged additions are applied before staged removals, so a path staged both ways is
    /// left out of the new snapshot. The staging area is cleared afterwards; persisting
    /// everything is left to the caller's `save`.
    pub(crate) fn write_commit(
        &mut self,
        message: String,
        parents: Vec<ObjectId>,
    ) -> anyhow::Result<Commit> {
        let mut mapping = self.head_commit()?.mapping().clone();
        self.index().apply_to(&mut mapping);

        let timestamp = load_commit_timestamp()?;
        let commit = CommitDraft::new(message, parents, timestamp, mapping).seal()?;
        let commit_id = self.database().store(&commit)?;

        self.register_commit(commit_id.clone());
        self.index_mut().clear();
        self.advance_head(commit_id);

        Ok(commit)
    }
}
