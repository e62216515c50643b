use crate::areas::repository::Repository;
use crate::artifacts::objects::object_id::ObjectId;
use crate::errors::RepoError;

impl Repository {
    /// Move the current branch to the commit with the full id `commit_id`
    pub fn reset(&mut self, commit_id: &str) -> anyhow::Result<()> {
        let commit_id = ObjectId::try_parse(commit_id.to_string())
            .map_err(|_| RepoError::NoSuchCommit)?;
        if !self.commits().contains(&commit_id) {
            return Err(RepoError::NoSuchCommit.into());
        }

        self.reset_to(commit_id)
    }

    /// Sync the working tree to `commit_id` and point the current branch at it
    pub(crate) fn reset_to(&mut self, commit_id: ObjectId) -> anyhow::Result<()> {
        let target = self.database().load_commit(&commit_id)?;
        self.sync_working_tree(target.mapping())?;

        tracing::debug!(branch = %self.head_branch(), to = %commit_id, "resetting branch");
        self.advance_head(commit_id);

        self.save()
    }
}
