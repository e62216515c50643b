use crate::areas::repository::Repository;
use crate::artifacts::objects::object_id::ObjectId;
use crate::errors::RepoError;

impl Repository {
    pub fn commit(&mut self, message: &str) -> anyhow::Result<ObjectId> {
        if message.is_empty() {
            return Err(RepoError::EmptyCommitMessage.into());
        }
        if self.index().is_empty() {
            return Err(RepoError::NothingStaged.into());
        }

        let parent = self.head_commit_id().clone();
        let commit = self.write_commit(message.to_string(), vec![parent])?;
        self.save()?;

        Ok(commit.id().clone())
    }
}
