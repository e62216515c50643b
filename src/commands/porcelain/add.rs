use crate::areas::repository::Repository;
use crate::artifacts::objects::object::Object;
use crate::errors::RepoError;

impl Repository {
    /// Stage the current content of `path`
    ///
    /// Content identical to the head commit's version unstages the path instead, and an add
    /// always cancels a pending removal.
    pub fn add(&mut self, path: &str) -> anyhow::Result<()> {
        let path = self
            .workspace()
            .normalize(path)
            .map_err(|error| RepoError::rejected_path(&error, RepoError::FileNotFound))?;
        if !self.workspace().is_file(&path) {
            return Err(RepoError::FileNotFound.into());
        }

        let blob = self.workspace().parse_blob(&path)?;
        let blob_id = blob.object_id()?;
        let head_commit = self.head_commit()?;

        if head_commit.blob_at(&path) == Some(&blob_id) {
            self.index_mut().unstage_addition(&path);
            tracing::debug!(path = %path, "content matches HEAD, unstaged");
        } else {
            self.database().store(&blob)?;
            self.index_mut().stage_addition(&path, blob_id);
        }
        self.index_mut().unstage_removal(&path);

        self.save()
    }
}
