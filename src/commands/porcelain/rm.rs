use crate::areas::repository::Repository;
use crate::errors::RepoError;

impl Repository {
    /// Unstage `path`, and if HEAD tracks it, delete it and stage its removal
    pub fn rm(&mut self, path: &str) -> anyhow::Result<()> {
        let path = self
            .workspace()
            .normalize(path)
            .map_err(|error| RepoError::rejected_path(&error, RepoError::NothingToRemove))?;
        let tracked = self.head_commit()?.tracks(&path);

        // nothing is touched unless the removal is justified
        if self.index().staged_blob(&path).is_none() && !tracked {
            return Err(RepoError::NothingToRemove.into());
        }

        self.index_mut().unstage_addition(&path);
        if tracked {
            self.workspace().remove_file(&path)?;
            self.index_mut().stage_removal(&path);
        }

        self.save()
    }
}
