use crate::areas::repository::{Repository, Touched};
use crate::areas::workspace::METADATA_DIR;
use crate::artifacts::branch::branch_name::BranchName;
use crate::artifacts::objects::commit::CommitDraft;
use crate::errors::RepoError;
use anyhow::Context;
use std::fs;
use std::io::Write;
use std::path::Path;

impl Repository {
    /// Create a repository at `root` holding only the root commit on `master`
    pub fn init(root: &Path, writer: Box<dyn Write>) -> anyhow::Result<Self> {
        if root.join(METADATA_DIR).exists() {
            return Err(RepoError::RepositoryAlreadyExists.into());
        }

        let mut repository = Self::unloaded(root, writer)?;

        fs::create_dir_all(repository.database().objects_path())
            .context("Failed to create .gitlite/objects directory")?;
        fs::create_dir_all(repository.refs().heads_path())
            .context("Failed to create .gitlite/refs/heads directory")?;

        let root_commit = CommitDraft::root().seal()?;
        let root_id = repository
            .database()
            .store(&root_commit)
            .context("Failed to store the root commit")?;

        let branch = BranchName::default_branch();
        repository.register_commit(root_id.clone());
        repository.register_branch(branch.clone());
        repository.switch_branch(branch, root_id);
        // start with an empty staging pair on disk
        repository.touch(Touched::INDEX);
        repository.save()?;

        writeln!(
            repository.writer(),
            "Initialized empty Gitlite repository in {}",
            repository.path().display()
        )?;

        Ok(repository)
    }
}
