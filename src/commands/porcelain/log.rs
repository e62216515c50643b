use crate::areas::repository::Repository;
use crate::artifacts::objects::commit::Commit;
use crate::errors::RepoError;
use std::io::Write;

impl Repository {
    /// First-parent history from HEAD back to the root commit
    pub fn log(&self) -> anyhow::Result<()> {
        let mut current = Some(self.head_commit_id().clone());

        while let Some(commit_id) = current {
            let commit = self.database().load_commit(&commit_id)?;
            self.display_commit(&commit)?;

            current = commit.parent().cloned();
        }

        Ok(())
    }

    /// Every commit ever made, in id order
    pub fn global_log(&self) -> anyhow::Result<()> {
        for commit_id in self.commits() {
            let commit = self.database().load_commit(commit_id)?;
            self.display_commit(&commit)?;
        }

        Ok(())
    }

    /// Print the id of every commit whose message is exactly `message`
    pub fn find(&self, message: &str) -> anyhow::Result<()> {
        let mut found = false;

        for commit_id in self.commits() {
            let commit = self.database().load_commit(commit_id)?;
            if commit.message() == message {
                writeln!(self.writer(), "{}", commit_id)?;
                found = true;
            }
        }

        if !found {
            return Err(RepoError::MessageNotFound.into());
        }

        Ok(())
    }

    fn display_commit(&self, commit: &Commit) -> anyhow::Result<()> {
        let mut writer = self.writer();

        writeln!(writer, "===")?;
        writeln!(writer, "commit {}", commit.id())?;
        if let [first, second, ..] = commit.parents() {
            writeln!(
                writer,
                "Merge: {} {}",
                first.to_short_oid(),
                second.to_short_oid()
            )?;
        }
        writeln!(writer, "Date: {}", commit.readable_timestamp())?;
        writeln!(writer, "{}", commit.message())?;
        writeln!(writer)?;

        Ok(())
    }
}
