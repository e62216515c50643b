use crate::areas::repository::Repository;
use crate::artifacts::objects::object::Object;
use crate::artifacts::objects::object_id::ObjectId;
use crate::artifacts::status::file_change::WorkspaceChange;
use crate::artifacts::status::status_info::StatusInfo;
use std::collections::{BTreeMap, BTreeSet};
use std::io::Write;

// Terminology:
// - staged / removed: paths in the staging pair
// - modifications: tracked or staged files whose working copy no longer matches what
//   would be committed
// - untracked: working-tree files the next commit would not include
impl Repository {
    pub fn status(&self) -> anyhow::Result<StatusInfo> {
        let info = self.inspect_status()?;

        write!(self.writer(), "{}", info.render(self.colorize()))?;

        Ok(info)
    }

    pub(crate) fn inspect_status(&self) -> anyhow::Result<StatusInfo> {
        let head_commit = self.head_commit()?;
        let index = self.index();
        let mut modifications = BTreeMap::new();

        for (path, staged_id) in index.additions() {
            if let Some(change) = self.detect_workspace_change(path, staged_id)? {
                modifications.insert(path.clone(), change);
            }
        }

        for (path, head_id) in head_commit.mapping() {
            if index.staged_blob(path).is_some() || index.is_staged_for_removal(path) {
                continue;
            }
            if let Some(change) = self.detect_workspace_change(path, head_id)? {
                modifications.insert(path.clone(), change);
            }
        }

        let untracked = self
            .workspace()
            .list_files()?
            .into_iter()
            .filter(|path| {
                index.staged_blob(path).is_none()
                    && (!head_commit.tracks(path) || index.is_staged_for_removal(path))
            })
            .collect::<BTreeSet<_>>();

        Ok(StatusInfo {
            head_branch: self.head_branch().clone(),
            branches: self.branches().clone(),
            staged: index.additions().keys().cloned().collect(),
            removed: index.removals().clone(),
            modifications,
            untracked,
        })
    }

    fn detect_workspace_change(
        &self,
        path: &str,
        expected: &ObjectId,
    ) -> anyhow::Result<Option<WorkspaceChange>> {
        if !self.workspace().is_file(path) {
            return Ok(Some(WorkspaceChange::Deleted));
        }

        let actual = self.workspace().parse_blob(path)?.object_id()?;
        Ok((&actual != expected).then_some(WorkspaceChange::Modified))
    }
}
