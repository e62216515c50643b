//! Branch references and HEAD
//!
//! - `HEAD` holds the encoded name of the checked-out branch (there is no detached HEAD)
//! - `refs/heads/<name>` holds the encoded id of the branch tip; names containing `/` map to
//!   nested directories
//! - `BRANCHES` is the registry of every existing branch name
//!
//! Every file is written under an exclusive lock and read under a shared one.

use crate::artifacts::branch::branch_name::BranchName;
use crate::artifacts::core::{read_locked, write_locked};
use crate::artifacts::encoding::{Decode, Encode};
use crate::artifacts::objects::object_id::ObjectId;
use anyhow::Context;
use derive_new::new;
use std::collections::BTreeSet;
use std::path::Path;

/// Name of the HEAD file
pub const HEAD_REF_NAME: &str = "HEAD";

const BRANCHES_FILE: &str = "BRANCHES";

#[derive(Debug, new)]
pub struct Refs {
    /// Path to the metadata directory (`.gitlite`)
    path: Box<Path>,
}

impl Refs {
    /// Name of the checked-out branch
    ///
    /// A missing or unreadable HEAD is an error: nothing can proceed without it.
    pub fn read_head(&self) -> anyhow::Result<BranchName> {
        let content = read_locked(&self.head_path())?
            .with_context(|| format!("HEAD not found at {}", self.head_path().display()))?;

        BranchName::from_bytes(&content).context("Corrupt HEAD")
    }

    pub fn set_head(&self, branch_name: &BranchName) -> anyhow::Result<()> {
        tracing::debug!(branch = %branch_name, "HEAD moved");
        write_locked(&self.head_path(), &branch_name.to_bytes()?)
    }

    /// Tip of a branch, `None` when no ref file exists for it
    pub fn read_ref(&self, branch_name: &BranchName) -> anyhow::Result<Option<ObjectId>> {
        let ref_path = self.heads_path().join(branch_name.as_ref());

        read_locked(&ref_path)?
            .map(|content| {
                ObjectId::from_bytes(&content)
                    .with_context(|| format!("Corrupt ref file {}", ref_path.display()))
            })
            .transpose()
    }

    pub fn update_ref(&self, branch_name: &BranchName, oid: &ObjectId) -> anyhow::Result<()> {
        tracing::debug!(branch = %branch_name, oid = %oid, "ref updated");
        write_locked(
            &self.heads_path().join(branch_name.as_ref()),
            &oid.to_bytes()?,
        )
    }

    pub fn branch_exists(&self, branch_name: &BranchName) -> bool {
        self.heads_path().join(branch_name.as_ref()).is_file()
    }

    pub fn delete_ref(&self, branch_name: &BranchName) -> anyhow::Result<()> {
        let branch_path = self.heads_path().join(branch_name.as_ref());

        std::fs::remove_file(&branch_path)
            .with_context(|| format!("failed to delete branch file at {:?}", branch_path))?;
        self.prune_branch_empty_parent_dirs(&branch_path)?;
        tracing::debug!(branch = %branch_name, "ref deleted");

        Ok(())
    }

    /// Read the registry of branch names; a fresh repository has none
    pub fn read_branch_set(&self) -> anyhow::Result<BTreeSet<BranchName>> {
        match read_locked(&self.branches_path())? {
            Some(content) => BTreeSet::from_bytes(&content).context("Corrupt branch registry"),
            None => Ok(BTreeSet::new()),
        }
    }

    pub fn write_branch_set(&self, branches: &BTreeSet<BranchName>) -> anyhow::Result<()> {
        write_locked(&self.branches_path(), &branches.to_bytes()?)
    }

    fn prune_branch_empty_parent_dirs(&self, path: &Path) -> anyhow::Result<()> {
        if let Some(parent) = path.parent()
            && parent != self.heads_path().as_ref()
            && parent.read_dir()?.next().is_none()
        {
            std::fs::remove_dir(parent).with_context(|| {
                format!("failed to remove empty branch directory at {:?}", parent)
            })?;
            self.prune_branch_empty_parent_dirs(parent)?;
        }

        Ok(())
    }

    pub fn head_path(&self) -> Box<Path> {
        self.path.join(HEAD_REF_NAME).into_boxed_path()
    }

    pub fn refs_path(&self) -> Box<Path> {
        self.path.join("refs").into_boxed_path()
    }

    pub fn heads_path(&self) -> Box<Path> {
        self.refs_path().join("heads").into_boxed_path()
    }

    fn branches_path(&self) -> Box<Path> {
        self.path.join(BRANCHES_FILE).into_boxed_path()
    }
}
