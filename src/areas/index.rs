//! Staging area
//!
//! Two pending change sets applied at the next commit:
//!
//! - `INDEX1`: staged additions, path -> blob id
//! - `INDEX2`: staged removals, a set of paths
//!
//! Both files are always rewritten together. A fresh repository has neither, which reads as
//! an empty staging area.

use crate::artifacts::core::{read_locked, write_locked};
use crate::artifacts::encoding::{Decode, Encode};
use crate::artifacts::objects::commit::Mapping;
use crate::artifacts::objects::object_id::ObjectId;
use anyhow::Context;
use std::collections::{BTreeMap, BTreeSet};
use std::path::Path;

pub const ADDITIONS_FILE: &str = "INDEX1";
pub const REMOVALS_FILE: &str = "INDEX2";

#[derive(Debug, Clone)]
pub struct Index {
    /// Path to the metadata directory (`.gitlite`)
    path: Box<Path>,
    additions: BTreeMap<String, ObjectId>,
    removals: BTreeSet<String>,
    /// Flag indicating if the staging area has been modified since loading
    changed: bool,
}

impl Index {
    pub fn new(path: Box<Path>) -> Self {
        Index {
            path,
            additions: BTreeMap::new(),
            removals: BTreeSet::new(),
            changed: false,
        }
    }

    /// Load both staging files from disk
    ///
    /// Missing files leave the corresponding set empty.
    pub fn rehydrate(&mut self) -> anyhow::Result<()> {
        self.additions = match read_locked(&self.additions_path())? {
            Some(content) => BTreeMap::from_bytes(&content).context("Corrupt staged additions")?,
            None => BTreeMap::new(),
        };
        self.removals = match read_locked(&self.removals_path())? {
            Some(content) => BTreeSet::from_bytes(&content).context("Corrupt staged removals")?,
            None => BTreeSet::new(),
        };
        self.changed = false;

        Ok(())
    }

    pub fn write_updates(&mut self) -> anyhow::Result<()> {
        write_locked(&self.additions_path(), &self.additions.to_bytes()?)?;
        write_locked(&self.removals_path(), &self.removals.to_bytes()?)?;
        self.changed = false;

        Ok(())
    }

    pub fn is_changed(&self) -> bool {
        self.changed
    }

    pub fn is_empty(&self) -> bool {
        self.additions.is_empty() && self.removals.is_empty()
    }

    pub fn additions(&self) -> &BTreeMap<String, ObjectId> {
        &self.additions
    }

    pub fn removals(&self) -> &BTreeSet<String> {
        &self.removals
    }

    pub fn staged_blob(&self, path: &str) -> Option<&ObjectId> {
        self.additions.get(path)
    }

    pub fn is_staged_for_removal(&self, path: &str) -> bool {
        self.removals.contains(path)
    }

    /// Stage `path` for addition; an addition always cancels a pending removal
    pub fn stage_addition(&mut self, path: &str, oid: ObjectId) {
        tracing::debug!(path = %path, oid = %oid, "staged for addition");
        self.removals.remove(path);
        self.additions.insert(path.to_string(), oid);
        self.changed = true;
    }

    /// Drop a pending addition, returning whether there was one
    pub fn unstage_addition(&mut self, path: &str) -> bool {
        let removed = self.additions.remove(path).is_some();
        self.changed |= removed;

        removed
    }

    pub fn unstage_removal(&mut self, path: &str) -> bool {
        let removed = self.removals.remove(path);
        self.changed |= removed;

        removed
    }

    pub fn stage_removal(&mut self, path: &str) {
        tracing::debug!(path = %path, "staged for removal");
        self.additions.remove(path);
        self.removals.insert(path.to_string());
        self.changed = true;
    }

    pub fn clear(&mut self) {
        self.changed |= !self.is_empty();
        self.additions.clear();
        self.removals.clear();
    }

    /// Apply the staged changes to a snapshot
    ///
    /// Additions are applied first, then removals, so a path present in both sets ends up
    /// removed.
    pub fn apply_to(&self, mapping: &mut Mapping) {
        mapping.extend(
            self.additions
                .iter()
                .map(|(path, oid)| (path.clone(), oid.clone())),
        );
        self.removals.iter().for_each(|path| {
            mapping.remove(path);
        });
    }

    fn additions_path(&self) -> Box<Path> {
        self.path.join(ADDITIONS_FILE).into_boxed_path()
    }

    fn removals_path(&self) -> Box<Path> {
        self.path.join(REMOVALS_FILE).into_boxed_path()
    }
}
