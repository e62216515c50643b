//! Content-addressed object store
//!
//! Objects live at `objects/<first 2 hex chars>/<remaining 38>`. The store performs no hashing
//! of its own beyond asking the object for its id, and never deletes anything.
//!
//! The registry of every commit id ever created (`COMMITS`) is kept next to the objects; it
//! drives `global-log`, `find` and abbreviated-id resolution.

use crate::artifacts::core::{read_locked, write_locked};
use crate::artifacts::encoding::{Decode, Encode};
use crate::artifacts::objects::blob::Blob;
use crate::artifacts::objects::commit::{Commit, SlimCommit};
use crate::artifacts::objects::object::{Object, Unpackable};
use crate::artifacts::objects::object_id::ObjectId;
use anyhow::Context;
use bytes::Bytes;
use fake::rand;
use std::collections::BTreeSet;
use std::io::{Cursor, Write};
use std::path::{Path, PathBuf};

#[derive(Debug)]
pub struct Database {
    path: Box<Path>,
    commits_path: Box<Path>,
}

impl Database {
    pub fn new(path: Box<Path>, commits_path: Box<Path>) -> Self {
        Database { path, commits_path }
    }

    pub fn objects_path(&self) -> &Path {
        &self.path
    }

    pub fn store(&self, object: &impl Object) -> anyhow::Result<ObjectId> {
        let object_id = object.object_id()?;
        let object_path = self.path.join(object.object_path()?);

        // content addressing: an existing file already holds these exact bytes
        if object_path.exists() {
            tracing::trace!(oid = %object_id, "object already stored");
            return Ok(object_id);
        }

        std::fs::create_dir_all(
            object_path
                .parent()
                .context(format!("Invalid object path {}", object_path.display()))?,
        )
        .context(format!(
            "Unable to create object directory {}",
            object_path.display()
        ))?;

        self.write_object(object_path, object.serialize()?)?;
        tracing::debug!(oid = %object_id, kind = %object.object_type(), "stored object");

        Ok(object_id)
    }

    pub fn load(&self, object_id: &ObjectId) -> anyhow::Result<Bytes> {
        let object_path = self.path.join(object_id.to_path());

        let object_content = std::fs::read(&object_path).context(format!(
            "Unable to read object {} at {}",
            object_id,
            object_path.display()
        ))?;

        Ok(object_content.into())
    }

    pub fn load_blob(&self, object_id: &ObjectId) -> anyhow::Result<Blob> {
        Blob::deserialize(Cursor::new(self.load(object_id)?))
    }

    pub fn load_commit(&self, object_id: &ObjectId) -> anyhow::Result<Commit> {
        Commit::deserialize(Cursor::new(self.load(object_id)?))
            .with_context(|| format!("Unable to parse commit {}", object_id))
    }

    pub fn slim_commit(&self, object_id: &ObjectId) -> anyhow::Result<SlimCommit> {
        Ok(self.load_commit(object_id)?.to_slim())
    }

    /// Read the registry of every commit id; a fresh repository has none
    pub fn read_commit_set(&self) -> anyhow::Result<BTreeSet<ObjectId>> {
        match read_locked(&self.commits_path)? {
            Some(content) => BTreeSet::from_bytes(&content)
                .with_context(|| format!("Corrupt commit registry {}", self.commits_path.display())),
            None => Ok(BTreeSet::new()),
        }
    }

    pub fn write_commit_set(&self, commits: &BTreeSet<ObjectId>) -> anyhow::Result<()> {
        write_locked(&self.commits_path, &commits.to_bytes()?)
    }

    fn write_object(&self, object_path: PathBuf, object_content: Bytes) -> anyhow::Result<()> {
        let object_dir = object_path
            .parent()
            .context(format!("Invalid object path {}", object_path.display()))?;
        let temp_object_path = object_dir.join(Self::generate_temp_name());

        let mut file = std::fs::OpenOptions::new()
            .write(true)
            .create_new(true)
            .open(&temp_object_path)
            .context(format!(
                "Unable to open object file {}",
                temp_object_path.display()
            ))?;

        file.write_all(&object_content).context(format!(
            "Unable to write object file {}",
            temp_object_path.display()
        ))?;

        // rename the temp file to the object file to make it atomic
        std::fs::rename(&temp_object_path, &object_path).context(format!(
            "Unable to rename object file to {}",
            object_path.display()
        ))?;

        Ok(())
    }

    fn generate_temp_name() -> String {
        format!("tmp-obj-{}", rand::random::<u32>())
    }
}
