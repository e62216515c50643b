use crate::areas::database::Database;
use crate::artifacts::objects::commit::Mapping;
use crate::artifacts::objects::object_id::ObjectId;
use anyhow::Context;
use bytes::Bytes;
use std::collections::{BTreeMap, BTreeSet};

/// Planned working-tree changes
///
/// `deletions` are files to remove, `writes` are files to (re)write from the object store.
pub struct Migration<'r> {
    database: &'r Database,
    deletions: BTreeSet<String>,
    writes: BTreeMap<String, ObjectId>,
}

impl<'r> Migration<'r> {
    pub fn new(
        database: &'r Database,
        deletions: BTreeSet<String>,
        writes: BTreeMap<String, ObjectId>,
    ) -> Self {
        Self {
            database,
            deletions,
            writes,
        }
    }

    /// Plan the switch from one full snapshot to another
    ///
    /// Files tracked in `current` but absent from `target` are deleted; every file of
    /// `target` is written.
    pub fn between(database: &'r Database, current: &Mapping, target: &Mapping) -> Self {
        let deletions = current
            .keys()
            .filter(|path| !target.contains_key(*path))
            .cloned()
            .collect();

        Self::new(database, deletions, target.clone())
    }

    pub fn deletions(&self) -> &BTreeSet<String> {
        &self.deletions
    }

    pub fn writes(&self) -> &BTreeMap<String, ObjectId> {
        &self.writes
    }

    /// Paths this migration would create or overwrite
    pub fn incoming_paths(&self) -> impl Iterator<Item = &String> {
        self.writes.keys()
    }

    pub fn load_blob_data(&self, object_id: &ObjectId) -> anyhow::Result<Bytes> {
        let blob = self
            .database
            .load_blob(object_id)
            .with_context(|| format!("Failed to load blob object {}", object_id))?;

        Ok(blob.into_content())
    }
}
