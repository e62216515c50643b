//! Commit object
//!
//! A commit is a complete snapshot of the tracked files (a path -> blob id mapping, not a
//! diff) plus the message, up to two parents and a timestamp truncated to whole seconds.
//!
//! The id of a commit is the digest of its encoded message, parents, timestamp and mapping,
//! in that order. Because the id is stored inside the commit, construction is split in two
//! phases: a `CommitDraft` holds every other field, and `CommitDraft::seal` hashes it and
//! returns the immutable `Commit`. A half-built commit is never observable.
//!
//! ## Format
//!
//! On disk: `id`, `message`, `parents`, `timestamp`, `mapping`, each in the length-prefixed
//! encoding of `artifacts::encoding`.

use crate::artifacts::encoding::{Decode, Encode};
use crate::artifacts::objects::object::{Object, Packable, Unpackable};
use crate::artifacts::objects::object_id::ObjectId;
use crate::artifacts::objects::object_type::ObjectType;
use anyhow::Context;
use bytes::Bytes;
use chrono::{DateTime, Utc};
use std::collections::BTreeMap;
use std::io::{BufRead, Write};

/// Complete snapshot of tracked files: working-tree relative path -> blob id
pub type Mapping = BTreeMap<String, ObjectId>;

/// Message of the commit created by `init`
pub const ROOT_COMMIT_MESSAGE: &str = "initial commit";

/// Environment variable overriding the commit timestamp
pub const COMMIT_DATE_ENV: &str = "GITLITE_DATE";

/// Read the timestamp for a new commit
///
/// Uses `GITLITE_DATE` when it is set (RFC 2822 or `%Y-%m-%d %H:%M:%S %z`), the current time
/// otherwise.
pub fn load_commit_timestamp() -> anyhow::Result<DateTime<Utc>> {
    match std::env::var(COMMIT_DATE_ENV) {
        Ok(date_str) => chrono::DateTime::parse_from_rfc2822(&date_str)
            .or_else(|_| chrono::DateTime::parse_from_str(&date_str, "%Y-%m-%d %H:%M:%S %z"))
            .map(|timestamp| timestamp.with_timezone(&Utc))
            .with_context(|| format!("{COMMIT_DATE_ENV} is not a valid date: {date_str}")),
        Err(_) => Ok(Utc::now()),
    }
}

/// Every commit field except the id
#[derive(Debug, Clone, Eq, PartialEq)]
pub struct CommitDraft {
    message: String,
    parents: Vec<ObjectId>,
    timestamp: DateTime<Utc>,
    mapping: Mapping,
}

impl CommitDraft {
    pub fn new(
        message: String,
        parents: Vec<ObjectId>,
        timestamp: DateTime<Utc>,
        mapping: Mapping,
    ) -> Self {
        // the encoding keeps whole seconds only, so the id must be computed over the same
        let timestamp = DateTime::from_timestamp(timestamp.timestamp(), 0).unwrap_or_default();

        CommitDraft {
            message,
            parents,
            timestamp,
            mapping,
        }
    }

    /// The parentless commit every repository starts from
    pub fn root() -> Self {
        Self::new(
            ROOT_COMMIT_MESSAGE.to_string(),
            Vec::new(),
            DateTime::UNIX_EPOCH,
            Mapping::new(),
        )
    }

    fn encode_fields<W: Write>(&self, writer: &mut W) -> anyhow::Result<()> {
        self.message.encode(writer)?;
        self.parents.encode(writer)?;
        self.timestamp.encode(writer)?;
        self.mapping.encode(writer)
    }

    /// Hash the draft and freeze it into a commit
    pub fn seal(self) -> anyhow::Result<Commit> {
        let mut content = Vec::new();
        self.encode_fields(&mut content)?;

        Ok(Commit {
            id: ObjectId::digest(&content),
            draft: self,
        })
    }
}

/// Slim representation of a commit
///
/// Carries only what graph traversals (merge base search) need.
#[derive(Debug, Clone, Eq, PartialEq)]
pub struct SlimCommit {
    pub oid: ObjectId,
    pub parents: Vec<ObjectId>,
}

#[derive(Debug, Clone, Eq, PartialEq)]
pub struct Commit {
    id: ObjectId,
    draft: CommitDraft,
}

impl Commit {
    pub fn id(&self) -> &ObjectId {
        &self.id
    }

    pub fn message(&self) -> &str {
        &self.draft.message
    }

    pub fn parents(&self) -> &[ObjectId] {
        &self.draft.parents
    }

    /// First parent, the one `log` follows
    pub fn parent(&self) -> Option<&ObjectId> {
        self.draft.parents.first()
    }

    pub fn timestamp(&self) -> DateTime<Utc> {
        self.draft.timestamp
    }

    pub fn mapping(&self) -> &Mapping {
        &self.draft.mapping
    }

    /// Blob id tracked at `path`, if any
    pub fn blob_at(&self, path: &str) -> Option<&ObjectId> {
        self.draft.mapping.get(path)
    }

    pub fn tracks(&self, path: &str) -> bool {
        self.draft.mapping.contains_key(path)
    }

    /// Format timestamp like "Thu Jan 1 00:00:00 1970 +0000", in local time
    pub fn readable_timestamp(&self) -> String {
        self.draft
            .timestamp
            .with_timezone(&chrono::Local)
            .format("%a %b %-d %H:%M:%S %Y %z")
            .to_string()
    }

    pub fn to_slim(&self) -> SlimCommit {
        SlimCommit {
            oid: self.id.clone(),
            parents: self.draft.parents.clone(),
        }
    }
}

impl Packable for Commit {
    fn serialize(&self) -> anyhow::Result<Bytes> {
        let mut content = Vec::new();
        self.id.encode(&mut content)?;
        self.draft.encode_fields(&mut content)?;

        Ok(Bytes::from(content))
    }
}

impl Unpackable for Commit {
    fn deserialize(mut reader: impl BufRead) -> anyhow::Result<Self> {
        let id = ObjectId::decode(&mut reader).context("Invalid commit object: missing id")?;
        let message = String::decode(&mut reader).context("Invalid commit object: message")?;
        let parents =
            Vec::<ObjectId>::decode(&mut reader).context("Invalid commit object: parents")?;
        let timestamp =
            DateTime::<Utc>::decode(&mut reader).context("Invalid commit object: timestamp")?;
        let mapping = Mapping::decode(&mut reader).context("Invalid commit object: mapping")?;

        let commit = CommitDraft::new(message, parents, timestamp, mapping).seal()?;
        if commit.id != id {
            anyhow::bail!(
                "Corrupt commit object: stored id {} does not match content digest {}",
                id,
                commit.id
            );
        }

        Ok(commit)
    }
}

impl Object for Commit {
    fn object_type(&self) -> ObjectType {
        ObjectType::Commit
    }

    fn object_id(&self) -> anyhow::Result<ObjectId> {
        Ok(self.id.clone())
    }
}
