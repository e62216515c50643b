//! Repository object types
//!
//! The object store holds two kinds of immutable objects, both addressed by the SHA-1 digest
//! of their content:
//!
//! - **Blob**: the raw bytes of one file version
//! - **Commit**: a complete path -> blob snapshot plus message, parents and timestamp
//!
//! Blobs are stored verbatim. Commits are stored in the length-prefixed encoding from
//! `artifacts::encoding`, with their own id as the leading field.

pub mod blob;
pub mod commit;
pub mod object;
pub mod object_id;
pub mod object_type;

/// Length of a SHA-1 hash in hexadecimal format
pub const OBJECT_ID_LENGTH: usize = 40;
