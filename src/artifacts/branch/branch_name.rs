use crate::artifacts::branch::{DEFAULT_BRANCH, INVALID_BRANCH_NAME_REGEX};
use crate::artifacts::encoding::{Decode, Encode};
use crate::errors::RepoError;
use anyhow::Context;
use std::io::{Read, Write};

/// Validated branch name
///
/// Branch names double as file names under `refs/heads`, so they must not escape that
/// directory or collide with lock and temp files. Names may contain `/` to group branches.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct BranchName(String);

impl BranchName {
    pub fn try_parse(name: impl Into<String>) -> anyhow::Result<Self> {
        let name = name.into();
        if name.is_empty() {
            return Err(RepoError::InvalidBranchName(name).into());
        }

        let re = regex::Regex::new(INVALID_BRANCH_NAME_REGEX)
            .with_context(|| format!("invalid branch name regex: {INVALID_BRANCH_NAME_REGEX}"))?;

        if re.is_match(&name) {
            Err(RepoError::InvalidBranchName(name).into())
        } else {
            Ok(Self(name))
        }
    }

    pub fn default_branch() -> Self {
        Self(DEFAULT_BRANCH.to_string())
    }
}

impl Default for BranchName {
    fn default() -> Self {
        Self::default_branch()
    }
}

impl AsRef<str> for BranchName {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for BranchName {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl Encode for BranchName {
    fn encode<W: Write>(&self, writer: &mut W) -> anyhow::Result<()> {
        self.0.encode(writer)
    }
}

impl Decode for BranchName {
    fn decode<R: Read>(reader: &mut R) -> anyhow::Result<Self> {
        let name = String::decode(reader)?;
        Self::try_parse(name).context("Stored branch name is corrupt")
    }
}
