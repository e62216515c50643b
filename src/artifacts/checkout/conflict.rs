use crate::areas::workspace::Workspace;
use crate::artifacts::checkout::migration::Migration;
use crate::artifacts::objects::commit::Mapping;
use crate::errors::RepoError;
use std::collections::BTreeSet;

/// Working-tree file standing where a migration needs to write
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord)]
pub enum Obstruction {
    /// A file the current snapshot does not know about
    Untracked(String),
    /// A tracked file the migration keeps, yet needs the spot for something else
    Tracked(String),
}

/// Everything that would stop `migration` from applying cleanly
///
/// `tracked` is the snapshot the working tree currently reflects. For every incoming path,
/// the file at that path, the files inside a directory at that path, and a file standing in
/// for one of its parent directories all count, unless the migration deletes them first.
pub fn obstructions(
    workspace: &Workspace,
    tracked: &Mapping,
    migration: &Migration,
) -> BTreeSet<Obstruction> {
    let classify = |path: &str| {
        if !tracked.contains_key(path) {
            Some(Obstruction::Untracked(path.to_string()))
        } else if migration.deletions().contains(path) {
            None
        } else {
            Some(Obstruction::Tracked(path.to_string()))
        }
    };
    let mut found = BTreeSet::new();

    for path in migration.incoming_paths() {
        if workspace.is_file(path) {
            if !tracked.contains_key(path) {
                found.insert(Obstruction::Untracked(path.clone()));
            }
        } else if workspace.is_dir(path) {
            found.extend(
                workspace
                    .files_under(path)
                    .iter()
                    .filter_map(|file| classify(file.as_str())),
            );
        }

        for parent in parent_dirs(path) {
            if workspace.is_file(parent) {
                found.extend(classify(parent));
                break;
            }
            if !workspace.is_dir(parent) {
                break;
            }
        }
    }

    found
}

/// Pre-flight check run before any destructive write
///
/// Once it passes, applying `migration` cannot fail on the shape of the working tree.
pub fn ensure_no_untracked_in_the_way(
    workspace: &Workspace,
    tracked: &Mapping,
    migration: &Migration,
) -> anyhow::Result<()> {
    let found = obstructions(workspace, tracked, migration);

    if found.is_empty() {
        return Ok(());
    }
    tracing::debug!(obstructions = ?found, "working tree blocks the migration");

    if found
        .iter()
        .any(|obstruction| matches!(obstruction, Obstruction::Untracked(_)))
    {
        return Err(RepoError::UntrackedFileInWay.into());
    }
    anyhow::bail!("tracked files stand where the result must be written: {found:?}")
}

/// `a` and `a/b` for `a/b/c.txt`, outermost first
fn parent_dirs(path: &str) -> impl Iterator<Item = &str> {
    path.match_indices('/').map(move |(at, _)| &path[..at])
}
