use crate::artifacts::checkout::migration::Migration;
use crate::artifacts::objects::blob::Blob;
use anyhow::Context;
use bytes::Bytes;
use std::io::Write;
use std::path::{Component, Path, PathBuf};
use walkdir::WalkDir;

/// Metadata directory, never part of the working tree
pub const METADATA_DIR: &str = ".gitlite";

/// Working tree rooted at the repository root
///
/// Paths crossing this boundary are `/`-separated strings relative to the root, the same
/// keys commit mappings and the staging area use.
#[derive(Debug)]
pub struct Workspace {
    path: Box<Path>,
}

impl Workspace {
    pub fn new(path: Box<Path>) -> Self {
        Workspace { path }
    }

    /// Turn a user-supplied path into a mapping key
    ///
    /// Rejects absolute paths, `..` components and anything inside the metadata directory.
    pub fn normalize(&self, path: &str) -> anyhow::Result<String> {
        let mut components = Vec::new();

        for component in Path::new(path).components() {
            match component {
                Component::Normal(name) => components.push(
                    name.to_str()
                        .with_context(|| format!("path is not valid UTF-8: {path}"))?,
                ),
                Component::CurDir => {}
                Component::ParentDir | Component::RootDir | Component::Prefix(_) => {
                    anyhow::bail!("path is outside the working tree: {path}")
                }
            }
        }

        match components.first() {
            None => anyhow::bail!("path names no file: {path:?}"),
            Some(&METADATA_DIR) => anyhow::bail!("path is inside the repository metadata: {path}"),
            Some(_) => Ok(components.join("/")),
        }
    }

    fn resolve(&self, file_path: &str) -> PathBuf {
        self.path.join(file_path)
    }

    pub fn is_file(&self, file_path: &str) -> bool {
        self.resolve(file_path).is_file()
    }

    pub fn is_dir(&self, dir_path: &str) -> bool {
        self.resolve(dir_path).is_dir()
    }

    /// Every regular file below `dir_path`, sorted, as mapping keys
    pub fn files_under(&self, dir_path: &str) -> Vec<String> {
        let mut files = WalkDir::new(self.resolve(dir_path))
            .min_depth(1)
            .into_iter()
            .filter_map(|entry| entry.ok())
            .filter(|entry| entry.file_type().is_file())
            .filter_map(|entry| self.to_key(entry.path()))
            .collect::<Vec<_>>();
        files.sort();

        files
    }

    /// Every regular file in the working tree, sorted, as mapping keys
    pub fn list_files(&self) -> anyhow::Result<Vec<String>> {
        let mut files = WalkDir::new(&self.path)
            .min_depth(1)
            .into_iter()
            .filter_entry(|entry| entry.file_name() != METADATA_DIR)
            .filter_map(|entry| entry.ok())
            .filter(|entry| entry.file_type().is_file())
            .filter_map(|entry| self.to_key(entry.path()))
            .collect::<Vec<_>>();
        files.sort();

        Ok(files)
    }

    fn to_key(&self, path: &Path) -> Option<String> {
        let relative = path.strip_prefix(&self.path).ok()?;

        relative
            .components()
            .map(|component| component.as_os_str().to_str())
            .collect::<Option<Vec<_>>>()
            .map(|components| components.join("/"))
    }

    pub fn read_file(&self, file_path: &str) -> anyhow::Result<Bytes> {
        let content = std::fs::read(self.resolve(file_path))
            .with_context(|| format!("Failed to read file: {:?}", file_path))?;

        Ok(content.into())
    }

    pub fn parse_blob(&self, file_path: &str) -> anyhow::Result<Blob> {
        Ok(Blob::new(self.read_file(file_path)?))
    }

    /// Replace the content of a file, creating parent directories on demand
    ///
    /// Never removes a file standing where a directory is needed, nor a directory holding
    /// files; only a directory tree without any file gives way.
    pub fn write_file(&self, file_path: &str, data: &[u8]) -> anyhow::Result<()> {
        let path = self.resolve(file_path);

        if let Some(parent) = path.parent() {
            if let Some(blocker) = parent
                .ancestors()
                .take_while(|ancestor| *ancestor != self.path.as_ref())
                .find(|ancestor| ancestor.is_file())
            {
                anyhow::bail!("Refusing to replace file {:?} with a directory", blocker);
            }
            std::fs::create_dir_all(parent)
                .with_context(|| format!("Failed to create directory: {:?}", parent))?;
        }

        if path.is_dir() {
            if !self.files_under(file_path).is_empty() {
                anyhow::bail!("Refusing to replace directory {:?} holding files", file_path);
            }
            std::fs::remove_dir_all(&path)
                .with_context(|| format!("Failed to remove empty directory: {:?}", file_path))?;
        }

        let mut file = std::fs::OpenOptions::new()
            .write(true)
            .create(true)
            .truncate(true)
            .open(&path)
            .with_context(|| format!("Failed to open file: {:?}", file_path))?;

        file.write_all(data)
            .with_context(|| format!("Failed to write to file: {:?}", file_path))?;

        Ok(())
    }

    /// Delete a file if present and prune the directories it leaves empty
    pub fn remove_file(&self, file_path: &str) -> anyhow::Result<()> {
        let path = self.resolve(file_path);

        if path.is_file() {
            std::fs::remove_file(&path)
                .with_context(|| format!("Failed to remove file: {:?}", file_path))?;
        }
        self.prune_empty_parent_dirs(&path)
    }

    fn prune_empty_parent_dirs(&self, path: &Path) -> anyhow::Result<()> {
        if let Some(parent) = path.parent()
            && parent != self.path.as_ref()
            && parent.is_dir()
            && parent.read_dir()?.next().is_none()
        {
            std::fs::remove_dir(parent)
                .with_context(|| format!("Failed to remove empty directory: {:?}", parent))?;
            self.prune_empty_parent_dirs(parent)?;
        }

        Ok(())
    }

    // The order of applying migrations is important:
    // deletions go first so a file can be replaced by a directory of the same name.
    pub fn apply_migration(&self, migration: &Migration) -> anyhow::Result<()> {
        migration
            .deletions()
            .iter()
            .try_for_each(|file_path| self.remove_file(file_path))?;

        migration.writes().iter().try_for_each(|(file_path, oid)| {
            let data = migration.load_blob_data(oid)?;
            self.write_file(file_path, &data)
        })
    }
}
