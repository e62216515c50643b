//! Shared I/O utilities
//!
//! - `PagerWriter`: adapts the minus pager to `std::io::Write`
//! - `read_locked` / `write_locked`: whole-file access to the repository side files
//!   (HEAD, branch refs, staging pair, registries) under a `file-guard` lock

use anyhow::Context;
use bytes::Bytes;
use derive_new::new;
use file_guard::Lock;
use minus::Pager;
use std::io::{self, Read, Write};
use std::ops::DerefMut;
use std::path::Path;

/// Wrapper that implements `Write` for the minus pager
///
/// The minus pager doesn't implement `std::io::Write` directly, so this wrapper adapts it
/// for use as the repository writer of commands with long output (`log`, `global-log`).
#[derive(new)]
pub struct PagerWriter {
    pager: Pager,
}

impl PagerWriter {
    pub fn pager(&self) -> &Pager {
        &self.pager
    }
}

impl Write for PagerWriter {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        let s =
            std::str::from_utf8(buf).map_err(|e| io::Error::new(io::ErrorKind::InvalidData, e))?;
        self.pager.push_str(s).map_err(io::Error::other)?;
        Ok(buf.len())
    }

    fn flush(&mut self) -> io::Result<()> {
        Ok(())
    }
}

/// Read a whole side file under a shared lock
///
/// Returns `None` when the file does not exist.
pub fn read_locked(path: &Path) -> anyhow::Result<Option<Bytes>> {
    if !path.exists() {
        return Ok(None);
    }

    let mut file = std::fs::OpenOptions::new()
        .read(true)
        .open(path)
        .with_context(|| format!("Unable to open {}", path.display()))?;
    let mut lock = file_guard::lock(&mut file, Lock::Shared, 0, 1)
        .with_context(|| format!("Unable to lock {}", path.display()))?;

    let mut content = Vec::new();
    lock.deref_mut()
        .read_to_end(&mut content)
        .with_context(|| format!("Unable to read {}", path.display()))?;

    Ok(Some(Bytes::from(content)))
}

/// Replace the content of a side file under an exclusive lock
///
/// Parent directories are created on demand. The file is truncated only once the lock is
/// held, so concurrent readers never observe a half-written file through `read_locked`.
pub fn write_locked(path: &Path, content: &[u8]) -> anyhow::Result<()> {
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)
            .with_context(|| format!("Unable to create directory {}", parent.display()))?;
    }

    let mut file = std::fs::OpenOptions::new()
        .write(true)
        .create(true)
        .truncate(false)
        .open(path)
        .with_context(|| format!("Unable to open {}", path.display()))?;
    let mut lock = file_guard::lock(&mut file, Lock::Exclusive, 0, 1)
        .with_context(|| format!("Unable to lock {}", path.display()))?;

    lock.deref_mut().set_len(0)?;
    lock.deref_mut()
        .write_all(content)
        .with_context(|| format!("Unable to write {}", path.display()))?;

    Ok(())
}
