//! Startup-file edits: reading, block replacement and atomic commits

use esrever_codec::{count_definitions, insert_block, installed_at, BlockSplit};
use esrever_format::{EsreverError, Result};
use serde::Serialize;
use std::fs;
use std::io::{self, Write};
use std::path::{Path, PathBuf};
use tempfile::NamedTempFile;
use tracing::{debug, info};

/// What uninstalling did.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum UninstallOutcome {
    /// A block was found and removed
    Removed,
    /// No block was present; the file was not touched
    NotInstalled,
}

/// Current state of the managed block in a startup file.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct BlockStatus {
    /// File inspected
    pub rc_file: PathBuf,
    /// Whether the file exists at all
    pub file_exists: bool,
    /// Whether a managed block is present
    pub installed: bool,
    /// Wrapper definitions inside the block
    pub wrapper_count: usize,
    /// Timestamp from the block header
    pub installed_at: Option<String>,
}

/// Read the startup file's raw bytes; `None` when it does not exist.
pub fn read_rc_file(path: &Path) -> Result<Option<Vec<u8>>> {
    match fs::read(path) {
        Ok(bytes) => Ok(Some(bytes)),
        Err(err) if err.kind() == io::ErrorKind::NotFound => Ok(None),
        Err(err) => Err(EsreverError::file_io(path, err)),
    }
}

/// Replace any managed block in `path` with `block`.
///
/// Returns whether a previous block was replaced. A missing file is created.
pub fn install_block(path: &Path, block: &str) -> Result<bool> {
    let current = read_rc_file(path)?.unwrap_or_default();
    let replaced = BlockSplit::parse(&current)?.has_block();
    let updated = insert_block(&current, block)?;
    write_atomic(path, &updated)?;
    info!(rc_file = %path.display(), replaced, "installed wrapper block");
    Ok(replaced)
}

/// Strip the managed block from `path`.
///
/// Leaves the file untouched (and does not create it) when no block exists.
pub fn uninstall_block(path: &Path) -> Result<UninstallOutcome> {
    let Some(current) = read_rc_file(path)? else {
        debug!(rc_file = %path.display(), "startup file missing, nothing to remove");
        return Ok(UninstallOutcome::NotInstalled);
    };
    let split = BlockSplit::parse(&current)?;
    if !split.has_block() {
        return Ok(UninstallOutcome::NotInstalled);
    }
    write_atomic(path, &split.without_block())?;
    info!(rc_file = %path.display(), "removed wrapper block");
    Ok(UninstallOutcome::Removed)
}

/// Inspect the managed block without modifying anything.
pub fn block_status(path: &Path) -> Result<BlockStatus> {
    let text = read_rc_file(path)?;
    let split = match &text {
        Some(text) => Some(BlockSplit::parse(text)?),
        None => None,
    };
    let block = split.as_ref().and_then(BlockSplit::block_text);
    Ok(BlockStatus {
        rc_file: path.to_path_buf(),
        file_exists: text.is_some(),
        installed: block.is_some(),
        wrapper_count: block.as_deref().map(count_definitions).unwrap_or(0),
        installed_at: block.as_deref().and_then(installed_at).map(str::to_string),
    })
}

/// Write `contents` to `path` via a temp file in the same directory + rename.
///
/// Readers see either the old or the new contents, never a mix. Existing
/// permissions are carried over, and a symlinked `path` is replaced at its
/// destination so the link survives.
pub fn write_atomic(path: &Path, contents: impl AsRef<[u8]>) -> Result<()> {
    let contents = contents.as_ref();
    let target = resolve_symlink(path);
    let parent = target
        .parent()
        .filter(|dir| !dir.as_os_str().is_empty())
        .unwrap_or_else(|| Path::new("."));
    fs::create_dir_all(parent).map_err(|err| EsreverError::file_io(parent, err))?;

    let permissions = fs::metadata(&target).ok().map(|meta| meta.permissions());

    let mut temp =
        NamedTempFile::new_in(parent).map_err(|err| EsreverError::file_io(parent, err))?;
    temp.write_all(contents)
        .and_then(|_| temp.as_file().sync_all())
        .map_err(|err| EsreverError::file_io(temp.path(), err))?;
    if let Some(permissions) = permissions {
        fs::set_permissions(temp.path(), permissions)
            .map_err(|err| EsreverError::file_io(temp.path(), err))?;
    }

    temp.persist(&target)
        .map_err(|err| EsreverError::file_io(&target, err.error))?;
    debug!(path = %target.display(), bytes = contents.len(), "committed file");
    Ok(())
}

/// Follow `path` if it is a symlink; otherwise return it unchanged.
fn resolve_symlink(path: &Path) -> PathBuf {
    let is_link = fs::symlink_metadata(path)
        .map(|meta| meta.file_type().is_symlink())
        .unwrap_or(false);
    if !is_link {
        return path.to_path_buf();
    }
    match fs::canonicalize(path) {
        Ok(resolved) => resolved,
        Err(_) => match fs::read_link(path) {
            Ok(link) if link.is_absolute() => link,
            Ok(link) => path.parent().map(|p| p.join(&link)).unwrap_or(link),
            Err(_) => path.to_path_buf(),
        },
    }
}
