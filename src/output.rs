//! Document persistence.
//!
//! Bytes go to a temp file in the destination directory, are synced, and
//! then renamed over the final name, so a failed write never leaves a
//! partial document behind.

use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};

use tempfile::NamedTempFile;

use crate::{RenderedDocument, Result};

/// Write `doc` into `dir` under its own file name and return the full path.
pub fn write_document(dir: &Path, doc: &RenderedDocument) -> Result<PathBuf> {
    write_bytes(&dir.join(&doc.file_name), &doc.bytes)
}

/// Atomically replace `path` with `bytes`, creating parent directories.
pub fn write_bytes(path: &Path, bytes: &[u8]) -> Result<PathBuf> {
    let parent = match path.parent() {
        Some(p) if !p.as_os_str().is_empty() => p.to_path_buf(),
        _ => PathBuf::from("."),
    };
    fs::create_dir_all(&parent)?;

    let mut tmp = NamedTempFile::new_in(&parent)?;
    tmp.write_all(bytes)?;
    tmp.as_file().sync_all()?;
    tmp.persist(path).map_err(|e| e.error)?;

    log::info!("wrote {} ({} bytes)", path.display(), bytes.len());
    Ok(path.to_path_buf())
}
