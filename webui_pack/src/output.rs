use std::{fs, io::Write, path::Path};

use tempfile::NamedTempFile;

use crate::error::{Error, Result};

/// Replaces `path` with `contents`, creating parent directories as needed.
///
/// The data goes to a temporary file next to `path` that is then renamed over
/// it, so readers never see a half-written header.
pub(crate) fn write_replace(path: &Path, contents: &[u8]) -> Result<()> {
    let parent = match path.parent() {
        Some(parent) if parent.as_os_str().is_empty() => Path::new("."),
        Some(parent) => parent,
        None => return Err(Error::NoParent(path.to_path_buf())),
    };
    fs::create_dir_all(parent)?;

    let mut tmp = NamedTempFile::new_in(parent)?;
    tmp.write_all(contents)?;
    tmp.as_file().sync_all()?;
    tmp.persist(path)?;
    Ok(())
}
