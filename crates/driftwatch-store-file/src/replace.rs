//! Atomic whole-file replacement.

use std::path::Path;

use tempfile::NamedTempFile;

use crate::Result;

/// Write a file's full new contents to a temp file in the target's
/// directory, then rename it over the target. The temp file must live in
/// the same directory so the rename stays on one filesystem.
pub(crate) fn write_replace<F>(path: &Path, write: F) -> Result<()>
where
  F: FnOnce(&mut NamedTempFile) -> Result<()>,
{
  let dir = match path.parent() {
    Some(parent) if !parent.as_os_str().is_empty() => parent,
    _ => Path::new("."),
  };

  let mut tmp = NamedTempFile::new_in(dir)?;
  write(&mut tmp)?;
  tmp.as_file().sync_all()?;
  tmp.persist(path)?;
  Ok(())
}
