//! Writer for the derived latest-position file.

use std::path::Path;

use driftwatch_core::view::LatestView;

use crate::{Result, replace::write_replace};

/// Regenerate the latest-position CSV wholesale. The file is derived state
/// handed to the external map renderer and publication step; it is never
/// updated in place.
pub fn write_latest_view(path: &Path, view: &LatestView) -> Result<()> {
  write_replace(path, |tmp| {
    driftwatch_csv::write_latest(&mut *tmp, view)?;
    Ok(())
  })
}
