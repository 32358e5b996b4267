//! Home positions — the reference data drift is measured against.
//!
//! One entry per known buoy, provisioned out-of-band by an operator process.
//! The registry is loaded once at the start of a run and never mutated by
//! the pipeline.

use std::collections::{BTreeMap, BTreeSet};

use chrono::{DateTime, Utc};

use crate::{Error, Result, record::BuoyId};

/// A buoy's fixed deployment coordinate and the moment it went live.
/// Records observed at or before `activated_at` are pre-activation noise.
#[derive(Debug, Clone, PartialEq)]
pub struct HomePosition {
  pub buoy_id:      BuoyId,
  pub latitude:     f64,
  pub longitude:    f64,
  pub activated_at: DateTime<Utc>,
}

/// Read-only lookup of [`HomePosition`] by buoy id.
#[derive(Debug, Clone, Default)]
pub struct HomeRegistry {
  homes: BTreeMap<BuoyId, HomePosition>,
}

impl HomeRegistry {
  /// Build the registry from decoded rows. A repeated `buoy_id` violates
  /// the registry invariant and is rejected rather than silently merged.
  pub fn from_rows(rows: Vec<HomePosition>) -> Result<Self> {
    let mut homes = BTreeMap::new();
    for row in rows {
      let id = row.buoy_id.clone();
      if homes.insert(id.clone(), row).is_some() {
        return Err(Error::DuplicateHome(id));
      }
    }
    Ok(Self { homes })
  }

  pub fn get(&self, id: &BuoyId) -> Option<&HomePosition> {
    self.homes.get(id)
  }

  /// Every buoy the fleet is expected to contain; the reference set for
  /// silence detection.
  pub fn known_ids(&self) -> BTreeSet<BuoyId> {
    self.homes.keys().cloned().collect()
  }

  pub fn iter(&self) -> impl Iterator<Item = &HomePosition> {
    self.homes.values()
  }

  pub fn len(&self) -> usize { self.homes.len() }

  pub fn is_empty(&self) -> bool { self.homes.is_empty() }
}
