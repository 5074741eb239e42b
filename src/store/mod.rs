//! # Mock Store
//!
//! Persistence for generated endpoint definitions. Definitions are grouped by
//! entity name (the first path segment after `/api/`) and keyed by id:
//!
//! ```text
//! {
//!   "user": {
//!     "01J9...": { "id": "01J9...", "path": "/api/user", "method": "GET", ... },
//!     "01J9...": { "id": "01J9...", "path": "/api/user/{id}", "method": "PUT", ... }
//!   }
//! }
//! ```
//!
//! Callers only ever see the [`MockStore`] trait so the flat-file backend can be
//! swapped for another key-value store without touching handlers.
//!
//! ## Concurrency
//!
//! Every mutation is a full read-modify-write of the whole document. There is
//! no locking: concurrent writers race and the last one wins.

mod file;
mod memory;

pub use file::FileMockStore;
pub use memory::MemoryMockStore;

use crate::error::Result;
use crate::ids::MockId;
use crate::model::MockEndpoint;
use std::collections::BTreeMap;

/// entity name → (id → definition)
pub type EntityGroups = BTreeMap<String, BTreeMap<MockId, MockEndpoint>>;

/// Storage contract shared by every backend.
pub trait MockStore: Send + Sync {
    /// Upsert a definition into its entity group and persist.
    ///
    /// The stored definition always carries `id`, whatever `endpoint.id` said.
    fn save(&self, id: MockId, endpoint: MockEndpoint) -> Result<()>;

    /// Persist a whole batch with a single write.
    fn save_batch(&self, endpoints: &[MockEndpoint]) -> Result<()> {
        for endpoint in endpoints {
            self.save(endpoint.id, endpoint.clone())?;
        }
        Ok(())
    }

    /// Every stored definition across all groups, order unspecified.
    fn get_all(&self) -> Result<Vec<MockEndpoint>>;

    /// Remove `id` from the group `endpoint` belongs to.
    ///
    /// Returns `false` when it was not stored. Removing the last member of a
    /// group removes the group.
    fn delete(&self, id: &MockId, endpoint: &MockEndpoint) -> Result<bool>;

    /// Look a single definition up by id.
    fn find(&self, id: &MockId) -> Result<Option<MockEndpoint>> {
        Ok(self.get_all()?.into_iter().find(|e| &e.id == id))
    }
}

/// Insert `endpoint` under its entity group, overriding its id with `id`.
///
/// A group holds at most one definition per (method, path shape); any other
/// member with the same pair is replaced.
pub(crate) fn upsert(groups: &mut EntityGroups, id: MockId, mut endpoint: MockEndpoint) -> Result<()> {
    let entity = endpoint.entity()?;
    endpoint.id = id;
    let group = groups.entry(entity).or_default();
    let method = endpoint.method;
    let detail = endpoint.is_detail();
    group.retain(|existing_id, existing| {
        *existing_id == id || existing.method != method || existing.is_detail() != detail
    });
    group.insert(id, endpoint);
    Ok(())
}

/// Remove `id` from the entity group of `endpoint`; drops emptied groups.
pub(crate) fn remove(groups: &mut EntityGroups, id: &MockId, endpoint: &MockEndpoint) -> Result<bool> {
    let entity = endpoint.entity()?;
    let Some(group) = groups.get_mut(&entity) else {
        return Ok(false);
    };
    if group.remove(id).is_none() {
        return Ok(false);
    }
    if group.is_empty() {
        groups.remove(&entity);
    }
    Ok(true)
}

pub(crate) fn flatten(groups: EntityGroups) -> Vec<MockEndpoint> {
    groups.into_values().flat_map(BTreeMap::into_values).collect()
}
