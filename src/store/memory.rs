use super::{flatten, remove, upsert, EntityGroups, MockStore};
use crate::error::{MockError, Result};
use crate::ids::MockId;
use crate::model::MockEndpoint;
use std::sync::RwLock;

/// In-process store with the same grouping semantics as [`super::FileMockStore`].
///
/// Used for tests and for `generate --dry-run`; nothing touches the disk.
#[derive(Debug, Default)]
pub struct MemoryMockStore {
    groups: RwLock<EntityGroups>,
}

impl MemoryMockStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Snapshot of the grouped contents.
    pub fn groups(&self) -> Result<EntityGroups> {
        self.groups
            .read()
            .map(|g| g.clone())
            .map_err(|_| MockError::storage("memory store lock poisoned"))
    }
}

impl MockStore for MemoryMockStore {
    fn save(&self, id: MockId, endpoint: MockEndpoint) -> Result<()> {
        let mut groups = self
            .groups
            .write()
            .map_err(|_| MockError::storage("memory store lock poisoned"))?;
        upsert(&mut groups, id, endpoint)
    }

    fn get_all(&self) -> Result<Vec<MockEndpoint>> {
        Ok(flatten(self.groups()?))
    }

    fn delete(&self, id: &MockId, endpoint: &MockEndpoint) -> Result<bool> {
        let mut groups = self
            .groups
            .write()
            .map_err(|_| MockError::storage("memory store lock poisoned"))?;
        remove(&mut groups, id, endpoint)
    }
}
