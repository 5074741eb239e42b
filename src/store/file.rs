use super::{flatten, remove, upsert, EntityGroups, MockStore};
use crate::error::{MockError, Result};
use crate::ids::MockId;
use crate::model::MockEndpoint;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use std::time::Instant;
use tracing::{debug, error, info, warn};

pub const PRIMARY_FILE: &str = "mocks.json";
pub const BACKUP_FILE: &str = "mocks.backup.json";

/// Flat-file store: one pretty-printed JSON document plus a sibling backup
/// holding the previous generation.
///
/// Reads fall back to the backup when the primary is missing, empty or
/// unparseable. When neither is usable the store starts empty and persists
/// that state. Only a hard I/O failure on both files reaches the caller.
#[derive(Debug, Clone)]
pub struct FileMockStore {
    file_path: PathBuf,
    backup_path: PathBuf,
}

/// Outcome of reading one of the two files.
enum Loaded {
    Groups(EntityGroups),
    /// Missing, empty or unparseable
    Unusable(String),
    /// The file exists but could not be read
    Failed(io::Error),
}

impl FileMockStore {
    /// Open (and create if needed) the store under `data_dir`.
    ///
    /// # Errors
    ///
    /// Returns `Storage` if the directory or the initial `{}` file cannot be created.
    pub fn open(data_dir: impl AsRef<Path>) -> Result<Self> {
        let data_dir = data_dir.as_ref();
        let store = Self {
            file_path: data_dir.join(PRIMARY_FILE),
            backup_path: data_dir.join(BACKUP_FILE),
        };
        store.ensure_storage_file()?;
        info!(
            file = %store.file_path.display(),
            backup = %store.backup_path.display(),
            "Mock store opened"
        );
        Ok(store)
    }

    #[must_use]
    pub fn file_path(&self) -> &Path {
        &self.file_path
    }

    #[must_use]
    pub fn backup_path(&self) -> &Path {
        &self.backup_path
    }

    fn ensure_storage_file(&self) -> Result<()> {
        if let Some(dir) = self.file_path.parent() {
            fs::create_dir_all(dir).map_err(|e| {
                MockError::storage(format!("cannot create {}: {e}", dir.display()))
            })?;
        }
        if !self.file_path.exists() {
            fs::write(&self.file_path, "{}").map_err(|e| {
                MockError::storage(format!("cannot create {}: {e}", self.file_path.display()))
            })?;
        }
        Ok(())
    }

    fn load(path: &Path) -> Loaded {
        let content = match fs::read_to_string(path) {
            Ok(c) => c,
            Err(e) if e.kind() == io::ErrorKind::NotFound => {
                return Loaded::Unusable("file missing".to_string())
            }
            Err(e) => return Loaded::Failed(e),
        };
        if content.trim().is_empty() {
            return Loaded::Unusable("file empty".to_string());
        }
        match serde_json::from_str::<EntityGroups>(&content) {
            Ok(groups) => Loaded::Groups(groups),
            Err(e) => Loaded::Unusable(format!("parse error: {e}")),
        }
    }

    /// Read the whole document, falling back to the backup.
    pub(crate) fn read_data(&self) -> Result<EntityGroups> {
        let start = Instant::now();
        let primary = match Self::load(&self.file_path) {
            Loaded::Groups(groups) => {
                debug!(
                    groups = groups.len(),
                    duration_ms = start.elapsed().as_millis() as u64,
                    "Store file read"
                );
                return Ok(groups);
            }
            other => other,
        };

        let primary_reason = match &primary {
            Loaded::Unusable(reason) => reason.clone(),
            Loaded::Failed(e) => e.to_string(),
            Loaded::Groups(_) => String::new(),
        };
        warn!(
            file = %self.file_path.display(),
            reason = %primary_reason,
            "Store file unusable, trying backup"
        );

        match Self::load(&self.backup_path) {
            Loaded::Groups(groups) => {
                warn!(
                    backup = %self.backup_path.display(),
                    groups = groups.len(),
                    "Recovered store contents from backup"
                );
                Ok(groups)
            }
            Loaded::Failed(backup_err) => {
                if let Loaded::Failed(primary_err) = primary {
                    error!(
                        primary_error = %primary_err,
                        backup_error = %backup_err,
                        "Store and backup both unreadable"
                    );
                    return Err(MockError::storage(format!(
                        "cannot read {}: {primary_err}; backup also failed: {backup_err}",
                        self.file_path.display()
                    )));
                }
                self.reset_empty()
            }
            Loaded::Unusable(backup_reason) => {
                if let Loaded::Failed(primary_err) = primary {
                    return Err(MockError::storage(format!(
                        "cannot read {}: {primary_err}; backup {backup_reason}",
                        self.file_path.display()
                    )));
                }
                self.reset_empty()
            }
        }
    }

    fn reset_empty(&self) -> Result<EntityGroups> {
        warn!(
            file = %self.file_path.display(),
            "No usable store contents, starting empty"
        );
        let empty = EntityGroups::new();
        self.write_data(&empty)?;
        Ok(empty)
    }

    /// Copy the current file to the backup, then overwrite it with `data`.
    pub(crate) fn write_data(&self, data: &EntityGroups) -> Result<()> {
        let start = Instant::now();
        if self.file_path.exists() {
            fs::copy(&self.file_path, &self.backup_path).map_err(|e| {
                MockError::storage(format!(
                    "cannot back up {} to {}: {e}",
                    self.file_path.display(),
                    self.backup_path.display()
                ))
            })?;
        }
        let json = serde_json::to_string_pretty(data)
            .map_err(|e| MockError::storage(format!("cannot serialize store: {e}")))?;
        fs::write(&self.file_path, json).map_err(|e| {
            MockError::storage(format!("cannot write {}: {e}", self.file_path.display()))
        })?;
        debug!(
            groups = data.len(),
            duration_ms = start.elapsed().as_millis() as u64,
            "Store file written"
        );
        Ok(())
    }
}

impl MockStore for FileMockStore {
    fn save(&self, id: MockId, endpoint: MockEndpoint) -> Result<()> {
        let path = endpoint.path.clone();
        let mut data = self.read_data()?;
        upsert(&mut data, id, endpoint)?;
        self.write_data(&data)?;
        info!(id = %id, path = %path, "Endpoint saved");
        Ok(())
    }

    fn save_batch(&self, endpoints: &[MockEndpoint]) -> Result<()> {
        let mut data = self.read_data()?;
        for endpoint in endpoints {
            upsert(&mut data, endpoint.id, endpoint.clone())?;
        }
        self.write_data(&data)?;
        info!(count = endpoints.len(), "Endpoint batch saved");
        Ok(())
    }

    fn get_all(&self) -> Result<Vec<MockEndpoint>> {
        let data = self.read_data()?;
        Ok(flatten(data))
    }

    fn delete(&self, id: &MockId, endpoint: &MockEndpoint) -> Result<bool> {
        let mut data = self.read_data()?;
        if !remove(&mut data, id, endpoint)? {
            debug!(id = %id, path = %endpoint.path, "Delete requested for unknown endpoint");
            return Ok(false);
        }
        self.write_data(&data)?;
        info!(id = %id, path = %endpoint.path, "Endpoint deleted");
        Ok(true)
    }
}
