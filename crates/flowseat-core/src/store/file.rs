//! File-based store implementation for native platforms.

use super::{BoxFuture, Store, StoreError, StoreResult};
use crate::plan::{Plan, PlanId};
use std::fs;
use std::path::PathBuf;

/// File-based store for native platforms.
///
/// Stores plans as JSON files in a specified directory.
pub struct FileStore {
    /// Base directory for plan storage.
    base_path: PathBuf,
}

impl FileStore {
    /// Create a new file store with the given base directory.
    ///
    /// Creates the directory if it doesn't exist.
    pub fn new(base_path: PathBuf) -> StoreResult<Self> {
        if !base_path.exists() {
            fs::create_dir_all(&base_path)?;
        }
        Ok(Self { base_path })
    }

    /// Create a file store in the default location.
    ///
    /// On Unix: `~/.local/share/flowseat/plans/`
    /// On Windows: `%APPDATA%\flowseat\plans\`
    pub fn default_location() -> StoreResult<Self> {
        let base = dirs::data_local_dir()
            .or_else(dirs::home_dir)
            .ok_or_else(|| StoreError::Backend("no data directory available".to_string()))?;

        let path = base.join("flowseat").join("plans");
        Self::new(path)
    }

    /// Get the file path for a plan ID.
    fn plan_path(&self, id: PlanId) -> PathBuf {
        self.base_path.join(format!("{}.json", id))
    }

    /// Get the base path.
    pub fn base_path(&self) -> &PathBuf {
        &self.base_path
    }
}

impl Store for FileStore {
    fn save(&self, plan: &Plan) -> BoxFuture<'_, StoreResult<()>> {
        let path = self.plan_path(plan.id);
        let json = plan.to_json();

        Box::pin(async move {
            fs::write(&path, json?)?;
            Ok(())
        })
    }

    fn load(&self, id: PlanId) -> BoxFuture<'_, StoreResult<Plan>> {
        let path = self.plan_path(id);

        Box::pin(async move {
            if !path.exists() {
                return Err(StoreError::NotFound(id));
            }

            let json = fs::read_to_string(&path)?;
            Ok(Plan::from_json(&json)?)
        })
    }

    fn delete(&self, id: PlanId) -> BoxFuture<'_, StoreResult<()>> {
        let path = self.plan_path(id);

        Box::pin(async move {
            if path.exists() {
                fs::remove_file(&path)?;
            }
            Ok(())
        })
    }

    fn list(&self) -> BoxFuture<'_, StoreResult<Vec<PlanId>>> {
        let base = self.base_path.clone();

        Box::pin(async move {
            if !base.exists() {
                return Ok(vec![]);
            }

            let entries = fs::read_dir(&base)?;

            let mut ids = Vec::new();
            for entry in entries.flatten() {
                let path = entry.path();
                if path.extension().map(|e| e == "json").unwrap_or(false) {
                    if let Some(stem) = path.file_stem().and_then(|s| s.to_str()) {
                        // Non-uuid files in the directory are ignored.
                        if let Ok(id) = stem.parse::<PlanId>() {
                            ids.push(id);
                        }
                    }
                }
            }
            Ok(ids)
        })
    }

    fn exists(&self, id: PlanId) -> BoxFuture<'_, StoreResult<bool>> {
        let path = self.plan_path(id);
        Box::pin(async move { Ok(path.exists()) })
    }
}
