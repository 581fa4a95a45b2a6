//! Durable selected-project state.
//!
//! One [`SelectionContext`] is shared by every view. Writes go through to a
//! [`SelectionStore`] so the selection survives a restart, and readers can
//! follow changes through [`SelectionContext::subscribe`].

use parking_lot::Mutex;
use serde::{Deserialize, Serialize};
use std::{
    fs,
    path::{Path, PathBuf},
    sync::Arc,
};
use thiserror::Error;
use tokio::sync::watch;
use tracing::{debug, warn};

use crate::domain::{Project, ProjectId};

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("selection store I/O failed: {0}")]
    Io(#[from] std::io::Error),
    #[error("selection file is not valid JSON: {0}")]
    Json(#[from] serde_json::Error),
    #[error("could not determine a data directory")]
    NoDataDir,
}

/// Backend for the persisted selection
pub trait SelectionStore: Send + Sync {
    fn load(&self) -> Result<Option<ProjectId>, StoreError>;
    fn save(&self, selected: Option<&ProjectId>) -> Result<(), StoreError>;
}

#[derive(Debug, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
struct SelectionFile {
    #[serde(default)]
    selected_project_id: Option<ProjectId>,
}

/// JSON file store
#[derive(Debug, Clone)]
pub struct FileSelectionStore {
    path: PathBuf,
}

impl FileSelectionStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// `<data dir>/powerprotect/selection.json`
    pub fn default_path() -> Result<PathBuf, StoreError> {
        dirs::data_dir()
            .map(|d| d.join("powerprotect").join("selection.json"))
            .ok_or(StoreError::NoDataDir)
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl SelectionStore for FileSelectionStore {
    fn load(&self) -> Result<Option<ProjectId>, StoreError> {
        if !self.path.exists() {
            return Ok(None);
        }
        let contents = fs::read_to_string(&self.path)?;
        let file: SelectionFile = serde_json::from_str(&contents)?;
        Ok(file.selected_project_id)
    }

    fn save(&self, selected: Option<&ProjectId>) -> Result<(), StoreError> {
        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent)?;
        }
        let file = SelectionFile {
            selected_project_id: selected.cloned(),
        };
        fs::write(&self.path, serde_json::to_string_pretty(&file)?)?;
        Ok(())
    }
}

/// In-memory store. Clones share the slot, so a second context built from a
/// clone sees what the first one saved.
#[derive(Debug, Clone, Default)]
pub struct MemorySelectionStore {
    slot: Arc<Mutex<Option<ProjectId>>>,
}

impl MemorySelectionStore {
    pub fn new() -> Self {
        Self::default()
    }
}

impl SelectionStore for MemorySelectionStore {
    fn load(&self) -> Result<Option<ProjectId>, StoreError> {
        Ok(self.slot.lock().clone())
    }

    fn save(&self, selected: Option<&ProjectId>) -> Result<(), StoreError> {
        *self.slot.lock() = selected.cloned();
        Ok(())
    }
}

/// The currently selected project, shared by every view
#[derive(Clone)]
pub struct SelectionContext {
    store: Arc<dyn SelectionStore>,
    current: Arc<watch::Sender<Option<ProjectId>>>,
    // Serializes store write + publish so both see the same last writer.
    write: Arc<Mutex<()>>,
}

impl SelectionContext {
    /// Restore the selection from `store`. An unreadable store starts empty.
    pub fn load(store: impl SelectionStore + 'static) -> Self {
        let initial = store.load().unwrap_or_else(|e| {
            warn!(error = %e, "could not restore selected project");
            None
        });
        debug!(selected = ?initial, "selection restored");
        let (current, _) = watch::channel(initial);
        Self {
            store: Arc::new(store),
            current: Arc::new(current),
            write: Arc::new(Mutex::new(())),
        }
    }

    /// Non-durable selection, for tests and one-shot tools
    pub fn in_memory() -> Self {
        Self::load(MemorySelectionStore::new())
    }

    pub fn get(&self) -> Option<ProjectId> {
        self.current.borrow().clone()
    }

    /// Select a project, or clear with `None`. Last write wins; a failed
    /// store write is logged and the in-memory selection still changes.
    pub fn set(&self, selected: Option<ProjectId>) {
        let _guard = self.write.lock();
        if let Err(e) = self.store.save(selected.as_ref()) {
            warn!(error = %e, "could not persist selected project");
        }
        debug!(selected = ?selected, "project selected");
        self.current.send_replace(selected);
    }

    pub fn select_from_project(&self, project: Option<&Project>) {
        self.set(project.map(|p| p.id.clone()));
    }

    pub fn clear(&self) {
        self.set(None);
    }

    pub fn subscribe(&self) -> watch::Receiver<Option<ProjectId>> {
        self.current.subscribe()
    }
}

impl std::fmt::Debug for SelectionContext {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SelectionContext")
            .field("selected", &self.get())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct BrokenStore;

    impl SelectionStore for BrokenStore {
        fn load(&self) -> Result<Option<ProjectId>, StoreError> {
            Err(StoreError::NoDataDir)
        }

        fn save(&self, _selected: Option<&ProjectId>) -> Result<(), StoreError> {
            Err(StoreError::NoDataDir)
        }
    }

    #[test]
    fn test_set_get_and_clear() {
        let selection = SelectionContext::in_memory();
        assert_eq!(selection.get(), None);

        selection.set(Some(ProjectId::new("p1")));
        assert_eq!(selection.get(), Some(ProjectId::new("p1")));

        selection.clear();
        assert_eq!(selection.get(), None);
    }

    #[test]
    fn test_clones_share_the_selection() {
        let a = SelectionContext::in_memory();
        let b = a.clone();
        a.set(Some(ProjectId::new("p7")));
        assert_eq!(b.get(), Some(ProjectId::new("p7")));
    }

    #[test]
    fn test_reload_from_memory_store() {
        let store = MemorySelectionStore::new();
        SelectionContext::load(store.clone()).set(Some(ProjectId::new("p1")));

        let reloaded = SelectionContext::load(store);
        assert_eq!(reloaded.get(), Some(ProjectId::new("p1")));
    }

    #[test]
    fn test_concurrent_sets_keep_store_and_memory_in_step() {
        let store = MemorySelectionStore::new();
        let selection = SelectionContext::load(store.clone());

        let handles: Vec<_> = (0..8)
            .map(|i| {
                let selection = selection.clone();
                std::thread::spawn(move || {
                    for j in 0..50 {
                        selection.set(Some(ProjectId::new(format!("p{i}-{j}"))));
                    }
                })
            })
            .collect();
        for handle in handles {
            handle.join().unwrap();
        }

        assert_eq!(store.load().unwrap(), selection.get());
    }

    #[test]
    fn test_file_store_round_trip() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("selection.json");

        SelectionContext::load(FileSelectionStore::new(&path)).set(Some(ProjectId::new("p1")));
        let reloaded = SelectionContext::load(FileSelectionStore::new(&path));
        assert_eq!(reloaded.get(), Some(ProjectId::new("p1")));

        reloaded.set(None);
        assert_eq!(FileSelectionStore::new(&path).load().unwrap(), None);
    }

    #[test]
    fn test_missing_file_is_empty_selection() {
        let dir = tempfile::tempdir().unwrap();
        let store = FileSelectionStore::new(dir.path().join("absent.json"));
        assert_eq!(store.load().unwrap(), None);
    }

    #[test]
    fn test_corrupt_file_starts_empty() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("selection.json");
        fs::write(&path, "{not json").unwrap();

        assert!(matches!(
            FileSelectionStore::new(&path).load(),
            Err(StoreError::Json(_))
        ));
        assert_eq!(SelectionContext::load(FileSelectionStore::new(&path)).get(), None);
    }

    #[test]
    fn test_store_failure_keeps_in_memory_value() {
        let selection = SelectionContext::load(BrokenStore);
        selection.set(Some(ProjectId::new("p2")));
        assert_eq!(selection.get(), Some(ProjectId::new("p2")));
    }

    #[tokio::test]
    async fn test_subscribers_see_writes() {
        let selection = SelectionContext::in_memory();
        let mut rx = selection.subscribe();

        selection.set(Some(ProjectId::new("p3")));
        rx.changed().await.unwrap();
        assert_eq!(*rx.borrow(), Some(ProjectId::new("p3")));
    }
}
