use super::errors::WatcherError;
use super::models::DirWatcher;
use dashmap::DashMap;
use notify::{Event, EventKind, RecursiveMode, Watcher};
use parking_lot::Mutex;
use std::path::Path;
use std::sync::Arc;
use tokio::sync::mpsc;
use varia_negotiator::{CatalogCache, WatchHook};

type Result<T> = std::result::Result<T, WatcherError>;

impl DirWatcher {
    /// Builds the watcher and spawns the task that turns change events into
    /// catalog invalidations. Must be called from within a tokio runtime.
    pub fn spawn(catalog: Arc<CatalogCache>) -> Result<Arc<Self>> {
        let (tx, mut rx) = mpsc::channel::<String>(64);
        let keys_by_dir = Arc::new(DashMap::new());

        let callback_keys = Arc::clone(&keys_by_dir);
        let watcher = notify::recommended_watcher(
            move |res: std::result::Result<Event, notify::Error>| {
                let Ok(event) = res else { return };
                if !matches!(
                    event.kind,
                    EventKind::Create(_) | EventKind::Modify(_) | EventKind::Remove(_)
                ) {
                    return;
                }
                for path in &event.paths {
                    let key = lookup_key(&callback_keys, path);
                    if let Some(key) = key {
                        let _ = tx.blocking_send(key);
                    }
                }
            },
        )?;

        let catalog_handle = Arc::clone(&catalog);
        tokio::spawn(async move {
            while let Some(key) = rx.recv().await {
                tracing::debug!("Directory change detected, purging catalog for '{}'", key);
                catalog_handle.invalidate(&key).await;
            }
        });

        Ok(Arc::new(Self {
            watcher: Mutex::new(watcher),
            keys_by_dir,
        }))
    }
}

/// Maps a reported path (either a watched directory itself or an entry inside
/// one) to the catalog key registered for it.
fn lookup_key(keys_by_dir: &DashMap<std::path::PathBuf, String>, path: &Path) -> Option<String> {
    if let Some(entry) = keys_by_dir.get(path) {
        return Some(entry.value().clone());
    }
    let parent = path.parent()?;
    keys_by_dir.get(parent).map(|entry| entry.value().clone())
}

impl WatchHook for DirWatcher {
    fn watch(&self, dir: &Path, key: &str) {
        if self.keys_by_dir.contains_key(dir) {
            return;
        }
        match self.watcher.lock().watch(dir, RecursiveMode::NonRecursive) {
            Ok(()) => {
                self.keys_by_dir.insert(dir.to_path_buf(), key.to_string());
            }
            // Watch installation is best effort; a directory that cannot be
            // watched keeps its catalog entry until restart
            Err(e) => {
                tracing::debug!("Could not watch '{}': {}", dir.display(), e);
            }
        }
    }
}
