use dashmap::DashMap;
use notify::RecommendedWatcher;
use parking_lot::Mutex;
use std::path::PathBuf;
use std::sync::Arc;

/// Watches the physical directories the catalog cache has scanned and purges
/// their cache entries on any reported change.
pub struct DirWatcher {
    pub(crate) watcher: Mutex<RecommendedWatcher>,
    /// Watched physical directory -> catalog cache key. Shared with the
    /// notify callback, which runs on notify's own thread.
    pub(crate) keys_by_dir: Arc<DashMap<PathBuf, String>>,
}
