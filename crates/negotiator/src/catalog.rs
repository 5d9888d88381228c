use crate::errors::CatalogError;
use crate::locale::{is_locale_id, normalize_locale_id};
use crate::models::{VariantInfo, VariantTraits, WatchHook};
use crate::path::is_segment_char;
use moka::future::Cache;
use parking_lot::RwLock;
use std::collections::HashMap;
use std::io::ErrorKind;
use std::path::PathBuf;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

impl VariantTraits {
    /// Classifies a dot-prefixed extension string, one segment at a time and
    /// left to right, so later segments of the same kind overwrite earlier
    /// ones. A segment is tried as a locale id, then as a known file
    /// extension, then (when user-agent support is on) as a device tag;
    /// anything else makes the file invisible to scored negotiation.
    pub fn from_extension_string(extension_string: &str, support_user_agent: bool) -> Self {
        let mut traits = Self {
            all_extensions_matched: true,
            ..Self::default()
        };
        for segment in extension_string.split('.').skip(1) {
            let normalized = normalize_locale_id(segment);
            if is_locale_id(&normalized) {
                traits.locale_id = Some(normalized);
            } else if let Some(mime) = mime_guess::from_ext(segment).first() {
                traits.content_type = Some(mime.essence_str().to_string());
                traits.content_type_fragments =
                    Some((mime.type_().as_str().to_string(), mime.subtype().as_str().to_string()));
            } else if support_user_agent && traits.tags.set(segment) {
                // recorded by the set() call
            } else {
                traits.all_extensions_matched = false;
            }
        }
        traits
    }
}

/// The variants of one directory, grouped by base name. Within a group the
/// most locale-specific variants come first; variants without a locale last.
#[derive(Debug, Default)]
pub struct VariantCatalog {
    by_base_name: HashMap<String, Vec<VariantInfo>>,
}

impl VariantCatalog {
    pub fn group(&self, base_name: &str) -> Option<&[VariantInfo]> {
        self.by_base_name.get(base_name).map(Vec::as_slice)
    }

    pub fn is_empty(&self) -> bool {
        self.by_base_name.is_empty()
    }
}

/// Per-directory variant index over one or more root directories.
///
/// Entries are built lazily on first reference, shared between concurrent
/// cold callers (one underlying scan, no torn results), and live until an
/// invalidation signal or process exit. There is no eviction by size or age.
pub struct CatalogCache {
    roots: Vec<PathBuf>,
    support_user_agent: bool,
    cache: Cache<String, Arc<VariantCatalog>>,
    watch_hook: RwLock<Option<Arc<dyn WatchHook>>>,
    scan_count: AtomicU64,
}

impl CatalogCache {
    pub fn new(roots: Vec<PathBuf>, support_user_agent: bool) -> Self {
        Self {
            roots,
            support_user_agent,
            cache: Cache::builder().build(),
            watch_hook: RwLock::new(None),
            scan_count: AtomicU64::new(0),
        }
    }

    /// Installs the invalidation signal source. Scans performed before this
    /// point simply were not watched; their entries stay until restart.
    pub fn set_watch_hook(&self, hook: Arc<dyn WatchHook>) {
        *self.watch_hook.write() = Some(hook);
    }

    /// Returns the catalog for a root-relative directory (leading and
    /// trailing slash), scanning it on first reference.
    pub async fn catalog(&self, dir_name: &str) -> Result<Arc<VariantCatalog>, CatalogError> {
        self.cache
            .try_get_with(dir_name.to_string(), self.scan(dir_name))
            .await
            .map_err(CatalogError::Scan)
    }

    /// Purges one directory so the next reference rescans it.
    pub async fn invalidate(&self, dir_name: &str) {
        tracing::debug!("invalidating variant catalog for '{}'", dir_name);
        self.cache.invalidate(dir_name).await;
    }

    /// Number of directory scans performed so far.
    pub fn scan_count(&self) -> u64 {
        self.scan_count.load(Ordering::Relaxed)
    }

    async fn scan(&self, dir_name: &str) -> Result<Arc<VariantCatalog>, std::io::Error> {
        self.scan_count.fetch_add(1, Ordering::Relaxed);
        let mut by_base_name: HashMap<String, Vec<VariantInfo>> = HashMap::new();
        for root in &self.roots {
            let dir = root.join(dir_name.trim_start_matches('/'));
            let mut entries = match tokio::fs::read_dir(&dir).await {
                Ok(entries) => entries,
                // A directory missing from one root contributes no variants
                Err(e) if e.kind() == ErrorKind::NotFound => continue,
                Err(e) => return Err(e),
            };
            if let Some(hook) = self.watch_hook.read().clone() {
                hook.watch(&dir, dir_name);
            }
            while let Some(entry) = entries.next_entry().await? {
                let file_type = match entry.file_type().await {
                    Ok(file_type) => file_type,
                    // Removed between readdir and stat
                    Err(e) if e.kind() == ErrorKind::NotFound => continue,
                    Err(e) => return Err(e),
                };
                if file_type.is_dir() {
                    continue;
                }
                let Ok(file_name) = entry.file_name().into_string() else {
                    continue;
                };
                let Some((base_name, extension_string)) = split_file_name(&file_name) else {
                    continue;
                };
                let traits =
                    VariantTraits::from_extension_string(extension_string, self.support_user_agent);
                by_base_name
                    .entry(base_name.to_string())
                    .or_default()
                    .push(VariantInfo {
                        file_name: file_name.clone(),
                        absolute_path: entry.path(),
                        traits,
                    });
            }
        }
        for variants in by_base_name.values_mut() {
            variants.sort_by(|a, b| locale_specificity(b).cmp(&locale_specificity(a)));
        }
        tracing::debug!(
            "scanned '{}': {} base name(s)",
            dir_name,
            by_base_name.len()
        );
        Ok(Arc::new(VariantCatalog { by_base_name }))
    }
}

fn locale_specificity(variant: &VariantInfo) -> usize {
    variant.traits.locale_id.as_ref().map_or(0, String::len)
}

/// Applies the on-disk naming grammar `base_name(.segment)*`; an empty base
/// name means a directory index file. Names outside the grammar are not
/// cataloged at all.
fn split_file_name(file_name: &str) -> Option<(&str, &str)> {
    if file_name.is_empty() || !file_name.chars().all(|c| is_segment_char(c) || c == '.') {
        return None;
    }
    let (base_name, extension_string) = match file_name.find('.') {
        Some(dot) => file_name.split_at(dot),
        None => (file_name, ""),
    };
    Some(if base_name.is_empty() {
        ("index", extension_string)
    } else {
        (base_name, extension_string)
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn write(dir: &std::path::Path, name: &str) {
        std::fs::write(dir.join(name), name).unwrap();
    }

    #[test]
    fn test_extension_classification() {
        let traits = VariantTraits::from_extension_string(".html.en-US", false);
        assert_eq!(traits.content_type.as_deref(), Some("text/html"));
        assert_eq!(
            traits.content_type_fragments,
            Some(("text".to_string(), "html".to_string()))
        );
        assert_eq!(traits.locale_id.as_deref(), Some("en_us"));
        assert!(traits.all_extensions_matched);

        let touch = VariantTraits::from_extension_string(".touch.html", true);
        assert!(touch.tags.contains("touch"));
        assert!(touch.all_extensions_matched);

        // Device tags only count when user-agent support is on
        let ignored = VariantTraits::from_extension_string(".touch.html", false);
        assert!(!ignored.all_extensions_matched);

        let unknown = VariantTraits::from_extension_string(".appcache.en_GB.blah", false);
        assert!(!unknown.all_extensions_matched);
        assert_eq!(unknown.content_type.as_deref(), Some("text/cache-manifest"));
        assert_eq!(unknown.locale_id.as_deref(), Some("en_gb"));
    }

    #[test]
    fn test_split_file_name() {
        assert_eq!(split_file_name("foo.html"), Some(("foo", ".html")));
        assert_eq!(split_file_name("foo"), Some(("foo", "")));
        assert_eq!(split_file_name(".htaccess"), Some(("index", ".htaccess")));
        assert_eq!(split_file_name("with space"), None);
    }

    #[tokio::test]
    async fn test_missing_directory_is_empty_not_an_error() {
        let cache = CatalogCache::new(vec![PathBuf::from("/definitely/not/here")], false);
        let catalog = cache.catalog("/").await.unwrap();
        assert!(catalog.is_empty());
        let nested = cache.catalog("/sub/dir/").await.unwrap();
        assert!(nested.is_empty());
    }

    #[tokio::test]
    async fn test_scan_groups_and_sorts_by_specificity() {
        let dir = tempfile::tempdir().unwrap();
        write(dir.path(), "index.html");
        write(dir.path(), "index.da.html");
        write(dir.path(), "index.en_US.html");
        write(dir.path(), "other.html");
        std::fs::create_dir(dir.path().join("subdir")).unwrap();

        let cache = CatalogCache::new(vec![dir.path().to_path_buf()], false);
        let catalog = cache.catalog("/").await.unwrap();
        assert!(catalog.group("subdir").is_none());

        let index = catalog.group("index").unwrap();
        assert_eq!(index.len(), 3);
        assert_eq!(index[0].traits.locale_id.as_deref(), Some("en_us"));
        assert_eq!(index[1].traits.locale_id.as_deref(), Some("da"));
        assert_eq!(index[2].traits.locale_id, None);
        assert_eq!(catalog.group("other").unwrap().len(), 1);
    }

    #[tokio::test]
    async fn test_variants_merge_across_roots() {
        let root1 = tempfile::tempdir().unwrap();
        let root2 = tempfile::tempdir().unwrap();
        write(root1.path(), "index.en_US.html");
        write(root2.path(), "index.da.html");

        let cache = CatalogCache::new(
            vec![root1.path().to_path_buf(), root2.path().to_path_buf()],
            false,
        );
        let catalog = cache.catalog("/").await.unwrap();
        assert_eq!(catalog.group("index").unwrap().len(), 2);
    }

    #[tokio::test]
    async fn test_concurrent_cold_requests_share_one_scan() {
        let dir = tempfile::tempdir().unwrap();
        write(dir.path(), "index.html");

        let cache = Arc::new(CatalogCache::new(vec![dir.path().to_path_buf()], false));
        let lookups = (0..8).map(|_| {
            let cache = Arc::clone(&cache);
            async move { cache.catalog("/").await.unwrap() }
        });
        futures::future::join_all(lookups).await;
        assert_eq!(cache.scan_count(), 1);
    }

    #[tokio::test]
    async fn test_invalidation_triggers_rescan() {
        let dir = tempfile::tempdir().unwrap();
        write(dir.path(), "index.html");

        let cache = CatalogCache::new(vec![dir.path().to_path_buf()], false);
        let before = cache.catalog("/").await.unwrap();
        assert_eq!(before.group("index").unwrap().len(), 1);

        write(dir.path(), "index.da.html");
        assert_eq!(cache.catalog("/").await.unwrap().group("index").unwrap().len(), 1);

        cache.invalidate("/").await;
        let after = cache.catalog("/").await.unwrap();
        assert_eq!(after.group("index").unwrap().len(), 2);
        assert_eq!(cache.scan_count(), 2);
    }
}
