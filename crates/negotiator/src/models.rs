use crate::tags::TagSet;
use std::path::{Path, PathBuf};

/// One on-disk alternative of a logical resource, described entirely by its
/// file name segments. Immutable once built by a catalog scan.
#[derive(Debug, Clone)]
pub struct VariantInfo {
    pub file_name: String,
    pub absolute_path: PathBuf,
    pub traits: VariantTraits,
}

/// Metadata decoded from the dot-separated extension segments of a file name
/// (or of the requested URL itself).
#[derive(Debug, Clone, Default)]
pub struct VariantTraits {
    pub content_type: Option<String>,
    pub content_type_fragments: Option<(String, String)>,
    pub locale_id: Option<String>,
    pub tags: TagSet,
    /// False when any segment was neither a locale id, a known file
    /// extension, nor a device tag. Such files are only reachable through an
    /// exact file name match, never through scored negotiation.
    pub all_extensions_matched: bool,
}

/// Outcome of negotiating one request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Decision {
    PassThrough,
    Rewrite(RewritePlan),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RewritePlan {
    /// Directory + winning file name + original query string.
    pub target: String,
    /// `target` without the leading slash, for the Content-Location header.
    pub content_location: String,
    pub content_language: Option<String>,
    /// Negotiated dimensions the request itself did not pin. `None` means no
    /// entity tag is emitted and the winning file is never stat'ed.
    pub etag_prefix: Option<String>,
    pub absolute_path: PathBuf,
}

/// Invalidation signal source for the catalog cache. Installed per physical
/// directory on first scan; failure to watch only affects cache freshness,
/// never correctness.
pub trait WatchHook: Send + Sync {
    /// Request that changes under `dir` purge the catalog entry for `key`.
    fn watch(&self, dir: &Path, key: &str);
}
