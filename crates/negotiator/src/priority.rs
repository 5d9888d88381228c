use crate::locale::build_prioritized_list;
use dashmap::DashMap;
use std::sync::Arc;

#[derive(Debug, Clone, Hash, PartialEq, Eq)]
struct PriorityKey {
    extension_locale_id: Option<String>,
    query_locale: Option<String>,
    cookie_locale_csv: Option<String>,
    accept_language: Option<String>,
}

/// Memoizes the prioritized locale list per distinct input tuple. The list is
/// a pure function of its inputs, so entries are never invalidated.
#[derive(Default)]
pub struct LocalePriorityCache {
    entries: DashMap<PriorityKey, Arc<Vec<String>>>,
}

impl LocalePriorityCache {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(
        &self,
        extension_locale_id: Option<&str>,
        query_locale: Option<&str>,
        cookie_locale_csv: Option<&str>,
        accept_language: Option<&str>,
    ) -> Arc<Vec<String>> {
        let key = PriorityKey {
            extension_locale_id: extension_locale_id.map(str::to_string),
            query_locale: query_locale.map(str::to_string),
            cookie_locale_csv: cookie_locale_csv.map(str::to_string),
            accept_language: accept_language.map(str::to_string),
        };
        Arc::clone(
            self.entries
                .entry(key)
                .or_insert_with(|| {
                    Arc::new(build_prioritized_list(
                        extension_locale_id,
                        query_locale,
                        cookie_locale_csv,
                        accept_language,
                    ))
                })
                .value(),
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_memoizes_per_input_tuple() {
        let cache = LocalePriorityCache::new();
        let first = cache.get(None, None, Some("da"), None);
        let second = cache.get(None, None, Some("da"), None);
        assert!(Arc::ptr_eq(&first, &second));
        assert_eq!(*first, ["da", "en_us", "en"]);

        let other = cache.get(None, None, Some("sv"), None);
        assert!(!Arc::ptr_eq(&first, &other));
    }
}
