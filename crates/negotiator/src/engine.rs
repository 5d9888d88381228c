use crate::catalog::CatalogCache;
use crate::errors::CatalogError;
use crate::models::{Decision, RewritePlan, VariantInfo, VariantTraits};
use crate::path::{parse_request_path, ParsedPath};
use crate::priority::LocalePriorityCache;
use crate::quality::parse_quality;
use crate::scorer::{select_variant, ScoringContext, Selection};
use crate::tags::{SubstringClassifier, TagSet, UserAgentClassifier};
use dashmap::DashMap;
use std::sync::Arc;

/// The request surface the engine consumes. Cookie parsing happens upstream;
/// the engine only sees the already-extracted locale cookie value.
#[derive(Debug, Clone, Copy, Default)]
pub struct RequestFacts<'a> {
    pub path_and_query: &'a str,
    pub accept: Option<&'a str>,
    pub accept_language: Option<&'a str>,
    pub user_agent: Option<&'a str>,
    pub cookie_locale: Option<&'a str>,
}

/// Orchestrates parsing, the two caches and the scorer into one decision per
/// request.
pub struct Negotiator {
    catalog: Arc<CatalogCache>,
    priorities: LocalePriorityCache,
    classifier: Arc<dyn UserAgentClassifier>,
    classified: DashMap<String, TagSet>,
    user_agent_enabled: bool,
}

impl Negotiator {
    pub fn new(catalog: Arc<CatalogCache>, user_agent_enabled: bool) -> Self {
        Self::with_classifier(catalog, user_agent_enabled, Arc::new(SubstringClassifier))
    }

    pub fn with_classifier(
        catalog: Arc<CatalogCache>,
        user_agent_enabled: bool,
        classifier: Arc<dyn UserAgentClassifier>,
    ) -> Self {
        Self {
            catalog,
            priorities: LocalePriorityCache::new(),
            classifier,
            classified: DashMap::new(),
            user_agent_enabled,
        }
    }

    pub fn catalog(&self) -> &Arc<CatalogCache> {
        &self.catalog
    }

    /// Resolves one request to either a rewrite plan or a pass-through.
    pub async fn negotiate(&self, facts: RequestFacts<'_>) -> Result<Decision, CatalogError> {
        let Some(parsed) = parse_request_path(facts.path_and_query) else {
            return Ok(Decision::PassThrough);
        };
        let request_pin = VariantTraits::from_extension_string(&parsed.extension_string, false);
        let query_locale = locale_query_override(&parsed.query_string);

        let prioritized = self.priorities.get(
            request_pin.locale_id.as_deref(),
            query_locale,
            facts.cookie_locale,
            facts.accept_language,
        );
        let catalog = self.catalog.catalog(&parsed.dir_name).await?;
        let Some(variants) = catalog.group(&parsed.base_name) else {
            return Ok(Decision::PassThrough);
        };

        let accept_tokens = facts.accept.map(parse_quality);
        let requester_tags = if self.user_agent_enabled {
            facts.user_agent.map(|ua| self.classified_tags(ua))
        } else {
            None
        };
        let ctx = ScoringContext {
            requested_file_name: &parsed.file_name,
            request_pin: &request_pin,
            prioritized_locale_ids: &prioritized,
            accept_tokens: accept_tokens.as_deref(),
            requester_tags: requester_tags.as_ref(),
        };
        match select_variant(variants, &ctx) {
            Selection::ExactFileName | Selection::None => Ok(Decision::PassThrough),
            Selection::Best(winner) => {
                let plan = build_plan(&parsed, &request_pin, winner);
                tracing::debug!("'{}' negotiated to '{}'", facts.path_and_query, plan.target);
                Ok(Decision::Rewrite(plan))
            }
        }
    }

    fn classified_tags(&self, user_agent: &str) -> TagSet {
        if let Some(hit) = self.classified.get(user_agent) {
            return *hit;
        }
        let mut tags = self.classifier.classify(user_agent);
        tags.fill_negations();
        self.classified.insert(user_agent.to_string(), tags);
        tags
    }
}

fn build_plan(parsed: &ParsedPath, request_pin: &VariantTraits, winner: &VariantInfo) -> RewritePlan {
    let target = format!(
        "{}{}{}",
        parsed.dir_name, winner.file_name, parsed.query_string
    );
    // The entity tag only carries the dimensions the URL itself left open
    let mut etag_prefix = String::new();
    if request_pin.content_type.is_none() {
        if let Some(content_type) = &winner.traits.content_type {
            etag_prefix.push_str(content_type);
            etag_prefix.push('-');
        }
    }
    if request_pin.locale_id.is_none() {
        if let Some(locale_id) = &winner.traits.locale_id {
            etag_prefix.push_str(locale_id);
            etag_prefix.push('-');
        }
    }
    RewritePlan {
        content_location: target[1..].to_string(),
        target,
        content_language: winner.traits.locale_id.clone(),
        etag_prefix: (!etag_prefix.is_empty()).then_some(etag_prefix),
        absolute_path: winner.absolute_path.clone(),
    }
}

/// Recognizes a `locale=<value>` override via raw substring match on the
/// query string; this is deliberately not a full query-string parse.
fn locale_query_override(query_string: &str) -> Option<&str> {
    let bytes = query_string.as_bytes();
    let mut from = 0;
    while let Some(found) = query_string[from..].find("locale=") {
        let start = from + found;
        from = start + "locale=".len();
        if start == 0 || !matches!(bytes[start - 1], b'?' | b'&') {
            continue;
        }
        let value = &query_string[from..];
        let value = &value[..value.find('&').unwrap_or(value.len())];
        if !value.is_empty() {
            return Some(value);
        }
    }
    None
}
