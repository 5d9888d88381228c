use crate::locale::locale_ids_equal;
use crate::models::{VariantInfo, VariantTraits};
use crate::quality::QualityToken;
use crate::tags::{tag_affinity, TagSet};

/// Everything the selection loop needs to know about the request.
pub struct ScoringContext<'a> {
    /// The literally requested file name; an exact match always wins over
    /// negotiation.
    pub requested_file_name: &'a str,
    /// Content type / locale the request's own extensions pinned, if any.
    pub request_pin: &'a VariantTraits,
    pub prioritized_locale_ids: &'a [String],
    /// Accept header tokens, sorted by descending quality. `None` when the
    /// header was absent, which is not the same as an empty token list.
    pub accept_tokens: Option<&'a [QualityToken]>,
    /// The requester's classified tag set; `None` when user-agent
    /// negotiation is off or the header was absent.
    pub requester_tags: Option<&'a TagSet>,
}

pub enum Selection<'a> {
    /// A variant's file name equals the requested one; serve it untouched.
    ExactFileName,
    /// No variant scored above zero for any prioritized locale.
    None,
    Best(&'a VariantInfo),
}

/// Runs the weighted scoring and tie-break algorithm over one variant group.
///
/// Locale ids are tried in priority order; the first one yielding a candidate
/// ends the search, so lower-priority locales never dilute the result.
pub fn select_variant<'a>(
    variants: &'a [VariantInfo],
    ctx: &ScoringContext<'_>,
) -> Selection<'a> {
    let mut best: Option<(&VariantInfo, f64)> = None;
    for locale_id in ctx.prioritized_locale_ids {
        for variant in variants {
            if variant.file_name == ctx.requested_file_name {
                return Selection::ExactFileName;
            }
            if !variant.traits.all_extensions_matched {
                continue;
            }
            let locale_eligible = match &variant.traits.locale_id {
                None => true,
                Some(id) => locale_ids_equal(id, locale_id),
            };
            if !locale_eligible {
                continue;
            }
            let mut score = content_type_score(&variant.traits, ctx);
            if let Some(requester) = ctx.requester_tags {
                score += tag_affinity(requester, &variant.traits.tags);
            }
            if score <= 0.0 {
                continue;
            }
            best = Some(match best {
                None => (variant, score),
                Some((current, current_score)) => {
                    if score > current_score
                        || (score == current_score && prefers_html(variant, current))
                        || (score == current_score
                            && exact_locale_over_alias(variant, current, locale_id))
                    {
                        (variant, score)
                    } else {
                        (current, current_score)
                    }
                }
            });
        }
        if best.is_some() {
            break;
        }
    }
    match best {
        Some((variant, _)) => Selection::Best(variant),
        None => Selection::None,
    }
}

fn content_type_score(traits: &VariantTraits, ctx: &ScoringContext<'_>) -> f64 {
    let (Some(content_type), Some((main_type, subtype))) =
        (&traits.content_type, &traits.content_type_fragments)
    else {
        // A variant without a content type is acceptable to anyone
        return 1.0;
    };
    if ctx.request_pin.content_type.as_deref() == Some(content_type.as_str()) {
        return 2.0;
    }
    let Some(tokens) = ctx.accept_tokens else {
        return 1.0;
    };
    let subtype_wildcard = format!("*/{subtype}");
    let type_wildcard = format!("{main_type}/*");
    tokens
        .iter()
        .find(|token| {
            token.value == *content_type
                || token.value == "*/*"
                || token.value == "*"
                || token.value == subtype_wildcard
                || token.value == type_wildcard
        })
        .map_or(0.0, |token| token.quality)
}

/// In case two acceptable variants score the same, prefer the text/html one.
fn prefers_html(candidate: &VariantInfo, current: &VariantInfo) -> bool {
    candidate.traits.content_type.as_deref() == Some("text/html")
        && current.traits.content_type.as_deref() != Some("text/html")
}

/// A strict locale id match takes precedence over one that only went through
/// an alias (e.g. when both nb and no versions exist).
fn exact_locale_over_alias(candidate: &VariantInfo, current: &VariantInfo, locale_id: &str) -> bool {
    candidate.traits.locale_id.as_deref() == Some(locale_id)
        && current.traits.locale_id.as_deref() != Some(locale_id)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::locale::build_prioritized_list;
    use crate::quality::parse_quality;
    use crate::tags::{SubstringClassifier, UserAgentClassifier};
    use std::path::PathBuf;

    fn variant(file_name: &str) -> VariantInfo {
        let extension_string = match file_name.find('.') {
            Some(dot) => &file_name[dot..],
            None => "",
        };
        VariantInfo {
            file_name: file_name.to_string(),
            absolute_path: PathBuf::from("/srv/www").join(file_name),
            traits: VariantTraits::from_extension_string(extension_string, true),
        }
    }

    fn select<'a>(
        variants: &'a [VariantInfo],
        requested_file_name: &str,
        accept: Option<&str>,
        accept_language: Option<&str>,
    ) -> Option<&'a str> {
        let pin = VariantTraits::from_extension_string("", false);
        let prioritized = build_prioritized_list(None, None, None, accept_language);
        let tokens = accept.map(parse_quality);
        let ctx = ScoringContext {
            requested_file_name,
            request_pin: &pin,
            prioritized_locale_ids: &prioritized,
            accept_tokens: tokens.as_deref(),
            requester_tags: None,
        };
        match select_variant(variants, &ctx) {
            Selection::Best(winner) => Some(&winner.file_name),
            _ => None,
        }
    }

    #[test]
    fn test_exact_file_name_always_wins() {
        let variants = [variant("foo.appcache.en_GB.blah"), variant("foo.html")];
        let pin = VariantTraits::from_extension_string(".appcache.en_GB.blah", false);
        let prioritized = build_prioritized_list(None, None, None, None);
        let ctx = ScoringContext {
            requested_file_name: "foo.appcache.en_GB.blah",
            request_pin: &pin,
            prioritized_locale_ids: &prioritized,
            accept_tokens: None,
            requester_tags: None,
        };
        assert!(matches!(
            select_variant(&variants, &ctx),
            Selection::ExactFileName
        ));
    }

    #[test]
    fn test_unparseable_segments_are_invisible() {
        let variants = [variant("foo.appcache.en_GB.blah"), variant("foo.en.appcache")];
        assert_eq!(
            select(&variants, "foo", Some("text/cache-manifest"), None),
            Some("foo.en.appcache")
        );
    }

    #[test]
    fn test_pinned_content_type_outranks_accept() {
        let variants = [variant("foo.en_US.appcache"), variant("foo.en_US.html")];
        let pin = VariantTraits::from_extension_string(".appcache", false);
        let prioritized = build_prioritized_list(None, None, None, None);
        let tokens = parse_quality("text/html");
        let ctx = ScoringContext {
            requested_file_name: "foo.appcache",
            request_pin: &pin,
            prioritized_locale_ids: &prioritized,
            accept_tokens: Some(&tokens),
            requester_tags: None,
        };
        match select_variant(&variants, &ctx) {
            Selection::Best(winner) => assert_eq!(winner.file_name, "foo.en_US.appcache"),
            _ => panic!("expected a winner"),
        }
    }

    #[test]
    fn test_accept_wildcards() {
        let variants = [variant("thething.html")];
        for accept in ["text/html", "*/*", "*", "text/*", "*/html"] {
            assert_eq!(
                select(&variants, "thething", Some(accept), None),
                Some("thething.html"),
                "accept: {accept}"
            );
        }
        assert_eq!(select(&variants, "thething", Some("image/png"), None), None);
    }

    #[test]
    fn test_accept_order_decides_between_qualities() {
        let variants = [variant("index.en_US.appcache"), variant("index.en_US.html")];
        assert_eq!(
            select(
                &variants,
                "index",
                Some("text/cache-manifest;q=1,text/html;q=0.8"),
                None
            ),
            Some("index.en_US.appcache")
        );
        assert_eq!(
            select(
                &variants,
                "index",
                Some("text/html;q=1,text/cache-manifest;q=0.8"),
                None
            ),
            Some("index.en_US.html")
        );
    }

    #[test]
    fn test_equal_scores_prefer_html() {
        let variants = [variant("page.txt"), variant("page.html")];
        assert_eq!(select(&variants, "page", Some("*/*"), None), Some("page.html"));
    }

    #[test]
    fn test_locale_alias_is_symmetric() {
        let nb_and_en = [variant("a.nb.html"), variant("a.en.html")];
        assert_eq!(
            select(&nb_and_en, "a", Some("*/html"), Some("no")),
            Some("a.nb.html")
        );
        let no_and_en = [variant("a.no.html"), variant("a.en.html")];
        assert_eq!(
            select(&no_and_en, "a", Some("*/html"), Some("nb")),
            Some("a.no.html")
        );
    }

    #[test]
    fn test_exact_locale_beats_alias_at_equal_score() {
        let variants = [
            variant("a.no.html"),
            variant("a.nb.html"),
            variant("a.en.html"),
        ];
        assert_eq!(
            select(&variants, "a", Some("*/html"), Some("nb")),
            Some("a.nb.html")
        );
        assert_eq!(
            select(&variants, "a", Some("*/html"), Some("no")),
            Some("a.no.html")
        );
    }

    #[test]
    fn test_first_matching_locale_stops_the_search() {
        let variants = [variant("a.da.html"), variant("a.en.html")];
        assert_eq!(
            select(&variants, "a", Some("*/html"), Some("da,en")),
            Some("a.da.html")
        );
    }

    fn classified(user_agent: &str) -> TagSet {
        let mut tags = SubstringClassifier.classify(user_agent);
        tags.fill_negations();
        tags
    }

    #[test]
    fn test_touch_requesters_prefer_touch_variants() {
        let variants = [variant("index.touch.html"), variant("index.html")];
        let pin = VariantTraits::from_extension_string("", false);
        let prioritized = build_prioritized_list(None, None, None, None);
        let tokens = parse_quality("*/html");

        let touch = classified("Mozilla/5.0 (iPad; CPU OS 4_3_2 like Mac OS X) Safari/6533");
        let ctx = ScoringContext {
            requested_file_name: "index",
            request_pin: &pin,
            prioritized_locale_ids: &prioritized,
            accept_tokens: Some(&tokens),
            requester_tags: Some(&touch),
        };
        match select_variant(&variants, &ctx) {
            Selection::Best(winner) => assert_eq!(winner.file_name, "index.touch.html"),
            _ => panic!("expected a winner"),
        }

        let desktop = classified("Mozilla/4.0 (compatible; MSIE 8.0; Windows NT 6.1)");
        let ctx = ScoringContext {
            requester_tags: Some(&desktop),
            ..ctx
        };
        match select_variant(&variants, &ctx) {
            Selection::Best(winner) => assert_eq!(winner.file_name, "index.html"),
            _ => panic!("expected a winner"),
        }
    }

    #[test]
    fn test_negated_tag_variants() {
        let variants = [variant("bar.touch.html"), variant("bar.nontouch.html")];
        let pin = VariantTraits::from_extension_string("", false);
        let prioritized = build_prioritized_list(None, None, None, None);
        let tokens = parse_quality("*/html");
        let desktop = classified("Mozilla/4.0 (compatible; MSIE 8.0; Windows NT 6.1)");
        let ctx = ScoringContext {
            requested_file_name: "bar",
            request_pin: &pin,
            prioritized_locale_ids: &prioritized,
            accept_tokens: Some(&tokens),
            requester_tags: Some(&desktop),
        };
        match select_variant(&variants, &ctx) {
            Selection::Best(winner) => assert_eq!(winner.file_name, "bar.nontouch.html"),
            _ => panic!("expected a winner"),
        }
    }
}
