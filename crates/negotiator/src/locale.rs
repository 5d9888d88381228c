/// Language subtag prefixes accepted as locale ids in file names. Taken from
/// an older CLDR release, so the list is known to be incomplete.
const LANGUAGE_SUBTAGS: &[&str] = &[
    "aa", "af", "ak", "am", "ar", "as", "asa", "az", "be", "bem", "bez", "bg", "bm", "bn", "bo",
    "br", "brx", "bs", "byn", "ca", "cch", "cgg", "chr", "cs", "cy", "da", "dav", "de", "dv",
    "dz", "ebu", "ee", "el", "en", "eo", "es", "et", "eu", "fa", "ff", "fi", "fil", "fo", "fr",
    "fur", "ga", "gaa", "gez", "gl", "gsw", "gu", "guz", "gv", "ha", "haw", "he", "hi", "hr",
    "hu", "hy", "ia", "id", "ig", "ii", "in", "is", "it", "iu", "iw", "ja", "jmc", "ka", "kab",
    "kaj", "kam", "kcg", "kde", "kea", "kfo", "khq", "ki", "kk", "kl", "kln", "km", "kn", "ko",
    "kok", "kpe", "ksb", "ksh", "ku", "kw", "ky", "lag", "lg", "ln", "lo", "lt", "luo", "luy",
    "lv", "mas", "mer", "mfe", "mg", "mi", "mk", "ml", "mn", "mo", "mr", "ms", "mt", "my", "naq",
    "nb", "nd", "nds", "ne", "nl", "nn", "no", "nr", "nso", "ny", "nyn", "oc", "om", "or", "pa",
    "pl", "ps", "pt", "rm", "ro", "rof", "root", "ru", "rw", "rwk", "sa", "saq", "se", "seh",
    "ses", "sg", "sh", "shi", "si", "sid", "sk", "sl", "sn", "so", "sq", "sr", "ss", "ssy", "st",
    "sv", "sw", "syr", "ta", "te", "teo", "tg", "th", "ti", "tig", "tl", "tn", "to", "tr", "trv",
    "ts", "tt", "tzm", "ug", "uk", "ur", "uz", "ve", "vi", "vun", "wal", "wo", "xh", "xog", "yo",
    "zh", "zu",
];

/// Locale ids treated as mutually interchangeable when matching variants.
const LOCALE_ALIASES: &[(&str, &str)] = &[("no", "nb")];

/// `en-GB` => `en_gb`.
pub fn normalize_locale_id(locale_id: &str) -> String {
    locale_id.replace('-', "_").to_lowercase()
}

/// Expands a locale id into its fallback chain, most specific first:
/// `en_gb_scouse` => `["en_gb_scouse", "en_gb", "en"]`.
pub fn expand_locale_id(locale_id: &str) -> Vec<String> {
    let normalized = normalize_locale_id(locale_id);
    let mut locale_ids = vec![normalized.clone()];
    let mut current = normalized.as_str();
    while let Some(underscore) = current.rfind('_') {
        if underscore + 1 == current.len() {
            break;
        }
        current = &current[..underscore];
        locale_ids.push(current.to_string());
    }
    locale_ids
}

/// Membership test for a normalized id against the subtag table: the first
/// underscore-separated segment must be a known language subtag.
pub fn is_locale_id(normalized_id: &str) -> bool {
    match normalized_id.split('_').next() {
        Some(prefix) if !prefix.is_empty() => LANGUAGE_SUBTAGS.binary_search(&prefix).is_ok(),
        _ => false,
    }
}

/// Exact match or either-direction alias membership.
pub fn locale_ids_equal(a: &str, b: &str) -> bool {
    a == b
        || LOCALE_ALIASES
            .iter()
            .any(|(x, y)| (a == *x && b == *y) || (a == *y && b == *x))
}

/// Merges the four locale preference sources into one prioritized list.
///
/// A locale pinned by the request's own file name extension demands an exact
/// match: it forms the entire list, with no expansion and no fallback.
/// Otherwise the sources are appended in order of authority: query parameter,
/// cookie entries (each expanded), Accept-Language tokens (parameters
/// stripped, qualities deliberately ignored, each expanded), and finally the
/// fixed default tail. Duplicates are not removed; the scorer stops at the
/// first locale id that yields a match.
pub fn build_prioritized_list(
    extension_locale_id: Option<&str>,
    query_locale: Option<&str>,
    cookie_locale_csv: Option<&str>,
    accept_language: Option<&str>,
) -> Vec<String> {
    if let Some(pinned) = extension_locale_id {
        return vec![pinned.to_string()];
    }
    let mut locale_ids = Vec::new();
    if let Some(query) = query_locale {
        locale_ids.push(normalize_locale_id(query));
    }
    if let Some(csv) = cookie_locale_csv {
        for entry in csv.split(',') {
            let entry = entry.trim();
            if !entry.is_empty() {
                locale_ids.extend(expand_locale_id(entry));
            }
        }
    }
    if let Some(header) = accept_language {
        for token in header.split(',') {
            let token = token.split(';').next().unwrap_or("").trim();
            if !token.is_empty() {
                locale_ids.extend(expand_locale_id(token));
            }
        }
    }
    locale_ids.push("en_us".to_string());
    locale_ids.push("en".to_string());
    locale_ids
}
