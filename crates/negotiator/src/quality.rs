use std::cmp::Ordering;

/// One entry of a comma-separated preference header, e.g.
/// `text/cache-manifest;q=0.8`.
#[derive(Debug, Clone, PartialEq)]
pub struct QualityToken {
    pub value: String,
    pub quality: f64,
}

/// Parses a preference header into tokens sorted by descending quality.
///
/// The sort is stable: tokens with equal quality keep their original relative
/// order, which the scorer relies on for first-match semantics. Entries with
/// an unparseable or zero quality are dropped.
pub fn parse_quality(header: &str) -> Vec<QualityToken> {
    let mut tokens: Vec<QualityToken> = header.split(',').filter_map(parse_quality_token).collect();
    tokens.sort_by(|a, b| b.quality.partial_cmp(&a.quality).unwrap_or(Ordering::Equal));
    tokens
}

fn parse_quality_token(item: &str) -> Option<QualityToken> {
    let mut parts = item.trim().splitn(2, ';');
    let value = parts.next()?.trim().to_string();
    let quality = match parts.next() {
        None => 1.0,
        Some(parameter) => parameter
            .split('=')
            .nth(1)
            .and_then(|q| q.trim().parse::<f64>().ok())
            .unwrap_or(0.0),
    };
    if quality > 0.0 {
        Some(QualityToken { value, quality })
    } else {
        None
    }
}
