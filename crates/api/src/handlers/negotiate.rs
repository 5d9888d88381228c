use crate::errors::ApiError;
use crate::handlers::models::AppState;
use axum::{
    extract::{Request, State},
    http::{header, HeaderMap, HeaderName, HeaderValue, Uri},
    middleware::Next,
    response::Response,
};
use cookie::Cookie;
use std::path::Path;
use std::time::UNIX_EPOCH;
use varia_negotiator::{Decision, RequestFacts, RewritePlan};

/// Request-rewriting layer. Resolves the requested URL against the variant
/// catalog and, on a hit, swaps the request URI for the winning file before
/// the inner service runs, then decorates the response.
pub async fn negotiate(
    State(state): State<AppState>,
    mut req: Request,
    next: Next,
) -> Result<Response, ApiError> {
    let path_and_query = req
        .uri()
        .path_and_query()
        .map(|pq| pq.as_str().to_string())
        .unwrap_or_else(|| req.uri().path().to_string());
    let accept = header_string(req.headers(), header::ACCEPT);
    let accept_language = header_string(req.headers(), header::ACCEPT_LANGUAGE);
    let user_agent = header_string(req.headers(), header::USER_AGENT);
    let cookie_locale = state
        .cookie_name
        .as_deref()
        .and_then(|name| find_cookie(req.headers(), name));

    let facts = RequestFacts {
        path_and_query: &path_and_query,
        accept: accept.as_deref(),
        accept_language: accept_language.as_deref(),
        user_agent: user_agent.as_deref(),
        cookie_locale: cookie_locale.as_deref(),
    };
    let decision = state.negotiator.negotiate(facts).await?;

    let mut applied: Option<(RewritePlan, Option<String>)> = None;
    if let Decision::Rewrite(plan) = decision {
        if let Ok(target) = plan.target.parse::<Uri>() {
            let etag = match &plan.etag_prefix {
                Some(prefix) => entity_tag(prefix, &plan.absolute_path).await?,
                None => None,
            };
            *req.uri_mut() = target;
            if etag.is_some() {
                // A conditional revalidation must compare entity tags, not
                // the modification date of whichever variant won last time
                req.headers_mut().remove(header::IF_MODIFIED_SINCE);
            }
            applied = Some((plan, etag));
        }
    }

    let mut response = next.run(req).await;

    if let Some((plan, etag)) = applied {
        let headers = response.headers_mut();
        set_header(headers, header::CONTENT_LOCATION, &plan.content_location);
        headers.insert(
            header::CACHE_CONTROL,
            HeaderValue::from_static("public, max-age=0, must-revalidate"),
        );
        let vary = if state.user_agent_enabled {
            "Cookie, Accept-Language, Accept, User-Agent"
        } else {
            "Cookie, Accept-Language, Accept"
        };
        headers.insert(header::VARY, HeaderValue::from_static(vary));
        if let Some(language) = &plan.content_language {
            set_header(headers, header::CONTENT_LANGUAGE, language);
        }
        if let Some(etag) = &etag {
            set_header(headers, header::ETAG, etag);
        }
    }

    Ok(response)
}

fn header_string(headers: &HeaderMap, name: HeaderName) -> Option<String> {
    headers
        .get(name)
        .and_then(|value| value.to_str().ok())
        .map(str::to_string)
}

fn find_cookie(headers: &HeaderMap, name: &str) -> Option<String> {
    for value in headers.get_all(header::COOKIE) {
        let Ok(raw) = value.to_str() else { continue };
        for cookie in Cookie::split_parse(raw).flatten() {
            if cookie.name() == name {
                return Some(cookie.value().to_string());
            }
        }
    }
    None
}

/// Builds the full entity tag from the negotiated prefix plus the winning
/// file's size and modification time. A file that vanished between scan and
/// stat simply loses its tag.
async fn entity_tag(prefix: &str, path: &Path) -> Result<Option<String>, ApiError> {
    let meta = match tokio::fs::metadata(path).await {
        Ok(meta) => meta,
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(None),
        Err(e) => return Err(e.into()),
    };
    let mtime_ms = meta
        .modified()
        .ok()
        .and_then(|modified| modified.duration_since(UNIX_EPOCH).ok())
        .map(|elapsed| elapsed.as_millis())
        .unwrap_or(0);
    Ok(Some(format!("\"{}{}-{}\"", prefix, meta.len(), mtime_ms)))
}

fn set_header(headers: &mut HeaderMap, name: HeaderName, value: &str) {
    if let Ok(value) = HeaderValue::from_str(value) {
        headers.insert(name, value);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::handlers::files::serve_file;
    use axum::body::Body;
    use axum::http::StatusCode;
    use axum::Router;
    use std::sync::Arc;
    use tower::ServiceExt;
    use varia_negotiator::{CatalogCache, Negotiator};

    fn write(dir: &std::path::Path, name: &str, content: &str) {
        std::fs::write(dir.join(name), content).unwrap();
    }

    fn app(root: &std::path::Path, user_agent_enabled: bool) -> Router {
        let catalog = Arc::new(CatalogCache::new(
            vec![root.to_path_buf()],
            user_agent_enabled,
        ));
        let negotiator = Arc::new(Negotiator::new(catalog, user_agent_enabled));
        let state = AppState::new(
            negotiator,
            vec![root.to_path_buf()],
            Some("locale".to_string()),
            user_agent_enabled,
            100,
        );
        Router::new()
            .fallback(serve_file)
            .layer(axum::middleware::from_fn_with_state(
                state.clone(),
                negotiate,
            ))
            .with_state(state)
    }

    async fn body_string(response: Response) -> String {
        let bytes = axum::body::to_bytes(response.into_body(), 64 * 1024)
            .await
            .unwrap();
        String::from_utf8(bytes.to_vec()).unwrap()
    }

    #[tokio::test]
    async fn test_rewrites_index_and_sets_headers() {
        let dir = tempfile::tempdir().unwrap();
        write(dir.path(), "index.en_US.html", "hello");
        write(dir.path(), "index.da.html", "hej");

        let response = app(dir.path(), false)
            .oneshot(Request::builder().uri("/").body(Body::empty()).unwrap())
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(
            response.headers().get(header::CONTENT_LOCATION).unwrap(),
            "index.en_US.html"
        );
        assert_eq!(
            response.headers().get(header::CACHE_CONTROL).unwrap(),
            "public, max-age=0, must-revalidate"
        );
        assert_eq!(
            response.headers().get(header::VARY).unwrap(),
            "Cookie, Accept-Language, Accept"
        );
        assert_eq!(
            response.headers().get(header::CONTENT_LANGUAGE).unwrap(),
            "en_us"
        );
        let etag = response.headers().get(header::ETAG).unwrap().to_str().unwrap();
        assert!(etag.starts_with("\"text/html-en_us-5-"));
        assert_eq!(body_string(response).await, "hello");
    }

    #[tokio::test]
    async fn test_cookie_picks_variant() {
        let dir = tempfile::tempdir().unwrap();
        write(dir.path(), "index.en_US.html", "hello");
        write(dir.path(), "index.da.html", "hej");

        let response = app(dir.path(), false)
            .oneshot(
                Request::builder()
                    .uri("/")
                    .header(header::COOKIE, "locale=da")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(
            response.headers().get(header::CONTENT_LANGUAGE).unwrap(),
            "da"
        );
        assert_eq!(body_string(response).await, "hej");
    }

    #[tokio::test]
    async fn test_locale_pinned_url_gets_no_etag() {
        let dir = tempfile::tempdir().unwrap();
        write(dir.path(), "foo.en_US.html", "english");

        let response = app(dir.path(), false)
            .oneshot(
                Request::builder()
                    .uri("/foo.en_US.html")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();

        // Exact file name match passes straight through untouched
        assert_eq!(response.status(), StatusCode::OK);
        assert!(response.headers().get(header::ETAG).is_none());
        assert!(response.headers().get(header::CONTENT_LOCATION).is_none());
    }

    #[tokio::test]
    async fn test_unknown_resource_is_404() {
        let dir = tempfile::tempdir().unwrap();
        write(dir.path(), "index.en_US.html", "hello");

        let response = app(dir.path(), false)
            .oneshot(
                Request::builder()
                    .uri("/missing")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::NOT_FOUND);
    }
}
