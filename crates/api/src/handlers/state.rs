use super::models::AppState;
use axum::extract::FromRef;
use std::path::PathBuf;
use std::sync::Arc;
use varia_negotiator::Negotiator;

impl AppState {
    pub fn new(
        negotiator: Arc<Negotiator>,
        roots: Vec<PathBuf>,
        cookie_name: Option<String>,
        user_agent_enabled: bool,
        streaming_threshold_mb: u64,
    ) -> Self {
        Self {
            negotiator,
            roots: Arc::new(roots),
            cookie_name: cookie_name.map(Arc::from),
            user_agent_enabled,
            streaming_threshold_bytes: streaming_threshold_mb * 1024 * 1024,
        }
    }
}

impl FromRef<AppState> for Arc<Negotiator> {
    fn from_ref(state: &AppState) -> Self {
        Arc::clone(&state.negotiator)
    }
}
