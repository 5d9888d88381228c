use std::path::PathBuf;
use std::sync::Arc;
use varia_negotiator::Negotiator;

#[derive(Clone)]
pub struct AppState {
    pub negotiator: Arc<Negotiator>,
    pub roots: Arc<Vec<PathBuf>>,
    pub cookie_name: Option<Arc<str>>,
    pub user_agent_enabled: bool,
    pub streaming_threshold_bytes: u64,
}
