#[derive(Debug, Clone)]
pub enum AppEvent {
    // Application lifecycle
    Starting,
    Ready { addr: String },
    Shutdown,

    // Configuration
    ConfigLoading { path: String },
    ConfigCreated { path: String },
    ConfigLoaded { roots_count: usize },
    ConfigError { error: String },

    // Negotiation
    WatcherStarted,
    WatcherUnavailable { error: String },

    // Errors
    Error { context: String, error: String },
}

pub struct EventBus {
    pub(super) silent_mode: bool,
}
