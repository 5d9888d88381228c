use anyhow::Result;
use std::sync::Arc;
use varia_config::Config;
use varia_events::{AppEvent, EventBus};

pub async fn load(config_path: &str, events: &Arc<EventBus>) -> Result<Config> {
    events.emit(AppEvent::ConfigLoading {
        path: config_path.to_string(),
    });

    let config = Config::from_file_with_events(config_path, Some(events)).await?;

    events.emit(AppEvent::ConfigLoaded {
        roots_count: config.negotiation.roots.len(),
    });

    Ok(config)
}
