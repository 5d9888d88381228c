mod bootstrap;

use crate::bootstrap::{config, logging, router};
use anyhow::Result;
use std::path::PathBuf;
use std::sync::Arc;
use varia_api::AppState;
use varia_events::{AppEvent, EventBus};
use varia_negotiator::{CatalogCache, Negotiator};
use varia_watcher::DirWatcher;

#[tokio::main]
async fn main() -> Result<()> {
    logging::initialize();

    let events = EventBus::new(false);
    events.emit(AppEvent::Starting);

    let config_path = std::env::var("VARIA_CONFIG").unwrap_or_else(|_| "config.toml".to_string());
    let config = config::load(&config_path, &events).await?;

    let roots: Vec<PathBuf> = config.negotiation.roots.iter().map(PathBuf::from).collect();

    let catalog = Arc::new(CatalogCache::new(
        roots.clone(),
        config.negotiation.user_agent,
    ));

    if config.negotiation.watch {
        match DirWatcher::spawn(Arc::clone(&catalog)) {
            Ok(watcher) => {
                catalog.set_watch_hook(watcher);
                events.emit(AppEvent::WatcherStarted);
            }
            // Stale catalogs are acceptable; a missing watcher backend is not fatal
            Err(e) => {
                events.emit(AppEvent::WatcherUnavailable {
                    error: e.to_string(),
                });
            }
        }
    }

    let negotiator = Arc::new(Negotiator::new(
        Arc::clone(&catalog),
        config.negotiation.user_agent,
    ));

    let app_state = AppState::new(
        negotiator,
        roots,
        config.negotiation.cookie_name.clone(),
        config.negotiation.user_agent,
        config.server.streaming_threshold_mb,
    );

    let app = router::build(&config, app_state);
    let addr = format!("{}:{}", config.server.host, config.server.port);

    let listener = bind_server(&addr).await?;

    events.emit(AppEvent::Ready {
        addr: addr.clone(),
    });

    let shutdown_signal = async {
        tokio::signal::ctrl_c()
            .await
            .expect("failed to install Ctrl+C handler");
        tracing::info!("Shutdown signal received, initiating graceful shutdown...");
    };

    axum::serve(listener, app.into_make_service())
        .tcp_nodelay(config.server.tcp_nodelay)
        .with_graceful_shutdown(shutdown_signal)
        .await?;

    events.emit(AppEvent::Shutdown);
    Ok(())
}

async fn bind_server(addr: &str) -> Result<tokio::net::TcpListener> {
    tokio::net::TcpListener::bind(addr).await.map_err(|e| {
        if e.kind() == std::io::ErrorKind::AddrInUse {
            let port = addr.split(':').last().unwrap_or("unknown");
            tracing::error!("❌ Port {} is already in use", port);
            tracing::error!("Another application is using this port");
            tracing::error!("Solutions:");
            tracing::error!("1. Stop the other application");
            tracing::error!("2. Change the port in config.toml");
            #[cfg(target_os = "windows")]
            tracing::error!("3. Find process: netstat -ano | findstr :{}", port);
            #[cfg(not(target_os = "windows"))]
            tracing::error!("3. Find process: lsof -i :{}", port);
        } else {
            tracing::error!("❌ Failed to bind server on {}: {}", addr, e);
        }
        anyhow::anyhow!("Failed to bind server: {}", e)
    })
}
