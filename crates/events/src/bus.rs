use super::models::{AppEvent, EventBus};
use colored::Colorize;
use std::sync::Arc;

impl EventBus {
    pub fn new(silent_mode: bool) -> Arc<Self> {
        Arc::new(Self { silent_mode })
    }

    pub fn emit(&self, event: AppEvent) {
        match event {
            // Log-backed events go out regardless of silent mode
            AppEvent::ConfigCreated { path } => {
                tracing::warn!("Configuration file not found");
                tracing::info!("Created default configuration at: {}", path);
            }
            AppEvent::ConfigError { error } => {
                tracing::error!("Configuration error: {}", error);
            }
            AppEvent::WatcherUnavailable { error } => {
                tracing::warn!("File watching disabled: {}", error);
            }
            AppEvent::Error { context, error } => {
                tracing::error!("{}: {}", context, error);
            }

            // Console output
            _ if self.silent_mode => {}
            AppEvent::Starting => {
                println!("\n{}", "━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━".bright_black());
                println!("  {}", "Varia - Content Negotiation Server".white().bold());
                println!("  {} {}", "Version".dimmed(), env!("CARGO_PKG_VERSION").cyan());
                println!("{}\n", "━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━".bright_black());
            }
            AppEvent::Ready { addr } => {
                println!("{}", "━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━".green());
                println!("  {} {}", "Listening on".white(), addr.cyan());
                println!("{}\n", "━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━".green());
            }
            AppEvent::Shutdown => {
                println!("\n{}", "Server shutting down".red());
            }
            AppEvent::ConfigLoading { path } => {
                println!("  {} {}", "Loading config".dimmed(), path.cyan());
            }
            AppEvent::ConfigLoaded { roots_count } => {
                if roots_count == 0 {
                    println!("  {} No root directories configured", "⚠".yellow());
                } else {
                    println!("  {} {} root(s)", "✓".green(), roots_count.to_string().cyan());
                }
            }
            AppEvent::WatcherStarted => {
                println!("  {} Watching roots for changes", "↻".blue());
            }
        }
    }
}
