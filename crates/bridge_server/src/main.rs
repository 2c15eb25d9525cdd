//! Bridge server entry point.
//!
//! Boots an in-process host with the configured faction plugin, binds the
//! faction bridge to it and runs the game loop until a shutdown signal.

mod cli;
mod config;
mod logging;
mod server;
mod signals;

use anyhow::Context;
use cli::CliArgs;
use config::AppConfig;
use factions_bridge::events::subscribe;
use factions_bridge::{
    FactionCreateEvent, FactionDisbandEvent, FactionJoinEvent, FactionLeaveEvent,
};
use host_event_system::{Host, ServerHost};
use std::sync::Arc;
use tracing::{error, info};

struct Application {
    config: AppConfig,
    host: Arc<ServerHost>,
}

impl Application {
    async fn new(args: CliArgs) -> anyhow::Result<Self> {
        // Configuration is loaded before logging exists
        let mut config = AppConfig::load_from_file(&args.config_path)
            .await
            .with_context(|| format!("loading {}", args.config_path.display()))?;

        if let Some(log_level) = args.log_level {
            config.logging.level = log_level;
        }
        if args.json_logs {
            config.logging.json_format = true;
        }
        if let Some(provider) = args.provider {
            config.provider.install = provider;
        }
        if args.strict {
            config.bridge.require_provider = true;
        }

        config
            .validate()
            .map_err(|e| anyhow::anyhow!("Configuration validation failed: {e}"))?;

        logging::setup_logging(&config.logging)?;

        info!(
            "🚀 Factions Bridge Server v{} | Config: {}",
            env!("CARGO_PKG_VERSION"),
            args.config_path.display()
        );

        let host = server::build_host(&config.host);
        Ok(Self { config, host })
    }

    async fn run(self) -> anyhow::Result<()> {
        server::install_provider(&self.host, &self.config.provider).await;

        factions_bridge::connect(self.host.clone(), self.config.bridge.clone()).await?;
        if factions_bridge::connected() {
            let api = factions_bridge::factions_api()?;
            info!("🤝 Bound to {}", api.provider().name);
            log_activity(&self.host).await?;
        } else {
            info!("⚠️ Running without a faction provider");
        }

        let ticker = server::spawn_tick_loop(self.host.clone(), self.config.host.tick_interval_ms);
        info!(
            "✅ Server is running, one tick every {}ms",
            self.config.host.tick_interval_ms
        );
        info!("🛑 Press Ctrl+C to shut down");

        signals::wait_for_shutdown().await?;

        info!("🛑 Shutdown signal received");
        ticker.abort();

        let stats = self.host.events().get_stats().await;
        info!("📊 Final Statistics:");
        info!("  - Ticks run: {}", self.host.scheduler().current_tick());
        info!("  - Events emitted: {}", stats.events_emitted);
        info!("  - Handler failures: {}", stats.handler_failures);
        Ok(())
    }
}

/// Logs faction lifecycle and membership changes as they are published.
async fn log_activity(host: &ServerHost) -> anyhow::Result<()> {
    let events = host.events();
    subscribe(&events, |event: &FactionCreateEvent| {
        info!("🏰 Faction created: {}", event.faction.name());
        Ok(())
    })
    .await?;
    subscribe(&events, |event: &FactionDisbandEvent| {
        info!(
            "💥 Faction disbanded: {} ({:?})",
            event.faction.name(),
            event.reason
        );
        Ok(())
    })
    .await?;
    subscribe(&events, |event: &FactionJoinEvent| {
        info!(
            "➕ {} joined {}",
            event.fplayer.name(),
            event.faction.name()
        );
        Ok(())
    })
    .await?;
    subscribe(&events, |event: &FactionLeaveEvent| {
        info!(
            "➖ {} left {} ({:?})",
            event.fplayer.name(),
            event.faction.name(),
            event.reason
        );
        Ok(())
    })
    .await?;
    Ok(())
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let args = CliArgs::parse();
    let app = Application::new(args).await?;

    if let Err(e) = app.run().await {
        error!("❌ Server error: {:#}", e);
        return Err(e);
    }

    info!("✅ Shutdown complete");
    Ok(())
}
