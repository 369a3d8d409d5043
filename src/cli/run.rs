//! Run command implementation

use crate::cli::RunArgs;
use crate::config::{CarouselConfig, ConfigError, LogFormat};
use crate::rotation::RotationController;
use crate::selector::BackendSelector;
use crate::store::{keys, StateStore};
use anyhow::Context;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Duration;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

/// Everything a command needs: config, store, selector, controller.
pub struct AppContext {
    pub config: CarouselConfig,
    pub store: Arc<StateStore>,
    pub selector: Arc<BackendSelector>,
    pub controller: RotationController,
}

/// Load configuration, falling back to defaults when the file is absent.
pub fn load_config(path: &Path) -> Result<CarouselConfig, ConfigError> {
    let config = if path.exists() {
        CarouselConfig::load(Some(path))?
    } else {
        tracing::debug!("Config file not found, using defaults");
        CarouselConfig::default()
    };

    let config = config.with_env_overrides();
    config.validate()?;
    Ok(config)
}

/// Wire the service objects together from configuration.
///
/// Also refreshes the persisted backend-preferences record so the companion
/// surface sees the configuration actually in use.
pub fn build_context(
    config: CarouselConfig,
    store_override: Option<PathBuf>,
) -> anyhow::Result<AppContext> {
    let store_path = store_override.or_else(|| config.store.path.clone());
    let store = Arc::new(StateStore::open(store_path));

    let client = Arc::new(
        reqwest::Client::builder()
            .build()
            .context("Failed to build HTTP client")?,
    );

    let selector = Arc::new(BackendSelector::new(&config.selector, client));
    if let Err(e) = store.set(keys::BACKEND_PREFS, &config.selector.prefs()) {
        tracing::warn!(error = %e, "Failed to persist backend preferences");
    }

    let controller = RotationController::load(store.clone());

    Ok(AppContext {
        config,
        store,
        selector,
        controller,
    })
}

/// Initialize tracing based on configuration
pub fn init_tracing(config: &crate::config::LoggingConfig) -> anyhow::Result<()> {
    let filter_str = crate::logging::build_filter_directives(config);

    let env_filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&filter_str));

    match config.format {
        LogFormat::Pretty => {
            tracing_subscriber::registry()
                .with(env_filter)
                .with(tracing_subscriber::fmt::layer().pretty())
                .try_init()
                .map_err(|e| anyhow::anyhow!("Failed to initialize tracing: {}", e))?;
        }
        LogFormat::Json => {
            tracing_subscriber::registry()
                .with(env_filter)
                .with(tracing_subscriber::fmt::layer().json())
                .try_init()
                .map_err(|e| anyhow::anyhow!("Failed to initialize tracing: {}", e))?;
        }
    }

    Ok(())
}

/// Run the rotation daemon until interrupted.
pub async fn run_rotation(args: RunArgs) -> anyhow::Result<()> {
    let mut config = load_config(&args.config)?;
    if let Some(ref level) = args.log_level {
        config.logging.level = level.clone();
    }
    init_tracing(&config.logging)?;

    let ctx = build_context(config, args.store.clone())?;

    if !args.no_probe {
        ctx.selector.probe_all().await;
        match ctx.selector.active_backend() {
            Some(kind) => tracing::info!(backend = %kind, "Active text-generation backend"),
            None => tracing::info!("No text-generation backend available"),
        }
    }

    let snapshot = ctx.controller.snapshot().await;
    if snapshot.targets.is_empty() {
        tracing::warn!(
            "No dashboard targets configured; apply a configuration push with `carousel apply`"
        );
    } else {
        // Give the rotation a best-effort AI ordering before the first tick.
        if !args.no_probe && ctx.controller.refresh_priority(&ctx.selector).await {
            tracing::info!("Rotation reordered by priority suggestion");
        }
        ctx.controller.start().await;
    }

    let mut probe_interval = tokio::time::interval(Duration::from_secs(args.probe_interval.max(1)));
    probe_interval.set_missed_tick_behavior(tokio::time::MissedTickBehavior::Skip);
    // Consume the immediate first tick; the initial probe already ran above.
    probe_interval.tick().await;

    loop {
        tokio::select! {
            _ = tokio::signal::ctrl_c() => {
                tracing::info!("Shutting down");
                break;
            }
            _ = probe_interval.tick(), if !args.no_probe => {
                ctx.selector.probe_all().await;
                if ctx.controller.refresh_priority(&ctx.selector).await {
                    tracing::info!("Rotation reordered by priority suggestion");
                }
            }
        }
    }

    ctx.controller.stop().await;
    Ok(())
}
