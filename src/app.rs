/*
 * Responsibility
 * - tracing + panic hook setup
 * - Config -> dependencies (signing key, stores, codecs) -> Router
 * - middleware wiring (CORS / http stack) and axum::serve()
 */
use std::{panic, process, sync::Arc, time::Duration};

use anyhow::{Context, Result};
use axum::{Router, routing::get};
use sqlx::postgres::PgPoolOptions;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use crate::api::{self, v1::handlers::health::health};
use crate::config::Config;
use crate::middleware;
use crate::repos::{
    CatalogStore, MemoryCatalogStore, MemoryUserStore, PgCatalogRepo, PgUserRepo, UserStore,
};
use crate::services::auth::{PasswordService, SigningKey, TokenCodec};
use crate::services::id_codec::IdCodec;
use crate::state::AppState;

fn init_tracing() {
    // RUST_LOG wins when set, e.g. RUST_LOG=info,agrodx_api=debug,tower_http=debug
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info,tower_http=info"));

    tracing_subscriber::registry()
        .with(filter)
        .with(tracing_subscriber::fmt::layer())
        .init();
}

fn init_panic_hook(abort_on_panic: bool) {
    let default_hook = panic::take_hook();

    panic::set_hook(Box::new(move |info| {
        tracing::error!(?info, "panic");

        // development: crash loudly. production: default hook, server keeps running
        if abort_on_panic {
            process::abort();
        } else {
            default_hook(info);
        }
    }))
}

pub async fn run() -> Result<()> {
    init_tracing();
    let config = Config::from_env()?;
    init_panic_hook(!config.app_env.is_production());

    tracing::info!(
        "starting API in {:?} mode on {}",
        config.app_env,
        config.addr
    );

    let state = build_state(&config).await?;
    let app = build_router(state, &config);

    let listener = tokio::net::TcpListener::bind(config.addr).await?;
    axum::serve(listener, app).await?;
    Ok(())
}

async fn build_stores(config: &Config) -> Result<(Arc<dyn UserStore>, Arc<dyn CatalogStore>)> {
    let Some(url) = config.database_url.as_deref() else {
        tracing::warn!("DATABASE_URL not set; using in-memory stores (data is lost on restart)");
        return Ok((
            Arc::new(MemoryUserStore::new()),
            Arc::new(MemoryCatalogStore::new()),
        ));
    };

    let pool = PgPoolOptions::new()
        .max_connections(config.database_max_connections)
        .acquire_timeout(Duration::from_secs(5))
        .connect(url)
        .await
        .context("connecting to DATABASE_URL")?;

    sqlx::migrate!("./migrations")
        .run(&pool)
        .await
        .context("running migrations")?;

    tracing::info!(
        max_connections = config.database_max_connections,
        "postgres pool ready"
    );
    Ok((
        Arc::new(PgUserRepo::new(pool.clone())),
        Arc::new(PgCatalogRepo::new(pool)),
    ))
}

async fn build_state(config: &Config) -> Result<AppState> {
    // One key per process: every token issued before a restart stops verifying.
    let key = SigningKey::generate()
        .map_err(|e| anyhow::anyhow!("generating token signing key: {e}"))?;
    let codec = TokenCodec::new(
        &key,
        config.auth_issuer.clone(),
        config.access_token_ttl_seconds,
        config.access_token_leeway_seconds,
    );

    let (users, catalog) = build_stores(config).await?;
    let id_codec = IdCodec::new(config.sqids_min_length, &config.sqids_alphabet)?;
    let passwords = PasswordService::new()?;

    Ok(AppState::new(users, catalog, id_codec, passwords, codec))
}

pub(crate) fn build_router(state: AppState, config: &Config) -> Router {
    let router = Router::new()
        .route("/health", get(health))
        .nest("/api/v1", api::v1::routes(state.clone()))
        .with_state(state);

    let router = middleware::cors::apply(router, config);
    middleware::http::apply(router, config)
}
