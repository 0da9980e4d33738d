use std::{path::PathBuf, sync::Arc};

use anyhow::Context;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use film_recommender::{
    api::{create_router, AppState},
    config::Config,
    db,
    services::{
        lifecycle,
        providers::{FileCatalog, FileWatchHistory, PgCatalog, PgWatchHistory},
        CatalogProvider, Recommender, WatchHistoryProvider,
    },
};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info,tower_http=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let config = Config::from_env()?;

    let (catalog, watch_history) = providers(&config).await?;
    tracing::info!(
        catalog = catalog.name(),
        watch_history = watch_history.name(),
        "Data providers ready"
    );

    let index_path = config.index_path.as_ref().map(PathBuf::from);
    let index = lifecycle::load_or_build(index_path.as_deref(), catalog.as_ref(), config.max_features)
        .await
        .context("Failed to prepare similarity index")?;
    tracing::info!(items = index.len(), built_at = %index.built_at(), "Similarity index ready");

    let recommender = Recommender::new(Arc::new(index), config.default_top_n);
    let state = AppState::new(recommender, catalog, watch_history)
        .with_index_path(index_path)
        .with_max_top_n(config.max_top_n)
        .with_max_features(config.max_features);

    let app = create_router(state);

    let addr = format!("{}:{}", config.host, config.port);
    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .with_context(|| format!("Failed to bind {}", addr))?;
    tracing::info!(%addr, "Film recommender listening");

    axum::serve(listener, app).await?;
    Ok(())
}

/// PostgreSQL when `DATABASE_URL` is set, JSON files otherwise
async fn providers(
    config: &Config,
) -> anyhow::Result<(Arc<dyn CatalogProvider>, Arc<dyn WatchHistoryProvider>)> {
    if let Some(database_url) = &config.database_url {
        let pool = db::create_pool(database_url, config.database_max_connections).await?;
        return Ok((
            Arc::new(PgCatalog::new(pool.clone())),
            Arc::new(PgWatchHistory::new(pool)),
        ));
    }

    let watch_history = match &config.watch_history_path {
        Some(path) => FileWatchHistory::from_path(path).await?,
        None => FileWatchHistory::default(),
    };

    Ok((
        Arc::new(FileCatalog::new(&config.catalog_path)),
        Arc::new(watch_history),
    ))
}
