use std::sync::Arc;

use movie_catalog::{AppState, app, config::Config, db, store::MovieStore};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    movie_catalog::init_tracing();

    let config = Config::from_env()?;

    let db = db::connect_and_migrate(config.database_url.as_str()).await?;
    let state = Arc::new(AppState { movies: MovieStore::new(db, config.policy) });

    let listener = tokio::net::TcpListener::bind(config.addr).await?;
    tracing::info!(addr = %config.addr, policy = ?config.policy, "listening");
    axum::serve(listener, app(state)).await?;

    Ok(())
}
