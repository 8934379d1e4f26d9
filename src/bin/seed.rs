use movie_catalog::{config::Config, db, seed};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    movie_catalog::init_tracing();

    let config = Config::from_env()?;
    let db = db::connect_and_migrate(config.database_url.as_str()).await?;

    tracing::info!("seeding movies");
    let inserted = seed::run(&db).await?;
    tracing::info!(inserted, "seed complete");

    db.close().await?;
    Ok(())
}
