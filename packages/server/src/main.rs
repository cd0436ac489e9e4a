use tracing::{Level, info};

use server::config::AppConfig;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt().with_max_level(Level::INFO).init();

    let config = AppConfig::load()?;

    let db = server::database::init_db(&config.database.url).await?;

    tokio::fs::create_dir_all(&config.media.root).await?;
    if let Some(ref path) = config.media.ingredients_file {
        server::seed::seed_ingredients(&db, path).await?;
    }

    let addr = format!("{}:{}", config.server.host, config.server.port);
    let state = server::state::AppState { db, config };
    let app = server::build_router(state);

    info!("Server running at http://{}", addr);

    let listener = tokio::net::TcpListener::bind(&addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
