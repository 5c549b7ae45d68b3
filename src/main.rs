//! Server binary: loads env config, ensures the database and schema exist,
//! then mounts the common and movie routes.

use movie_service::{
    common_routes, ensure_database_exists, movie_routes, AppState, Config, MovieService,
    PgMovieStore,
};
use axum::Router;
use std::sync::Arc;
use tokio::net::TcpListener;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    dotenvy::dotenv().ok();
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new("movie_service=info")),
        )
        .init();

    let config = Config::from_env();
    ensure_database_exists(&config.database_url).await?;
    let pool = sqlx::postgres::PgPoolOptions::new()
        .max_connections(config.max_connections)
        .connect(&config.database_url)
        .await?;

    let store = PgMovieStore::new(pool);
    store.ensure_schema().await?;

    let state = AppState {
        service: MovieService::new(Arc::new(store)),
    };

    let app = Router::new()
        .merge(common_routes(state.clone()))
        .nest("/api", movie_routes(state));

    let listener = TcpListener::bind(&config.bind_addr).await?;
    tracing::info!("listening on {}", listener.local_addr()?);
    axum::serve(listener, app).await?;
    Ok(())
}
