mod handlers;

use axum::{routing::get, Router};
use tower::ServiceBuilder;
use tower_http::{cors::CorsLayer, trace::TraceLayer};

use crate::config::ServerConfig;
use crate::db::Database;

/// Router with permissive CORS, for local use and tests.
pub fn create_router(db: Database) -> Router {
    build_router(db, CorsLayer::permissive())
}

/// Router whose CORS policy comes from `config`.
pub fn create_router_with_config(db: Database, config: &ServerConfig) -> Router {
    build_router(db, config.cors_layer())
}

fn build_router(db: Database, cors: CorsLayer) -> Router {
    let api = Router::new()
        .route("/tasks", get(handlers::list_tasks).post(handlers::submit))
        .route("/health", get(handlers::health));

    Router::new()
        .nest("/api/v1", api)
        .layer(
            ServiceBuilder::new()
                .layer(TraceLayer::new_for_http())
                .layer(cors),
        )
        .with_state(db)
}
