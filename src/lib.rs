pub mod config;
pub mod db;
pub mod error;
pub mod handlers;
pub mod messages;
pub mod middleware;
pub mod models;
pub mod repository;
pub mod services;

use std::sync::Arc;

use axum::{
    routing::{get, post},
    Router,
};
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;

use crate::config::Config;
use crate::db::Database;
use crate::messages::Messages;
use crate::repository::{FileRepository, SqliteFileRepository, SqliteUserRepository, UserRepository};
use crate::services::TokenService;

/// Application state shared across handlers
#[derive(Clone)]
pub struct AppState {
    pub config: Arc<Config>,
    pub tokens: Arc<TokenService>,
    pub users: Arc<dyn UserRepository>,
    pub files: Arc<dyn FileRepository>,
    pub messages: Arc<Messages>,
}

impl AppState {
    pub fn new(db: Database, config: Config) -> anyhow::Result<Self> {
        let tokens = Arc::new(TokenService::new(&config.jwt)?);
        Ok(Self {
            config: Arc::new(config),
            tokens,
            users: Arc::new(SqliteUserRepository::new(db.clone())),
            files: Arc::new(SqliteFileRepository::new(db)),
            messages: Arc::new(Messages::new()),
        })
    }
}

pub fn create_router(state: AppState) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    Router::new()
        .route("/login", post(handlers::auth::login))
        .route("/logout", post(handlers::auth::logout))
        .route(
            "/cloud/file",
            post(handlers::cloud::upload_file)
                .get(handlers::cloud::download_file)
                .put(handlers::cloud::rename_file)
                .delete(handlers::cloud::delete_file),
        )
        .route("/cloud/list", get(handlers::cloud::list_files))
        .layer(axum::middleware::from_fn_with_state(
            state.clone(),
            middleware::auth::auth_middleware,
        ))
        .layer(TraceLayer::new_for_http())
        .layer(cors)
        .with_state(state)
}
