//! Site content backend.
//!
//! A JSON document store with section-level REST endpoints, an upload side channel, and the
//! typed storage client the admin pages use on top of it.

pub mod api;
pub mod client;
pub mod config;
pub mod errors;
pub mod models;
pub mod store;

use std::sync::Arc;

use axum::{
    extract::DefaultBodyLimit,
    routing::{get, post},
    Router,
};
use tower::ServiceBuilder;
use tower_http::cors::{Any, CorsLayer};
use tower_http::services::ServeDir;
use tower_http::trace::TraceLayer;

use config::Config;
use store::{DocumentStore, UploadStore};

/// Application state shared across all handlers.
#[derive(Clone)]
pub struct AppState {
    pub store: DocumentStore,
    pub uploads: Arc<UploadStore>,
    pub config: Arc<Config>,
}

impl AppState {
    /// Start the document actor and upload store described by `config`.
    pub fn from_config(config: Config) -> Self {
        let store = DocumentStore::spawn(&config.data_path);
        let uploads = UploadStore::new(&config.uploads_dir, config.uploads_url.clone());
        Self {
            store,
            uploads: Arc::new(uploads),
            config: Arc::new(config),
        }
    }
}

/// Create the application router with all routes.
pub fn create_router(state: AppState) -> Router {
    // CORS configuration
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    let upload_limit = state.config.max_upload_bytes;
    let uploads_dir = state.config.uploads_dir.clone();
    let uploads_url = state.config.uploads_url.clone();

    // API routes
    let api_routes = Router::new()
        // Whole document
        .route("/data", get(api::get_data))
        .route("/revisions", get(api::get_revisions))
        // Sections
        .route("/news", get(api::get_news))
        .route("/staff", get(api::get_staff))
        .route("/vacancies", get(api::get_vacancies))
        .route("/faq", get(api::get_faq))
        .route("/info", get(api::get_info))
        // Mutations
        .route("/save", post(api::save_section))
        .route("/restore", post(api::restore_document))
        .route(
            "/upload",
            post(api::upload_file).layer(DefaultBodyLimit::max(upload_limit)),
        );

    // Health check
    let health_routes = Router::new().route("/health", get(health_check));

    Router::new()
        .nest("/api", api_routes)
        .nest_service(&uploads_url, ServeDir::new(uploads_dir))
        .merge(health_routes)
        .layer(
            ServiceBuilder::new()
                .layer(TraceLayer::new_for_http())
                .layer(cors),
        )
        .with_state(state)
}

/// Health check endpoint.
async fn health_check() -> &'static str {
    "OK"
}
