//! Site content backend server.

use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use site_backend::config::Config;
use site_backend::{create_router, AppState};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Load configuration
    let config = Config::from_env();

    // Initialize logging
    let env_filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&config.log_level));

    tracing_subscriber::registry()
        .with(env_filter)
        .with(tracing_subscriber::fmt::layer())
        .init();

    tracing::info!("Starting site backend");
    tracing::info!("Document path: {:?}", config.data_path);
    tracing::info!("Uploads directory: {:?}", config.uploads_dir);
    tracing::info!("Bind address: {}", config.bind_addr);

    let bind_addr = config.bind_addr;
    let state = AppState::from_config(config);

    // Seed the document file up front so a missing file is created at startup
    let document = state.store.read_document().await?;
    tracing::info!(
        "Document loaded: {} news, {} staff, {} vacancies, {} faq",
        document.news.len(),
        document.staff.len(),
        document.vacancies.len(),
        document.faq.len()
    );

    // Build router
    let app = create_router(state);

    // Start server
    let listener = tokio::net::TcpListener::bind(bind_addr).await?;
    tracing::info!("Server listening on {}", bind_addr);

    axum::serve(listener, app).await?;

    Ok(())
}
