//! Configuration module for the site backend.
//!
//! All configuration is loaded from environment variables with sensible defaults.

use std::env;
use std::net::SocketAddr;
use std::path::PathBuf;

/// Application configuration loaded from environment variables.
#[derive(Debug, Clone)]
pub struct Config {
    /// Path to the JSON document file
    pub data_path: PathBuf,
    /// Directory uploaded files are written to
    pub uploads_dir: PathBuf,
    /// URL prefix under which uploads are served
    pub uploads_url: String,
    /// Address to bind the server to
    pub bind_addr: SocketAddr,
    /// Log level (trace, debug, info, warn, error)
    pub log_level: String,
    /// Largest accepted request body for uploads, in bytes
    pub max_upload_bytes: usize,
}

impl Config {
    /// Load configuration from environment variables.
    pub fn from_env() -> Self {
        dotenvy::dotenv().ok();

        let data_path = env::var("SITE_DATA_PATH")
            .unwrap_or_else(|_| "./data/db.json".to_string())
            .into();

        let uploads_dir = env::var("SITE_UPLOADS_DIR")
            .unwrap_or_else(|_| "./uploads".to_string())
            .into();

        let uploads_url = env::var("SITE_UPLOADS_URL")
            .map(|url| url.trim_end_matches('/').to_string())
            .unwrap_or_else(|_| "/uploads".to_string());

        let bind_addr = env::var("SITE_BIND_ADDR")
            .unwrap_or_else(|_| "0.0.0.0:3001".to_string())
            .parse()
            .expect("Invalid SITE_BIND_ADDR format");

        let log_level = env::var("SITE_LOG_LEVEL").unwrap_or_else(|_| "info".to_string());

        let max_upload_bytes = env::var("SITE_MAX_UPLOAD_BYTES")
            .ok()
            .and_then(|v| v.parse().ok())
            .unwrap_or(10 * 1024 * 1024);

        Self {
            data_path,
            uploads_dir,
            uploads_url,
            bind_addr,
            log_level,
            max_upload_bytes,
        }
    }
}
