//! Upload side channel: stores raw files under collision-resistant names.

use std::path::{Path, PathBuf};

use chrono::Utc;

use crate::errors::AppError;

/// Directory of uploaded files plus the URL prefix they are served under.
#[derive(Debug, Clone)]
pub struct UploadStore {
    dir: PathBuf,
    url_prefix: String,
}

impl UploadStore {
    pub fn new(dir: impl Into<PathBuf>, url_prefix: impl Into<String>) -> Self {
        Self {
            dir: dir.into(),
            url_prefix: url_prefix.into(),
        }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// Write `bytes` under a fresh name and return the URL referencing it.
    pub async fn store(&self, bytes: &[u8], original_name: &str) -> Result<String, AppError> {
        tokio::fs::create_dir_all(&self.dir).await?;

        let filename = unique_filename(original_name);
        tokio::fs::write(self.dir.join(&filename), bytes).await?;

        tracing::debug!("Stored upload {} ({} bytes)", filename, bytes.len());
        Ok(format!("{}/{}", self.url_prefix, filename))
    }
}

/// `<unix millis>-<9 random digits>[.<ext>]`, keeping the original extension.
fn unique_filename(original_name: &str) -> String {
    let millis = Utc::now().timestamp_millis();
    let random = uuid::Uuid::new_v4().as_u128() % 1_000_000_000;

    match sanitized_extension(original_name) {
        Some(ext) => format!("{}-{:09}.{}", millis, random, ext),
        None => format!("{}-{:09}", millis, random),
    }
}

fn sanitized_extension(original_name: &str) -> Option<String> {
    let ext = Path::new(original_name).extension()?.to_str()?;
    if ext.is_empty() || !ext.chars().all(|c| c.is_ascii_alphanumeric()) {
        return None;
    }
    Some(ext.to_ascii_lowercase())
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_extension_preserved_and_lowercased() {
        assert_eq!(sanitized_extension("photo.JPG"), Some("jpg".to_string()));
        assert_eq!(sanitized_extension("archive.tar.gz"), Some("gz".to_string()));
        assert_eq!(sanitized_extension("README"), None);
        assert_eq!(sanitized_extension("evil.ph/p"), None);
    }

    #[test]
    fn test_unique_filenames_differ() {
        let a = unique_filename("a.png");
        let b = unique_filename("a.png");
        assert_ne!(a, b);
        assert!(a.ends_with(".png"));
    }

    #[tokio::test]
    async fn test_store_writes_file_and_returns_url() {
        let temp_dir = TempDir::new().unwrap();
        let uploads = UploadStore::new(temp_dir.path().join("uploads"), "/uploads");

        let url = uploads.store(b"hello", "note.txt").await.unwrap();
        assert!(url.starts_with("/uploads/"));

        let filename = url.trim_start_matches("/uploads/");
        let stored = std::fs::read(uploads.dir().join(filename)).unwrap();
        assert_eq!(stored, b"hello");
    }
}
