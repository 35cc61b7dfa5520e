//! On-disk JSON document file.

use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use crate::errors::AppError;
use crate::models::Document;

/// The single JSON file holding the whole document.
pub struct DocumentFile {
    path: PathBuf,
}

impl DocumentFile {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Load the document, seeding the defaults when the file does not exist.
    ///
    /// A file that fails to parse yields the default document for this read only; it is
    /// left on disk untouched until the next write replaces it.
    pub async fn load(&self) -> Result<Document, AppError> {
        let content = match tokio::fs::read_to_string(&self.path).await {
            Ok(content) => content,
            Err(e) if e.kind() == ErrorKind::NotFound => {
                tracing::info!("Document file {:?} not found, seeding defaults", self.path);
                let document = Document::default();
                self.save(&document).await?;
                return Ok(document);
            }
            Err(e) => return Err(e.into()),
        };

        match serde_json::from_str(&content) {
            Ok(document) => Ok(document),
            Err(e) => {
                tracing::error!(
                    "Document file {:?} is corrupt, serving defaults: {}",
                    self.path,
                    e
                );
                Ok(Document::default())
            }
        }
    }

    /// Persist the whole document, pretty-printed.
    ///
    /// Writes a sibling temp file and renames it over the target so readers never see a
    /// partially written document.
    pub async fn save(&self, document: &Document) -> Result<(), AppError> {
        if let Some(parent) = self.path.parent() {
            if !parent.as_os_str().is_empty() {
                tokio::fs::create_dir_all(parent).await?;
            }
        }

        let content = serde_json::to_string_pretty(document)
            .map_err(|e| AppError::Internal(format!("Failed to serialize document: {}", e)))?;

        let tmp_path = self.path.with_extension("json.tmp");
        tokio::fs::write(&tmp_path, content).await?;
        tokio::fs::rename(&tmp_path, &self.path).await?;
        Ok(())
    }
}
