//! Document store for the site content.
//!
//! A single JSON file is the source of truth. One background task owns it and applies
//! commands in arrival order, so every read-modify-write on the server is serialized.

mod file;
mod uploads;

pub use file::*;
pub use uploads::*;

use std::path::PathBuf;

use tokio::sync::{mpsc, oneshot};

use crate::errors::AppError;
use crate::models::{Document, Revisions, Section, SectionData};

const COMMAND_BUFFER: usize = 64;

enum Command {
    ReadDocument {
        reply: oneshot::Sender<Result<Document, AppError>>,
    },
    WriteSection {
        data: SectionData,
        expected_revision: Option<u64>,
        reply: oneshot::Sender<Result<u64, AppError>>,
    },
    Restore {
        document: Document,
        reply: oneshot::Sender<Result<Revisions, AppError>>,
    },
    Revisions {
        reply: oneshot::Sender<Revisions>,
    },
}

/// Handle to the document actor. Cheap to clone; the actor exits when the last handle drops.
#[derive(Clone)]
pub struct DocumentStore {
    tx: mpsc::Sender<Command>,
}

impl DocumentStore {
    /// Spawn the actor owning the document at `path`.
    pub fn spawn(path: impl Into<PathBuf>) -> Self {
        let (tx, rx) = mpsc::channel(COMMAND_BUFFER);
        let file = DocumentFile::new(path);
        tokio::spawn(run(file, rx));
        Self { tx }
    }

    /// Read the whole document.
    pub async fn read_document(&self) -> Result<Document, AppError> {
        let (reply, rx) = oneshot::channel();
        self.send(Command::ReadDocument { reply }).await?;
        rx.await.map_err(|_| stopped())?
    }

    /// Read one section of the document.
    pub async fn read_section(&self, section: Section) -> Result<SectionData, AppError> {
        Ok(self.read_document().await?.section(section))
    }

    /// Replace one section and persist the whole document. Returns the section's new revision.
    ///
    /// When `expected_revision` is given and differs from the current revision the write is
    /// rejected with [`AppError::Conflict`].
    pub async fn write_section(
        &self,
        data: SectionData,
        expected_revision: Option<u64>,
    ) -> Result<u64, AppError> {
        let (reply, rx) = oneshot::channel();
        self.send(Command::WriteSection {
            data,
            expected_revision,
            reply,
        })
        .await?;
        rx.await.map_err(|_| stopped())?
    }

    /// Replace the whole document.
    pub async fn restore_document(&self, document: Document) -> Result<Revisions, AppError> {
        let (reply, rx) = oneshot::channel();
        self.send(Command::Restore { document, reply }).await?;
        rx.await.map_err(|_| stopped())?
    }

    /// Current per-section revisions.
    pub async fn revisions(&self) -> Result<Revisions, AppError> {
        let (reply, rx) = oneshot::channel();
        self.send(Command::Revisions { reply }).await?;
        rx.await.map_err(|_| stopped())
    }

    async fn send(&self, command: Command) -> Result<(), AppError> {
        self.tx.send(command).await.map_err(|_| stopped())
    }
}

fn stopped() -> AppError {
    AppError::Internal("Document store is not running".to_string())
}

async fn run(file: DocumentFile, mut rx: mpsc::Receiver<Command>) {
    let mut revisions = Revisions::default();

    while let Some(command) = rx.recv().await {
        match command {
            Command::ReadDocument { reply } => {
                let _ = reply.send(file.load().await);
            }
            Command::WriteSection {
                data,
                expected_revision,
                reply,
            } => {
                let result = write_section(&file, &mut revisions, data, expected_revision).await;
                let _ = reply.send(result);
            }
            Command::Restore { document, reply } => {
                let result = match file.save(&document).await {
                    Ok(()) => {
                        for section in Section::ALL {
                            revisions.bump(section);
                        }
                        tracing::info!("Document restored");
                        Ok(revisions)
                    }
                    Err(e) => Err(e),
                };
                let _ = reply.send(result);
            }
            Command::Revisions { reply } => {
                let _ = reply.send(revisions);
            }
        }
    }

    tracing::debug!("Document store stopped");
}

async fn write_section(
    file: &DocumentFile,
    revisions: &mut Revisions,
    data: SectionData,
    expected_revision: Option<u64>,
) -> Result<u64, AppError> {
    let section = data.section();
    let current = revisions.get(section);

    if let Some(expected) = expected_revision {
        if expected != current {
            return Err(AppError::Conflict {
                message: format!(
                    "Revision mismatch for {}: expected {}, current {}",
                    section, expected, current
                ),
                current_revision: current,
            });
        }
    }

    let mut document = file.load().await?;
    document.set_section(data);
    file.save(&document).await?;

    let revision = revisions.bump(section);
    tracing::info!("Saved section {} (revision {})", section, revision);
    Ok(revision)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{FaqEntry, GeneralInfo, NewsItem};
    use tempfile::TempDir;

    fn news(id: &str, title: &str) -> NewsItem {
        NewsItem {
            id: id.to_string(),
            title: title.to_string(),
            ..Default::default()
        }
    }

    #[tokio::test]
    async fn test_write_section_leaves_others_untouched() {
        let temp_dir = TempDir::new().unwrap();
        let store = DocumentStore::spawn(temp_dir.path().join("db.json"));

        let info = GeneralInfo {
            director_name: "Director".to_string(),
            ..Default::default()
        };
        store
            .write_section(SectionData::Info(info.clone()), None)
            .await
            .unwrap();
        store
            .write_section(SectionData::News(vec![news("n1", "First")]), None)
            .await
            .unwrap();

        let document = store.read_document().await.unwrap();
        assert_eq!(document.news, vec![news("n1", "First")]);
        assert_eq!(document.info, info);
        assert!(document.staff.is_empty());
        assert!(document.vacancies.is_empty());
    }

    #[tokio::test]
    async fn test_stale_revision_rejected() {
        let temp_dir = TempDir::new().unwrap();
        let store = DocumentStore::spawn(temp_dir.path().join("db.json"));

        let rev = store
            .write_section(SectionData::Faq(vec![]), Some(0))
            .await
            .unwrap();
        assert_eq!(rev, 1);

        let entry = FaqEntry {
            id: "f1".to_string(),
            question: "Q".to_string(),
            ..Default::default()
        };
        let result = store
            .write_section(SectionData::Faq(vec![entry]), Some(0))
            .await;
        match result {
            Err(AppError::Conflict {
                current_revision, ..
            }) => assert_eq!(current_revision, 1),
            other => panic!("expected conflict, got {:?}", other),
        }

        let document = store.read_document().await.unwrap();
        assert!(document.faq.is_empty());
    }

    #[tokio::test]
    async fn test_concurrent_writes_to_different_sections_both_land() {
        let temp_dir = TempDir::new().unwrap();
        let store = DocumentStore::spawn(temp_dir.path().join("db.json"));

        let a = store.clone();
        let b = store.clone();
        let (ra, rb) = tokio::join!(
            a.write_section(SectionData::News(vec![news("n1", "News")]), None),
            b.write_section(
                SectionData::Faq(vec![FaqEntry {
                    id: "f1".to_string(),
                    question: "Q".to_string(),
                    ..Default::default()
                }]),
                None
            ),
        );
        ra.unwrap();
        rb.unwrap();

        let document = store.read_document().await.unwrap();
        assert_eq!(document.news.len(), 1);
        assert_eq!(document.faq.len(), 1);
    }

    #[tokio::test]
    async fn test_restore_replaces_document_and_bumps_revisions() {
        let temp_dir = TempDir::new().unwrap();
        let store = DocumentStore::spawn(temp_dir.path().join("db.json"));

        store
            .write_section(SectionData::News(vec![news("old", "Old")]), None)
            .await
            .unwrap();

        let replacement = Document {
            news: vec![news("new", "New")],
            ..Default::default()
        };
        let revisions = store.restore_document(replacement.clone()).await.unwrap();

        assert_eq!(revisions.news, 2);
        assert_eq!(revisions.info, 1);
        assert_eq!(store.read_document().await.unwrap(), replacement);
    }

    #[tokio::test]
    async fn test_write_over_corrupt_file_recovers() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("db.json");
        std::fs::write(&path, "garbage").unwrap();
        let store = DocumentStore::spawn(&path);

        let section = store.read_section(Section::Staff).await.unwrap();
        assert_eq!(section, SectionData::Staff(vec![]));

        store
            .write_section(SectionData::News(vec![news("n1", "Fresh")]), None)
            .await
            .unwrap();

        let on_disk: Document =
            serde_json::from_str(&std::fs::read_to_string(&path).unwrap()).unwrap();
        assert_eq!(on_disk.news.len(), 1);
    }
}
