//! Typed storage client used by the admin pages.
//!
//! Every mutation fetches a whole section, edits it in memory and writes the whole section
//! back through `/api/save`. Failures are logged and absorbed into empty values or `false`.

mod collection;

pub use collection::*;

use once_cell::sync::Lazy;
use reqwest::multipart::{Form, Part};
use serde::Deserialize;
use serde_json::Value;
use tokio::sync::broadcast;

use crate::errors::ErrorResponse;
use crate::models::{
    published_only, Document, FaqEntry, GeneralInfo, NewsItem, Publishable, Revisions, Section,
    SectionData, StaffMember, Vacancy,
};

const EVENT_BUFFER: usize = 32;

/// Change notifications shared by every client built with [`StorageClient::new`].
static STORAGE_EVENTS: Lazy<broadcast::Sender<StorageEvent>> =
    Lazy::new(|| broadcast::channel(EVENT_BUFFER).0);

/// Emitted after a successful write so observers can re-fetch.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StorageEvent {
    pub section: Section,
}

/// Failure talking to the document store.
#[derive(Debug)]
pub enum ClientError {
    /// Transport or decoding failure
    Http(reqwest::Error),
    /// Local (de)serialization failure
    Json(serde_json::Error),
    /// The server answered with an error status
    Rejected {
        status: u16,
        code: String,
        message: String,
    },
}

impl ClientError {
    /// Whether the server rejected a save because the section changed underneath it.
    pub fn is_conflict(&self) -> bool {
        matches!(self, ClientError::Rejected { status: 409, .. })
    }
}

impl std::fmt::Display for ClientError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ClientError::Http(e) => write!(f, "HTTP error: {}", e),
            ClientError::Json(e) => write!(f, "JSON error: {}", e),
            ClientError::Rejected {
                status,
                code,
                message,
            } => write!(f, "{} {}: {}", status, code, message),
        }
    }
}

impl std::error::Error for ClientError {}

impl From<reqwest::Error> for ClientError {
    fn from(err: reqwest::Error) -> Self {
        ClientError::Http(err)
    }
}

impl From<serde_json::Error> for ClientError {
    fn from(err: serde_json::Error) -> Self {
        ClientError::Json(err)
    }
}

#[derive(Debug, Deserialize)]
struct SaveAck {
    #[serde(default)]
    revision: Option<u64>,
}

#[derive(Debug, Deserialize)]
struct UploadAck {
    url: String,
}

/// Client for the document store's HTTP API.
#[derive(Clone)]
pub struct StorageClient {
    http: reqwest::Client,
    base_url: String,
    events: broadcast::Sender<StorageEvent>,
}

impl StorageClient {
    /// `base_url` is the server origin, e.g. `http://localhost:3001`.
    pub fn new(base_url: impl Into<String>) -> Self {
        Self::with_client(reqwest::Client::new(), base_url)
    }

    pub fn with_client(http: reqwest::Client, base_url: impl Into<String>) -> Self {
        Self::with_events(http, base_url, STORAGE_EVENTS.clone())
    }

    /// Build a client that publishes to `events` instead of the process-wide channel.
    pub fn with_events(
        http: reqwest::Client,
        base_url: impl Into<String>,
        events: broadcast::Sender<StorageEvent>,
    ) -> Self {
        let base_url: String = base_url.into();
        Self {
            http,
            base_url: base_url.trim_end_matches('/').to_string(),
            events,
        }
    }

    /// Receive a [`StorageEvent`] for every successful write made by any client sharing this
    /// client's channel. Clients from [`new`](Self::new) and [`with_client`](Self::with_client)
    /// all share one process-wide channel.
    pub fn subscribe(&self) -> broadcast::Receiver<StorageEvent> {
        self.events.subscribe()
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    fn notify(&self, section: Section) {
        // No subscribers is fine.
        let _ = self.events.send(StorageEvent { section });
    }

    // ==================== GENERIC COLLECTION OPERATIONS ====================

    /// List a collection; empty on any failure.
    pub async fn list<T: CollectionItem>(&self) -> Vec<T> {
        match self.fetch::<Vec<T>>(T::SECTION).await {
            Ok(items) => items,
            Err(e) => {
                tracing::warn!("Failed to load {}: {}", T::SECTION, e);
                Vec::new()
            }
        }
    }

    /// List only the published items of a collection, newest first where applicable.
    pub async fn list_published<T: CollectionItem + Publishable>(&self) -> Vec<T> {
        published_only(self.list::<T>().await)
    }

    /// Create or update an item and write the collection back.
    ///
    /// An update is a shallow merge: only `None` options keep their stored value, every other
    /// field overwrites. Send the full item when updating.
    pub async fn save<T: CollectionItem>(&self, item: T) -> bool {
        match self.try_save(item, false).await {
            Ok(_) => true,
            Err(e) => {
                tracing::warn!("Failed to save {}: {}", T::SECTION, e);
                false
            }
        }
    }

    /// Like [`save`](Self::save) but rejected if the section changed since it was read.
    pub async fn save_section_checked<T: CollectionItem>(&self, item: T) -> Result<T, ClientError> {
        self.try_save(item, true).await
    }

    /// Remove an item by id. A missing id still counts as success.
    pub async fn delete<T: CollectionItem>(&self, id: &str) -> bool {
        match self.try_delete::<T>(id).await {
            Ok(()) => true,
            Err(e) => {
                tracing::warn!("Failed to delete from {}: {}", T::SECTION, e);
                false
            }
        }
    }

    async fn try_save<T: CollectionItem>(&self, item: T, checked: bool) -> Result<T, ClientError> {
        let expected_revision = if checked {
            Some(self.revisions().await?.get(T::SECTION))
        } else {
            None
        };

        let mut items = self.fetch::<Vec<T>>(T::SECTION).await?;
        let stored = upsert(&mut items, item)?;

        self.write_section(T::into_section(items), expected_revision)
            .await?;
        self.notify(T::SECTION);
        Ok(stored)
    }

    async fn try_delete<T: CollectionItem>(&self, id: &str) -> Result<(), ClientError> {
        let mut items = self.fetch::<Vec<T>>(T::SECTION).await?;
        if !remove(&mut items, id) {
            tracing::debug!("Nothing to delete for id {} in {}", id, T::SECTION);
            return Ok(());
        }

        self.write_section(T::into_section(items), None).await?;
        self.notify(T::SECTION);
        Ok(())
    }

    // ==================== PER-COLLECTION SHORTHANDS ====================

    pub async fn list_news(&self) -> Vec<NewsItem> {
        self.list().await
    }

    /// Create or update; an update must carry the full item (see [`save`](Self::save)).
    pub async fn save_news(&self, item: NewsItem) -> bool {
        self.save(item).await
    }

    pub async fn delete_news(&self, id: &str) -> bool {
        self.delete::<NewsItem>(id).await
    }

    pub async fn list_staff(&self) -> Vec<StaffMember> {
        self.list().await
    }

    /// Create or update; an update must carry the full item (see [`save`](Self::save)).
    pub async fn save_staff(&self, member: StaffMember) -> bool {
        self.save(member).await
    }

    pub async fn delete_staff(&self, id: &str) -> bool {
        self.delete::<StaffMember>(id).await
    }

    pub async fn list_vacancies(&self) -> Vec<Vacancy> {
        self.list().await
    }

    /// Create or update; an update must carry the full item (see [`save`](Self::save)).
    pub async fn save_vacancy(&self, vacancy: Vacancy) -> bool {
        self.save(vacancy).await
    }

    pub async fn delete_vacancy(&self, id: &str) -> bool {
        self.delete::<Vacancy>(id).await
    }

    pub async fn list_faq(&self) -> Vec<FaqEntry> {
        self.list().await
    }

    /// Create or update; an update must carry the full item (see [`save`](Self::save)).
    pub async fn save_faq(&self, entry: FaqEntry) -> bool {
        self.save(entry).await
    }

    pub async fn delete_faq(&self, id: &str) -> bool {
        self.delete::<FaqEntry>(id).await
    }

    // ==================== GENERAL INFO ====================

    /// The singleton info object; default on failure.
    pub async fn get_general_info(&self) -> GeneralInfo {
        match self.fetch::<GeneralInfo>(Section::Info).await {
            Ok(info) => info,
            Err(e) => {
                tracing::warn!("Failed to load general info: {}", e);
                GeneralInfo::default()
            }
        }
    }

    pub async fn save_general_info(&self, info: GeneralInfo) -> bool {
        match self.write_section(SectionData::Info(info), None).await {
            Ok(_) => {
                self.notify(Section::Info);
                true
            }
            Err(e) => {
                tracing::warn!("Failed to save general info: {}", e);
                false
            }
        }
    }

    // ==================== UPLOADS ====================

    /// Upload a file and return its URL, or `None` on failure.
    pub async fn upload_image(&self, bytes: Vec<u8>, file_name: &str) -> Option<String> {
        let form = Form::new().part("file", Part::bytes(bytes).file_name(file_name.to_string()));

        let result = async {
            let resp = self
                .http
                .post(self.url("/api/upload"))
                .multipart(form)
                .send()
                .await?;
            let resp = check_status(resp).await?;
            Ok::<_, ClientError>(resp.json::<UploadAck>().await?.url)
        }
        .await;

        match result {
            Ok(url) => Some(url),
            Err(e) => {
                tracing::warn!("Failed to upload {}: {}", file_name, e);
                None
            }
        }
    }

    // ==================== BACKUP / RESTORE ====================

    /// Serialize the whole document for backup; `None` if it could not be fetched.
    pub async fn export_data(&self) -> Option<String> {
        let result = async {
            let resp = self.http.get(self.url("/api/data")).send().await?;
            let document: Document = check_status(resp).await?.json().await?;
            Ok::<_, ClientError>(serde_json::to_string_pretty(&document)?)
        }
        .await;

        match result {
            Ok(serialized) => Some(serialized),
            Err(e) => {
                tracing::warn!("Failed to export data: {}", e);
                None
            }
        }
    }

    /// Restore a backup produced by [`export_data`](Self::export_data).
    pub async fn import_data(&self, serialized: &str) -> bool {
        let data: Value = match serde_json::from_str(serialized) {
            Ok(data) => data,
            Err(e) => {
                tracing::warn!("Backup is not valid JSON: {}", e);
                return false;
            }
        };

        let result = async {
            let resp = self
                .http
                .post(self.url("/api/restore"))
                .json(&serde_json::json!({ "data": data }))
                .send()
                .await?;
            check_status(resp).await?;
            Ok::<_, ClientError>(())
        }
        .await;

        match result {
            Ok(()) => {
                for section in Section::ALL {
                    self.notify(section);
                }
                true
            }
            Err(e) => {
                tracing::warn!("Failed to import data: {}", e);
                false
            }
        }
    }

    // ==================== TRANSPORT ====================

    /// Current per-section revisions.
    pub async fn revisions(&self) -> Result<Revisions, ClientError> {
        let resp = self.http.get(self.url("/api/revisions")).send().await?;
        Ok(check_status(resp).await?.json().await?)
    }

    async fn fetch<R: serde::de::DeserializeOwned>(&self, section: Section) -> Result<R, ClientError> {
        let resp = self
            .http
            .get(self.url(&format!("/api/{}", section)))
            .send()
            .await?;
        Ok(check_status(resp).await?.json().await?)
    }

    async fn write_section(
        &self,
        data: SectionData,
        expected_revision: Option<u64>,
    ) -> Result<Option<u64>, ClientError> {
        let mut body = serde_json::json!({
            "type": data.section().as_str(),
            "data": data,
        });
        if let Some(revision) = expected_revision {
            body["expectedRevision"] = revision.into();
        }

        let resp = self
            .http
            .post(self.url("/api/save"))
            .json(&body)
            .send()
            .await?;
        let ack: SaveAck = check_status(resp).await?.json().await?;
        Ok(ack.revision)
    }
}

async fn check_status(resp: reqwest::Response) -> Result<reqwest::Response, ClientError> {
    let status = resp.status();
    if status.is_success() {
        return Ok(resp);
    }

    let (code, message) = match resp.json::<ErrorResponse>().await {
        Ok(body) => (body.code, body.message),
        Err(_) => (String::new(), status.to_string()),
    };
    Err(ClientError::Rejected {
        status: status.as_u16(),
        code,
        message,
    })
}
