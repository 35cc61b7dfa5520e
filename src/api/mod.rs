//! REST API module.
//!
//! Section reads, whole-section saves, document restore and uploads.

mod data;
mod save;
mod upload;

pub use data::*;
pub use save::*;
pub use upload::*;

use axum::extract::FromRequest;
use serde::Serialize;

use crate::errors::AppError;

/// JSON body extractor whose rejections use the error envelope.
#[derive(FromRequest)]
#[from_request(via(axum::Json), rejection(AppError))]
pub struct ApiJson<T>(pub T);

/// Acknowledgement body for mutating endpoints.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MutationResponse {
    pub success: bool,
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub revision: Option<u64>,
}

impl MutationResponse {
    pub fn ok(message: impl Into<String>, revision: Option<u64>) -> Self {
        Self {
            success: true,
            message: message.into(),
            revision,
        }
    }
}
