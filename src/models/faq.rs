//! FAQ entry model.

use serde::{Deserialize, Serialize};

use super::Publishable;

/// A question and its answer.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Default)]
#[serde(rename_all = "camelCase")]
pub struct FaqEntry {
    #[serde(default)]
    pub id: String,
    pub question: String,
    #[serde(default)]
    pub answer: String,
    #[serde(default)]
    pub created_at: String,
    #[serde(default)]
    pub published: bool,
}

impl Publishable for FaqEntry {
    fn is_published(&self) -> bool {
        self.published
    }
}
