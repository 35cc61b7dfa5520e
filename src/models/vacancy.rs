//! Vacancy model.

use serde::{Deserialize, Serialize};

use super::Publishable;

/// An open position advertised on the site.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Default)]
#[serde(rename_all = "camelCase")]
pub struct Vacancy {
    #[serde(default)]
    pub id: String,
    pub title: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub salary: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub requirements: Option<String>,
    #[serde(default)]
    pub created_at: String,
    #[serde(default)]
    pub published: bool,
}

impl Publishable for Vacancy {
    fn is_published(&self) -> bool {
        self.published
    }
}
