//! News item model.

use serde::{Deserialize, Serialize};

use super::Publishable;

/// Kind of news entry shown on the public site.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "snake_case")]
pub enum NewsCategory {
    #[default]
    News,
    PressRelease,
    Announcement,
}

impl NewsCategory {
    pub fn as_str(&self) -> &'static str {
        match self {
            NewsCategory::News => "news",
            NewsCategory::PressRelease => "press_release",
            NewsCategory::Announcement => "announcement",
        }
    }
}

/// A news article, press release or announcement.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Default)]
#[serde(rename_all = "camelCase")]
pub struct NewsItem {
    #[serde(default)]
    pub id: String,
    pub title: String,
    #[serde(default)]
    pub content: String,
    #[serde(default)]
    pub category: NewsCategory,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub image_url: Option<String>,
    #[serde(default)]
    pub created_at: String,
    #[serde(default)]
    pub published: bool,
}

impl Publishable for NewsItem {
    fn is_published(&self) -> bool {
        self.published
    }
}
