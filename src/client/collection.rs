//! In-memory upsert/delete over a whole collection.

use chrono::Utc;
use serde::{de::DeserializeOwned, Serialize};
use serde_json::Value;

use crate::models::{FaqEntry, NewsItem, Section, SectionData, StaffMember, Vacancy};

/// Where newly created items land in their collection.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InsertPosition {
    /// Newest first
    Front,
    /// Insertion order
    Back,
}

/// An element of one of the id-keyed sections.
pub trait CollectionItem: Serialize + DeserializeOwned + Clone + Send {
    const SECTION: Section;
    const INSERT: InsertPosition;

    fn id(&self) -> &str;
    fn set_id(&mut self, id: String);

    /// Creation timestamp slot, for collections that carry one.
    fn created_at_mut(&mut self) -> Option<&mut String> {
        None
    }

    fn into_section(items: Vec<Self>) -> SectionData;
}

impl CollectionItem for NewsItem {
    const SECTION: Section = Section::News;
    const INSERT: InsertPosition = InsertPosition::Front;

    fn id(&self) -> &str {
        &self.id
    }

    fn set_id(&mut self, id: String) {
        self.id = id;
    }

    fn created_at_mut(&mut self) -> Option<&mut String> {
        Some(&mut self.created_at)
    }

    fn into_section(items: Vec<Self>) -> SectionData {
        SectionData::News(items)
    }
}

impl CollectionItem for StaffMember {
    const SECTION: Section = Section::Staff;
    const INSERT: InsertPosition = InsertPosition::Back;

    fn id(&self) -> &str {
        &self.id
    }

    fn set_id(&mut self, id: String) {
        self.id = id;
    }

    fn into_section(items: Vec<Self>) -> SectionData {
        SectionData::Staff(items)
    }
}

impl CollectionItem for Vacancy {
    const SECTION: Section = Section::Vacancies;
    const INSERT: InsertPosition = InsertPosition::Front;

    fn id(&self) -> &str {
        &self.id
    }

    fn set_id(&mut self, id: String) {
        self.id = id;
    }

    fn created_at_mut(&mut self) -> Option<&mut String> {
        Some(&mut self.created_at)
    }

    fn into_section(items: Vec<Self>) -> SectionData {
        SectionData::Vacancies(items)
    }
}

impl CollectionItem for FaqEntry {
    const SECTION: Section = Section::Faq;
    const INSERT: InsertPosition = InsertPosition::Front;

    fn id(&self) -> &str {
        &self.id
    }

    fn set_id(&mut self, id: String) {
        self.id = id;
    }

    fn created_at_mut(&mut self) -> Option<&mut String> {
        Some(&mut self.created_at)
    }

    fn into_section(items: Vec<Self>) -> SectionData {
        SectionData::Faq(items)
    }
}

/// Create or update `item` inside `items`, returning the stored element.
///
/// An empty id creates a new element with a fresh id. A known id merges the item's set
/// fields over the stored element; `id` and `createdAt` of the stored element never change.
pub fn upsert<T: CollectionItem>(items: &mut Vec<T>, mut item: T) -> Result<T, serde_json::Error> {
    if !item.id().is_empty() {
        if let Some(pos) = items.iter().position(|existing| existing.id() == item.id()) {
            let merged = shallow_merge(&items[pos], &item)?;
            items[pos] = merged.clone();
            return Ok(merged);
        }
    } else {
        item.set_id(uuid::Uuid::new_v4().to_string());
    }

    if let Some(created_at) = item.created_at_mut() {
        if created_at.is_empty() {
            *created_at = Utc::now().to_rfc3339();
        }
    }

    match T::INSERT {
        InsertPosition::Front => items.insert(0, item.clone()),
        InsertPosition::Back => items.push(item.clone()),
    }
    Ok(item)
}

/// Drop the element with `id`. Returns whether anything was removed.
pub fn remove<T: CollectionItem>(items: &mut Vec<T>, id: &str) -> bool {
    let before = items.len();
    items.retain(|item| item.id() != id);
    items.len() != before
}

fn shallow_merge<T: CollectionItem>(existing: &T, patch: &T) -> Result<T, serde_json::Error> {
    let mut base = serde_json::to_value(existing)?;
    let Value::Object(patch) = serde_json::to_value(patch)? else {
        return Ok(existing.clone());
    };

    if let Value::Object(base) = &mut base {
        for (key, value) in patch {
            if key == "id" || key == "createdAt" || value.is_null() {
                continue;
            }
            base.insert(key, value);
        }
    }

    serde_json::from_value(base)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::NewsCategory;

    fn news(title: &str) -> NewsItem {
        NewsItem {
            title: title.to_string(),
            content: "body".to_string(),
            category: NewsCategory::News,
            ..Default::default()
        }
    }

    fn staff(name: &str) -> StaffMember {
        StaffMember {
            name: name.to_string(),
            ..Default::default()
        }
    }

    #[test]
    fn test_create_assigns_id_and_timestamp() {
        let mut items = Vec::new();
        let stored = upsert(&mut items, news("A")).unwrap();

        assert!(!stored.id.is_empty());
        assert!(chrono::DateTime::parse_from_rfc3339(&stored.created_at).is_ok());
        assert_eq!(items, vec![stored]);
    }

    #[test]
    fn test_news_prepends_staff_appends() {
        let mut items = Vec::new();
        upsert(&mut items, news("A")).unwrap();
        upsert(&mut items, news("B")).unwrap();
        let titles: Vec<&str> = items.iter().map(|n| n.title.as_str()).collect();
        assert_eq!(titles, vec!["B", "A"]);

        let mut people = Vec::new();
        upsert(&mut people, staff("A")).unwrap();
        upsert(&mut people, staff("B")).unwrap();
        let names: Vec<&str> = people.iter().map(|s| s.name.as_str()).collect();
        assert_eq!(names, vec!["A", "B"]);
    }

    #[test]
    fn test_update_merges_in_place() {
        let mut people = Vec::new();
        let mut first = staff("Ana");
        first.email = Some("ana@example.org".to_string());
        let stored = upsert(&mut people, first).unwrap();
        upsert(&mut people, staff("Ben")).unwrap();

        let patch = StaffMember {
            id: stored.id.clone(),
            name: "Ana Maria".to_string(),
            position: "Director".to_string(),
            ..Default::default()
        };
        let updated = upsert(&mut people, patch).unwrap();

        assert_eq!(people.len(), 2);
        assert_eq!(people[0], updated);
        assert_eq!(updated.name, "Ana Maria");
        assert_eq!(updated.position, "Director");
        assert_eq!(updated.email.as_deref(), Some("ana@example.org"));
    }

    #[test]
    fn test_update_keeps_created_at() {
        let mut items = Vec::new();
        let stored = upsert(&mut items, news("A")).unwrap();

        let mut patch = news("A2");
        patch.id = stored.id.clone();
        patch.created_at = "1999-01-01T00:00:00+00:00".to_string();
        let updated = upsert(&mut items, patch).unwrap();

        assert_eq!(updated.created_at, stored.created_at);
        assert_eq!(updated.title, "A2");
        assert_eq!(items.len(), 1);
    }

    #[test]
    fn test_partial_update_overwrites_plain_fields() {
        let mut items = Vec::new();
        let mut first = news("Original");
        first.image_url = Some("/uploads/a.png".to_string());
        let stored = upsert(&mut items, first).unwrap();

        let patch = NewsItem {
            id: stored.id.clone(),
            published: true,
            ..Default::default()
        };
        let updated = upsert(&mut items, patch).unwrap();

        assert!(updated.published);
        assert_eq!(updated.title, "");
        assert_eq!(updated.content, "");
        assert_eq!(updated.image_url.as_deref(), Some("/uploads/a.png"));
        assert_eq!(updated.created_at, stored.created_at);
    }

    #[test]
    fn test_unknown_id_inserts_with_given_id() {
        let mut items = Vec::new();
        let mut item = news("Imported");
        item.id = "fixed-id".to_string();
        let stored = upsert(&mut items, item).unwrap();

        assert_eq!(stored.id, "fixed-id");
        assert!(!stored.created_at.is_empty());
    }

    #[test]
    fn test_remove_missing_id_is_noop() {
        let mut items = Vec::new();
        upsert(&mut items, news("A")).unwrap();
        let before = items.clone();

        assert!(!remove(&mut items, "nope"));
        assert_eq!(items, before);
    }
}
