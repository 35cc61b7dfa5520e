//! Root document model and section addressing.

use std::collections::HashSet;

use serde::{de::DeserializeOwned, Deserialize, Serialize};
use serde_json::Value;

use super::{FaqEntry, GeneralInfo, NewsItem, StaffMember, Vacancy};
use crate::errors::AppError;

/// The persisted document. Every section defaults when absent so older files load cleanly.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Default)]
#[serde(default)]
pub struct Document {
    pub news: Vec<NewsItem>,
    pub staff: Vec<StaffMember>,
    pub vacancies: Vec<Vacancy>,
    pub faq: Vec<FaqEntry>,
    pub info: GeneralInfo,
}

/// Name of one of the five top-level sections.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "lowercase")]
pub enum Section {
    News,
    Staff,
    Vacancies,
    Faq,
    Info,
}

impl Section {
    pub const ALL: [Section; 5] = [
        Section::News,
        Section::Staff,
        Section::Vacancies,
        Section::Faq,
        Section::Info,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Section::News => "news",
            Section::Staff => "staff",
            Section::Vacancies => "vacancies",
            Section::Faq => "faq",
            Section::Info => "info",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "news" => Some(Section::News),
            "staff" => Some(Section::Staff),
            "vacancies" => Some(Section::Vacancies),
            "faq" => Some(Section::Faq),
            "info" => Some(Section::Info),
            _ => None,
        }
    }
}

impl std::fmt::Display for Section {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Typed contents of a single section.
#[derive(Debug, Clone, Serialize, PartialEq)]
#[serde(untagged)]
pub enum SectionData {
    News(Vec<NewsItem>),
    Staff(Vec<StaffMember>),
    Vacancies(Vec<Vacancy>),
    Faq(Vec<FaqEntry>),
    Info(GeneralInfo),
}

impl SectionData {
    /// Validate an untyped payload against the shape of `section`.
    ///
    /// Info must be a JSON object. Collections must be arrays of objects, each with a
    /// non-empty `id` unique within the collection.
    pub fn from_value(section: Section, value: Value) -> Result<Self, AppError> {
        Ok(match section {
            Section::News => SectionData::News(parse_collection(section, value)?),
            Section::Staff => SectionData::Staff(parse_collection(section, value)?),
            Section::Vacancies => SectionData::Vacancies(parse_collection(section, value)?),
            Section::Faq => SectionData::Faq(parse_collection(section, value)?),
            Section::Info => {
                if !value.is_object() {
                    return Err(AppError::Validation(
                        "info data must be a JSON object".to_string(),
                    ));
                }
                SectionData::Info(serde_json::from_value(value).map_err(|e| invalid(section, e))?)
            }
        })
    }

    pub fn section(&self) -> Section {
        match self {
            SectionData::News(_) => Section::News,
            SectionData::Staff(_) => Section::Staff,
            SectionData::Vacancies(_) => Section::Vacancies,
            SectionData::Faq(_) => Section::Faq,
            SectionData::Info(_) => Section::Info,
        }
    }
}

impl Document {
    /// Clone out one section.
    pub fn section(&self, section: Section) -> SectionData {
        match section {
            Section::News => SectionData::News(self.news.clone()),
            Section::Staff => SectionData::Staff(self.staff.clone()),
            Section::Vacancies => SectionData::Vacancies(self.vacancies.clone()),
            Section::Faq => SectionData::Faq(self.faq.clone()),
            Section::Info => SectionData::Info(self.info.clone()),
        }
    }

    /// Replace one section wholesale, leaving the others untouched.
    pub fn set_section(&mut self, data: SectionData) {
        match data {
            SectionData::News(items) => self.news = items,
            SectionData::Staff(items) => self.staff = items,
            SectionData::Vacancies(items) => self.vacancies = items,
            SectionData::Faq(items) => self.faq = items,
            SectionData::Info(info) => self.info = info,
        }
    }

    /// Validate a whole document, e.g. a backup being restored. Absent sections default.
    pub fn from_value(value: Value) -> Result<Self, AppError> {
        let Value::Object(mut sections) = value else {
            return Err(AppError::Validation(
                "Document must be a JSON object".to_string(),
            ));
        };

        let mut document = Document::default();
        for section in Section::ALL {
            if let Some(data) = sections.remove(section.as_str()) {
                document.set_section(SectionData::from_value(section, data)?);
            }
        }
        Ok(document)
    }
}

fn invalid(section: Section, err: serde_json::Error) -> AppError {
    AppError::Validation(format!("Invalid {} data: {}", section, err))
}

fn parse_collection<T: DeserializeOwned>(section: Section, value: Value) -> Result<Vec<T>, AppError> {
    let Value::Array(elements) = value else {
        return Err(AppError::Validation(format!(
            "{} data must be a JSON array",
            section
        )));
    };

    {
        let mut seen = HashSet::new();
        for (index, element) in elements.iter().enumerate() {
            let Value::Object(fields) = element else {
                return Err(AppError::Validation(format!(
                    "{} element {} must be a JSON object",
                    section, index
                )));
            };

            match fields.get("id").and_then(Value::as_str) {
                Some(id) if !id.is_empty() => {
                    if !seen.insert(id) {
                        return Err(AppError::Validation(format!(
                            "Duplicate id {} in {}",
                            id, section
                        )));
                    }
                }
                _ => {
                    return Err(AppError::Validation(format!(
                        "{} element {} has no id",
                        section, index
                    )));
                }
            }
        }
    }

    serde_json::from_value(Value::Array(elements)).map_err(|e| invalid(section, e))
}

/// Per-section write counters used for optimistic concurrency on saves.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
pub struct Revisions {
    pub news: u64,
    pub staff: u64,
    pub vacancies: u64,
    pub faq: u64,
    pub info: u64,
}

impl Revisions {
    pub fn get(&self, section: Section) -> u64 {
        match section {
            Section::News => self.news,
            Section::Staff => self.staff,
            Section::Vacancies => self.vacancies,
            Section::Faq => self.faq,
            Section::Info => self.info,
        }
    }

    /// Increment the counter for `section` and return the new value.
    pub fn bump(&mut self, section: Section) -> u64 {
        let slot = match section {
            Section::News => &mut self.news,
            Section::Staff => &mut self.staff,
            Section::Vacancies => &mut self.vacancies,
            Section::Faq => &mut self.faq,
            Section::Info => &mut self.info,
        };
        *slot += 1;
        *slot
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_missing_sections_are_backfilled() {
        let doc: Document = serde_json::from_value(json!({ "news": [] })).unwrap();
        assert!(doc.staff.is_empty());
        assert!(doc.faq.is_empty());
        assert_eq!(doc.info, GeneralInfo::default());

        let value = serde_json::to_value(&doc).unwrap();
        for section in Section::ALL {
            assert!(value.get(section.as_str()).is_some(), "missing {}", section);
        }
    }

    #[test]
    fn test_section_parse_round_trips_names() {
        for section in Section::ALL {
            assert_eq!(Section::parse(section.as_str()), Some(section));
        }
        assert_eq!(Section::parse("users"), None);
    }

    #[test]
    fn test_from_value_rejects_wrong_shape() {
        assert!(SectionData::from_value(Section::News, json!({ "title": "x" })).is_err());
        assert!(SectionData::from_value(Section::Info, json!([])).is_err());
        assert!(SectionData::from_value(Section::Info, json!(["Name", "Bio"])).is_err());
        assert!(SectionData::from_value(Section::News, json!([["n1", "Title"]])).is_err());
    }

    #[test]
    fn test_from_value_accepts_well_formed_collection() {
        let data = SectionData::from_value(
            Section::Staff,
            json!([{ "id": "s1", "name": "Ana" }, { "id": "s2", "name": "Ben" }]),
        )
        .unwrap();
        match data {
            SectionData::Staff(staff) => assert_eq!(staff.len(), 2),
            other => panic!("expected staff, got {:?}", other),
        }
    }

    #[test]
    fn test_from_value_rejects_missing_and_duplicate_ids() {
        let missing = SectionData::from_value(Section::Faq, json!([{ "question": "Q" }]));
        assert!(matches!(missing, Err(AppError::Validation(_))));

        let empty = SectionData::from_value(Section::Faq, json!([{ "id": "", "question": "Q" }]));
        assert!(matches!(empty, Err(AppError::Validation(_))));

        let duplicate = SectionData::from_value(
            Section::News,
            json!([{ "id": "dup", "title": "A" }, { "id": "dup", "title": "B" }]),
        );
        assert!(matches!(duplicate, Err(AppError::Validation(_))));
    }

    #[test]
    fn test_document_from_value_validates_each_section() {
        let document = Document::from_value(json!({ "staff": [{ "id": "s1", "name": "Ana" }] }))
            .unwrap();
        assert_eq!(document.staff.len(), 1);
        assert!(document.news.is_empty());

        assert!(Document::from_value(json!([])).is_err());
        assert!(Document::from_value(json!({ "info": [] })).is_err());
        assert!(Document::from_value(json!({ "faq": [{ "question": "no id" }] })).is_err());
    }

    #[test]
    fn test_set_section_isolated() {
        let mut doc = Document::default();
        doc.info.phone = "123".to_string();
        doc.set_section(SectionData::News(vec![NewsItem {
            id: "n1".to_string(),
            title: "Hello".to_string(),
            ..Default::default()
        }]));

        assert_eq!(doc.news.len(), 1);
        assert_eq!(doc.info.phone, "123");
        assert!(doc.staff.is_empty());
    }

    #[test]
    fn test_revision_bump_per_section() {
        let mut revisions = Revisions::default();
        assert_eq!(revisions.bump(Section::Faq), 1);
        assert_eq!(revisions.bump(Section::Faq), 2);
        assert_eq!(revisions.get(Section::News), 0);
    }
}
