//! Analyzed entry and its content-derived identity

use chrono::{DateTime, Utc};
use serde::Serialize;

use crate::analysis::{analyze, content_hash, Properties};

/// Content-addressed identifier: lowercase hex SHA-256 of the original text
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, PartialOrd, Ord)]
#[serde(transparent)]
pub struct EntryId(String);

impl EntryId {
    /// Derive the id of a piece of text
    pub fn from_content(content: &str) -> Self {
        Self(content_hash(content))
    }

    /// Wrap an id received from a caller
    pub fn from_string(s: String) -> Self {
        Self(s)
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for EntryId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// An analyzed string. Never mutated after construction.
#[derive(Debug, Clone, Serialize)]
pub struct AnalyzedEntry {
    /// Unique identifier, equal to `properties.content_hash`
    pub id: EntryId,

    /// The text exactly as submitted
    #[serde(rename = "value")]
    pub original_value: String,

    /// Computed structural facts
    pub properties: Properties,

    /// When this entry was inserted; stamped by the store
    pub created_at: DateTime<Utc>,
}

impl AnalyzedEntry {
    /// Analyze `value`. The store replaces `created_at` on insertion.
    pub fn new(value: impl Into<String>) -> Self {
        let original_value = value.into();
        let properties = analyze(&original_value);
        Self {
            id: EntryId::from_string(properties.content_hash.clone()),
            original_value,
            properties,
            created_at: Utc::now(),
        }
    }

    /// Override the creation timestamp
    pub fn with_created_at(mut self, created_at: DateTime<Utc>) -> Self {
        self.created_at = created_at;
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn test_entry_creation() {
        let entry = AnalyzedEntry::new("madam");
        assert_eq!(entry.original_value, "madam");
        assert_eq!(entry.id.as_str(), entry.properties.content_hash);
        assert!(entry.properties.is_palindrome);
    }

    #[test]
    fn test_entry_id_from_content() {
        let id1 = EntryId::from_content("hello world");
        let id2 = EntryId::from_content("hello world");
        let id3 = EntryId::from_content("different content");

        assert_eq!(id1, id2);
        assert_ne!(id1, id3);
        assert_eq!(AnalyzedEntry::new("hello world").id, id1);
    }

    #[test]
    fn test_entry_serialization_contract() {
        let created = Utc.with_ymd_and_hms(2025, 1, 2, 3, 4, 5).unwrap();
        let entry = AnalyzedEntry::new("Level").with_created_at(created);
        let json = serde_json::to_value(&entry).unwrap();

        assert_eq!(json["id"], entry.id.as_str());
        assert_eq!(json["value"], "Level");
        assert_eq!(json["properties"]["sha256_hash"], entry.id.as_str());
        assert_eq!(json["properties"]["character_frequency_map"]["l"], 2);
        assert_eq!(json["created_at"], "2025-01-02T03:04:05Z");
    }
}
