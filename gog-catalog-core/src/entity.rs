use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::slug::slugify;

/// A record as returned by the host store. Only the fields this job reads.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EntityRecord {
    pub id: u64,
    pub name: String,
    #[serde(default)]
    pub slug: String,
}

/// Pagination block attached to every `find` response.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Pagination {
    #[serde(default)]
    pub page: u32,
    #[serde(default)]
    pub page_size: u32,
    #[serde(default)]
    pub page_count: u32,
    #[serde(default)]
    pub total: u32,
}

/// Result of a `find` query: matching records plus pagination.
#[derive(Debug, Clone, Default)]
pub struct FindResult {
    pub results: Vec<EntityRecord>,
    pub pagination: Pagination,
}

impl FindResult {
    /// First match, which is the record lookups by exact name care about.
    pub fn first(self) -> Option<EntityRecord> {
        self.results.into_iter().next()
    }
}

/// Query filter for `find`. Names are matched exactly (case-sensitive).
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct EntityFilter {
    pub name: Option<String>,
}

impl EntityFilter {
    pub fn name(name: impl Into<String>) -> Self {
        Self {
            name: Some(name.into()),
        }
    }

    pub fn matches(&self, record: &EntityRecord) -> bool {
        self.name.as_ref().is_none_or(|n| *n == record.name)
    }
}

/// Payload for a reference record (developer, publisher, category, platform).
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct NewReference {
    pub name: String,
    pub slug: String,
    pub published_at: DateTime<Utc>,
}

impl NewReference {
    /// Build a published reference record with a slug derived from `name`.
    pub fn new(name: &str) -> Self {
        Self {
            name: name.to_string(),
            slug: slugify(name),
            published_at: Utc::now(),
        }
    }
}

/// Payload for a game record. Relations are host record ids.
///
/// Detail-page fields are omitted from the payload when the detail fetch
/// failed, leaving the host defaults in place.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct NewGame {
    pub name: String,
    pub slug: String,
    pub price: f64,
    #[serde(rename = "release_date", skip_serializing_if = "Option::is_none")]
    pub release_date: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub rating: Option<String>,
    #[serde(rename = "short_description", skip_serializing_if = "Option::is_none")]
    pub short_description: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    pub categories: Vec<u64>,
    pub platforms: Vec<u64>,
    pub developers: Vec<u64>,
    pub publisher: Option<u64>,
    pub published_at: DateTime<Utc>,
}

/// Typed create payload, one variant per record shape.
#[derive(Debug, Clone, PartialEq)]
pub enum NewEntity {
    Reference(NewReference),
    Game(NewGame),
}

impl NewEntity {
    pub fn name(&self) -> &str {
        match self {
            Self::Reference(r) => &r.name,
            Self::Game(g) => &g.name,
        }
    }

    pub fn slug(&self) -> &str {
        match self {
            Self::Reference(r) => &r.slug,
            Self::Game(g) => &g.slug,
        }
    }

    /// JSON body for the host's `data` envelope.
    pub fn to_data(&self) -> serde_json::Value {
        let value = match self {
            Self::Reference(r) => serde_json::to_value(r),
            Self::Game(g) => serde_json::to_value(g),
        };
        // Both payloads are plain structs with string keys.
        value.unwrap_or(serde_json::Value::Null)
    }
}
