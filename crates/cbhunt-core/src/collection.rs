use serde::{Deserialize, Serialize};

use crate::case::Case;
use crate::trend::TrendItem;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CollectionKind {
    /// Holds cases.
    #[default]
    Notebook,
    /// Holds trends.
    Report,
}

impl CollectionKind {
    /// Name given to a collection created by an explicit "new collection"
    /// action.
    #[must_use]
    pub fn default_name(self) -> &'static str {
        match self {
            CollectionKind::Notebook => "New Case Notebook",
            CollectionKind::Report => "New Trend Report",
        }
    }
}

impl std::fmt::Display for CollectionKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            CollectionKind::Notebook => write!(f, "notebook"),
            CollectionKind::Report => write!(f, "report"),
        }
    }
}

/// A named, user-curated collection. The persisted record shape.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Collection {
    pub id: String,
    #[serde(rename = "type")]
    pub kind: CollectionKind,
    pub name: String,
    pub cases: Vec<Case>,
    #[serde(default)]
    pub trends: Vec<TrendItem>,
    /// Milliseconds since the Unix epoch.
    pub created_at: i64,
    /// Milliseconds since the Unix epoch.
    pub updated_at: i64,
}

impl Collection {
    #[must_use]
    pub fn new(id: String, kind: CollectionKind, name: String, now_ms: i64) -> Self {
        Self {
            id,
            kind,
            name,
            cases: Vec::new(),
            trends: Vec::new(),
            created_at: now_ms,
            updated_at: now_ms,
        }
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.cases.is_empty() && self.trends.is_empty()
    }

    /// Marks the collection modified. `updated_at` always strictly increases,
    /// even when two edits land within the same millisecond.
    pub fn touch(&mut self, now_ms: i64) {
        self.updated_at = now_ms.max(self.updated_at.saturating_add(1));
    }
}
