//! Versioned persistence envelope and the load-time migration.
//!
//! Every load runs [`migrate_envelope`], which upgrades whatever was stored
//! (including the original `notebooks` layout) into the current shape one
//! field at a time. A bad record or field degrades to its default; only a
//! top-level value that is not an envelope at all fails the load.

use cbhunt_core::{Case, Collection, CollectionKind, Right, TrendItem};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::error::StoreError;

/// Namespace key the envelope is stored under in every medium. Matches the
/// key earlier releases wrote, so their dumps are found on first open.
pub const STORAGE_KEY: &str = "cb-hunter-storage";
pub const ENVELOPE_VERSION: u32 = 1;

pub const DEFAULT_COLLECTION_ID: &str = "default";
pub const DEFAULT_COLLECTION_NAME: &str = "My First Notebook";

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PersistedState {
    pub collections: Vec<Collection>,
    pub active_collection_id: Option<String>,
}

impl PersistedState {
    /// The state of a first run: one empty notebook, active.
    #[must_use]
    pub fn initial(now_ms: i64) -> Self {
        let mut state = Self::default();
        state.ensure_default(now_ms);
        state
    }

    /// Guarantees at least one collection and an active id that resolves.
    pub fn ensure_default(&mut self, now_ms: i64) {
        if self.collections.is_empty() {
            self.collections.push(Collection::new(
                DEFAULT_COLLECTION_ID.to_string(),
                CollectionKind::Notebook,
                DEFAULT_COLLECTION_NAME.to_string(),
                now_ms,
            ));
        }
        let active_resolves = self
            .active_collection_id
            .as_deref()
            .is_some_and(|id| self.collections.iter().any(|c| c.id == id));
        if !active_resolves {
            self.active_collection_id = self.collections.first().map(|c| c.id.clone());
        }
    }
}

#[derive(Serialize)]
struct EnvelopeRef<'a> {
    state: &'a PersistedState,
    version: u32,
}

/// Serializes `state` inside the current envelope.
///
/// # Errors
///
/// Returns [`StoreError::Serialize`] if serialization fails.
pub fn encode_envelope(state: &PersistedState) -> Result<String, StoreError> {
    Ok(serde_json::to_string(&EnvelopeRef {
        state,
        version: ENVELOPE_VERSION,
    })?)
}

/// Parses and upgrades a stored envelope.
///
/// Idempotent: migrating the encoding of a migrated state yields the same
/// state.
///
/// # Errors
///
/// Returns [`StoreError::Corrupt`] if `raw` is not JSON or holds no
/// recognizable state object.
pub fn migrate_envelope(raw: &str, now_ms: i64) -> Result<PersistedState, StoreError> {
    let root: Value =
        serde_json::from_str(raw).map_err(|e| StoreError::Corrupt(e.to_string()))?;
    let Value::Object(mut root) = root else {
        return Err(StoreError::Corrupt("envelope is not an object".to_string()));
    };

    let version = root.get("version").and_then(Value::as_u64).unwrap_or(0);
    let state = match root.remove("state") {
        Some(Value::Object(state)) => state,
        // A bare state object without the envelope wrapper.
        _ if root.contains_key("collections") || root.contains_key("notebooks") => root,
        _ => return Err(StoreError::Corrupt("envelope has no state".to_string())),
    };

    let records = state
        .get("collections")
        .or_else(|| state.get("notebooks"))
        .and_then(Value::as_array)
        .cloned()
        .unwrap_or_default();

    let mut collections = Vec::with_capacity(records.len());
    for (index, record) in records.into_iter().enumerate() {
        match record {
            Value::Object(map) => collections.push(migrate_collection(map, now_ms)),
            other => tracing::warn!(index, found = %other, "skipping non-object collection record"),
        }
    }

    let active_collection_id = state
        .get("activeCollectionId")
        .or_else(|| state.get("activeNotebookId"))
        .and_then(id_string);

    if version < u64::from(ENVELOPE_VERSION) {
        tracing::info!(from = version, to = ENVELOPE_VERSION, "upgrading stored envelope");
    }

    let mut migrated = PersistedState {
        collections,
        active_collection_id,
    };
    migrated.ensure_default(now_ms);
    Ok(migrated)
}

fn id_string(value: &Value) -> Option<String> {
    match value {
        Value::String(s) if !s.trim().is_empty() => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        _ => None,
    }
}

fn migrate_collection(mut map: Map<String, Value>, now_ms: i64) -> Collection {
    let id = map
        .get("id")
        .and_then(id_string)
        .unwrap_or_else(|| uuid::Uuid::new_v4().to_string());

    let kind = match map.get("type").and_then(Value::as_str) {
        Some("report") => CollectionKind::Report,
        _ => CollectionKind::Notebook,
    };

    let name = map
        .get("name")
        .and_then(Value::as_str)
        .filter(|n| !n.trim().is_empty())
        .map_or_else(|| kind.default_name().to_string(), ToString::to_string);

    let created_at = map.get("createdAt").and_then(Value::as_i64).unwrap_or(now_ms);
    let updated_at = map
        .get("updatedAt")
        .and_then(Value::as_i64)
        .unwrap_or(created_at);

    let cases = take_array(&mut map, "cases")
        .into_iter()
        .enumerate()
        .filter_map(|(index, value)| migrate_case(value).or_else(|| {
            tracing::warn!(collection = %id, index, "skipping non-object case record");
            None
        }))
        .collect();

    let trends = take_array(&mut map, "trends")
        .into_iter()
        .enumerate()
        .filter_map(|(index, value)| migrate_trend(value).or_else(|| {
            tracing::warn!(collection = %id, index, "skipping non-object trend record");
            None
        }))
        .collect();

    Collection {
        id,
        kind,
        name,
        cases,
        trends,
        created_at,
        updated_at,
    }
}

fn take_array(map: &mut Map<String, Value>, key: &str) -> Vec<Value> {
    match map.remove(key) {
        Some(Value::Array(items)) => items,
        _ => Vec::new(),
    }
}

/// Reads a scalar field as text. Numbers and booleans are stringified;
/// anything else is dropped with a warning so the record still loads.
fn text_field(map: &Map<String, Value>, key: &str) -> Option<String> {
    match map.get(key)? {
        Value::Null => None,
        Value::String(s) => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        Value::Bool(b) => Some(b.to_string()),
        other => {
            tracing::warn!(field = key, found = %other, "defaulting unreadable field");
            None
        }
    }
}

/// Reads a list of strings. A lone string becomes a one-element list and
/// unreadable elements are skipped.
fn text_list(map: &Map<String, Value>, key: &str) -> Vec<String> {
    match map.get(key) {
        None | Some(Value::Null) => Vec::new(),
        Some(Value::String(s)) => vec![s.clone()],
        Some(Value::Array(items)) => items
            .iter()
            .filter_map(|item| match item {
                Value::String(s) => Some(s.clone()),
                Value::Number(n) => Some(n.to_string()),
                _ => None,
            })
            .collect(),
        Some(other) => {
            tracing::warn!(field = key, found = %other, "defaulting unreadable list");
            Vec::new()
        }
    }
}

/// Reads an enum-valued field; unknown values become `None`.
fn enum_field<T: serde::de::DeserializeOwned>(map: &Map<String, Value>, key: &str) -> Option<T> {
    let value = map.get(key).filter(|v| !v.is_null())?;
    serde_json::from_value(value.clone())
        .inspect_err(|_| tracing::warn!(field = key, found = %value, "dropping unknown value"))
        .ok()
}

fn migrate_right(value: &Value) -> Option<Right> {
    match value {
        Value::Object(map) => Some(Right {
            title: text_field(map, "title").unwrap_or_default(),
            description: text_field(map, "description").unwrap_or_default(),
        }),
        Value::String(title) => Some(Right {
            title: title.clone(),
            description: String::new(),
        }),
        _ => None,
    }
}

fn migrate_case(value: Value) -> Option<Case> {
    let Value::Object(map) = value else {
        return None;
    };
    let rights = match map.get("rights") {
        Some(Value::Array(items)) => items.iter().filter_map(migrate_right).collect(),
        _ => Vec::new(),
    };
    // Early records called the key visual `imageUrl`.
    let key_visual_url =
        text_field(&map, "keyVisualUrl").or_else(|| text_field(&map, "imageUrl"));

    Some(Case {
        project_name: text_field(&map, "projectName").unwrap_or_default(),
        brand_name: text_field(&map, "brandName").unwrap_or_default(),
        partner_intro: text_field(&map, "partnerIntro").unwrap_or_default(),
        product_name: text_field(&map, "productName").unwrap_or_default(),
        date: text_field(&map, "date").unwrap_or_default(),
        industry: text_field(&map, "industry"),
        visual_style: text_field(&map, "visualStyle"),
        campaign_slogan: text_field(&map, "campaignSlogan"),
        impact_result: text_field(&map, "impactResult"),
        key_visual_url,
        rights,
        insight: text_field(&map, "insight").unwrap_or_default(),
        platform_source: text_field(&map, "platformSource").unwrap_or_default(),
        source_urls: text_list(&map, "sourceUrls"),
    })
}

fn migrate_trend(value: Value) -> Option<TrendItem> {
    let Value::Object(map) = value else {
        return None;
    };
    Some(TrendItem {
        ip_name: text_field(&map, "ipName").unwrap_or_default(),
        category: text_field(&map, "category").unwrap_or_default(),
        reason: text_field(&map, "reason").unwrap_or_default(),
        target_audience: text_field(&map, "targetAudience").unwrap_or_default(),
        momentum: enum_field(&map, "momentum"),
        commercial_value: enum_field(&map, "commercialValue"),
        buzzwords: text_list(&map, "buzzwords"),
        // Older trend records stored compatibility as one sentence.
        compatibility: text_list(&map, "compatibility"),
    })
}

#[cfg(test)]
#[path = "envelope_test.rs"]
mod tests;
