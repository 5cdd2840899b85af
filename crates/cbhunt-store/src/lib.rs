//! Persistence for notebooks and reports.
//!
//! [`CollectionStore`] owns the collection list and the active selection and
//! writes them as one versioned envelope to a [`KeyValueStore`] (SQLite in
//! production, memory in tests). Older envelopes and the legacy JSON file are
//! migrated on open. Exports and analytics are pure functions over a
//! [`cbhunt_core::Collection`].

pub mod analytics;
pub mod backend;
pub mod dedup;
pub mod envelope;
pub mod error;
pub mod export;
pub mod legacy_file;
pub mod sqlite;
pub mod store;

pub use analytics::{collection_stats, CollectionStats};
pub use backend::{KeyValueStore, LegacyStore, MemoryStore};
pub use dedup::{duplicate_indices, is_duplicate};
pub use envelope::{PersistedState, STORAGE_KEY};
pub use error::StoreError;
pub use export::{export, ExportFormat};
pub use legacy_file::LegacyFileStore;
pub use sqlite::SqliteStore;
pub use store::{CollectionStore, FALLBACK_NOTEBOOK_NAME};
