//! The collection store: named notebooks and reports, persisted as one
//! versioned envelope.
//!
//! Every mutation clones the current state, applies the change to the
//! clone, persists it, and only then swaps it in. A failed write leaves the
//! in-memory state untouched.

use cbhunt_core::{Case, Collection, CollectionKind, TrendItem};

use crate::backend::{KeyValueStore, LegacyStore};
use crate::envelope::{encode_envelope, migrate_envelope, PersistedState, STORAGE_KEY};
use crate::error::StoreError;

/// Name of the notebook created when confirmed cases have nowhere to go.
pub const FALLBACK_NOTEBOOK_NAME: &str = "My Case Studies";

fn now_ms() -> i64 {
    chrono::Utc::now().timestamp_millis()
}

fn new_id() -> String {
    uuid::Uuid::new_v4().to_string()
}

pub struct CollectionStore<B> {
    backend: B,
    state: PersistedState,
}

impl<B: KeyValueStore> CollectionStore<B> {
    /// Loads the stored envelope, migrating it to the current version.
    ///
    /// When the primary medium holds nothing and `legacy` is given, the
    /// legacy copy is migrated, written to the primary medium, read back,
    /// and removed from the legacy medium only once the read-back matches.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::Corrupt`] for an unreadable envelope and any
    /// backend error raised while reading or writing.
    pub async fn open(backend: B, legacy: Option<&dyn LegacyStore>) -> Result<Self, StoreError> {
        let now = now_ms();

        if let Some(raw) = backend.get(STORAGE_KEY).await? {
            let state = migrate_envelope(&raw, now)?;
            let encoded = encode_envelope(&state)?;
            if encoded != raw {
                backend.set(STORAGE_KEY, &encoded).await?;
            }
            tracing::debug!(collections = state.collections.len(), "collections loaded");
            return Ok(Self { backend, state });
        }

        let legacy_raw = match legacy {
            Some(legacy) => legacy.load(STORAGE_KEY)?,
            None => None,
        };

        let Some(raw) = legacy_raw else {
            let state = PersistedState::initial(now);
            backend.set(STORAGE_KEY, &encode_envelope(&state)?).await?;
            tracing::info!("initialized empty collection store");
            return Ok(Self { backend, state });
        };

        let state = migrate_envelope(&raw, now)?;
        let encoded = encode_envelope(&state)?;
        backend.set(STORAGE_KEY, &encoded).await?;

        let confirmed = backend.get(STORAGE_KEY).await?.as_deref() == Some(encoded.as_str());
        if confirmed {
            if let Some(legacy) = legacy {
                legacy.discard(STORAGE_KEY)?;
            }
            tracing::info!(
                collections = state.collections.len(),
                "migrated collections from legacy storage"
            );
        } else {
            tracing::warn!("primary write could not be confirmed, keeping legacy copy");
        }

        Ok(Self { backend, state })
    }

    #[must_use]
    pub fn backend(&self) -> &B {
        &self.backend
    }

    #[must_use]
    pub fn collections(&self) -> &[Collection] {
        &self.state.collections
    }

    #[must_use]
    pub fn get(&self, id: &str) -> Option<&Collection> {
        self.state.collections.iter().find(|c| c.id == id)
    }

    #[must_use]
    pub fn active_id(&self) -> Option<&str> {
        self.state.active_collection_id.as_deref()
    }

    #[must_use]
    pub fn active(&self) -> Option<&Collection> {
        self.active_id().and_then(|id| self.get(id))
    }

    /// Creates an empty collection, makes it active, and returns its id.
    /// A blank `name` uses the kind's default name.
    ///
    /// # Errors
    ///
    /// Returns any backend error raised while persisting.
    pub async fn create(
        &mut self,
        kind: CollectionKind,
        name: Option<&str>,
    ) -> Result<String, StoreError> {
        let name = name
            .map(str::trim)
            .filter(|n| !n.is_empty())
            .unwrap_or(kind.default_name());
        let id = new_id();

        let mut next = self.state.clone();
        next.collections
            .push(Collection::new(id.clone(), kind, name.to_string(), now_ms()));
        next.active_collection_id = Some(id.clone());
        self.commit(next).await?;

        tracing::info!(id = %id, kind = %kind, "collection created");
        Ok(id)
    }

    /// # Errors
    ///
    /// Returns [`StoreError::EmptyName`] for a blank name and
    /// [`StoreError::NotFound`] for an unknown id.
    pub async fn rename(&mut self, id: &str, name: &str) -> Result<(), StoreError> {
        let name = name.trim();
        if name.is_empty() {
            return Err(StoreError::EmptyName);
        }
        self.mutate(id, |collection| {
            collection.name = name.to_string();
            Ok(())
        })
        .await
    }

    /// Deletes a collection. The last remaining collection cannot be
    /// deleted. If the active collection is deleted the first remaining one
    /// becomes active.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::LastCollection`] when only one collection is
    /// left and [`StoreError::NotFound`] for an unknown id.
    pub async fn delete(&mut self, id: &str) -> Result<(), StoreError> {
        if self.state.collections.len() <= 1 {
            return Err(StoreError::LastCollection);
        }
        if self.get(id).is_none() {
            return Err(StoreError::NotFound(id.to_string()));
        }

        let mut next = self.state.clone();
        next.collections.retain(|c| c.id != id);
        if next.active_collection_id.as_deref() == Some(id) {
            next.active_collection_id = next.collections.first().map(|c| c.id.clone());
        }
        self.commit(next).await?;
        tracing::info!(id, "collection deleted");
        Ok(())
    }

    /// # Errors
    ///
    /// Returns [`StoreError::NotFound`] for an unknown id.
    pub async fn set_active(&mut self, id: &str) -> Result<(), StoreError> {
        if self.get(id).is_none() {
            return Err(StoreError::NotFound(id.to_string()));
        }
        if self.active_id() == Some(id) {
            return Ok(());
        }
        let mut next = self.state.clone();
        next.active_collection_id = Some(id.to_string());
        self.commit(next).await
    }

    /// Replaces the notebook's case list wholesale with `cases`.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::NotFound`] or [`StoreError::WrongKind`].
    pub async fn reorder_cases(&mut self, id: &str, cases: Vec<Case>) -> Result<(), StoreError> {
        self.mutate_notebook(id, |collection| {
            collection.cases = cases;
            Ok(())
        })
        .await
    }

    /// Prepends `cases` to the notebook so the newest findings come first.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::NotFound`] or [`StoreError::WrongKind`].
    pub async fn append_cases(&mut self, id: &str, cases: Vec<Case>) -> Result<(), StoreError> {
        let added = cases.len();
        self.mutate_notebook(id, |collection| {
            let mut combined = cases;
            combined.append(&mut collection.cases);
            collection.cases = combined;
            Ok(())
        })
        .await?;
        tracing::info!(id, added, "cases added to notebook");
        Ok(())
    }

    /// Prepends one hand-entered case.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::NotFound`] or [`StoreError::WrongKind`].
    pub async fn add_manual_case(&mut self, id: &str, case: Case) -> Result<(), StoreError> {
        self.append_cases(id, vec![case]).await
    }

    /// Replaces the case at `index`.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::NotFound`], [`StoreError::WrongKind`] or
    /// [`StoreError::IndexOutOfRange`].
    pub async fn update_case(&mut self, id: &str, index: usize, case: Case) -> Result<(), StoreError> {
        self.mutate_notebook(id, |collection| {
            let len = collection.cases.len();
            let slot = collection
                .cases
                .get_mut(index)
                .ok_or(StoreError::IndexOutOfRange { index, len })?;
            *slot = case;
            Ok(())
        })
        .await
    }

    /// # Errors
    ///
    /// Returns [`StoreError::NotFound`] or [`StoreError::IndexOutOfRange`].
    pub async fn delete_case(&mut self, id: &str, index: usize) -> Result<Case, StoreError> {
        let mut removed = None;
        self.mutate(id, |collection| {
            removed = Some(remove_at(&mut collection.cases, index)?);
            Ok(())
        })
        .await?;
        removed.ok_or(StoreError::IndexOutOfRange { index, len: 0 })
    }

    /// # Errors
    ///
    /// Returns [`StoreError::NotFound`] or [`StoreError::IndexOutOfRange`].
    pub async fn delete_trend(&mut self, id: &str, index: usize) -> Result<TrendItem, StoreError> {
        let mut removed = None;
        self.mutate(id, |collection| {
            removed = Some(remove_at(&mut collection.trends, index)?);
            Ok(())
        })
        .await?;
        removed.ok_or(StoreError::IndexOutOfRange { index, len: 0 })
    }

    /// Saves `trends` as a new report named after `topic`, makes it active,
    /// and returns its id.
    ///
    /// # Errors
    ///
    /// Returns any backend error raised while persisting.
    pub async fn add_report(&mut self, topic: &str, trends: Vec<TrendItem>) -> Result<String, StoreError> {
        let id = new_id();
        let mut report = Collection::new(
            id.clone(),
            CollectionKind::Report,
            format!("Report: {}", topic.trim()),
            now_ms(),
        );
        let saved = trends.len();
        report.trends = trends;

        let mut next = self.state.clone();
        next.collections.push(report);
        next.active_collection_id = Some(id.clone());
        self.commit(next).await?;

        tracing::info!(id = %id, saved, "trend report created");
        Ok(id)
    }

    /// Picks the notebook confirmed review cases go into: the active
    /// collection if it is a notebook, else the first notebook, else a new
    /// notebook created for the purpose. The target becomes active.
    ///
    /// # Errors
    ///
    /// Returns any backend error raised while persisting.
    pub async fn resolve_case_target(&mut self) -> Result<String, StoreError> {
        let active_notebook = self
            .active()
            .filter(|c| c.kind == CollectionKind::Notebook)
            .map(|c| c.id.clone());
        if let Some(id) = active_notebook {
            return Ok(id);
        }

        let first_notebook = self
            .state
            .collections
            .iter()
            .find(|c| c.kind == CollectionKind::Notebook)
            .map(|c| c.id.clone());
        if let Some(id) = first_notebook {
            self.set_active(&id).await?;
            return Ok(id);
        }

        self.create(CollectionKind::Notebook, Some(FALLBACK_NOTEBOOK_NAME))
            .await
    }

    async fn mutate_notebook<F>(&mut self, id: &str, change: F) -> Result<(), StoreError>
    where
        F: FnOnce(&mut Collection) -> Result<(), StoreError>,
    {
        self.mutate(id, |collection| {
            if collection.kind != CollectionKind::Notebook {
                return Err(StoreError::WrongKind {
                    id: collection.id.clone(),
                    expected: CollectionKind::Notebook,
                    actual: collection.kind,
                });
            }
            change(collection)
        })
        .await
    }

    async fn mutate<F>(&mut self, id: &str, change: F) -> Result<(), StoreError>
    where
        F: FnOnce(&mut Collection) -> Result<(), StoreError>,
    {
        let mut next = self.state.clone();
        let collection = next
            .collections
            .iter_mut()
            .find(|c| c.id == id)
            .ok_or_else(|| StoreError::NotFound(id.to_string()))?;
        change(collection)?;
        collection.touch(now_ms());
        self.commit(next).await
    }

    async fn commit(&mut self, next: PersistedState) -> Result<(), StoreError> {
        self.backend
            .set(STORAGE_KEY, &encode_envelope(&next)?)
            .await?;
        self.state = next;
        Ok(())
    }
}

fn remove_at<T>(items: &mut Vec<T>, index: usize) -> Result<T, StoreError> {
    if index >= items.len() {
        return Err(StoreError::IndexOutOfRange {
            index,
            len: items.len(),
        });
    }
    Ok(items.remove(index))
}

#[cfg(test)]
#[path = "store_test.rs"]
mod tests;
