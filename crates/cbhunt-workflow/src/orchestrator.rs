//! The workflow state machine.
//!
//! One [`Orchestrator`] owns the collection store and the session of the
//! current mission. A mission is split into [`Orchestrator::start_mission`],
//! which hands out a [`MissionTicket`], and
//! [`Orchestrator::complete_mission`], which applies the pipeline outcome
//! only while the ticket's generation is still current. Starting again or
//! resetting bumps the generation, so late results are dropped.

use cbhunt_core::{
    BrandSearchConfig, Case, Collection, CollectionKind, GroundingMetadata, IpProfile, MatchConfig,
    MatchRecommendation, MissionConfig, TrendItem,
};
use cbhunt_extract::{
    ExtractError, ExtractionPipeline, GenerativeService, MissionOutput, MissionResult,
};
use cbhunt_store::{duplicate_indices, CollectionStore, KeyValueStore};

use crate::error::WorkflowError;
use crate::phase::{permits, Action, Phase};
use crate::session::Session;

/// Proof that a mission was started; needed to complete it.
#[derive(Debug, Clone)]
pub struct MissionTicket {
    generation: u64,
    config: MissionConfig,
    instruction_override: Option<String>,
}

impl MissionTicket {
    #[must_use]
    pub fn config(&self) -> &MissionConfig {
        &self.config
    }

    #[must_use]
    pub fn instruction_override(&self) -> Option<&str> {
        self.instruction_override.as_deref()
    }

    #[must_use]
    pub fn generation(&self) -> u64 {
        self.generation
    }
}

/// What happened to a pipeline outcome handed to
/// [`Orchestrator::complete_mission`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Completion {
    Applied(Phase),
    /// A newer mission or a reset superseded this one; nothing changed.
    Stale,
}

pub struct Orchestrator<B> {
    store: CollectionStore<B>,
    session: Session,
    generation: u64,
}

impl<B: KeyValueStore> Orchestrator<B> {
    pub fn new(store: CollectionStore<B>) -> Self {
        Self {
            store,
            session: Session::idle(),
            generation: 0,
        }
    }

    #[must_use]
    pub fn phase(&self) -> Phase {
        self.session.phase
    }

    #[must_use]
    pub fn store(&self) -> &CollectionStore<B> {
        &self.store
    }

    /// Direct access for item-level edits that leave the session alone.
    pub fn store_mut(&mut self) -> &mut CollectionStore<B> {
        &mut self.store
    }

    #[must_use]
    pub fn review_cases(&self) -> &[Case] {
        &self.session.review_cases
    }

    #[must_use]
    pub fn trend_results(&self) -> &[TrendItem] {
        &self.session.trend_results
    }

    #[must_use]
    pub fn ip_profile(&self) -> Option<&IpProfile> {
        self.session.ip_profile.as_deref()
    }

    #[must_use]
    pub fn matches(&self) -> &[MatchRecommendation] {
        &self.session.matches
    }

    #[must_use]
    pub fn match_config(&self) -> Option<&MatchConfig> {
        self.session.match_config.as_ref()
    }

    #[must_use]
    pub fn trend_topic(&self) -> Option<&str> {
        self.session.trend_topic.as_deref()
    }

    #[must_use]
    pub fn metadata(&self) -> Option<&GroundingMetadata> {
        self.session.metadata.as_ref()
    }

    #[must_use]
    pub fn error(&self) -> Option<&str> {
        self.session.error.as_deref()
    }

    /// The collection shown in `CollectionDetail`.
    #[must_use]
    pub fn current_collection(&self) -> Option<&Collection> {
        self.session
            .viewing
            .as_deref()
            .and_then(|id| self.store.get(id))
    }

    /// True while leaving would lose work: a fetch in flight or an
    /// unconfirmed review.
    #[must_use]
    pub fn has_unsaved_work(&self) -> bool {
        matches!(self.session.phase, Phase::Fetching(_) | Phase::Reviewing)
            || self.session.has_pending_review()
    }

    /// For each review case, whether it probably duplicates a case already
    /// in the notebook the review would be confirmed into.
    #[must_use]
    pub fn review_duplicates(&self) -> Vec<bool> {
        let existing = self.review_target().map_or(&[][..], |c| c.cases.as_slice());
        let flagged = duplicate_indices(&self.session.review_cases, existing);
        (0..self.session.review_cases.len())
            .map(|i| flagged.contains(&i))
            .collect()
    }

    fn review_target(&self) -> Option<&Collection> {
        self.store
            .active()
            .filter(|c| c.kind == CollectionKind::Notebook)
            .or_else(|| {
                self.store
                    .collections()
                    .iter()
                    .find(|c| c.kind == CollectionKind::Notebook)
            })
    }

    fn ensure(&self, action: Action) -> Result<(), WorkflowError> {
        if permits(self.session.phase, action) {
            Ok(())
        } else {
            Err(WorkflowError::IllegalTransition {
                action,
                phase: self.session.phase,
            })
        }
    }

    /// Enters `Fetching` for `config` and returns the ticket the outcome
    /// must be completed with.
    ///
    /// # Errors
    ///
    /// Returns [`WorkflowError::Config`] for incomplete input,
    /// [`WorkflowError::ReviewPending`] while a review awaits confirmation,
    /// and [`WorkflowError::IllegalTransition`] from a results phase.
    pub fn start_mission(
        &mut self,
        config: MissionConfig,
        instruction_override: Option<String>,
    ) -> Result<MissionTicket, WorkflowError> {
        if self.session.has_pending_review() {
            return Err(WorkflowError::ReviewPending);
        }
        self.ensure(Action::StartMission)?;
        config.validate()?;
        Ok(self.enter_fetching(config, instruction_override))
    }

    /// Starts a brand case search for the trend at `index`, with the
    /// default deep-research keywords and platforms.
    ///
    /// # Errors
    ///
    /// Returns [`WorkflowError::IllegalTransition`] outside
    /// `TrendResultsReady` and [`WorkflowError::SelectionOutOfRange`] for a
    /// bad index.
    pub fn research_trend(&mut self, index: usize) -> Result<MissionTicket, WorkflowError> {
        self.ensure(Action::DeepResearch)?;
        let len = self.session.trend_results.len();
        let trend = self
            .session
            .trend_results
            .get(index)
            .ok_or(WorkflowError::SelectionOutOfRange { index, len })?;
        let config = MissionConfig::BrandSearch(BrandSearchConfig::deep_research(&trend.ip_name));
        config.validate()?;
        Ok(self.enter_fetching(config, None))
    }

    fn enter_fetching(
        &mut self,
        config: MissionConfig,
        instruction_override: Option<String>,
    ) -> MissionTicket {
        self.generation += 1;
        if let Phase::Fetching(previous) = self.session.phase {
            tracing::info!(superseded = %previous, "mission superseded by a newer start");
        }
        self.session = Session::fetching(&config);
        tracing::info!(kind = %config.kind(), generation = self.generation, "mission started");
        MissionTicket {
            generation: self.generation,
            config,
            instruction_override,
        }
    }

    /// Applies a pipeline outcome. Results for a superseded ticket are
    /// discarded without touching the session.
    ///
    /// # Errors
    ///
    /// Returns [`WorkflowError::MissionFailed`] after moving to `Error` when
    /// the current mission failed.
    pub fn complete_mission(
        &mut self,
        ticket: &MissionTicket,
        outcome: Result<MissionResult, ExtractError>,
    ) -> Result<Completion, WorkflowError> {
        let current = ticket.generation == self.generation
            && self.session.phase == Phase::Fetching(ticket.config.kind());
        if !current {
            tracing::info!(
                generation = ticket.generation,
                current = self.generation,
                "discarding stale mission result"
            );
            return Ok(Completion::Stale);
        }

        let result = match outcome {
            Ok(result) => result,
            Err(err) => {
                tracing::warn!(kind = %ticket.config.kind(), error = %err, "mission failed");
                let mut next = self.session.clone();
                next.phase = Phase::Error;
                next.error = Some(err.to_string());
                self.session = next;
                return Err(WorkflowError::MissionFailed(err));
            }
        };

        let mut next = self.session.clone();
        next.metadata = result.metadata;
        next.phase = match result.output {
            MissionOutput::Cases(cases) => {
                next.review_cases = cases;
                Phase::Reviewing
            }
            MissionOutput::Trends(trends) => {
                next.trend_results = trends;
                Phase::TrendResultsReady
            }
            MissionOutput::IpProfile(profile) => {
                next.ip_profile = Some(profile);
                Phase::IpProfileReady
            }
            MissionOutput::Matches(matches) => {
                next.matches = matches;
                Phase::MatchResultsReady
            }
        };
        let phase = next.phase;
        self.session = next;
        tracing::info!(kind = %ticket.config.kind(), phase = %phase, "mission completed");
        Ok(Completion::Applied(phase))
    }

    /// Starts `config`, runs it through `pipeline`, and applies the outcome.
    ///
    /// # Errors
    ///
    /// See [`Orchestrator::start_mission`] and
    /// [`Orchestrator::complete_mission`].
    pub async fn run_mission<S: GenerativeService>(
        &mut self,
        pipeline: &ExtractionPipeline<S>,
        config: MissionConfig,
        instruction_override: Option<String>,
    ) -> Result<Completion, WorkflowError> {
        let ticket = self.start_mission(config, instruction_override)?;
        self.run_ticket(pipeline, &ticket).await
    }

    /// Runs an already started mission through `pipeline`.
    ///
    /// # Errors
    ///
    /// See [`Orchestrator::complete_mission`].
    pub async fn run_ticket<S: GenerativeService>(
        &mut self,
        pipeline: &ExtractionPipeline<S>,
        ticket: &MissionTicket,
    ) -> Result<Completion, WorkflowError> {
        let outcome = pipeline
            .run_mission(ticket.config(), ticket.instruction_override())
            .await;
        self.complete_mission(ticket, outcome)
    }

    /// Commits the selected review cases (indices into
    /// [`Orchestrator::review_cases`]) to the target notebook, newest first,
    /// and shows that notebook. Returns its id.
    ///
    /// # Errors
    ///
    /// Returns [`WorkflowError::EmptySelection`],
    /// [`WorkflowError::SelectionOutOfRange`], or a store error; the review
    /// is kept on error.
    pub async fn confirm_review(&mut self, selected: &[usize]) -> Result<String, WorkflowError> {
        self.ensure(Action::ConfirmReview)?;
        let cases = pick(&self.session.review_cases, selected)?;
        let count = cases.len();

        let target = self.store.resolve_case_target().await?;
        self.store.append_cases(&target, cases).await?;

        let mut next = self.session.clone();
        next.review_cases.clear();
        next.metadata = None;
        next.phase = Phase::CollectionDetail;
        next.viewing = Some(target.clone());
        self.session = next;
        tracing::info!(collection = %target, count, "review confirmed");
        Ok(target)
    }

    /// Drops the review without committing anything.
    ///
    /// # Errors
    ///
    /// Returns [`WorkflowError::IllegalTransition`] outside `Reviewing`.
    pub fn discard_review(&mut self) -> Result<(), WorkflowError> {
        self.ensure(Action::DiscardReview)?;
        let mut next = self.session.clone();
        next.review_cases.clear();
        next.metadata = None;
        match self.store.active_id() {
            Some(id) => {
                next.phase = Phase::CollectionDetail;
                next.viewing = Some(id.to_string());
            }
            None => {
                next.phase = Phase::CollectionList;
                next.viewing = None;
            }
        }
        self.session = next;
        tracing::info!("review discarded");
        Ok(())
    }

    /// Saves the selected trends as a brand new report and shows it.
    /// Returns the report id.
    ///
    /// # Errors
    ///
    /// Returns [`WorkflowError::EmptySelection`],
    /// [`WorkflowError::SelectionOutOfRange`], or a store error.
    pub async fn save_selected_trends(
        &mut self,
        selected: &[usize],
    ) -> Result<String, WorkflowError> {
        self.ensure(Action::SaveTrends)?;
        let trends = pick(&self.session.trend_results, selected)?;
        let topic = self.session.trend_topic.clone().unwrap_or_default();
        let id = self.store.add_report(&topic, trends).await?;

        let mut next = self.session.clone();
        next.trend_results.clear();
        next.metadata = None;
        next.phase = Phase::CollectionDetail;
        next.viewing = Some(id.clone());
        self.session = next;
        Ok(id)
    }

    /// Back to `Idle` from anywhere, dropping every ephemeral result. An
    /// in-flight mission's result will be discarded when it arrives.
    pub fn reset(&mut self) {
        self.generation += 1;
        self.session = Session::idle();
        tracing::info!(generation = self.generation, "workflow reset");
    }

    /// # Errors
    ///
    /// Returns [`WorkflowError::IllegalTransition`] while fetching.
    pub fn open_collection_list(&mut self) -> Result<(), WorkflowError> {
        self.ensure(Action::OpenCollectionList)?;
        self.session.phase = Phase::CollectionList;
        self.session.viewing = None;
        Ok(())
    }

    /// Shows collection `id` and makes it active. A pending review survives
    /// and is returned to with [`Orchestrator::back`].
    ///
    /// # Errors
    ///
    /// Returns [`WorkflowError::IllegalTransition`] while fetching and a
    /// store error for an unknown id.
    pub async fn open_collection(&mut self, id: &str) -> Result<(), WorkflowError> {
        self.ensure(Action::OpenCollection)?;
        self.store.set_active(id).await?;
        self.session.phase = Phase::CollectionDetail;
        self.session.viewing = Some(id.to_string());
        Ok(())
    }

    /// From a collection view: to the pending review if there is one, else
    /// one level up (detail to list, list to idle).
    ///
    /// # Errors
    ///
    /// Returns [`WorkflowError::IllegalTransition`] outside the collection
    /// views.
    pub fn back(&mut self) -> Result<Phase, WorkflowError> {
        self.ensure(Action::Back)?;
        let phase = if self.session.has_pending_review() {
            Phase::Reviewing
        } else if self.session.phase == Phase::CollectionDetail {
            Phase::CollectionList
        } else {
            Phase::Idle
        };
        self.session.phase = phase;
        self.session.viewing = None;
        Ok(phase)
    }

    /// Creates a collection and shows it.
    ///
    /// # Errors
    ///
    /// Returns a store error if persisting fails.
    pub async fn create_collection(
        &mut self,
        kind: CollectionKind,
        name: Option<&str>,
    ) -> Result<String, WorkflowError> {
        let id = self.store.create(kind, name).await?;
        if !matches!(self.session.phase, Phase::Fetching(_)) {
            self.session.phase = Phase::CollectionDetail;
            self.session.viewing = Some(id.clone());
        }
        Ok(id)
    }

    /// # Errors
    ///
    /// Returns a store error for a blank name or an unknown id.
    pub async fn rename_collection(&mut self, id: &str, name: &str) -> Result<(), WorkflowError> {
        Ok(self.store.rename(id, name).await?)
    }

    /// Deletes a collection; the view falls back to the list if it was the
    /// one shown.
    ///
    /// # Errors
    ///
    /// Returns [`cbhunt_store::StoreError::LastCollection`] (wrapped) when
    /// only one collection is left, leaving everything unchanged.
    pub async fn delete_collection(&mut self, id: &str) -> Result<(), WorkflowError> {
        self.store.delete(id).await?;
        if self.session.viewing.as_deref() == Some(id) {
            self.session.viewing = None;
            self.session.phase = Phase::CollectionList;
        }
        Ok(())
    }
}

/// Clones the selected items in list order, ignoring repeated indices.
fn pick<T: Clone>(items: &[T], selected: &[usize]) -> Result<Vec<T>, WorkflowError> {
    if selected.is_empty() {
        return Err(WorkflowError::EmptySelection);
    }
    let len = items.len();
    if let Some(&index) = selected.iter().find(|&&i| i >= len) {
        return Err(WorkflowError::SelectionOutOfRange { index, len });
    }
    Ok(items
        .iter()
        .enumerate()
        .filter(|(i, _)| selected.contains(i))
        .map(|(_, item)| item.clone())
        .collect())
}

#[cfg(test)]
#[path = "orchestrator_test.rs"]
mod tests;
