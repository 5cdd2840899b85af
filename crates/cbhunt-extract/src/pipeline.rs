//! Runs a query through the generative service and turns the reply into
//! validated domain values.

use cbhunt_core::{
    sort_cases_by_date_desc, Case, GroundingMetadata, IpProfile, MatchRecommendation,
    MissionConfig, TrendItem,
};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};

use crate::autocomplete::AutoCompleteResult;
use crate::deserialize::parse_payload;
use crate::error::ExtractError;
use crate::query::{
    autocomplete_query, build_query, idea_query, social_post_query, IdeaKind, MissionQuery,
};
use crate::retry::{retry_with_backoff, RetryPolicy};
use crate::service::GenerativeService;
use crate::validate::validate_as;

/// Validated result of one mission.
#[derive(Debug, Clone, PartialEq)]
pub enum MissionOutput {
    Cases(Vec<Case>),
    Trends(Vec<TrendItem>),
    IpProfile(Box<IpProfile>),
    Matches(Vec<MatchRecommendation>),
}

#[derive(Debug, Clone, PartialEq)]
pub struct MissionResult {
    pub output: MissionOutput,
    pub metadata: Option<GroundingMetadata>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SocialPost {
    pub title: String,
    pub content: String,
}

pub struct ExtractionPipeline<S> {
    service: S,
    retry: RetryPolicy,
}

impl<S: GenerativeService> ExtractionPipeline<S> {
    pub fn new(service: S, retry: RetryPolicy) -> Self {
        Self { service, retry }
    }

    /// The instruction text a mission would send, for preview and editing.
    ///
    /// # Errors
    ///
    /// Returns [`ExtractError::Config`] for an incomplete configuration.
    pub fn preview(&self, config: &MissionConfig) -> Result<String, ExtractError> {
        config.validate()?;
        Ok(build_query(config).instruction_text)
    }

    /// Runs a mission end to end: build, generate, recover, validate, and
    /// post-process. Cases come back newest first and IP collaboration
    /// history is sorted the same way.
    ///
    /// `instruction_override` replaces the built text verbatim.
    ///
    /// # Errors
    ///
    /// Returns [`ExtractError::Config`] without contacting the service when
    /// the configuration is incomplete, otherwise the last error once
    /// retries are exhausted.
    pub async fn run_mission(
        &self,
        config: &MissionConfig,
        instruction_override: Option<&str>,
    ) -> Result<MissionResult, ExtractError> {
        config.validate()?;

        let mut query = build_query(config);
        if let Some(text) = instruction_override {
            query = query.with_instruction(text);
        }

        tracing::info!(kind = %config.kind(), "running mission");

        let (output, metadata) = match config {
            MissionConfig::BrandSearch(_) => {
                let (mut cases, metadata) = self.extract::<Vec<Case>>(&query).await?;
                sort_cases_by_date_desc(&mut cases);
                (MissionOutput::Cases(cases), metadata)
            }
            MissionConfig::Trend(c) => {
                let (mut trends, metadata) = self.extract::<Vec<TrendItem>>(&query).await?;
                trends.truncate(usize::try_from(c.limit).unwrap_or(usize::MAX));
                (MissionOutput::Trends(trends), metadata)
            }
            MissionConfig::Scout(_) => {
                let (mut profile, metadata) = self.extract::<IpProfile>(&query).await?;
                profile.sort_collab_history();
                (MissionOutput::IpProfile(Box::new(profile)), metadata)
            }
            MissionConfig::Match(_) => {
                let (matches, metadata) =
                    self.extract::<Vec<MatchRecommendation>>(&query).await?;
                (MissionOutput::Matches(matches), metadata)
            }
        };

        Ok(MissionResult { output, metadata })
    }

    /// Suggests values for the empty or wrong fields of `current`.
    ///
    /// # Errors
    ///
    /// Returns the last error once retries are exhausted.
    pub async fn autocomplete_case(
        &self,
        keyword: &str,
        current: &Case,
    ) -> Result<AutoCompleteResult, ExtractError> {
        let query = autocomplete_query(keyword, current);
        let (result, _) = self.extract::<AutoCompleteResult>(&query).await?;
        Ok(result)
    }

    /// Brainstorms seed names. Single attempt; an unusable reply is an
    /// empty list.
    ///
    /// # Errors
    ///
    /// Returns transport errors from the service.
    pub async fn suggest_ideas(
        &self,
        kind: IdeaKind,
        seed: &str,
    ) -> Result<Vec<String>, ExtractError> {
        let query = idea_query(kind, seed);
        match self.attempt::<Vec<String>>(&query).await {
            Ok((ideas, _)) => Ok(ideas),
            Err(ExtractError::Validation(err)) => {
                tracing::warn!(error = %err, "idea list failed validation");
                Ok(Vec::new())
            }
            Err(err) => Err(err),
        }
    }

    /// Drafts a social post from a case write-up.
    ///
    /// # Errors
    ///
    /// Returns the last error once retries are exhausted.
    pub async fn draft_social_post(&self, case_markdown: &str) -> Result<SocialPost, ExtractError> {
        let query = social_post_query(case_markdown);
        let (post, _) = self.extract::<SocialPost>(&query).await?;
        Ok(post)
    }

    async fn extract<T: DeserializeOwned>(
        &self,
        query: &MissionQuery,
    ) -> Result<(T, Option<GroundingMetadata>), ExtractError> {
        retry_with_backoff(self.retry, move || self.attempt::<T>(query)).await
    }

    async fn attempt<T: DeserializeOwned>(
        &self,
        query: &MissionQuery,
    ) -> Result<(T, Option<GroundingMetadata>), ExtractError> {
        let response = self.service.generate(&query.to_request()).await?;
        let candidate = parse_payload(&response.text, query.payload_kind())?;
        let value = validate_as::<T>(candidate, &query.output_shape)?;
        Ok((value, response.grounding_metadata))
    }
}

#[cfg(test)]
#[path = "pipeline_test.rs"]
mod tests;
