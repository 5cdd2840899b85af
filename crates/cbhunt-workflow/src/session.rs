use cbhunt_core::{
    Case, GroundingMetadata, IpProfile, MatchConfig, MatchRecommendation, MissionConfig, TrendItem,
};

use crate::phase::Phase;

/// Ephemeral state of the in-flight or just-finished mission. Never
/// persisted; replaced wholesale on every phase change that touches it.
#[derive(Debug, Clone)]
pub(crate) struct Session {
    pub(crate) phase: Phase,
    pub(crate) review_cases: Vec<Case>,
    pub(crate) trend_results: Vec<TrendItem>,
    pub(crate) ip_profile: Option<Box<IpProfile>>,
    pub(crate) matches: Vec<MatchRecommendation>,
    pub(crate) metadata: Option<GroundingMetadata>,
    pub(crate) error: Option<String>,
    /// Names the report saved from trend results.
    pub(crate) trend_topic: Option<String>,
    pub(crate) match_config: Option<MatchConfig>,
    /// Collection shown in `CollectionDetail`.
    pub(crate) viewing: Option<String>,
}

impl Session {
    pub(crate) fn idle() -> Self {
        Self {
            phase: Phase::Idle,
            review_cases: Vec::new(),
            trend_results: Vec::new(),
            ip_profile: None,
            matches: Vec::new(),
            metadata: None,
            error: None,
            trend_topic: None,
            match_config: None,
            viewing: None,
        }
    }

    pub(crate) fn fetching(config: &MissionConfig) -> Self {
        let mut session = Self::idle();
        session.phase = Phase::Fetching(config.kind());
        match config {
            MissionConfig::Trend(c) => session.trend_topic = Some(c.topic.clone()),
            MissionConfig::Match(c) => session.match_config = Some(c.clone()),
            MissionConfig::BrandSearch(_) | MissionConfig::Scout(_) => {}
        }
        session
    }

    pub(crate) fn has_pending_review(&self) -> bool {
        !self.review_cases.is_empty()
    }
}
