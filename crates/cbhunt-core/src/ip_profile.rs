//! Due-diligence profile of a single intellectual property.

use serde::{Deserialize, Serialize};

use crate::case::compare_dates_desc;
use crate::dates::parse_loose_date;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum CurrentStatus {
    Active,
    Dormant,
    Classic,
}

/// Commercial tier; `S` is a global blockbuster.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Tier {
    S,
    A,
    B,
    C,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct IpMeta {
    pub ip_name: String,
    pub rights_holder: String,
    pub origin_medium: String,
    pub current_status: CurrentStatus,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CoreAudience {
    pub primary_gen: String,
    pub gender_skew: String,
    pub psychographics: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CommercialAnalysis {
    pub tier: Tier,
    pub market_momentum: String,
    pub core_audience: CoreAudience,
    pub brand_archetype: String,
    #[serde(default)]
    pub risk_factors: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct DesignElements {
    pub key_colors: Vec<String>,
    pub iconography: Vec<String>,
    pub textures_and_materials: Vec<String>,
    pub signature_quotes: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CollabEntry {
    pub time: String,
    pub brand: String,
    pub product: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub result: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StrategicFit {
    #[serde(default)]
    pub best_industries: Vec<String>,
    #[serde(default)]
    pub avoid_industries: Vec<String>,
    pub marketing_hooks: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TimelineEvent {
    pub date: String,
    pub event: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct IpProfile {
    pub meta: IpMeta,
    pub commercial_analysis: CommercialAnalysis,
    pub design_elements: DesignElements,
    /// Newest first once [`IpProfile::sort_collab_history`] has run.
    #[serde(default)]
    pub collab_history: Vec<CollabEntry>,
    pub strategic_fit: StrategicFit,
    #[serde(default)]
    pub upcoming_timeline: Vec<TimelineEvent>,
}

impl IpProfile {
    /// Orders `collab_history` descending by time; unparsable times last.
    pub fn sort_collab_history(&mut self) {
        self.collab_history.sort_by(|a, b| {
            compare_dates_desc(parse_loose_date(&a.time), parse_loose_date(&b.time))
        });
    }
}
