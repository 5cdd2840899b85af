//! Mission configurations: the typed input of each research mission.

use serde::{Deserialize, Serialize};

use crate::error::MissionConfigError;

/// Upper bound on the number of trends a single trend mission may request.
pub const MAX_TREND_LIMIT: u32 = 50;

/// The closed set of research missions.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MissionKind {
    BrandSearch,
    Trend,
    Scout,
    Match,
}

impl std::fmt::Display for MissionKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            MissionKind::BrandSearch => write!(f, "brand_search"),
            MissionKind::Trend => write!(f, "trend"),
            MissionKind::Scout => write!(f, "scout"),
            MissionKind::Match => write!(f, "match"),
        }
    }
}

/// Competitor case search for one brand.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BrandSearchConfig {
    pub brand_name: String,
    #[serde(default)]
    pub keywords: Vec<String>,
    #[serde(default)]
    pub platforms: Vec<String>,
}

impl BrandSearchConfig {
    /// Builds the default deep-research configuration for a name surfaced by a
    /// trend mission.
    #[must_use]
    pub fn deep_research(name: &str) -> Self {
        let name = name.trim();
        Self {
            brand_name: name.to_string(),
            keywords: vec![
                format!("{name} cobranding"),
                format!("{name} collaboration"),
                format!("{name} 联名"),
            ],
            platforms: vec![
                "Google Search".to_string(),
                "Official Sites".to_string(),
                "Xiaohongshu".to_string(),
            ],
        }
    }
}

/// Trend spotting within a topic.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TrendConfig {
    pub topic: String,
    pub time_scale: String,
    pub limit: u32,
    #[serde(default)]
    pub keywords: Vec<String>,
    #[serde(default)]
    pub platforms: Vec<String>,
}

/// IP due-diligence for a single intellectual property.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ScoutConfig {
    pub ip_name: String,
}

/// Partner matchmaking for a brand campaign.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MatchConfig {
    pub brand_name: String,
    pub industry: String,
    pub campaign_goal: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub target_audience: Option<String>,
}

/// Tagged union of every mission's configuration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum MissionConfig {
    BrandSearch(BrandSearchConfig),
    Trend(TrendConfig),
    Scout(ScoutConfig),
    Match(MatchConfig),
}

impl MissionConfig {
    #[must_use]
    pub fn kind(&self) -> MissionKind {
        match self {
            MissionConfig::BrandSearch(_) => MissionKind::BrandSearch,
            MissionConfig::Trend(_) => MissionKind::Trend,
            MissionConfig::Scout(_) => MissionKind::Scout,
            MissionConfig::Match(_) => MissionKind::Match,
        }
    }

    /// Checks that every required input is present.
    ///
    /// # Errors
    ///
    /// Returns [`MissionConfigError::MissingField`] for a blank required field
    /// and [`MissionConfigError::InvalidLimit`] for an out-of-range trend limit.
    pub fn validate(&self) -> Result<(), MissionConfigError> {
        let kind = self.kind();
        let require = |value: &str, field: &'static str| {
            if value.trim().is_empty() {
                Err(MissionConfigError::MissingField { kind, field })
            } else {
                Ok(())
            }
        };

        match self {
            MissionConfig::BrandSearch(c) => require(&c.brand_name, "brandName"),
            MissionConfig::Trend(c) => {
                require(&c.topic, "topic")?;
                if c.limit == 0 || c.limit > MAX_TREND_LIMIT {
                    return Err(MissionConfigError::InvalidLimit {
                        limit: c.limit,
                        max: MAX_TREND_LIMIT,
                    });
                }
                Ok(())
            }
            MissionConfig::Scout(c) => require(&c.ip_name, "ipName"),
            MissionConfig::Match(c) => {
                require(&c.brand_name, "brandName")?;
                require(&c.industry, "industry")?;
                require(&c.campaign_goal, "campaignGoal")
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn trend(limit: u32) -> MissionConfig {
        MissionConfig::Trend(TrendConfig {
            topic: "潮玩".to_string(),
            time_scale: "last 6 months".to_string(),
            limit,
            keywords: vec![],
            platforms: vec![],
        })
    }

    #[test]
    fn blank_brand_name_is_rejected() {
        let config = MissionConfig::BrandSearch(BrandSearchConfig {
            brand_name: "   ".to_string(),
            keywords: vec!["x".to_string()],
            platforms: vec![],
        });
        assert_eq!(
            config.validate(),
            Err(MissionConfigError::MissingField {
                kind: MissionKind::BrandSearch,
                field: "brandName"
            })
        );
    }

    #[test]
    fn trend_limit_bounds() {
        assert!(trend(10).validate().is_ok());
        assert!(matches!(
            trend(0).validate(),
            Err(MissionConfigError::InvalidLimit { limit: 0, .. })
        ));
        assert!(trend(MAX_TREND_LIMIT + 1).validate().is_err());
    }

    #[test]
    fn match_requires_campaign_goal() {
        let config = MissionConfig::Match(MatchConfig {
            brand_name: "Oatly".to_string(),
            industry: "Food".to_string(),
            campaign_goal: String::new(),
            target_audience: None,
        });
        let err = config.validate().unwrap_err();
        assert!(err.to_string().contains("campaignGoal"));
    }

    #[test]
    fn deep_research_builds_default_keywords() {
        let config = BrandSearchConfig::deep_research(" Chiikawa ");
        assert_eq!(config.brand_name, "Chiikawa");
        assert_eq!(config.keywords[2], "Chiikawa 联名");
        assert_eq!(config.platforms.len(), 3);
    }

    #[test]
    fn mission_config_serializes_with_kind_tag() {
        let config = MissionConfig::Scout(ScoutConfig {
            ip_name: "Pokemon".to_string(),
        });
        let json = serde_json::to_value(&config).unwrap();
        assert_eq!(json["kind"], "scout");
        assert_eq!(json["ipName"], "Pokemon");
    }
}
