use serde::{Deserialize, Deserializer, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum BudgetLevel {
    #[serde(rename = "$")]
    Low,
    #[serde(rename = "$$")]
    Medium,
    #[serde(rename = "$$$")]
    High,
}

impl std::fmt::Display for BudgetLevel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            BudgetLevel::Low => write!(f, "$"),
            BudgetLevel::Medium => write!(f, "$$"),
            BudgetLevel::High => write!(f, "$$$"),
        }
    }
}

/// An IP suggested as a partner for a brand campaign.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MatchRecommendation {
    pub ip_name: String,
    pub category: String,
    /// 0..=100. Fractional replies are rounded to the nearest point.
    #[serde(deserialize_with = "rounded_score")]
    pub match_score: u8,
    pub why_it_works: String,
    pub campaign_idea: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub risk_factor: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub budget_level: Option<BudgetLevel>,
}

#[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
fn rounded_score<'de, D>(deserializer: D) -> Result<u8, D::Error>
where
    D: Deserializer<'de>,
{
    let raw = f64::deserialize(deserializer)?;
    if !raw.is_finite() {
        return Err(serde::de::Error::custom("match score must be a finite number"));
    }
    // Clamped to 0..=100 first, so the cast cannot wrap.
    Ok(raw.round().clamp(0.0, 100.0) as u8)
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    fn recommendation(score: serde_json::Value) -> MatchRecommendation {
        serde_json::from_value(json!({
            "ipName": "Line Friends",
            "category": "Character",
            "matchScore": score,
            "whyItWorks": "w",
            "campaignIdea": "c"
        }))
        .unwrap()
    }

    #[test]
    fn fractional_scores_are_rounded() {
        assert_eq!(recommendation(json!(87.0)).match_score, 87);
        assert_eq!(recommendation(json!(87.5)).match_score, 88);
        assert_eq!(recommendation(json!(92)).match_score, 92);
    }

    #[test]
    fn score_serializes_as_integer() {
        let json = serde_json::to_value(recommendation(json!(64.4))).unwrap();
        assert_eq!(json["matchScore"], 64);
    }
}
