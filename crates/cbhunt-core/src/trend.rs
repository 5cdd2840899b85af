use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Momentum {
    Emerging,
    Peaking,
    Stabilizing,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum CommercialValue {
    High,
    Medium,
    Niche,
}

/// One IP or brand spotted by a trend mission.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct TrendItem {
    pub ip_name: String,
    pub category: String,
    pub reason: String,
    pub target_audience: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub momentum: Option<Momentum>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub commercial_value: Option<CommercialValue>,
    pub buzzwords: Vec<String>,
    pub compatibility: Vec<String>,
}
