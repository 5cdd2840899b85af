//! Field-level suggestions for completing an existing case.

use std::collections::{BTreeMap, BTreeSet};

use cbhunt_core::{Case, Right};
use serde::{Deserialize, Serialize};

/// Fields the user has not filled in are pre-selected when the service is
/// more confident than this.
pub const DEFAULT_SELECTION_CONFIDENCE: f64 = 0.4;
/// Suggestions below this are flagged for review.
pub const LOW_CONFIDENCE: f64 = 0.6;

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct CasePatch {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub project_name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub brand_name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub partner_intro: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub product_name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub date: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub industry: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub visual_style: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub campaign_slogan: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub impact_result: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub key_visual_url: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub rights: Option<Vec<Right>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub insight: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub platform_source: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub source_urls: Option<Vec<String>>,
}

enum TextSlot<'a> {
    Required(&'a mut String),
    Optional(&'a mut Option<String>),
}

impl TextSlot<'_> {
    fn is_empty(&self) -> bool {
        match self {
            TextSlot::Required(s) => s.trim().is_empty(),
            TextSlot::Optional(s) => s.as_deref().is_none_or(|v| v.trim().is_empty()),
        }
    }

    fn set(self, value: &str) {
        match self {
            TextSlot::Required(s) => *s = value.to_string(),
            TextSlot::Optional(s) => *s = Some(value.to_string()),
        }
    }
}

/// Pairs every suggested text field with its slot in `case`.
fn text_slots<'a>(
    patch: &'a CasePatch,
    case: &'a mut Case,
) -> Vec<(&'static str, &'a str, TextSlot<'a>)> {
    let Case {
        project_name,
        brand_name,
        partner_intro,
        product_name,
        date,
        industry,
        visual_style,
        campaign_slogan,
        impact_result,
        key_visual_url,
        insight,
        platform_source,
        ..
    } = case;

    let candidates = [
        ("projectName", &patch.project_name, TextSlot::Required(project_name)),
        ("brandName", &patch.brand_name, TextSlot::Required(brand_name)),
        ("partnerIntro", &patch.partner_intro, TextSlot::Required(partner_intro)),
        ("productName", &patch.product_name, TextSlot::Required(product_name)),
        ("date", &patch.date, TextSlot::Required(date)),
        ("industry", &patch.industry, TextSlot::Optional(industry)),
        ("visualStyle", &patch.visual_style, TextSlot::Optional(visual_style)),
        ("campaignSlogan", &patch.campaign_slogan, TextSlot::Optional(campaign_slogan)),
        ("impactResult", &patch.impact_result, TextSlot::Optional(impact_result)),
        ("keyVisualUrl", &patch.key_visual_url, TextSlot::Optional(key_visual_url)),
        ("insight", &patch.insight, TextSlot::Required(insight)),
        ("platformSource", &patch.platform_source, TextSlot::Required(platform_source)),
    ];

    candidates
        .into_iter()
        .filter_map(|(name, value, slot)| value.as_deref().map(|v| (name, v, slot)))
        .collect()
}

impl CasePatch {
    /// Suggested fields paired with whether `current` leaves them empty.
    #[must_use]
    pub fn fields(&self, current: &Case) -> Vec<(&'static str, bool)> {
        let mut scratch = current.clone();
        let mut out = Vec::new();
        for (name, _, slot) in text_slots(self, &mut scratch) {
            out.push((name, slot.is_empty()));
        }
        if self.rights.is_some() {
            out.push(("rights", current.rights.is_empty()));
        }
        if self.source_urls.is_some() {
            out.push(("sourceUrls", current.source_urls.is_empty()));
        }
        out
    }

    /// Suggested fields with a one-line display text, in field order.
    #[must_use]
    pub fn suggestions(&self) -> Vec<(&'static str, String)> {
        let mut scratch = Case::default();
        let mut out: Vec<(&'static str, String)> = text_slots(self, &mut scratch)
            .into_iter()
            .map(|(name, value, _)| (name, value.to_string()))
            .collect();
        if let Some(rights) = &self.rights {
            let titles: Vec<&str> = rights.iter().map(|r| r.title.as_str()).collect();
            out.push(("rights", titles.join(" / ")));
        }
        if let Some(urls) = &self.source_urls {
            out.push(("sourceUrls", urls.join(" ")));
        }
        out
    }

    /// Writes the suggested value of every field named in `selected` into
    /// `case`. Unselected suggestions are ignored.
    pub fn apply(&self, case: &mut Case, selected: &BTreeSet<String>) {
        for (name, value, slot) in text_slots(self, case) {
            if selected.contains(name) {
                slot.set(value);
            }
        }
        if let Some(rights) = &self.rights {
            if selected.contains("rights") {
                case.rights.clone_from(rights);
            }
        }
        if let Some(urls) = &self.source_urls {
            if selected.contains("sourceUrls") {
                case.source_urls.clone_from(urls);
            }
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Citation {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    pub url: String,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct AutoCompleteResult {
    pub suggested_patch: CasePatch,
    /// Per-field confidence in 0..=1, keyed by camelCase field name.
    pub confidence: BTreeMap<String, f64>,
    pub citations: Vec<Citation>,
    pub warnings: Vec<String>,
}

impl AutoCompleteResult {
    /// Confidence for `field`; a field the service did not rate counts as
    /// fully confident.
    #[must_use]
    pub fn confidence_for(&self, field: &str) -> f64 {
        self.confidence.get(field).copied().unwrap_or(1.0)
    }

    /// Fields to pre-select: suggested, empty in `current`, and above
    /// [`DEFAULT_SELECTION_CONFIDENCE`].
    #[must_use]
    pub fn default_selection(&self, current: &Case) -> BTreeSet<String> {
        self.suggested_patch
            .fields(current)
            .into_iter()
            .filter(|(name, empty)| *empty && self.confidence_for(name) > DEFAULT_SELECTION_CONFIDENCE)
            .map(|(name, _)| name.to_string())
            .collect()
    }

    /// Suggested fields rated below [`LOW_CONFIDENCE`].
    #[must_use]
    pub fn low_confidence_fields(&self, current: &Case) -> Vec<&'static str> {
        self.suggested_patch
            .fields(current)
            .into_iter()
            .map(|(name, _)| name)
            .filter(|name| self.confidence_for(name) < LOW_CONFIDENCE)
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn partial_case() -> Case {
        Case {
            project_name: "瑞幸 x 茅台".to_string(),
            brand_name: "Luckin".to_string(),
            industry: Some("Coffee".to_string()),
            ..Case::default()
        }
    }

    fn result() -> AutoCompleteResult {
        AutoCompleteResult {
            suggested_patch: CasePatch {
                brand_name: Some("瑞幸咖啡".to_string()),
                date: Some("2023.09.04".to_string()),
                industry: Some("Beverage".to_string()),
                campaign_slogan: Some("美酒加咖啡".to_string()),
                rights: Some(vec![Right {
                    title: "酱香拿铁".to_string(),
                    description: "含茅台的联名拿铁".to_string(),
                }]),
                ..CasePatch::default()
            },
            confidence: BTreeMap::from([
                ("date".to_string(), 0.9),
                ("campaignSlogan".to_string(), 0.3),
                ("rights".to_string(), 0.5),
            ]),
            citations: vec![],
            warnings: vec![],
        }
    }

    #[test]
    fn default_selection_picks_empty_confident_fields() {
        let selection = result().default_selection(&partial_case());
        let expected: BTreeSet<String> = ["date", "rights"].iter().map(ToString::to_string).collect();
        assert_eq!(selection, expected);
    }

    #[test]
    fn low_confidence_fields_are_flagged() {
        let low = result().low_confidence_fields(&partial_case());
        assert_eq!(low, vec!["campaignSlogan", "rights"]);
    }

    #[test]
    fn apply_writes_only_selected_fields() {
        let mut case = partial_case();
        let selected: BTreeSet<String> = ["date", "industry", "rights"]
            .iter()
            .map(ToString::to_string)
            .collect();
        result().suggested_patch.apply(&mut case, &selected);
        assert_eq!(case.date, "2023.09.04");
        assert_eq!(case.industry.as_deref(), Some("Beverage"));
        assert_eq!(case.brand_name, "Luckin");
        assert_eq!(case.campaign_slogan, None);
        assert_eq!(case.rights.len(), 1);
    }

    #[test]
    fn patch_deserializes_from_camel_case() {
        let patch: CasePatch =
            serde_json::from_str(r#"{"keyVisualUrl": "https://img.example/kv.jpg"}"#).unwrap();
        assert_eq!(patch.key_visual_url.as_deref(), Some("https://img.example/kv.jpg"));
        assert_eq!(patch.fields(&Case::default()), vec![("keyVisualUrl", true)]);
    }

    #[test]
    fn suggestions_render_rights_as_titles() {
        let suggestions = result().suggested_patch.suggestions();
        assert_eq!(suggestions[0], ("brandName", "瑞幸咖啡".to_string()));
        assert_eq!(suggestions.last().unwrap(), &("rights", "酱香拿铁".to_string()));
        assert_eq!(suggestions.len(), 5);
    }
}
