use std::cmp::Ordering;

use serde::{Deserialize, Serialize};

use crate::dates::parse_loose_date;

/// One concrete co-branding entitlement (a packaging change, a limited
/// colourway, a bundled accessory...).
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Right {
    pub title: String,
    pub description: String,
}

/// A single co-branding finding.
///
/// Field defaults exist so legacy stored records load; freshly extracted
/// cases are held to the stricter declared shape by the validator before
/// they are ever constructed.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Case {
    pub project_name: String,
    pub brand_name: String,
    pub partner_intro: String,
    pub product_name: String,
    /// Stored exactly as given; see [`Case::sort_date`].
    pub date: String,
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
    pub rights: Vec<Right>,
    pub insight: String,
    pub platform_source: String,
    pub source_urls: Vec<String>,
}

impl Case {
    /// Best-effort parse of [`Case::date`] for ordering.
    #[must_use]
    pub fn sort_date(&self) -> Option<chrono::NaiveDate> {
        parse_loose_date(&self.date)
    }
}

/// Orders two optional dates newest first with `None` last.
#[must_use]
pub fn compare_dates_desc(a: Option<chrono::NaiveDate>, b: Option<chrono::NaiveDate>) -> Ordering {
    match (a, b) {
        (Some(a), Some(b)) => b.cmp(&a),
        (Some(_), None) => Ordering::Less,
        (None, Some(_)) => Ordering::Greater,
        (None, None) => Ordering::Equal,
    }
}

/// Sorts cases newest first. Unparsable dates sort last; ties keep their
/// original relative order.
pub fn sort_cases_by_date_desc(cases: &mut [Case]) {
    cases.sort_by(|a, b| compare_dates_desc(a.sort_date(), b.sort_date()));
}

#[cfg(test)]
mod tests {
    use super::*;

    fn case(project: &str, date: &str) -> Case {
        Case {
            project_name: project.to_string(),
            date: date.to_string(),
            ..Case::default()
        }
    }

    #[test]
    fn sorts_newest_first_with_unparsable_last() {
        let mut cases = vec![
            case("a", "2021.03.01"),
            case("b", "unknown"),
            case("c", "2024.01.15"),
            case("d", "2022年6月"),
        ];
        sort_cases_by_date_desc(&mut cases);
        let order: Vec<&str> = cases.iter().map(|c| c.project_name.as_str()).collect();
        assert_eq!(order, vec!["c", "d", "a", "b"]);
    }

    #[test]
    fn date_is_stored_verbatim() {
        let c = case("x", "2024.5");
        let json = serde_json::to_value(&c).unwrap();
        assert_eq!(json["date"], "2024.5");
    }

    #[test]
    fn optional_fields_are_omitted_when_absent() {
        let json = serde_json::to_value(case("x", "2024")).unwrap();
        assert!(json.get("industry").is_none());
        assert!(json.get("projectName").is_some());
    }
}
