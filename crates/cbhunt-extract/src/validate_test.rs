use cbhunt_core::{BudgetLevel, Case, IpProfile, MatchRecommendation, TrendItem};
use serde_json::json;

use super::*;
use crate::schema::{case_list_shape, ip_profile_shape, match_list_shape, trend_list_shape};

fn valid_case() -> Value {
    json!({
        "projectName": "喜茶 x FENDI",
        "brandName": "HEYTEA",
        "partnerIntro": "Italian luxury house",
        "productName": "FENDI 喜悦黄",
        "date": "2023.05.17",
        "industry": null,
        "rights": [{"title": "联名杯套", "description": "限定黄色杯套与徽章"}],
        "insight": "奢侈品下沉到日常饮品",
        "platformSource": "Weibo",
        "sourceUrls": ["https://example.com/a"]
    })
}

#[test]
fn valid_case_list_converts() {
    let cases: Vec<Case> = validate_as(json!([valid_case()]), &case_list_shape()).unwrap();
    assert_eq!(cases.len(), 1);
    assert_eq!(cases[0].industry, None);
    assert_eq!(cases[0].rights[0].title, "联名杯套");
}

#[test]
fn validation_is_a_no_op_on_conforming_values() {
    let value = json!([valid_case()]);
    let once = validate_value(value.clone(), &case_list_shape()).unwrap();
    let twice = validate_value(once.clone(), &case_list_shape()).unwrap();
    assert_eq!(once, value);
    assert_eq!(twice, value);
}

#[test]
fn empty_rights_fail_with_path() {
    let mut case = valid_case();
    case["rights"] = json!([]);
    let err = validate_value(json!([valid_case(), case]), &case_list_shape()).unwrap_err();
    assert_eq!(err.path, "$[1].rights");
    assert!(err.reason.contains("at least 1"));
}

#[test]
fn missing_required_field_fails() {
    let mut case = valid_case();
    case.as_object_mut().unwrap().remove("insight");
    let err = validate_value(json!([case]), &case_list_shape()).unwrap_err();
    assert_eq!(err.path, "$[0].insight");
}

#[test]
fn null_required_field_fails() {
    let mut case = valid_case();
    case["brandName"] = Value::Null;
    assert!(validate_value(json!([case]), &case_list_shape()).is_err());
}

#[test]
fn wrong_type_is_reported() {
    let mut case = valid_case();
    case["date"] = json!(2023);
    let err = validate_value(json!([case]), &case_list_shape()).unwrap_err();
    assert_eq!(err.path, "$[0].date");
    assert!(err.reason.contains("expected string, found number"));
}

#[test]
fn empty_list_is_valid() {
    let trends: Vec<TrendItem> = validate_as(json!([]), &trend_list_shape()).unwrap();
    assert!(trends.is_empty());
}

#[test]
fn unknown_enum_value_is_rejected() {
    let value = json!([{
        "ipName": "Labubu",
        "category": "潮玩",
        "reason": "社媒爆款",
        "targetAudience": "Z世代",
        "momentum": "Exploding"
    }]);
    let err = validate_value(value, &trend_list_shape()).unwrap_err();
    assert_eq!(err.path, "$[0].momentum");
}

#[test]
fn match_score_out_of_range_is_rejected() {
    let value = json!([{
        "ipName": "Line Friends",
        "category": "Character",
        "matchScore": 140,
        "whyItWorks": "x",
        "campaignIdea": "y"
    }]);
    let err = validate_value(value, &match_list_shape()).unwrap_err();
    assert_eq!(err.path, "$[0].matchScore");
}

#[test]
fn fractional_match_score_is_accepted_and_rounded() {
    let value = json!([{
        "ipName": "Line Friends",
        "category": "Character",
        "matchScore": 87.5,
        "whyItWorks": "x",
        "campaignIdea": "y"
    }]);
    let recs: Vec<MatchRecommendation> = validate_as(value, &match_list_shape()).unwrap();
    assert_eq!(recs[0].match_score, 88);
}

#[test]
fn match_budget_level_converts() {
    let value = json!([{
        "ipName": "Line Friends",
        "category": "Character",
        "matchScore": 88,
        "whyItWorks": "x",
        "campaignIdea": "y",
        "riskFactor": null,
        "budgetLevel": "$$"
    }]);
    let recs: Vec<MatchRecommendation> = validate_as(value, &match_list_shape()).unwrap();
    assert_eq!(recs[0].budget_level, Some(BudgetLevel::Medium));
    assert_eq!(recs[0].risk_factor, None);
}

#[test]
fn ip_profile_with_optional_lists_absent_converts() {
    let value = json!({
        "meta": {
            "ipName": "Chiikawa",
            "rightsHolder": "ナガノ",
            "originMedium": "Manga",
            "currentStatus": "Active"
        },
        "commercialAnalysis": {
            "tier": "S",
            "marketMomentum": "快速增长",
            "coreAudience": {
                "primaryGen": "Gen Z",
                "genderSkew": "偏女性",
                "psychographics": "治愈系"
            },
            "brandArchetype": "The Innocent"
        },
        "designElements": {"keyColors": ["#FFFFFF"]},
        "strategicFit": {"marketingHooks": "萌系反差"}
    });
    let profile: IpProfile = validate_as(value, &ip_profile_shape()).unwrap();
    assert!(profile.collab_history.is_empty());
    assert!(profile.commercial_analysis.risk_factors.is_empty());
    assert_eq!(profile.design_elements.key_colors, vec!["#FFFFFF"]);
}

#[test]
fn ip_profile_missing_meta_fails() {
    let err = validate_value(json!({}), &ip_profile_shape()).unwrap_err();
    assert_eq!(err.path, "$.meta");
}
