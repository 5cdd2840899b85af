//! Instruction builders.
//!
//! Each builder turns a typed configuration into the exact text sent to the
//! generative service. The text is deterministic so it can be previewed,
//! edited, and sent back verbatim as an override.

use cbhunt_core::{BrandSearchConfig, Case, MatchConfig, MissionConfig, ScoutConfig, TrendConfig};

use crate::schema::{
    autocomplete_shape, case_list_shape, idea_list_shape, ip_profile_shape, match_list_shape,
    social_post_shape, trend_list_shape, PayloadKind, Shape,
};
use crate::service::GenerationRequest;

const LANGUAGE_RULE: &str = "All text values must be written in Simplified Chinese (简体中文). \
Keep brand, product and IP names in their original form.";

const NULL_RULE: &str = "Use null for any field you cannot verify. \
Never write placeholder strings such as \"N/A\", \"Unknown\" or \"未知\".";

const RIGHTS_RULE: &str = "Each case must list at least one concrete right: a tangible or \
experiential entitlement such as limited packaging, a co-branded product, a gift with \
purchase or an offline event. Abstract benefits such as \"brand exposure\" do not count.";

const DATE_RULE: &str = "Write dates as YYYY.MM.DD, or YYYY.MM when the day is unknown.";

#[derive(Debug, Clone, PartialEq)]
pub struct MissionQuery {
    pub instruction_text: String,
    pub output_shape: Shape,
    pub web_search: bool,
    pub temperature: f32,
}

impl MissionQuery {
    /// Replaces the generated text with a user-edited instruction. Shape,
    /// tools and temperature are kept.
    #[must_use]
    pub fn with_instruction(mut self, text: &str) -> Self {
        self.instruction_text = text.to_string();
        self
    }

    #[must_use]
    pub fn payload_kind(&self) -> PayloadKind {
        self.output_shape.payload_kind()
    }

    #[must_use]
    pub fn to_request(&self) -> GenerationRequest {
        GenerationRequest {
            instruction_text: self.instruction_text.clone(),
            output_shape: self.output_shape.clone(),
            web_search: self.web_search,
            temperature: self.temperature,
        }
    }
}

fn list_or_none(items: &[String]) -> String {
    let items: Vec<&str> = items
        .iter()
        .map(|s| s.trim())
        .filter(|s| !s.is_empty())
        .collect();
    if items.is_empty() {
        "(none specified)".to_string()
    } else {
        items.join(", ")
    }
}

fn rules(lines: &[&str]) -> String {
    lines
        .iter()
        .map(|line| format!("- {line}"))
        .collect::<Vec<_>>()
        .join("\n")
}

/// Builds the query for any mission kind.
#[must_use]
pub fn build_query(config: &MissionConfig) -> MissionQuery {
    match config {
        MissionConfig::BrandSearch(c) => brand_search_query(c),
        MissionConfig::Trend(c) => trend_query(c),
        MissionConfig::Scout(c) => scout_query(c),
        MissionConfig::Match(c) => match_query(c),
    }
}

#[must_use]
pub fn brand_search_query(config: &BrandSearchConfig) -> MissionQuery {
    let text = format!(
        "You are a senior co-branding (联名) analyst. Find real, verifiable co-branding \
         collaborations involving the brand \"{brand}\".\n\n\
         Search keywords: {keywords}\n\
         Preferred platforms: {platforms}\n\n\
         Rules:\n{rules}\n- If no collaboration can be verified, return [].",
        brand = config.brand_name.trim(),
        keywords = list_or_none(&config.keywords),
        platforms = list_or_none(&config.platforms),
        rules = rules(&[
            "Report only collaborations that actually happened, each with its source URLs.",
            RIGHTS_RULE,
            DATE_RULE,
            NULL_RULE,
            LANGUAGE_RULE,
        ]),
    );
    MissionQuery {
        instruction_text: text,
        output_shape: case_list_shape(),
        web_search: true,
        temperature: 0.1,
    }
}

#[must_use]
pub fn trend_query(config: &TrendConfig) -> MissionQuery {
    let text = format!(
        "You are a pop-culture and consumer trend scout. Identify the {limit} most promising \
         IPs, characters, artists or brands for co-branding within the topic \"{topic}\" \
         over the period: {scale}.\n\n\
         Search keywords: {keywords}\n\
         Preferred platforms: {platforms}\n\n\
         Rules:\n{rules}\n- Return at most {limit} items. If nothing qualifies, return [].",
        limit = config.limit,
        topic = config.topic.trim(),
        scale = config.time_scale.trim(),
        keywords = list_or_none(&config.keywords),
        platforms = list_or_none(&config.platforms),
        rules = rules(&[
            "Explain in reason why each item is rising now, citing concrete signals.",
            "momentum is one of Emerging, Peaking, Stabilizing.",
            "commercialValue is one of High, Medium, Niche.",
            NULL_RULE,
            LANGUAGE_RULE,
        ]),
    );
    MissionQuery {
        instruction_text: text,
        output_shape: trend_list_shape(),
        web_search: true,
        temperature: 0.4,
    }
}

#[must_use]
pub fn scout_query(config: &ScoutConfig) -> MissionQuery {
    let text = format!(
        "You are an IP licensing due-diligence analyst. Build a commercial profile of the \
         intellectual property \"{ip}\".\n\n\
         Rules:\n{rules}",
        ip = config.ip_name.trim(),
        rules = rules(&[
            "tier is S for a global blockbuster, A for a strong regional IP, B for a niche but \
             loyal following and C for an emerging or fading IP.",
            "collabHistory lists real past collaborations, newest first, with time as YYYY.MM.",
            "designElements.keyColors are hex codes where known.",
            "upcomingTimeline lists announced anniversaries, releases or events.",
            NULL_RULE,
            LANGUAGE_RULE,
        ]),
    );
    MissionQuery {
        instruction_text: text,
        output_shape: ip_profile_shape(),
        web_search: true,
        temperature: 0.2,
    }
}

#[must_use]
pub fn match_query(config: &MatchConfig) -> MissionQuery {
    let audience = config
        .target_audience
        .as_deref()
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .unwrap_or("(none specified)");
    let text = format!(
        "You are a co-branding strategist. Recommend IPs that would make strong partners for \
         the brand \"{brand}\".\n\n\
         Industry: {industry}\n\
         Campaign goal: {goal}\n\
         Target audience: {audience}\n\n\
         Rules:\n{rules}",
        brand = config.brand_name.trim(),
        industry = config.industry.trim(),
        goal = config.campaign_goal.trim(),
        rules = rules(&[
            "matchScore is a number from 0 to 100.",
            "budgetLevel is $, $$ or $$$ for the expected licensing cost.",
            "campaignIdea describes one concrete activation.",
            NULL_RULE,
            LANGUAGE_RULE,
        ]),
    );
    MissionQuery {
        instruction_text: text,
        output_shape: match_list_shape(),
        web_search: true,
        temperature: 0.7,
    }
}

/// Asks for field-level suggestions to complete `current`, researched from
/// `keyword`.
#[must_use]
pub fn autocomplete_query(keyword: &str, current: &Case) -> MissionQuery {
    let snapshot = serde_json::to_string_pretty(current).unwrap_or_default();
    let text = format!(
        "You are completing a co-branding case record. Research \"{keyword}\" and suggest \
         values for the fields of the record below that are empty or wrong.\n\n\
         Current record:\n{snapshot}\n\n\
         Rules:\n{rules}",
        keyword = keyword.trim(),
        rules = rules(&[
            "suggestedPatch contains only the fields you are suggesting.",
            "confidence maps each suggested field name to a number between 0 and 1.",
            "citations lists the pages that support the suggestions.",
            "warnings lists anything the user should double-check.",
            RIGHTS_RULE,
            DATE_RULE,
            NULL_RULE,
            LANGUAGE_RULE,
        ]),
    );
    MissionQuery {
        instruction_text: text,
        output_shape: autocomplete_shape(),
        web_search: true,
        temperature: 0.1,
    }
}

/// What kind of seed names an idea query should brainstorm.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum IdeaKind {
    /// Brands worth researching for co-branding cases.
    Brands,
    /// Topics worth a trend mission.
    TrendTopics,
}

#[must_use]
pub fn idea_query(kind: IdeaKind, seed: &str) -> MissionQuery {
    let subject = match kind {
        IdeaKind::Brands => "brand names that are active in co-branding",
        IdeaKind::TrendTopics => "trend topics worth scouting for co-branding",
    };
    let seed = seed.trim();
    let context = if seed.is_empty() {
        String::new()
    } else {
        format!(" related to \"{seed}\"")
    };
    let text = format!(
        "Suggest 8 {subject}{context}. Return a JSON array of short strings. {LANGUAGE_RULE}"
    );
    MissionQuery {
        instruction_text: text,
        output_shape: idea_list_shape(),
        web_search: false,
        temperature: 0.9,
    }
}

/// Drafts a social media post from a case write-up.
#[must_use]
pub fn social_post_query(case_markdown: &str) -> MissionQuery {
    let text = format!(
        "Write a Xiaohongshu (小红书) post introducing the co-branding case below. Use a \
         catchy title with emoji and a body of short paragraphs ending with hashtags.\n\n\
         {case_markdown}\n\n{LANGUAGE_RULE}"
    );
    MissionQuery {
        instruction_text: text,
        output_shape: social_post_shape(),
        web_search: false,
        temperature: 0.8,
    }
}

#[cfg(test)]
mod tests {
    use cbhunt_core::MissionKind;

    use super::*;

    fn brand(keywords: &[&str], platforms: &[&str]) -> BrandSearchConfig {
        BrandSearchConfig {
            brand_name: "喜茶".to_string(),
            keywords: keywords.iter().map(ToString::to_string).collect(),
            platforms: platforms.iter().map(ToString::to_string).collect(),
        }
    }

    #[test]
    fn brand_query_embeds_keywords_and_platforms_verbatim() {
        let query = brand_search_query(&brand(&["喜茶 联名", "HEYTEA x FENDI"], &["Weibo"]));
        assert!(query.instruction_text.contains("\"喜茶\""));
        assert!(query.instruction_text.contains("喜茶 联名, HEYTEA x FENDI"));
        assert!(query.instruction_text.contains("Weibo"));
        assert!(query.instruction_text.contains("Simplified Chinese"));
        assert!(query.instruction_text.contains("N/A"));
        assert!(query.web_search);
    }

    #[test]
    fn build_query_is_deterministic() {
        let config = MissionConfig::BrandSearch(brand(&["a"], &[]));
        assert_eq!(build_query(&config), build_query(&config));
    }

    #[test]
    fn empty_keywords_are_marked() {
        let query = brand_search_query(&brand(&[], &[]));
        assert!(query.instruction_text.contains("Search keywords: (none specified)"));
    }

    #[test]
    fn trend_query_states_limit() {
        let query = build_query(&MissionConfig::Trend(TrendConfig {
            topic: "潮玩".to_string(),
            time_scale: "last 6 months".to_string(),
            limit: 12,
            keywords: vec![],
            platforms: vec!["Douyin".to_string()],
        }));
        assert!(query.instruction_text.contains("12 most promising"));
        assert!(query.instruction_text.contains("Douyin"));
        assert_eq!(query.payload_kind(), PayloadKind::List);
    }

    #[test]
    fn scout_query_expects_object() {
        let config = MissionConfig::Scout(ScoutConfig {
            ip_name: "Chiikawa".to_string(),
        });
        assert_eq!(config.kind(), MissionKind::Scout);
        let query = build_query(&config);
        assert!(query.instruction_text.contains("\"Chiikawa\""));
        assert_eq!(query.payload_kind(), PayloadKind::Object);
    }

    #[test]
    fn override_replaces_text_only() {
        let original = brand_search_query(&brand(&["x"], &[]));
        let edited = original.clone().with_instruction("custom text");
        assert_eq!(edited.to_request().instruction_text, "custom text");
        assert_eq!(edited.output_shape, original.output_shape);
        assert!((edited.temperature - original.temperature).abs() < f32::EPSILON);
    }

    #[test]
    fn match_query_without_audience() {
        let query = match_query(&MatchConfig {
            brand_name: "瑞幸".to_string(),
            industry: "Coffee".to_string(),
            campaign_goal: "Gen Z awareness".to_string(),
            target_audience: None,
        });
        assert!(query.instruction_text.contains("Target audience: (none specified)"));
    }
}
