//! Terminal rendering of mission results.

use std::collections::BTreeSet;

use cbhunt_core::{Case, GroundingMetadata, IpProfile, MatchRecommendation, TrendItem};
use cbhunt_extract::AutoCompleteResult;
use cbhunt_store::CollectionStats;

const TITLE_WIDTH: usize = 40;

fn truncate(value: &str, max: usize) -> String {
    if value.chars().count() > max {
        format!("{}...", value.chars().take(max).collect::<String>())
    } else {
        value.to_string()
    }
}

fn join_or_dash(values: &[String]) -> String {
    if values.is_empty() {
        "-".to_string()
    } else {
        values.join(", ")
    }
}

pub(crate) fn format_timestamp(ms: i64) -> String {
    chrono::DateTime::from_timestamp_millis(ms)
        .map(|d| d.format("%Y-%m-%d %H:%M").to_string())
        .unwrap_or_else(|| "-".to_string())
}

pub(crate) fn print_case_line(number: usize, case: &Case, duplicate: bool) {
    let flag = if duplicate { "  [possible duplicate]" } else { "" };
    println!(
        "{number:>3}. {} | {} | {}{flag}",
        case.date,
        truncate(&case.project_name, TITLE_WIDTH),
        truncate(&case.product_name, TITLE_WIDTH)
    );
    for right in &case.rights {
        println!("       - {}", truncate(&right.title, TITLE_WIDTH));
    }
}

pub(crate) fn print_sources(metadata: Option<&GroundingMetadata>) {
    let Some(metadata) = metadata else {
        return;
    };
    let sources: Vec<_> = metadata.web_sources().filter_map(|s| s.uri.as_deref()).collect();
    if sources.is_empty() {
        return;
    }
    println!();
    println!("sources:");
    for uri in sources {
        println!("  {uri}");
    }
}

pub(crate) fn print_trends(trends: &[TrendItem]) {
    let header = format!("{:<4}{:<24}{:<14}{:<12}REASON", "#", "IP", "CATEGORY", "MOMENTUM");
    println!("{header}");
    for (i, trend) in trends.iter().enumerate() {
        let momentum = trend
            .momentum
            .map_or_else(|| "-".to_string(), |m| format!("{m:?}"));
        println!(
            "{:<4}{:<24}{:<14}{:<12}{}",
            i + 1,
            truncate(&trend.ip_name, 22),
            truncate(&trend.category, 12),
            momentum,
            truncate(&trend.reason, 60)
        );
    }
}

pub(crate) fn print_profile(profile: &IpProfile) {
    let meta = &profile.meta;
    let analysis = &profile.commercial_analysis;
    println!("{} ({:?})", meta.ip_name, meta.current_status);
    println!("rights holder: {}", meta.rights_holder);
    println!("origin: {}", meta.origin_medium);
    println!();
    println!("tier {:?}, momentum: {}", analysis.tier, analysis.market_momentum);
    println!(
        "audience: {} / {} / {}",
        analysis.core_audience.primary_gen,
        analysis.core_audience.gender_skew,
        analysis.core_audience.psychographics
    );
    println!("archetype: {}", analysis.brand_archetype);
    println!("risks: {}", join_or_dash(&analysis.risk_factors));
    println!();
    println!("colors: {}", join_or_dash(&profile.design_elements.key_colors));
    println!("iconography: {}", join_or_dash(&profile.design_elements.iconography));
    println!();
    println!("collaborations:");
    for entry in &profile.collab_history {
        let result = entry.result.as_deref().unwrap_or("");
        println!("  {:<12}{} x {} {result}", entry.time, entry.brand, entry.product);
    }
    println!();
    println!("best for: {}", join_or_dash(&profile.strategic_fit.best_industries));
    println!("avoid: {}", join_or_dash(&profile.strategic_fit.avoid_industries));
    println!("hooks: {}", profile.strategic_fit.marketing_hooks);
    if !profile.upcoming_timeline.is_empty() {
        println!();
        println!("upcoming:");
        for event in &profile.upcoming_timeline {
            println!("  {:<12}{}", event.date, event.event);
        }
    }
}

pub(crate) fn print_matches(matches: &[MatchRecommendation]) {
    let header = format!("{:<6}{:<24}{:<14}{:<6}IDEA", "SCORE", "IP", "CATEGORY", "COST");
    println!("{header}");
    for m in matches {
        let budget = m.budget_level.map_or_else(|| "-".to_string(), |b| b.to_string());
        println!(
            "{:<6}{:<24}{:<14}{:<6}{}",
            m.match_score,
            truncate(&m.ip_name, 22),
            truncate(&m.category, 12),
            budget,
            truncate(&m.campaign_idea, 60)
        );
        if let Some(risk) = &m.risk_factor {
            println!("      risk: {risk}");
        }
    }
}

pub(crate) fn print_suggestions(
    result: &AutoCompleteResult,
    selected: &BTreeSet<String>,
    low_confidence: &[&str],
) {
    for (field, value) in result.suggested_patch.suggestions() {
        let mark = if selected.contains(field) { "[x]" } else { "[ ]" };
        let low = if low_confidence.contains(&field) {
            "  (low confidence)"
        } else {
            ""
        };
        println!(
            "{mark} {field:<16}{:.2}  {}{low}",
            result.confidence_for(field),
            truncate(&value, 60)
        );
    }
    for citation in &result.citations {
        println!("  source: {}", citation.title.as_deref().unwrap_or(&citation.url));
    }
    for warning in &result.warnings {
        println!("  warning: {warning}");
    }
}

pub(crate) fn print_stats(name: &str, stats: &CollectionStats) {
    println!("{name}: {} case(s), {} trend(s)", stats.case_count, stats.trend_count);
    if !stats.timeline.is_empty() {
        println!();
        println!("by month:");
        for (month, count) in &stats.timeline {
            println!("  {month}  {}", "#".repeat(*count));
        }
    }
    if !stats.categories.is_empty() {
        println!();
        println!("categories:");
        for (category, count) in &stats.categories {
            println!("  {category:<20}{count}");
        }
    }
    if !stats.top_keywords.is_empty() {
        println!();
        println!("keywords:");
        for (word, count) in &stats.top_keywords {
            println!("  {word:<20}{count}");
        }
    }
}
