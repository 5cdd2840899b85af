//! Indented outline for mind-map tools: one node per line, nesting by
//! heading level and list indentation.

use std::fmt::Write as _;

use cbhunt_core::{Case, Collection, CollectionKind, TrendItem};

use super::single_line;

/// Groups items by key, keeping first-appearance order of the keys.
fn group_by<'a, T>(items: &'a [T], key: impl Fn(&T) -> &str) -> Vec<(String, Vec<&'a T>)> {
    let mut groups: Vec<(String, Vec<&T>)> = Vec::new();
    for item in items {
        let raw = key(item).trim();
        let k = if raw.is_empty() { "Other" } else { raw };
        match groups.iter_mut().find(|(g, _)| g == k) {
            Some((_, members)) => members.push(item),
            None => groups.push((k.to_string(), vec![item])),
        }
    }
    groups
}

#[must_use]
pub fn to_mindmap(collection: &Collection) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "# {}", single_line(&collection.name));
    match collection.kind {
        CollectionKind::Notebook => {
            for (brand, cases) in group_by(&collection.cases, |c| c.brand_name.as_str()) {
                let _ = writeln!(out, "## {}", single_line(&brand));
                for case in cases {
                    write_case(&mut out, case);
                }
            }
        }
        CollectionKind::Report => {
            for (category, trends) in group_by(&collection.trends, |t| t.category.as_str()) {
                let _ = writeln!(out, "## {}", single_line(&category));
                for trend in trends {
                    write_trend(&mut out, trend);
                }
            }
        }
    }
    out
}

fn write_case(out: &mut String, case: &Case) {
    let _ = writeln!(
        out,
        "### {} ({})",
        single_line(&case.project_name),
        single_line(&case.date)
    );
    let _ = writeln!(out, "- Partner: {}", single_line(&case.partner_intro));
    let _ = writeln!(out, "- Product: {}", single_line(&case.product_name));
    if !case.rights.is_empty() {
        out.push_str("- Rights\n");
        for right in &case.rights {
            let _ = writeln!(
                out,
                "  - {}: {}",
                single_line(&right.title),
                single_line(&right.description)
            );
        }
    }
    let _ = writeln!(out, "- Insight: {}", single_line(&case.insight));
}

fn write_trend(out: &mut String, trend: &TrendItem) {
    let _ = writeln!(out, "### {}", single_line(&trend.ip_name));
    let _ = writeln!(out, "- Reason: {}", single_line(&trend.reason));
    let _ = writeln!(out, "- Audience: {}", single_line(&trend.target_audience));
    if let Some(momentum) = trend.momentum {
        let _ = writeln!(out, "- Momentum: {momentum:?}");
    }
    if !trend.buzzwords.is_empty() {
        out.push_str("- Buzzwords\n");
        for word in &trend.buzzwords {
            let _ = writeln!(out, "  - {}", single_line(word));
        }
    }
}
