//! Structured Markdown export and its parser.
//!
//! Field values are escaped (`\` as `\\`, line breaks as `\n` and `\r`) so
//! every value occupies exactly one line and the case list parses back
//! unchanged.

use std::fmt::Write as _;

use cbhunt_core::{Case, Collection, CollectionKind, Right, TrendItem};

const RIGHTS_HEADING: &str = "### Rights";
const SOURCES_HEADING: &str = "### Sources";
const DESCRIPTION_INDENT: &str = "   ";

fn escape(value: &str) -> String {
    let mut out = String::with_capacity(value.len());
    for c in value.chars() {
        match c {
            '\\' => out.push_str("\\\\"),
            '\n' => out.push_str("\\n"),
            '\r' => out.push_str("\\r"),
            other => out.push(other),
        }
    }
    out
}

fn unescape(value: &str) -> String {
    let mut out = String::with_capacity(value.len());
    let mut chars = value.chars();
    while let Some(c) = chars.next() {
        if c != '\\' {
            out.push(c);
            continue;
        }
        match chars.next() {
            Some('\\') => out.push('\\'),
            Some('n') => out.push('\n'),
            Some('r') => out.push('\r'),
            Some(other) => {
                out.push('\\');
                out.push(other);
            }
            None => out.push('\\'),
        }
    }
    out
}

fn field_line(out: &mut String, label: &str, value: &str) {
    let _ = writeln!(out, "- **{label}:** {}", escape(value));
}

#[must_use]
pub fn to_markdown(collection: &Collection) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "# {}\n", escape(&collection.name));
    match collection.kind {
        CollectionKind::Notebook => {
            let _ = writeln!(out, "> {} case(s)\n", collection.cases.len());
            for case in &collection.cases {
                write_case(&mut out, case);
            }
        }
        CollectionKind::Report => {
            let _ = writeln!(out, "> {} trend(s)\n", collection.trends.len());
            for trend in &collection.trends {
                write_trend(&mut out, trend);
            }
        }
    }
    out
}

fn write_case(out: &mut String, case: &Case) {
    let _ = writeln!(out, "## {}\n", escape(&case.project_name));
    field_line(out, "Brand", &case.brand_name);
    field_line(out, "Partner", &case.partner_intro);
    field_line(out, "Product", &case.product_name);
    field_line(out, "Date", &case.date);
    let optional = [
        ("Industry", &case.industry),
        ("Visual style", &case.visual_style),
        ("Slogan", &case.campaign_slogan),
        ("Impact", &case.impact_result),
        ("Key visual", &case.key_visual_url),
    ];
    for (label, value) in optional {
        if let Some(value) = value {
            field_line(out, label, value);
        }
    }
    field_line(out, "Insight", &case.insight);
    field_line(out, "Platform", &case.platform_source);

    let _ = writeln!(out, "\n{RIGHTS_HEADING}\n");
    for (i, right) in case.rights.iter().enumerate() {
        let _ = writeln!(out, "{}. **{}**", i + 1, escape(&right.title));
        let _ = writeln!(out, "{DESCRIPTION_INDENT}{}", escape(&right.description));
    }

    if !case.source_urls.is_empty() {
        let _ = writeln!(out, "\n{SOURCES_HEADING}\n");
        for url in &case.source_urls {
            let _ = writeln!(out, "- {}", escape(url));
        }
    }
    out.push('\n');
}

fn write_trend(out: &mut String, trend: &TrendItem) {
    let _ = writeln!(out, "## {}\n", escape(&trend.ip_name));
    field_line(out, "Category", &trend.category);
    field_line(out, "Reason", &trend.reason);
    field_line(out, "Audience", &trend.target_audience);
    if let Some(momentum) = trend.momentum {
        field_line(out, "Momentum", &format!("{momentum:?}"));
    }
    if let Some(value) = trend.commercial_value {
        field_line(out, "Commercial value", &format!("{value:?}"));
    }
    if !trend.buzzwords.is_empty() {
        field_line(out, "Buzzwords", &trend.buzzwords.join(", "));
    }
    if !trend.compatibility.is_empty() {
        field_line(out, "Compatibility", &trend.compatibility.join(", "));
    }
    out.push('\n');
}

#[derive(Clone, Copy)]
enum Section {
    Fields,
    Rights,
    Sources,
}

/// Reads the cases back out of a notebook export produced by
/// [`to_markdown`]. Unrecognized lines are ignored.
#[must_use]
pub fn parse_markdown_cases(text: &str) -> Vec<Case> {
    let mut cases = Vec::new();
    let mut current: Option<Case> = None;
    let mut section = Section::Fields;
    let mut awaiting_description = false;

    for line in text.split('\n') {
        let line = line.strip_suffix('\r').unwrap_or(line);

        if awaiting_description {
            awaiting_description = false;
            if let Some(right) = current.as_mut().and_then(|c| c.rights.last_mut()) {
                let raw = line.strip_prefix(DESCRIPTION_INDENT).unwrap_or(line);
                right.description = unescape(raw);
            }
            continue;
        }

        if let Some(title) = line.strip_prefix("## ") {
            cases.extend(current.take());
            current = Some(Case {
                project_name: unescape(title),
                ..Case::default()
            });
            section = Section::Fields;
            continue;
        }

        let Some(case) = current.as_mut() else {
            continue;
        };

        if line == RIGHTS_HEADING {
            section = Section::Rights;
            continue;
        }
        if line == SOURCES_HEADING {
            section = Section::Sources;
            continue;
        }

        match section {
            Section::Fields => {
                if let Some((label, value)) = line
                    .strip_prefix("- **")
                    .and_then(|rest| rest.split_once(":** "))
                {
                    set_field(case, label, unescape(value));
                }
            }
            Section::Rights => {
                if let Some(title) = line
                    .split_once(". **")
                    .and_then(|(_, rest)| rest.strip_suffix("**"))
                {
                    case.rights.push(Right {
                        title: unescape(title),
                        description: String::new(),
                    });
                    awaiting_description = true;
                }
            }
            Section::Sources => {
                if let Some(url) = line.strip_prefix("- ") {
                    case.source_urls.push(unescape(url));
                }
            }
        }
    }

    cases.extend(current);
    cases
}

fn set_field(case: &mut Case, label: &str, value: String) {
    match label {
        "Brand" => case.brand_name = value,
        "Partner" => case.partner_intro = value,
        "Product" => case.product_name = value,
        "Date" => case.date = value,
        "Industry" => case.industry = Some(value),
        "Visual style" => case.visual_style = Some(value),
        "Slogan" => case.campaign_slogan = Some(value),
        "Impact" => case.impact_result = Some(value),
        "Key visual" => case.key_visual_url = Some(value),
        "Insight" => case.insight = value,
        "Platform" => case.platform_source = value,
        _ => {}
    }
}
