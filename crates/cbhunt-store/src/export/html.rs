//! Self-contained HTML report.

use std::fmt::Write as _;

use cbhunt_core::{Case, Collection, CollectionKind, TrendItem};

const STYLE: &str = "\
body{margin:0;background:#f8fafc;color:#0f172a;font-family:-apple-system,'PingFang SC','Noto Sans SC',sans-serif;line-height:1.6}\
header{padding:48px 32px 24px;background:linear-gradient(135deg,#4f46e5,#c026d3);color:#fff}\
header h1{margin:0;font-size:32px}header p{margin:8px 0 0;opacity:.8}\
main{display:grid;grid-template-columns:repeat(auto-fill,minmax(340px,1fr));gap:24px;padding:32px}\
article{background:#fff;border-radius:20px;box-shadow:0 4px 24px rgba(15,23,42,.08);overflow:hidden}\
article img{width:100%;height:200px;object-fit:cover}\
article .body{padding:20px 24px}\
article h2{margin:0 0 4px;font-size:20px}\
.sub{color:#64748b;font-size:13px;margin:0 0 12px}\
dl{display:grid;grid-template-columns:max-content 1fr;gap:4px 12px;font-size:14px;margin:0 0 12px}\
dt{color:#94a3b8}dd{margin:0}\
.tag{display:inline-block;background:#eef2ff;color:#4338ca;border-radius:999px;padding:2px 10px;margin:2px;font-size:12px}\
.insight{background:#fdf4ff;border-left:3px solid #c026d3;padding:8px 12px;font-size:14px}\
ul{padding-left:20px;font-size:14px}a{color:#4f46e5;word-break:break-all}";

fn escape(value: &str) -> String {
    let mut out = String::with_capacity(value.len());
    for c in value.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            other => out.push(other),
        }
    }
    out
}

/// Only web URLs become links or images; anything else renders as text.
fn is_web_url(value: &str) -> bool {
    let lower = value.trim().to_ascii_lowercase();
    lower.starts_with("https://") || lower.starts_with("http://")
}

fn format_day(ms: i64) -> String {
    chrono::DateTime::from_timestamp_millis(ms)
        .map(|d| d.format("%Y-%m-%d").to_string())
        .unwrap_or_default()
}

#[must_use]
pub fn to_html(collection: &Collection) -> String {
    let mut out = String::new();
    let title = escape(&collection.name);
    let summary = match collection.kind {
        CollectionKind::Notebook => format!("{} case(s)", collection.cases.len()),
        CollectionKind::Report => format!("{} trend(s)", collection.trends.len()),
    };

    let _ = write!(
        out,
        "<!DOCTYPE html>\n<html lang=\"zh-CN\">\n<head>\n<meta charset=\"utf-8\">\n\
         <meta name=\"viewport\" content=\"width=device-width,initial-scale=1\">\n\
         <title>{title}</title>\n<style>{STYLE}</style>\n</head>\n<body>\n\
         <header><h1>{title}</h1><p>{summary} · updated {}</p></header>\n<main>\n",
        format_day(collection.updated_at)
    );

    match collection.kind {
        CollectionKind::Notebook => {
            for case in &collection.cases {
                write_case(&mut out, case);
            }
        }
        CollectionKind::Report => {
            for trend in &collection.trends {
                write_trend(&mut out, trend);
            }
        }
    }

    out.push_str("</main>\n</body>\n</html>\n");
    out
}

fn write_case(out: &mut String, case: &Case) {
    out.push_str("<article>");
    if let Some(url) = case.key_visual_url.as_deref().filter(|u| is_web_url(u)) {
        let _ = write!(out, "<img src=\"{}\" alt=\"\">", escape(url));
    }
    let _ = write!(
        out,
        "<div class=\"body\"><h2>{}</h2><p class=\"sub\">{} · {}</p><dl>",
        escape(&case.project_name),
        escape(&case.brand_name),
        escape(&case.date)
    );

    let rows = [
        ("Partner", Some(case.partner_intro.as_str())),
        ("Product", Some(case.product_name.as_str())),
        ("Industry", case.industry.as_deref()),
        ("Visual style", case.visual_style.as_deref()),
        ("Slogan", case.campaign_slogan.as_deref()),
        ("Impact", case.impact_result.as_deref()),
        ("Platform", Some(case.platform_source.as_str())),
    ];
    for (label, value) in rows {
        if let Some(value) = value.filter(|v| !v.trim().is_empty()) {
            let _ = write!(out, "<dt>{label}</dt><dd>{}</dd>", escape(value));
        }
    }
    out.push_str("</dl>");

    if !case.rights.is_empty() {
        out.push_str("<ul>");
        for right in &case.rights {
            let _ = write!(
                out,
                "<li><strong>{}</strong> {}</li>",
                escape(&right.title),
                escape(&right.description)
            );
        }
        out.push_str("</ul>");
    }

    if !case.insight.trim().is_empty() {
        let _ = write!(out, "<p class=\"insight\">{}</p>", escape(&case.insight));
    }

    if !case.source_urls.is_empty() {
        out.push_str("<ul>");
        for url in &case.source_urls {
            let url_text = escape(url);
            if is_web_url(url) {
                let _ = write!(out, "<li><a href=\"{url_text}\">{url_text}</a></li>");
            } else {
                let _ = write!(out, "<li>{url_text}</li>");
            }
        }
        out.push_str("</ul>");
    }
    out.push_str("</div></article>\n");
}

fn write_trend(out: &mut String, trend: &TrendItem) {
    let _ = write!(
        out,
        "<article><div class=\"body\"><h2>{}</h2><p class=\"sub\">{}</p><dl>",
        escape(&trend.ip_name),
        escape(&trend.category)
    );
    let _ = write!(out, "<dt>Audience</dt><dd>{}</dd>", escape(&trend.target_audience));
    if let Some(momentum) = trend.momentum {
        let _ = write!(out, "<dt>Momentum</dt><dd>{momentum:?}</dd>");
    }
    if let Some(value) = trend.commercial_value {
        let _ = write!(out, "<dt>Value</dt><dd>{value:?}</dd>");
    }
    out.push_str("</dl>");
    let _ = write!(out, "<p class=\"insight\">{}</p>", escape(&trend.reason));
    for word in trend.buzzwords.iter().chain(&trend.compatibility) {
        let _ = write!(out, "<span class=\"tag\">{}</span>", escape(word));
    }
    out.push_str("</div></article>\n");
}

#[cfg(test)]
mod tests {
    use cbhunt_core::Right;

    use super::*;

    fn notebook() -> Collection {
        let mut c = Collection::new("n".into(), CollectionKind::Notebook, "<Best> & Co".into(), 0);
        c.cases.push(Case {
            project_name: "A <script>alert(1)</script>".to_string(),
            key_visual_url: Some("javascript:alert(1)".to_string()),
            rights: vec![Right {
                title: "杯套".to_string(),
                description: "\"限定\"".to_string(),
            }],
            source_urls: vec!["https://a.example/?q=1&r=2".to_string()],
            ..Case::default()
        });
        c
    }

    #[test]
    fn values_are_escaped() {
        let html = to_html(&notebook());
        assert!(html.contains("<title>&lt;Best&gt; &amp; Co</title>"));
        assert!(html.contains("A &lt;script&gt;alert(1)&lt;/script&gt;"));
        assert!(!html.contains("<script>"));
        assert!(html.contains("&quot;限定&quot;"));
    }

    #[test]
    fn only_web_urls_become_links() {
        let html = to_html(&notebook());
        assert!(!html.contains("<img"));
        assert!(html.contains("<a href=\"https://a.example/?q=1&amp;r=2\">"));
    }

    #[test]
    fn document_is_self_contained_and_deterministic() {
        let c = notebook();
        let html = to_html(&c);
        assert!(html.starts_with("<!DOCTYPE html>"));
        assert!(html.contains("<style>"));
        assert!(!html.contains("<link"));
        assert!(html.contains("updated 1970-01-01"));
        assert_eq!(html, to_html(&c));
    }
}
