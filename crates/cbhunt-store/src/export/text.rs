use std::fmt::Write as _;

use cbhunt_core::Case;

/// Clipboard rendering of one case.
#[must_use]
pub fn case_to_plain_text(case: &Case) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "【{}】", case.project_name.trim());
    let _ = writeln!(out, "Brand: {}", case.brand_name);
    let _ = writeln!(out, "Partner: {}", case.partner_intro);
    let _ = writeln!(out, "Product: {}", case.product_name);
    let _ = writeln!(out, "Date: {}", case.date);
    let optional = [
        ("Industry", &case.industry),
        ("Visual style", &case.visual_style),
        ("Slogan", &case.campaign_slogan),
        ("Impact", &case.impact_result),
    ];
    for (label, value) in optional {
        if let Some(value) = value {
            let _ = writeln!(out, "{label}: {value}");
        }
    }
    if !case.rights.is_empty() {
        out.push_str("Rights:\n");
        for (i, right) in case.rights.iter().enumerate() {
            let _ = writeln!(out, "  {}. {}: {}", i + 1, right.title, right.description);
        }
    }
    let _ = writeln!(out, "Insight: {}", case.insight);
    let _ = writeln!(out, "Source: {}", case.platform_source);
    for url in &case.source_urls {
        let _ = writeln!(out, "  {url}");
    }
    out
}

#[cfg(test)]
mod tests {
    use cbhunt_core::Right;

    use super::*;

    #[test]
    fn renders_core_fields_and_numbered_rights() {
        let case = Case {
            project_name: "瑞幸 x 茅台".to_string(),
            brand_name: "瑞幸".to_string(),
            date: "2023.09.04".to_string(),
            campaign_slogan: Some("美酒加咖啡".to_string()),
            rights: vec![
                Right {
                    title: "酱香拿铁".to_string(),
                    description: "含白酒".to_string(),
                },
                Right {
                    title: "联名杯".to_string(),
                    description: "红色杯身".to_string(),
                },
            ],
            source_urls: vec!["https://a.example".to_string()],
            ..Case::default()
        };
        let text = case_to_plain_text(&case);
        assert!(text.starts_with("【瑞幸 x 茅台】\n"));
        assert!(text.contains("Slogan: 美酒加咖啡\n"));
        assert!(text.contains("  2. 联名杯: 红色杯身\n"));
        assert!(!text.contains("Industry"));
        assert!(text.ends_with("  https://a.example\n"));
    }
}
