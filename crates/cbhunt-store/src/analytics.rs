//! Summary statistics over one collection.

use std::collections::{BTreeMap, HashMap};

use cbhunt_core::{year_month_key, Collection};

const STOP_WORDS: [&str; 6] = ["with", "from", "this", "that", "brand", "collab"];
const TOP_KEYWORDS: usize = 5;
/// Keywords must be longer than this many characters.
const MIN_KEYWORD_CHARS: usize = 3;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CollectionStats {
    pub case_count: usize,
    pub trend_count: usize,
    /// `(YYYY-MM, count)`, oldest first.
    pub timeline: Vec<(String, usize)>,
    /// `(category, count)`, largest first.
    pub categories: Vec<(String, usize)>,
    /// `(keyword, count)`, most frequent first.
    pub top_keywords: Vec<(String, usize)>,
}

#[must_use]
pub fn collection_stats(collection: &Collection) -> CollectionStats {
    CollectionStats {
        case_count: collection.cases.len(),
        trend_count: collection.trends.len(),
        timeline: case_timeline(collection),
        categories: trend_categories(collection),
        top_keywords: top_keywords(collection),
    }
}

/// Cases per month; cases without a recognizable month are left out.
#[must_use]
pub fn case_timeline(collection: &Collection) -> Vec<(String, usize)> {
    let mut months: BTreeMap<String, usize> = BTreeMap::new();
    for key in collection.cases.iter().filter_map(|c| year_month_key(&c.date)) {
        *months.entry(key).or_default() += 1;
    }
    months.into_iter().collect()
}

#[must_use]
pub fn trend_categories(collection: &Collection) -> Vec<(String, usize)> {
    let mut counts: HashMap<&str, usize> = HashMap::new();
    for trend in &collection.trends {
        *counts.entry(trend.category.as_str()).or_default() += 1;
    }
    sorted_by_count(counts)
}

/// Most frequent words across partner intros and product names.
#[must_use]
pub fn top_keywords(collection: &Collection) -> Vec<(String, usize)> {
    let text = collection
        .cases
        .iter()
        .map(|c| format!("{} {}", c.partner_intro, c.product_name))
        .collect::<Vec<_>>()
        .join(" ")
        .to_lowercase();

    let mut counts: HashMap<&str, usize> = HashMap::new();
    for word in text.split(|c: char| !(c.is_alphanumeric() || c == '_')) {
        if word.chars().count() > MIN_KEYWORD_CHARS && !STOP_WORDS.contains(&word) {
            *counts.entry(word).or_default() += 1;
        }
    }

    let mut ranked = sorted_by_count(counts);
    ranked.truncate(TOP_KEYWORDS);
    ranked
}

/// Descending by count, then ascending by key so output is deterministic.
fn sorted_by_count(counts: HashMap<&str, usize>) -> Vec<(String, usize)> {
    let mut ranked: Vec<(String, usize)> = counts
        .into_iter()
        .map(|(k, v)| (k.to_string(), v))
        .collect();
    ranked.sort_by(|a, b| b.1.cmp(&a.1).then_with(|| a.0.cmp(&b.0)));
    ranked
}

#[cfg(test)]
mod tests {
    use cbhunt_core::{Case, CollectionKind, TrendItem};

    use super::*;

    fn notebook(cases: Vec<Case>) -> Collection {
        let mut c = Collection::new("n".into(), CollectionKind::Notebook, "n".into(), 0);
        c.cases = cases;
        c
    }

    fn case(date: &str, intro: &str, product: &str) -> Case {
        Case {
            date: date.to_string(),
            partner_intro: intro.to_string(),
            product_name: product.to_string(),
            ..Case::default()
        }
    }

    #[test]
    fn timeline_groups_by_month_ascending() {
        let c = notebook(vec![
            case("2024.05.01", "", ""),
            case("2023-11", "", ""),
            case("2024年5月", "", ""),
            case("someday", "", ""),
        ]);
        assert_eq!(
            case_timeline(&c),
            vec![("2023-11".to_string(), 1), ("2024-05".to_string(), 2)]
        );
    }

    #[test]
    fn categories_sorted_by_count() {
        let mut c = Collection::new("r".into(), CollectionKind::Report, "r".into(), 0);
        for category in ["潮玩", "动漫", "潮玩"] {
            c.trends.push(TrendItem {
                category: category.to_string(),
                ..TrendItem::default()
            });
        }
        assert_eq!(
            trend_categories(&c),
            vec![("潮玩".to_string(), 2), ("动漫".to_string(), 1)]
        );
    }

    #[test]
    fn keywords_skip_short_and_stop_words() {
        let c = notebook(vec![
            case("", "Luxury fashion house from Italy", "Fashion Collab Latte"),
            case("", "Luxury tea brand", "Latte with cheese foam"),
        ]);
        let ranked = top_keywords(&c);
        let keywords: Vec<(&str, usize)> = ranked.iter().map(|(w, n)| (w.as_str(), *n)).collect();
        assert_eq!(
            keywords,
            vec![("fashion", 2), ("latte", 2), ("luxury", 2), ("cheese", 1), ("foam", 1)]
        );
    }

    #[test]
    fn stats_for_empty_collection() {
        let stats = collection_stats(&notebook(vec![]));
        assert_eq!(stats.case_count, 0);
        assert!(stats.timeline.is_empty());
        assert!(stats.top_keywords.is_empty());
    }
}
