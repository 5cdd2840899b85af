//! Probable-duplicate detection for freshly fetched cases.
//!
//! Deliberately weak: a case-insensitive exact match on product name or
//! project name. It only raises a warning; nothing is ever dropped.

use cbhunt_core::Case;

fn normalized(s: &str) -> Option<String> {
    let trimmed = s.trim();
    (!trimmed.is_empty()).then(|| trimmed.to_lowercase())
}

#[must_use]
pub fn is_duplicate(candidate: &Case, existing: &[Case]) -> bool {
    let product = normalized(&candidate.product_name);
    let project = normalized(&candidate.project_name);

    existing.iter().any(|saved| {
        let same_product =
            product.is_some() && product == normalized(&saved.product_name);
        let same_project =
            project.is_some() && project == normalized(&saved.project_name);
        same_product || same_project
    })
}

/// Indices of `candidates` that probably duplicate a case in `existing`.
#[must_use]
pub fn duplicate_indices(candidates: &[Case], existing: &[Case]) -> Vec<usize> {
    candidates
        .iter()
        .enumerate()
        .filter(|(_, c)| is_duplicate(c, existing))
        .map(|(i, _)| i)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn case(project: &str, product: &str) -> Case {
        Case {
            project_name: project.to_string(),
            product_name: product.to_string(),
            ..Case::default()
        }
    }

    #[test]
    fn matches_product_case_insensitively() {
        let saved = vec![case("Collab A", "Foo")];
        assert!(is_duplicate(&case("Other", "foo"), &saved));
    }

    #[test]
    fn matches_project_name() {
        let saved = vec![case("喜茶 x FENDI", "杯子")];
        assert!(is_duplicate(&case("喜茶 X fendi", "不同产品"), &saved));
    }

    #[test]
    fn near_misses_are_not_duplicates() {
        // Pinned weakness: no fuzzy matching.
        let saved = vec![case("Nike x Sacai", "LDWaffle")];
        assert!(!is_duplicate(&case("Nike × Sacai", "LD Waffle"), &saved));
    }

    #[test]
    fn blank_names_never_match() {
        let saved = vec![case("", "")];
        assert!(!is_duplicate(&case("", ""), &saved));
    }

    #[test]
    fn duplicate_indices_flags_only_matches() {
        let saved = vec![case("A", "a")];
        let fetched = vec![case("B", "b"), case("x", "A"), case("a", "y")];
        assert_eq!(duplicate_indices(&fetched, &saved), vec![1, 2]);
    }
}
