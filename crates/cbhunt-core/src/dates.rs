//! Best-effort parsing of the loosely formatted dates the generative service
//! returns (`2024.05.12`, `2023-11`, `2022年8月`, `Spring 2021`...).

use std::sync::LazyLock;

use chrono::NaiveDate;
use regex::Regex;

static FULL_DATE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(\d{4})\s*[./\-年]\s*(\d{1,2})(?:\s*[./\-月]\s*(\d{1,2}))?")
        .expect("valid date regex")
});

static YEAR_ONLY: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\b(19\d{2}|20\d{2})\b").expect("valid year regex"));

/// Parses the first recognizable date in `raw`.
///
/// Missing month or day components resolve to the first of the period, so
/// `2023` sorts before `2023.02`. Returns `None` when nothing date-like is
/// found.
#[must_use]
pub fn parse_loose_date(raw: &str) -> Option<NaiveDate> {
    if let Some(caps) = FULL_DATE.captures(raw) {
        let year = caps[1].parse::<i32>().ok()?;
        let month = caps[2].parse::<u32>().ok()?;
        let day = caps
            .get(3)
            .and_then(|m| m.as_str().parse::<u32>().ok())
            .unwrap_or(1);
        if let Some(date) = NaiveDate::from_ymd_opt(year, month, day) {
            return Some(date);
        }
        // Day out of range for the month: keep the month.
        if let Some(date) = NaiveDate::from_ymd_opt(year, month, 1) {
            return Some(date);
        }
    }

    let caps = YEAR_ONLY.captures(raw)?;
    let year = caps[1].parse::<i32>().ok()?;
    NaiveDate::from_ymd_opt(year, 1, 1)
}

/// `YYYY-MM` bucket key for `raw`, when it carries at least a year and month.
#[must_use]
pub fn year_month_key(raw: &str) -> Option<String> {
    let caps = FULL_DATE.captures(raw)?;
    let month = caps[2].parse::<u32>().ok()?;
    if !(1..=12).contains(&month) {
        return None;
    }
    Some(format!("{}-{month:02}", &caps[1]))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ymd(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn parses_dotted_date() {
        assert_eq!(parse_loose_date("2024.05.12"), Some(ymd(2024, 5, 12)));
    }

    #[test]
    fn parses_year_month() {
        assert_eq!(parse_loose_date("2023-11"), Some(ymd(2023, 11, 1)));
    }

    #[test]
    fn parses_cjk_date() {
        assert_eq!(parse_loose_date("2022年8月3日"), Some(ymd(2022, 8, 3)));
    }

    #[test]
    fn falls_back_to_year() {
        assert_eq!(parse_loose_date("Spring 2021"), Some(ymd(2021, 1, 1)));
    }

    #[test]
    fn unparsable_is_none() {
        assert_eq!(parse_loose_date("recently"), None);
        assert_eq!(parse_loose_date(""), None);
    }

    #[test]
    fn invalid_day_keeps_month() {
        assert_eq!(parse_loose_date("2023.02.30"), Some(ymd(2023, 2, 1)));
    }

    #[test]
    fn year_month_key_pads_month() {
        assert_eq!(year_month_key("2024.5.1").as_deref(), Some("2024-05"));
        assert_eq!(year_month_key("2024"), None);
        assert_eq!(year_month_key("2024.13"), None);
    }
}
