//! Date normalization: free-form draw date text → [`CanonicalDate`], and
//! "today" in the jurisdiction's time zone.

use crate::domain::model::CanonicalDate;
use chrono::{DateTime, Utc};
use chrono_tz::Tz;
use regex::{Captures, Regex};
use std::sync::LazyLock;

/// New York Lottery 的所在時區
pub const DEFAULT_TIME_ZONE: Tz = chrono_tz::America::New_York;

static RE_MONTH_NAME: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r"(?i)\b(jan|feb|mar|apr|may|jun|jul|aug|sep|oct|nov|dec)[a-z]*\.?\s+(\d{1,2})(?:st|nd|rd|th)?,?\s+(\d{4})\b",
    )
    .unwrap()
});

static RE_SLASHED: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\b(\d{1,2})/(\d{1,2})/(\d{4}|\d{2})\b").unwrap());

static RE_ISO: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\b(\d{4})-(\d{2})-(\d{2})").unwrap());

/// Today's calendar date in `zone`. The host's local zone is never consulted.
pub fn today(zone: Tz) -> CanonicalDate {
    today_at(Utc::now(), zone)
}

pub fn today_at(now: DateTime<Utc>, zone: Tz) -> CanonicalDate {
    CanonicalDate::from(now.with_timezone(&zone).date_naive())
}

/// Finds the first recognizable date anywhere in `text`.
///
/// Accepted shapes: `June 17, 2025`, `Jun 17, 2025`, `Sept. 3, 2025`,
/// `06/17/25`, `06/17/2025` and ISO `2025-06-17` (including timestamps).
/// Surrounding weekday names or session labels are ignored. Returns `None`
/// when nothing parses to a real calendar date.
pub fn parse(text: &str) -> Option<CanonicalDate> {
    // 多種格式同時出現時取最早出現的那一個
    dates_in(text)
        .min_by_key(|(position, _)| *position)
        .map(|(_, date)| date)
}

/// Whether `date` appears anywhere in `text`. Every recognizable date in
/// the text is considered, not only the first one.
pub fn matches(text: &str, date: CanonicalDate) -> bool {
    dates_in(text).any(|(_, found)| found == date)
}

/// Every date in `text` that parses to a real calendar day, with its byte offset.
fn dates_in(text: &str) -> impl Iterator<Item = (usize, CanonicalDate)> + '_ {
    let month_names = RE_MONTH_NAME
        .captures_iter(text)
        .filter_map(|caps| from_month_name(&caps));
    let slashed = RE_SLASHED
        .captures_iter(text)
        .filter_map(|caps| from_slashed(&caps));
    let iso = RE_ISO.captures_iter(text).filter_map(|caps| from_iso(&caps));

    month_names.chain(slashed).chain(iso)
}

fn month_number(name: &str) -> Option<u32> {
    let month = match name.to_ascii_lowercase().as_str() {
        "jan" => 1,
        "feb" => 2,
        "mar" => 3,
        "apr" => 4,
        "may" => 5,
        "jun" => 6,
        "jul" => 7,
        "aug" => 8,
        "sep" => 9,
        "oct" => 10,
        "nov" => 11,
        "dec" => 12,
        _ => return None,
    };
    Some(month)
}

fn from_month_name(caps: &Captures) -> Option<(usize, CanonicalDate)> {
    let whole = caps.get(0)?;
    let month = month_number(&caps[1])?;
    let day = caps[2].parse().ok()?;
    let year = caps[3].parse().ok()?;
    CanonicalDate::from_ymd(year, month, day).map(|date| (whole.start(), date))
}

fn from_slashed(caps: &Captures) -> Option<(usize, CanonicalDate)> {
    let whole = caps.get(0)?;
    let month = caps[1].parse().ok()?;
    let day = caps[2].parse().ok()?;
    let year: i32 = caps[3].parse().ok()?;
    let year = if caps[3].len() == 2 { 2000 + year } else { year };
    CanonicalDate::from_ymd(year, month, day).map(|date| (whole.start(), date))
}

fn from_iso(caps: &Captures) -> Option<(usize, CanonicalDate)> {
    let whole = caps.get(0)?;
    let year = caps[1].parse().ok()?;
    let month = caps[2].parse().ok()?;
    let day = caps[3].parse().ok()?;
    CanonicalDate::from_ymd(year, month, day).map(|date| (whole.start(), date))
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn date(y: i32, m: u32, d: u32) -> CanonicalDate {
        CanonicalDate::from_ymd(y, m, d).unwrap()
    }

    #[test]
    fn test_parse_long_form() {
        assert_eq!(parse("June 17, 2025"), Some(date(2025, 6, 17)));
        assert_eq!(parse("Tuesday, June 17, 2025"), Some(date(2025, 6, 17)));
    }

    #[test]
    fn test_parse_abbreviated_form() {
        assert_eq!(parse("Jun 17, 2025"), Some(date(2025, 6, 17)));
        assert_eq!(parse("Evening Sept. 3, 2025"), Some(date(2025, 9, 3)));
        assert_eq!(parse("Mon, Dec 1st 2025"), Some(date(2025, 12, 1)));
    }

    #[test]
    fn test_parse_slashed_numeric() {
        assert_eq!(parse("06/17/25"), Some(date(2025, 6, 17)));
        assert_eq!(parse("6/7/2025"), Some(date(2025, 6, 7)));
        assert_eq!(parse("Midday Tue 06/17/25"), Some(date(2025, 6, 17)));
    }

    #[test]
    fn test_parse_iso_timestamp() {
        assert_eq!(parse("2025-06-17T00:00:00.000Z"), Some(date(2025, 6, 17)));
    }

    #[test]
    fn test_parse_rejects_garbage_and_impossible_dates() {
        assert_eq!(parse("Midday"), None);
        assert_eq!(parse(""), None);
        assert_eq!(parse("02/30/25"), None);
        assert_eq!(parse("Smarch 17, 2025"), None);
    }

    #[test]
    fn test_parse_picks_first_date_in_text() {
        assert_eq!(
            parse("Drawn 06/16/25, next draw June 17, 2025"),
            Some(date(2025, 6, 16))
        );
    }

    #[test]
    fn test_matches_today_only() {
        let today = date(2025, 6, 17);
        assert!(matches("Midday Tue 06/17/25", today));
        assert!(!matches("Midday Tue 06/18/25", today));
        assert!(!matches("Midday", today));
    }

    #[test]
    fn test_matches_any_date_in_text() {
        let text = "Drawn 06/16/25, posted 06/17/25";
        assert!(matches(text, date(2025, 6, 17)));
        assert!(matches(text, date(2025, 6, 16)));
        assert!(!matches(text, date(2025, 6, 18)));
        // parse 仍然只取第一個
        assert_eq!(parse(text), Some(date(2025, 6, 16)));
    }

    #[test]
    fn test_today_uses_reference_zone_not_utc() {
        // 2025-06-18 02:30 UTC 在紐約仍是 06-17 晚上
        let now = Utc.with_ymd_and_hms(2025, 6, 18, 2, 30, 0).unwrap();
        assert_eq!(today_at(now, DEFAULT_TIME_ZONE), date(2025, 6, 17));
        assert_eq!(today_at(now, chrono_tz::UTC), date(2025, 6, 18));
    }
}
