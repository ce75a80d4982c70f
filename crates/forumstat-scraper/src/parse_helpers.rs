//! Number and date parsing primitives for forum markup.
//!
//! phpBB renders numbers with locale-dependent grouping (`120 735`, with a
//! plain or non-breaking space) and dates either as `20 jan 2016, 10:21`
//! (Dutch board language), `Jan 20, 2016 10:21 am` (English), or relative
//! (`Vandaag, 13:06`). Everything here is lenient and returns `None` rather
//! than erroring.

use std::sync::LazyLock;

use chrono::{Duration, NaiveDate, NaiveDateTime, NaiveTime};
use regex::Regex;

static DAY_MONTH_YEAR_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)\b(\d{1,2})\.?\s+([a-zé]{3,10})\.?\s+(\d{4})(?:\s*,?\s*(\d{1,2}):(\d{2}))?")
        .expect("valid day-month-year regex")
});

static MONTH_DAY_YEAR_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r"(?i)\b([a-z]{3,9})\.?\s+(\d{1,2}),?\s+(\d{4})(?:\s*,?\s*(\d{1,2}):(\d{2})\s*(am|pm)?)?",
    )
    .expect("valid month-day-year regex")
});

static RELATIVE_DAY_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)\b(vandaag|today|gisteren|yesterday)\b\s*,?\s*(\d{1,2}):(\d{2})")
        .expect("valid relative-day regex")
});

/// Parses an integer that may be grouped with spaces (`"120 735"`), dots or
/// apostrophes (`"120.735"`, `"120'735"`).
#[must_use]
pub(crate) fn parse_grouped_int(raw: &str) -> Option<u64> {
    let digits: String = raw
        .chars()
        .filter(|c| !(c.is_whitespace() || matches!(c, '.' | '\'' | ',')))
        .collect();
    if digits.is_empty() || !digits.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    digits.parse::<u64>().ok()
}

/// Returns the first integer in `s`, tolerating single-space digit grouping.
///
/// `"120 735 | Zoek berichten"` yields `120735`; a group only continues when
/// exactly three digits follow the separator.
#[must_use]
pub(crate) fn first_grouped_int(s: &str) -> Option<u64> {
    let chars: Vec<char> = s.chars().collect();
    let start = chars.iter().position(char::is_ascii_digit)?;

    let mut digits = String::new();
    let mut i = start;
    while i < chars.len() && chars[i].is_ascii_digit() {
        digits.push(chars[i]);
        i += 1;
    }

    loop {
        let sep_ok = i < chars.len() && chars[i].is_whitespace();
        let group_end = i + 4;
        let group_ok = sep_ok
            && group_end <= chars.len()
            && chars[i + 1..group_end].iter().all(char::is_ascii_digit)
            && chars.get(group_end).is_none_or(|c| !c.is_ascii_digit());
        if !group_ok {
            break;
        }
        digits.extend(&chars[i + 1..group_end]);
        i = group_end;
    }

    digits.parse::<u64>().ok()
}

/// Parses a decimal that may use a comma as the decimal separator.
#[must_use]
pub(crate) fn parse_decimal(raw: &str) -> Option<f64> {
    let normalized = raw.trim().replace(',', ".");
    let value = normalized.parse::<f64>().ok()?;
    value.is_finite().then_some(value)
}

/// Maps a Dutch or English month name (full or abbreviated) to its number.
#[must_use]
pub(crate) fn month_from_name(name: &str) -> Option<u32> {
    let lower = name.trim_end_matches('.').to_lowercase();
    let month = match lower.as_str() {
        "mrt" | "maart" | "mar" | "march" => 3,
        "mei" | "may" => 5,
        "okt" | "oktober" | "oct" | "october" => 10,
        _ => match lower.get(..3)? {
            "jan" => 1,
            "feb" => 2,
            "apr" => 4,
            "jun" => 6,
            "jul" => 7,
            "aug" => 8,
            "sep" => 9,
            "nov" => 11,
            "dec" => 12,
            _ => return None,
        },
    };
    Some(month)
}

/// Parses the first calendar date found in `raw`.
#[must_use]
pub(crate) fn parse_forum_date(raw: &str) -> Option<NaiveDate> {
    parse_forum_datetime(raw, None).map(|dt| dt.date())
}

/// Parses the first date-time found in `raw`.
///
/// A missing time of day becomes midnight. Relative forms (`Vandaag, 13:06`,
/// `Yesterday, 09:15`) need `today`; without it they do not parse.
#[must_use]
pub(crate) fn parse_forum_datetime(raw: &str, today: Option<NaiveDate>) -> Option<NaiveDateTime> {
    if let Some(cap) = DAY_MONTH_YEAR_RE.captures(raw) {
        let day = cap[1].parse::<u32>().ok();
        let month = month_from_name(&cap[2]);
        let year = cap[3].parse::<i32>().ok();
        if let (Some(day), Some(month), Some(year)) = (day, month, year) {
            if let Some(date) = NaiveDate::from_ymd_opt(year, month, day) {
                let time = time_from_captures(cap.get(4), cap.get(5), None)?;
                return Some(date.and_time(time));
            }
        }
    }

    if let Some(cap) = MONTH_DAY_YEAR_RE.captures(raw) {
        let month = month_from_name(&cap[1]);
        let day = cap[2].parse::<u32>().ok();
        let year = cap[3].parse::<i32>().ok();
        if let (Some(day), Some(month), Some(year)) = (day, month, year) {
            if let Some(date) = NaiveDate::from_ymd_opt(year, month, day) {
                let time = time_from_captures(cap.get(4), cap.get(5), cap.get(6))?;
                return Some(date.and_time(time));
            }
        }
    }

    let today = today?;
    let cap = RELATIVE_DAY_RE.captures(raw)?;
    let date = match cap[1].to_lowercase().as_str() {
        "vandaag" | "today" => today,
        _ => today - Duration::days(1),
    };
    let time = time_from_captures(cap.get(2), cap.get(3), None)?;
    Some(date.and_time(time))
}

fn time_from_captures(
    hour: Option<regex::Match<'_>>,
    minute: Option<regex::Match<'_>>,
    meridiem: Option<regex::Match<'_>>,
) -> Option<NaiveTime> {
    let (Some(hour), Some(minute)) = (hour, minute) else {
        return Some(NaiveTime::MIN);
    };
    let mut hour = hour.as_str().parse::<u32>().ok()?;
    let minute = minute.as_str().parse::<u32>().ok()?;
    match meridiem.map(|m| m.as_str().to_lowercase()).as_deref() {
        Some("pm") if hour < 12 => hour += 12,
        Some("am") if hour == 12 => hour = 0,
        _ => {}
    }
    NaiveTime::from_hms_opt(hour, minute, 0)
}
