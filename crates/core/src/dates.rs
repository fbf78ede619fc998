//! Lenient calendar-date parsing.
//!
//! Numeric dates are read day-first when ambiguous (`05-03-2024` is
//! 5 March). A leading four-digit year is always ISO order. If the
//! day-first reading is not a real date the month-first reading is tried.

use std::sync::LazyLock;

use chrono::NaiveDate;
use regex::Regex;

/// `a<sep>b<sep>c` with `-`, `/` or `.` separators.
static NUMERIC_DATE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^(\d{1,4})[-/.](\d{1,2})[-/.](\d{1,4})$").expect("valid date regex")
});

/// `YYYYMMDD`.
static COMPACT_DATE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^(\d{4})(\d{2})(\d{2})$").expect("valid compact regex"));

/// Formats with a month name, tried in order.
const TEXTUAL_FORMATS: &[&str] = &[
    "%d %B %Y",
    "%d %b %Y",
    "%d-%b-%Y",
    "%d-%B-%Y",
    "%d/%b/%Y",
    "%B %d, %Y",
    "%b %d, %Y",
    "%B %d %Y",
    "%b %d %Y",
];

/// Parses a free-text date, returning `None` if no rule accepts it.
pub fn parse_date(text: &str) -> Option<NaiveDate> {
    let text = text.trim();
    if text.is_empty() {
        return None;
    }

    let date_part = strip_time(text);

    if let Some(caps) = COMPACT_DATE.captures(date_part) {
        return NaiveDate::from_ymd_opt(
            caps[1].parse().ok()?,
            caps[2].parse().ok()?,
            caps[3].parse().ok()?,
        );
    }

    if let Some(caps) = NUMERIC_DATE.captures(date_part) {
        return numeric(&caps[1], &caps[2], &caps[3]);
    }

    TEXTUAL_FORMATS
        .iter()
        .find_map(|fmt| NaiveDate::parse_from_str(text, fmt).ok())
}

/// Drops a trailing time-of-day (`2024-03-05 10:00:00`, `2024-03-05T10:00`).
fn strip_time(text: &str) -> &str {
    if !text.contains(':') {
        return text;
    }
    text.split(|c: char| c == 'T' || c.is_whitespace())
        .next()
        .unwrap_or(text)
}

fn numeric(first: &str, second: &str, third: &str) -> Option<NaiveDate> {
    if first.len() == 4 {
        // ISO: year-month-day, never reordered.
        return NaiveDate::from_ymd_opt(first.parse().ok()?, second.parse().ok()?, third.parse().ok()?);
    }

    if first.len() > 2 {
        return None;
    }

    let year = expand_year(third)?;
    let a: u32 = first.parse().ok()?;
    let b: u32 = second.parse().ok()?;

    NaiveDate::from_ymd_opt(year, b, a).or_else(|| NaiveDate::from_ymd_opt(year, a, b))
}

/// Two-digit years pivot at 69: `00-68` are 20xx, `69-99` are 19xx.
fn expand_year(text: &str) -> Option<i32> {
    let value: i32 = text.parse().ok()?;
    match text.len() {
        4 => Some(value),
        2 if value <= 68 => Some(2000 + value),
        2 => Some(1900 + value),
        _ => None,
    }
}
