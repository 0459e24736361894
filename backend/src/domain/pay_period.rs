//! Calendar math for Monday-Sunday pay periods.
//!
//! Everything here works on `chrono::NaiveDate`, so there is no time-of-day or
//! time-zone component to worry about. Parsing is only needed at the edges
//! (CLI arguments, backup import); the rest of the domain passes dates around
//! already typed.

use chrono::{Datelike, Duration, NaiveDate};
use std::collections::BTreeSet;

/// Days between the end of a pay period (Sunday) and payday (Wednesday)
pub const PAY_DATE_OFFSET_DAYS: i64 = 3;

/// The Monday on or before `date`
pub fn start_of_week_monday(date: NaiveDate) -> NaiveDate {
    // Monday = 0 ... Sunday = 6
    let offset = date.weekday().num_days_from_monday() as i64;
    date - Duration::days(offset)
}

/// The Sunday closing the week that contains `date`
pub fn end_of_week_sunday(date: NaiveDate) -> NaiveDate {
    start_of_week_monday(date) + Duration::days(6)
}

/// Payday for a period ending on `week_end`. Not adjusted for holidays.
pub fn calc_pay_date(week_end: NaiveDate) -> NaiveDate {
    week_end + Duration::days(PAY_DATE_OFFSET_DAYS)
}

/// Format as YYYY-MM-DD
pub fn to_iso(date: NaiveDate) -> String {
    date.format("%Y-%m-%d").to_string()
}

/// Parse a YYYY-MM-DD string, tolerating a trailing time component
pub fn parse_iso_date(value: &str) -> Option<NaiveDate> {
    let date_part = value.trim().split('T').next()?;
    NaiveDate::parse_from_str(date_part, "%Y-%m-%d").ok()
}

/// The YYYY-MM key used for month filtering
pub fn month_key(date: NaiveDate) -> String {
    format!("{:04}-{:02}", date.year(), date.month())
}

/// Month keys of every day from `start` to `end` inclusive
pub fn months_touched(start: NaiveDate, end: NaiveDate) -> BTreeSet<String> {
    start
        .iter_days()
        .take_while(|day| *day <= end)
        .map(month_key)
        .collect()
}

/// Check that `value` looks like a YYYY-MM month key
pub fn is_month_key(value: &str) -> bool {
    NaiveDate::parse_from_str(&format!("{}-01", value), "%Y-%m-%d").is_ok() && value.len() == 7
}

/// Human-readable date, e.g. "Jan 8, 2025"
pub fn format_date_for_display(date: NaiveDate) -> String {
    date.format("%b %-d, %Y").to_string()
}

/// Short weekday name, e.g. "Wed"
pub fn day_name(date: NaiveDate) -> String {
    date.format("%a").to_string()
}
