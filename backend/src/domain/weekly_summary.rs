//! Weekly pay-period aggregation and month filtering.

use chrono::NaiveDate;
use log::debug;
use shared::{Entry, PaycheckBreakdown, Settings, WeekSummary, WeekTotals};
use std::collections::{BTreeMap, BTreeSet};
use std::fmt;
use std::str::FromStr;

use crate::domain::pay_period::{
    calc_pay_date, end_of_week_sunday, is_month_key, month_key, months_touched,
    start_of_week_monday, to_iso,
};
use crate::domain::paycheck_engine::calculate_paycheck;

/// Group entries into Monday-Sunday pay periods, most recent period first.
///
/// Each entry runs through the paycheck engine and its figures are summed into
/// the period totals. An empty slice gives an empty result.
pub fn aggregate_weeks(entries: &[Entry], settings: &Settings) -> Vec<WeekSummary> {
    let mut buckets: BTreeMap<NaiveDate, Vec<Entry>> = BTreeMap::new();
    for entry in entries {
        buckets
            .entry(start_of_week_monday(entry.date))
            .or_default()
            .push(entry.clone());
    }

    let mut weeks: Vec<WeekSummary> = buckets
        .into_iter()
        .map(|(week_start, days)| summarize_week(week_start, days, settings))
        .collect();

    weeks.sort_by(|a, b| b.week_end.cmp(&a.week_end));

    debug!("Aggregated {} entries into {} weeks", entries.len(), weeks.len());
    weeks
}

fn summarize_week(week_start: NaiveDate, days: Vec<Entry>, settings: &Settings) -> WeekSummary {
    let week_end = end_of_week_sunday(week_start);
    let pay_date = calc_pay_date(week_end);

    let mut totals = WeekTotals::default();
    for entry in &days {
        let paycheck = calculate_paycheck(entry, settings);
        add_to_totals(&mut totals, entry, &paycheck);
    }

    // A period whose payday lands in the next month shows up under both months
    let mut month_keys = months_touched(week_start, week_end);
    month_keys.insert(month_key(pay_date));

    WeekSummary {
        key: format!("{}_{}", to_iso(week_start), to_iso(week_end)),
        week_start,
        week_end,
        pay_date,
        month_keys,
        days,
        totals,
    }
}

fn add_to_totals(totals: &mut WeekTotals, entry: &Entry, paycheck: &PaycheckBreakdown) {
    totals.hours += entry.hours;
    totals.hourly_pay += paycheck.hourly_pay;
    totals.tips += paycheck.tips;
    totals.cash_tips += entry.cash_tips;
    totals.tip_outs += entry.tip_outs;
    totals.gross += paycheck.gross;
    totals.taxable_income += paycheck.taxable_income;
    totals.tax += paycheck.total_tax();
    totals.net += paycheck.net_income;
    totals.take_home += paycheck.take_home;
    totals.k401 += paycheck.k401;
    totals.other_deductions += paycheck.other_deductions;
    totals.roth401k += paycheck.roth401k;
    totals.total_contributions += paycheck.total_contributions;
    totals.employer_match += paycheck.employer_match;
    totals.total_retirement += paycheck.total_retirement;
}

/// Which pay periods to show
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum MonthFilter {
    #[default]
    All,
    /// A YYYY-MM key
    Month(String),
}

impl MonthFilter {
    pub fn matches(&self, week: &WeekSummary) -> bool {
        match self {
            MonthFilter::All => true,
            MonthFilter::Month(key) => week.month_keys.contains(key),
        }
    }
}

impl fmt::Display for MonthFilter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            MonthFilter::All => write!(f, "all"),
            MonthFilter::Month(key) => write!(f, "{}", key),
        }
    }
}

#[derive(Debug, Clone, PartialEq, thiserror::Error)]
#[error("Invalid month filter '{0}' (expected \"all\" or YYYY-MM)")]
pub struct MonthFilterParseError(pub String);

impl FromStr for MonthFilter {
    type Err = MonthFilterParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let value = s.trim();
        if value.is_empty() || value.eq_ignore_ascii_case("all") {
            Ok(MonthFilter::All)
        } else if is_month_key(value) {
            Ok(MonthFilter::Month(value.to_string()))
        } else {
            Err(MonthFilterParseError(value.to_string()))
        }
    }
}

/// Weeks matching `filter`, order preserved
pub fn filter_weeks(weeks: &[WeekSummary], filter: &MonthFilter) -> Vec<WeekSummary> {
    weeks.iter().filter(|week| filter.matches(week)).cloned().collect()
}

/// Every month any week touches, newest first
pub fn available_months(weeks: &[WeekSummary]) -> Vec<String> {
    let months: BTreeSet<&String> = weeks.iter().flat_map(|week| week.month_keys.iter()).collect();
    months.into_iter().rev().cloned().collect()
}
