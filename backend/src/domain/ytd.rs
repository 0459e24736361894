//! Year-to-date totals and per-week averages over the weekly summaries in scope.

use shared::{WeekSummary, YtdFigures, YtdSummary};

pub fn calculate_ytd(weeks: &[WeekSummary]) -> YtdSummary {
    if weeks.is_empty() {
        return YtdSummary::default();
    }

    let mut totals = YtdFigures::default();
    for week in weeks {
        let t = &week.totals;
        totals.hours += t.hours;
        totals.gross += t.gross;
        totals.tax += t.tax;
        totals.net += t.net;
        totals.retirement += t.total_retirement;
        totals.take_home += t.take_home;
        totals.tip_outs += t.tip_outs;
    }

    let count = weeks.len() as f64;
    let averages = YtdFigures {
        hours: totals.hours / count,
        gross: totals.gross / count,
        tax: totals.tax / count,
        net: totals.net / count,
        retirement: totals.retirement / count,
        take_home: totals.take_home / count,
        tip_outs: totals.tip_outs / count,
    };

    YtdSummary {
        total_weeks: weeks.len(),
        totals,
        averages,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::calculators::assert_close;
    use crate::domain::weekly_summary::aggregate_weeks;
    use chrono::NaiveDate;
    use shared::{Entry, Settings};

    fn entry(id: &str, y: i32, m: u32, d: u32, hours: f64) -> Entry {
        Entry {
            id: id.to_string(),
            date: NaiveDate::from_ymd_opt(y, m, d).unwrap(),
            role: "Server".to_string(),
            hours,
            tips: 20.0,
            cash_tips: 15.0,
            tip_outs: 5.0,
            settings_snapshot: None,
        }
    }

    #[test]
    fn test_empty_is_all_zero() {
        let ytd = calculate_ytd(&[]);
        assert_eq!(ytd.total_weeks, 0);
        assert_eq!(ytd.totals, YtdFigures::default());
        assert_eq!(ytd.averages, YtdFigures::default());
        assert!(!ytd.averages.gross.is_nan());
    }

    #[test]
    fn test_totals_and_averages() {
        let settings = Settings {
            k401_rate: 5.0,
            employer_match: 2.0,
            ..Settings::default()
        };
        let entries = vec![
            entry("a", 2025, 1, 6, 8.0),
            entry("b", 2025, 1, 7, 8.0),
            entry("c", 2025, 1, 14, 8.0),
        ];

        let weeks = aggregate_weeks(&entries, &settings);
        let ytd = calculate_ytd(&weeks);

        assert_eq!(ytd.total_weeks, 2);
        assert_close(ytd.totals.hours, 24.0);
        assert_close(ytd.totals.gross, 300.0);
        // 5% + 2% match on every shift
        assert_close(ytd.totals.retirement, 21.0);
        // Taxable 95 per shift at 20%
        assert_close(ytd.totals.tax, 57.0);
        assert_close(ytd.totals.net, 228.0);
        assert_close(ytd.totals.take_home, 258.0);
        assert_close(ytd.totals.tip_outs, 15.0);

        assert_close(ytd.averages.hours, 12.0);
        assert_close(ytd.averages.gross, 150.0);
        assert_close(ytd.averages.take_home, 129.0);
        assert_close(ytd.averages.tip_outs, 7.5);
    }
}
