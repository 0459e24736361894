//! Settings resolution.
//!
//! An entry may carry a `SettingsSnapshot` frozen when it was logged. Every rate
//! the paycheck pipeline needs is resolved here, one field at a time, so the
//! precedence is explicit and testable:
//!
//! | Field              | 1st                      | 2nd                   | 3rd |
//! |--------------------|--------------------------|-----------------------|-----|
//! | `role_rate`        | snapshot `roleRate`      | live `roles[role]`    | 0   |
//! | `tax_rate`         | snapshot `taxRate`       | live `taxRate`        |     |
//! | `k401_rate`        | snapshot `k401Rate`      | live `k401Rate`       |     |
//! | `roth401k_rate`    | snapshot `roth401kRate`  | live `roth401kRate`   |     |
//! | `employer_match`   | snapshot `employerMatch` | live `employerMatch`  |     |
//! | `other_deductions` | live `otherDeductions`   |                       |     |

use shared::{Entry, Settings, SettingsSnapshot};

/// Fully populated rates for one entry. All percentages except `role_rate`.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct EffectiveRates {
    /// Hourly wage for the entry's role
    pub role_rate: f64,
    pub tax_rate: f64,
    pub k401_rate: f64,
    pub roth401k_rate: f64,
    pub employer_match: f64,
    pub other_deductions: f64,
}

/// Resolve every rate that applies to `entry`
pub fn resolve_rates(entry: &Entry, settings: &Settings) -> EffectiveRates {
    let snapshot = entry.settings_snapshot.as_ref();
    let field = |pick: fn(&SettingsSnapshot) -> Option<f64>, live: f64| {
        snapshot.and_then(pick).unwrap_or(live)
    };

    EffectiveRates {
        role_rate: resolve_role_rate(entry, settings),
        tax_rate: field(|s| s.tax_rate, settings.tax_rate),
        k401_rate: field(|s| s.k401_rate, settings.k401_rate),
        roth401k_rate: field(|s| s.roth401k_rate, settings.roth401k_rate),
        employer_match: field(|s| s.employer_match, settings.employer_match),
        other_deductions: settings.other_deductions,
    }
}

/// Hourly rate for the entry's role: snapshot, then live role table, then 0
pub fn resolve_role_rate(entry: &Entry, settings: &Settings) -> f64 {
    entry
        .settings_snapshot
        .as_ref()
        .and_then(|snapshot| snapshot.role_rate)
        .or_else(|| settings.roles.get(&entry.role).copied())
        .unwrap_or(0.0)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn entry(role: &str, snapshot: Option<SettingsSnapshot>) -> Entry {
        Entry {
            id: "e1".to_string(),
            date: NaiveDate::from_ymd_opt(2025, 1, 8).unwrap(),
            role: role.to_string(),
            hours: 8.0,
            tips: 0.0,
            cash_tips: 0.0,
            tip_outs: 0.0,
            settings_snapshot: snapshot,
        }
    }

    fn live_settings() -> Settings {
        Settings {
            tax_rate: 30.0,
            k401_rate: 4.0,
            roth401k_rate: 2.0,
            employer_match: 3.0,
            other_deductions: 1.5,
            ..Settings::default()
        }
    }

    #[test]
    fn test_without_snapshot_uses_live_settings() {
        let rates = resolve_rates(&entry("Host", None), &live_settings());
        assert_eq!(
            rates,
            EffectiveRates {
                role_rate: 15.0,
                tax_rate: 30.0,
                k401_rate: 4.0,
                roth401k_rate: 2.0,
                employer_match: 3.0,
                other_deductions: 1.5,
            }
        );
    }

    #[test]
    fn test_full_snapshot_wins_over_live_settings() {
        let snapshot = SettingsSnapshot {
            role_rate: Some(11.0),
            k401_rate: Some(0.0),
            roth401k_rate: Some(0.0),
            employer_match: Some(0.0),
            tax_rate: Some(15.0),
        };

        let rates = resolve_rates(&entry("Host", Some(snapshot)), &live_settings());
        assert_eq!(rates.role_rate, 11.0);
        assert_eq!(rates.tax_rate, 15.0);
        assert_eq!(rates.k401_rate, 0.0);
        assert_eq!(rates.roth401k_rate, 0.0);
        assert_eq!(rates.employer_match, 0.0);
        // Not part of a snapshot
        assert_eq!(rates.other_deductions, 1.5);
    }

    #[test]
    fn test_partial_snapshot_falls_back_per_field() {
        let snapshot = SettingsSnapshot {
            tax_rate: Some(12.0),
            ..Default::default()
        };

        let rates = resolve_rates(&entry("Server", Some(snapshot)), &live_settings());
        assert_eq!(rates.tax_rate, 12.0);
        assert_eq!(rates.role_rate, 10.0);
        assert_eq!(rates.k401_rate, 4.0);
        assert_eq!(rates.employer_match, 3.0);
    }

    #[test]
    fn test_unknown_role_without_snapshot_is_zero() {
        assert_eq!(resolve_role_rate(&entry("Sommelier", None), &live_settings()), 0.0);
    }
}
