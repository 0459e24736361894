use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, BTreeSet};
use std::fmt;
use std::str::FromStr;

/// A single day of work: hours on one role plus the tips collected that day
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Entry {
    pub id: String,
    /// Calendar date of the shift (serialized as YYYY-MM-DD)
    pub date: NaiveDate,
    /// Key into `Settings::roles`
    pub role: String,
    pub hours: f64,
    /// Credit-card tips, paid out through payroll
    #[serde(default)]
    pub tips: f64,
    #[serde(default)]
    pub cash_tips: f64,
    #[serde(default)]
    pub tip_outs: f64,
    /// Rates frozen at creation time; never changes once set
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub settings_snapshot: Option<SettingsSnapshot>,
}

/// Rates captured on an entry so its paycheck recomputes identically after settings edits.
///
/// Every field is optional on the wire: older backups may carry partial snapshots,
/// and missing fields resolve against live settings.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SettingsSnapshot {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub role_rate: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub k401_rate: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub roth401k_rate: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub employer_match: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tax_rate: Option<f64>,
}

impl SettingsSnapshot {
    /// Capture the rates that apply to `role` under `settings`
    pub fn capture(settings: &Settings, role: &str) -> Self {
        Self {
            role_rate: Some(settings.roles.get(role).copied().unwrap_or(0.0)),
            k401_rate: Some(settings.k401_rate),
            roth401k_rate: Some(settings.roth401k_rate),
            employer_match: Some(settings.employer_match),
            tax_rate: Some(settings.tax_rate),
        }
    }
}

/// Display theme preference
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Theme {
    Dark,
    /// Also what any unrecognised stored value reads as
    #[default]
    #[serde(other)]
    Light,
}

impl fmt::Display for Theme {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Theme::Light => write!(f, "light"),
            Theme::Dark => write!(f, "dark"),
        }
    }
}

impl FromStr for Theme {
    type Err = ThemeParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "light" => Ok(Theme::Light),
            "dark" => Ok(Theme::Dark),
            other => Err(ThemeParseError(other.to_string())),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct ThemeParseError(pub String);

impl fmt::Display for ThemeParseError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Unknown theme '{}' (expected light or dark)", self.0)
    }
}

impl std::error::Error for ThemeParseError {}

/// Rate and tax settings. All rates are percentages (5.0 means 5%).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Settings {
    pub tax_rate: f64,
    pub k401_rate: f64,
    pub roth401k_rate: f64,
    pub employer_match: f64,
    pub other_deductions: f64,
    pub theme: Theme,
    /// Role name -> hourly rate
    pub roles: BTreeMap<String, f64>,
}

impl Default for Settings {
    fn default() -> Self {
        let roles = [("Server", 10.0), ("Host", 15.0), ("Expo", 15.0), ("Bartender", 15.0)]
            .into_iter()
            .map(|(name, rate)| (name.to_string(), rate))
            .collect();

        Self {
            tax_rate: 20.0,
            k401_rate: 0.0,
            roth401k_rate: 0.0,
            employer_match: 0.0,
            other_deductions: 0.0,
            theme: Theme::Light,
            roles,
        }
    }
}

/// Settings as read from an external source, where any field may be absent
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PartialSettings {
    pub tax_rate: Option<f64>,
    pub k401_rate: Option<f64>,
    pub roth401k_rate: Option<f64>,
    pub employer_match: Option<f64>,
    pub other_deductions: Option<f64>,
    pub theme: Option<Theme>,
    pub roles: Option<BTreeMap<String, f64>>,
}

impl Settings {
    /// Fill every absent field from `Settings::default()`.
    ///
    /// The default role table is used only when the source carries no roles at all,
    /// so roles deleted by the user stay deleted.
    pub fn from_partial(partial: PartialSettings) -> Self {
        let defaults = Settings::default();
        Self {
            tax_rate: partial.tax_rate.unwrap_or(defaults.tax_rate),
            k401_rate: partial.k401_rate.unwrap_or(defaults.k401_rate),
            roth401k_rate: partial.roth401k_rate.unwrap_or(defaults.roth401k_rate),
            employer_match: partial.employer_match.unwrap_or(defaults.employer_match),
            other_deductions: partial.other_deductions.unwrap_or(defaults.other_deductions),
            theme: partial.theme.unwrap_or(defaults.theme),
            roles: partial.roles.unwrap_or(defaults.roles),
        }
    }
}

/// Full per-entry paycheck breakdown
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PaycheckBreakdown {
    pub hourly_pay: f64,
    pub tips: f64,
    pub gross: f64,
    pub k401: f64,
    pub other_deductions: f64,
    pub pre_tax_total: f64,
    pub taxable_income: f64,
    pub social_security: f64,
    pub medicare: f64,
    pub fica_total: f64,
    pub federal_tax: f64,
    pub state_tax: f64,
    pub roth401k: f64,
    /// Employee contributions (traditional + Roth), deducted from pay
    pub total_contributions: f64,
    /// Paid by the employer; informational, never deducted
    pub employer_match: f64,
    pub total_retirement: f64,
    pub net_income: f64,
    pub cash_net: f64,
    pub take_home: f64,
}

impl PaycheckBreakdown {
    /// Every tax withheld from this paycheck
    pub fn total_tax(&self) -> f64 {
        self.federal_tax + self.state_tax + self.fica_total
    }
}

/// Summed figures for one pay period
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WeekTotals {
    pub hours: f64,
    pub hourly_pay: f64,
    pub tips: f64,
    pub cash_tips: f64,
    pub tip_outs: f64,
    pub gross: f64,
    pub taxable_income: f64,
    pub tax: f64,
    pub net: f64,
    pub take_home: f64,
    pub k401: f64,
    pub other_deductions: f64,
    pub roth401k: f64,
    pub total_contributions: f64,
    pub employer_match: f64,
    pub total_retirement: f64,
}

/// One Monday-Sunday pay period. Derived on demand, never persisted.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WeekSummary {
    /// "<week_start>_<week_end>"
    pub key: String,
    pub week_start: NaiveDate,
    pub week_end: NaiveDate,
    #[serde(rename = "payDateISO")]
    pub pay_date: NaiveDate,
    /// Every YYYY-MM the period touches, including the pay date's month
    pub month_keys: BTreeSet<String>,
    pub days: Vec<Entry>,
    pub totals: WeekTotals,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct YtdFigures {
    pub hours: f64,
    pub gross: f64,
    pub tax: f64,
    pub net: f64,
    pub retirement: f64,
    pub take_home: f64,
    pub tip_outs: f64,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct YtdSummary {
    pub total_weeks: usize,
    pub totals: YtdFigures,
    pub averages: YtdFigures,
}

/// JSON backup document: `{settings, entries}`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BackupPayload {
    pub settings: Settings,
    pub entries: Vec<Entry>,
}

/// Request to log a new shift
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CreateEntryRequest {
    pub date: NaiveDate,
    pub role: String,
    pub hours: f64,
    pub tips: f64,
    pub cash_tips: f64,
    pub tip_outs: f64,
}

/// Request to change rate settings; `None` leaves the field untouched
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct UpdateRatesRequest {
    pub tax_rate: Option<f64>,
    pub k401_rate: Option<f64>,
    pub roth401k_rate: Option<f64>,
    pub employer_match: Option<f64>,
    pub other_deductions: Option<f64>,
}

/// Generated CSV export
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExportCsvResponse {
    pub csv_content: String,
    pub filename: String,
    pub entry_count: usize,
}

/// Outcome of reading a JSON backup
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ImportBackupResult {
    pub payload: BackupPayload,
    /// Raw entries discarded for missing a valid date, role or hours
    pub dropped_entries: usize,
}
