//! Export service: CSV reports and JSON backups.
//!
//! CSV rows are computed through the paycheck engine, so exported figures
//! always match what the weekly view shows. Backup import sanitizes raw
//! records before anything reaches storage.

use anyhow::Result;
use log::{info, warn};
use serde_json::{Map, Value};
use uuid::Uuid;

use crate::domain::errors::ImportError;
use crate::domain::pay_period::{parse_iso_date, to_iso};
use crate::domain::paycheck_engine::calculate_paycheck;
use crate::domain::rates::resolve_role_rate;
use shared::{
    BackupPayload, Entry, ExportCsvResponse, ImportBackupResult, PartialSettings, Settings,
    SettingsSnapshot,
};

pub const CSV_FILENAME: &str = "income_tracker_export.csv";
pub const BACKUP_FILENAME: &str = "income_tracker_backup.json";

pub const CSV_HEADER: [&str; 16] = [
    "Date",
    "Role",
    "Hours",
    "Credit Tips",
    "Cash Tips",
    "Tip-Outs",
    "Hourly Pay",
    "Gross",
    "401k",
    "Taxable Income",
    "Tax",
    "Other",
    "Net",
    "Take-Home",
    "Employer Match",
    "Retirement",
];

#[derive(Clone, Default)]
pub struct ExportService {}

impl ExportService {
    pub fn new() -> Self {
        Self {}
    }

    /// One CSV row per entry, oldest first. No entries gives a header-only file.
    pub fn export_csv(&self, entries: &[Entry], settings: &Settings) -> Result<ExportCsvResponse> {
        let mut sorted: Vec<&Entry> = entries.iter().collect();
        sorted.sort_by(|a, b| a.date.cmp(&b.date));

        let mut writer = csv::WriterBuilder::new()
            .terminator(csv::Terminator::Any(b'\n'))
            .from_writer(Vec::new());
        writer.write_record(CSV_HEADER)?;

        for entry in &sorted {
            let paycheck = calculate_paycheck(entry, settings);
            let rate = resolve_role_rate(entry, settings);

            writer.write_record([
                to_iso(entry.date),
                entry.role.clone(),
                money(entry.hours),
                money(entry.tips),
                money(entry.cash_tips),
                money(entry.tip_outs),
                money(rate),
                money(paycheck.gross),
                money(paycheck.k401),
                money(paycheck.taxable_income),
                money(paycheck.federal_tax),
                // Other deductions are not broken out in the report yet
                "0.00".to_string(),
                money(paycheck.net_income),
                money(paycheck.take_home),
                money(paycheck.employer_match),
                money(paycheck.total_retirement),
            ])?;
        }

        let bytes = writer
            .into_inner()
            .map_err(|e| anyhow::anyhow!("Failed to finish CSV export: {}", e))?;
        let csv_content = String::from_utf8(bytes)?;

        info!("Exported {} entries to CSV ({} bytes)", sorted.len(), csv_content.len());
        Ok(ExportCsvResponse {
            csv_content,
            filename: CSV_FILENAME.to_string(),
            entry_count: sorted.len(),
        })
    }

    /// Pretty-printed `{settings, entries}` JSON
    pub fn export_backup(&self, settings: &Settings, entries: &[Entry]) -> Result<String> {
        let payload = BackupPayload {
            settings: settings.clone(),
            entries: entries.to_vec(),
        };
        let json = serde_json::to_string_pretty(&payload)?;
        info!("Exported backup with {} entries", entries.len());
        Ok(json)
    }

    /// Parse a backup, merging settings over defaults and dropping malformed entries
    pub fn import_backup(&self, json: &str) -> Result<ImportBackupResult, ImportError> {
        let parsed: Value =
            serde_json::from_str(json).map_err(|e| ImportError::InvalidJson(e.to_string()))?;
        let root = parsed.as_object().ok_or(ImportError::NotAnObject)?;

        let settings = match root.get("settings") {
            Some(value @ Value::Object(_)) => {
                let partial: PartialSettings = serde_json::from_value(value.clone())
                    .map_err(|e| ImportError::InvalidSettings(e.to_string()))?;
                Settings::from_partial(partial)
            }
            _ => Settings::default(),
        };

        let raw_entries = root
            .get("entries")
            .and_then(Value::as_array)
            .map(Vec::as_slice)
            .unwrap_or_default();

        let entries: Vec<Entry> = raw_entries.iter().filter_map(sanitize_backup_entry).collect();
        let dropped_entries = raw_entries.len() - entries.len();
        if dropped_entries > 0 {
            warn!("Dropped {} malformed entries from backup", dropped_entries);
        }

        info!("Read backup with {} entries", entries.len());
        Ok(ImportBackupResult {
            payload: BackupPayload { settings, entries },
            dropped_entries,
        })
    }
}

/// Two decimal places, ties rounded away from zero
fn money(value: f64) -> String {
    let cents = (value * 100.0).round();
    // avoid "-0.00"
    let cents = if cents == 0.0 { 0.0 } else { cents };
    format!("{:.2}", cents / 100.0)
}

/// Turn one raw backup record into an entry, or None if it lacks a valid
/// date, role, or hours. Other numeric fields default to 0.
pub fn sanitize_backup_entry(raw: &Value) -> Option<Entry> {
    let record = raw.as_object()?;

    let date = record.get("date").and_then(Value::as_str).and_then(parse_iso_date)?;
    let role = record.get("role").and_then(Value::as_str)?.to_string();
    let hours = record.get("hours").and_then(number)?;

    let id = match record.get("id").and_then(Value::as_str) {
        Some(id) if !id.is_empty() => id.to_string(),
        _ => Uuid::new_v4().to_string(),
    };

    Some(Entry {
        id,
        date,
        role,
        hours,
        tips: number_or_zero(record, "tips"),
        cash_tips: number_or_zero(record, "cashTips"),
        tip_outs: number_or_zero(record, "tipOuts"),
        settings_snapshot: record
            .get("settingsSnapshot")
            .and_then(Value::as_object)
            .and_then(sanitize_snapshot),
    })
}

/// Keep each numeric snapshot field on its own; a bad field is dropped, not the
/// whole snapshot. None when nothing usable is left.
fn sanitize_snapshot(raw: &Map<String, Value>) -> Option<SettingsSnapshot> {
    let field = |key: &str| raw.get(key).and_then(number);
    let snapshot = SettingsSnapshot {
        role_rate: field("roleRate"),
        k401_rate: field("k401Rate"),
        roth401k_rate: field("roth401kRate"),
        employer_match: field("employerMatch"),
        tax_rate: field("taxRate"),
    };
    (snapshot != SettingsSnapshot::default()).then_some(snapshot)
}

/// A JSON number, or a string holding one
fn number(value: &Value) -> Option<f64> {
    let parsed = match value {
        Value::Number(n) => n.as_f64(),
        Value::String(s) => s.trim().parse::<f64>().ok(),
        _ => None,
    };
    parsed.filter(|n| n.is_finite())
}

fn number_or_zero(record: &Map<String, Value>, key: &str) -> f64 {
    record.get(key).and_then(number).unwrap_or(0.0)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;
    use serde_json::json;
    use shared::Theme;
    use std::collections::BTreeMap;

    fn shift(id: &str, date: &str) -> Entry {
        Entry {
            id: id.to_string(),
            date: NaiveDate::parse_from_str(date, "%Y-%m-%d").unwrap(),
            role: "Server".to_string(),
            hours: 8.0,
            tips: 20.0,
            cash_tips: 15.0,
            tip_outs: 5.0,
            settings_snapshot: None,
        }
    }

    fn server_settings(k401_rate: f64) -> Settings {
        let mut roles = BTreeMap::new();
        roles.insert("Server".to_string(), 10.0);
        Settings {
            k401_rate,
            employer_match: 4.0,
            roles,
            ..Settings::default()
        }
    }

    #[test]
    fn test_csv_header_and_row() {
        let service = ExportService::new();
        let response = service
            .export_csv(&[shift("a", "2025-01-08")], &server_settings(5.0))
            .unwrap();

        let lines: Vec<&str> = response.csv_content.lines().collect();
        assert_eq!(
            lines[0],
            "Date,Role,Hours,Credit Tips,Cash Tips,Tip-Outs,Hourly Pay,Gross,401k,Taxable Income,Tax,Other,Net,Take-Home,Employer Match,Retirement"
        );
        assert_eq!(
            lines[1],
            "2025-01-08,Server,8.00,20.00,15.00,5.00,10.00,100.00,5.00,95.00,19.00,0.00,76.00,86.00,4.00,9.00"
        );
        assert_eq!(response.entry_count, 1);
        assert_eq!(response.filename, "income_tracker_export.csv");
    }

    #[test]
    fn test_csv_rows_oldest_first() {
        let service = ExportService::new();
        let entries = vec![shift("late", "2025-02-01"), shift("early", "2025-01-03")];
        let response = service.export_csv(&entries, &server_settings(0.0)).unwrap();

        let lines: Vec<&str> = response.csv_content.lines().collect();
        assert_eq!(lines.len(), 3);
        assert!(lines[1].starts_with("2025-01-03,"));
        assert!(lines[2].starts_with("2025-02-01,"));
    }

    #[test]
    fn test_csv_empty_is_header_only() {
        let response = ExportService::new().export_csv(&[], &Settings::default()).unwrap();
        assert_eq!(response.entry_count, 0);
        assert_eq!(response.csv_content.lines().count(), 1);
    }

    #[test]
    fn test_csv_uses_snapshot_rate() {
        let mut entry = shift("a", "2025-01-08");
        entry.settings_snapshot = Some(SettingsSnapshot {
            role_rate: Some(12.5),
            ..Default::default()
        });

        let response = ExportService::new().export_csv(&[entry], &server_settings(0.0)).unwrap();
        let row: Vec<&str> = response.csv_content.lines().nth(1).unwrap().split(',').collect();
        assert_eq!(row[6], "12.50");
        assert_eq!(row[7], "120.00");
    }

    #[test]
    fn test_money_rounds_ties_up() {
        assert_eq!(money(0.125), "0.13");
        assert_eq!(money(90.625), "90.63");
        assert_eq!(money(2.0), "2.00");
        assert_eq!(money(-0.001), "0.00");
    }

    #[test]
    fn test_csv_rounds_half_cents_up() {
        let mut entry = shift("a", "2025-01-08");
        entry.hours = 7.25;
        entry.tips = 0.125;
        let mut settings = server_settings(0.0);
        settings.roles.insert("Server".to_string(), 12.5);

        let response = ExportService::new().export_csv(&[entry], &settings).unwrap();
        let row: Vec<&str> = response.csv_content.lines().nth(1).unwrap().split(',').collect();
        assert_eq!(row[2], "7.25");
        assert_eq!(row[3], "0.13");
        // 7.25h * 12.50 = 90.625, + 0.125 tips
        assert_eq!(row[7], "90.75");
    }

    #[test]
    fn test_import_keeps_valid_snapshot_fields() {
        let json = json!({
            "entries": [{
                "id": "a",
                "date": "2025-01-08",
                "role": "Server",
                "hours": 8,
                "settingsSnapshot": {
                    "roleRate": 10,
                    "k401Rate": "oops",
                    "employerMatch": null,
                    "taxRate": "15"
                }
            }, {
                "id": "b",
                "date": "2025-01-09",
                "role": "Server",
                "hours": 8,
                "settingsSnapshot": {"taxRate": true}
            }]
        })
        .to_string();

        let result = ExportService::new().import_backup(&json).unwrap();
        let entries = &result.payload.entries;
        assert_eq!(
            entries[0].settings_snapshot,
            Some(SettingsSnapshot {
                role_rate: Some(10.0),
                tax_rate: Some(15.0),
                ..Default::default()
            })
        );
        assert_eq!(entries[1].settings_snapshot, None);
    }

    #[test]
    fn test_backup_round_trip() {
        let service = ExportService::new();
        let mut settings = server_settings(3.0);
        settings.theme = Theme::Dark;
        let mut entry = shift("a", "2025-01-08");
        entry.settings_snapshot = Some(SettingsSnapshot::capture(&settings, "Server"));

        let json = service.export_backup(&settings, &[entry.clone()]).unwrap();
        assert!(json.contains("\"settingsSnapshot\""));
        assert!(json.contains("\"k401Rate\": 3.0"));

        let imported = service.import_backup(&json).unwrap();
        assert_eq!(imported.dropped_entries, 0);
        assert_eq!(imported.payload.settings, settings);
        assert_eq!(imported.payload.entries, vec![entry]);
    }

    #[test]
    fn test_import_sanitizes_entries() {
        let json = json!({
            "settings": {"taxRate": 15, "roles": {"Cook": 18}},
            "entries": [
                {"id": "ok", "date": "2025-01-08", "role": "Cook", "hours": 6, "tips": "12.5"},
                {"date": "2025-01-09", "role": "Cook", "hours": "4", "cashTips": null},
                {"id": "no-date", "role": "Cook", "hours": 6},
                {"id": "bad-date", "date": "someday", "role": "Cook", "hours": 6},
                {"id": "no-role", "date": "2025-01-08", "hours": 6},
                {"id": "bad-hours", "date": "2025-01-08", "role": "Cook", "hours": "lots"},
                {"id": "snap", "date": "2025-01-10", "role": "Cook", "hours": 2, "settingsSnapshot": "oops"},
                42
            ]
        })
        .to_string();

        let result = ExportService::new().import_backup(&json).unwrap();
        assert_eq!(result.dropped_entries, 5);

        let settings = &result.payload.settings;
        assert_eq!(settings.tax_rate, 15.0);
        assert_eq!(settings.k401_rate, 0.0);
        assert_eq!(settings.roles.len(), 1);

        let entries = &result.payload.entries;
        assert_eq!(entries.len(), 3);
        assert_eq!(entries[0].id, "ok");
        assert_eq!(entries[0].tips, 12.5);
        assert_eq!(entries[0].cash_tips, 0.0);

        assert!(Uuid::parse_str(&entries[1].id).is_ok());
        assert_eq!(entries[1].hours, 4.0);

        assert_eq!(entries[2].id, "snap");
        assert_eq!(entries[2].settings_snapshot, None);
    }

    #[test]
    fn test_import_without_settings_uses_defaults() {
        let result = ExportService::new().import_backup(r#"{"entries": []}"#).unwrap();
        assert_eq!(result.payload.settings, Settings::default());
        assert!(result.payload.entries.is_empty());
    }

    #[test]
    fn test_import_errors() {
        let service = ExportService::new();
        assert!(matches!(service.import_backup("{not json"), Err(ImportError::InvalidJson(_))));
        assert_eq!(service.import_backup("[1, 2]"), Err(ImportError::NotAnObject));
        assert!(matches!(
            service.import_backup(r#"{"settings": {"taxRate": "high"}}"#),
            Err(ImportError::InvalidSettings(_))
        ));
    }
}
