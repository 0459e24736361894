//! # Tip Tracker Backend
//!
//! Domain services and file storage for tracking shifts, tips and the
//! paychecks they produce. The backend is synchronous and desktop-only:
//! - `domain` holds the pure calculation core plus the services that use it
//! - `storage` keeps entries and settings in a local data directory
//! - [`Backend`] wires the services to one data directory for the CLI

use anyhow::Result;
use log::info;
use std::path::PathBuf;
use std::sync::Arc;

pub mod domain;
pub mod storage;

pub use storage::csv::CsvConnection;

use domain::{
    aggregate_weeks, available_months, calculate_paycheck, calculate_ytd, filter_weeks,
    EntryService, ExportService, MonthFilter, SettingsService,
};
use shared::{
    Entry, ExportCsvResponse, ImportBackupResult, PaycheckBreakdown, WeekSummary, YtdSummary,
};

/// Main backend struct that owns the storage connection and every service
pub struct Backend {
    pub connection: Arc<CsvConnection>,
    pub settings_service: Arc<SettingsService<CsvConnection>>,
    pub entry_service: EntryService<CsvConnection>,
    pub export_service: ExportService,
}

impl Backend {
    /// Open the backend on `data_dir`, or the platform default when `None`.
    ///
    /// Entries saved without a settings snapshot get one on open.
    pub fn open(data_dir: Option<PathBuf>) -> Result<Self> {
        let connection = match data_dir {
            Some(dir) => CsvConnection::new(dir)?,
            None => CsvConnection::new_default()?,
        };
        let connection = Arc::new(connection);
        info!("Opening tip tracker data in {}", connection.base_directory().display());

        let settings_service = Arc::new(SettingsService::new(connection.clone()));
        let entry_service = EntryService::new(connection.clone(), settings_service.clone());
        let export_service = ExportService::new();

        let backend = Backend {
            connection,
            settings_service,
            entry_service,
            export_service,
        };
        backend.entry_service.backfill_snapshots()?;
        Ok(backend)
    }

    /// Weekly summaries, newest first, limited to weeks touching `filter`
    pub fn weeks(&self, filter: &MonthFilter) -> Result<Vec<WeekSummary>> {
        let settings = self.settings_service.get_settings()?;
        let entries = self.entry_service.list_entries()?;
        let weeks = aggregate_weeks(&entries, &settings);
        Ok(filter_weeks(&weeks, filter))
    }

    /// Month keys that have at least one week, newest first
    pub fn months(&self) -> Result<Vec<String>> {
        Ok(available_months(&self.weeks(&MonthFilter::All)?))
    }

    pub fn ytd(&self) -> Result<YtdSummary> {
        Ok(calculate_ytd(&self.weeks(&MonthFilter::All)?))
    }

    pub fn paycheck(&self, entry_id: &str) -> Result<Option<(Entry, PaycheckBreakdown)>> {
        let Some(entry) = self.entry_service.get_entry(entry_id)? else {
            return Ok(None);
        };
        let settings = self.settings_service.get_settings()?;
        let paycheck = calculate_paycheck(&entry, &settings);
        Ok(Some((entry, paycheck)))
    }

    pub fn export_csv(&self) -> Result<ExportCsvResponse> {
        let settings = self.settings_service.get_settings()?;
        let entries = self.entry_service.list_entries()?;
        self.export_service.export_csv(&entries, &settings)
    }

    pub fn export_backup(&self) -> Result<String> {
        let settings = self.settings_service.get_settings()?;
        let entries = self.entry_service.list_entries()?;
        self.export_service.export_backup(&settings, &entries)
    }

    /// Replace all settings and entries with the contents of a JSON backup
    pub fn restore_backup(&self, json: &str) -> Result<ImportBackupResult> {
        let result = self.export_service.import_backup(json)?;

        self.settings_service.save_settings(&result.payload.settings)?;
        self.entry_service.replace_all(&result.payload.entries)?;
        self.entry_service.backfill_snapshots()?;

        info!(
            "Restored backup: {} entries ({} dropped)",
            result.payload.entries.len(),
            result.dropped_entries
        );
        Ok(result)
    }

    /// Delete every entry and put settings back to defaults
    pub fn reset_all(&self) -> Result<()> {
        self.entry_service.clear()?;
        self.settings_service.reset()?;
        info!("Reset all data");
        Ok(())
    }
}
