//! Test environment with automatic cleanup.
//!
//! The data directory is a `TempDir`, so test data is removed even if a test
//! panics.

use anyhow::Result;
use chrono::NaiveDate;
use std::path::PathBuf;
use tempfile::TempDir;

use super::connection::CsvConnection;
use super::entry_repository::EntryRepository;
use super::settings_repository::SettingsRepository;
use shared::Entry;

pub struct TestEnvironment {
    /// Kept alive until drop
    _temp_dir: TempDir,
    pub connection: CsvConnection,
    pub base_path: PathBuf,
}

impl TestEnvironment {
    pub fn new() -> Result<Self> {
        let temp_dir = TempDir::new()?;
        let base_path = temp_dir.path().to_path_buf();
        let connection = CsvConnection::new(&base_path)?;

        Ok(TestEnvironment {
            _temp_dir: temp_dir,
            connection,
            base_path,
        })
    }

    pub fn entry_repository(&self) -> EntryRepository {
        EntryRepository::new(self.connection.clone())
    }

    pub fn settings_repository(&self) -> SettingsRepository {
        SettingsRepository::new(self.connection.clone())
    }
}

/// An 8-hour Server shift on `date` (YYYY-MM-DD) with no snapshot
pub fn sample_entry(id: &str, date: &str) -> Entry {
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
