use anyhow::{Context, Result};
use log::{debug, info};
use std::fs;
use std::path::{Path, PathBuf};

use super::entry_repository::EntryRepository;
use super::settings_repository::SettingsRepository;
use crate::storage::traits::Connection;

pub const ENTRIES_FILE: &str = "entries.csv";
pub const SETTINGS_FILE: &str = "settings.yaml";
const DEFAULT_DIRECTORY_NAME: &str = "Tip Tracker";

/// Header row of `entries.csv`
pub const ENTRIES_HEADER: [&str; 12] = [
    "id",
    "date",
    "role",
    "hours",
    "tips",
    "cash_tips",
    "tip_outs",
    "snapshot_role_rate",
    "snapshot_k401_rate",
    "snapshot_roth401k_rate",
    "snapshot_employer_match",
    "snapshot_tax_rate",
];

/// CsvConnection manages the data directory and the files inside it
#[derive(Clone, Debug)]
pub struct CsvConnection {
    base_directory: PathBuf,
}

impl CsvConnection {
    /// Create a new connection rooted at `base_directory`, creating it if needed
    pub fn new<P: AsRef<Path>>(base_directory: P) -> Result<Self> {
        let base_path = base_directory.as_ref().to_path_buf();

        if !base_path.exists() {
            fs::create_dir_all(&base_path).with_context(|| {
                format!("Failed to create data directory {}", base_path.display())
            })?;
            info!("Created data directory {}", base_path.display());
        }

        Ok(Self {
            base_directory: base_path,
        })
    }

    /// Create a connection in the platform data directory (e.g. ~/.local/share/Tip Tracker)
    pub fn new_default() -> Result<Self> {
        Self::new(Self::default_data_directory()?)
    }

    pub fn default_data_directory() -> Result<PathBuf> {
        let data_dir = dirs::data_dir()
            .or_else(dirs::home_dir)
            .ok_or_else(|| anyhow::anyhow!("Could not determine a data directory"))?;
        Ok(data_dir.join(DEFAULT_DIRECTORY_NAME))
    }

    pub fn base_directory(&self) -> &Path {
        &self.base_directory
    }

    pub fn entries_file_path(&self) -> PathBuf {
        self.base_directory.join(ENTRIES_FILE)
    }

    pub fn settings_file_path(&self) -> PathBuf {
        self.base_directory.join(SETTINGS_FILE)
    }

    /// Ensure `entries.csv` exists with its header row
    pub fn ensure_entries_file_exists(&self) -> Result<()> {
        let file_path = self.entries_file_path();
        if !file_path.exists() {
            let header = format!("{}\n", ENTRIES_HEADER.join(","));
            fs::write(&file_path, header)?;
            debug!("Created {}", file_path.display());
        }
        Ok(())
    }

    /// Write through a temp file and rename, so readers never see a partial file
    pub fn write_atomically(&self, path: &Path, contents: &[u8]) -> Result<()> {
        let temp_path = path.with_extension("tmp");
        fs::write(&temp_path, contents)
            .with_context(|| format!("Failed to write {}", temp_path.display()))?;
        fs::rename(&temp_path, path)
            .with_context(|| format!("Failed to move {} into place", path.display()))?;
        Ok(())
    }
}

impl Connection for CsvConnection {
    type EntryRepository = EntryRepository;
    type SettingsRepository = SettingsRepository;

    fn create_entry_repository(&self) -> Self::EntryRepository {
        EntryRepository::new(self.clone())
    }

    fn create_settings_repository(&self) -> Self::SettingsRepository {
        SettingsRepository::new(self.clone())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_new_creates_missing_directory() {
        let temp_dir = TempDir::new().unwrap();
        let nested = temp_dir.path().join("a").join("b");

        let connection = CsvConnection::new(&nested).unwrap();
        assert!(nested.exists());
        assert_eq!(connection.entries_file_path(), nested.join("entries.csv"));
        assert_eq!(connection.settings_file_path(), nested.join("settings.yaml"));
    }

    #[test]
    fn test_ensure_entries_file_writes_header_once() {
        let temp_dir = TempDir::new().unwrap();
        let connection = CsvConnection::new(temp_dir.path()).unwrap();

        connection.ensure_entries_file_exists().unwrap();
        fs::write(connection.entries_file_path(), "custom\n").unwrap();
        connection.ensure_entries_file_exists().unwrap();

        let contents = fs::read_to_string(connection.entries_file_path()).unwrap();
        assert_eq!(contents, "custom\n");
    }

    #[test]
    fn test_write_atomically_leaves_no_temp_file() {
        let temp_dir = TempDir::new().unwrap();
        let connection = CsvConnection::new(temp_dir.path()).unwrap();
        let target = temp_dir.path().join("settings.yaml");

        connection.write_atomically(&target, b"taxRate: 20\n").unwrap();

        assert_eq!(fs::read_to_string(&target).unwrap(), "taxRate: 20\n");
        assert!(!target.with_extension("tmp").exists());
    }
}
