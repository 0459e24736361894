//! # YAML Settings Repository
//!
//! The settings singleton lives in `{data_dir}/settings.yaml`. Fields missing
//! from the file (older versions, hand edits) take their default values.

use anyhow::{Context, Result};
use log::{debug, info};
use std::fs;

use super::connection::CsvConnection;
use crate::storage::SettingsStorage;
use shared::{PartialSettings, Settings};

#[derive(Clone)]
pub struct SettingsRepository {
    connection: CsvConnection,
}

impl SettingsRepository {
    pub fn new(connection: CsvConnection) -> Self {
        Self { connection }
    }
}

impl SettingsStorage for SettingsRepository {
    fn load_settings(&self) -> Result<Option<Settings>> {
        let yaml_path = self.connection.settings_file_path();

        if !yaml_path.exists() {
            debug!("No settings file at {}", yaml_path.display());
            return Ok(None);
        }

        let yaml_content = fs::read_to_string(&yaml_path)
            .with_context(|| format!("Failed to read {}", yaml_path.display()))?;
        let partial: PartialSettings = serde_yaml::from_str(&yaml_content)
            .with_context(|| format!("Failed to parse {}", yaml_path.display()))?;

        debug!("Loaded settings from {}", yaml_path.display());
        Ok(Some(Settings::from_partial(partial)))
    }

    fn save_settings(&self, settings: &Settings) -> Result<()> {
        let yaml_path = self.connection.settings_file_path();
        let yaml_content = serde_yaml::to_string(settings)?;

        self.connection
            .write_atomically(&yaml_path, yaml_content.as_bytes())?;

        debug!("Saved settings to {}", yaml_path.display());
        Ok(())
    }

    fn clear_settings(&self) -> Result<()> {
        let yaml_path = self.connection.settings_file_path();
        if yaml_path.exists() {
            fs::remove_file(&yaml_path)?;
            info!("Removed {}", yaml_path.display());
        }
        Ok(())
    }
}
