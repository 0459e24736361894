//! Settings service: the one place settings are read and changed.
//!
//! Edits only affect entries without a snapshot; every entry logged through
//! `EntryService` keeps the rates it was created with.

use anyhow::Result;
use log::info;
use std::sync::Arc;

use crate::domain::errors::SettingsValidationError;
use crate::storage::{Connection, SettingsStorage};
use shared::{Settings, Theme, UpdateRatesRequest};

pub struct SettingsService<C: Connection> {
    settings_repository: C::SettingsRepository,
}

impl<C: Connection> SettingsService<C> {
    pub fn new(connection: Arc<C>) -> Self {
        Self {
            settings_repository: connection.create_settings_repository(),
        }
    }

    /// Current settings, or defaults if none have been saved
    pub fn get_settings(&self) -> Result<Settings> {
        Ok(self.settings_repository.load_settings()?.unwrap_or_default())
    }

    pub fn save_settings(&self, settings: &Settings) -> Result<()> {
        self.settings_repository.save_settings(settings)
    }

    /// Apply every rate present in `request`; nothing is saved if any rate is invalid
    pub fn update_rates(&self, request: UpdateRatesRequest) -> Result<Settings> {
        let mut settings = self.get_settings()?;

        let updates = [
            ("Tax rate", request.tax_rate, &mut settings.tax_rate),
            ("401k rate", request.k401_rate, &mut settings.k401_rate),
            ("Roth 401k rate", request.roth401k_rate, &mut settings.roth401k_rate),
            ("Employer match", request.employer_match, &mut settings.employer_match),
            ("Other deductions", request.other_deductions, &mut settings.other_deductions),
        ];
        for (field, value, target) in updates {
            if let Some(value) = value {
                validate_rate(field, value)?;
                *target = value;
            }
        }

        self.settings_repository.save_settings(&settings)?;
        info!(
            "Updated rates: tax={}%, 401k={}%, roth={}%, match={}%, other={}%",
            settings.tax_rate,
            settings.k401_rate,
            settings.roth401k_rate,
            settings.employer_match,
            settings.other_deductions
        );
        Ok(settings)
    }

    pub fn set_theme(&self, theme: Theme) -> Result<Settings> {
        let mut settings = self.get_settings()?;
        settings.theme = theme;
        self.settings_repository.save_settings(&settings)?;
        info!("Theme set to {}", theme);
        Ok(settings)
    }

    /// Add a role or change its hourly rate
    pub fn upsert_role(&self, name: &str, rate: f64) -> Result<Settings> {
        let name = name.trim();
        if name.is_empty() {
            return Err(SettingsValidationError::EmptyRoleName.into());
        }
        validate_rate("Hourly rate", rate)?;

        let mut settings = self.get_settings()?;
        let previous = settings.roles.insert(name.to_string(), rate);
        self.settings_repository.save_settings(&settings)?;

        match previous {
            Some(old_rate) => info!(
                "Role '{}' rate changed from {:.2} to {:.2}",
                name, old_rate, rate
            ),
            None => info!("Added role '{}' at {:.2}/hr", name, rate),
        }
        Ok(settings)
    }

    /// Remove a role. Returns false if it did not exist.
    ///
    /// Existing entries for the role keep their snapshot rate.
    pub fn remove_role(&self, name: &str) -> Result<bool> {
        let mut settings = self.get_settings()?;
        if settings.roles.remove(name.trim()).is_none() {
            return Ok(false);
        }

        self.settings_repository.save_settings(&settings)?;
        info!("Removed role '{}'", name.trim());
        Ok(true)
    }

    /// Restore default settings
    pub fn reset(&self) -> Result<Settings> {
        self.settings_repository.clear_settings()?;
        let settings = Settings::default();
        self.settings_repository.save_settings(&settings)?;
        info!("Settings reset to defaults");
        Ok(settings)
    }
}

fn validate_rate(field: &'static str, value: f64) -> Result<(), SettingsValidationError> {
    if value.is_finite() && value >= 0.0 {
        Ok(())
    } else {
        Err(SettingsValidationError::InvalidRate { field, value })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::storage::CsvConnection;
    use tempfile::TempDir;

    fn create_test_service() -> (SettingsService<CsvConnection>, TempDir) {
        let temp_dir = TempDir::new().unwrap();
        let connection = Arc::new(CsvConnection::new(temp_dir.path()).unwrap());
        (SettingsService::new(connection), temp_dir)
    }

    #[test]
    fn test_defaults_before_first_save() {
        let (service, _temp_dir) = create_test_service();
        assert_eq!(service.get_settings().unwrap(), Settings::default());
    }

    #[test]
    fn test_update_rates_only_touches_given_fields() {
        let (service, _temp_dir) = create_test_service();

        let updated = service
            .update_rates(UpdateRatesRequest {
                k401_rate: Some(5.0),
                employer_match: Some(3.0),
                ..Default::default()
            })
            .unwrap();

        assert_eq!(updated.k401_rate, 5.0);
        assert_eq!(updated.employer_match, 3.0);
        assert_eq!(updated.tax_rate, 20.0);
        assert_eq!(service.get_settings().unwrap(), updated);
    }

    #[test]
    fn test_invalid_rate_saves_nothing() {
        let (service, _temp_dir) = create_test_service();

        let err = service
            .update_rates(UpdateRatesRequest {
                tax_rate: Some(25.0),
                k401_rate: Some(-1.0),
                ..Default::default()
            })
            .unwrap_err();

        assert_eq!(
            err.downcast_ref::<SettingsValidationError>(),
            Some(&SettingsValidationError::InvalidRate { field: "401k rate", value: -1.0 })
        );
        assert_eq!(service.get_settings().unwrap().tax_rate, 20.0);
    }

    #[test]
    fn test_upsert_and_remove_role() {
        let (service, _temp_dir) = create_test_service();

        let settings = service.upsert_role("  Barback ", 12.0).unwrap();
        assert_eq!(settings.roles.get("Barback"), Some(&12.0));

        let settings = service.upsert_role("Server", 11.5).unwrap();
        assert_eq!(settings.roles.get("Server"), Some(&11.5));

        assert!(service.remove_role("Barback").unwrap());
        assert!(!service.remove_role("Barback").unwrap());
        assert!(!service.get_settings().unwrap().roles.contains_key("Barback"));
    }

    #[test]
    fn test_role_validation() {
        let (service, _temp_dir) = create_test_service();

        let err = service.upsert_role("   ", 10.0).unwrap_err();
        assert_eq!(
            err.downcast_ref::<SettingsValidationError>(),
            Some(&SettingsValidationError::EmptyRoleName)
        );
        assert!(service.upsert_role("Cook", f64::NAN).is_err());
    }

    #[test]
    fn test_theme_and_reset() {
        let (service, _temp_dir) = create_test_service();

        assert_eq!(service.set_theme(Theme::Dark).unwrap().theme, Theme::Dark);
        service.upsert_role("Cook", 18.0).unwrap();

        let settings = service.reset().unwrap();
        assert_eq!(settings, Settings::default());
        assert_eq!(service.get_settings().unwrap(), Settings::default());
    }
}
