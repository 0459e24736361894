//! Entry service: logging shifts and keeping their snapshots in place.

use anyhow::Result;
use log::{info, warn};
use std::sync::Arc;
use uuid::Uuid;

use crate::domain::errors::EntryValidationError;
use crate::domain::settings_service::SettingsService;
use crate::storage::{Connection, EntryStorage};
use shared::{CreateEntryRequest, Entry, Settings, SettingsSnapshot};

pub struct EntryService<C: Connection> {
    entry_repository: C::EntryRepository,
    settings_service: Arc<SettingsService<C>>,
}

impl<C: Connection> EntryService<C> {
    pub fn new(connection: Arc<C>, settings_service: Arc<SettingsService<C>>) -> Self {
        Self {
            entry_repository: connection.create_entry_repository(),
            settings_service,
        }
    }

    /// Validate and store a new entry with a snapshot of the current rates
    pub fn create_entry(&self, request: CreateEntryRequest) -> Result<Entry> {
        let settings = self.settings_service.get_settings()?;
        validate_request(&request, &settings)?;

        let role = request.role.trim().to_string();
        let entry = Entry {
            id: Uuid::new_v4().to_string(),
            date: request.date,
            settings_snapshot: Some(SettingsSnapshot::capture(&settings, &role)),
            role,
            hours: request.hours,
            tips: request.tips,
            cash_tips: request.cash_tips,
            tip_outs: request.tip_outs,
        };

        self.entry_repository.store_entry(&entry)?;
        info!(
            "Created entry {} on {}: {} {}h",
            entry.id, entry.date, entry.role, entry.hours
        );
        Ok(entry)
    }

    pub fn get_entry(&self, entry_id: &str) -> Result<Option<Entry>> {
        self.entry_repository.get_entry(entry_id)
    }

    /// All entries, oldest first
    pub fn list_entries(&self) -> Result<Vec<Entry>> {
        let mut entries = self.entry_repository.list_entries()?;
        entries.sort_by(|a, b| a.date.cmp(&b.date));
        Ok(entries)
    }

    pub fn delete_entry(&self, entry_id: &str) -> Result<bool> {
        let deleted = self.entry_repository.delete_entry(entry_id)?;
        if deleted {
            info!("Deleted entry {}", entry_id);
        } else {
            warn!("Entry not found for deletion: {}", entry_id);
        }
        Ok(deleted)
    }

    /// Give every entry without a snapshot one captured from current settings.
    ///
    /// Returns how many entries were updated; storage is only written when
    /// that is non-zero.
    pub fn backfill_snapshots(&self) -> Result<usize> {
        let settings = self.settings_service.get_settings()?;
        let mut entries = self.entry_repository.list_entries()?;

        let mut updated = 0;
        for entry in entries.iter_mut().filter(|e| e.settings_snapshot.is_none()) {
            entry.settings_snapshot = Some(SettingsSnapshot::capture(&settings, &entry.role));
            updated += 1;
        }

        if updated > 0 {
            self.entry_repository.replace_entries(&entries)?;
            info!("Backfilled settings snapshots on {} entries", updated);
        }
        Ok(updated)
    }

    /// Replace every stored entry, e.g. when restoring a backup
    pub fn replace_all(&self, entries: &[Entry]) -> Result<()> {
        self.entry_repository.replace_entries(entries)
    }

    pub fn clear(&self) -> Result<()> {
        self.entry_repository.clear_entries()
    }
}

fn validate_request(
    request: &CreateEntryRequest,
    settings: &Settings,
) -> Result<(), EntryValidationError> {
    let role = request.role.trim();
    if role.is_empty() {
        return Err(EntryValidationError::EmptyRole);
    }
    if !settings.roles.contains_key(role) {
        return Err(EntryValidationError::UnknownRole(role.to_string()));
    }

    if !request.hours.is_finite() {
        return Err(EntryValidationError::NotFinite("Hours"));
    }
    if request.hours <= 0.0 {
        return Err(EntryValidationError::HoursNotPositive(request.hours));
    }

    let amounts = [
        ("Credit tips", request.tips),
        ("Cash tips", request.cash_tips),
        ("Tip-outs", request.tip_outs),
    ];
    for (field, value) in amounts {
        if !value.is_finite() {
            return Err(EntryValidationError::NotFinite(field));
        }
        if value < 0.0 {
            return Err(EntryValidationError::NegativeAmount { field, value });
        }
    }

    Ok(())
}
