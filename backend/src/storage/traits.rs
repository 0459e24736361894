//! # Storage Traits
//!
//! Storage abstraction traits so the domain layer can run against any backend
//! offering get/put/clear/bulk-list semantics.

use anyhow::Result;
use shared::{Entry, Settings};

/// Storage operations for work entries
pub trait EntryStorage: Send + Sync {
    /// Store an entry, replacing any entry with the same ID
    fn store_entry(&self, entry: &Entry) -> Result<()>;

    /// Retrieve a specific entry by ID
    fn get_entry(&self, entry_id: &str) -> Result<Option<Entry>>;

    /// List every stored entry in storage order
    fn list_entries(&self) -> Result<Vec<Entry>>;

    /// Replace the whole entry set in one write
    fn replace_entries(&self, entries: &[Entry]) -> Result<()>;

    /// Delete a single entry.
    /// Returns true if the entry was found and deleted, false otherwise
    fn delete_entry(&self, entry_id: &str) -> Result<bool>;

    /// Remove every entry
    fn clear_entries(&self) -> Result<()>;
}

/// Storage operations for the settings singleton
pub trait SettingsStorage: Send + Sync {
    /// Load stored settings, or None if nothing has been saved yet
    fn load_settings(&self) -> Result<Option<Settings>>;

    fn save_settings(&self, settings: &Settings) -> Result<()>;

    fn clear_settings(&self) -> Result<()>;
}

/// Factory for repositories sharing one storage location.
///
/// Services are generic over this trait so they never name a concrete backend.
pub trait Connection: Send + Sync + Clone {
    type EntryRepository: EntryStorage;
    type SettingsRepository: SettingsStorage;

    fn create_entry_repository(&self) -> Self::EntryRepository;

    fn create_settings_repository(&self) -> Self::SettingsRepository;
}
