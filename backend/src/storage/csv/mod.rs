//! File-based storage: entries as CSV, settings as YAML.

pub mod connection;
pub mod entry_repository;
pub mod settings_repository;

#[cfg(test)]
pub mod test_utils;

pub use connection::CsvConnection;
pub use entry_repository::EntryRepository;
pub use settings_repository::SettingsRepository;
