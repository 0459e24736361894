//! # CSV Entry Repository
//!
//! Entries live in `{data_dir}/entries.csv`, one row per shift. A settings
//! snapshot is flattened into five optional `snapshot_*` columns; an entry
//! whose snapshot columns are all empty has no snapshot.

use anyhow::{Context, Result};
use chrono::NaiveDate;
use log::{debug, info};
use serde::{Deserialize, Serialize};
use std::fs::File;
use std::io::BufReader;

use super::connection::CsvConnection;
use crate::storage::EntryStorage;
use shared::{Entry, SettingsSnapshot};

/// One row of `entries.csv`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
struct EntryRecord {
    id: String,
    date: NaiveDate,
    role: String,
    hours: f64,
    tips: f64,
    cash_tips: f64,
    tip_outs: f64,
    snapshot_role_rate: Option<f64>,
    snapshot_k401_rate: Option<f64>,
    snapshot_roth401k_rate: Option<f64>,
    snapshot_employer_match: Option<f64>,
    snapshot_tax_rate: Option<f64>,
}

impl From<&Entry> for EntryRecord {
    fn from(entry: &Entry) -> Self {
        let snapshot = entry.settings_snapshot.clone().unwrap_or_default();
        Self {
            id: entry.id.clone(),
            date: entry.date,
            role: entry.role.clone(),
            hours: entry.hours,
            tips: entry.tips,
            cash_tips: entry.cash_tips,
            tip_outs: entry.tip_outs,
            snapshot_role_rate: snapshot.role_rate,
            snapshot_k401_rate: snapshot.k401_rate,
            snapshot_roth401k_rate: snapshot.roth401k_rate,
            snapshot_employer_match: snapshot.employer_match,
            snapshot_tax_rate: snapshot.tax_rate,
        }
    }
}

impl From<EntryRecord> for Entry {
    fn from(record: EntryRecord) -> Self {
        let snapshot = SettingsSnapshot {
            role_rate: record.snapshot_role_rate,
            k401_rate: record.snapshot_k401_rate,
            roth401k_rate: record.snapshot_roth401k_rate,
            employer_match: record.snapshot_employer_match,
            tax_rate: record.snapshot_tax_rate,
        };
        let settings_snapshot = (snapshot != SettingsSnapshot::default()).then_some(snapshot);

        Self {
            id: record.id,
            date: record.date,
            role: record.role,
            hours: record.hours,
            tips: record.tips,
            cash_tips: record.cash_tips,
            tip_outs: record.tip_outs,
            settings_snapshot,
        }
    }
}

/// CSV-based entry repository
#[derive(Clone)]
pub struct EntryRepository {
    connection: CsvConnection,
}

impl EntryRepository {
    pub fn new(connection: CsvConnection) -> Self {
        Self { connection }
    }

    /// Read all entries from `entries.csv`
    fn read_entries(&self) -> Result<Vec<Entry>> {
        self.connection.ensure_entries_file_exists()?;

        let file_path = self.connection.entries_file_path();
        let file = File::open(&file_path)
            .with_context(|| format!("Failed to open {}", file_path.display()))?;
        let mut csv_reader = ::csv::Reader::from_reader(BufReader::new(file));

        let mut entries = Vec::new();
        for (index, result) in csv_reader.deserialize::<EntryRecord>().enumerate() {
            // Row 1 is the header
            let record = result.with_context(|| {
                format!("Malformed row {} in {}", index + 2, file_path.display())
            })?;
            entries.push(Entry::from(record));
        }

        debug!("Read {} entries from {}", entries.len(), file_path.display());
        Ok(entries)
    }

    /// Write all entries to `entries.csv`, replacing its contents
    fn write_entries(&self, entries: &[Entry]) -> Result<()> {
        let mut csv_writer = ::csv::WriterBuilder::new()
            .has_headers(false)
            .from_writer(Vec::new());

        // Written by hand so an empty store still carries its header
        csv_writer.write_record(super::connection::ENTRIES_HEADER)?;
        for entry in entries {
            csv_writer.serialize(EntryRecord::from(entry))?;
        }

        let contents = csv_writer
            .into_inner()
            .map_err(|e| anyhow::anyhow!("Failed to flush entries CSV: {}", e))?;

        let file_path = self.connection.entries_file_path();
        self.connection.write_atomically(&file_path, &contents)?;

        debug!("Wrote {} entries to {}", entries.len(), file_path.display());
        Ok(())
    }
}

impl EntryStorage for EntryRepository {
    fn store_entry(&self, entry: &Entry) -> Result<()> {
        let mut entries = self.read_entries()?;

        match entries.iter_mut().find(|existing| existing.id == entry.id) {
            Some(existing) => *existing = entry.clone(),
            None => entries.push(entry.clone()),
        }

        self.write_entries(&entries)
    }

    fn get_entry(&self, entry_id: &str) -> Result<Option<Entry>> {
        let entries = self.read_entries()?;
        Ok(entries.into_iter().find(|entry| entry.id == entry_id))
    }

    fn list_entries(&self) -> Result<Vec<Entry>> {
        self.read_entries()
    }

    fn replace_entries(&self, entries: &[Entry]) -> Result<()> {
        info!("Replacing stored entries with {} entries", entries.len());
        self.write_entries(entries)
    }

    fn delete_entry(&self, entry_id: &str) -> Result<bool> {
        let mut entries = self.read_entries()?;
        let original_len = entries.len();
        entries.retain(|entry| entry.id != entry_id);

        if entries.len() == original_len {
            return Ok(false);
        }

        self.write_entries(&entries)?;
        Ok(true)
    }

    fn clear_entries(&self) -> Result<()> {
        info!("Clearing all stored entries");
        self.write_entries(&[])
    }
}
