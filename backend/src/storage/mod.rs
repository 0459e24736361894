//! # Storage Module
//!
//! Persistence for entries and settings. The domain layer only talks to the
//! traits in [`traits`]; the file-backed implementation in [`csv`] keeps
//! entries in `entries.csv` and settings in `settings.yaml` under one data
//! directory.
//!
//! All operations are synchronous.

pub mod traits;
pub mod csv;

pub use traits::*;
pub use csv::CsvConnection;
