//! Typed validation errors raised at the entry/settings/import boundaries.
//!
//! The calculation core never fails; these only guard data on its way in.

use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Error)]
pub enum EntryValidationError {
    #[error("Role is required")]
    EmptyRole,
    #[error("Unknown role '{0}'. Add it to the role table first.")]
    UnknownRole(String),
    #[error("Hours must be greater than 0 (got {0})")]
    HoursNotPositive(f64),
    #[error("{field} must be zero or more (got {value})")]
    NegativeAmount { field: &'static str, value: f64 },
    #[error("{0} must be a finite number")]
    NotFinite(&'static str),
}

#[derive(Debug, Clone, PartialEq, Error)]
pub enum SettingsValidationError {
    #[error("Role name is required")]
    EmptyRoleName,
    #[error("{field} must be a finite number of zero or more (got {value})")]
    InvalidRate { field: &'static str, value: f64 },
}

#[derive(Debug, Clone, PartialEq, Error)]
pub enum ImportError {
    #[error("Backup is not valid JSON: {0}")]
    InvalidJson(String),
    #[error("Backup must be a JSON object with settings and entries")]
    NotAnObject,
    #[error("Backup settings are invalid: {0}")]
    InvalidSettings(String),
}
