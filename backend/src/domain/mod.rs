//! # Domain Layer
//!
//! Business logic for the tip tracker. The calculation modules
//! (`pay_period`, `rates`, `calculators`, `paycheck_engine`,
//! `weekly_summary`, `ytd`) are pure functions over shared DTOs and never
//! touch storage. The services own persistence through a storage
//! `Connection` and are what the CLI talks to.

pub mod calculators;
pub mod entry_service;
pub mod errors;
pub mod export_service;
pub mod pay_period;
pub mod paycheck_engine;
pub mod rates;
pub mod settings_service;
pub mod weekly_summary;
pub mod ytd;

pub use entry_service::EntryService;
pub use errors::{EntryValidationError, ImportError, SettingsValidationError};
pub use export_service::ExportService;
pub use paycheck_engine::calculate_paycheck;
pub use rates::{resolve_rates, EffectiveRates};
pub use settings_service::SettingsService;
pub use weekly_summary::{aggregate_weeks, available_months, filter_weeks, MonthFilter};
pub use ytd::calculate_ytd;
