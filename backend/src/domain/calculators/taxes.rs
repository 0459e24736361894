//! Withholding estimates.
//!
//! These are flat-rate placeholders, not bracket-accurate withholding.

use crate::domain::rates::EffectiveRates;
use super::percent_of;

#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct FicaWithholding {
    pub social_security: f64,
    pub medicare: f64,
    pub fica_total: f64,
}

/// Social Security and Medicare. Currently folded into the flat tax rate, so zero.
// TODO: Social Security 6.2% up to the annual wage base, Medicare 1.45% plus the 0.9% surtax
pub fn calculate_fica(_taxable_income: f64) -> FicaWithholding {
    FicaWithholding::default()
}

/// Flat `taxable_income × tax_rate%`
pub fn calculate_federal(taxable_income: f64, tax_rate: f64) -> f64 {
    percent_of(taxable_income, tax_rate)
}

/// State withholding slot. No state rate is configurable yet, so this is zero.
pub fn calculate_state(_taxable_income: f64, _rates: &EffectiveRates) -> f64 {
    0.0
}
