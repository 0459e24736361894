//! Net paycheck, net cash and take-home.

use shared::Entry;
use super::{FicaWithholding, PreTaxDeductions, RetirementContributions};

/// Gross minus everything withheld: pre-tax deductions, Roth, and taxes.
/// The employer match is not withheld.
pub fn calculate_net_income(
    gross: f64,
    pre_tax: &PreTaxDeductions,
    retirement: &RetirementContributions,
    fica: &FicaWithholding,
    federal_tax: f64,
    state_tax: f64,
) -> f64 {
    let total_deductions =
        pre_tax.pre_tax_total + retirement.roth401k + fica.fica_total + federal_tax + state_tax;
    gross - total_deductions
}

/// Cash tips kept after tipping out support staff. Can be negative.
pub fn calculate_cash_net(entry: &Entry) -> f64 {
    entry.cash_tips - entry.tip_outs
}

pub fn calculate_take_home(net_income: f64, cash_net: f64) -> f64 {
    net_income + cash_net
}
