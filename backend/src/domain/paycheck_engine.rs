//! Paycheck engine: one entry in, one full breakdown out.
//!
//! The pipeline order is fixed:
//! gross → pre-tax → taxable income → {FICA, federal, state} → retirement →
//! net income → cash net → take-home.
//! Taxable income needs the pre-tax deductions, and net income needs every tax
//! and retirement figure, so the steps cannot be reordered.

use shared::{Entry, PaycheckBreakdown, Settings};

use crate::domain::calculators::{
    calculate_cash_net, calculate_federal, calculate_fica, calculate_gross, calculate_net_income,
    calculate_pre_tax, calculate_retirement, calculate_state, calculate_take_home,
    calculate_taxable_income,
};
use crate::domain::rates::resolve_rates;

/// Calculate the complete paycheck for `entry`.
///
/// Rates come from the entry's snapshot where present, so recomputing an old
/// entry gives the same answer after settings change. Entries without a
/// snapshot use `settings`.
pub fn calculate_paycheck(entry: &Entry, settings: &Settings) -> PaycheckBreakdown {
    let rates = resolve_rates(entry, settings);

    let gross = calculate_gross(entry, rates.role_rate);
    let pre_tax = calculate_pre_tax(gross.gross, rates.k401_rate, rates.other_deductions);
    let taxable_income = calculate_taxable_income(gross.gross, &pre_tax);
    let fica = calculate_fica(taxable_income);
    let federal_tax = calculate_federal(taxable_income, rates.tax_rate);
    let state_tax = calculate_state(taxable_income, &rates);
    let retirement = calculate_retirement(
        gross.gross,
        &pre_tax,
        rates.k401_rate,
        rates.roth401k_rate,
        rates.employer_match,
    );
    let net_income =
        calculate_net_income(gross.gross, &pre_tax, &retirement, &fica, federal_tax, state_tax);
    let cash_net = calculate_cash_net(entry);
    let take_home = calculate_take_home(net_income, cash_net);

    PaycheckBreakdown {
        hourly_pay: gross.hourly_pay,
        tips: gross.tips,
        gross: gross.gross,
        k401: pre_tax.k401,
        other_deductions: pre_tax.other_deductions,
        pre_tax_total: pre_tax.pre_tax_total,
        taxable_income,
        social_security: fica.social_security,
        medicare: fica.medicare,
        fica_total: fica.fica_total,
        federal_tax,
        state_tax,
        roth401k: retirement.roth401k,
        total_contributions: retirement.total_contributions,
        employer_match: retirement.employer_match,
        total_retirement: retirement.total_retirement,
        net_income,
        cash_net,
        take_home,
    }
}
