//! Pre-tax deductions, taxable income and retirement contributions.

use super::percent_of;

/// Deductions taken before income tax
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct PreTaxDeductions {
    /// Traditional 401k. This is the single source of the k401 figure.
    pub k401: f64,
    pub other_deductions: f64,
    pub pre_tax_total: f64,
}

#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct RetirementContributions {
    /// Post-tax employee contribution
    pub roth401k: f64,
    /// Traditional + Roth; both come out of the paycheck
    pub total_contributions: f64,
    /// Informational only, never deducted from pay
    pub employer_match: f64,
    pub total_retirement: f64,
}

pub fn calculate_pre_tax(
    gross: f64,
    k401_rate: f64,
    other_deductions_rate: f64,
) -> PreTaxDeductions {
    let k401 = percent_of(gross, k401_rate);
    let other_deductions = percent_of(gross, other_deductions_rate);

    PreTaxDeductions {
        k401,
        other_deductions,
        pre_tax_total: k401 + other_deductions,
    }
}

/// Income subject to tax. Roth contributions are post-tax and do not reduce it.
pub fn calculate_taxable_income(gross: f64, pre_tax: &PreTaxDeductions) -> f64 {
    gross - pre_tax.pre_tax_total
}

/// Employee contributions and employer match.
///
/// The match is only paid while the employee contributes to either plan.
pub fn calculate_retirement(
    gross: f64,
    pre_tax: &PreTaxDeductions,
    k401_rate: f64,
    roth401k_rate: f64,
    employer_match_rate: f64,
) -> RetirementContributions {
    let roth401k = percent_of(gross, roth401k_rate);
    let total_contributions = pre_tax.k401 + roth401k;

    let contributing = k401_rate > 0.0 || roth401k_rate > 0.0;
    let employer_match = if contributing {
        percent_of(gross, employer_match_rate)
    } else {
        0.0
    };

    RetirementContributions {
        roth401k,
        total_contributions,
        employer_match,
        total_retirement: total_contributions + employer_match,
    }
}
