//! Gross pay: wages plus credit-card tips.

use shared::Entry;

#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct GrossPay {
    pub gross: f64,
    pub hourly_pay: f64,
    pub tips: f64,
}

/// `hourly_pay = hours × role_rate`, `gross = hourly_pay + tips`.
///
/// Cash tips are not payroll income and are handled by `calculate_cash_net`.
pub fn calculate_gross(entry: &Entry, role_rate: f64) -> GrossPay {
    let hourly_pay = entry.hours * role_rate;
    let tips = entry.tips;

    GrossPay {
        gross: hourly_pay + tips,
        hourly_pay,
        tips,
    }
}
