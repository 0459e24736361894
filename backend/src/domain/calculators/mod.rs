//! Per-entry paycheck calculators.
//!
//! Each calculator is a pure function over plain `f64` values and returns a new
//! value; nothing here rounds. The paycheck engine chains them in a fixed order
//! (see `paycheck_engine`).

pub mod deductions;
pub mod gross;
pub mod net;
pub mod taxes;

pub use deductions::*;
pub use gross::*;
pub use net::*;
pub use taxes::*;

/// `amount × rate%`
pub(crate) fn percent_of(amount: f64, rate: f64) -> f64 {
    amount * (rate / 100.0)
}

#[cfg(test)]
pub(crate) fn assert_close(actual: f64, expected: f64) {
    assert!(
        (actual - expected).abs() < 1e-9,
        "expected {expected}, got {actual}"
    );
}
