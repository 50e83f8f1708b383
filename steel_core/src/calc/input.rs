//! Formula arguments that may be a raw number or an upstream quantity.

use super::log::CalcLog;
use super::quantity::Quantity;
use crate::errors::CalcResult;

/// Argument to a formula function.
///
/// A raw number is wrapped as a new, documented input when the function
/// resolves it. A derived quantity is reused as-is so an upstream result is
/// not described twice in the log.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum NumericInput<'a> {
    Raw(f64),
    Derived(&'a Quantity),
}

impl<'a> NumericInput<'a> {
    /// Resolve into a quantity, logging raw values as inputs.
    pub fn resolve(
        self,
        log: &mut CalcLog,
        symbol: &str,
        unit: Option<&str>,
        description: &str,
    ) -> CalcResult<Quantity> {
        match self {
            NumericInput::Raw(value) => log.input(symbol, value, unit, description),
            NumericInput::Derived(q) => Ok(q.clone()),
        }
    }

    pub fn value(&self) -> f64 {
        match self {
            NumericInput::Raw(value) => *value,
            NumericInput::Derived(q) => q.value(),
        }
    }
}

impl From<f64> for NumericInput<'_> {
    fn from(value: f64) -> Self {
        NumericInput::Raw(value)
    }
}

impl<'a> From<&'a Quantity> for NumericInput<'a> {
    fn from(q: &'a Quantity) -> Self {
        NumericInput::Derived(q)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_raw_values_are_logged() {
        let mut log = CalcLog::new();
        let q = NumericInput::from(36.0)
            .resolve(&mut log, "F_y", Some("ksi"), "Yield stress")
            .unwrap();
        assert_eq!(q.value(), 36.0);
        assert_eq!(q.symbol(), "F_y");
        assert_eq!(log.len(), 1);
    }

    #[test]
    fn test_derived_values_are_reused() {
        let mut log = CalcLog::new();
        let upstream = log.input("F_n", 204.3, Some("ksi"), "Nominal stress").unwrap();
        let resolved = NumericInput::from(&upstream)
            .resolve(&mut log, "F_cr", Some("ksi"), "Critical stress")
            .unwrap();
        assert_eq!(resolved, upstream);
        assert_eq!(resolved.symbol(), "F_n");
        assert_eq!(log.len(), 1);
    }
}
