//! # Calculation Log
//!
//! Ordered, append-only record of everything a design check computed. Each
//! design invocation owns one [`CalcLog`] and passes it by `&mut` through the
//! formula functions; there is no global log.
//!
//! The log is also the expression builder: every arithmetic composition goes
//! through [`CalcLog::compose`] (or one of its shorthands), which evaluates
//! the operation, rejects undefined results, and appends exactly one entry.
//!
//! ## Example
//!
//! ```rust
//! use steel_core::calc::{CalcLog, CompareOp, Branches};
//!
//! let mut log = CalcLog::new();
//! let k = log.input("K", 1.0, None, "Effective length factor").unwrap();
//! let l = log.input("L", 144.5, Some("in"), "Unbraced length").unwrap();
//! let r = log.input("r", 2.0, Some("in"), "Radius of gyration").unwrap();
//!
//! let kl = log.mul(&k, &l).unwrap().grouped();
//! let ratio = log.div(&kl, &r).unwrap();
//! let slenderness = log
//!     .calculation("\\frac{L_c}{r}", &ratio, None, "Member slenderness ratio", None)
//!     .unwrap();
//! assert_eq!(slenderness.value(), 72.25);
//!
//! let stocky = log.compare(
//!     &slenderness,
//!     CompareOp::Le,
//!     200.0,
//!     Branches::new("slenderness within recommended limit", "exceeds recommended limit"),
//! );
//! assert!(stocky);
//! assert_eq!(log.len(), 7);
//! ```

use serde::{Deserialize, Serialize};

use super::quantity::{format_number, BinaryOp, Expr, Function, Operand, Quantity};
use crate::errors::{CalcError, CalcResult};

/// Comparison operators for recorded branch decisions.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CompareOp {
    Le,
    Lt,
    Eq,
    Gt,
    Ge,
}

impl CompareOp {
    pub fn evaluate(self, lhs: f64, rhs: f64) -> bool {
        match self {
            CompareOp::Le => lhs <= rhs,
            CompareOp::Lt => lhs < rhs,
            CompareOp::Eq => lhs == rhs,
            CompareOp::Gt => lhs > rhs,
            CompareOp::Ge => lhs >= rhs,
        }
    }

    /// LaTeX operator
    pub fn symbol(self) -> &'static str {
        match self {
            CompareOp::Le => "\\leq",
            CompareOp::Lt => "<",
            CompareOp::Eq => "=",
            CompareOp::Gt => ">",
            CompareOp::Ge => "\\geq",
        }
    }
}

/// Annotations for the two outcomes of a branch decision.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Branches<'a> {
    pub if_true: &'a str,
    pub if_false: &'a str,
}

impl<'a> Branches<'a> {
    pub fn new(if_true: &'a str, if_false: &'a str) -> Self {
        Branches { if_true, if_false }
    }
}

/// A logged decision point.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ComparisonRecord {
    pub lhs: String,
    pub lhs_value: f64,
    pub op: CompareOp,
    pub rhs: String,
    pub rhs_value: f64,
    pub outcome: bool,
    /// Annotation for the branch actually taken
    pub note: String,
}

impl std::fmt::Display for ComparisonRecord {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let verdict = if self.outcome { "TRUE" } else { "FALSE" };
        write!(
            f,
            "{} = {} {} {} : {} -> {}",
            self.lhs,
            format_number(self.lhs_value),
            self.op.symbol(),
            self.rhs,
            verdict,
            self.note
        )
    }
}

/// One line of the calculation narrative.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "entry", rename_all = "snake_case")]
pub enum LogEntry {
    Input(Quantity),
    Calculation(Quantity),
    Operation(Quantity),
    Comparison(ComparisonRecord),
}

impl LogEntry {
    /// The quantity carried by this entry, if any
    pub fn quantity(&self) -> Option<&Quantity> {
        match self {
            LogEntry::Input(q) | LogEntry::Calculation(q) | LogEntry::Operation(q) => Some(q),
            LogEntry::Comparison(_) => None,
        }
    }

    /// Code clause cited by this entry
    pub fn reference(&self) -> Option<&str> {
        self.quantity().and_then(Quantity::reference)
    }
}

impl std::fmt::Display for LogEntry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            LogEntry::Input(q) => write!(f, "input        {}", q),
            LogEntry::Calculation(q) => write!(f, "calculation  {}", q),
            LogEntry::Operation(q) => write!(f, "  step       {}", q),
            LogEntry::Comparison(c) => write!(f, "check        {}", c),
        }
    }
}

/// Ordered, append-only calculation record for one design invocation.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CalcLog {
    entries: Vec<LogEntry>,
}

impl CalcLog {
    pub fn new() -> Self {
        Self::default()
    }

    /// All entries in the order they were recorded
    pub fn entries(&self) -> &[LogEntry] {
        &self.entries
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn last(&self) -> Option<&LogEntry> {
        self.entries.last()
    }

    pub fn inputs(&self) -> impl Iterator<Item = &Quantity> {
        self.entries.iter().filter_map(|e| match e {
            LogEntry::Input(q) => Some(q),
            _ => None,
        })
    }

    pub fn calculations(&self) -> impl Iterator<Item = &Quantity> {
        self.entries.iter().filter_map(|e| match e {
            LogEntry::Calculation(q) => Some(q),
            _ => None,
        })
    }

    pub fn comparisons(&self) -> impl Iterator<Item = &ComparisonRecord> {
        self.entries.iter().filter_map(|e| match e {
            LogEntry::Comparison(c) => Some(c),
            _ => None,
        })
    }

    /// Distinct code clauses cited, in order of first use
    pub fn references(&self) -> Vec<&str> {
        let mut seen = std::collections::HashSet::new();
        self.entries
            .iter()
            .filter_map(LogEntry::reference)
            .filter(|r| seen.insert(*r))
            .collect()
    }

    /// Plain-text narrative, one line per entry
    pub fn narrative(&self) -> String {
        self.entries
            .iter()
            .map(|e| e.to_string())
            .collect::<Vec<_>>()
            .join("\n")
    }

    // ------------------------------------------------------------------------
    // Named quantities
    // ------------------------------------------------------------------------

    /// Record a raw input value.
    pub fn input(
        &mut self,
        symbol: &str,
        value: f64,
        unit: Option<&str>,
        description: &str,
    ) -> CalcResult<Quantity> {
        self.cited_input(symbol, value, unit, description, None)
    }

    /// Record a raw input value that is prescribed by a code clause.
    pub fn cited_input(
        &mut self,
        symbol: &str,
        value: f64,
        unit: Option<&str>,
        description: &str,
        reference: Option<&str>,
    ) -> CalcResult<Quantity> {
        if !value.is_finite() {
            return Err(CalcError::domain(
                format!("input {}", symbol),
                format!("value {} is not finite", value),
            ));
        }
        let q = Quantity::input(symbol, value, unit, Some(description), reference);
        self.entries.push(LogEntry::Input(q.clone()));
        Ok(q)
    }

    /// Name an expression as a documented result.
    pub fn calculation(
        &mut self,
        symbol: &str,
        source: &Quantity,
        unit: Option<&str>,
        description: &str,
        reference: Option<&str>,
    ) -> CalcResult<Quantity> {
        check_finite(symbol, source.value())?;
        let q = Quantity::calculation(symbol, source, unit, Some(description), reference);
        self.entries.push(LogEntry::Calculation(q.clone()));
        Ok(q)
    }

    // ------------------------------------------------------------------------
    // Expression builder
    // ------------------------------------------------------------------------

    /// Combine two operands, appending one entry to the log.
    pub fn compose<'a, 'b>(
        &mut self,
        lhs: impl Into<Operand<'a>>,
        op: BinaryOp,
        rhs: impl Into<Operand<'b>>,
    ) -> CalcResult<Quantity> {
        let lhs = lhs.into();
        let rhs = rhs.into();
        let expr = Expr::Binary {
            op,
            lhs: Box::new(lhs.to_expr()),
            rhs: Box::new(rhs.to_expr()),
        };
        if op == BinaryOp::Div && rhs.value() == 0.0 {
            return Err(CalcError::domain(
                op.name(),
                format!("divisor {} is zero", rhs.to_expr().render_symbolic()),
            ));
        }
        let value = op.apply(lhs.value(), rhs.value());
        check_finite(&expr.render_symbolic(), value)?;
        Ok(self.push_operation(expr, value))
    }

    pub fn add<'a, 'b>(&mut self, lhs: impl Into<Operand<'a>>, rhs: impl Into<Operand<'b>>) -> CalcResult<Quantity> {
        self.compose(lhs, BinaryOp::Add, rhs)
    }

    pub fn sub<'a, 'b>(&mut self, lhs: impl Into<Operand<'a>>, rhs: impl Into<Operand<'b>>) -> CalcResult<Quantity> {
        self.compose(lhs, BinaryOp::Sub, rhs)
    }

    pub fn mul<'a, 'b>(&mut self, lhs: impl Into<Operand<'a>>, rhs: impl Into<Operand<'b>>) -> CalcResult<Quantity> {
        self.compose(lhs, BinaryOp::Mul, rhs)
    }

    pub fn div<'a, 'b>(&mut self, lhs: impl Into<Operand<'a>>, rhs: impl Into<Operand<'b>>) -> CalcResult<Quantity> {
        self.compose(lhs, BinaryOp::Div, rhs)
    }

    pub fn pow<'a, 'b>(&mut self, base: impl Into<Operand<'a>>, exponent: impl Into<Operand<'b>>) -> CalcResult<Quantity> {
        self.compose(base, BinaryOp::Pow, exponent)
    }

    pub fn min<'a, 'b>(&mut self, a: impl Into<Operand<'a>>, b: impl Into<Operand<'b>>) -> CalcResult<Quantity> {
        let (a, b) = (a.into(), b.into());
        self.call(Function::Min, &[a, b], a.value().min(b.value()))
    }

    pub fn max<'a, 'b>(&mut self, a: impl Into<Operand<'a>>, b: impl Into<Operand<'b>>) -> CalcResult<Quantity> {
        let (a, b) = (a.into(), b.into());
        self.call(Function::Max, &[a, b], a.value().max(b.value()))
    }

    pub fn sqrt<'a>(&mut self, arg: impl Into<Operand<'a>>) -> CalcResult<Quantity> {
        let arg = arg.into();
        if arg.value() < 0.0 {
            return Err(CalcError::domain(
                "sqrt",
                format!("argument {} is negative", arg.to_expr().render_symbolic()),
            ));
        }
        self.call(Function::Sqrt, &[arg], arg.value().sqrt())
    }

    fn call(&mut self, func: Function, args: &[Operand<'_>], value: f64) -> CalcResult<Quantity> {
        let expr = Expr::Call {
            func,
            args: args.iter().map(Operand::to_expr).collect(),
        };
        check_finite(func.name(), value)?;
        Ok(self.push_operation(expr, value))
    }

    fn push_operation(&mut self, expr: Expr, value: f64) -> Quantity {
        let q = Quantity::expression(expr, value);
        self.entries.push(LogEntry::Operation(q.clone()));
        q
    }

    // ------------------------------------------------------------------------
    // Branch recorder
    // ------------------------------------------------------------------------

    /// Evaluate a comparison and record which branch it selects.
    ///
    /// The returned boolean is exactly `op.evaluate(lhs, rhs)`; recording never
    /// changes the outcome.
    pub fn compare<'a, 'b>(
        &mut self,
        lhs: impl Into<Operand<'a>>,
        op: CompareOp,
        rhs: impl Into<Operand<'b>>,
        branches: Branches<'_>,
    ) -> bool {
        let lhs = lhs.into();
        let rhs = rhs.into();
        let outcome = op.evaluate(lhs.value(), rhs.value());
        let note = if outcome { branches.if_true } else { branches.if_false };
        tracing::debug!(
            lhs = lhs.value(),
            rhs = rhs.value(),
            outcome,
            branch = note,
            "branch decision"
        );
        self.entries.push(LogEntry::Comparison(ComparisonRecord {
            lhs: lhs.to_expr().render_symbolic(),
            lhs_value: lhs.value(),
            op,
            rhs: rhs.to_expr().render_symbolic(),
            rhs_value: rhs.value(),
            outcome,
            note: note.to_string(),
        }));
        outcome
    }
}

fn check_finite(what: &str, value: f64) -> CalcResult<()> {
    if value.is_finite() {
        Ok(())
    } else {
        Err(CalcError::domain(what, format!("result {} is not finite", value)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::calc::quantity::{QuantityKind, PI};

    #[test]
    fn test_each_composition_appends_one_entry() {
        let mut log = CalcLog::new();
        let a = log.input("a", 3.0, None, "a").unwrap();
        let b = log.input("b", 4.0, None, "b").unwrap();
        assert_eq!(log.len(), 2);

        let sum = log.add(&a, &b).unwrap();
        assert_eq!(log.len(), 3);
        let product = log.mul(&sum, 2.0).unwrap();
        assert_eq!(log.len(), 4);
        let root = log.sqrt(&product).unwrap();
        assert_eq!(log.len(), 5);
        let smaller = log.min(&root, &a).unwrap();
        assert_eq!(log.len(), 6);

        assert_eq!(sum.value(), 7.0);
        assert_eq!(product.value(), 14.0);
        assert_eq!(smaller.value(), 3.0);
        assert_eq!(log.last().and_then(LogEntry::quantity), Some(&smaller));
    }

    #[test]
    fn test_entries_keep_evaluation_order() {
        let mut log = CalcLog::new();
        let x = log.input("x", 2.0, None, "x").unwrap();
        let first = log.pow(&x, 3.0).unwrap();
        let second = log.div(&first, 4.0).unwrap();

        let values: Vec<f64> = log
            .entries()
            .iter()
            .filter_map(LogEntry::quantity)
            .map(Quantity::value)
            .collect();
        assert_eq!(values, vec![2.0, 8.0, 2.0]);
        assert_eq!(second.symbol(), "\\frac{x^{3}}{4}");
    }

    #[test]
    fn test_division_by_zero_is_domain_error() {
        let mut log = CalcLog::new();
        let r = log.input("r", 0.0, Some("in"), "Radius of gyration").unwrap();
        let before = log.len();
        let err = log.div(100.0, &r).unwrap_err();
        assert!(err.is_domain());
        assert!(err.to_string().contains("r"));
        assert_eq!(log.len(), before, "failed compositions are not logged");
    }

    #[test]
    fn test_non_finite_results_rejected() {
        let mut log = CalcLog::new();
        assert!(log.pow(-8.0, 0.5).unwrap_err().is_domain());
        assert!(log.sqrt(-1.0).unwrap_err().is_domain());
        assert!(log.mul(f64::MAX, 10.0).unwrap_err().is_domain());
        assert!(log.input("bad", f64::INFINITY, None, "bad").is_err());
        assert!(log.is_empty());
    }

    #[test]
    fn test_compare_returns_plain_boolean() {
        let mut log = CalcLog::new();
        let ratio = log.input("\\frac{F_y}{F_e}", 2.25, None, "ratio").unwrap();
        let branches = Branches::new("use E3-2", "use E3-3");

        assert!(log.compare(&ratio, CompareOp::Le, 2.25, branches));
        assert!(!log.compare(&ratio, CompareOp::Lt, 2.25, branches));
        assert!(log.compare(&ratio, CompareOp::Eq, 2.25, branches));
        assert!(!log.compare(&ratio, CompareOp::Gt, 2.25, branches));
        assert!(log.compare(&ratio, CompareOp::Ge, 2.25, branches));

        let notes: Vec<&str> = log.comparisons().map(|c| c.note.as_str()).collect();
        assert_eq!(notes, vec!["use E3-2", "use E3-3", "use E3-2", "use E3-3", "use E3-2"]);

        let first = log.comparisons().next().unwrap();
        assert_eq!(first.lhs, "\\frac{F_y}{F_e}");
        assert_eq!(first.rhs, "2.25");
        assert_eq!(first.rhs_value, 2.25);
    }

    #[test]
    fn test_calculation_names_expression() {
        let mut log = CalcLog::new();
        let e = log.input("E", 29000.0, Some("ksi"), "Modulus of elasticity").unwrap();
        let pi_sq = log.pow(PI, 2.0).unwrap();
        let top = log.mul(&pi_sq, &e).unwrap();
        let fe = log
            .calculation("F_e", &top, Some("ksi"), "Numerator", Some("AISC 360-22 Eq E3-4"))
            .unwrap();

        assert_eq!(fe.kind(), QuantityKind::Calculation);
        assert_eq!(fe.reference(), Some("AISC 360-22 Eq E3-4"));
        assert_eq!(log.calculations().count(), 1);
        assert_eq!(log.inputs().count(), 1);
        assert_eq!(log.references(), vec!["AISC 360-22 Eq E3-4"]);

        let line = fe.to_string();
        assert!(line.starts_with("F_e = \\pi^{2} \\cdot E = \\pi^{2} \\cdot 29000 = "));
        assert!(line.ends_with("[AISC 360-22 Eq E3-4]"));
    }

    #[test]
    fn test_narrative_and_serialization() {
        let mut log = CalcLog::new();
        let k = log.input("K", 1.0, None, "Effective length factor").unwrap();
        log.compare(&k, CompareOp::Le, 2.0, Branches::new("ok", "not ok"));

        let text = log.narrative();
        assert_eq!(text.lines().count(), 2);
        assert!(text.contains("K = 1"));
        assert!(text.contains("TRUE -> ok"));

        let json = serde_json::to_string(&log).unwrap();
        assert!(json.contains("\"entry\":\"input\""));
        assert!(json.contains("\"entry\":\"comparison\""));
        let roundtrip: CalcLog = serde_json::from_str(&json).unwrap();
        assert_eq!(roundtrip, log);
    }
}
