//! # Calculation Records
//!
//! The symbolic layer under every formula function:
//!
//! - [`quantity`] - immutable [`Quantity`] records and their expression trees
//! - [`log`] - the append-only [`CalcLog`], expression builder and branch recorder
//! - [`input`] - [`NumericInput`], a raw number or an upstream quantity
//!
//! A documentation backend consumes [`CalcLog::entries`] (or the JSON form of
//! the log) to typeset a report; [`CalcLog::narrative`] gives a plain-text
//! rendition.

pub mod input;
pub mod log;
pub mod quantity;

pub use input::NumericInput;
pub use log::{Branches, CalcLog, CompareOp, ComparisonRecord, LogEntry};
pub use quantity::{format_number, BinaryOp, Expr, Function, Operand, Quantity, QuantityKind, PI};
