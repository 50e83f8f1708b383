//! # Quantity Records
//!
//! A [`Quantity`] is a symbolic value: display symbol, numeric result, unit,
//! optional description and optional code citation, plus the expression tree
//! that produced it. Quantities are only created through a
//! [`CalcLog`](super::log::CalcLog), which records each one as it is made.
//!
//! Symbols and rendered expressions use LaTeX-flavoured markup (`F_e`,
//! `\frac{L_c}{r}`, `\phi_c`) so a documentation backend can typeset them.

use serde::{Deserialize, Serialize};

/// Role a quantity plays in the calculation narrative.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum QuantityKind {
    /// Raw value supplied by the caller
    Input,
    /// Named, documented result of an expression
    Calculation,
    /// Unnamed intermediate produced by composing two operands
    Expression,
}

/// Binary operators available to the expression builder.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BinaryOp {
    Add,
    Sub,
    Mul,
    Div,
    Pow,
}

impl BinaryOp {
    pub fn apply(self, lhs: f64, rhs: f64) -> f64 {
        match self {
            BinaryOp::Add => lhs + rhs,
            BinaryOp::Sub => lhs - rhs,
            BinaryOp::Mul => lhs * rhs,
            BinaryOp::Div => lhs / rhs,
            BinaryOp::Pow => lhs.powf(rhs),
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            BinaryOp::Add => "addition",
            BinaryOp::Sub => "subtraction",
            BinaryOp::Mul => "multiplication",
            BinaryOp::Div => "division",
            BinaryOp::Pow => "exponentiation",
        }
    }

    /// Binding strength; `\frac` renders as a block so division binds like an atom.
    fn precedence(self) -> u8 {
        match self {
            BinaryOp::Add | BinaryOp::Sub => 1,
            BinaryOp::Mul => 2,
            BinaryOp::Pow => 3,
            BinaryOp::Div => 4,
        }
    }
}

/// Functions available to the expression builder.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Function {
    Min,
    Max,
    Sqrt,
}

impl Function {
    pub fn name(self) -> &'static str {
        match self {
            Function::Min => "min",
            Function::Max => "max",
            Function::Sqrt => "sqrt",
        }
    }
}

/// Symbolic expression tree behind a quantity.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "node", rename_all = "snake_case")]
pub enum Expr {
    /// Bare number
    Value { value: f64 },
    /// Reference to a named quantity
    Symbol { symbol: String, value: f64 },
    /// Named mathematical constant such as π
    Constant { symbol: String, value: f64 },
    Binary {
        op: BinaryOp,
        lhs: Box<Expr>,
        rhs: Box<Expr>,
    },
    Call { func: Function, args: Vec<Expr> },
    /// Explicit brackets
    Group { inner: Box<Expr> },
}

#[derive(Clone, Copy, PartialEq)]
enum RenderMode {
    Symbolic,
    Substituted,
}

impl Expr {
    /// Expression with symbols, e.g. `\frac{\pi^{2} \cdot E}{...}`
    pub fn render_symbolic(&self) -> String {
        self.render(RenderMode::Symbolic)
    }

    /// Expression with every symbol replaced by its value
    pub fn render_substituted(&self) -> String {
        self.render(RenderMode::Substituted)
    }

    /// True when the expression is a single leaf (number or symbol)
    pub fn is_leaf(&self) -> bool {
        matches!(self, Expr::Value { .. } | Expr::Symbol { .. } | Expr::Constant { .. })
    }

    fn render(&self, mode: RenderMode) -> String {
        match self {
            Expr::Value { value } => format_number(*value),
            Expr::Symbol { symbol, value } => match mode {
                RenderMode::Symbolic => symbol.clone(),
                RenderMode::Substituted => format_number(*value),
            },
            Expr::Constant { symbol, .. } => symbol.clone(),
            Expr::Binary { op, lhs, rhs } => {
                let left = lhs.render_operand(*op, false, mode);
                let right = rhs.render_operand(*op, true, mode);
                match op {
                    BinaryOp::Add => format!("{} + {}", left, right),
                    BinaryOp::Sub => format!("{} - {}", left, right),
                    BinaryOp::Mul => format!("{} \\cdot {}", left, right),
                    BinaryOp::Div => format!("\\frac{{{}}}{{{}}}", lhs.render(mode), rhs.render(mode)),
                    BinaryOp::Pow => format!("{}^{{{}}}", left, rhs.render(mode)),
                }
            }
            Expr::Call { func, args } => {
                let rendered: Vec<String> = args.iter().map(|a| a.render(mode)).collect();
                match func {
                    Function::Sqrt => format!("\\sqrt{{{}}}", rendered.join(", ")),
                    Function::Min | Function::Max => {
                        format!("\\{}\\left({}\\right)", func.name(), rendered.join(", "))
                    }
                }
            }
            Expr::Group { inner } => format!("\\left({}\\right)", inner.render(mode)),
        }
    }

    /// Render as an operand of `parent`, adding brackets where precedence needs them.
    fn render_operand(&self, parent: BinaryOp, is_rhs: bool, mode: RenderMode) -> String {
        let inner = self.render(mode);
        let needs_parens = match self {
            Expr::Binary { op, .. } => {
                if parent == BinaryOp::Pow {
                    // the exponent is braced, the base always bracketed
                    !is_rhs
                } else {
                    op.precedence() < parent.precedence()
                        || (is_rhs && parent == BinaryOp::Sub && op.precedence() == parent.precedence())
                }
            }
            Expr::Value { value } => parent == BinaryOp::Pow && !is_rhs && *value < 0.0,
            // fraction-shaped symbols and negative substituted values
            Expr::Symbol { .. } => {
                parent == BinaryOp::Pow && !is_rhs && (inner.starts_with("\\frac") || inner.starts_with('-'))
            }
            _ => false,
        };
        if needs_parens {
            format!("\\left({}\\right)", inner)
        } else {
            inner
        }
    }
}

/// Format a number to four significant figures, trimming trailing zeros.
pub fn format_number(value: f64) -> String {
    if value == 0.0 || !value.is_finite() {
        return value.to_string();
    }
    let magnitude = value.abs().log10().floor() as i32;
    let decimals = (3 - magnitude).clamp(0, 12) as usize;
    let text = format!("{:.*}", decimals, value);
    if text.contains('.') {
        text.trim_end_matches('0').trim_end_matches('.').to_string()
    } else {
        text
    }
}

/// An immutable symbolic value recorded in a calculation log.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Quantity {
    symbol: String,
    value: f64,
    unit: Option<String>,
    description: Option<String>,
    reference: Option<String>,
    kind: QuantityKind,
    expr: Expr,
}

impl Quantity {
    pub(crate) fn input(
        symbol: impl Into<String>,
        value: f64,
        unit: Option<&str>,
        description: Option<&str>,
        reference: Option<&str>,
    ) -> Self {
        Quantity {
            symbol: symbol.into(),
            value,
            unit: unit.map(str::to_string),
            description: description.map(str::to_string),
            reference: reference.map(str::to_string),
            kind: QuantityKind::Input,
            expr: Expr::Value { value },
        }
    }

    pub(crate) fn calculation(
        symbol: impl Into<String>,
        source: &Quantity,
        unit: Option<&str>,
        description: Option<&str>,
        reference: Option<&str>,
    ) -> Self {
        Quantity {
            symbol: symbol.into(),
            value: source.value,
            unit: unit.map(str::to_string),
            description: description.map(str::to_string),
            reference: reference.map(str::to_string),
            kind: QuantityKind::Calculation,
            expr: source.as_expr(),
        }
    }

    pub(crate) fn expression(expr: Expr, value: f64) -> Self {
        Quantity {
            symbol: expr.render_symbolic(),
            value,
            unit: None,
            description: None,
            reference: None,
            kind: QuantityKind::Expression,
            expr,
        }
    }

    /// Wrap in explicit brackets. Brackets are presentation only and are not logged.
    pub fn grouped(&self) -> Quantity {
        let expr = Expr::Group {
            inner: Box::new(self.as_expr()),
        };
        Quantity {
            symbol: expr.render_symbolic(),
            value: self.value,
            unit: self.unit.clone(),
            description: None,
            reference: None,
            kind: QuantityKind::Expression,
            expr,
        }
    }

    /// How this quantity appears when used as an operand: named quantities
    /// appear by symbol, intermediates inline their whole expression.
    pub fn as_expr(&self) -> Expr {
        match self.kind {
            QuantityKind::Input | QuantityKind::Calculation => Expr::Symbol {
                symbol: self.symbol.clone(),
                value: self.value,
            },
            QuantityKind::Expression => self.expr.clone(),
        }
    }

    pub fn symbol(&self) -> &str {
        &self.symbol
    }

    /// Numeric result
    pub fn value(&self) -> f64 {
        self.value
    }

    pub fn unit(&self) -> Option<&str> {
        self.unit.as_deref()
    }

    pub fn description(&self) -> Option<&str> {
        self.description.as_deref()
    }

    /// Governing code clause, e.g. "AISC 360-22 Eq E3-4"
    pub fn reference(&self) -> Option<&str> {
        self.reference.as_deref()
    }

    pub fn kind(&self) -> QuantityKind {
        self.kind
    }

    pub fn expr(&self) -> &Expr {
        &self.expr
    }

    fn value_with_unit(&self) -> String {
        match &self.unit {
            Some(unit) => format!("{} {}", format_number(self.value), unit),
            None => format_number(self.value),
        }
    }
}

impl std::fmt::Display for Quantity {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self.kind {
            QuantityKind::Input => write!(f, "{} = {}", self.symbol, self.value_with_unit())?,
            QuantityKind::Calculation => {
                let symbolic = self.expr.render_symbolic();
                let substituted = self.expr.render_substituted();
                write!(f, "{} = {}", self.symbol, symbolic)?;
                if substituted != symbolic {
                    write!(f, " = {}", substituted)?;
                }
                if !self.expr.is_leaf() {
                    write!(f, " = {}", self.value_with_unit())?;
                } else if let Some(unit) = &self.unit {
                    write!(f, " {}", unit)?;
                }
            }
            QuantityKind::Expression => write!(f, "{} = {}", self.symbol, format_number(self.value))?,
        }
        if let Some(description) = &self.description {
            write!(f, "  ({})", description)?;
        }
        if let Some(reference) = &self.reference {
            write!(f, "  [{}]", reference)?;
        }
        Ok(())
    }
}

/// Right-hand side or operand accepted by the log's builder methods.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Operand<'a> {
    Quantity(&'a Quantity),
    Scalar(f64),
    Constant { symbol: &'static str, value: f64 },
}

/// π, rendered symbolically
pub const PI: Operand<'static> = Operand::Constant {
    symbol: "\\pi",
    value: std::f64::consts::PI,
};

impl Operand<'_> {
    pub fn value(&self) -> f64 {
        match self {
            Operand::Quantity(q) => q.value(),
            Operand::Scalar(v) => *v,
            Operand::Constant { value, .. } => *value,
        }
    }

    pub fn to_expr(&self) -> Expr {
        match self {
            Operand::Quantity(q) => q.as_expr(),
            Operand::Scalar(v) => Expr::Value { value: *v },
            Operand::Constant { symbol, value } => Expr::Constant {
                symbol: symbol.to_string(),
                value: *value,
            },
        }
    }
}

impl<'a> From<&'a Quantity> for Operand<'a> {
    fn from(q: &'a Quantity) -> Self {
        Operand::Quantity(q)
    }
}

impl From<f64> for Operand<'_> {
    fn from(v: f64) -> Self {
        Operand::Scalar(v)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sym(s: &str, v: f64) -> Box<Expr> {
        Box::new(Expr::Symbol {
            symbol: s.to_string(),
            value: v,
        })
    }

    #[test]
    fn test_format_number() {
        assert_eq!(format_number(72.25), "72.25");
        assert_eq!(format_number(60.99814111), "61");
        assert_eq!(format_number(13.61324745), "13.61");
        assert_eq!(format_number(0.000284), "0.000284");
        assert_eq!(format_number(29000.0), "29000");
        assert_eq!(format_number(0.0), "0");
        assert_eq!(format_number(-2.5), "-2.5");
    }

    #[test]
    fn test_render_fraction_and_power() {
        // \frac{\pi^{2} E}{(L_c/r)^{2}}
        let numerator = Expr::Binary {
            op: BinaryOp::Mul,
            lhs: Box::new(Expr::Binary {
                op: BinaryOp::Pow,
                lhs: Box::new(Expr::Constant {
                    symbol: "\\pi".to_string(),
                    value: std::f64::consts::PI,
                }),
                rhs: Box::new(Expr::Value { value: 2.0 }),
            }),
            rhs: sym("E", 29000.0),
        };
        let denominator = Expr::Binary {
            op: BinaryOp::Pow,
            lhs: sym("\\frac{L_c}{r}", 68.5),
            rhs: Box::new(Expr::Value { value: 2.0 }),
        };
        let fe = Expr::Binary {
            op: BinaryOp::Div,
            lhs: Box::new(numerator),
            rhs: Box::new(denominator),
        };

        assert_eq!(
            fe.render_symbolic(),
            "\\frac{\\pi^{2} \\cdot E}{\\left(\\frac{L_c}{r}\\right)^{2}}"
        );
        assert_eq!(fe.render_substituted(), "\\frac{\\pi^{2} \\cdot 29000}{68.5^{2}}");
    }

    #[test]
    fn test_power_of_fraction_is_bracketed() {
        let ratio = Expr::Binary {
            op: BinaryOp::Div,
            lhs: sym("a", 1.0),
            rhs: sym("b", 2.0),
        };
        let squared = Expr::Binary {
            op: BinaryOp::Pow,
            lhs: Box::new(ratio),
            rhs: Box::new(Expr::Value { value: 2.0 }),
        };
        assert_eq!(squared.render_symbolic(), "\\left(\\frac{a}{b}\\right)^{2}");
        assert_eq!(squared.render_substituted(), "\\left(\\frac{1}{2}\\right)^{2}");

        let plain = Expr::Binary {
            op: BinaryOp::Pow,
            lhs: sym("r", 2.0),
            rhs: Box::new(Expr::Value { value: 2.0 }),
        };
        assert_eq!(plain.render_symbolic(), "r^{2}");
    }

    #[test]
    fn test_render_brackets_by_precedence() {
        let sum = Expr::Binary {
            op: BinaryOp::Add,
            lhs: sym("a", 1.0),
            rhs: sym("b", 2.0),
        };
        let product = Expr::Binary {
            op: BinaryOp::Mul,
            lhs: Box::new(sum.clone()),
            rhs: sym("c", 3.0),
        };
        assert_eq!(product.render_symbolic(), "\\left(a + b\\right) \\cdot c");

        let difference = Expr::Binary {
            op: BinaryOp::Sub,
            lhs: sym("d", 4.0),
            rhs: Box::new(sum),
        };
        assert_eq!(difference.render_symbolic(), "d - \\left(a + b\\right)");
    }

    #[test]
    fn test_named_quantity_appears_by_symbol() {
        let fy = Quantity::input("F_y", 50.0, Some("ksi"), Some("Yield stress"), None);
        assert_eq!(
            fy.as_expr(),
            Expr::Symbol {
                symbol: "F_y".to_string(),
                value: 50.0
            }
        );
        assert_eq!(fy.to_string(), "F_y = 50 ksi  (Yield stress)");
    }

    #[test]
    fn test_grouped_keeps_value() {
        let k = Quantity::input("K", 0.8, None, None, None);
        let grouped = k.grouped();
        assert_eq!(grouped.value(), 0.8);
        assert_eq!(grouped.symbol(), "\\left(K\\right)");
        assert_eq!(grouped.kind(), QuantityKind::Expression);
    }

    #[test]
    fn test_operand_conversions() {
        let q = Quantity::input("r", 2.0, Some("in"), None, None);
        assert_eq!(Operand::from(&q).value(), 2.0);
        assert_eq!(Operand::from(1.6).value(), 1.6);
        assert!((PI.value() - std::f64::consts::PI).abs() < 1e-15);
        assert!(matches!(PI.to_expr(), Expr::Constant { .. }));
    }
}
