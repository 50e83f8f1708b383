//! # Steel Sections
//!
//! Cross-sections fed to the design checks:
//!
//! - [`RoundBar`] and [`RectBar`]: solid bars, properties computed from
//!   their dimensions
//! - [`TabulatedShape`]: a rolled or hollow shape read from the AISC shapes
//!   table ([`shapes`])
//!
//! Every section is immutable once built. [`SteelSection`] gives the design
//! checks one property API over all three.

pub mod bars;
pub mod geometry;
pub mod shapes;

pub use bars::{RectBar, RoundBar};
pub use shapes::{builtin_w_shapes, ElementRatio, ShapeType, SteelShape, SteelShapeDb};

use serde::{Deserialize, Serialize};

use crate::errors::CalcResult;
use crate::units::{UnitSystem, IN_KIP};

/// Torsional constants used by torsional buckling (Sect E4)
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct TorsionalProperties {
    /// Torsional constant J
    pub j: f64,
    /// Warping constant Cw
    pub cw: f64,
}

/// A shape from the AISC table, in in-kip units.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TabulatedShape {
    shape: SteelShape,
}

impl TabulatedShape {
    pub fn new(shape: SteelShape) -> Self {
        TabulatedShape { shape }
    }

    /// Look up `label` in `db` and wrap the row.
    pub fn from_db(db: &SteelShapeDb, label: &str) -> CalcResult<Self> {
        Ok(Self::new(db.lookup(label)?.clone()))
    }

    pub fn shape(&self) -> &SteelShape {
        &self.shape
    }

    pub fn label(&self) -> &str {
        &self.shape.label
    }

    pub fn units(&self) -> UnitSystem {
        IN_KIP
    }
}

/// Any section the design checks accept.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum SteelSection {
    RoundBar(RoundBar),
    RectBar(RectBar),
    Tabulated(TabulatedShape),
}

impl SteelSection {
    /// Short name of the section family, used in error messages
    pub fn kind_name(&self) -> &'static str {
        match self {
            SteelSection::RoundBar(_) => "round bar",
            SteelSection::RectBar(_) => "rectangular bar",
            SteelSection::Tabulated(t) => t.shape.shape_type.display_name(),
        }
    }

    pub fn label(&self) -> &str {
        match self {
            SteelSection::RoundBar(s) => s.label(),
            SteelSection::RectBar(s) => s.label(),
            SteelSection::Tabulated(s) => s.label(),
        }
    }

    pub fn units(&self) -> UnitSystem {
        match self {
            SteelSection::RoundBar(s) => s.units(),
            SteelSection::RectBar(s) => s.units(),
            SteelSection::Tabulated(s) => s.units(),
        }
    }

    /// Gross area Ag
    pub fn area(&self) -> f64 {
        match self {
            SteelSection::RoundBar(s) => s.area(),
            SteelSection::RectBar(s) => s.area(),
            SteelSection::Tabulated(s) => s.shape.area_in2,
        }
    }

    pub fn ix(&self) -> f64 {
        match self {
            SteelSection::RoundBar(s) => s.i(),
            SteelSection::RectBar(s) => s.ix(),
            SteelSection::Tabulated(s) => s.shape.ix_in4,
        }
    }

    pub fn iy(&self) -> f64 {
        match self {
            SteelSection::RoundBar(s) => s.i(),
            SteelSection::RectBar(s) => s.iy(),
            SteelSection::Tabulated(s) => s.shape.iy_in4,
        }
    }

    pub fn rx(&self) -> f64 {
        match self {
            SteelSection::RoundBar(s) => s.r(),
            SteelSection::RectBar(s) => s.rx(),
            SteelSection::Tabulated(s) => s.shape.rx_in,
        }
    }

    pub fn ry(&self) -> f64 {
        match self {
            SteelSection::RoundBar(s) => s.r(),
            SteelSection::RectBar(s) => s.ry(),
            SteelSection::Tabulated(s) => s.shape.ry_in,
        }
    }

    pub fn sx(&self) -> f64 {
        match self {
            SteelSection::RoundBar(s) => s.s(),
            SteelSection::RectBar(s) => s.sx(),
            SteelSection::Tabulated(s) => s.shape.sx_in3,
        }
    }

    pub fn sy(&self) -> f64 {
        match self {
            SteelSection::RoundBar(s) => s.s(),
            SteelSection::RectBar(s) => s.sy(),
            SteelSection::Tabulated(s) => s.shape.sy_in3,
        }
    }

    pub fn zx(&self) -> f64 {
        match self {
            SteelSection::RoundBar(s) => s.z(),
            SteelSection::RectBar(s) => s.zx(),
            SteelSection::Tabulated(s) => s.shape.zx_in3,
        }
    }

    pub fn zy(&self) -> f64 {
        match self {
            SteelSection::RoundBar(s) => s.z(),
            SteelSection::RectBar(s) => s.zy(),
            SteelSection::Tabulated(s) => s.shape.zy_in3,
        }
    }

    /// J and Cw where torsional buckling is checked: solid rounds (Cw = 0)
    /// and doubly symmetric I-shapes with a tabulated Cw.
    pub fn torsional(&self) -> Option<TorsionalProperties> {
        match self {
            SteelSection::RoundBar(s) => Some(TorsionalProperties { j: s.j(), cw: 0.0 }),
            SteelSection::RectBar(_) => None,
            SteelSection::Tabulated(s) if s.shape.shape_type.is_doubly_symmetric_open() => s
                .shape
                .cw_in6
                .map(|cw| TorsionalProperties { j: s.shape.j_in4, cw }),
            SteelSection::Tabulated(_) => None,
        }
    }
}

impl From<RoundBar> for SteelSection {
    fn from(s: RoundBar) -> Self {
        SteelSection::RoundBar(s)
    }
}

impl From<RectBar> for SteelSection {
    fn from(s: RectBar) -> Self {
        SteelSection::RectBar(s)
    }
}

impl From<TabulatedShape> for SteelSection {
    fn from(s: TabulatedShape) -> Self {
        SteelSection::Tabulated(s)
    }
}

impl std::fmt::Display for SteelSection {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} ({})", self.label(), self.kind_name())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::units::MM_KN;

    #[test]
    fn test_round_bar_axes_match() {
        let section = SteelSection::from(RoundBar::new(2.0, IN_KIP).unwrap());
        assert_eq!(section.ix(), section.iy());
        assert_eq!(section.rx(), section.ry());
        assert_eq!(section.zx(), section.zy());
        let torsion = section.torsional().unwrap();
        assert_eq!(torsion.cw, 0.0);
        assert!((torsion.j - 2.0 * section.ix()).abs() < 1e-12);
    }

    #[test]
    fn test_rect_bar_has_no_torsional_check() {
        let section = SteelSection::from(RectBar::new(1.0, 4.0, MM_KN).unwrap());
        assert!(section.torsional().is_none());
        assert_eq!(section.units(), MM_KN);
        assert!(section.rx() > section.ry());
    }

    #[test]
    fn test_tabulated_shape() {
        let shape = TabulatedShape::from_db(builtin_w_shapes(), "W14X90").unwrap();
        let section = SteelSection::from(shape);
        assert_eq!(section.units(), IN_KIP);
        assert_eq!(section.area(), 26.5);
        assert_eq!(section.kind_name(), "Wide Flange (W)");
        assert_eq!(
            section.torsional(),
            Some(TorsionalProperties { j: 4.06, cw: 16000.0 })
        );
        assert!(TabulatedShape::from_db(builtin_w_shapes(), "W4X1").is_err());
    }

    #[test]
    fn test_section_json() {
        let section = SteelSection::from(RoundBar::new(1.25, IN_KIP).unwrap());
        let json = serde_json::to_string(&section).unwrap();
        assert!(json.contains("\"kind\":\"round_bar\""));
        let back: SteelSection = serde_json::from_str(&json).unwrap();
        assert_eq!(back, section);

        let rect: SteelSection =
            serde_json::from_str(r#"{"kind": "rect_bar", "width": 1.0, "height": 3.0, "units": "mm-kN"}"#).unwrap();
        assert_eq!(rect.units(), MM_KN);
        assert_eq!(rect.label(), "1x3-mm Rect Bar");
    }
}
