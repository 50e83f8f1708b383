//! Solid round and rectangular bars.
//!
//! Every property is computed once in the constructor and never changes.

use serde::{Deserialize, Serialize};

use super::geometry::{
    circular_area, circular_moment_of_inertia, circular_plastic_modulus, circular_section_modulus,
    circular_torsional_constant, radius_of_gyration, rectangular_area, rectangular_moment_of_inertia,
    rectangular_plastic_modulus, rectangular_section_modulus,
};
use crate::errors::{CalcError, CalcResult};
use crate::units::UnitSystem;

fn check_dimension(field: &str, value: f64) -> CalcResult<()> {
    if value > 0.0 && value.is_finite() {
        Ok(())
    } else {
        Err(CalcError::domain(
            format!("section dimension {}", field),
            format!("{} must be a positive, finite length", value),
        ))
    }
}

/// Solid round bar.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "RoundBarRepr", into = "RoundBarRepr")]
pub struct RoundBar {
    label: String,
    units: UnitSystem,
    d: f64,
    area: f64,
    i: f64,
    r: f64,
    s: f64,
    z: f64,
    j: f64,
}

/// Defining dimensions of a round bar, as stored in JSON.
#[derive(Debug, Clone, Serialize, Deserialize)]
struct RoundBarRepr {
    diameter: f64,
    #[serde(default)]
    label: Option<String>,
    #[serde(default)]
    units: UnitSystem,
}

impl RoundBar {
    /// Create a round bar with the default label, e.g. `"2-in Ø Round Bar"`.
    pub fn new(diameter: f64, units: UnitSystem) -> CalcResult<Self> {
        check_dimension("diameter", diameter)?;
        let area = circular_area(diameter);
        let i = circular_moment_of_inertia(diameter);
        Ok(RoundBar {
            label: format!("{}-{} Ø Round Bar", diameter, units.length),
            units,
            d: diameter,
            area,
            i,
            r: radius_of_gyration(i, area),
            s: circular_section_modulus(diameter),
            z: circular_plastic_modulus(diameter),
            j: circular_torsional_constant(diameter),
        })
    }

    /// Create a round bar with a custom label.
    pub fn with_label(diameter: f64, label: impl Into<String>, units: UnitSystem) -> CalcResult<Self> {
        let mut bar = Self::new(diameter, units)?;
        let label = label.into();
        if !label.is_empty() {
            bar.label = label;
        }
        Ok(bar)
    }

    pub fn label(&self) -> &str {
        &self.label
    }

    pub fn units(&self) -> UnitSystem {
        self.units
    }

    /// Diameter D
    pub fn diameter(&self) -> f64 {
        self.d
    }

    /// Radius R = D/2
    pub fn radius(&self) -> f64 {
        self.d / 2.0
    }

    pub fn area(&self) -> f64 {
        self.area
    }

    /// Ix = Iy = πR⁴/4
    pub fn i(&self) -> f64 {
        self.i
    }

    /// rx = ry
    pub fn r(&self) -> f64 {
        self.r
    }

    /// Sx = Sy = πD³/32
    pub fn s(&self) -> f64 {
        self.s
    }

    /// Zx = Zy = 4R³/3
    pub fn z(&self) -> f64 {
        self.z
    }

    /// Torsional constant J = πR⁴/2
    pub fn j(&self) -> f64 {
        self.j
    }
}

impl TryFrom<RoundBarRepr> for RoundBar {
    type Error = CalcError;

    fn try_from(repr: RoundBarRepr) -> Result<Self, Self::Error> {
        match repr.label {
            Some(label) => RoundBar::with_label(repr.diameter, label, repr.units),
            None => RoundBar::new(repr.diameter, repr.units),
        }
    }
}

impl From<RoundBar> for RoundBarRepr {
    fn from(bar: RoundBar) -> Self {
        RoundBarRepr {
            diameter: bar.d,
            label: Some(bar.label),
            units: bar.units,
        }
    }
}

/// Solid rectangular bar. `width` is b (parallel to the x-axis), `height`
/// is d, so major-axis bending is about x when height > width.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "RectBarRepr", into = "RectBarRepr")]
pub struct RectBar {
    label: String,
    units: UnitSystem,
    b: f64,
    h: f64,
    area: f64,
    ix: f64,
    iy: f64,
    rx: f64,
    ry: f64,
    sx: f64,
    sy: f64,
    zx: f64,
    zy: f64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
struct RectBarRepr {
    width: f64,
    height: f64,
    #[serde(default)]
    label: Option<String>,
    #[serde(default)]
    units: UnitSystem,
}

impl RectBar {
    /// Create a rectangular bar with the default label, e.g. `"1x4-in Rect Bar"`.
    pub fn new(width: f64, height: f64, units: UnitSystem) -> CalcResult<Self> {
        check_dimension("width", width)?;
        check_dimension("height", height)?;
        let area = rectangular_area(width, height);
        let ix = rectangular_moment_of_inertia(width, height);
        let iy = rectangular_moment_of_inertia(height, width);
        Ok(RectBar {
            label: format!("{}x{}-{} Rect Bar", width, height, units.length),
            units,
            b: width,
            h: height,
            area,
            ix,
            iy,
            rx: radius_of_gyration(ix, area),
            ry: radius_of_gyration(iy, area),
            sx: rectangular_section_modulus(width, height),
            sy: rectangular_section_modulus(height, width),
            zx: rectangular_plastic_modulus(width, height),
            zy: rectangular_plastic_modulus(height, width),
        })
    }

    pub fn with_label(width: f64, height: f64, label: impl Into<String>, units: UnitSystem) -> CalcResult<Self> {
        let mut bar = Self::new(width, height, units)?;
        let label = label.into();
        if !label.is_empty() {
            bar.label = label;
        }
        Ok(bar)
    }

    pub fn label(&self) -> &str {
        &self.label
    }

    pub fn units(&self) -> UnitSystem {
        self.units
    }

    /// Width b
    pub fn width(&self) -> f64 {
        self.b
    }

    /// Height (depth) d
    pub fn height(&self) -> f64 {
        self.h
    }

    pub fn area(&self) -> f64 {
        self.area
    }

    pub fn ix(&self) -> f64 {
        self.ix
    }

    pub fn iy(&self) -> f64 {
        self.iy
    }

    pub fn rx(&self) -> f64 {
        self.rx
    }

    pub fn ry(&self) -> f64 {
        self.ry
    }

    pub fn sx(&self) -> f64 {
        self.sx
    }

    pub fn sy(&self) -> f64 {
        self.sy
    }

    pub fn zx(&self) -> f64 {
        self.zx
    }

    pub fn zy(&self) -> f64 {
        self.zy
    }
}

impl TryFrom<RectBarRepr> for RectBar {
    type Error = CalcError;

    fn try_from(repr: RectBarRepr) -> Result<Self, Self::Error> {
        match repr.label {
            Some(label) => RectBar::with_label(repr.width, repr.height, label, repr.units),
            None => RectBar::new(repr.width, repr.height, repr.units),
        }
    }
}

impl From<RectBar> for RectBarRepr {
    fn from(bar: RectBar) -> Self {
        RectBarRepr {
            width: bar.b,
            height: bar.h,
            label: Some(bar.label),
            units: bar.units,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::units::{IN_KIP, MM_KN};
    use std::f64::consts::PI;

    fn approx_eq(a: f64, b: f64) -> bool {
        (a - b).abs() < 1e-9
    }

    #[test]
    fn test_round_bar_properties() {
        let bar = RoundBar::new(2.0, IN_KIP).unwrap();
        assert_eq!(bar.label(), "2-in Ø Round Bar");
        assert!(approx_eq(bar.area(), PI));
        assert!(approx_eq(bar.i(), PI / 4.0));
        assert!(approx_eq(bar.r(), 0.5));
        assert!(approx_eq(bar.s(), PI / 4.0));
        assert!(approx_eq(bar.z(), 4.0 / 3.0));
        assert_eq!(bar.radius(), 1.0);
    }

    #[test]
    fn test_round_bar_label() {
        let bar = RoundBar::with_label(25.0, "RB-1", MM_KN).unwrap();
        assert_eq!(bar.label(), "RB-1");
        assert_eq!(bar.units(), MM_KN);

        let unlabeled = RoundBar::with_label(25.0, "", MM_KN).unwrap();
        assert_eq!(unlabeled.label(), "25-mm Ø Round Bar");
    }

    #[test]
    fn test_rect_bar_properties() {
        let bar = RectBar::new(1.0, 4.0, IN_KIP).unwrap();
        assert_eq!(bar.label(), "1x4-in Rect Bar");
        assert!(approx_eq(bar.area(), 4.0));
        assert!(approx_eq(bar.ix(), 64.0 / 12.0));
        assert!(approx_eq(bar.iy(), 4.0 / 12.0));
        assert!(approx_eq(bar.rx(), 4.0 / 12.0_f64.sqrt()));
        assert!(approx_eq(bar.ry(), 1.0 / 12.0_f64.sqrt()));
        assert!(approx_eq(bar.sx(), 16.0 / 6.0));
        assert!(approx_eq(bar.sy(), 4.0 / 6.0));
        assert!(approx_eq(bar.zx(), 4.0));
        assert!(approx_eq(bar.zy(), 1.0));
    }

    #[test]
    fn test_invalid_dimensions() {
        assert!(RoundBar::new(0.0, IN_KIP).unwrap_err().is_domain());
        assert!(RoundBar::new(-1.0, IN_KIP).is_err());
        assert!(RectBar::new(1.0, f64::NAN, IN_KIP).is_err());
        assert!(RectBar::new(-2.0, 1.0, IN_KIP).is_err());
    }

    #[test]
    fn test_serialization_stores_dimensions_only() {
        let bar = RectBar::new(0.75, 3.0, IN_KIP).unwrap();
        let json = serde_json::to_string(&bar).unwrap();
        assert!(json.contains("\"width\":0.75"));
        assert!(!json.contains("ix"));
        let roundtrip: RectBar = serde_json::from_str(&json).unwrap();
        assert_eq!(roundtrip, bar);

        let parsed: RoundBar = serde_json::from_str(r#"{"diameter": 1.5}"#).unwrap();
        assert_eq!(parsed.units(), IN_KIP);
        assert!(approx_eq(parsed.diameter(), 1.5));

        assert!(serde_json::from_str::<RoundBar>(r#"{"diameter": -1.0}"#).is_err());
    }
}
