//! # Steel Materials
//!
//! Mechanical properties of structural steel grades.
//!
//! Fy and Fu identify the grade. The elastic modulus, shear modulus and unit
//! weight are practically the same for every structural steel, so when they
//! are not given they fall back to [`SteelDefaults::for_units`]. The fallback
//! depends on the unit system only, never on the grade; pass explicit
//! defaults with [`SteelMaterial::with_defaults`] to override it.
//!
//! ## Example
//!
//! ```rust
//! use steel_core::materials::{SteelMaterial, ASTM_A992_GR_50};
//! use steel_core::units::MM_KN;
//!
//! assert_eq!(ASTM_A992_GR_50.fy(), 50.0);
//! assert_eq!(ASTM_A992_GR_50.e(), 29000.0);
//!
//! let s355 = SteelMaterial::new("S355", 355.0, 470.0, MM_KN).unwrap();
//! assert_eq!(s355.e(), 200000.0);
//! ```

use once_cell::sync::Lazy;
use serde::{Deserialize, Serialize};

use crate::errors::{CalcError, CalcResult};
use crate::units::{UnitSystem, IN_KIP, MM_KN};

/// Fallback values for the grade-independent steel constants.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SteelDefaults {
    /// Modulus of elasticity E
    pub e: f64,
    /// Shear modulus G
    pub g: f64,
    /// Unit weight γ
    pub gamma: f64,
}

impl SteelDefaults {
    /// Defaults implied by a unit system (E = 29000 ksi / 200000 MPa, etc.)
    pub fn for_units(units: UnitSystem) -> Self {
        if units == MM_KN {
            SteelDefaults {
                e: 200_000.0,
                g: 77_200.0,
                gamma: 7.85e-8,
            }
        } else {
            SteelDefaults {
                e: 29_000.0,
                g: 11_200.0,
                gamma: 0.000284,
            }
        }
    }
}

/// Steel material properties.
///
/// Immutable once built; the `with_*` methods consume and return `self` so a
/// material can be customised before it is shared.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "MaterialRepr", into = "MaterialRepr")]
pub struct SteelMaterial {
    name: String,
    fy: f64,
    fu: f64,
    e: f64,
    g: f64,
    gamma: f64,
    units: UnitSystem,
}

impl SteelMaterial {
    /// Create a material using the unit-system defaults for E, G and γ.
    pub fn new(name: impl Into<String>, fy: f64, fu: f64, units: UnitSystem) -> CalcResult<Self> {
        Self::with_defaults(name, fy, fu, units, SteelDefaults::for_units(units))
    }

    /// Create a material with explicit fallback constants.
    pub fn with_defaults(
        name: impl Into<String>,
        fy: f64,
        fu: f64,
        units: UnitSystem,
        defaults: SteelDefaults,
    ) -> CalcResult<Self> {
        if !(fy > 0.0) {
            return Err(CalcError::invalid_input("fy", fy.to_string(), "Yield stress must be positive"));
        }
        if !(fu >= fy) {
            return Err(CalcError::invalid_input(
                "fu",
                fu.to_string(),
                "Ultimate stress cannot be less than yield stress",
            ));
        }
        Ok(SteelMaterial {
            name: name.into(),
            fy,
            fu,
            e: check_modulus("e", defaults.e)?,
            g: check_modulus("g", defaults.g)?,
            gamma: check_unit_weight(defaults.gamma)?,
            units,
        })
    }

    /// Override the elastic modulus
    pub fn with_elastic_modulus(mut self, e: f64) -> CalcResult<Self> {
        self.e = check_modulus("e", e)?;
        Ok(self)
    }

    /// Override the shear modulus
    pub fn with_shear_modulus(mut self, g: f64) -> CalcResult<Self> {
        self.g = check_modulus("g", g)?;
        Ok(self)
    }

    /// Override the unit weight
    pub fn with_unit_weight(mut self, gamma: f64) -> CalcResult<Self> {
        self.gamma = check_unit_weight(gamma)?;
        Ok(self)
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// Specified minimum yield stress Fy
    pub fn fy(&self) -> f64 {
        self.fy
    }

    /// Specified minimum tensile strength Fu
    pub fn fu(&self) -> f64 {
        self.fu
    }

    /// Modulus of elasticity E
    pub fn e(&self) -> f64 {
        self.e
    }

    /// Shear modulus G
    pub fn g(&self) -> f64 {
        self.g
    }

    /// Unit weight γ
    pub fn gamma(&self) -> f64 {
        self.gamma
    }

    pub fn units(&self) -> UnitSystem {
        self.units
    }
}

fn check_modulus(field: &str, value: f64) -> CalcResult<f64> {
    if value > 0.0 && value.is_finite() {
        Ok(value)
    } else {
        Err(CalcError::invalid_input(field, value.to_string(), "Modulus must be positive and finite"))
    }
}

fn check_unit_weight(value: f64) -> CalcResult<f64> {
    if value >= 0.0 && value.is_finite() {
        Ok(value)
    } else {
        Err(CalcError::invalid_input(
            "gamma",
            value.to_string(),
            "Unit weight must be finite and non-negative",
        ))
    }
}

/// JSON form of a material; E, G and γ fall back to the unit-system defaults.
#[derive(Debug, Clone, Serialize, Deserialize)]
struct MaterialRepr {
    name: String,
    fy: f64,
    fu: f64,
    #[serde(default)]
    units: UnitSystem,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    e: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    g: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    gamma: Option<f64>,
}

impl TryFrom<MaterialRepr> for SteelMaterial {
    type Error = CalcError;

    fn try_from(repr: MaterialRepr) -> Result<Self, Self::Error> {
        let fallback = SteelDefaults::for_units(repr.units);
        let defaults = SteelDefaults {
            e: repr.e.unwrap_or(fallback.e),
            g: repr.g.unwrap_or(fallback.g),
            gamma: repr.gamma.unwrap_or(fallback.gamma),
        };
        SteelMaterial::with_defaults(repr.name, repr.fy, repr.fu, repr.units, defaults)
    }
}

impl From<SteelMaterial> for MaterialRepr {
    fn from(m: SteelMaterial) -> Self {
        MaterialRepr {
            name: m.name,
            fy: m.fy,
            fu: m.fu,
            units: m.units,
            e: Some(m.e),
            g: Some(m.g),
            gamma: Some(m.gamma),
        }
    }
}

impl std::fmt::Display for SteelMaterial {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} (Fy = {} {})", self.name, self.fy, self.units.stress)
    }
}

fn in_kip_grade(name: &str, fy: f64, fu: f64) -> SteelMaterial {
    let defaults = SteelDefaults::for_units(IN_KIP);
    SteelMaterial {
        name: name.to_string(),
        fy,
        fu,
        e: defaults.e,
        g: defaults.g,
        gamma: defaults.gamma,
        units: IN_KIP,
    }
}

/// ASTM A36 mild carbon steel
pub static ASTM_A36: Lazy<SteelMaterial> = Lazy::new(|| in_kip_grade("ASTM A36", 36.0, 58.0));

/// ASTM A572 Grade 50 high-strength low-alloy steel
pub static ASTM_A572_GR_50: Lazy<SteelMaterial> = Lazy::new(|| in_kip_grade("ASTM A572 Gr. 50", 50.0, 65.0));

/// ASTM A992 structural shapes steel
pub static ASTM_A992_GR_50: Lazy<SteelMaterial> = Lazy::new(|| in_kip_grade("ASTM A992", 50.0, 65.0));

/// Look up a pre-built grade by short name ("A36", "A572-50", "A992").
pub fn grade_by_name(name: &str) -> CalcResult<&'static SteelMaterial> {
    let key = name.trim().to_uppercase().replace([' ', '_'], "");
    match key.as_str() {
        "A36" | "ASTMA36" => Ok(&*ASTM_A36),
        "A572-50" | "A572GR50" | "A572" => Ok(&*ASTM_A572_GR_50),
        "A992" | "A992-50" | "ASTMA992" => Ok(&*ASTM_A992_GR_50),
        _ => Err(CalcError::invalid_input(
            "material",
            name,
            "Expected one of: A36, A572-50, A992",
        )),
    }
}
