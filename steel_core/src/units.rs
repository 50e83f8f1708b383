//! # Unit Systems
//!
//! A [`UnitSystem`] is an immutable bundle of unit labels used to annotate
//! every quantity a calculation produces. The engine never converts between
//! systems; it only tags numbers so the calculation log reads correctly.
//!
//! Two systems are supported, each derived from one base length/force pair:
//!
//! | System  | Length | Force | Stress | Moment |
//! |---------|--------|-------|--------|--------|
//! | `in-kip`| in     | kip   | ksi    | kip-in |
//! | `mm-kN` | mm     | kN    | MPa    | kN-mm  |
//!
//! ## Example
//!
//! ```rust
//! use steel_core::units::{UnitSystem, IN_KIP};
//!
//! let units = UnitSystem::from_label("in-kip").unwrap();
//! assert_eq!(units, IN_KIP);
//! assert_eq!(units.stress, "ksi");
//! ```

use serde::{de, Deserialize, Deserializer, Serialize};

use crate::errors::{CalcError, CalcResult};

/// Named bundle of unit labels.
///
/// Serializes as its label (`"in-kip"`), so members and configs stay readable.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(into = "String")]
pub struct UnitSystem {
    pub label: &'static str,
    pub length: &'static str,
    pub area: &'static str,
    pub volume: &'static str,
    pub force: &'static str,
    pub stress: &'static str,
    pub moment: &'static str,
    pub unit_weight: &'static str,
}

/// US customary: inches and kips
pub const IN_KIP: UnitSystem = UnitSystem {
    label: "in-kip",
    length: "in",
    area: "in^2",
    volume: "in^3",
    force: "kip",
    stress: "ksi",
    moment: "kip-in",
    unit_weight: "kip/in^3",
};

/// SI: millimetres and kilonewtons (stress in MPa = N/mm^2)
pub const MM_KN: UnitSystem = UnitSystem {
    label: "mm-kN",
    length: "mm",
    area: "mm^2",
    volume: "mm^3",
    force: "kN",
    stress: "MPa",
    moment: "kN-mm",
    unit_weight: "kN/mm^3",
};

/// Every unit system the engine knows about
pub const ALL_UNIT_SYSTEMS: [UnitSystem; 2] = [IN_KIP, MM_KN];

impl UnitSystem {
    /// Look up a unit system by label (case-insensitive)
    pub fn from_label(label: &str) -> CalcResult<Self> {
        ALL_UNIT_SYSTEMS
            .iter()
            .find(|u| u.label.eq_ignore_ascii_case(label.trim()))
            .copied()
            .ok_or_else(|| {
                CalcError::invalid_input("units", label, "Expected one of: in-kip, mm-kN")
            })
    }

    /// Convert a length given in feet into this system's length unit
    pub fn feet_to_length(&self, feet: f64) -> f64 {
        if *self == MM_KN {
            feet * 304.8
        } else {
            feet * 12.0
        }
    }
}

impl Default for UnitSystem {
    fn default() -> Self {
        IN_KIP
    }
}

impl std::fmt::Display for UnitSystem {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.label)
    }
}

impl TryFrom<String> for UnitSystem {
    type Error = CalcError;

    fn try_from(label: String) -> Result<Self, Self::Error> {
        UnitSystem::from_label(&label)
    }
}

// Labels are `&'static str`, so the derive would tie the input lifetime to
// 'static; read an owned label and look it up instead.
impl<'de> Deserialize<'de> for UnitSystem {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let label = String::deserialize(deserializer)?;
        UnitSystem::from_label(&label).map_err(de::Error::custom)
    }
}

impl From<UnitSystem> for String {
    fn from(units: UnitSystem) -> Self {
        units.label.to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_label() {
        assert_eq!(UnitSystem::from_label("in-kip").unwrap(), IN_KIP);
        assert_eq!(UnitSystem::from_label("MM-KN").unwrap(), MM_KN);
        assert!(UnitSystem::from_label("ft-lb").is_err());
    }

    #[test]
    fn test_labels_share_base_units() {
        for units in ALL_UNIT_SYSTEMS {
            assert!(units.area.starts_with(units.length));
            assert!(units.volume.starts_with(units.length));
            assert!(units.moment.contains(units.force));
            assert!(units.unit_weight.starts_with(units.force));
        }
    }

    #[test]
    fn test_feet_to_length() {
        assert_eq!(IN_KIP.feet_to_length(10.0), 120.0);
        assert!((MM_KN.feet_to_length(1.0) - 304.8).abs() < 1e-9);
    }

    #[test]
    fn test_serialization() {
        let json = serde_json::to_string(&MM_KN).unwrap();
        assert_eq!(json, "\"mm-kN\"");

        let roundtrip: UnitSystem = serde_json::from_str(&json).unwrap();
        assert_eq!(roundtrip, MM_KN);

        assert!(serde_json::from_str::<UnitSystem>("\"furlong-stone\"").is_err());
    }

    #[derive(Deserialize)]
    struct Tagged {
        #[serde(default)]
        units: UnitSystem,
    }

    #[test]
    fn test_deserialize_from_borrowed_input() {
        let json = String::from(r#"{"units": "mm-kN"}"#);
        let tagged: Tagged = serde_json::from_str(&json).unwrap();
        assert_eq!(tagged.units, MM_KN);

        let tagged: Tagged = serde_json::from_slice(b"{}").unwrap();
        assert_eq!(tagged.units, IN_KIP);
    }
}
