//! # Engine Configuration
//!
//! Session-wide defaults read from a JSON file: unit system, design method,
//! default steel grade, optional E/G/γ overrides and an optional AISC shapes
//! CSV. Every field has a default, so `{}` is a valid configuration.
//!
//! ```json
//! {
//!   "units": "in-kip",
//!   "method": "asd",
//!   "steel_grade": "A36",
//!   "shapes_csv": "aisc-shapes-v16.csv"
//! }
//! ```

use std::fs;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::aisc360::DesignMethod;
use crate::errors::{CalcError, CalcResult};
use crate::materials::{grade_by_name, SteelDefaults, SteelMaterial};
use crate::sections::{builtin_w_shapes, SteelShapeDb};
use crate::units::UnitSystem;

/// MPa per ksi
const MPA_PER_KSI: f64 = 6.894757;

fn default_method() -> DesignMethod {
    DesignMethod::Lrfd
}

fn default_grade() -> String {
    "A992".to_string()
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EngineConfig {
    #[serde(default)]
    pub units: UnitSystem,

    #[serde(default = "default_method")]
    pub method: DesignMethod,

    /// Grade used when a command names no material
    #[serde(default = "default_grade")]
    pub steel_grade: String,

    /// Overrides for E, G and γ; unit-system defaults when absent
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub defaults: Option<SteelDefaults>,

    /// AISC shapes CSV export; the built-in W-shape table when absent
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub shapes_csv: Option<PathBuf>,
}

impl Default for EngineConfig {
    fn default() -> Self {
        EngineConfig {
            units: UnitSystem::default(),
            method: default_method(),
            steel_grade: default_grade(),
            defaults: None,
            shapes_csv: None,
        }
    }
}

impl EngineConfig {
    pub fn from_json_str(json: &str) -> CalcResult<Self> {
        Ok(serde_json::from_str(json)?)
    }

    /// Read a configuration file.
    pub fn load(path: &Path) -> CalcResult<Self> {
        let contents = fs::read_to_string(path)
            .map_err(|e| CalcError::file_error("read", path.display().to_string(), e.to_string()))?;
        let config: EngineConfig = serde_json::from_str(&contents).map_err(|e| CalcError::SerializationError {
            reason: format!("Invalid JSON in {}: {}", path.display(), e),
        })?;
        tracing::debug!(path = %path.display(), units = %config.units, method = %config.method, "loaded config");
        Ok(config)
    }

    pub fn steel_defaults(&self) -> SteelDefaults {
        self.defaults.unwrap_or_else(|| SteelDefaults::for_units(self.units))
    }

    /// Material for `grade` (or the configured default grade) in this
    /// configuration's unit system. Tabulated grades are stored in ksi and
    /// are converted when the configuration is in mm-kN.
    pub fn material(&self, grade: Option<&str>) -> CalcResult<SteelMaterial> {
        let base = grade_by_name(grade.unwrap_or(&self.steel_grade))?;
        let scale = if base.units() == self.units {
            1.0
        } else {
            MPA_PER_KSI
        };
        SteelMaterial::with_defaults(
            base.name(),
            base.fy() * scale,
            base.fu() * scale,
            self.units,
            self.steel_defaults(),
        )
    }

    /// Shapes table named by `shapes_csv`, or the built-in W-shapes.
    pub fn shape_db(&self) -> CalcResult<SteelShapeDb> {
        match &self.shapes_csv {
            Some(path) => SteelShapeDb::load_from_csv(&path.to_string_lossy()),
            None => Ok(builtin_w_shapes().clone()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::units::{IN_KIP, MM_KN};
    use std::env::temp_dir;

    #[test]
    fn test_defaults() {
        let config = EngineConfig::from_json_str("{}").unwrap();
        assert_eq!(config, EngineConfig::default());
        assert_eq!(config.units, IN_KIP);
        assert_eq!(config.method, DesignMethod::Lrfd);
        assert_eq!(config.material(None).unwrap().fy(), 50.0);
        assert!(config.shape_db().unwrap().lookup("W14X90").is_ok());
    }

    #[test]
    fn test_si_material_conversion() {
        let config = EngineConfig::from_json_str(r#"{"units": "mm-kN", "steel_grade": "A36"}"#).unwrap();
        let material = config.material(None).unwrap();
        assert_eq!(material.units(), MM_KN);
        assert!((material.fy() - 248.2).abs() < 0.1);
        assert_eq!(material.e(), 200_000.0);
    }

    #[test]
    fn test_overrides() {
        let config =
            EngineConfig::from_json_str(r#"{"method": "asd", "defaults": {"e": 29500, "g": 11300, "gamma": 0.00028}}"#)
                .unwrap();
        assert_eq!(config.method, DesignMethod::Asd);
        let material = config.material(Some("A572-50")).unwrap();
        assert_eq!(material.e(), 29500.0);
        assert_eq!(material.g(), 11300.0);
    }

    #[test]
    fn test_invalid_values() {
        let err = EngineConfig::from_json_str(r#"{"method": "lsd"}"#).unwrap_err();
        assert_eq!(err.error_code(), "SERIALIZATION_ERROR");
        let err = EngineConfig::default().material(Some("A53")).unwrap_err();
        assert_eq!(err.error_code(), "INVALID_INPUT");
    }

    #[test]
    fn test_load_from_file() {
        let path = temp_dir().join("steel_core_test_config.json");
        fs::write(&path, r#"{"units": "in-kip", "method": "nominal"}"#).unwrap();
        let config = EngineConfig::load(&path).unwrap();
        assert_eq!(config.method, DesignMethod::Nominal);
        let _ = fs::remove_file(&path);

        let err = EngineConfig::load(&temp_dir().join("steel_core_missing_config.json")).unwrap_err();
        assert_eq!(err.error_code(), "FILE_ERROR");
    }

    #[test]
    fn test_missing_shapes_csv() {
        let config = EngineConfig {
            shapes_csv: Some(PathBuf::from("/nonexistent/shapes.csv")),
            ..Default::default()
        };
        assert_eq!(config.shape_db().unwrap_err().error_code(), "FILE_ERROR");
    }
}
