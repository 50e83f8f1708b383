//! # AISC 360-22 Design Checks
//!
//! Formula functions for the *Specification for Structural Steel Buildings*
//! (ANSI/AISC 360-22). Every function records its work in a [`CalcLog`]
//! and returns the final [`Quantity`], citing the governing equation.
//!
//! - [`compression`] - Chapter E, members in axial compression
//! - [`flexure`] - Chapter F, members in bending
//!
//! Nominal strengths are turned into design (LRFD) or allowable (ASD)
//! strengths by [`apply_design_method`].
//!
//! ## Example
//!
//! ```rust
//! use steel_core::aisc360::{apply_design_method, DesignMethod, LimitState};
//! use steel_core::calc::CalcLog;
//! use steel_core::units::IN_KIP;
//!
//! let mut log = CalcLog::new();
//! let pn = log.input("P_n", 100.0, Some("kip"), "Nominal compressive strength").unwrap();
//! let design = apply_design_method(&mut log, &pn, DesignMethod::Lrfd, LimitState::Compression, IN_KIP).unwrap();
//! assert!((design.value() - 90.0).abs() < 1e-9);
//! assert_eq!(design.symbol(), "\\phi_cP_n");
//! ```

pub mod compression;
pub mod flexure;

use serde::{Deserialize, Serialize};
use std::str::FromStr;

use crate::calc::{CalcLog, Quantity};
use crate::errors::{CalcError, CalcResult};
use crate::units::UnitSystem;

// =============================================================================
// DESIGN CODE AND METHOD
// =============================================================================

/// Design codes the engine implements
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum DesignCode {
    #[serde(rename = "aisc_360_22", alias = "AISC 360-22")]
    Aisc360_22,
}

impl DesignCode {
    pub const AVAILABLE: [&'static str; 1] = ["aisc_360_22"];

    pub fn code(&self) -> &'static str {
        match self {
            DesignCode::Aisc360_22 => "aisc_360_22",
        }
    }

    pub fn display_name(&self) -> &'static str {
        match self {
            DesignCode::Aisc360_22 => "AISC 360-22",
        }
    }
}

impl FromStr for DesignCode {
    type Err = CalcError;

    /// Accepts "aisc_360_22", "AISC 360-22", "aisc360-22" and similar.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let key: String = s
            .trim()
            .to_lowercase()
            .chars()
            .filter(|c| c.is_ascii_alphanumeric())
            .collect();
        match key.as_str() {
            "aisc36022" => Ok(DesignCode::Aisc360_22),
            _ => Err(CalcError::invalid_design_code(s, &Self::AVAILABLE)),
        }
    }
}

impl std::fmt::Display for DesignCode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.display_name())
    }
}

/// How a nominal strength becomes the available strength
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DesignMethod {
    /// Unfactored nominal strength
    Nominal,
    /// Load and Resistance Factor Design: φRn
    Lrfd,
    /// Allowable Strength Design: Rn/Ω
    Asd,
}

impl DesignMethod {
    pub const AVAILABLE: [&'static str; 3] = ["nominal", "lrfd", "asd"];

    /// Short abbreviation
    pub fn code(&self) -> &'static str {
        match self {
            DesignMethod::Nominal => "nominal",
            DesignMethod::Lrfd => "LRFD",
            DesignMethod::Asd => "ASD",
        }
    }

    pub fn display_name(&self) -> &'static str {
        match self {
            DesignMethod::Nominal => "Nominal (unfactored)",
            DesignMethod::Lrfd => "LRFD (Load and Resistance Factor Design)",
            DesignMethod::Asd => "ASD (Allowable Strength Design)",
        }
    }
}

impl FromStr for DesignMethod {
    type Err = CalcError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "nominal" | "unfactored" => Ok(DesignMethod::Nominal),
            "lrfd" => Ok(DesignMethod::Lrfd),
            "asd" => Ok(DesignMethod::Asd),
            _ => Err(CalcError::invalid_design_method(s, &Self::AVAILABLE)),
        }
    }
}

impl std::fmt::Display for DesignMethod {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.code())
    }
}

// =============================================================================
// RESISTANCE AND SAFETY FACTORS
// =============================================================================

/// φ and Ω for one limit state
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ResistanceFactors {
    /// LRFD resistance factor φ
    pub phi: f64,
    /// ASD safety factor Ω
    pub omega: f64,
}

/// Limit states with their own factors and result symbols
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LimitState {
    Compression,
    Flexure,
}

impl LimitState {
    /// Sect E1: φc = 0.90, Ωc = 1.67. Sect F1: φb = 0.90, Ωb = 1.67.
    pub fn factors(&self) -> ResistanceFactors {
        match self {
            LimitState::Compression => ResistanceFactors { phi: 0.90, omega: 1.67 },
            LimitState::Flexure => ResistanceFactors { phi: 0.90, omega: 1.67 },
        }
    }

    /// Clause prescribing the factors
    pub fn reference(&self) -> &'static str {
        match self {
            LimitState::Compression => "AISC 360-22 Sect E1",
            LimitState::Flexure => "AISC 360-22 Sect F1",
        }
    }

    fn subscript(&self) -> &'static str {
        match self {
            LimitState::Compression => "c",
            LimitState::Flexure => "b",
        }
    }

    fn nominal_symbol(&self) -> &'static str {
        match self {
            LimitState::Compression => "P_n",
            LimitState::Flexure => "M_n",
        }
    }

    fn noun(&self) -> &'static str {
        match self {
            LimitState::Compression => "compressive",
            LimitState::Flexure => "flexural",
        }
    }

    /// Unit of the strength in `units`
    pub fn unit(&self, units: UnitSystem) -> &'static str {
        match self {
            LimitState::Compression => units.force,
            LimitState::Flexure => units.moment,
        }
    }
}

/// Convert a nominal strength into the available strength for `method`.
///
/// - Nominal: returned unmodified, nothing logged
/// - LRFD: φ·Rn, logged as `\phi_cP_n` / `\phi_bM_n`
/// - ASD: Rn/Ω, logged as `P_n/\Omega_c` / `M_n/\Omega_b`
pub fn apply_design_method(
    log: &mut CalcLog,
    nominal: &Quantity,
    method: DesignMethod,
    limit_state: LimitState,
    units: UnitSystem,
) -> CalcResult<Quantity> {
    let factors = limit_state.factors();
    let sub = limit_state.subscript();
    let rn = limit_state.nominal_symbol();
    let unit = Some(limit_state.unit(units));

    match method {
        DesignMethod::Nominal => Ok(nominal.clone()),
        DesignMethod::Lrfd => {
            let phi = log.cited_input(
                &format!("\\phi_{}", sub),
                factors.phi,
                None,
                "LRFD strength reduction factor",
                Some(limit_state.reference()),
            )?;
            let product = log.mul(&phi, nominal)?;
            log.calculation(
                &format!("\\phi_{}{}", sub, rn),
                &product,
                unit,
                &format!("Design {} strength", limit_state.noun()),
                None,
            )
        }
        DesignMethod::Asd => {
            let omega = log.cited_input(
                &format!("\\Omega_{}", sub),
                factors.omega,
                None,
                "ASD safety factor",
                Some(limit_state.reference()),
            )?;
            let quotient = log.div(nominal, &omega)?;
            log.calculation(
                &format!("{}/\\Omega_{}", rn, sub),
                &quotient,
                unit,
                &format!("Allowable {} strength", limit_state.noun()),
                None,
            )
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::units::{IN_KIP, MM_KN};

    fn approx_eq(a: f64, b: f64) -> bool {
        (a - b).abs() < 1e-9
    }

    #[test]
    fn test_design_code_parsing() {
        for s in ["aisc_360_22", "AISC 360-22", "aisc360-22", " Aisc-360-22 "] {
            assert_eq!(s.parse::<DesignCode>().unwrap(), DesignCode::Aisc360_22, "{}", s);
        }
        let err = "aisc_360_16".parse::<DesignCode>().unwrap_err();
        assert_eq!(err.error_code(), "INVALID_DESIGN_CODE");
        assert!(err.is_configuration());
        assert!("csa_s16".parse::<DesignCode>().is_err());
    }

    #[test]
    fn test_design_method_parsing() {
        assert_eq!("LRFD".parse::<DesignMethod>().unwrap(), DesignMethod::Lrfd);
        assert_eq!("asd".parse::<DesignMethod>().unwrap(), DesignMethod::Asd);
        assert_eq!(" Nominal ".parse::<DesignMethod>().unwrap(), DesignMethod::Nominal);

        let err = "lsd".parse::<DesignMethod>().unwrap_err();
        assert_eq!(err.error_code(), "INVALID_DESIGN_METHOD");
        assert!(err.to_string().contains("nominal, lrfd, asd"));
    }

    #[test]
    fn test_serde_names() {
        assert_eq!(serde_json::to_string(&DesignMethod::Lrfd).unwrap(), "\"lrfd\"");
        assert_eq!(serde_json::to_string(&DesignCode::Aisc360_22).unwrap(), "\"aisc_360_22\"");
        let code: DesignCode = serde_json::from_str("\"AISC 360-22\"").unwrap();
        assert_eq!(code, DesignCode::Aisc360_22);
    }

    #[test]
    fn test_factors() {
        for state in [LimitState::Compression, LimitState::Flexure] {
            let f = state.factors();
            assert_eq!(f.phi, 0.90);
            assert_eq!(f.omega, 1.67);
        }
        assert_eq!(LimitState::Compression.reference(), "AISC 360-22 Sect E1");
        assert_eq!(LimitState::Flexure.reference(), "AISC 360-22 Sect F1");
    }

    #[test]
    fn test_nominal_is_unmodified() {
        let mut log = CalcLog::new();
        let pn = log.input("P_n", 250.0, Some("kip"), "Nominal").unwrap();
        let before = log.len();
        let out = apply_design_method(&mut log, &pn, DesignMethod::Nominal, LimitState::Compression, IN_KIP).unwrap();
        assert_eq!(out, pn);
        assert_eq!(log.len(), before);
    }

    #[test]
    fn test_lrfd_and_asd() {
        let mut log = CalcLog::new();
        let mn = log.input("M_n", 334.0, Some("kN-mm"), "Nominal").unwrap();

        let lrfd = apply_design_method(&mut log, &mn, DesignMethod::Lrfd, LimitState::Flexure, MM_KN).unwrap();
        assert!(approx_eq(lrfd.value(), 0.90 * 334.0));
        assert_eq!(lrfd.symbol(), "\\phi_bM_n");
        assert_eq!(lrfd.unit(), Some("kN-mm"));

        let asd = apply_design_method(&mut log, &mn, DesignMethod::Asd, LimitState::Flexure, MM_KN).unwrap();
        assert!(approx_eq(asd.value(), 334.0 / 1.67));
        assert_eq!(asd.symbol(), "M_n/\\Omega_b");
        assert_eq!(asd.description(), Some("Allowable flexural strength"));

        assert!(log.references().contains(&"AISC 360-22 Sect F1"));
    }
}
