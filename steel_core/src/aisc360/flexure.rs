//! # Chapter F: Design of Members for Flexure
//!
//! Sect F11, rectangular bars and rounds. Solid rounds are limited by
//! yielding only; rectangular bars bent about their major axis are also
//! checked for lateral-torsional buckling.
//!
//! Tabulated I-shapes (Sect F2 through F10) are not covered and report
//! `UnsupportedCheck`.

use super::compression::check_units;
use super::{apply_design_method, DesignMethod, LimitState};
use crate::calc::{Branches, CalcLog, CompareOp, NumericInput, Quantity};
use crate::errors::{CalcError, CalcResult};
use crate::materials::SteelMaterial;
use crate::sections::{RectBar, RoundBar, SteelSection};
use crate::units::UnitSystem;

/// Shape factor cap on the plastic moment of bars and rounds
pub const PLASTIC_MOMENT_CAP: f64 = 1.6;

// =============================================================================
// F11.1 YIELDING
// =============================================================================

/// Plastic moment capped at 1.6 times the yield moment (Eq F11-1)
///
/// Mp = min(Fy·Z, 1.6·Fy·Sx)
pub fn capped_plastic_moment<'a, 'b, 'c>(
    log: &mut CalcLog,
    yield_stress: impl Into<NumericInput<'a>>,
    plastic_modulus: impl Into<NumericInput<'b>>,
    elastic_modulus: impl Into<NumericInput<'c>>,
    units: UnitSystem,
) -> CalcResult<Quantity> {
    let fy = yield_stress.into().resolve(log, "F_y", Some(units.stress), "Yield stress")?;
    let sx = elastic_modulus
        .into()
        .resolve(log, "S_x", Some(units.volume), "Elastic section modulus")?;
    let z = plastic_modulus
        .into()
        .resolve(log, "Z", Some(units.volume), "Plastic section modulus")?;

    let plastic = log.mul(&fy, &z)?;
    let cap = log.mul(PLASTIC_MOMENT_CAP, &fy)?;
    let cap = log.mul(&cap, &sx)?;
    let mp = log.min(&plastic, &cap)?;
    log.calculation("M_p", &mp, Some(units.moment), "Plastic moment", Some("AISC 360-22 Eq F11-1"))
}

/// Nominal flexural strength of a solid round bar, limited by yielding
pub fn round_bar_plastic_moment(
    log: &mut CalcLog,
    section: &RoundBar,
    material: &SteelMaterial,
    units: UnitSystem,
) -> CalcResult<Quantity> {
    let mp = capped_plastic_moment(log, material.fy(), section.z(), section.s(), units)?;
    log.calculation("M_n", &mp, Some(units.moment), "Nominal flexural strength", None)
}

/// Available flexural strength of a solid round bar
pub fn round_bar_flexural_capacity(
    log: &mut CalcLog,
    section: &RoundBar,
    material: &SteelMaterial,
    method: DesignMethod,
    units: UnitSystem,
) -> CalcResult<Quantity> {
    check_units(&SteelSection::RoundBar(section.clone()), material, units)?;
    let mn = round_bar_plastic_moment(log, section, material, units)?;
    apply_design_method(log, &mn, method, LimitState::Flexure, units)
}

// =============================================================================
// F11.2 LATERAL-TORSIONAL BUCKLING
// =============================================================================

/// Nominal major-axis flexural strength of a rectangular bar.
///
/// With d = height and t = width, the slenderness Lb·d/t² selects:
///
/// - ≤ 0.08E/Fy: no lateral-torsional buckling, Mn = Mp (Eq F11-1)
/// - ≤ 1.9E/Fy: Mn = Cb[1.52 − 0.274(Lb·d/t²)(Fy/E)]My ≤ Mp (Eq F11-2)
/// - otherwise: Mn = Fcr·Sx ≤ Mp (Eq F11-3), Fcr = 1.9E·Cb/(Lb·d/t²) (Eq F11-4)
pub fn rect_bar_flexural_strength(
    log: &mut CalcLog,
    section: &RectBar,
    material: &SteelMaterial,
    unbraced_length: f64,
    cb: f64,
    units: UnitSystem,
) -> CalcResult<Quantity> {
    let fy = log.input("F_y", material.fy(), Some(units.stress), "Yield stress")?;
    let e = log.input("E", material.e(), Some(units.stress), "Modulus of elasticity")?;
    let sx = log.input("S_x", section.sx(), Some(units.volume), "Elastic section modulus")?;

    let mp = capped_plastic_moment(log, &fy, section.zx(), &sx, units)?;

    let lb = log.input("L_b", unbraced_length, Some(units.length), "Laterally unbraced length")?;
    let d = log.input("d", section.height(), Some(units.length), "Depth of rectangular bar")?;
    let t = log.input("t", section.width(), Some(units.length), "Width of rectangular bar parallel to the axis of bending")?;
    let lb_d = log.mul(&lb, &d)?;
    let t_sq = log.pow(&t, 2.0)?;
    let quotient = log.div(&lb_d, &t_sq)?;
    let slenderness = log.calculation(
        "\\frac{L_bd}{t^2}",
        &quotient,
        None,
        "Lateral-torsional buckling slenderness",
        None,
    )?;

    let e_fy = log.div(&e, &fy)?;
    let plastic_limit = log.mul(0.08, &e_fy)?;
    let no_ltb = log.compare(
        &slenderness,
        CompareOp::Le,
        &plastic_limit,
        Branches::new(
            "lateral-torsional buckling does not apply, use Eq F11-1",
            "lateral-torsional buckling applies",
        ),
    );
    if no_ltb {
        return log.calculation(
            "M_n",
            &mp,
            Some(units.moment),
            "Nominal flexural strength",
            Some("AISC 360-22 Eq F11-1"),
        );
    }

    let elastic_limit = log.mul(1.9, &e_fy)?;
    let inelastic = log.compare(
        &slenderness,
        CompareOp::Le,
        &elastic_limit,
        Branches::new("inelastic lateral-torsional buckling, use Eq F11-2", "elastic lateral-torsional buckling, use Eq F11-3"),
    );

    let cb = log.input("C_b", cb, None, "Lateral-torsional buckling modification factor")?;
    let ltb = if inelastic {
        let product = log.mul(&fy, &sx)?;
        let my = log.calculation("M_y", &product, Some(units.moment), "Yield moment", None)?;
        let fy_e = log.div(&fy, &e)?.grouped();
        let term = log.mul(0.274, &slenderness)?;
        let term = log.mul(&term, &fy_e)?;
        let bracket = log.sub(1.52, &term)?.grouped();
        let scaled = log.mul(&cb, &bracket)?;
        let mn = log.mul(&scaled, &my)?;
        log.calculation(
            "M_{n,LTB}",
            &mn,
            Some(units.moment),
            "Inelastic lateral-torsional buckling strength",
            Some("AISC 360-22 Eq F11-2"),
        )?
    } else {
        let numerator = log.mul(1.9, &e)?;
        let numerator = log.mul(&numerator, &cb)?;
        let stress = log.div(&numerator, &slenderness)?;
        let fcr = log.calculation("F_{cr}", &stress, Some(units.stress), "Critical stress", Some("AISC 360-22 Eq F11-4"))?;
        let mn = log.mul(&fcr, &sx)?;
        log.calculation(
            "M_{n,LTB}",
            &mn,
            Some(units.moment),
            "Elastic lateral-torsional buckling strength",
            Some("AISC 360-22 Eq F11-3"),
        )?
    };

    let governing = log.min(&ltb, &mp)?;
    log.calculation("M_n", &governing, Some(units.moment), "Nominal flexural strength", None)
}

/// Available major-axis flexural strength of a rectangular bar
pub fn rect_bar_flexural_capacity(
    log: &mut CalcLog,
    section: &RectBar,
    material: &SteelMaterial,
    unbraced_length: f64,
    cb: f64,
    method: DesignMethod,
    units: UnitSystem,
) -> CalcResult<Quantity> {
    check_units(&SteelSection::RectBar(section.clone()), material, units)?;
    let mn = rect_bar_flexural_strength(log, section, material, unbraced_length, cb, units)?;
    apply_design_method(log, &mn, method, LimitState::Flexure, units)
}

/// Available major-axis flexural strength of any section the engine covers.
///
/// `unbraced_length` and `cb` only matter for rectangular bars.
pub fn flexural_capacity(
    log: &mut CalcLog,
    section: &SteelSection,
    material: &SteelMaterial,
    unbraced_length: f64,
    cb: f64,
    method: DesignMethod,
    units: UnitSystem,
) -> CalcResult<Quantity> {
    tracing::debug!(section = section.label(), method = %method, "flexure check");
    match section {
        SteelSection::RoundBar(bar) => round_bar_flexural_capacity(log, bar, material, method, units),
        SteelSection::RectBar(bar) => rect_bar_flexural_capacity(log, bar, material, unbraced_length, cb, method, units),
        SteelSection::Tabulated(_) => Err(CalcError::unsupported_check("major-axis flexure", section.kind_name())),
    }
}
