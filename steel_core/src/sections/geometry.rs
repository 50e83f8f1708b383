//! # Cross-Section Property Formulas
//!
//! Closed-form geometric properties of solid bars.
//!
//! ## Notation
//!
//! - `A` = Cross-sectional area
//! - `I` = Moment of inertia (second moment of area)
//! - `S` = Elastic section modulus (I/c)
//! - `Z` = Plastic section modulus
//! - `r` = Radius of gyration (√(I/A))
//! - `b` = Width of section, `d` = depth of section (parallel to bending)
//!
//! ## References
//!
//! - AISC Steel Construction Manual, Part 1: Dimensions and Properties
//! - Roark's Formulas for Stress and Strain, 8th Edition, Table A.1

use std::f64::consts::PI;

// =============================================================================
// RECTANGULAR SECTION PROPERTIES
// =============================================================================

/// Area of a solid rectangle
///
/// # Formula
/// A = b × d
#[inline]
pub fn rectangular_area(b: f64, d: f64) -> f64 {
    b * d
}

/// Moment of inertia of a solid rectangle about the centroidal axis
/// parallel to `b`.
///
/// ```text
///     ┌─────────┐
///     │         │
///   d │ ════════│ ← neutral axis at d/2
///     │         │
///     └─────────┘
///          b
/// ```
///
/// # Formula
/// I = bd³/12
///
/// For the weak axis swap the arguments: I = db³/12.
///
/// # Example
/// ```rust
/// use steel_core::sections::geometry::rectangular_moment_of_inertia;
///
/// let i = rectangular_moment_of_inertia(1.0, 6.0);
/// assert!((i - 18.0).abs() < 1e-12);
/// ```
#[inline]
pub fn rectangular_moment_of_inertia(b: f64, d: f64) -> f64 {
    b * d.powi(3) / 12.0
}

/// Elastic section modulus of a solid rectangle
///
/// # Formula
/// S = I/c = bd³/12 ÷ d/2 = bd²/6
#[inline]
pub fn rectangular_section_modulus(b: f64, d: f64) -> f64 {
    b * d.powi(2) / 6.0
}

/// Plastic section modulus of a solid rectangle
///
/// Each half of the section (area bd/2) acts at d/4 from the plastic
/// neutral axis.
///
/// # Formula
/// Z = 2 × (bd/2) × (d/4) = bd²/4
#[inline]
pub fn rectangular_plastic_modulus(b: f64, d: f64) -> f64 {
    b * d.powi(2) / 4.0
}

// =============================================================================
// SOLID CIRCULAR SECTION PROPERTIES
// =============================================================================

/// Area of a solid circle: A = πR²
#[inline]
pub fn circular_area(diameter: f64) -> f64 {
    let r = diameter / 2.0;
    PI * r.powi(2)
}

/// Moment of inertia of a solid circle about a diameter: I = πR⁴/4
#[inline]
pub fn circular_moment_of_inertia(diameter: f64) -> f64 {
    let r = diameter / 2.0;
    PI * r.powi(4) / 4.0
}

/// Elastic section modulus of a solid circle: S = πD³/32
#[inline]
pub fn circular_section_modulus(diameter: f64) -> f64 {
    PI * diameter.powi(3) / 32.0
}

/// Plastic section modulus of a solid circle
///
/// Each half-disc (area πR²/2) has its centroid 4R/(3π) from the diameter.
///
/// # Formula
/// Z = 2 × (πR²/2) × 4R/(3π) = 4R³/3 = D³/6
#[inline]
pub fn circular_plastic_modulus(diameter: f64) -> f64 {
    let r = diameter / 2.0;
    4.0 * r.powi(3) / 3.0
}

/// Polar moment (torsional constant) of a solid circle: J = πR⁴/2
#[inline]
pub fn circular_torsional_constant(diameter: f64) -> f64 {
    2.0 * circular_moment_of_inertia(diameter)
}

// =============================================================================
// GENERAL
// =============================================================================

/// Radius of gyration r = √(I/A)
#[inline]
pub fn radius_of_gyration(i: f64, a: f64) -> f64 {
    (i / a).sqrt()
}
