//! # steel_core - AISC 360-22 Steel Member Design
//!
//! `steel_core` computes member capacities per ANSI/AISC 360-22 and keeps a
//! symbolic record of every step. Each design check returns a number and
//! writes the inputs, formulas, substituted values, results and clause
//! references to a [`CalcLog`], so a calculation can be rendered for review
//! exactly as it was computed.
//!
//! ## Design Philosophy
//!
//! - **Traceable**: every quantity carries its symbol, expression and reference
//! - **JSON-First**: members, sections, materials, logs and results serialize
//! - **Rich Errors**: structured [`CalcError`] values, never panics on bad input
//! - **Immutable inputs**: sections and materials are fixed once built
//!
//! ## Quick Start
//!
//! ```rust
//! use steel_core::aisc360::compression::{round_bar_compressive_capacity, CompressionLengths};
//! use steel_core::aisc360::DesignMethod;
//! use steel_core::calc::CalcLog;
//! use steel_core::materials::ASTM_A36;
//! use steel_core::sections::RoundBar;
//! use steel_core::units::IN_KIP;
//!
//! let bar = RoundBar::new(2.0, IN_KIP).unwrap();
//! let mut log = CalcLog::new();
//! let phi_pn = round_bar_compressive_capacity(
//!     &mut log,
//!     &bar,
//!     &ASTM_A36,
//!     &CompressionLengths::uniform(60.0),
//!     DesignMethod::Lrfd,
//!     IN_KIP,
//! )
//! .unwrap();
//!
//! assert!(phi_pn.value() > 0.0);
//! println!("{}", log.narrative());
//! ```
//!
//! ## Modules
//!
//! - [`calc`] - Symbolic quantities and the calculation log
//! - [`aisc360`] - Chapter E compression and Chapter F flexure checks
//! - [`sections`] - Round and rectangular bars, AISC shapes table
//! - [`materials`] - Steel grades
//! - [`member`] - Member orchestrator running every design stage
//! - [`config`] - Engine defaults loaded from JSON
//! - [`units`] - Unit systems
//! - [`errors`] - Structured error types

pub mod aisc360;
pub mod calc;
pub mod config;
pub mod errors;
pub mod materials;
pub mod member;
pub mod sections;
pub mod units;

// Re-export commonly used types at crate root for convenience
pub use aisc360::{DesignCode, DesignMethod, LimitState};
pub use calc::{CalcLog, Quantity};
pub use config::EngineConfig;
pub use errors::{CalcError, CalcResult};
pub use materials::SteelMaterial;
pub use member::{DesignResults, DesignStage, SteelMember};
pub use sections::{RectBar, RoundBar, SteelSection};
pub use units::{UnitSystem, IN_KIP, MM_KN};
