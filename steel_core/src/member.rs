//! # Steel Member
//!
//! A [`SteelMember`] owns everything one design run needs: section,
//! material, length, unit system, load cases and per-stage design
//! parameters. It can never exist in an invalid state: construction and
//! every update run the full validation, and an update always clears the
//! previous results.
//!
//! ## Example
//!
//! ```rust
//! use steel_core::member::{DesignStage, DesignParameters, ForceActions, SteelMember};
//! use steel_core::materials::ASTM_A36;
//! use steel_core::sections::RoundBar;
//! use steel_core::units::IN_KIP;
//!
//! let mut member = SteelMember::builder("Brace B-1")
//!     .method("lrfd")
//!     .section(RoundBar::new(1.5, IN_KIP).unwrap())
//!     .material(ASTM_A36.clone())
//!     .length(60.0)
//!     .force_actions("LC1", ForceActions::axial(10.0))
//!     .design_parameters(DesignStage::Compression, DesignParameters::default())
//!     .build()
//!     .unwrap();
//!
//! let results = member.design().unwrap();
//! assert!(results.passes());
//! ```

use std::collections::{BTreeMap, HashMap};

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::aisc360::compression::{compressive_capacity, CompressionLengths};
use crate::aisc360::flexure::flexural_capacity;
use crate::aisc360::{DesignCode, DesignMethod, LimitState};
use crate::calc::CalcLog;
use crate::config::EngineConfig;
use crate::errors::{CalcError, CalcResult};
use crate::materials::SteelMaterial;
use crate::sections::{SteelSection, TabulatedShape};
use crate::units::{UnitSystem, IN_KIP};

// =============================================================================
// LOADS AND DESIGN PARAMETERS
// =============================================================================

/// Required strengths for one load case. Signs are ignored.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct ForceActions {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub axial: Option<f64>,
    #[serde(default, alias = "major_flex", skip_serializing_if = "Option::is_none")]
    pub major_flexure: Option<f64>,
    /// Accepted from JSON but rejected on validation; no minor-axis stage exists
    #[serde(default, alias = "minor_flex", skip_serializing_if = "Option::is_none")]
    pub minor_flexure: Option<f64>,
}

impl ForceActions {
    pub fn axial(p: f64) -> Self {
        ForceActions {
            axial: Some(p),
            ..Default::default()
        }
    }

    pub fn major_flexure(m: f64) -> Self {
        ForceActions {
            major_flexure: Some(m),
            ..Default::default()
        }
    }

    pub fn with_major_flexure(mut self, m: f64) -> Self {
        self.major_flexure = Some(m);
        self
    }

    /// Demand checked by `stage`
    pub fn demand(&self, stage: DesignStage) -> Option<f64> {
        match stage {
            DesignStage::Compression => self.axial,
            DesignStage::MajorFlexure => self.major_flexure,
        }
    }

    fn values(&self) -> impl Iterator<Item = f64> {
        [self.axial, self.major_flexure].into_iter().flatten()
    }
}

/// Design checks a member can run
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DesignStage {
    Compression,
    #[serde(alias = "major_flex")]
    MajorFlexure,
}

impl DesignStage {
    pub const ALL: [DesignStage; 2] = [DesignStage::Compression, DesignStage::MajorFlexure];

    pub fn limit_state(&self) -> LimitState {
        match self {
            DesignStage::Compression => LimitState::Compression,
            DesignStage::MajorFlexure => LimitState::Flexure,
        }
    }

    pub fn display_name(&self) -> &'static str {
        match self {
            DesignStage::Compression => "Compression",
            DesignStage::MajorFlexure => "Major-axis flexure",
        }
    }
}

impl std::fmt::Display for DesignStage {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.display_name())
    }
}

/// Unbraced lengths and factors for one stage. Missing lengths fall back to
/// the member length, missing factors to 1.0.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct DesignParameters {
    #[serde(default, alias = "Lx", skip_serializing_if = "Option::is_none")]
    pub lcx: Option<f64>,
    #[serde(default, alias = "Ly", skip_serializing_if = "Option::is_none")]
    pub lcy: Option<f64>,
    #[serde(default, alias = "Lz", skip_serializing_if = "Option::is_none")]
    pub lcz: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub kx: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ky: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub kz: Option<f64>,
    #[serde(default, alias = "Lb", skip_serializing_if = "Option::is_none")]
    pub lb: Option<f64>,
    #[serde(default, alias = "Cb", skip_serializing_if = "Option::is_none")]
    pub cb: Option<f64>,
}

impl DesignParameters {
    pub fn compression_lengths(&self, member_length: f64) -> CompressionLengths {
        let mut lengths = CompressionLengths::new(
            self.lcx.unwrap_or(member_length),
            self.lcy.unwrap_or(member_length),
        )
        .with_k(self.kx.unwrap_or(1.0), self.ky.unwrap_or(1.0));
        if let Some(lcz) = self.lcz {
            lengths = lengths.with_torsion(lcz, self.kz.unwrap_or(1.0));
        }
        lengths
    }

    pub fn unbraced_length(&self, member_length: f64) -> f64 {
        self.lb.unwrap_or(member_length)
    }

    pub fn cb(&self) -> f64 {
        self.cb.unwrap_or(1.0)
    }

    fn values(&self) -> impl Iterator<Item = (&'static str, f64)> {
        [
            ("lcx", self.lcx),
            ("lcy", self.lcy),
            ("lcz", self.lcz),
            ("kx", self.kx),
            ("ky", self.ky),
            ("kz", self.kz),
            ("lb", self.lb),
            ("cb", self.cb),
        ]
        .into_iter()
        .filter_map(|(name, v)| v.map(|v| (name, v)))
    }
}

// =============================================================================
// RESULTS
// =============================================================================

/// Outcome of one design stage.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StageResult {
    pub stage: DesignStage,
    pub method: DesignMethod,
    /// Available strength (nominal, φRn or Rn/Ω)
    pub capacity: f64,
    pub unit: String,
    /// Demand/capacity ratio per load case
    pub unity: BTreeMap<String, f64>,
    /// Full calculation record for this stage
    pub log: CalcLog,
}

impl StageResult {
    pub fn passes(&self) -> bool {
        self.unity.values().all(|u| *u <= 1.0)
    }

    /// Load case with the highest ratio
    pub fn governing(&self) -> Option<(&str, f64)> {
        self.unity
            .iter()
            .max_by(|a, b| a.1.total_cmp(b.1))
            .map(|(case, ratio)| (case.as_str(), *ratio))
    }
}

/// Governing stage and load case of a design run
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Governing<'a> {
    pub stage: DesignStage,
    pub load_case: &'a str,
    pub unity: f64,
}

/// Results of [`SteelMember::design`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DesignResults {
    pub run_at: DateTime<Utc>,
    pub stages: BTreeMap<DesignStage, StageResult>,
}

impl DesignResults {
    pub fn stage(&self, stage: DesignStage) -> Option<&StageResult> {
        self.stages.get(&stage)
    }

    /// True when every unity ratio of every stage is ≤ 1.0
    pub fn passes(&self) -> bool {
        self.stages.values().all(StageResult::passes)
    }

    /// Highest unity ratio over all stages and load cases
    pub fn governing(&self) -> Option<Governing<'_>> {
        self.stages
            .values()
            .filter_map(|r| {
                r.governing().map(|(load_case, unity)| Governing {
                    stage: r.stage,
                    load_case,
                    unity,
                })
            })
            .max_by(|a, b| a.unity.total_cmp(&b.unity))
    }
}

// =============================================================================
// MEMBER
// =============================================================================

/// A steel member under design.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "MemberRepr")]
pub struct SteelMember {
    label: String,
    code: DesignCode,
    method: DesignMethod,
    section: SteelSection,
    material: SteelMaterial,
    length: f64,
    units: UnitSystem,
    force_actions: HashMap<String, ForceActions>,
    design_props: BTreeMap<DesignStage, DesignParameters>,
    results: Option<DesignResults>,
}

impl SteelMember {
    pub fn builder(label: impl Into<String>) -> MemberBuilder {
        MemberBuilder::new(label)
    }

    /// Build a member from its JSON description with the default
    /// [`EngineConfig`].
    pub fn from_json_str(json: &str) -> CalcResult<Self> {
        Self::from_json_with(json, &EngineConfig::default())
    }

    /// Build a member from its JSON description. Shape labels are looked up
    /// in the configured shapes table, grade names take the configured
    /// E/G/γ, and a missing method, unit system or material takes the
    /// configured default.
    pub fn from_json_with(json: &str, config: &EngineConfig) -> CalcResult<Self> {
        let repr: MemberRepr = serde_json::from_str(json)?;
        repr.resolve(config)
    }

    pub fn label(&self) -> &str {
        &self.label
    }

    pub fn code(&self) -> DesignCode {
        self.code
    }

    pub fn method(&self) -> DesignMethod {
        self.method
    }

    pub fn section(&self) -> &SteelSection {
        &self.section
    }

    pub fn material(&self) -> &SteelMaterial {
        &self.material
    }

    pub fn length(&self) -> f64 {
        self.length
    }

    pub fn units(&self) -> UnitSystem {
        self.units
    }

    pub fn force_actions(&self) -> &HashMap<String, ForceActions> {
        &self.force_actions
    }

    pub fn design_props(&self) -> &BTreeMap<DesignStage, DesignParameters> {
        &self.design_props
    }

    pub fn results(&self) -> Option<&DesignResults> {
        self.results.as_ref()
    }

    /// Full validation; runs on every construction and update.
    fn validate(&self) -> CalcResult<()> {
        if self.section.units() != self.units || self.material.units() != self.units {
            return Err(CalcError::unit_mismatch(
                self.units.label,
                self.section.units().label,
                self.material.units().label,
            ));
        }
        if !(self.length >= 0.0 && self.length.is_finite()) {
            return Err(CalcError::invalid_input(
                "length",
                self.length.to_string(),
                "Member length must be a finite, non-negative number",
            ));
        }
        for (case, actions) in &self.force_actions {
            if actions.minor_flexure.is_some() {
                return Err(CalcError::unsupported_check(
                    format!("minor-axis flexure (load case {})", case),
                    self.section.kind_name(),
                ));
            }
            if actions.values().any(|v| !v.is_finite()) {
                return Err(CalcError::invalid_input(
                    format!("force_actions.{}", case),
                    format!("{:?}", actions),
                    "Force actions must be finite",
                ));
            }
        }
        for (stage, params) in &self.design_props {
            if let Some((name, value)) = params.values().find(|(_, v)| !(*v >= 0.0 && v.is_finite())) {
                return Err(CalcError::invalid_input(
                    format!("design_props.{:?}.{}", stage, name),
                    value.to_string(),
                    "Design parameters must be finite and non-negative",
                ));
            }
        }
        Ok(())
    }

    /// A copy with `update` merged in, revalidated, and with no results.
    pub fn updated(&self, update: MemberUpdate) -> CalcResult<SteelMember> {
        let mut next = self.clone();
        if let Some(method) = update.method {
            next.method = method.parse()?;
        }
        if let Some(section) = update.section {
            next.section = section;
        }
        if let Some(material) = update.material {
            next.material = material;
        }
        if let Some(length) = update.length {
            next.length = length;
        }
        if let Some(units) = update.units {
            next.units = units;
        }
        if let Some(force_actions) = update.force_actions {
            next.force_actions = force_actions;
        }
        if let Some(design_props) = update.design_props {
            next.design_props = design_props;
        }
        next.results = None;
        next.validate()?;
        Ok(next)
    }

    /// Merge `update` in place. On error the member is left unchanged.
    pub fn update(&mut self, update: MemberUpdate) -> CalcResult<()> {
        *self = self.updated(update)?;
        tracing::debug!(member = %self.label, "member updated, results cleared");
        Ok(())
    }

    pub fn clear_results(&mut self) {
        self.results = None;
    }

    /// Stages that [`design`](Self::design) runs: those with parameters or
    /// with a demand in some load case. A member with neither runs every
    /// stage its section supports.
    pub fn active_stages(&self) -> Vec<DesignStage> {
        let selected: Vec<DesignStage> = DesignStage::ALL
            .into_iter()
            .filter(|stage| {
                self.design_props.contains_key(stage)
                    || self.force_actions.values().any(|a| a.demand(*stage).is_some())
            })
            .collect();
        if !selected.is_empty() {
            return selected;
        }
        match self.section {
            SteelSection::Tabulated(_) => vec![DesignStage::Compression],
            _ => DesignStage::ALL.to_vec(),
        }
    }

    fn run_stage(&self, stage: DesignStage) -> CalcResult<StageResult> {
        let params = self.design_props.get(&stage).copied().unwrap_or_default();
        let mut log = CalcLog::new();
        if stage == DesignStage::Compression {
            for (name, explicit) in [("lcx", params.lcx), ("lcy", params.lcy)] {
                let length = explicit.unwrap_or(self.length);
                if length <= 0.0 {
                    let field = match explicit {
                        Some(_) => format!("design_props.compression.{}", name),
                        None => "length".to_string(),
                    };
                    return Err(CalcError::invalid_input(
                        field,
                        length.to_string(),
                        "Compression needs a positive unbraced length; set the member length or Lx and Ly",
                    ));
                }
            }
        }

        let capacity = match stage {
            DesignStage::Compression => compressive_capacity(
                &mut log,
                &self.section,
                &self.material,
                &params.compression_lengths(self.length),
                self.method,
                self.units,
            )?,
            DesignStage::MajorFlexure => flexural_capacity(
                &mut log,
                &self.section,
                &self.material,
                params.unbraced_length(self.length),
                params.cb(),
                self.method,
                self.units,
            )?,
        };

        if !(capacity.value() > 0.0) {
            return Err(CalcError::domain(
                format!("{} unity check", stage),
                format!("capacity {} is not positive", capacity.value()),
            ));
        }

        let mut unity = BTreeMap::new();
        for (case, actions) in &self.force_actions {
            if let Some(demand) = actions.demand(stage) {
                let ratio = demand.abs() / capacity.value();
                if ratio > 1.0 {
                    tracing::warn!(
                        member = %self.label,
                        stage = %stage,
                        load_case = %case,
                        unity = ratio,
                        "unity check fails"
                    );
                }
                unity.insert(case.clone(), ratio);
            }
        }

        Ok(StageResult {
            stage,
            method: self.method,
            capacity: capacity.value(),
            unit: stage.limit_state().unit(self.units).to_string(),
            unity,
            log,
        })
    }

    /// Run every active stage and store the results.
    pub fn design(&mut self) -> CalcResult<&DesignResults> {
        let mut stages = BTreeMap::new();
        for stage in self.active_stages() {
            tracing::debug!(member = %self.label, stage = %stage, "running design stage");
            stages.insert(stage, self.run_stage(stage)?);
        }
        let results = DesignResults {
            run_at: Utc::now(),
            stages,
        };

        tracing::info!(
            member = %self.label,
            code = %self.code,
            method = %self.method,
            stages = results.stages.len(),
            passes = results.passes(),
            governing = results.governing().map(|g| g.unity),
            "member design complete"
        );
        Ok(self.results.insert(results))
    }
}

// =============================================================================
// BUILDER AND UPDATES
// =============================================================================

/// Step-by-step construction of a [`SteelMember`]; [`build`](Self::build)
/// validates everything at once.
#[derive(Debug, Clone)]
pub struct MemberBuilder {
    label: String,
    code: String,
    method: String,
    units: UnitSystem,
    section: Option<SteelSection>,
    material: Option<SteelMaterial>,
    length: f64,
    force_actions: HashMap<String, ForceActions>,
    design_props: BTreeMap<DesignStage, DesignParameters>,
}

impl MemberBuilder {
    fn new(label: impl Into<String>) -> Self {
        MemberBuilder {
            label: label.into(),
            code: DesignCode::Aisc360_22.code().to_string(),
            method: "lrfd".to_string(),
            units: IN_KIP,
            section: None,
            material: None,
            length: 0.0,
            force_actions: HashMap::new(),
            design_props: BTreeMap::new(),
        }
    }

    pub fn code(mut self, code: &str) -> Self {
        self.code = code.to_string();
        self
    }

    pub fn method(mut self, method: &str) -> Self {
        self.method = method.to_string();
        self
    }

    pub fn design_method(mut self, method: DesignMethod) -> Self {
        self.method = method.code().to_string();
        self
    }

    pub fn units(mut self, units: UnitSystem) -> Self {
        self.units = units;
        self
    }

    pub fn section(mut self, section: impl Into<SteelSection>) -> Self {
        self.section = Some(section.into());
        self
    }

    pub fn material(mut self, material: SteelMaterial) -> Self {
        self.material = Some(material);
        self
    }

    pub fn length(mut self, length: f64) -> Self {
        self.length = length;
        self
    }

    pub fn force_actions(mut self, load_case: impl Into<String>, actions: ForceActions) -> Self {
        self.force_actions.insert(load_case.into(), actions);
        self
    }

    pub fn design_parameters(mut self, stage: DesignStage, params: DesignParameters) -> Self {
        self.design_props.insert(stage, params);
        self
    }

    pub fn build(self) -> CalcResult<SteelMember> {
        let code: DesignCode = self.code.parse()?;
        let method: DesignMethod = self.method.parse()?;
        let section = self
            .section
            .ok_or_else(|| CalcError::invalid_input("section", "none", "A section is required"))?;
        let material = self
            .material
            .ok_or_else(|| CalcError::invalid_input("material", "none", "A material is required"))?;

        let member = SteelMember {
            label: self.label,
            code,
            method,
            section,
            material,
            length: self.length,
            units: self.units,
            force_actions: self.force_actions,
            design_props: self.design_props,
            results: None,
        };
        member.validate()?;
        Ok(member)
    }
}

/// Fields to change in [`SteelMember::updated`]; `None` keeps the current value.
#[derive(Debug, Clone, Default)]
pub struct MemberUpdate {
    pub method: Option<String>,
    pub section: Option<SteelSection>,
    pub material: Option<SteelMaterial>,
    pub length: Option<f64>,
    pub units: Option<UnitSystem>,
    pub force_actions: Option<HashMap<String, ForceActions>>,
    pub design_props: Option<BTreeMap<DesignStage, DesignParameters>>,
}

// =============================================================================
// JSON FORM
// =============================================================================

/// Section given inline or by AISC label
#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
enum SectionRef {
    Label(String),
    Section(SteelSection),
}

/// Material given inline or by grade name
#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
enum MaterialRef {
    Grade(String),
    Material(SteelMaterial),
}

fn default_code() -> String {
    DesignCode::Aisc360_22.code().to_string()
}

/// JSON form of a member. Method, units and material fall back to the
/// engine configuration when absent.
#[derive(Debug, Clone, Deserialize)]
struct MemberRepr {
    label: String,
    #[serde(default = "default_code")]
    code: String,
    #[serde(default)]
    method: Option<String>,
    #[serde(default)]
    units: Option<UnitSystem>,
    section: SectionRef,
    #[serde(default)]
    material: Option<MaterialRef>,
    #[serde(default)]
    length: f64,
    #[serde(default)]
    force_actions: HashMap<String, ForceActions>,
    #[serde(default)]
    design_props: BTreeMap<DesignStage, DesignParameters>,
}

impl MemberRepr {
    /// Resolve labels and grade names, filling gaps from `config`.
    fn resolve(self, config: &EngineConfig) -> CalcResult<SteelMember> {
        let units = self.units.unwrap_or(config.units);
        // E/G/γ overrides are only meaningful in the configured unit system
        let config = EngineConfig {
            units,
            defaults: config.defaults.filter(|_| units == config.units),
            ..config.clone()
        };

        let section = match self.section {
            SectionRef::Label(label) => SteelSection::from(TabulatedShape::from_db(&config.shape_db()?, &label)?),
            SectionRef::Section(section) => section,
        };
        let material = match self.material {
            Some(MaterialRef::Grade(name)) => config.material(Some(name.as_str()))?,
            Some(MaterialRef::Material(material)) => material,
            None => config.material(None)?,
        };
        let method = self.method.unwrap_or_else(|| config.method.code().to_string());

        let mut builder = SteelMember::builder(self.label)
            .code(&self.code)
            .method(&method)
            .units(units)
            .section(section)
            .material(material)
            .length(self.length);
        for (case, actions) in self.force_actions {
            builder = builder.force_actions(case, actions);
        }
        for (stage, params) in self.design_props {
            builder = builder.design_parameters(stage, params);
        }
        builder.build()
    }
}

impl TryFrom<MemberRepr> for SteelMember {
    type Error = CalcError;

    fn try_from(repr: MemberRepr) -> Result<Self, Self::Error> {
        repr.resolve(&EngineConfig::default())
    }
}
