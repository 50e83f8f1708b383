//! # steelcheck
//!
//! Command-line front end for the AISC 360-22 design checks in `steel_core`.
//!
//! # Usage
//!
//! ```bash
//! # Compression capacity of a 2 in round bar, 60 in long, LRFD
//! steelcheck compression --round 2 --material A36 --lx 60
//!
//! # Flexural capacity of a 1x4 bar braced at 48 in, ASD
//! steelcheck flexure --rect 1x4 --material A36 --lb 48 --method asd
//!
//! # Full member design from JSON, machine-readable output
//! steelcheck --format json member brace.json
//! ```
//!
//! Logging goes to stderr and follows `RUST_LOG`; `--verbose` turns on
//! debug output for `steel_core`.

use std::fs;
use std::io::{self, Read};
use std::path::PathBuf;
use std::process::ExitCode;

use clap::{Args, Parser, Subcommand, ValueEnum};
use serde::Serialize;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use steel_core::aisc360::compression::{compressive_capacity, CompressionLengths};
use steel_core::aisc360::flexure::flexural_capacity;
use steel_core::calc::CalcLog;
use steel_core::member::DesignResults;
use steel_core::sections::TabulatedShape;
use steel_core::{
    CalcError, CalcResult, DesignMethod, EngineConfig, LimitState, RectBar, RoundBar, SteelMember, SteelSection,
    UnitSystem,
};

#[derive(Parser)]
#[command(name = "steelcheck")]
#[command(version)]
#[command(about = "AISC 360-22 steel member design checks with full calculation logs")]
#[command(long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Output format
    #[arg(long, short = 'o', global = true, default_value = "text", value_enum)]
    format: OutputFormat,

    /// Engine configuration file (JSON)
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Debug logging for the design engine
    #[arg(long, short, global = true)]
    verbose: bool,
}

#[derive(Clone, Copy, PartialEq, Eq, ValueEnum)]
enum OutputFormat {
    Json,
    Text,
}

#[derive(Args)]
#[group(required = true, multiple = false)]
struct SectionArgs {
    /// Solid round bar of this diameter
    #[arg(long)]
    round: Option<f64>,

    /// Solid rectangular bar, width x height (e.g. 1x4)
    #[arg(long, value_name = "BxH")]
    rect: Option<String>,

    /// AISC shape label (e.g. W14X90)
    #[arg(long)]
    shape: Option<String>,
}

#[derive(Args)]
struct CommonArgs {
    /// Steel grade: A36, A572-50, A992 (config default when omitted)
    #[arg(long, short)]
    material: Option<String>,

    /// Design method: nominal, lrfd, asd (config default when omitted)
    #[arg(long)]
    method: Option<String>,

    /// Unit system: in-kip, mm-kN (config default when omitted)
    #[arg(long)]
    units: Option<String>,

    /// Lengths are given in feet
    #[arg(long)]
    feet: bool,
}

impl CommonArgs {
    /// Factor from the entered lengths to the unit system's length unit
    fn length_scale(&self, units: UnitSystem) -> f64 {
        if self.feet {
            units.feet_to_length(1.0)
        } else {
            1.0
        }
    }
}

#[derive(Args)]
struct LengthArgs {
    /// Unbraced length for buckling about x
    #[arg(long)]
    lx: f64,

    /// Unbraced length for buckling about y (defaults to lx)
    #[arg(long)]
    ly: Option<f64>,

    /// Unbraced length for torsional buckling
    #[arg(long)]
    lz: Option<f64>,

    /// Effective length factor about x
    #[arg(long, default_value_t = 1.0)]
    kx: f64,

    /// Effective length factor about y
    #[arg(long, default_value_t = 1.0)]
    ky: f64,

    /// Effective length factor for torsional buckling
    #[arg(long, default_value_t = 1.0)]
    kz: f64,
}

impl LengthArgs {
    fn to_lengths(&self, scale: f64) -> CompressionLengths {
        let lx = self.lx * scale;
        let mut lengths = CompressionLengths::new(lx, self.ly.map_or(lx, |ly| ly * scale)).with_k(self.kx, self.ky);
        if let Some(lz) = self.lz {
            lengths = lengths.with_torsion(lz * scale, self.kz);
        }
        lengths
    }
}

#[derive(Subcommand)]
enum Commands {
    /// Axial compressive capacity (Chapter E)
    Compression {
        #[command(flatten)]
        section: SectionArgs,

        #[command(flatten)]
        common: CommonArgs,

        #[command(flatten)]
        lengths: LengthArgs,
    },

    /// Major-axis flexural capacity (Chapter F)
    Flexure {
        #[command(flatten)]
        section: SectionArgs,

        #[command(flatten)]
        common: CommonArgs,

        /// Unbraced length for lateral-torsional buckling
        #[arg(long, default_value_t = 0.0)]
        lb: f64,

        /// Lateral-torsional buckling modification factor
        #[arg(long, default_value_t = 1.0)]
        cb: f64,
    },

    /// Design a member described in JSON (reads stdin if no file is given)
    Member {
        file: Option<PathBuf>,
    },
}

// =============================================================================
// MAIN
// =============================================================================

fn main() -> ExitCode {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    let result = load_config(cli.config.as_ref()).and_then(|config| match cli.command {
        Commands::Compression {
            section,
            common,
            lengths,
        } => cmd_compression(&config, &section, &common, &lengths, cli.format),
        Commands::Flexure {
            section,
            common,
            lb,
            cb,
        } => cmd_flexure(&config, &section, &common, lb, cb, cli.format),
        Commands::Member { file } => cmd_member(&config, file, cli.format),
    });

    match result {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            if cli.format == OutputFormat::Json {
                match serde_json::to_string_pretty(&e) {
                    Ok(json) => println!("{}", json),
                    Err(_) => println!(r#"{{"error": "{}"}}"#, e.to_string().replace('"', "\\\"")),
                }
            } else {
                eprintln!("error [{}]: {}", e.error_code(), e);
            }
            ExitCode::FAILURE
        }
    }
}

fn init_tracing(verbose: bool) {
    let default_filter = if verbose { "steel_core=debug,steelcheck=debug" } else { "warn" };
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| default_filter.into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(io::stderr))
        .init();
}

fn load_config(path: Option<&PathBuf>) -> CalcResult<EngineConfig> {
    match path {
        Some(path) => EngineConfig::load(path),
        None => Ok(EngineConfig::default()),
    }
}

// =============================================================================
// COMMAND IMPLEMENTATIONS
// =============================================================================

/// One check's output
#[derive(Serialize)]
struct CheckReport<'a> {
    section: &'a str,
    material: &'a str,
    method: DesignMethod,
    capacity: f64,
    unit: &'a str,
    log: &'a CalcLog,
}

/// Settings for a single check: config values overridden by flags
fn resolve(config: &EngineConfig, common: &CommonArgs) -> CalcResult<EngineConfig> {
    let mut resolved = config.clone();
    if let Some(units) = &common.units {
        resolved.units = UnitSystem::from_label(units)?;
    }
    if let Some(method) = &common.method {
        resolved.method = method.parse()?;
    }
    Ok(resolved)
}

fn parse_rect(dims: &str) -> CalcResult<(f64, f64)> {
    let invalid = || CalcError::invalid_input("rect", dims, "Expected width x height, e.g. 1x4");
    let lower = dims.to_lowercase();
    let (b, h) = lower.split_once('x').ok_or_else(invalid)?;
    let b: f64 = b.trim().parse().map_err(|_| invalid())?;
    let h: f64 = h.trim().parse().map_err(|_| invalid())?;
    Ok((b, h))
}

fn build_section(config: &EngineConfig, args: &SectionArgs) -> CalcResult<SteelSection> {
    if let Some(d) = args.round {
        return Ok(RoundBar::new(d, config.units)?.into());
    }
    if let Some(dims) = &args.rect {
        let (b, h) = parse_rect(dims)?;
        return Ok(RectBar::new(b, h, config.units)?.into());
    }
    match &args.shape {
        Some(label) => Ok(TabulatedShape::from_db(&config.shape_db()?, label)?.into()),
        None => Err(CalcError::invalid_input("section", "none", "Give one of --round, --rect, --shape")),
    }
}

fn cmd_compression(
    config: &EngineConfig,
    section_args: &SectionArgs,
    common: &CommonArgs,
    lengths: &LengthArgs,
    format: OutputFormat,
) -> CalcResult<()> {
    let config = resolve(config, common)?;
    let section = build_section(&config, section_args)?;
    let material = config.material(common.material.as_deref())?;
    let lengths = lengths.to_lengths(common.length_scale(config.units));

    let mut log = CalcLog::new();
    let capacity = compressive_capacity(&mut log, &section, &material, &lengths, config.method, config.units)?;

    print_report(
        &CheckReport {
            section: section.label(),
            material: material.name(),
            method: config.method,
            capacity: capacity.value(),
            unit: LimitState::Compression.unit(config.units),
            log: &log,
        },
        format,
    )
}

fn cmd_flexure(
    config: &EngineConfig,
    section_args: &SectionArgs,
    common: &CommonArgs,
    lb: f64,
    cb: f64,
    format: OutputFormat,
) -> CalcResult<()> {
    let config = resolve(config, common)?;
    let section = build_section(&config, section_args)?;
    let material = config.material(common.material.as_deref())?;

    let mut log = CalcLog::new();
    let lb = lb * common.length_scale(config.units);
    let capacity = flexural_capacity(&mut log, &section, &material, lb, cb, config.method, config.units)?;

    print_report(
        &CheckReport {
            section: section.label(),
            material: material.name(),
            method: config.method,
            capacity: capacity.value(),
            unit: LimitState::Flexure.unit(config.units),
            log: &log,
        },
        format,
    )
}

fn cmd_member(config: &EngineConfig, file: Option<PathBuf>, format: OutputFormat) -> CalcResult<()> {
    let json = read_input(file)?;
    let mut member = SteelMember::from_json_with(&json, config)?;
    member.design()?;

    match format {
        OutputFormat::Json => println!("{}", serde_json::to_string_pretty(&member)?),
        OutputFormat::Text => {
            if let Some(results) = member.results() {
                print_member_results(&member, results);
            }
        }
    }
    Ok(())
}

fn read_input(file: Option<PathBuf>) -> CalcResult<String> {
    match file {
        Some(path) => fs::read_to_string(&path)
            .map_err(|e| CalcError::file_error("read", path.display().to_string(), e.to_string())),
        None => {
            let mut buf = String::new();
            io::stdin()
                .read_to_string(&mut buf)
                .map_err(|e| CalcError::file_error("read", "stdin", e.to_string()))?;
            Ok(buf)
        }
    }
}

// =============================================================================
// OUTPUT
// =============================================================================

fn print_report(report: &CheckReport<'_>, format: OutputFormat) -> CalcResult<()> {
    match format {
        OutputFormat::Json => println!("{}", serde_json::to_string_pretty(report)?),
        OutputFormat::Text => {
            println!("{} / {} ({})", report.section, report.material, report.method);
            println!("{}", "=".repeat(60));
            println!("{}", report.log.narrative());
            println!("{}", "-".repeat(60));
            println!("Capacity: {:.3} {}", report.capacity, report.unit);
            let references = report.log.references();
            if !references.is_empty() {
                println!("References: {}", references.join(", "));
            }
        }
    }
    Ok(())
}

fn print_member_results(member: &SteelMember, results: &DesignResults) {
    println!("{} - {} ({})", member.label(), member.section(), member.method());
    println!("{}", "=".repeat(60));
    for result in results.stages.values() {
        println!("{}: {:.3} {}", result.stage, result.capacity, result.unit);
        for (case, ratio) in &result.unity {
            let status = if *ratio <= 1.0 { "OK" } else { "FAILS" };
            println!("  {:<12} unity = {:.3}  {}", case, ratio, status);
        }
    }
    println!("{}", "-".repeat(60));
    match results.governing() {
        Some(g) => println!(
            "Governing: {} / {} (unity = {:.3}) - {}",
            g.stage,
            g.load_case,
            g.unity,
            if results.passes() { "PASS" } else { "FAIL" }
        ),
        None => println!("No load cases to check"),
    }
}
