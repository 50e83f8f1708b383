//! Rolled Steel Shapes (AISC)
//!
//! Tabulated section properties for rolled and hollow shapes, keyed by the
//! AISC Manual label. Tabulated values are always in-kip.
//!
//! ## Data Source
//!
//! The full table is the AISC Shapes Database v16.0 exported to CSV from the
//! Excel workbook. A small built-in set of common W-shapes, including their
//! torsional and warping constants, is available without the CSV through
//! [`builtin_w_shapes`].
//!
//! ## Example
//!
//! ```rust
//! use steel_core::sections::shapes::builtin_w_shapes;
//!
//! let w14x90 = builtin_w_shapes().lookup("w14x90").unwrap();
//! assert_eq!(w14x90.area_in2, 26.5);
//! assert_eq!(w14x90.cw_in6, Some(16000.0));
//! ```

use once_cell::sync::Lazy;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::io::BufRead;
use std::str::FromStr;

use crate::errors::{CalcError, CalcResult};

/// Shape families the engine reads from the AISC table
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ShapeType {
    /// Wide flange (W-shape)
    W,
    /// Miscellaneous (M-shape)
    M,
    /// American Standard beam (S-shape)
    S,
    /// H-pile (HP-shape)
    HP,
    /// Rectangular or square HSS
    HssRect,
    /// Round HSS
    HssRound,
    /// Pipe
    Pipe,
}

impl ShapeType {
    /// Parse the AISC `Type` column. Channels, angles and tees are not
    /// read.
    pub fn from_aisc_code(s: &str) -> Option<Self> {
        match s.trim().to_uppercase().as_str() {
            "W" => Some(ShapeType::W),
            "M" => Some(ShapeType::M),
            "S" => Some(ShapeType::S),
            "HP" => Some(ShapeType::HP),
            "HSS" => Some(ShapeType::HssRect),
            "PIPE" => Some(ShapeType::Pipe),
            _ => None,
        }
    }

    pub fn display_name(&self) -> &'static str {
        match self {
            ShapeType::W => "Wide Flange (W)",
            ShapeType::M => "Miscellaneous (M)",
            ShapeType::S => "American Standard (S)",
            ShapeType::HP => "H-Pile (HP)",
            ShapeType::HssRect => "HSS Rectangular/Square",
            ShapeType::HssRound => "HSS Round",
            ShapeType::Pipe => "Pipe",
        }
    }

    /// Doubly symmetric open I-shapes, where torsional buckling (E4-2) applies
    pub fn is_doubly_symmetric_open(&self) -> bool {
        matches!(self, ShapeType::W | ShapeType::M | ShapeType::S | ShapeType::HP)
    }
}

impl std::fmt::Display for ShapeType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.display_name())
    }
}

/// One row of the shapes table.
///
/// Field names follow the AISC Shapes Database columns with the unit as a
/// suffix.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SteelShape {
    pub shape_type: ShapeType,

    /// AISC Manual label (e.g., "W14X90")
    pub label: String,

    /// Cross-sectional area (in²)
    pub area_in2: f64,

    /// Overall depth, or HSS height, or OD (in)
    pub depth_in: Option<f64>,

    /// Flange width (in)
    pub bf_in: Option<f64>,

    /// Flange thickness (in)
    pub tf_in: Option<f64>,

    /// Web thickness (in)
    pub tw_in: Option<f64>,

    /// HSS/pipe design wall thickness (in)
    pub wall_thickness_in: Option<f64>,

    // === Strong axis (X-X) ===
    pub ix_in4: f64,
    pub sx_in3: f64,
    pub rx_in: f64,
    pub zx_in3: f64,

    // === Weak axis (Y-Y) ===
    pub iy_in4: f64,
    pub sy_in3: f64,
    pub ry_in: f64,
    pub zy_in3: f64,

    // === Torsion ===
    /// Torsional constant J (in⁴)
    pub j_in4: f64,

    /// Warping constant Cw (in⁶)
    pub cw_in6: Option<f64>,

    // === Width-to-thickness ratios (Table B4.1a) ===
    /// Flange slenderness bf/2tf
    pub bf_2tf: Option<f64>,

    /// Web slenderness h/tw, h clear of the fillets
    pub h_tw: Option<f64>,

    /// HSS wall slenderness b/tdes
    pub b_t: Option<f64>,

    /// HSS wall slenderness h/tdes
    pub h_t: Option<f64>,

    /// Round HSS or pipe slenderness D/t
    pub d_t: Option<f64>,
}

/// Width-to-thickness ratio of one element in compression
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ElementRatio {
    /// Flange of a rolled I-shape (Table B4.1a case 1)
    FlangeBf2tf,
    /// Web of a doubly symmetric I-shape (case 5)
    WebHtw,
    /// Short wall of a rectangular HSS (case 6)
    WallBt,
    /// Long wall of a rectangular HSS (case 6)
    WallHt,
    /// Wall of a round HSS or pipe (case 9)
    WallDt,
}

impl ElementRatio {
    pub fn symbol(&self) -> &'static str {
        match self {
            ElementRatio::FlangeBf2tf => "\\frac{b_f}{2t_f}",
            ElementRatio::WebHtw => "\\frac{h}{t_w}",
            ElementRatio::WallBt => "\\frac{b}{t}",
            ElementRatio::WallHt => "\\frac{h}{t}",
            ElementRatio::WallDt => "\\frac{D}{t}",
        }
    }

    pub fn description(&self) -> &'static str {
        match self {
            ElementRatio::FlangeBf2tf => "Flange width-to-thickness ratio",
            ElementRatio::WebHtw => "Web width-to-thickness ratio",
            ElementRatio::WallBt | ElementRatio::WallHt => "Wall width-to-thickness ratio",
            ElementRatio::WallDt => "Diameter-to-thickness ratio",
        }
    }
}

impl SteelShape {
    /// Width-to-thickness ratios of the elements in uniform compression.
    ///
    /// Tabulated ratios are used where the table has them. Otherwise they
    /// are derived from the dimensions, taking the I-shape web height as
    /// d − 2tf and the HSS flat as Ht − 3t. None when neither is available.
    pub fn element_ratios(&self) -> Option<Vec<(ElementRatio, f64)>> {
        match self.shape_type {
            ShapeType::W | ShapeType::M | ShapeType::S | ShapeType::HP => {
                let flange = self.bf_2tf.or_else(|| Some(self.bf_in? / (2.0 * self.tf_in?)))?;
                let web = self
                    .h_tw
                    .or_else(|| Some((self.depth_in? - 2.0 * self.tf_in?) / self.tw_in?))?;
                Some(vec![(ElementRatio::FlangeBf2tf, flange), (ElementRatio::WebHtw, web)])
            }
            ShapeType::HssRect => {
                let t = self.wall_thickness_in;
                let b = self.b_t?;
                let h = self.h_t.or_else(|| Some((self.depth_in? - 3.0 * t?) / t?))?;
                Some(vec![(ElementRatio::WallBt, b), (ElementRatio::WallHt, h)])
            }
            ShapeType::HssRound | ShapeType::Pipe => {
                let d = self.d_t.or_else(|| Some(self.depth_in? / self.wall_thickness_in?))?;
                Some(vec![(ElementRatio::WallDt, d)])
            }
        }
    }
}

impl std::fmt::Display for SteelShape {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "{} (A={:.2} in², Ix={:.1} in⁴, Iy={:.1} in⁴)",
            self.label, self.area_in2, self.ix_in4, self.iy_in4
        )
    }
}

/// Shapes table held in memory, indexed by upper-cased label.
#[derive(Debug, Clone, Default)]
pub struct SteelShapeDb {
    shapes: HashMap<String, SteelShape>,
    by_type: HashMap<ShapeType, Vec<String>>,

    /// Where the rows came from: the CSV path, or "builtin-w"
    pub source: Option<String>,
}

impl SteelShapeDb {
    pub fn new() -> Self {
        Self::default()
    }

    /// Load shapes from an AISC Shapes Database CSV export.
    pub fn load_from_csv(path: &str) -> CalcResult<Self> {
        let file = std::fs::File::open(path)
            .map_err(|e| CalcError::file_error("open", path, format!("Failed to open CSV: {}", e)))?;
        let mut db = Self::from_csv_reader(std::io::BufReader::new(file), path)?;
        db.source = Some(path.to_string());
        tracing::debug!(path, shapes = db.len(), "loaded shapes table");
        Ok(db)
    }

    /// Read shapes from CSV text. `source` names the input in error messages.
    ///
    /// Rows with an unknown `Type` or without a label are skipped; missing
    /// numeric cells (empty, "-" or "–") read as absent.
    pub fn from_csv_reader<R: BufRead>(reader: R, source: &str) -> CalcResult<Self> {
        let mut lines = reader.lines();

        let header_line = lines
            .next()
            .ok_or_else(|| CalcError::file_error("read", source, "CSV file is empty"))?
            .map_err(|e| CalcError::file_error("read", source, format!("Failed to read header: {}", e)))?;

        let headers: Vec<&str> = header_line.split(',').map(str::trim).collect();
        let col_index = |name: &str| -> Option<usize> { headers.iter().position(|h| *h == name) };

        let type_idx = col_index("Type")
            .ok_or_else(|| CalcError::file_error("parse", source, "Missing 'Type' column"))?;
        let label_idx = col_index("AISC_Manual_Label")
            .ok_or_else(|| CalcError::file_error("parse", source, "Missing 'AISC_Manual_Label' column"))?;

        let a_idx = col_index("A");
        let d_idx = col_index("d");
        let ht_idx = col_index("Ht");
        let od_idx = col_index("OD");
        let bf_idx = col_index("bf");
        let tf_idx = col_index("tf");
        let tw_idx = col_index("tw");
        let t_idx = col_index("tdes");
        let ix_idx = col_index("Ix");
        let sx_idx = col_index("Sx");
        let rx_idx = col_index("rx");
        let zx_idx = col_index("Zx");
        let iy_idx = col_index("Iy");
        let sy_idx = col_index("Sy");
        let ry_idx = col_index("ry");
        let zy_idx = col_index("Zy");
        let j_idx = col_index("J");
        let cw_idx = col_index("Cw");
        let bf_2tf_idx = col_index("bf/2tf");
        let h_tw_idx = col_index("h/tw");
        let b_t_idx = col_index("b/tdes");
        let h_t_idx = col_index("h/tdes");
        let d_t_idx = col_index("D/t");

        let mut db = SteelShapeDb::new();

        for (line_num, line_result) in lines.enumerate() {
            let line = line_result.map_err(|e| {
                CalcError::file_error("read", source, format!("Failed to read line {}: {}", line_num + 2, e))
            })?;
            if line.trim().is_empty() {
                continue;
            }

            let fields: Vec<&str> = line.split(',').collect();
            let label = fields.get(label_idx).map(|s| s.trim()).unwrap_or("");
            if label.is_empty() {
                continue;
            }

            let get_opt_f64 = |idx: Option<usize>| -> Option<f64> {
                idx.and_then(|i| fields.get(i)).and_then(|v| parse_optional_f64(v))
            };
            let get_f64 = |idx: Option<usize>| -> f64 { get_opt_f64(idx).unwrap_or(0.0) };

            let shape_type = match fields.get(type_idx).and_then(|t| ShapeType::from_aisc_code(t)) {
                Some(ShapeType::HssRect) if get_opt_f64(od_idx).is_some() => ShapeType::HssRound,
                Some(t) => t,
                None => continue,
            };

            db.insert(SteelShape {
                shape_type,
                label: label.to_string(),
                area_in2: get_f64(a_idx),
                depth_in: get_opt_f64(d_idx).or(get_opt_f64(ht_idx)).or(get_opt_f64(od_idx)),
                bf_in: get_opt_f64(bf_idx),
                tf_in: get_opt_f64(tf_idx),
                tw_in: get_opt_f64(tw_idx),
                wall_thickness_in: get_opt_f64(t_idx),
                ix_in4: get_f64(ix_idx),
                sx_in3: get_f64(sx_idx),
                rx_in: get_f64(rx_idx),
                zx_in3: get_f64(zx_idx),
                iy_in4: get_f64(iy_idx),
                sy_in3: get_f64(sy_idx),
                ry_in: get_f64(ry_idx),
                zy_in3: get_f64(zy_idx),
                j_in4: get_f64(j_idx),
                cw_in6: get_opt_f64(cw_idx),
                bf_2tf: get_opt_f64(bf_2tf_idx),
                h_tw: get_opt_f64(h_tw_idx),
                b_t: get_opt_f64(b_t_idx),
                h_t: get_opt_f64(h_t_idx),
                d_t: get_opt_f64(d_t_idx),
            });
        }

        Ok(db)
    }

    pub fn insert(&mut self, shape: SteelShape) {
        let key = shape.label.to_uppercase();
        let shape_type = shape.shape_type;
        if self.shapes.insert(key.clone(), shape).is_none() {
            self.by_type.entry(shape_type).or_default().push(key);
        }
    }

    /// Look up a shape by its AISC label, case-insensitively.
    pub fn lookup(&self, label: &str) -> CalcResult<&SteelShape> {
        self.shapes
            .get(&label.trim().to_uppercase())
            .ok_or_else(|| CalcError::shape_not_found(label))
    }

    pub fn shapes_of_type(&self, shape_type: ShapeType) -> Vec<&SteelShape> {
        self.by_type
            .get(&shape_type)
            .map(|labels| labels.iter().filter_map(|l| self.shapes.get(l)).collect())
            .unwrap_or_default()
    }

    pub fn w_shapes(&self) -> Vec<&SteelShape> {
        self.shapes_of_type(ShapeType::W)
    }

    pub fn len(&self) -> usize {
        self.shapes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.shapes.is_empty()
    }
}

/// Parse a CSV numeric cell; empty cells, dashes and garbage read as None.
fn parse_optional_f64(s: &str) -> Option<f64> {
    let trimmed = s.trim();
    if trimmed.is_empty() || trimmed == "-" || trimmed == "–" || trimmed == "—" {
        return None;
    }
    f64::from_str(trimmed).ok()
}

// ============================================================================
// Built-in W-shapes
// ============================================================================

static BUILTIN_W_SHAPES: Lazy<SteelShapeDb> = Lazy::new(|| {
    let mut db = SteelShapeDb::new();

    // label, A, d, bf, tf, tw, Ix, Sx, rx, Zx, Iy, Sy, ry, Zy, J, Cw, bf/2tf, h/tw
    let rows = [
        ("W8X10", 2.96, 7.89, 3.94, 0.205, 0.170, 30.8, 7.81, 3.22, 8.87, 2.09, 1.06, 0.841, 1.66, 0.0426, 30.9, 9.61, 40.5),
        ("W10X33", 9.71, 9.73, 7.96, 0.435, 0.290, 171.0, 35.0, 4.19, 38.8, 36.6, 9.20, 1.94, 14.0, 0.583, 791.0, 9.15, 27.1),
        ("W12X26", 7.65, 12.2, 6.49, 0.380, 0.230, 204.0, 33.4, 5.17, 37.2, 17.3, 5.34, 1.51, 8.17, 0.300, 607.0, 8.54, 47.2),
        ("W14X68", 20.0, 14.0, 10.0, 0.720, 0.415, 722.0, 103.0, 6.01, 115.0, 121.0, 24.2, 2.46, 36.9, 3.01, 5380.0, 6.97, 27.5),
        ("W14X90", 26.5, 14.0, 14.5, 0.710, 0.440, 999.0, 143.0, 6.14, 157.0, 362.0, 49.9, 3.70, 75.6, 4.06, 16000.0, 10.2, 25.9),
        ("W18X50", 14.7, 18.0, 7.50, 0.570, 0.355, 800.0, 88.9, 7.38, 101.0, 40.1, 10.7, 1.65, 16.6, 1.24, 3040.0, 6.57, 45.2),
        ("W21X44", 13.0, 20.7, 6.50, 0.450, 0.350, 843.0, 81.6, 8.06, 95.4, 20.7, 6.37, 1.26, 10.2, 0.770, 2110.0, 7.22, 53.6),
        ("W24X55", 16.2, 23.6, 7.01, 0.505, 0.395, 1350.0, 114.0, 9.11, 134.0, 29.1, 8.30, 1.34, 13.3, 1.18, 3870.0, 6.94, 54.6),
    ];

    for (label, a, d, bf, tf, tw, ix, sx, rx, zx, iy, sy, ry, zy, j, cw, bf_2tf, h_tw) in rows {
        db.insert(SteelShape {
            shape_type: ShapeType::W,
            label: label.to_string(),
            area_in2: a,
            depth_in: Some(d),
            bf_in: Some(bf),
            tf_in: Some(tf),
            tw_in: Some(tw),
            wall_thickness_in: None,
            ix_in4: ix,
            sx_in3: sx,
            rx_in: rx,
            zx_in3: zx,
            iy_in4: iy,
            sy_in3: sy,
            ry_in: ry,
            zy_in3: zy,
            j_in4: j,
            cw_in6: Some(cw),
            bf_2tf: Some(bf_2tf),
            h_tw: Some(h_tw),
            b_t: None,
            h_t: None,
            d_t: None,
        });
    }

    db.source = Some("builtin-w".to_string());
    db
});

/// Common W-shapes (AISC Manual 16th Ed.) for use without the CSV export
pub fn builtin_w_shapes() -> &'static SteelShapeDb {
    &BUILTIN_W_SHAPES
}

#[cfg(test)]
mod tests {
    use super::*;

    const CSV: &str = "\
Type,EDI_Std_Nomenclature,AISC_Manual_Label,W,A,d,Ht,OD,bf,tf,tw,tdes,Ix,Zx,Sx,rx,Iy,Zy,Sy,ry,J,Cw,bf/2tf,h/tw,b/tdes,h/tdes,D/t
W,W12X26,W12X26,26,7.65,12.2,–,–,6.49,0.38,0.23,–,204,37.2,33.4,5.17,17.3,8.17,5.34,1.51,0.3,607,8.54,47.2,–,–,–
HSS,HSS6X6X1/4,HSS6X6X1/4,19.02,5.24,–,6,–,–,–,–,0.233,28.6,17.2,9.54,2.34,28.6,17.2,9.54,2.34,46,–,–,–,22.8,22.8,–
HSS,HSS6.625X0.280,HSS6.625X0.280,19.02,5.2,–,–,6.625,–,–,–,0.26,26,10.6,7.85,2.25,26,10.6,7.85,2.25,52,–,–,–,–,–,25.5
C,C10X30,C10X30,30,8.81,10,–,–,3.03,0.436,0.673,–,103,26.6,20.7,3.42,3.93,3.78,1.65,0.669,1.22,79.5,4.5,11.7,–,–,–

W,,,,,,,,,,,,,,,,,,,,,,,,,,
";

    #[test]
    fn test_shape_type_parsing() {
        assert_eq!(ShapeType::from_aisc_code("W"), Some(ShapeType::W));
        assert_eq!(ShapeType::from_aisc_code(" hss "), Some(ShapeType::HssRect));
        assert_eq!(ShapeType::from_aisc_code("PIPE"), Some(ShapeType::Pipe));
        assert_eq!(ShapeType::from_aisc_code("WT"), None);
        assert!(ShapeType::HP.is_doubly_symmetric_open());
        assert!(!ShapeType::HssRound.is_doubly_symmetric_open());
    }

    #[test]
    fn test_csv_reader() {
        let db = SteelShapeDb::from_csv_reader(CSV.as_bytes(), "inline").unwrap();
        assert_eq!(db.len(), 3, "channel and blank rows skipped");

        let w = db.lookup("W12X26").unwrap();
        assert_eq!(w.shape_type, ShapeType::W);
        assert_eq!(w.cw_in6, Some(607.0));
        assert_eq!(w.depth_in, Some(12.2));
        assert_eq!(w.h_tw, Some(47.2));

        let round = db.lookup("hss6.625x0.280").unwrap();
        assert_eq!(round.shape_type, ShapeType::HssRound);
        assert_eq!(round.depth_in, Some(6.625));

        let square = db.lookup("HSS6X6X1/4").unwrap();
        assert_eq!(square.shape_type, ShapeType::HssRect);
        assert_eq!(square.wall_thickness_in, Some(0.233));
        assert_eq!(db.source.as_deref(), None);
    }

    #[test]
    fn test_element_ratios() {
        let db = SteelShapeDb::from_csv_reader(CSV.as_bytes(), "inline").unwrap();

        let w = db.lookup("W12X26").unwrap();
        assert_eq!(
            w.element_ratios(),
            Some(vec![(ElementRatio::FlangeBf2tf, 8.54), (ElementRatio::WebHtw, 47.2)])
        );

        let square = db.lookup("HSS6X6X1/4").unwrap();
        assert_eq!(
            square.element_ratios(),
            Some(vec![(ElementRatio::WallBt, 22.8), (ElementRatio::WallHt, 22.8)])
        );

        let round = db.lookup("HSS6.625X0.280").unwrap();
        assert_eq!(round.element_ratios(), Some(vec![(ElementRatio::WallDt, 25.5)]));
    }

    #[test]
    fn test_element_ratios_from_dimensions() {
        let mut w = builtin_w_shapes().lookup("W21X44").unwrap().clone();
        w.bf_2tf = None;
        w.h_tw = None;
        let ratios = w.element_ratios().unwrap();
        assert!((ratios[0].1 - 6.50 / 0.90).abs() < 1e-9);
        assert!((ratios[1].1 - (20.7 - 0.90) / 0.35).abs() < 1e-9);

        w.tw_in = None;
        assert_eq!(w.element_ratios(), None);
    }

    #[test]
    fn test_csv_missing_columns() {
        let err = SteelShapeDb::from_csv_reader("Type,A\nW,1\n".as_bytes(), "bad.csv").unwrap_err();
        assert_eq!(err.error_code(), "FILE_ERROR");
        assert!(SteelShapeDb::from_csv_reader("".as_bytes(), "empty.csv").is_err());
        assert!(SteelShapeDb::load_from_csv("/nonexistent/shapes.csv").is_err());
    }

    #[test]
    fn test_builtin_shapes() {
        let db = builtin_w_shapes();
        assert_eq!(db.len(), 8);
        assert_eq!(db.w_shapes().len(), 8);

        let w14x90 = db.lookup("W14X90").unwrap();
        assert_eq!(w14x90.area_in2, 26.5);
        assert_eq!(w14x90.j_in4, 4.06);
        assert_eq!(w14x90.bf_2tf, Some(10.2));
        assert_eq!(db.source.as_deref(), Some("builtin-w"));

        for shape in db.w_shapes() {
            assert!(shape.cw_in6.is_some(), "{} lacks Cw", shape.label);
            assert!(shape.ix_in4 > shape.iy_in4);
        }
    }

    #[test]
    fn test_shape_not_found() {
        let err = builtin_w_shapes().lookup("W99X999").unwrap_err();
        assert_eq!(err.error_code(), "SHAPE_NOT_FOUND");
    }

    #[test]
    fn test_parse_optional_f64() {
        assert_eq!(parse_optional_f64("123.45"), Some(123.45));
        assert_eq!(parse_optional_f64("  456  "), Some(456.0));
        assert_eq!(parse_optional_f64(""), None);
        assert_eq!(parse_optional_f64("-"), None);
        assert_eq!(parse_optional_f64("–"), None);
        assert_eq!(parse_optional_f64("n/a"), None);
    }
}
