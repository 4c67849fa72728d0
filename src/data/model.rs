use std::fmt;

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use serde_json::Value as JsonValue;

// ---------------------------------------------------------------------------
// Column names
// ---------------------------------------------------------------------------

pub const GENDER: &str = "Gender";
pub const HEIGHT_CM: &str = "HeightCm";
pub const WEIGHT_KG: &str = "WeightKg";

pub const BMI: &str = "BMI";
pub const BMI_CAT: &str = "BMICat";
pub const HEALTH_RISK: &str = "HealthRisk";

/// Columns every input table must carry.
pub const REQUIRED_COLUMNS: [&str; 3] = [GENDER, HEIGHT_CM, WEIGHT_KG];

/// Columns the classifier writes. Input cells under these names are replaced.
pub const DERIVED_COLUMNS: [&str; 3] = [BMI, BMI_CAT, HEALTH_RISK];

// ---------------------------------------------------------------------------
// CellValue – a single cell of the input table
// ---------------------------------------------------------------------------

/// A dynamically-typed cell mirroring the dtypes JSON, CSV and Parquet
/// inputs can carry. Serialized untagged, so a string cell round-trips as a
/// plain JSON string and `Null` as `null`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum CellValue {
    String(String),
    Integer(i64),
    Float(f64),
    Bool(bool),
    Null,
}

impl fmt::Display for CellValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CellValue::String(s) => write!(f, "{s}"),
            CellValue::Integer(i) => write!(f, "{i}"),
            CellValue::Float(v) => write!(f, "{v}"),
            CellValue::Bool(b) => write!(f, "{b}"),
            CellValue::Null => write!(f, "<null>"),
        }
    }
}

impl CellValue {
    /// Numeric coercion: numbers pass through unchanged, strings are parsed
    /// after trimming (as an integer when they hold one). Everything else,
    /// and NaN, counts as missing.
    pub fn to_numeric(&self) -> Option<CellValue> {
        match self {
            CellValue::Integer(_) => Some(self.clone()),
            CellValue::Float(v) => (!v.is_nan()).then(|| self.clone()),
            CellValue::String(s) => {
                let s = s.trim();
                if let Ok(i) = s.parse::<i64>() {
                    return Some(CellValue::Integer(i));
                }
                s.parse::<f64>()
                    .ok()
                    .filter(|v| !v.is_nan())
                    .map(CellValue::Float)
            }
            CellValue::Bool(_) | CellValue::Null => None,
        }
    }

    /// [`CellValue::to_numeric`] as an `f64`.
    pub fn to_f64(&self) -> Option<f64> {
        match self.to_numeric()? {
            CellValue::Integer(i) => Some(i as f64),
            CellValue::Float(v) => Some(v),
            _ => None,
        }
    }

    /// Text coercion: only `Null` is missing.
    pub fn to_text(&self) -> Option<String> {
        match self {
            // Null stays missing rather than becoming the text "None", so a
            // row without a gender is dropped.
            CellValue::Null => None,
            CellValue::String(s) => Some(s.clone()),
            other => Some(other.to_string()),
        }
    }
}

impl From<&JsonValue> for CellValue {
    fn from(val: &JsonValue) -> Self {
        match val {
            JsonValue::String(s) => CellValue::String(s.clone()),
            JsonValue::Number(n) => {
                if let Some(i) = n.as_i64() {
                    CellValue::Integer(i)
                } else if let Some(f) = n.as_f64() {
                    CellValue::Float(f)
                } else {
                    CellValue::String(n.to_string())
                }
            }
            JsonValue::Bool(b) => CellValue::Bool(*b),
            JsonValue::Null => CellValue::Null,
            other => CellValue::String(other.to_string()),
        }
    }
}

// ---------------------------------------------------------------------------
// RawDataset – the table as loaded, before validation
// ---------------------------------------------------------------------------

/// One input row: column_name → cell, in input column order. Columns a row
/// lacks read as `Null`.
pub type RawRecord = IndexMap<String, CellValue>;

/// The loaded table with its column index.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RawDataset {
    /// All rows, in input order.
    pub rows: Vec<RawRecord>,
    /// Column names in first-seen order.
    pub column_names: Vec<String>,
}

impl RawDataset {
    /// Build the column index from the loaded rows.
    pub fn from_rows(rows: Vec<RawRecord>) -> Self {
        let mut column_names: Vec<String> = Vec::new();
        for row in &rows {
            for col in row.keys() {
                if !column_names.iter().any(|c| c == col) {
                    column_names.push(col.clone());
                }
            }
        }
        Self { rows, column_names }
    }

    /// Like [`RawDataset::from_rows`], but with an explicit column list.
    /// Used by the tabular loaders, whose header is known even when there
    /// are no rows.
    pub fn with_columns(rows: Vec<RawRecord>, column_names: Vec<String>) -> Self {
        Self { rows, column_names }
    }

    pub fn has_column(&self, name: &str) -> bool {
        self.column_names.iter().any(|c| c == name)
    }

    /// Number of rows.
    pub fn len(&self) -> usize {
        self.rows.len()
    }

    /// Whether the dataset is empty.
    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn numeric_coercion() {
        assert_eq!(CellValue::Integer(171).to_f64(), Some(171.0));
        assert_eq!(CellValue::Float(96.5).to_f64(), Some(96.5));
        assert_eq!(CellValue::String(" 180 ".into()).to_f64(), Some(180.0));
        assert_eq!(CellValue::String("tall".into()).to_f64(), None);
        assert_eq!(CellValue::String("NaN".into()).to_f64(), None);
        assert_eq!(CellValue::Bool(true).to_f64(), None);
        assert_eq!(CellValue::Null.to_f64(), None);
    }

    #[test]
    fn numeric_cells_keep_their_type() {
        assert_eq!(CellValue::Integer(170).to_numeric(), Some(CellValue::Integer(170)));
        assert_eq!(CellValue::Float(170.5).to_numeric(), Some(CellValue::Float(170.5)));
        assert_eq!(CellValue::String("170".into()).to_numeric(), Some(CellValue::Integer(170)));
        assert_eq!(CellValue::String("170.5 ".into()).to_numeric(), Some(CellValue::Float(170.5)));
        assert_eq!(CellValue::Float(f64::NAN).to_numeric(), None);
        assert_eq!(CellValue::Bool(false).to_numeric(), None);
    }

    #[test]
    fn text_coercion() {
        assert_eq!(CellValue::String("Male".into()).to_text().as_deref(), Some("Male"));
        assert_eq!(CellValue::Integer(1).to_text().as_deref(), Some("1"));
        assert_eq!(CellValue::Bool(false).to_text().as_deref(), Some("false"));
        assert_eq!(CellValue::Null.to_text(), None);
    }

    #[test]
    fn json_cells() {
        assert_eq!(CellValue::from(&json!(3)), CellValue::Integer(3));
        assert_eq!(CellValue::from(&json!(3.5)), CellValue::Float(3.5));
        assert_eq!(CellValue::from(&json!(null)), CellValue::Null);
        assert_eq!(CellValue::from(&json!([1, 2])), CellValue::String("[1,2]".into()));
    }

    #[test]
    fn column_index_keeps_first_seen_order() {
        let mut a = RawRecord::new();
        a.insert(WEIGHT_KG.into(), CellValue::Integer(70));
        let mut b = RawRecord::new();
        b.insert(GENDER.into(), CellValue::String("Female".into()));
        b.insert(WEIGHT_KG.into(), CellValue::Integer(60));

        let ds = RawDataset::from_rows(vec![a, b]);
        assert_eq!(ds.column_names, vec![WEIGHT_KG.to_string(), GENDER.to_string()]);
        let keys: Vec<&str> = ds.rows[1].keys().map(String::as_str).collect();
        assert_eq!(keys, vec![GENDER, WEIGHT_KG]);
        assert!(ds.has_column(GENDER));
        assert!(!ds.has_column(HEIGHT_CM));
        assert_eq!(ds.len(), 2);
    }
}
