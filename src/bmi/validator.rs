use indexmap::IndexMap;

use crate::data::model::{
    CellValue, RawRecord, DERIVED_COLUMNS, GENDER, HEIGHT_CM, REQUIRED_COLUMNS, WEIGHT_KG,
};

/// Upper bound (exclusive) for a plausible body weight.
pub const MAX_WEIGHT_KG: f64 = 800.0;
/// Upper bound (exclusive) for a plausible body height.
pub const MAX_HEIGHT_CM: f64 = 300.0;

// ---------------------------------------------------------------------------
// Measurement – a row that survived type coercion
// ---------------------------------------------------------------------------

/// A typed measurement row. Columns other than the required and derived
/// ones are kept in `extra` so they can be written back out.
#[derive(Debug, Clone, PartialEq)]
pub struct Measurement {
    pub gender: String,
    pub height_cm: f64,
    pub weight_kg: f64,
    /// `height_cm` as written back: the input number, or the number a
    /// string cell parsed to.
    pub height_cell: CellValue,
    pub weight_cell: CellValue,
    pub extra: IndexMap<String, CellValue>,
}

impl Measurement {
    pub fn new(gender: impl Into<String>, height_cm: f64, weight_kg: f64) -> Self {
        Self {
            gender: gender.into(),
            height_cm,
            weight_kg,
            height_cell: CellValue::Float(height_cm),
            weight_cell: CellValue::Float(weight_kg),
            extra: IndexMap::new(),
        }
    }

    /// Coerce a raw row. `None` when any required field is missing or, for
    /// the numeric fields, not a number.
    pub fn coerce(row: &RawRecord) -> Option<Self> {
        let gender = row.get(GENDER)?.to_text()?;
        let height_cell = row.get(HEIGHT_CM)?.to_numeric()?;
        let weight_cell = row.get(WEIGHT_KG)?.to_numeric()?;
        Some(Self {
            gender,
            height_cm: height_cell.to_f64()?,
            weight_kg: weight_cell.to_f64()?,
            height_cell,
            weight_cell,
            extra: extra_columns(row),
        })
    }

    /// Strict exclusive bounds: `0 < weight < 800`, `0 < height < 300`.
    pub fn is_plausible(&self) -> bool {
        self.weight_kg > 0.0
            && self.weight_kg < MAX_WEIGHT_KG
            && self.height_cm > 0.0
            && self.height_cm < MAX_HEIGHT_CM
    }
}

/// Every cell of `row` except the required and derived columns, in input
/// order.
pub fn extra_columns(row: &RawRecord) -> IndexMap<String, CellValue> {
    row.iter()
        .filter(|(col, _)| {
            !REQUIRED_COLUMNS.contains(&col.as_str()) && !DERIVED_COLUMNS.contains(&col.as_str())
        })
        .map(|(col, val)| (col.clone(), val.clone()))
        .collect()
}

// ---------------------------------------------------------------------------
// Validation
// ---------------------------------------------------------------------------

/// Row counts of one validation pass.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct ValidationReport {
    pub input_rows: usize,
    /// Rows dropped because a required field was missing or not coercible.
    pub malformed: usize,
    /// Rows dropped by the range check.
    pub out_of_range: usize,
}

impl ValidationReport {
    pub fn removed(&self) -> usize {
        self.malformed + self.out_of_range
    }

    pub fn kept(&self) -> usize {
        self.input_rows - self.removed()
    }
}

/// Output of [`validate`]: the surviving rows plus what was dropped.
#[derive(Debug, Clone, PartialEq)]
pub struct Validated {
    pub measurements: Vec<Measurement>,
    pub report: ValidationReport,
}

/// Coerce every row and keep those with plausible values. Order is kept.
///
/// Removing rows is not an error; a warning with the count is logged.
pub fn validate(rows: &[RawRecord]) -> Validated {
    let mut report = ValidationReport {
        input_rows: rows.len(),
        ..Default::default()
    };

    let measurements: Vec<Measurement> = rows
        .iter()
        .filter_map(|row| {
            let Some(m) = Measurement::coerce(row) else {
                report.malformed += 1;
                return None;
            };
            if !m.is_plausible() {
                report.out_of_range += 1;
                return None;
            }
            Some(m)
        })
        .collect();

    log::debug!(
        "Validation kept {} of {} rows ({} malformed, {} out of range)",
        measurements.len(),
        report.input_rows,
        report.malformed,
        report.out_of_range
    );
    if report.removed() != 0 {
        log::warn!(
            "{} rows from input were invalid and have been removed.",
            report.removed()
        );
    }

    Validated {
        measurements,
        report,
    }
}
