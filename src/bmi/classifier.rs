use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

use super::category::{BmiCategory, HealthRisk};
use super::validator::{extra_columns, Measurement};
use crate::data::model::{CellValue, RawRecord, GENDER, HEIGHT_CM, WEIGHT_KG};

// ---------------------------------------------------------------------------
// ClassifiedRecord – a row plus its derived columns
// ---------------------------------------------------------------------------

/// One output row: the measurement columns, any extra input columns, then
/// `BMI`, `BMICat` and `HealthRisk`.
///
/// The derived fields are `None` only for rows classified without
/// validation whose measurements are missing or give a non-finite BMI.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ClassifiedRecord {
    #[serde(rename = "Gender")]
    pub gender: CellValue,
    #[serde(rename = "HeightCm")]
    pub height_cm: CellValue,
    #[serde(rename = "WeightKg")]
    pub weight_kg: CellValue,
    #[serde(flatten)]
    pub extra: IndexMap<String, CellValue>,
    #[serde(rename = "BMI")]
    pub bmi: Option<f64>,
    #[serde(rename = "BMICat")]
    pub bmi_cat: Option<BmiCategory>,
    #[serde(rename = "HealthRisk")]
    pub health_risk: Option<HealthRisk>,
}

impl ClassifiedRecord {
    fn new(
        gender: CellValue,
        height_cm: CellValue,
        weight_kg: CellValue,
        extra: IndexMap<String, CellValue>,
        bmi: Option<f64>,
    ) -> Self {
        let bmi_cat = bmi.and_then(BmiCategory::from_bmi);
        Self {
            gender,
            height_cm,
            weight_kg,
            extra,
            bmi,
            bmi_cat,
            health_risk: bmi_cat.map(BmiCategory::health_risk),
        }
    }
}

/// `weight / (height / 100)^2`.
pub fn compute_bmi(weight_kg: f64, height_cm: f64) -> f64 {
    weight_kg / (height_cm / 100.0).powi(2)
}

/// Classify validated measurements.
pub fn classify(measurements: &[Measurement]) -> Vec<ClassifiedRecord> {
    measurements
        .iter()
        .map(|m| {
            ClassifiedRecord::new(
                CellValue::String(m.gender.clone()),
                m.height_cell.clone(),
                m.weight_cell.clone(),
                m.extra.clone(),
                Some(compute_bmi(m.weight_kg, m.height_cm)),
            )
        })
        .collect()
}

/// Classify raw rows as they are, without validation. Cells are written back
/// untouched; a row whose height or weight is not numeric, or whose BMI is
/// not finite, gets no BMI and no category.
pub fn classify_unchecked(rows: &[RawRecord]) -> Vec<ClassifiedRecord> {
    let cell = |row: &RawRecord, col: &str| row.get(col).cloned().unwrap_or(CellValue::Null);

    rows.iter()
        .map(|row| {
            let height_cm = cell(row, HEIGHT_CM);
            let weight_kg = cell(row, WEIGHT_KG);
            let bmi = match (weight_kg.to_f64(), height_cm.to_f64()) {
                (Some(w), Some(h)) => Some(compute_bmi(w, h)).filter(|b| b.is_finite()),
                _ => None,
            };
            ClassifiedRecord::new(cell(row, GENDER), height_cm, weight_kg, extra_columns(row), bmi)
        })
        .collect()
}
