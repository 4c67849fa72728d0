use std::path::Path;

use anyhow::Result;
use serde_json::Value as JsonValue;

use super::category::BmiCategory;
use super::classifier::{classify, classify_unchecked, ClassifiedRecord};
use super::counter;
use super::validator::{validate, Validated, ValidationReport};
use crate::data::model::{RawDataset, REQUIRED_COLUMNS};
use crate::data::writer::write_records;
use crate::error::BmiError;

// ---------------------------------------------------------------------------
// BmiFrame – a schema-checked input table
// ---------------------------------------------------------------------------

/// An input table known to carry `Gender`, `HeightCm` and `WeightKg`.
#[derive(Debug, Clone)]
pub struct BmiFrame {
    dataset: RawDataset,
}

impl BmiFrame {
    /// Fails with [`BmiError::Schema`] when a required column is absent.
    pub fn new(dataset: RawDataset) -> Result<Self, BmiError> {
        let missing: Vec<String> = REQUIRED_COLUMNS
            .iter()
            .filter(|col| !dataset.has_column(col))
            .map(|col| col.to_string())
            .collect();
        if !missing.is_empty() {
            return Err(BmiError::Schema { missing });
        }
        Ok(Self { dataset })
    }

    pub fn dataset(&self) -> &RawDataset {
        &self.dataset
    }

    /// Validate the rows without classifying them.
    pub fn validate(&self) -> Validated {
        validate(&self.dataset.rows)
    }

    /// Compute BMI, category and risk for every row, validating first when
    /// `validate` is set.
    pub fn calculate(&self, validate: bool) -> Classification {
        if validate {
            let Validated {
                measurements,
                report,
            } = self.validate();
            Classification {
                records: classify(&measurements),
                validation: Some(report),
            }
        } else {
            Classification {
                records: classify_unchecked(&self.dataset.rows),
                validation: None,
            }
        }
    }
}

// ---------------------------------------------------------------------------
// Classification – the enriched rows of one run
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq)]
pub struct Classification {
    pub records: Vec<ClassifiedRecord>,
    /// `None` when validation was skipped.
    pub validation: Option<ValidationReport>,
}

impl Classification {
    pub fn range_count(&self, label: &str) -> usize {
        counter::count_category(&self.records, label)
    }

    pub fn range_count_value(&self, label: &JsonValue) -> Result<usize, BmiError> {
        counter::count_label(&self.records, label)
    }

    pub fn counts<S: AsRef<str>>(&self, labels: &[S]) -> Vec<(String, usize)> {
        counter::count_all(&self.records, labels)
    }

    pub fn summary(&self) -> Vec<(BmiCategory, usize)> {
        counter::summary(&self.records)
    }

    pub fn write(&self, path: &Path, indent: usize) -> Result<()> {
        write_records(&self.records, path, indent)
    }
}
