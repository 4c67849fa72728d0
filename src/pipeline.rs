use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use serde_json::Value as JsonValue;

use crate::bmi::category::BmiCategory;
use crate::bmi::frame::BmiFrame;
use crate::bmi::validator::ValidationReport;
use crate::data::loader::InputSource;

// ---------------------------------------------------------------------------
// Run options
// ---------------------------------------------------------------------------

/// Everything one run needs, independent of how it was requested.
#[derive(Debug, Clone)]
pub struct RunOptions {
    pub input: InputSource,
    /// Where to write the classified records, if anywhere.
    pub output: Option<PathBuf>,
    /// Pretty-print indentation of the JSON output (0 = compact).
    pub indent: usize,
    /// Drop implausible rows before classifying.
    pub validate: bool,
    /// Category labels to count, in report order.
    pub categories: Vec<String>,
    /// JSON file holding an array of further labels.
    pub labels_file: Option<PathBuf>,
}

impl RunOptions {
    pub fn new(input: InputSource) -> Self {
        Self {
            input,
            output: None,
            indent: 0,
            validate: true,
            categories: Vec::new(),
            labels_file: None,
        }
    }
}

/// Outcome of one run.
#[derive(Debug, Clone, PartialEq)]
pub struct RunReport {
    /// Requested label → count, in request order.
    pub counts: Vec<(String, usize)>,
    /// Count of every category.
    pub summary: Vec<(BmiCategory, usize)>,
    /// Rows classified (after validation, if any).
    pub records: usize,
    pub validation: Option<ValidationReport>,
}

impl RunReport {
    pub fn count(&self, label: &str) -> Option<usize> {
        self.counts
            .iter()
            .find(|(l, _)| l == label)
            .map(|(_, n)| *n)
    }
}

// ---------------------------------------------------------------------------
// Run
// ---------------------------------------------------------------------------

/// Load, optionally validate, classify, optionally write, then count.
pub fn run(opts: &RunOptions) -> Result<RunReport> {
    let dataset = opts.input.load()?;
    let frame = BmiFrame::new(dataset)?;
    let classification = frame.calculate(opts.validate);
    log::debug!("Classified {} records", classification.records.len());

    if let Some(path) = &opts.output {
        classification.write(path, opts.indent)?;
    }

    let mut labels = opts.categories.clone();
    if let Some(path) = &opts.labels_file {
        for label in load_labels(path)? {
            // Type-checks the label before it joins the list.
            classification.range_count_value(&label)?;
            if let JsonValue::String(s) = label {
                labels.push(s);
            }
        }
    }

    Ok(RunReport {
        counts: classification.counts(&labels),
        summary: classification.summary(),
        records: classification.records.len(),
        validation: classification.validation,
    })
}

/// Read a JSON array of category labels. Entries are not type-checked here.
pub fn load_labels(path: &Path) -> Result<Vec<JsonValue>> {
    let text = std::fs::read_to_string(path)
        .with_context(|| format!("reading labels file {}", path.display()))?;
    let root: JsonValue = serde_json::from_str(&text).context("parsing labels file")?;
    match root {
        JsonValue::Array(labels) => Ok(labels),
        _ => anyhow::bail!("Labels file must hold a JSON array"),
    }
}
