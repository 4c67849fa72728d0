use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use anyhow::{bail, Context, Result};
use arrow::array::{Array, AsArray};
use arrow::datatypes::{DataType, Float32Type, Float64Type, Int32Type, Int64Type};
use parquet::arrow::arrow_reader::ParquetRecordBatchReaderBuilder;
use serde_json::{Map as JsonMap, Value as JsonValue};

use super::model::{CellValue, RawDataset, RawRecord};

// ---------------------------------------------------------------------------
// Input source
// ---------------------------------------------------------------------------

/// Where the measurement table comes from. Callers say explicitly whether
/// they hold a path or the JSON document itself.
#[derive(Debug, Clone, PartialEq)]
pub enum InputSource {
    Path(PathBuf),
    Inline(String),
}

impl InputSource {
    pub fn load(&self) -> Result<RawDataset> {
        match self {
            InputSource::Path(path) => load_file(path),
            InputSource::Inline(text) => load_json_str(text).context("parsing inline JSON input"),
        }
    }
}

// ---------------------------------------------------------------------------
// Public entry-point
// ---------------------------------------------------------------------------

/// Load a measurement table from a file.  Dispatch by extension.
///
/// Supported formats:
/// * `.json`    – records (`[{ "Gender": .., "HeightCm": .., "WeightKg": .. }, ...]`)
///                or columns (`{ "Gender": { "0": .., "1": .. }, ... }`) layout
/// * `.csv`     – header row with column names
/// * `.parquet` – one column per field
pub fn load_file(path: &Path) -> Result<RawDataset> {
    let ext = path
        .extension()
        .and_then(|e| e.to_str())
        .unwrap_or("")
        .to_ascii_lowercase();

    let dataset = match ext.as_str() {
        "json" => {
            let text = std::fs::read_to_string(path)
                .with_context(|| format!("reading JSON file {}", path.display()))?;
            load_json_str(&text).with_context(|| format!("parsing {}", path.display()))?
        }
        "csv" => load_csv(path)?,
        "parquet" | "pq" => load_parquet(path)?,
        other => bail!("Unsupported file extension: .{other}"),
    };

    log::info!(
        "Loaded {} rows ({} columns) from {}",
        dataset.len(),
        dataset.column_names.len(),
        path.display()
    );
    Ok(dataset)
}

// ---------------------------------------------------------------------------
// JSON loader
// ---------------------------------------------------------------------------

/// Parse a JSON document in either of the two layouts a dataframe writes by
/// default:
///
/// ```json
/// [ { "Gender": "Male", "HeightCm": 171, "WeightKg": 96 }, ... ]
/// ```
///
/// ```json
/// { "Gender": { "0": "Male", "1": "Female" }, "HeightCm": { "0": 171, "1": 161 }, ... }
/// ```
///
/// In the columns layout a column may also be a plain array.
pub fn load_json_str(text: &str) -> Result<RawDataset> {
    let root: JsonValue = serde_json::from_str(text).context("parsing JSON")?;

    match root {
        JsonValue::Array(records) => load_json_records(&records),
        JsonValue::Object(columns) => load_json_columns(&columns),
        _ => bail!("Expected a top-level JSON array of records or object of columns"),
    }
}

fn load_json_records(records: &[JsonValue]) -> Result<RawDataset> {
    let mut rows = Vec::with_capacity(records.len());
    let mut column_names: Vec<String> = Vec::new();

    for (i, rec) in records.iter().enumerate() {
        let obj = rec
            .as_object()
            .with_context(|| format!("Row {i} is not a JSON object"))?;

        let mut row = RawRecord::new();
        for (key, val) in obj {
            if !column_names.contains(key) {
                column_names.push(key.clone());
            }
            row.insert(key.clone(), CellValue::from(val));
        }
        rows.push(row);
    }

    Ok(RawDataset::with_columns(rows, column_names))
}

fn load_json_columns(columns: &JsonMap<String, JsonValue>) -> Result<RawDataset> {
    // row index → row; ordered by numeric index, then lexically for
    // non-numeric labels.
    let mut by_index: BTreeMap<(u64, String), RawRecord> = BTreeMap::new();

    for (col, cells) in columns {
        match cells {
            JsonValue::Object(indexed) => {
                for (label, val) in indexed {
                    let key = (label.parse::<u64>().unwrap_or(u64::MAX), label.clone());
                    by_index
                        .entry(key)
                        .or_default()
                        .insert(col.clone(), CellValue::from(val));
                }
            }
            JsonValue::Array(values) => {
                for (i, val) in values.iter().enumerate() {
                    let key = (i as u64, i.to_string());
                    by_index
                        .entry(key)
                        .or_default()
                        .insert(col.clone(), CellValue::from(val));
                }
            }
            _ => bail!("Column '{col}' is neither an object nor an array"),
        }
    }

    let column_names: Vec<String> = columns.keys().cloned().collect();
    let rows = by_index.into_values().collect();
    Ok(RawDataset::with_columns(rows, column_names))
}

// ---------------------------------------------------------------------------
// CSV loader
// ---------------------------------------------------------------------------

/// CSV layout: header row with column names, one measurement per line.
/// Cell types are guessed per value; empty cells are `Null`.
fn load_csv(path: &Path) -> Result<RawDataset> {
    let mut reader = csv::Reader::from_path(path).context("opening CSV")?;
    let headers: Vec<String> = reader
        .headers()
        .context("reading CSV headers")?
        .iter()
        .map(|h| h.to_string())
        .collect();

    let mut rows = Vec::new();

    for (row_no, result) in reader.records().enumerate() {
        let record = result.with_context(|| format!("CSV row {row_no}"))?;

        let mut row = RawRecord::new();
        for (col_idx, value) in record.iter().enumerate() {
            let Some(col_name) = headers.get(col_idx) else {
                bail!("CSV row {row_no}: more fields than header columns");
            };
            row.insert(col_name.clone(), guess_cell_type(value));
        }
        rows.push(row);
    }

    Ok(RawDataset::with_columns(rows, headers))
}

fn guess_cell_type(s: &str) -> CellValue {
    if s.is_empty() {
        return CellValue::Null;
    }
    if let Ok(i) = s.parse::<i64>() {
        return CellValue::Integer(i);
    }
    if let Ok(f) = s.parse::<f64>() {
        return CellValue::Float(f);
    }
    if s == "true" || s == "false" {
        return CellValue::Bool(s == "true");
    }
    CellValue::String(s.to_string())
}

// ---------------------------------------------------------------------------
// Parquet loader
// ---------------------------------------------------------------------------

/// Load a Parquet file with one column per field (strings, ints, floats,
/// bools). Works with files written by both **Pandas** (`df.to_parquet()`)
/// and **Polars** (`df.write_parquet()`).
fn load_parquet(path: &Path) -> Result<RawDataset> {
    let file = std::fs::File::open(path).context("opening parquet file")?;
    let builder = ParquetRecordBatchReaderBuilder::try_new(file)
        .context("reading parquet metadata")?;
    let column_names: Vec<String> = builder
        .schema()
        .fields()
        .iter()
        .map(|f| f.name().clone())
        .collect();
    let reader = builder.build().context("building parquet reader")?;

    let mut rows = Vec::new();

    for batch_result in reader {
        let batch = batch_result.context("reading parquet record batch")?;
        let schema = batch.schema();

        for row in 0..batch.num_rows() {
            let mut record = RawRecord::new();
            for (col_idx, field) in schema.fields().iter().enumerate() {
                let value = extract_cell_value(batch.column(col_idx), row);
                record.insert(field.name().clone(), value);
            }
            rows.push(record);
        }
    }

    Ok(RawDataset::with_columns(rows, column_names))
}

/// Extract a single cell from an Arrow column at a given row.
fn extract_cell_value(col: &Arc<dyn Array>, row: usize) -> CellValue {
    if col.is_null(row) {
        return CellValue::Null;
    }
    let value = match col.data_type() {
        DataType::Utf8 => col
            .as_string_opt::<i32>()
            .map(|s| CellValue::String(s.value(row).to_string())),
        DataType::LargeUtf8 => col
            .as_string_opt::<i64>()
            .map(|s| CellValue::String(s.value(row).to_string())),
        DataType::Int32 => col
            .as_primitive_opt::<Int32Type>()
            .map(|arr| CellValue::Integer(i64::from(arr.value(row)))),
        DataType::Int64 => col
            .as_primitive_opt::<Int64Type>()
            .map(|arr| CellValue::Integer(arr.value(row))),
        DataType::Float32 => col
            .as_primitive_opt::<Float32Type>()
            .map(|arr| CellValue::Float(f64::from(arr.value(row)))),
        DataType::Float64 => col
            .as_primitive_opt::<Float64Type>()
            .map(|arr| CellValue::Float(arr.value(row))),
        DataType::Boolean => col
            .as_boolean_opt()
            .map(|arr| CellValue::Bool(arr.value(row))),
        _ => None,
    };
    value.unwrap_or_else(|| CellValue::String(format!("{:?}", col.data_type())))
}
