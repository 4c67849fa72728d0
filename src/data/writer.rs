use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;

use anyhow::{bail, Context, Result};
use serde::Serialize;
use serde_json::Value as JsonValue;

// ---------------------------------------------------------------------------
// Public entry-point
// ---------------------------------------------------------------------------

/// Write records to a file, one record per element.  Dispatch by extension.
///
/// * `.csv` – header row from the union of the record fields
/// * anything else – a JSON array, pretty-printed with `indent` spaces
///   (`0` writes compact JSON)
pub fn write_records<T: Serialize>(records: &[T], path: &Path, indent: usize) -> Result<()> {
    let ext = path
        .extension()
        .and_then(|e| e.to_str())
        .unwrap_or("")
        .to_ascii_lowercase();

    let file = File::create(path).with_context(|| format!("creating {}", path.display()))?;
    let mut out = BufWriter::new(file);

    match ext.as_str() {
        "csv" => write_csv(records, &mut out)?,
        _ => write_json(records, &mut out, indent)?,
    }
    out.flush().with_context(|| format!("flushing {}", path.display()))?;

    log::info!("Wrote {} records to {}", records.len(), path.display());
    Ok(())
}

// ---------------------------------------------------------------------------
// JSON writer
// ---------------------------------------------------------------------------

pub fn write_json<T: Serialize, W: Write>(records: &[T], out: W, indent: usize) -> Result<()> {
    if indent == 0 {
        serde_json::to_writer(out, records).context("serializing records")?;
    } else {
        let indent = b" ".repeat(indent);
        let formatter = serde_json::ser::PrettyFormatter::with_indent(&indent);
        let mut ser = serde_json::Serializer::with_formatter(out, formatter);
        records.serialize(&mut ser).context("serializing records")?;
    }
    Ok(())
}

// ---------------------------------------------------------------------------
// CSV writer
// ---------------------------------------------------------------------------

/// Records must serialize to JSON objects. Columns are ordered by first
/// appearance; a record lacking a column gets an empty cell.
pub fn write_csv<T: Serialize, W: Write>(records: &[T], out: W) -> Result<()> {
    let mut rows = Vec::with_capacity(records.len());
    let mut headers: Vec<String> = Vec::new();

    for (i, rec) in records.iter().enumerate() {
        let JsonValue::Object(obj) = serde_json::to_value(rec).context("serializing record")? else {
            bail!("Record {i} does not serialize to an object");
        };
        for key in obj.keys() {
            if !headers.contains(key) {
                headers.push(key.clone());
            }
        }
        rows.push(obj);
    }

    let mut writer = csv::Writer::from_writer(out);
    writer.write_record(&headers).context("writing CSV header")?;
    for (i, obj) in rows.iter().enumerate() {
        let cells = headers.iter().map(|h| match obj.get(h) {
            None | Some(JsonValue::Null) => String::new(),
            Some(JsonValue::String(s)) => s.clone(),
            Some(other) => other.to_string(),
        });
        writer
            .write_record(cells)
            .with_context(|| format!("writing CSV row {i}"))?;
    }
    writer.flush().context("flushing CSV")?;
    Ok(())
}
