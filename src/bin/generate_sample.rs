use std::path::{Path, PathBuf};
use std::sync::Arc;

use anyhow::{Context, Result};
use arrow::array::{Float64Array, Int64Array, StringArray};
use arrow::datatypes::{DataType, Field, Schema};
use arrow::record_batch::RecordBatch;
use arrow::util::pretty::pretty_format_batches;
use parquet::arrow::ArrowWriter;
use serde::Serialize;

use bmi_gen::data::model::{GENDER, HEIGHT_CM, WEIGHT_KG};
use bmi_gen::data::writer::write_records;

/// One generated row, in the input layout the `bmi-gen` CLI reads.
#[derive(Debug, Serialize)]
struct SampleRow {
    #[serde(rename = "PatientId")]
    patient_id: i64,
    #[serde(rename = "Gender")]
    gender: &'static str,
    #[serde(rename = "HeightCm")]
    height_cm: f64,
    #[serde(rename = "WeightKg")]
    weight_kg: f64,
}

/// Minimal deterministic PRNG (xoshiro256**)
struct SimpleRng {
    state: [u64; 4],
}

impl SimpleRng {
    fn new(seed: u64) -> Self {
        let mut s = [0u64; 4];
        let mut x = seed;
        for slot in &mut s {
            x = x.wrapping_mul(6364136223846793005).wrapping_add(1);
            *slot = x;
        }
        SimpleRng { state: s }
    }

    fn next_u64(&mut self) -> u64 {
        let result = (self.state[1].wrapping_mul(5))
            .rotate_left(7)
            .wrapping_mul(9);
        let t = self.state[1] << 17;
        self.state[2] ^= self.state[0];
        self.state[3] ^= self.state[1];
        self.state[1] ^= self.state[2];
        self.state[0] ^= self.state[3];
        self.state[2] ^= t;
        self.state[3] = self.state[3].rotate_left(45);
        result
    }

    fn next_f64(&mut self) -> f64 {
        (self.next_u64() >> 11) as f64 / (1u64 << 53) as f64
    }

    /// Box-Muller transform for normal distribution
    fn gauss(&mut self, mean: f64, std_dev: f64) -> f64 {
        let u1 = self.next_f64().max(1e-15);
        let u2 = self.next_f64();
        let z = (-2.0 * u1.ln()).sqrt() * (2.0 * std::f64::consts::PI * u2).cos();
        mean + std_dev * z
    }
}

/// Round to one decimal, as a scale would report it.
fn round1(v: f64) -> f64 {
    (v * 10.0).round() / 10.0
}

fn generate(n: usize, rng: &mut SimpleRng) -> Vec<SampleRow> {
    let mut rows: Vec<SampleRow> = (0..n)
        .map(|i| {
            let (gender, mean_height) = if i % 2 == 0 { ("Male", 176.0) } else { ("Female", 163.0) };
            let height_cm = round1(rng.gauss(mean_height, 7.0));
            // Draw a BMI and derive the weight, so every category shows up.
            let bmi = rng.gauss(27.0, 7.0).max(14.0);
            let weight_kg = round1(bmi * (height_cm / 100.0).powi(2));
            SampleRow {
                patient_id: i as i64,
                gender,
                height_cm,
                weight_kg,
            }
        })
        .collect();

    // A few rows the validator has to drop.
    let invalid = [("Male", 175.0, -5.0), ("Female", 0.0, 60.0), ("Male", 180.0, 800.0)];
    for (gender, height_cm, weight_kg) in invalid {
        rows.push(SampleRow {
            patient_id: rows.len() as i64,
            gender,
            height_cm,
            weight_kg,
        });
    }
    rows
}

fn write_parquet(rows: &[SampleRow], path: &Path) -> Result<()> {
    let schema = Arc::new(Schema::new(vec![
        Field::new("PatientId", DataType::Int64, false),
        Field::new(GENDER, DataType::Utf8, false),
        Field::new(HEIGHT_CM, DataType::Float64, false),
        Field::new(WEIGHT_KG, DataType::Float64, false),
    ]));

    let batch = RecordBatch::try_new(
        schema.clone(),
        vec![
            Arc::new(Int64Array::from_iter_values(rows.iter().map(|r| r.patient_id))),
            Arc::new(StringArray::from_iter_values(rows.iter().map(|r| r.gender))),
            Arc::new(Float64Array::from_iter_values(rows.iter().map(|r| r.height_cm))),
            Arc::new(Float64Array::from_iter_values(rows.iter().map(|r| r.weight_kg))),
        ],
    )
    .context("Failed to create RecordBatch")?;

    let preview = pretty_format_batches(&[batch.slice(0, batch.num_rows().min(5))])
        .context("Failed to format preview")?;
    log::info!("First rows:\n{preview}");

    let file = std::fs::File::create(path).context("Failed to create output file")?;
    let mut writer = ArrowWriter::try_new(file, schema, None).context("Failed to create writer")?;
    writer.write(&batch).context("Failed to write batch")?;
    writer.close().context("Failed to close writer")?;
    Ok(())
}

fn main() -> Result<()> {
    env_logger::init();

    let output_path = std::env::args()
        .nth(1)
        .map(PathBuf::from)
        .unwrap_or_else(|| PathBuf::from("sample_data.json"));

    let mut rng = SimpleRng::new(42);
    let rows = generate(200, &mut rng);

    let ext = output_path
        .extension()
        .and_then(|e| e.to_str())
        .unwrap_or("")
        .to_ascii_lowercase();
    match ext.as_str() {
        "parquet" | "pq" => write_parquet(&rows, &output_path)?,
        _ => write_records(&rows, &output_path, 2)?,
    }

    println!(
        "Wrote {} measurements (3 of them invalid) to {}",
        rows.len(),
        output_path.display()
    );
    Ok(())
}
