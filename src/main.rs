use std::path::PathBuf;

use anyhow::{bail, Result};
use clap::{ArgGroup, Parser};

use bmi_gen::data::loader::InputSource;
use bmi_gen::pipeline::{run, RunOptions};

/// Validate body measurements, classify them by BMI and count patients per
/// category.
#[derive(Debug, Parser)]
#[command(name = "bmi-gen", version, about)]
#[command(group(ArgGroup::new("source").required(true).args(["input", "json"])))]
struct Cli {
    /// BMI categories to count, e.g. "Overweight" "Normal weight".
    categories: Vec<String>,

    /// Input file (.json, .csv or .parquet).
    #[arg(short, long, value_name = "PATH")]
    input: Option<PathBuf>,

    /// Input given directly as a JSON document.
    #[arg(long, value_name = "TEXT")]
    json: Option<String>,

    /// Write the classified records here (.json, or .csv).
    #[arg(short, long, value_name = "PATH")]
    output: Option<PathBuf>,

    /// Indentation of the JSON output; 0 writes compact JSON.
    #[arg(long, default_value_t = 0)]
    indent: usize,

    /// Classify rows as they are, without dropping implausible ones.
    #[arg(long)]
    no_validate: bool,

    /// JSON file with an array of further category labels to count.
    #[arg(long, value_name = "PATH")]
    labels_file: Option<PathBuf>,

    /// Also print the count of every category.
    #[arg(long)]
    summary: bool,

    /// Log progress (info level) unless RUST_LOG says otherwise.
    #[arg(short, long)]
    verbose: bool,
}

impl Cli {
    fn into_options(self) -> Result<RunOptions> {
        let input = match (self.input, self.json) {
            (Some(path), _) => InputSource::Path(path),
            (None, Some(text)) => InputSource::Inline(text),
            (None, None) => bail!("one of --input or --json is required"),
        };
        Ok(RunOptions {
            input,
            output: self.output,
            indent: self.indent,
            validate: !self.no_validate,
            categories: self.categories,
            labels_file: self.labels_file,
        })
    }
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    let default_filter = if cli.verbose { "info" } else { "warn" };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(default_filter))
        .init();

    let summary = cli.summary;
    let report = run(&cli.into_options()?)?;

    for (label, count) in &report.counts {
        println!("There are {count} patients in the {label} category");
    }
    if summary {
        println!("{} patients classified", report.records);
        for (cat, count) in &report.summary {
            println!("  {:<20} {:<18} {count}", cat.label(), cat.health_risk().label());
        }
    }
    Ok(())
}
