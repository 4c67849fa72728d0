use thiserror::Error;

/// Errors raised by the BMI core. I/O failures are reported through
/// `anyhow` by the loader, writer and pipeline instead.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum BmiError {
    /// One or more of `Gender`, `HeightCm`, `WeightKg` is absent from the input.
    #[error("Not all required columns are in input data, missing: {}", .missing.join(", "))]
    Schema { missing: Vec<String> },

    /// A category label that is not a string was passed to the counter.
    #[error("BMI category label must be a string, got {found}")]
    LabelType { found: &'static str },
}
