//! Body measurement validation and BMI classification.
//!
//! [`data`] loads and writes tables, [`bmi`] validates, classifies and
//! counts, and [`pipeline`] ties one run together for the `bmi-gen` CLI.

pub mod bmi;
pub mod data;
pub mod error;
pub mod pipeline;

pub use bmi::category::{BmiCategory, HealthRisk};
pub use bmi::frame::{BmiFrame, Classification};
pub use error::BmiError;
