//! BMI core: validation, classification and counting.
//!
//! Architecture:
//! ```text
//!   RawDataset
//!        │
//!        ▼
//!   ┌──────────┐
//!   │  frame    │  schema check (Gender, HeightCm, WeightKg)
//!   └──────────┘
//!        │
//!        ▼
//!   ┌───────────┐
//!   │ validator  │  coerce types, drop implausible rows → Vec<Measurement>
//!   └───────────┘
//!        │
//!        ▼
//!   ┌────────────┐
//!   │ classifier  │  BMI + category + risk → Vec<ClassifiedRecord>
//!   └────────────┘
//!        │
//!        ▼
//!   ┌──────────┐
//!   │ counter   │  label → count
//!   └──────────┘
//! ```

pub mod category;
pub mod classifier;
pub mod counter;
pub mod frame;
pub mod validator;
