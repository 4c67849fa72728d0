//! Data layer: cell types, loading and writing.
//!
//! Architecture:
//! ```text
//!  .json / .csv / .parquet / inline JSON
//!        │
//!        ▼
//!   ┌──────────┐
//!   │  loader   │  parse input → RawDataset
//!   └──────────┘
//!        │
//!        ▼
//!   ┌────────────┐
//!   │ RawDataset  │  Vec<RawRecord>, column index
//!   └────────────┘
//!        ⋮  (bmi core)
//!        ▼
//!   ┌──────────┐
//!   │  writer   │  classified records → .json / .csv
//!   └──────────┘
//! ```

pub mod loader;
pub mod model;
pub mod writer;
