//! Data layer: raw records, loading, filtering, windowing and projection.
//!
//! Architecture:
//! ```text
//!  .json / .csv
//!        │
//!        ▼
//!   ┌──────────┐
//!   │  loader   │  parse file → DataBlob
//!   └──────────┘
//!        │
//!        ▼
//!   ┌──────────┐
//!   │ DataBlob  │  basic_data + Vec<RawRecord>
//!   └──────────┘
//!        │
//!        ▼
//!   ┌──────────────────┐
//!   │ filter / window   │  per view, per axis state
//!   └──────────────────┘
//!        │
//!        ▼
//!   ┌──────────┐
//!   │ project   │  view axes + filters + windows → Projection
//!   └──────────┘
//! ```

pub mod filter;
pub mod loader;
pub mod model;
pub mod project;
pub mod window;
