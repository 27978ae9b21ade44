//! Domain types used throughout the dashboard.
//!
//! This module defines:
//!
//! - the input record (`SaleRecord`) and decoder output (`DecodedRecords`)
//! - the derived views (`TotalsView`, `TableRow`, `ChartSeries`)
//! - filter building blocks (`DateRange`, `ProductFilter`)

pub mod types;

pub use types::*;
