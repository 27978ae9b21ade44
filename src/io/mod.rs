//! Input/output helpers.
//!
//! - table CSV export and envelope JSON export (`export`)

pub mod export;

pub use export::*;
