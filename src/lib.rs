//! `sales-dash` library crate.
//!
//! The binary (`dash`) is a thin wrapper around this library so that:
//!
//! - the totals/table/chart derivations are testable without a terminal
//! - the record source (HTTP backend or envelope file) is swappable behind a trait

pub mod app;
pub mod cli;
pub mod config;
pub mod data;
pub mod domain;
pub mod error;
pub mod filter;
pub mod io;
pub mod plot;
pub mod report;
pub mod telemetry;
pub mod tui;
