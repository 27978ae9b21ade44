//! Terminal plotting helpers for text output.

pub mod ascii;

pub use ascii::*;
