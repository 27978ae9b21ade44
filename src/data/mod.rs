//! Where sale records come from.
//!
//! - `backend`: the HTTP sales backend
//! - `envelope`: wire format shared by the backend and envelope files
//! - `sample`: synthetic sales for demos and offline use

use std::fs;
use std::path::{Path, PathBuf};

use crate::domain::{DateRange, DecodedRecords};
use crate::error::LoadError;

pub mod backend;
pub mod envelope;
pub mod sample;

pub use backend::BackendClient;
pub use envelope::{Envelope, decode_envelope};
pub use sample::{GenerateConfig, generate_sales};

/// Anything that can hand out sale records, optionally restricted to a date range.
///
/// Implementations must apply `range` themselves (the backend does it server side).
pub trait SalesSource: Send + Sync {
    fn fetch(&self, range: Option<&DateRange>) -> Result<DecodedRecords, LoadError>;

    /// Short human-readable origin, for the status line and logs.
    fn describe(&self) -> String;
}

/// An envelope JSON file on disk, as written by `dash generate`.
///
/// The file is re-read on every fetch so edits show up on the next reload.
#[derive(Debug, Clone)]
pub struct EnvelopeFile {
    path: PathBuf,
}

impl EnvelopeFile {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl SalesSource for EnvelopeFile {
    fn fetch(&self, range: Option<&DateRange>) -> Result<DecodedRecords, LoadError> {
        let body = fs::read_to_string(&self.path).map_err(|e| {
            LoadError::Transport(format!("failed to read '{}': {e}", self.path.display()))
        })?;

        let mut decoded = decode_envelope(&body)?;
        if let Some(range) = range {
            decoded.records.retain(|r| range.contains(r.date));
        }
        Ok(decoded)
    }

    fn describe(&self) -> String {
        self.path.display().to_string()
    }
}
