//! Shared "load and render" logic used by both CLI and TUI front-ends.
//!
//! Every trigger (initial load, date filter, product change, reload) goes
//! through [`load_and_render`]:
//! fetch -> decode -> filter -> totals / table / chart
//!
//! The CLI and the TUI then only differ in presentation.

use crate::data::SalesSource;
use crate::domain::{RowError, SaleRecord};
use crate::error::LoadError;
use crate::filter::FilterSelection;
use crate::report::{DashboardViews, distinct_products};

/// Everything one load produced.
#[derive(Debug, Clone)]
pub struct DashboardRun {
    pub selection: FilterSelection,
    /// Records after filtering; the views are built from exactly these.
    pub records: Vec<SaleRecord>,
    pub views: DashboardViews,
    pub row_errors: Vec<RowError>,
    /// Product picker options. Only a full (unfiltered) load refreshes them.
    pub product_options: Option<Vec<String>>,
}

/// Fetch records for `selection` and derive all views from them.
pub fn load_and_render(source: &dyn SalesSource, selection: &FilterSelection) -> Result<DashboardRun, LoadError> {
    let decoded = source.fetch(selection.range.as_ref())?;

    let product_options = selection
        .is_unfiltered()
        .then(|| distinct_products(&decoded.records));

    let records = selection.apply(&decoded.records);
    let views = DashboardViews::build(&records);

    tracing::info!(
        source = %source.describe(),
        fetched = decoded.records.len(),
        shown = records.len(),
        rejected = decoded.row_errors.len(),
        "loaded sales"
    );

    Ok(DashboardRun {
        selection: selection.clone(),
        records,
        views,
        row_errors: decoded.row_errors,
        product_options,
    })
}
