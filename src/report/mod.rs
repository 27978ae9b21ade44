//! Reporting utilities: totals, table rows and the per-product chart series.
//!
//! Everything here is a pure function of the record slice it is given. The
//! records are only read; each call allocates fresh views.

use std::collections::HashMap;

use crate::domain::{ChartSeries, Money, SaleRecord, TableRow, TotalsView};

pub mod format;

pub use format::*;

/// The three views a render pass needs, built from the same record set.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DashboardViews {
    pub totals: TotalsView,
    pub table: Vec<TableRow>,
    pub chart: ChartSeries,
}

impl DashboardViews {
    pub fn build(records: &[SaleRecord]) -> Self {
        Self {
            totals: compute_totals(records),
            table: project_table(records),
            chart: aggregate_chart(records),
        }
    }
}

/// Record count and value sum, accumulated in input order.
pub fn compute_totals(records: &[SaleRecord]) -> TotalsView {
    let sum = records
        .iter()
        .fold(Money::ZERO, |acc, record| acc + record.value);
    TotalsView {
        count: records.len(),
        sum,
    }
}

/// One row per record, most recent date first.
///
/// `sort_by` is stable, so records sharing a date keep their input order.
pub fn project_table(records: &[SaleRecord]) -> Vec<TableRow> {
    let mut ordered: Vec<&SaleRecord> = records.iter().collect();
    ordered.sort_by(|a, b| b.date.cmp(&a.date));

    ordered
        .into_iter()
        .map(|record| TableRow {
            id: record.id,
            date: record.date,
            display_date: format_date(record.date),
            product: record.product.clone(),
            quantity: record.quantity,
            value: record.value,
            display_value: format_money(record.value),
        })
        .collect()
}

/// Sum of value per product, labels in first-seen order.
pub fn aggregate_chart(records: &[SaleRecord]) -> ChartSeries {
    let mut slots: HashMap<&str, usize> = HashMap::new();
    let mut series = ChartSeries::default();

    for record in records {
        match slots.get(record.product.as_str()) {
            Some(&idx) => series.totals[idx] += record.value,
            None => {
                slots.insert(record.product.as_str(), series.labels.len());
                series.labels.push(record.product.clone());
                series.totals.push(record.value);
            }
        }
    }

    series
}

/// Distinct products in first-seen order (the product picker's options).
pub fn distinct_products(records: &[SaleRecord]) -> Vec<String> {
    aggregate_chart(records).labels
}
