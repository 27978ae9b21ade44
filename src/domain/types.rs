//! Shared domain types.
//!
//! Records come in from the backend (or an envelope file), views go out to the
//! renderers. Views are plain data: they are rebuilt on every load and never
//! patched in place.

use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::Deserialize;

/// Monetary amount. Decimal so that sums are exact at cent level.
pub type Money = Decimal;

/// Sentinel accepted for "no product filter".
pub const ALL_PRODUCTS: &str = "all";

/// One sale transaction.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SaleRecord {
    /// Backend row id, when the source provides one.
    pub id: Option<i64>,
    pub date: NaiveDate,
    pub product: String,
    pub quantity: u32,
    pub value: Money,
}

/// A record the decoder refused, with its position in the envelope.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RowError {
    pub index: usize,
    pub id: Option<i64>,
    pub message: String,
}

/// Decoder output: the usable records plus everything that was rejected.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DecodedRecords {
    pub records: Vec<SaleRecord>,
    pub row_errors: Vec<RowError>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TotalsView {
    pub count: usize,
    pub sum: Money,
}

/// A table line, display strings precomputed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TableRow {
    pub id: Option<i64>,
    pub date: NaiveDate,
    pub display_date: String,
    pub product: String,
    pub quantity: u32,
    pub value: Money,
    pub display_value: String,
}

/// Per-product sums. `labels[i]` pairs with `totals[i]`.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ChartSeries {
    pub labels: Vec<String>,
    pub totals: Vec<Money>,
}

impl ChartSeries {
    pub fn len(&self) -> usize {
        self.labels.len()
    }

    pub fn is_empty(&self) -> bool {
        self.labels.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, Money)> + '_ {
        self.labels
            .iter()
            .map(String::as_str)
            .zip(self.totals.iter().copied())
    }
}

/// Inclusive calendar range. Construction guarantees `start <= end`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DateRange {
    start: NaiveDate,
    end: NaiveDate,
}

impl DateRange {
    pub fn new(start: NaiveDate, end: NaiveDate) -> Option<Self> {
        (start <= end).then_some(Self { start, end })
    }

    pub fn start(&self) -> NaiveDate {
        self.start
    }

    pub fn end(&self) -> NaiveDate {
        self.end
    }

    pub fn contains(&self, date: NaiveDate) -> bool {
        self.start <= date && date <= self.end
    }
}

impl std::fmt::Display for DateRange {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} → {}", self.start, self.end)
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum ProductFilter {
    #[default]
    All,
    Only(String),
}

impl ProductFilter {
    /// Parse user input; the `all` sentinel (any case) and blank input mean no filter.
    pub fn parse(raw: &str) -> Self {
        let trimmed = raw.trim();
        if trimmed.is_empty() || trimmed.eq_ignore_ascii_case(ALL_PRODUCTS) {
            ProductFilter::All
        } else {
            ProductFilter::Only(trimmed.to_string())
        }
    }

    pub fn matches(&self, product: &str) -> bool {
        match self {
            ProductFilter::All => true,
            ProductFilter::Only(selected) => selected == product,
        }
    }

    pub fn label(&self) -> &str {
        match self {
            ProductFilter::All => ALL_PRODUCTS,
            ProductFilter::Only(name) => name,
        }
    }
}

/// Server-side summary returned by `/resumo`.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct BackendSummary {
    #[serde(rename = "total_vendas")]
    pub sales_count: u64,
    #[serde(rename = "produtos")]
    pub product_count: u64,
    #[serde(rename = "receita")]
    pub revenue: Money,
}

/// One row of `/total_por_produto`.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct ProductTotal {
    #[serde(rename = "produto")]
    pub product: String,
    pub total: Money,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn day(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn date_range_is_inclusive() {
        let range = DateRange::new(day(2024, 1, 1), day(2024, 1, 31)).unwrap();
        assert!(range.contains(day(2024, 1, 1)));
        assert!(range.contains(day(2024, 1, 31)));
        assert!(!range.contains(day(2023, 12, 31)));
        assert!(!range.contains(day(2024, 2, 1)));
    }

    #[test]
    fn date_range_rejects_inverted_bounds() {
        assert!(DateRange::new(day(2024, 2, 1), day(2024, 1, 1)).is_none());
        assert!(DateRange::new(day(2024, 2, 1), day(2024, 2, 1)).is_some());
    }

    #[test]
    fn product_filter_parses_sentinel() {
        assert_eq!(ProductFilter::parse("all"), ProductFilter::All);
        assert_eq!(ProductFilter::parse(" ALL "), ProductFilter::All);
        assert_eq!(ProductFilter::parse(""), ProductFilter::All);
        assert_eq!(
            ProductFilter::parse("SSD 1TB"),
            ProductFilter::Only("SSD 1TB".to_string())
        );
    }

    #[test]
    fn product_filter_uses_exact_match() {
        let filter = ProductFilter::parse("Webcam HD");
        assert!(filter.matches("Webcam HD"));
        assert!(!filter.matches("webcam hd"));
        assert!(ProductFilter::All.matches("anything"));
    }
}
