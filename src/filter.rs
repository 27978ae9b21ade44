//! Filter selection: which records reach the views.
//!
//! Date bounds arrive as raw user input (TUI fields, CLI flags) and are
//! validated here, before anything is fetched.

use chrono::NaiveDate;

use crate::domain::{DateRange, ProductFilter, SaleRecord};
use crate::error::LoadError;

const DATE_INPUT_FORMAT: &str = "%Y-%m-%d";

/// Shown when a date filter is submitted with a bound missing.
pub const BOTH_DATES_REQUIRED: &str = "Select both dates to filter.";

/// The active filters. A default selection lets everything through.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FilterSelection {
    pub range: Option<DateRange>,
    pub product: ProductFilter,
}

impl FilterSelection {
    pub fn new(range: Option<DateRange>, product: ProductFilter) -> Self {
        Self { range, product }
    }

    /// True when neither filter narrows the data (a "full load").
    pub fn is_unfiltered(&self) -> bool {
        self.range.is_none() && self.product == ProductFilter::All
    }

    pub fn matches(&self, record: &SaleRecord) -> bool {
        let in_range = self.range.is_none_or(|r| r.contains(record.date));
        in_range && self.product.matches(&record.product)
    }

    /// Records passing both filters, in input order.
    pub fn apply(&self, records: &[SaleRecord]) -> Vec<SaleRecord> {
        records
            .iter()
            .filter(|r| self.matches(r))
            .cloned()
            .collect()
    }
}

/// Build a date range from two optional inputs.
///
/// - both blank: no range (`Ok(None)`), as for a report without `--from`/`--to`
/// - one blank: rejected, both bounds are required
/// - not `YYYY-MM-DD`, or start after end: rejected
pub fn parse_date_range(start: Option<&str>, end: Option<&str>) -> Result<Option<DateRange>, LoadError> {
    let start = start.map(str::trim).filter(|s| !s.is_empty());
    let end = end.map(str::trim).filter(|s| !s.is_empty());

    let (start, end) = match (start, end) {
        (None, None) => return Ok(None),
        (Some(start), Some(end)) => (start, end),
        _ => {
            return Err(LoadError::Validation(BOTH_DATES_REQUIRED.to_string()));
        }
    };

    let start = parse_date_input(start)?;
    let end = parse_date_input(end)?;

    DateRange::new(start, end).map(Some).ok_or_else(|| {
        LoadError::Validation(format!(
            "Start date {start} is after end date {end}."
        ))
    })
}

/// Parse a single `YYYY-MM-DD` date typed by the user.
pub fn parse_date_input(raw: &str) -> Result<NaiveDate, LoadError> {
    NaiveDate::parse_from_str(raw.trim(), DATE_INPUT_FORMAT)
        .map_err(|_| LoadError::Validation(format!("Invalid date '{raw}'. Expected YYYY-MM-DD.")))
}

#[cfg(test)]
mod tests {
    use std::str::FromStr;

    use rust_decimal::Decimal;

    use super::*;

    fn sale(date: &str, product: &str) -> SaleRecord {
        SaleRecord {
            id: None,
            date: NaiveDate::parse_from_str(date, "%Y-%m-%d").unwrap(),
            product: product.to_string(),
            quantity: 1,
            value: Decimal::from_str("1.00").unwrap(),
        }
    }

    #[test]
    fn missing_end_is_a_validation_error() {
        let err = parse_date_range(Some("2024-01-01"), None).unwrap_err();
        assert!(matches!(err, LoadError::Validation(_)));

        let err = parse_date_range(Some("2024-01-01"), Some("  ")).unwrap_err();
        assert!(matches!(err, LoadError::Validation(_)));
    }

    #[test]
    fn missing_start_is_a_validation_error() {
        let err = parse_date_range(None, Some("2024-01-31")).unwrap_err();
        assert_eq!(err, LoadError::Validation("Select both dates to filter.".to_string()));
    }

    #[test]
    fn blank_bounds_mean_no_range() {
        assert_eq!(parse_date_range(None, None).unwrap(), None);
        assert_eq!(parse_date_range(Some(""), Some(" ")).unwrap(), None);
    }

    #[test]
    fn inverted_and_malformed_ranges_are_rejected() {
        assert!(parse_date_range(Some("2024-02-01"), Some("2024-01-01")).is_err());
        assert!(parse_date_range(Some("01/02/2024"), Some("2024-03-01")).is_err());
    }

    #[test]
    fn selection_combines_range_and_product() {
        let range = parse_date_range(Some("2024-01-01"), Some("2024-01-31")).unwrap();
        let selection = FilterSelection::new(range, ProductFilter::parse("A"));

        let records = vec![
            sale("2024-01-01", "A"),
            sale("2024-01-15", "B"),
            sale("2024-02-01", "A"),
            sale("2024-01-31", "A"),
        ];
        let kept = selection.apply(&records);
        let dates: Vec<String> = kept.iter().map(|r| r.date.to_string()).collect();
        assert_eq!(dates, vec!["2024-01-01", "2024-01-31"]);
    }

    #[test]
    fn default_selection_is_unfiltered() {
        let selection = FilterSelection::default();
        assert!(selection.is_unfiltered());
        assert!(selection.matches(&sale("1999-12-31", "anything")));

        let narrowed = FilterSelection::new(None, ProductFilter::parse("A"));
        assert!(!narrowed.is_unfiltered());
    }
}
