//! Display formatting and plain-text rendering of the views.
//!
//! We keep formatting code in one place so the TUI and `dash report` agree on
//! how a date or an amount looks.

use chrono::NaiveDate;

use crate::domain::{
    BackendSummary, DateRange, Money, ProductFilter, ProductTotal, RowError, TableRow, TotalsView,
};

pub const CURRENCY_PREFIX: &str = "R$";

/// Day/month/year, the pt-BR short date.
pub fn format_date(date: NaiveDate) -> String {
    date.format("%d/%m/%Y").to_string()
}

/// Currency prefix plus exactly two fractional digits (half-even at the third).
pub fn format_money(value: Money) -> String {
    format!("{CURRENCY_PREFIX} {:.2}", value.round_dp(2))
}

/// One-line description of the active filter.
pub fn describe_filter(range: Option<&DateRange>, product: &ProductFilter) -> String {
    let period = range
        .map(|r| r.to_string())
        .unwrap_or_else(|| "all dates".to_string());
    format!("period: {period} | product: {}", product.label())
}

pub fn format_totals(totals: &TotalsView) -> String {
    format!(
        "Sales: {} | Revenue: {}\n",
        totals.count,
        format_money(totals.sum)
    )
}

/// Fixed-width sales table.
pub fn format_table(rows: &[TableRow]) -> String {
    let mut out = String::new();
    out.push_str(
        format!(
            "{:<10} {:<28} {:>8} {:>16}",
            "date", "product", "qty", "value"
        )
        .trim_end(),
    );
    out.push('\n');
    out.push_str(format!("{:-<10} {:-<28} {:-<8} {:-<16}", "", "", "", "").trim_end());
    out.push('\n');

    for row in rows {
        out.push_str(
            format!(
                "{:<10} {:<28} {:>8} {:>16}",
                row.display_date,
                truncate(&row.product, 28),
                row.quantity,
                row.display_value,
            )
            .trim_end(),
        );
        out.push('\n');
    }

    if rows.is_empty() {
        out.push_str("(no sales)\n");
    }

    out
}

pub fn format_row_errors(errors: &[RowError]) -> String {
    let mut out = String::new();
    if errors.is_empty() {
        return out;
    }
    out.push_str(&format!("Rejected rows: {}\n", errors.len()));
    for err in errors {
        let id = err
            .id
            .map(|id| format!(" (id {id})"))
            .unwrap_or_default();
        out.push_str(&format!("- row {}{id}: {}\n", err.index, err.message));
    }
    out
}

pub fn format_backend_summary(summary: &BackendSummary, per_product: &[ProductTotal]) -> String {
    let mut out = String::new();
    out.push_str("=== dash - server summary ===\n");
    out.push_str(&format!("Sales: {}\n", summary.sales_count));
    out.push_str(&format!("Products: {}\n", summary.product_count));
    out.push_str(&format!("Revenue: {}\n", format_money(summary.revenue)));

    if !per_product.is_empty() {
        out.push_str("\nRevenue by product:\n");
        for entry in per_product {
            out.push_str(&format!(
                "{:<28} {:>16}\n",
                truncate(&entry.product, 28),
                format_money(entry.total)
            ));
        }
    }

    out
}

pub(crate) fn truncate(s: &str, max: usize) -> String {
    if s.chars().count() <= max {
        return s.to_string();
    }
    let mut out = String::new();
    for (i, ch) in s.chars().enumerate() {
        if i + 1 >= max {
            break;
        }
        out.push(ch);
    }
    out.push('.');
    out
}

#[cfg(test)]
mod tests {
    use std::str::FromStr;

    use super::*;

    #[test]
    fn money_has_two_decimals_and_prefix() {
        assert_eq!(format_money(Money::from_str("18").unwrap()), "R$ 18.00");
        assert_eq!(format_money(Money::from_str("4523.1").unwrap()), "R$ 4523.10");
        assert_eq!(format_money(Money::from_str("-5.5").unwrap()), "R$ -5.50");
        assert_eq!(format_money(Money::from_str("0.125").unwrap()), "R$ 0.12");
    }

    #[test]
    fn date_is_day_month_year() {
        let date = NaiveDate::from_ymd_opt(2024, 1, 5).unwrap();
        assert_eq!(format_date(date), "05/01/2024");
    }

    #[test]
    fn table_lists_every_row() {
        let rows = vec![TableRow {
            id: Some(7),
            date: NaiveDate::from_ymd_opt(2024, 1, 5).unwrap(),
            display_date: "05/01/2024".to_string(),
            product: "Monitor 27\" 144Hz".to_string(),
            quantity: 2,
            value: Money::from_str("3600").unwrap(),
            display_value: "R$ 3600.00".to_string(),
        }];
        let text = format_table(&rows);
        let lines: Vec<&str> = text.lines().collect();
        assert_eq!(lines.len(), 3);
        assert!(lines[2].starts_with("05/01/2024 Monitor 27\" 144Hz"));
        assert!(lines[2].ends_with("R$ 3600.00"));
    }

    #[test]
    fn empty_table_says_so() {
        assert!(format_table(&[]).ends_with("(no sales)\n"));
    }

    #[test]
    fn truncate_marks_cut_names() {
        assert_eq!(truncate("Cadeira Ergonômica", 8), "Cadeira.");
        assert_eq!(truncate("SSD 1TB", 8), "SSD 1TB");
    }

    #[test]
    fn filter_description() {
        let range = DateRange::new(
            NaiveDate::from_ymd_opt(2024, 1, 1).unwrap(),
            NaiveDate::from_ymd_opt(2024, 1, 31).unwrap(),
        );
        assert_eq!(
            describe_filter(range.as_ref(), &ProductFilter::parse("SSD 1TB")),
            "period: 2024-01-01 → 2024-01-31 | product: SSD 1TB"
        );
        assert_eq!(
            describe_filter(None, &ProductFilter::All),
            "period: all dates | product: all"
        );
    }
}
