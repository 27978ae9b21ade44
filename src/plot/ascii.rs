//! ASCII/Unicode bar chart for terminal output.
//!
//! This is intentionally "dumb" (one row per product, fixed width), optimized for:
//! - quick visual comparison in a terminal or a piped report
//! - deterministic output (helpful for golden tests)

use rust_decimal::prelude::ToPrimitive;

use crate::domain::ChartSeries;
use crate::report::format::{CURRENCY_PREFIX, truncate};

const MAX_LABEL_WIDTH: usize = 24;
const MIN_BAR_WIDTH: usize = 10;
const BAR: char = '█';

/// Render one horizontal bar per product, in series order.
///
/// Bars scale against the largest positive total; zero and negative totals get
/// an empty bar but still show their value.
pub fn render_bar_chart(series: &ChartSeries, width: usize) -> String {
    let mut out = String::new();
    out.push_str(&format!("Revenue by product ({CURRENCY_PREFIX})\n"));

    if series.is_empty() {
        out.push_str("(no data)\n");
        return out;
    }

    let label_width = series
        .labels
        .iter()
        .map(|l| l.chars().count())
        .max()
        .unwrap_or(0)
        .min(MAX_LABEL_WIDTH);
    let values: Vec<String> = series.totals.iter().map(|t| format!("{:.2}", t.round_dp(2))).collect();
    let value_width = values.iter().map(String::len).max().unwrap_or(0);

    // label + " |" + bar + " " + value
    let bar_width = width
        .saturating_sub(label_width + 2 + 1 + value_width)
        .max(MIN_BAR_WIDTH);

    let max_total = series
        .totals
        .iter()
        .filter_map(|t| t.to_f64())
        .fold(0.0_f64, f64::max);

    for ((label, total), value) in series.iter().zip(&values) {
        let len = bar_len(total.to_f64().unwrap_or(0.0), max_total, bar_width);
        let bar: String = std::iter::repeat_n(BAR, len).collect();
        let line = format!(
            "{:<label_width$} |{:<bar_width$} {:>value_width$}",
            truncate(label, label_width),
            bar,
            value,
        );
        out.push_str(line.trim_end());
        out.push('\n');
    }

    out
}

fn bar_len(value: f64, max: f64, width: usize) -> usize {
    if !(value.is_finite() && max.is_finite()) || value <= 0.0 || max <= 0.0 {
        return 0;
    }
    ((value / max) * width as f64).round().clamp(1.0, width as f64) as usize
}
