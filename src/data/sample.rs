//! Synthetic sales generation.
//!
//! Produces a deterministic (seeded) history over a fixed electronics catalog,
//! with year-end and mid-year peaks, so the dashboard can be exercised without
//! a running backend.

use chrono::{Datelike, Duration, NaiveDate};
use rand::distributions::{Distribution, WeightedIndex};
use rand::prelude::*;
use rand::rngs::StdRng;
use rust_decimal::Decimal;

use crate::domain::{Money, SaleRecord};
use crate::error::AppError;

/// Catalog: product name and base unit price in cents.
const CATALOG: [(&str, i64); 8] = [
    ("Notebook Pro", 450_000),
    ("Headset Gamer", 35_000),
    ("Mouse Wireless", 12_000),
    ("Teclado Mecânico", 28_000),
    ("Monitor 27\" 144Hz", 180_000),
    ("Cadeira Ergonômica", 95_000),
    ("Webcam HD", 20_000),
    ("SSD 1TB", 52_000),
];

/// Base quantities 1..=5 and how often each is drawn.
const QUANTITY_WEIGHTS: [u32; 5] = [50, 25, 12, 8, 5];

#[derive(Debug, Clone)]
pub struct GenerateConfig {
    pub count: usize,
    pub seed: u64,
    pub start: NaiveDate,
    pub end: NaiveDate,
}

/// Demand multiplier by calendar month.
pub fn seasonality(month: u32) -> f64 {
    match month {
        11 | 12 => 1.7,
        6 | 7 => 1.2,
        1 | 2 => 0.8,
        _ => 1.0,
    }
}

/// Generate `config.count` sales with ids `1..=count`, in generation order.
pub fn generate_sales(config: &GenerateConfig) -> Result<Vec<SaleRecord>, AppError> {
    if config.count == 0 {
        return Err(AppError::new(2, "Sale count must be > 0."));
    }
    if config.start > config.end {
        return Err(AppError::new(
            2,
            format!("Start date {} is after end date {}.", config.start, config.end),
        ));
    }

    let mut rng = StdRng::seed_from_u64(config.seed);
    let quantities = WeightedIndex::new(QUANTITY_WEIGHTS)
        .map_err(|e| AppError::new(4, format!("Quantity distribution error: {e}")))?;
    let span_days = (config.end - config.start).num_days();

    let mut out = Vec::with_capacity(config.count);
    for i in 0..config.count {
        let offset = rng.gen_range(0..=span_days);
        let date = config.start + Duration::days(offset);

        let (product, price_cents) = CATALOG[rng.gen_range(0..CATALOG.len())];
        let base_qty = quantities.sample(&mut rng) as f64 + 1.0;

        // Seasonal demand plus a little noise, never below one unit.
        let quantity = (base_qty * seasonality(date.month()) + rng.r#gen::<f64>())
            .round()
            .max(1.0) as u32;

        // Price varies ±10% around list price, in basis points.
        let variation = Decimal::new(rng.gen_range(9_000..=11_000), 4);
        let value: Money = (Decimal::from(quantity) * Decimal::new(price_cents, 2) * variation).round_dp(2);

        out.push(SaleRecord {
            id: Some(i as i64 + 1),
            date,
            product: product.to_string(),
            quantity,
            value,
        });
    }

    tracing::info!(
        count = out.len(),
        seed = config.seed,
        start = %config.start,
        end = %config.end,
        "generated synthetic sales"
    );

    Ok(out)
}
