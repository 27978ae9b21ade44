use std::str::FromStr;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::{Duration, Instant};

use chrono::NaiveDate;
use pretty_assertions::assert_eq;
use rust_decimal::Decimal;

use sales_dash::app::pipeline::load_and_render;
use sales_dash::app::session::{Completion, Session};
use sales_dash::data::{EnvelopeFile, GenerateConfig, SalesSource, generate_sales};
use sales_dash::domain::{DateRange, DecodedRecords, ProductFilter, SaleRecord};
use sales_dash::error::LoadError;
use sales_dash::filter::{FilterSelection, parse_date_range};

/// In-memory source that counts how often it is asked for data.
struct Counting {
    records: Vec<SaleRecord>,
    fetches: AtomicUsize,
}

impl Counting {
    fn new(records: Vec<SaleRecord>) -> Self {
        Self {
            records,
            fetches: AtomicUsize::new(0),
        }
    }

    fn fetches(&self) -> usize {
        self.fetches.load(Ordering::SeqCst)
    }
}

impl SalesSource for Counting {
    fn fetch(&self, range: Option<&DateRange>) -> Result<DecodedRecords, LoadError> {
        self.fetches.fetch_add(1, Ordering::SeqCst);
        let records = self
            .records
            .iter()
            .filter(|r| range.is_none_or(|rg| rg.contains(r.date)))
            .cloned()
            .collect();
        Ok(DecodedRecords {
            records,
            row_errors: Vec::new(),
        })
    }

    fn describe(&self) -> String {
        "memory".to_string()
    }
}

fn date(raw: &str) -> NaiveDate {
    NaiveDate::parse_from_str(raw, "%Y-%m-%d").unwrap()
}

fn money(raw: &str) -> Decimal {
    Decimal::from_str(raw).unwrap()
}

fn sale(day: &str, product: &str, value: &str) -> SaleRecord {
    SaleRecord {
        id: None,
        date: date(day),
        product: product.to_string(),
        quantity: 1,
        value: money(value),
    }
}

fn worked_example() -> Vec<SaleRecord> {
    vec![
        sale("2024-01-05", "A", "10.00"),
        sale("2024-01-01", "B", "5.00"),
        sale("2024-01-05", "A", "3.00"),
    ]
}

#[test]
fn worked_example_end_to_end() {
    let source = Counting::new(worked_example());
    let run = load_and_render(&source, &FilterSelection::default()).unwrap();

    assert_eq!(run.views.totals.count, 3);
    assert_eq!(run.views.totals.sum, money("18.00"));

    let table: Vec<(&str, String)> = run
        .views
        .table
        .iter()
        .map(|r| (r.product.as_str(), r.display_value.clone()))
        .collect();
    assert_eq!(
        table,
        vec![
            ("A", "R$ 10.00".to_string()),
            ("A", "R$ 3.00".to_string()),
            ("B", "R$ 5.00".to_string()),
        ]
    );

    assert_eq!(run.views.chart.labels, vec!["A", "B"]);
    assert_eq!(run.views.chart.totals, vec![money("13.00"), money("5.00")]);
    assert_eq!(run.product_options, Some(vec!["A".to_string(), "B".to_string()]));
    assert_eq!(source.fetches(), 1);
}

/// Submit a date range the way the TUI does: run whatever load comes back.
fn submit(session: &mut Session, source: &Counting, start: &str, end: &str) -> Option<Completion> {
    let now = Instant::now();
    let pending = session.submit_date_range(start, end, now)?;
    let result = load_and_render(source, &pending.selection);
    Some(session.complete(pending.seq, result, now))
}

#[test]
fn missing_bound_is_rejected_before_any_fetch() {
    let source = Counting::new(worked_example());
    let mut session = Session::new(Duration::from_secs(5), false);

    let err = parse_date_range(Some("2024-01-01"), None).unwrap_err();
    assert!(matches!(err, LoadError::Validation(_)));

    assert_eq!(submit(&mut session, &source, "", "2024-01-31"), None);
    assert_eq!(submit(&mut session, &source, "2024-01-01", ""), None);
    assert_eq!(submit(&mut session, &source, "", ""), None);
    assert_eq!(session.banner().unwrap().message(), "Select both dates to filter.");
    assert_eq!(source.fetches(), 0);

    // A complete range goes through the same path and does reach the source.
    assert_eq!(
        submit(&mut session, &source, "2024-01-01", "2024-01-31"),
        Some(Completion::Applied)
    );
    assert_eq!(source.fetches(), 1);
}

#[test]
fn date_and_product_filters_narrow_every_view() {
    let source = Counting::new(worked_example());
    let range = parse_date_range(Some("2024-01-02"), Some("2024-01-31")).unwrap();
    let selection = FilterSelection::new(range, ProductFilter::parse("A"));

    let run = load_and_render(&source, &selection).unwrap();
    assert_eq!(run.views.totals.count, 2);
    assert_eq!(run.views.totals.sum, money("13.00"));
    assert_eq!(run.views.chart.labels, vec!["A"]);
    assert_eq!(run.product_options, None);
}

#[test]
fn session_applies_latest_load_only() {
    let source = Counting::new(worked_example());
    let mut session = Session::new(Duration::from_secs(5), false);
    let now = Instant::now();

    let first = session.full_load();
    let second = session.select_product(ProductFilter::parse("B"));

    let late = load_and_render(&source, &first.selection);
    let fresh = load_and_render(&source, &second.selection);

    assert_eq!(session.complete(second.seq, fresh, now), Completion::Applied);
    assert_eq!(session.complete(first.seq, late, now), Completion::Stale);
    assert_eq!(session.run().unwrap().views.totals.sum, money("5.00"));
}

#[test]
fn generated_envelope_file_loads_through_pipeline() {
    let config = GenerateConfig {
        count: 200,
        seed: 7,
        start: date("2023-01-01"),
        end: date("2023-12-31"),
    };
    let sales = generate_sales(&config).unwrap();

    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("sales.json");
    sales_dash::io::write_envelope_json(&path, &sales).unwrap();

    let source = EnvelopeFile::new(&path);
    let run = load_and_render(&source, &FilterSelection::default()).unwrap();
    assert_eq!(run.views.totals.count, 200);
    assert!(run.row_errors.is_empty());

    let expected: Decimal = sales.iter().map(|s| s.value).sum();
    assert_eq!(run.views.totals.sum, expected);

    let range = parse_date_range(Some("2023-11-01"), Some("2023-12-31")).unwrap();
    let december = load_and_render(&source, &FilterSelection::new(range, ProductFilter::All)).unwrap();
    assert!(december.records.iter().all(|r| r.date >= date("2023-11-01")));
    assert!(december.views.totals.count < 200);
}
