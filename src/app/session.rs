//! Interactive dashboard state, independent of the terminal.
//!
//! The TUI turns key presses into calls on [`Session`], runs the returned
//! [`PendingLoad`]s on a worker and feeds the outcome back through
//! [`Session::complete`]. Keeping this free of Ratatui makes the filter rules,
//! the stale-response check and the banner timing unit-testable.

use std::time::{Duration, Instant};

use crate::app::pipeline::DashboardRun;
use crate::domain::ProductFilter;
use crate::error::LoadError;
use crate::filter::{BOTH_DATES_REQUIRED, FilterSelection, parse_date_range};

/// A load the session wants executed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PendingLoad {
    pub seq: u64,
    pub selection: FilterSelection,
}

/// Hands out increasing request numbers; only the latest one may render.
#[derive(Debug, Default)]
pub struct RequestTracker {
    latest: u64,
}

impl RequestTracker {
    pub fn issue(&mut self) -> u64 {
        self.latest += 1;
        self.latest
    }

    pub fn is_current(&self, seq: u64) -> bool {
        seq == self.latest
    }
}

/// A transient error message.
#[derive(Debug, Clone)]
pub struct Banner {
    message: String,
    shown_at: Instant,
    ttl: Duration,
}

impl Banner {
    pub fn new(message: impl Into<String>, shown_at: Instant, ttl: Duration) -> Self {
        Self {
            message: message.into(),
            shown_at,
            ttl,
        }
    }

    pub fn message(&self) -> &str {
        &self.message
    }

    pub fn is_expired(&self, now: Instant) -> bool {
        now.saturating_duration_since(self.shown_at) >= self.ttl
    }
}

/// What happened to a finished load.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Completion {
    Applied,
    /// A newer request was issued meanwhile; the response was dropped.
    Stale,
    Failed,
}

pub struct Session {
    selection: FilterSelection,
    product_options: Vec<String>,
    tracker: RequestTracker,
    loading: bool,
    banner: Option<Banner>,
    banner_ttl: Duration,
    compose_filters: bool,
    run: Option<DashboardRun>,
    status: String,
}

impl Session {
    /// `compose_filters` keeps the date range when the product changes (and
    /// vice versa). Off by default: each filter replaces the other.
    pub fn new(banner_ttl: Duration, compose_filters: bool) -> Self {
        Self {
            selection: FilterSelection::default(),
            product_options: Vec::new(),
            tracker: RequestTracker::default(),
            loading: false,
            banner: None,
            banner_ttl,
            compose_filters,
            run: None,
            status: String::new(),
        }
    }

    pub fn selection(&self) -> &FilterSelection {
        &self.selection
    }

    pub fn run(&self) -> Option<&DashboardRun> {
        self.run.as_ref()
    }

    pub fn product_options(&self) -> &[String] {
        &self.product_options
    }

    pub fn banner(&self) -> Option<&Banner> {
        self.banner.as_ref()
    }

    pub fn is_loading(&self) -> bool {
        self.loading
    }

    pub fn status(&self) -> &str {
        &self.status
    }

    pub fn set_status(&mut self, status: impl Into<String>) {
        self.status = status.into();
    }

    /// Unfiltered load; the only kind that refreshes the product options.
    pub fn full_load(&mut self) -> PendingLoad {
        self.issue(FilterSelection::default())
    }

    /// Date filter submit. Both bounds are required; invalid input shows the
    /// banner and sends nothing.
    pub fn submit_date_range(&mut self, start: &str, end: &str, now: Instant) -> Option<PendingLoad> {
        let range = match parse_date_range(Some(start), Some(end)) {
            Ok(Some(range)) => range,
            Ok(None) => {
                self.show_error(&LoadError::Validation(BOTH_DATES_REQUIRED.to_string()), now);
                return None;
            }
            Err(err) => {
                self.show_error(&err, now);
                return None;
            }
        };

        let product = if self.compose_filters {
            self.selection.product.clone()
        } else {
            ProductFilter::All
        };
        Some(self.issue(FilterSelection::new(Some(range), product)))
    }

    pub fn select_product(&mut self, product: ProductFilter) -> PendingLoad {
        let range = if self.compose_filters {
            self.selection.range
        } else {
            None
        };
        self.issue(FilterSelection::new(range, product))
    }

    /// Step through `all` followed by the known products, wrapping around.
    pub fn cycle_product(&mut self, forward: bool) -> PendingLoad {
        let choices = self.product_options.len() + 1;
        let current = match &self.selection.product {
            ProductFilter::All => 0,
            ProductFilter::Only(name) => self
                .product_options
                .iter()
                .position(|p| p == name)
                .map_or(0, |idx| idx + 1),
        };
        let next = if forward {
            (current + 1) % choices
        } else {
            (current + choices - 1) % choices
        };

        let product = match next {
            0 => ProductFilter::All,
            idx => ProductFilter::Only(self.product_options[idx - 1].clone()),
        };
        self.select_product(product)
    }

    /// Feed back the outcome of a load issued earlier.
    pub fn complete(&mut self, seq: u64, result: Result<DashboardRun, LoadError>, now: Instant) -> Completion {
        if !self.tracker.is_current(seq) {
            tracing::debug!(seq, "discarding stale response");
            return Completion::Stale;
        }
        self.loading = false;

        match result {
            Ok(run) => {
                if let Some(options) = &run.product_options {
                    self.product_options = options.clone();
                }
                self.status = if run.row_errors.is_empty() {
                    format!("{} sales loaded", run.records.len())
                } else {
                    format!(
                        "{} sales loaded, {} malformed rows skipped",
                        run.records.len(),
                        run.row_errors.len()
                    )
                };
                self.run = Some(run);
                Completion::Applied
            }
            Err(err) => {
                self.show_error(&err, now);
                Completion::Failed
            }
        }
    }

    /// Expire the banner. Returns true when something changed on screen.
    pub fn tick(&mut self, now: Instant) -> bool {
        if self.banner.as_ref().is_some_and(|b| b.is_expired(now)) {
            self.banner = None;
            return true;
        }
        false
    }

    pub fn show_error(&mut self, err: &LoadError, now: Instant) {
        tracing::warn!(error = %err, "load failed");
        self.banner = Some(Banner::new(err.to_string(), now, self.banner_ttl));
    }

    fn issue(&mut self, selection: FilterSelection) -> PendingLoad {
        self.selection = selection.clone();
        self.loading = true;
        self.status = "Loading sales...".to_string();
        PendingLoad {
            seq: self.tracker.issue(),
            selection,
        }
    }
}
