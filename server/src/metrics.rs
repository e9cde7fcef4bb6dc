//! Metrics collection for rate service monitoring.

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use fxboard_fx::RateReport;

/// Rate service metrics.
pub struct Metrics {
    /// Total rate queries received.
    pub requests_total: AtomicU64,
    /// Rate queries that failed for lack of a fallback rate.
    pub requests_failed: AtomicU64,
    /// Quotes scraped from bank pages.
    pub quotes_real: AtomicU64,
    /// Quotes estimated from the fallback rate.
    pub quotes_estimated: AtomicU64,
    /// Banks left out of a report because their quote could not be built.
    pub banks_skipped: AtomicU64,
}

impl Metrics {
    /// Create new metrics instance.
    pub fn new() -> Self {
        Self {
            requests_total: AtomicU64::new(0),
            requests_failed: AtomicU64::new(0),
            quotes_real: AtomicU64::new(0),
            quotes_estimated: AtomicU64::new(0),
            banks_skipped: AtomicU64::new(0),
        }
    }

    /// Increment rate queries received.
    pub fn request_received(&self) {
        self.requests_total.fetch_add(1, Ordering::Relaxed);
    }

    /// Record a failed rate query.
    pub fn request_failed(&self) {
        self.requests_failed.fetch_add(1, Ordering::Relaxed);
    }

    /// Record the quotes of a served report built from `bank_count` banks.
    pub fn record_report(&self, report: &RateReport, bank_count: usize) {
        self.quotes_real
            .fetch_add(report.real_count() as u64, Ordering::Relaxed);
        self.quotes_estimated
            .fetch_add(report.estimated_count() as u64, Ordering::Relaxed);

        let skipped = bank_count.saturating_sub(report.quotes.len());
        self.banks_skipped
            .fetch_add(skipped as u64, Ordering::Relaxed);
    }

    /// Get current metrics snapshot.
    pub fn snapshot(&self) -> MetricsSnapshot {
        MetricsSnapshot {
            requests_total: self.requests_total.load(Ordering::Relaxed),
            requests_failed: self.requests_failed.load(Ordering::Relaxed),
            quotes_real: self.quotes_real.load(Ordering::Relaxed),
            quotes_estimated: self.quotes_estimated.load(Ordering::Relaxed),
            banks_skipped: self.banks_skipped.load(Ordering::Relaxed),
        }
    }

    /// Export metrics in Prometheus format.
    pub fn to_prometheus(&self) -> String {
        let snapshot = self.snapshot();
        format!(
            r#"# HELP fxboard_requests_total Total number of rate queries
# TYPE fxboard_requests_total counter
fxboard_requests_total {}

# HELP fxboard_requests_failed Rate queries failed for lack of a fallback rate
# TYPE fxboard_requests_failed counter
fxboard_requests_failed {}

# HELP fxboard_quotes_real Quotes scraped from bank pages
# TYPE fxboard_quotes_real counter
fxboard_quotes_real {}

# HELP fxboard_quotes_estimated Quotes estimated from the fallback rate
# TYPE fxboard_quotes_estimated counter
fxboard_quotes_estimated {}

# HELP fxboard_banks_skipped Banks omitted from a report
# TYPE fxboard_banks_skipped counter
fxboard_banks_skipped {}
"#,
            snapshot.requests_total,
            snapshot.requests_failed,
            snapshot.quotes_real,
            snapshot.quotes_estimated,
            snapshot.banks_skipped,
        )
    }
}

impl Default for Metrics {
    fn default() -> Self {
        Self::new()
    }
}

/// Snapshot of metrics at a point in time.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MetricsSnapshot {
    pub requests_total: u64,
    pub requests_failed: u64,
    pub quotes_real: u64,
    pub quotes_estimated: u64,
    pub banks_skipped: u64,
}

/// Shared metrics instance.
pub type SharedMetrics = Arc<Metrics>;
