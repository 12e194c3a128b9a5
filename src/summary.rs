//! Live aggregation of the outcome stream into per-target and overall
//! tallies, latency percentiles, and the rendered text report.
use std::time::Duration;

use hdrhistogram::Histogram;
use serde::Serialize;
use tokio::sync::mpsc;
use tracing::warn;

use crate::outcome::{OutcomeKind, RequestOutcome};

/// Two decimal places of percent, stored as an integer (x100).
const PERCENT_DIVISOR: u64 = 100;
/// Significant figures kept by the latency histogram.
const HISTOGRAM_SIGFIGS: u8 = 3;

/// Counters accumulated from a slice of the outcome stream.
#[derive(Debug, Clone, Serialize)]
pub struct OutcomeTally {
    pub requests: u64,
    /// 2xx/3xx responses.
    pub successes: u64,
    /// Responses outside the success range.
    pub non_success_statuses: u64,
    pub build_failures: u64,
    pub transport_failures: u64,
    pub timeouts: u64,
    pub response_bytes: u64,
    pub min_latency_ms: u64,
    pub avg_latency_ms: u64,
    pub max_latency_ms: u64,
    #[serde(skip)]
    latency_sum_ms: u128,
    #[serde(skip)]
    measured: u64,
}

impl OutcomeTally {
    const fn new() -> Self {
        Self {
            requests: 0,
            successes: 0,
            non_success_statuses: 0,
            build_failures: 0,
            transport_failures: 0,
            timeouts: 0,
            response_bytes: 0,
            min_latency_ms: u64::MAX,
            avg_latency_ms: 0,
            max_latency_ms: 0,
            latency_sum_ms: 0,
            measured: 0,
        }
    }

    fn record(&mut self, outcome: &RequestOutcome) {
        self.requests = self.requests.saturating_add(1);
        match &outcome.kind {
            OutcomeKind::Response { .. } => {
                if outcome.is_success() {
                    self.successes = self.successes.saturating_add(1);
                } else {
                    self.non_success_statuses = self.non_success_statuses.saturating_add(1);
                }
            }
            OutcomeKind::BuildFailed { .. } => {
                self.build_failures = self.build_failures.saturating_add(1);
            }
            OutcomeKind::TransportFailed { .. } => {
                self.transport_failures = self.transport_failures.saturating_add(1);
            }
            OutcomeKind::TimedOut => {
                self.timeouts = self.timeouts.saturating_add(1);
            }
        }
        self.response_bytes = self.response_bytes.saturating_add(outcome.response_bytes);

        // Build failures never left the process; only executed attempts
        // contribute to latency.
        if !matches!(outcome.kind, OutcomeKind::BuildFailed { .. }) {
            let latency_ms = u64::try_from(outcome.latency.as_millis()).unwrap_or(u64::MAX);
            self.min_latency_ms = self.min_latency_ms.min(latency_ms);
            self.max_latency_ms = self.max_latency_ms.max(latency_ms);
            self.latency_sum_ms = self.latency_sum_ms.saturating_add(u128::from(latency_ms));
            self.measured = self.measured.saturating_add(1);
        }
    }

    fn finish(&mut self) {
        if self.measured == 0 {
            self.min_latency_ms = 0;
            self.avg_latency_ms = 0;
        } else {
            let avg = self
                .latency_sum_ms
                .checked_div(u128::from(self.measured))
                .unwrap_or(0);
            self.avg_latency_ms = u64::try_from(avg).unwrap_or(u64::MAX);
        }
    }

    fn success_rate_x100(&self) -> u64 {
        if self.requests == 0 {
            return 0;
        }
        let scaled = u128::from(self.successes)
            .saturating_mul(10_000)
            .checked_div(u128::from(self.requests))
            .unwrap_or(0);
        u64::try_from(scaled).unwrap_or(u64::MAX)
    }
}

/// One target's slice of the report.
#[derive(Debug, Clone, Serialize)]
pub struct TargetReport {
    pub url: String,
    pub tally: OutcomeTally,
}

/// The finished run, ready for rendering and export.
#[derive(Debug, Serialize)]
pub struct RunReport {
    pub duration_ms: u64,
    pub totals: OutcomeTally,
    pub targets: Vec<TargetReport>,
    pub p50_latency_ms: u64,
    pub p90_latency_ms: u64,
    pub p99_latency_ms: u64,
}

impl RunReport {
    /// Renders the text report, one printable line per entry.
    #[must_use]
    pub fn lines(&self) -> Vec<String> {
        let rate = self.totals.success_rate_x100();
        let mut lines = Vec::new();
        lines.push(format!(
            "Duration: {}s",
            Duration::from_millis(self.duration_ms).as_secs()
        ));
        lines.push(format!("Total Requests: {}", self.totals.requests));
        lines.push(format!(
            "Successful: {} ({}.{:02}%)",
            self.totals.successes,
            rate / PERCENT_DIVISOR,
            rate % PERCENT_DIVISOR
        ));
        lines.push(format!(
            "Non-Success Status: {}",
            self.totals.non_success_statuses
        ));
        lines.push(format!("Build Failures: {}", self.totals.build_failures));
        lines.push(format!(
            "Transport Errors: {}",
            self.totals.transport_failures
        ));
        lines.push(format!("Timeouts: {}", self.totals.timeouts));
        lines.push(format!("Response Bytes: {}", self.totals.response_bytes));
        lines.push(format!(
            "Min/Avg/Max Latency: {}ms / {}ms / {}ms",
            self.totals.min_latency_ms, self.totals.avg_latency_ms, self.totals.max_latency_ms
        ));
        lines.push(format!(
            "P50/P90/P99 Latency: {}ms / {}ms / {}ms",
            self.p50_latency_ms, self.p90_latency_ms, self.p99_latency_ms
        ));
        if self.targets.len() > 1 {
            for (index, target) in self.targets.iter().enumerate() {
                let target_rate = target.tally.success_rate_x100();
                lines.push(format!(
                    "Target {}: {} - {} request(s), {} successful ({}.{:02}%), avg {}ms",
                    index,
                    target.url,
                    target.tally.requests,
                    target.tally.successes,
                    target_rate / PERCENT_DIVISOR,
                    target_rate % PERCENT_DIVISOR,
                    target.tally.avg_latency_ms
                ));
            }
        }
        lines
    }
}

/// Consumes the outcome stream live and accumulates the run report.
#[derive(Debug)]
pub struct SummaryCollector {
    totals: OutcomeTally,
    targets: Vec<TargetReport>,
    histogram: Option<Histogram<u64>>,
}

impl SummaryCollector {
    #[must_use]
    pub fn new(target_urls: Vec<String>) -> Self {
        let histogram = match Histogram::<u64>::new(HISTOGRAM_SIGFIGS) {
            Ok(histogram) => Some(histogram),
            Err(err) => {
                warn!("Latency histogram unavailable: {}", err);
                None
            }
        };
        Self {
            totals: OutcomeTally::new(),
            targets: target_urls
                .into_iter()
                .map(|url| TargetReport {
                    url,
                    tally: OutcomeTally::new(),
                })
                .collect(),
            histogram,
        }
    }

    /// Drains the stream until the dispatcher closes it.
    pub async fn collect(
        target_urls: Vec<String>,
        mut outcome_rx: mpsc::Receiver<RequestOutcome>,
    ) -> Self {
        let mut collector = Self::new(target_urls);
        while let Some(outcome) = outcome_rx.recv().await {
            collector.record(&outcome);
        }
        collector
    }

    pub fn record(&mut self, outcome: &RequestOutcome) {
        self.totals.record(outcome);
        if let Some(target) = self.targets.get_mut(outcome.target_index) {
            target.tally.record(outcome);
        } else {
            warn!("Outcome for unknown target index {}.", outcome.target_index);
        }
        if !matches!(outcome.kind, OutcomeKind::BuildFailed { .. })
            && let Some(histogram) = self.histogram.as_mut()
        {
            let latency_ms = u64::try_from(outcome.latency.as_millis()).unwrap_or(u64::MAX);
            if let Err(err) = histogram.record(latency_ms.max(1)) {
                warn!("Failed to record latency: {}", err);
            }
        }
    }

    #[must_use]
    pub fn finish(mut self, duration: Duration) -> RunReport {
        self.totals.finish();
        for target in &mut self.targets {
            target.tally.finish();
        }
        let (p50, p90, p99) = self.histogram.as_ref().map_or((0, 0, 0), |histogram| {
            if histogram.is_empty() {
                (0, 0, 0)
            } else {
                (
                    histogram.value_at_quantile(0.5),
                    histogram.value_at_quantile(0.9),
                    histogram.value_at_quantile(0.99),
                )
            }
        });
        RunReport {
            duration_ms: u64::try_from(duration.as_millis()).unwrap_or(u64::MAX),
            totals: self.totals,
            targets: self.targets,
            p50_latency_ms: p50,
            p90_latency_ms: p90,
            p99_latency_ms: p99,
        }
    }
}

#[cfg(test)]
mod tests {
    use std::time::Duration;

    use chrono::Utc;

    use super::SummaryCollector;
    use crate::outcome::{OutcomeKind, RequestOutcome};

    fn outcome(target_index: usize, kind: OutcomeKind, latency_ms: u64) -> RequestOutcome {
        let response_bytes = match kind {
            OutcomeKind::Response { .. } => 10,
            OutcomeKind::BuildFailed { .. }
            | OutcomeKind::TransportFailed { .. }
            | OutcomeKind::TimedOut => 0,
        };
        RequestOutcome {
            target_index,
            started_at: Utc::now(),
            latency: Duration::from_millis(latency_ms),
            kind,
            response_bytes,
        }
    }

    #[test]
    fn tallies_split_by_outcome_kind() -> Result<(), String> {
        let mut collector = SummaryCollector::new(vec!["http://localhost".to_owned()]);
        collector.record(&outcome(0, OutcomeKind::Response { status: 200 }, 10));
        collector.record(&outcome(0, OutcomeKind::Response { status: 301 }, 20));
        collector.record(&outcome(0, OutcomeKind::Response { status: 500 }, 30));
        collector.record(&outcome(
            0,
            OutcomeKind::BuildFailed {
                reason: "bad url".to_owned(),
            },
            0,
        ));
        collector.record(&outcome(
            0,
            OutcomeKind::TransportFailed {
                reason: "refused".to_owned(),
            },
            5,
        ));
        collector.record(&outcome(0, OutcomeKind::TimedOut, 1000));

        let report = collector.finish(Duration::from_secs(2));
        let totals = &report.totals;
        if totals.requests != 6 {
            return Err(format!("requests = {}", totals.requests));
        }
        if totals.successes != 2 || totals.non_success_statuses != 1 {
            return Err(format!(
                "successes = {}, non-success = {}",
                totals.successes, totals.non_success_statuses
            ));
        }
        if totals.build_failures != 1 || totals.transport_failures != 1 || totals.timeouts != 1 {
            return Err("failure counters are wrong".to_owned());
        }
        if totals.min_latency_ms != 5 || totals.max_latency_ms != 1000 {
            return Err(format!(
                "min/max = {}/{}",
                totals.min_latency_ms, totals.max_latency_ms
            ));
        }
        Ok(())
    }

    #[test]
    fn build_failures_do_not_skew_latency() -> Result<(), String> {
        let mut collector = SummaryCollector::new(vec!["http://localhost".to_owned()]);
        collector.record(&outcome(0, OutcomeKind::Response { status: 200 }, 40));
        collector.record(&outcome(
            0,
            OutcomeKind::BuildFailed {
                reason: "bad url".to_owned(),
            },
            0,
        ));
        let report = collector.finish(Duration::from_secs(1));
        if report.totals.min_latency_ms != 40 || report.totals.avg_latency_ms != 40 {
            return Err(format!(
                "min/avg = {}/{}",
                report.totals.min_latency_ms, report.totals.avg_latency_ms
            ));
        }
        Ok(())
    }

    #[test]
    fn empty_run_reports_zero_latency() -> Result<(), String> {
        let collector = SummaryCollector::new(vec!["http://localhost".to_owned()]);
        let report = collector.finish(Duration::ZERO);
        if report.totals.min_latency_ms != 0 || report.totals.max_latency_ms != 0 {
            return Err("empty run has nonzero latency bounds".to_owned());
        }
        if report.p50_latency_ms != 0 {
            return Err("empty run has nonzero percentiles".to_owned());
        }
        Ok(())
    }

    #[test]
    fn report_lines_cover_totals() -> Result<(), String> {
        let mut collector = SummaryCollector::new(vec![
            "http://a.localhost".to_owned(),
            "http://b.localhost".to_owned(),
        ]);
        collector.record(&outcome(0, OutcomeKind::Response { status: 200 }, 10));
        collector.record(&outcome(1, OutcomeKind::Response { status: 404 }, 10));
        let report = collector.finish(Duration::from_secs(1));
        let lines = report.lines();
        if !lines.iter().any(|line| line == "Total Requests: 2") {
            return Err(format!("missing totals line: {lines:?}"));
        }
        if !lines.iter().any(|line| line.starts_with("Target 1:")) {
            return Err(format!("missing per-target line: {lines:?}"));
        }
        Ok(())
    }
}
