//! Driving a probe pass over many domains at once.
//!
//! Concurrency is bounded by a semaphore sized from the kindness level, so
//! a run can be slowed down when the probed hosts rate-limit us. Reports
//! come back as a stream in completion order: the caller applies each one
//! to the table as it lands and can stop consuming at any point without
//! losing what already completed.

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use futures::stream::{self, Stream, StreamExt};
use serde::{Deserialize, Serialize};
use tokio::sync::Semaphore;
use tracing::debug;

use crate::probe::{ProbeClient, ProbeReport};

/// Concurrency ceilings, friendliest first: plain, slow, slower, slowest.
pub const KINDNESS_LEVELS: [usize; 4] = [20, 10, 5, 2];

pub type ProgressCallback = Box<dyn Fn(usize, usize, &str) + Send + Sync>;

#[derive(Debug, Clone)]
pub struct RefreshRunner {
    client: ProbeClient,
    concurrency: usize,
}

impl RefreshRunner {
    pub fn new(client: ProbeClient) -> Self {
        Self {
            client,
            concurrency: KINDNESS_LEVELS[0],
        }
    }

    /// Pick the concurrency from a kindness level; levels beyond the scale
    /// clamp to the slowest.
    pub fn with_kindness(mut self, level: usize) -> Self {
        self.concurrency = KINDNESS_LEVELS[level.min(KINDNESS_LEVELS.len() - 1)];
        self
    }

    pub fn with_concurrency(mut self, concurrency: usize) -> Self {
        self.concurrency = concurrency.max(1);
        self
    }

    /// Probe every name and stream the reports back in completion order.
    pub fn run_stream(
        &self,
        names: Vec<String>,
        progress: Option<ProgressCallback>,
    ) -> impl Stream<Item = ProbeReport> + '_ {
        let total = names.len();
        let completed = Arc::new(AtomicUsize::new(0));
        let semaphore = Arc::new(Semaphore::new(self.concurrency));
        let progress = progress.map(Arc::new);

        debug!(
            total = total,
            concurrency = self.concurrency,
            "starting refresh"
        );

        stream::iter(names)
            .map(move |name| {
                let semaphore = semaphore.clone();
                let completed = completed.clone();
                let progress = progress.clone();
                let client = &self.client;

                async move {
                    // The semaphore is never closed, acquire only fails on
                    // shutdown.
                    let _permit = semaphore.acquire().await.ok();

                    let report = client.probe_domain(&name).await;

                    let count = completed.fetch_add(1, Ordering::Relaxed) + 1;
                    if let Some(progress) = progress.as_deref() {
                        progress(count, total, &name);
                    }
                    report
                }
            })
            .buffer_unordered(self.concurrency)
    }

    /// Probe every name and collect all reports.
    pub async fn run(
        &self,
        names: Vec<String>,
        progress: Option<ProgressCallback>,
    ) -> Vec<ProbeReport> {
        self.run_stream(names, progress).collect().await
    }
}

/// Counters for the end-of-run summary.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct RefreshSummary {
    pub checked: usize,
    pub reachable: usize,
    pub unreachable: usize,
    pub interrupted: bool,
}

impl RefreshSummary {
    pub fn record(&mut self, report: &ProbeReport) {
        self.checked += 1;
        if report.is_reachable() {
            self.reachable += 1;
        } else {
            self.unreachable += 1;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn runner() -> RefreshRunner {
        RefreshRunner::new(ProbeClient::new().unwrap())
    }

    #[test]
    fn test_kindness_levels() {
        assert_eq!(runner().concurrency, 20);
        assert_eq!(runner().with_kindness(1).concurrency, 10);
        assert_eq!(runner().with_kindness(3).concurrency, 2);
        // Beyond the scale clamps to the slowest.
        assert_eq!(runner().with_kindness(9).concurrency, 2);
    }

    #[test]
    fn test_concurrency_floor() {
        assert_eq!(runner().with_concurrency(0).concurrency, 1);
        assert_eq!(runner().with_concurrency(64).concurrency, 64);
    }

    #[test]
    fn test_summary_record() {
        let mut summary = RefreshSummary::default();
        summary.record(&ProbeReport {
            name: "a.fr".to_string(),
            https_status: "200 OK".to_string(),
            http_status: "Timeout".to_string(),
            duration_ms: 3,
        });
        summary.record(&ProbeReport {
            name: "b.fr".to_string(),
            https_status: "Cannot connect".to_string(),
            http_status: "404 Not Found".to_string(),
            duration_ms: 5,
        });
        assert_eq!(summary.checked, 2);
        assert_eq!(summary.reachable, 1);
        assert_eq!(summary.unreachable, 1);
        assert!(!summary.interrupted);
    }

    #[tokio::test]
    async fn test_run_with_no_names() {
        let reports = runner().run(Vec::new(), None).await;
        assert!(reports.is_empty());
    }
}
