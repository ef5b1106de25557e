use std::sync::Arc;

use tokio::sync::Semaphore;
use tokio::task::JoinSet;
use tracing::{error, info};

use super::session::SessionController;
use crate::model::{AbortReason, BatchReport, TestRecord, TrialAbort, TrialOutcome};

/// Fans records out into concurrent trials and flattens their rows.
///
/// Every trial holds a semaphore permit for its whole session, so at most
/// `max_concurrent_calls` calls are in flight across the batch.
#[derive(Clone)]
pub struct Runner {
    session: Arc<SessionController>,
    limiter: Arc<Semaphore>,
}

impl Runner {
    pub fn new(session: SessionController) -> Self {
        let permits = session.config().max_concurrent_calls.max(1);
        Self {
            session: Arc::new(session),
            limiter: Arc::new(Semaphore::new(permits)),
        }
    }

    /// Run all records concurrently. Results come back in completion order.
    pub async fn run_batch(&self, records: Vec<TestRecord>) -> BatchReport {
        let mut join_set = JoinSet::new();

        for record in records {
            info!(record_id = %record.id, trials = record.numtest, "running record");
            let this = self.clone();
            let record = Arc::new(record);
            join_set.spawn(async move { this.run_record(record).await });
        }

        let mut report = BatchReport::default();
        while let Some(res) = join_set.join_next().await {
            match res {
                Ok(record_report) => report.extend(record_report),
                Err(e) => error!(error = %e, "record task failed"),
            }
        }

        info!(
            rows = report.rows.len(),
            passed = report.passed(),
            aborted_trials = report.aborts.len(),
            "batch complete"
        );
        report
    }

    /// Run all trials of one record concurrently.
    pub async fn run_record(&self, record: Arc<TestRecord>) -> BatchReport {
        let mut handles = Vec::with_capacity(record.numtest as usize);

        for trial in 1..=record.numtest {
            let this = self.clone();
            let record = Arc::clone(&record);
            let handle = tokio::spawn(async move { this.run_trial(&record, trial).await });
            handles.push((trial, handle));
        }

        let mut report = BatchReport::default();
        for (trial, handle) in handles {
            match handle.await {
                Ok(outcome) => report.push(outcome),
                Err(e) => {
                    error!(record_id = %record.id, trial, error = %e, "trial task failed");
                    report.push(TrialOutcome::Aborted(TrialAbort::new(
                        &record,
                        trial,
                        None,
                        AbortReason::Panicked(e.to_string()),
                    )));
                }
            }
        }
        report
    }

    async fn run_trial(&self, record: &TestRecord, trial: u32) -> TrialOutcome {
        // The semaphore is never closed while the runner is alive.
        let _permit = Arc::clone(&self.limiter).acquire_owned().await.ok();
        self.session.run_session(record, trial).await
    }
}
