//! Waiting/service-time report.
//!
//! Derives per-job and aggregate statistics from the execution ledger.
//!
//! # Metrics
//!
//! | Metric | Definition |
//! |--------|-----------|
//! | Wait time | Σ gaps between arrival (or previous segment end) and the next segment start |
//! | Service time | wait time + total burst |
//! | Averages | arithmetic mean over every job with a ledger entry |

use serde::Serialize;

use crate::error::SchedulerError;
use crate::models::{ExecutionLedger, JobId, LedgerEntry, Segment};

/// Per-job statistics row.
#[derive(Debug, Clone, Serialize)]
pub struct JobReport {
    /// The reported job.
    pub job_id: JobId,
    /// Job name at submission.
    pub name: String,
    /// Total virtual ms of work the job required.
    pub burst_ms: i64,
    /// Priority at submission, if any.
    pub priority: Option<i32>,
    /// Virtual time of submission (ms).
    pub entry_ms: i64,
    /// Execution segments in time order.
    pub segments: Vec<Segment>,
    /// Virtual ms spent ready but not executing.
    pub wait_ms: i64,
    /// Wait time plus total burst.
    pub service_ms: i64,
}

impl JobReport {
    fn from_entry(entry: &LedgerEntry) -> Self {
        let wait_ms = wait_time_ms(entry);
        Self {
            job_id: entry.job_id,
            name: entry.name.clone(),
            burst_ms: entry.burst_ms,
            priority: entry.priority,
            entry_ms: entry.entry_ms,
            segments: entry.segments.clone(),
            wait_ms,
            service_ms: wait_ms + entry.burst_ms,
        }
    }
}

/// Aggregate report across every job the ledger has seen, in submission
/// order.
#[derive(Debug, Clone, Serialize)]
pub struct ExecutionReport {
    /// Per-job breakdown.
    pub per_job: Vec<JobReport>,
    /// Arithmetic mean of wait times (ms).
    pub average_wait_ms: f64,
    /// Arithmetic mean of service times (ms).
    pub average_service_ms: f64,
}

impl ExecutionReport {
    /// Computes the report.
    ///
    /// # Errors
    /// `NoJobs` when the ledger has no entries — an explicit error, never
    /// a silent division by zero.
    pub fn from_ledger(ledger: &ExecutionLedger) -> Result<Self, SchedulerError> {
        if ledger.is_empty() {
            return Err(SchedulerError::NoJobs);
        }
        let per_job: Vec<JobReport> = ledger.iter().map(JobReport::from_entry).collect();
        let count = per_job.len() as f64;
        let average_wait_ms = per_job.iter().map(|j| j.wait_ms as f64).sum::<f64>() / count;
        let average_service_ms = per_job.iter().map(|j| j.service_ms as f64).sum::<f64>() / count;
        Ok(Self {
            per_job,
            average_wait_ms,
            average_service_ms,
        })
    }
}

/// Sum of ready-but-not-running gaps: from arrival to the first segment
/// start, then between consecutive segments.
fn wait_time_ms(entry: &LedgerEntry) -> i64 {
    let mut wait_ms = 0;
    let mut previous_end_ms = entry.entry_ms;
    for segment in &entry.segments {
        wait_ms += segment.start_ms - previous_end_ms;
        previous_end_ms = segment.end_ms;
    }
    wait_ms
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::Job;

    fn seg(start_ms: i64, end_ms: i64) -> Segment {
        Segment { start_ms, end_ms }
    }

    fn ledger_with(jobs: Vec<(u64, i64, i64, Vec<Segment>)>) -> ExecutionLedger {
        let mut ledger = ExecutionLedger::new();
        for (id, burst_ms, arrival_ms, segments) in jobs {
            let job = Job::new(JobId(id), format!("J{id}"), burst_ms, None, arrival_ms);
            ledger.open_entry(&job);
            for segment in segments {
                ledger.record_segment(JobId(id), segment);
            }
        }
        ledger
    }

    #[test]
    fn test_wait_is_the_sum_of_gaps_from_arrival() {
        let ledger = ledger_with(vec![(
            1,
            4_000,
            0,
            vec![seg(0, 1_000), seg(4_000, 7_000)],
        )]);
        let report = ExecutionReport::from_ledger(&ledger).unwrap();
        assert_eq!(report.per_job[0].wait_ms, 3_000);
        assert_eq!(report.per_job[0].service_ms, 7_000);
    }

    #[test]
    fn test_wait_counts_delay_before_first_dispatch() {
        let ledger = ledger_with(vec![(1, 2_000, 1_000, vec![seg(3_000, 5_000)])]);
        let report = ExecutionReport::from_ledger(&ledger).unwrap();
        assert_eq!(report.per_job[0].wait_ms, 2_000);
        assert_eq!(report.per_job[0].service_ms, 4_000);
    }

    #[test]
    fn test_never_run_job_reports_zero_wait() {
        let ledger = ledger_with(vec![(1, 2_000, 500, vec![])]);
        let report = ExecutionReport::from_ledger(&ledger).unwrap();
        assert_eq!(report.per_job[0].wait_ms, 0);
        assert_eq!(report.per_job[0].service_ms, 2_000);
    }

    #[test]
    fn test_averages_across_jobs() {
        let ledger = ledger_with(vec![
            (1, 2_000, 0, vec![seg(0, 2_000)]),
            (2, 1_000, 0, vec![seg(2_000, 3_000)]),
        ]);
        let report = ExecutionReport::from_ledger(&ledger).unwrap();
        // Waits: 0 and 2000; services: 2000 and 3000.
        assert!((report.average_wait_ms - 1_000.0).abs() < 1e-9);
        assert!((report.average_service_ms - 2_500.0).abs() < 1e-9);
    }

    #[test]
    fn test_rows_follow_submission_order() {
        let ledger = ledger_with(vec![
            (2, 1_000, 500, vec![]),
            (1, 1_000, 0, vec![]),
        ]);
        let report = ExecutionReport::from_ledger(&ledger).unwrap();
        let ids: Vec<u64> = report.per_job.iter().map(|j| j.job_id.value()).collect();
        assert_eq!(ids, vec![1, 2]);
    }

    #[test]
    fn test_empty_ledger_is_an_explicit_error() {
        let ledger = ExecutionLedger::new();
        assert_eq!(
            ExecutionReport::from_ledger(&ledger).unwrap_err(),
            SchedulerError::NoJobs
        );
    }

    #[test]
    fn test_report_serializes_for_external_consumers() {
        let ledger = ledger_with(vec![(1, 2_000, 0, vec![seg(0, 2_000)])]);
        let report = ExecutionReport::from_ledger(&ledger).unwrap();
        let value = serde_json::to_value(&report).unwrap();
        assert_eq!(value["per_job"][0]["name"], "J1");
        assert_eq!(value["per_job"][0]["wait_ms"], 0);
        assert_eq!(value["per_job"][0]["service_ms"], 2_000);
        assert_eq!(value["average_wait_ms"], 0.0);
    }
}
