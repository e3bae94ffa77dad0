use std::sync::Arc;

use chrono::{DateTime, Utc};
use tokio::time::MissedTickBehavior;
use tokio_util::sync::CancellationToken;
use uuid::Uuid;

use crate::config::SchedulerConfig;
use crate::error::Result;
use crate::job::{Job, JobStatus};
use crate::matcher::{MatchOptions, Matcher};
use crate::resource::Resource;
use crate::store::JobRepository;

/// What happened to one job during a scheduling pass.
#[derive(Debug, Clone)]
pub enum Disposition {
    Scheduled {
        start: DateTime<Utc>,
        resources: Vec<Uuid>,
        estimated_cost: f64,
    },
    /// No match; the job stays queued as waiting_resources.
    Waiting { reason: String },
    /// Matcher or repository fault; the rest of the batch continues.
    Failed { error: String },
}

#[derive(Debug, Clone)]
pub struct ScheduleOutcome {
    pub job_id: Uuid,
    pub disposition: Disposition,
}

/// Result of one scheduling pass. `failed` counts faults only; jobs
/// left waiting for resources are not failures.
#[derive(Debug, Clone)]
pub struct SchedulingSummary {
    pub total_jobs: usize,
    pub scheduled: usize,
    pub failed: usize,
    pub details: Vec<ScheduleOutcome>,
}

/// Periodically promotes queued jobs to scheduled.
///
/// One tick runs to completion before the next is armed, so a single
/// scheduler instance never overlaps its own passes.
pub struct Scheduler {
    jobs: Arc<dyn JobRepository>,
    matcher: Matcher,
    config: SchedulerConfig,
}

impl Scheduler {
    pub fn new(jobs: Arc<dyn JobRepository>, matcher: Matcher, config: SchedulerConfig) -> Self {
        Self {
            jobs,
            matcher,
            config,
        }
    }

    /// Run the periodic scheduling loop until the token is cancelled.
    pub async fn run(&self, shutdown: CancellationToken) {
        tokio::select! {
            _ = shutdown.cancelled() => return,
            _ = tokio::time::sleep(self.config.initial_delay) => {}
        }

        let mut interval = tokio::time::interval(self.config.tick_interval);
        interval.set_missed_tick_behavior(MissedTickBehavior::Delay);

        loop {
            tokio::select! {
                _ = shutdown.cancelled() => break,
                _ = interval.tick() => {
                    match self.schedule_pending_jobs(self.config.batch_size).await {
                        Ok(summary) => tracing::info!(
                            total = summary.total_jobs,
                            scheduled = summary.scheduled,
                            failed = summary.failed,
                            "Scheduling tick complete"
                        ),
                        Err(e) => tracing::error!(error = %e, "Scheduling tick failed"),
                    }
                }
            }
        }
        tracing::info!("Scheduler stopped");
    }

    /// One scheduling pass over up to `batch_size` queued jobs. Also
    /// callable on demand, outside the periodic loop.
    pub async fn schedule_pending_jobs(&self, batch_size: usize) -> Result<SchedulingSummary> {
        let jobs = self.jobs.find_pending_jobs(batch_size).await?;
        let mut summary = SchedulingSummary {
            total_jobs: jobs.len(),
            scheduled: 0,
            failed: 0,
            details: Vec::with_capacity(jobs.len()),
        };

        for job in jobs {
            let disposition = match self.schedule_one(&job).await {
                Ok(disposition) => {
                    if matches!(disposition, Disposition::Scheduled { .. }) {
                        summary.scheduled += 1;
                    }
                    disposition
                }
                Err(e) => {
                    tracing::warn!(job_id = %job.id, error = %e, "Failed to schedule job");
                    summary.failed += 1;
                    Disposition::Failed {
                        error: e.to_string(),
                    }
                }
            };
            summary.details.push(ScheduleOutcome {
                job_id: job.id,
                disposition,
            });
        }

        Ok(summary)
    }

    async fn schedule_one(&self, job: &Job) -> Result<Disposition> {
        let result = self
            .matcher
            .match_job_to_resources(job, &MatchOptions::default())
            .await?;

        if !result.success {
            let reason = result
                .reason
                .unwrap_or_else(|| "no suitable resources".to_string());
            // Already-waiting jobs are simply retried next tick
            if job.status != JobStatus::WaitingResources {
                self.jobs
                    .update_status(job.id, JobStatus::WaitingResources)
                    .await?;
            }
            tracing::debug!(job_id = %job.id, reason = %reason, "Job waiting for resources");
            return Ok(Disposition::Waiting { reason });
        }

        let start = compute_start_time(job, &result.selected, Utc::now());
        let resource_ids: Vec<Uuid> = result.selected.iter().map(|r| r.id).collect();
        self.jobs
            .schedule_job(job.id, start, resource_ids.clone())
            .await?;
        tracing::info!(
            job_id = %job.id,
            start = %start,
            resources = resource_ids.len(),
            cost = result.estimated_cost,
            "Job scheduled"
        );
        Ok(Disposition::Scheduled {
            start,
            resources: resource_ids,
            estimated_cost: result.estimated_cost,
        })
    }
}

/// Start time for a matched job: the owner's future start request wins;
/// otherwise now when a selected resource is already inside its
/// availability window; otherwise the earliest upcoming window.
fn compute_start_time(job: &Job, selected: &[Resource], now: DateTime<Utc>) -> DateTime<Utc> {
    if let Some(requested) = job.requested_start {
        if requested > now {
            return requested;
        }
    }
    if selected.iter().any(|r| r.availability.is_available_at(now)) {
        return now;
    }
    selected
        .iter()
        .filter_map(|r| r.availability.next_window_after(now))
        .min()
        .unwrap_or(now)
}
