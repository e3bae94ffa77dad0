use std::collections::HashMap;
use std::sync::Arc;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use tokio::sync::RwLock;
use uuid::Uuid;

use crate::error::{GridError, Result};
use crate::job::{Job, JobStatus};
use crate::store::{JobRepository, ResourceRepository};

/// In-memory job store.
///
/// Enforces the status state machine on every write and feeds resource
/// metrics back when a job finishes. Reference implementation of
/// [`JobRepository`].
pub struct JobStore {
    jobs: RwLock<HashMap<Uuid, Job>>,
    resources: Arc<dyn ResourceRepository>,
}

impl JobStore {
    pub fn new(resources: Arc<dyn ResourceRepository>) -> Self {
        Self {
            jobs: RwLock::new(HashMap::new()),
            resources,
        }
    }

    /// Accept a job into the queue. Draft jobs enter as pending.
    pub async fn submit(&self, mut job: Job) -> Result<Job> {
        if job.status == JobStatus::Draft {
            job.status = JobStatus::Pending;
        }
        let stored = job.clone();
        self.jobs.write().await.insert(job.id, job);
        tracing::info!(job_id = %stored.id, priority = stored.priority, "Job submitted");
        Ok(stored)
    }

    pub async fn len(&self) -> usize {
        self.jobs.read().await.len()
    }

    /// Feed the outcome of a finished job back into resource metrics.
    async fn apply_metric_feedback(&self, job: &Job, success: bool) {
        for resource_id in &job.assigned_resources {
            let hours = job.requirements.estimated_duration_hours;
            if let Err(e) = self
                .resources
                .record_job_outcome(*resource_id, success, hours)
                .await
            {
                tracing::warn!(
                    job_id = %job.id,
                    resource_id = %resource_id,
                    error = %e,
                    "Failed to update resource metrics"
                );
            }
        }
    }
}

#[async_trait]
impl JobRepository for JobStore {
    async fn find_pending_jobs(&self, limit: usize) -> Result<Vec<Job>> {
        let jobs = self.jobs.read().await;
        let mut pending: Vec<Job> = jobs
            .values()
            .filter(|j| matches!(j.status, JobStatus::Pending | JobStatus::WaitingResources))
            .cloned()
            .collect();
        pending.sort_by(|a, b| {
            b.priority
                .cmp(&a.priority)
                .then(a.created_at.cmp(&b.created_at))
        });
        pending.truncate(limit);
        Ok(pending)
    }

    async fn get(&self, id: Uuid) -> Result<Option<Job>> {
        Ok(self.jobs.read().await.get(&id).cloned())
    }

    async fn update_status(&self, id: Uuid, status: JobStatus) -> Result<Job> {
        let updated = {
            let mut jobs = self.jobs.write().await;
            let job = jobs.get_mut(&id).ok_or(GridError::JobNotFound(id))?;
            if !job.status.can_transition_to(status) {
                return Err(GridError::InvalidTransition {
                    from: job.status,
                    to: status,
                });
            }
            tracing::debug!(job_id = %id, from = %job.status, to = %status, "Job status updated");
            job.status = status;
            job.clone()
        };
        match status {
            JobStatus::Completed => self.apply_metric_feedback(&updated, true).await,
            JobStatus::Failed => self.apply_metric_feedback(&updated, false).await,
            _ => {}
        }
        Ok(updated)
    }

    async fn schedule_job(
        &self,
        id: Uuid,
        start: DateTime<Utc>,
        resource_ids: Vec<Uuid>,
    ) -> Result<Job> {
        let mut jobs = self.jobs.write().await;
        let job = jobs.get_mut(&id).ok_or(GridError::JobNotFound(id))?;
        if !job.status.can_transition_to(JobStatus::Scheduled) {
            return Err(GridError::InvalidTransition {
                from: job.status,
                to: JobStatus::Scheduled,
            });
        }
        job.status = JobStatus::Scheduled;
        job.assigned_resources = resource_ids;
        job.scheduled_start = Some(start);
        tracing::info!(
            job_id = %id,
            start = %start,
            resources = job.assigned_resources.len(),
            "Job scheduled"
        );
        Ok(job.clone())
    }
}
