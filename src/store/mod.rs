pub mod jobs;
pub mod resources;

pub use jobs::JobStore;
pub use resources::ResourcePool;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use uuid::Uuid;

use crate::error::Result;
use crate::job::{Job, JobRequirements, JobStatus};
use crate::matcher::MatchOptions;
use crate::resource::Resource;

/// Read side of the resource store. The matching engine only reads
/// resources, except for the metric feedback applied after a job
/// finishes.
#[async_trait]
pub trait ResourceRepository: Send + Sync {
    /// Active resources meeting the job's hard constraints, in stable
    /// repository order. An empty result is a normal outcome.
    async fn find_available(
        &self,
        requirements: &JobRequirements,
        options: &MatchOptions,
    ) -> Result<Vec<Resource>>;

    async fn get(&self, id: Uuid) -> Result<Option<Resource>>;

    /// Record a finished job against a resource: success/failure
    /// counters, reliability recomputation and compute-time increment.
    /// Must be applied as an atomic read-modify-write per resource.
    async fn record_job_outcome(&self, id: Uuid, success: bool, compute_hours: f64) -> Result<()>;
}

/// Job store seam consumed by the scheduler.
#[async_trait]
pub trait JobRepository: Send + Sync {
    /// Jobs awaiting scheduling (pending or waiting for resources),
    /// ordered by priority descending then creation time ascending.
    async fn find_pending_jobs(&self, limit: usize) -> Result<Vec<Job>>;

    async fn get(&self, id: Uuid) -> Result<Option<Job>>;

    /// Apply a status transition. Fails with `InvalidTransition` on an
    /// illegal edge, leaving the job unchanged. Entering `Completed` or
    /// `Failed` feeds metrics back to every assigned resource.
    async fn update_status(&self, id: Uuid, status: JobStatus) -> Result<Job>;

    /// Assign resources and transition to `Scheduled` in one step.
    async fn schedule_job(
        &self,
        id: Uuid,
        start: DateTime<Utc>,
        resource_ids: Vec<Uuid>,
    ) -> Result<Job>;
}
