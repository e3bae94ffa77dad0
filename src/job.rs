use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Lifecycle state of a job.
///
/// The allowed transitions form a closed state machine (see
/// [`JobStatus::can_transition_to`]); any other edge is rejected by the
/// job store with `GridError::InvalidTransition`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum JobStatus {
    Draft,
    Pending,
    WaitingResources,
    Scheduled,
    Running,
    Paused,
    Completed,
    Failed,
    Cancelled,
    Timeout,
}

impl JobStatus {
    /// Whether moving from `self` to `to` is a legal transition.
    ///
    /// `Completed` is terminal. `Failed`, `Cancelled` and `Timeout` may
    /// re-enter the queue as `Pending` (retry/restart).
    pub fn can_transition_to(self, to: JobStatus) -> bool {
        use JobStatus::*;
        matches!(
            (self, to),
            (Draft, Pending)
                | (Draft, Cancelled)
                | (Pending, WaitingResources)
                | (Pending, Scheduled)
                | (Pending, Cancelled)
                | (WaitingResources, Scheduled)
                | (WaitingResources, Cancelled)
                | (Scheduled, Running)
                | (Scheduled, Cancelled)
                | (Running, Paused)
                | (Running, Completed)
                | (Running, Failed)
                | (Running, Timeout)
                | (Paused, Running)
                | (Paused, Cancelled)
                | (Failed, Pending)
                | (Cancelled, Pending)
                | (Timeout, Pending)
        )
    }

    /// Terminal states have no outgoing edges besides retry re-entry.
    pub fn is_terminal(self) -> bool {
        self == JobStatus::Completed
    }
}

impl std::fmt::Display for JobStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            JobStatus::Draft => "draft",
            JobStatus::Pending => "pending",
            JobStatus::WaitingResources => "waiting_resources",
            JobStatus::Scheduled => "scheduled",
            JobStatus::Running => "running",
            JobStatus::Paused => "paused",
            JobStatus::Completed => "completed",
            JobStatus::Failed => "failed",
            JobStatus::Cancelled => "cancelled",
            JobStatus::Timeout => "timeout",
        };
        write!(f, "{}", s)
    }
}

/// Execution shape of a job. Drives how many resources the selector
/// picks and with what redundancy.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum JobTopology {
    Batch,
    Interactive,
    Distributed,
    Streaming,
}

/// Hard requirements a candidate resource must satisfy, plus the
/// estimate inputs used for costing.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct JobRequirements {
    pub min_cpu_cores: u32,
    pub min_memory_gb: u32,
    pub min_storage_gb: u32,
    pub needs_gpu: bool,
    pub min_gpu_memory_gb: Option<u32>,
    /// Price ceiling per billing unit. No ceiling means any price
    /// passes the filter and scoring falls back to the baseline price.
    pub max_price: Option<f64>,
    pub estimated_duration_hours: f64,
}

impl Default for JobRequirements {
    fn default() -> Self {
        Self {
            min_cpu_cores: 1,
            min_memory_gb: 1,
            min_storage_gb: 0,
            needs_gpu: false,
            min_gpu_memory_gb: None,
            max_price: None,
            estimated_duration_hours: 1.0,
        }
    }
}

pub const DEFAULT_PRIORITY: u8 = 5;
pub const MIN_PRIORITY: u8 = 1;
pub const MAX_PRIORITY: u8 = 10;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Job {
    pub id: Uuid,
    pub owner: String,
    pub topology: JobTopology,
    pub requirements: JobRequirements,
    /// 1-10; higher priority jobs are scheduled first and costed at a
    /// premium.
    pub priority: u8,
    pub status: JobStatus,
    /// Resource ids assigned at scheduling time, in selection order.
    pub assigned_resources: Vec<Uuid>,
    /// Explicit floor for the start time, if the owner declared one.
    pub requested_start: Option<DateTime<Utc>>,
    pub deadline: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
    /// Start time computed at scheduling; set together with
    /// `assigned_resources`.
    pub scheduled_start: Option<DateTime<Utc>>,
}

impl Job {
    pub fn new(owner: impl Into<String>, topology: JobTopology, requirements: JobRequirements) -> Self {
        Self {
            id: Uuid::new_v4(),
            owner: owner.into(),
            topology,
            requirements,
            priority: DEFAULT_PRIORITY,
            status: JobStatus::Draft,
            assigned_resources: Vec::new(),
            requested_start: None,
            deadline: None,
            created_at: Utc::now(),
            scheduled_start: None,
        }
    }

    pub fn with_priority(mut self, priority: u8) -> Self {
        self.priority = priority.clamp(MIN_PRIORITY, MAX_PRIORITY);
        self
    }

    pub fn with_requested_start(mut self, start: DateTime<Utc>) -> Self {
        self.requested_start = Some(start);
        self
    }

    pub fn with_deadline(mut self, deadline: DateTime<Utc>) -> Self {
        self.deadline = Some(deadline);
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn new_job_defaults() {
        let job = Job::new("alice", JobTopology::Batch, JobRequirements::default());
        assert_eq!(job.status, JobStatus::Draft);
        assert_eq!(job.priority, DEFAULT_PRIORITY);
        assert!(job.assigned_resources.is_empty());
        assert!(job.scheduled_start.is_none());
    }

    #[test]
    fn priority_is_clamped() {
        let job = Job::new("alice", JobTopology::Batch, JobRequirements::default());
        assert_eq!(job.clone().with_priority(0).priority, MIN_PRIORITY);
        assert_eq!(job.clone().with_priority(15).priority, MAX_PRIORITY);
        assert_eq!(job.with_priority(7).priority, 7);
    }

    #[test]
    fn completed_is_terminal() {
        use JobStatus::*;
        for target in [
            Draft,
            Pending,
            WaitingResources,
            Scheduled,
            Running,
            Paused,
            Failed,
            Cancelled,
            Timeout,
        ] {
            assert!(!Completed.can_transition_to(target));
        }
        assert!(Completed.is_terminal());
    }

    #[test]
    fn retry_edges() {
        use JobStatus::*;
        assert!(Failed.can_transition_to(Pending));
        assert!(Cancelled.can_transition_to(Pending));
        assert!(Timeout.can_transition_to(Pending));
        assert!(!Failed.can_transition_to(Running));
    }

    #[test]
    fn status_display_is_snake_case() {
        assert_eq!(JobStatus::WaitingResources.to_string(), "waiting_resources");
        assert_eq!(JobStatus::Pending.to_string(), "pending");
    }
}
