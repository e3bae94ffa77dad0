pub mod cost;
pub mod filter;
pub mod score;
pub mod select;

pub use score::ScoredResource;

use std::sync::Arc;
use std::time::{Duration, Instant};

use crate::config::MatcherConfig;
use crate::error::Result;
use crate::job::{Job, JobRequirements, JobTopology};
use crate::resource::{GeoPoint, Resource};
use crate::store::ResourceRepository;

/// Per-call overrides for a match, typically supplied by the caller on
/// behalf of the job owner.
#[derive(Debug, Clone, Default)]
pub struct MatchOptions {
    /// Overrides the job's own price ceiling when set.
    pub max_price: Option<f64>,
    /// Reference point for geo filtering and the location score.
    pub near: Option<GeoPoint>,
    pub max_distance_km: Option<f64>,
    /// When non-empty, candidates must share at least one tag.
    pub tags: Vec<String>,
}

/// Outcome of one matching attempt. Owned by the invocation that
/// produced it; never persisted.
#[derive(Debug, Clone)]
pub struct MatchResult {
    pub success: bool,
    /// All candidates, ranked best-first.
    pub scored: Vec<ScoredResource>,
    /// The subset the selector picked for this job's topology.
    pub selected: Vec<Resource>,
    pub estimated_cost: f64,
    pub elapsed: Duration,
    /// Human-readable reason when no match was found.
    pub reason: Option<String>,
}

impl MatchResult {
    fn no_match(reason: impl Into<String>, elapsed: Duration) -> Self {
        Self {
            success: false,
            scored: Vec::new(),
            selected: Vec::new(),
            estimated_cost: 0.0,
            elapsed,
            reason: Some(reason.into()),
        }
    }
}

/// Drives the filter -> score -> select -> cost pipeline for one job.
///
/// "No resources found" is a successful call with an unsuccessful
/// result; only repository faults surface as errors.
pub struct Matcher {
    resources: Arc<dyn ResourceRepository>,
    config: MatcherConfig,
}

impl Matcher {
    pub fn new(resources: Arc<dyn ResourceRepository>, config: MatcherConfig) -> Self {
        Self { resources, config }
    }

    /// Match a job against the advertised resource pool.
    pub async fn match_job_to_resources(
        &self,
        job: &Job,
        options: &MatchOptions,
    ) -> Result<MatchResult> {
        let result = self
            .match_requirements(&job.requirements, job.topology, options)
            .await?;
        if result.success {
            tracing::debug!(
                job_id = %job.id,
                candidates = result.scored.len(),
                selected = result.selected.len(),
                cost = result.estimated_cost,
                "Match found"
            );
        } else {
            tracing::debug!(job_id = %job.id, reason = ?result.reason, "No match");
        }
        Ok(result)
    }

    /// Match raw requirements without a persisted job, used to gate
    /// submission before a job exists.
    pub async fn match_requirements(
        &self,
        requirements: &JobRequirements,
        topology: JobTopology,
        options: &MatchOptions,
    ) -> Result<MatchResult> {
        let started = Instant::now();

        let candidates = self.resources.find_available(requirements, options).await?;
        if candidates.is_empty() {
            return Ok(MatchResult::no_match(
                "no resources satisfy the job requirements",
                started.elapsed(),
            ));
        }

        let ceiling = options.max_price.or(requirements.max_price);
        let ranked = score::rank_candidates(candidates, ceiling, options.near.as_ref(), &self.config);
        let selected = select::select_resources(topology, requirements, &ranked);
        let estimated_cost = cost::match_cost(&selected, requirements.estimated_duration_hours);

        Ok(MatchResult {
            success: true,
            scored: ranked,
            selected,
            estimated_cost,
            elapsed: started.elapsed(),
            reason: None,
        })
    }
}
