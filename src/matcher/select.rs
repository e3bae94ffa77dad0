use crate::job::{JobRequirements, JobTopology};
use crate::matcher::score::ScoredResource;
use crate::resource::Resource;

/// Reliability floor for streaming redundancy candidates, in percent.
const STREAMING_RELIABILITY_FLOOR: f64 = 95.0;

/// Redundant replicas a streaming job runs across.
const STREAMING_REPLICAS: usize = 3;

const DISTRIBUTED_MIN_NODES: usize = 2;
const DISTRIBUTED_MAX_NODES: usize = 10;

/// Pick the resource set for a job from ranked candidates.
///
/// Candidates must already be sorted best-first. Callers guarantee the
/// list is non-empty; an empty candidate pool is a no-match outcome
/// decided before selection.
pub fn select_resources(
    topology: JobTopology,
    requirements: &JobRequirements,
    ranked: &[ScoredResource],
) -> Vec<Resource> {
    match topology {
        JobTopology::Distributed => select_distributed(requirements, ranked),
        JobTopology::Streaming => select_streaming(ranked),
        JobTopology::Batch | JobTopology::Interactive => select_single(ranked),
    }
}

fn select_single(ranked: &[ScoredResource]) -> Vec<Resource> {
    ranked.first().map(|s| s.resource.clone()).into_iter().collect()
}

/// Size the node set from the CPU demand relative to the best node,
/// bounded to [2, 10] nodes.
fn select_distributed(requirements: &JobRequirements, ranked: &[ScoredResource]) -> Vec<Resource> {
    let Some(top) = ranked.first() else {
        return Vec::new();
    };
    let per_node = top.resource.cpu_cores.max(1) as f64;
    let needed = (requirements.min_cpu_cores as f64 / per_node).ceil() as usize;
    let count = needed.clamp(DISTRIBUTED_MIN_NODES, DISTRIBUTED_MAX_NODES);
    ranked.iter().take(count).map(|s| s.resource.clone()).collect()
}

/// Prefer highly reliable nodes for redundancy; fall back to the single
/// best candidate when none clear the floor.
fn select_streaming(ranked: &[ScoredResource]) -> Vec<Resource> {
    let reliable: Vec<Resource> = ranked
        .iter()
        .filter(|s| s.resource.metrics.reliability > STREAMING_RELIABILITY_FLOOR)
        .take(STREAMING_REPLICAS)
        .map(|s| s.resource.clone())
        .collect();
    if reliable.is_empty() {
        select_single(ranked)
    } else {
        reliable
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::ScoreWeights;
    use crate::matcher::score::score_resource;
    use crate::resource::PricingModel;

    fn ranked(resources: Vec<Resource>) -> Vec<ScoredResource> {
        resources
            .iter()
            .map(|r| score_resource(r, 100.0, None, &ScoreWeights::default()))
            .collect()
    }

    fn node(cpu: u32, reliability: f64) -> Resource {
        Resource::new("o", cpu, 16, 100)
            .with_price(1.0, PricingModel::Hourly)
            .with_reliability(reliability)
    }

    #[test]
    fn batch_takes_top_one() {
        let top = node(8, 100.0);
        let top_id = top.id;
        let selected = select_resources(
            JobTopology::Batch,
            &JobRequirements::default(),
            &ranked(vec![top, node(8, 100.0)]),
        );
        assert_eq!(selected.len(), 1);
        assert_eq!(selected[0].id, top_id);
    }

    #[test]
    fn distributed_sizes_from_cpu_demand() {
        let req = JobRequirements {
            min_cpu_cores: 64,
            ..Default::default()
        };
        let pool = ranked((0..10).map(|_| node(16, 100.0)).collect());
        let selected = select_resources(JobTopology::Distributed, &req, &pool);
        assert_eq!(selected.len(), 4); // ceil(64 / 16)
    }

    #[test]
    fn distributed_bounds() {
        let small = JobRequirements {
            min_cpu_cores: 1,
            ..Default::default()
        };
        let huge = JobRequirements {
            min_cpu_cores: 1000,
            ..Default::default()
        };
        let pool = ranked((0..12).map(|_| node(16, 100.0)).collect());
        assert_eq!(select_resources(JobTopology::Distributed, &small, &pool).len(), 2);
        assert_eq!(select_resources(JobTopology::Distributed, &huge, &pool).len(), 10);
    }

    #[test]
    fn streaming_takes_reliable_subset() {
        let pool = ranked(vec![
            node(8, 99.0),
            node(8, 90.0),
            node(8, 96.0),
            node(8, 80.0),
            node(8, 95.0), // exactly at the floor, excluded
        ]);
        let selected = select_resources(
            JobTopology::Streaming,
            &JobRequirements::default(),
            &pool,
        );
        assert_eq!(selected.len(), 2);
        assert!(selected.iter().all(|r| r.metrics.reliability > 95.0));
    }

    #[test]
    fn streaming_falls_back_to_top_one() {
        let top = node(8, 90.0);
        let top_id = top.id;
        let pool = ranked(vec![top, node(8, 85.0)]);
        let selected = select_resources(
            JobTopology::Streaming,
            &JobRequirements::default(),
            &pool,
        );
        assert_eq!(selected.len(), 1);
        assert_eq!(selected[0].id, top_id);
    }

    #[test]
    fn streaming_caps_at_three() {
        let pool = ranked((0..5).map(|_| node(8, 99.0)).collect());
        let selected = select_resources(
            JobTopology::Streaming,
            &JobRequirements::default(),
            &pool,
        );
        assert_eq!(selected.len(), 3);
    }
}
