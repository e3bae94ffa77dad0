use crate::job::JobRequirements;
use crate::matcher::MatchOptions;
use crate::resource::Resource;

/// Hard-constraint check for one resource against a job's requirements.
///
/// Absent constraints do not filter: a job with no price ceiling accepts
/// any price, a call with no geo radius ignores location, and so on.
pub fn meets_requirements(resource: &Resource, req: &JobRequirements, opts: &MatchOptions) -> bool {
    if !resource.active {
        return false;
    }
    if resource.cpu_cores < req.min_cpu_cores
        || resource.memory_gb < req.min_memory_gb
        || resource.storage_gb < req.min_storage_gb
    {
        return false;
    }
    if req.needs_gpu {
        let Some(gpu) = &resource.gpu else {
            return false;
        };
        if gpu.count == 0 {
            return false;
        }
        if let Some(min_gpu_mem) = req.min_gpu_memory_gb {
            match gpu.memory_gb {
                Some(mem) if mem >= min_gpu_mem => {}
                _ => return false,
            }
        }
    }
    if let Some(ceiling) = opts.max_price.or(req.max_price) {
        if resource.price_per_unit > ceiling {
            return false;
        }
    }
    if let (Some(near), Some(radius_km)) = (&opts.near, opts.max_distance_km) {
        match &resource.location {
            Some(loc) if near.distance_km(loc) <= radius_km => {}
            _ => return false,
        }
    }
    if !opts.tags.is_empty() && !opts.tags.iter().any(|t| resource.tags.contains(t)) {
        return false;
    }
    true
}
