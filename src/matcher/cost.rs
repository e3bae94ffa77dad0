use crate::job::JobRequirements;
use crate::resource::Resource;

const CPU_RATE_PER_CORE_HOUR: f64 = 0.1;
const MEMORY_RATE_PER_GB_HOUR: f64 = 0.05;
const STORAGE_RATE_PER_GB_HOUR: f64 = 0.02;
const GPU_RATE_PER_MEM_GB_HOUR: f64 = 0.5;
const MINIMUM_CHARGE: f64 = 1.0;

/// Cost of running a job on one resource for the given duration, per
/// the resource's pricing model.
pub fn resource_cost(resource: &Resource, duration_hours: f64) -> f64 {
    resource.price_per_unit * resource.pricing.billing_units(duration_hours)
}

/// Total estimated cost of a job across its selected resource set.
pub fn match_cost(resources: &[Resource], duration_hours: f64) -> f64 {
    resources.iter().map(|r| resource_cost(r, duration_hours)).sum()
}

/// Standalone estimate used to gate job submission before any matching
/// has happened, from requirements alone.
///
/// Linear per-dimension rates times duration, marked up or down by
/// priority relative to the default of 5, rounded to cents with a
/// minimum charge of one unit.
pub fn submission_estimate(requirements: &JobRequirements, priority: u8) -> f64 {
    let gpu_term = if requirements.needs_gpu {
        f64::from(requirements.min_gpu_memory_gb.unwrap_or(1)) * GPU_RATE_PER_MEM_GB_HOUR
    } else {
        0.0
    };
    let hourly = CPU_RATE_PER_CORE_HOUR * f64::from(requirements.min_cpu_cores)
        + MEMORY_RATE_PER_GB_HOUR * f64::from(requirements.min_memory_gb)
        + STORAGE_RATE_PER_GB_HOUR * f64::from(requirements.min_storage_gb)
        + gpu_term;
    let base = hourly * requirements.estimated_duration_hours;
    let premium = 1.0 + (f64::from(priority) - 5.0) / 10.0;
    let estimate = (base * premium * 100.0).round() / 100.0;
    estimate.max(MINIMUM_CHARGE)
}
