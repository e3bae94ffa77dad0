use std::collections::HashMap;
use std::sync::atomic::{AtomicU64, Ordering};

use async_trait::async_trait;
use tokio::sync::RwLock;
use uuid::Uuid;

use crate::error::{GridError, Result};
use crate::job::JobRequirements;
use crate::matcher::filter::meets_requirements;
use crate::matcher::MatchOptions;
use crate::resource::Resource;
use crate::store::ResourceRepository;

/// In-memory resource registry.
///
/// Reference implementation of [`ResourceRepository`]; a deployment
/// backs the trait with its own persistence layer instead.
#[derive(Debug, Default)]
pub struct ResourcePool {
    resources: RwLock<HashMap<Uuid, PoolEntry>>,
    next_seq: AtomicU64,
}

/// A stored resource with its registration sequence number. The
/// sequence is the repository order returned by `find_available`.
#[derive(Debug)]
struct PoolEntry {
    seq: u64,
    resource: Resource,
}

impl ResourcePool {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add or replace a resource advertisement. Re-registering moves
    /// the resource to the back of the repository order.
    pub async fn register(&self, resource: Resource) -> Uuid {
        let id = resource.id;
        let seq = self.next_seq.fetch_add(1, Ordering::Relaxed);
        self.resources
            .write()
            .await
            .insert(id, PoolEntry { seq, resource });
        tracing::info!(resource_id = %id, "Resource registered");
        id
    }

    /// Toggle a resource's visibility to matching.
    pub async fn set_active(&self, id: Uuid, active: bool) -> Result<()> {
        let mut resources = self.resources.write().await;
        let entry = resources.get_mut(&id).ok_or(GridError::ResourceNotFound(id))?;
        entry.resource.active = active;
        Ok(())
    }

    pub async fn remove(&self, id: Uuid) -> Option<Resource> {
        self.resources.write().await.remove(&id).map(|e| e.resource)
    }

    pub async fn len(&self) -> usize {
        self.resources.read().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.resources.read().await.is_empty()
    }
}

#[async_trait]
impl ResourceRepository for ResourcePool {
    async fn find_available(
        &self,
        requirements: &JobRequirements,
        options: &MatchOptions,
    ) -> Result<Vec<Resource>> {
        let resources = self.resources.read().await;
        let mut matching: Vec<(u64, Resource)> = resources
            .values()
            .filter(|e| meets_requirements(&e.resource, requirements, options))
            .map(|e| (e.seq, e.resource.clone()))
            .collect();
        // Registration order is the repository order; equal-score
        // candidates keep it through the scorer's stable sort.
        matching.sort_by_key(|(seq, _)| *seq);
        Ok(matching.into_iter().map(|(_, r)| r).collect())
    }

    async fn get(&self, id: Uuid) -> Result<Option<Resource>> {
        Ok(self.resources.read().await.get(&id).map(|e| e.resource.clone()))
    }

    async fn record_job_outcome(&self, id: Uuid, success: bool, compute_hours: f64) -> Result<()> {
        let mut resources = self.resources.write().await;
        let entry = resources.get_mut(&id).ok_or(GridError::ResourceNotFound(id))?;
        entry.resource.metrics.record_outcome(success, compute_hours);
        tracing::debug!(
            resource_id = %id,
            success,
            reliability = entry.resource.metrics.reliability,
            "Resource metrics updated"
        );
        Ok(())
    }
}
