pub mod config;
pub mod error;
pub mod job;
pub mod matcher;
pub mod resource;
pub mod scheduler;
pub mod store;

pub use config::{MatcherConfig, SchedulerConfig, ScoreWeights};
pub use error::{GridError, Result};
pub use job::{Job, JobRequirements, JobStatus, JobTopology};
pub use matcher::{MatchOptions, MatchResult, Matcher};
pub use resource::{Availability, GeoPoint, PricingModel, Resource};
pub use scheduler::{Scheduler, SchedulingSummary};
pub use store::{JobRepository, JobStore, ResourcePool, ResourceRepository};
