use thiserror::Error;

use crate::job::JobStatus;

#[derive(Error, Debug)]
pub enum GridError {
    #[error("Invalid status transition: {from} -> {to}")]
    InvalidTransition { from: JobStatus, to: JobStatus },

    #[error("Job not found: {0}")]
    JobNotFound(uuid::Uuid),

    #[error("Resource not found: {0}")]
    ResourceNotFound(uuid::Uuid),

    #[error("Repository error: {0}")]
    Repository(String),
}

pub type Result<T> = std::result::Result<T, GridError>;
