// Domain Layer - Pure business logic and entities

pub mod artifact;
pub mod error;
pub mod job;

// Re-exports
pub use artifact::{AudioArtifact, ClipDescriptor, FinalArtifact, FootageArtifact};
pub use error::DomainError;
pub use job::{Job, JobId, JobParams, JobStatus, JobStatusView, TargetDuration};
