// Reelforge Infrastructure - In-Memory Adapters
// Implements: JobStore, ArtifactStore (process lifetime only)

mod artifact_store;
mod job_store;

pub use artifact_store::MemoryArtifactStore;
pub use job_store::InMemoryJobStore;
