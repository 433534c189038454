// Application Layer - Use Cases and Business Logic

pub mod job_service;
pub mod maintenance;
pub mod pipeline;
pub mod poll;
pub mod remote_render;
pub mod shutdown;

// Re-exports
pub use job_service::{CreateJobRequest, CreatedJob, FinalOutput, JobService};
pub use maintenance::RetentionScheduler;
pub use pipeline::{Orchestrator, PipelineAdapters};
pub use poll::{poll_until, PollOutcome, PollPolicy};
pub use remote_render::RemoteRenderAssembler;
pub use shutdown::{shutdown_channel, ShutdownSender, ShutdownToken};
