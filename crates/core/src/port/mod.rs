// Port Layer - Interfaces for external dependencies

pub mod artifact_store;
pub mod footage_source;
pub mod id_provider; // For deterministic testing
pub mod job_store;
pub mod media_probe;
pub mod render_service;
pub mod retention;
pub mod script_generator;
pub mod time_provider;
pub mod video_assembler;
pub mod voice_synthesizer;

// Re-exports
pub use artifact_store::ArtifactStore;
pub use footage_source::{FootageRequest, FootageSource, SelectionPolicy};
pub use id_provider::IdProvider;
pub use job_store::JobStore;
pub use media_probe::MediaProbe;
pub use render_service::{OutputSpec, RenderService, RenderSpec, RenderState, TimelineClip};
pub use retention::{ArtifactRetention, RetentionConfig, SweepStats};
pub use script_generator::ScriptGenerator;
pub use time_provider::{Sleeper, TimeProvider};
pub use video_assembler::{AssemblyInput, AssemblyStrategy, VideoAssembler};
pub use voice_synthesizer::VoiceSynthesizer;
