// Reelforge Infrastructure - System Adapters
// Implements: MediaProbe, VideoAssembler (local mux), ArtifactStore, ArtifactRetention

pub mod ffmpeg;
pub mod ffprobe;
pub mod fs_artifacts;
pub mod process;
pub mod retention;

pub use ffmpeg::{FfmpegMuxAssembler, MuxSettings};
pub use ffprobe::FfprobeMediaProbe;
pub use fs_artifacts::FsArtifactStore;
pub use process::{ProcessOutput, ProcessRunner};
pub use retention::FsArtifactRetention;
