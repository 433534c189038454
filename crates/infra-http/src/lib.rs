// Reelforge Infrastructure - HTTP Provider Adapters
// Implements: ScriptGenerator, VoiceSynthesizer, FootageSource, RenderService

pub mod client;
pub mod elevenlabs;
pub mod openai;
pub mod pexels;
pub mod shotstack;

#[cfg(test)]
pub(crate) mod canned;

pub use client::build_client;
pub use elevenlabs::ElevenLabsVoiceSynthesizer;
pub use openai::OpenAiScriptGenerator;
pub use pexels::{FootageMode, PexelsFootageSource};
pub use reqwest::Client as HttpClient;
pub use shotstack::{ShotstackEnv, ShotstackRenderService};
