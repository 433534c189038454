// Voice Synthesizer Port

use crate::error::Result;
use async_trait::async_trait;

/// Turns a script into encoded speech (MP3 bytes)
#[async_trait]
pub trait VoiceSynthesizer: Send + Sync {
    /// `voice` is a logical key such as "female_1"; unknown keys use the default voice
    async fn synthesize(&self, script: &str, voice: &str) -> Result<Vec<u8>>;
}

pub mod mocks {
    use super::*;
    use crate::error::AppError;
    use std::sync::atomic::{AtomicUsize, Ordering};

    pub struct MockVoiceSynthesizer {
        response: std::result::Result<Vec<u8>, String>,
        calls: AtomicUsize,
    }

    impl MockVoiceSynthesizer {
        pub fn new_success(audio: Vec<u8>) -> Self {
            Self {
                response: Ok(audio),
                calls: AtomicUsize::new(0),
            }
        }

        pub fn new_fail(message: impl Into<String>) -> Self {
            Self {
                response: Err(message.into()),
                calls: AtomicUsize::new(0),
            }
        }

        pub fn call_count(&self) -> usize {
            self.calls.load(Ordering::SeqCst)
        }
    }

    #[async_trait]
    impl VoiceSynthesizer for MockVoiceSynthesizer {
        async fn synthesize(&self, _script: &str, _voice: &str) -> Result<Vec<u8>> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            self.response
                .clone()
                .map_err(|msg| AppError::provider("ElevenLabs", msg))
        }
    }
}
