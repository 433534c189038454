// Script Generator Port

use crate::domain::TargetDuration;
use crate::error::Result;
use async_trait::async_trait;

/// Writes a short spoken-style script for a topic
#[async_trait]
pub trait ScriptGenerator: Send + Sync {
    /// # Errors
    /// - AppError::Provider if the model endpoint returns non-success (body included)
    /// - AppError::Transport if the request never got a response
    async fn generate(&self, topic: &str, duration: TargetDuration) -> Result<String>;
}

pub mod mocks {
    use super::*;
    use crate::error::AppError;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Mutex;

    pub struct MockScriptGenerator {
        response: std::result::Result<String, String>,
        calls: AtomicUsize,
        last_duration: Mutex<Option<TargetDuration>>,
    }

    impl MockScriptGenerator {
        pub fn new_success(script: impl Into<String>) -> Self {
            Self {
                response: Ok(script.into()),
                calls: AtomicUsize::new(0),
                last_duration: Mutex::new(None),
            }
        }

        pub fn new_fail(message: impl Into<String>) -> Self {
            Self {
                response: Err(message.into()),
                calls: AtomicUsize::new(0),
                last_duration: Mutex::new(None),
            }
        }

        pub fn call_count(&self) -> usize {
            self.calls.load(Ordering::SeqCst)
        }

        pub fn last_duration(&self) -> Option<TargetDuration> {
            *self.last_duration.lock().unwrap()
        }
    }

    #[async_trait]
    impl ScriptGenerator for MockScriptGenerator {
        async fn generate(&self, _topic: &str, duration: TargetDuration) -> Result<String> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            *self.last_duration.lock().unwrap() = Some(duration);
            self.response
                .clone()
                .map_err(|msg| AppError::provider("OpenAI", msg))
        }
    }
}
