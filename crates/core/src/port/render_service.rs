// Render Service Port (remote-render strategy)

use crate::error::Result;
use async_trait::async_trait;
use serde::{Deserialize, Serialize};

/// One clip placed on the render timeline
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TimelineClip {
    pub src: String,
    /// Seconds from the start of the output
    pub start: f64,
    /// Seconds of this clip used
    pub length: f64,
}

/// Output container and frame size
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OutputSpec {
    pub format: String,
    pub width: u32,
    pub height: u32,
}

impl Default for OutputSpec {
    /// Vertical 1080x1920 mp4
    fn default() -> Self {
        Self {
            format: "mp4".to_string(),
            width: 1080,
            height: 1920,
        }
    }
}

/// Render job description
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RenderSpec {
    pub clips: Vec<TimelineClip>,
    /// Fit policy applied to every clip ("cover" crops to fill the frame)
    pub fit: String,
    pub soundtrack_url: Option<String>,
    pub output: OutputSpec,
}

/// Render service status
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RenderState {
    /// queued, fetching, rendering, saving, ...
    InProgress(String),
    Done { url: String },
    Failed { message: String },
}

#[async_trait]
pub trait RenderService: Send + Sync {
    /// Submit a render, returning its id
    async fn submit(&self, spec: &RenderSpec) -> Result<String>;

    /// Current status of a submitted render
    async fn status(&self, render_id: &str) -> Result<RenderState>;
}

pub mod mocks {
    use super::*;
    use std::collections::VecDeque;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Mutex;

    /// Plays back a scripted sequence of states; the last one repeats forever
    pub struct ScriptedRenderService {
        states: Mutex<VecDeque<RenderState>>,
        submitted: Mutex<Vec<RenderSpec>>,
        polls: AtomicUsize,
    }

    impl ScriptedRenderService {
        pub fn new(states: Vec<RenderState>) -> Self {
            Self {
                states: Mutex::new(states.into()),
                submitted: Mutex::new(Vec::new()),
                polls: AtomicUsize::new(0),
            }
        }

        /// Never leaves "rendering"
        pub fn stuck() -> Self {
            Self::new(vec![RenderState::InProgress("rendering".to_string())])
        }

        pub fn poll_count(&self) -> usize {
            self.polls.load(Ordering::SeqCst)
        }

        pub fn submitted(&self) -> Vec<RenderSpec> {
            self.submitted.lock().unwrap().clone()
        }
    }

    #[async_trait]
    impl RenderService for ScriptedRenderService {
        async fn submit(&self, spec: &RenderSpec) -> Result<String> {
            self.submitted.lock().unwrap().push(spec.clone());
            Ok("render-1".to_string())
        }

        async fn status(&self, _render_id: &str) -> Result<RenderState> {
            self.polls.fetch_add(1, Ordering::SeqCst);
            let mut states = self.states.lock().unwrap();
            let state = if states.len() > 1 {
                states.pop_front()
            } else {
                states.front().cloned()
            };
            Ok(state.unwrap_or_else(|| RenderState::InProgress("queued".to_string())))
        }
    }
}
