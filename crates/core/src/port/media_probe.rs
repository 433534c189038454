// Media Probe Port

use crate::error::Result;
use async_trait::async_trait;
use std::path::Path;

/// Measures media files
#[async_trait]
pub trait MediaProbe: Send + Sync {
    /// Exact duration of the media file in seconds
    async fn duration_secs(&self, path: &Path) -> Result<f64>;
}

pub mod mocks {
    use super::*;
    use crate::error::AppError;
    use std::sync::atomic::{AtomicUsize, Ordering};

    pub struct MockMediaProbe {
        duration: Option<f64>,
        calls: AtomicUsize,
    }

    impl MockMediaProbe {
        pub fn new(duration_secs: f64) -> Self {
            Self {
                duration: Some(duration_secs),
                calls: AtomicUsize::new(0),
            }
        }

        pub fn new_fail() -> Self {
            Self {
                duration: None,
                calls: AtomicUsize::new(0),
            }
        }

        pub fn call_count(&self) -> usize {
            self.calls.load(Ordering::SeqCst)
        }
    }

    #[async_trait]
    impl MediaProbe for MockMediaProbe {
        async fn duration_secs(&self, path: &Path) -> Result<f64> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            self.duration.ok_or_else(|| {
                AppError::Assembly(format!("ffprobe could not read {}", path.display()))
            })
        }
    }
}
