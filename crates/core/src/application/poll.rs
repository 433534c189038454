// Timed polling (remote render status)
use crate::error::Result;
use crate::port::Sleeper;
use std::future::Future;
use std::time::Duration;
use tracing::debug;

/// Fixed-interval polling budget
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PollPolicy {
    pub interval: Duration,
    pub max_attempts: u32,
}

impl PollPolicy {
    pub fn new(interval: Duration, max_attempts: u32) -> Self {
        Self {
            interval,
            max_attempts,
        }
    }

    /// Wall-clock budget spent sleeping if every attempt comes back pending
    pub fn budget(&self) -> Duration {
        self.interval * self.max_attempts
    }
}

impl Default for PollPolicy {
    fn default() -> Self {
        use crate::application::pipeline::constants::{
            RENDER_MAX_POLL_ATTEMPTS, RENDER_POLL_INTERVAL,
        };
        Self::new(RENDER_POLL_INTERVAL, RENDER_MAX_POLL_ATTEMPTS)
    }
}

/// Result of a polling run
#[derive(Debug, PartialEq, Eq)]
pub enum PollOutcome<T> {
    /// `check` produced a terminal value on the given attempt
    Ready { value: T, attempts: u32 },
    /// Every attempt came back pending
    Exhausted { attempts: u32 },
}

/// Sleep `policy.interval`, then run `check`, up to `policy.max_attempts` times
///
/// `check` returns `Ok(None)` while still pending. Errors from `check` end the
/// loop immediately and are returned unchanged.
pub async fn poll_until<T, F, Fut>(
    policy: PollPolicy,
    sleeper: &dyn Sleeper,
    mut check: F,
) -> Result<PollOutcome<T>>
where
    F: FnMut(u32) -> Fut,
    Fut: Future<Output = Result<Option<T>>>,
{
    for attempt in 1..=policy.max_attempts {
        sleeper.sleep(policy.interval).await;

        if let Some(value) = check(attempt).await? {
            return Ok(PollOutcome::Ready {
                value,
                attempts: attempt,
            });
        }

        debug!(
            attempt = attempt,
            max_attempts = policy.max_attempts,
            "Poll attempt still pending"
        );
    }

    Ok(PollOutcome::Exhausted {
        attempts: policy.max_attempts,
    })
}
