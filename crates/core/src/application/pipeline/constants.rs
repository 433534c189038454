// Pipeline constants (No magic values)
use std::time::Duration;

/// Delay between render status polls (2s)
pub const RENDER_POLL_INTERVAL: Duration = Duration::from_secs(2);

/// Render status polls before giving up (60 x 2s = ~2 minutes)
pub const RENDER_MAX_POLL_ATTEMPTS: u32 = 60;

/// Clips placed on a remote render timeline
pub const MAX_TIMELINE_CLIPS: usize = 3;

/// Seconds of each clip used on the remote timeline
pub const MAX_CLIP_SECONDS: f64 = 5.0;

/// Maximum topic length accepted at creation
pub const MAX_TOPIC_CHARS: usize = 500;

pub const MSG_QUEUED: &str = "Job queued";
pub const MSG_GENERATING_SCRIPT: &str = "Generating script...";
pub const MSG_GENERATING_VOICE: &str = "Generating voiceover...";
pub const MSG_FETCHING_FOOTAGE: &str = "Fetching stock footage...";
pub const MSG_ASSEMBLING_VIDEO: &str = "Assembling video...";
pub const MSG_COMPLETED: &str = "Video ready";
