//! Rate limiting for the Riot API.
//!
//! Riot enforces several rolling windows per method at once (for example
//! 20 calls per second *and* 100 calls per two minutes) and advertises the
//! exact windows for the current key in response headers. Going over any of
//! them earns a 429, and repeated 429s get the key blacklisted, so every
//! request in this crate passes through a shared [`RateGate`].
//!
//! ## Components
//!
//! - [`WindowSet`]: parsed `capacity:seconds` window list
//! - [`RateGate`]: mutex-guarded admission over all windows at once
//! - [`RetryPolicy`]: exponential backoff with jitter for 429/5xx
//!
//! ## Example
//!
//! ```rust
//! use std::sync::Arc;
//! use riot_trends::rate_limit::{RateGate, RateWindow, WindowSet};
//!
//! // A gate shared by every worker talking to the match endpoints
//! let windows = WindowSet::new(vec![RateWindow::new(20, 1), RateWindow::new(100, 120)]).unwrap();
//! let gate = Arc::new(RateGate::with_windows(windows));
//! ```

mod gate;
mod retry;
mod window;

pub use gate::{METHOD_RATE_LIMIT_HEADER, RETRY_AFTER_HEADER, RateGate, retry_after};
pub use retry::RetryPolicy;
pub use window::{RateWindow, WindowSet};

/// Rate limit and retry constants.
pub mod limits {
    use std::time::Duration;

    /// Development key: calls per second.
    pub const DEFAULT_SHORT_CAPACITY: u32 = 20;
    /// Development key: short window length.
    pub const DEFAULT_SHORT_SECONDS: u64 = 1;
    /// Development key: calls per two minutes.
    pub const DEFAULT_LONG_CAPACITY: u32 = 100;
    /// Development key: long window length.
    pub const DEFAULT_LONG_SECONDS: u64 = 120;

    /// Smallest wait reported by a saturated gate.
    pub const MIN_GATE_WAIT: Duration = Duration::from_millis(1);
    /// Pause used when `Retry-After` is present but unparseable.
    pub const RETRY_AFTER_FALLBACK: Duration = Duration::from_millis(500);

    /// Attempts per logical request, including the first.
    pub const MAX_ATTEMPTS: u32 = 6;
    /// Backoff base delay.
    pub const BACKOFF_BASE: Duration = Duration::from_millis(400);
    /// Backoff ceiling.
    pub const BACKOFF_CAP: Duration = Duration::from_secs(8);
    /// Maximum random jitter added to a backoff.
    pub const BACKOFF_JITTER: Duration = Duration::from_millis(300);
}
