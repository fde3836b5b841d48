//! Rate window definitions.
//!
//! Riot advertises its limits as a comma-separated list of `capacity:seconds`
//! pairs, e.g. `20:1,100:120` meaning "20 calls per second and 100 calls per
//! two minutes". A [`WindowSet`] is the parsed, immutable form of that list.
//!
//! # Example
//!
//! ```rust
//! use std::time::Duration;
//! use riot_trends::rate_limit::WindowSet;
//!
//! let windows = WindowSet::parse("100:120,20:1").unwrap();
//! assert_eq!(windows.len(), 2);
//! assert_eq!(windows.widest(), Duration::from_secs(120));
//! ```

use std::fmt;
use std::time::Duration;

use crate::rate_limit::limits;

/// A single `(capacity, period)` pair: at most `capacity` calls per rolling `period`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RateWindow {
    /// Maximum calls admitted within one period
    pub capacity: u32,
    /// Length of the rolling period
    pub period: Duration,
}

impl RateWindow {
    /// Create a window from a capacity and a period in seconds.
    pub fn new(capacity: u32, seconds: u64) -> Self {
        Self {
            capacity,
            period: Duration::from_secs(seconds),
        }
    }

    /// Parse one `capacity:seconds` pair.
    fn parse_pair(raw: &str) -> Option<Self> {
        let (cap, sec) = raw.trim().split_once(':')?;
        let capacity = cap.trim().parse::<u32>().ok()?;
        let seconds = sec.trim().parse::<u64>().ok()?;
        if capacity == 0 || seconds == 0 {
            return None;
        }
        Some(Self::new(capacity, seconds))
    }
}

impl fmt::Display for RateWindow {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.capacity, self.period.as_secs())
    }
}

/// An ordered, non-empty set of rate windows, narrowest period first.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WindowSet {
    windows: Vec<RateWindow>,
}

impl WindowSet {
    /// Build a window set. Returns `None` when `windows` is empty.
    pub fn new(mut windows: Vec<RateWindow>) -> Option<Self> {
        if windows.is_empty() {
            return None;
        }
        windows.sort_by_key(|w| w.period);
        Some(Self { windows })
    }

    /// Parse a `capacity:seconds[,capacity:seconds...]` header value.
    ///
    /// Malformed pairs are skipped. Returns `None` if nothing usable remains.
    pub fn parse(raw: &str) -> Option<Self> {
        let windows = raw
            .split(',')
            .filter_map(RateWindow::parse_pair)
            .collect::<Vec<_>>();
        Self::new(windows)
    }

    /// Iterate over the windows, narrowest first.
    pub fn iter(&self) -> impl Iterator<Item = &RateWindow> {
        self.windows.iter()
    }

    /// Number of windows.
    pub fn len(&self) -> usize {
        self.windows.len()
    }

    /// Always false; a window set holds at least one window.
    pub fn is_empty(&self) -> bool {
        self.windows.is_empty()
    }

    /// The longest period in the set; older call records are irrelevant.
    pub fn widest(&self) -> Duration {
        self.windows
            .last()
            .map(|w| w.period)
            .unwrap_or_default()
    }
}

impl Default for WindowSet {
    fn default() -> Self {
        Self {
            windows: vec![
                RateWindow::new(
                    limits::DEFAULT_SHORT_CAPACITY,
                    limits::DEFAULT_SHORT_SECONDS,
                ),
                RateWindow::new(limits::DEFAULT_LONG_CAPACITY, limits::DEFAULT_LONG_SECONDS),
            ],
        }
    }
}

impl fmt::Display for WindowSet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let parts = self.windows.iter().map(ToString::to_string).collect::<Vec<_>>();
        f.write_str(&parts.join(","))
    }
}
