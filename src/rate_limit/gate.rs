//! Header-driven, multi-window admission gate.
//!
//! A [`RateGate`] is shared by every task that talks to one upstream method.
//! It starts with the development-key defaults and switches to whatever the
//! upstream advertises in `X-Method-Rate-Limit` the first time it sees the
//! header.
//!
//! # Example
//!
//! ```rust
//! use std::sync::Arc;
//! use riot_trends::rate_limit::RateGate;
//!
//! # #[tokio::main(flavor = "current_thread")]
//! # async fn main() {
//! let gate = Arc::new(RateGate::new());
//! gate.admit_one().await;
//! assert_eq!(gate.recorded_calls().await, 1);
//! # }
//! ```

use std::collections::VecDeque;
use std::sync::Arc;
use std::time::Duration;

use reqwest::header::HeaderMap;
use tokio::sync::Mutex;
use tokio::time::Instant;
use tracing::{debug, info};

use crate::rate_limit::WindowSet;
use crate::rate_limit::limits;

/// Response header carrying the per-method window list.
pub const METHOD_RATE_LIMIT_HEADER: &str = "x-method-rate-limit";

/// Response header carrying the upstream-suggested retry delay in seconds.
pub const RETRY_AFTER_HEADER: &str = "retry-after";

/// Sliding multi-window rate gate.
///
/// Admission and timestamp recording happen under a single lock, so two
/// tasks can never both claim the last free slot of a window.
#[derive(Debug)]
pub struct RateGate {
    state: Mutex<GateState>,
}

#[derive(Debug)]
struct GateState {
    /// Call timestamps, oldest first
    hits: VecDeque<Instant>,
    /// Current window configuration, replaced wholesale when learned
    windows: Arc<WindowSet>,
    /// Whether the configuration came from the upstream
    learned: bool,
}

impl GateState {
    fn new(windows: WindowSet) -> Self {
        Self {
            hits: VecDeque::new(),
            windows: Arc::new(windows),
            learned: false,
        }
    }

    /// Drop hits that no window can see any more.
    fn prune(&mut self, now: Instant) {
        let horizon = self.windows.widest();
        while let Some(oldest) = self.hits.front() {
            if now.saturating_duration_since(*oldest) >= horizon {
                self.hits.pop_front();
            } else {
                break;
            }
        }
    }

    /// Admit a call at `now` or report how long to wait.
    ///
    /// The wait is the maximum over all saturated windows of the time until
    /// the oldest call inside that window ages out.
    fn try_admit(&mut self, now: Instant) -> Result<(), Duration> {
        self.prune(now);

        let mut wait = Duration::ZERO;
        for window in self.windows.iter() {
            let inside = self
                .hits
                .iter()
                .rev()
                .take_while(|ts| now.saturating_duration_since(**ts) < window.period)
                .count();

            if inside >= window.capacity as usize {
                let oldest = self.hits[self.hits.len() - inside];
                let remaining = window
                    .period
                    .saturating_sub(now.saturating_duration_since(oldest));
                wait = wait.max(remaining.max(limits::MIN_GATE_WAIT));
            }
        }

        if wait.is_zero() {
            self.hits.push_back(now);
            Ok(())
        } else {
            Err(wait)
        }
    }
}

impl RateGate {
    /// Create a gate with the default development-key windows.
    pub fn new() -> Self {
        Self::with_windows(WindowSet::default())
    }

    /// Create a gate with an explicit starting configuration.
    pub fn with_windows(windows: WindowSet) -> Self {
        Self {
            state: Mutex::new(GateState::new(windows)),
        }
    }

    /// Wait until one more call fits in every window, then record it.
    ///
    /// The lock is released while sleeping; after waking the decision is
    /// re-evaluated because another task may have taken the slot, or a
    /// different window may now be the binding one.
    pub async fn admit_one(&self) {
        loop {
            let mut state = self.state.lock().await;
            match state.try_admit(Instant::now()) {
                Ok(()) => return,
                Err(wait) => {
                    drop(state);
                    debug!(wait_ms = wait.as_millis() as u64, "rate gate saturated");
                    tokio::time::sleep(wait).await;
                }
            }
        }
    }

    /// Learn the window configuration from response headers.
    ///
    /// Only the first parseable `X-Method-Rate-Limit` value is applied;
    /// the configuration is fixed afterwards.
    pub async fn record_server_feedback(&self, headers: &HeaderMap) {
        let mut state = self.state.lock().await;
        if state.learned {
            return;
        }

        let Some(raw) = headers
            .get(METHOD_RATE_LIMIT_HEADER)
            .and_then(|v| v.to_str().ok())
        else {
            return;
        };

        if let Some(windows) = WindowSet::parse(raw) {
            info!(windows = %windows, "learned upstream rate windows");
            state.windows = Arc::new(windows);
            state.learned = true;
            let now = Instant::now();
            state.prune(now);
        }
    }

    /// Sleep for the `Retry-After` delay if the response carries one.
    pub async fn apply_retry_after(&self, headers: &HeaderMap) {
        if let Some(delay) = retry_after(headers) {
            debug!(delay_ms = delay.as_millis() as u64, "honoring retry-after");
            tokio::time::sleep(delay).await;
        }
    }

    /// Snapshot of the active window configuration.
    pub async fn windows(&self) -> Arc<WindowSet> {
        self.state.lock().await.windows.clone()
    }

    /// Whether the configuration has been learned from the upstream.
    pub async fn is_learned(&self) -> bool {
        self.state.lock().await.learned
    }

    /// Number of calls still inside the widest window.
    pub async fn recorded_calls(&self) -> usize {
        let mut state = self.state.lock().await;
        state.prune(Instant::now());
        state.hits.len()
    }
}

impl Default for RateGate {
    fn default() -> Self {
        Self::new()
    }
}

/// Parse the `Retry-After` header.
///
/// Integral or fractional seconds are honored as-is; a present but
/// unparseable (or zero) value falls back to a short fixed pause.
pub fn retry_after(headers: &HeaderMap) -> Option<Duration> {
    let raw = headers.get(RETRY_AFTER_HEADER)?.to_str().ok()?.trim();
    if raw.is_empty() {
        return None;
    }
    match raw.parse::<f64>() {
        Ok(secs) if secs.is_finite() && secs > 0.0 => Some(Duration::from_secs_f64(secs)),
        _ => Some(limits::RETRY_AFTER_FALLBACK),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::rate_limit::RateWindow;
    use reqwest::header::HeaderValue;

    fn headers(name: &'static str, value: &str) -> HeaderMap {
        let mut map = HeaderMap::new();
        map.insert(name, HeaderValue::from_str(value).unwrap());
        map
    }

    #[test]
    fn test_try_admit_reports_wait_for_saturated_window() {
        let windows = WindowSet::new(vec![RateWindow::new(2, 1)]).unwrap();
        let mut state = GateState::new(windows);
        let start = Instant::now();

        assert!(state.try_admit(start).is_ok());
        assert!(state.try_admit(start + Duration::from_millis(100)).is_ok());

        let wait = state
            .try_admit(start + Duration::from_millis(200))
            .unwrap_err();
        assert_eq!(wait, Duration::from_millis(800));

        assert!(state.try_admit(start + Duration::from_millis(1000)).is_ok());
    }

    #[test]
    fn test_try_admit_takes_max_across_windows() {
        let windows = WindowSet::new(vec![RateWindow::new(1, 1), RateWindow::new(2, 10)]).unwrap();
        let mut state = GateState::new(windows);
        let start = Instant::now();

        assert!(state.try_admit(start).is_ok());
        assert!(state.try_admit(start + Duration::from_secs(2)).is_ok());

        // The 1s window is clear but the 10s window is full until start + 10s.
        let wait = state.try_admit(start + Duration::from_secs(3)).unwrap_err();
        assert_eq!(wait, Duration::from_secs(7));
    }

    #[tokio::test(start_paused = true)]
    async fn test_admit_one_sleeps_until_capacity() {
        let gate = RateGate::with_windows(WindowSet::new(vec![RateWindow::new(3, 1)]).unwrap());
        let start = Instant::now();

        for _ in 0..3 {
            gate.admit_one().await;
        }
        assert_eq!(start.elapsed(), Duration::ZERO);

        gate.admit_one().await;
        assert!(start.elapsed() >= Duration::from_secs(1));
    }

    #[tokio::test]
    async fn test_feedback_is_learned_once() {
        let gate = RateGate::new();
        assert!(!gate.is_learned().await);

        gate.record_server_feedback(&headers(METHOD_RATE_LIMIT_HEADER, "2000:10"))
            .await;
        assert!(gate.is_learned().await);
        assert_eq!(gate.windows().await.to_string(), "2000:10");

        gate.record_server_feedback(&headers(METHOD_RATE_LIMIT_HEADER, "1:1"))
            .await;
        assert_eq!(gate.windows().await.to_string(), "2000:10");
    }

    #[tokio::test]
    async fn test_unparseable_feedback_keeps_defaults() {
        let gate = RateGate::new();
        gate.record_server_feedback(&headers(METHOD_RATE_LIMIT_HEADER, "garbage"))
            .await;
        assert!(!gate.is_learned().await);
        assert_eq!(*gate.windows().await, WindowSet::default());
    }

    #[test]
    fn test_retry_after_parsing() {
        assert_eq!(
            retry_after(&headers(RETRY_AFTER_HEADER, "2")),
            Some(Duration::from_secs(2))
        );
        assert_eq!(
            retry_after(&headers(RETRY_AFTER_HEADER, "soon")),
            Some(limits::RETRY_AFTER_FALLBACK)
        );
        assert_eq!(retry_after(&HeaderMap::new()), None);
    }
}
