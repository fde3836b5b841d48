//! Concurrent match fetching over a shared cursor.

use std::collections::HashSet;
use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};

use tokio::task::JoinSet;
use tracing::{debug, info, instrument, warn};

use crate::error::TrendsError;
use crate::fetch::policy::{DegradePolicy, drop_rate};
use crate::riot::{MatchSource, ResolvedMatch};

/// Summary of one `fetch_all` run, for logs and metrics.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct BatchReport {
    /// Ids requested (after removing duplicates)
    pub requested: usize,
    /// Matches returned
    pub resolved: usize,
    /// Ids that could not be resolved after every pass
    pub dropped: usize,
    /// Resolved matches whose timeline could not be fetched
    pub timelines_missing: usize,
    /// Whether a degraded retry pass ran
    pub degraded: bool,
    /// Concurrency of the last pass
    pub final_concurrency: usize,
}

/// Matches resolved by a batch plus its report.
#[derive(Debug)]
pub struct BatchOutcome {
    /// Resolved matches, unique by id, in no particular order
    pub matches: Vec<ResolvedMatch>,
    /// One [`TrendsError::TimelineUnavailable`] per kept match without a timeline
    pub timeline_failures: Vec<TrendsError>,
    /// Run summary
    pub report: BatchReport,
}

/// Fetches many matches with a fixed number of concurrent workers.
///
/// Workers claim ids from an atomic cursor, so no id is fetched twice in a
/// pass. Per-match failures are counted as drops and never abort the batch.
#[derive(Debug)]
pub struct BatchFetcher<S> {
    source: Arc<S>,
    policy: DegradePolicy,
}

/// A match resolved for the id a worker claimed.
struct Claimed {
    id: String,
    resolved: ResolvedMatch,
    timeline_failure: Option<TrendsError>,
}

#[derive(Default)]
struct PassOutput {
    claimed: Vec<Claimed>,
    dropped: usize,
}

impl<S> BatchFetcher<S>
where
    S: MatchSource + 'static,
{
    /// Create a fetcher with the default degradation policy.
    pub fn new(source: Arc<S>) -> Self {
        Self::with_policy(source, DegradePolicy::default())
    }

    /// Create a fetcher with a custom degradation policy.
    pub fn with_policy(source: Arc<S>, policy: DegradePolicy) -> Self {
        Self { source, policy }
    }

    /// Fetch every id, degrading once if too many are dropped.
    #[instrument(skip_all, fields(ids = ids.len(), concurrency = concurrency))]
    pub async fn fetch_all(&self, ids: &[String], concurrency: usize) -> BatchOutcome {
        let mut seen = HashSet::with_capacity(ids.len());
        let requested: Vec<String> = ids
            .iter()
            .filter(|id| seen.insert(id.as_str()))
            .cloned()
            .collect();

        let mut merged = Merged::with_capacity(requested.len());
        let mut concurrency = concurrency.max(1);

        let first = self.run_pass(requested.clone(), concurrency).await;
        merged.extend(first.claimed);

        let dropped = requested.len().saturating_sub(merged.ids.len());
        let rate = drop_rate(requested.len(), dropped);
        let mut degraded = false;

        if let Some(next) = self.policy.next_concurrency(rate, concurrency) {
            let missing: Vec<String> = requested
                .iter()
                .filter(|id| !merged.ids.contains(id.as_str()))
                .cloned()
                .collect();

            info!(
                dropped,
                drop_rate = rate,
                from = concurrency,
                to = next,
                "high drop rate, retrying missing matches once"
            );

            concurrency = next;
            degraded = true;
            let retry = self.run_pass(missing, concurrency).await;
            merged.extend(retry.claimed);
        }

        let Merged {
            ids: resolved_ids,
            matches,
            timeline_failures,
        } = merged;
        let report = BatchReport {
            requested: requested.len(),
            resolved: matches.len(),
            dropped: requested.len().saturating_sub(resolved_ids.len()),
            timelines_missing: timeline_failures.len(),
            degraded,
            final_concurrency: concurrency,
        };

        info!(
            requested = report.requested,
            resolved = report.resolved,
            dropped = report.dropped,
            degraded = report.degraded,
            "batch fetch finished"
        );

        BatchOutcome {
            matches,
            timeline_failures,
            report,
        }
    }

    /// One pass over `ids` with `concurrency` spawned workers.
    async fn run_pass(&self, ids: Vec<String>, concurrency: usize) -> PassOutput {
        if ids.is_empty() {
            return PassOutput::default();
        }

        let total = ids.len();
        let ids = Arc::new(ids);
        let cursor = Arc::new(AtomicUsize::new(0));
        let workers = concurrency.clamp(1, ids.len());
        let mut set = JoinSet::new();

        for _ in 0..workers {
            let source = self.source.clone();
            let ids = ids.clone();
            let cursor = cursor.clone();

            set.spawn(async move {
                let mut out = PassOutput::default();
                loop {
                    let idx = cursor.fetch_add(1, Ordering::Relaxed);
                    let Some(id) = ids.get(idx) else {
                        break;
                    };

                    match resolve(source.as_ref(), id).await {
                        Ok(claimed) => out.claimed.push(claimed),
                        Err(error) => {
                            warn!(
                                match_id = %id,
                                reason = error.drop_reason(),
                                error = %error,
                                "dropping match"
                            );
                            out.dropped += 1;
                        }
                    }
                }
                out
            });
        }

        let mut output = PassOutput::default();
        while let Some(joined) = set.join_next().await {
            match joined {
                Ok(worker) => {
                    output.claimed.extend(worker.claimed);
                    output.dropped += worker.dropped;
                }
                Err(error) => warn!(error = %error, "fetch worker failed"),
            }
        }

        debug!(
            ids = total,
            workers,
            resolved = output.claimed.len(),
            dropped = output.dropped,
            "fetch pass finished"
        );
        output
    }
}

/// Fetch a match and, best-effort, its timeline.
async fn resolve<S: MatchSource>(source: &S, match_id: &str) -> Result<Claimed, TrendsError> {
    let detail = source.match_detail(match_id).await?;

    let (timeline, timeline_failure) = match source.match_timeline(match_id).await {
        Ok(timeline) => (Some(timeline), None),
        Err(error) => {
            warn!(match_id, error = %error, "timeline unavailable, objective takedowns skipped");
            let failure = TrendsError::TimelineUnavailable {
                match_id: match_id.to_string(),
            };
            (None, Some(failure))
        }
    };

    Ok(Claimed {
        id: match_id.to_string(),
        resolved: ResolvedMatch { detail, timeline },
        timeline_failure,
    })
}

/// Matches merged across passes, keyed on the id each worker claimed.
struct Merged {
    ids: HashSet<String>,
    matches: Vec<ResolvedMatch>,
    timeline_failures: Vec<TrendsError>,
}

impl Merged {
    fn with_capacity(capacity: usize) -> Self {
        Self {
            ids: HashSet::with_capacity(capacity),
            matches: Vec::with_capacity(capacity),
            timeline_failures: Vec::new(),
        }
    }

    fn extend(&mut self, incoming: Vec<Claimed>) {
        for claimed in incoming {
            if self.ids.insert(claimed.id) {
                self.matches.push(claimed.resolved);
                self.timeline_failures.extend(claimed.timeline_failure);
            }
        }
    }
}
