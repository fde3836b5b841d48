//! Concurrent, failure-tolerant match fetching.
//!
//! [`BatchFetcher`] runs a fixed number of workers over a shared cursor of
//! match ids. Matches that cannot be fetched are dropped and counted; if too
//! many are dropped, [`DegradePolicy`] picks a lower concurrency for a single
//! retry pass over the missing ids.

mod batch;
pub mod policy;

pub use batch::{BatchFetcher, BatchOutcome, BatchReport};
pub use policy::{DegradePolicy, drop_rate};
