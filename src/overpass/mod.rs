//! Overpass retrieval: query construction, retrying client, and the
//! resumable per-(region, category) harvest loop.

mod client;
mod harvest;
mod query;
mod retry;

pub use client::{FetchError, HttpTransport, OverpassClient, QueryTransport, TransportResponse};
pub use harvest::{harvest, HarvestSummary, PairFilter};
pub use query::build_query;
pub use retry::{FailureKind, RetryPolicy, RetryState, Sleeper, TokioSleeper};
