//! Cached facade over the raw `akeno_client` gateway: read-through
//! tweet/user lookups, typed views over cached payloads, and the
//! uncached mutation actions.

mod cache;
mod client;
mod tweet;
mod user;
mod util;

pub use akeno_client::{Error, HttpClient, Result, Transport, UserField};

pub use crate::cache::{Cache, CacheKey};
pub use crate::client::AkenoClient;
pub use crate::tweet::{Tweet, TweetMetrics};
pub use crate::user::{User, UserMetrics};
