use std::time::Duration;

use reqwest::header::HeaderMap;
use tokio::sync::{Mutex, MutexGuard};

use crate::consts::RATE_LIMIT_HEADER;

/// Client-wide throttle state: one exclusive request slot plus the
/// cool-down entered when the remote reports an exhausted window.
///
/// The slot is scoped to the owning client, not per endpoint. Holding
/// the guard across the request and any cool-down sleep keeps the
/// remaining-calls check race-free.
#[derive(Debug)]
pub struct RateLimiter {
    slot: Mutex<()>,
    cooldown: Duration,
}

impl RateLimiter {
    pub fn new(cooldown: Duration) -> RateLimiter {
        RateLimiter {
            slot: Mutex::new(()),
            cooldown,
        }
    }

    /// Take the exclusive slot. Dropping the guard releases it, so
    /// every exit path of the caller gives it back.
    pub async fn acquire(&self) -> MutexGuard<'_, ()> {
        self.slot.lock().await
    }

    pub fn cooldown(&self) -> Duration {
        self.cooldown
    }

    /// Sit out the cool-down window. Callers keep the slot guard alive
    /// while awaiting this so no other request can start early.
    pub async fn cool_down(&self) {
        tokio::time::sleep(self.cooldown).await;
    }
}

/// Remaining calls reported by the response, if the endpoint reports
/// any. An absent or unparseable header counts as "not throttled".
pub fn remaining_calls(headers: &HeaderMap) -> Option<u32> {
    headers
        .get(RATE_LIMIT_HEADER)
        .and_then(|value| value.to_str().ok())
        .and_then(|value| value.trim().parse().ok())
}
