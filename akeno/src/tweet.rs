use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::util::{parse_id, parse_timestamp};

/// Engagement counters reported under `data.public_metrics`.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct TweetMetrics {
    pub retweet_count: u32,
    pub reply_count: u32,
    pub like_count: u32,
    pub quote_count: u32,
    #[serde(default)]
    pub impression_count: u32,
    #[serde(default)]
    pub bookmark_count: u32,
}

/// Read-only view over a cached tweet payload.
///
/// Every accessor is a pure projection; a field the response did not
/// carry reads as `None`.
#[derive(Debug, Clone)]
pub struct Tweet {
    id: u64,
    data: Value,
}

impl Tweet {
    pub(crate) fn new(id: u64, data: Value) -> Tweet {
        Tweet { id, data }
    }

    /// Id the tweet was requested with.
    pub fn id(&self) -> u64 {
        self.id
    }

    pub fn text(&self) -> Option<&str> {
        self.field("text").and_then(Value::as_str)
    }

    pub fn created_at(&self) -> Option<DateTime<Utc>> {
        parse_timestamp(self.field("created_at")?)
    }

    pub fn author_id(&self) -> Option<u64> {
        parse_id(self.field("author_id")?)
    }

    pub fn source(&self) -> Option<&str> {
        self.field("source").and_then(Value::as_str)
    }

    pub fn lang(&self) -> Option<&str> {
        self.field("lang").and_then(Value::as_str)
    }

    pub fn public_metrics(&self) -> Option<TweetMetrics> {
        serde_json::from_value(self.field("public_metrics")?.clone()).ok()
    }

    /// Hashtag texts under `data.entities.hashtags`.
    pub fn hashtags(&self) -> Vec<&str> {
        self.entity_values("hashtags", "tag")
    }

    /// Handles mentioned under `data.entities.mentions`.
    pub fn mentions(&self) -> Vec<&str> {
        self.entity_values("mentions", "username")
    }

    /// Expanded urls under `data.entities.urls`.
    pub fn urls(&self) -> Vec<&str> {
        self.entity_values("urls", "expanded_url")
    }

    /// The raw response body the view was built from.
    pub fn raw(&self) -> &Value {
        &self.data
    }

    fn field(&self, name: &str) -> Option<&Value> {
        self.data.get("data")?.get(name)
    }

    fn entity_values(&self, kind: &str, key: &str) -> Vec<&str> {
        self.field("entities")
            .and_then(|entities| entities.get(kind))
            .and_then(Value::as_array)
            .map(|items| {
                items
                    .iter()
                    .filter_map(|item| item.get(key).and_then(Value::as_str))
                    .collect()
            })
            .unwrap_or_default()
    }
}
