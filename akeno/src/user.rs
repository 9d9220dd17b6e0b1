use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::util::parse_timestamp;

/// Follower/following counters reported under `data.public_metrics`.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct UserMetrics {
    pub followers_count: u32,
    pub following_count: u32,
    pub tweet_count: u32,
    #[serde(default)]
    pub listed_count: u32,
}

/// Read-only view over a cached user payload.
#[derive(Debug, Clone)]
pub struct User {
    id: u64,
    data: Value,
}

impl User {
    pub(crate) fn new(id: u64, data: Value) -> User {
        User { id, data }
    }

    /// Id the user was requested with.
    pub fn id(&self) -> u64 {
        self.id
    }

    pub fn name(&self) -> Option<&str> {
        self.field("name").and_then(Value::as_str)
    }

    /// The user's handle, without the leading `@`.
    pub fn username(&self) -> Option<&str> {
        self.field("username").and_then(Value::as_str)
    }

    pub fn created_at(&self) -> Option<DateTime<Utc>> {
        parse_timestamp(self.field("created_at")?)
    }

    pub fn description(&self) -> Option<&str> {
        self.field("description").and_then(Value::as_str)
    }

    pub fn location(&self) -> Option<&str> {
        self.field("location").and_then(Value::as_str)
    }

    pub fn url(&self) -> Option<&str> {
        self.field("url").and_then(Value::as_str)
    }

    pub fn protected(&self) -> Option<bool> {
        self.field("protected").and_then(Value::as_bool)
    }

    pub fn verified(&self) -> Option<bool> {
        self.field("verified").and_then(Value::as_bool)
    }

    pub fn profile_image_url(&self) -> Option<&str> {
        self.field("profile_image_url").and_then(Value::as_str)
    }

    pub fn public_metrics(&self) -> Option<UserMetrics> {
        serde_json::from_value(self.field("public_metrics")?.clone()).ok()
    }

    /// The raw response body the view was built from.
    pub fn raw(&self) -> &Value {
        &self.data
    }

    fn field(&self, name: &str) -> Option<&Value> {
        self.data.get("data")?.get(name)
    }
}
