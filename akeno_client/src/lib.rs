mod consts;
mod error;
mod rate_limit;
#[cfg(test)]
mod test;
mod transport;

use std::fmt::{Display, Formatter};
use std::str::FromStr;
use std::time::Duration;

use itertools::Itertools;
use reqwest::header::{self, HeaderMap, HeaderValue};
use reqwest::{Method, Url};
use serde_json::Value;

use crate::consts::*;
pub use crate::error::{Error, Result};
pub use crate::rate_limit::{remaining_calls, RateLimiter};
pub use crate::transport::{ApiResponse, ReqwestTransport, Transport};

/// Authenticated gateway to the Twitter v2 REST API.
///
/// Every endpoint method funnels through one request path that holds an
/// exclusive slot, so outbound calls and the rate-limit cool-down never
/// overlap.
pub struct HttpClient {
    auth: HeaderValue,
    limiter: RateLimiter,
    transport: Box<dyn Transport>,
}

impl HttpClient {
    pub fn new(token: &str) -> Result<HttpClient> {
        let transport = Box::new(ReqwestTransport::new()?);
        HttpClient::with_transport(token, transport)
    }

    /// Build a client over a custom transport.
    pub fn with_transport(token: &str, transport: Box<dyn Transport>) -> Result<HttpClient> {
        let mut auth = HeaderValue::from_str(&format!("Bearer {}", token))?;
        auth.set_sensitive(true);
        Ok(HttpClient {
            auth,
            limiter: RateLimiter::new(RATE_LIMIT_COOLDOWN),
            transport,
        })
    }

    /// Override the cool-down interval entered on an exhausted window.
    pub fn with_cooldown(mut self, cooldown: Duration) -> HttpClient {
        self.limiter = RateLimiter::new(cooldown);
        self
    }

    /// Look up a tweet by id.
    pub async fn tweet(&self, tweet_id: u64) -> Result<Value> {
        let base = format!("{}/tweets/{}", REST_API, tweet_id);
        let url = Url::parse_with_params(&base, [("tweet.fields", TWEET_FIELDS)])?;
        self.request(Method::GET, url, HeaderMap::new()).await
    }

    /// Look up several tweets in one call.
    pub async fn tweets(&self, tweet_ids: &[u64]) -> Result<Value> {
        let ids = tweet_ids.iter().join(",");
        let base = format!("{}/tweets", REST_API);
        let url = Url::parse_with_params(&base, [("ids", ids.as_str()), ("tweet.fields", TWEET_FIELDS)])?;
        self.request(Method::GET, url, HeaderMap::new()).await
    }

    /// Look up a user by id.
    pub async fn user(&self, user_id: u64) -> Result<Value> {
        let base = format!("{}/users/{}", REST_API, user_id);
        let url = Url::parse_with_params(&base, [("user.fields", USER_FIELDS)])?;
        self.request(Method::GET, url, HeaderMap::new()).await
    }

    /// Look up a user requesting a single optional field.
    pub async fn user_field(&self, user_id: u64, field: UserField) -> Result<Value> {
        let base = format!("{}/users/{}", REST_API, user_id);
        let fields = field.to_string();
        let url = Url::parse_with_params(&base, [("user.fields", fields.as_str())])?;
        self.request(Method::GET, url, HeaderMap::new()).await
    }

    pub async fn post_tweet(&self, text: &str) -> Result<Value> {
        let url = Url::parse(&format!("{}/tweets", REST_API))?;
        let mut headers = json_headers();
        headers.insert("text", HeaderValue::from_str(text)?);
        self.request(Method::POST, url, headers).await
    }

    pub async fn delete_tweet(&self, tweet_id: u64) -> Result<Value> {
        let url = Url::parse(&format!("{}/tweets/{}", REST_API, tweet_id))?;
        self.request(Method::DELETE, url, HeaderMap::new()).await
    }

    pub async fn like_tweet(&self, user_id: u64, tweet_id: u64) -> Result<Value> {
        let url = Url::parse(&format!("{}/users/{}/likes", REST_API, user_id))?;
        let mut headers = json_headers();
        headers.insert("tweet_id", HeaderValue::from(tweet_id));
        self.request(Method::POST, url, headers).await
    }

    pub async fn unlike_tweet(&self, user_id: u64, tweet_id: u64) -> Result<Value> {
        let url = Url::parse(&format!("{}/users/{}/likes/{}", REST_API, user_id, tweet_id))?;
        self.request(Method::DELETE, url, HeaderMap::new()).await
    }

    pub async fn retweet(&self, user_id: u64, tweet_id: u64) -> Result<Value> {
        let url = Url::parse(&format!("{}/users/{}/retweets", REST_API, user_id))?;
        let mut headers = json_headers();
        headers.insert("tweet_id", HeaderValue::from(tweet_id));
        self.request(Method::POST, url, headers).await
    }
}

impl HttpClient {
    async fn request(&self, method: Method, url: Url, mut headers: HeaderMap) -> Result<Value> {
        headers.insert(header::AUTHORIZATION, self.auth.clone());

        // One request in flight at a time. The guard also covers the
        // cool-down below and drops on every exit path.
        let _slot = self.limiter.acquire().await;

        tracing::debug!("{} {}", method, url.path());
        let response = self.transport.send(method, url.clone(), headers).await?;
        let remaining = remaining_calls(&response.headers);

        log(&url, &response.body).await?;
        // Status is not interpreted here; error payloads decode like any
        // other body.
        let value: Value = serde_json::from_slice(&response.body)?;

        if remaining == Some(0) {
            tracing::warn!(
                "rate limit window exhausted, cooling down for {}s",
                self.limiter.cooldown().as_secs()
            );
            self.limiter.cool_down().await;
        }
        Ok(value)
    }
}

fn json_headers() -> HeaderMap {
    let mut headers = HeaderMap::new();
    headers.insert(header::CONTENT_TYPE, HeaderValue::from_static("application/json"));
    headers
}

async fn log(url: &Url, content: &[u8]) -> Result<()> {
    use std::path::PathBuf;
    use tokio::{fs::File, io::AsyncWriteExt};

    if let Ok(dir) = std::env::var(LOG_DIR_ENV) {
        let name = url.path().trim_start_matches('/').replace('/', "_");
        let time = chrono::Local::now().format("%Y%m%d_%H%M%S");
        let filepath = PathBuf::from(dir).join(format!("akeno_{}_{}.json", name, time));
        let mut file = File::create(filepath).await?;
        file.write_all(content).await?;
    }
    Ok(())
}

/// Optional user fields addressable through the `user.fields` selector.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UserField {
    ProfileImageUrl,
    CreatedAt,
    PublicMetrics,
}

impl UserField {
    /// Where the field lives inside a decoded user payload.
    pub fn path(&self) -> [&'static str; 2] {
        ["data", self.name()]
    }

    fn name(&self) -> &'static str {
        match self {
            UserField::ProfileImageUrl => "profile_image_url",
            UserField::CreatedAt => "created_at",
            UserField::PublicMetrics => "public_metrics",
        }
    }
}

impl Display for UserField {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.name())
    }
}

impl FromStr for UserField {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s {
            "profile_image_url" => Ok(UserField::ProfileImageUrl),
            "created_at" => Ok(UserField::CreatedAt),
            "public_metrics" => Ok(UserField::PublicMetrics),
            _ => Err(Error::InvalidField(s.to_string())),
        }
    }
}
