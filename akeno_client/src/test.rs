use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use async_trait::async_trait;
use reqwest::header::{HeaderMap, HeaderValue, AUTHORIZATION, CONTENT_TYPE};
use reqwest::{Method, StatusCode, Url};
use serde_json::{json, Value};
use tokio::time::Instant;

use crate::error::{Error, Result};
use crate::rate_limit::remaining_calls;
use crate::transport::{ApiResponse, Transport};
use crate::{HttpClient, UserField};

#[derive(Clone)]
struct Issued {
    at: Instant,
    method: Method,
    url: Url,
    headers: HeaderMap,
}

/// Canned-reply transport recording every call that actually went out.
/// A `None` reply simulates a transport failure.
struct StubTransport {
    replies: Vec<Option<ApiResponse>>,
    calls: AtomicUsize,
    issued: Mutex<Vec<Issued>>,
}

impl StubTransport {
    fn client(replies: Vec<Option<ApiResponse>>) -> (HttpClient, Arc<StubTransport>) {
        let stub = Arc::new(StubTransport {
            replies,
            calls: AtomicUsize::new(0),
            issued: Mutex::new(Vec::new()),
        });
        let client = HttpClient::with_transport("token", Box::new(stub.clone())).unwrap();
        (client, stub)
    }

    fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    fn issued(&self) -> Vec<Issued> {
        self.issued.lock().unwrap().clone()
    }
}

#[async_trait]
impl Transport for Arc<StubTransport> {
    async fn send(&self, method: Method, url: Url, headers: HeaderMap) -> Result<ApiResponse> {
        let index = self.calls.fetch_add(1, Ordering::SeqCst);
        self.issued.lock().unwrap().push(Issued {
            at: Instant::now(),
            method,
            url,
            headers,
        });
        let reply = self.replies.get(index).or_else(|| self.replies.last());
        match reply.cloned().flatten() {
            Some(reply) => Ok(reply),
            None => Err(Error::IOError(std::io::Error::new(
                std::io::ErrorKind::ConnectionReset,
                "connection reset",
            ))),
        }
    }
}

fn reply(status: StatusCode, remaining: Option<&str>, body: Value) -> Option<ApiResponse> {
    let mut headers = HeaderMap::new();
    if let Some(remaining) = remaining {
        headers.insert("x-rate-limit-remaining", HeaderValue::from_str(remaining).unwrap());
    }
    Some(ApiResponse {
        status,
        headers,
        body: body.to_string().into_bytes(),
    })
}

#[test]
fn test_remaining_calls_parsing() {
    let mut headers = HeaderMap::new();
    assert_eq!(remaining_calls(&headers), None);

    headers.insert("x-rate-limit-remaining", HeaderValue::from_static("5"));
    assert_eq!(remaining_calls(&headers), Some(5));

    headers.insert("x-rate-limit-remaining", HeaderValue::from_static("0"));
    assert_eq!(remaining_calls(&headers), Some(0));

    headers.insert("x-rate-limit-remaining", HeaderValue::from_static("soon"));
    assert_eq!(remaining_calls(&headers), None);
}

#[test]
fn test_user_field_selector() {
    assert_eq!(UserField::ProfileImageUrl.to_string(), "profile_image_url");
    assert_eq!(UserField::CreatedAt.path(), ["data", "created_at"]);
    assert_eq!("public_metrics".parse::<UserField>().unwrap(), UserField::PublicMetrics);
    assert!(matches!(
        "favourites_count".parse::<UserField>(),
        Err(Error::InvalidField(_))
    ));
}

#[tokio::test]
async fn test_request_carries_bearer_credential() {
    let (client, stub) = StubTransport::client(vec![reply(StatusCode::OK, None, json!({"data": {}}))]);
    client.user(7).await.unwrap();

    let issued = stub.issued();
    assert_eq!(issued.len(), 1);
    assert_eq!(issued[0].method, Method::GET);
    assert_eq!(issued[0].url.path(), "/2/users/7");
    assert!(issued[0].url.query().unwrap().contains("user.fields"));
    assert_eq!(issued[0].headers.get(AUTHORIZATION).unwrap(), "Bearer token");
}

#[tokio::test]
async fn test_request_decodes_body_regardless_of_status() {
    let error_body = json!({"errors": [{"title": "Not Found Error"}]});
    let (client, stub) =
        StubTransport::client(vec![reply(StatusCode::NOT_FOUND, Some("10"), error_body.clone())]);

    let value = client.tweet(404).await.unwrap();
    assert_eq!(value, error_body);
    assert_eq!(stub.calls(), 1);
}

#[tokio::test]
async fn test_batch_lookup_joins_ids() {
    let (client, stub) = StubTransport::client(vec![reply(StatusCode::OK, None, json!({"data": []}))]);
    client.tweets(&[1, 2, 3]).await.unwrap();

    let issued = stub.issued();
    assert_eq!(issued[0].url.path(), "/2/tweets");
    assert!(issued[0].url.query().unwrap().contains("ids=1%2C2%2C3"));
}

#[tokio::test]
async fn test_like_tweet_shapes_action_request() {
    let (client, stub) = StubTransport::client(vec![reply(StatusCode::OK, None, json!({"data": {"liked": true}}))]);
    client.like_tweet(9, 123).await.unwrap();

    let issued = stub.issued();
    assert_eq!(issued[0].method, Method::POST);
    assert_eq!(issued[0].url.path(), "/2/users/9/likes");
    assert_eq!(issued[0].headers.get(CONTENT_TYPE).unwrap(), "application/json");
    assert_eq!(issued[0].headers.get("tweet_id").unwrap(), "123");
}

#[tokio::test]
async fn test_post_tweet_rejects_unencodable_text() {
    let (client, stub) = StubTransport::client(vec![reply(StatusCode::OK, None, json!({}))]);
    let result = client.post_tweet("line one\nline two").await;
    assert!(matches!(result, Err(Error::InvalidHeader(_))));
    assert_eq!(stub.calls(), 0);
}

#[tokio::test(start_paused = true)]
async fn test_exhausted_window_delays_following_request() {
    let (client, stub) = StubTransport::client(vec![
        reply(StatusCode::OK, Some("0"), json!({"data": {"id": "1"}})),
        reply(StatusCode::OK, Some("50"), json!({"data": {"id": "2"}})),
    ]);
    let client = Arc::new(client);

    let first = tokio::spawn({
        let client = client.clone();
        async move { client.tweet(1).await }
    });
    let second = tokio::spawn({
        let client = client.clone();
        async move { client.tweet(2).await }
    });
    first.await.unwrap().unwrap();
    second.await.unwrap().unwrap();

    let issued = stub.issued();
    assert_eq!(issued.len(), 2);
    let gap = issued[1].at.duration_since(issued[0].at);
    assert!(gap >= Duration::from_secs(900), "second request started after {:?}", gap);
}

#[tokio::test(start_paused = true)]
async fn test_missing_signal_means_no_delay() {
    let (client, _stub) = StubTransport::client(vec![reply(StatusCode::OK, None, json!({"data": {}}))]);
    let start = Instant::now();
    client.tweet(1).await.unwrap();
    assert!(start.elapsed() < Duration::from_secs(1));
}

#[tokio::test]
async fn test_slot_released_after_transport_failure() {
    let (client, stub) = StubTransport::client(vec![
        None,
        reply(StatusCode::OK, None, json!({"data": {"id": "2"}})),
    ]);

    let result = client.tweet(1).await;
    assert!(matches!(result, Err(Error::IOError(_))));

    // A failed call must give the slot back; this one would hang forever
    // otherwise.
    client.tweet(2).await.unwrap();
    assert_eq!(stub.calls(), 2);
}
