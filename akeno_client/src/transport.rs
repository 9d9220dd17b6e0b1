use async_trait::async_trait;
use reqwest::header::HeaderMap;
use reqwest::{Client, Method, StatusCode, Url};

use crate::consts::USER_AGENT;
use crate::error::Result;

/// Raw response handed back by a transport: enough for the caller to
/// inspect rate-limit headers and decode the body.
#[derive(Debug, Clone)]
pub struct ApiResponse {
    pub status: StatusCode,
    pub headers: HeaderMap,
    pub body: Vec<u8>,
}

/// Anything that can issue an HTTP call with custom headers and hand
/// back status, headers, and body.
#[async_trait]
pub trait Transport: Send + Sync {
    async fn send(&self, method: Method, url: Url, headers: HeaderMap) -> Result<ApiResponse>;
}

#[derive(Debug, Clone)]
pub struct ReqwestTransport {
    client: Client,
}

impl ReqwestTransport {
    pub fn new() -> Result<ReqwestTransport> {
        let client = Client::builder().user_agent(USER_AGENT).build()?;
        Ok(ReqwestTransport { client })
    }
}

#[async_trait]
impl Transport for ReqwestTransport {
    async fn send(&self, method: Method, url: Url, headers: HeaderMap) -> Result<ApiResponse> {
        let response = self.client.request(method, url).headers(headers).send().await?;
        let status = response.status();
        let headers = response.headers().clone();
        let body = response.bytes().await?.to_vec();
        Ok(ApiResponse { status, headers, body })
    }
}
