//! reqwest implementation of the platform API
//!
//! This module handles all HTTP traffic, including:
//! - Building the HTTP client with the configured identity and timeouts
//! - Attaching the bearer credential and platform headers
//! - Decoding JSON bodies
//! - Classifying transport failures

use crate::api::{EndpointVersion, LessonDetailStage, PlatformApi};
use crate::auth::Credential;
use crate::config::{ApiConfig, ClientConfig};
use crate::{ApiError, ApiResult};
use async_trait::async_trait;
use reqwest::{Client, RequestBuilder};
use serde_json::{json, Value};
use std::time::Duration;

const CONTENT_PREFIX: &str = "app-content-ws";

/// Builds an HTTP client with the configured identity and timeouts
///
/// # Example
///
/// ```no_run
/// use course_sweep::api::build_http_client;
/// use course_sweep::config::{ApiConfig, ClientConfig};
///
/// let client = build_http_client(&ApiConfig::default(), &ClientConfig::default()).unwrap();
/// ```
pub fn build_http_client(api: &ApiConfig, client: &ClientConfig) -> Result<Client, reqwest::Error> {
    Client::builder()
        .user_agent(client.user_agent.clone())
        .timeout(Duration::from_secs(api.timeout_secs))
        .connect_timeout(Duration::from_secs(api.connect_timeout_secs))
        .gzip(true)
        .brotli(true)
        .build()
}

/// Platform API over HTTP
#[derive(Debug, Clone)]
pub struct HttpPlatformApi {
    client: Client,
    auth_base: String,
    content_base: String,
    platform: String,
}

impl HttpPlatformApi {
    /// Creates an API client from configuration
    pub fn new(api: &ApiConfig, client: &ClientConfig) -> Result<Self, reqwest::Error> {
        Ok(Self::with_client(build_http_client(api, client)?, api, client))
    }

    /// Creates an API client around an existing reqwest client
    pub fn with_client(http: Client, api: &ApiConfig, client: &ClientConfig) -> Self {
        Self {
            client: http,
            auth_base: api.auth_base_url.trim_end_matches('/').to_string(),
            content_base: api.content_base_url.trim_end_matches('/').to_string(),
            platform: client.platform.clone(),
        }
    }

    fn content_url(&self, path: &str) -> String {
        format!("{}/{}/{}", self.content_base, CONTENT_PREFIX, path)
    }

    fn authorized_get(&self, url: &str, credential: &Credential) -> RequestBuilder {
        self.client
            .get(url)
            .bearer_auth(credential.bearer_token())
            .header("platform", &self.platform)
    }

    async fn post_json(&self, url: &str, body: &Value) -> ApiResult<Value> {
        tracing::debug!("POST {}", url);
        self.send(self.client.post(url).json(body), url).await
    }

    /// Sends a request and decodes the body as JSON
    ///
    /// The body is decoded regardless of status: the platform reports many
    /// failures as JSON with an empty `data` field, and those are "no data",
    /// not transport errors.
    async fn send(&self, request: RequestBuilder, url: &str) -> ApiResult<Value> {
        let response = request
            .send()
            .await
            .map_err(|e| classify_error(url, e))?;

        let status = response.status();
        let body = response
            .text()
            .await
            .map_err(|e| classify_error(url, e))?;

        match serde_json::from_str::<Value>(&body) {
            Ok(payload) => {
                if !status.is_success() {
                    tracing::warn!("HTTP {} from {} with JSON body", status.as_u16(), url);
                }
                Ok(payload)
            }
            Err(_) if !status.is_success() => Err(ApiError::Status {
                url: url.to_string(),
                status: status.as_u16(),
            }),
            Err(source) => Err(ApiError::Decode {
                url: url.to_string(),
                source,
            }),
        }
    }
}

/// Maps a reqwest failure onto the transport taxonomy
fn classify_error(url: &str, error: reqwest::Error) -> ApiError {
    if error.is_timeout() {
        ApiError::Timeout {
            url: url.to_string(),
        }
    } else {
        ApiError::Request {
            url: url.to_string(),
            source: error,
        }
    }
}

#[async_trait]
impl PlatformApi for HttpPlatformApi {
    async fn request_otp(&self, phone: &str) -> ApiResult<Value> {
        let url = format!("{}/api/web/userlogin", self.auth_base);
        self.post_json(&url, &json!({ "mobile": phone })).await
    }

    async fn exchange_otp(&self, user_id: &Value, otp: &str) -> ApiResult<Value> {
        let url = format!("{}/api/web/web_user_login", self.auth_base);
        self.post_json(&url, &json!({ "user_id": user_id, "otp": otp }))
            .await
    }

    async fn list_purchased_courses(&self, credential: &Credential) -> ApiResult<Value> {
        let url = self.content_url("api/v1/getAllPurchasedCourses");
        tracing::debug!("GET {}", url);
        let request = self
            .authorized_get(&url, credential)
            .query(&[("source", "APP")]);
        self.send(request, &url).await
    }

    async fn get_tree_level(
        &self,
        credential: &Credential,
        version: EndpointVersion,
        course_id: &str,
        parent: Option<&str>,
    ) -> ApiResult<Value> {
        let url = self.content_url(&format!("{}/course/getDetails", version.path_segment()));
        tracing::debug!("GET {} courseId={} parentId={:?}", url, course_id, parent);

        let mut request = self
            .authorized_get(&url, credential)
            .query(&[("courseId", course_id)]);
        if let Some(parent_id) = parent {
            request = request.query(&[("parentId", parent_id)]);
        }
        self.send(request, &url).await
    }

    async fn get_lesson_detail(
        &self,
        credential: &Credential,
        stage: LessonDetailStage,
        lesson_id: &str,
        course_id: &str,
    ) -> ApiResult<Value> {
        let url = self.content_url(&format!("{}/lesson/data", stage.path_segment()));
        tracing::debug!("GET {} lesson_id={} courseId={}", url, lesson_id, course_id);

        let request = self
            .authorized_get(&url, credential)
            .query(&[("lesson_id", lesson_id), ("courseId", course_id)]);
        self.send(request, &url).await
    }
}
