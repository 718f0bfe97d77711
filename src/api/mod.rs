//! Remote platform API
//!
//! `PlatformApi` is the seam between the crawl logic and the network. It is a
//! thin request/response wrapper: every method returns the raw JSON payload
//! and leaves interpretation (success predicates, fallback) to the callers.

mod http;
pub mod payload;

pub use http::{build_http_client, HttpPlatformApi};

use crate::auth::Credential;
use crate::ApiResult;
use async_trait::async_trait;
use serde_json::Value;
use std::fmt;

/// Version lineage of the course tree endpoints
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EndpointVersion {
    V1,
    V2,
}

impl EndpointVersion {
    /// Path segment used in the endpoint URL
    pub fn path_segment(&self) -> &'static str {
        match self {
            Self::V1 => "v1",
            Self::V2 => "v2",
        }
    }
}

impl fmt::Display for EndpointVersion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.path_segment())
    }
}

/// Which of the two lesson-data endpoints to call
///
/// Lesson detail has its own fallback chain that is independent of the
/// course tree version.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum LessonDetailStage {
    /// `api/lesson/data`
    Primary,
    /// `v2/lesson/data`
    Fallback,
}

impl LessonDetailStage {
    pub fn path_segment(&self) -> &'static str {
        match self {
            Self::Primary => "api",
            Self::Fallback => "v2",
        }
    }
}

/// Logical operations of the platform's private API
#[async_trait]
pub trait PlatformApi: Send + Sync {
    /// Asks the platform to send an OTP to `phone`
    async fn request_otp(&self, phone: &str) -> ApiResult<Value>;

    /// Exchanges the user id from `request_otp` plus the operator's OTP for a token
    async fn exchange_otp(&self, user_id: &Value, otp: &str) -> ApiResult<Value>;

    /// Lists the courses purchased by the credential's owner
    async fn list_purchased_courses(&self, credential: &Credential) -> ApiResult<Value>;

    /// Fetches one level of a course tree
    ///
    /// `parent` is `None` for the course root, a topic id for sub-topics and
    /// `"<topic>/<sub-topic>"` for lessons.
    async fn get_tree_level(
        &self,
        credential: &Credential,
        version: EndpointVersion,
        course_id: &str,
        parent: Option<&str>,
    ) -> ApiResult<Value>;

    /// Fetches lesson detail (attachments live under `options[].urls[]`)
    async fn get_lesson_detail(
        &self,
        credential: &Credential,
        stage: LessonDetailStage,
        lesson_id: &str,
        course_id: &str,
    ) -> ApiResult<Value>;
}
