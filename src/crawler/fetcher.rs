//! Versioned fetching
//!
//! Course tree calls try the v1 endpoint and fall back to v2 when v1 has no
//! `data`. The version that answered is returned so deeper calls for the same
//! course can be pinned to it. Lesson detail has its own two-stage chain keyed
//! on `options` instead of `data`.

use crate::api::payload;
use crate::api::{EndpointVersion, LessonDetailStage, PlatformApi};
use crate::auth::Credential;
use crate::ApiResult;
use serde_json::Value;

/// Result of a fallback fetch
///
/// `Empty` is a legitimate "no data" answer from both versions, not an error.
#[derive(Debug, Clone, PartialEq)]
pub enum FetchOutcome {
    Found {
        payload: Value,
        version: EndpointVersion,
    },
    Empty,
}

/// Wraps the API with the version fallback contract
#[derive(Clone, Copy)]
pub struct VersionedFetcher<'a> {
    api: &'a dyn PlatformApi,
    credential: &'a Credential,
}

impl<'a> VersionedFetcher<'a> {
    pub fn new(api: &'a dyn PlatformApi, credential: &'a Credential) -> Self {
        Self { api, credential }
    }

    /// Fetches a tree level trying v1, then v2 with identical parameters
    ///
    /// v2 is only consulted when v1's `data` is missing or empty. Transport
    /// failures propagate immediately.
    pub async fn fetch_with_fallback(
        &self,
        course_id: &str,
        parent: Option<&str>,
    ) -> ApiResult<FetchOutcome> {
        for version in [EndpointVersion::V1, EndpointVersion::V2] {
            let payload = self.fetch_pinned(version, course_id, parent).await?;
            if payload::has_field(&payload, "data") {
                tracing::debug!("Course {} resolved on {}", course_id, version);
                return Ok(FetchOutcome::Found { payload, version });
            }
            tracing::debug!("No data for course {} on {}", course_id, version);
        }

        Ok(FetchOutcome::Empty)
    }

    /// Fetches a tree level from one version only
    pub async fn fetch_pinned(
        &self,
        version: EndpointVersion,
        course_id: &str,
        parent: Option<&str>,
    ) -> ApiResult<Value> {
        self.api
            .get_tree_level(self.credential, version, course_id, parent)
            .await
    }

    /// Fetches lesson detail: primary endpoint if it carries `options`,
    /// otherwise whatever the fallback endpoint returns
    pub async fn fetch_lesson_detail(&self, lesson_id: &str, course_id: &str) -> ApiResult<Value> {
        let primary = self
            .api
            .get_lesson_detail(self.credential, LessonDetailStage::Primary, lesson_id, course_id)
            .await?;
        if payload::has_field(&primary, "options") {
            return Ok(primary);
        }

        tracing::debug!("No options for lesson {} on primary endpoint", lesson_id);
        self.api
            .get_lesson_detail(self.credential, LessonDetailStage::Fallback, lesson_id, course_id)
            .await
    }
}
