//! Course tree descent
//!
//! Walks course → topic → sub-topic → lesson → resource, strictly in API
//! order, one awaited call at a time. The version resolved for the course
//! root is carried in a [`CourseScope`] and used for every deeper call.

use crate::api::payload;
use crate::api::{EndpointVersion, PlatformApi};
use crate::auth::Credential;
use crate::crawler::fetcher::{FetchOutcome, VersionedFetcher};
use crate::manifest::{Manifest, Resource};
use crate::ApiResult;
use serde_json::Value;

/// A course to crawl
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CourseRef {
    pub id: String,
    /// Title from the purchased listing, if the course was found there
    pub title: Option<String>,
}

impl CourseRef {
    /// A raw identifier typed by the operator
    pub fn new(id: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            title: None,
        }
    }

    pub fn with_title(id: impl Into<String>, title: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            title: Some(title.into()),
        }
    }
}

/// A course whose tree was walked
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CourseCrawl {
    pub course_id: String,
    pub title: String,
    pub version: EndpointVersion,
    pub manifest: Manifest,
}

/// Result of crawling one course
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CrawlOutcome {
    /// Neither version had data for the course root
    NoData,
    Crawled(CourseCrawl),
}

/// Course id plus the version pinned for its whole descent
#[derive(Debug, Clone, Copy)]
struct CourseScope<'c> {
    course_id: &'c str,
    version: EndpointVersion,
}

/// Recursive descent over one course at a time
pub struct TreeCrawler<'a> {
    fetcher: VersionedFetcher<'a>,
}

impl<'a> TreeCrawler<'a> {
    pub fn new(api: &'a dyn PlatformApi, credential: &'a Credential) -> Self {
        Self {
            fetcher: VersionedFetcher::new(api, credential),
        }
    }

    /// Crawls a course and returns its manifest in traversal order
    ///
    /// Levels without data are skipped; transport failures abort the course
    /// and propagate.
    pub async fn crawl_course(&self, course: &CourseRef) -> ApiResult<CrawlOutcome> {
        let (details, version) = match self.fetcher.fetch_with_fallback(&course.id, None).await? {
            FetchOutcome::Found { payload, version } => (payload, version),
            FetchOutcome::Empty => {
                tracing::info!("Course {} has no data on v1 or v2", course.id);
                return Ok(CrawlOutcome::NoData);
            }
        };

        let title = payload::text(&details, "courseTitle")
            .or_else(|| course.title.clone())
            .unwrap_or_else(|| format!("Batch_{}", course.id));
        tracing::info!("Crawling '{}' ({}) on {}", title, course.id, version);

        let scope = CourseScope {
            course_id: &course.id,
            version,
        };
        let mut manifest = Manifest::new();

        for topic in payload::items(&details, "data") {
            self.crawl_topic(scope, topic, &mut manifest).await?;
        }

        tracing::info!(
            "Course {} done: {} entries, {} resources",
            course.id,
            manifest.entries().len(),
            manifest.resource_count()
        );

        Ok(CrawlOutcome::Crawled(CourseCrawl {
            course_id: course.id.clone(),
            title,
            version,
            manifest,
        }))
    }

    async fn crawl_topic(
        &self,
        scope: CourseScope<'_>,
        topic: &Value,
        manifest: &mut Manifest,
    ) -> ApiResult<()> {
        if let Some(name) = payload::text(topic, "name") {
            manifest.push_folder(name, 0);
        }

        let Some(topic_id) = payload::text(topic, "contentId") else {
            tracing::warn!("Topic without contentId in course {}; skipping", scope.course_id);
            return Ok(());
        };

        let subs = self
            .fetcher
            .fetch_pinned(scope.version, scope.course_id, Some(&topic_id))
            .await?;
        let sub_topics = payload::items(&subs, "data");
        if sub_topics.is_empty() {
            tracing::debug!("Topic {} has no sub-topics", topic_id);
        }

        for sub in sub_topics {
            self.crawl_sub_topic(scope, &topic_id, sub, manifest).await?;
        }
        Ok(())
    }

    async fn crawl_sub_topic(
        &self,
        scope: CourseScope<'_>,
        topic_id: &str,
        sub: &Value,
        manifest: &mut Manifest,
    ) -> ApiResult<()> {
        if let Some(name) = payload::text(sub, "name") {
            manifest.push_folder(name, 1);
        }

        let Some(sub_id) = payload::text(sub, "contentId") else {
            tracing::warn!("Sub-topic without contentId under topic {}; skipping", topic_id);
            return Ok(());
        };

        let parent = format!("{}/{}", topic_id, sub_id);
        let lessons = self
            .fetcher
            .fetch_pinned(scope.version, scope.course_id, Some(&parent))
            .await?;
        let lessons = payload::items(&lessons, "data");
        if lessons.is_empty() {
            tracing::debug!("Sub-topic {} has no lessons", parent);
        }

        for lesson in lessons {
            self.crawl_lesson(scope, lesson, manifest).await?;
        }
        Ok(())
    }

    async fn crawl_lesson(
        &self,
        scope: CourseScope<'_>,
        lesson: &Value,
        manifest: &mut Manifest,
    ) -> ApiResult<()> {
        if let Some(url) = payload::text(lesson, "videoUrl") {
            let name = payload::text(lesson, "name").unwrap_or_else(|| "Untitled".to_string());
            manifest.push_resource(Resource::classified(name, url));
        }

        let Some(lesson_id) = payload::text(lesson, "contentId") else {
            tracing::warn!("Lesson without contentId in course {}; skipping detail", scope.course_id);
            return Ok(());
        };

        let detail = self
            .fetcher
            .fetch_lesson_detail(&lesson_id, scope.course_id)
            .await?;

        for option in payload::items(&detail, "options") {
            for attachment in payload::items(option, "urls") {
                if let Some(url) = payload::text(attachment, "url") {
                    let name =
                        payload::text(attachment, "name").unwrap_or_else(|| "Note".to_string());
                    manifest.push_resource(Resource::note(name, url));
                }
            }
        }
        Ok(())
    }
}
