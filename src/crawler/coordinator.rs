//! Run coordinator - one operator session from login to delivery
//!
//! This module drives the interactive run:
//! - Prompting for a token or phone number and authenticating
//! - Listing purchased courses and prompting for batch ids
//! - Crawling each batch in turn
//! - Delivering the manifest files and summary for each batch
//!
//! Batches are processed one after another so status messages and failures
//! stay attributable to a single course.

use crate::api::payload;
use crate::api::{HttpPlatformApi, PlatformApi};
use crate::auth::{AuthSession, Credential, IssuedVia, OtpProvider};
use crate::channel::{AuditLog, InteractiveChannel, TerminalChannel, TracingAudit};
use crate::config::Config;
use crate::crawler::tree::{CourseCrawl, CourseRef, CrawlOutcome, TreeCrawler};
use crate::manifest::{file_stem, ManifestFiles, RunSummary};
use crate::{AuthError, ChannelError, SweepError};
use async_trait::async_trait;
use serde_json::Value;
use std::time::Instant;

const CREDENTIAL_PROMPT: &str = "🔹 COURSE EXTRACTOR 🔹\n\n\
    📌 You can send:\n\
    1. Phone Number (📱) for OTP\n\
    2. OR Direct API Token (🔑)\n\n\
    📤 Send Phone or Token:";
const OTP_PROMPT: &str = "📬 OTP sent. Reply with the OTP.";

/// How a run ended without a transport failure
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RunOutcome {
    /// Phone number or OTP was rejected
    AuthFailed,
    /// The credential owns no courses (or the token is invalid)
    NoCourses,
    /// Every requested batch was handled
    Completed(Vec<BatchReport>),
}

/// What happened to one requested batch
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BatchReport {
    pub course_id: String,
    pub status: BatchStatus,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BatchStatus {
    /// Manifest files and summary were delivered
    Delivered(RunSummary),
    /// Neither endpoint version had data for the course
    NoData,
    /// The tree was walked but held no resources
    Empty,
}

/// Asks the operator for the OTP through the channel
struct ChannelOtpPrompt<'c> {
    channel: &'c mut dyn InteractiveChannel,
}

#[async_trait]
impl<'c> OtpProvider for ChannelOtpPrompt<'c> {
    async fn provide_otp(&mut self) -> Result<String, ChannelError> {
        self.channel.prompt_and_await_text(OTP_PROMPT).await
    }
}

/// Main run coordinator
pub struct Coordinator {
    config: Config,
    api: Box<dyn PlatformApi>,
    channel: Box<dyn InteractiveChannel>,
    audit: Box<dyn AuditLog>,
}

impl Coordinator {
    pub fn new(
        config: Config,
        api: Box<dyn PlatformApi>,
        channel: Box<dyn InteractiveChannel>,
        audit: Box<dyn AuditLog>,
    ) -> Self {
        Self {
            config,
            api,
            channel,
            audit,
        }
    }

    /// Coordinator over HTTP, the terminal, and the tracing audit log
    pub fn from_config(config: Config) -> Result<Self, SweepError> {
        let api = HttpPlatformApi::new(&config.api, &config.client)?;
        let channel = TerminalChannel::stdio(config.output.directory.clone());
        Ok(Self::new(
            config,
            Box::new(api),
            Box::new(channel),
            Box::new(TracingAudit),
        ))
    }

    /// Runs one operator session
    ///
    /// Transport failures abort the run; the operator is told before the
    /// error is returned, and no manifest of an unfinished course is sent.
    pub async fn run(&mut self) -> Result<RunOutcome, SweepError> {
        match self.run_session().await {
            Ok(outcome) => Ok(outcome),
            Err(e) => {
                tracing::error!("Run aborted: {}", e);
                if let Err(notify) = self
                    .channel
                    .deliver_message(&format!("❌ Error:\n{}", e))
                    .await
                {
                    tracing::warn!("Could not report failure to operator: {}", notify);
                }
                Err(e)
            }
        }
    }

    async fn run_session(&mut self) -> Result<RunOutcome, SweepError> {
        let credential = match self.authenticate().await {
            Ok(credential) => credential,
            Err(e) if e.is_operator_failure() => {
                self.channel.deliver_message(auth_failure_message(&e)).await?;
                return Ok(RunOutcome::AuthFailed);
            }
            Err(e) => return Err(e.into()),
        };

        let listing = self.api.list_purchased_courses(&credential).await?;
        let courses = parse_course_listing(&listing);
        if courses.is_empty() {
            self.channel
                .deliver_message("❌ No courses found or token invalid.")
                .await?;
            return Ok(RunOutcome::NoCourses);
        }
        tracing::info!("{} purchased courses", courses.len());

        let reply = self
            .channel
            .prompt_and_await_text(&batch_prompt(&courses))
            .await?;
        self.audit.record("batch", &reply);

        let batch_ids = parse_batch_ids(&reply);
        if batch_ids.is_empty() {
            self.channel.deliver_message("⚠️ No batch ID received.").await?;
            return Ok(RunOutcome::Completed(Vec::new()));
        }

        let mut reports = Vec::with_capacity(batch_ids.len());
        for batch_id in batch_ids {
            let course = courses
                .iter()
                .find(|course| course.id == batch_id)
                .cloned()
                .unwrap_or_else(|| CourseRef::new(batch_id));
            reports.push(self.process_batch(&credential, &course).await?);
        }

        self.channel.deliver_message("✅ DONE").await?;
        Ok(RunOutcome::Completed(reports))
    }

    async fn authenticate(&mut self) -> Result<Credential, AuthError> {
        let input = self
            .channel
            .prompt_and_await_text(CREDENTIAL_PROMPT)
            .await?;

        let credential = {
            let mut session =
                AuthSession::new(self.api.as_ref(), self.audit.as_ref(), &self.config.auth.token_prefix);
            let mut otp_prompt = ChannelOtpPrompt {
                channel: self.channel.as_mut(),
            };
            session.authenticate(&input, &mut otp_prompt).await?
        };

        if credential.issued_via() == IssuedVia::PhoneOtp {
            self.channel
                .deliver_message(&format!("🔑 Token:\n{}", credential.bearer_token()))
                .await?;
        }
        Ok(credential)
    }

    async fn process_batch(
        &mut self,
        credential: &Credential,
        course: &CourseRef,
    ) -> Result<BatchReport, SweepError> {
        let started = Instant::now();
        self.channel
            .deliver_message(&format!("⏳ Extracting: {}", course.id))
            .await?;

        let outcome = TreeCrawler::new(self.api.as_ref(), credential)
            .crawl_course(course)
            .await?;

        let status = match outcome {
            CrawlOutcome::NoData => {
                self.channel
                    .deliver_message(&format!(
                        "⚠️ Skipped: {} — No content found (v1/v2).",
                        course.id
                    ))
                    .await?;
                BatchStatus::NoData
            }
            CrawlOutcome::Crawled(crawl) if !crawl.manifest.has_resources() => {
                self.channel
                    .deliver_message("⚠️ No content found in this batch.")
                    .await?;
                BatchStatus::Empty
            }
            CrawlOutcome::Crawled(crawl) => {
                let summary = RunSummary::from_manifest(&crawl.manifest, started.elapsed());
                self.deliver_manifest(&crawl, &summary).await?;
                BatchStatus::Delivered(summary)
            }
        };

        Ok(BatchReport {
            course_id: course.id.clone(),
            status,
        })
    }

    /// Writes both renderings into a scoped temp dir and hands them over
    ///
    /// The temp dir is removed when `files` goes out of scope, on the error
    /// path as well.
    async fn deliver_manifest(
        &mut self,
        crawl: &CourseCrawl,
        summary: &RunSummary,
    ) -> Result<(), SweepError> {
        let stem = file_stem(&crawl.title, &crawl.course_id, self.config.output.name_max_length);
        let files = ManifestFiles::write(&crawl.manifest, &stem)?;

        let date = chrono::Local::now().format("%d-%m-%Y %H:%M:%S").to_string();
        let caption = summary.caption(&stem, &crawl.course_id, &date);

        self.channel.deliver_file(files.text_path(), &caption).await?;
        self.channel
            .deliver_file(files.json_path(), &format!("📦 JSON for: {}", stem))
            .await?;

        tracing::info!(
            "Delivered manifest for {} ({} resources)",
            crawl.course_id,
            summary.total
        );
        Ok(())
    }
}

fn auth_failure_message(error: &AuthError) -> &'static str {
    match error {
        AuthError::NoUserId => "❌ Failed to send OTP. Try again.",
        AuthError::EmptyInput => "❌ No phone number or token received.",
        _ => "❌ Invalid OTP or login error.",
    }
}

/// Reads `data[]{courseId, courseTitle}` from the purchased listing
pub fn parse_course_listing(listing: &Value) -> Vec<CourseRef> {
    payload::items(listing, "data")
        .iter()
        .filter_map(|course| {
            let Some(id) = payload::text(course, "courseId") else {
                tracing::warn!("Purchased course without courseId; skipping");
                return None;
            };
            let title =
                payload::text(course, "courseTitle").unwrap_or_else(|| "Untitled".to_string());
            Some(CourseRef::with_title(id, title))
        })
        .collect()
}

/// Splits `id1&id2&...` into trimmed, non-empty ids
pub fn parse_batch_ids(reply: &str) -> Vec<String> {
    reply
        .trim()
        .split('&')
        .map(str::trim)
        .filter(|id| !id.is_empty())
        .map(str::to_string)
        .collect()
}

fn batch_prompt(courses: &[CourseRef]) -> String {
    let listing: String = courses
        .iter()
        .map(|course| {
            format!(
                "{} - {}\n",
                course.id,
                course.title.as_deref().unwrap_or("Untitled")
            )
        })
        .collect();

    let example = courses
        .iter()
        .take(2)
        .map(|course| course.id.as_str())
        .collect::<Vec<_>>()
        .join("&");

    format!(
        "✅ Login Successful\n\n📚 Batches:\n\n{}\n👉 Send Batch ID to extract (e.g. {})",
        listing, example
    )
}
