//! Crawler module for course tree extraction
//!
//! This module contains the core crawling logic, including:
//! - Versioned fetching with v1 → v2 fallback
//! - Recursive descent through topics, sub-topics and lessons
//! - Resource classification
//! - Overall run coordination

mod classify;
mod coordinator;
mod fetcher;
mod tree;

pub use classify::{classify, Category};
pub use coordinator::{
    parse_batch_ids, parse_course_listing, BatchReport, BatchStatus, Coordinator, RunOutcome,
};
pub use fetcher::{FetchOutcome, VersionedFetcher};
pub use tree::{CourseCrawl, CourseRef, CrawlOutcome, TreeCrawler};

use crate::config::Config;
use crate::SweepError;

/// Runs a complete interactive session on the terminal
///
/// This is the main entry point. It will:
/// 1. Build the HTTP client and terminal channel
/// 2. Authenticate the operator
/// 3. List purchased courses and ask which to extract
/// 4. Crawl each batch and deliver its manifest
pub async fn sweep(config: Config) -> Result<RunOutcome, SweepError> {
    Coordinator::from_config(config)?.run().await
}
