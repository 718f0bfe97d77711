//! Course-Sweep: a course content manifest extractor
//!
//! This crate logs into a learning platform's private API, walks the content
//! tree of purchased courses (topic, sub-topic, lesson, resource) and produces
//! an ordered manifest of every downloadable resource with summary counts.

pub mod api;
pub mod auth;
pub mod channel;
pub mod config;
pub mod crawler;
pub mod manifest;

use thiserror::Error;

/// Main error type for Course-Sweep operations
#[derive(Debug, Error)]
pub enum SweepError {
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("API error: {0}")]
    Api(#[from] ApiError),

    #[error("Authentication error: {0}")]
    Auth(#[from] AuthError),

    #[error("Channel error: {0}")]
    Channel(#[from] ChannelError),

    #[error("Output error: {0}")]
    Output(#[from] manifest::OutputError),

    #[error("HTTP client error: {0}")]
    Reqwest(#[from] reqwest::Error),
}

/// Configuration-specific errors
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read config file: {0}")]
    Io(#[from] std::io::Error),

    #[error("Failed to parse TOML: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("Validation error: {0}")]
    Validation(String),

    #[error("Invalid URL in config: {0}")]
    InvalidUrl(String),
}

/// Transport-level failures talking to the platform
///
/// These are never a "no data" signal: an empty payload is a legitimate
/// outcome and is reported through `crawler::FetchOutcome::Empty` instead.
#[derive(Debug, Error)]
pub enum ApiError {
    #[error("HTTP error for {url}: {source}")]
    Request { url: String, source: reqwest::Error },

    #[error("Request timeout for {url}")]
    Timeout { url: String },

    #[error("HTTP {status} from {url}")]
    Status { url: String, status: u16 },

    #[error("Malformed JSON from {url}: {source}")]
    Decode {
        url: String,
        source: serde_json::Error,
    },
}

/// Authentication failures
#[derive(Debug, Error)]
pub enum AuthError {
    #[error("Platform did not return a user id for the OTP request")]
    NoUserId,

    #[error("Invalid OTP or login error")]
    InvalidOtp,

    #[error("Empty credential input")]
    EmptyInput,

    #[error("Invalid state transition: {from:?} -> {to:?}")]
    InvalidTransition {
        from: auth::AuthState,
        to: auth::AuthState,
    },

    #[error(transparent)]
    Api(#[from] ApiError),

    #[error(transparent)]
    Channel(#[from] ChannelError),
}

impl AuthError {
    /// Returns true for failures the operator caused (bad phone, wrong OTP)
    ///
    /// Transport and channel failures are not operator failures; they abort
    /// the run like any other transport error.
    pub fn is_operator_failure(&self) -> bool {
        matches!(self, Self::NoUserId | Self::InvalidOtp | Self::EmptyInput)
    }
}

/// Interactive channel errors
#[derive(Debug, Error)]
pub enum ChannelError {
    #[error("Channel closed before the operator replied")]
    Closed,

    #[error("Channel IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Result type alias for Course-Sweep operations
pub type Result<T> = std::result::Result<T, SweepError>;

/// Result type alias for configuration operations
pub type ConfigResult<T> = std::result::Result<T, ConfigError>;

/// Result type alias for platform API operations
pub type ApiResult<T> = std::result::Result<T, ApiError>;

// Re-export commonly used types
pub use api::{EndpointVersion, HttpPlatformApi, PlatformApi};
pub use auth::{AuthSession, Credential, IssuedVia};
pub use channel::{AuditLog, InteractiveChannel};
pub use config::Config;
pub use crawler::{classify, Category, Coordinator, CourseRef, TreeCrawler};
pub use manifest::{Manifest, ManifestEntry, Resource, RunSummary};
