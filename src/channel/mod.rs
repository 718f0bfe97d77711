//! Operator-facing collaborators
//!
//! The crawl core talks to the operator only through [`InteractiveChannel`]
//! and leaves an audit trail of raw operator input through [`AuditLog`].

mod terminal;

pub use terminal::TerminalChannel;

use crate::ChannelError;
use async_trait::async_trait;
use std::path::Path;

/// Prompting and delivery capability of the operator's channel
///
/// `prompt_and_await_text` is a suspension point: the run blocks until the
/// operator replies. Timeouts and cancellation are the channel's business.
#[async_trait]
pub trait InteractiveChannel: Send {
    /// Shows `prompt` and waits for the operator's next text reply
    async fn prompt_and_await_text(&mut self, prompt: &str) -> Result<String, ChannelError>;

    /// Sends an informational message
    async fn deliver_message(&mut self, text: &str) -> Result<(), ChannelError>;

    /// Delivers a file with a caption
    ///
    /// The caller may delete `path` as soon as this returns.
    async fn deliver_file(&mut self, path: &Path, caption: &str) -> Result<(), ChannelError>;
}

/// Receives every raw operator input before it is consumed
pub trait AuditLog: Send + Sync {
    fn record(&self, source: &str, input: &str);
}

/// Audit log writing to the `audit` tracing target
#[derive(Debug, Default, Clone, Copy)]
pub struct TracingAudit;

impl AuditLog for TracingAudit {
    fn record(&self, source: &str, input: &str) {
        tracing::info!(target: "audit", source, input, "operator input");
    }
}
