//! Manifest aggregation and output
//!
//! This module handles:
//! - Accumulating folder markers and resources in traversal order
//! - Rendering the ordered line list (text and JSON forms)
//! - Computing per-category counts and the delivery caption
//! - Writing scoped manifest files for delivery

mod summary;
mod writer;

pub use summary::RunSummary;
pub use writer::{file_stem, sanitize_name, ManifestFiles};

use crate::crawler::{classify, Category};
use thiserror::Error;

/// Errors that can occur while writing manifest files
#[derive(Debug, Error)]
pub enum OutputError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Failed to encode JSON manifest: {0}")]
    Json(#[from] serde_json::Error),
}

/// Result type for output operations
pub type OutputResult<T> = Result<T, OutputError>;

/// A downloadable item found in a course
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Resource {
    pub name: String,
    pub url: String,
    pub category: Category,
}

impl Resource {
    /// Creates a resource categorised by its URL
    pub fn classified(name: impl Into<String>, url: impl Into<String>) -> Self {
        let url = url.into();
        Self {
            name: name.into(),
            category: classify(&url),
            url,
        }
    }

    /// Creates a lesson attachment; always [`Category::Note`]
    pub fn note(name: impl Into<String>, url: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            url: url.into(),
            category: Category::Note,
        }
    }
}

/// One manifest line: a folder marker or a resource
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ManifestEntry {
    /// Decorative separator; `depth` 0 is a topic, 1 a sub-topic
    Folder { name: String, depth: usize },
    Resource(Resource),
}

impl ManifestEntry {
    pub fn is_folder(&self) -> bool {
        matches!(self, Self::Folder { .. })
    }

    /// Renders the entry as it appears in the manifest
    pub fn render(&self) -> String {
        match self {
            Self::Folder { name, depth } => {
                let indent = "  ".repeat(*depth);
                let underline = "=".repeat(name.chars().count() + 4);
                format!("\n{indent}📁 {name}\n{indent}{underline}\n")
            }
            Self::Resource(resource) => format!(
                "    {} {}: {}",
                resource.category.icon(),
                resource.name,
                resource.url
            ),
        }
    }
}

/// Ordered entries for one course
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Manifest {
    entries: Vec<ManifestEntry>,
}

impl Manifest {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push_folder(&mut self, name: impl Into<String>, depth: usize) {
        self.entries.push(ManifestEntry::Folder {
            name: name.into(),
            depth,
        });
    }

    pub fn push_resource(&mut self, resource: Resource) {
        self.entries.push(ManifestEntry::Resource(resource));
    }

    pub fn entries(&self) -> &[ManifestEntry] {
        &self.entries
    }

    /// Resources in traversal order, without folder markers
    pub fn resources(&self) -> impl Iterator<Item = &Resource> {
        self.entries.iter().filter_map(|entry| match entry {
            ManifestEntry::Resource(resource) => Some(resource),
            ManifestEntry::Folder { .. } => None,
        })
    }

    pub fn resource_count(&self) -> usize {
        self.resources().count()
    }

    pub fn has_resources(&self) -> bool {
        self.resources().next().is_some()
    }

    /// Rendered lines in traversal order
    pub fn lines(&self) -> Vec<String> {
        self.entries.iter().map(ManifestEntry::render).collect()
    }

    /// Plain-text form: every line followed by a newline
    pub fn to_text(&self) -> String {
        self.entries
            .iter()
            .map(|entry| entry.render() + "\n")
            .collect()
    }

    /// JSON form: the same lines as a pretty-printed array
    pub fn to_json(&self) -> serde_json::Result<String> {
        serde_json::to_string_pretty(&self.lines())
    }
}
