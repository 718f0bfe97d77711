//! Per-course summary statistics

use crate::crawler::Category;
use crate::manifest::{Manifest, ManifestEntry};
use std::collections::BTreeMap;
use std::time::Duration;

/// Counts and timing for one crawled course
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RunSummary {
    pub elapsed: Duration,
    /// Resource count per category; categories with no resources are absent
    pub counts: BTreeMap<Category, usize>,
    /// Folder marker lines, never part of `total`
    pub folders: usize,
    /// Number of resources
    pub total: usize,
}

impl RunSummary {
    /// Counts the structured entries of a finished manifest
    pub fn from_manifest(manifest: &Manifest, elapsed: Duration) -> Self {
        let mut counts = BTreeMap::new();
        let mut folders = 0;
        let mut total = 0;

        for entry in manifest.entries() {
            match entry {
                ManifestEntry::Folder { .. } => folders += 1,
                ManifestEntry::Resource(resource) => {
                    *counts.entry(resource.category).or_insert(0) += 1;
                    total += 1;
                }
            }
        }

        Self {
            elapsed,
            counts,
            folders,
            total,
        }
    }

    pub fn count(&self, category: Category) -> usize {
        self.counts.get(&category).copied().unwrap_or(0)
    }

    /// Every manifest line, folders included
    pub fn line_count(&self) -> usize {
        self.total + self.folders
    }

    /// Lines that are neither a known category nor a folder marker
    pub fn other(&self) -> usize {
        let known = self.count(Category::Video)
            + self.count(Category::Pdf)
            + self.count(Category::Doc)
            + self.count(Category::Image)
            + self.folders
            + self.count(Category::Note);
        self.line_count().saturating_sub(known)
    }

    /// Elapsed time as `MM:SS`
    pub fn elapsed_clock(&self) -> String {
        let secs = self.elapsed.as_secs();
        format!("{:02}:{:02}", secs / 60, secs % 60)
    }

    /// Caption sent along with the text manifest
    pub fn caption(&self, batch_name: &str, batch_id: &str, date: &str) -> String {
        let mut caption = String::new();

        caption.push_str("🎓 COURSE EXTRACTED 🎓\n\n");
        caption.push_str(&format!("📚 BATCH: {} (ID: {})\n", batch_name, batch_id));
        caption.push_str(&format!("⏱ TIME: {}\n", self.elapsed_clock()));
        caption.push_str(&format!("📅 DATE: {}\n\n", date));

        caption.push_str("📊 STATS\n");
        caption.push_str(&format!("├─ 📁 Total Links: {}\n", self.total));
        caption.push_str(&format!("├─ 🎬 Videos: {}\n", self.count(Category::Video)));
        caption.push_str(&format!("├─ 📄 PDFs: {}\n", self.count(Category::Pdf)));
        caption.push_str(&format!("├─ 📑 Docs: {}\n", self.count(Category::Doc)));
        caption.push_str(&format!("├─ 🖼 Images: {}\n", self.count(Category::Image)));
        caption.push_str(&format!("├─ 📝 Notes: {}\n", self.count(Category::Note)));
        caption.push_str(&format!("└─ 📦 Others: {}", self.other()));

        caption
    }
}
