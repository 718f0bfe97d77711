//! Scoped manifest files
//!
//! Both renderings are written into a private temporary directory that is
//! removed when [`ManifestFiles`] is dropped, whether delivery succeeded or
//! not.

use crate::manifest::{Manifest, OutputResult};
use std::fs::File;
use std::io::Write;
use std::path::{Path, PathBuf};
use tempfile::TempDir;

const FORBIDDEN_CHARS: &[char] = &['\\', '/', ':', '*', '?', '"', '<', '>', '|', '\t', '\n', '\r'];

/// Text and JSON manifest files living in a temporary directory
#[derive(Debug)]
pub struct ManifestFiles {
    dir: TempDir,
    text_path: PathBuf,
    json_path: PathBuf,
}

impl ManifestFiles {
    /// Writes `<stem>.txt` and `<stem>.json` for the manifest
    pub fn write(manifest: &Manifest, stem: &str) -> OutputResult<Self> {
        let dir = TempDir::new()?;
        let text_path = dir.path().join(format!("{}.txt", stem));
        let json_path = dir.path().join(format!("{}.json", stem));

        let mut text_file = File::create(&text_path)?;
        text_file.write_all(manifest.to_text().as_bytes())?;

        let mut json_file = File::create(&json_path)?;
        json_file.write_all(manifest.to_json()?.as_bytes())?;

        tracing::debug!("Wrote manifest files under {}", dir.path().display());

        Ok(Self {
            dir,
            text_path,
            json_path,
        })
    }

    pub fn text_path(&self) -> &Path {
        &self.text_path
    }

    pub fn json_path(&self) -> &Path {
        &self.json_path
    }

    pub fn dir(&self) -> &Path {
        self.dir.path()
    }
}

/// Strips path-hostile characters, trims, and truncates to `max_len` chars
pub fn sanitize_name(name: &str, max_len: usize) -> String {
    let cleaned: String = name
        .chars()
        .filter(|c| !FORBIDDEN_CHARS.contains(c))
        .collect();
    cleaned.trim().chars().take(max_len).collect()
}

/// File stem for a course, falling back to `Batch_<id>`
pub fn file_stem(title: &str, course_id: &str, max_len: usize) -> String {
    let stem = sanitize_name(title, max_len);
    if stem.is_empty() {
        sanitize_name(&format!("Batch_{}", course_id), max_len)
    } else {
        stem
    }
}
