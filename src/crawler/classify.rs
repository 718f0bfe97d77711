//! Resource classification by URL
//!
//! Order matters: the video checks run first and the first match wins, so a
//! platform-hosted video with a `.pdf`-looking tail is still a video.

use std::fmt;
use url::Url;

/// Content category of a manifest resource
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Category {
    Video,
    Pdf,
    Doc,
    Image,
    /// Lesson-detail attachment; never produced by [`classify`]
    Note,
    Other,
}

impl Category {
    /// Marker printed in front of the resource line
    pub fn icon(&self) -> &'static str {
        match self {
            Self::Video => "🎬",
            Self::Pdf => "📄",
            Self::Doc => "📑",
            Self::Image => "🖼",
            Self::Note => "📝",
            Self::Other => "🔗",
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Video => "video",
            Self::Pdf => "pdf",
            Self::Doc => "doc",
            Self::Image => "image",
            Self::Note => "note",
            Self::Other => "other",
        }
    }

    pub fn all() -> [Category; 6] {
        [
            Self::Video,
            Self::Pdf,
            Self::Doc,
            Self::Image,
            Self::Note,
            Self::Other,
        ]
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

const VIDEO_EXTENSIONS: &[&str] = &["m3u8", "mpd", "mp4", "avi", "mov", "wmv", "flv", "webm"];
const STREAM_MANIFEST_NAMES: &[&str] = &["playlist.m3u8", "master.m3u8"];
const PLATFORM_VIDEO_MARKER: &str = "studyiq.net/video";
const DOC_EXTENSIONS: &[&str] = &["doc", "docx", "ppt", "pptx"];
const IMAGE_EXTENSIONS: &[&str] = &["jpg", "jpeg", "png", "gif", "webp"];

/// Maps a resource URL to its category
///
/// # Examples
///
/// ```
/// use course_sweep::crawler::{classify, Category};
///
/// assert_eq!(classify("https://cdn.example.com/a/lecture.mp4"), Category::Video);
/// assert_eq!(classify("https://cdn.example.com/notes.PDF?sig=1"), Category::Pdf);
/// assert_eq!(classify("https://example.com/page"), Category::Other);
/// ```
pub fn classify(url: &str) -> Category {
    let lowered = url.to_lowercase();
    let ext = extension(&lowered);
    let has_ext = |set: &[&str]| ext.as_deref().map_or(false, |e| set.contains(&e));

    if has_ext(VIDEO_EXTENSIONS)
        || STREAM_MANIFEST_NAMES.iter().any(|name| lowered.contains(name))
        || lowered.contains(PLATFORM_VIDEO_MARKER)
    {
        Category::Video
    } else if ext.as_deref() == Some("pdf") {
        Category::Pdf
    } else if has_ext(DOC_EXTENSIONS) {
        Category::Doc
    } else if has_ext(IMAGE_EXTENSIONS) {
        Category::Image
    } else {
        Category::Other
    }
}

/// Extension of the last path segment, ignoring query and fragment
fn extension(url: &str) -> Option<String> {
    let path = match Url::parse(url) {
        Ok(parsed) => parsed.path().to_string(),
        Err(_) => url
            .split(|c: char| c == '?' || c == '#')
            .next()
            .unwrap_or_default()
            .to_string(),
    };

    let segment = path.rsplit('/').next()?;
    let (stem, ext) = segment.rsplit_once('.')?;
    if stem.is_empty() || ext.is_empty() {
        return None;
    }
    Some(ext.to_string())
}
