//! Media discovery: candidate roots, classification, and the scan itself.

use chrono::{DateTime, Utc};
use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use thiserror::Error;

/// Kind of a discovered media file, derived from its name.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MediaKind {
    Image,
    Video,
}

impl MediaKind {
    /// Classifies a file name by its suffix, case-insensitively.
    ///
    /// Returns `None` for anything that is not status media. The match is
    /// against the whole name rather than `Path::extension` so that names
    /// like `.jpg` behave the same way the source application treats them.
    pub fn from_name(name: &str) -> Option<Self> {
        let lower = name.to_lowercase();
        if lower.ends_with(".jpg")
            || lower.ends_with(".jpeg")
            || lower.ends_with(".png")
            || lower.ends_with(".gif")
        {
            Some(MediaKind::Image)
        } else if lower.ends_with(".mp4") {
            Some(MediaKind::Video)
        } else {
            None
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            MediaKind::Image => "image",
            MediaKind::Video => "video",
        }
    }
}

/// One discovered status file. Immutable; lives for the duration of a
/// single discovery result.
#[derive(Debug, Clone, PartialEq)]
pub struct MediaEntry {
    pub path: PathBuf,
    pub name: String,
    pub kind: MediaKind,
    pub modified_date: DateTime<Utc>,
}

impl MediaEntry {
    /// Builds an entry from a path, classifying by name.
    ///
    /// Returns `Ok(None)` when the name does not classify as media.
    pub fn from_path(path: &Path) -> io::Result<Option<Self>> {
        let name = match path.file_name().and_then(|n| n.to_str()) {
            Some(n) => n.to_string(),
            None => return Ok(None),
        };

        let kind = match MediaKind::from_name(&name) {
            Some(k) => k,
            None => return Ok(None),
        };

        let metadata = fs::metadata(path)?;
        let modified_date: DateTime<Utc> = metadata.modified()?.into();

        Ok(Some(MediaEntry {
            path: path.to_path_buf(),
            name,
            kind,
            modified_date,
        }))
    }
}

/// Systemic discovery failure. Individual roots being absent or unreadable
/// never produce this; it means the storage subsystem itself is gone.
#[derive(Debug, Error)]
#[error("storage unavailable: {0}")]
pub struct ScanError(#[from] pub io::Error);

/// Returns the canonical candidate roots under a storage base, in scan
/// order: the legacy shared layout and the scoped `Android/media` layout,
/// for both the regular and the business variant of the app.
pub fn candidate_roots(base: &Path) -> Vec<PathBuf> {
    vec![
        base.join("WhatsApp/Media/.Statuses"),
        base.join("Android/media/com.whatsapp/WhatsApp/Media/.Statuses"),
        base.join("WhatsApp Business/Media/.Statuses"),
        base.join("Android/media/com.whatsapp.w4b/WhatsApp Business/Media/.Statuses"),
    ]
}

/// Scans the candidate roots for status media.
///
/// Roots that are missing or not directories are skipped; most devices
/// populate only one of them. A root that exists but cannot be listed is
/// likewise skipped and the scan continues with the remaining roots.
/// Matches are concatenated in root order and then sorted newest-first;
/// entries with equal timestamps keep their concatenation order.
///
/// An empty result is a normal outcome, not an error.
pub fn discover_statuses(roots: &[PathBuf]) -> Result<Vec<MediaEntry>, ScanError> {
    let mut entries = Vec::new();

    for root in roots {
        if !root.is_dir() {
            continue;
        }

        let listing = match fs::read_dir(root) {
            Ok(l) => l,
            // Listing can fail if access is revoked mid-scan; treat like a
            // missing root and keep going.
            Err(_) => continue,
        };

        for dir_entry in listing.flatten() {
            let path = dir_entry.path();

            let file_type = match dir_entry.file_type() {
                Ok(t) => t,
                Err(_) => continue,
            };
            if !file_type.is_file() {
                continue;
            }

            match MediaEntry::from_path(&path) {
                Ok(Some(entry)) => entries.push(entry),
                // Non-media name, or the file vanished between listing and
                // stat. Either way it is not part of the result.
                Ok(None) | Err(_) => continue,
            }
        }
    }

    sort_by_recency(&mut entries);
    Ok(entries)
}

/// Sorts entries by modification date, newest first. The sort is stable,
/// so entries with equal timestamps keep their relative order.
pub fn sort_by_recency(entries: &mut [MediaEntry]) {
    entries.sort_by(|a, b| b.modified_date.cmp(&a.modified_date));
}

/// Seam between the navigation controller and discovery, so tests can
/// substitute counting or failing scanners.
pub trait Scanner: Send + Sync + 'static {
    fn scan(&self) -> Result<Vec<MediaEntry>, ScanError>;
}

/// Filesystem-backed scanner over a fixed root list, with an optional
/// kind filter applied on top of the scan.
#[derive(Debug, Clone)]
pub struct StatusScanner {
    roots: Vec<PathBuf>,
    kind: Option<MediaKind>,
}

impl StatusScanner {
    pub fn new(roots: Vec<PathBuf>) -> Self {
        Self { roots, kind: None }
    }

    /// Restricts results to one media kind. Filtering never reorders.
    pub fn with_kind(mut self, kind: Option<MediaKind>) -> Self {
        self.kind = kind;
        self
    }

    pub fn roots(&self) -> &[PathBuf] {
        &self.roots
    }
}

impl Scanner for StatusScanner {
    fn scan(&self) -> Result<Vec<MediaEntry>, ScanError> {
        let mut entries = discover_statuses(&self.roots)?;
        if let Some(kind) = self.kind {
            entries.retain(|e| e.kind == kind);
        }
        Ok(entries)
    }
}
