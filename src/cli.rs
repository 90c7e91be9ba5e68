// CLI module for argument parsing and configuration

use crate::domain::{candidate_roots, MediaKind};
use clap::{Parser, ValueEnum};
use std::path::PathBuf;

/// Statusview - a terminal viewer for messaging-app status media
///
/// Point it at a mounted device storage root and browse the status files
/// the messaging application has cached there.
#[derive(Parser, Debug, Clone)]
#[command(name = "statusview")]
#[command(author, version, about, long_about = None)]
pub struct Args {
    /// Device storage root to look under (e.g. a mount point)
    ///
    /// The canonical status directories are resolved beneath this path.
    /// Falls back to the last root used, persisted in the user config.
    pub storage: Option<PathBuf>,

    /// Scan exactly this directory instead of the canonical roots
    ///
    /// Can be given multiple times; roots are scanned in the order given.
    #[arg(long = "root")]
    pub roots: Vec<PathBuf>,

    /// Only show one kind of media
    #[arg(short = 'k', long = "kind", value_enum)]
    pub kind: Option<KindFilter>,
}

/// Media kind filter options
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum KindFilter {
    /// Images (jpg, jpeg, png, gif)
    Image,
    /// Videos (mp4)
    Video,
}

impl From<KindFilter> for MediaKind {
    fn from(filter: KindFilter) -> Self {
        match filter {
            KindFilter::Image => MediaKind::Image,
            KindFilter::Video => MediaKind::Video,
        }
    }
}

impl Args {
    /// Parse command line arguments
    pub fn parse_args() -> Self {
        Args::parse()
    }

    /// Resolves the candidate root list: explicit `--root` overrides win,
    /// otherwise the canonical roots under the storage base.
    pub fn resolve_roots(&self, base: &std::path::Path) -> Vec<PathBuf> {
        if self.roots.is_empty() {
            candidate_roots(base)
        } else {
            self.roots.clone()
        }
    }

    pub fn kind_filter(&self) -> Option<MediaKind> {
        self.kind.map(Into::into)
    }

    /// Directory the permission probe targets: the storage base when one
    /// is resolved, otherwise the first `--root` override itself, so the
    /// probed directory is always one the scan actually reads.
    pub fn permission_base(&self, base: Option<&PathBuf>) -> PathBuf {
        match base {
            Some(b) => b.clone(),
            None => self
                .roots
                .first()
                .cloned()
                .unwrap_or_else(|| PathBuf::from(".")),
        }
    }

    /// Validates the arguments against a resolved storage base.
    ///
    /// With `--root` overrides the base is not required to exist; the
    /// scan itself tolerates missing roots.
    pub fn validate(&self, base: Option<&PathBuf>) -> Result<(), String> {
        if !self.roots.is_empty() {
            return Ok(());
        }

        let base = base.ok_or_else(|| {
            "No storage root given and none remembered. \
             Pass a storage root (e.g. `statusview /mnt/phone`) or --root."
                .to_string()
        })?;

        if !base.exists() {
            return Err(format!("Storage root does not exist: {}", base.display()));
        }
        if !base.is_dir() {
            return Err(format!(
                "Storage root is not a directory: {}",
                base.display()
            ));
        }

        Ok(())
    }
}
