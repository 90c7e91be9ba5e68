//! Storage permission as an external boolean capability.
//!
//! The controller only ever reads the flag; acquiring permission is the
//! platform's business. On the desktop that reduces to "can we list the
//! storage base at all".

use std::fs;
use std::path::PathBuf;

/// Read-only view of the storage permission flag. Queried once per
/// gallery request; never re-checked mid-scan.
pub trait PermissionProbe: Send + Sync + 'static {
    fn current(&self) -> bool;
}

/// Probes permission by attempting to list the storage base.
#[derive(Debug, Clone)]
pub struct StoragePermission {
    base: PathBuf,
}

impl StoragePermission {
    pub fn new(base: PathBuf) -> Self {
        Self { base }
    }
}

impl PermissionProbe for StoragePermission {
    fn current(&self) -> bool {
        fs::read_dir(&self.base).is_ok()
    }
}
