//! Statusview - a terminal viewer for messaging-app status media
//!
//! This crate provides the discovery service that locates status files
//! across the candidate storage roots and the navigation controller that
//! drives the Home -> Grid -> Detail screens.

pub mod cli;
pub mod config;
pub mod domain;
pub mod error;
pub mod navigation;
pub mod opener;
pub mod permission;
pub mod tui;

// Re-export primary types for convenience
pub use config::UserConfig;
pub use domain::{
    candidate_roots, discover_statuses, sort_by_recency, MediaEntry, MediaKind, ScanError,
    Scanner, StatusScanner,
};
pub use error::{Result, StatusViewError};
pub use navigation::{NavigationController, NavigationState, Notice};
pub use opener::open_media;
pub use permission::{PermissionProbe, StoragePermission};
