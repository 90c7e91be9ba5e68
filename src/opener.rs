//! Hands a media file to the platform's default handler.
//!
//! Playback is not driven by this crate; the detail screen only hands the
//! selected file off.

use crate::error::Result;
use std::path::Path;

pub fn open_media(path: &Path) -> Result<()> {
    open::that(path)?;
    Ok(())
}
