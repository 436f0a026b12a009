use std::path::Path;

use crate::manifest::master::MASTER_PLAYLIST_NAME;

/// `true` when `output_root/master.m3u8` exists.
///
/// The master playlist is only ever written after every rendition is complete, so its presence
/// means the whole run finished. Deleting the output tree is the only way to invalidate it.
pub fn already_processed(output_root: &Path) -> bool {
    output_root.join(MASTER_PLAYLIST_NAME).is_file()
}

#[cfg(test)]
#[path = "../../tests/unit/pipeline/guard.rs"]
mod tests;
