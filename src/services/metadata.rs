//! Per-entry attributes derived from names and filesystem metadata

use chrono::{DateTime, Utc};
use std::fs::Metadata;
use std::path::Path;

/// Whether an entry is hidden on this platform
#[cfg(windows)]
#[must_use]
pub fn is_hidden(name: &str, metadata: &Metadata) -> bool {
    use std::os::windows::fs::MetadataExt;
    use windows_sys::Win32::Storage::FileSystem::FILE_ATTRIBUTE_HIDDEN;

    (metadata.file_attributes() & FILE_ATTRIBUTE_HIDDEN) != 0 || name.starts_with('.')
}

/// Whether an entry is hidden on this platform
#[cfg(not(windows))]
#[must_use]
pub fn is_hidden(name: &str, _metadata: &Metadata) -> bool {
    name.starts_with('.')
}

/// Extension of a file name with its leading dot, or empty.
///
/// Dotfiles such as `.bashrc` have no extension.
#[must_use]
pub fn extension_of(name: &str) -> String {
    Path::new(name)
        .extension()
        .map(|ext| format!(".{}", ext.to_string_lossy()))
        .unwrap_or_default()
}

/// Modification time, or the Unix epoch when the platform cannot report it
#[must_use]
pub fn modified_at(path: &Path, metadata: &Metadata) -> DateTime<Utc> {
    match metadata.modified() {
        Ok(time) => DateTime::<Utc>::from(time),
        Err(e) => {
            log::debug!("No modification time for {}: {e}", path.display());
            DateTime::<Utc>::from(std::time::UNIX_EPOCH)
        }
    }
}
