//! Per-node size under a chosen basis, with platform-specific physical sizes

use crate::SizeBasis;
use std::fs::Metadata;
use std::path::Path;

#[cfg(unix)]
use std::os::unix::fs::MetadataExt;

/// Size of a single non-directory node under `basis`
#[must_use]
pub fn node_size(basis: SizeBasis, path: &Path, metadata: &Metadata) -> u64 {
    match basis {
        SizeBasis::Logical => logical_size(metadata),
        SizeBasis::Physical => physical_size(path, metadata),
    }
}

/// Compute logical size from metadata
#[must_use]
pub fn logical_size(metadata: &Metadata) -> u64 {
    metadata.len()
}

/// Allocated size: 512-byte block count on Unix
#[cfg(unix)]
#[must_use]
pub fn physical_size(_path: &Path, metadata: &Metadata) -> u64 {
    metadata.blocks() * 512
}

/// Allocated size via `GetCompressedFileSizeW`, falling back to the logical size
#[cfg(windows)]
#[must_use]
pub fn physical_size(path: &Path, metadata: &Metadata) -> u64 {
    use std::os::windows::ffi::OsStrExt;
    use windows_sys::Win32::Storage::FileSystem::GetCompressedFileSizeW;

    const INVALID_FILE_SIZE: u32 = 0xFFFF_FFFF;

    let wide: Vec<u16> = path
        .as_os_str()
        .encode_wide()
        .chain(std::iter::once(0))
        .collect();

    let mut high: u32 = 0;
    let low = unsafe { GetCompressedFileSizeW(wide.as_ptr(), &mut high) };

    if low == INVALID_FILE_SIZE {
        log::warn!(
            "Failed to get physical size for {}, using logical size",
            path.display()
        );
        logical_size(metadata)
    } else {
        (u64::from(high) << 32) | u64::from(low)
    }
}

#[cfg(not(any(unix, windows)))]
#[must_use]
pub fn physical_size(_path: &Path, metadata: &Metadata) -> u64 {
    logical_size(metadata)
}
