//! Data models for scanned items, folder analyses, and errors

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Classification of a scanned entry, taken from the directory listing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ItemType {
    File,
    Folder,
}

impl ItemType {
    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            ItemType::File => "file",
            ItemType::Folder => "folder",
        }
    }
}

/// One immediate child of a scanned directory
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ItemInfo {
    pub name: String,
    pub path: String,
    /// Own length for files, subtree total for folders.
    pub size: u64,
    pub size_human: String,
    pub file_count: u64,
    pub folder_count: u64,
    pub last_modified: DateTime<Utc>,
    pub is_hidden: bool,
    /// Extension of the entry's own name with its leading dot (`.txt`).
    ///
    /// Empty for folders and for names without one. Earlier consumers of
    /// this format derived it from the scanned directory instead.
    pub extension: String,
    #[serde(rename = "type")]
    pub item_type: ItemType,
}

impl ItemInfo {
    #[must_use]
    pub fn is_folder(&self) -> bool {
        self.item_type == ItemType::Folder
    }
}

/// Result of one or more scans held by a scan service
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FolderAnalysis {
    pub current_path: String,
    pub total_size: u64,
    pub total_size_human: String,
    pub item_count: usize,
    pub folder_count: usize,
    pub file_count: usize,
    pub items: Vec<ItemInfo>,
    #[serde(with = "duration_nanos")]
    pub analysis_time: Duration,
    pub timestamp: DateTime<Utc>,
}

impl Default for FolderAnalysis {
    fn default() -> Self {
        Self {
            current_path: String::new(),
            total_size: 0,
            total_size_human: crate::services::format::format_size(0),
            item_count: 0,
            folder_count: 0,
            file_count: 0,
            items: Vec::new(),
            analysis_time: Duration::ZERO,
            timestamp: Utc::now(),
        }
    }
}

impl FolderAnalysis {
    /// Recompute the aggregate fields from `items`.
    pub fn refresh_totals(&mut self) {
        self.total_size = self
            .items
            .iter()
            .fold(0u64, |acc, item| acc.saturating_add(item.size));
        self.total_size_human = crate::services::format::format_size(self.total_size);
        self.item_count = self.items.len();
        self.folder_count = self.items.iter().filter(|item| item.is_folder()).count();
        self.file_count = self.item_count - self.folder_count;
    }
}

/// An entry skipped during a scan
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ErrorItem {
    pub path: String,
    pub code: String,
    pub message: String,
}

impl ErrorItem {
    #[must_use]
    pub fn from_io(path: &str, error: &std::io::Error) -> Self {
        let code = match error.kind() {
            std::io::ErrorKind::NotFound => "ENOENT",
            std::io::ErrorKind::PermissionDenied => "EACCES",
            _ => "IO",
        };

        Self {
            path: path.to_string(),
            code: code.to_string(),
            message: error.to_string(),
        }
    }
}

/// Progress emitted after each appended item.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScanProgress {
    /// Entries handled so far in this scan, skipped ones included.
    pub processed: usize,
    pub total: usize,
    pub path: String,
    /// Bytes appended so far in this scan.
    pub bytes: u64,
}

/// `Duration` as integer nanoseconds on the wire.
mod duration_nanos {
    use serde::{Deserialize, Deserializer, Serializer};
    use std::time::Duration;

    pub fn serialize<S: Serializer>(value: &Duration, serializer: S) -> Result<S::Ok, S::Error> {
        let nanos = u64::try_from(value.as_nanos()).unwrap_or(u64::MAX);
        serializer.serialize_u64(nanos)
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Duration, D::Error> {
        u64::deserialize(deserializer).map(Duration::from_nanos)
    }
}
