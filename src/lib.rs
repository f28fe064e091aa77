//! Folder Size Analysis Library
//!
//! Computes the disk usage of every immediate child of a directory: each
//! entry's own metadata plus the cumulative size of everything beneath it.
//! Results can be re-ordered by descending size and serialized for
//! presentation layers.

pub mod cli;
pub mod models;
pub mod services;

pub use models::{ErrorItem, FolderAnalysis, ItemInfo, ItemType, ScanProgress};
pub use services::aggregate::{AggregationError, SizeAggregator, SubtreeTotals, WalkAggregator};
pub use services::scan::{ScanReport, ScanService};
pub use services::shared::SharedScanService;

use std::fmt;
use std::path::Path;
use std::result;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

/// Custom error type for the library
#[derive(Debug)]
pub enum Error {
    Io(std::io::Error),
    /// The scanned directory could not be enumerated.
    Listing {
        path: String,
        source: std::io::Error,
    },
    /// The subtree of `entry` could not be summed; the scan stopped after
    /// `appended` items. `skipped` lists entries passed over before that.
    Aggregation {
        entry: String,
        appended: usize,
        skipped: Vec<ErrorItem>,
        source: AggregationError,
    },
    Cancelled {
        appended: usize,
        skipped: Vec<ErrorItem>,
    },
    ScanInProgress,
}

impl Error {
    /// Number of items appended by the failed call, if it got that far.
    #[must_use]
    pub fn appended(&self) -> Option<usize> {
        match self {
            Error::Aggregation { appended, .. } | Error::Cancelled { appended, .. } => {
                Some(*appended)
            }
            _ => None,
        }
    }

    /// Entries the failed call skipped before stopping.
    #[must_use]
    pub fn skipped(&self) -> &[ErrorItem] {
        match self {
            Error::Aggregation { skipped, .. } | Error::Cancelled { skipped, .. } => {
                skipped.as_slice()
            }
            _ => &[],
        }
    }
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Error::Io(e) => write!(f, "I/O error: {e}"),
            Error::Listing { path, source } => {
                write!(f, "Cannot list directory {path}: {source}")
            }
            Error::Aggregation {
                entry,
                appended,
                source,
                ..
            } => write!(
                f,
                "Cannot compute size of {entry} ({appended} items recorded before abort): {source}"
            ),
            Error::Cancelled { appended, .. } => {
                write!(f, "Scan cancelled after {appended} items")
            }
            Error::ScanInProgress => write!(f, "Another scan is already in progress"),
        }
    }
}

impl std::error::Error for Error {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Error::Io(e) | Error::Listing { source: e, .. } => Some(e),
            Error::Aggregation { source, .. } => Some(source),
            Error::Cancelled { .. } | Error::ScanInProgress => None,
        }
    }
}

impl From<std::io::Error> for Error {
    fn from(err: std::io::Error) -> Self {
        Error::Io(err)
    }
}

pub type Result<T> = result::Result<T, Error>;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SizeBasis {
    /// Byte length as reported by the filesystem.
    #[default]
    Logical,
    /// Bytes actually allocated on disk.
    Physical,
}

impl SizeBasis {
    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            SizeBasis::Logical => "logical",
            SizeBasis::Physical => "physical",
        }
    }
}

impl std::str::FromStr for SizeBasis {
    type Err = String;

    fn from_str(s: &str) -> result::Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "logical" => Ok(SizeBasis::Logical),
            "physical" => Ok(SizeBasis::Physical),
            _ => Err(format!("unknown size basis '{s}'")),
        }
    }
}

/// Cooperative cancellation flag shared between a scan and its controller.
#[derive(Debug, Clone, Default)]
pub struct CancelToken(Arc<AtomicBool>);

impl CancelToken {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    pub fn cancel(&self) {
        self.0.store(true, Ordering::Release);
    }

    #[must_use]
    pub fn is_cancelled(&self) -> bool {
        self.0.load(Ordering::Acquire)
    }
}

/// Callback invoked after each item is appended to the analysis.
pub type ProgressNotifier = Arc<dyn Fn(&ScanProgress) + Send + Sync>;

/// Options for scanning a directory
#[derive(Clone, Default)]
pub struct ScanOptions {
    pub basis: SizeBasis,
    /// Discard previously scanned items at the start of every scan.
    pub reset_before_scan: bool,
    pub cancel: Option<CancelToken>,
    pub progress_notifier: Option<ProgressNotifier>,
}

impl fmt::Debug for ScanOptions {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ScanOptions")
            .field("basis", &self.basis)
            .field("reset_before_scan", &self.reset_before_scan)
            .field("cancel", &self.cancel)
            .field("progress_notifier", &self.progress_notifier.is_some())
            .finish()
    }
}

/// Scan a directory once and return its analysis ordered by descending size
///
/// # Arguments
/// * `path` - The directory whose immediate children are measured
/// * `opts` - Scan options
///
/// # Errors
/// Returns the first listing, aggregation or cancellation error hit by the scan.
pub fn scan_folder<P: AsRef<Path>>(path: P, opts: &ScanOptions) -> Result<FolderAnalysis> {
    let mut service = ScanService::with_options(opts.clone());
    let report = service.scan(path)?;

    if !report.skipped.is_empty() {
        log::info!(
            "{} entries skipped while scanning {}",
            report.skipped.len(),
            report.path
        );
    }

    service.order_by_heavy_item();
    Ok(service.into_analysis())
}
