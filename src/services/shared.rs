//! Thread-safe scan service that rejects overlapping scans

use crate::models::{FolderAnalysis, ItemInfo};
use crate::services::aggregate::{SizeAggregator, WalkAggregator};
use crate::services::scan::{ScanReport, ScanService};
use crate::{Error, Result, ScanOptions};
use std::path::Path;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Mutex, MutexGuard, PoisonError};

/// A [`ScanService`] callable from several threads.
///
/// Only one scan may run at a time; a second caller gets
/// [`Error::ScanInProgress`] instead of waiting. Reads and re-sorting
/// wait for a running scan to finish.
#[derive(Debug)]
pub struct SharedScanService<A: SizeAggregator = WalkAggregator> {
    inner: Mutex<ScanService<A>>,
    is_analyzing: AtomicBool,
}

impl Default for SharedScanService<WalkAggregator> {
    fn default() -> Self {
        Self::new(ScanService::new())
    }
}

impl SharedScanService<WalkAggregator> {
    #[must_use]
    pub fn with_options(options: ScanOptions) -> Self {
        Self::new(ScanService::with_options(options))
    }
}

/// Clears the analyzing flag when the scan returns or unwinds.
struct AnalyzingGuard<'a>(&'a AtomicBool);

impl Drop for AnalyzingGuard<'_> {
    fn drop(&mut self) {
        self.0.store(false, Ordering::Release);
    }
}

impl<A: SizeAggregator> SharedScanService<A> {
    #[must_use]
    pub fn new(service: ScanService<A>) -> Self {
        Self {
            inner: Mutex::new(service),
            is_analyzing: AtomicBool::new(false),
        }
    }

    /// Scan `path` unless another scan is running
    ///
    /// # Errors
    /// [`Error::ScanInProgress`] when a scan is already running, otherwise
    /// whatever [`ScanService::scan`] returns.
    pub fn scan<P: AsRef<Path>>(&self, path: P) -> Result<ScanReport> {
        if self
            .is_analyzing
            .compare_exchange(false, true, Ordering::AcqRel, Ordering::Acquire)
            .is_err()
        {
            log::warn!(
                "Rejected scan of {}: another scan is in progress",
                path.as_ref().display()
            );
            return Err(Error::ScanInProgress);
        }

        let _guard = AnalyzingGuard(&self.is_analyzing);
        self.lock().scan(path)
    }

    #[must_use]
    pub fn is_analyzing(&self) -> bool {
        self.is_analyzing.load(Ordering::Acquire)
    }

    pub fn order_by_heavy_item(&self) {
        self.lock().order_by_heavy_item();
    }

    /// Snapshot of the current items.
    #[must_use]
    pub fn items(&self) -> Vec<ItemInfo> {
        self.lock().items().to_vec()
    }

    #[must_use]
    pub fn analysis(&self) -> FolderAnalysis {
        self.lock().analysis().clone()
    }

    pub fn clear(&self) {
        self.lock().clear();
    }

    #[must_use]
    pub fn into_inner(self) -> ScanService<A> {
        self.inner
            .into_inner()
            .unwrap_or_else(PoisonError::into_inner)
    }

    // Items are appended whole, so a poisoned analysis is still consistent.
    fn lock(&self) -> MutexGuard<'_, ScanService<A>> {
        self.inner.lock().unwrap_or_else(PoisonError::into_inner)
    }
}
