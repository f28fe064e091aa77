//! Scan service: measures every immediate child of a directory
//!
//! Error policy per entry of the scanned directory:
//!
//! - the directory itself cannot be listed: the call fails with
//!   [`Error::Listing`] and the analysis is left untouched;
//! - an entry's own metadata cannot be read: the entry is skipped and
//!   reported in [`ScanReport::skipped`], the scan continues;
//! - an entry's subtree cannot be summed: the scan stops with
//!   [`Error::Aggregation`], keeping the items appended before it.
//!
//! Aborting errors carry the entries skipped earlier in the same call.

use crate::models::{ErrorItem, FolderAnalysis, ItemInfo, ItemType, ScanProgress};
use crate::services::aggregate::{
    self, AggregationError, SizeAggregator, SubtreeTotals, WalkAggregator,
};
use crate::services::format::format_size;
use crate::services::metadata;
use crate::{CancelToken, Error, Result, ScanOptions};
use chrono::Utc;
use std::fs;
use std::io;
use std::path::Path;
use std::result;
use std::time::{Duration, Instant};

/// Outcome of a scan call that ran to completion
#[derive(Debug, Clone, Default)]
pub struct ScanReport {
    pub path: String,
    pub appended: usize,
    pub skipped: Vec<ErrorItem>,
    pub elapsed: Duration,
}

/// Owns one [`FolderAnalysis`] and fills it from directory scans.
///
/// Scans accumulate: each call appends to the items of the previous ones
/// unless [`ScanOptions::reset_before_scan`] is set or [`ScanService::clear`]
/// is called in between.
#[derive(Debug)]
pub struct ScanService<A: SizeAggregator = WalkAggregator> {
    analysis: FolderAnalysis,
    options: ScanOptions,
    aggregator: A,
}

impl Default for ScanService<WalkAggregator> {
    fn default() -> Self {
        Self::new()
    }
}

impl ScanService<WalkAggregator> {
    #[must_use]
    pub fn new() -> Self {
        Self::with_options(ScanOptions::default())
    }

    #[must_use]
    pub fn with_options(options: ScanOptions) -> Self {
        let aggregator = WalkAggregator::new(options.basis);
        Self::with_aggregator(aggregator, options)
    }
}

impl<A: SizeAggregator> ScanService<A> {
    /// Build a service that sizes entries with a custom aggregator.
    #[must_use]
    pub fn with_aggregator(aggregator: A, options: ScanOptions) -> Self {
        Self {
            analysis: FolderAnalysis::default(),
            options,
            aggregator,
        }
    }

    /// Scan the immediate children of `path` and append one item per entry
    ///
    /// Entries are processed in file-name order.
    ///
    /// # Errors
    /// [`Error::Listing`] if `path` cannot be listed, [`Error::Aggregation`]
    /// if an entry's subtree cannot be summed, [`Error::Cancelled`] if the
    /// cancel token fires between entries.
    pub fn scan<P: AsRef<Path>>(&mut self, path: P) -> Result<ScanReport> {
        let dir = path.as_ref();
        let dir_str = dir.to_string_lossy().to_string();
        let started = Instant::now();

        let entries = list_entries(dir).map_err(|source| {
            log::warn!("Cannot list {dir_str}: {source}");
            Error::Listing {
                path: dir_str.clone(),
                source,
            }
        })?;

        if self.options.reset_before_scan {
            self.analysis.items.clear();
        }

        log::info!("Scanning {dir_str} ({} entries)", entries.len());

        let mut report = ScanReport {
            path: dir_str.clone(),
            ..ScanReport::default()
        };
        let outcome = self.process_entries(dir, &entries, &mut report);

        report.elapsed = started.elapsed();
        self.analysis.current_path = dir_str;
        self.analysis.analysis_time = report.elapsed;
        self.analysis.timestamp = Utc::now();
        self.analysis.refresh_totals();

        log::info!(
            "Scan of {} finished in {:?}: {} appended, {} skipped",
            report.path,
            report.elapsed,
            report.appended,
            report.skipped.len()
        );

        match outcome {
            Ok(()) => Ok(report),
            Err(abort) => Err(abort.into_error(report)),
        }
    }

    fn process_entries(
        &mut self,
        dir: &Path,
        entries: &[fs::DirEntry],
        report: &mut ScanReport,
    ) -> result::Result<(), Abort> {
        let total = entries.len();
        let mut bytes = 0u64;

        for (index, entry) in entries.iter().enumerate() {
            if self
                .options
                .cancel
                .as_ref()
                .is_some_and(CancelToken::is_cancelled)
            {
                log::info!("Scan of {} cancelled", dir.display());
                return Err(Abort::Cancelled);
            }

            let name = entry.file_name().to_string_lossy().to_string();
            let full_path = dir.join(entry.file_name());
            let path_str = full_path.to_string_lossy().to_string();

            let (meta, file_type) = match stat_entry(entry, &full_path) {
                Ok(pair) => pair,
                Err(e) => {
                    log::warn!("Skipping {path_str}: {e}");
                    report.skipped.push(ErrorItem::from_io(&path_str, &e));
                    continue;
                }
            };

            let totals = match self.aggregator.compute_totals(&full_path) {
                Ok(totals) => totals,
                Err(source) => {
                    log::warn!("Aborting scan of {}: {source}", dir.display());
                    return Err(Abort::Aggregation {
                        entry: path_str,
                        source,
                    });
                }
            };

            let item_type = if file_type.is_dir() {
                ItemType::Folder
            } else {
                ItemType::File
            };
            let item = build_item(name, path_str, item_type, totals, &meta, &full_path);

            log::debug!(
                "{} entry: {} (size: {}, files: {}, folders: {})",
                item.item_type.as_str(),
                item.path,
                item.size,
                item.file_count,
                item.folder_count
            );

            bytes = bytes.saturating_add(item.size);
            let progress_path = item.path.clone();
            self.analysis.items.push(item);
            report.appended += 1;

            if let Some(notifier) = &self.options.progress_notifier {
                notifier(&ScanProgress {
                    processed: index + 1,
                    total,
                    path: progress_path,
                    bytes,
                });
            }
        }

        Ok(())
    }

    /// Re-sort the items by descending size.
    pub fn order_by_heavy_item(&mut self) {
        aggregate::sort_by_size(&mut self.analysis.items);
    }

    #[must_use]
    pub fn items(&self) -> &[ItemInfo] {
        &self.analysis.items
    }

    #[must_use]
    pub fn analysis(&self) -> &FolderAnalysis {
        &self.analysis
    }

    #[must_use]
    pub fn into_analysis(self) -> FolderAnalysis {
        self.analysis
    }

    /// Drop every accumulated item and zero the totals.
    pub fn clear(&mut self) {
        self.analysis.items.clear();
        self.analysis.refresh_totals();
    }
}

/// Why a scan stopped before its last entry.
enum Abort {
    Aggregation {
        entry: String,
        source: AggregationError,
    },
    Cancelled,
}

impl Abort {
    /// Carry what the call did manage to record into the public error.
    fn into_error(self, report: ScanReport) -> Error {
        let ScanReport { appended, skipped, .. } = report;

        match self {
            Abort::Aggregation { entry, source } => Error::Aggregation {
                entry,
                appended,
                skipped,
                source,
            },
            Abort::Cancelled => Error::Cancelled { appended, skipped },
        }
    }
}

fn build_item(
    name: String,
    path: String,
    item_type: ItemType,
    totals: SubtreeTotals,
    meta: &fs::Metadata,
    full_path: &Path,
) -> ItemInfo {
    let (file_count, folder_count, extension) = match item_type {
        ItemType::Folder => (totals.files, totals.folders, String::new()),
        ItemType::File => (0, 0, metadata::extension_of(&name)),
    };

    ItemInfo {
        is_hidden: metadata::is_hidden(&name, meta),
        last_modified: metadata::modified_at(full_path, meta),
        size: totals.bytes,
        size_human: format_size(totals.bytes),
        file_count,
        folder_count,
        extension,
        item_type,
        name,
        path,
    }
}

/// Followed metadata of an entry plus its unfollowed listing type
fn stat_entry(entry: &fs::DirEntry, path: &Path) -> io::Result<(fs::Metadata, fs::FileType)> {
    let meta = fs::metadata(path)?;
    Ok((meta, entry.file_type()?))
}

/// Immediate entries of `dir`, sorted by file name
fn list_entries(dir: &Path) -> io::Result<Vec<fs::DirEntry>> {
    let mut entries = fs::read_dir(dir)?.collect::<io::Result<Vec<_>>>()?;
    entries.sort_by_key(fs::DirEntry::file_name);
    Ok(entries)
}
