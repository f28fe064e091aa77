//! Subtree size aggregation and size ordering

use crate::SizeBasis;
use crate::models::ItemInfo;
use crate::services::size;
use std::cmp::Reverse;
use std::fmt;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};

/// Totals collected while walking one subtree.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SubtreeTotals {
    pub bytes: u64,
    /// Non-directory nodes, the root included when it is one.
    pub files: u64,
    /// Directories below the root.
    pub folders: u64,
}

/// A node inside the subtree could not be read; the whole total is void.
#[derive(Debug)]
pub struct AggregationError {
    pub path: PathBuf,
    pub source: io::Error,
}

impl AggregationError {
    fn new(path: &Path, source: io::Error) -> Self {
        Self {
            path: path.to_path_buf(),
            source,
        }
    }
}

impl fmt::Display for AggregationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "error walking {}: {}", self.path.display(), self.source)
    }
}

impl std::error::Error for AggregationError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        Some(&self.source)
    }
}

/// Computes the total size owned by a path.
pub trait SizeAggregator {
    /// Walk the subtree rooted at `root`, failing on the first unreadable node.
    fn compute_totals(&self, root: &Path) -> Result<SubtreeTotals, AggregationError>;

    fn compute_size(&self, root: &Path) -> Result<u64, AggregationError> {
        self.compute_totals(root).map(|totals| totals.bytes)
    }
}

/// Filesystem aggregator that never follows symlinks.
#[derive(Debug, Clone, Copy, Default)]
pub struct WalkAggregator {
    pub basis: SizeBasis,
}

impl WalkAggregator {
    #[must_use]
    pub fn new(basis: SizeBasis) -> Self {
        Self { basis }
    }
}

impl SizeAggregator for WalkAggregator {
    fn compute_totals(&self, root: &Path) -> Result<SubtreeTotals, AggregationError> {
        let mut totals = SubtreeTotals::default();
        let mut pending = vec![root.to_path_buf()];

        while let Some(current) = pending.pop() {
            let metadata =
                fs::symlink_metadata(&current).map_err(|e| AggregationError::new(&current, e))?;

            if metadata.is_dir() {
                if current != root {
                    totals.folders += 1;
                }

                let entries =
                    fs::read_dir(&current).map_err(|e| AggregationError::new(&current, e))?;
                for entry in entries {
                    let entry = entry.map_err(|e| AggregationError::new(&current, e))?;
                    pending.push(entry.path());
                }
            } else {
                let node = size::node_size(self.basis, &current, &metadata);
                log::trace!("{}: {node} bytes", current.display());
                totals.bytes = totals.bytes.saturating_add(node);
                totals.files += 1;
            }
        }

        Ok(totals)
    }
}

/// Total logical size of everything under `root`
///
/// # Errors
/// Returns the first node that could not be read; no partial sum is produced.
pub fn compute_size<P: AsRef<Path>>(root: P) -> Result<u64, AggregationError> {
    WalkAggregator::default().compute_size(root.as_ref())
}

/// Sort items by descending size. Equal sizes keep their relative order,
/// so sorting twice yields the same sequence.
pub fn sort_by_size(items: &mut [ItemInfo]) {
    items.sort_by_key(|item| Reverse(item.size));
}

/// Largest `top_k` items, heaviest first
#[must_use]
pub fn heaviest(items: &[ItemInfo], top_k: Option<usize>) -> Vec<ItemInfo> {
    let mut sorted = items.to_vec();
    sort_by_size(&mut sorted);

    if let Some(k) = top_k {
        sorted.truncate(k);
    }

    sorted
}
